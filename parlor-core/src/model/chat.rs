use crate::model::peer::PeerName;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// A single room chat entry. Append-only once created.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct ChatMessage {
    #[serde(rename = "user")]
    pub sender: PeerName,
    pub text: String,
}

/// A complete in-memory file transfer, delivered as one atomic unit.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct FileTransfer {
    pub sender: PeerName,
    pub file_name: String,
    pub content: Bytes,
}
