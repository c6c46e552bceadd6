use crate::model::chat::ChatMessage;
use crate::model::peer::{ConnectionId, PeerName};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IceServerConfig {
    pub urls: Vec<String>,
    pub username: Option<String>,
    pub credential: Option<String>,
}

/// An SDP session description. The coordinator never inspects the SDP text,
/// it only carries it between the relay and the peer connection capability.
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct SessionDescription {
    pub sdp: String,
}

impl SessionDescription {
    pub fn new(sdp: impl Into<String>) -> Self {
        Self { sdp: sdp.into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IceCandidateInit {
    pub candidate: String,
    pub sdp_mid: Option<String>,
    pub sdp_m_line_index: Option<u16>,
}

/// Everything that travels over the signaling relay, decoded once at the
/// transport boundary so the components match exhaustively instead of
/// dispatching on string tags.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", content = "d", rename_all = "camelCase")]
pub enum SignalMessage {
    JoinRoom {
        room: String,
        user: PeerName,
    },
    UserJoined {
        user: PeerName,
        id: ConnectionId,
    },
    UserLeft {
        user: PeerName,
        id: ConnectionId,
    },
    #[serde(rename_all = "camelCase")]
    VideoOffer {
        offer: SessionDescription,
        room: String,
        user_to_call: PeerName,
        caller: PeerName,
    },
    VideoAnswer {
        answer: SessionDescription,
        room: String,
        caller: PeerName,
    },
    IceCandidate {
        candidate: IceCandidateInit,
        room: String,
        target: Option<PeerName>,
    },
    CallRejected {
        room: String,
        caller: PeerName,
    },
    CallDisconnected {
        room: String,
    },
    #[serde(rename = "message")]
    Chat {
        message: ChatMessage,
        room: String,
    },
    #[serde(rename_all = "camelCase")]
    File {
        room: String,
        user: PeerName,
        file_name: String,
        file_content: serde_bytes::ByteBuf,
    },
}
