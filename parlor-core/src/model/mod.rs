mod chat;
mod peer;
mod signaling;

pub use chat::{ChatMessage, FileTransfer};
pub use peer::{ConnectionId, Participant, PeerName};
pub use signaling::{IceCandidateInit, IceServerConfig, SessionDescription, SignalMessage};
