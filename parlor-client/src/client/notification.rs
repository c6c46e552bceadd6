use crate::call::{CallPhase, PeerConnectionState, RemoteTrack};
use crate::client::error::ClientError;
use parlor_core::{ChatMessage, FileTransfer, Participant, PeerName};

/// Why a call session ended.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum CallEndReason {
    HungUp,
    PeerHungUp,
    Rejected,
    RejectedByPeer,
    NegotiationFailed,
}

/// Everything the UI adapter hears from the client loop.
#[derive(Debug, Clone)]
pub enum Notification {
    CallStatusChanged(CallPhase),
    IncomingCall { from: PeerName },
    CallEnded { reason: CallEndReason },
    /// Accumulated remote tracks; empty when a call tears down.
    RemoteStreamUpdated { tracks: Vec<RemoteTrack> },
    LocalMediaChanged { audio: bool, video: bool },
    ConnectionStateChanged(PeerConnectionState),
    ChatReceived(ChatMessage),
    FileReceived(FileTransfer),
    ParticipantsChanged(Vec<Participant>),
    /// The relay connection dropped; all state has been reset.
    TransportLost,
    Error(ClientError),
}
