use thiserror::Error;

/// Everything that can go wrong from the UI adapter's point of view. Every
/// variant resolves to a well-defined state machine state; none is fatal to
/// the client loop.
#[derive(Debug, Error, Clone)]
pub enum ClientError {
    #[error("camera/microphone unavailable: {0}")]
    MediaAcquisition(String),
    #[error("negotiation failed: {0}")]
    Negotiation(String),
    #[error("a call is already pending or active")]
    CallBusy,
    #[error("not joined to a room")]
    NotInRoom,
    #[error("already joined to a room")]
    AlreadyInRoom,
    #[error("no incoming call to answer")]
    NoPendingCall,
    #[error("room name must not be empty")]
    EmptyRoomName,
    #[error("signaling transport unavailable")]
    TransportUnavailable,
    #[error("client loop has shut down")]
    Closed,
}
