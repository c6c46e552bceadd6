mod call_event;
mod call_phase;
mod call_session;
mod coordinator;
mod media;
mod peer_connection;

pub use call_phase::CallPhase;
pub use call_session::SessionEpoch;
pub use media::{MediaError, MediaKind, MediaSource, MediaStream, RemoteTrack};
pub use peer_connection::{
    PeerConnection, PeerConnectionError, PeerConnectionState, PeerConnector, PeerEvent,
};

pub(crate) use call_event::{CallEvent, NegotiationOutcome};
pub(crate) use call_session::{CallRole, CallSession};
pub(crate) use coordinator::CallCoordinator;
