use crate::call::call_session::SessionEpoch;
use crate::call::media::{MediaError, MediaStream};
use crate::call::peer_connection::{PeerConnection, PeerConnectionError, PeerEvent};
use parlor_core::SessionDescription;
use std::sync::Arc;

/// Completions and capability callbacks funneled back into the client loop.
/// Everything session-scoped is epoch-tagged; media acquisition happens per
/// room, so it carries the room name captured at spawn instead.
pub(crate) enum CallEvent {
    Peer(PeerEvent),
    Negotiation(NegotiationOutcome),
    MediaReady {
        room: String,
        stream: Arc<dyn MediaStream>,
    },
    MediaFailed {
        room: String,
        error: MediaError,
    },
}

/// Result of a spawned negotiation step.
pub(crate) enum NegotiationOutcome {
    /// Caller side: connection created, local description set.
    OfferReady {
        epoch: SessionEpoch,
        connection: Arc<dyn PeerConnection>,
        offer: SessionDescription,
    },
    /// Callee side: remote offer applied, answer created and set locally.
    AnswerReady {
        epoch: SessionEpoch,
        connection: Arc<dyn PeerConnection>,
        answer: SessionDescription,
    },
    /// Caller side: remote answer applied.
    RemoteDescriptionApplied { epoch: SessionEpoch },
    Failed {
        epoch: SessionEpoch,
        error: PeerConnectionError,
    },
}
