use crate::call::call_session::SessionEpoch;
use crate::call::media::{MediaStream, RemoteTrack};
use async_trait::async_trait;
use parlor_core::{IceCandidateInit, IceServerConfig, SessionDescription};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Debug, Error, Clone)]
pub enum PeerConnectionError {
    #[error("negotiation failed: {0}")]
    Negotiation(String),
    #[error("ICE candidate rejected: {0}")]
    Ice(String),
    #[error("peer connection is closed")]
    Closed,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum PeerConnectionState {
    New,
    Connecting,
    Connected,
    Disconnected,
    Failed,
    Closed,
}

/// Events pushed by the capability into the client loop. Each carries the
/// epoch of the session the connection was created for, so results arriving
/// after that session was torn down are recognizable and dropped.
#[derive(Debug)]
pub enum PeerEvent {
    CandidateReady(SessionEpoch, IceCandidateInit),
    TrackAdded(SessionEpoch, RemoteTrack),
    StateChanged(SessionEpoch, PeerConnectionState),
}

/// One negotiated media connection, implemented by the embedding application
/// on top of its WebRTC stack. The coordinator only drives the
/// offer/answer/candidate sequence and never inspects SDP contents.
#[async_trait]
pub trait PeerConnection: Send + Sync {
    async fn create_offer(&self) -> Result<SessionDescription, PeerConnectionError>;

    async fn create_answer(&self) -> Result<SessionDescription, PeerConnectionError>;

    async fn set_local_description(
        &self,
        desc: SessionDescription,
    ) -> Result<(), PeerConnectionError>;

    async fn set_remote_description(
        &self,
        desc: SessionDescription,
    ) -> Result<(), PeerConnectionError>;

    async fn add_ice_candidate(&self, candidate: IceCandidateInit)
    -> Result<(), PeerConnectionError>;

    /// Attach the local capture tracks for sending.
    async fn attach_media(&self, stream: Arc<dyn MediaStream>) -> Result<(), PeerConnectionError>;

    /// Release the connection. Idempotent; capability results resolving after
    /// close must be tolerated by the implementation.
    async fn close(&self);
}

/// Factory for peer connections. `events` is the channel the new connection
/// reports candidate generation, track arrival and state changes on.
#[async_trait]
pub trait PeerConnector: Send + Sync {
    async fn connect(
        &self,
        epoch: SessionEpoch,
        ice_servers: &[IceServerConfig],
        events: mpsc::UnboundedSender<PeerEvent>,
    ) -> Result<Arc<dyn PeerConnection>, PeerConnectionError>;
}
