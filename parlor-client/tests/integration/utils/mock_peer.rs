use async_trait::async_trait;
use parlor_client::{
    MediaStream, PeerConnection, PeerConnectionError, PeerConnector, PeerEvent, SessionEpoch,
};
use parlor_core::{IceCandidateInit, IceServerConfig, SessionDescription};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

/// Operations recorded by a mock connection, in call order.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum PeerOp {
    AttachMedia,
    CreateOffer,
    CreateAnswer,
    SetLocalDescription(String),
    SetRemoteDescription(String),
    AddIceCandidate(String),
    Close,
}

/// Mock peer connection capability. Negotiation primitives succeed instantly
/// and are recorded for verification; tests inject capability callbacks
/// through `emit_event`.
pub struct MockPeerConnection {
    pub epoch: SessionEpoch,
    ops: Arc<Mutex<Vec<PeerOp>>>,
    events: mpsc::UnboundedSender<PeerEvent>,
}

impl MockPeerConnection {
    fn new(epoch: SessionEpoch, events: mpsc::UnboundedSender<PeerEvent>) -> Self {
        Self {
            epoch,
            ops: Arc::new(Mutex::new(Vec::new())),
            events,
        }
    }

    pub async fn ops(&self) -> Vec<PeerOp> {
        self.ops.lock().await.clone()
    }

    pub async fn applied_candidates(&self) -> Vec<String> {
        self.ops
            .lock()
            .await
            .iter()
            .filter_map(|op| match op {
                PeerOp::AddIceCandidate(c) => Some(c.clone()),
                _ => None,
            })
            .collect()
    }

    pub async fn was_closed(&self) -> bool {
        self.ops.lock().await.contains(&PeerOp::Close)
    }

    /// Simulate a capability callback (candidate generated, track arrival,
    /// connection state change).
    pub fn emit_event(&self, event: PeerEvent) {
        let _ = self.events.send(event);
    }

    /// Wait until an op matching the predicate has been recorded.
    pub async fn wait_for_op(&self, pred: impl Fn(&PeerOp) -> bool, timeout_ms: u64) -> bool {
        let start = std::time::Instant::now();
        let timeout = std::time::Duration::from_millis(timeout_ms);

        loop {
            if self.ops.lock().await.iter().any(|op| pred(op)) {
                return true;
            }
            if start.elapsed() > timeout {
                return false;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
    }

    async fn record(&self, op: PeerOp) {
        self.ops.lock().await.push(op);
    }
}

#[async_trait]
impl PeerConnection for MockPeerConnection {
    async fn create_offer(&self) -> Result<SessionDescription, PeerConnectionError> {
        self.record(PeerOp::CreateOffer).await;
        Ok(SessionDescription::new("mock-offer-sdp"))
    }

    async fn create_answer(&self) -> Result<SessionDescription, PeerConnectionError> {
        self.record(PeerOp::CreateAnswer).await;
        Ok(SessionDescription::new("mock-answer-sdp"))
    }

    async fn set_local_description(
        &self,
        desc: SessionDescription,
    ) -> Result<(), PeerConnectionError> {
        self.record(PeerOp::SetLocalDescription(desc.sdp)).await;
        Ok(())
    }

    async fn set_remote_description(
        &self,
        desc: SessionDescription,
    ) -> Result<(), PeerConnectionError> {
        self.record(PeerOp::SetRemoteDescription(desc.sdp)).await;
        Ok(())
    }

    async fn add_ice_candidate(
        &self,
        candidate: IceCandidateInit,
    ) -> Result<(), PeerConnectionError> {
        self.record(PeerOp::AddIceCandidate(candidate.candidate))
            .await;
        Ok(())
    }

    async fn attach_media(
        &self,
        _stream: Arc<dyn MediaStream>,
    ) -> Result<(), PeerConnectionError> {
        self.record(PeerOp::AttachMedia).await;
        Ok(())
    }

    async fn close(&self) {
        self.record(PeerOp::Close).await;
    }
}

/// Factory handing out `MockPeerConnection`s and keeping every created
/// instance around for inspection.
pub struct MockConnector {
    connections: Arc<Mutex<Vec<Arc<MockPeerConnection>>>>,
    fail_connect: bool,
    connect_delay_ms: u64,
}

impl MockConnector {
    pub fn new() -> Self {
        Self {
            connections: Arc::new(Mutex::new(Vec::new())),
            fail_connect: false,
            connect_delay_ms: 0,
        }
    }

    /// Every connect attempt fails, as if the capability refused.
    pub fn failing() -> Self {
        Self {
            fail_connect: true,
            ..Self::new()
        }
    }

    /// Connect resolves only after the given delay, for staleness races.
    pub fn with_delay(delay_ms: u64) -> Self {
        Self {
            connect_delay_ms: delay_ms,
            ..Self::new()
        }
    }

    pub async fn created(&self) -> usize {
        self.connections.lock().await.len()
    }

    pub async fn connection(&self, index: usize) -> Option<Arc<MockPeerConnection>> {
        self.connections.lock().await.get(index).cloned()
    }

    /// Wait for the n-th connection to come into existence.
    pub async fn wait_for_connection(
        &self,
        index: usize,
        timeout_ms: u64,
    ) -> Option<Arc<MockPeerConnection>> {
        let start = std::time::Instant::now();
        let timeout = std::time::Duration::from_millis(timeout_ms);

        loop {
            if let Some(connection) = self.connections.lock().await.get(index).cloned() {
                return Some(connection);
            }
            if start.elapsed() > timeout {
                return None;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
    }
}

impl Default for MockConnector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PeerConnector for MockConnector {
    async fn connect(
        &self,
        epoch: SessionEpoch,
        _ice_servers: &[IceServerConfig],
        events: mpsc::UnboundedSender<PeerEvent>,
    ) -> Result<Arc<dyn PeerConnection>, PeerConnectionError> {
        if self.connect_delay_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.connect_delay_ms)).await;
        }
        if self.fail_connect {
            return Err(PeerConnectionError::Negotiation(
                "mock connect refused".to_owned(),
            ));
        }
        let connection = Arc::new(MockPeerConnection::new(epoch, events));
        self.connections.lock().await.push(connection.clone());
        Ok(connection)
    }
}
