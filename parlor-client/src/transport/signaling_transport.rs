use async_trait::async_trait;
use parlor_core::SignalMessage;
use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum TransportError {
    #[error("signaling channel is closed")]
    Closed,
    #[error("signaling send failed: {0}")]
    Send(String),
}

/// Outbound half of the relay connection.
///
/// The embedding application implements this over its actual socket. Inbound
/// traffic takes the other direction: the application decodes each frame into
/// a `SignalMessage` and feeds it to the client loop as a `TransportEvent`.
#[async_trait]
pub trait SignalingTransport: Send + Sync {
    async fn emit(&self, msg: SignalMessage) -> Result<(), TransportError>;
}
