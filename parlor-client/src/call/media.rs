use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum MediaError {
    #[error("camera/microphone access denied")]
    AccessDenied,
    #[error("media device unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum MediaKind {
    Audio,
    Video,
}

/// A remote track announced by the peer connection capability. Tracks
/// accumulate on the session as they arrive; the set is never replaced
/// wholesale.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RemoteTrack {
    pub id: String,
    pub kind: MediaKind,
}

/// Local capture handle. Acquired once per joined room, owned by the
/// coordinator; the UI adapter only reads references handed to it.
pub trait MediaStream: Send + Sync {
    fn set_audio_enabled(&self, enabled: bool);
    fn set_video_enabled(&self, enabled: bool);
    fn audio_enabled(&self) -> bool;
    fn video_enabled(&self) -> bool;
}

/// Audio+video capture acquisition, provided by the embedding application.
#[async_trait]
pub trait MediaSource: Send + Sync {
    async fn capture(&self) -> Result<Arc<dyn MediaStream>, MediaError>;
}
