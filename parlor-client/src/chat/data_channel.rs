use crate::chat::chat_log::ChatLog;
use crate::client::Notification;
use crate::room::Membership;
use crate::transport::{SignalingTransport, TransportError};
use bytes::Bytes;
use parlor_core::{ChatMessage, FileTransfer, PeerName, SignalMessage};
use serde_bytes::ByteBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

/// Chat and file exchange for the whole room. Deliberately ignorant of the
/// call session so messaging keeps working before, during and after calls.
pub struct DataChannelManager {
    transport: Arc<dyn SignalingTransport>,
    notifications: mpsc::UnboundedSender<Notification>,
    log: ChatLog,
}

impl DataChannelManager {
    pub fn new(
        transport: Arc<dyn SignalingTransport>,
        notifications: mpsc::UnboundedSender<Notification>,
    ) -> Self {
        Self {
            transport,
            notifications,
            log: ChatLog::new(),
        }
    }

    pub fn log(&self) -> ChatLog {
        self.log.clone()
    }

    /// Sender appends optimistically; relay acknowledgment is not awaited.
    pub async fn send_text(
        &self,
        local: &Membership,
        text: String,
    ) -> Result<(), TransportError> {
        let message = ChatMessage {
            sender: local.user.clone(),
            text,
        };
        self.log.append(message.clone()).await;
        self.transport
            .emit(SignalMessage::Chat {
                message,
                room: local.room.clone(),
            })
            .await
    }

    /// One atomic unit per file; the whole payload travels in memory.
    pub async fn send_file(
        &self,
        local: &Membership,
        file_name: String,
        content: Bytes,
    ) -> Result<(), TransportError> {
        self.transport
            .emit(SignalMessage::File {
                room: local.room.clone(),
                user: local.user.clone(),
                file_name,
                file_content: ByteBuf::from(content.to_vec()),
            })
            .await
    }

    /// Relay broadcasts include our own messages back; those were already
    /// appended at send time, so self-echo is dropped.
    pub async fn text_received(&self, local: &Membership, message: ChatMessage) {
        if message.sender == local.user {
            debug!("skipping chat self-echo");
            return;
        }
        self.log.append(message.clone()).await;
        let _ = self.notifications.send(Notification::ChatReceived(message));
    }

    /// Received files go straight to the UI adapter; nothing is persisted
    /// here.
    pub fn file_received(
        &self,
        local: &Membership,
        sender: PeerName,
        file_name: String,
        content: ByteBuf,
    ) {
        if sender == local.user {
            debug!("skipping file self-echo");
            return;
        }
        let transfer = FileTransfer {
            sender,
            file_name,
            content: Bytes::from(content.into_vec()),
        };
        let _ = self.notifications.send(Notification::FileReceived(transfer));
    }
}
