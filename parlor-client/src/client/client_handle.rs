use crate::chat::ChatLog;
use crate::client::error::ClientError;
use crate::client::intent::Intent;
use bytes::Bytes;
use dashmap::DashMap;
use parlor_core::{ChatMessage, ConnectionId, Participant, PeerName};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Cloneable facade the UI adapter drives the client through. Intents are
/// forwarded into the client loop; the member registry and chat log are
/// shared read views.
#[derive(Clone)]
pub struct ClientHandle {
    intents: mpsc::Sender<Intent>,
    members: Arc<DashMap<ConnectionId, Participant>>,
    chat: ChatLog,
}

impl ClientHandle {
    pub(crate) fn new(
        intents: mpsc::Sender<Intent>,
        members: Arc<DashMap<ConnectionId, Participant>>,
        chat: ChatLog,
    ) -> Self {
        Self {
            intents,
            members,
            chat,
        }
    }

    pub async fn join_room(
        &self,
        room: impl Into<String>,
        user: impl Into<PeerName>,
    ) -> Result<(), ClientError> {
        self.send(Intent::JoinRoom {
            room: room.into(),
            user: user.into(),
        })
        .await
    }

    pub async fn leave_room(&self) -> Result<(), ClientError> {
        self.send(Intent::LeaveRoom).await
    }

    pub async fn call_user(&self, target: impl Into<PeerName>) -> Result<(), ClientError> {
        self.send(Intent::CallUser {
            target: target.into(),
        })
        .await
    }

    pub async fn answer_call(&self) -> Result<(), ClientError> {
        self.send(Intent::AnswerCall).await
    }

    pub async fn reject_call(&self) -> Result<(), ClientError> {
        self.send(Intent::RejectCall).await
    }

    pub async fn end_call(&self) -> Result<(), ClientError> {
        self.send(Intent::EndCall).await
    }

    pub async fn send_text(&self, text: impl Into<String>) -> Result<(), ClientError> {
        self.send(Intent::SendText { text: text.into() }).await
    }

    pub async fn send_file(
        &self,
        file_name: impl Into<String>,
        content: Bytes,
    ) -> Result<(), ClientError> {
        self.send(Intent::SendFile {
            file_name: file_name.into(),
            content,
        })
        .await
    }

    pub async fn toggle_mute(&self) -> Result<(), ClientError> {
        self.send(Intent::ToggleMute).await
    }

    pub async fn toggle_video(&self) -> Result<(), ClientError> {
        self.send(Intent::ToggleVideo).await
    }

    pub fn current_members(&self) -> Vec<Participant> {
        self.members.iter().map(|e| e.value().clone()).collect()
    }

    pub async fn chat_history(&self) -> Vec<ChatMessage> {
        self.chat.history().await
    }

    async fn send(&self, intent: Intent) -> Result<(), ClientError> {
        self.intents
            .send(intent)
            .await
            .map_err(|_| ClientError::Closed)
    }
}
