use crate::call::{CallCoordinator, CallEvent, MediaSource, PeerConnector};
use crate::chat::DataChannelManager;
use crate::client::client_handle::ClientHandle;
use crate::client::config::ClientConfig;
use crate::client::error::ClientError;
use crate::client::intent::Intent;
use crate::client::notification::Notification;
use crate::room::RoomPresence;
use crate::transport::{SignalingTransport, TransportError, TransportEvent};
use parlor_core::SignalMessage;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// One client = one event loop. Signaling messages, user intents and
/// capability callbacks all arrive as discrete events here; no session state
/// is mutated from anywhere else.
pub struct Client {
    intent_rx: mpsc::Receiver<Intent>,
    transport_rx: mpsc::Receiver<TransportEvent>,
    events_rx: mpsc::UnboundedReceiver<CallEvent>,
    coordinator: CallCoordinator,
    presence: RoomPresence,
    data: DataChannelManager,
    notifications: mpsc::UnboundedSender<Notification>,
}

impl Client {
    pub fn new(
        transport: Arc<dyn SignalingTransport>,
        transport_rx: mpsc::Receiver<TransportEvent>,
        connector: Arc<dyn PeerConnector>,
        media_source: Arc<dyn MediaSource>,
        config: ClientConfig,
    ) -> (Self, ClientHandle, mpsc::UnboundedReceiver<Notification>) {
        let (intent_tx, intent_rx) = mpsc::channel(config.intent_capacity);
        let (notify_tx, notify_rx) = mpsc::unbounded_channel();
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let coordinator = CallCoordinator::new(
            config,
            transport.clone(),
            connector,
            media_source,
            events_tx,
            notify_tx.clone(),
        );
        let presence = RoomPresence::new();
        let data = DataChannelManager::new(transport, notify_tx.clone());
        let handle = ClientHandle::new(intent_tx, presence.members_view(), data.log());

        let client = Self {
            intent_rx,
            transport_rx,
            events_rx,
            coordinator,
            presence,
            data,
            notifications: notify_tx,
        };
        (client, handle, notify_rx)
    }

    pub async fn run(mut self) {
        info!("client event loop started");

        loop {
            tokio::select! {
                intent = self.intent_rx.recv() => {
                    match intent {
                        Some(intent) => {
                            if self.handle_intent(intent).await.is_err() {
                                self.on_transport_lost().await;
                            }
                        }
                        None => {
                            info!("handle dropped, shutting down client");
                            break;
                        }
                    }
                }

                event = self.transport_rx.recv() => {
                    match event {
                        Some(TransportEvent::Signal(msg)) => {
                            if self.handle_signal(msg).await.is_err() {
                                self.on_transport_lost().await;
                            }
                        }
                        Some(TransportEvent::Closed) => {
                            warn!("signaling transport closed");
                            self.on_transport_lost().await;
                        }
                        None => {
                            warn!("transport event channel closed");
                            self.on_transport_lost().await;
                            break;
                        }
                    }
                }

                Some(event) = self.events_rx.recv() => {
                    if self
                        .coordinator
                        .handle_event(event, self.presence.local())
                        .await
                        .is_err()
                    {
                        self.on_transport_lost().await;
                    }
                }
            }
        }

        info!("client event loop finished");
    }

    async fn handle_intent(&mut self, intent: Intent) -> Result<(), TransportError> {
        match intent {
            Intent::JoinRoom { room, user } => {
                if self.presence.local().is_some() {
                    self.notify_error(ClientError::AlreadyInRoom);
                    return Ok(());
                }
                if room.is_empty() {
                    self.notify_error(ClientError::EmptyRoomName);
                    return Ok(());
                }
                self.coordinator.join_room(&room, &user).await?;
                self.presence.join(room, user);
                Ok(())
            }

            Intent::LeaveRoom => {
                let result = self.coordinator.leave_room().await;
                self.presence.clear();
                self.data.log().clear().await;
                self.notify(Notification::ParticipantsChanged(Vec::new()));
                result
            }

            Intent::CallUser { target } => {
                let Some(local) = self.presence.local().cloned() else {
                    self.notify_error(ClientError::NotInRoom);
                    return Ok(());
                };
                self.coordinator.call_user(&local, target).await
            }

            Intent::AnswerCall => self.coordinator.answer_call().await,
            Intent::RejectCall => self.coordinator.reject_call().await,
            Intent::EndCall => self.coordinator.end_call().await,

            Intent::SendText { text } => {
                let Some(local) = self.presence.local() else {
                    self.notify_error(ClientError::NotInRoom);
                    return Ok(());
                };
                self.data.send_text(local, text).await
            }

            Intent::SendFile { file_name, content } => {
                let Some(local) = self.presence.local() else {
                    self.notify_error(ClientError::NotInRoom);
                    return Ok(());
                };
                self.data.send_file(local, file_name, content).await
            }

            Intent::ToggleMute => {
                self.coordinator.toggle_mute();
                Ok(())
            }
            Intent::ToggleVideo => {
                self.coordinator.toggle_video();
                Ok(())
            }
        }
    }

    /// Tag routing: each inbound message belongs to exactly one component.
    async fn handle_signal(&mut self, msg: SignalMessage) -> Result<(), TransportError> {
        match msg {
            SignalMessage::UserJoined { user, id } => {
                if self.presence.participant_joined(user, id) {
                    self.notify(Notification::ParticipantsChanged(
                        self.presence.current_members(),
                    ));
                }
                Ok(())
            }

            SignalMessage::UserLeft { user, id } => {
                if self.presence.participant_left(&id) {
                    self.notify(Notification::ParticipantsChanged(
                        self.presence.current_members(),
                    ));
                } else {
                    debug!("leave for unknown participant {}", user);
                }
                Ok(())
            }

            SignalMessage::VideoOffer {
                offer,
                room,
                user_to_call,
                caller,
            } => {
                let Some(local) = self.presence.local().cloned() else {
                    debug!("ignoring offer while not joined");
                    return Ok(());
                };
                self.coordinator
                    .handle_offer(&local, offer, room, user_to_call, caller)
                    .await
            }

            SignalMessage::VideoAnswer { answer, .. } => {
                self.coordinator.handle_answer(answer).await
            }

            SignalMessage::IceCandidate { candidate, .. } => {
                self.coordinator.handle_candidate(candidate);
                Ok(())
            }

            SignalMessage::CallRejected { .. } => {
                self.coordinator.handle_rejected();
                Ok(())
            }

            SignalMessage::CallDisconnected { .. } => {
                self.coordinator.handle_disconnected();
                Ok(())
            }

            SignalMessage::Chat { message, .. } => {
                if let Some(local) = self.presence.local() {
                    self.data.text_received(local, message).await;
                }
                Ok(())
            }

            SignalMessage::File {
                user,
                file_name,
                file_content,
                ..
            } => {
                if let Some(local) = self.presence.local() {
                    self.data.file_received(local, user, file_name, file_content);
                }
                Ok(())
            }

            SignalMessage::JoinRoom { user, .. } => {
                warn!("unexpected client-bound joinRoom for {}", user);
                Ok(())
            }
        }
    }

    /// Transport loss resets everything; a reconnect starts a fresh room.
    async fn on_transport_lost(&mut self) {
        self.coordinator.reset();
        self.presence.clear();
        self.data.log().clear().await;
        self.notify(Notification::TransportLost);
    }

    fn notify(&self, notification: Notification) {
        let _ = self.notifications.send(notification);
    }

    fn notify_error(&self, error: ClientError) {
        warn!("{error}");
        self.notify(Notification::Error(error));
    }
}
