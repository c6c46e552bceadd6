use crate::call::call_event::{CallEvent, NegotiationOutcome};
use crate::call::call_phase::CallPhase;
use crate::call::call_session::{CallRole, CallSession, SessionEpoch};
use crate::call::media::{MediaSource, MediaStream};
use crate::call::peer_connection::{PeerConnection, PeerConnectionError, PeerConnector, PeerEvent};
use crate::client::{CallEndReason, ClientConfig, ClientError, Notification};
use crate::room::Membership;
use crate::transport::{SignalingTransport, TransportError};
use parlor_core::{IceCandidateInit, IceServerConfig, PeerName, SessionDescription, SignalMessage};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The call state machine. Interprets user intents and inbound call signals,
/// drives the peer connection capability through spawned tasks, and emits
/// outbound signaling. All mutation happens on the client loop; spawned tasks
/// only report back as epoch-tagged `CallEvent`s.
pub(crate) struct CallCoordinator {
    config: ClientConfig,
    transport: Arc<dyn SignalingTransport>,
    connector: Arc<dyn PeerConnector>,
    media_source: Arc<dyn MediaSource>,
    events: mpsc::UnboundedSender<CallEvent>,
    notifications: mpsc::UnboundedSender<Notification>,
    phase: CallPhase,
    session: Option<CallSession>,
    local_media: Option<Arc<dyn MediaStream>>,
    epoch_counter: u64,
}

impl CallCoordinator {
    pub(crate) fn new(
        config: ClientConfig,
        transport: Arc<dyn SignalingTransport>,
        connector: Arc<dyn PeerConnector>,
        media_source: Arc<dyn MediaSource>,
        events: mpsc::UnboundedSender<CallEvent>,
        notifications: mpsc::UnboundedSender<Notification>,
    ) -> Self {
        Self {
            config,
            transport,
            connector,
            media_source,
            events,
            notifications,
            phase: CallPhase::Idle,
            session: None,
            local_media: None,
            epoch_counter: 0,
        }
    }

    /// Join is assumed acknowledged right after a successful emit; the relay
    /// does not NACK joins. Media capture is kicked off here so a stream is
    /// ready for any future call in this room.
    pub(crate) async fn join_room(
        &mut self,
        room: &str,
        user: &PeerName,
    ) -> Result<(), TransportError> {
        self.set_phase(CallPhase::Joining);
        self.transport
            .emit(SignalMessage::JoinRoom {
                room: room.to_owned(),
                user: user.clone(),
            })
            .await?;
        self.set_phase(CallPhase::InRoom);

        let media_source = self.media_source.clone();
        let events = self.events.clone();
        let room = room.to_owned();
        tokio::spawn(async move {
            match media_source.capture().await {
                Ok(stream) => {
                    let _ = events.send(CallEvent::MediaReady { room, stream });
                }
                Err(error) => {
                    let _ = events.send(CallEvent::MediaFailed { room, error });
                }
            }
        });
        Ok(())
    }

    pub(crate) async fn call_user(
        &mut self,
        local: &Membership,
        target: PeerName,
    ) -> Result<(), TransportError> {
        if self.session.is_some() {
            self.notify_error(ClientError::CallBusy);
            return Ok(());
        }
        let Some(media) = self.local_media.clone() else {
            self.notify_error(ClientError::MediaAcquisition(
                "no local media stream".to_owned(),
            ));
            return Ok(());
        };

        let epoch = self.next_epoch();
        info!("calling {} in room {}", target, local.room);
        self.session = Some(CallSession::caller(
            epoch,
            local.user.clone(),
            target,
            local.room.clone(),
        ));
        self.set_phase(CallPhase::Calling);

        spawn_caller_negotiation(
            self.connector.clone(),
            self.config.ice_servers.clone(),
            media,
            self.events.clone(),
            epoch,
        );
        Ok(())
    }

    /// Inbound `videoOffer` addressed to us. While a session exists the offer
    /// is answered with `callRejected` so the second caller does not ring
    /// forever against a busy callee.
    pub(crate) async fn handle_offer(
        &mut self,
        local: &Membership,
        offer: SessionDescription,
        room: String,
        user_to_call: PeerName,
        caller: PeerName,
    ) -> Result<(), TransportError> {
        if user_to_call != local.user {
            debug!("ignoring offer addressed to {}", user_to_call);
            return Ok(());
        }
        if self.session.is_some() {
            info!("busy, rejecting offer from {}", caller);
            return self
                .transport
                .emit(SignalMessage::CallRejected { room, caller })
                .await;
        }

        let epoch = self.next_epoch();
        info!("incoming call from {}", caller);
        self.session = Some(CallSession::callee(
            epoch,
            local.user.clone(),
            caller.clone(),
            room,
            offer,
        ));
        self.set_phase(CallPhase::RingingReceived);
        self.notify(Notification::IncomingCall { from: caller });
        Ok(())
    }

    pub(crate) async fn answer_call(&mut self) -> Result<(), TransportError> {
        let ringing = matches!(
            self.session.as_ref(),
            Some(session)
                if session.role == CallRole::Callee && self.phase == CallPhase::RingingReceived
        );
        if !ringing {
            self.notify_error(ClientError::NoPendingCall);
            return Ok(());
        }

        let Some(media) = self.local_media.clone() else {
            // Without capture the call cannot proceed; free the caller too.
            if let Some(session) = self.session.take() {
                self.notify_error(ClientError::MediaAcquisition(
                    "no local media stream".to_owned(),
                ));
                self.set_phase(CallPhase::InRoom);
                return self
                    .transport
                    .emit(SignalMessage::CallRejected {
                        room: session.room,
                        caller: session.peer,
                    })
                    .await;
            }
            return Ok(());
        };

        let Some(session) = self.session.as_mut() else {
            return Ok(());
        };
        let Some(offer) = session.take_offer() else {
            warn!("ringing session has no stored offer");
            return Ok(());
        };
        let epoch = session.epoch;
        self.set_phase(CallPhase::Negotiating);

        spawn_callee_negotiation(
            self.connector.clone(),
            self.config.ice_servers.clone(),
            media,
            offer,
            self.events.clone(),
            epoch,
        );
        Ok(())
    }

    /// Callee-side reject while ringing. No peer connection exists yet, so
    /// discarding the session is the whole disposal.
    pub(crate) async fn reject_call(&mut self) -> Result<(), TransportError> {
        let ringing = matches!(
            self.session.as_ref(),
            Some(session)
                if session.role == CallRole::Callee && self.phase == CallPhase::RingingReceived
        );
        if !ringing {
            self.notify_error(ClientError::NoPendingCall);
            return Ok(());
        }

        let Some(session) = self.session.take() else {
            return Ok(());
        };
        info!("rejecting call from {}", session.peer);
        self.set_phase(CallPhase::InRoom);
        self.notify(Notification::CallEnded {
            reason: CallEndReason::Rejected,
        });
        self.transport
            .emit(SignalMessage::CallRejected {
                room: session.room,
                caller: session.peer,
            })
            .await
    }

    /// Local hangup, from any session phase. The only teardown path that
    /// notifies the peer.
    pub(crate) async fn end_call(&mut self) -> Result<(), TransportError> {
        if self.session.is_none() {
            debug!("end call with no active session");
            return Ok(());
        }
        self.teardown(CallEndReason::HungUp, true).await
    }

    /// Inbound `videoAnswer` for the session we initiated.
    pub(crate) async fn handle_answer(
        &mut self,
        answer: SessionDescription,
    ) -> Result<(), TransportError> {
        let Some(session) = self.session.as_ref() else {
            debug!("discarding answer, no active session");
            return Ok(());
        };
        if session.role != CallRole::Caller || self.phase != CallPhase::Calling {
            debug!("discarding answer in phase {}", self.phase);
            return Ok(());
        }
        let Some(connection) = session.connection().cloned() else {
            warn!("answer arrived before our offer completed, discarding");
            return Ok(());
        };

        let epoch = session.epoch;
        self.set_phase(CallPhase::Negotiating);

        let events = self.events.clone();
        tokio::spawn(async move {
            let outcome = match connection.set_remote_description(answer).await {
                Ok(()) => NegotiationOutcome::RemoteDescriptionApplied { epoch },
                Err(error) => NegotiationOutcome::Failed { epoch, error },
            };
            let _ = events.send(CallEvent::Negotiation(outcome));
        });
        Ok(())
    }

    /// Inbound `iceCandidate`. Applied immediately once the remote description
    /// is in place, queued otherwise; never dropped because it raced ahead of
    /// the offer/answer exchange.
    pub(crate) fn handle_candidate(&mut self, candidate: IceCandidateInit) {
        let Some(session) = self.session.as_mut() else {
            debug!("discarding candidate, no active session");
            return;
        };

        if session.remote_description_set() {
            if let Some(connection) = session.connection().cloned() {
                spawn_apply_candidates(connection, vec![candidate]);
                return;
            }
        }
        session.push_candidate(candidate);
    }

    /// Inbound `callRejected`. Terminal; must not re-emit anything.
    pub(crate) fn handle_rejected(&mut self) {
        if self.session.is_none() {
            debug!("discarding reject, no active session");
            return;
        }
        self.dispose_session();
        self.notify(Notification::CallEnded {
            reason: CallEndReason::RejectedByPeer,
        });
        self.set_phase(CallPhase::InRoom);
    }

    /// Inbound `callDisconnected`. Terminal; must not re-emit anything.
    pub(crate) fn handle_disconnected(&mut self) {
        if self.session.is_none() {
            debug!("discarding disconnect, no active session");
            return;
        }
        self.dispose_session();
        self.notify(Notification::RemoteStreamUpdated { tracks: Vec::new() });
        self.notify(Notification::CallEnded {
            reason: CallEndReason::PeerHungUp,
        });
        self.set_phase(CallPhase::InRoom);
    }

    pub(crate) async fn handle_event(
        &mut self,
        event: CallEvent,
        local: Option<&Membership>,
    ) -> Result<(), TransportError> {
        match event {
            CallEvent::MediaReady { room, stream } => {
                if local.map(|m| m.room == room) != Some(true) {
                    debug!("discarding media stream for stale room {}", room);
                    return Ok(());
                }
                self.notify(Notification::LocalMediaChanged {
                    audio: stream.audio_enabled(),
                    video: stream.video_enabled(),
                });
                self.local_media = Some(stream);
                Ok(())
            }
            CallEvent::MediaFailed { room, error } => {
                if local.map(|m| m.room == room) != Some(true) {
                    debug!("discarding media failure for stale room {}", room);
                    return Ok(());
                }
                warn!("media acquisition failed: {error}");
                self.notify_error(ClientError::MediaAcquisition(error.to_string()));
                Ok(())
            }
            CallEvent::Negotiation(outcome) => self.handle_negotiation(outcome).await,
            CallEvent::Peer(event) => self.handle_peer_event(event).await,
        }
    }

    async fn handle_negotiation(
        &mut self,
        outcome: NegotiationOutcome,
    ) -> Result<(), TransportError> {
        match outcome {
            NegotiationOutcome::OfferReady {
                epoch,
                connection,
                offer,
            } => {
                let Some(session) = self.live_session(epoch) else {
                    discard_stale_connection(connection);
                    return Ok(());
                };
                session.set_connection(connection);
                let msg = SignalMessage::VideoOffer {
                    offer,
                    room: session.room.clone(),
                    user_to_call: session.peer.clone(),
                    caller: session.local.clone(),
                };
                self.transport.emit(msg).await
            }
            NegotiationOutcome::AnswerReady {
                epoch,
                connection,
                answer,
            } => {
                let Some(session) = self.live_session(epoch) else {
                    discard_stale_connection(connection);
                    return Ok(());
                };
                session.set_connection(connection.clone());
                let buffered = session.remote_description_applied();
                spawn_apply_candidates(connection, buffered);
                let msg = SignalMessage::VideoAnswer {
                    answer,
                    room: session.room.clone(),
                    caller: session.peer.clone(),
                };
                self.set_phase(CallPhase::InCall);
                self.transport.emit(msg).await
            }
            NegotiationOutcome::RemoteDescriptionApplied { epoch } => {
                let Some(session) = self.live_session(epoch) else {
                    return Ok(());
                };
                let buffered = session.remote_description_applied();
                if let Some(connection) = session.connection().cloned() {
                    spawn_apply_candidates(connection, buffered);
                }
                self.set_phase(CallPhase::InCall);
                Ok(())
            }
            NegotiationOutcome::Failed { epoch, error } => {
                if self.live_session(epoch).is_none() {
                    debug!("discarding stale negotiation failure: {error}");
                    return Ok(());
                }
                warn!("negotiation failed: {error}");
                self.notify_error(ClientError::Negotiation(error.to_string()));
                self.teardown(CallEndReason::NegotiationFailed, true).await
            }
        }
    }

    async fn handle_peer_event(&mut self, event: PeerEvent) -> Result<(), TransportError> {
        match event {
            PeerEvent::CandidateReady(epoch, candidate) => {
                let Some(session) = self.live_session(epoch) else {
                    debug!("discarding candidate from stale session");
                    return Ok(());
                };
                let msg = SignalMessage::IceCandidate {
                    candidate,
                    room: session.room.clone(),
                    target: Some(session.peer.clone()),
                };
                self.transport.emit(msg).await
            }
            PeerEvent::TrackAdded(epoch, track) => {
                let Some(session) = self.live_session(epoch) else {
                    debug!("discarding track from stale session");
                    return Ok(());
                };
                let tracks = session.add_remote_track(track).to_vec();
                self.notify(Notification::RemoteStreamUpdated { tracks });
                Ok(())
            }
            PeerEvent::StateChanged(epoch, state) => {
                if self.live_session(epoch).is_some() {
                    self.notify(Notification::ConnectionStateChanged(state));
                }
                Ok(())
            }
        }
    }

    pub(crate) fn toggle_mute(&mut self) {
        let Some(media) = self.local_media.as_ref() else {
            warn!("toggle mute with no local media");
            return;
        };
        media.set_audio_enabled(!media.audio_enabled());
        self.notify_media_state();
    }

    pub(crate) fn toggle_video(&mut self) {
        let Some(media) = self.local_media.as_ref() else {
            warn!("toggle video with no local media");
            return;
        };
        media.set_video_enabled(!media.video_enabled());
        self.notify_media_state();
    }

    /// Explicit leave: hang up first if a session is live, then drop the room
    /// scoped state.
    pub(crate) async fn leave_room(&mut self) -> Result<(), TransportError> {
        let result = if self.session.is_some() {
            self.teardown(CallEndReason::HungUp, true).await
        } else {
            Ok(())
        };
        self.local_media = None;
        self.set_phase(CallPhase::Idle);
        result
    }

    /// Transport loss: everything resets without emitting; there is nobody
    /// left to notify on the wire.
    pub(crate) fn reset(&mut self) {
        self.dispose_session();
        self.local_media = None;
        self.set_phase(CallPhase::Idle);
    }

    async fn teardown(
        &mut self,
        reason: CallEndReason,
        emit_disconnect: bool,
    ) -> Result<(), TransportError> {
        let Some(mut session) = self.session.take() else {
            return Ok(());
        };
        self.set_phase(CallPhase::Ending);
        if let Some(connection) = session.take_connection() {
            tokio::spawn(async move { connection.close().await });
        }
        self.notify(Notification::RemoteStreamUpdated { tracks: Vec::new() });
        self.notify(Notification::CallEnded { reason });
        self.set_phase(CallPhase::InRoom);

        if emit_disconnect {
            self.transport
                .emit(SignalMessage::CallDisconnected { room: session.room })
                .await?;
        }
        Ok(())
    }

    fn dispose_session(&mut self) {
        if let Some(mut session) = self.session.take() {
            if let Some(connection) = session.take_connection() {
                tokio::spawn(async move { connection.close().await });
            }
        }
    }

    fn live_session(&mut self, epoch: SessionEpoch) -> Option<&mut CallSession> {
        self.session.as_mut().filter(|s| s.epoch == epoch)
    }

    fn next_epoch(&mut self) -> SessionEpoch {
        self.epoch_counter += 1;
        SessionEpoch(self.epoch_counter)
    }

    fn set_phase(&mut self, phase: CallPhase) {
        if self.phase == phase {
            return;
        }
        debug!("call phase: {} -> {}", self.phase, phase);
        self.phase = phase;
        self.notify(Notification::CallStatusChanged(phase));
    }

    fn notify(&self, notification: Notification) {
        let _ = self.notifications.send(notification);
    }

    fn notify_error(&self, error: ClientError) {
        warn!("{error}");
        self.notify(Notification::Error(error));
    }

    fn notify_media_state(&self) {
        if let Some(media) = self.local_media.as_ref() {
            self.notify(Notification::LocalMediaChanged {
                audio: media.audio_enabled(),
                video: media.video_enabled(),
            });
        }
    }
}

/// Connection created by a session that died while the task was in flight.
fn discard_stale_connection(connection: Arc<dyn PeerConnection>) {
    debug!("discarding connection from stale negotiation");
    tokio::spawn(async move { connection.close().await });
}

fn spawn_apply_candidates(connection: Arc<dyn PeerConnection>, candidates: Vec<IceCandidateInit>) {
    if candidates.is_empty() {
        return;
    }
    tokio::spawn(async move {
        for candidate in candidates {
            if let Err(e) = connection.add_ice_candidate(candidate).await {
                warn!("failed to apply ICE candidate: {e}");
            }
        }
    });
}

/// Forward per-connection capability events into the client loop.
fn peer_event_channel(
    events: &mpsc::UnboundedSender<CallEvent>,
) -> mpsc::UnboundedSender<PeerEvent> {
    let (peer_tx, mut peer_rx) = mpsc::unbounded_channel();
    let events = events.clone();
    tokio::spawn(async move {
        while let Some(event) = peer_rx.recv().await {
            if events.send(CallEvent::Peer(event)).is_err() {
                break;
            }
        }
    });
    peer_tx
}

fn spawn_caller_negotiation(
    connector: Arc<dyn PeerConnector>,
    ice_servers: Vec<IceServerConfig>,
    media: Arc<dyn MediaStream>,
    events: mpsc::UnboundedSender<CallEvent>,
    epoch: SessionEpoch,
) {
    let peer_tx = peer_event_channel(&events);
    tokio::spawn(async move {
        let mut created: Option<Arc<dyn PeerConnection>> = None;
        let result = async {
            let connection = connector.connect(epoch, &ice_servers, peer_tx).await?;
            created = Some(connection.clone());
            connection.attach_media(media).await?;
            let offer = connection.create_offer().await?;
            connection.set_local_description(offer.clone()).await?;
            Ok::<_, PeerConnectionError>((connection, offer))
        }
        .await;

        let outcome = match result {
            Ok((connection, offer)) => NegotiationOutcome::OfferReady {
                epoch,
                connection,
                offer,
            },
            Err(error) => {
                if let Some(connection) = created {
                    connection.close().await;
                }
                NegotiationOutcome::Failed { epoch, error }
            }
        };
        let _ = events.send(CallEvent::Negotiation(outcome));
    });
}

fn spawn_callee_negotiation(
    connector: Arc<dyn PeerConnector>,
    ice_servers: Vec<IceServerConfig>,
    media: Arc<dyn MediaStream>,
    offer: SessionDescription,
    events: mpsc::UnboundedSender<CallEvent>,
    epoch: SessionEpoch,
) {
    let peer_tx = peer_event_channel(&events);
    tokio::spawn(async move {
        let mut created: Option<Arc<dyn PeerConnection>> = None;
        let result = async {
            let connection = connector.connect(epoch, &ice_servers, peer_tx).await?;
            created = Some(connection.clone());
            connection.attach_media(media).await?;
            connection.set_remote_description(offer).await?;
            let answer = connection.create_answer().await?;
            connection.set_local_description(answer.clone()).await?;
            Ok::<_, PeerConnectionError>((connection, answer))
        }
        .await;

        let outcome = match result {
            Ok((connection, answer)) => NegotiationOutcome::AnswerReady {
                epoch,
                connection,
                answer,
            },
            Err(error) => {
                if let Some(connection) = created {
                    connection.close().await;
                }
                NegotiationOutcome::Failed { epoch, error }
            }
        };
        let _ = events.send(CallEvent::Negotiation(outcome));
    });
}
