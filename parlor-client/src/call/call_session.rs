use crate::call::media::RemoteTrack;
use crate::call::peer_connection::PeerConnection;
use parlor_core::{IceCandidateInit, PeerName, SessionDescription};
use std::collections::VecDeque;
use std::sync::Arc;

/// Generation counter for call sessions. Every asynchronous capability task
/// carries the epoch it was spawned under; a completion whose epoch does not
/// match the live session is a no-op.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct SessionEpoch(pub u64);

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum CallRole {
    Caller,
    Callee,
}

/// The single pending-or-active media negotiation. At most one exists at a
/// time; the coordinator owns the slot and the peer connection inside it.
pub struct CallSession {
    pub epoch: SessionEpoch,
    pub role: CallRole,
    /// Remote party of this call.
    pub peer: PeerName,
    /// Local identity, captured at session creation.
    pub local: PeerName,
    pub room: String,
    connection: Option<Arc<dyn PeerConnection>>,
    /// Offer stored while ringing, consumed when the user answers.
    pending_offer: Option<SessionDescription>,
    /// Candidates that raced ahead of the remote description, FIFO by arrival.
    pending_candidates: VecDeque<IceCandidateInit>,
    remote_description_set: bool,
    remote_tracks: Vec<RemoteTrack>,
}

impl CallSession {
    pub fn caller(epoch: SessionEpoch, local: PeerName, peer: PeerName, room: String) -> Self {
        Self {
            epoch,
            role: CallRole::Caller,
            peer,
            local,
            room,
            connection: None,
            pending_offer: None,
            pending_candidates: VecDeque::new(),
            remote_description_set: false,
            remote_tracks: Vec::new(),
        }
    }

    pub fn callee(
        epoch: SessionEpoch,
        local: PeerName,
        peer: PeerName,
        room: String,
        offer: SessionDescription,
    ) -> Self {
        Self {
            epoch,
            role: CallRole::Callee,
            peer,
            local,
            room,
            connection: None,
            pending_offer: Some(offer),
            pending_candidates: VecDeque::new(),
            remote_description_set: false,
            remote_tracks: Vec::new(),
        }
    }

    pub fn connection(&self) -> Option<&Arc<dyn PeerConnection>> {
        self.connection.as_ref()
    }

    pub fn set_connection(&mut self, connection: Arc<dyn PeerConnection>) {
        self.connection = Some(connection);
    }

    pub fn take_connection(&mut self) -> Option<Arc<dyn PeerConnection>> {
        self.connection.take()
    }

    pub fn take_offer(&mut self) -> Option<SessionDescription> {
        self.pending_offer.take()
    }

    /// Buffer a candidate that arrived before the remote description.
    pub fn push_candidate(&mut self, candidate: IceCandidateInit) {
        self.pending_candidates.push_back(candidate);
    }

    pub fn remote_description_set(&self) -> bool {
        self.remote_description_set
    }

    /// Mark the remote description applied and hand back everything that was
    /// waiting on it, in arrival order. The queue is emptied, so each buffered
    /// candidate is returned at most once.
    pub fn remote_description_applied(&mut self) -> Vec<IceCandidateInit> {
        self.remote_description_set = true;
        self.pending_candidates.drain(..).collect()
    }

    pub fn add_remote_track(&mut self, track: RemoteTrack) -> &[RemoteTrack] {
        self.remote_tracks.push(track);
        &self.remote_tracks
    }
}
