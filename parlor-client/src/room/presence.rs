use dashmap::DashMap;
use parlor_core::{ConnectionId, Participant, PeerName};
use std::sync::Arc;

/// The local client's room membership: exactly one room at a time.
#[derive(Debug, Clone)]
pub struct Membership {
    pub room: String,
    pub user: PeerName,
}

/// Tracks who is in the room, nothing else. No call-state knowledge lives
/// here, so the coordinator can be exercised independently of presence churn.
pub struct RoomPresence {
    local: Option<Membership>,
    members: Arc<DashMap<ConnectionId, Participant>>,
}

impl RoomPresence {
    pub fn new() -> Self {
        Self {
            local: None,
            members: Arc::new(DashMap::new()),
        }
    }

    /// Shared read view handed to the client handle.
    pub(crate) fn members_view(&self) -> Arc<DashMap<ConnectionId, Participant>> {
        self.members.clone()
    }

    pub fn join(&mut self, room: String, user: PeerName) {
        self.local = Some(Membership { room, user });
    }

    pub fn local(&self) -> Option<&Membership> {
        self.local.as_ref()
    }

    /// Returns false for a duplicate join notification; participants are
    /// deduped by connection id.
    pub fn participant_joined(&mut self, user: PeerName, id: ConnectionId) -> bool {
        if self.members.contains_key(&id) {
            return false;
        }
        self.members.insert(id, Participant { name: user, id });
        true
    }

    /// Leaving an unknown participant is a no-op, not an error.
    pub fn participant_left(&mut self, id: &ConnectionId) -> bool {
        self.members.remove(id).is_some()
    }

    pub fn current_members(&self) -> Vec<Participant> {
        self.members.iter().map(|e| e.value().clone()).collect()
    }

    pub fn clear(&mut self) {
        self.local = None;
        self.members.clear();
    }
}

impl Default for RoomPresence {
    fn default() -> Self {
        Self::new()
    }
}
