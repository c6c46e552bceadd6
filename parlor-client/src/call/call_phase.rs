use std::fmt;

/// Where the local client stands in the call lifecycle. Terminal transitions
/// land back in `InRoom` (still joined) or `Idle` (room gone).
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum CallPhase {
    Idle,
    Joining,
    InRoom,
    Calling,
    RingingReceived,
    Negotiating,
    InCall,
    Ending,
}

impl CallPhase {
    /// Phases in which the session slot is occupied.
    pub fn has_session(self) -> bool {
        matches!(
            self,
            CallPhase::Calling
                | CallPhase::RingingReceived
                | CallPhase::Negotiating
                | CallPhase::InCall
                | CallPhase::Ending
        )
    }
}

impl fmt::Display for CallPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CallPhase::Idle => "idle",
            CallPhase::Joining => "joining",
            CallPhase::InRoom => "in-room",
            CallPhase::Calling => "calling",
            CallPhase::RingingReceived => "ringing",
            CallPhase::Negotiating => "negotiating",
            CallPhase::InCall => "in-call",
            CallPhase::Ending => "ending",
        };
        write!(f, "{name}")
    }
}
