use bytes::Bytes;
use parlor_core::PeerName;

/// User intents forwarded from the UI adapter into the client loop.
#[derive(Debug)]
pub enum Intent {
    /// Join a named room under the given identity.
    JoinRoom { room: String, user: PeerName },

    /// Leave the room, hanging up first if a call is live.
    LeaveRoom,

    /// Start a call toward another participant.
    CallUser { target: PeerName },

    /// Accept the currently ringing call.
    AnswerCall,

    /// Decline the currently ringing call.
    RejectCall,

    /// Hang up the pending or active call.
    EndCall,

    /// Broadcast a chat line to the room.
    SendText { text: String },

    /// Broadcast a file to the room, as one in-memory unit.
    SendFile { file_name: String, content: Bytes },

    ToggleMute,
    ToggleVideo,
}
