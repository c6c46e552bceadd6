use parlor_core::SignalMessage;

/// Inbound relay traffic, decoded once at the transport boundary.
#[derive(Debug)]
pub enum TransportEvent {
    Signal(SignalMessage),

    /// The relay connection dropped. All room and call state resets; a
    /// reconnect starts from scratch.
    Closed,
}
