mod signaling_transport;
mod transport_event;

pub use signaling_transport::*;
pub use transport_event::*;
