pub use parlor_core::model::PeerName;

pub mod model {
    pub use parlor_core::model::*;
}

#[cfg(feature = "client")]
pub mod client {
    pub use parlor_client::*;
}
