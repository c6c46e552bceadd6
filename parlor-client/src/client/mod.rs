mod client;
mod client_handle;
mod config;
mod error;
mod intent;
mod notification;

pub use client::*;
pub use client_handle::*;
pub use config::*;
pub use error::*;
pub use intent::*;
pub use notification::*;
