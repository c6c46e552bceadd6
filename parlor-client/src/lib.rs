pub mod call;
pub mod chat;
pub mod client;
pub mod room;
pub mod transport;

pub use call::*;
pub use chat::*;
pub use client::*;
pub use room::*;
pub use transport::*;
