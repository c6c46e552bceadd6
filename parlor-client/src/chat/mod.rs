mod chat_log;
mod data_channel;

pub use chat_log::*;
pub use data_channel::*;
