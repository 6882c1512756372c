pub mod chat;
pub mod message;

pub use chat::*;
pub use message::*;
