pub mod chat_repo;
pub mod message_repo;
