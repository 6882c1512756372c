pub mod chat_hub_service;
pub mod message_service;
