pub mod cart_service;
pub mod progress_service;
