pub mod payout_service;
pub mod paystack_service;
pub mod webhook_service;
