pub mod bank_account;
pub mod withdrawal;

pub use bank_account::*;
pub use withdrawal::*;
