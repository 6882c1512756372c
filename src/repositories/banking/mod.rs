pub mod bank_account_repo;
pub mod withdrawal_repo;
