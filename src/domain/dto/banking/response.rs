use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};

use crate::domain::entities::banking::bank_account::BankAccount;
use crate::domain::entities::banking::withdrawal::{Withdrawal, WithdrawalStatus};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankAccountResponse {
    pub id: String,
    pub account_name: String,
    pub account_number: String,
    pub bank_name: String,
    pub bank_code: String,
}

impl From<BankAccount> for BankAccountResponse {
    fn from(account: BankAccount) -> Self {
        Self {
            id: account.id.map(|id| id.to_hex()).unwrap_or_default(),
            account_name: account.account_name,
            account_number: account.account_number,
            bank_name: account.bank_name,
            bank_code: account.bank_code,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawalResponse {
    pub id: String,
    pub bank_account_id: String,
    pub amount: f64,
    pub status: WithdrawalStatus,
    pub transfer_reference: Option<String>,
    pub created_at: DateTime,
}

impl From<Withdrawal> for WithdrawalResponse {
    fn from(withdrawal: Withdrawal) -> Self {
        Self {
            id: withdrawal.id.map(|id| id.to_hex()).unwrap_or_default(),
            bank_account_id: withdrawal.bank_account_id.to_hex(),
            amount: withdrawal.amount,
            status: withdrawal.status,
            transfer_reference: withdrawal.transfer_reference,
            created_at: withdrawal.created_at,
        }
    }
}

/// Earnings summary shown on the tutor dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EarningsResponse {
    pub gross_earnings: f64,
    pub platform_charge: f64,
    pub net_earnings: f64,
    pub total_withdrawn: f64,
    pub available_balance: f64,
}
