//! Tutor withdrawal (gateway transfer) record.

use mongodb::bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WithdrawalStatus {
    Pending,
    Success,
    Failed,
    Reversed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Withdrawal {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub tutor_id: ObjectId,
    pub bank_account_id: ObjectId,
    /// Net amount sent to the tutor after the platform charge.
    pub amount: f64,
    pub status: WithdrawalStatus,
    /// Gateway transfer reference, used to reconcile webhook events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer_reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transferred_at: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Withdrawal {
    pub fn new(tutor_id: ObjectId, bank_account_id: ObjectId, amount: f64) -> Self {
        let now = DateTime::now();

        Self {
            id: None,
            tutor_id,
            bank_account_id,
            amount,
            status: WithdrawalStatus::Pending,
            transfer_reference: None,
            transferred_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}
