//! Tutor payout bank account.

use mongodb::bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankAccount {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub tutor_id: ObjectId,
    pub account_name: String,
    /// Unique across the collection.
    pub account_number: String,
    pub bank_name: String,
    /// Gateway bank code used to create transfer recipients.
    pub bank_code: String,
    pub is_active: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl BankAccount {
    pub fn new(
        tutor_id: ObjectId,
        account_name: String,
        account_number: String,
        bank_name: String,
        bank_code: String,
    ) -> Self {
        let now = DateTime::now();

        Self {
            id: None,
            tutor_id,
            account_name,
            account_number,
            bank_name,
            bank_code,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}
