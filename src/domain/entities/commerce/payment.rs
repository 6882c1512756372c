//! Payment record for a checkout attempt.

use mongodb::bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Success,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub email: String,
    /// Amount in major currency units (naira).
    pub amount: f64,
    pub status: PaymentStatus,
    /// Our generated reference, also known to the gateway.
    pub reference: String,
    /// Gateway-side transaction id, set when the webhook verifies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<i64>,
    /// Kept optional so the money trail survives account deletion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<ObjectId>,
    pub cart_ids: Vec<ObjectId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Payment {
    pub fn new(
        email: String,
        amount: f64,
        reference: String,
        student_id: ObjectId,
        cart_ids: Vec<ObjectId>,
    ) -> Self {
        let now = DateTime::now();

        Self {
            id: None,
            email,
            amount,
            status: PaymentStatus::Pending,
            reference,
            transaction_id: None,
            student_id: Some(student_id),
            cart_ids,
            currency: None,
            channel: None,
            paid_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkout_creates_pending_payment() {
        let payment = Payment::new(
            "chi@example.com".to_string(),
            7500.0,
            "TWP_TF12345678901".to_string(),
            ObjectId::new(),
            vec![ObjectId::new()],
        );
        assert_eq!(payment.status, PaymentStatus::Pending);
        assert!(payment.paid_at.is_none());
        assert!(payment.transaction_id.is_none());
    }
}
