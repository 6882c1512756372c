//! Shopping-cart line item.

use mongodb::bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// Lifecycle of a cart row: `Pending` while in the cart, `Initiated` once
/// checkout has started at the gateway, `Success` after the webhook enrolls
/// the student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CartStatus {
    Pending,
    Initiated,
    Success,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub student_id: ObjectId,
    pub course_id: ObjectId,
    pub quantity: u32,
    /// Course price at the time the row was added.
    pub unit_price: f64,
    pub status: CartStatus,
    /// Gateway reference once checkout is initiated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_reference: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl CartItem {
    pub fn new(student_id: ObjectId, course_id: ObjectId, unit_price: f64) -> Self {
        let now = DateTime::now();

        Self {
            id: None,
            student_id,
            course_id,
            quantity: 1,
            unit_price,
            status: CartStatus::Pending,
            payment_reference: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn line_total(&self) -> f64 {
        self.unit_price * self.quantity as f64
    }
}

/// Sums payable rows; `Success` rows are already owned and excluded.
pub fn cart_total(items: &[CartItem]) -> f64 {
    items
        .iter()
        .filter(|i| i.status != CartStatus::Success)
        .map(CartItem::line_total)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(price: f64, quantity: u32, status: CartStatus) -> CartItem {
        let mut i = CartItem::new(ObjectId::new(), ObjectId::new(), price);
        i.quantity = quantity;
        i.status = status;
        i
    }

    #[test]
    fn line_total_multiplies_quantity() {
        assert_eq!(item(2500.0, 2, CartStatus::Pending).line_total(), 5000.0);
    }

    #[test]
    fn total_skips_purchased_rows() {
        let items = vec![
            item(1000.0, 1, CartStatus::Pending),
            item(2000.0, 1, CartStatus::Success),
            item(500.0, 2, CartStatus::Initiated),
        ];
        assert_eq!(cart_total(&items), 2000.0);
    }
}
