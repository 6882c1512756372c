//! Paystack webhook processing.
//!
//! The webhook is the single source of truth for completing a purchase:
//! `charge.success` verifies the transaction against the gateway, marks the
//! payment and cart rows, enrolls the student in each course, bumps the
//! purchase counters and clears the settled cart rows. Transfer events
//! reconcile withdrawal records. Event names nothing here handles are
//! rejected outright.
//!
//! Events are acknowledged idempotently: a payment already marked success is
//! a duplicate delivery and short-circuits without side effects.

use hmac::{Hmac, Mac};
use mongodb::bson::doc;
use serde::Deserialize;
use sha2::Sha512;
use singleton_macro::service;
use std::sync::Arc;

use crate::config::PaystackConfig;
use crate::domain::entities::commerce::cart_item::CartStatus;
use crate::domain::entities::commerce::payment::PaymentStatus;
use crate::domain::entities::commerce::purchased_course::PurchasedCourse;
use crate::errors::errors::AppError;
use crate::repositories::banking::withdrawal_repo::WithdrawalRepository;
use crate::repositories::commerce::cart_repo::CartRepository;
use crate::repositories::commerce::payment_repo::PaymentRepository;
use crate::repositories::commerce::purchased_course_repo::PurchasedCourseRepository;
use crate::repositories::courses::course_repo::CourseRepository;
use crate::services::payments::paystack_service::PaystackService;

type HmacSha512 = Hmac<Sha512>;

/// Action a recognised gateway event maps to.
#[derive(Debug, PartialEq, Eq)]
pub enum EventKind {
    Charge,
    Transfer(&'static str),
}

/// Maps a gateway event name to the action it triggers. Anything else is
/// unsupported and rejected so a misconfigured gateway surfaces early
/// instead of being silently acknowledged.
pub fn classify_event(event: &str) -> Option<EventKind> {
    match event {
        "charge.success" => Some(EventKind::Charge),
        "transfer.success" => Some(EventKind::Transfer("success")),
        "transfer.failed" => Some(EventKind::Transfer("failed")),
        "transfer.reversed" => Some(EventKind::Transfer("reversed")),
        _ => None,
    }
}

#[derive(Debug, Deserialize)]
pub struct WebhookEvent {
    pub event: String,
    pub data: WebhookData,
}

#[derive(Debug, Deserialize)]
pub struct WebhookData {
    pub reference: Option<String>,
    pub id: Option<i64>,
    pub status: Option<String>,
    pub amount: Option<i64>,
    pub currency: Option<String>,
    pub channel: Option<String>,
    pub paid_at: Option<String>,
}

#[service(name = "webhook")]
pub struct WebhookService {
    payment_repo: Arc<PaymentRepository>,
    cart_repo: Arc<CartRepository>,
    purchasedcourse_repo: Arc<PurchasedCourseRepository>,
    course_repo: Arc<CourseRepository>,
    withdrawal_repo: Arc<WithdrawalRepository>,
}

impl WebhookService {
    /// Constant comparison of the `x-paystack-signature` header against the
    /// HMAC-SHA512 of the raw body, keyed with the gateway secret.
    pub fn verify_signature(&self, raw_body: &[u8], signature: &str) -> Result<(), AppError> {
        let secret = PaystackConfig::secret_key();

        let mut mac = HmacSha512::new_from_slice(secret.as_bytes())
            .map_err(|e| AppError::InternalError(format!("HMAC init failed: {}", e)))?;
        mac.update(raw_body);

        let expected =
            hex::decode(signature).map_err(|_| {
                AppError::AuthenticationError("Invalid webhook signature".to_string())
            })?;

        mac.verify_slice(&expected)
            .map_err(|_| AppError::AuthenticationError("Invalid webhook signature".to_string()))
    }

    pub async fn process_event(&self, event: WebhookEvent) -> Result<(), AppError> {
        match classify_event(&event.event) {
            Some(EventKind::Charge) => self.handle_charge_success(event.data).await,
            Some(EventKind::Transfer(status)) => {
                self.handle_transfer_settled(event.data, status).await
            }
            None => Err(AppError::ValidationError(format!(
                "Unsupported webhook event {}",
                event.event
            ))),
        }
    }

    async fn handle_charge_success(&self, data: WebhookData) -> Result<(), AppError> {
        let reference = data
            .reference
            .ok_or_else(|| AppError::ValidationError("Webhook missing reference".to_string()))?;

        let payment = self
            .payment_repo
            .find_by_reference(&reference)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("No payment with reference {}", reference))
            })?;

        // Duplicate delivery: already settled, acknowledge without touching
        // anything.
        if payment.status == PaymentStatus::Success {
            log::info!("webhook replay for settled payment {}", reference);
            return Ok(());
        }

        // Never trust the webhook body alone; confirm with the gateway.
        let verified = PaystackService::instance()
            .verify_transaction(&reference)
            .await?;

        if verified.status != "success" {
            log::warn!(
                "charge.success for {} but verification says {}",
                reference,
                verified.status
            );
            self.payment_repo
                .update_by_reference(
                    &reference,
                    doc! {
                        "status": "failed",
                        "updated_at": mongodb::bson::DateTime::now(),
                    },
                )
                .await?;
            return Err(AppError::ExternalServiceError(format!(
                "Transaction {} did not pass gateway verification",
                reference
            )));
        }

        self.payment_repo
            .update_by_reference(
                &reference,
                doc! {
                    "status": "success",
                    "transaction_id": verified.id,
                    "currency": verified.currency.as_deref().unwrap_or_default(),
                    "channel": verified.channel.as_deref().unwrap_or_default(),
                    "paid_at": mongodb::bson::DateTime::now(),
                    "updated_at": mongodb::bson::DateTime::now(),
                },
            )
            .await?;

        self.cart_repo
            .mark_status_by_reference(&reference, CartStatus::Success)
            .await?;

        let student_id = payment.student_id.ok_or_else(|| {
            AppError::InternalError("Payment has no student attached".to_string())
        })?;
        let payment_id = payment
            .id
            .ok_or_else(|| AppError::InternalError("Payment has no id".to_string()))?;

        let cart_items = self.cart_repo.find_by_ids(&payment.cart_ids).await?;

        for item in cart_items {
            // A replayed partial failure may have enrolled some rows already.
            if self
                .purchasedcourse_repo
                .find_enrollment(&student_id, &item.course_id)
                .await?
                .is_some()
            {
                continue;
            }

            self.purchasedcourse_repo
                .create(PurchasedCourse::new(student_id, item.course_id, payment_id))
                .await?;

            self.course_repo
                .update_raw(
                    &item.course_id.to_hex(),
                    doc! { "$inc": { "purchase_count": 1 } },
                )
                .await?;
        }

        // The settled rows have served their purpose; drop them so the next
        // checkout starts from a clean cart.
        self.cart_repo.delete_succeeded_for_student(&student_id).await?;

        log::info!("payment {} settled and enrollments created", reference);

        Ok(())
    }

    async fn handle_transfer_settled(
        &self,
        data: WebhookData,
        status: &str,
    ) -> Result<(), AppError> {
        let reference = data
            .reference
            .ok_or_else(|| AppError::ValidationError("Webhook missing reference".to_string()))?;

        let mut update = doc! {
            "status": status,
            "updated_at": mongodb::bson::DateTime::now(),
        };
        if status == "success" {
            update.insert("transferred_at", mongodb::bson::DateTime::now());
        }

        let updated = self
            .withdrawal_repo
            .update_by_reference(&reference, update)
            .await?;

        if updated.is_none() {
            log::warn!("transfer event for unknown withdrawal {}", reference);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognised_events_map_to_their_actions() {
        assert_eq!(classify_event("charge.success"), Some(EventKind::Charge));
        assert_eq!(
            classify_event("transfer.success"),
            Some(EventKind::Transfer("success"))
        );
        assert_eq!(
            classify_event("transfer.failed"),
            Some(EventKind::Transfer("failed"))
        );
        assert_eq!(
            classify_event("transfer.reversed"),
            Some(EventKind::Transfer("reversed"))
        );
    }

    #[test]
    fn unsupported_events_are_rejected() {
        assert_eq!(classify_event("subscription.create"), None);
        assert_eq!(classify_event("charge.failed"), None);
        assert_eq!(classify_event(""), None);
    }

    #[test]
    fn event_payload_deserializes() {
        let payload = serde_json::json!({
            "event": "charge.success",
            "data": {
                "reference": "TWP_TF12345678901",
                "id": 4242,
                "status": "success",
                "amount": 500000,
                "currency": "NGN",
                "channel": "card",
                "paid_at": "2025-05-01T10:00:00Z"
            }
        });

        let event: WebhookEvent = serde_json::from_value(payload).unwrap();
        assert_eq!(event.event, "charge.success");
        assert_eq!(event.data.reference.as_deref(), Some("TWP_TF12345678901"));
        assert_eq!(event.data.id, Some(4242));
    }

    #[test]
    fn transfer_event_tolerates_sparse_data() {
        let payload = serde_json::json!({
            "event": "transfer.failed",
            "data": { "reference": "TRF_abc" }
        });

        let event: WebhookEvent = serde_json::from_value(payload).unwrap();
        assert_eq!(event.event, "transfer.failed");
        assert!(event.data.amount.is_none());
    }
}
