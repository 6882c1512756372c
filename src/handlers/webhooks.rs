//! Paystack webhook receiver.
//!
//! The signature is verified against the raw body before anything is
//! parsed. Processing failures surface as error responses so Paystack
//! retries the delivery; event processing is idempotent on redelivery.

use actix_web::{HttpRequest, HttpResponse, post, web};

use crate::domain::models::response::api_response::ApiResponse;
use crate::errors::errors::AppError;
use crate::services::payments::webhook_service::{WebhookEvent, WebhookService};

#[post("/paystack")]
pub async fn paystack(req: HttpRequest, body: web::Bytes) -> Result<HttpResponse, AppError> {
    let signature = req
        .headers()
        .get("x-paystack-signature")
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| {
            AppError::AuthenticationError("Missing webhook signature".to_string())
        })?;

    let service = WebhookService::instance();
    service.verify_signature(&body, signature)?;

    let event: WebhookEvent = serde_json::from_slice(&body)
        .map_err(|e| AppError::ValidationError(format!("Malformed webhook payload: {}", e)))?;

    service.process_event(event).await?;

    Ok(ApiResponse::success("Webhook received", serde_json::Value::Null))
}
