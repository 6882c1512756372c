//! Paystack REST client: transaction initialize/verify, bank list and
//! tutor payout transfers.
//!
//! Amounts cross this boundary in major units (naira) and are converted to
//! kobo on the wire, which is the only place subunits appear.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::json;
use singleton_macro::service;

use crate::config::PaystackConfig;
use crate::errors::errors::AppError;

static HTTP: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);

/// Generic gateway envelope: `{ status, message, data }`.
#[derive(Debug, Deserialize)]
struct GatewayResponse<T> {
    status: bool,
    message: String,
    data: Option<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitializedTransaction {
    pub authorization_url: String,
    pub access_code: String,
    pub reference: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifiedTransaction {
    pub id: i64,
    /// "success", "failed" or "abandoned".
    pub status: String,
    pub reference: String,
    /// Subunits (kobo), as the gateway reports it.
    pub amount: i64,
    pub currency: Option<String>,
    pub channel: Option<String>,
    pub paid_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bank {
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TransferRecipient {
    recipient_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitiatedTransfer {
    pub reference: String,
    /// Subunits (kobo).
    pub amount: i64,
    pub status: String,
}

#[service(name = "paystack")]
pub struct PaystackService {
    // Stateless; the HTTP client is shared process-wide.
}

impl PaystackService {
    pub async fn initialize_transaction(
        &self,
        email: &str,
        amount_naira: f64,
        reference: &str,
    ) -> Result<InitializedTransaction, AppError> {
        let body = json!({
            "email": email,
            "amount": to_subunits(amount_naira),
            "reference": reference,
            "currency": PaystackConfig::currency(),
        });

        self.post("/transaction/initialize", &body).await
    }

    pub async fn verify_transaction(
        &self,
        reference: &str,
    ) -> Result<VerifiedTransaction, AppError> {
        self.get(&format!("/transaction/verify/{}", reference)).await
    }

    pub async fn list_banks(&self) -> Result<Vec<Bank>, AppError> {
        self.get(&format!("/bank?currency={}", PaystackConfig::currency()))
            .await
    }

    /// Registers the tutor's bank account with the gateway and returns the
    /// recipient code used for transfers.
    pub async fn create_transfer_recipient(
        &self,
        account_name: &str,
        account_number: &str,
        bank_code: &str,
    ) -> Result<String, AppError> {
        let body = json!({
            "type": "nuban",
            "name": account_name,
            "account_number": account_number,
            "bank_code": bank_code,
            "currency": PaystackConfig::currency(),
        });

        let recipient: TransferRecipient = self.post("/transferrecipient", &body).await?;
        Ok(recipient.recipient_code)
    }

    pub async fn initiate_transfer(
        &self,
        amount_naira: f64,
        recipient_code: &str,
        reference: &str,
        reason: &str,
    ) -> Result<InitiatedTransfer, AppError> {
        let body = json!({
            "source": "balance",
            "amount": to_subunits(amount_naira),
            "recipient": recipient_code,
            "reference": reference,
            "reason": reason,
        });

        self.post("/transfer", &body).await
    }

    async fn post<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, AppError> {
        let response = HTTP
            .post(format!("{}{}", PaystackConfig::base_url(), path))
            .bearer_auth(PaystackConfig::secret_key())
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("Payment gateway unreachable: {}", e)))?;

        Self::unwrap_envelope(response).await
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, AppError> {
        let response = HTTP
            .get(format!("{}{}", PaystackConfig::base_url(), path))
            .bearer_auth(PaystackConfig::secret_key())
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("Payment gateway unreachable: {}", e)))?;

        Self::unwrap_envelope(response).await
    }

    async fn unwrap_envelope<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        let envelope: GatewayResponse<T> = response
            .json()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("Bad gateway response: {}", e)))?;

        if !envelope.status {
            return Err(AppError::ExternalServiceError(envelope.message));
        }

        envelope
            .data
            .ok_or_else(|| AppError::ExternalServiceError("Gateway returned no data".to_string()))
    }
}

/// Naira to kobo, rounded to the nearest subunit.
pub fn to_subunits(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn naira_converts_to_kobo() {
        assert_eq!(to_subunits(5000.0), 500_000);
        assert_eq!(to_subunits(99.99), 9_999);
    }

    #[test]
    fn fractional_kobo_rounds() {
        assert_eq!(to_subunits(10.005), 1_001);
    }
}
