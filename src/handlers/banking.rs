//! Tutor payout endpoints: saved bank accounts, earnings and withdrawals,
//! plus the Paystack bank directory used when adding an account.

use actix_web::{HttpResponse, delete, get, post, web};
use serde_json::json;
use validator::Validate;

use crate::domain::dto::banking::request::{AddBankAccountRequest, WithdrawalRequest};
use crate::domain::models::auth::authenticated_user::AuthenticatedUser;
use crate::domain::models::response::api_response::ApiResponse;
use crate::errors::errors::AppError;
use crate::services::payments::payout_service::PayoutService;

#[post("/bank-accounts")]
pub async fn add_bank_account(
    user: AuthenticatedUser,
    payload: web::Json<AddBankAccountRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let account = PayoutService::instance()
        .add_bank_account(&user.user_id, payload.into_inner())
        .await?;
    Ok(ApiResponse::created("Bank account added", account))
}

#[get("/bank-accounts")]
pub async fn list_bank_accounts(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let accounts = PayoutService::instance()
        .list_bank_accounts(&user.user_id)
        .await?;
    Ok(ApiResponse::success("Bank accounts retrieved", accounts))
}

#[delete("/bank-accounts/{account_id}")]
pub async fn remove_bank_account(
    user: AuthenticatedUser,
    account_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    PayoutService::instance()
        .remove_bank_account(&user.user_id, &account_id)
        .await?;
    Ok(ApiResponse::success(
        "Bank account removed",
        serde_json::Value::Null,
    ))
}

/// Supported banks, trimmed to what the add-account form needs.
#[get("/banks")]
pub async fn list_banks() -> Result<HttpResponse, AppError> {
    let banks: Vec<_> = PayoutService::instance()
        .list_banks()
        .await?
        .into_iter()
        .map(|bank| json!({ "name": bank.name, "code": bank.code }))
        .collect();
    Ok(ApiResponse::success("Banks retrieved", banks))
}

#[get("/earnings")]
pub async fn earnings(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let earnings = PayoutService::instance().earnings(&user.user_id).await?;
    Ok(ApiResponse::success("Earnings retrieved", earnings))
}

#[post("/withdrawals")]
pub async fn withdraw(
    user: AuthenticatedUser,
    payload: web::Json<WithdrawalRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let withdrawal = PayoutService::instance()
        .withdraw(&user.user_id, payload.into_inner())
        .await?;
    Ok(ApiResponse::created("Withdrawal initiated", withdrawal))
}

#[get("/withdrawals")]
pub async fn list_withdrawals(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let withdrawals = PayoutService::instance()
        .list_withdrawals(&user.user_id)
        .await?;
    Ok(ApiResponse::success("Withdrawals retrieved", withdrawals))
}
