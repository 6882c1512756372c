//! Back-office account endpoints and the public tutor directory.
//!
//! Accounts are created by invitation: an admin registers the email and
//! role, the invitee follows the mailed link to `set-password` and can then
//! log in. Tutor listing and detail are public so the storefront can show
//! instructor pages.

use actix_web::{HttpResponse, delete, get, post, put, web};
use validator::Validate;

use crate::domain::dto::accounts::request::{
    AccountLoginRequest, SetPasswordRequest, UpdateAccountRequest,
};
use crate::domain::dto::courses::request::PageQuery;
use crate::domain::dto::students::request::ChangePasswordRequest;
use crate::domain::entities::accounts::account::Role;
use crate::domain::models::auth::authenticated_user::AuthenticatedUser;
use crate::domain::models::response::api_response::ApiResponse;
use crate::errors::errors::AppError;
use crate::services::accounts::account_service::AccountService;

#[post("/set-password")]
pub async fn set_password(payload: web::Json<SetPasswordRequest>) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    AccountService::instance()
        .set_password(payload.into_inner())
        .await?;
    Ok(ApiResponse::success(
        "Password set. You can now log in",
        serde_json::Value::Null,
    ))
}

#[post("/login")]
pub async fn login(payload: web::Json<AccountLoginRequest>) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let session = AccountService::instance()
        .login(payload.into_inner())
        .await?;
    Ok(ApiResponse::success("Login successful", session))
}

#[get("")]
pub async fn list_tutors(query: web::Query<PageQuery>) -> Result<HttpResponse, AppError> {
    let (skip, limit) = query.pagination();
    let tutors = AccountService::instance()
        .list_by_role(Role::Tutor, skip, limit)
        .await?;
    Ok(ApiResponse::success("Tutors retrieved", tutors))
}

#[get("/{tutor_id}")]
pub async fn tutor_detail(tutor_id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let tutor = AccountService::instance().get(&tutor_id).await?;
    if tutor.role != Role::Tutor {
        return Err(AppError::NotFound("Tutor not found".to_string()));
    }
    Ok(ApiResponse::success("Tutor retrieved", tutor))
}

#[get("/profile")]
pub async fn get_profile(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let account = AccountService::instance().get(&user.user_id).await?;
    Ok(ApiResponse::success("Profile retrieved", account))
}

#[put("/profile")]
pub async fn update_profile(
    user: AuthenticatedUser,
    payload: web::Json<UpdateAccountRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let account = AccountService::instance()
        .update_profile(&user.user_id, payload.into_inner())
        .await?;
    Ok(ApiResponse::success("Profile updated", account))
}

#[put("/change-password")]
pub async fn change_password(
    user: AuthenticatedUser,
    payload: web::Json<ChangePasswordRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    AccountService::instance()
        .change_password(&user.user_id, payload.into_inner())
        .await?;
    Ok(ApiResponse::success(
        "Password changed successfully",
        serde_json::Value::Null,
    ))
}

#[delete("/delete-account")]
pub async fn delete_account(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    AccountService::instance().deactivate(&user.user_id).await?;
    Ok(ApiResponse::success(
        "Account deleted",
        serde_json::Value::Null,
    ))
}
