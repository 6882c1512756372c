//! Student account lifecycle and learner dashboard endpoints.
//!
//! The public routes cover signup through password reset; everything under
//! the authenticated scope reads the caller's id from the verified token
//! rather than from the path, so a student can only ever touch their own
//! records.

use actix_web::{HttpResponse, delete, get, post, put, web};
use validator::Validate;

use crate::domain::dto::students::request::{
    ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, RecommendationQuery,
    ResendVerificationRequest, ResetPasswordRequest, SignupRequest, UpdatePrivacyRequest,
    UpdateStudentProfileRequest, VerifyEmailRequest, VerifyResetPinRequest,
};
use crate::domain::models::auth::authenticated_user::AuthenticatedUser;
use crate::domain::models::response::api_response::ApiResponse;
use crate::errors::errors::AppError;
use crate::services::students::dashboard_service::DashboardService;
use crate::services::students::student_service::StudentService;

#[post("/signup")]
pub async fn signup(payload: web::Json<SignupRequest>) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let student = StudentService::instance()
        .signup(payload.into_inner())
        .await?;
    Ok(ApiResponse::created(
        "Account created. Check your email to verify your address",
        student,
    ))
}

/// Target of the link in the verification mail.
#[get("/verified-email")]
pub async fn verify_email(query: web::Query<VerifyEmailRequest>) -> Result<HttpResponse, AppError> {
    query
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let student = StudentService::instance().verify_email(&query.token).await?;
    Ok(ApiResponse::success("Email verified successfully", student))
}

#[post("/resend-verification")]
pub async fn resend_verification(
    payload: web::Json<ResendVerificationRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    StudentService::instance()
        .resend_verification(&payload.email)
        .await?;
    Ok(ApiResponse::success(
        "Verification email sent",
        serde_json::Value::Null,
    ))
}

#[post("/login")]
pub async fn login(payload: web::Json<LoginRequest>) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let session = StudentService::instance()
        .login(payload.into_inner())
        .await?;
    Ok(ApiResponse::success("Login successful", session))
}

#[post("/forgot-password")]
pub async fn forgot_password(
    payload: web::Json<ForgotPasswordRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    StudentService::instance()
        .forgot_password(payload.into_inner())
        .await?;
    Ok(ApiResponse::success(
        "A reset PIN has been sent to your email",
        serde_json::Value::Null,
    ))
}

#[post("/verify-pin")]
pub async fn verify_pin(
    payload: web::Json<VerifyResetPinRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    StudentService::instance()
        .verify_reset_pin(payload.into_inner())
        .await?;
    Ok(ApiResponse::success("PIN verified", serde_json::Value::Null))
}

#[post("/reset-password")]
pub async fn reset_password(
    payload: web::Json<ResetPasswordRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    StudentService::instance()
        .reset_password(payload.into_inner())
        .await?;
    Ok(ApiResponse::success(
        "Password reset successfully",
        serde_json::Value::Null,
    ))
}

#[get("/profile")]
pub async fn get_profile(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let student = StudentService::instance().get_profile(&user.user_id).await?;
    Ok(ApiResponse::success("Profile retrieved", student))
}

#[put("/update-user")]
pub async fn update_profile(
    user: AuthenticatedUser,
    payload: web::Json<UpdateStudentProfileRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let student = StudentService::instance()
        .update_profile(&user.user_id, payload.into_inner())
        .await?;
    Ok(ApiResponse::success("Profile updated", student))
}

#[put("/update-password")]
pub async fn update_password(
    user: AuthenticatedUser,
    payload: web::Json<ChangePasswordRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    StudentService::instance()
        .change_password(&user.user_id, payload.into_inner())
        .await?;
    Ok(ApiResponse::success(
        "Password changed successfully",
        serde_json::Value::Null,
    ))
}

#[put("/privacy")]
pub async fn update_privacy(
    user: AuthenticatedUser,
    payload: web::Json<UpdatePrivacyRequest>,
) -> Result<HttpResponse, AppError> {
    let student = StudentService::instance()
        .update_privacy(&user.user_id, payload.into_inner())
        .await?;
    Ok(ApiResponse::success("Privacy settings updated", student))
}

/// Soft-deletes the account and everything the student produced.
#[delete("/delete-account")]
pub async fn delete_account(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    StudentService::instance().deactivate(&user.user_id).await?;
    Ok(ApiResponse::success(
        "Account deleted",
        serde_json::Value::Null,
    ))
}

#[get("/dashboard")]
pub async fn dashboard(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let courses = DashboardService::instance().dashboard(&user.user_id).await?;
    Ok(ApiResponse::success("Dashboard retrieved", courses))
}

#[get("/dashboard/{course_id}")]
pub async fn dashboard_course(
    user: AuthenticatedUser,
    course_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let card = DashboardService::instance()
        .dashboard_course(&user.user_id, &course_id)
        .await?;
    Ok(ApiResponse::success("Course progress retrieved", card))
}

#[get("/overview")]
pub async fn overview(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let stats = DashboardService::instance().overview(&user.user_id).await?;
    Ok(ApiResponse::success("Overview retrieved", stats))
}

#[get("/recommendations")]
pub async fn recommendations(
    user: AuthenticatedUser,
    query: web::Query<RecommendationQuery>,
) -> Result<HttpResponse, AppError> {
    let page = DashboardService::instance()
        .recommendations(&user.user_id, &query)
        .await?;
    Ok(ApiResponse::success("Recommendations retrieved", page))
}
