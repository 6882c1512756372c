//! Admin-only endpoints: account invitations, the platform overview and
//! the course moderation queue.

use actix_web::{HttpResponse, get, post, put, web};
use validator::Validate;

use crate::domain::dto::accounts::request::{ModerateCourseRequest, RegisterAccountRequest};
use crate::domain::dto::courses::request::PageQuery;
use crate::domain::models::auth::authenticated_user::AuthenticatedUser;
use crate::domain::models::response::api_response::ApiResponse;
use crate::errors::errors::AppError;
use crate::services::accounts::account_service::AccountService;
use crate::services::analytics::admin_analytics_service::AdminAnalyticsService;
use crate::services::courses::course_service::CourseService;

/// Invites a tutor or staff member. The invitee receives a mail with a
/// link to set their password.
#[post("/accounts")]
pub async fn register_account(
    payload: web::Json<RegisterAccountRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let account = AccountService::instance()
        .register(payload.into_inner())
        .await?;
    Ok(ApiResponse::created("Invitation sent", account))
}

#[get("/overview")]
pub async fn overview() -> Result<HttpResponse, AppError> {
    let overview = AdminAnalyticsService::instance().overview().await?;
    Ok(ApiResponse::success("Overview retrieved", overview))
}

/// Courses submitted for review, oldest first.
#[get("/courses")]
pub async fn moderation_queue(query: web::Query<PageQuery>) -> Result<HttpResponse, AppError> {
    let (skip, limit) = query.pagination();
    let queue = CourseService::instance()
        .moderation_queue(skip, limit)
        .await?;
    Ok(ApiResponse::success("Moderation queue retrieved", queue))
}

#[put("/courses/{course_id}")]
pub async fn moderate_course(
    user: AuthenticatedUser,
    course_id: web::Path<String>,
    payload: web::Json<ModerateCourseRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let course = CourseService::instance()
        .moderate(&user.user_id, &course_id, payload.into_inner())
        .await?;
    Ok(ApiResponse::success("Moderation decision recorded", course))
}
