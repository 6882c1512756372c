//! Learning progress reporting endpoints.

use actix_web::{HttpResponse, get, post, web};
use validator::Validate;

use crate::domain::dto::commerce::request::{LectureProgressRequest, VideoProgressRequest};
use crate::domain::models::auth::authenticated_user::AuthenticatedUser;
use crate::domain::models::response::api_response::ApiResponse;
use crate::errors::errors::AppError;
use crate::services::commerce::progress_service::ProgressService;

/// Reported periodically while a video plays.
#[post("/video")]
pub async fn report_video(
    user: AuthenticatedUser,
    payload: web::Json<VideoProgressRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let enrollment = ProgressService::instance()
        .report_video(&user.user_id, payload.into_inner())
        .await?;
    Ok(ApiResponse::success("Progress recorded", enrollment))
}

#[post("/lecture")]
pub async fn report_lecture(
    user: AuthenticatedUser,
    payload: web::Json<LectureProgressRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let enrollment = ProgressService::instance()
        .report_lecture(&user.user_id, payload.into_inner())
        .await?;
    Ok(ApiResponse::success("Progress recorded", enrollment))
}

#[get("/{course_id}")]
pub async fn get_progress(
    user: AuthenticatedUser,
    course_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let enrollment = ProgressService::instance()
        .get(&user.user_id, &course_id)
        .await?;
    Ok(ApiResponse::success("Progress retrieved", enrollment))
}
