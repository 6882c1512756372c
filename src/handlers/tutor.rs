//! Tutor analytics endpoints: the dashboard, course aggregates, sales
//! history, the student roster and conversion rates.

use actix_web::{HttpResponse, get, web};

use crate::domain::dto::analytics::request::PeriodQuery;
use crate::domain::models::auth::authenticated_user::AuthenticatedUser;
use crate::domain::models::response::api_response::ApiResponse;
use crate::errors::errors::AppError;
use crate::services::analytics::tutor_analytics_service::TutorAnalyticsService;

#[get("/dashboard")]
pub async fn dashboard(
    user: AuthenticatedUser,
    query: web::Query<PeriodQuery>,
) -> Result<HttpResponse, AppError> {
    let period = query.period()?;
    let dashboard = TutorAnalyticsService::instance()
        .dashboard(&user.user_id, period)
        .await?;
    Ok(ApiResponse::success("Dashboard retrieved", dashboard))
}

#[get("/my-courses")]
pub async fn my_courses(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let courses = TutorAnalyticsService::instance()
        .my_courses(&user.user_id)
        .await?;
    Ok(ApiResponse::success("Course analytics retrieved", courses))
}

#[get("/transactions")]
pub async fn transactions(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let transactions = TutorAnalyticsService::instance()
        .transactions(&user.user_id)
        .await?;
    Ok(ApiResponse::success("Transactions retrieved", transactions))
}

#[get("/students")]
pub async fn students(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let roster = TutorAnalyticsService::instance()
        .students(&user.user_id)
        .await?;
    Ok(ApiResponse::success("Students retrieved", roster))
}

/// Views against purchases per course.
#[get("/analytics")]
pub async fn conversions(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let conversions = TutorAnalyticsService::instance()
        .conversions(&user.user_id)
        .await?;
    Ok(ApiResponse::success("Conversion rates retrieved", conversions))
}
