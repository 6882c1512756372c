//! Course catalogue endpoints.
//!
//! The public half serves the storefront: listing, search, detail, reviews
//! and comments. The authoring half (create, edit, lectures, videos,
//! publish) is mounted under the tutor scope, and the student interactions
//! (rate, comment) under the learner scope.

use actix_web::{HttpResponse, delete, get, post, put, web};
use validator::Validate;

use crate::domain::dto::courses::request::{
    AddLectureRequest, AddVideoRequest, CommentRequest, CourseListQuery, CreateCourseRequest,
    PageQuery, RateCourseRequest, UpdateCourseRequest, WhatYouWillLearnRequest,
};
use crate::domain::models::auth::authenticated_user::AuthenticatedUser;
use crate::domain::models::response::api_response::ApiResponse;
use crate::errors::errors::AppError;
use crate::services::courses::course_service::CourseService;

// -- public catalogue --

#[get("")]
pub async fn list_courses(query: web::Query<CourseListQuery>) -> Result<HttpResponse, AppError> {
    let page = CourseService::instance()
        .list_published(query.into_inner())
        .await?;
    Ok(ApiResponse::success("Courses retrieved", page))
}

#[get("/search")]
pub async fn search_courses(query: web::Query<CourseListQuery>) -> Result<HttpResponse, AppError> {
    let page = CourseService::instance().search(query.into_inner()).await?;
    Ok(ApiResponse::success("Search results retrieved", page))
}

#[get("/{course_id}")]
pub async fn course_detail(course_id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let course = CourseService::instance().get_detail(&course_id).await?;
    Ok(ApiResponse::success("Course retrieved", course))
}

/// Counts one storefront view. Kept separate from the detail fetch so
/// prefetches and refreshes do not inflate conversion numbers.
#[post("/{course_id}/view")]
pub async fn record_view(course_id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let views = CourseService::instance().record_view(&course_id).await?;
    Ok(ApiResponse::success(
        "View recorded",
        serde_json::json!({ "views": views }),
    ))
}

#[get("/{course_id}/reviews")]
pub async fn list_reviews(course_id: web::Path<String>) -> Result<HttpResponse, AppError> {
    let reviews = CourseService::instance().list_reviews(&course_id).await?;
    Ok(ApiResponse::success("Reviews retrieved", reviews))
}

#[get("/{course_id}/comments")]
pub async fn list_comments(
    course_id: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    let (skip, limit) = query.pagination();
    let comments = CourseService::instance()
        .list_comments(&course_id, skip, limit)
        .await?;
    Ok(ApiResponse::success("Comments retrieved", comments))
}

// -- authoring (tutor scope) --

#[post("/courses")]
pub async fn create_course(
    user: AuthenticatedUser,
    payload: web::Json<CreateCourseRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let course = CourseService::instance()
        .create(&user.user_id, payload.into_inner())
        .await?;
    Ok(ApiResponse::created(
        "Course created and submitted for review",
        course,
    ))
}

#[get("/courses")]
pub async fn my_course_list(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let courses = CourseService::instance().list_by_tutor(&user.user_id).await?;
    Ok(ApiResponse::success("Courses retrieved", courses))
}

#[put("/courses/{course_id}")]
pub async fn update_course(
    user: AuthenticatedUser,
    course_id: web::Path<String>,
    payload: web::Json<UpdateCourseRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let course = CourseService::instance()
        .update(&user.user_id, &course_id, payload.into_inner())
        .await?;
    Ok(ApiResponse::success("Course updated", course))
}

#[put("/courses/{course_id}/publish")]
pub async fn publish_course(
    user: AuthenticatedUser,
    course_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let course = CourseService::instance()
        .publish(&user.user_id, &course_id)
        .await?;
    Ok(ApiResponse::success("Course published", course))
}

#[put("/courses/{course_id}/what-you-will-learn")]
pub async fn update_what_you_will_learn(
    user: AuthenticatedUser,
    course_id: web::Path<String>,
    payload: web::Json<WhatYouWillLearnRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let course = CourseService::instance()
        .update_what_you_will_learn(&user.user_id, &course_id, payload.into_inner().items)
        .await?;
    Ok(ApiResponse::success("Learning outcomes updated", course))
}

#[post("/courses/{course_id}/lectures")]
pub async fn add_lecture(
    user: AuthenticatedUser,
    course_id: web::Path<String>,
    payload: web::Json<AddLectureRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let course = CourseService::instance()
        .add_lecture(&user.user_id, &course_id, payload.into_inner())
        .await?;
    Ok(ApiResponse::created("Lecture added", course))
}

#[post("/courses/{course_id}/lectures/{lecture_id}/videos")]
pub async fn add_video(
    user: AuthenticatedUser,
    path: web::Path<(String, String)>,
    payload: web::Json<AddVideoRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let (course_id, lecture_id) = path.into_inner();
    let request = payload.into_inner();
    let course = CourseService::instance()
        .add_video(
            &user.user_id,
            &course_id,
            &lecture_id,
            request.url,
            request.file_name,
            request.duration,
        )
        .await?;
    Ok(ApiResponse::created("Video added", course))
}

#[delete("/courses/{course_id}")]
pub async fn delete_course(
    user: AuthenticatedUser,
    course_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    CourseService::instance()
        .delete(&user.user_id, &course_id)
        .await?;
    Ok(ApiResponse::success(
        "Course deleted",
        serde_json::Value::Null,
    ))
}

// -- learner interactions (student scope) --

#[post("/courses/{course_id}/rate")]
pub async fn rate_course(
    user: AuthenticatedUser,
    course_id: web::Path<String>,
    payload: web::Json<RateCourseRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    CourseService::instance()
        .rate(&user.user_id, &course_id, payload.into_inner())
        .await?;
    Ok(ApiResponse::success(
        "Thank you for your feedback",
        serde_json::Value::Null,
    ))
}

#[post("/courses/{course_id}/comments")]
pub async fn add_comment(
    user: AuthenticatedUser,
    course_id: web::Path<String>,
    payload: web::Json<CommentRequest>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let comment = CourseService::instance()
        .comment(&user.user_id, &course_id, payload.into_inner())
        .await?;
    Ok(ApiResponse::created("Comment added", comment))
}

#[delete("/comments/{comment_id}")]
pub async fn delete_comment(
    user: AuthenticatedUser,
    comment_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    CourseService::instance()
        .delete_comment(&user.user_id, &comment_id)
        .await?;
    Ok(ApiResponse::success(
        "Comment deleted",
        serde_json::Value::Null,
    ))
}
