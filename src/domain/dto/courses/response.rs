use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};

use crate::domain::entities::courses::comment::Comment;
use crate::domain::entities::courses::course::{
    BasicInformation, Course, CourseStatus, Lecture,
};
use crate::domain::entities::courses::review::Review;

/// Full course payload returned from detail endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseResponse {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub price: f64,
    pub basic_information: BasicInformation,
    pub what_you_will_learn: Vec<String>,
    pub lectures: Vec<Lecture>,
    pub tutor_id: String,
    pub tutor_name: String,
    pub rating: f64,
    pub review_count: u64,
    pub views: u64,
    pub purchase_count: u64,
    pub is_published: bool,
    pub status: CourseStatus,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl From<Course> for CourseResponse {
    fn from(course: Course) -> Self {
        Self {
            id: course.id.map(|id| id.to_hex()).unwrap_or_default(),
            title: course.title,
            description: course.description,
            thumbnail_url: course.thumbnail_url,
            price: course.price,
            basic_information: course.basic_information,
            what_you_will_learn: course.what_you_will_learn,
            lectures: course.lectures,
            tutor_id: course.tutor_id.to_hex(),
            tutor_name: course.tutor_name,
            rating: course.rating,
            review_count: course.review_count,
            views: course.views,
            purchase_count: course.purchase_count,
            is_published: course.is_published,
            status: course.status,
            rejection_reason: course.rejection_reason,
            created_at: course.created_at,
            updated_at: course.updated_at,
        }
    }
}

/// Slim card used in catalogue listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseSummary {
    pub id: String,
    pub title: String,
    pub thumbnail_url: Option<String>,
    pub price: f64,
    pub tutor_name: String,
    pub rating: f64,
    pub review_count: u64,
    pub total_videos: usize,
    pub basic_information: BasicInformation,
}

impl From<Course> for CourseSummary {
    fn from(course: Course) -> Self {
        let total_videos = course.total_videos();
        Self {
            id: course.id.map(|id| id.to_hex()).unwrap_or_default(),
            title: course.title,
            thumbnail_url: course.thumbnail_url,
            price: course.price,
            tutor_name: course.tutor_name,
            rating: course.rating,
            review_count: course.review_count,
            total_videos,
            basic_information: course.basic_information,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewResponse {
    pub id: String,
    pub course_id: String,
    pub student_id: String,
    pub rating: u8,
    pub review: Option<String>,
    pub created_at: DateTime,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        Self {
            id: review.id.map(|id| id.to_hex()).unwrap_or_default(),
            course_id: review.course_id.to_hex(),
            student_id: review.student_id.to_hex(),
            rating: review.rating,
            review: review.review,
            created_at: review.created_at,
        }
    }
}

/// Review joined with the reviewer's display name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewWithReviewer {
    pub id: String,
    pub rating: u8,
    pub review: Option<String>,
    pub student_name: String,
    pub created_at: DateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseReviewsResponse {
    pub average: f64,
    pub total: u64,
    pub reviews: Vec<ReviewWithReviewer>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: String,
    pub course_id: String,
    pub student_id: String,
    pub text: String,
    pub created_at: DateTime,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id.map(|id| id.to_hex()).unwrap_or_default(),
            course_id: comment.course_id.to_hex(),
            student_id: comment.student_id.to_hex(),
            text: comment.text,
            created_at: comment.created_at,
        }
    }
}

/// Paged listing wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagedResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: i64,
}
