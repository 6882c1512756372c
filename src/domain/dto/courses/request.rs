//! Course catalogue request DTOs.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::courses::course::BasicInformation;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCourseRequest {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: f64,

    #[serde(default)]
    pub what_you_will_learn: Vec<String>,

    #[serde(default)]
    pub basic_information: BasicInformation,
}

/// Partial course edit. Editing a course sends it back through review.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateCourseRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(min = 1))]
    pub description: Option<String>,

    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: Option<f64>,

    pub what_you_will_learn: Option<Vec<String>>,
    pub basic_information: Option<BasicInformation>,
    pub is_published: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddLectureRequest {
    #[validate(length(min = 1, max = 200, message = "Lecture title is required"))]
    pub title: String,

    pub description: Option<String>,

    #[validate(range(min = 1, message = "Lecture number starts at 1"))]
    pub lecture_number: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RateCourseRequest {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: u8,

    #[validate(length(max = 2000))]
    pub review: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CommentRequest {
    #[validate(length(min = 1, max = 2000, message = "Comment text is required"))]
    pub text: String,
}

/// Attaches an already uploaded video to a lecture.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddVideoRequest {
    #[validate(url(message = "A valid video URL is required"))]
    pub url: String,

    #[validate(length(min = 1, message = "File name is required"))]
    pub file_name: String,

    #[validate(range(min = 0.0, message = "Duration cannot be negative"))]
    pub duration: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct WhatYouWillLearnRequest {
    #[validate(length(min = 1, message = "At least one item is required"))]
    pub items: Vec<String>,
}

/// Bare page/limit query used by comment and message listings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub limit: Option<i64>,
}

impl PageQuery {
    pub fn pagination(&self) -> (u64, i64) {
        let limit = self.limit.unwrap_or(20).clamp(1, 100);
        let page = self.page.unwrap_or(1).max(1);
        ((page - 1) * limit as u64, limit)
    }
}

/// Query-string filters for the public catalogue listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CourseListQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub level: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<i64>,
}

impl CourseListQuery {
    /// Pages are 1-based; limit defaults to 20 and is capped at 100.
    pub fn pagination(&self) -> (u64, i64) {
        let limit = self.limit.unwrap_or(20).clamp(1, 100);
        let page = self.page.unwrap_or(1).max(1);
        let skip = (page - 1) * limit as u64;
        (skip, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_outside_range_fails_validation() {
        let req = RateCourseRequest {
            rating: 6,
            review: None,
        };
        assert!(req.validate().is_err());

        let req = RateCourseRequest {
            rating: 5,
            review: Some("Great pacing".into()),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn pagination_defaults_and_caps() {
        let query = CourseListQuery::default();
        assert_eq!(query.pagination(), (0, 20));

        let query = CourseListQuery {
            page: Some(3),
            limit: Some(500),
            ..Default::default()
        };
        assert_eq!(query.pagination(), (200, 100));
    }
}
