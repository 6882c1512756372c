//! Cart, checkout and progress request DTOs.

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddToCartRequest {
    #[validate(length(min = 1, message = "Course id is required"))]
    pub course_id: String,
}

/// Removes (or decrements) cart rows for the listed courses.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RemoveFromCartRequest {
    #[validate(length(min = 1, message = "At least one course id is required"))]
    pub course_ids: Vec<String>,
}

/// Starts a Paystack transaction for every pending cart row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    /// Optional override; defaults to the student's account email.
    pub email: Option<String>,
}

/// Reported while a video plays. `timestamp` and `duration` are seconds.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VideoProgressRequest {
    #[validate(length(min = 1, message = "Course id is required"))]
    pub course_id: String,

    #[validate(length(min = 1, message = "Lecture id is required"))]
    pub lecture_id: String,

    #[validate(length(min = 1, message = "Video id is required"))]
    pub video_id: String,

    #[validate(range(min = 0.0, message = "Timestamp cannot be negative"))]
    pub timestamp: f64,

    #[validate(range(min = 0.0, message = "Duration cannot be negative"))]
    pub duration: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LectureProgressRequest {
    #[validate(length(min = 1, message = "Course id is required"))]
    pub course_id: String,

    #[validate(length(min = 1, message = "Lecture id is required"))]
    pub lecture_id: String,

    /// Clamped server-side to 0..=100.
    pub percentage: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_progress_rejects_negative_timestamp() {
        let req = VideoProgressRequest {
            course_id: "c".into(),
            lecture_id: "l".into(),
            video_id: "v".into(),
            timestamp: -1.0,
            duration: 60.0,
        };
        assert!(req.validate().is_err());
    }
}
