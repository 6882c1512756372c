//! Course entity with embedded lectures and moderation state.

use mongodb::bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// Moderation state set by admins after a tutor submits a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseStatus {
    Pending,
    Approved,
    Rejected,
}

/// A single uploaded video inside a lecture. `duration` is in seconds and
/// drives progress completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoFile {
    /// Stable id used by progress entries to reference this video.
    pub video_id: ObjectId,
    pub url: String,
    pub file_name: String,
    pub duration: f64,
}

/// Embedded lecture: ordering is by `lecture_number`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lecture {
    pub lecture_id: ObjectId,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub lecture_number: u32,
    #[serde(default)]
    pub videos: Vec<VideoFile>,
}

/// Language, level and category shown on the course card.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BasicInformation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub basic_information: BasicInformation,
    #[serde(default)]
    pub what_you_will_learn: Vec<String>,
    #[serde(default)]
    pub lectures: Vec<Lecture>,
    pub tutor_id: ObjectId,
    /// Denormalized for listing and search without a join.
    pub tutor_name: String,
    pub tutor_email: String,
    pub rating: f64,
    pub review_count: u64,
    pub views: u64,
    pub purchase_count: u64,
    pub is_published: bool,
    pub status: CourseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<ObjectId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Course {
    pub fn new(
        title: String,
        price: f64,
        tutor_id: ObjectId,
        tutor_name: String,
        tutor_email: String,
    ) -> Self {
        let now = DateTime::now();

        Self {
            id: None,
            title,
            description: None,
            thumbnail_url: None,
            price,
            basic_information: BasicInformation::default(),
            what_you_will_learn: Vec::new(),
            lectures: Vec::new(),
            tutor_id,
            tutor_name,
            tutor_email,
            rating: 0.0,
            review_count: 0,
            views: 0,
            purchase_count: 0,
            is_published: false,
            status: CourseStatus::Pending,
            rejection_reason: None,
            reviewed_by: None,
            reviewed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_hex())
    }

    /// Total number of videos across all lectures.
    pub fn total_videos(&self) -> usize {
        self.lectures.iter().map(|l| l.videos.len()).sum()
    }

    /// A course may only go live with a title, a description and content.
    pub fn is_publishable(&self) -> bool {
        !self.title.trim().is_empty() && self.description.is_some() && !self.lectures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course() -> Course {
        Course::new(
            "Rust for Beginners".to_string(),
            5000.0,
            ObjectId::new(),
            "Ada Obi".to_string(),
            "ada@example.com".to_string(),
        )
    }

    #[test]
    fn new_course_is_unpublished_and_pending() {
        let c = course();
        assert!(!c.is_published);
        assert_eq!(c.status, CourseStatus::Pending);
        assert_eq!(c.total_videos(), 0);
    }

    #[test]
    fn publishability_requires_description_and_lectures() {
        let mut c = course();
        assert!(!c.is_publishable());

        c.description = Some("Learn Rust".to_string());
        assert!(!c.is_publishable());

        c.lectures.push(Lecture {
            lecture_id: ObjectId::new(),
            title: "Intro".to_string(),
            description: None,
            lecture_number: 1,
            videos: vec![],
        });
        assert!(c.is_publishable());
    }

    #[test]
    fn total_videos_sums_across_lectures() {
        let mut c = course();
        for n in 1..=2 {
            c.lectures.push(Lecture {
                lecture_id: ObjectId::new(),
                title: format!("Lecture {}", n),
                description: None,
                lecture_number: n,
                videos: vec![
                    VideoFile {
                        video_id: ObjectId::new(),
                        url: "https://cdn/v.mp4".to_string(),
                        file_name: "v.mp4".to_string(),
                        duration: 120.0,
                    };
                    n as usize
                ],
            });
        }
        assert_eq!(c.total_videos(), 3);
    }
}
