//! Enrollment record linking a student, a course and the payment that
//! produced it, carrying embedded watch progress.

use mongodb::bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// Per-video progress entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoProgress {
    pub lecture_id: ObjectId,
    pub video_id: ObjectId,
    /// Last reported playhead position in seconds.
    pub timestamp: f64,
    pub completed: bool,
    pub updated_at: DateTime,
}

/// Per-lecture percentage entry, clamped to 0..=100.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LectureProgress {
    pub lecture_id: ObjectId,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchasedCourse {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub student_id: ObjectId,
    pub course_id: ObjectId,
    pub payment_id: ObjectId,
    /// 0 while in progress, 1 once every video is complete.
    pub is_completed: u8,
    pub minutes_spent: f64,
    pub is_active: bool,
    #[serde(default)]
    pub progress: Vec<VideoProgress>,
    #[serde(default)]
    pub lecture_progress: Vec<LectureProgress>,
    pub purchased_at: DateTime,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl PurchasedCourse {
    pub fn new(student_id: ObjectId, course_id: ObjectId, payment_id: ObjectId) -> Self {
        let now = DateTime::now();

        Self {
            id: None,
            student_id,
            course_id,
            payment_id,
            is_completed: 0,
            minutes_spent: 0.0,
            is_active: true,
            progress: Vec::new(),
            lecture_progress: Vec::new(),
            purchased_at: now,
            created_at: now,
            updated_at: now,
        }
    }

    /// Number of videos marked complete.
    pub fn completed_video_count(&self) -> usize {
        self.progress.iter().filter(|p| p.completed).count()
    }

    /// Overall percentage given the course's total video count. Recomputed
    /// from the full array on every call.
    pub fn overall_percentage(&self, total_videos: usize) -> f64 {
        if total_videos == 0 {
            return 0.0;
        }
        (self.completed_video_count() as f64 / total_videos as f64) * 100.0
    }
}

/// A video counts as watched once the playhead reaches its duration.
pub fn video_completed(timestamp: f64, duration: f64) -> bool {
    duration > 0.0 && timestamp >= duration
}

/// Lecture percentage as reported by the player, clamped into range.
pub fn clamp_percentage(percentage: f64) -> f64 {
    percentage.clamp(0.0, 100.0)
}

/// Minutes of watch time a progress report adds on top of the previous
/// playhead. A rewind adds nothing; a first report counts from zero.
pub fn watch_minutes_delta(previous_timestamp: Option<f64>, reported: f64) -> f64 {
    let previous = previous_timestamp.unwrap_or(0.0);
    ((reported - previous).max(0.0)) / 60.0
}

/// The course is complete when every one of its videos has a completed
/// progress entry.
pub fn course_completed(completed_video_ids: &[ObjectId], all_video_ids: &[ObjectId]) -> bool {
    !all_video_ids.is_empty()
        && all_video_ids
            .iter()
            .all(|id| completed_video_ids.contains(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_completes_at_duration_threshold() {
        assert!(!video_completed(119.9, 120.0));
        assert!(video_completed(120.0, 120.0));
        assert!(video_completed(125.0, 120.0));
        assert!(!video_completed(10.0, 0.0));
    }

    #[test]
    fn percentage_is_clamped() {
        assert_eq!(clamp_percentage(104.2), 100.0);
        assert_eq!(clamp_percentage(-3.0), 0.0);
        assert_eq!(clamp_percentage(42.5), 42.5);
    }

    #[test]
    fn watch_minutes_accumulate_forward_only() {
        assert_eq!(watch_minutes_delta(None, 120.0), 2.0);
        assert_eq!(watch_minutes_delta(Some(60.0), 180.0), 2.0);
        // Rewinding the playhead never subtracts time already spent.
        assert_eq!(watch_minutes_delta(Some(300.0), 60.0), 0.0);
    }

    #[test]
    fn course_complete_only_when_all_videos_watched() {
        let a = ObjectId::new();
        let b = ObjectId::new();

        assert!(!course_completed(&[a], &[a, b]));
        assert!(course_completed(&[a, b], &[a, b]));
        assert!(course_completed(&[b, a], &[a, b]));
        assert!(!course_completed(&[], &[]));
    }

    #[test]
    fn overall_percentage_counts_completed_entries() {
        let mut pc = PurchasedCourse::new(ObjectId::new(), ObjectId::new(), ObjectId::new());
        let now = DateTime::now();
        for completed in [true, false, true, false] {
            pc.progress.push(VideoProgress {
                lecture_id: ObjectId::new(),
                video_id: ObjectId::new(),
                timestamp: 0.0,
                completed,
                updated_at: now,
            });
        }
        assert_eq!(pc.overall_percentage(4), 50.0);
        assert_eq!(pc.overall_percentage(0), 0.0);
    }
}
