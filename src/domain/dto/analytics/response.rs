//! Tutor and admin dashboard payloads.

use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};

use crate::domain::dto::courses::response::{CourseSummary, ReviewResponse};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuickStats {
    pub enrollments: u64,
    pub students: u64,
    pub certificates: u64,
    pub revenue: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseStat {
    pub course_id: String,
    pub title: String,
    pub enrollments: u64,
    pub revenue: f64,
    pub rating: f64,
    pub review_count: u64,
}

/// Retention, completion and feedback rates in percent, plus the
/// weighted performance score derived from them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceChart {
    pub retention_rate: f64,
    pub completion_rate: f64,
    pub feedback_rate: f64,
    pub performance_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TutorDashboardResponse {
    pub quick_stats: QuickStats,
    pub courses: Vec<CourseStat>,
    pub most_rated_course: Option<CourseSummary>,
    pub recent_reviews: Vec<ReviewResponse>,
    pub performance: PerformanceChart,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseAggregate {
    pub course_id: String,
    pub title: String,
    pub is_published: bool,
    pub enrollments: u64,
    pub purchase_count: u64,
    pub minutes_watched: f64,
    pub revenue: f64,
    pub rating: f64,
    pub review_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MyCoursesResponse {
    pub courses: Vec<CourseAggregate>,
    pub total_revenue: f64,
    pub published: u64,
    pub unpublished: u64,
    pub top_rated: Option<CourseSummary>,
    pub least_rated: Option<CourseSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TutorTransaction {
    pub student_name: String,
    pub course_title: String,
    pub amount: f64,
    pub purchased_at: DateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TutorTransactionsResponse {
    pub transactions: Vec<TutorTransaction>,
    pub total_income: f64,
    pub platform_charge: f64,
    pub net_income: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentRosterEntry {
    pub student_id: String,
    pub name: String,
    pub email: String,
    pub purchases: u64,
    pub total_amount: f64,
    pub last_purchase_at: DateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TutorStudentsResponse {
    pub students: Vec<StudentRosterEntry>,
    pub total_students: u64,
    pub new_students_last_30_days: u64,
    pub retention_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseConversion {
    pub course_id: String,
    pub title: String,
    pub views: u64,
    pub purchases: u64,
    /// Purchases as a percentage of views; zero views yields zero.
    pub conversion_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminTotals {
    pub students: u64,
    pub tutors: u64,
    pub courses: u64,
    pub purchases: u64,
    pub completions: u64,
    pub revenue: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyCount {
    pub month: u32,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionSummary {
    pub reference: String,
    pub email: String,
    pub amount: f64,
    pub paid_at: DateTime,
}

/// Recent platform event on the admin dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub kind: String,
    pub description: String,
    pub occurred_at: DateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminOverviewResponse {
    pub totals: AdminTotals,
    pub completion_rate: f64,
    pub monthly_purchases: Vec<MonthlyCount>,
    pub top_courses: Vec<CourseSummary>,
    pub recent_transactions: Vec<TransactionSummary>,
    pub recent_activities: Vec<ActivityEntry>,
}
