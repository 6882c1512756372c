//! Tutor dashboards: windowed quick stats, per-course aggregates,
//! transaction history and the performance chart.
//!
//! Revenue figures are derived from enrollment rows at course price, since
//! every enrollment is created by the webhook from a successful payment.

use chrono::{Duration, Utc};
use mongodb::bson::{DateTime, oid::ObjectId};
use singleton_macro::service;
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::PaystackConfig;
use crate::domain::dto::analytics::request::Period;
use crate::domain::dto::analytics::response::{
    CourseAggregate, CourseConversion, CourseStat, MyCoursesResponse, PerformanceChart,
    QuickStats, StudentRosterEntry, TutorDashboardResponse, TutorStudentsResponse,
    TutorTransaction, TutorTransactionsResponse,
};
use crate::domain::dto::courses::response::{CourseSummary, ReviewResponse};
use crate::domain::entities::commerce::purchased_course::PurchasedCourse;
use crate::domain::entities::courses::course::Course;
use crate::errors::errors::AppError;
use crate::repositories::commerce::purchased_course_repo::PurchasedCourseRepository;
use crate::repositories::courses::course_repo::CourseRepository;
use crate::repositories::courses::review_repo::ReviewRepository;
use crate::repositories::students::student_repo::StudentRepository;

#[service(name = "tutoranalytics")]
pub struct TutorAnalyticsService {
    course_repo: Arc<CourseRepository>,
    purchasedcourse_repo: Arc<PurchasedCourseRepository>,
    review_repo: Arc<ReviewRepository>,
    student_repo: Arc<StudentRepository>,
}

impl TutorAnalyticsService {
    pub async fn dashboard(
        &self,
        tutor_id: &str,
        period: Period,
    ) -> Result<TutorDashboardResponse, AppError> {
        let courses = self.tutor_courses(tutor_id).await?;
        let course_ids: Vec<ObjectId> = courses.iter().filter_map(|c| c.id).collect();
        let prices: HashMap<ObjectId, f64> =
            courses.iter().filter_map(|c| c.id.map(|id| (id, c.price))).collect();

        let since = window_start(period.days());
        let windowed = self
            .purchasedcourse_repo
            .find_by_courses(&course_ids, Some(since))
            .await?;
        let all_time = self
            .purchasedcourse_repo
            .find_by_courses(&course_ids, None)
            .await?;

        let mut students: Vec<ObjectId> = Vec::new();
        let mut revenue = 0.0;
        let mut certificates = 0u64;
        for enrollment in &windowed {
            if !students.contains(&enrollment.student_id) {
                students.push(enrollment.student_id);
            }
            revenue += prices.get(&enrollment.course_id).copied().unwrap_or(0.0);
            if enrollment.is_completed == 1 {
                certificates += 1;
            }
        }

        let quick_stats = QuickStats {
            enrollments: windowed.len() as u64,
            students: students.len() as u64,
            certificates,
            revenue,
        };

        let mut per_course = Vec::with_capacity(courses.len());
        for course in &courses {
            let Some(id) = course.id else { continue };
            let enrollments = windowed.iter().filter(|e| e.course_id == id).count() as u64;
            per_course.push(CourseStat {
                course_id: id.to_hex(),
                title: course.title.clone(),
                enrollments,
                revenue: enrollments as f64 * course.price,
                rating: course.rating,
                review_count: course.review_count,
            });
        }

        let most_rated_course = courses
            .iter()
            .filter(|c| c.review_count > 0)
            .max_by_key(|c| c.review_count)
            .cloned()
            .map(CourseSummary::from);

        let recent_reviews = self
            .review_repo
            .find_recent_for_courses(&course_ids, 5)
            .await?
            .into_iter()
            .map(ReviewResponse::from)
            .collect();

        let total_reviews: u64 = courses.iter().map(|c| c.review_count).sum();
        let performance = performance_chart(&all_time, total_reviews);

        Ok(TutorDashboardResponse {
            quick_stats,
            courses: per_course,
            most_rated_course,
            recent_reviews,
            performance,
        })
    }

    pub async fn my_courses(&self, tutor_id: &str) -> Result<MyCoursesResponse, AppError> {
        let courses = self.tutor_courses(tutor_id).await?;
        if courses.is_empty() {
            return Err(AppError::NotFound(
                "You have not created any courses yet".to_string(),
            ));
        }

        let course_ids: Vec<ObjectId> = courses.iter().filter_map(|c| c.id).collect();
        let enrollments = self
            .purchasedcourse_repo
            .find_by_courses(&course_ids, None)
            .await?;

        let mut aggregates = Vec::with_capacity(courses.len());
        let mut total_revenue = 0.0;
        for course in &courses {
            let Some(id) = course.id else { continue };
            let course_enrollments: Vec<&PurchasedCourse> =
                enrollments.iter().filter(|e| e.course_id == id).collect();
            let minutes: f64 = course_enrollments.iter().map(|e| e.minutes_spent).sum();
            let revenue = course_enrollments.len() as f64 * course.price;
            total_revenue += revenue;

            aggregates.push(CourseAggregate {
                course_id: id.to_hex(),
                title: course.title.clone(),
                is_published: course.is_published,
                enrollments: course_enrollments.len() as u64,
                purchase_count: course.purchase_count,
                minutes_watched: minutes,
                revenue,
                rating: course.rating,
                review_count: course.review_count,
            });
        }

        let published = courses.iter().filter(|c| c.is_published).count() as u64;
        let rated: Vec<&Course> = courses.iter().filter(|c| c.review_count > 0).collect();
        let top_rated = rated
            .iter()
            .max_by(|a, b| a.rating.total_cmp(&b.rating))
            .map(|c| CourseSummary::from((*c).clone()));
        let least_rated = rated
            .iter()
            .min_by(|a, b| a.rating.total_cmp(&b.rating))
            .map(|c| CourseSummary::from((*c).clone()));

        Ok(MyCoursesResponse {
            courses: aggregates,
            total_revenue,
            published,
            unpublished: courses.len() as u64 - published,
            top_rated,
            least_rated,
        })
    }

    pub async fn transactions(
        &self,
        tutor_id: &str,
    ) -> Result<TutorTransactionsResponse, AppError> {
        let courses = self.tutor_courses(tutor_id).await?;
        let course_ids: Vec<ObjectId> = courses.iter().filter_map(|c| c.id).collect();
        let titles: HashMap<ObjectId, &str> = courses
            .iter()
            .filter_map(|c| c.id.map(|id| (id, c.title.as_str())))
            .collect();
        let prices: HashMap<ObjectId, f64> =
            courses.iter().filter_map(|c| c.id.map(|id| (id, c.price))).collect();

        let enrollments = self
            .purchasedcourse_repo
            .find_by_courses(&course_ids, None)
            .await?;
        if enrollments.is_empty() {
            return Err(AppError::NotFound("No transactions yet".to_string()));
        }

        let names = self.student_names(&enrollments).await?;

        let mut transactions = Vec::with_capacity(enrollments.len());
        let mut total_income = 0.0;
        for enrollment in &enrollments {
            let amount = prices.get(&enrollment.course_id).copied().unwrap_or(0.0);
            total_income += amount;
            transactions.push(TutorTransaction {
                student_name: names
                    .get(&enrollment.student_id)
                    .cloned()
                    .unwrap_or_else(|| "Unknown student".to_string()),
                course_title: titles
                    .get(&enrollment.course_id)
                    .map(|t| t.to_string())
                    .unwrap_or_default(),
                amount,
                purchased_at: enrollment.purchased_at,
            });
        }

        let platform_charge = total_income * PaystackConfig::PLATFORM_CHARGE_RATE;

        Ok(TutorTransactionsResponse {
            transactions,
            total_income,
            platform_charge,
            net_income: total_income - platform_charge,
        })
    }

    pub async fn students(&self, tutor_id: &str) -> Result<TutorStudentsResponse, AppError> {
        let courses = self.tutor_courses(tutor_id).await?;
        let course_ids: Vec<ObjectId> = courses.iter().filter_map(|c| c.id).collect();
        let prices: HashMap<ObjectId, f64> =
            courses.iter().filter_map(|c| c.id.map(|id| (id, c.price))).collect();

        let enrollments = self
            .purchasedcourse_repo
            .find_by_courses(&course_ids, None)
            .await?;
        let names = self.student_names(&enrollments).await?;

        // Fold enrollments into one roster row per student.
        let mut roster: HashMap<ObjectId, StudentRosterEntry> = HashMap::new();
        for enrollment in &enrollments {
            let amount = prices.get(&enrollment.course_id).copied().unwrap_or(0.0);
            let entry = roster
                .entry(enrollment.student_id)
                .or_insert_with(|| StudentRosterEntry {
                    student_id: enrollment.student_id.to_hex(),
                    name: names
                        .get(&enrollment.student_id)
                        .cloned()
                        .unwrap_or_else(|| "Unknown student".to_string()),
                    email: String::new(),
                    purchases: 0,
                    total_amount: 0.0,
                    last_purchase_at: enrollment.purchased_at,
                });
            entry.purchases += 1;
            entry.total_amount += amount;
            if enrollment.purchased_at > entry.last_purchase_at {
                entry.last_purchase_at = enrollment.purchased_at;
            }
        }

        let student_ids: Vec<ObjectId> = roster.keys().copied().collect();
        for student in self.student_repo.find_by_ids(&student_ids).await? {
            if let Some(id) = student.id {
                if let Some(entry) = roster.get_mut(&id) {
                    entry.email = student.email.clone();
                }
            }
        }

        let thirty_days_ago = window_start(30);
        let new_students = roster
            .values()
            .filter(|r| {
                enrollments.iter().any(|e| {
                    e.student_id.to_hex() == r.student_id && e.purchased_at >= thirty_days_ago
                })
            })
            .count() as u64;

        let total = roster.len() as u64;
        let returning = roster.values().filter(|r| r.purchases > 1).count() as u64;
        let retention_rate = percentage(returning, total);

        let mut students: Vec<StudentRosterEntry> = roster.into_values().collect();
        students.sort_by(|a, b| b.last_purchase_at.cmp(&a.last_purchase_at));

        Ok(TutorStudentsResponse {
            students,
            total_students: total,
            new_students_last_30_days: new_students,
            retention_rate,
        })
    }

    /// Views-to-purchases conversion per course.
    pub async fn conversions(&self, tutor_id: &str) -> Result<Vec<CourseConversion>, AppError> {
        let courses = self.tutor_courses(tutor_id).await?;

        Ok(courses
            .iter()
            .filter_map(|course| {
                course.id.map(|id| CourseConversion {
                    course_id: id.to_hex(),
                    title: course.title.clone(),
                    views: course.views,
                    purchases: course.purchase_count,
                    conversion_rate: percentage(course.purchase_count, course.views),
                })
            })
            .collect())
    }

    async fn tutor_courses(&self, tutor_id: &str) -> Result<Vec<Course>, AppError> {
        let tutor_oid = ObjectId::parse_str(tutor_id)
            .map_err(|_| AppError::ValidationError("Invalid id format".to_string()))?;
        self.course_repo.find_by_tutor(&tutor_oid).await
    }

    async fn student_names(
        &self,
        enrollments: &[PurchasedCourse],
    ) -> Result<HashMap<ObjectId, String>, AppError> {
        let mut ids: Vec<ObjectId> = Vec::new();
        for enrollment in enrollments {
            if !ids.contains(&enrollment.student_id) {
                ids.push(enrollment.student_id);
            }
        }

        let mut names = HashMap::with_capacity(ids.len());
        for student in self.student_repo.find_by_ids(&ids).await? {
            if let Some(id) = student.id {
                names.insert(id, format!("{} {}", student.first_name, student.last_name));
            }
        }
        Ok(names)
    }
}

/// Retention is the share of students who bought more than once,
/// completion the share of finished enrollments, feedback the share of
/// enrollments that left a review (capped at 100). The score weights
/// them 0.4 / 0.4 / 0.2.
fn performance_chart(enrollments: &[PurchasedCourse], total_reviews: u64) -> PerformanceChart {
    let total = enrollments.len() as u64;

    let mut counts: HashMap<ObjectId, u64> = HashMap::new();
    for enrollment in enrollments {
        *counts.entry(enrollment.student_id).or_insert(0) += 1;
    }
    let students = counts.len() as u64;
    let returning = counts.values().filter(|&&c| c > 1).count() as u64;

    let completed = enrollments.iter().filter(|e| e.is_completed == 1).count() as u64;

    let retention_rate = percentage(returning, students);
    let completion_rate = percentage(completed, total);
    let feedback_rate = percentage(total_reviews, total).min(100.0);

    PerformanceChart {
        retention_rate,
        completion_rate,
        feedback_rate,
        performance_score: 0.4 * retention_rate + 0.4 * completion_rate + 0.2 * feedback_rate,
    }
}

fn percentage(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 / whole as f64) * 100.0
}

fn window_start(days: i64) -> DateTime {
    DateTime::from_millis((Utc::now() - Duration::days(days)).timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enrollment(student: ObjectId, completed: bool) -> PurchasedCourse {
        let mut e = PurchasedCourse::new(student, ObjectId::new(), ObjectId::new());
        if completed {
            e.is_completed = 1;
        }
        e
    }

    #[test]
    fn window_start_lands_days_in_the_past() {
        let start = window_start(7);
        let expected = (Utc::now() - Duration::days(7)).timestamp_millis();
        assert!((start.timestamp_millis() - expected).abs() < 5_000);
        assert!(start < DateTime::now());
    }

    #[test]
    fn percentage_handles_zero_denominator() {
        assert_eq!(percentage(5, 0), 0.0);
        assert_eq!(percentage(1, 4), 25.0);
    }

    #[test]
    fn performance_score_weights_components() {
        let repeat_buyer = ObjectId::new();
        let enrollments = vec![
            enrollment(repeat_buyer, true),
            enrollment(repeat_buyer, true),
            enrollment(ObjectId::new(), false),
            enrollment(ObjectId::new(), false),
        ];

        // 3 students, 1 returning; 2 of 4 complete; 2 reviews over 4.
        let chart = performance_chart(&enrollments, 2);
        assert!((chart.retention_rate - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(chart.completion_rate, 50.0);
        assert_eq!(chart.feedback_rate, 50.0);

        let expected = 0.4 * chart.retention_rate + 0.4 * 50.0 + 0.2 * 50.0;
        assert!((chart.performance_score - expected).abs() < 1e-9);
    }

    #[test]
    fn feedback_rate_is_capped() {
        let enrollments = vec![enrollment(ObjectId::new(), false)];
        let chart = performance_chart(&enrollments, 7);
        assert_eq!(chart.feedback_rate, 100.0);
    }
}
