//! Platform-wide overview for the admin dashboard.

use chrono::{Datelike, Utc};
use mongodb::bson::DateTime;
use singleton_macro::service;
use std::sync::Arc;

use crate::domain::dto::analytics::response::{
    ActivityEntry, AdminOverviewResponse, AdminTotals, MonthlyCount, TransactionSummary,
};
use crate::domain::dto::courses::response::CourseSummary;
use crate::domain::entities::accounts::account::Role;
use crate::errors::errors::AppError;
use crate::repositories::accounts::account_repo::AccountRepository;
use crate::repositories::commerce::payment_repo::PaymentRepository;
use crate::repositories::commerce::purchased_course_repo::PurchasedCourseRepository;
use crate::repositories::courses::comment_repo::CommentRepository;
use crate::repositories::courses::course_repo::CourseRepository;
use crate::repositories::courses::review_repo::ReviewRepository;
use crate::repositories::students::student_repo::StudentRepository;

#[service(name = "adminanalytics")]
pub struct AdminAnalyticsService {
    student_repo: Arc<StudentRepository>,
    account_repo: Arc<AccountRepository>,
    course_repo: Arc<CourseRepository>,
    purchasedcourse_repo: Arc<PurchasedCourseRepository>,
    payment_repo: Arc<PaymentRepository>,
    comment_repo: Arc<CommentRepository>,
    review_repo: Arc<ReviewRepository>,
}

impl AdminAnalyticsService {
    pub async fn overview(&self) -> Result<AdminOverviewResponse, AppError> {
        let students = self.student_repo.count().await?;
        let tutors = self.account_repo.count_by_role(Role::Tutor).await?;
        let courses = self.course_repo.count().await?;
        let purchases = self.purchasedcourse_repo.count_all().await?;
        let completions = self.purchasedcourse_repo.count_completed().await?;
        let revenue = self.payment_repo.total_successful_amount().await?;

        let completion_rate = if purchases > 0 {
            (completions as f64 / purchases as f64) * 100.0
        } else {
            0.0
        };

        let year = Utc::now().year();
        let monthly_purchases = self
            .purchasedcourse_repo
            .monthly_purchase_counts(year)
            .await?
            .into_iter()
            .map(|(month, count)| MonthlyCount { month, count })
            .collect();

        let top_courses = self
            .course_repo
            .find_top_by_purchases(3)
            .await?
            .into_iter()
            .map(CourseSummary::from)
            .collect();

        let recent_transactions = self
            .payment_repo
            .find_recent_successful(5)
            .await?
            .into_iter()
            .map(|p| TransactionSummary {
                reference: p.reference,
                email: p.email,
                amount: p.amount,
                paid_at: p.paid_at.unwrap_or(p.created_at),
            })
            .collect();

        let recent_activities = self.recent_activities().await?;

        Ok(AdminOverviewResponse {
            totals: AdminTotals {
                students,
                tutors,
                courses,
                purchases,
                completions,
                revenue,
            },
            completion_rate,
            monthly_purchases,
            top_courses,
            recent_transactions,
            recent_activities,
        })
    }

    /// Latest purchases, comments and reviews merged newest first.
    async fn recent_activities(&self) -> Result<Vec<ActivityEntry>, AppError> {
        let mut activities: Vec<(DateTime, ActivityEntry)> = Vec::new();

        for purchase in self.purchasedcourse_repo.find_recent(5).await? {
            activities.push((
                purchase.purchased_at,
                ActivityEntry {
                    kind: "purchase".to_string(),
                    description: format!(
                        "Student {} purchased course {}",
                        purchase.student_id.to_hex(),
                        purchase.course_id.to_hex()
                    ),
                    occurred_at: purchase.purchased_at,
                },
            ));
        }

        for comment in self.comment_repo.find_recent(5).await? {
            activities.push((
                comment.created_at,
                ActivityEntry {
                    kind: "comment".to_string(),
                    description: format!(
                        "New comment on course {}",
                        comment.course_id.to_hex()
                    ),
                    occurred_at: comment.created_at,
                },
            ));
        }

        for review in self.review_repo.find_recent(5).await? {
            activities.push((
                review.created_at,
                ActivityEntry {
                    kind: "review".to_string(),
                    description: format!(
                        "Course {} rated {} stars",
                        review.course_id.to_hex(),
                        review.rating
                    ),
                    occurred_at: review.created_at,
                },
            ));
        }

        activities.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(activities.into_iter().take(5).map(|(_, e)| e).collect())
    }
}
