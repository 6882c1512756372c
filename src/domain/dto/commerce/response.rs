use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};

use crate::domain::entities::commerce::cart_item::{CartItem, CartStatus};
use crate::domain::entities::commerce::purchased_course::{
    LectureProgress, PurchasedCourse, VideoProgress,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItemResponse {
    pub id: String,
    pub course_id: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub line_total: f64,
    pub status: CartStatus,
}

impl From<CartItem> for CartItemResponse {
    fn from(item: CartItem) -> Self {
        let line_total = item.line_total();
        Self {
            id: item.id.map(|id| id.to_hex()).unwrap_or_default(),
            course_id: item.course_id.to_hex(),
            quantity: item.quantity,
            unit_price: item.unit_price,
            line_total,
            status: item.status,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartResponse {
    pub items: Vec<CartItemResponse>,
    pub total: f64,
}

/// Returned from checkout: the client redirects to `authorization_url`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutResponse {
    pub authorization_url: String,
    pub access_code: String,
    pub reference: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchasedCourseResponse {
    pub id: String,
    pub course_id: String,
    pub is_completed: u8,
    pub minutes_spent: f64,
    pub progress: Vec<VideoProgress>,
    pub lecture_progress: Vec<LectureProgress>,
    pub purchased_at: DateTime,
}

impl From<PurchasedCourse> for PurchasedCourseResponse {
    fn from(purchase: PurchasedCourse) -> Self {
        Self {
            id: purchase.id.map(|id| id.to_hex()).unwrap_or_default(),
            course_id: purchase.course_id.to_hex(),
            is_completed: purchase.is_completed,
            minutes_spent: purchase.minutes_spent,
            progress: purchase.progress,
            lecture_progress: purchase.lecture_progress,
            purchased_at: purchase.purchased_at,
        }
    }
}
