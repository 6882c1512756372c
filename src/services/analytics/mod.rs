pub mod admin_analytics_service;
pub mod tutor_analytics_service;
