pub mod dashboard_service;
pub mod student_service;
