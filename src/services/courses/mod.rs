pub mod course_service;
