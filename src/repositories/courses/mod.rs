pub mod comment_repo;
pub mod course_repo;
pub mod review_repo;
