pub mod cart_repo;
pub mod payment_repo;
pub mod purchased_course_repo;
