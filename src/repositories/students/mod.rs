pub mod student_repo;
