pub mod accounts;
pub mod analytics;
pub mod banking;
pub mod commerce;
pub mod courses;
pub mod messaging;
pub mod students;
