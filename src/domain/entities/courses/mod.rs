pub mod comment;
pub mod course;
pub mod review;

pub use comment::*;
pub use course::*;
pub use review::*;
