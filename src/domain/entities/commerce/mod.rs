pub mod cart_item;
pub mod payment;
pub mod purchased_course;

pub use cart_item::*;
pub use payment::*;
pub use purchased_course::*;
