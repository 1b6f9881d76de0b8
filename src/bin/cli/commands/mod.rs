pub mod count;
pub mod review;
