pub mod business;
pub mod comment;
pub mod deal;
pub mod enriched;
