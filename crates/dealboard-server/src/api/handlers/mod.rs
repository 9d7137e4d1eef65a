pub mod businesses;
pub mod comments;
pub mod deals;
pub mod enriched;
pub mod health;
