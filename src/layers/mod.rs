pub mod base;
pub mod expression;
pub mod manager;
pub mod source;
