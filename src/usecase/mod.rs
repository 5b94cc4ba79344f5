pub mod contracts;
pub mod error;
pub mod jwt;
pub mod ratings;
