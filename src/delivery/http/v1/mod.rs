pub mod middleware;
pub mod ratings;
