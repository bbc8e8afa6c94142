pub mod auth;
pub mod catchers;
pub mod config;
pub mod cors;
pub mod error;
pub mod queries;
pub mod rate_limiter;
pub mod routes;
pub mod utils;
pub use shared::{models::*, identity::*};
