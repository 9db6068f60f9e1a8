//! HTTP surface: handlers, routing and middleware

pub mod middleware;
pub mod services;
pub mod types;

pub use services::app_routes;
