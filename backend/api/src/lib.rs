pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod observability;
pub mod request_logger;
pub mod routes;
pub mod state;
pub mod validation;
