use prometheus::Registry;
use std::sync::Arc;
use std::time::Instant;

use crate::config::ServerConfig;
use crate::validation::ServerValidation;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub started_at: Instant,
    pub registry: Registry,
    pub validation: Arc<ServerValidation>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(config: ServerConfig, registry: Registry) -> Self {
        Self {
            started_at: Instant::now(),
            registry,
            validation: Arc::new(ServerValidation::new()),
            config: Arc::new(config),
        }
    }

    /// Swap the validators, e.g. to inject a different sanitizer
    pub fn with_validation(mut self, validation: ServerValidation) -> Self {
        self.validation = Arc::new(validation);
        self
    }
}
