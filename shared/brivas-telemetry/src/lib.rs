//! Brivas Telemetry
//!
//! Structured logging setup shared by every campaign service.

mod config;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use tracing_setup::init_tracing;

/// Initialize telemetry for a service from the environment
pub fn init(service_name: &str) -> Result<(), TelemetryError> {
    let config = TelemetryConfig::from_env(service_name);
    init_tracing(&config)
}

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("Tracing initialization failed: {0}")]
    TracingInit(String),

    #[error("Invalid log filter: {0}")]
    InvalidFilter(String),
}
