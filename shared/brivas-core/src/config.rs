//! Configuration management for microservices

use crate::error::{BrivasError, Result};
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub service_name: String,
    pub http_bind: String,
    pub shutdown_grace_secs: u64,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            service_name: env::var("SERVICE_NAME").unwrap_or_else(|_| "unknown".to_string()),
            http_bind: env::var("HTTP_BIND").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            shutdown_grace_secs: env::var("SHUTDOWN_GRACE_SECS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .map_err(|e| BrivasError::Config(format!("Invalid SHUTDOWN_GRACE_SECS: {}", e)))?,
        })
    }
}
