//! Campaign Studio configuration

use brivas_core::{BrivasError, Result, ServiceConfig};

#[derive(Debug, Clone)]
pub struct StudioConfig {
    pub http_bind: String,
    /// Sender label used by previews that do not name one
    pub default_company_name: String,
    /// Largest body accepted by the preview endpoint
    pub max_preview_chars: usize,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            http_bind: "0.0.0.0:8080".to_string(),
            default_company_name: String::new(),
            max_preview_chars: 2000,
        }
    }
}

impl StudioConfig {
    /// Studio settings on top of the shared service configuration
    pub fn from_env(service: &ServiceConfig) -> Result<Self> {
        Ok(Self {
            http_bind: service.http_bind.clone(),
            default_company_name: std::env::var("DEFAULT_COMPANY_NAME").unwrap_or_default(),
            max_preview_chars: std::env::var("MAX_PREVIEW_CHARS")
                .unwrap_or_else(|_| "2000".to_string())
                .parse()
                .map_err(|e| BrivasError::Config(format!("Invalid MAX_PREVIEW_CHARS: {}", e)))?,
        })
    }
}
