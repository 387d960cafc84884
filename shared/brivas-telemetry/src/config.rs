//! Telemetry Configuration

/// Telemetry configuration
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub service_name: String,
    pub log_level: String,
    pub json_logs: bool,
    /// Extra directive raising the service's own crate to debug
    pub debug_self: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "brivas-service".to_string(),
            log_level: "info".to_string(),
            json_logs: true,
            debug_self: false,
        }
    }
}

impl TelemetryConfig {
    pub fn from_env(service_name: &str) -> Self {
        Self {
            service_name: std::env::var("SERVICE_NAME")
                .unwrap_or_else(|_| service_name.to_string()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            json_logs: std::env::var("JSON_LOGS")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(true),
            debug_self: std::env::var("DEBUG_SELF")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        }
    }

    /// Crate target for the service, `campaign-studio` -> `campaign_studio`
    pub fn target(&self) -> String {
        self.service_name.replace('-', "_")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_uses_crate_naming() {
        let config = TelemetryConfig {
            service_name: "campaign-studio".to_string(),
            ..Default::default()
        };
        assert_eq!(config.target(), "campaign_studio");
    }
}
