//! Tracing Setup

use tracing_subscriber::{filter::Directive, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{TelemetryConfig, TelemetryError};

/// Build the env filter: `RUST_LOG` wins, otherwise the configured level
pub(crate) fn build_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    let mut filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    if config.debug_self {
        let directive: Directive = format!("{}=debug", config.target())
            .parse()
            .map_err(|e| TelemetryError::InvalidFilter(format!("{}", e)))?;
        filter = filter.add_directive(directive);
    }

    Ok(filter)
}

/// Initialize the global tracing subscriber
pub fn init_tracing(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = build_filter(config)?;

    if config.json_logs {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::TracingInit(e.to_string()))?;
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(true);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::TracingInit(e.to_string()))?;
    }

    tracing::info!(
        service = %config.service_name,
        log_level = %config.log_level,
        json_logs = config.json_logs,
        "Tracing initialized"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_self_directive_is_valid() {
        let config = TelemetryConfig {
            service_name: "campaign-studio".to_string(),
            debug_self: true,
            ..Default::default()
        };
        assert!(build_filter(&config).is_ok());
    }
}
