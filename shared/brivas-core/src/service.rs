//! Service infrastructure for all microservices

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::signal;
use tracing::{error, info, warn};

use crate::config::ServiceConfig;
use crate::error::Result;

/// Health status for liveness probes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub healthy: bool,
    pub service_id: String,
    pub version: String,
    pub uptime_seconds: u64,
}

/// Readiness status for readiness probes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessStatus {
    pub ready: bool,
    pub dependencies: Vec<DependencyStatus>,
}

impl ReadinessStatus {
    /// Ready only when every dependency reports available
    pub fn from_dependencies(dependencies: Vec<DependencyStatus>) -> Self {
        Self {
            ready: dependencies.iter().all(|d| d.available),
            dependencies,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencyStatus {
    pub name: String,
    pub available: bool,
    pub latency_ms: Option<u64>,
}

/// Standard trait all microservices must implement
#[async_trait]
pub trait BrivasService: Send + Sync + 'static {
    /// Service identifier (e.g., "campaign-studio")
    fn service_id(&self) -> &'static str;

    /// Service version
    fn version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    /// Health check - is the service alive?
    async fn health(&self) -> HealthStatus;

    /// Readiness check - are all dependencies available?
    async fn ready(&self) -> ReadinessStatus;

    /// Graceful shutdown
    async fn shutdown(&self) -> Result<()>;

    /// Start the service (HTTP servers, background tasks)
    async fn start(&self) -> Result<()>;
}

/// Standard microservice runtime bootstrap
pub struct MicroserviceRuntime {
    config: ServiceConfig,
    start_time: Instant,
}

impl MicroserviceRuntime {
    pub fn with_config(config: ServiceConfig) -> Self {
        Self {
            config,
            start_time: Instant::now(),
        }
    }

    /// Run a microservice until it exits or a shutdown signal arrives
    pub async fn serve<S: BrivasService>(self, service: Arc<S>) -> Result<()> {
        info!(
            service_id = service.service_id(),
            service_name = %self.config.service_name,
            version = service.version(),
            "Starting microservice"
        );

        let service_clone = service.clone();
        let mut service_handle = tokio::spawn(async move { service_clone.start().await });

        tokio::select! {
            joined = &mut service_handle => {
                match joined {
                    Ok(Ok(())) => info!("Service exited"),
                    Ok(Err(e)) => error!("Service error: {}", e),
                    Err(e) => error!("Service task failed: {}", e),
                }
            }
            _ = Self::wait_for_shutdown() => {
                info!("Shutdown signal received, gracefully stopping...");
            }
        }

        if let Err(e) = service.shutdown().await {
            warn!("Error during shutdown: {}", e);
        }

        let grace = Duration::from_secs(self.config.shutdown_grace_secs);
        if !service_handle.is_finished()
            && tokio::time::timeout(grace, &mut service_handle).await.is_err()
        {
            warn!(grace_secs = grace.as_secs(), "Service did not stop in time, aborting");
            service_handle.abort();
        }

        info!(
            uptime_seconds = self.start_time.elapsed().as_secs(),
            "Microservice stopped"
        );

        Ok(())
    }

    async fn wait_for_shutdown() {
        let ctrl_c = async {
            if let Err(e) = signal::ctrl_c().await {
                error!("Failed to listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    sigterm.recv().await;
                }
                Err(e) => {
                    error!("Failed to listen for SIGTERM: {}", e);
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {},
            _ = terminate => {},
        }
    }
}
