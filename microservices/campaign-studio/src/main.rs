//! Campaign Studio - campaign messaging configuration service
//!
//! Backs the dashboard's campaign configuration screens:
//! - Live SMS sizing (GSM-7 / UCS-2, single-segment limits)
//! - Template variable conversion between editor and delivery syntax
//! - Retry strategy / cooldown validation
//! - Campaign read, replace and partial update

use brivas_campaign::InMemoryCampaignStore;
use brivas_core::{
    BrivasError, BrivasService, DependencyStatus, HealthStatus, MicroserviceRuntime,
    ReadinessStatus, Result, ServiceConfig,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

mod api;
mod config;


pub use config::StudioConfig;

#[tokio::main]
async fn main() -> Result<()> {
    brivas_telemetry::init("campaign-studio")
        .map_err(|e| BrivasError::Config(e.to_string()))?;

    info!("Starting Campaign Studio");

    let service_config = ServiceConfig::from_env()?;
    let service = Arc::new(CampaignStudioService::new(StudioConfig::from_env(&service_config)?));
    MicroserviceRuntime::with_config(service_config).serve(service).await
}

pub struct CampaignStudioService {
    config: Arc<StudioConfig>,
    store: InMemoryCampaignStore,
    serving: AtomicBool,
    shutdown_tx: watch::Sender<bool>,
    start_time: std::time::Instant,
}

impl CampaignStudioService {
    pub fn new(config: StudioConfig) -> Self {
        info!(
            http_bind = %config.http_bind,
            max_preview_chars = config.max_preview_chars,
            "Initializing Campaign Studio"
        );

        let (shutdown_tx, _) = watch::channel(false);
        Self {
            config: Arc::new(config),
            store: InMemoryCampaignStore::new(),
            serving: AtomicBool::new(false),
            shutdown_tx,
            start_time: std::time::Instant::now(),
        }
    }

    fn app_state(&self) -> api::AppState {
        api::AppState {
            store: Arc::new(self.store.clone()),
            config: self.config.clone(),
        }
    }
}

#[async_trait::async_trait]
impl BrivasService for CampaignStudioService {
    fn service_id(&self) -> &'static str {
        "campaign-studio"
    }

    async fn health(&self) -> HealthStatus {
        HealthStatus {
            healthy: true,
            service_id: self.service_id().to_string(),
            version: self.version().to_string(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    async fn ready(&self) -> ReadinessStatus {
        ReadinessStatus::from_dependencies(vec![
            DependencyStatus {
                name: "campaign_store".to_string(),
                available: true,
                latency_ms: None,
            },
            DependencyStatus {
                name: "http_server".to_string(),
                available: self.serving.load(Ordering::SeqCst),
                latency_ms: None,
            },
        ])
    }

    async fn shutdown(&self) -> Result<()> {
        info!(campaigns = self.store.len(), "Shutting down Campaign Studio");
        self.shutdown_tx.send_replace(true);
        Ok(())
    }

    async fn start(&self) -> Result<()> {
        info!(http_addr = %self.config.http_bind, "Starting Campaign Studio HTTP server");

        let app = api::create_router(self.app_state());
        let listener = tokio::net::TcpListener::bind(&self.config.http_bind).await?;
        self.serving.store(true, Ordering::SeqCst);

        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let served = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                while !*shutdown_rx.borrow_and_update() {
                    if shutdown_rx.changed().await.is_err() {
                        break;
                    }
                }
            })
            .await;

        self.serving.store(false, Ordering::SeqCst);
        served?;
        Ok(())
    }
}
