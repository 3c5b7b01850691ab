//! Service wiring and the boot sequence.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;
use urlstash_api::{ApiServer, ApiState};
use urlstash_config::{Settings, load_from_env};
use urlstash_events::{EventBus, EventStream};
use urlstash_jobs::{JobRegistry, JobRegistryConfig};
use urlstash_store::HttpStoreFactory;

use crate::error::{AppError, AppResult};

/// Entry point for the application boot sequence.
///
/// # Errors
///
/// Returns an error if configuration loading, client construction, or
/// serving fails.
pub async fn run_app() -> AppResult<()> {
    init_tracing();
    let settings = load_from_env().map_err(|source| AppError::Config {
        operation: "settings.load",
        source,
    })?;
    run_with(settings).await
}

async fn run_with(settings: Settings) -> AppResult<()> {
    let events = EventBus::new();
    spawn_activity_logger(events.subscribe());

    let client = reqwest::Client::builder()
        .build()
        .map_err(|source| AppError::Http {
            operation: "client.build",
            source,
        })?;
    let stores = Arc::new(HttpStoreFactory::new(
        client.clone(),
        settings.store_base_url.clone(),
    ));
    let registry = Arc::new(JobRegistry::new(
        &JobRegistryConfig {
            scratch_root: settings.scratch_root.clone(),
            retrieval_tool: settings.retrieval_tool.clone(),
            job_budget: settings.job_budget,
        },
        stores,
        events,
    ));
    let server = ApiServer::new(ApiState::new(registry, client));

    let listener = TcpListener::bind(settings.bind_addr)
        .await
        .map_err(|source| AppError::Bind {
            addr: settings.bind_addr,
            source,
        })?;
    info!(addr = %settings.bind_addr, store = %settings.store_base_url, "urlstash listening");
    server
        .serve(listener)
        .await
        .map_err(|source| AppError::Serve { source })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Mirror the job activity trail into the structured log.
fn spawn_activity_logger(mut stream: EventStream) {
    tokio::spawn(async move {
        while let Some(envelope) = stream.next().await {
            info!(
                event_id = envelope.id,
                kind = envelope.event.kind(),
                job_id = %envelope.event.job_id(),
                "job activity"
            );
        }
    });
}
