use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod api;
mod config;
mod domain;
mod messaging;
mod metrics;
mod persistence;
mod read_model;
mod utils;

use config::{AppConfig, ConfigError, StoreKind};
use messaging::{BusDispatcher, EventDispatcher, LoggingDispatcher, RedpandaClient};
use persistence::{InMemoryStore, Persistence, PgStore};
use read_model::ReadModel;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging with environment-based filtering
    // Default to INFO level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,student_enrollment=debug"))
        )
        .init();

    tracing::info!("🚀 Starting student enrollment service");

    let config = AppConfig::from_env()?;

    // === 1. Initialize Prometheus metrics ===
    let metrics = Arc::new(metrics::Metrics::new()?);
    tracing::info!("📊 Metrics registry created with {} metrics", metrics.registry().gather().len());

    // === 2. Open the store ===
    let (persistence, read_model): (Arc<dyn Persistence>, Arc<dyn ReadModel>) = match config.store {
        StoreKind::Postgres => {
            let database = config.database.as_ref().ok_or(ConfigError::Missing("DATABASE_URL"))?;
            let store = PgStore::connect(database).await?;
            store.migrate().await?;
            (Arc::new(store.clone()), Arc::new(store))
        }
        StoreKind::Memory => {
            tracing::warn!("Using the in-memory store; data is lost on exit");
            let store = InMemoryStore::new();
            (Arc::new(store.clone()), Arc::new(store))
        }
    };

    // === 3. Event dispatch ===
    let dispatcher: Arc<dyn EventDispatcher> = match &config.kafka_brokers {
        Some(brokers) => {
            let client = RedpandaClient::new(brokers)?;
            Arc::new(BusDispatcher::new(Arc::new(client)).with_metrics(metrics.clone()))
        }
        None => {
            tracing::info!("KAFKA_BROKERS not set, domain events will only be logged");
            Arc::new(LoggingDispatcher)
        }
    };

    // === 4. Serve the API and the metrics endpoint ===
    let state = web::Data::new(api::AppState::new(persistence, read_model, dispatcher, metrics.clone()));

    tracing::info!(bind = %config.http_bind, "🌐 Starting API server");
    let api_server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(api::configure)
    })
    .bind(config.http_bind)?
    .run();

    let runtime = metrics::RuntimeInfo {
        store: config.store.as_str(),
        dispatcher: if config.kafka_brokers.is_some() { "kafka" } else { "logging" },
    };
    let metrics_server = metrics::start_metrics_server(metrics.clone(), runtime, config.metrics_port);

    tokio::try_join!(api_server, metrics_server)?;

    tracing::info!("👋 Shutting down");
    Ok(())
}
