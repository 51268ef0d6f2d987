mod config;
mod db;
mod employees;
mod errors;
mod models;
mod routes;
mod state;
mod storage;
#[cfg(test)]
mod testing;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, StorageBackend};
use crate::db::create_pool;
use crate::employees::manager::EmployeeManager;
use crate::employees::repository::PgRecordStore;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::{BlobStore, LocalBlobStore, S3BlobStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Configuration first; a missing required variable aborts startup.
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Employee API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    let records = Arc::new(PgRecordStore::new(db));

    // Initialize blob storage
    let blobs: Arc<dyn BlobStore> = match &config.storage {
        StorageBackend::S3(settings) => Arc::new(S3BlobStore::connect(settings).await),
        StorageBackend::Local { root } => {
            info!("Local blob store rooted at {root}");
            Arc::new(LocalBlobStore::new(root))
        }
    };

    let state = AppState {
        employees: EmployeeManager::new(records, blobs),
        config: config.clone(),
    };

    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
