pub mod api;
pub mod config;
pub mod logic;
pub mod model;
pub mod seed;
pub mod store;

use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

// Export API types
pub use api::handlers;
pub use api::routes;
pub use api::{AppContext, AppState};

pub use logic::{DateField, ValidationError};

// Export all model types
pub use model::*;

// Export store types
pub use store::{ImageStore, MemoryStore, PostgresStore, Store, StoreError};

use crate::config::{AppConfig, StorageBackend};

/// Serves the API on `listener` until `shutdown` resolves.
pub async fn serve<S, F>(
    listener: TcpListener,
    store: S,
    config: &AppConfig,
    shutdown: F,
) -> anyhow::Result<()>
where
    S: Store + 'static,
    F: Future<Output = ()> + Send + 'static,
{
    let images = ImageStore::new(&config.storage.image_root);
    let state = Arc::new(AppContext::new(store, images));
    let app = api::routes::build_app(state, config);

    if let Ok(address) = listener.local_addr() {
        log::info!("Portfolio CMS listening on http://{}", address);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}

/// Opens the configured backend, prepares it and serves until `shutdown`.
pub async fn run_server<F>(config: &AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(config.server_address()).await?;

    match config.database.backend {
        StorageBackend::Postgres => {
            log::info!("Connecting to PostgreSQL...");
            let database_url = config.database_url()?;
            let store = PostgresStore::new(&database_url, config.max_connections()).await?;
            store.migrate().await?;
            prepare(&store, config).await?;
            serve(listener, store, config, shutdown).await
        }
        StorageBackend::Memory => {
            log::warn!("Using in-memory storage; content is lost on shutdown");
            let store = MemoryStore::new();
            prepare(&store, config).await?;
            serve(listener, store, config, shutdown).await
        }
    }
}

async fn prepare<S: Store>(store: &S, config: &AppConfig) -> anyhow::Result<()> {
    if config.database.load_seed_data {
        seed::load_seed_data(store).await?;
    }
    Ok(())
}
