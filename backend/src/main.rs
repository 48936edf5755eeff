use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};

use observatoire_backend::app;
use observatoire_backend::config::{Config, StorageBackend};
use observatoire_backend::logging::{self, LoggingConfig};
use observatoire_backend::state::AppState;
use observatoire_backend::store::{MemoryStore, PgStore, Store};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    logging::init_logging(LoggingConfig::from_env())?;

    let config = Config::from_env()?;

    let store: Arc<dyn Store> = match config.storage {
        StorageBackend::Postgres => {
            let store = PgStore::connect(&config.database_url, config.max_connections)
                .await
                .context("failed to connect to the database")?;
            info!("🗄️ Connected to PostgreSQL (max {} connections)", config.max_connections);
            Arc::new(store)
        }
        StorageBackend::Memory => {
            warn!("Using in-memory storage; data is lost on shutdown");
            Arc::new(MemoryStore::new())
        }
    };

    let app = app::create_app(AppState::new(store));

    let listener = TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("failed to bind {}:{}", config.host, config.port))?;
    info!("🚀 Observatoire backend running at http://{}/", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
