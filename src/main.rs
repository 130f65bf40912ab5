//! Bukutamu Server - Library Visitor Check-in Kiosk
//!
//! REST API server behind the library's check-in kiosk and admin dashboard.

use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bukutamu_server::{
    api,
    config::{AppConfig, StorageBackend, StorageConfig},
    repository::{
        redis_store::RedisStore,
        storage::{FileStore, KeyValueStore, MemoryStore},
    },
    services::greeting::GeminiGreeter,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load()?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("bukutamu_server={},tower_http=debug", config.logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting Bukutamu Server v{}", env!("CARGO_PKG_VERSION"));

    let store = open_store(&config.storage).await?;

    if config.greeting.api_key.is_none() {
        tracing::warn!("No Gemini API key configured, greetings will use the default text");
    }
    let greeter = Arc::new(GeminiGreeter::new(config.greeting.clone()));

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    // Create application state
    let state = AppState::new(config, store, greeter)?;

    // Build router
    let app = api::router(state);

    // Start server
    let addr = SocketAddr::new(server_host.parse()?, server_port);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Open the configured local store
async fn open_store(config: &StorageConfig) -> anyhow::Result<Arc<dyn KeyValueStore>> {
    let store: Arc<dyn KeyValueStore> = match config.backend {
        StorageBackend::File => {
            tracing::info!("Local cache stored under {}", config.path.display());
            Arc::new(FileStore::new(&config.path))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage, visitors are lost on restart");
            Arc::new(MemoryStore::new())
        }
        StorageBackend::Redis => {
            let store = RedisStore::new(&config.redis_url, &config.key_prefix).await?;
            tracing::info!("Connected to Redis");
            Arc::new(store)
        }
    };
    Ok(store)
}
