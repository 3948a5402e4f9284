use std::sync::Arc;

use axum::http::{HeaderValue, Method, header};
use chrono::Duration;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use polling_app::{
    app_router,
    controllers::health,
    store::{memory::MemoryStore, mongo::MongoStore, Backend},
    utils::{password::PasswordHasher, session::SessionManager},
    AppState, Config, StoreBackend,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    health::mark_start();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "polling_app=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    tracing::info!("Starting polling app backend");

    let config = Config::load()?;

    let backend = match &config.store {
        StoreBackend::Mongo { uri, db_name } => {
            tracing::info!("Connecting to database");
            let store = MongoStore::connect(uri, db_name)
                .await
                .map_err(|e| format!("Failed to initialize database: {}", e))?;
            Backend::Mongo(Arc::new(store))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on exit");
            Backend::Memory(Arc::new(MemoryStore::new()))
        }
    };

    let sessions = SessionManager::new(
        &config.session_secret,
        Duration::hours(config.session_ttl_hours),
    );
    let passwords = PasswordHasher::new(config.password_hash_iterations);
    let app_state = AppState::new(&backend, sessions, passwords);

    let origin = config
        .cors_origin
        .parse::<HeaderValue>()
        .map_err(|e| format!("Failed to parse CORS origin {}: {}", config.cors_origin, e))?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::COOKIE,
            header::HeaderName::from_static("x-requested-with"),
        ])
        .allow_credentials(true);

    let app = app_router(app_state).layer(cors);

    let listener = tokio::net::TcpListener::bind(config.server_addr)
        .await
        .map_err(|e| format!("Failed to bind to address {}: {}", config.server_addr, e))?;

    tracing::info!(addr = %config.server_addr, cors_origin = %config.cors_origin, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    backend.close().await;
    tracing::info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => tracing::info!("Received Ctrl+C signal"),
            Err(e) => tracing::error!("Failed to listen for Ctrl+C: {}", e),
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                tracing::info!("Received SIGTERM signal");
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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

    tracing::info!("Starting graceful shutdown...");
}
