use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use fleet_backoffice::config::{DatabaseConfig, EnvironmentConfig, StoreBackend};
use fleet_backoffice::database::DatabaseConnection;
use fleet_backoffice::repositories::{FleetStore, MemoryStore, PgStore};
use fleet_backoffice::{create_app_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    info!("🚐 Fleet Back Office API");
    info!("========================");

    let config = EnvironmentConfig::from_env().context("invalid configuration")?;

    let store: Arc<dyn FleetStore> = match config.store_backend {
        StoreBackend::Postgres => {
            let url = config
                .database_url
                .clone()
                .context("DATABASE_URL must be set for the postgres backend")?;
            let connection = DatabaseConnection::connect(&DatabaseConfig::new(url, config.db_max_connections)).await?;
            connection.run_migrations().await?;
            Arc::new(PgStore::new(connection.into_pool()))
        }
        StoreBackend::Memory => {
            warn!("⚠️ Using the in-memory store: data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    let state = AppState::new(store, config.clone());
    state
        .uploads
        .ensure_root()
        .await
        .with_context(|| format!("could not create upload directory '{}'", config.upload_dir))?;

    let app = create_app_router(state);

    let addr: SocketAddr = config
        .server_url()
        .parse()
        .with_context(|| format!("invalid listen address '{}'", config.server_url()))?;

    info!("🌐 Listening on http://{} ({} store, {} availability policy)", addr, config.store_backend, config.availability_policy);
    info!("🔍 Endpoints:");
    info!("   GET  /health");
    info!("🔗 Assignments (/api/assignments, alias /assignment):");
    info!("   POST /            GET /            GET /active");
    info!("   PUT  /:id/end     GET /driver/:id  GET /vehicle/:id");
    info!("👤 Drivers (/driver):");
    info!("   POST /create      GET /all         GET /available");
    info!("   GET  /driver/:id  PUT /edit/:id    DELETE /delete/:id");
    info!("   GET  /category/:category           GET /language/:language");
    info!("🚗 Vehicles (/vehicle):");
    info!("   POST /create      GET /all         GET /available");
    info!("   GET  /vehicle/:id PUT /edit/:id    DELETE /delete/:id");
    info!("   GET  /type/:type");
    info!("📅 Bookings (/booking):");
    info!("   POST /create      GET /all         GET /booking/:id");
    info!("   PUT  /edit/:id    DELETE /delete/:id");
    info!("🧳 Default packages (/defaultPackage):");
    info!("   POST /create      GET /allPackages GET /package/:id");
    info!("   PUT  /editPackage/:id              DELETE /deletePackage/:id");
    info!("📁 Uploads served from /uploads ({})", config.upload_dir);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("could not bind {}", addr))?;

    if let Err(e) = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await {
        error!("❌ Server error: {}", e);
        return Err(e.into());
    }

    info!("👋 Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("🛑 Ctrl+C received, shutting down..."),
        _ = terminate => info!("🛑 SIGTERM received, shutting down..."),
    }
}
