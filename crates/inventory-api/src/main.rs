//! Inventory API Service
//!
//! REST API for tracking devices, categories and software licenses

use anyhow::{Context, Result};
use inventory_api::{create_router, serve_static, AppState, Config, JwtService};
use inventory_store::Inventory;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,inventory_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;

    info!("Starting Inventory API Service");
    info!("Data directory: {}", config.data_dir.display());

    if config.uses_default_secret() {
        warn!("JWT_SECRET is not set; tokens are signed with the development default");
    }

    let inventory = Inventory::open_with_timeout(&config.data_dir, config.write_timeout())
        .await
        .context("Failed to open data directory")?;

    inventory
        .credentials
        .bootstrap()
        .await
        .context("Failed to bootstrap users")?;

    if config.migrate_passwords {
        let migrated = inventory
            .credentials
            .migrate_plaintext()
            .await
            .context("Failed to migrate plaintext passwords")?;
        if migrated > 0 {
            info!("Hashed {} plaintext password(s)", migrated);
        }
    }

    let jwt = JwtService::new(&config.jwt_secret, config.token_ttl_secs);
    let state = AppState::new(inventory, jwt);

    let mut app = create_router(state);
    if let Some(dir) = &config.static_dir {
        info!("Serving static files from {}", dir.display());
        app = serve_static(app, dir);
    }

    // Bind and serve
    let addr = config.api_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    info!("Inventory API Service running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Inventory API Service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
