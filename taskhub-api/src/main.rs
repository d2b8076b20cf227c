//! # Taskhub API Server
//!
//! HTTP server for the Taskhub task-tracking backend:
//! user registration and login, JWT access/refresh sessions with
//! server-side revocation, per-user tasks, and avatar storage.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p taskhub-api
//! ```

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use taskhub_api::{
    app::{build_router, AppState},
    config::Config,
};
use taskhub_shared::db::{
    migrations::{get_migration_status, run_migrations},
    pool::{create_pool, DatabaseConfig},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskhub_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Taskhub API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    // Missing or empty signing secrets must stop the boot, never a request
    let jwt = config.jwt_keys()?;

    let pool = create_pool(DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    run_migrations(&pool).await?;
    let status = get_migration_status(&pool).await?;
    tracing::info!(
        applied_migrations = status.applied_migrations,
        "Database schema ready"
    );

    let bind_address = config.bind_address();
    let state = AppState::new(pool, config, jwt);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
