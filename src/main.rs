//! Gatherly event service
//!
//! Main application entry point

use std::sync::Arc;

use dotenv::dotenv;
use tokio::net::TcpListener;
use tracing::info;

use gatherly::{
    config::Settings,
    database::{connection, repositories::EventRepository},
    handlers::AppState,
    middleware::auth::TokenValidator,
    routes::create_routes,
    services::ServiceFactory,
    utils::logging,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging
    // Held until shutdown so the non-blocking file writer flushes.
    let _logging_guard = logging::init_logging(&settings.logging)?;

    info!("Starting Gatherly event service...");

    // Initialize database connection
    info!("Connecting to database...");
    let db_config = connection::DatabaseConfig {
        url: settings.database.url.clone(),
        max_connections: settings.database.max_connections,
        min_connections: settings.database.min_connections,
        ..Default::default()
    };
    let pool = connection::create_pool(&db_config).await?;

    // Run database migrations
    connection::run_migrations(&pool).await?;

    // Initialize services over the Postgres store
    let store = Arc::new(EventRepository::new(pool.clone()));
    let services = ServiceFactory::new(store);
    let token_validator = TokenValidator::new(&settings.auth.jwt_secret);

    let state = AppState {
        services,
        token_validator,
        pool,
    };

    let app = create_routes(state);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Gatherly listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Gatherly has been shut down.");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install shutdown signal handler");
    }
    info!("Shutdown signal received");
}
