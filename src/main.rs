//! Gatherly API server
//!
//! Main application entry point

use std::time::Duration;

use tracing::info;

use gatherly::config::Settings;
use gatherly::database::{connection, DatabaseService};
use gatherly::handlers::{self, AppState};
use gatherly::services::ServiceFactory;
use gatherly::utils::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging; the guard keeps the file writer alive
    let _logging_guard = logging::init_logging(&settings.logging)?;

    info!("Starting gatherly API server...");

    // Initialize database connection
    info!("Connecting to database...");
    let db_config = connection::DatabaseConfig::from(&settings.database);
    let pool = connection::create_pool(&db_config).await?;

    // Run database migrations
    connection::run_migrations(&pool).await?;

    // Initialize repositories and services
    let db = DatabaseService::new(pool.clone());
    let services = ServiceFactory::new(&db, &settings);
    let state = AppState::new(pool, db, services);

    let request_timeout = Duration::from_secs(settings.server.request_timeout_seconds);
    let app = handlers::router(state, request_timeout);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, "gatherly API is ready");

    axum::serve(listener, app).await?;

    info!("gatherly API has been shut down.");

    Ok(())
}
