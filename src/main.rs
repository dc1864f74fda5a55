//! homie server binary.
//!
//! Starts the HTTP API: logging first, then configuration, then database,
//! then the axum server.

use homie::api::{self, AppState};
use homie::config::{self, database};
use homie::errors::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // A missing .env file is fine; the defaults cover local development
    dotenvy::dotenv().ok();

    let app_config = config::load_app_configuration()?;
    info!("Connecting to database at {}", app_config.database_url);

    let db = database::create_connection(&app_config.database_url).await?;
    database::create_tables(&db).await?;

    let app = api::router(AppState::new(db));
    let listener = tokio::net::TcpListener::bind(&app_config.bind_address).await?;
    info!("homie listening on {}", app_config.bind_address);
    axum::serve(listener, app).await?;

    Ok(())
}
