//! spinrate - hypermedia album review API

use anyhow::Result;
use clap::Parser;
use spinrate::config::{Args, Config};
use spinrate::db::{init_database, Store};
use spinrate::{build_router, AppState};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting spinrate v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::resolve(Args::parse())?;
    info!("Database path: {}", config.database.display());

    let pool = match init_database(&config.database).await {
        Ok(pool) => pool,
        Err(err) => {
            error!("Failed to initialize database: {}", err);
            return Err(err.into());
        }
    };

    let state = AppState::new(Store::new(pool));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!("spinrate listening on http://{}", config.bind);
    info!("API entry point: http://{}/api/", config.bind);

    axum::serve(listener, app).await?;

    Ok(())
}
