mod batches;
mod common;
mod config;
mod incubators;
mod routes;
mod species;
#[cfg(test)]
mod test_helpers;
mod trays;

use crate::config::Config;
use anyhow::Context;
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    // Load configuration and environment variables to pass to the application
    let config: Config = Config::from_env()?;

    let db: DatabaseConnection = Database::connect(config.connect_options()?)
        .await
        .context("could not connect to the database")?;
    tracing::info!("connected to the database");

    Migrator::up(&db, None)
        .await
        .context("failed to run migrations")?;
    tracing::info!("database migrations complete");

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
    let router = routes::build_router(&db, &config)?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("could not bind {addr}"))?;

    tracing::info!(
        app = %config.app_name,
        deployment = %config.deployment.to_uppercase(),
        %addr,
        "listening"
    );
    axum::serve(listener, router.into_make_service())
        .await
        .context("server error")?;
    Ok(())
}
