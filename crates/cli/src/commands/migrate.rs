//! Session table migration.
//!
//! The site only writes one thing to `PostgreSQL`: tower-sessions rows.
//! This command creates the session table via the store's own migration
//! so the schema always matches the library version in use.
//!
//! # Usage
//!
//! ```bash
//! hc-cli migrate
//! ```
//!
//! Reads `SITE_DATABASE_URL` from the environment (or `.env`), the same
//! way the site binary does.

use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;
use tower_sessions_sqlx_store::PostgresStore;

use healthy_corner_site::config::{ConfigError, SiteConfig};

#[derive(Debug, thiserror::Error)]
pub enum MigrateError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Create the tower-sessions table in the site database.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the database is
/// unreachable.
pub async fn run() -> Result<(), MigrateError> {
    let config = SiteConfig::from_env()?;

    tracing::info!("Connecting to site database...");
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(config.database_url.expose_secret())
        .await?;

    tracing::info!("Creating session table...");
    PostgresStore::new(pool).migrate().await?;

    tracing::info!("Session table ready");
    Ok(())
}
