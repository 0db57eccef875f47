//! Session database pool.
//!
//! Menu data lives in the hosted Supabase store; the local `PostgreSQL`
//! database holds nothing but the tower-sessions table, created by
//! `hc-cli migrate`.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Open the session pool.
///
/// Sessions are a light workload; a small pool with a short acquire
/// deadline keeps a struggling database from hanging page loads.
///
/// # Errors
///
/// Returns `sqlx::Error` when the initial connection fails.
pub async fn create_pool(database_url: &SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url.expose_secret())
        .await
}
