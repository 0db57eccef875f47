//! Connectivity diagnostics.
//!
//! Walks every dependency the site binary needs at startup and reports
//! what works. Run this on a fresh deployment before starting the site.
//!
//! # Usage
//!
//! ```bash
//! hc-cli check
//! ```

use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;

use healthy_corner_site::config::{ConfigError, SiteConfig};
use healthy_corner_site::supabase::{SupabaseClient, SupabaseError};

#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Supabase error: {0}")]
    Supabase(#[from] SupabaseError),
}

/// Run connectivity diagnostics against every dependency.
///
/// # Errors
///
/// Returns the first failure encountered: configuration, database, or
/// Supabase.
pub async fn run() -> Result<(), CheckError> {
    let config = SiteConfig::from_env()?;

    #[allow(clippy::print_stdout)]
    {
        println!("Configuration   ok");
        println!("  base url      {}", config.base_url);
        println!("  supabase      {}", config.supabase.project_url);
    }

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(config.database_url.expose_secret())
        .await?;
    sqlx::query("SELECT 1").fetch_one(&pool).await?;

    // The session table lives in the schema the store's migration creates
    let session_table: bool =
        sqlx::query_scalar("SELECT to_regclass('tower_sessions.session') IS NOT NULL")
            .fetch_one(&pool)
            .await?;

    #[allow(clippy::print_stdout)]
    {
        if session_table {
            println!("Database        ok (session table present)");
        } else {
            println!("Database        ok (session table MISSING, run: hc-cli migrate)");
        }
    }

    let client = SupabaseClient::new(&config.supabase)?;
    let categories = client.root_categories().await?;

    #[allow(clippy::print_stdout)]
    {
        println!("Supabase        ok ({} categories)", categories.len());
    }

    Ok(())
}
