//! The Healthy Corner CLI - Database migrations and diagnostics.
//!
//! # Usage
//!
//! ```bash
//! # Create the session table in the site database
//! hc-cli migrate
//!
//! # Verify configuration, database, and Supabase connectivity
//! hc-cli check
//! ```
//!
//! # Commands
//!
//! - `migrate` - Create the tower-sessions table
//! - `check` - Run connectivity diagnostics against every dependency

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "hc-cli")]
#[command(author, version, about = "The Healthy Corner CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the session table in the site database
    Migrate,
    /// Verify configuration, database, and Supabase connectivity
    Check,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let outcome: Result<(), Box<dyn std::error::Error>> = match Cli::parse().command {
        Commands::Migrate => commands::migrate::run().await.map_err(Into::into),
        Commands::Check => commands::check::run().await.map_err(Into::into),
    };

    if let Err(e) = outcome {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}
