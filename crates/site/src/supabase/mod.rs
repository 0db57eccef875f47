//! Supabase REST (`PostgREST`) client for the hosted menu data store.
//!
//! # Architecture
//!
//! - Plain `reqwest` calls against the `PostgREST` endpoints under
//!   `/rest/v1/` with the anon key
//! - The data store is read-only from the site's perspective
//! - In-memory caching via `moka` for responses (5 minute TTL); searches
//!   are never cached
//!
//! # Example
//!
//! ```rust,ignore
//! use healthy_corner_site::supabase::SupabaseClient;
//!
//! let client = SupabaseClient::new(&config.supabase)?;
//!
//! // Get a menu item
//! let item = client.item_by_slug("grilled-chicken-bowl").await?;
//!
//! // Search the menu
//! let matches = client.search_items("chicken", 50).await?;
//! ```

mod cache;
mod client;

pub use client::SupabaseClient;

use thiserror::Error;

/// Errors that can occur when talking to the Supabase REST API.
#[derive(Debug, Error)]
pub enum SupabaseError {
    /// Joining a path or query onto the project URL failed.
    #[error("Could not build request URL: {0}")]
    Url(#[from] url::ParseError),

    /// The request never completed (connect, timeout, TLS).
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// `PostgREST` answered with a non-success status.
    #[error("Supabase returned {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    /// Supabase asked the client to back off (HTTP 429).
    #[error("Rate limited, back off for {0}s")]
    RateLimited(u64),

    /// The response body did not match the expected JSON shape.
    #[error("Unexpected response body: {0}")]
    Parse(#[from] serde_json::Error),

    /// The query matched no rows.
    #[error("No such {0}")]
    NotFound(String),
}
