//! HTTP route handlers for the menu site.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (session database)
//!
//! # Menu
//! GET  /categories/{slug}      - Category page with filter panel
//! GET  /categories/{slug}/grid - Filtered item grid fragment (HTMX)
//! GET  /menu/{slug}            - Item detail
//!
//! # Search
//! GET  /search                 - Search page
//! GET  /search/suggest         - Live results fragment (HTMX, rate limited)
//!
//! # Favorites (HTMX fragments)
//! GET  /favorites              - Saved items page
//! POST /favorites/toggle       - Flip one item (returns heart button, triggers favorites-updated)
//! GET  /favorites/count        - Header badge fragment
//!
//! # Pages
//! GET  /about                  - Story and achievements timeline
//! GET  /services               - Service listing
//! GET  /contact                - Contact details and hours
//!
//! # Internal
//! POST /internal/refresh       - Debounced menu cache refresh (rate limited)
//! ```

pub mod categories;
pub mod favorites;
pub mod health;
pub mod home;
pub mod internal;
pub mod menu;
pub mod pages;
pub mod search;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::{mutation_rate_limiter, suggest_rate_limiter};
use crate::state::AppState;

/// Create the category routes router.
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/{slug}", get(categories::show))
        .route("/{slug}/grid", get(categories::grid))
}

/// Create the search routes router.
pub fn search_routes() -> Router<AppState> {
    Router::new().route("/", get(search::page)).route(
        "/suggest",
        get(search::suggest).layer(suggest_rate_limiter()),
    )
}

/// Create the favorites routes router.
pub fn favorites_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(favorites::index))
        .route(
            "/toggle",
            post(favorites::toggle).layer(mutation_rate_limiter()),
        )
        .route("/count", get(favorites::count))
}

/// Create the internal maintenance routes router.
pub fn internal_routes() -> Router<AppState> {
    Router::new().route(
        "/refresh",
        post(internal::refresh).layer(mutation_rate_limiter()),
    )
}

/// Create all routes for the site.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Category pages and grid fragments
        .nest("/categories", category_routes())
        // Item detail
        .route("/menu/{slug}", get(menu::show))
        // Search
        .nest("/search", search_routes())
        // Favorites
        .nest("/favorites", favorites_routes())
        // Static pages
        .route("/about", get(pages::about))
        .route("/services", get(pages::services))
        .route("/contact", get(pages::contact))
        // Internal maintenance hooks
        .nest("/internal", internal_routes())
}

#[cfg(test)]
pub(crate) mod test_support {
    #![allow(clippy::unwrap_used)]

    use healthy_corner_core::MenuItem;

    /// A minimal store row; serde fills in the flags and nullable columns.
    pub fn sample_item(name: &str) -> MenuItem {
        serde_json::from_value(serde_json::json!({
            "id": uuid::Uuid::new_v4().to_string(),
            "name": name,
            "slug": healthy_corner_core::format::slugify(name),
            "category_id": uuid::Uuid::new_v4().to_string(),
            "price": 50,
        }))
        .unwrap()
    }
}
