//! The Healthy Corner site library.
//!
//! This crate provides the site functionality as a library, allowing the
//! full router to be driven end to end by the integration-tests crate.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod content;
pub mod db;
pub mod debounce;
pub mod error;
pub mod favorites;
pub mod filters;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod supabase;

use std::path::Path;

use axum::body::Body;
use axum::http::Request;
use axum::{Router, routing::get};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tower_sessions::{SessionManagerLayer, SessionStore, service::SignedCookie};

use crate::state::AppState;

/// Assemble the site router with its full middleware stack.
///
/// The session layer is injected so tests can run against an in-memory
/// store; production wires the Postgres-backed layer from
/// [`middleware::create_session_layer`]. Sentry's tower layers are added
/// by the binary, outermost.
///
/// Static files are nested after the security headers layer on purpose:
/// every page renders per-session state and must not be cached, but the
/// fingerprinted assets under `/static` should be.
pub fn app<Store>(
    state: AppState,
    session_layer: SessionManagerLayer<Store, SignedCookie>,
    static_dir: &Path,
) -> Router
where
    Store: SessionStore + Clone,
{
    Router::new()
        .route("/health", get(routes::health::health))
        .route("/health/ready", get(routes::health::readiness))
        .merge(routes::routes())
        .layer(session_layer)
        .layer(axum::middleware::from_fn(
            middleware::security_headers_middleware,
        ))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .with_state(state)
}

/// Root request span; the request-id middleware fills in `request_id`.
fn make_request_span(request: &Request<Body>) -> tracing::Span {
    tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = tracing::field::Empty,
    )
}
