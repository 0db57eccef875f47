//! The Healthy Corner - Restaurant site for Nouakchott, Mauritania.
//!
//! This binary serves the public site on port 3000.
//!
//! # Architecture
//!
//! - Axum, with HTMX driving partial page updates
//! - Server-rendered Askama templates
//! - Supabase (`PostgREST`) for menu, services, and achievements data
//! - `PostgreSQL` for session storage (favorites live in the session)
//!
//! # Security
//!
//! The process holds two credentials only:
//! - The Supabase anon key, which RLS restricts to reads
//! - The session database URL
//!
//! It does NOT hold any Supabase service-role credentials; menu content
//! is managed directly in Supabase and picked up via `/internal/refresh`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::borrow::Cow;
use std::path::Path;

use healthy_corner_site::config::SiteConfig;
use healthy_corner_site::{app, db, middleware, state::AppState};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// The returned guard flushes pending events on drop and must live for
/// the whole process.
fn init_sentry(config: &SiteConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_deref()?;

    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config.sentry_environment.clone().map(Cow::Owned),
            sample_rate: config.sentry_sample_rate,
            traces_sample_rate: config.sentry_traces_sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    )))
}

/// Warnings and errors become Sentry events, info and debug the
/// breadcrumbs attached to them.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "healthy_corner_site=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let config = SiteConfig::from_env().expect("Failed to load configuration");

    // Sentry first so the tracing layer can hand events to it
    let sentry_guard = init_sentry(&config);
    init_tracing();
    if sentry_guard.is_some() {
        tracing::info!("Sentry error tracking enabled");
    }

    let pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to open the session database pool");
    tracing::info!("Session database pool ready");

    // The session table is NOT migrated here; run hc-cli migrate first.

    // Page copy is loaded from the site crate's `content/` directory
    let content_dir = Path::new("crates/site/content");
    let state = AppState::new(config.clone(), pool, content_dir)
        .expect("Failed to build application state");

    let session_layer = middleware::create_session_layer(state.pool(), state.config());

    // Sentry's tower layers go outermost for full request coverage
    let app = app(state, session_layer, Path::new("crates/site/static"))
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");
    tracing::info!("site listening on {}", addr);

    // ConnectInfo feeds the rate limiter's peer-address fallback
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .expect("Server error");
}

/// Resolve on Ctrl+C or SIGTERM, whichever lands first.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
