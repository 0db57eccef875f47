//! Visitor sessions.
//!
//! `PostgreSQL`-backed tower-sessions, with the cookie signed so a visitor
//! cannot forge another session's id. The only state the site keeps per
//! visitor is the favorites set.

use secrecy::ExposeSecret;
use sqlx::PgPool;
use tower_sessions::cookie::time::Duration;
use tower_sessions::{Expiry, SessionManagerLayer, cookie::Key, service::SignedCookie};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::SiteConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "hc_session";

/// Favorites live in the session, so a short expiry would silently wipe
/// a returning visitor's saved items.
const SESSION_TTL: Duration = Duration::days(30);

/// Build the production session layer over the given pool.
///
/// The session table is created by `hc-cli migrate`, not at startup.
///
/// # Panics
///
/// `Key::derive_from` panics when given fewer than 32 bytes of key
/// material. Configuration validation rejects session secrets shorter
/// than 32 characters at startup, so that cannot happen here.
#[must_use]
pub fn create_session_layer(
    pool: &PgPool,
    config: &SiteConfig,
) -> SessionManagerLayer<PostgresStore, SignedCookie> {
    let store = PostgresStore::new(pool.clone());
    let key = Key::derive_from(config.session_secret.expose_secret().as_bytes());

    // Plain-http local runs cannot set Secure cookies
    let https = config.base_url.starts_with("https://");

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(SESSION_TTL))
        .with_secure(https)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
        .with_signed(key)
}
