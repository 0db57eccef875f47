//! Session-backed favorites persistence.
//!
//! Favorites belong to the browser, not to an account: the store's fixed
//! key maps onto a value in the visitor's server-side session, so the set
//! survives navigation and restarts for as long as the session cookie does.

use tower_sessions::Session;

use healthy_corner_core::{FavoritesBackend, FavoritesStore, StorageError};

/// Favorites backend over the visitor's session.
#[derive(Clone)]
pub struct SessionBackend {
    session: Session,
}

impl SessionBackend {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }
}

impl FavoritesBackend for SessionBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.session
            .get::<String>(key)
            .await
            .map_err(|e| StorageError::new(e.to_string()))
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.session
            .insert(key, value)
            .await
            .map_err(|e| StorageError::new(e.to_string()))
    }
}

/// Build and load the favorites store for this request's session.
///
/// Handlers call this once per request; the session record itself is
/// cached by the session middleware, so repeated loads are cheap.
///
/// # Errors
///
/// Returns an error if the session store cannot be read.
pub async fn session_favorites(
    session: Session,
) -> Result<FavoritesStore<SessionBackend>, StorageError> {
    let mut store = FavoritesStore::new(SessionBackend::new(session));
    store.load().await?;
    Ok(store)
}
