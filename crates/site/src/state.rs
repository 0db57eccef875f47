//! Shared state handed to every handler.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;

use crate::config::SiteConfig;
use crate::content::{ContentError, ContentStore};
use crate::debounce::Debouncer;
use crate::supabase::{SupabaseClient, SupabaseError};

/// How long refresh requests are coalesced before the menu cache is
/// actually dropped and re-warmed.
const REFRESH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Error creating application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("supabase client error: {0}")]
    Supabase(#[from] SupabaseError),
    #[error("content error: {0}")]
    Content(#[from] ContentError),
}

/// Everything a handler can reach: configuration, the session pool,
/// the Supabase client, page content, and the cache refresher.
///
/// Clones are cheap; the fields live behind one `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: SiteConfig,
    pool: PgPool,
    supabase: SupabaseClient,
    content: ContentStore,
    refresher: Debouncer<()>,
}

impl AppState {
    /// Build the state, connecting the Supabase client and loading the
    /// markdown pages under `content_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the Supabase client cannot be built or the
    /// content directory cannot be read.
    pub fn new(config: SiteConfig, pool: PgPool, content_dir: &Path) -> Result<Self, StateError> {
        let supabase = SupabaseClient::new(&config.supabase)?;
        let content = ContentStore::load(content_dir)?;
        let refresher = build_refresher(supabase.clone());

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                supabase,
                content,
                refresher,
            }),
        })
    }

    /// The site configuration.
    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.inner.config
    }

    /// The session database pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// The Supabase REST client.
    #[must_use]
    pub fn supabase(&self) -> &SupabaseClient {
        &self.inner.supabase
    }

    /// The markdown page store.
    #[must_use]
    pub fn content(&self) -> &ContentStore {
        &self.inner.content
    }

    /// The debounced cache refresher.
    #[must_use]
    pub fn refresher(&self) -> &Debouncer<()> {
        &self.inner.refresher
    }
}

/// Build the debounced action behind the refresh endpoint.
///
/// Dropping the cache is cheap; the re-warm keeps the next visitor from
/// paying for the category list every page renders.
fn build_refresher(supabase: SupabaseClient) -> Debouncer<()> {
    Debouncer::new(REFRESH_DEBOUNCE, move |()| {
        let client = supabase.clone();
        tokio::spawn(async move {
            client.invalidate_all();
            if let Err(e) = client.root_categories().await {
                tracing::warn!("Cache re-warm failed: {e}");
            }
            tracing::info!("Menu cache refreshed");
        });
    })
}
