//! The visitor's favorites: an ordered set of menu-item ids persisted
//! through an injected storage backend.
//!
//! [`FavoriteSet`] is the plain value type. [`FavoritesStore`] wraps it with
//! the persistence protocol: load once, then flush the full set after every
//! mutation. Mutations that arrive before the initial load are queued and
//! applied right after it, so an early toggle is never lost and never
//! clobbers the persisted payload with a half-initialized set.
//!
//! Unreadable payloads (missing key, invalid JSON, wrong shape) load as an
//! empty set. Backend read/write failures are real errors and surface from
//! the call that hit them.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::MenuItemId;

/// The fixed key favorites are persisted under.
pub const FAVORITES_STORAGE_KEY: &str = "healthy-corner-favorites";

/// A storage backend failed to read or write.
#[derive(Debug, Error)]
#[error("favorites storage failed: {message}")]
pub struct StorageError {
    message: String,
}

impl StorageError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Durable key/value storage the store persists through.
///
/// The site backs this with the visitor's session; tests use
/// [`MemoryBackend`].
pub trait FavoritesBackend: Send + Sync {
    /// Read the raw payload stored under `key`, if any.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, StorageError>> + Send;

    /// Durably store `value` under `key`, replacing any previous payload.
    fn set(&self, key: &str, value: String) -> impl Future<Output = Result<(), StorageError>> + Send;
}

/// In-memory backend for tests and tools.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend already holding `value` under `key`.
    #[must_use]
    pub fn seeded(key: &str, value: &str) -> Self {
        let backend = Self::new();
        if let Ok(mut entries) = backend.entries.lock() {
            entries.insert(key.to_owned(), value.to_owned());
        }
        backend
    }

    /// Peek at the stored payload. Test assertions only.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }
}

impl FavoritesBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| StorageError::new("memory backend lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StorageError::new("memory backend lock poisoned"))?;
        entries.insert(key.to_owned(), value);
        Ok(())
    }
}

/// An ordered, duplicate-free sequence of favorited item ids.
///
/// Order is insertion order; it is what the favorites page renders in and
/// what gets serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FavoriteSet {
    ids: Vec<MenuItemId>,
}

impl FavoriteSet {
    #[must_use]
    pub const fn new() -> Self {
        Self { ids: Vec::new() }
    }

    /// Build from ids, keeping the first occurrence of any duplicate.
    #[must_use]
    pub fn from_ids(ids: Vec<MenuItemId>) -> Self {
        let mut set = Self::new();
        for id in ids {
            set.insert(id);
        }
        set
    }

    /// Parse a persisted payload. Anything unreadable loads as empty.
    #[must_use]
    pub fn from_json(raw: &str) -> Self {
        serde_json::from_str::<Vec<MenuItemId>>(raw).map_or_else(|_| Self::new(), Self::from_ids)
    }

    /// Serialize for persistence: a JSON array of id strings.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.ids).unwrap_or_else(|_| "[]".to_owned())
    }

    /// Append `id` if absent. Returns whether the set changed.
    pub fn insert(&mut self, id: MenuItemId) -> bool {
        if self.contains(&id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    /// Drop `id` if present. Returns whether the set changed.
    pub fn remove(&mut self, id: &MenuItemId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|existing| existing != id);
        self.ids.len() != before
    }

    /// Flip membership of `id`. Returns whether it is now present.
    pub fn toggle(&mut self, id: MenuItemId) -> bool {
        if self.remove(&id) {
            false
        } else {
            self.ids.push(id);
            true
        }
    }

    #[must_use]
    pub fn contains(&self, id: &MenuItemId) -> bool {
        self.ids.contains(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[MenuItemId] {
        &self.ids
    }

    pub fn iter(&self) -> impl Iterator<Item = &MenuItemId> {
        self.ids.iter()
    }
}

#[derive(Debug, Clone, Copy)]
enum Mutation {
    Add(MenuItemId),
    Remove(MenuItemId),
    Toggle(MenuItemId),
}

fn apply(set: &mut FavoriteSet, mutation: Mutation) {
    match mutation {
        Mutation::Add(id) => {
            set.insert(id);
        }
        Mutation::Remove(id) => {
            set.remove(&id);
        }
        Mutation::Toggle(id) => {
            set.toggle(id);
        }
    }
}

#[derive(Debug)]
enum StoreState {
    /// Before the first load. `projected` is the provisional view observers
    /// see: the queued mutations applied to an empty set.
    Pending {
        queued: Vec<Mutation>,
        projected: FavoriteSet,
    },
    Ready(FavoriteSet),
}

/// The favorites store: a [`FavoriteSet`] bound to a storage backend.
///
/// Call [`load`](Self::load) before anything else; until it completes the
/// store is not ready and mutations are deferred. After ready, every
/// mutation that changes the set re-serializes it to the backend before
/// returning.
#[derive(Debug)]
pub struct FavoritesStore<B> {
    backend: B,
    key: String,
    state: StoreState,
}

impl<B: FavoritesBackend> FavoritesStore<B> {
    /// A store over `backend` using the standard storage key.
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self::with_key(backend, FAVORITES_STORAGE_KEY)
    }

    /// A store over `backend` using a custom storage key.
    #[must_use]
    pub fn with_key(backend: B, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
            state: StoreState::Pending {
                queued: Vec::new(),
                projected: FavoriteSet::new(),
            },
        }
    }

    /// Whether the initial load has completed.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self.state, StoreState::Ready(_))
    }

    /// Read and deserialize the persisted set, then apply any queued
    /// mutations in call order and flush once if there were any.
    /// Idempotent: a second call is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend read (or the queued-mutation
    /// flush) fails; queued mutations stay queued in that case.
    pub async fn load(&mut self) -> Result<(), StorageError> {
        if self.is_ready() {
            return Ok(());
        }

        let raw = self.backend.get(&self.key).await?;
        let mut set = raw.as_deref().map(FavoriteSet::from_json).unwrap_or_default();

        let queued = match &mut self.state {
            StoreState::Pending { queued, .. } => std::mem::take(queued),
            StoreState::Ready(_) => Vec::new(),
        };
        let had_deferred = !queued.is_empty();
        for mutation in queued {
            apply(&mut set, mutation);
        }

        self.state = StoreState::Ready(set);
        if had_deferred {
            self.flush().await?;
        }
        Ok(())
    }

    /// Append `id` to the favorites.
    ///
    /// # Errors
    ///
    /// Returns an error when the post-mutation flush fails.
    pub async fn add(&mut self, id: MenuItemId) -> Result<(), StorageError> {
        let changed = match &mut self.state {
            StoreState::Pending { queued, projected } => {
                queued.push(Mutation::Add(id));
                projected.insert(id);
                false
            }
            StoreState::Ready(set) => set.insert(id),
        };
        if changed { self.flush().await } else { Ok(()) }
    }

    /// Remove `id` from the favorites.
    ///
    /// # Errors
    ///
    /// Returns an error when the post-mutation flush fails.
    pub async fn remove(&mut self, id: &MenuItemId) -> Result<(), StorageError> {
        let changed = match &mut self.state {
            StoreState::Pending { queued, projected } => {
                queued.push(Mutation::Remove(*id));
                projected.remove(id);
                false
            }
            StoreState::Ready(set) => set.remove(id),
        };
        if changed { self.flush().await } else { Ok(()) }
    }

    /// Flip membership of `id` and report whether it is now a favorite.
    /// Before the initial load the report is provisional: it reflects only
    /// the mutations queued so far.
    ///
    /// # Errors
    ///
    /// Returns an error when the post-mutation flush fails.
    pub async fn toggle(&mut self, id: MenuItemId) -> Result<bool, StorageError> {
        let (now_present, flush) = match &mut self.state {
            StoreState::Pending { queued, projected } => {
                queued.push(Mutation::Toggle(id));
                (projected.toggle(id), false)
            }
            StoreState::Ready(set) => {
                let now_present = set.toggle(id);
                (now_present, true)
            }
        };
        if flush {
            self.flush().await?;
        }
        Ok(now_present)
    }

    /// Whether `id` is currently favorited (provisional before ready).
    #[must_use]
    pub fn has(&self, id: &MenuItemId) -> bool {
        self.view().contains(id)
    }

    /// The favorited ids in insertion order (provisional before ready).
    #[must_use]
    pub fn list(&self) -> &[MenuItemId] {
        self.view().as_slice()
    }

    /// The current set (provisional before ready).
    #[must_use]
    pub const fn view(&self) -> &FavoriteSet {
        match &self.state {
            StoreState::Pending { projected, .. } => projected,
            StoreState::Ready(set) => set,
        }
    }

    async fn flush(&self) -> Result<(), StorageError> {
        let StoreState::Ready(set) = &self.state else {
            return Ok(());
        };
        self.backend.set(&self.key, set.to_json()).await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn id(n: u128) -> MenuItemId {
        MenuItemId::new(uuid::Uuid::from_u128(n))
    }

    struct ReadOnlyBackend;

    impl FavoritesBackend for ReadOnlyBackend {
        async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        async fn set(&self, _key: &str, _value: String) -> Result<(), StorageError> {
            Err(StorageError::new("write refused"))
        }
    }

    #[tokio::test]
    async fn missing_payload_loads_empty() {
        let mut store = FavoritesStore::new(MemoryBackend::new());
        assert!(!store.is_ready());
        store.load().await.unwrap();
        assert!(store.is_ready());
        assert!(store.list().is_empty());
    }

    #[tokio::test]
    async fn corrupt_payloads_load_empty() {
        for raw in ["not json at all", "{\"ids\": 3}", "[1, 2, 3]"] {
            let backend = MemoryBackend::seeded(FAVORITES_STORAGE_KEY, raw);
            let mut store = FavoritesStore::new(backend);
            store.load().await.unwrap();
            assert!(store.list().is_empty(), "payload {raw:?} should load empty");
        }
    }

    #[tokio::test]
    async fn duplicate_ids_in_payload_keep_first_occurrence() {
        let payload = serde_json::to_string(&[id(1), id(2), id(1)]).unwrap();
        let backend = MemoryBackend::seeded(FAVORITES_STORAGE_KEY, &payload);
        let mut store = FavoritesStore::new(backend);
        store.load().await.unwrap();
        assert_eq!(store.list(), &[id(1), id(2)]);
    }

    #[tokio::test]
    async fn mutations_flush_the_full_set() {
        let backend = MemoryBackend::new();
        let mut store = FavoritesStore::new(backend.clone());
        store.load().await.unwrap();

        store.add(id(1)).await.unwrap();
        store.add(id(2)).await.unwrap();
        assert_eq!(
            backend.raw(FAVORITES_STORAGE_KEY).unwrap(),
            serde_json::to_string(&[id(1), id(2)]).unwrap()
        );

        store.remove(&id(1)).await.unwrap();
        assert_eq!(
            backend.raw(FAVORITES_STORAGE_KEY).unwrap(),
            serde_json::to_string(&[id(2)]).unwrap()
        );
    }

    #[tokio::test]
    async fn duplicate_add_is_a_no_op() {
        let backend = MemoryBackend::new();
        let mut store = FavoritesStore::new(backend.clone());
        store.load().await.unwrap();

        store.add(id(7)).await.unwrap();
        store.add(id(7)).await.unwrap();
        assert_eq!(store.list(), &[id(7)]);
    }

    #[tokio::test]
    async fn toggle_twice_restores_set_and_payload() {
        let payload = serde_json::to_string(&[id(1), id(2)]).unwrap();
        let backend = MemoryBackend::seeded(FAVORITES_STORAGE_KEY, &payload);
        let mut store = FavoritesStore::new(backend.clone());
        store.load().await.unwrap();

        assert!(store.toggle(id(9)).await.unwrap());
        assert!(store.has(&id(9)));
        assert!(!store.toggle(id(9)).await.unwrap());
        assert!(!store.has(&id(9)));

        assert_eq!(store.list(), &[id(1), id(2)]);
        assert_eq!(backend.raw(FAVORITES_STORAGE_KEY).unwrap(), payload);
    }

    #[tokio::test]
    async fn early_mutations_are_deferred_then_applied_in_order() {
        let payload = serde_json::to_string(&[id(1)]).unwrap();
        let backend = MemoryBackend::seeded(FAVORITES_STORAGE_KEY, &payload);
        let mut store = FavoritesStore::new(backend.clone());

        store.toggle(id(2)).await.unwrap();
        store.add(id(3)).await.unwrap();
        // Provisional view: only what was queued.
        assert!(store.has(&id(2)));
        assert!(!store.has(&id(1)));
        // Nothing flushed before the load completes.
        assert_eq!(backend.raw(FAVORITES_STORAGE_KEY).unwrap(), payload);

        store.load().await.unwrap();
        assert_eq!(store.list(), &[id(1), id(2), id(3)]);
        assert_eq!(
            backend.raw(FAVORITES_STORAGE_KEY).unwrap(),
            serde_json::to_string(&[id(1), id(2), id(3)]).unwrap()
        );
    }

    #[tokio::test]
    async fn load_is_idempotent() {
        let backend = MemoryBackend::seeded(
            FAVORITES_STORAGE_KEY,
            &serde_json::to_string(&[id(5)]).unwrap(),
        );
        let mut store = FavoritesStore::new(backend.clone());
        store.load().await.unwrap();
        store.add(id(6)).await.unwrap();

        // A second load must not re-read and clobber live state.
        backend
            .set(FAVORITES_STORAGE_KEY, "[]".to_owned())
            .await
            .unwrap();
        store.load().await.unwrap();
        assert_eq!(store.list(), &[id(5), id(6)]);
    }

    #[tokio::test]
    async fn backend_write_failures_surface_from_the_mutation() {
        let mut store = FavoritesStore::new(ReadOnlyBackend);
        store.load().await.unwrap();
        assert!(store.add(id(1)).await.is_err());
    }

    #[tokio::test]
    async fn custom_keys_are_respected() {
        let backend = MemoryBackend::new();
        let mut store = FavoritesStore::with_key(backend.clone(), "guest-favorites");
        store.load().await.unwrap();
        store.add(id(4)).await.unwrap();
        assert!(backend.raw("guest-favorites").is_some());
        assert!(backend.raw(FAVORITES_STORAGE_KEY).is_none());
    }
}
