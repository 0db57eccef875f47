//! Healthy Corner Core - Shared types and menu logic.
//!
//! This crate provides the domain types and pure menu logic used across all
//! Healthy Corner components:
//! - `site` - Public-facing menu website
//! - `cli` - Command-line tools for migrations and diagnostics
//!
//! # Architecture
//!
//! The core crate contains only types, traits, and pure logic - no I/O, no
//! database access, no HTTP clients. Storage for the favorites store is
//! injected through the [`favorites::FavoritesBackend`] trait, so the crate
//! can be used anywhere and tested without a running service.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, money, and the hosted-store record types
//! - [`filter`] - The menu filter predicate and its spec
//! - [`sort`] - Sort keys and stable comparator-driven ordering
//! - [`favorites`] - The favorites set and its backend-injected store
//! - [`format`] - Small text helpers shared by the site views

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod favorites;
pub mod filter;
pub mod format;
pub mod sort;
pub mod types;

pub use favorites::{
    FAVORITES_STORAGE_KEY, FavoriteSet, FavoritesBackend, FavoritesStore, MemoryBackend,
    StorageError,
};
pub use filter::{Bounds, FilterSpec, matches};
pub use sort::{SortKey, sort_items};
pub use types::*;
