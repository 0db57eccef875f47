//! Core types for The Healthy Corner.
//!
//! This module provides type-safe wrappers for common domain concepts and
//! the record types served by the hosted data store.

pub mod id;
pub mod menu;
pub mod price;

pub use id::*;
pub use menu::*;
pub use price::{CurrencyCode, Price};
