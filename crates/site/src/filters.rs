//! Askama filters used by the shared layout.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Fingerprint of the compiled stylesheet, baked in by `build.rs`.
///
/// The base layout links `main.{hash}.css` so the CSS can be cached
/// forever and still bust on deploy. Used as `{{ ""|css_hash }}`
/// (Askama filters always take an input value, hence the empty string).
#[askama::filter_fn]
pub fn css_hash(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<&'static str> {
    Ok(env!("CSS_HASH"))
}

/// Current year, for the footer copyright line: `{{ ""|current_year }}`.
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}
