//! Route-level error handling.
//!
//! Handlers return [`Result<T>`]; on the error path [`AppError`] decides
//! the status code, reports server faults to Sentry, and keeps response
//! bodies free of upstream detail.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use healthy_corner_core::StorageError;

use crate::supabase::SupabaseError;

/// Application-level error type for the site.
#[derive(Debug, Error)]
pub enum AppError {
    /// Supabase REST operation failed.
    #[error("Supabase error: {0}")]
    Supabase(#[from] SupabaseError),

    /// Favorites storage operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The requested page or row does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The client sent something we refuse to process.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The client tripped a rate limiter.
    #[error("Rate limited")]
    RateLimited,

    /// A failure the client can do nothing about.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry; a missing row is not an incident
        let is_server_error = match &self {
            Self::Supabase(err) => !matches!(err, SupabaseError::NotFound(_)),
            Self::Storage(_) | Self::Internal(_) => true,
            Self::NotFound(_) | Self::BadRequest(_) | Self::RateLimited => false,
        };
        if is_server_error {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Supabase(SupabaseError::NotFound(_)) | Self::NotFound(_) => {
                StatusCode::NOT_FOUND
            }
            Self::Supabase(SupabaseError::RateLimited(_)) | Self::RateLimited => {
                StatusCode::TOO_MANY_REQUESTS
            }
            Self::Supabase(_) => StatusCode::BAD_GATEWAY,
            Self::Storage(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Bodies stay generic; detail goes to the log and Sentry only
        let message = match &self {
            Self::Supabase(SupabaseError::NotFound(_)) | Self::NotFound(_) => {
                "Not found".to_string()
            }
            Self::Supabase(_) => "Menu data is temporarily unavailable".to_string(),
            Self::Storage(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::RateLimited => "Too many requests".to_string(),
            Self::BadRequest(_) => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Record a visitor action as a Sentry breadcrumb.
///
/// Breadcrumbs show up in error reports as the trail leading to the
/// failure; handlers leave one per page view and favorite toggle.
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    sentry::add_breadcrumb(sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        data: data
            .unwrap_or_default()
            .iter()
            .map(|(key, value)| {
                (
                    (*key).to_string(),
                    serde_json::Value::String((*value).to_string()),
                )
            })
            .collect(),
        ..Default::default()
    });
}
