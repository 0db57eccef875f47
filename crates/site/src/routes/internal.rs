//! Internal maintenance hooks.

use axum::extract::State;
use axum::http::StatusCode;
use tracing::{info, instrument};

use crate::state::AppState;

/// POST /internal/refresh - Request a menu cache refresh.
///
/// Data-change webhooks fire once per changed row, so a bulk menu edit
/// arrives as a burst. The refresher debounces the burst into a single
/// upstream reload after it settles; 202 means "noted", not "done".
#[instrument(skip(state))]
pub async fn refresh(State(state): State<AppState>) -> StatusCode {
    info!("Cache refresh requested");
    state.refresher().call(());
    StatusCode::ACCEPTED
}
