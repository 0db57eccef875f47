//! Favorites route handlers (HTMX fragments + page).
//!
//! The heart button posts to the toggle endpoint, which returns the
//! swapped button and fires `favorites-updated` so the header badge
//! refreshes itself.

use std::collections::HashMap;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{AppendHeaders, Html, IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{error, instrument};

use healthy_corner_core::{MenuItem, MenuItemId};

use crate::error::{Result, add_breadcrumb};
use crate::favorites::session_favorites;
use crate::filters;
use crate::routes::menu::ItemCardView;
use crate::state::AppState;

/// Form payload for toggling a favorite.
#[derive(Debug, Deserialize)]
pub struct ToggleForm {
    pub id: String,
}

/// Favorites page template.
#[derive(Template, WebTemplate)]
#[template(path = "favorites/index.html")]
pub struct FavoritesTemplate {
    pub items: Vec<ItemCardView>,
}

/// Favorite heart button fragment.
#[derive(Template, WebTemplate)]
#[template(path = "partials/favorite_button.html")]
pub struct FavoriteButtonTemplate {
    pub id: String,
    pub is_favorite: bool,
}

/// Favorites count badge fragment.
#[derive(Template, WebTemplate)]
#[template(path = "partials/favorites_count.html")]
pub struct FavoritesCountTemplate {
    pub count: usize,
}

/// GET /favorites - Saved items page.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
) -> Result<FavoritesTemplate> {
    let store = session_favorites(session).await?;
    let ids = store.list();

    if ids.is_empty() {
        return Ok(FavoritesTemplate { items: Vec::new() });
    }

    let fetched = state.supabase().items_by_ids(ids).await?;
    let items = in_saved_order(ids, fetched)
        .iter()
        .map(|item| ItemCardView::from_item(item, store.view()))
        .collect();

    Ok(FavoritesTemplate { items })
}

/// POST /favorites/toggle - Flip one item (HTMX).
///
/// Returns the updated heart button and triggers `favorites-updated`.
#[instrument(skip(session))]
pub async fn toggle(session: Session, Form(form): Form<ToggleForm>) -> Response {
    let Ok(id) = MenuItemId::parse(&form.id) else {
        return (
            StatusCode::BAD_REQUEST,
            Html(r#"<span class="state-error">Unknown item</span>"#),
        )
            .into_response();
    };

    let mut store = match session_favorites(session).await {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to load favorites: {e}");
            return error_fragment();
        }
    };

    match store.toggle(id).await {
        Ok(is_favorite) => {
            add_breadcrumb("favorites", "Toggled favorite", Some(&[("id", &form.id)]));
            (
                AppendHeaders([("HX-Trigger", "favorites-updated")]),
                FavoriteButtonTemplate {
                    id: form.id,
                    is_favorite,
                },
            )
                .into_response()
        }
        Err(e) => {
            error!("Failed to persist favorites: {e}");
            error_fragment()
        }
    }
}

/// GET /favorites/count - Header badge fragment (HTMX).
#[instrument(skip(session))]
pub async fn count(session: Session) -> Response {
    match session_favorites(session).await {
        Ok(store) => FavoritesCountTemplate {
            count: store.list().len(),
        }
        .into_response(),
        Err(e) => {
            // The badge is decoration; zero reads better in the header
            // than an error blob.
            error!("Failed to load favorites: {e}");
            FavoritesCountTemplate { count: 0 }.into_response()
        }
    }
}

/// Reorder fetched rows into the order the visitor saved them in.
///
/// Ids whose item has since gone inactive drop out silently.
fn in_saved_order(ids: &[MenuItemId], fetched: Vec<MenuItem>) -> Vec<MenuItem> {
    let mut by_id: HashMap<MenuItemId, MenuItem> =
        fetched.into_iter().map(|item| (item.id, item)).collect();
    ids.iter().filter_map(|id| by_id.remove(id)).collect()
}

fn error_fragment() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(r#"<span class="state-error">Could not update favorites</span>"#),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::indexing_slicing)]

    use super::*;
    use crate::routes::test_support::sample_item;

    #[test]
    fn test_in_saved_order_follows_the_saved_ids() {
        let first = sample_item("Chia Pudding");
        let second = sample_item("Green Juice");
        let third = sample_item("Oat Bowl");

        let ids = vec![third.id, first.id, second.id];
        let fetched = vec![first.clone(), second.clone(), third.clone()];

        let ordered = in_saved_order(&ids, fetched);
        let names: Vec<&str> = ordered.iter().map(|item| item.name.as_str()).collect();
        assert_eq!(names, ["Oat Bowl", "Chia Pudding", "Green Juice"]);
    }

    #[test]
    fn test_in_saved_order_drops_missing_items() {
        let kept = sample_item("Chia Pudding");
        let gone = sample_item("Retired Special");

        let ids = vec![gone.id, kept.id];
        let ordered = in_saved_order(&ids, vec![kept.clone()]);

        assert_eq!(ordered.len(), 1);
        assert_eq!(ordered[0].name, "Chia Pudding");
    }
}
