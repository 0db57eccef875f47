//! Search route handlers.
//!
//! The search page drives the results fragment over htmx (`input changed
//! delay:300ms`), so the upstream store only sees settled queries. The
//! fragment and the full page share one results partial.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{error, instrument};

use crate::error::{Result, add_breadcrumb};
use crate::favorites::session_favorites;
use crate::filters;
use crate::routes::menu::ItemCardView;
use crate::state::AppState;

/// Result cap for the live suggestion fragment.
const SUGGEST_LIMIT: u32 = 8;

/// Result cap for the full search page.
const SEARCH_LIMIT: u32 = 50;

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Search results template (HTMX fragment).
#[derive(Template, WebTemplate)]
#[template(path = "partials/search_results.html")]
pub struct SearchResultsTemplate {
    pub query: String,
    pub items: Vec<ItemCardView>,
    pub searched: bool,
}

/// Full search page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/search.html")]
pub struct SearchPageTemplate {
    pub query: String,
    pub items: Vec<ItemCardView>,
    pub searched: bool,
}

/// GET /search/suggest - Live results fragment (HTMX).
#[instrument(skip(state, session))]
pub async fn suggest(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<SearchQuery>,
) -> Response {
    let term = query.q.trim();

    if term.is_empty() {
        return SearchResultsTemplate {
            query: String::new(),
            items: Vec::new(),
            searched: false,
        }
        .into_response();
    }

    let favorites = match session_favorites(session).await {
        Ok(favorites) => favorites,
        Err(e) => {
            error!("Failed to load favorites: {e}");
            return search_error_fragment();
        }
    };

    match state.supabase().search_items(term, SUGGEST_LIMIT).await {
        Ok(items) => SearchResultsTemplate {
            query: term.to_string(),
            items: items
                .iter()
                .map(|item| ItemCardView::from_item(item, favorites.view()))
                .collect(),
            searched: true,
        }
        .into_response(),
        Err(e) => {
            error!("Search failed: {e}");
            search_error_fragment()
        }
    }
}

/// GET /search - Full search page.
#[instrument(skip(state, session))]
pub async fn page(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<SearchQuery>,
) -> Result<SearchPageTemplate> {
    let term = query.q.trim().to_string();

    let items = if term.is_empty() {
        Vec::new()
    } else {
        add_breadcrumb("search", "Searched the menu", Some(&[("q", &term)]));

        let favorites = session_favorites(session).await?;
        state
            .supabase()
            .search_items(&term, SEARCH_LIMIT)
            .await?
            .iter()
            .map(|item| ItemCardView::from_item(item, favorites.view()))
            .collect()
    };

    Ok(SearchPageTemplate {
        searched: !term.is_empty(),
        query: term,
        items,
    })
}

fn search_error_fragment() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html("<p class=\"state-error\">Search is temporarily unavailable.</p>"),
    )
        .into_response()
}
