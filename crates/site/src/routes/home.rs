//! Home page route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tower_sessions::Session;
use tracing::{error, instrument};

use healthy_corner_core::Category;

use crate::error::Result;
use crate::favorites::session_favorites;
use crate::filters;
use crate::routes::menu::ItemCardView;
use crate::state::AppState;

/// How many featured items the home strip shows.
const FEATURED_LIMIT: u32 = 6;

/// Category tile on the home grid.
pub struct CategoryTileView {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub image_url: Option<String>,
    pub item_count: u64,
}

impl CategoryTileView {
    fn new(category: Category, item_count: u64) -> Self {
        Self {
            name: category.name,
            slug: category.slug,
            description: category.description,
            icon: category.icon,
            image_url: category.image_url,
            item_count,
        }
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub categories: Vec<CategoryTileView>,
    pub featured: Vec<ItemCardView>,
}

/// GET / - Home page.
///
/// Degrades to its static sections when the store is unreachable; an
/// empty grid beats a 502 on the front door.
#[instrument(skip(state, session))]
pub async fn home(State(state): State<AppState>, session: Session) -> Result<HomeTemplate> {
    let favorites = session_favorites(session).await?;

    let categories = match state.supabase().root_categories().await {
        Ok(categories) => {
            let mut tiles = Vec::with_capacity(categories.len());
            for category in categories {
                // Counts are cached alongside the category list, so this
                // loop only fans out on a cold cache.
                let item_count = state
                    .supabase()
                    .item_count(category.id)
                    .await
                    .unwrap_or_else(|e| {
                        error!("Failed to count items in {}: {e}", category.slug);
                        0
                    });
                tiles.push(CategoryTileView::new(category, item_count));
            }
            tiles
        }
        Err(e) => {
            error!("Failed to load categories: {e}");
            Vec::new()
        }
    };

    let featured = state
        .supabase()
        .featured_items(FEATURED_LIMIT)
        .await
        .map_or_else(
            |e| {
                error!("Failed to load featured items: {e}");
                Vec::new()
            },
            |items| {
                items
                    .iter()
                    .map(|item| ItemCardView::from_item(item, favorites.view()))
                    .collect()
            },
        );

    Ok(HomeTemplate {
        categories,
        featured,
    })
}
