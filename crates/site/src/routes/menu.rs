//! Menu item detail route handlers.
//!
//! Also home of [`ItemCardView`], the card model every item grid on the
//! site renders (category pages, search, favorites, related items).

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use tower_sessions::Session;
use tracing::{instrument, warn};

use healthy_corner_core::format::truncate;
use healthy_corner_core::{Category, FavoriteSet, ItemIngredient, MenuItem};

use crate::error::{Result, add_breadcrumb};
use crate::favorites::session_favorites;
use crate::filters;
use crate::state::AppState;

/// How many characters of the description a card shows.
const TEASER_CHARS: usize = 90;

/// How many same-category items the "You may also like" strip shows.
const RELATED_ITEMS: usize = 4;

/// Shown on cards whose item has no description.
const TEASER_FALLBACK: &str = "Nutritiously balanced meal prepared with fresh ingredients.";

/// Card view for item grids.
pub struct ItemCardView {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub price: String,
    pub teaser: String,
    pub image_url: Option<String>,
    pub is_vegetarian: bool,
    pub is_vegan: bool,
    pub is_high_protein: bool,
    pub is_new: bool,
    pub calories: Option<String>,
    pub protein: Option<String>,
    pub carbs: Option<String>,
    pub fats: Option<String>,
    pub is_favorite: bool,
}

impl ItemCardView {
    pub fn from_item(item: &MenuItem, favorites: &FavoriteSet) -> Self {
        let teaser = item.description.as_deref().map_or_else(
            || TEASER_FALLBACK.to_string(),
            |text| truncate(text, TEASER_CHARS),
        );

        Self {
            id: item.id.to_string(),
            slug: item.slug.clone(),
            name: item.name.clone(),
            price: item.price().display(),
            teaser,
            image_url: item.thumbnail_url.clone().or_else(|| item.image_url.clone()),
            is_vegetarian: item.is_vegetarian,
            is_vegan: item.is_vegan,
            is_high_protein: item.is_high_protein,
            is_new: item.is_new,
            calories: item.calories.map(format_amount),
            protein: item.protein.map(format_amount),
            carbs: item.carbs.map(format_amount),
            fats: item.fats.map(format_amount),
            is_favorite: favorites.contains(&item.id),
        }
    }
}

/// Full detail view for the item page.
pub struct ItemDetailView {
    pub id: String,
    pub name: String,
    pub price: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub is_vegetarian: bool,
    pub is_vegan: bool,
    pub is_gluten_free: bool,
    pub is_high_protein: bool,
    pub is_low_sugar: bool,
    pub is_kids_friendly: bool,
    pub is_cheat_meal: bool,
    pub calories: Option<String>,
    pub protein: Option<String>,
    pub carbs: Option<String>,
    pub fats: Option<String>,
    pub sugar: Option<String>,
    pub fiber: Option<String>,
    pub sodium: Option<String>,
    pub preparation_time: Option<i32>,
    pub serving_size: Option<String>,
    pub allergen_info: Option<String>,
    pub is_favorite: bool,
}

impl ItemDetailView {
    fn from_item(item: &MenuItem, favorites: &FavoriteSet) -> Self {
        Self {
            id: item.id.to_string(),
            name: item.name.clone(),
            price: item.price().display(),
            description: item.description.clone(),
            image_url: item.image_url.clone().or_else(|| item.thumbnail_url.clone()),
            is_vegetarian: item.is_vegetarian,
            is_vegan: item.is_vegan,
            is_gluten_free: item.is_gluten_free,
            is_high_protein: item.is_high_protein,
            is_low_sugar: item.is_low_sugar,
            is_kids_friendly: item.is_kids_friendly,
            is_cheat_meal: item.is_cheat_meal,
            calories: item.calories.map(format_amount),
            protein: item.protein.map(format_amount),
            carbs: item.carbs.map(format_amount),
            fats: item.fats.map(format_amount),
            sugar: item.sugar.map(format_amount),
            fiber: item.fiber.map(format_amount),
            sodium: item.sodium.map(format_amount),
            preparation_time: item.preparation_time,
            serving_size: item.serving_size.clone(),
            allergen_info: item.allergen_info.clone(),
            is_favorite: favorites.contains(&item.id),
        }
    }
}

/// Breadcrumb entry for the item's category.
pub struct CategoryCrumb {
    pub name: String,
    pub slug: String,
}

impl From<Category> for CategoryCrumb {
    fn from(category: Category) -> Self {
        Self {
            name: category.name,
            slug: category.slug,
        }
    }
}

/// Ingredient chip on the detail page.
pub struct IngredientView {
    pub name: String,
    pub quantity: Option<String>,
    pub is_allergen: bool,
}

impl From<&ItemIngredient> for IngredientView {
    fn from(entry: &ItemIngredient) -> Self {
        Self {
            name: entry.ingredient.name.clone(),
            quantity: entry.quantity.clone(),
            is_allergen: entry.ingredient.is_allergen,
        }
    }
}

/// Item detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "menu/show.html")]
pub struct MenuShowTemplate {
    pub item: ItemDetailView,
    pub category: Option<CategoryCrumb>,
    pub ingredients: Vec<IngredientView>,
    pub allergens: Vec<String>,
    pub related: Vec<ItemCardView>,
}

/// GET /menu/{slug} - Item detail page.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(slug): Path<String>,
) -> Result<MenuShowTemplate> {
    add_breadcrumb("navigation", "Viewed menu item", Some(&[("slug", &slug)]));

    let item = state.supabase().item_by_slug(&slug).await?;
    let favorites = session_favorites(session).await?;

    // The crumb, ingredients, and related strip decorate the page; losing
    // one of them should not take the whole item down with it.
    let category = match state.supabase().category_by_id(item.category_id).await {
        Ok(category) => Some(CategoryCrumb::from(category)),
        Err(e) => {
            warn!("Failed to load category for breadcrumb: {e}");
            None
        }
    };

    let ingredients: Vec<IngredientView> = state
        .supabase()
        .item_ingredients(item.id)
        .await
        .map_or_else(
            |e| {
                warn!("Failed to load ingredients: {e}");
                Vec::new()
            },
            |entries| entries.iter().map(IngredientView::from).collect(),
        );

    let allergens = ingredients
        .iter()
        .filter(|entry| entry.is_allergen)
        .map(|entry| entry.name.clone())
        .collect();

    let related = match state.supabase().items_in_category(item.category_id).await {
        Ok(items) => items
            .iter()
            .filter(|candidate| candidate.id != item.id)
            .take(RELATED_ITEMS)
            .map(|candidate| ItemCardView::from_item(candidate, favorites.view()))
            .collect(),
        Err(e) => {
            warn!("Failed to load related items: {e}");
            Vec::new()
        }
    };

    Ok(MenuShowTemplate {
        item: ItemDetailView::from_item(&item, favorites.view()),
        category,
        ingredients,
        allergens,
        related,
    })
}

/// Format a nutrition amount without a trailing ".0" on whole numbers.
pub(crate) fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::routes::test_support::sample_item;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(420.0), "420");
        assert_eq!(format_amount(32.5), "32.5");
        assert_eq!(format_amount(0.0), "0");
    }

    #[test]
    fn test_card_view_teaser_fallback() {
        let item = sample_item("Zobo Punch");

        let card = ItemCardView::from_item(&item, &FavoriteSet::default());
        assert_eq!(card.teaser, TEASER_FALLBACK);
        assert!(!card.is_favorite);
    }

    #[test]
    fn test_card_view_truncates_long_descriptions() {
        let mut item = sample_item("Kale Caesar");
        item.description = Some("fresh ".repeat(40));

        let card = ItemCardView::from_item(&item, &FavoriteSet::default());
        assert!(card.teaser.chars().count() <= TEASER_CHARS + 3);
        assert!(card.teaser.ends_with("..."));
    }

    #[test]
    fn test_card_view_marks_favorites() {
        let item = sample_item("Kale Caesar");
        let mut favorites = FavoriteSet::default();
        favorites.insert(item.id);

        let card = ItemCardView::from_item(&item, &favorites);
        assert!(card.is_favorite);
    }
}
