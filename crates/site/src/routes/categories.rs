//! Category page route handlers.
//!
//! The category page renders a filter panel next to the item grid. The
//! panel is a plain form; htmx submits it to the grid fragment endpoint
//! on every change, so the page works without any custom JavaScript.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State};
use serde::{Deserialize, Deserializer};
use tower_sessions::Session;
use tracing::instrument;

use healthy_corner_core::{Category, FavoriteSet, FilterSpec, MenuItem, SortKey, matches, sort_items};
use rust_decimal::Decimal;

use crate::error::{Result, add_breadcrumb};
use crate::favorites::session_favorites;
use crate::filters;
use crate::routes::menu::{ItemCardView, format_amount};
use crate::state::AppState;

/// Deserialize empty strings as None for optional numeric fields.
///
/// Range inputs submit an empty value when untouched; an empty band
/// override means "keep the covering band", not zero.
fn empty_string_as_none<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        None => Ok(None),
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Filter panel form parameters.
#[derive(Debug, Deserialize)]
pub struct MenuQuery {
    /// Free-text search within the category
    #[serde(default)]
    pub q: String,
    /// Calorie band (kcal)
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub cal_min: Option<f64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub cal_max: Option<f64>,
    /// Price band (MRU)
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub price_min: Option<Decimal>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub price_max: Option<Decimal>,
    /// Checkbox filters: "1" when ticked
    #[serde(default)]
    pub vegetarian: Option<String>,
    #[serde(default)]
    pub vegan: Option<String>,
    #[serde(default)]
    pub gluten_free: Option<String>,
    #[serde(default)]
    pub high_protein: Option<String>,
    #[serde(default)]
    pub low_sugar: Option<String>,
    #[serde(default)]
    pub sort: String,
}

impl MenuQuery {
    /// The covering spec narrowed by whatever the visitor submitted.
    fn apply_to(&self, covering: &FilterSpec) -> FilterSpec {
        let mut spec = covering.clone();
        if !self.q.trim().is_empty() {
            spec.query = Some(self.q.clone());
        }
        if let Some(min) = self.cal_min {
            spec.calories.min = min;
        }
        if let Some(max) = self.cal_max {
            spec.calories.max = max;
        }
        if let Some(min) = self.price_min {
            spec.price.min = min;
        }
        if let Some(max) = self.price_max {
            spec.price.max = max;
        }
        spec.vegetarian = checked(self.vegetarian.as_deref());
        spec.vegan = checked(self.vegan.as_deref());
        spec.gluten_free = checked(self.gluten_free.as_deref());
        spec.high_protein = checked(self.high_protein.as_deref());
        spec.low_sugar = checked(self.low_sugar.as_deref());
        spec
    }
}

fn checked(value: Option<&str>) -> bool {
    value == Some("1")
}

/// Category header view.
pub struct CategoryView {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
}

impl From<Category> for CategoryView {
    fn from(category: Category) -> Self {
        Self {
            name: category.name,
            slug: category.slug,
            description: category.description,
        }
    }
}

/// One entry in the sort dropdown.
pub struct SortOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Filter panel state: band ceilings from the covering spec plus the
/// visitor's current selections.
pub struct FilterPanelView {
    pub q: String,
    pub calories_ceiling: String,
    pub price_ceiling: String,
    pub cal_min: String,
    pub cal_max: String,
    pub price_min: String,
    pub price_max: String,
    pub vegetarian: bool,
    pub vegan: bool,
    pub gluten_free: bool,
    pub high_protein: bool,
    pub low_sugar: bool,
    pub sort_options: Vec<SortOption>,
}

impl FilterPanelView {
    fn new(covering: &FilterSpec, applied: &FilterSpec, sort: SortKey) -> Self {
        Self {
            q: applied.query().unwrap_or_default().to_string(),
            calories_ceiling: format_amount(covering.calories.max),
            price_ceiling: covering.price.max.normalize().to_string(),
            cal_min: format_amount(applied.calories.min),
            cal_max: format_amount(applied.calories.max),
            price_min: applied.price.min.normalize().to_string(),
            price_max: applied.price.max.normalize().to_string(),
            vegetarian: applied.vegetarian,
            vegan: applied.vegan,
            gluten_free: applied.gluten_free,
            high_protein: applied.high_protein,
            low_sugar: applied.low_sugar,
            sort_options: SortKey::ALL
                .iter()
                .map(|key| SortOption {
                    value: key.as_str(),
                    label: key.label(),
                    selected: *key == sort,
                })
                .collect(),
        }
    }
}

/// Item grid fragment (HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/menu_grid.html")]
pub struct MenuGridTemplate {
    pub items: Vec<ItemCardView>,
    pub shown: usize,
    pub total: usize,
}

/// Full category page template.
#[derive(Template, WebTemplate)]
#[template(path = "categories/show.html")]
pub struct CategoryShowTemplate {
    pub category: CategoryView,
    pub panel: FilterPanelView,
    pub items: Vec<ItemCardView>,
    pub shown: usize,
    pub total: usize,
}

/// GET /categories/{slug} - Category page with filter panel.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(slug): Path<String>,
    Query(query): Query<MenuQuery>,
) -> Result<CategoryShowTemplate> {
    add_breadcrumb("navigation", "Viewed category", Some(&[("slug", &slug)]));

    let category = state.supabase().category_by_slug(&slug).await?;
    let items = state.supabase().items_in_category(category.id).await?;
    let favorites = session_favorites(session).await?;

    let total = items.len();
    let covering = FilterSpec::covering(&items);
    let spec = query.apply_to(&covering);
    let sort = SortKey::parse(&query.sort);

    let cards = select_cards(items, &spec, sort, favorites.view());

    Ok(CategoryShowTemplate {
        category: CategoryView::from(category),
        panel: FilterPanelView::new(&covering, &spec, sort),
        shown: cards.len(),
        total,
        items: cards,
    })
}

/// GET /categories/{slug}/grid - Filtered grid fragment (HTMX).
#[instrument(skip(state, session))]
pub async fn grid(
    State(state): State<AppState>,
    session: Session,
    Path(slug): Path<String>,
    Query(query): Query<MenuQuery>,
) -> Result<MenuGridTemplate> {
    let category = state.supabase().category_by_slug(&slug).await?;
    let items = state.supabase().items_in_category(category.id).await?;
    let favorites = session_favorites(session).await?;

    let total = items.len();
    let covering = FilterSpec::covering(&items);
    let spec = query.apply_to(&covering);

    let cards = select_cards(items, &spec, SortKey::parse(&query.sort), favorites.view());

    Ok(MenuGridTemplate {
        shown: cards.len(),
        total,
        items: cards,
    })
}

/// Filter, order, and project items into grid cards.
fn select_cards(
    items: Vec<MenuItem>,
    spec: &FilterSpec,
    sort: SortKey,
    favorites: &FavoriteSet,
) -> Vec<ItemCardView> {
    let mut kept: Vec<MenuItem> = items
        .into_iter()
        .filter(|item| matches(item, spec))
        .collect();
    sort_items(&mut kept, sort);
    kept.iter()
        .map(|item| ItemCardView::from_item(item, favorites))
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::indexing_slicing)]

    use super::*;
    use crate::routes::test_support::sample_item;

    fn empty_query() -> MenuQuery {
        MenuQuery {
            q: String::new(),
            cal_min: None,
            cal_max: None,
            price_min: None,
            price_max: None,
            vegetarian: None,
            vegan: None,
            gluten_free: None,
            high_protein: None,
            low_sugar: None,
            sort: String::new(),
        }
    }

    #[test]
    fn test_empty_query_keeps_covering_bands() {
        let mut a = sample_item("Bowl");
        a.price = Decimal::new(87, 0);
        a.calories = Some(430.0);
        let covering = FilterSpec::covering(&[a]);

        let spec = empty_query().apply_to(&covering);
        assert_eq!(spec, covering);
    }

    #[test]
    fn test_blank_text_query_stays_unset() {
        let spec = MenuQuery {
            q: "   ".to_string(),
            ..empty_query()
        }
        .apply_to(&FilterSpec::default());
        assert_eq!(spec.query, None);
    }

    #[test]
    fn test_query_overrides_bands_and_toggles() {
        let covering = FilterSpec::default();
        let query = MenuQuery {
            q: "bowl".to_string(),
            cal_min: Some(200.0),
            cal_max: Some(600.0),
            price_max: Some(Decimal::new(80, 0)),
            vegan: Some("1".to_string()),
            high_protein: Some("1".to_string()),
            ..empty_query()
        };

        let spec = query.apply_to(&covering);
        assert_eq!(spec.query(), Some("bowl"));
        assert!((spec.calories.min - 200.0).abs() < f64::EPSILON);
        assert!((spec.calories.max - 600.0).abs() < f64::EPSILON);
        assert_eq!(spec.price.min, Decimal::ZERO);
        assert_eq!(spec.price.max, Decimal::new(80, 0));
        assert!(spec.vegan);
        assert!(spec.high_protein);
        assert!(!spec.vegetarian);
    }

    #[test]
    fn test_select_cards_filters_sorts_and_projects() {
        let mut pricey = sample_item("Family Platter");
        pricey.price = Decimal::new(120, 0);
        let mut cheap = sample_item("Mint Lemonade");
        cheap.price = Decimal::new(40, 0);
        let mut mid = sample_item("Avocado Toast");
        mid.price = Decimal::new(80, 0);

        let covering = FilterSpec::covering(&[pricey.clone(), cheap.clone(), mid.clone()]);
        let cards = select_cards(
            vec![pricey, cheap, mid],
            &covering,
            SortKey::PriceAsc,
            &FavoriteSet::default(),
        );

        let names: Vec<&str> = cards.iter().map(|card| card.name.as_str()).collect();
        assert_eq!(names, ["Mint Lemonade", "Avocado Toast", "Family Platter"]);
    }

    #[test]
    fn test_select_cards_respects_toggles() {
        let mut veggie = sample_item("Falafel Wrap");
        veggie.is_vegetarian = true;
        let meaty = sample_item("Chicken Wrap");

        let spec = MenuQuery {
            vegetarian: Some("1".to_string()),
            ..empty_query()
        }
        .apply_to(&FilterSpec::default());

        let cards = select_cards(
            vec![veggie, meaty],
            &spec,
            SortKey::Name,
            &FavoriteSet::default(),
        );
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].name, "Falafel Wrap");
    }
}
