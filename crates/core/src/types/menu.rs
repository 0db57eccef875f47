//! Record types served by the hosted menu data store.
//!
//! These deserialize directly from the store's JSON rows. Nullable columns
//! map to `Option`, numeric nutrition columns to `f64` (the store reports
//! grams and kilocalories), and money to [`rust_decimal::Decimal`].

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{AchievementId, CategoryId, IngredientId, MenuItemId, ServiceId};
use super::price::{CurrencyCode, Price};

/// A single dish on the menu.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: MenuItemId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub category_id: CategoryId,

    // Nutritional values (kcal for calories, grams otherwise; mg for sodium)
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fats: Option<f64>,
    pub sugar: Option<f64>,
    pub fiber: Option<f64>,
    pub sodium: Option<f64>,

    // Pricing
    pub price: Decimal,
    #[serde(default)]
    pub currency: CurrencyCode,

    // Media
    pub image_url: Option<String>,
    pub thumbnail_url: Option<String>,

    // Dietary flags
    #[serde(default)]
    pub is_vegetarian: bool,
    #[serde(default)]
    pub is_vegan: bool,
    #[serde(default)]
    pub is_gluten_free: bool,
    #[serde(default)]
    pub is_kids_friendly: bool,
    #[serde(default)]
    pub is_cheat_meal: bool,
    #[serde(default)]
    pub is_high_protein: bool,
    #[serde(default)]
    pub is_low_sugar: bool,

    // Status
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub is_new: bool,

    // Metadata
    pub preparation_time: Option<i32>,
    pub serving_size: Option<String>,
    pub allergen_info: Option<String>,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl MenuItem {
    /// The item's price paired with its currency.
    #[must_use]
    pub const fn price(&self) -> Price {
        Price::new(self.price, self.currency)
    }
}

/// A menu category. Root categories (no parent) make up the site navigation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub parent_id: Option<CategoryId>,
    pub image_url: Option<String>,
    pub icon: Option<String>,
    #[serde(default)]
    pub order_index: i32,
    #[serde(default)]
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Category {
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// An ingredient, flagged when it is a known allergen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: IngredientId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub is_allergen: bool,
    pub allergen_type: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// A junction row linking an item to one ingredient with its quantity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemIngredient {
    pub quantity: Option<String>,
    #[serde(rename = "ingredients")]
    pub ingredient: Ingredient,
}

/// A service the restaurant offers (catering, meal plans, and so on).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub order_index: i32,
    #[serde(default)]
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// A milestone shown on the about page timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Achievement {
    pub id: AchievementId,
    pub title: String,
    pub description: Option<String>,
    pub achievement_type: Option<String>,
    pub image_url: Option<String>,
    pub year: Option<i32>,
    pub date: Option<String>,
    #[serde(default)]
    pub order_index: i32,
    #[serde(default)]
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
impl MenuItem {
    /// A fully-populated fixture for logic tests. Fields most tests care
    /// about (price, calories, flags) get unremarkable defaults.
    pub(crate) fn fixture(name: &str) -> Self {
        Self {
            id: MenuItemId::new(uuid::Uuid::new_v4()),
            name: name.to_owned(),
            slug: crate::format::slugify(name),
            description: None,
            category_id: CategoryId::new(uuid::Uuid::new_v4()),
            calories: Some(400.0),
            protein: Some(20.0),
            carbs: Some(40.0),
            fats: Some(10.0),
            sugar: Some(5.0),
            fiber: Some(4.0),
            sodium: Some(300.0),
            price: Decimal::new(50, 0),
            currency: CurrencyCode::Mru,
            image_url: None,
            thumbnail_url: None,
            is_vegetarian: false,
            is_vegan: false,
            is_gluten_free: false,
            is_kids_friendly: false,
            is_cheat_meal: false,
            is_high_protein: false,
            is_low_sugar: false,
            is_active: true,
            is_featured: false,
            is_new: false,
            preparation_time: Some(10),
            serving_size: None,
            allergen_info: None,
            created_at: None,
            updated_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn menu_item_deserializes_from_store_row() {
        let row = serde_json::json!({
            "id": "0b9f8a35-31a5-4be0-9f0e-1c1d5f6a2b3c",
            "name": "Grilled Chicken Bowl",
            "slug": "grilled-chicken-bowl",
            "description": "Flame-grilled chicken over brown rice",
            "category_id": "7e2b1c4d-58f0-4f7a-b9d3-0a1b2c3d4e5f",
            "calories": 520,
            "protein": 42.5,
            "carbs": 48,
            "fats": 14,
            "sugar": 6,
            "fiber": 7,
            "sodium": 640,
            "price": 120,
            "currency": "MRU",
            "image_url": null,
            "thumbnail_url": null,
            "is_vegetarian": false,
            "is_vegan": false,
            "is_gluten_free": true,
            "is_kids_friendly": false,
            "is_cheat_meal": false,
            "is_high_protein": true,
            "is_low_sugar": true,
            "is_active": true,
            "is_featured": true,
            "is_new": false,
            "preparation_time": 15,
            "serving_size": "450g",
            "allergen_info": null,
            "created_at": "2025-11-02T09:30:00+00:00",
            "updated_at": "2025-11-02T09:30:00+00:00"
        });

        let item: MenuItem = serde_json::from_value(row).unwrap();
        assert_eq!(item.name, "Grilled Chicken Bowl");
        assert_eq!(item.calories, Some(520.0));
        assert_eq!(item.price().display(), "120\u{a0}UM");
        assert!(item.is_high_protein);
        assert!(!item.is_vegan);
    }

    #[test]
    fn nullable_columns_and_missing_flags_are_tolerated() {
        let row = serde_json::json!({
            "id": "0b9f8a35-31a5-4be0-9f0e-1c1d5f6a2b3c",
            "name": "Fresh Juice",
            "slug": "fresh-juice",
            "description": null,
            "category_id": "7e2b1c4d-58f0-4f7a-b9d3-0a1b2c3d4e5f",
            "calories": null,
            "protein": null,
            "carbs": null,
            "fats": null,
            "sugar": null,
            "fiber": null,
            "sodium": null,
            "price": 35.5,
            "image_url": null,
            "thumbnail_url": null,
            "preparation_time": null,
            "serving_size": null,
            "allergen_info": null
        });

        let item: MenuItem = serde_json::from_value(row).unwrap();
        assert_eq!(item.calories, None);
        assert_eq!(item.currency, CurrencyCode::Mru);
        assert!(!item.is_active);
    }

    #[test]
    fn ingredient_rows_embed_under_the_table_name() {
        let row = serde_json::json!({
            "quantity": "80g",
            "ingredients": {
                "id": "3c9a7b10-6e2f-4c5d-8a9b-0c1d2e3f4a5b",
                "name": "Peanut sauce",
                "slug": "peanut-sauce",
                "is_allergen": true,
                "allergen_type": "peanut",
                "created_at": null
            }
        });

        let link: ItemIngredient = serde_json::from_value(row).unwrap();
        assert!(link.ingredient.is_allergen);
        assert_eq!(link.quantity.as_deref(), Some("80g"));
    }
}
