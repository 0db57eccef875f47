//! Cache types for Supabase REST responses.

use healthy_corner_core::{Achievement, Category, ItemIngredient, MenuItem, Service};

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Categories(Vec<Category>),
    Category(Box<Category>),
    Items(Vec<MenuItem>),
    Item(Box<MenuItem>),
    Ingredients(Vec<ItemIngredient>),
    Services(Vec<Service>),
    Achievements(Vec<Achievement>),
    Count(u64),
}
