//! Sort keys for the menu grid.
//!
//! Each key selects a total order over menu items. Sorting is stable, so
//! items that compare equal keep the order the store returned them in.
//! Items missing a numeric field sort as zero, which floats them to the
//! cheap/light end rather than hiding them (the filter side of that story
//! lives in [`crate::filter`]).

use std::cmp::Ordering;

use crate::types::MenuItem;

/// How the visitor asked the grid to be ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Name A-Z, case-insensitive. The default.
    #[default]
    Name,
    PriceAsc,
    PriceDesc,
    CaloriesAsc,
    CaloriesDesc,
    ProteinDesc,
}

impl SortKey {
    /// Every key, in the order the sort dropdown lists them.
    pub const ALL: [Self; 6] = [
        Self::Name,
        Self::PriceAsc,
        Self::PriceDesc,
        Self::CaloriesAsc,
        Self::CaloriesDesc,
        Self::ProteinDesc,
    ];

    /// Parse a key from its wire name. Unrecognized names fall back to
    /// [`SortKey::Name`] rather than erroring; a stale query string should
    /// never break the page.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "price-asc" => Self::PriceAsc,
            "price-desc" => Self::PriceDesc,
            "calories-asc" => Self::CaloriesAsc,
            "calories-desc" => Self::CaloriesDesc,
            "protein-desc" => Self::ProteinDesc,
            _ => Self::Name,
        }
    }

    /// The wire name used in query strings and form values.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::CaloriesAsc => "calories-asc",
            Self::CaloriesDesc => "calories-desc",
            Self::ProteinDesc => "protein-desc",
        }
    }

    /// The label the sort dropdown shows.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Name (A-Z)",
            Self::PriceAsc => "Price: Low to High",
            Self::PriceDesc => "Price: High to Low",
            Self::CaloriesAsc => "Calories: Low to High",
            Self::CaloriesDesc => "Calories: High to Low",
            Self::ProteinDesc => "Highest Protein",
        }
    }

    /// Compare two items under this key.
    #[must_use]
    pub fn compare(self, a: &MenuItem, b: &MenuItem) -> Ordering {
        match self {
            Self::Name => a
                .name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name)),
            Self::PriceAsc => a.price.cmp(&b.price),
            Self::PriceDesc => b.price.cmp(&a.price),
            Self::CaloriesAsc => calories(a).total_cmp(&calories(b)),
            Self::CaloriesDesc => calories(b).total_cmp(&calories(a)),
            Self::ProteinDesc => protein(b).total_cmp(&protein(a)),
        }
    }
}

const fn calories(item: &MenuItem) -> f64 {
    match item.calories {
        Some(value) => value,
        None => 0.0,
    }
}

const fn protein(item: &MenuItem) -> f64 {
    match item.protein {
        Some(value) => value,
        None => 0.0,
    }
}

/// Stable in-place sort under `key`.
pub fn sort_items(items: &mut [MenuItem], key: SortKey) {
    items.sort_by(|a, b| key.compare(a, b));
}
