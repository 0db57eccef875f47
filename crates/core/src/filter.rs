//! The menu filter predicate.
//!
//! A [`FilterSpec`] describes what a visitor asked for: an optional text
//! query, inclusive calorie and price bands, and dietary toggles. The
//! predicate is pure, so filtering an already-filtered list changes nothing.
//!
//! Two deliberate asymmetries, both load-bearing for the menu pages:
//! - the calorie band only applies to items that report calories; drinks and
//!   specials without nutrition data stay visible,
//! - the price band always applies, every item has a price.

use rust_decimal::Decimal;

use crate::types::MenuItem;

/// Calorie band applied when no item data narrows it.
pub const DEFAULT_CALORIE_RANGE: Bounds<f64> = Bounds::new(0.0, 1000.0);

/// Price band applied when no item data narrows it.
pub const DEFAULT_PRICE_RANGE: Bounds<Decimal> = Bounds::new(Decimal::ZERO, Decimal::from_parts(200, 0, 0, false, 0));

/// An inclusive numeric band.
///
/// Keeping `min <= max` is the caller's job. A reversed band is not an
/// error; it simply contains nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds<T> {
    pub min: T,
    pub max: T,
}

impl<T> Bounds<T> {
    #[must_use]
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }
}

impl<T: PartialOrd + Copy> Bounds<T> {
    /// Whether `value` lies inside the band, both ends inclusive.
    #[must_use]
    pub fn contains(&self, value: T) -> bool {
        self.min <= value && value <= self.max
    }
}

/// What a visitor asked the menu grid to show.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    /// Free-text query matched against name and description. Blank means
    /// no text constraint.
    pub query: Option<String>,
    pub calories: Bounds<f64>,
    pub price: Bounds<Decimal>,
    pub vegetarian: bool,
    pub vegan: bool,
    pub gluten_free: bool,
    pub high_protein: bool,
    pub low_sugar: bool,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            query: None,
            calories: DEFAULT_CALORIE_RANGE,
            price: DEFAULT_PRICE_RANGE,
            vegetarian: false,
            vegan: false,
            gluten_free: false,
            high_protein: false,
            low_sugar: false,
        }
    }
}

impl FilterSpec {
    /// The trimmed query, or `None` when it is empty or whitespace.
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
    }

    /// A spec whose bands cover every item in `items`: price up to the max
    /// rounded to the nearest 10 above, calories to the nearest 50 above.
    /// This is what the category grid starts from before the visitor
    /// narrows anything. An empty list keeps the default bands.
    #[must_use]
    pub fn covering(items: &[MenuItem]) -> Self {
        if items.is_empty() {
            return Self::default();
        }

        let max_price = items
            .iter()
            .map(|item| item.price)
            .max()
            .unwrap_or(Decimal::ZERO);
        let max_calories = items
            .iter()
            .filter_map(|item| item.calories)
            .fold(0.0_f64, f64::max);

        Self {
            price: Bounds::new(Decimal::ZERO, (max_price / Decimal::TEN).ceil() * Decimal::TEN),
            calories: Bounds::new(0.0, (max_calories / 50.0).ceil() * 50.0),
            ..Self::default()
        }
    }
}

/// Whether `item` satisfies every constraint in `spec`.
#[must_use]
pub fn matches(item: &MenuItem, spec: &FilterSpec) -> bool {
    if let Some(query) = spec.query() {
        let needle = query.to_lowercase();
        let haystack = format!(
            "{} {}",
            item.name,
            item.description.as_deref().unwrap_or_default()
        )
        .to_lowercase();
        if !haystack.contains(&needle) {
            return false;
        }
    }

    // Items without a calorie value are never excluded by the calorie band.
    if let Some(calories) = item.calories {
        if !spec.calories.contains(calories) {
            return false;
        }
    }

    if !spec.price.contains(item.price) {
        return false;
    }

    if spec.vegetarian && !item.is_vegetarian {
        return false;
    }
    if spec.vegan && !item.is_vegan {
        return false;
    }
    if spec.gluten_free && !item.is_gluten_free {
        return false;
    }
    if spec.high_protein && !item.is_high_protein {
        return false;
    }
    if spec.low_sugar && !item.is_low_sugar {
        return false;
    }

    true
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn grilled_chicken_bowl() -> MenuItem {
        let mut item = MenuItem::fixture("Grilled Chicken Bowl");
        item.description = Some("Flame-grilled chicken over brown rice".into());
        item.price = Decimal::new(120, 0);
        item.calories = Some(520.0);
        item.protein = Some(42.0);
        item.is_high_protein = true;
        item.is_gluten_free = true;
        item
    }

    fn wide_spec() -> FilterSpec {
        FilterSpec {
            calories: Bounds::new(0.0, 1000.0),
            price: Bounds::new(Decimal::ZERO, Decimal::new(200, 0)),
            ..FilterSpec::default()
        }
    }

    #[test]
    fn wide_open_spec_keeps_everything() {
        let items = vec![
            grilled_chicken_bowl(),
            MenuItem::fixture("Green Detox Juice"),
            MenuItem::fixture("Protein Pancakes"),
        ];
        let spec = FilterSpec::covering(&items);

        let kept: Vec<_> = items.iter().filter(|i| matches(i, &spec)).collect();
        assert_eq!(kept.len(), items.len());
    }

    #[test]
    fn filtering_is_idempotent() {
        let items = vec![
            grilled_chicken_bowl(),
            MenuItem::fixture("Green Detox Juice"),
        ];
        let spec = FilterSpec {
            query: Some("chicken".into()),
            ..wide_spec()
        };

        let once: Vec<MenuItem> = items
            .into_iter()
            .filter(|i| matches(i, &spec))
            .collect();
        let twice: Vec<MenuItem> = once
            .clone()
            .into_iter()
            .filter(|i| matches(i, &spec))
            .collect();
        assert_eq!(once.len(), twice.len());
        assert_eq!(once.len(), 1);
    }

    #[test]
    fn query_matches_name_and_description_case_insensitively() {
        let item = grilled_chicken_bowl();

        let by_name = FilterSpec {
            query: Some("CHICKEN".into()),
            ..wide_spec()
        };
        assert!(matches(&item, &by_name));

        let by_description = FilterSpec {
            query: Some("brown rice".into()),
            ..wide_spec()
        };
        assert!(matches(&item, &by_description));

        let miss = FilterSpec {
            query: Some("salmon".into()),
            ..wide_spec()
        };
        assert!(!matches(&item, &miss));
    }

    #[test]
    fn blank_query_is_no_constraint() {
        let item = grilled_chicken_bowl();
        let spec = FilterSpec {
            query: Some("   ".into()),
            ..wide_spec()
        };
        assert!(matches(&item, &spec));
    }

    #[test]
    fn high_protein_chicken_query_passes_vegan_toggle_fails() {
        let item = grilled_chicken_bowl();

        let spec = FilterSpec {
            query: Some("chicken".into()),
            high_protein: true,
            ..wide_spec()
        };
        assert!(matches(&item, &spec));

        let vegan_spec = FilterSpec {
            vegan: true,
            ..spec
        };
        assert!(!matches(&item, &vegan_spec));
    }

    #[test]
    fn toggles_and_combine() {
        let item = grilled_chicken_bowl();
        let spec = FilterSpec {
            high_protein: true,
            gluten_free: true,
            ..wide_spec()
        };
        assert!(matches(&item, &spec));

        let spec = FilterSpec {
            low_sugar: true,
            ..spec
        };
        assert!(!matches(&item, &spec));
    }

    #[test]
    fn calorie_band_skips_items_without_calories() {
        let mut juice = MenuItem::fixture("Fresh Juice");
        juice.calories = None;
        juice.price = Decimal::new(35, 0);

        let narrow = FilterSpec {
            calories: Bounds::new(0.0, 100.0),
            ..wide_spec()
        };
        assert!(matches(&juice, &narrow));

        let bowl = grilled_chicken_bowl();
        assert!(!matches(&bowl, &narrow));
    }

    #[test]
    fn price_band_always_applies() {
        let mut item = MenuItem::fixture("Family Platter");
        item.price = Decimal::new(250, 0);

        assert!(!matches(&item, &wide_spec()));

        let wider = FilterSpec {
            price: Bounds::new(Decimal::ZERO, Decimal::new(300, 0)),
            ..wide_spec()
        };
        assert!(matches(&item, &wider));
    }

    #[test]
    fn reversed_price_band_matches_nothing() {
        let spec = FilterSpec {
            price: Bounds::new(Decimal::new(100, 0), Decimal::new(10, 0)),
            ..wide_spec()
        };
        assert!(!matches(&grilled_chicken_bowl(), &spec));
        assert!(!matches(&MenuItem::fixture("Green Detox Juice"), &spec));
    }

    #[test]
    fn reversed_calorie_band_still_passes_uncounted_items() {
        let spec = FilterSpec {
            calories: Bounds::new(500.0, 100.0),
            ..wide_spec()
        };
        assert!(!matches(&grilled_chicken_bowl(), &spec));

        let mut juice = MenuItem::fixture("Fresh Juice");
        juice.calories = None;
        assert!(matches(&juice, &spec));
    }

    #[test]
    fn covering_rounds_bands_up() {
        let mut a = MenuItem::fixture("A");
        a.price = Decimal::new(87, 0);
        a.calories = Some(430.0);
        let mut b = MenuItem::fixture("B");
        b.price = Decimal::new(42, 0);
        b.calories = Some(610.0);

        let spec = FilterSpec::covering(&[a, b]);
        assert_eq!(spec.price.max, Decimal::new(90, 0));
        assert!((spec.calories.max - 650.0).abs() < f64::EPSILON);
    }

    #[test]
    fn covering_empty_list_keeps_defaults() {
        let spec = FilterSpec::covering(&[]);
        assert_eq!(spec.price, DEFAULT_PRICE_RANGE);
        assert_eq!(spec.calories, DEFAULT_CALORIE_RANGE);
    }
}
