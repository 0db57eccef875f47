//! Supabase `PostgREST` client implementation.
//!
//! Builds filtered REST queries against `/rest/v1/` with `reqwest` 0.13.
//! Caches menu data using `moka` (5-minute TTL); search results are never
//! cached because the hit ratio would be terrible and staleness visible.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use healthy_corner_core::{
    Achievement, Category, CategoryId, ItemIngredient, MenuItem, MenuItemId, Service,
};

use super::SupabaseError;
use super::cache::CacheValue;
use crate::config::SupabaseConfig;

/// Client for the Supabase REST API.
///
/// Provides read access to categories, menu items, ingredients, services,
/// and achievements. Everything except search is cached for 5 minutes.
#[derive(Clone)]
pub struct SupabaseClient {
    inner: Arc<SupabaseClientInner>,
}

struct SupabaseClientInner {
    client: reqwest::Client,
    rest_url: Url,
    anon_key: String,
    cache: Cache<String, CacheValue>,
}

impl SupabaseClient {
    /// Create a new Supabase REST client.
    ///
    /// # Errors
    ///
    /// Returns an error if the project URL cannot be parsed.
    pub fn new(config: &SupabaseConfig) -> Result<Self, SupabaseError> {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        // Trailing slash matters: Url::join replaces the last segment otherwise
        let rest_url = Url::parse(&format!(
            "{}/rest/v1/",
            config.project_url.trim_end_matches('/')
        ))?;

        Ok(Self {
            inner: Arc::new(SupabaseClientInner {
                client: reqwest::Client::new(),
                rest_url,
                anon_key: config.anon_key.expose_secret().to_string(),
                cache,
            }),
        })
    }

    /// Drop every cached response.
    ///
    /// The next request for each key goes back to Supabase.
    pub fn invalidate_all(&self) {
        self.inner.cache.invalidate_all();
    }

    /// Execute a GET request and deserialize the JSON response.
    async fn fetch<T: DeserializeOwned>(&self, url: Url) -> Result<T, SupabaseError> {
        let response = self
            .inner
            .client
            .get(url)
            .header("apikey", &self.inner.anon_key)
            .header("Authorization", format!("Bearer {}", self.inner.anon_key))
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();

        // Check for rate limiting
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(SupabaseError::RateLimited(retry_after));
        }

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "Supabase API returned non-success status"
            );
            return Err(SupabaseError::Api {
                status,
                body: response_text.chars().take(200).collect(),
            });
        }

        match serde_json::from_str(&response_text) {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %response_text.chars().take(500).collect::<String>(),
                    "Failed to parse Supabase response"
                );
                Err(SupabaseError::Parse(e))
            }
        }
    }

    /// Execute a HEAD request with `Prefer: count=exact` and read the total
    /// row count from the `Content-Range` header (`0-24/3573` or `*/3573`).
    async fn fetch_count(&self, url: Url) -> Result<u64, SupabaseError> {
        let response = self
            .inner
            .client
            .head(url)
            .header("apikey", &self.inner.anon_key)
            .header("Authorization", format!("Bearer {}", self.inner.anon_key))
            .header("Prefer", "count=exact")
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(SupabaseError::RateLimited(retry_after));
        }

        if !status.is_success() {
            return Err(SupabaseError::Api {
                status,
                body: String::new(),
            });
        }

        let count = response
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.rsplit('/').next())
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(0);

        Ok(count)
    }

    /// Build an endpoint URL for a table.
    fn endpoint(&self, table: &str) -> Result<Url, SupabaseError> {
        Ok(self.inner.rest_url.join(table)?)
    }

    // =========================================================================
    // Category Methods
    // =========================================================================

    /// Get the active top-level categories in display order.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn root_categories(&self) -> Result<Vec<Category>, SupabaseError> {
        let cache_key = "categories:root".to_string();

        if let Some(CacheValue::Categories(categories)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for root categories");
            return Ok(categories);
        }

        let mut url = self.endpoint("categories")?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("parent_id", "is.null")
            .append_pair("is_active", "eq.true")
            .append_pair("order", "order_index.asc");

        let categories: Vec<Category> = self.fetch(url).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Categories(categories.clone()))
            .await;

        Ok(categories)
    }

    /// Get a category by its slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the category is not found or the API request fails.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn category_by_slug(&self, slug: &str) -> Result<Category, SupabaseError> {
        let cache_key = format!("category:slug:{slug}");

        if let Some(CacheValue::Category(category)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for category");
            return Ok(*category);
        }

        let mut url = self.endpoint("categories")?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("slug", &format!("eq.{slug}"))
            .append_pair("is_active", "eq.true")
            .append_pair("limit", "1");

        let mut categories: Vec<Category> = self.fetch(url).await?;
        let category = categories
            .pop()
            .ok_or_else(|| SupabaseError::NotFound(format!("category: {slug}")))?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Category(Box::new(category.clone())))
            .await;

        Ok(category)
    }

    /// Get a category by its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the category is not found or the API request fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn category_by_id(&self, id: CategoryId) -> Result<Category, SupabaseError> {
        let cache_key = format!("category:id:{id}");

        if let Some(CacheValue::Category(category)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for category");
            return Ok(*category);
        }

        let mut url = self.endpoint("categories")?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("id", &format!("eq.{id}"))
            .append_pair("limit", "1");

        let mut categories: Vec<Category> = self.fetch(url).await?;
        let category = categories
            .pop()
            .ok_or_else(|| SupabaseError::NotFound(format!("category: {id}")))?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Category(Box::new(category.clone())))
            .await;

        Ok(category)
    }

    // =========================================================================
    // Menu Item Methods
    // =========================================================================

    /// Get the active items of a category, A-Z by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(category_id = %category_id))]
    pub async fn items_in_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<MenuItem>, SupabaseError> {
        let cache_key = format!("items:category:{category_id}");

        if let Some(CacheValue::Items(items)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for category items");
            return Ok(items);
        }

        let mut url = self.endpoint("menu_items")?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("category_id", &format!("eq.{category_id}"))
            .append_pair("is_active", "eq.true")
            .append_pair("order", "name.asc");

        let items: Vec<MenuItem> = self.fetch(url).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Items(items.clone()))
            .await;

        Ok(items)
    }

    /// Count the active items of a category without fetching them.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(category_id = %category_id))]
    pub async fn item_count(&self, category_id: CategoryId) -> Result<u64, SupabaseError> {
        let cache_key = format!("count:category:{category_id}");

        if let Some(CacheValue::Count(count)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for item count");
            return Ok(count);
        }

        let mut url = self.endpoint("menu_items")?;
        url.query_pairs_mut()
            .append_pair("select", "id")
            .append_pair("category_id", &format!("eq.{category_id}"))
            .append_pair("is_active", "eq.true");

        let count = self.fetch_count(url).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Count(count))
            .await;

        Ok(count)
    }

    /// Get a menu item by its slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the item is not found or the API request fails.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn item_by_slug(&self, slug: &str) -> Result<MenuItem, SupabaseError> {
        let cache_key = format!("item:slug:{slug}");

        if let Some(CacheValue::Item(item)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for menu item");
            return Ok(*item);
        }

        let mut url = self.endpoint("menu_items")?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("slug", &format!("eq.{slug}"))
            .append_pair("is_active", "eq.true")
            .append_pair("limit", "1");

        let mut items: Vec<MenuItem> = self.fetch(url).await?;
        let item = items
            .pop()
            .ok_or_else(|| SupabaseError::NotFound(format!("menu item: {slug}")))?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Item(Box::new(item.clone())))
            .await;

        Ok(item)
    }

    /// Get the ingredient list of a menu item with the embedded ingredient
    /// rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn item_ingredients(
        &self,
        item_id: MenuItemId,
    ) -> Result<Vec<ItemIngredient>, SupabaseError> {
        let cache_key = format!("ingredients:item:{item_id}");

        if let Some(CacheValue::Ingredients(ingredients)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for ingredients");
            return Ok(ingredients);
        }

        let mut url = self.endpoint("item_ingredients")?;
        url.query_pairs_mut()
            .append_pair("select", "quantity,ingredients(*)")
            .append_pair("menu_item_id", &format!("eq.{item_id}"));

        let ingredients: Vec<ItemIngredient> = self.fetch(url).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Ingredients(ingredients.clone()))
            .await;

        Ok(ingredients)
    }

    /// Get the active menu items whose ids are in `ids`, in store order.
    ///
    /// Not cached: the id set is per-visitor (favorites), so entries would
    /// almost never be shared.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    pub async fn items_by_ids(&self, ids: &[MenuItemId]) -> Result<Vec<MenuItem>, SupabaseError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let id_list = ids
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");

        let mut url = self.endpoint("menu_items")?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("id", &format!("in.({id_list})"))
            .append_pair("is_active", "eq.true");

        self.fetch(url).await
    }

    /// Get up to `limit` featured menu items.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn featured_items(&self, limit: u32) -> Result<Vec<MenuItem>, SupabaseError> {
        let cache_key = format!("items:featured:{limit}");

        if let Some(CacheValue::Items(items)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for featured items");
            return Ok(items);
        }

        let mut url = self.endpoint("menu_items")?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("is_featured", "eq.true")
            .append_pair("is_active", "eq.true")
            .append_pair("order", "name.asc")
            .append_pair("limit", &limit.to_string());

        let items: Vec<MenuItem> = self.fetch(url).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Items(items.clone()))
            .await;

        Ok(items)
    }

    /// Search active menu items by name or description, case-insensitive.
    ///
    /// Never cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(query = %query))]
    pub async fn search_items(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<MenuItem>, SupabaseError> {
        let needle = sanitize_pattern(query);
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        let mut url = self.endpoint("menu_items")?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("is_active", "eq.true")
            .append_pair(
                "or",
                &format!("(name.ilike.*{needle}*,description.ilike.*{needle}*)"),
            )
            .append_pair("order", "name.asc")
            .append_pair("limit", &limit.to_string());

        self.fetch(url).await
    }

    // =========================================================================
    // Services & Achievements
    // =========================================================================

    /// Get the active services in display order.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn services(&self) -> Result<Vec<Service>, SupabaseError> {
        let cache_key = "services".to_string();

        if let Some(CacheValue::Services(services)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for services");
            return Ok(services);
        }

        let mut url = self.endpoint("services")?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("is_active", "eq.true")
            .append_pair("order", "order_index.asc");

        let services: Vec<Service> = self.fetch(url).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Services(services.clone()))
            .await;

        Ok(services)
    }

    /// Get the active achievements in display order.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn achievements(&self) -> Result<Vec<Achievement>, SupabaseError> {
        let cache_key = "achievements".to_string();

        if let Some(CacheValue::Achievements(achievements)) = self.inner.cache.get(&cache_key).await
        {
            debug!("Cache hit for achievements");
            return Ok(achievements);
        }

        let mut url = self.endpoint("achievements")?;
        url.query_pairs_mut()
            .append_pair("select", "*")
            .append_pair("is_active", "eq.true")
            // Most recent milestones first; undated ones sink to the end
            .append_pair("order", "year.desc.nullslast,order_index.asc");

        let achievements: Vec<Achievement> = self.fetch(url).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Achievements(achievements.clone()))
            .await;

        Ok(achievements)
    }
}

/// Strip characters that `PostgREST` treats as logic-tree syntax inside an
/// `or=(...)` filter. The wildcard `*` is left alone on purpose.
fn sanitize_pattern(query: &str) -> String {
    query
        .trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '(' | ')' | '"' | '\\'))
        .collect()
}
