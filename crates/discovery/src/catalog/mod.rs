//! Catalog API client.
//!
//! One `reqwest` client wraps every outbound request to the catalog backend
//! and either extracts a uniform payload or rejects with a normalized
//! [`CatalogError`]. Unfiltered listings and the category list are cached
//! via `moka` (TTL from config, 5 minutes by default).

mod cache;
mod categories;
mod wire;

pub use categories::CategoryCache;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tracing::{debug, instrument};

use weftwear_core::{Category, FilterState, PageResult};

use crate::config::DiscoveryConfig;
use crate::error::CatalogError;

use cache::{CacheKey, CacheValue};
use wire::{WireErrorBody, WireProductsResponse, normalize_products_response};

// =============================================================================
// CatalogClient
// =============================================================================

/// Client for the catalog REST API.
///
/// Cheaply cloneable; all clones share one connection pool and cache.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: String,
    bearer_token: Option<String>,
    timeout: Duration,
    cache: Cache<CacheKey, CacheValue>,
}

impl CatalogClient {
    /// Create a new catalog API client.
    #[must_use]
    pub fn new(config: &DiscoveryConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(config.cache_ttl_secs))
            .build();

        Self {
            inner: Arc::new(CatalogClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.trim_end_matches('/').to_string(),
                bearer_token: config.bearer_token(),
                timeout: Duration::from_secs(config.timeout_secs),
                cache,
            }),
        }
    }

    /// Execute a GET request and return the body of a 2xx response.
    async fn get_text(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<String, CatalogError> {
        let url = format!("{}{path}", self.inner.base_url);
        let mut request = self
            .inner
            .client
            .get(url)
            .timeout(self.inner.timeout)
            .query(query);
        if let Some(token) = &self.inner.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        // Check for rate limiting
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(CatalogError::RateLimited(retry_after));
        }

        // Get response body as text first for better error diagnostics
        let text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %text.chars().take(500).collect::<String>(),
                "Catalog API returned non-success status"
            );
            return Err(classify_failure(status, &text));
        }

        Ok(text)
    }

    /// Fetch one page of products for the given filter state.
    ///
    /// `page_override` replaces `filters.page` when given (used by
    /// load-more, which requests `current_page + 1`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request or response normalization fails.
    #[instrument(skip(self, filters))]
    pub async fn fetch_products(
        &self,
        filters: &FilterState,
        page_override: Option<u32>,
    ) -> Result<PageResult, CatalogError> {
        let page = page_override.unwrap_or(filters.page).max(1);
        let per_page = filters.per_page;

        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(text) = filters
            .query
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
        {
            query.push(("query", text.to_string()));
        }
        if let Some(id) = filters.category_id {
            query.push(("category_id", id.to_string()));
        }
        if filters.has_custom_price_range() {
            query.push(("min_price", filters.price_range.0.to_string()));
            query.push(("max_price", filters.price_range.1.to_string()));
        }
        query.push(("page", page.to_string()));
        query.push(("per_page", per_page.to_string()));

        // Only default (unfiltered) listings are cacheable
        let cacheable = filters.query.is_none()
            && filters.category_id.is_none()
            && !filters.has_custom_price_range();
        let cache_key = CacheKey::Products { page, per_page };

        if cacheable
            && let Some(CacheValue::Products(cached)) = self.inner.cache.get(&cache_key).await
        {
            debug!("Cache hit for products page");
            return Ok(cached);
        }

        let text = self.get_text("/products", &query).await?;
        let wire: WireProductsResponse = serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %text.chars().take(500).collect::<String>(),
                "Failed to parse catalog products response"
            );
            CatalogError::Parse(e)
        })?;

        let result = normalize_products_response(wire, page, per_page);

        if cacheable {
            self.inner
                .cache
                .insert(cache_key, CacheValue::Products(result.clone()))
                .await;
        }

        Ok(result)
    }

    /// Fetch the category list.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails. Callers that only need facet
    /// labels may degrade to an empty list (see [`CategoryCache`]).
    #[instrument(skip(self))]
    pub async fn fetch_categories(&self) -> Result<Vec<Category>, CatalogError> {
        if let Some(CacheValue::Categories(cached)) =
            self.inner.cache.get(&CacheKey::Categories).await
        {
            debug!("Cache hit for categories");
            return Ok(cached);
        }

        let text = self.get_text("/categories", &[]).await?;
        let categories: Vec<Category> = serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %text.chars().take(500).collect::<String>(),
                "Failed to parse catalog categories response"
            );
            CatalogError::Parse(e)
        })?;

        self.inner
            .cache
            .insert(CacheKey::Categories, CacheValue::Categories(categories.clone()))
            .await;

        Ok(categories)
    }

    /// Invalidate all cached catalog data.
    pub async fn invalidate_all(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }
}

/// Normalize a non-2xx response into a [`CatalogError`].
///
/// 401 responses and "deactivated" account messages classify as
/// [`CatalogError::Auth`] so the session layer can react; everything else is
/// surfaced as [`CatalogError::Api`] with the body's `message`/`errors[]`.
fn classify_failure(status: reqwest::StatusCode, body: &str) -> CatalogError {
    let parsed: Option<WireErrorBody> = serde_json::from_str(body).ok();
    let (message, errors) = parsed.map_or_else(
        || (format!("HTTP {status}"), Vec::new()),
        |body| {
            (
                body.message.unwrap_or_else(|| format!("HTTP {status}")),
                body.errors.unwrap_or_default(),
            )
        },
    );

    if status == reqwest::StatusCode::UNAUTHORIZED
        || message.to_lowercase().contains("deactivated")
    {
        return CatalogError::Auth(message);
    }

    CatalogError::Api {
        status: status.as_u16(),
        message,
        errors,
    }
}
