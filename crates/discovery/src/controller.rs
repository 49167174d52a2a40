//! Discovery page controller.
//!
//! The orchestrating half of the listing page: owns the filter state, the
//! merged product list, and the loading/error flags, and talks to the
//! service layer. Rendering is a separate, pure layer consuming
//! [`DiscoveryView`] - an explicit data boundary instead of implicit
//! prop-drilling.
//!
//! # Concurrency
//!
//! Execution is event-loop driven; every fetch takes a token from a
//! monotonically increasing sequence and a response is applied only if its
//! token is still the latest issued, so a slow response for an old filter
//! can never clobber newer results. The `loading` flag is set before the
//! await begins and cleared on every exit path.

use std::sync::Arc;

use tracing::instrument;

use weftwear_core::{
    AppliedFilter, Category, FilterChange, FilterKey, FilterState, PageResult, Product, SortKey,
};

use crate::catalog::{CatalogClient, CategoryCache};
use crate::engine::{FacetSelection, filter_and_sort};
use crate::error::CatalogError;
use crate::filters::{can_load_more, extract_active_filters};
use crate::scroll::SentinelObserver;
use crate::service::{FilterService, apply_filter_change, clear_all_filters, clear_filter};
use crate::urlsync::{HistoryWriter, QuerySync, get_query_param, read_search_query};

// =============================================================================
// DiscoveryController
// =============================================================================

/// Controller for one product discovery page view.
pub struct DiscoveryController {
    service: FilterService,
    categories: CategoryCache,
    defaults: FilterState,
    filters: FilterState,
    /// Raw `category` URL parameter; resolved against the category list
    /// during mount (it may be a slug).
    category_param: Option<String>,
    result: Option<PageResult>,
    visible: Vec<Product>,
    loading: bool,
    error: Option<String>,
    latest_token: u64,
    sentinel: SentinelObserver,
    query_sync: QuerySync,
}

impl DiscoveryController {
    /// Create a controller for the given location, seeding the filter state
    /// from the URL (`query`, with `search` as a read alias, and
    /// `category`).
    #[must_use]
    pub fn new(
        client: CatalogClient,
        history: Arc<dyn HistoryWriter>,
        pathname: &str,
        search: &str,
    ) -> Self {
        let defaults = FilterState::default();
        let mut filters = defaults.clone();
        filters.query = read_search_query(search).filter(|q| !q.trim().is_empty());

        Self {
            service: FilterService::new(client.clone()),
            categories: CategoryCache::new(client),
            defaults,
            filters,
            category_param: get_query_param(search, "category"),
            result: None,
            visible: Vec::new(),
            loading: false,
            error: None,
            latest_token: 0,
            sentinel: SentinelObserver::new(false),
            query_sync: QuerySync::new(pathname, search, history),
        }
    }

    /// Mount the page: load facet labels, resolve the category parameter,
    /// and fetch page 1.
    ///
    /// # Errors
    ///
    /// Propagates authentication errors; everything else surfaces on the
    /// view. Category loading failures degrade to an empty label list.
    #[instrument(skip(self))]
    pub async fn mount(&mut self) -> Result<(), CatalogError> {
        self.categories.load().await;
        if let Some(param) = self.category_param.take() {
            self.filters.category_id = self.categories.resolve(&param);
        }
        self.reload().await
    }

    // =========================================================================
    // User interactions
    // =========================================================================

    /// Change the search text: refetches page 1 and writes the URL
    /// (debounced, replacing the history entry).
    ///
    /// # Errors
    ///
    /// Propagates authentication errors; other failures surface on the view.
    pub async fn set_search(&mut self, text: &str) -> Result<(), CatalogError> {
        let trimmed = text.trim();
        let value = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self.filters = apply_filter_change(
            self.filters.clone(),
            FilterChange::Query(value.clone()),
        );
        self.query_sync.set_param("query", value.as_deref());
        self.reload().await
    }

    /// Change the selected category: refetches page 1 and writes the URL.
    ///
    /// # Errors
    ///
    /// Propagates authentication errors; other failures surface on the view.
    pub async fn set_category(&mut self, category_id: Option<i64>) -> Result<(), CatalogError> {
        self.filters = apply_filter_change(
            self.filters.clone(),
            FilterChange::CategoryId(category_id),
        );
        let value = category_id.map(|id| id.to_string());
        self.query_sync.set_param("category", value.as_deref());
        self.reload().await
    }

    /// Change the price range: refetches page 1 (the range is part of the
    /// backend query as well as the client-side engine).
    ///
    /// # Errors
    ///
    /// Propagates authentication errors; other failures surface on the view.
    pub async fn set_price_range(
        &mut self,
        min: rust_decimal::Decimal,
        max: rust_decimal::Decimal,
    ) -> Result<(), CatalogError> {
        self.filters =
            apply_filter_change(self.filters.clone(), FilterChange::PriceRange(min, max));
        self.reload().await
    }

    /// Toggle a fabric selection. Client-side only: re-derives the visible
    /// list without a refetch.
    pub fn toggle_fabric(&mut self, fabric: &str) {
        let fabrics = toggled(&self.filters.fabrics, fabric);
        self.filters = apply_filter_change(self.filters.clone(), FilterChange::Fabrics(fabrics));
        self.derive_visible();
    }

    /// Toggle a color selection. Client-side only.
    pub fn toggle_color(&mut self, color: &str) {
        let colors = toggled(&self.filters.colors, color);
        self.filters = apply_filter_change(self.filters.clone(), FilterChange::Colors(colors));
        self.derive_visible();
    }

    /// Toggle a size selection. Client-side only.
    pub fn toggle_size(&mut self, size: &str) {
        let sizes = toggled(&self.filters.sizes, size);
        self.filters = apply_filter_change(self.filters.clone(), FilterChange::Sizes(sizes));
        self.derive_visible();
    }

    /// Change the sort order. Client-side only.
    pub fn set_sort(&mut self, sort_by: SortKey) {
        self.filters = apply_filter_change(self.filters.clone(), FilterChange::SortBy(sort_by));
        self.derive_visible();
    }

    /// Clear one filter. Server-backed filters (query, category, price
    /// range) refetch; client-side facets only re-derive.
    ///
    /// # Errors
    ///
    /// Propagates authentication errors; other failures surface on the view.
    pub async fn clear(&mut self, key: FilterKey) -> Result<(), CatalogError> {
        self.filters = clear_filter(self.filters.clone(), key);
        match key {
            FilterKey::Query => {
                self.query_sync.set_param("query", None);
                self.reload().await
            }
            FilterKey::Category => {
                self.query_sync.set_param("category", None);
                self.reload().await
            }
            FilterKey::PriceRange => self.reload().await,
            _ => {
                self.derive_visible();
                Ok(())
            }
        }
    }

    /// Reset every filter to the defaults and refetch.
    ///
    /// # Errors
    ///
    /// Propagates authentication errors; other failures surface on the view.
    pub async fn clear_all(&mut self) -> Result<(), CatalogError> {
        self.filters = clear_all_filters(&self.defaults);
        self.query_sync.set_param("query", None);
        self.query_sync.set_param("category", None);
        self.reload().await
    }

    /// Feed a sentinel visibility sample. One hidden-to-visible transition
    /// fires at most one load-more; completing the load re-arms the gate, so
    /// the next sample of a still-visible sentinel (short page) pages again.
    ///
    /// # Errors
    ///
    /// Propagates authentication errors; other failures surface on the view
    /// and stop paging until the user triggers again.
    #[instrument(skip(self))]
    pub async fn sentinel_visible(&mut self, visible: bool) -> Result<(), CatalogError> {
        if self.sentinel.observe(visible) {
            self.load_next_page().await?;
        }
        Ok(())
    }

    // =========================================================================
    // View boundary
    // =========================================================================

    /// Snapshot the state the rendering layer needs.
    #[must_use]
    pub fn view(&self) -> DiscoveryView {
        DiscoveryView {
            products: self.visible.clone(),
            total_count: self.result.as_ref().map_or(0, |r| r.total_count),
            applied_filters: extract_active_filters(&self.filters),
            can_load_more: can_load_more(self.result.as_ref()),
            loading: self.loading,
            error: self.error.clone(),
            query: self.filters.query.clone(),
            sort_by: self.filters.sort_by,
            categories: self.categories.get().to_vec(),
        }
    }

    /// The current filter state.
    #[must_use]
    pub const fn filters(&self) -> &FilterState {
        &self.filters
    }

    // =========================================================================
    // Fetch plumbing
    // =========================================================================

    /// Fetch page 1 for the current filters, replacing the result set.
    async fn reload(&mut self) -> Result<(), CatalogError> {
        let token = self.begin_load();
        let fetched = self
            .service
            .load_filtered_products(&self.filters, None)
            .await;
        self.finish_load(token, fetched.map(Some)).map(|_| ())
    }

    /// Fetch and merge the next page. Returns whether the result advanced.
    async fn load_next_page(&mut self) -> Result<bool, CatalogError> {
        let Some(current) = self.result.clone() else {
            return Ok(false);
        };
        if !current.has_next_page() {
            self.sentinel.set_has_more(false);
            return Ok(false);
        }

        let token = self.begin_load();
        let fetched = self.service.load_more_products(&current, &self.filters).await;
        self.finish_load(token, fetched)
    }

    /// Issue a fetch token and flag the load. The flag is set before the
    /// fetch is awaited so a second trigger cannot race it.
    fn begin_load(&mut self) -> u64 {
        self.latest_token += 1;
        self.loading = true;
        self.sentinel.set_loading(true);
        self.latest_token
    }

    /// Apply a fetch outcome. Responses carrying a superseded token are
    /// discarded outright - a newer request owns the state now.
    fn finish_load(
        &mut self,
        token: u64,
        outcome: Result<Option<PageResult>, CatalogError>,
    ) -> Result<bool, CatalogError> {
        if token != self.latest_token {
            return Ok(false);
        }

        self.loading = false;
        self.sentinel.set_loading(false);

        match outcome {
            Ok(Some(page)) => {
                self.error = None;
                self.sentinel.set_has_more(page.has_next_page());
                self.result = Some(page);
                self.derive_visible();
                Ok(true)
            }
            Ok(None) => {
                self.sentinel.set_has_more(false);
                Ok(false)
            }
            Err(e) if e.is_auth() => Err(e),
            Err(e) => {
                // An error is not "no more results": has_more stays as-is
                // and the user retries by triggering again
                self.error = Some(e.user_message());
                Ok(false)
            }
        }
    }

    /// Re-derive the visible list from the merged products.
    fn derive_visible(&mut self) {
        let products = self.result.as_ref().map_or(&[][..], |r| &r.products);
        self.visible = filter_and_sort(
            products,
            &FacetSelection::from(&self.filters),
            self.filters.sort_by,
        );
    }
}

/// Toggle membership of `value` in a selection list.
fn toggled(values: &[String], value: &str) -> Vec<String> {
    if values.iter().any(|v| v == value) {
        values.iter().filter(|v| *v != value).cloned().collect()
    } else {
        let mut next = values.to_vec();
        next.push(value.to_string());
        next
    }
}

// =============================================================================
// DiscoveryView
// =============================================================================

/// Everything the rendering layer needs to draw the discovery page.
#[derive(Debug, Clone)]
pub struct DiscoveryView {
    /// Products after client-side filtering and sorting.
    pub products: Vec<Product>,
    /// Total matching products on the server.
    pub total_count: u64,
    /// Active filter chips, in display order.
    pub applied_filters: Vec<AppliedFilter>,
    /// Whether a load-more sentinel should render.
    pub can_load_more: bool,
    /// Whether a fetch is in flight.
    pub loading: bool,
    /// User-visible error, if the last load failed.
    pub error: Option<String>,
    /// Current search text.
    pub query: Option<String>,
    /// Current sort order.
    pub sort_by: SortKey,
    /// Categories for facet labels (empty if their load failed).
    pub categories: Vec<Category>,
}
