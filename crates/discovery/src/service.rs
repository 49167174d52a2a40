//! Filter/pagination service.
//!
//! Orchestrates fetch-with-filters and page-merge-on-load-more, and houses
//! the filter-change semantics (any facet change restarts pagination from
//! page 1, so a stale "page 4 of a different filter" can never leak into a
//! fresh result set).

use tracing::instrument;

use weftwear_core::{FilterChange, FilterKey, FilterState, PageResult};

use crate::catalog::CatalogClient;
use crate::error::CatalogError;

/// Service over the catalog client for filtered, paginated product loads.
#[derive(Clone)]
pub struct FilterService {
    client: CatalogClient,
}

impl FilterService {
    /// Create a new service over the given client.
    #[must_use]
    pub const fn new(client: CatalogClient) -> Self {
        Self { client }
    }

    /// Fetch one page of products for the given filters.
    ///
    /// # Errors
    ///
    /// Propagates catalog errors untouched - never retried, never
    /// swallowed. Callers surface them; an `Err` is not "no results".
    #[instrument(skip(self, filters))]
    pub async fn load_filtered_products(
        &self,
        filters: &FilterState,
        page: Option<u32>,
    ) -> Result<PageResult, CatalogError> {
        self.client.fetch_products(filters, page).await
    }

    /// Fetch the next page and merge it into `current`.
    ///
    /// Returns `Ok(None)` when no further page exists - no fetch is issued.
    /// Otherwise the merged result's `products` is `current.products`
    /// concatenated with the new page's, in page order: no reordering and no
    /// de-duplication by ID (duplicates can appear if the backend dataset
    /// shifts between fetches; preserved as observed behavior).
    ///
    /// # Errors
    ///
    /// Propagates fetch errors; callers must not conflate an `Err` with the
    /// `Ok(None)` no-more-pages signal.
    #[instrument(skip(self, current, filters), fields(current_page = current.current_page))]
    pub async fn load_more_products(
        &self,
        current: &PageResult,
        filters: &FilterState,
    ) -> Result<Option<PageResult>, CatalogError> {
        if !current.has_next_page() {
            return Ok(None);
        }

        let next = self
            .client
            .fetch_products(filters, Some(current.current_page + 1))
            .await?;

        let mut products = current.products.clone();
        products.extend(next.products);

        Ok(Some(PageResult {
            products,
            total_count: next.total_count,
            total_pages: next.total_pages,
            current_page: next.current_page,
            per_page: next.per_page,
        }))
    }
}

// =============================================================================
// Filter-change semantics (pure)
// =============================================================================

/// Apply a single change, returning the new state.
///
/// Resets `page` to 1 unless the change is `Page` or `PerPage`, so changing
/// any facet always restarts pagination.
#[must_use]
pub fn apply_filter_change(mut filters: FilterState, change: FilterChange) -> FilterState {
    let mut reset_page = true;
    match change {
        FilterChange::Query(query) => filters.query = query,
        FilterChange::CategoryId(id) => filters.category_id = id,
        FilterChange::Brand(brand) => filters.brand = brand,
        FilterChange::Featured(flag) => filters.featured = flag,
        FilterChange::Bestseller(flag) => filters.bestseller = flag,
        FilterChange::NewArrival(flag) => filters.new_arrival = flag,
        FilterChange::Trending(flag) => filters.trending = flag,
        FilterChange::InStock(flag) => filters.in_stock = flag,
        FilterChange::MinRating(rating) => filters.min_rating = rating,
        FilterChange::Fabrics(fabrics) => filters.fabrics = fabrics,
        FilterChange::Colors(colors) => filters.colors = colors,
        FilterChange::Sizes(sizes) => filters.sizes = sizes,
        FilterChange::PriceRange(min, max) => {
            // Keep the invariant min <= max regardless of input order
            filters.price_range = if min <= max { (min, max) } else { (max, min) };
        }
        FilterChange::SortBy(sort_by) => filters.sort_by = sort_by,
        FilterChange::Page(page) => {
            filters.page = page.max(1);
            reset_page = false;
        }
        FilterChange::PerPage(per_page) => {
            filters.per_page = per_page.max(1);
            reset_page = false;
        }
    }
    if reset_page {
        filters.page = 1;
    }
    filters
}

/// Clear one filter back to its default, restarting pagination.
#[must_use]
pub fn clear_filter(mut filters: FilterState, key: FilterKey) -> FilterState {
    let defaults = FilterState::default();
    match key {
        FilterKey::Query => filters.query = None,
        FilterKey::Category => filters.category_id = None,
        FilterKey::Brand => filters.brand = None,
        FilterKey::Featured => filters.featured = false,
        FilterKey::Bestseller => filters.bestseller = false,
        FilterKey::NewArrival => filters.new_arrival = false,
        FilterKey::Trending => filters.trending = false,
        FilterKey::InStock => filters.in_stock = false,
        FilterKey::Rating => filters.min_rating = None,
        FilterKey::Fabrics => filters.fabrics.clear(),
        FilterKey::Colors => filters.colors.clear(),
        FilterKey::Sizes => filters.sizes.clear(),
        FilterKey::PriceRange => filters.price_range = defaults.price_range,
        FilterKey::SortBy => filters.sort_by = defaults.sort_by,
    }
    filters.page = 1;
    filters
}

/// Reset everything to the provided defaults.
#[must_use]
pub fn clear_all_filters(defaults: &FilterState) -> FilterState {
    defaults.clone()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use weftwear_core::SortKey;

    fn deep_page_state() -> FilterState {
        FilterState {
            page: 5,
            ..FilterState::default()
        }
    }

    #[test]
    fn test_facet_change_resets_page() {
        let next = apply_filter_change(
            deep_page_state(),
            FilterChange::Fabrics(vec!["cotton".to_string()]),
        );
        assert_eq!(next.page, 1);
        assert_eq!(next.fabrics, vec!["cotton".to_string()]);
    }

    #[test]
    fn test_explicit_page_change_is_preserved() {
        let next = apply_filter_change(deep_page_state(), FilterChange::Page(6));
        assert_eq!(next.page, 6);
    }

    #[test]
    fn test_per_page_change_keeps_page() {
        let next = apply_filter_change(deep_page_state(), FilterChange::PerPage(50));
        assert_eq!(next.page, 5);
        assert_eq!(next.per_page, 50);
    }

    #[test]
    fn test_sort_change_resets_page() {
        let next = apply_filter_change(deep_page_state(), FilterChange::SortBy(SortKey::Newest));
        assert_eq!(next.page, 1);
        assert_eq!(next.sort_by, SortKey::Newest);
    }

    #[test]
    fn test_price_range_keeps_min_max_invariant() {
        let next = apply_filter_change(
            FilterState::default(),
            FilterChange::PriceRange(Decimal::from(500), Decimal::from(100)),
        );
        assert_eq!(next.price_range, (Decimal::from(100), Decimal::from(500)));
    }

    #[test]
    fn test_page_change_clamps_to_one() {
        let next = apply_filter_change(FilterState::default(), FilterChange::Page(0));
        assert_eq!(next.page, 1);
    }

    #[test]
    fn test_clear_filter_resets_field_and_page() {
        let state = FilterState {
            page: 4,
            colors: vec!["red".to_string(), "blue".to_string()],
            ..FilterState::default()
        };
        let next = clear_filter(state, FilterKey::Colors);
        assert!(next.colors.is_empty());
        assert_eq!(next.page, 1);
    }

    #[test]
    fn test_clear_all_filters_copies_defaults() {
        let defaults = FilterState::default();
        let cleared = clear_all_filters(&defaults);
        assert_eq!(cleared, defaults);
    }
}
