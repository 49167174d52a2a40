//! Filter state for the product discovery pipeline.
//!
//! `FilterState` is owned by the discovery controller: one instance per page
//! view, seeded from the URL on mount, mutated by user interaction, and
//! discarded on navigation away. Nothing here performs I/O.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default page size for product listings.
pub const DEFAULT_PER_PAGE: u32 = 20;

/// Upper bound of the default (full) price range.
#[must_use]
pub fn max_price() -> Decimal {
    Decimal::from(10_000)
}

/// The full default price range, meaning "no price filter applied".
#[must_use]
pub fn full_price_range() -> (Decimal, Decimal) {
    (Decimal::ZERO, max_price())
}

// =============================================================================
// Sort Keys
// =============================================================================

/// Sort orders for the product listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Server order preserved (no client-side reordering).
    #[default]
    Recommended,
    /// Descending by listing time.
    Newest,
    /// Descending by order count.
    Popular,
    /// Descending by effective price.
    PriceHigh,
    /// Ascending by effective price.
    PriceLow,
    /// Descending by discount ratio.
    Discount,
}

impl SortKey {
    /// The wire/URL representation of this sort key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Recommended => "recommended",
            Self::Newest => "newest",
            Self::Popular => "popular",
            Self::PriceHigh => "price-high",
            Self::PriceLow => "price-low",
            Self::Discount => "discount",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing a [`SortKey`] from user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sort key: {0}")]
pub struct ParseSortKeyError(pub String);

impl FromStr for SortKey {
    type Err = ParseSortKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recommended" => Ok(Self::Recommended),
            "newest" => Ok(Self::Newest),
            "popular" => Ok(Self::Popular),
            "price-high" => Ok(Self::PriceHigh),
            "price-low" => Ok(Self::PriceLow),
            "discount" => Ok(Self::Discount),
            other => Err(ParseSortKeyError(other.to_string())),
        }
    }
}

// =============================================================================
// Filter State
// =============================================================================

/// The complete filter state for one product listing view.
///
/// Invariants: `price_range.0 <= price_range.1` and `page >= 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    /// Free-text search query.
    pub query: Option<String>,
    /// Selected category ID.
    pub category_id: Option<i64>,
    /// Selected brand.
    pub brand: Option<String>,
    /// Only featured products.
    pub featured: bool,
    /// Only bestsellers.
    pub bestseller: bool,
    /// Only new arrivals.
    pub new_arrival: bool,
    /// Only trending products.
    pub trending: bool,
    /// Only products with stock.
    pub in_stock: bool,
    /// Minimum average rating.
    pub min_rating: Option<Decimal>,
    /// Selected fabrics (client-side facet).
    pub fabrics: Vec<String>,
    /// Selected colors (client-side facet).
    pub colors: Vec<String>,
    /// Selected sizes (client-side facet).
    pub sizes: Vec<String>,
    /// Closed price interval `[min, max]`.
    pub price_range: (Decimal, Decimal),
    /// Sort order.
    pub sort_by: SortKey,
    /// 1-based page number.
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            query: None,
            category_id: None,
            brand: None,
            featured: false,
            bestseller: false,
            new_arrival: false,
            trending: false,
            in_stock: false,
            min_rating: None,
            fabrics: Vec::new(),
            colors: Vec::new(),
            sizes: Vec::new(),
            price_range: full_price_range(),
            sort_by: SortKey::Recommended,
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl FilterState {
    /// Whether the price range narrows the full default range.
    #[must_use]
    pub fn has_custom_price_range(&self) -> bool {
        self.price_range != full_price_range()
    }
}

// =============================================================================
// Filter Changes
// =============================================================================

/// A single user-initiated change to the filter state.
///
/// Applying any variant other than [`Page`](Self::Page) or
/// [`PerPage`](Self::PerPage) restarts pagination from page 1.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterChange {
    Query(Option<String>),
    CategoryId(Option<i64>),
    Brand(Option<String>),
    Featured(bool),
    Bestseller(bool),
    NewArrival(bool),
    Trending(bool),
    InStock(bool),
    MinRating(Option<Decimal>),
    Fabrics(Vec<String>),
    Colors(Vec<String>),
    Sizes(Vec<String>),
    PriceRange(Decimal, Decimal),
    SortBy(SortKey),
    Page(u32),
    PerPage(u32),
}

/// Addressable filter fields, used to clear a single filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKey {
    Query,
    Category,
    Brand,
    Featured,
    Bestseller,
    NewArrival,
    Trending,
    InStock,
    Rating,
    Fabrics,
    Colors,
    Sizes,
    PriceRange,
    SortBy,
}

// =============================================================================
// Applied Filters (display)
// =============================================================================

/// Kinds of applied filters, in their display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Price,
    Category,
    Brand,
    Featured,
    Bestseller,
    NewArrival,
    Trending,
    InStock,
    Rating,
    Query,
    Fabric,
    Color,
    Size,
}

/// A filter rendered as an "active filter" chip.
///
/// Derived from [`FilterState`] for display; never stored, recomputed on
/// every render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedFilter {
    /// Which filter this chip represents.
    pub kind: FilterKind,
    /// Human-readable label (e.g. "Price", "Color").
    pub label: String,
    /// Rendered value, when the filter carries one.
    pub value: Option<String>,
}
