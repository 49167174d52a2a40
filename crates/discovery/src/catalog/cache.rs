//! Cache types for catalog responses.

use weftwear_core::{Category, PageResult};

/// Cache key for catalog responses.
///
/// Only unfiltered listings are cacheable; search and filtered queries are
/// always fetched fresh. The key carries every request parameter that can
/// change the response, so a page-size change never hits a stale entry.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Products { page: u32, per_page: u32 },
    Categories,
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Products(PageResult),
    Categories(Vec<Category>),
}
