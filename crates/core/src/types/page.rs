//! Pagination result types.

use serde::{Deserialize, Serialize};

use super::product::Product;

/// One page of products, as normalized from a catalog response.
///
/// Produced fresh by each fetch. When loading more, successive pages are
/// merged by concatenating `products` in page order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult {
    /// Products accumulated so far (page N's items always follow page N-1's).
    pub products: Vec<Product>,
    /// Total matching products across all pages.
    pub total_count: u64,
    /// Total number of pages.
    pub total_pages: u32,
    /// The page this result extends to (1-based).
    pub current_page: u32,
    /// Page size the server used.
    pub per_page: u32,
}

impl PageResult {
    /// Whether a further page exists after `current_page`.
    #[must_use]
    pub const fn has_next_page(&self) -> bool {
        self.current_page < self.total_pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_next_page() {
        let page = PageResult {
            products: Vec::new(),
            total_count: 40,
            total_pages: 2,
            current_page: 1,
            per_page: 20,
        };
        assert!(page.has_next_page());

        let last = PageResult {
            current_page: 2,
            ..page
        };
        assert!(!last.has_next_page());
    }
}
