//! Raw wire shapes for catalog responses.
//!
//! The backend answers `GET /products` with either a bare JSON array of
//! products (legacy shape) or an object `{products, pagination}`. Both are
//! normalized here, at a single boundary, into a canonical
//! [`PageResult`] - the ambiguity never leaks past the client layer.

use serde::Deserialize;

use weftwear_core::{PageResult, Product};

/// Pagination block of the paged response shape.
#[derive(Debug, Deserialize)]
pub(crate) struct WirePagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_count: u64,
    pub per_page: u32,
}

/// Either response shape of `GET /products`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum WireProductsResponse {
    Paged {
        products: Vec<Product>,
        pagination: WirePagination,
    },
    Legacy(Vec<Product>),
}

/// Error body of a non-2xx catalog response.
#[derive(Debug, Deserialize)]
pub(crate) struct WireErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Option<Vec<String>>,
}

/// Normalize either response shape into a [`PageResult`].
///
/// A bare array synthesizes its pagination: one page holding everything the
/// server returned, attributed to the page that was requested.
pub(crate) fn normalize_products_response(
    response: WireProductsResponse,
    requested_page: u32,
    requested_per_page: u32,
) -> PageResult {
    match response {
        WireProductsResponse::Paged {
            products,
            pagination,
        } => PageResult {
            products,
            total_count: pagination.total_count,
            total_pages: pagination.total_pages,
            current_page: pagination.current_page,
            per_page: pagination.per_page,
        },
        WireProductsResponse::Legacy(products) => PageResult {
            total_count: products.len() as u64,
            total_pages: 1,
            current_page: requested_page.max(1),
            per_page: requested_per_page,
            products,
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const PAGED: &str = r#"{
        "products": [
            {"id": 1, "name": "Linen Shirt", "base_price": "59.00"},
            {"id": 2, "name": "Silk Scarf", "base_price": "35.00"}
        ],
        "pagination": {
            "current_page": 2,
            "total_pages": 5,
            "total_count": 93,
            "per_page": 20
        }
    }"#;

    const LEGACY: &str = r#"[
        {"id": 1, "name": "Linen Shirt", "base_price": "59.00"},
        {"id": 2, "name": "Silk Scarf", "base_price": "35.00"},
        {"id": 3, "name": "Wool Coat", "base_price": "210.00"}
    ]"#;

    #[test]
    fn test_paged_shape() {
        let wire: WireProductsResponse = serde_json::from_str(PAGED).unwrap();
        let page = normalize_products_response(wire, 2, 20);
        assert_eq!(page.products.len(), 2);
        assert_eq!(page.current_page, 2);
        assert_eq!(page.total_pages, 5);
        assert_eq!(page.total_count, 93);
    }

    #[test]
    fn test_legacy_bare_array_synthesizes_pagination() {
        let wire: WireProductsResponse = serde_json::from_str(LEGACY).unwrap();
        let page = normalize_products_response(wire, 1, 20);
        assert_eq!(page.products.len(), 3);
        assert_eq!(page.total_count, 3);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.current_page, 1);
        assert_eq!(page.per_page, 20);
        assert!(!page.has_next_page());
    }

    #[test]
    fn test_legacy_page_zero_clamps_to_one() {
        let wire: WireProductsResponse = serde_json::from_str(LEGACY).unwrap();
        let page = normalize_products_response(wire, 0, 20);
        assert_eq!(page.current_page, 1);
    }

    #[test]
    fn test_error_body_optional_fields() {
        let body: WireErrorBody =
            serde_json::from_str(r#"{"success": false, "message": "nope"}"#).unwrap();
        assert_eq!(body.message.as_deref(), Some("nope"));
        assert!(body.errors.is_none());
    }
}
