//! Client-side filter and sort engine.
//!
//! Given the in-memory product list and a facet selection, derives the
//! visible list deterministically: AND across facet types, OR within a
//! type, then a stable sort. Runs synchronously per state change - lists
//! are page-bounded (tens to low hundreds of items).

use rust_decimal::Decimal;

use weftwear_core::{FilterState, Product, SortKey};

/// The facet dimensions applied client-side.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FacetSelection {
    /// Selected fabrics; a product passes when its fabric is one of them.
    pub fabrics: Vec<String>,
    /// Selected colors; a product passes when any of its colors match.
    pub colors: Vec<String>,
    /// Selected sizes; a product passes when any of its sizes match.
    pub sizes: Vec<String>,
    /// Closed price interval on the effective price. `None` means the full
    /// default range, which applies no test.
    pub price_range: Option<(Decimal, Decimal)>,
}

impl From<&FilterState> for FacetSelection {
    fn from(filters: &FilterState) -> Self {
        Self {
            fabrics: filters.fabrics.clone(),
            colors: filters.colors.clone(),
            sizes: filters.sizes.clone(),
            price_range: filters
                .has_custom_price_range()
                .then_some(filters.price_range),
        }
    }
}

impl FacetSelection {
    /// Whether a product passes every selected facet (AND across facet
    /// types, OR within a type).
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        if !self.fabrics.is_empty() && !self.fabrics.contains(&product.fabric) {
            return false;
        }
        if !self.colors.is_empty()
            && !product.colors.iter().any(|color| self.colors.contains(color))
        {
            return false;
        }
        if !self.sizes.is_empty()
            && !product.sizes.iter().any(|size| self.sizes.contains(size))
        {
            return false;
        }
        if let Some((min, max)) = self.price_range {
            let price = product.effective_price();
            if price < min || price > max {
                return false;
            }
        }
        true
    }
}

/// Filter the product list by the facet selection, then sort.
///
/// Pure and deterministic: the same inputs always yield the same output.
/// Every ordering is stable, so ties keep their original relative order and
/// `recommended` preserves server order untouched.
#[must_use]
pub fn filter_and_sort(
    products: &[Product],
    facets: &FacetSelection,
    sort_by: SortKey,
) -> Vec<Product> {
    let mut visible: Vec<Product> = products
        .iter()
        .filter(|product| facets.matches(product))
        .cloned()
        .collect();
    sort_products(&mut visible, sort_by);
    visible
}

/// Sort in place. `Vec::sort_by` is stable, which every ordering relies on.
fn sort_products(products: &mut [Product], sort_by: SortKey) {
    match sort_by {
        SortKey::Recommended => {}
        SortKey::Newest => products.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortKey::Popular => products.sort_by(|a, b| b.order_count.cmp(&a.order_count)),
        SortKey::PriceHigh => {
            products.sort_by(|a, b| b.effective_price().cmp(&a.effective_price()));
        }
        SortKey::PriceLow => {
            products.sort_by(|a, b| a.effective_price().cmp(&b.effective_price()));
        }
        SortKey::Discount => {
            products.sort_by(|a, b| b.discount_ratio().cmp(&a.discount_ratio()));
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn product(id: i64, price: i64) -> Product {
        Product {
            id,
            name: format!("Product {id}"),
            description: String::new(),
            base_price: Decimal::from(price),
            discounted_price: None,
            images: Vec::new(),
            brand: String::new(),
            category: String::new(),
            fabric: String::new(),
            colors: Vec::new(),
            sizes: Vec::new(),
            stock_quantity: 1,
            created_at: None,
            order_count: 0,
        }
    }

    fn faceted(id: i64, fabric: &str, color: &str) -> Product {
        Product {
            fabric: fabric.to_string(),
            colors: vec![color.to_string()],
            ..product(id, 100)
        }
    }

    fn ids(products: &[Product]) -> Vec<i64> {
        products.iter().map(|p| p.id).collect()
    }

    #[test]
    fn test_filter_and_sort_is_pure() {
        let products = vec![faceted(1, "cotton", "red"), faceted(2, "silk", "blue")];
        let facets = FacetSelection {
            fabrics: vec!["cotton".to_string()],
            ..FacetSelection::default()
        };

        let first = filter_and_sort(&products, &facets, SortKey::PriceLow);
        let second = filter_and_sort(&products, &facets, SortKey::PriceLow);
        assert_eq!(first, second);
    }

    #[test]
    fn test_stable_sort_keeps_tie_order() {
        let products = vec![product(1, 100), product(2, 100), product(3, 50)];
        let sorted = filter_and_sort(&products, &FacetSelection::default(), SortKey::PriceLow);
        assert_eq!(ids(&sorted), vec![3, 1, 2]);
    }

    #[test]
    fn test_recommended_preserves_input_order() {
        let products = vec![product(5, 10), product(1, 300), product(9, 50)];
        let sorted = filter_and_sort(&products, &FacetSelection::default(), SortKey::Recommended);
        assert_eq!(ids(&sorted), vec![5, 1, 9]);
    }

    #[test]
    fn test_and_across_facet_types_or_within() {
        let products = vec![
            faceted(1, "cotton", "red"),
            faceted(2, "silk", "red"),
            faceted(3, "cotton", "blue"),
        ];

        // AND across types: must be cotton AND red
        let facets = FacetSelection {
            fabrics: vec!["cotton".to_string()],
            colors: vec!["red".to_string()],
            ..FacetSelection::default()
        };
        assert_eq!(ids(&filter_and_sort(&products, &facets, SortKey::Recommended)), vec![1]);

        // OR within a type: cotton OR silk, still red
        let facets = FacetSelection {
            fabrics: vec!["cotton".to_string(), "silk".to_string()],
            colors: vec!["red".to_string()],
            ..FacetSelection::default()
        };
        assert_eq!(
            ids(&filter_and_sort(&products, &facets, SortKey::Recommended)),
            vec![1, 2]
        );
    }

    #[test]
    fn test_price_range_uses_effective_price() {
        let discounted = Product {
            discounted_price: Some(Decimal::from(80)),
            ..product(1, 200)
        };
        let full_price = product(2, 200);

        let facets = FacetSelection {
            price_range: Some((Decimal::from(50), Decimal::from(100))),
            ..FacetSelection::default()
        };
        let visible = filter_and_sort(&[discounted, full_price], &facets, SortKey::Recommended);
        assert_eq!(ids(&visible), vec![1]);
    }

    #[test]
    fn test_price_range_closed_interval() {
        let products = vec![product(1, 50), product(2, 100), product(3, 101)];
        let facets = FacetSelection {
            price_range: Some((Decimal::from(50), Decimal::from(100))),
            ..FacetSelection::default()
        };
        let visible = filter_and_sort(&products, &facets, SortKey::Recommended);
        assert_eq!(ids(&visible), vec![1, 2]);
    }

    #[test]
    fn test_sort_newest_descending_missing_dates_last() {
        let dated = |id, year| Product {
            created_at: Some(Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).unwrap()),
            ..product(id, 100)
        };
        let products = vec![product(3, 100), dated(1, 2024), dated(2, 2026)];
        let sorted = filter_and_sort(&products, &FacetSelection::default(), SortKey::Newest);
        assert_eq!(ids(&sorted), vec![2, 1, 3]);
    }

    #[test]
    fn test_sort_popular_descending() {
        let popular = |id, orders| Product {
            order_count: orders,
            ..product(id, 100)
        };
        let products = vec![popular(1, 5), popular(2, 50), popular(3, 20)];
        let sorted = filter_and_sort(&products, &FacetSelection::default(), SortKey::Popular);
        assert_eq!(ids(&sorted), vec![2, 3, 1]);
    }

    #[test]
    fn test_sort_discount_by_ratio() {
        // 50% off beats a larger absolute discount on a pricier item (40%)
        let half_off = Product {
            discounted_price: Some(Decimal::from(50)),
            ..product(1, 100)
        };
        let forty_off = Product {
            discounted_price: Some(Decimal::from(300)),
            ..product(2, 500)
        };
        let sorted = filter_and_sort(
            &[forty_off, half_off],
            &FacetSelection::default(),
            SortKey::Discount,
        );
        assert_eq!(ids(&sorted), vec![1, 2]);
    }

    #[test]
    fn test_facet_selection_from_default_filters_has_no_price_test() {
        let facets = FacetSelection::from(&FilterState::default());
        assert!(facets.price_range.is_none());
    }
}
