//! Filter state utilities.
//!
//! Pure functions over [`FilterState`]: activity checks, the derived list of
//! "active filter" chips, and the load-more predicate. No I/O.

use rust_decimal::Decimal;

use weftwear_core::{AppliedFilter, FilterKind, FilterState, PageResult};

/// A filter value whose "active" state can be queried uniformly.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// On/off flag; active only when `true`.
    Flag(bool),
    /// Free text; active when the trimmed value is non-empty.
    Text(String),
    /// Numeric threshold; active when strictly positive.
    Number(Decimal),
    /// Multi-select facet; active when non-empty.
    List(Vec<String>),
}

impl FilterValue {
    /// Whether this value counts as an applied filter.
    #[must_use]
    pub fn is_active(&self) -> bool {
        match self {
            Self::Flag(flag) => *flag,
            Self::Text(text) => !text.trim().is_empty(),
            Self::Number(n) => *n > Decimal::ZERO,
            Self::List(values) => !values.is_empty(),
        }
    }
}

/// Whether an optional filter value is active. `None` never is.
#[must_use]
pub fn is_filter_value_active(value: Option<&FilterValue>) -> bool {
    value.is_some_and(FilterValue::is_active)
}

/// Whether a further page can be requested for this result.
#[must_use]
pub fn can_load_more(result: Option<&PageResult>) -> bool {
    result.is_some_and(PageResult::has_next_page)
}

/// Derive the display list of active filters.
///
/// Order is deterministic: price, category, brand, featured, bestseller,
/// new arrival, trending, in stock, rating, query, then one chip per
/// selected attribute value (fabrics, colors, sizes).
#[must_use]
pub fn extract_active_filters(filters: &FilterState) -> Vec<AppliedFilter> {
    let mut applied = Vec::new();

    if filters.has_custom_price_range() {
        applied.push(AppliedFilter {
            kind: FilterKind::Price,
            label: "Price".to_string(),
            value: Some(format!(
                "{} - {}",
                filters.price_range.0, filters.price_range.1
            )),
        });
    }

    if let Some(id) = filters.category_id {
        applied.push(AppliedFilter {
            kind: FilterKind::Category,
            label: "Category".to_string(),
            value: Some(id.to_string()),
        });
    }

    if let Some(brand) = filters
        .brand
        .as_deref()
        .map(str::trim)
        .filter(|brand| !brand.is_empty())
    {
        applied.push(AppliedFilter {
            kind: FilterKind::Brand,
            label: "Brand".to_string(),
            value: Some(brand.to_string()),
        });
    }

    let flags = [
        (FilterKind::Featured, "Featured", filters.featured),
        (FilterKind::Bestseller, "Bestseller", filters.bestseller),
        (FilterKind::NewArrival, "New Arrival", filters.new_arrival),
        (FilterKind::Trending, "Trending", filters.trending),
        (FilterKind::InStock, "In Stock", filters.in_stock),
    ];
    for (kind, label, flag) in flags {
        if is_filter_value_active(Some(&FilterValue::Flag(flag))) {
            applied.push(AppliedFilter {
                kind,
                label: label.to_string(),
                value: None,
            });
        }
    }

    if let Some(rating) = filters.min_rating
        && is_filter_value_active(Some(&FilterValue::Number(rating)))
    {
        applied.push(AppliedFilter {
            kind: FilterKind::Rating,
            label: "Rating".to_string(),
            value: Some(format!("{rating}+")),
        });
    }

    if let Some(query) = filters
        .query
        .clone()
        .filter(|query| is_filter_value_active(Some(&FilterValue::Text(query.clone()))))
    {
        applied.push(AppliedFilter {
            kind: FilterKind::Query,
            label: "Search".to_string(),
            value: Some(query.trim().to_string()),
        });
    }

    let attributes = [
        (FilterKind::Fabric, "Fabric", &filters.fabrics),
        (FilterKind::Color, "Color", &filters.colors),
        (FilterKind::Size, "Size", &filters.sizes),
    ];
    for (kind, label, values) in attributes {
        for value in values {
            applied.push(AppliedFilter {
                kind,
                label: label.to_string(),
                value: Some(value.clone()),
            });
        }
    }

    applied
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_none_is_never_active() {
        assert!(!is_filter_value_active(None));
    }

    #[test]
    fn test_flag_activity() {
        assert!(FilterValue::Flag(true).is_active());
        assert!(!FilterValue::Flag(false).is_active());
    }

    #[test]
    fn test_text_activity_trims() {
        assert!(FilterValue::Text("linen".to_string()).is_active());
        assert!(!FilterValue::Text("   ".to_string()).is_active());
        assert!(!FilterValue::Text(String::new()).is_active());
    }

    #[test]
    fn test_number_activity_strictly_positive() {
        assert!(FilterValue::Number(Decimal::from(4)).is_active());
        assert!(!FilterValue::Number(Decimal::ZERO).is_active());
        assert!(!FilterValue::Number(Decimal::from(-1)).is_active());
    }

    #[test]
    fn test_list_activity() {
        assert!(FilterValue::List(vec!["red".to_string()]).is_active());
        assert!(!FilterValue::List(Vec::new()).is_active());
    }

    #[test]
    fn test_can_load_more() {
        assert!(!can_load_more(None));

        let page = PageResult {
            products: Vec::new(),
            total_count: 40,
            total_pages: 2,
            current_page: 1,
            per_page: 20,
        };
        assert!(can_load_more(Some(&page)));

        let last = PageResult {
            current_page: 2,
            ..page
        };
        assert!(!can_load_more(Some(&last)));
    }

    #[test]
    fn test_extract_active_filters_empty_for_defaults() {
        assert!(extract_active_filters(&FilterState::default()).is_empty());
    }

    #[test]
    fn test_extract_active_filters_order() {
        let filters = FilterState {
            query: Some("shirt".to_string()),
            category_id: Some(3),
            brand: Some("Meridian".to_string()),
            featured: true,
            in_stock: true,
            min_rating: Some(Decimal::from(4)),
            fabrics: vec!["cotton".to_string(), "silk".to_string()],
            colors: vec!["red".to_string()],
            price_range: (Decimal::from(100), Decimal::from(500)),
            ..FilterState::default()
        };

        let kinds: Vec<FilterKind> = extract_active_filters(&filters)
            .into_iter()
            .map(|applied| applied.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                FilterKind::Price,
                FilterKind::Category,
                FilterKind::Brand,
                FilterKind::Featured,
                FilterKind::InStock,
                FilterKind::Rating,
                FilterKind::Query,
                FilterKind::Fabric,
                FilterKind::Fabric,
                FilterKind::Color,
            ]
        );
    }

    #[test]
    fn test_blank_query_is_not_applied() {
        let filters = FilterState {
            query: Some("   ".to_string()),
            ..FilterState::default()
        };
        assert!(extract_active_filters(&filters).is_empty());
    }
}
