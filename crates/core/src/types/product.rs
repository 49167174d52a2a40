//! Product domain types.
//!
//! Products are server-owned and read-only from the client's perspective:
//! instances are created by deserializing catalog responses and only ever
//! copied into in-memory lists, never mutated locally.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog product ID.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Plain text description.
    #[serde(default)]
    pub description: String,
    /// List price before any discount.
    pub base_price: Decimal,
    /// Discounted price, when the product is on sale.
    #[serde(default)]
    pub discounted_price: Option<Decimal>,
    /// Image URLs.
    #[serde(default)]
    pub images: Vec<String>,
    /// Brand name.
    #[serde(default)]
    pub brand: String,
    /// Category name.
    #[serde(default)]
    pub category: String,
    /// Fabric the item is made of (single value per product).
    #[serde(default)]
    pub fabric: String,
    /// Available colors.
    #[serde(default)]
    pub colors: Vec<String>,
    /// Available sizes.
    #[serde(default)]
    pub sizes: Vec<String>,
    /// Units in stock.
    #[serde(default)]
    pub stock_quantity: i64,
    /// When the product was listed (drives the `newest` sort).
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Completed order count, used as the popularity proxy for the
    /// `popular` sort.
    #[serde(default)]
    pub order_count: i64,
}

impl Product {
    /// Effective price: the discounted price when present, else the base
    /// price.
    #[must_use]
    pub fn effective_price(&self) -> Decimal {
        self.discounted_price.unwrap_or(self.base_price)
    }

    /// Fraction of the base price saved, in `[0, 1]`.
    ///
    /// A non-positive base price counts as no discount.
    #[must_use]
    pub fn discount_ratio(&self) -> Decimal {
        if self.base_price <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        (self.base_price - self.effective_price()) / self.base_price
    }

    /// Whether any stock remains.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock_quantity > 0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(base: i64, discounted: Option<i64>) -> Product {
        Product {
            id: 1,
            name: "Linen Shirt".to_string(),
            description: String::new(),
            base_price: Decimal::from(base),
            discounted_price: discounted.map(Decimal::from),
            images: Vec::new(),
            brand: String::new(),
            category: String::new(),
            fabric: "linen".to_string(),
            colors: Vec::new(),
            sizes: Vec::new(),
            stock_quantity: 0,
            created_at: None,
            order_count: 0,
        }
    }

    #[test]
    fn test_effective_price_prefers_discount() {
        assert_eq!(product(100, Some(80)).effective_price(), Decimal::from(80));
        assert_eq!(product(100, None).effective_price(), Decimal::from(100));
    }

    #[test]
    fn test_discount_ratio() {
        assert_eq!(
            product(100, Some(75)).discount_ratio(),
            Decimal::new(25, 2)
        );
        assert_eq!(product(100, None).discount_ratio(), Decimal::ZERO);
        // Zero base price must not divide
        assert_eq!(product(0, Some(10)).discount_ratio(), Decimal::ZERO);
    }

    #[test]
    fn test_deserialize_minimal_product() {
        let json = r#"{"id": 7, "name": "Cotton Tee", "base_price": "19.99"}"#;
        let p: Product = serde_json::from_str(json).unwrap();
        assert_eq!(p.id, 7);
        assert_eq!(p.base_price, Decimal::new(1999, 2));
        assert!(p.discounted_price.is_none());
        assert!(p.colors.is_empty());
    }
}
