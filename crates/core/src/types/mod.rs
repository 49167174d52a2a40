//! Core types for Weftwear.
//!
//! This module provides the domain vocabulary of the product discovery
//! pipeline: products, categories, filter state, and pagination results.

pub mod category;
pub mod filter;
pub mod page;
pub mod product;

pub use category::Category;
pub use filter::{
    AppliedFilter, FilterChange, FilterKey, FilterKind, FilterState, ParseSortKeyError, SortKey,
};
pub use page::PageResult;
pub use product::Product;
