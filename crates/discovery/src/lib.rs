//! Weftwear product discovery pipeline.
//!
//! Fetches paginated products from the catalog backend, merges pages,
//! applies client-side facet filters and sort, and keeps the visible result
//! set synchronized with shareable URL query parameters and infinite-scroll
//! position.
//!
//! # Architecture
//!
//! - [`catalog`] - HTTP boundary: one `reqwest` client that normalizes every
//!   response shape into a canonical [`weftwear_core::PageResult`]
//! - [`service`] - fetch-with-filters, page-merge-on-load-more, and
//!   filter-change semantics (reset-to-page-1 rules)
//! - [`engine`] - pure client-side facet filtering and stable sorting
//! - [`scroll`] - edge-triggered load-more gate fed sentinel visibility
//! - [`urlsync`] - query-parameter read/write with debounced history writes
//! - [`controller`] - composes the above and owns all page state; rendering
//!   consumes its [`controller::DiscoveryView`]
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use weftwear_discovery::catalog::CatalogClient;
//! use weftwear_discovery::config::DiscoveryConfig;
//! use weftwear_discovery::controller::DiscoveryController;
//! use weftwear_discovery::urlsync::NullHistory;
//!
//! let config = DiscoveryConfig::from_env()?;
//! let client = CatalogClient::new(&config);
//! let mut controller = DiscoveryController::new(
//!     client,
//!     Arc::new(NullHistory),
//!     "/products",
//!     "?query=linen",
//! );
//! controller.mount().await?;
//! let view = controller.view();
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod engine;
pub mod error;
pub mod filters;
pub mod scroll;
pub mod service;
pub mod urlsync;

pub use catalog::CatalogClient;
pub use config::DiscoveryConfig;
pub use controller::{DiscoveryController, DiscoveryView};
pub use error::CatalogError;
