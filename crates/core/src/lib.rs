//! Weftwear Core - Shared types library.
//!
//! This crate provides common types used across all Weftwear components:
//! - `discovery` - Product discovery pipeline (catalog client, filters, pagination)
//! - `integration-tests` - End-to-end tests against a mock catalog backend
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Products, categories, filter state, and pagination types

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
