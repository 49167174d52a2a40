//! Category types.

use serde::{Deserialize, Serialize};

/// A product category, used for facet labels and URL seeding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category ID.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// URL slug (accepted in the `category` query parameter).
    pub slug: String,
}
