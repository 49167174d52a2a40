//! Lazily initialized category cache.
//!
//! Facet labels come from the category list, which is a secondary concern:
//! the listing page stays usable without it. The cache is an explicit object
//! populated by an awaited `load()` rather than a module-level global filled
//! at import time, so there is no hidden load-order dependency and tests can
//! inject whatever client they want.

use tokio::sync::OnceCell;

use weftwear_core::Category;

use super::CatalogClient;

/// Category list, loaded once on first use.
pub struct CategoryCache {
    client: CatalogClient,
    cell: OnceCell<Vec<Category>>,
}

impl CategoryCache {
    /// Create an empty cache backed by the given client.
    #[must_use]
    pub const fn new(client: CatalogClient) -> Self {
        Self {
            client,
            cell: OnceCell::const_new(),
        }
    }

    /// Load the category list, fetching it on the first call.
    ///
    /// Fetch failures degrade to an empty list with a warning; they are not
    /// surfaced because the page remains usable without facet labels.
    pub async fn load(&self) -> &[Category] {
        self.cell
            .get_or_init(|| async {
                match self.client.fetch_categories().await {
                    Ok(categories) => categories,
                    Err(e) => {
                        tracing::warn!(
                            error = %e,
                            "Failed to load categories, facet labels unavailable"
                        );
                        Vec::new()
                    }
                }
            })
            .await
    }

    /// The loaded categories, or empty if `load()` has not completed yet.
    #[must_use]
    pub fn get(&self) -> &[Category] {
        self.cell.get().map_or(&[], Vec::as_slice)
    }

    /// Resolve a `category` URL parameter, which may be a numeric ID or a
    /// slug, against the loaded list.
    #[must_use]
    pub fn resolve(&self, param: &str) -> Option<i64> {
        if let Ok(id) = param.parse::<i64>() {
            return Some(id);
        }
        self.get()
            .iter()
            .find(|category| category.slug == param)
            .map(|category| category.id)
    }
}
