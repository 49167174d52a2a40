//! URL query synchronization.
//!
//! Bidirectionally maps the search text and category selection to URL query
//! parameters. Reads are plain functions over the query string; writes go
//! through [`QuerySync`], which debounces (500 ms) and *replaces* the
//! current history entry - typing in the search box must not push a history
//! entry per keystroke.
//!
//! Facet selections (fabric/color/size/price) are deliberately not
//! persisted to the URL; they live only in controller state.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use url::form_urlencoded;

use crate::debounce::Debouncer;

/// Debounce window for search-to-URL writes.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Sink for history updates. The rendering layer bridges this to the
/// browser's `history.replaceState`; headless contexts use [`NullHistory`].
pub trait HistoryWriter: Send + Sync {
    /// Replace the current history entry with `location` (path plus query).
    fn replace(&self, location: &str);
}

/// History writer that discards all updates.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHistory;

impl HistoryWriter for NullHistory {
    fn replace(&self, _location: &str) {}
}

/// Parse a query string and return the decoded value of `key`.
#[must_use]
pub fn get_query_param(search: &str, key: &str) -> Option<String> {
    let search = search.strip_prefix('?').unwrap_or(search);
    form_urlencoded::parse(search.as_bytes())
        .find(|(k, _)| k == key)
        .map(|(_, value)| value.into_owned())
}

/// Read the search text from the URL: `query`, with `search` accepted as a
/// legacy read alias.
#[must_use]
pub fn read_search_query(search: &str) -> Option<String> {
    get_query_param(search, "query").or_else(|| get_query_param(search, "search"))
}

/// Rewrite `key` in the query string, returning the full location.
///
/// A `None` or empty value removes the key. Other parameters keep their
/// relative order; the written key moves to the end.
#[must_use]
pub fn update_query_param(
    pathname: &str,
    search: &str,
    key: &str,
    value: Option<&str>,
) -> String {
    let search = search.strip_prefix('?').unwrap_or(search);

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (k, v) in form_urlencoded::parse(search.as_bytes()) {
        if k != key {
            serializer.append_pair(&k, &v);
        }
    }
    if let Some(value) = value.filter(|value| !value.is_empty()) {
        serializer.append_pair(key, value);
    }

    let query = serializer.finish();
    if query.is_empty() {
        pathname.to_string()
    } else {
        format!("{pathname}?{query}")
    }
}

/// Debounced writer of query parameters to the history.
///
/// Tracks the current query string so successive writes within one debounce
/// window compose; only the last resulting location is written.
pub struct QuerySync {
    pathname: String,
    search: Mutex<String>,
    history: Arc<dyn HistoryWriter>,
    debounce: Debouncer,
}

impl QuerySync {
    /// Create a synchronizer for the given location.
    #[must_use]
    pub fn new(pathname: &str, search: &str, history: Arc<dyn HistoryWriter>) -> Self {
        Self {
            pathname: pathname.to_string(),
            search: Mutex::new(
                search.strip_prefix('?').unwrap_or(search).to_string(),
            ),
            history,
            debounce: Debouncer::new(SEARCH_DEBOUNCE),
        }
    }

    /// Write `key` into the query string; the history write is debounced.
    pub fn set_param(&self, key: &str, value: Option<&str>) {
        let mut search = self
            .search
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let location = update_query_param(&self.pathname, &search, key, value);
        *search = location
            .split_once('?')
            .map_or_else(String::new, |(_, query)| query.to_string());

        let history = Arc::clone(&self.history);
        self.debounce.call(move || history.replace(&location));
    }

    /// Drop any pending history write.
    pub fn cancel(&self) {
        self.debounce.cancel();
    }
}
