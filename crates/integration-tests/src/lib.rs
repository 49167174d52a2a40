//! Integration test support for Weftwear.
//!
//! Provides [`MockCatalog`], an in-process catalog backend the discovery
//! pipeline is pointed at in tests. Each test starts its own instance on an
//! ephemeral port, so tests run in parallel without shared state.
//!
//! The mock implements the two endpoints the pipeline consumes:
//!
//! - `GET /products` - filtered, paginated listing (`query`, `category_id`,
//!   `min_price`, `max_price`, `page`, `per_page`)
//! - `GET /categories` - bare JSON array of categories
//!
//! Responses can be switched to the legacy bare-array listing shape, and an
//! error response can be injected to exercise failure paths. Request
//! counters expose how often each endpoint was hit, which is how tests
//! assert that an interaction did or did not reach the network.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once, PoisonError};

use axum::Router;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use weftwear_core::{Category, Product};
use weftwear_discovery::{CatalogClient, DiscoveryConfig};

// ============================================================================
// MockCatalog
// ============================================================================

/// An in-process catalog backend for integration tests.
pub struct MockCatalog {
    addr: SocketAddr,
    state: Arc<MockState>,
    server: JoinHandle<()>,
}

struct MockState {
    products: Vec<Product>,
    categories: Vec<Category>,
    legacy_shape: bool,
    failure: Mutex<Option<(u16, Value)>>,
    product_requests: AtomicUsize,
    category_requests: AtomicUsize,
}

impl MockCatalog {
    /// Start a mock catalog serving the given dataset.
    pub async fn start(products: Vec<Product>, categories: Vec<Category>) -> Self {
        Self::start_inner(products, categories, false).await
    }

    /// Start a mock catalog that answers listings with the legacy bare-array
    /// shape (no pagination envelope).
    pub async fn start_legacy(products: Vec<Product>, categories: Vec<Category>) -> Self {
        Self::start_inner(products, categories, true).await
    }

    async fn start_inner(
        products: Vec<Product>,
        categories: Vec<Category>,
        legacy_shape: bool,
    ) -> Self {
        init_tracing();

        let state = Arc::new(MockState {
            products,
            categories,
            legacy_shape,
            failure: Mutex::new(None),
            product_requests: AtomicUsize::new(0),
            category_requests: AtomicUsize::new(0),
        });

        let router = Router::new()
            .route("/products", get(list_products))
            .route("/categories", get(list_categories))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock catalog listener");
        let addr = listener
            .local_addr()
            .expect("Failed to read mock catalog address");

        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Self {
            addr,
            state,
            server,
        }
    }

    /// Configuration pointing the discovery pipeline at this mock.
    #[must_use]
    pub fn config(&self) -> DiscoveryConfig {
        DiscoveryConfig {
            base_url: format!("http://{}", self.addr),
            api_token: None,
            per_page: 20,
            timeout_secs: 5,
            cache_ttl_secs: 300,
        }
    }

    /// A catalog client pointed at this mock.
    #[must_use]
    pub fn client(&self) -> CatalogClient {
        CatalogClient::new(&self.config())
    }

    /// Make every `/products` request fail with the given status and body
    /// until [`Self::clear_failure`] is called.
    pub fn set_failure(&self, status: u16, body: Value) {
        *self
            .state
            .failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some((status, body));
    }

    /// Restore normal `/products` responses.
    pub fn clear_failure(&self) {
        *self
            .state
            .failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// How many `/products` requests the mock has served.
    #[must_use]
    pub fn product_requests(&self) -> usize {
        self.state.product_requests.load(Ordering::SeqCst)
    }

    /// How many `/categories` requests the mock has served.
    #[must_use]
    pub fn category_requests(&self) -> usize {
        self.state.category_requests.load(Ordering::SeqCst)
    }
}

impl Drop for MockCatalog {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// Install the test tracing subscriber once per process. Filtering follows
/// `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

// ============================================================================
// Handlers
// ============================================================================

#[derive(Debug, Deserialize)]
struct ProductsQuery {
    query: Option<String>,
    category_id: Option<i64>,
    min_price: Option<Decimal>,
    max_price: Option<Decimal>,
    page: Option<u32>,
    per_page: Option<u32>,
}

async fn list_products(
    State(state): State<Arc<MockState>>,
    Query(params): Query<ProductsQuery>,
) -> Response {
    state.product_requests.fetch_add(1, Ordering::SeqCst);

    if let Some((status, body)) = state
        .failure
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
    {
        let status =
            StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return (status, Json(body)).into_response();
    }

    let category_name = params.category_id.map(|id| {
        state
            .categories
            .iter()
            .find(|c| c.id == id)
            .map_or_else(String::new, |c| c.name.clone())
    });

    let matching: Vec<&Product> = state
        .products
        .iter()
        .filter(|product| {
            params.query.as_deref().is_none_or(|q| {
                product.name.to_lowercase().contains(&q.to_lowercase())
            })
        })
        .filter(|product| {
            category_name
                .as_deref()
                .is_none_or(|name| product.category == name)
        })
        .filter(|product| {
            params
                .min_price
                .is_none_or(|min| product.effective_price() >= min)
        })
        .filter(|product| {
            params
                .max_price
                .is_none_or(|max| product.effective_price() <= max)
        })
        .collect();

    if state.legacy_shape {
        return Json(matching).into_response();
    }

    let page = params.page.unwrap_or(1).max(1);
    let per_page = params.per_page.unwrap_or(20).max(1);
    let total_count = matching.len();
    let total_pages = total_count.div_ceil(per_page as usize);
    let offset = (page as usize - 1) * per_page as usize;
    let items: Vec<&&Product> = matching
        .iter()
        .skip(offset)
        .take(per_page as usize)
        .collect();

    Json(json!({
        "products": items,
        "pagination": {
            "current_page": page,
            "total_pages": total_pages,
            "total_count": total_count,
            "per_page": per_page,
        }
    }))
    .into_response()
}

async fn list_categories(State(state): State<Arc<MockState>>) -> Json<Vec<Category>> {
    state.category_requests.fetch_add(1, Ordering::SeqCst);
    Json(state.categories.clone())
}

// ============================================================================
// Fixtures
// ============================================================================

/// A product with the fields the pipeline exercises.
#[must_use]
pub fn product(id: i64, name: &str, category: &str, fabric: &str, price: i64) -> Product {
    Product {
        id,
        name: name.to_string(),
        description: String::new(),
        base_price: Decimal::from(price),
        discounted_price: None,
        images: Vec::new(),
        brand: "Weftwear".to_string(),
        category: category.to_string(),
        fabric: fabric.to_string(),
        colors: vec!["black".to_string()],
        sizes: vec!["m".to_string()],
        stock_quantity: 10,
        created_at: None,
        order_count: 0,
    }
}

/// The standard category fixture.
#[must_use]
pub fn sample_categories() -> Vec<Category> {
    vec![
        Category {
            id: 1,
            name: "Shirts".to_string(),
            slug: "shirts".to_string(),
        },
        Category {
            id: 2,
            name: "Trousers".to_string(),
            slug: "trousers".to_string(),
        },
    ]
}

/// `count` shirts with ascending IDs, alternating fabrics.
#[must_use]
pub fn sample_products(count: i64) -> Vec<Product> {
    (1..=count)
        .map(|id| {
            let fabric = if id % 2 == 0 { "cotton" } else { "linen" };
            product(id, &format!("Shirt {id}"), "Shirts", fabric, 20 + id)
        })
        .collect()
}
