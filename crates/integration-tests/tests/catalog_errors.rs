//! Failure-path and response-shape tests against the mock catalog.

use std::sync::Arc;

use serde_json::json;
use weftwear_discovery::{CatalogError, DiscoveryController};
use weftwear_discovery::urlsync::NullHistory;
use weftwear_integration_tests::{MockCatalog, sample_categories, sample_products};

fn controller_for(mock: &MockCatalog) -> DiscoveryController {
    DiscoveryController::new(mock.client(), Arc::new(NullHistory), "/products", "")
}

// ============================================================================
// Legacy Response Shape
// ============================================================================

#[tokio::test]
async fn test_legacy_bare_array_synthesizes_pagination() {
    let mock = MockCatalog::start_legacy(sample_products(5), sample_categories()).await;
    let mut controller = controller_for(&mock);

    controller.mount().await.expect("mount failed");

    let view = controller.view();
    assert_eq!(view.products.len(), 5);
    assert_eq!(view.total_count, 5);
    assert!(!view.can_load_more);

    // A single synthesized page: the sentinel never fetches again
    controller.sentinel_visible(true).await.expect("sample failed");
    assert_eq!(mock.product_requests(), 1);
}

// ============================================================================
// Error Surfacing
// ============================================================================

#[tokio::test]
async fn test_validation_error_surfaces_without_clearing_results() {
    let mock = MockCatalog::start(sample_products(45), sample_categories()).await;
    let mut controller = controller_for(&mock);
    controller.mount().await.expect("mount failed");

    mock.set_failure(
        422,
        json!({
            "success": false,
            "message": "Validation failed",
            "errors": ["page out of range"]
        }),
    );
    controller.set_search("Shirt").await.expect("search errored");

    let view = controller.view();
    assert_eq!(view.error.as_deref(), Some("page out of range"));
    assert!(!view.loading);
    // The previous result set stays on screen
    assert_eq!(view.products.len(), 20);

    // A successful reload clears the error
    mock.clear_failure();
    controller.set_search("Shirt 7").await.expect("search failed");
    let view = controller.view();
    assert!(view.error.is_none());
    assert_eq!(view.total_count, 1);
}

#[tokio::test]
async fn test_server_error_uses_message_field() {
    let mock = MockCatalog::start(sample_products(45), sample_categories()).await;
    let mut controller = controller_for(&mock);
    controller.mount().await.expect("mount failed");

    mock.set_failure(500, json!({"success": false, "message": "Catalog unavailable"}));
    controller.set_search("Shirt").await.expect("search errored");

    assert_eq!(
        controller.view().error.as_deref(),
        Some("Catalog unavailable")
    );
}

// ============================================================================
// Authentication
// ============================================================================

#[tokio::test]
async fn test_unauthorized_propagates_as_auth_error() {
    let mock = MockCatalog::start(sample_products(5), sample_categories()).await;
    mock.set_failure(401, json!({"success": false, "message": "Session expired"}));
    let mut controller = controller_for(&mock);

    let err = controller.mount().await.expect_err("mount should fail");
    assert!(err.is_auth());
}

#[tokio::test]
async fn test_deactivated_account_propagates_as_auth_error() {
    let mock = MockCatalog::start(sample_products(5), sample_categories()).await;
    mock.set_failure(
        403,
        json!({"success": false, "message": "Your account has been deactivated"}),
    );
    let mut controller = controller_for(&mock);

    let err = controller.mount().await.expect_err("mount should fail");
    assert!(matches!(err, CatalogError::Auth(_)));
}
