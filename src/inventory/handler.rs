//! HTTP handlers for categories, food items and the expiring view
//!
//! Endpoints:
//! - GET    /api/categories              - list categories with item counts
//! - POST   /api/categories              - create category
//! - GET    /api/categories/:id          - category detail
//! - PUT    /api/categories/:id          - rename category
//! - DELETE /api/categories/:id          - delete empty category
//! - POST   /api/categories/bulk-delete  - delete several categories
//! - POST   /api/categories/force-delete - move items away, then delete
//! - GET    /api/items                   - list items
//! - POST   /api/items                   - create item
//! - GET    /api/items/:id               - item detail
//! - PUT    /api/items/:id               - partial update
//! - DELETE /api/items/:id               - delete item
//! - POST   /api/items/bulk-delete       - delete several items
//! - GET    /api/expiring?days=N         - items expiring within N days

use crate::api::{method_not_allowed, ApiError, ApiResult};
use crate::inventory::store::InventoryStore;
use crate::inventory::types::*;
use crate::validation::{parse_positive_id, Validator};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// Default look-ahead for `/api/expiring`
const DEFAULT_EXPIRING_DAYS: i64 = 7;

/// Shared state for inventory handlers
#[derive(Clone)]
pub struct InventoryState {
    pub store: Arc<InventoryStore>,
    pub validator: Arc<Validator>,
}

/// Create the inventory router
pub fn inventory_router(state: InventoryState) -> Router {
    Router::new()
        .route(
            "/api/categories",
            get(list_categories)
                .post(create_category)
                .fallback(method_not_allowed),
        )
        .route(
            "/api/categories/bulk-delete",
            post(bulk_delete_categories).fallback(method_not_allowed),
        )
        .route(
            "/api/categories/force-delete",
            post(force_delete_category).fallback(method_not_allowed),
        )
        .route(
            "/api/categories/:id",
            get(get_category)
                .put(update_category)
                .delete(delete_category)
                .fallback(method_not_allowed),
        )
        .route(
            "/api/items",
            get(list_items).post(create_item).fallback(method_not_allowed),
        )
        .route(
            "/api/items/bulk-delete",
            post(bulk_delete_items).fallback(method_not_allowed),
        )
        .route(
            "/api/items/:id",
            get(get_item)
                .put(update_item)
                .delete(delete_item)
                .fallback(method_not_allowed),
        )
        .route(
            "/api/expiring",
            get(expiring_items).fallback(method_not_allowed),
        )
        .with_state(state)
}

fn path_id(raw: &str, what: &str) -> ApiResult<i64> {
    parse_positive_id(&Value::String(raw.to_string()))
        .ok_or_else(|| ApiError::bad_request(format!("Valid {} ID is required", what)))
}

/// Pull positive ids out of a bulk payload, ignoring malformed entries
fn id_list(raw: Option<&Value>, label: &str) -> ApiResult<Vec<i64>> {
    let entries = raw
        .and_then(Value::as_array)
        .filter(|entries| !entries.is_empty())
        .ok_or_else(|| ApiError::bad_request(format!("{} IDs array is required", label)))?;

    let ids: Vec<i64> = entries.iter().filter_map(parse_positive_id).collect();
    if ids.is_empty() {
        return Err(ApiError::bad_request(format!(
            "No valid {} IDs provided",
            label.to_lowercase()
        )));
    }
    Ok(ids)
}

// =============================================================================
// Category handlers
// =============================================================================

/// GET /api/categories
async fn list_categories(State(state): State<InventoryState>) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.store.list_category_summaries().await?))
}

/// GET /api/categories/:id
async fn get_category(
    State(state): State<InventoryState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = path_id(&id, "category")?;
    Ok(Json(state.store.get_category(id).await?))
}

/// POST /api/categories
async fn create_category(
    State(state): State<InventoryState>,
    payload: Result<Json<CategoryInput>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(input) = payload?;
    state.validator.validate_category(&input).into_result()?;

    let name = input.name.as_deref().unwrap_or_default();
    let category = state.store.create_category(name).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// PUT /api/categories/:id
async fn update_category(
    State(state): State<InventoryState>,
    Path(id): Path<String>,
    payload: Result<Json<CategoryInput>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let id = path_id(&id, "category")?;
    let Json(input) = payload?;
    state.validator.validate_category(&input).into_result()?;

    let name = input.name.as_deref().unwrap_or_default();
    Ok(Json(state.store.update_category(id, name).await?))
}

/// DELETE /api/categories/:id
async fn delete_category(
    State(state): State<InventoryState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = path_id(&id, "category")?;
    let category = state.store.delete_category(id).await?;
    Ok(Json(json!({
        "message": "Category deleted successfully",
        "category": category,
    })))
}

/// POST /api/categories/bulk-delete
async fn bulk_delete_categories(
    State(state): State<InventoryState>,
    payload: Result<Json<BulkDeleteCategoriesRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(request) = payload?;
    let ids = id_list(request.category_ids.as_ref(), "Category")?;
    let outcome = state.store.bulk_delete_categories(&ids).await?;

    let message = if outcome.blocked.is_empty() {
        "Categories deleted successfully"
    } else {
        "Some categories could not be deleted because they still have items"
    };
    Ok(Json(json!({
        "message": message,
        "deletedCount": outcome.deleted_ids.len(),
        "deletedIds": outcome.deleted_ids,
        "notFoundIds": outcome.not_found_ids,
        "blocked": outcome.blocked,
    })))
}

/// POST /api/categories/force-delete
async fn force_delete_category(
    State(state): State<InventoryState>,
    payload: Result<Json<ForceDeleteRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(request) = payload?;
    let id = request
        .category_id
        .as_ref()
        .and_then(parse_positive_id)
        .ok_or_else(|| ApiError::bad_request("Valid category ID is required"))?;

    let move_to = match request.move_to_category_id.as_ref() {
        None | Some(Value::Null) => None,
        Some(raw) => Some(
            parse_positive_id(raw)
                .ok_or_else(|| ApiError::bad_request("Valid target category ID is required"))?,
        ),
    };

    let outcome = state.store.force_delete_category(id, move_to).await?;
    Ok(Json(json!({
        "message": "Category deleted successfully",
        "category": outcome.category,
        "itemsMoved": outcome.items_moved,
        "movedToCategoryId": outcome.moved_to_category_id,
    })))
}

// =============================================================================
// Food item handlers
// =============================================================================

/// GET /api/items
async fn list_items(State(state): State<InventoryState>) -> ApiResult<impl IntoResponse> {
    Ok(Json(state.store.list_items().await?))
}

/// GET /api/items/:id
async fn get_item(
    State(state): State<InventoryState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = path_id(&id, "item")?;
    Ok(Json(state.store.get_item(id).await?))
}

/// POST /api/items
async fn create_item(
    State(state): State<InventoryState>,
    payload: Result<Json<FoodItemInput>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(input) = payload?;
    state.validator.validate_food_item(&input).into_result()?;

    let item = state.store.create_item(input.to_new_item()?).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// PUT /api/items/:id
async fn update_item(
    State(state): State<InventoryState>,
    Path(id): Path<String>,
    payload: Result<Json<FoodItemInput>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let id = path_id(&id, "item")?;
    let Json(input) = payload?;
    state.validator.validate_food_item_patch(&input).into_result()?;

    let item = state.store.update_item(id, input.to_patch()?).await?;
    Ok(Json(item))
}

/// DELETE /api/items/:id
async fn delete_item(
    State(state): State<InventoryState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = path_id(&id, "item")?;
    let item = state.store.delete_item(id).await?;
    Ok(Json(json!({
        "message": "Food item deleted successfully",
        "item": item,
    })))
}

/// POST /api/items/bulk-delete
async fn bulk_delete_items(
    State(state): State<InventoryState>,
    payload: Result<Json<BulkDeleteItemsRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(request) = payload?;
    let ids = id_list(request.item_ids.as_ref(), "Item")?;
    let outcome = state.store.bulk_delete_items(&ids).await?;

    Ok(Json(json!({
        "message": "Items deleted successfully",
        "deletedCount": outcome.deleted_ids.len(),
        "deletedIds": outcome.deleted_ids,
        "notFoundIds": outcome.not_found_ids,
    })))
}

// =============================================================================
// Expiring view
// =============================================================================

#[derive(Debug, Deserialize)]
struct ExpiringQuery {
    days: Option<String>,
}

/// GET /api/expiring?days=N
async fn expiring_items(
    State(state): State<InventoryState>,
    query: Result<Query<ExpiringQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let Query(query) = query?;
    let days = match query.days.as_deref() {
        None => DEFAULT_EXPIRING_DAYS,
        Some(raw) => raw
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|days| *days >= 0)
            .ok_or_else(|| ApiError::bad_request("Invalid days parameter"))?,
    };

    Ok(Json(state.store.expiring_items(days).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValidationRules;
    use crate::expiry::{ExpiryThresholds, FixedClock};
    use axum::body::Body;
    use axum::http::Request;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use tower::ServiceExt;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 10, 12, 0, 0).unwrap()
    }

    fn make_app() -> (Router, Arc<InventoryStore>) {
        let store = Arc::new(
            InventoryStore::open_in_memory(
                ExpiryThresholds::default(),
                Arc::new(FixedClock::new(now())),
            )
            .unwrap(),
        );
        let validator = Arc::new(Validator::new(&ValidationRules::default()).unwrap());
        let state = InventoryState {
            store: store.clone(),
            validator,
        };
        (inventory_router(state), store)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), 1024 * 64)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn expiry_in(days: i64) -> String {
        (now() + Duration::days(days)).to_rfc3339()
    }

    async fn seed_item(store: &InventoryStore, name: &str, category_id: i64, days: i64) -> i64 {
        store
            .create_item(NewFoodItem {
                name: name.to_string(),
                volume: 1.0,
                volume_unit: "g".to_string(),
                expiry_date: now() + Duration::days(days),
                notes: None,
                category_id,
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_create_and_list_categories() {
        let (app, _) = make_app();

        let resp = app
            .clone()
            .oneshot(json_request("POST", "/api/categories", json!({"name": " Dairy "})))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created = body_json(resp).await;
        assert_eq!(created["name"], "Dairy");

        let resp = app
            .oneshot(empty_request("GET", "/api/categories"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let list = body_json(resp).await;
        assert_eq!(list.as_array().unwrap().len(), 1);
        assert_eq!(list[0]["itemCount"], 0);
    }

    #[tokio::test]
    async fn test_create_category_validation_and_conflict() {
        let (app, store) = make_app();
        store.create_category("Dairy").await.unwrap();

        let resp = app
            .clone()
            .oneshot(json_request("POST", "/api/categories", json!({"name": "D4iry!"})))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json(resp).await;
        assert_eq!(body["error"], "Validation failed");
        assert_eq!(
            body["details"][0],
            "Category name must contain only letters, spaces, and hyphens"
        );

        let resp = app
            .oneshot(json_request("POST", "/api/categories", json!({"name": "Dairy"})))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        assert_eq!(body_json(resp).await["error"], "Category already exists");
    }

    #[tokio::test]
    async fn test_rename_category() {
        let (app, store) = make_app();
        let dairy = store.create_category("Dairy").await.unwrap();

        let resp = app
            .clone()
            .oneshot(json_request(
                "PUT",
                &format!("/api/categories/{}", dairy.id),
                json!({"name": "Cheese"}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["name"], "Cheese");

        let resp = app
            .oneshot(json_request("PUT", "/api/categories/99", json!({"name": "Bread"})))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalid_path_id() {
        let (app, _) = make_app();
        let resp = app
            .clone()
            .oneshot(empty_request("DELETE", "/api/categories/abc"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["error"], "Valid category ID is required");

        let resp = app.oneshot(empty_request("GET", "/api/items/0")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["error"], "Valid item ID is required");
    }

    #[tokio::test]
    async fn test_delete_category_with_items_reports_count() {
        let (app, store) = make_app();
        let dairy = store.create_category("Dairy").await.unwrap();
        seed_item(&store, "Milk", dairy.id, 3).await;
        seed_item(&store, "Cheese", dairy.id, 30).await;

        let resp = app
            .oneshot(empty_request("DELETE", &format!("/api/categories/{}", dairy.id)))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json(resp).await;
        assert_eq!(body["error"], "Cannot delete category with existing items");
        assert_eq!(body["itemCount"], 2);

        assert_eq!(store.list_items().await.unwrap().len(), 2);
        assert!(store.get_category(dairy.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_force_delete_without_target() {
        let (app, store) = make_app();
        let snacks = store.create_category("Snacks").await.unwrap();
        let bakery = store.create_category("Bakery").await.unwrap();
        seed_item(&store, "Chips", snacks.id, 30).await;
        seed_item(&store, "Pretzels", snacks.id, 40).await;

        let resp = app
            .oneshot(json_request(
                "POST",
                "/api/categories/force-delete",
                json!({"categoryId": snacks.id.to_string()}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["itemsMoved"], 2);
        assert_eq!(body["movedToCategoryId"], bakery.id);
        assert_eq!(body["category"]["name"], "Snacks");
    }

    #[tokio::test]
    async fn test_force_delete_errors() {
        let (app, store) = make_app();
        let snacks = store.create_category("Snacks").await.unwrap();
        seed_item(&store, "Chips", snacks.id, 30).await;

        let resp = app
            .clone()
            .oneshot(json_request("POST", "/api/categories/force-delete", json!({})))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/categories/force-delete",
                json!({"categoryId": snacks.id, "moveToCategoryId": 55}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(resp).await["error"], "Target category not found");

        let resp = app
            .oneshot(json_request(
                "POST",
                "/api/categories/force-delete",
                json!({"categoryId": snacks.id}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_bulk_delete_categories() {
        let (app, store) = make_app();
        let dairy = store.create_category("Dairy").await.unwrap();
        let snacks = store.create_category("Snacks").await.unwrap();
        seed_item(&store, "Milk", dairy.id, 3).await;

        let resp = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/categories/bulk-delete",
                json!({"categoryIds": [dairy.id, snacks.id, 404, "junk"]}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["deletedIds"], json!([snacks.id]));
        assert_eq!(body["notFoundIds"], json!([404]));
        assert_eq!(body["blocked"][0]["itemCount"], 1);

        let resp = app
            .oneshot(json_request(
                "POST",
                "/api/categories/bulk-delete",
                json!({"categoryIds": []}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["error"], "Category IDs array is required");
    }

    #[tokio::test]
    async fn test_create_item() {
        let (app, store) = make_app();
        let dairy = store.create_category("Dairy").await.unwrap();

        let resp = app
            .oneshot(json_request(
                "POST",
                "/api/items",
                json!({
                    "name": "Whole Milk",
                    "quantity": 1,
                    "unit": "l",
                    "expiryDate": expiry_in(2),
                    "categoryId": dairy.id,
                }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let item = body_json(resp).await;
        assert_eq!(item["status"], "Expiring Soon");
        assert_eq!(item["daysUntilExpiry"], 2);
        assert_eq!(item["volumeUnit"], "l");
        assert_eq!(item["category"]["name"], "Dairy");
    }

    #[tokio::test]
    async fn test_create_item_reports_all_errors() {
        let (app, _) = make_app();

        let resp = app
            .oneshot(json_request(
                "POST",
                "/api/items",
                json!({"name": "", "quantity": -1, "expiryDate": "not-a-date", "categoryId": 0}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json(resp).await;
        assert_eq!(body["details"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_create_item_unknown_category() {
        let (app, _) = make_app();

        let resp = app
            .oneshot(json_request(
                "POST",
                "/api/items",
                json!({"name": "Eggs", "quantity": 12, "expiryDate": expiry_in(5), "categoryId": 9}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["details"][0], "Category does not exist");
    }

    #[tokio::test]
    async fn test_malformed_json_is_400() {
        let (app, _) = make_app();
        let resp = app
            .oneshot(
                Request::post("/api/items")
                    .header("content-type", "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["error"], "Invalid JSON body");
    }

    #[tokio::test]
    async fn test_update_and_delete_item() {
        let (app, store) = make_app();
        let dairy = store.create_category("Dairy").await.unwrap();
        let id = seed_item(&store, "Milk", dairy.id, 20).await;

        let resp = app
            .clone()
            .oneshot(json_request(
                "PUT",
                &format!("/api/items/{}", id),
                json!({"expiryDate": expiry_in(-2), "notes": "Opened"}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let item = body_json(resp).await;
        assert_eq!(item["status"], "Expired");
        assert_eq!(item["notes"], "Opened");
        assert_eq!(item["name"], "Milk");

        let resp = app
            .clone()
            .oneshot(empty_request("DELETE", &format!("/api/items/{}", id)))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["message"], "Food item deleted successfully");

        let resp = app
            .oneshot(empty_request("GET", &format!("/api/items/{}", id)))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_bulk_delete_items() {
        let (app, store) = make_app();
        let dairy = store.create_category("Dairy").await.unwrap();
        let a = seed_item(&store, "Milk", dairy.id, 1).await;
        let b = seed_item(&store, "Cheese", dairy.id, 2).await;

        let resp = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/items/bulk-delete",
                json!({"itemIds": [a, b, 999]}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["deletedIds"], json!([a, b]));
        assert_eq!(body["notFoundIds"], json!([999]));
        assert_eq!(body["deletedCount"], 2);

        let resp = app
            .oneshot(json_request(
                "POST",
                "/api/items/bulk-delete",
                json!({"itemIds": ["x", -1]}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["error"], "No valid item IDs provided");
    }

    #[tokio::test]
    async fn test_expiring_endpoint() {
        let (app, store) = make_app();
        let dairy = store.create_category("Dairy").await.unwrap();
        seed_item(&store, "Milk", dairy.id, 1).await;
        seed_item(&store, "Cheese", dairy.id, 5).await;
        seed_item(&store, "Butter", dairy.id, 40).await;

        let resp = app
            .clone()
            .oneshot(empty_request("GET", "/api/expiring?days=3"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["items"].as_array().unwrap().len(), 1);
        assert_eq!(body["summary"]["totalItems"], 3);

        let resp = app
            .clone()
            .oneshot(empty_request("GET", "/api/expiring"))
            .await
            .unwrap();
        assert_eq!(body_json(resp).await["summary"]["expiringItems"], 2);

        let resp = app
            .oneshot(empty_request("GET", "/api/expiring?days=-1"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["error"], "Invalid days parameter");
    }

    #[tokio::test]
    async fn test_method_not_allowed() {
        let (app, _) = make_app();
        let resp = app
            .oneshot(empty_request("GET", "/api/items/bulk-delete"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
