//! Unified API router for Larder
//!
//! Merges all module routers into a single axum `Router` with CORS, request
//! tracing and JSON error responses.
//!
//! ## Endpoint Map
//!
//! | Prefix                 | Module    | Description                          |
//! |------------------------|-----------|--------------------------------------|
//! | `/health`              | api       | Liveness probe                       |
//! | `/api/categories/*`    | inventory | Category CRUD, bulk and force delete |
//! | `/api/items/*`         | inventory | Food item CRUD and bulk delete       |
//! | `/api/expiring`        | inventory | Items expiring within a window       |
//! | `/api/dashboard/*`     | dashboard | Summary and rule-based suggestions   |
//! | `/api/chat`            | assistant | Inventory-aware chat                 |
//! | `/api/detect`          | assistant | Photo-based food recognition         |
//!
//! Every error body has the shape `{ "error": ..., "details"?: ..., "itemCount"?: ... }`.

use crate::assistant::{assistant_router, AssistantState};
use crate::dashboard::{dashboard_router, DashboardState};
use crate::error::Error;
use crate::inventory::{inventory_router, InventoryState};
use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the complete Larder HTTP application
pub fn build_app(
    inventory_state: InventoryState,
    dashboard_state: DashboardState,
    assistant_state: AssistantState,
    cors_origins: &[String],
) -> Router {
    let cors = build_cors(cors_origins);

    Router::new()
        .route("/health", get(health_check).fallback(method_not_allowed))
        .merge(inventory_router(inventory_state))
        .merge(dashboard_router(dashboard_state))
        .merge(assistant_router(assistant_state))
        .fallback(route_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

// =============================================================================
// API errors
// =============================================================================

/// JSON error body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    #[serde(rename = "itemCount", skip_serializing_if = "Option::is_none")]
    pub item_count: Option<i64>,
}

/// An HTTP status paired with a JSON error body
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

/// Result type for handlers
pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                error: message.into(),
                details: None,
                item_count: None,
            },
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }

    pub fn with_details(mut self, details: impl Into<Value>) -> Self {
        self.body.details = Some(details.into());
        self
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::Validation(errors) => {
                ApiError::bad_request("Validation failed").with_details(errors)
            }
            Error::BadRequest(msg) => ApiError::bad_request(msg),
            Error::NotFound(msg) => ApiError::not_found(msg),
            Error::Conflict(msg) => ApiError::new(StatusCode::CONFLICT, msg),
            Error::CategoryInUse { item_count, .. } => {
                let mut api = ApiError::bad_request("Cannot delete category with existing items")
                    .with_details(format!(
                        "This category has {} item(s). Please delete or move the items first.",
                        item_count
                    ));
                api.body.item_count = Some(item_count);
                api
            }
            Error::NoReassignmentTarget => ApiError::bad_request(
                "Cannot delete category with items. No other categories exist to move items to.",
            ),
            Error::Upstream(msg) => {
                tracing::warn!(error = %msg, "Upstream model call failed");
                ApiError::new(StatusCode::BAD_GATEWAY, "AI service request failed")
                    .with_details(msg)
            }
            Error::Http(e) => {
                tracing::warn!(error = %e, "Upstream transport failure");
                ApiError::new(StatusCode::BAD_GATEWAY, "AI service request failed")
            }
            Error::Unavailable(msg) => ApiError::new(StatusCode::SERVICE_UNAVAILABLE, msg),
            other => {
                tracing::error!(error = %other, "Request failed");
                ApiError::internal()
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request("Invalid JSON body").with_details(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_request("Invalid query string").with_details(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

// =============================================================================
// Root handlers
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Per-route fallback for unsupported methods
pub async fn method_not_allowed() -> ApiError {
    ApiError::new(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}

async fn route_not_found() -> ApiError {
    ApiError::not_found("Not found")
}

// =============================================================================
// CORS
// =============================================================================

fn build_cors(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT]);

    if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        let parsed: Vec<_> = origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors.allow_origin(parsed)
    }
}
