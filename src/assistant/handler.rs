//! HTTP handlers for the assistant
//!
//! - POST /api/chat   - inventory-aware chat
//! - POST /api/detect - multipart image upload (`image`, `file` or `photo`)

use crate::api::{method_not_allowed, ApiError, ApiResult};
use crate::assistant::gateway::AssistantGateway;
use crate::assistant::types::ChatRequest;
use crate::config::AssistantConfig;
use crate::error::Error;
use crate::inventory::InventoryStore;
use crate::validation::Validator;
use axum::{
    extract::{
        multipart::MultipartRejection, rejection::JsonRejection, DefaultBodyLimit, Multipart,
        State,
    },
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use std::sync::Arc;

/// Accepted multipart field names for the uploaded image
const IMAGE_FIELDS: [&str; 3] = ["image", "file", "photo"];

const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

/// Room for multipart framing around the image itself
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Shared state for assistant handlers
#[derive(Clone)]
pub struct AssistantState {
    pub store: Arc<InventoryStore>,
    pub validator: Arc<Validator>,
    /// `None` when no API key is configured
    pub gateway: Option<Arc<AssistantGateway>>,
}

impl AssistantState {
    fn gateway(&self) -> Result<&AssistantGateway, Error> {
        self.gateway
            .as_deref()
            .ok_or_else(|| Error::Unavailable("AI assistant is not configured".to_string()))
    }
}

/// Create the assistant router
pub fn assistant_router(state: AssistantState) -> Router {
    let max_image_bytes = state
        .gateway
        .as_ref()
        .map(|g| g.settings().max_image_bytes)
        .unwrap_or_else(|| AssistantConfig::default().max_image_bytes);

    Router::new()
        .route("/api/chat", post(chat).fallback(method_not_allowed))
        .route(
            "/api/detect",
            post(detect)
                .layer(DefaultBodyLimit::max(max_image_bytes + MULTIPART_OVERHEAD))
                .fallback(method_not_allowed),
        )
        .with_state(state)
}

/// POST /api/chat
async fn chat(
    State(state): State<AssistantState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(request) = payload?;
    state
        .validator
        .validate_chat_message(&request)
        .into_result()?;

    let gateway = state.gateway()?;
    let items = state.store.list_items().await?;
    let message = request.message.as_deref().unwrap_or_default().trim();

    let response = gateway
        .ask(message, &items, &state.store.thresholds())
        .await;
    Ok(Json(response))
}

/// POST /api/detect
async fn detect(
    State(state): State<AssistantState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<impl IntoResponse> {
    let mut multipart =
        multipart.map_err(|e| ApiError::new(e.status(), "Expected multipart form data"))?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::new(e.status(), e.body_text()))?
    {
        let is_image = field
            .name()
            .map(|name| IMAGE_FIELDS.contains(&name))
            .unwrap_or(false);
        if !is_image {
            continue;
        }

        let mime_type = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_else(|| DEFAULT_IMAGE_MIME.to_string());
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::new(e.status(), e.body_text()))?;
        upload = Some((bytes, mime_type));
        break;
    }

    let (bytes, mime_type) = upload
        .filter(|(bytes, _)| !bytes.is_empty())
        .ok_or_else(|| ApiError::bad_request("No image uploaded"))?;

    let gateway = state.gateway()?;
    tracing::debug!(bytes = bytes.len(), mime = %mime_type, "Recognizing uploaded image");
    let detection = gateway.recognize(bytes.to_vec(), &mime_type).await?;
    Ok(Json(detection))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::gateway::tests::StubModel;
    use crate::assistant::gateway::GenerativeModel;
    use crate::config::ValidationRules;
    use crate::expiry::{ExpiryThresholds, FixedClock};
    use crate::inventory::types::NewFoodItem;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const BOUNDARY: &str = "larder-test-boundary";

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 10, 12, 0, 0).unwrap()
    }

    async fn make_app(model: Option<Arc<dyn GenerativeModel>>) -> Router {
        let store = Arc::new(
            InventoryStore::open_in_memory(
                ExpiryThresholds::default(),
                Arc::new(FixedClock::new(now())),
            )
            .unwrap(),
        );
        let dairy = store.create_category("Dairy").await.unwrap();
        for (name, days) in [("Milk", 1), ("Cheese", 5), ("Rice", 40)] {
            store
                .create_item(NewFoodItem {
                    name: name.to_string(),
                    volume: 1.0,
                    volume_unit: "g".to_string(),
                    expiry_date: now() + Duration::days(days),
                    notes: None,
                    category_id: dairy.id,
                })
                .await
                .unwrap();
        }

        let gateway = model.map(|model| {
            Arc::new(AssistantGateway::new(
                model,
                Arc::new(AssistantConfig::default()),
            ))
        });
        let state = AssistantState {
            store,
            validator: Arc::new(Validator::new(&ValidationRules::default()).unwrap()),
            gateway,
        };
        assistant_router(state)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), 1024 * 64)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    fn chat_request(message: &str) -> Request<Body> {
        Request::post("/api/chat")
            .header("content-type", "application/json")
            .body(Body::from(json!({ "message": message }).to_string()))
            .unwrap()
    }

    fn multipart_request(field: &str, content: &[u8]) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"photo.png\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::post("/api/detect")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_chat_with_structured_reply() {
        let model = Arc::new(StubModel::replying(
            "```json\n{\"reply\":\"Make a cheese toastie.\",\"suggestedRecipes\":[{\"name\":\"Toastie\",\"ingredients\":[\"Cheese\"],\"usesExpiring\":true}]}\n```",
        ));
        let app = make_app(Some(model)).await;

        let resp = app.oneshot(chat_request("Dinner ideas?")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["reply"], "Make a cheese toastie.");
        assert_eq!(body["suggestedRecipes"][0]["usesExpiring"], true);
        assert_eq!(body["inventorySummary"]["totalItems"], 3);
        assert_eq!(body["inventorySummary"]["expiringCount"], 2);
        assert_eq!(body["degraded"], false);
    }

    #[tokio::test]
    async fn test_chat_with_unparseable_reply_uses_inventory() {
        let app = make_app(Some(Arc::new(StubModel::replying("Use the milk today!")))).await;

        let resp = app.oneshot(chat_request("Help")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["reply"], "Use the milk today!");
        assert_eq!(body["expiringSoon"][0]["name"], "Milk");
        assert_eq!(body["expiringSoon"][0]["urgency"], "urgent");
        assert_eq!(body["expiringSoon"][1]["name"], "Cheese");
        assert_eq!(body["degraded"], true);
    }

    #[tokio::test]
    async fn test_chat_validation() {
        let app = make_app(Some(Arc::new(StubModel::replying("{}")))).await;

        let resp = app.clone().oneshot(chat_request("   ")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["details"][0], "Message is required");

        let resp = app.oneshot(chat_request(&"a".repeat(1001))).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(resp).await["details"][0],
            "Message too long (max 1000 characters)"
        );
    }

    #[tokio::test]
    async fn test_chat_without_key_is_unavailable() {
        let app = make_app(None).await;
        let resp = app.oneshot(chat_request("hi")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_detect_returns_detection() {
        let model = Arc::new(StubModel::replying(
            "{\"label\":\"apple\",\"confidence\":0.9,\"estimated_expiry_days\":7,\"estimated_volume_ml\":150,\"category\":\"Fruits\"}",
        ));
        let app = make_app(Some(model.clone())).await;

        let resp = app
            .oneshot(multipart_request("photo", b"\x89PNG fake"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["label"], "apple");
        assert_eq!(body["estimated_expiry_days"], 7);
        assert_eq!(body["provider"], "stub");

        let requests = model.requests.lock().unwrap();
        match &requests[0].parts[1] {
            crate::assistant::gateway::ContentPart::InlineData { mime_type, .. } => {
                assert_eq!(mime_type, "image/png")
            }
            other => panic!("unexpected part: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_detect_without_image() {
        let app = make_app(Some(Arc::new(StubModel::replying("{}")))).await;
        let resp = app
            .oneshot(multipart_request("document", b"abc"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["error"], "No image uploaded");
    }

    #[tokio::test]
    async fn test_detect_rejects_non_multipart_body() {
        let app = make_app(Some(Arc::new(StubModel::replying("{}")))).await;
        let resp = app
            .oneshot(
                Request::post("/api/detect")
                    .header("content-type", "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["error"], "Expected multipart form data");
    }

    #[tokio::test]
    async fn test_detect_bad_model_reply_is_502() {
        let app = make_app(Some(Arc::new(StubModel::replying("I think it's a pear")))).await;
        let resp = app
            .oneshot(multipart_request("image", b"jpegdata"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_detect_without_key_is_unavailable() {
        let app = make_app(None).await;
        let resp = app
            .oneshot(multipart_request("image", b"jpegdata"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
