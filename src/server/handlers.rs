//! Route handlers for the two insight endpoints.
//!
//! Both share one shape: read `image` plus an optional free-text field, reject
//! a missing image with 400 before touching the model, call the gateway, and
//! turn any gateway failure into a 500 with an `error` body.

use super::error::{ApiError, IMAGE_REQUIRED, INVALID_JSON};
use super::AppState;
use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::Json;
use serde_json::{json, Map, Value};
use tracing::{error, info};

pub const PRICING_CONTEXT: &str = "Failed to analyze product";
pub const BRAND_CONTEXT: &str = "Failed to generate brand identity";

const PREVIEW_CHARS: usize = 200;

/// Pull `image` and the optional text field out of a loosely-typed body.
///
/// The body is parsed as JSON whatever its `Content-Type`. Non-string or
/// missing text counts as empty; a missing, blank or non-string image is a 400.
fn extract_inputs(
    body: Result<Bytes, BytesRejection>,
    text_field: &str,
) -> Result<(String, String), ApiError> {
    let bytes = body?;
    let body: Value = serde_json::from_slice(&bytes).map_err(|e| {
        tracing::debug!("Request body is not JSON: {}", e);
        ApiError::BadRequest(INVALID_JSON.to_string())
    })?;

    let empty = Map::new();
    let object = body.as_object().unwrap_or(&empty);

    let image = object
        .get("image")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest(IMAGE_REQUIRED.to_string()))?;

    let text = object
        .get(text_field)
        .and_then(Value::as_str)
        .unwrap_or("");

    Ok((image.to_string(), text.to_string()))
}

fn preview(value: &Value) -> String {
    value.to_string().chars().take(PREVIEW_CHARS).collect()
}

/// `POST /api/analyze-pricing` with `{image, description?}`.
pub async fn analyze_pricing(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Value>, ApiError> {
    let (image, description) = extract_inputs(body, "description")?;

    info!("Starting pricing analysis (image length {})", image.len());

    let output = state
        .insight
        .analyze_product_pricing(&image, &description)
        .await
        .map_err(|e| {
            error!("Pricing analysis error: {}", e);
            ApiError::upstream(PRICING_CONTEXT, &e, state.secret.as_deref())
        })?;

    let value = serde_json::to_value(&output).map_err(|e| {
        error!("Failed to serialize pricing result: {}", e);
        ApiError::upstream(PRICING_CONTEXT, &crate::Error::from(e), None)
    })?;
    info!("Analysis result: {}", preview(&value));

    Ok(Json(value))
}

/// `POST /api/generate-brand` with `{image, story?}`.
pub async fn generate_brand(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Value>, ApiError> {
    let (image, story) = extract_inputs(body, "story")?;

    info!("Starting brand generation (image length {})", image.len());

    let output = state
        .insight
        .generate_brand_identity(&image, &story)
        .await
        .map_err(|e| {
            error!("Brand generation error: {}", e);
            ApiError::upstream(BRAND_CONTEXT, &e, state.secret.as_deref())
        })?;

    let value = serde_json::to_value(&output).map_err(|e| {
        error!("Failed to serialize brand result: {}", e);
        ApiError::upstream(BRAND_CONTEXT, &crate::Error::from(e), None)
    })?;
    info!("Brand result: {}", preview(&value));

    Ok(Json(value))
}

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MockInsightClient;
    use crate::config::Config;
    use crate::server::router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app(mock: &MockInsightClient) -> Router {
        router(AppState {
            insight: Arc::new(mock.clone()),
            secret: Some("secret-key".to_string()),
        })
    }

    async fn post(app: Router, uri: &str, body: &str) -> (StatusCode, Value) {
        send(
            app,
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_missing_image_is_400_without_model_call() {
        let mock = MockInsightClient::new();

        for (uri, body) in [
            ("/api/analyze-pricing", r#"{"description":"Tas"}"#),
            ("/api/analyze-pricing", r#"{"image":""}"#),
            ("/api/analyze-pricing", r#"{"image":"  "}"#),
            ("/api/generate-brand", r#"{"image":"","story":"x"}"#),
            ("/api/generate-brand", r#"{"image":42}"#),
            ("/api/generate-brand", r#"[]"#),
        ] {
            let (status, body) = post(app(&mock), uri, body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body, json!({ "error": "Image is required" }));
        }

        assert_eq!(mock.get_call_count(), 0);
    }

    #[tokio::test]
    async fn test_malformed_json_is_400() {
        let mock = MockInsightClient::new();
        let (status, body) = post(app(&mock), "/api/analyze-pricing", "{image:").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Invalid JSON body" }));
        assert_eq!(mock.get_call_count(), 0);
    }

    #[tokio::test]
    async fn test_body_without_content_type_is_still_json() {
        let mock = MockInsightClient::new().with_text_response(r#"{"ok":true}"#);

        let request = Request::builder()
            .method("POST")
            .uri("/api/generate-brand")
            .body(Body::from(r#"{"image":"abc","story":"x"}"#))
            .unwrap();
        let (status, body) = send(app(&mock), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "ok": true }));
        assert_eq!(mock.last_text().as_deref(), Some("x"));

        let request = Request::builder()
            .method("POST")
            .uri("/api/generate-brand")
            .header("content-type", "text/plain")
            .body(Body::from(r#"{"image":""}"#))
            .unwrap();
        let (status, body) = send(app(&mock), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Image is required" }));
        assert_eq!(mock.get_call_count(), 1);
    }

    #[tokio::test]
    async fn test_oversized_body_is_413_with_error_body() {
        let mock = MockInsightClient::new();
        let config = Config {
            max_body_bytes: 64,
            ..Config::default()
        };
        let app = crate::server::app(
            AppState {
                insight: Arc::new(mock.clone()),
                secret: None,
            },
            &config,
        );

        let body = json!({ "image": "A".repeat(200) }).to_string();
        let (status, body) = post(app, "/api/analyze-pricing", &body).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body, json!({ "error": "Request body is too large" }));
        assert_eq!(mock.get_call_count(), 0);
    }

    #[tokio::test]
    async fn test_pricing_success_passes_output_through() {
        let model_json = json!({ "productName": "Vas", "note": "partial" });
        let mock = MockInsightClient::new().with_text_response(model_json.to_string());

        let (status, body) = post(
            app(&mock),
            "/api/analyze-pricing",
            r#"{"image":"iVBORw0K","description":"Vas tanah liat"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, model_json);
        assert_eq!(mock.last_text().as_deref(), Some("Vas tanah liat"));
    }

    #[tokio::test]
    async fn test_missing_text_field_defaults_to_empty() {
        let mock = MockInsightClient::new();
        let (status, _) = post(app(&mock), "/api/generate-brand", r#"{"image":"abc"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(mock.last_text().as_deref(), Some(""));
    }

    #[tokio::test]
    async fn test_degraded_output_is_200_raw() {
        let mock = MockInsightClient::new().with_text_response("Sorry, I cannot process this.");
        let (status, body) = post(app(&mock), "/api/generate-brand", r#"{"image":"abc"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "raw": "Sorry, I cannot process this." }));
    }

    #[tokio::test]
    async fn test_upstream_failure_is_500_with_context() {
        let mock = MockInsightClient::new()
            .with_failure("quota exceeded for secret-key\nretry later");

        let (status, body) = post(app(&mock), "/api/analyze-pricing", r#"{"image":"abc"}"#).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({ "error": "Failed to analyze product: AI provider error: quota exceeded for ***" })
        );

        let (status, body) = post(app(&mock), "/api/generate-brand", r#"{"image":"abc"}"#).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({ "error": "Failed to generate brand identity: AI provider error: quota exceeded for ***" })
        );
    }

    #[tokio::test]
    async fn test_health() {
        let mock = MockInsightClient::new();
        let response = app(&mock)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
