//! Sends one encoded photo to the server and classifies what comes back.

use crate::models::{BrandResult, ModelOutput, PricingResult};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicBool, Ordering};

/// Shown for any failure that carries no server message of its own.
pub const GENERIC_ERROR_MESSAGE: &str = "Terjadi kesalahan. Silakan coba lagi.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Pricing,
    Brand,
}

impl Feature {
    pub fn path(self) -> &'static str {
        match self {
            Feature::Pricing => "/api/analyze-pricing",
            Feature::Brand => "/api/generate-brand",
        }
    }

    /// Name of the optional free-text field in the request body.
    pub fn text_field(self) -> &'static str {
        match self {
            Feature::Pricing => "description",
            Feature::Brand => "story",
        }
    }
}

/// One request's worth of input. Lives only until it is sent.
#[derive(Debug, Clone)]
pub struct UploadPayload {
    pub image: String,
    pub text: String,
}

impl UploadPayload {
    pub fn to_body(&self, feature: Feature) -> Value {
        let mut body = Map::new();
        body.insert("image".to_string(), Value::String(self.image.clone()));
        body.insert(
            feature.text_field().to_string(),
            Value::String(self.text.clone()),
        );
        Value::Object(body)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Nothing selected yet.
    NoImage,
    /// A request from this dispatcher is still outstanding.
    Busy,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome<T> {
    Completed(ModelOutput<T>),
    /// A single user-facing sentence.
    Failed(String),
    /// No request was sent.
    Skipped(SkipReason),
}

/// Clears the loading flag however the request ends.
struct LoadingGuard<'a>(&'a AtomicBool);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Client for the insight server. At most one request is in flight per
/// dispatcher; there is no retry, timeout or cancellation.
pub struct Dispatcher {
    client: Client,
    base_url: String,
    loading: AtomicBool,
}

impl Dispatcher {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::new_with_client(base_url, Client::new())
    }

    pub fn new_with_client(base_url: impl Into<String>, client: Client) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            loading: AtomicBool::new(false),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    pub async fn analyze_pricing(
        &self,
        image: &str,
        description: &str,
    ) -> DispatchOutcome<PricingResult> {
        self.dispatch(Feature::Pricing, image, description).await
    }

    pub async fn generate_brand(&self, image: &str, story: &str) -> DispatchOutcome<BrandResult> {
        self.dispatch(Feature::Brand, image, story).await
    }

    pub async fn dispatch<T: DeserializeOwned>(
        &self,
        feature: Feature,
        image: &str,
        text: &str,
    ) -> DispatchOutcome<T> {
        if image.is_empty() {
            return DispatchOutcome::Skipped(SkipReason::NoImage);
        }

        if self
            .loading
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("Request already in flight, ignoring {:?}", feature);
            return DispatchOutcome::Skipped(SkipReason::Busy);
        }
        let _guard = LoadingGuard(&self.loading);

        let payload = UploadPayload {
            image: image.to_string(),
            text: text.to_string(),
        };
        let url = format!("{}{}", self.base_url, feature.path());

        let response = match self
            .client
            .post(&url)
            .json(&payload.to_body(feature))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("Request to {} failed: {}", url, e);
                return DispatchOutcome::Failed(GENERIC_ERROR_MESSAGE.to_string());
            }
        };

        let status = response.status();
        let body: Value = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                tracing::error!("Unreadable response from {} ({}): {}", url, status, e);
                return DispatchOutcome::Failed(GENERIC_ERROR_MESSAGE.to_string());
            }
        };

        Self::classify(status, body)
    }

    fn classify<T: DeserializeOwned>(
        status: reqwest::StatusCode,
        body: Value,
    ) -> DispatchOutcome<T> {
        if let Some(message) = body.get("error").and_then(Value::as_str) {
            return DispatchOutcome::Failed(message.to_string());
        }

        if !status.is_success() {
            tracing::error!("Server returned {} without an error message", status);
            return DispatchOutcome::Failed(GENERIC_ERROR_MESSAGE.to_string());
        }

        match serde_json::from_value(body) {
            Ok(output) => DispatchOutcome::Completed(output),
            Err(e) => {
                tracing::error!("Unexpected response shape: {}", e);
                DispatchOutcome::Failed(GENERIC_ERROR_MESSAGE.to_string())
            }
        }
    }
}
