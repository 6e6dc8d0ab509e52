use crate::{Error, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Lightweight Gemini REST client.
///
/// Holds the credential explicitly so callers can inject, rotate or omit it.
/// A client without a key still constructs; every call then fails with
/// [`Error::Config`].
pub struct GeminiHttpClient {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
    timeout: Duration,
}

impl GeminiHttpClient {
    /// Construct a Gemini client.
    ///
    /// `model` should be the bare model ID (for example `gemini-2.5-flash`);
    /// a `models/` prefix is stripped.
    pub fn new(api_key: Option<String>, model: String, timeout: Duration) -> Self {
        Self::new_with_client(api_key, model, timeout, Client::new())
    }

    pub fn new_with_client(
        api_key: Option<String>,
        model: String,
        timeout: Duration,
        client: Client,
    ) -> Self {
        let model = model.strip_prefix("models/").unwrap_or(&model).to_string();

        Self {
            client,
            api_key,
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout,
        }
    }

    /// Point the client at another host, e.g. a local mock server.
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Returns the configured model ID without the `models/` prefix.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Calls Gemini's `generateContent` endpoint.
    pub async fn generate_content<Req: Serialize, Resp: DeserializeOwned>(
        &self,
        request: &Req,
    ) -> Result<Resp> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| Error::Config("GEMINI_API_KEY not set".to_string()))?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .header("x-goog-api-key", api_key)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send request to Gemini: {}", e);
                e
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            tracing::error!("Gemini API error (status {}): {}", status, error_text);
            return Err(Error::AiProvider(format!(
                "Gemini API error (status {}): {}",
                status, error_text
            )));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse Gemini response: {}\nBody: {}", e, body);
            Error::AiProvider(format!("Failed to parse Gemini response: {}", e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_client(server: &MockServer, api_key: Option<&str>, model: &str) -> GeminiHttpClient {
        GeminiHttpClient::new(
            api_key.map(str::to_string),
            model.to_string(),
            Duration::from_secs(5),
        )
        .with_base_url(server.uri())
    }

    #[tokio::test]
    async fn test_sends_key_header_to_model_path() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
            .expect(1)
            .mount(&server)
            .await;

        let client = make_client(&server, Some("test-key"), "models/gemini-2.5-flash");
        assert_eq!(client.model(), "gemini-2.5-flash");

        let body: Value = client.generate_content(&json!({})).await.unwrap();
        assert_eq!(body, json!({ "ok": true }));
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_network_call() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = make_client(&server, None, "gemini-2.5-flash");
        let err = client
            .generate_content::<_, Value>(&json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[tokio::test]
    async fn test_quota_error_is_ai_provider_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        let client = make_client(&server, Some("k"), "gemini-2.5-flash");
        let err = client
            .generate_content::<_, Value>(&json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::AiProvider(ref msg) if msg.contains("429")));
    }

    #[tokio::test]
    async fn test_non_json_success_body_is_ai_provider_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let client = make_client(&server, Some("k"), "gemini-2.5-flash");
        let err = client
            .generate_content::<_, Value>(&json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::AiProvider(_)));
    }
}
