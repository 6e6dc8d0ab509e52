pub mod client;
pub mod insight;
pub mod types;

pub use client::GeminiHttpClient;
pub use insight::GeminiInsightClient;

#[cfg(test)]
pub(crate) mod test_support {
    use wiremock::matchers::{method, path_regex};
    use wiremock::{MockBuilder, ResponseTemplate};

    pub const GENERATE_CONTENT_PATH_REGEX: &str = r"^/v1beta/models/[^/]+:generateContent$";

    pub fn post_generate_content() -> MockBuilder {
        wiremock::Mock::given(method("POST")).and(path_regex(GENERATE_CONTENT_PATH_REGEX))
    }

    /// A `generateContent` envelope whose single candidate says `text`.
    pub fn text_response(text: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{ "text": text }]
                }
            }]
        }))
    }
}
