use super::client::GeminiHttpClient;
use super::types::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, InlineData, Part,
};
use crate::ai::{mime, InsightService};
use crate::models::{BrandResult, ModelOutput, PricingResult};
use crate::{prompts, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;

/// Gemini implementation of [`InsightService`].
pub struct GeminiInsightClient {
    http: GeminiHttpClient,
}

impl GeminiInsightClient {
    pub fn new(http: GeminiHttpClient) -> Self {
        Self { http }
    }

    fn build_request(prompt: String, image_base64: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![
                    Part::Text { text: prompt },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: mime::detect_base64_image_mime(image_base64).to_string(),
                            data: image_base64.to_string(),
                        },
                    },
                ],
            }],
            generation_config: Some(GenerationConfig {
                response_mime_type: Some("application/json".to_string()),
            }),
        }
    }

    async fn generate_json<T: DeserializeOwned>(
        &self,
        prompt: String,
        image_base64: &str,
    ) -> Result<ModelOutput<T>> {
        let request = Self::build_request(prompt, image_base64);
        let response: GenerateContentResponse = self.http.generate_content(&request).await?;

        let text = response.text();
        tracing::debug!("Gemini returned {} chars of text", text.len());

        Ok(ModelOutput::parse(&text))
    }
}

#[async_trait]
impl InsightService for GeminiInsightClient {
    async fn analyze_product_pricing(
        &self,
        image_base64: &str,
        description: &str,
    ) -> Result<ModelOutput<PricingResult>> {
        tracing::debug!(
            "Analyzing pricing via Gemini ({} base64 chars)",
            image_base64.len()
        );
        self.generate_json(prompts::pricing_prompt(description), image_base64)
            .await
    }

    async fn generate_brand_identity(
        &self,
        image_base64: &str,
        story: &str,
    ) -> Result<ModelOutput<BrandResult>> {
        tracing::debug!(
            "Generating brand identity via Gemini ({} base64 chars)",
            image_base64.len()
        );
        let output: ModelOutput<BrandResult> = self
            .generate_json(prompts::brand_prompt(story), image_base64)
            .await?;

        if let Some(brand) = output.structured() {
            for warning in brand.cardinality_warnings() {
                tracing::warn!("Brand identity: {}", warning);
            }
        }

        Ok(output)
    }
}
