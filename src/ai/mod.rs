//! Model gateway for product insights
//!
//! Embeds the seller's photo and note into an instruction prompt, sends both
//! to a hosted multimodal model, and parses whatever text comes back.

pub mod gemini;
pub mod mime;
pub mod mock;

pub use gemini::{GeminiHttpClient, GeminiInsightClient};
pub use mock::MockInsightClient;

use crate::models::{BrandResult, ModelOutput, PricingResult};
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait InsightService: Send + Sync {
    /// Price range, market position and tips for the product in the photo.
    async fn analyze_product_pricing(
        &self,
        image_base64: &str,
        description: &str,
    ) -> Result<ModelOutput<PricingResult>>;

    /// Brand names, taglines, story and palette for the product in the photo.
    async fn generate_brand_identity(
        &self,
        image_base64: &str,
        story: &str,
    ) -> Result<ModelOutput<BrandResult>>;
}
