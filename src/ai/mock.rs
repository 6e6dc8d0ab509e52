use super::InsightService;
use crate::models::{BrandResult, ModelOutput, PricingResult};
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A scripted reply: the model text to parse, or an upstream failure message.
#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Failure(String),
}

/// In-memory [`InsightService`] for tests and local harnesses.
///
/// Replies are consumed in order and cycle once exhausted. Clones share state,
/// so a clone kept by a test can observe calls made through the server.
#[derive(Clone)]
pub struct MockInsightClient {
    replies: Arc<Mutex<Vec<MockReply>>>,
    call_count: Arc<Mutex<usize>>,
    last_text: Arc<Mutex<Option<String>>>,
    delay: Option<Duration>,
}

impl MockInsightClient {
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
            last_text: Arc::new(Mutex::new(None)),
            delay: None,
        }
    }

    /// Queue model text; it goes through the same parsing as a real reply.
    pub fn with_text_response(self, text: impl Into<String>) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push(MockReply::Text(text.into()));
        self
    }

    pub fn with_failure(self, message: impl Into<String>) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push(MockReply::Failure(message.into()));
        self
    }

    /// Hold every call open for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// The description or story passed to the most recent call.
    pub fn last_text(&self) -> Option<String> {
        self.last_text.lock().unwrap().clone()
    }

    async fn next_reply(&self, text: &str) -> Result<String> {
        let reply = {
            let mut count = self.call_count.lock().unwrap();
            *count += 1;
            *self.last_text.lock().unwrap() = Some(text.to_string());

            let replies = self.replies.lock().unwrap();
            let reply = match replies.len() {
                0 => MockReply::Text("{}".to_string()),
                len => replies[(*count - 1) % len].clone(),
            };
            reply
        };

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match reply {
            MockReply::Text(text) => Ok(text),
            MockReply::Failure(message) => Err(Error::AiProvider(message)),
        }
    }
}

impl Default for MockInsightClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InsightService for MockInsightClient {
    async fn analyze_product_pricing(
        &self,
        _image_base64: &str,
        description: &str,
    ) -> Result<ModelOutput<PricingResult>> {
        let text = self.next_reply(description).await?;
        Ok(ModelOutput::parse(&text))
    }

    async fn generate_brand_identity(
        &self,
        _image_base64: &str,
        story: &str,
    ) -> Result<ModelOutput<BrandResult>> {
        let text = self.next_reply(story).await?;
        Ok(ModelOutput::parse(&text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_cycles_replies_and_counts_calls() {
        let client = MockInsightClient::new()
            .with_text_response("not json")
            .with_failure("quota exceeded");

        assert_eq!(client.get_call_count(), 0);

        let first = client.analyze_product_pricing("img", "desc").await.unwrap();
        assert_eq!(first, ModelOutput::raw("not json"));
        assert_eq!(client.last_text().as_deref(), Some("desc"));

        let err = client.generate_brand_identity("img", "story").await.unwrap_err();
        assert!(matches!(err, Error::AiProvider(ref msg) if msg == "quota exceeded"));

        // Should cycle back
        let third = client.analyze_product_pricing("img", "").await.unwrap();
        assert!(third.is_degraded());
        assert_eq!(client.get_call_count(), 3);
    }

    #[tokio::test]
    async fn test_clones_share_call_count() {
        let client = MockInsightClient::new();
        let probe = client.clone();

        client.generate_brand_identity("img", "").await.unwrap();
        assert_eq!(probe.get_call_count(), 1);
    }
}
