//! Data models and structures
//!
//! Defines the pricing and brand results returned by the model, the
//! degrade-don't-fail wrapper around them, and the error body shared by the
//! server and the client.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

pub const EXPECTED_BRAND_NAMES: usize = 5;
pub const EXPECTED_TAGLINES: usize = 3;
pub const EXPECTED_PERSONALITY_TRAITS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimatedPrice {
    pub min: Number,
    pub max: Number,
    pub recommended: Number,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingResult {
    pub product_name: String,
    pub estimated_price: EstimatedPrice,
    pub market_position: String,
    pub target_audience: String,
    pub competitor_insight: String,
    pub pricing_strategy: Vec<String>,
    pub improvement_suggestions: Vec<String>,
    /// Fields the model added beyond the requested shape, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorPalette {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub background: String,
}

impl ColorPalette {
    pub fn swatches(&self) -> [(&'static str, &str); 4] {
        [
            ("primary", &self.primary),
            ("secondary", &self.secondary),
            ("accent", &self.accent),
            ("background", &self.background),
        ]
    }
}

/// `#RRGGBB`
pub fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandResult {
    pub brand_names: Vec<String>,
    pub taglines: Vec<String>,
    pub brand_story: String,
    pub color_palette: ColorPalette,
    pub brand_personality: Vec<String>,
    pub unique_selling_point: String,
    pub market_positioning: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BrandResult {
    /// Deviations from the counts the prompt asks for. Informational only: a
    /// result with the "wrong" number of entries is still a valid result.
    pub fn cardinality_warnings(&self) -> Vec<String> {
        let checks = [
            ("brandNames", self.brand_names.len(), EXPECTED_BRAND_NAMES),
            ("taglines", self.taglines.len(), EXPECTED_TAGLINES),
            (
                "brandPersonality",
                self.brand_personality.len(),
                EXPECTED_PERSONALITY_TRAITS,
            ),
        ];

        let mut warnings: Vec<String> = checks
            .iter()
            .filter(|(_, actual, expected)| actual != expected)
            .map(|(field, actual, expected)| {
                format!("{} has {} entries, expected {}", field, actual, expected)
            })
            .collect();

        for (name, value) in self.color_palette.swatches() {
            if !is_hex_color(value) {
                warnings.push(format!("colorPalette.{} '{}' is not #RRGGBB", name, value));
            }
        }

        warnings
    }
}

/// Model text that was not valid JSON, as `{"raw": "..."}`.
///
/// Any other key makes this fail to deserialize, so an object that merely
/// contains a `raw` field stays whole as [`ModelOutput::Unstructured`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawText {
    pub raw: String,
}

/// What the gateway got back from the model.
///
/// Serialized untagged, so on the wire a structured result is the bare object,
/// a raw fallback is `{"raw": "..."}`, and anything else is passed through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModelOutput<T> {
    /// Valid JSON in the requested shape.
    Structured(T),
    /// Text that was not valid JSON.
    Raw(RawText),
    /// Valid JSON in some other shape.
    Unstructured(Value),
}

impl<T: DeserializeOwned> ModelOutput<T> {
    pub fn parse(text: &str) -> Self {
        let value: Value = match serde_json::from_str(text) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Model output is not valid JSON ({}), returning raw text", e);
                return Self::raw(text);
            }
        };

        match serde_json::from_value::<T>(value.clone()) {
            Ok(parsed) => Self::Structured(parsed),
            Err(e) => {
                tracing::warn!("Model output does not match the expected shape: {}", e);
                Self::Unstructured(value)
            }
        }
    }
}

impl<T> ModelOutput<T> {
    pub fn raw(text: impl Into<String>) -> Self {
        Self::Raw(RawText { raw: text.into() })
    }

    pub fn structured(&self) -> Option<&T> {
        match self {
            Self::Structured(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_degraded(&self) -> bool {
        !matches!(self, Self::Structured(_))
    }
}

/// The only failure shape the server returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
