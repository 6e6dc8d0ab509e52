//! Terminal rendering of insight results.

use super::dispatcher::DispatchOutcome;
use crate::models::{BrandResult, ModelOutput, PricingResult};
use serde_json::Number;
use std::fmt::Write as _;

pub const LOADING_MESSAGE: &str = "AI sedang berpikir...";

/// What a page shows. Exactly one at a time.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Success(ModelOutput<T>),
    Error(String),
}

impl<T> ViewState<T> {
    /// Next state after a dispatch. A skipped dispatch changes nothing.
    pub fn apply(self, outcome: DispatchOutcome<T>) -> Self {
        match outcome {
            DispatchOutcome::Completed(output) => ViewState::Success(output),
            DispatchOutcome::Failed(message) => ViewState::Error(message),
            DispatchOutcome::Skipped(_) => self,
        }
    }
}

/// `Rp\u{a0}150.000`: Indonesian grouping, no fraction digits, and a no-break
/// space after the symbol as the `id-ID` IDR currency format writes it.
pub fn format_rupiah(amount: f64) -> String {
    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    if rounded < 0.0 {
        format!("-Rp\u{a0}{}", grouped)
    } else {
        format!("Rp\u{a0}{}", grouped)
    }
}

fn rupiah(number: &Number) -> String {
    number
        .as_f64()
        .map(format_rupiah)
        .unwrap_or_else(|| number.to_string())
}

fn bullets(out: &mut String, title: &str, items: &[String]) {
    let _ = writeln!(out, "{}:", title);
    for (i, item) in items.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", i + 1, item);
    }
}

pub fn render_pricing(result: &PricingResult) -> String {
    let mut out = String::new();
    let price = &result.estimated_price;

    let _ = writeln!(out, "{}", result.product_name);
    let _ = writeln!(out, "Harga rekomendasi: {}", rupiah(&price.recommended));
    let _ = writeln!(
        out,
        "Rentang harga: {} - {}",
        rupiah(&price.min),
        rupiah(&price.max)
    );
    let _ = writeln!(out, "Posisi pasar: {}", result.market_position);
    let _ = writeln!(out, "Target pasar: {}", result.target_audience);
    let _ = writeln!(out, "Insight kompetitor: {}", result.competitor_insight);
    bullets(&mut out, "Strategi harga", &result.pricing_strategy);
    bullets(&mut out, "Saran peningkatan", &result.improvement_suggestions);
    out
}

pub fn render_brand(result: &BrandResult) -> String {
    let mut out = String::new();

    bullets(&mut out, "Nama brand", &result.brand_names);
    bullets(&mut out, "Tagline", &result.taglines);
    let _ = writeln!(out, "Cerita brand: {}", result.brand_story);
    let _ = writeln!(out, "Palet warna:");
    for (name, hex) in result.color_palette.swatches() {
        let _ = writeln!(out, "  {:<10} {}", name, hex);
    }
    let _ = writeln!(out, "Kepribadian: {}", result.brand_personality.join(", "));
    let _ = writeln!(out, "USP: {}", result.unique_selling_point);
    let _ = writeln!(out, "Positioning: {}", result.market_positioning);
    out
}

/// Degraded outputs show the raw text or the JSON as received.
pub fn render_output<T>(output: &ModelOutput<T>, render: fn(&T) -> String) -> String {
    match output {
        ModelOutput::Structured(value) => render(value),
        ModelOutput::Raw(text) => format!("{}\n", text.raw),
        ModelOutput::Unstructured(value) => serde_json::to_string_pretty(value)
            .map(|s| s + "\n")
            .unwrap_or_else(|_| format!("{}\n", value)),
    }
}

pub fn render_state<T>(state: &ViewState<T>, render: fn(&T) -> String) -> String {
    match state {
        ViewState::Idle => String::new(),
        ViewState::Loading => format!("{}\n", LOADING_MESSAGE),
        ViewState::Success(output) => render_output(output, render),
        ViewState::Error(message) => format!("{}\n", message),
    }
}
