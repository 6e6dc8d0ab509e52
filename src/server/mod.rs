//! HTTP server exposing the insight routes.
//!
//! Every request is handled independently; the only shared state is the
//! injected gateway handle.

pub mod error;
pub mod handlers;

pub use error::ApiError;

use crate::ai::{GeminiHttpClient, GeminiInsightClient, InsightService};
use crate::config::Config;
use crate::Result;
use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub insight: Arc<dyn InsightService>,
    /// Masked out of error messages returned to clients.
    pub secret: Option<String>,
}

impl AppState {
    pub fn from_config(config: &Config) -> Self {
        let http = GeminiHttpClient::new(
            config.gemini_api_key.clone(),
            config.gemini_model.clone(),
            config.gemini_timeout,
        );
        info!("Insight provider: Gemini (model: {})", http.model());

        Self {
            insight: Arc::new(GeminiInsightClient::new(http)),
            secret: config.gemini_api_key.clone(),
        }
    }
}

/// The two insight routes plus a health probe, without transport layers.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/analyze-pricing", post(handlers::analyze_pricing))
        .route("/api/generate-brand", post(handlers::generate_brand))
        .route("/health", get(handlers::health))
        .with_state(state)
}

pub fn parse_allowed_origins(origins: &[String]) -> Vec<HeaderValue> {
    origins
        .iter()
        .filter_map(|origin| match origin.trim().parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!("Invalid CORS origin '{}': {}", origin, e);
                None
            }
        })
        .collect()
}

/// [`router`] wrapped in tracing, CORS and the body size limit.
pub fn app(state: AppState, config: &Config) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(parse_allowed_origins(
            &config.allowed_origins,
        )))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Base64 photos are well past axum's 2 MB default. Over the limit, the
        // body extractor rejects and the handler answers 413 with an error body.
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
}

pub async fn serve(config: Config) -> Result<()> {
    let state = AppState::from_config(&config);
    let app = app(state, &config);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Starting server on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
