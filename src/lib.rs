//! Craft-product insight service for Indonesian UMKM sellers
//!
//! A product photo and an optional note are sent to a small HTTP server, which
//! asks a hosted multimodal model for a pricing analysis or a brand identity and
//! relays the model's JSON back. The same crate ships the command-line client
//! that encodes the photo, dispatches the request and renders the result.

pub mod ai;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod prompts;
pub mod server;

pub use error::{Error, Result};
