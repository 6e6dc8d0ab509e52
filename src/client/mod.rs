//! Command-line client: encode a photo, send it, show the answer.

pub mod dispatcher;
pub mod encoder;
pub mod view;

pub use dispatcher::{DispatchOutcome, Dispatcher, Feature, SkipReason, GENERIC_ERROR_MESSAGE};
pub use encoder::{EncodedImage, ImageEncoder};
pub use view::{format_rupiah, ViewState};
