//! Turns a local photo into the inline base64 payload the server expects.

use crate::ai::mime;
use crate::Result;
use base64::Engine as _;
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub struct EncodedImage {
    pub base64: String,
    pub mime_type: &'static str,
}

impl EncodedImage {
    /// `data:<mime>;base64,<payload>`, the displayable preview form.
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64)
    }
}

pub fn encode_bytes(bytes: &[u8], mime_type: &'static str) -> EncodedImage {
    EncodedImage {
        base64: base64::engine::general_purpose::STANDARD.encode(bytes),
        mime_type,
    }
}

/// Everything after the first comma of a data URI.
pub fn split_data_uri(uri: &str) -> &str {
    uri.split_once(',').map(|(_, payload)| payload).unwrap_or("")
}

/// Holds the current selection and reports changes through a callback.
///
/// The callback receives the raw base64 payload on selection and `""` when
/// the selection is cleared. Files that are not declared as images are
/// ignored without calling it.
pub struct ImageEncoder<F>
where
    F: FnMut(&str),
{
    on_select: F,
    preview: Option<String>,
}

impl<F> ImageEncoder<F>
where
    F: FnMut(&str),
{
    pub fn new(on_select: F) -> Self {
        Self {
            on_select,
            preview: None,
        }
    }

    /// Encode `path` if its declared type is an image. Returns whether the
    /// file was accepted.
    pub async fn select_file(&mut self, path: &Path) -> Result<bool> {
        let declared = match mime::mime_from_extension(path) {
            Some(mime_type) if mime_type.starts_with("image/") => mime_type,
            other => {
                tracing::debug!(
                    "Ignoring {} (declared type {:?})",
                    path.display(),
                    other
                );
                return Ok(false);
            }
        };

        let bytes = tokio::fs::read(path).await?;
        let data_uri = encode_bytes(&bytes, declared).data_uri();
        tracing::debug!("Encoded {} ({} bytes)", path.display(), bytes.len());

        (self.on_select)(split_data_uri(&data_uri));
        self.preview = Some(data_uri);
        Ok(true)
    }

    pub fn clear(&mut self) {
        self.preview = None;
        (self.on_select)("");
    }

    pub fn preview(&self) -> Option<&str> {
        self.preview.as_deref()
    }
}
