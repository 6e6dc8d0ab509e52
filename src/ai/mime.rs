use base64::Engine as _;
use std::path::Path;

/// Declared type for uploads whose bytes we cannot identify.
pub const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

pub fn detect_image_mime(bytes: &[u8]) -> Option<&'static str> {
    match bytes {
        [0xFF, 0xD8, 0xFF, ..] => Some("image/jpeg"),
        [0x89, 0x50, 0x4E, 0x47, ..] => Some("image/png"),
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => Some("image/webp"),
        [0x47, 0x49, 0x46, 0x38, ..] => Some("image/gif"),
        _ => None,
    }
}

/// Sniff the mime type of a base64 image from its first few bytes.
///
/// Only a short prefix is decoded, so a payload that is corrupt further in
/// still gets a type here and fails upstream instead.
pub fn detect_base64_image_mime(image_base64: &str) -> &'static str {
    let prefix: String = image_base64
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .take_while(|c| c.is_ascii())
        .take(16)
        .collect();
    let usable = prefix.len() - prefix.len() % 4;

    let detected = base64::engine::general_purpose::STANDARD
        .decode(&prefix[..usable])
        .ok()
        .and_then(|bytes| detect_image_mime(&bytes));

    match detected {
        Some(mime) => mime,
        None => {
            tracing::warn!(
                "Unrecognized image format, declaring {}",
                DEFAULT_IMAGE_MIME
            );
            DEFAULT_IMAGE_MIME
        }
    }
}

/// Declared type of a local file, from its extension.
pub fn mime_from_extension(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "jpg" | "jpeg" | "jfif" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "heic" => "image/heic",
        "heif" => "image/heif",
        "avif" => "image/avif",
        "tif" | "tiff" => "image/tiff",
        "svg" => "image/svg+xml",
        "txt" => "text/plain",
        "pdf" => "application/pdf",
        "json" => "application/json",
        "mp4" => "video/mp4",
        _ => return None,
    };
    Some(mime)
}
