//! Receipt attachments.
//!
//! The backend stores `receipt_url` as an opaque string, so a receipt picked
//! from disk is sent inline as a `data:` URL.

use crate::error::AppError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::Path;

/// Largest receipt file accepted.
pub const MAX_RECEIPT_BYTES: usize = 5 * 1024 * 1024;

/// Media type for a receipt file, from its extension.
pub fn receipt_mime_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "pdf" => Some("application/pdf"),
        _ => None,
    }
}

/// Encode receipt bytes as a `data:` URL.
pub fn encode_receipt(mime_type: &str, bytes: &[u8]) -> Result<String, AppError> {
    if bytes.is_empty() {
        return Err(AppError::invalid_input_field("Receipt file is empty", "receipt"));
    }
    if bytes.len() > MAX_RECEIPT_BYTES {
        return Err(AppError::invalid_input_field(
            format!(
                "Receipt is too large ({} bytes, limit {})",
                bytes.len(),
                MAX_RECEIPT_BYTES
            ),
            "receipt",
        ));
    }
    Ok(format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes)))
}

/// Read a receipt file (JPG, PNG or PDF) and encode it.
pub async fn load_receipt(path: &Path) -> Result<String, AppError> {
    let mime_type = receipt_mime_type(path).ok_or_else(|| {
        AppError::invalid_input_field("Receipt must be an image or a PDF", "receipt")
    })?;

    let bytes = tokio::fs::read(path).await.map_err(|e| {
        AppError::invalid_input_field(
            format!("Failed to read receipt {}: {}", path.display(), e),
            "receipt",
        )
    })?;

    log::debug!("Attaching receipt {} ({} bytes)", path.display(), bytes.len());
    encode_receipt(mime_type, &bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_mime_type_by_extension() {
        assert_eq!(receipt_mime_type(Path::new("a/b.PNG")), Some("image/png"));
        assert_eq!(receipt_mime_type(Path::new("scan.jpeg")), Some("image/jpeg"));
        assert_eq!(receipt_mime_type(Path::new("r.pdf")), Some("application/pdf"));
        assert_eq!(receipt_mime_type(Path::new("notes.txt")), None);
        assert_eq!(receipt_mime_type(Path::new("no_extension")), None);
    }

    #[test]
    fn test_encode_receipt() {
        let url = encode_receipt("image/png", b"abc").unwrap();
        assert_eq!(url, "data:image/png;base64,YWJj");
        assert!(encode_receipt("image/png", b"").is_err());
    }

    #[tokio::test]
    async fn test_load_receipt_from_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("receipt.pdf");
        std::fs::write(&path, b"%PDF-1.4").unwrap();

        let url = load_receipt(&path).await.unwrap();
        assert!(url.starts_with("data:application/pdf;base64,"));

        let missing = dir.path().join("missing.png");
        assert!(load_receipt(&missing).await.is_err());
    }
}
