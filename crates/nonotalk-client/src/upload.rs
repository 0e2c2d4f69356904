//! Image payloads for the upload endpoint.

use std::path::Path;

use crate::error::GatewayError;

/// An image picked by the user, ready to be sent as the `image` form field.
///
/// No type or size validation happens here; the backend decides what it accepts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime_type = mime_for(&file_name).to_string();
        Self {
            file_name,
            mime_type,
            bytes,
        }
    }

    /// Read an image from disk.
    pub async fn from_path(path: &Path) -> Result<Self, GatewayError> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "image".to_string());
        Ok(Self::new(file_name, bytes))
    }
}

fn mime_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "heic" => "image/heic",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_from_extension() {
        assert_eq!(ImageUpload::new("a.PNG", vec![]).mime_type, "image/png");
        assert_eq!(ImageUpload::new("b.jpeg", vec![]).mime_type, "image/jpeg");
        assert_eq!(ImageUpload::new("c.jpg", vec![]).mime_type, "image/jpeg");
        assert_eq!(
            ImageUpload::new("noext", vec![]).mime_type,
            "application/octet-stream"
        );
    }

    #[tokio::test]
    async fn test_from_path_reads_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sunset.webp");
        std::fs::write(&path, [1u8, 2, 3]).unwrap();

        let upload = ImageUpload::from_path(&path).await.unwrap();
        assert_eq!(upload.file_name, "sunset.webp");
        assert_eq!(upload.mime_type, "image/webp");
        assert_eq!(upload.bytes, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_from_path_missing_file() {
        let err = ImageUpload::from_path(Path::new("/nonexistent/photo.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Io(_)));
    }
}
