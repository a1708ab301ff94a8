use std::path::Path;

use crate::error::{AppError, Result};

/// Extensions the backend will accept for the `image` part of a new post.
pub const ALLOWED_IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "webp"];

/// An image to attach to a new situation. The whole file is held in memory;
/// practical size is bounded by the configured cap, checked before upload.
#[derive(Debug, Clone)]
pub struct ImageAttachment {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl ImageAttachment {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                AppError::BadRequest(format!("Not a readable file name: {}", path.display()))
            })?
            .to_string();
        let bytes = std::fs::read(path)?;
        Ok(Self { filename, bytes })
    }

    /// Content type for the multipart part, guessed from the file name.
    pub fn content_type(&self) -> String {
        mime_guess::from_path(&self.filename)
            .first_or_octet_stream()
            .essence_str()
            .to_string()
    }

    fn extension(&self) -> Option<String> {
        Path::new(&self.filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
    }

    /// Rejects attachments the backend would refuse anyway: wrong extension,
    /// over the size cap, or bytes that are not a recognizable image.
    pub fn ensure_supported(&self, max_bytes: usize) -> Result<()> {
        if self.bytes.len() > max_bytes {
            return Err(AppError::ContentTooLarge);
        }
        let extension = self.extension().ok_or(AppError::UnsupportedMediaType)?;
        if !ALLOWED_IMAGE_EXTENSIONS.contains(&extension.as_str()) {
            return Err(AppError::UnsupportedMediaType);
        }
        image::guess_format(&self.bytes).map_err(|_| AppError::UnsupportedMediaType)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn accepts_a_png_attachment() {
        let attachment = ImageAttachment::new("cooked.png", PNG_MAGIC.to_vec());
        assert!(attachment.ensure_supported(16_777_216).is_ok());
        assert_eq!(attachment.content_type(), "image/png");
    }

    #[test]
    fn rejects_disallowed_extension() {
        let attachment = ImageAttachment::new("notes.txt", PNG_MAGIC.to_vec());
        assert!(matches!(
            attachment.ensure_supported(16_777_216),
            Err(AppError::UnsupportedMediaType)
        ));
    }

    #[test]
    fn rejects_bytes_that_are_not_an_image() {
        let attachment = ImageAttachment::new("fake.png", b"plain text".to_vec());
        assert!(matches!(
            attachment.ensure_supported(16_777_216),
            Err(AppError::UnsupportedMediaType)
        ));
    }

    #[test]
    fn rejects_oversize_attachment() {
        let attachment = ImageAttachment::new("big.png", vec![0u8; 32]);
        assert!(matches!(
            attachment.ensure_supported(16),
            Err(AppError::ContentTooLarge)
        ));
    }

    #[test]
    fn loads_from_disk() {
        let file = tempfile::Builder::new()
            .suffix(".png")
            .tempfile()
            .unwrap();
        std::fs::write(file.path(), PNG_MAGIC).unwrap();

        let attachment = ImageAttachment::from_path(file.path()).unwrap();
        assert!(attachment.filename.ends_with(".png"));
        assert_eq!(attachment.bytes, PNG_MAGIC);
    }
}
