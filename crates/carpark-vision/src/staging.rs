//! Uploaded image staging
//!
//! Uploaded bytes are validated and written to a temporary file that lives
//! exactly as long as the `StagedImage`. Dropping it removes the file, on
//! success and failure paths alike.

use carpark_types::{Error, Result};
use image::{ImageFormat, ImageReader};
use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// A validated image held in a scoped temporary file
#[derive(Debug)]
pub struct StagedImage {
    file: NamedTempFile,
    bytes: Vec<u8>,
    format: ImageFormat,
    dimensions: (u32, u32),
}

impl StagedImage {
    /// Validate `bytes` as an image and write them under `dir`
    pub fn stage(dir: &Path, bytes: Vec<u8>) -> Result<Self> {
        if bytes.is_empty() {
            return Err(Error::InvalidImageFormat("Uploaded file is empty".to_string()));
        }

        let format = image::guess_format(&bytes)
            .map_err(|_| Error::InvalidImageFormat("Unrecognized image data".to_string()))?;

        let dimensions = ImageReader::with_format(Cursor::new(&bytes), format)
            .into_dimensions()
            .map_err(|e| Error::InvalidImageFormat(format!("Unreadable {format:?} image: {e}")))?;

        fs::create_dir_all(dir)?;
        let extension = format.extensions_str().first().copied().unwrap_or("img");
        let mut file = tempfile::Builder::new()
            .prefix("upload-")
            .suffix(&format!(".{extension}"))
            .tempfile_in(dir)?;
        file.write_all(&bytes)?;
        file.flush()?;

        tracing::debug!(
            path = %file.path().display(),
            format = ?format,
            width = dimensions.0,
            height = dimensions.1,
            "Staged upload"
        );

        Ok(Self {
            file,
            bytes,
            format,
            dimensions,
        })
    }

    /// Read an image from disk and stage a copy of it
    pub fn from_file(dir: &Path, image_path: &Path) -> Result<Self> {
        if !image_path.is_file() {
            return Err(Error::NotFound(format!("image file {}", image_path.display())));
        }
        let bytes = fs::read(image_path)?;
        Self::stage(dir, bytes)
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.to_mime_type()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.dimensions
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{DynamicImage, RgbImage};
    use tempfile::tempdir;

    pub(crate) fn png_bytes() -> Vec<u8> {
        let image = DynamicImage::ImageRgb8(RgbImage::new(8, 4));
        let mut cursor = Cursor::new(Vec::new());
        image.write_to(&mut cursor, ImageFormat::Png).unwrap();
        cursor.into_inner()
    }

    #[test]
    fn test_stage_png() {
        let dir = tempdir().unwrap();
        let staged = StagedImage::stage(dir.path(), png_bytes()).unwrap();

        assert_eq!(staged.format(), ImageFormat::Png);
        assert_eq!(staged.mime_type(), "image/png");
        assert_eq!(staged.dimensions(), (8, 4));
        assert!(staged.path().exists());
        assert_eq!(staged.path().extension().unwrap(), "png");
    }

    #[test]
    fn test_file_removed_on_drop() {
        let dir = tempdir().unwrap();
        let staged = StagedImage::stage(dir.path(), png_bytes()).unwrap();
        let path = staged.path().to_path_buf();

        drop(staged);
        assert!(!path.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_rejects_empty() {
        let dir = tempdir().unwrap();
        let err = StagedImage::stage(dir.path(), Vec::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidImageFormat(_)));
    }

    #[test]
    fn test_rejects_non_image() {
        let dir = tempdir().unwrap();
        let err = StagedImage::stage(dir.path(), b"plain text".to_vec()).unwrap_err();
        assert!(matches!(err, Error::InvalidImageFormat(_)));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_from_missing_file() {
        let dir = tempdir().unwrap();
        let err = StagedImage::from_file(dir.path(), &dir.path().join("nope.jpg")).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
