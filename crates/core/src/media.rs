//! Validation and naming rules for uploaded garment photos.

use std::borrow::Borrow;
use std::path::Path;

use thiserror::Error;
use uuid::Uuid;

use crate::domain::user::UserId;

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MediaError {
    #[error("File too large. Max size: {:.1}MB", megabytes(.max))]
    TooLarge { size: usize, max: usize },
    #[error("Invalid file type. Allowed: JPG, PNG, WebP")]
    UnsupportedExtension(String),
    #[error("Invalid image file")]
    InvalidImage,
    #[error("File content is {} but the name ends in {extension}", .detected.as_str())]
    FormatMismatch { extension: String, detected: ImageFormat },
    #[error("missing file name")]
    MissingFileName,
}

fn megabytes<T: Borrow<usize>>(bytes: T) -> f64 {
    *bytes.borrow() as f64 / (1024.0 * 1024.0)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    WebP,
}

impl ImageFormat {
    /// Format promised by a lowercased extension such as `.jpeg`.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            ".jpg" | ".jpeg" => Some(Self::Jpeg),
            ".png" => Some(Self::Png),
            ".webp" => Some(Self::WebP),
            _ => None,
        }
    }

    /// Format detected from the content signature.
    pub fn detect(bytes: &[u8]) -> Option<Self> {
        match image::guess_format(bytes).ok()? {
            image::ImageFormat::Jpeg => Some(Self::Jpeg),
            image::ImageFormat::Png => Some(Self::Png),
            image::ImageFormat::WebP => Some(Self::WebP),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Jpeg => "JPEG",
            Self::Png => "PNG",
            Self::WebP => "WebP",
        }
    }

    fn codec(self) -> image::ImageFormat {
        match self {
            Self::Jpeg => image::ImageFormat::Jpeg,
            Self::Png => image::ImageFormat::Png,
            Self::WebP => image::ImageFormat::WebP,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedImage {
    /// Lowercased extension including the leading dot.
    pub extension: String,
    pub format: ImageFormat,
}

pub fn validate_image(
    file_name: &str,
    bytes: &[u8],
    max_bytes: usize,
) -> Result<ValidatedImage, MediaError> {
    if file_name.trim().is_empty() {
        return Err(MediaError::MissingFileName);
    }

    if bytes.len() > max_bytes {
        return Err(MediaError::TooLarge { size: bytes.len(), max: max_bytes });
    }

    let extension = Path::new(file_name)
        .extension()
        .and_then(|extension| extension.to_str())
        .map(|extension| format!(".{}", extension.to_ascii_lowercase()))
        .unwrap_or_default();
    let Some(expected) = ImageFormat::from_extension(&extension) else {
        return Err(MediaError::UnsupportedExtension(extension));
    };

    let format = ImageFormat::detect(bytes).ok_or(MediaError::InvalidImage)?;
    if format != expected {
        return Err(MediaError::FormatMismatch { extension, detected: format });
    }

    // A valid signature in front of a truncated or corrupt body must not pass.
    image::load_from_memory_with_format(bytes, format.codec())
        .map_err(|_| MediaError::InvalidImage)?;

    Ok(ValidatedImage { extension, format })
}

/// Collision-free stored name, e.g. `user_7_3f2a...e1.png`.
pub fn stored_file_name(user_id: UserId, extension: &str) -> String {
    format!("user_{}_{}{}", user_id.0, Uuid::new_v4().simple(), extension)
}

/// Public URL under which a stored file is served.
pub fn public_url(file_path: &str) -> String {
    let name = Path::new(file_path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(file_path);
    format!("/uploads/{name}")
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::{
        public_url, stored_file_name, validate_image, ImageFormat, MediaError,
        DEFAULT_MAX_UPLOAD_BYTES,
    };
    use crate::domain::user::UserId;

    const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn encoded(format: image::ImageFormat) -> Vec<u8> {
        let pixels = image::RgbImage::from_pixel(4, 4, image::Rgb([176, 32, 64]));
        let mut out = Cursor::new(Vec::new());
        pixels.write_to(&mut out, format).expect("encode sample image");
        out.into_inner()
    }

    #[test]
    fn accepts_known_extension_with_matching_content() {
        let png = encoded(image::ImageFormat::Png);
        let image = validate_image("Blue Saree.PNG", &png, DEFAULT_MAX_UPLOAD_BYTES)
            .expect("png should validate");
        assert_eq!(image.extension, ".png");
        assert_eq!(image.format, ImageFormat::Png);

        let jpeg = encoded(image::ImageFormat::Jpeg);
        let image = validate_image("kurti.jpeg", &jpeg, DEFAULT_MAX_UPLOAD_BYTES)
            .expect("jpeg should validate");
        assert_eq!(image.format, ImageFormat::Jpeg);
    }

    #[test]
    fn webp_signature_is_recognised() {
        let mut webp = b"RIFF".to_vec();
        webp.extend_from_slice(&[0x24, 0, 0, 0]);
        webp.extend_from_slice(b"WEBPVP8 ");
        assert_eq!(ImageFormat::detect(&webp), Some(ImageFormat::WebP));
        assert_eq!(ImageFormat::from_extension(".webp"), Some(ImageFormat::WebP));
    }

    #[test]
    fn rejects_unsupported_extension() {
        let png = encoded(image::ImageFormat::Png);
        let error = validate_image("notes.gif", &png, DEFAULT_MAX_UPLOAD_BYTES)
            .expect_err("gif is not allowed");
        assert_eq!(error, MediaError::UnsupportedExtension(".gif".to_string()));
        assert_eq!(error.to_string(), "Invalid file type. Allowed: JPG, PNG, WebP");
    }

    #[test]
    fn rejects_body_that_is_not_an_image() {
        let error = validate_image("photo.jpg", b"plain text", DEFAULT_MAX_UPLOAD_BYTES)
            .expect_err("text is not an image");
        assert_eq!(error, MediaError::InvalidImage);
    }

    #[test]
    fn rejects_signature_followed_by_garbage() {
        let mut fake_png = PNG_SIGNATURE.to_vec();
        fake_png.extend_from_slice(b"this is definitely not an image body");
        let error = validate_image("a.png", &fake_png, DEFAULT_MAX_UPLOAD_BYTES)
            .expect_err("header-only png");
        assert_eq!(error, MediaError::InvalidImage);

        let error = validate_image("a.jpg", &[0xFF, 0xD8, 0xFF, b'x'], DEFAULT_MAX_UPLOAD_BYTES)
            .expect_err("header-only jpeg");
        assert_eq!(error, MediaError::InvalidImage);
    }

    #[test]
    fn rejects_content_that_disagrees_with_extension() {
        let png = encoded(image::ImageFormat::Png);
        let error = validate_image("a.webp", &png, DEFAULT_MAX_UPLOAD_BYTES)
            .expect_err("png bytes named webp");
        assert_eq!(
            error,
            MediaError::FormatMismatch { extension: ".webp".to_string(), detected: ImageFormat::Png }
        );
        assert_eq!(error.to_string(), "File content is PNG but the name ends in .webp");
    }

    #[test]
    fn rejects_oversized_payload_with_readable_limit() {
        let png = encoded(image::ImageFormat::Png);
        let error = validate_image("photo.png", &png, 8).expect_err("over limit");
        assert!(matches!(error, MediaError::TooLarge { max: 8, .. }));

        let message = MediaError::TooLarge { size: 1, max: DEFAULT_MAX_UPLOAD_BYTES }.to_string();
        assert_eq!(message, "File too large. Max size: 10.0MB");
    }

    #[test]
    fn stored_names_are_unique_and_keep_extension() {
        let first = stored_file_name(UserId(3), ".webp");
        let second = stored_file_name(UserId(3), ".webp");
        assert!(first.starts_with("user_3_"));
        assert!(first.ends_with(".webp"));
        assert_ne!(first, second);
    }

    #[test]
    fn public_url_uses_base_name() {
        assert_eq!(public_url("./uploads/user_1_abc.png"), "/uploads/user_1_abc.png");
    }
}
