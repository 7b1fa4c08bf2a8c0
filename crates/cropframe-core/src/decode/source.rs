//! Image sources and raster decoding.

use std::io::Cursor;
use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{ImageReader, RgbaImage};

use super::LoadError;
use crate::geometry::Dimensions;

/// MIME subtypes accepted under `image/`.
const SUPPORTED_SUBTYPES: &[&str] = &[
    "png",
    "jpg",
    "jpeg",
    "bmp",
    "gif",
    "tiff",
    "webp",
    "x-icon",
    "vnd.microsoft.icon",
];

/// Check a MIME string against the accepted image types.
///
/// Parameters after `;` are ignored and the comparison is case-insensitive.
pub fn is_valid_image_type(mime: &str) -> bool {
    let essence = mime.split(';').next().unwrap_or_default().trim();
    let essence = essence.to_ascii_lowercase();
    essence
        .strip_prefix("image/")
        .is_some_and(|subtype| SUPPORTED_SUBTYPES.contains(&subtype))
}

/// Where an image comes from.
///
/// Remote URLs are fetched by the browser layer and arrive here as `Bytes`.
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// Encoded file contents and their MIME type.
    Bytes { bytes: Vec<u8>, mime: String },
    /// An inline `data:<mime>;base64,<payload>` URL.
    DataUrl(String),
}

/// A decoded source image together with the bytes it came from.
#[derive(Debug, Clone)]
pub struct SourceImage {
    /// The encoded bytes, kept for EXIF reading and for redisplay without
    /// re-encoding.
    pub bytes: Arc<[u8]>,
    pub mime: String,
    pub raster: Arc<RgbaImage>,
}

impl SourceImage {
    pub fn size(&self) -> Dimensions {
        Dimensions::new(self.raster.width(), self.raster.height())
    }
}

/// Guess the MIME type of encoded bytes from their signature.
///
/// Used for remote images whose `Content-Type` is missing or generic.
pub fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    image::guess_format(bytes)
        .ok()
        .map(|format| format.to_mime_type())
        .filter(|mime| is_valid_image_type(mime))
}

/// Split a base64 `data:` URL into its MIME type and decoded payload.
///
/// # Errors
///
/// Returns `LoadError::InvalidDataUrl` if the URL is not a base64 data URL or
/// the payload is not valid base64.
pub fn parse_data_url(url: &str) -> Result<(String, Vec<u8>), LoadError> {
    let rest = url
        .trim()
        .strip_prefix("data:")
        .ok_or(LoadError::InvalidDataUrl)?;
    let (header, payload) = rest.split_once(',').ok_or(LoadError::InvalidDataUrl)?;
    let mime = header
        .strip_suffix(";base64")
        .ok_or(LoadError::InvalidDataUrl)?;

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|_| LoadError::InvalidDataUrl)?;

    Ok((mime.to_string(), bytes))
}

/// Decode encoded image bytes into an RGBA raster.
///
/// The format is sniffed from the content, not taken from the MIME type.
/// No EXIF orientation is applied; that is the normalizer's job.
///
/// # Errors
///
/// Returns `LoadError::Decode` if the bytes are not a decodable image and
/// `LoadError::EmptyImage` if it has no pixels.
pub fn decode_raster(bytes: &[u8]) -> Result<RgbaImage, LoadError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| LoadError::Decode(e.to_string()))?;

    let raster = reader
        .decode()
        .map_err(|e| LoadError::Decode(e.to_string()))?
        .into_rgba8();

    if raster.width() == 0 || raster.height() == 0 {
        return Err(LoadError::EmptyImage);
    }
    Ok(raster)
}

/// Validate and decode an image source.
///
/// # Errors
///
/// Returns `LoadError::UnsupportedType` for a MIME type outside the accepted
/// list, otherwise any error from [`parse_data_url`] or [`decode_raster`].
pub fn decode_source(source: ImageSource) -> Result<SourceImage, LoadError> {
    let (mime, bytes) = match source {
        ImageSource::Bytes { bytes, mime } => (mime, bytes),
        ImageSource::DataUrl(url) => parse_data_url(&url)?,
    };

    if !is_valid_image_type(&mime) {
        return Err(LoadError::UnsupportedType(mime));
    }

    let raster = decode_raster(&bytes)?;
    Ok(SourceImage {
        bytes: bytes.into(),
        mime,
        raster: Arc::new(raster),
    })
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::io::Cursor;

    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

    /// PNG bytes of a solid image.
    pub fn png_bytes(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba(color));
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }
}
