//! Output encoding for cropped images.
//!
//! Uses the `image` crate's encoders. The cropped surface is always RGBA;
//! formats without an alpha channel composite it over black, the same
//! result a browser canvas gives for `toDataURL('image/jpeg')`.

use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::codecs::bmp::BmpEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbaImage};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during output encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The encoder itself failed
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}

/// Encoded output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    #[serde(alias = "jpg")]
    Jpeg,
    /// Lossless WebP. Quality is ignored.
    Webp,
    Bmp,
}

impl OutputFormat {
    pub fn mime(self) -> &'static str {
        match self {
            OutputFormat::Png => "image/png",
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Webp => "image/webp",
            OutputFormat::Bmp => "image/bmp",
        }
    }
}

/// Encode an RGBA image.
///
/// # Arguments
///
/// * `image` - The surface to encode
/// * `format` - Target format
/// * `quality` - Encoder quality in `[0, 1]`, only used by JPEG
///
/// # Errors
///
/// Returns `EncodeError::InvalidDimensions` for an empty image and
/// `EncodeError::EncodingFailed` if the encoder rejects the data.
pub fn encode_image(
    image: &RgbaImage,
    format: OutputFormat,
    quality: f32,
) -> Result<Vec<u8>, EncodeError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let mut buffer = Cursor::new(Vec::new());
    let failed = |e: image::ImageError| EncodeError::EncodingFailed(e.to_string());

    match format {
        OutputFormat::Png => PngEncoder::new(&mut buffer)
            .write_image(image.as_raw(), width, height, ExtendedColorType::Rgba8)
            .map_err(failed)?,
        OutputFormat::Jpeg => {
            let rgb = flatten_over_black(image);
            JpegEncoder::new_with_quality(&mut buffer, jpeg_quality(quality))
                .write_image(&rgb, width, height, ExtendedColorType::Rgb8)
                .map_err(failed)?
        }
        OutputFormat::Webp => WebPEncoder::new_lossless(&mut buffer)
            .write_image(image.as_raw(), width, height, ExtendedColorType::Rgba8)
            .map_err(failed)?,
        OutputFormat::Bmp => BmpEncoder::new(&mut buffer)
            .write_image(image.as_raw(), width, height, ExtendedColorType::Rgba8)
            .map_err(failed)?,
    }

    Ok(buffer.into_inner())
}

/// Encode raw RGBA pixel data.
///
/// # Errors
///
/// Returns `EncodeError::InvalidPixelData` if `pixels` is not
/// `width * height * 4` bytes, otherwise as [`encode_image`].
pub fn encode_rgba(
    pixels: &[u8],
    width: u32,
    height: u32,
    format: OutputFormat,
    quality: f32,
) -> Result<Vec<u8>, EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected = (width as usize) * (height as usize) * 4;
    if pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: pixels.len(),
        });
    }

    let image = RgbaImage::from_raw(width, height, pixels.to_vec()).ok_or(
        EncodeError::InvalidPixelData {
            expected,
            actual: pixels.len(),
        },
    )?;
    encode_image(&image, format, quality)
}

/// Build a base64 `data:` URL.
pub fn to_data_url(bytes: &[u8], mime: &str) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Map `[0, 1]` quality onto the JPEG encoder's 1-100 scale.
fn jpeg_quality(quality: f32) -> u8 {
    (quality.clamp(0.0, 1.0) * 100.0).round().clamp(1.0, 100.0) as u8
}

fn flatten_over_black(image: &RgbaImage) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(image.as_raw().len() / 4 * 3);
    for pixel in image.pixels() {
        let [r, g, b, a] = pixel.0;
        let scale = |c: u8| ((c as u16 * a as u16 + 127) / 255) as u8;
        rgb.extend_from_slice(&[scale(r), scale(g), scale(b)]);
    }
    rgb
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn gray(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba([128, 128, 128, 255]))
    }

    #[test]
    fn test_encode_png_roundtrip() {
        let img = RgbaImage::from_fn(3, 2, |x, y| Rgba([x as u8, y as u8, 9, 200]));
        let bytes = encode_image(&img, OutputFormat::Png, 0.92).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");

        let decoded = image::load_from_memory(&bytes).unwrap().into_rgba8();
        assert_eq!(decoded, img);
    }

    #[test]
    fn test_encode_jpeg_markers() {
        let bytes = encode_image(&gray(100, 100), OutputFormat::Jpeg, 0.9).unwrap();

        // SOI and EOI markers
        assert_eq!(&bytes[0..2], &[0xFF, 0xD8]);
        let len = bytes.len();
        assert_eq!(&bytes[len - 2..], &[0xFF, 0xD9]);
    }

    #[test]
    fn test_encode_jpeg_quality_extremes() {
        // Quality 0 is raised to the encoder minimum
        assert!(encode_image(&gray(10, 10), OutputFormat::Jpeg, 0.0).is_ok());
        assert!(encode_image(&gray(10, 10), OutputFormat::Jpeg, 1.0).is_ok());
    }

    #[test]
    fn test_encode_webp_and_bmp() {
        let webp = encode_image(&gray(8, 8), OutputFormat::Webp, 0.5).unwrap();
        assert_eq!(&webp[0..4], b"RIFF");
        assert_eq!(&webp[8..12], b"WEBP");

        let bmp = encode_image(&gray(8, 8), OutputFormat::Bmp, 0.5).unwrap();
        assert_eq!(&bmp[0..2], b"BM");
    }

    #[test]
    fn test_encode_empty_image() {
        let result = encode_image(&RgbaImage::new(0, 10), OutputFormat::Png, 1.0);
        assert!(matches!(result, Err(EncodeError::InvalidDimensions { .. })));
    }

    #[test]
    fn test_encode_rgba_invalid_pixel_data() {
        let pixels = vec![128u8; 99 * 100 * 4]; // One row short
        let result = encode_rgba(&pixels, 100, 100, OutputFormat::Png, 1.0);
        assert!(matches!(result, Err(EncodeError::InvalidPixelData { .. })));
    }

    #[test]
    fn test_flatten_over_black() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([255, 100, 0, 0]));
        assert_eq!(flatten_over_black(&img), vec![0, 0, 0]);

        let img = RgbaImage::from_pixel(1, 1, Rgba([200, 100, 50, 255]));
        assert_eq!(flatten_over_black(&img), vec![200, 100, 50]);
    }

    #[test]
    fn test_jpeg_quality_mapping() {
        assert_eq!(jpeg_quality(0.92), 92);
        assert_eq!(jpeg_quality(0.0), 1);
        assert_eq!(jpeg_quality(3.0), 100);
    }

    #[test]
    fn test_format_serde_names() {
        use serde::de::{value::StrDeserializer, IntoDeserializer};

        let de: StrDeserializer<serde::de::value::Error> = "jpg".into_deserializer();
        assert_eq!(OutputFormat::deserialize(de).unwrap(), OutputFormat::Jpeg);
        let de: StrDeserializer<serde::de::value::Error> = "webp".into_deserializer();
        assert_eq!(OutputFormat::deserialize(de).unwrap(), OutputFormat::Webp);
        assert_eq!(OutputFormat::Webp.mime(), "image/webp");
    }

    #[test]
    fn test_data_url() {
        assert_eq!(to_data_url(&[1, 2, 3], "image/png"), "data:image/png;base64,AQID");
    }
}
