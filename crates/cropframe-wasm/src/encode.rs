//! Image encoding WASM bindings.
//!
//! This module exposes the cropframe-core encoders to JavaScript for hosts
//! that post-process a crop on their own canvas and want the same output
//! formats the cropper produces.
//!
//! # Functions
//!
//! - [`encode_pixels`] - Encode RGBA pixel data as PNG, JPEG, WebP or BMP
//!
//! # Example
//!
//! ```typescript
//! import { encode_pixels } from '@cropframe/wasm';
//!
//! const data = ctx.getImageData(0, 0, w, h).data;
//! const jpegBytes = encode_pixels(new Uint8Array(data.buffer), w, h, 'jpeg', 92);
//! ```

use cropframe_core::encode::{self, OutputFormat};
use wasm_bindgen::prelude::*;

use crate::types::parse_name;

/// Encode RGBA pixel data.
///
/// # Arguments
///
/// * `pixels` - RGBA pixel data (4 bytes per pixel, row-major order)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `format` - `"png"`, `"jpeg"` (or `"jpg"`), `"webp"` or `"bmp"`
/// * `quality` - JPEG quality, 0 to 100. Ignored by the other formats.
///
/// # Errors
///
/// Returns an error if:
/// - The format name is unknown
/// - The pixel data length doesn't match width * height * 4
/// - Width or height is zero
#[wasm_bindgen]
pub fn encode_pixels(
    pixels: &[u8],
    width: u32,
    height: u32,
    format: &str,
    quality: u8,
) -> Result<Vec<u8>, JsValue> {
    let format: OutputFormat = parse_name(format).map_err(|e| JsValue::from_str(&e))?;
    encode::encode_rgba(pixels, width, height, format, quality_fraction(quality))
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Map a 0-100 quality to the encoder's `[0, 1]` range.
fn quality_fraction(quality: u8) -> f32 {
    f32::from(quality.min(100)) / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_fraction() {
        assert_eq!(quality_fraction(0), 0.0);
        assert_eq!(quality_fraction(50), 0.5);
        assert_eq!(quality_fraction(100), 1.0);
        assert_eq!(quality_fraction(255), 1.0);
    }

    #[test]
    fn test_core_encode_jpeg() {
        // The core encoder is callable natively; the wasm wrapper needs JsValue.
        let pixels = vec![128u8; 10 * 10 * 4];
        let jpeg = encode::encode_rgba(&pixels, 10, 10, OutputFormat::Jpeg, 0.9).unwrap();
        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
    }
}

/// WASM-specific tests that require JsValue.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_encode_png() {
        let pixels = vec![200u8; 8 * 8 * 4];
        let png = encode_pixels(&pixels, 8, 8, "png", 92).unwrap();
        assert_eq!(&png[0..4], &[0x89, b'P', b'N', b'G']);
    }

    #[wasm_bindgen_test]
    fn test_encode_jpg_alias() {
        let pixels = vec![200u8; 8 * 8 * 4];
        let jpeg = encode_pixels(&pixels, 8, 8, "jpg", 80).unwrap();
        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
    }

    #[wasm_bindgen_test]
    fn test_encode_unknown_format() {
        let pixels = vec![200u8; 8 * 8 * 4];
        assert!(encode_pixels(&pixels, 8, 8, "gif", 80).is_err());
    }

    #[wasm_bindgen_test]
    fn test_encode_invalid_pixel_data() {
        let pixels = vec![200u8; 10];
        assert!(encode_pixels(&pixels, 8, 8, "png", 80).is_err());
    }
}
