//! Image inspection WASM bindings.
//!
//! Stateless helpers for hosts that want to check a file before handing it
//! to an [`ImageCropper`](crate::ImageCropper).
//!
//! # Functions
//!
//! - [`is_supported_image_type`] - Check a MIME type against the accepted image types
//! - [`detect_image_type`] - Guess the MIME type from the leading bytes
//! - [`exif_orientation`] - Read the raw EXIF orientation code (1-8)
//! - [`exif_transform`] - Read the EXIF orientation as `{ rotate, flip }`
//!
//! # Example
//!
//! ```typescript
//! import { is_supported_image_type, exif_transform } from '@cropframe/wasm';
//!
//! if (!is_supported_image_type(file.type)) throw new Error('not an image');
//! const { rotate, flip } = exif_transform(new Uint8Array(await file.arrayBuffer()));
//! ```

use cropframe_core::decode;
use wasm_bindgen::prelude::*;

use crate::types::to_js;

/// True for the PNG, JPEG, BMP, GIF, TIFF, WebP and icon MIME types.
/// Parameters such as `;charset=` are ignored.
#[wasm_bindgen]
pub fn is_supported_image_type(mime: &str) -> bool {
    decode::is_valid_image_type(mime)
}

/// Guess the MIME type from the file signature.
///
/// Returns `undefined` for unknown or unsupported formats.
#[wasm_bindgen]
pub fn detect_image_type(bytes: &[u8]) -> Option<String> {
    decode::sniff_mime(bytes).map(str::to_string)
}

/// The EXIF orientation code of a JPEG, or `undefined` when the file has
/// none or is not a JPEG.
#[wasm_bindgen]
pub fn exif_orientation(bytes: &[u8]) -> Option<u32> {
    decode::read_orientation_code(bytes)
}

/// The EXIF orientation as clockwise quarter turns plus a horizontal flip.
///
/// Files without orientation give `{ rotate: 0, flip: false }`.
#[wasm_bindgen]
pub fn exif_transform(bytes: &[u8]) -> Result<JsValue, JsValue> {
    to_js(&decode::read_exif_transform(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_types() {
        assert!(is_supported_image_type("image/jpeg"));
        assert!(is_supported_image_type("image/webp"));
        assert!(!is_supported_image_type("image/svg+xml"));
        assert!(!is_supported_image_type("text/plain"));
    }

    #[test]
    fn test_detect_image_type() {
        assert_eq!(
            detect_image_type(&[0xFF, 0xD8, 0xFF, 0xE0]),
            Some("image/jpeg".to_string())
        );
        assert_eq!(detect_image_type(b"not an image"), None);
    }

    #[test]
    fn test_exif_orientation_missing() {
        assert_eq!(exif_orientation(&[0xFF, 0xD8, 0xFF, 0xD9]), None);
        assert_eq!(exif_orientation(&[]), None);
    }
}
