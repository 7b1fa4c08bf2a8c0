//! WASM-compatible wrapper types for crop results and fetched images.
//!
//! This module provides JavaScript-friendly types that wrap the core Cropframe
//! types, handling the conversion between Rust and JavaScript data
//! representations.

use cropframe_core::geometry::{CropperPosition, Dimensions};
use cropframe_core::render::CropOutput;
use serde::de::value::StrDeserializer;
use serde::de::{DeserializeOwned, IntoDeserializer};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// A finished crop for JavaScript.
///
/// The encoded bytes stay in WASM memory until `bytes()` or `data_url()` is
/// called; both make a copy.
#[wasm_bindgen]
pub struct JsCropOutput {
    inner: CropOutput,
}

#[wasm_bindgen]
impl JsCropOutput {
    /// Output width in pixels, after any resize.
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Output height in pixels, after any resize.
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// MIME type of the encoded bytes.
    #[wasm_bindgen(getter)]
    pub fn mime(&self) -> String {
        self.inner.format.mime().to_string()
    }

    /// Number of encoded bytes.
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.bytes.len()
    }

    /// Encoded image as a Uint8Array.
    pub fn bytes(&self) -> Vec<u8> {
        self.inner.bytes.clone()
    }

    /// Encoded image as a `data:` URL, ready for an `<img src>`.
    pub fn data_url(&self) -> String {
        self.inner.to_data_url()
    }

    /// `{ x1, y1, x2, y2 }` in display pixels.
    pub fn cropper_position(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.cropper_position)
    }

    /// `{ x1, y1, x2, y2 }` in image pixels.
    pub fn image_position(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.image_position)
    }

    /// The image position relative to the unpadded image, or `undefined`
    /// outside contain mode.
    pub fn offset_image_position(&self) -> Result<JsValue, JsValue> {
        match &self.inner.offset_image_position {
            Some(position) => to_js(position),
            None => Ok(JsValue::UNDEFINED),
        }
    }
}

impl JsCropOutput {
    pub(crate) fn from_output(inner: CropOutput) -> Self {
        Self { inner }
    }
}

/// Encoded image bytes fetched from a URL.
#[wasm_bindgen]
pub struct JsFetchedImage {
    bytes: Vec<u8>,
    mime: String,
}

#[wasm_bindgen]
impl JsFetchedImage {
    #[wasm_bindgen(getter)]
    pub fn mime(&self) -> String {
        self.mime.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.bytes.len()
    }

    /// The fetched bytes as a Uint8Array. Makes a copy.
    pub fn bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }
}

impl JsFetchedImage {
    pub(crate) fn new(bytes: Vec<u8>, mime: String) -> Self {
        Self { bytes, mime }
    }

    pub(crate) fn into_parts(self) -> (Vec<u8>, String) {
        (self.bytes, self.mime)
    }
}

/// Plain `{ width, height }` for JavaScript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub(crate) struct JsSize {
    pub width: u32,
    pub height: u32,
}

impl From<Dimensions> for JsSize {
    fn from(dims: Dimensions) -> Self {
        Self {
            width: dims.width,
            height: dims.height,
        }
    }
}

/// Rectangle from loose JavaScript numbers, rejecting NaN and infinities.
pub(crate) fn position_from_parts(x1: f64, y1: f64, x2: f64, y2: f64) -> Option<CropperPosition> {
    [x1, y1, x2, y2]
        .iter()
        .all(|v| v.is_finite())
        .then(|| CropperPosition::new(x1, y1, x2, y2))
}

/// Parse a lowercase enum name such as `"resize"` or `"topleft"`.
pub(crate) fn parse_name<T: DeserializeOwned>(name: &str) -> Result<T, String> {
    let de: StrDeserializer<'_, serde::de::value::Error> = name.into_deserializer();
    T::deserialize(de).map_err(|e| e.to_string())
}

pub(crate) fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cropframe_core::cropper::{Handle, MoveKind};
    use cropframe_core::encode::OutputFormat;
    use cropframe_core::geometry::ImagePosition;

    fn output() -> CropOutput {
        CropOutput {
            bytes: vec![1, 2, 3],
            format: OutputFormat::Png,
            width: 40,
            height: 20,
            cropper_position: CropperPosition::new(0.0, 0.0, 20.0, 10.0),
            image_position: ImagePosition {
                x1: 0.0,
                y1: 0.0,
                x2: 40.0,
                y2: 20.0,
            },
            offset_image_position: None,
        }
    }

    #[test]
    fn test_crop_output_getters() {
        let js = JsCropOutput::from_output(output());
        assert_eq!(js.width(), 40);
        assert_eq!(js.height(), 20);
        assert_eq!(js.mime(), "image/png");
        assert_eq!(js.byte_length(), 3);
        assert_eq!(js.bytes(), vec![1, 2, 3]);
        assert_eq!(js.data_url(), "data:image/png;base64,AQID");
    }

    #[test]
    fn test_fetched_image_parts() {
        let fetched = JsFetchedImage::new(vec![9; 10], "image/jpeg".to_string());
        assert_eq!(fetched.byte_length(), 10);
        assert_eq!(fetched.mime(), "image/jpeg");
        let (bytes, mime) = fetched.into_parts();
        assert_eq!(bytes.len(), 10);
        assert_eq!(mime, "image/jpeg");
    }

    #[test]
    fn test_size_from_dimensions() {
        assert_eq!(
            JsSize::from(Dimensions::new(3, 4)),
            JsSize {
                width: 3,
                height: 4
            }
        );
    }

    #[test]
    fn test_position_from_parts() {
        assert_eq!(
            position_from_parts(1.0, 2.0, 3.0, 4.0),
            Some(CropperPosition::new(1.0, 2.0, 3.0, 4.0))
        );
        assert_eq!(position_from_parts(f64::NAN, 2.0, 3.0, 4.0), None);
        assert_eq!(position_from_parts(0.0, 0.0, f64::INFINITY, 4.0), None);
    }

    #[test]
    fn test_parse_name() {
        assert_eq!(parse_name::<MoveKind>("resize"), Ok(MoveKind::Resize));
        assert_eq!(parse_name::<Handle>("topleft"), Ok(Handle::TopLeft));
        assert_eq!(parse_name::<OutputFormat>("jpg"), Ok(OutputFormat::Jpeg));
        assert!(parse_name::<Handle>("sideways").is_err());
    }
}
