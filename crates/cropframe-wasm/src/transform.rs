//! WASM bindings for Hermite resampling.
//!
//! The cropper resizes its own output; this binding lets a host resize any
//! RGBA buffer with the same filter, for example to build a thumbnail from
//! a canvas.

use cropframe_core::transform::resample_pixels;
use wasm_bindgen::prelude::*;

/// Resize RGBA pixel data with a Hermite filter.
///
/// Alpha is taken into account so transparent pixels do not darken their
/// neighbours.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const small = resize_pixels(pixels, 800, 600, 200, 150);
/// ctx.putImageData(new ImageData(new Uint8ClampedArray(small), 200, 150), 0, 0);
/// ```
///
/// # Errors
///
/// Returns an error if the pixel data length doesn't match
/// `src_width * src_height * 4` or a target dimension is zero.
#[wasm_bindgen]
pub fn resize_pixels(
    pixels: &[u8],
    src_width: u32,
    src_height: u32,
    width: u32,
    height: u32,
) -> Result<Vec<u8>, JsValue> {
    resize_checked(pixels, src_width, src_height, width, height).map_err(|e| JsValue::from_str(&e))
}

fn resize_checked(
    pixels: &[u8],
    src_width: u32,
    src_height: u32,
    width: u32,
    height: u32,
) -> Result<Vec<u8>, String> {
    if width == 0 || height == 0 {
        return Err(format!("Invalid target dimensions: {}x{}", width, height));
    }
    resample_pixels(pixels, src_width, src_height, width, height).ok_or_else(|| {
        format!(
            "Invalid pixel data: expected {} bytes, got {}",
            src_width as usize * src_height as usize * 4,
            pixels.len()
        )
    })
}
