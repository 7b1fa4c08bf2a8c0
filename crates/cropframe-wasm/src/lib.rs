//! Cropframe WASM - WebAssembly bindings for Cropframe
//!
//! This crate provides WASM bindings to expose the cropframe-core image
//! cropper to JavaScript/TypeScript applications.
//!
//! # Module Structure
//!
//! - `cropper` - The stateful [`ImageCropper`]
//! - `loader` - Fetching remote images and waiting for layout
//! - `types` - WASM-compatible wrapper types for crop results
//! - `decode` - MIME and EXIF inspection helpers
//! - `encode` - Standalone RGBA encoding
//! - `transform` - Standalone Hermite resizing
//!
//! # Usage
//!
//! ```typescript
//! import init, { ImageCropper, wait_for_display_size } from '@cropframe/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const cropper = new ImageCropper({ aspectRatio: 16 / 9, resizeToWidth: 1280 });
//! cropper.load_bytes(new Uint8Array(await file.arrayBuffer()), file.type, false);
//! img.src = cropper.image_data_url();
//! const size = await wait_for_display_size(img);
//! cropper.display_ready(size.width, size.height);
//! const output = cropper.crop();
//! console.log(`Cropped ${output.width}x${output.height}`);
//! ```

use wasm_bindgen::prelude::*;

mod cropper;
mod decode;
mod encode;
mod loader;
mod transform;
mod types;

// Re-export public types
pub use cropper::ImageCropper;
pub use decode::{detect_image_type, exif_orientation, exif_transform, is_supported_image_type};
pub use encode::encode_pixels;
pub use loader::{fetch_image, wait_for_display_size};
pub use transform::resize_pixels;
pub use types::{JsCropOutput, JsFetchedImage};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    // Future: Set up panic hook for better error messages in browser console
    // when console_error_panic_hook feature is added
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
