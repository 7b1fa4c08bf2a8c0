//! Output encoding for cropped images.
//!
//! This module provides functionality for:
//! - Encoding an RGBA surface to PNG, JPEG, WebP or BMP
//! - Wrapping encoded bytes in a `data:` URL
//!
//! # Examples
//!
//! ```ignore
//! use cropframe_core::encode::{encode_image, to_data_url, OutputFormat};
//!
//! let surface = image::RgbaImage::new(100, 100);
//! let bytes = encode_image(&surface, OutputFormat::Jpeg, 0.92).unwrap();
//! let url = to_data_url(&bytes, OutputFormat::Jpeg.mime());
//! ```

mod output;

pub use output::{encode_image, encode_rgba, to_data_url, EncodeError, OutputFormat};
