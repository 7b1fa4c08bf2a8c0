//! Image loading for the cropper.
//!
//! This module provides functionality for:
//! - Validating source MIME types and unpacking `data:` URLs
//! - Decoding encoded bytes into an RGBA raster
//! - Reading the EXIF orientation of JPEG sources
//!
//! Orientation is never applied here. The decoder hands back the raster as
//! stored in the file together with an [`ExifTransform`], and the normalizer
//! bakes it in along with the user's canvas rotation.
//!
//! # Examples
//!
//! ```ignore
//! use cropframe_core::decode::{decode_source, read_exif_transform, ImageSource};
//!
//! let bytes = std::fs::read("photo.jpg").unwrap();
//! let exif = read_exif_transform(&bytes);
//! let source = decode_source(ImageSource::Bytes { bytes, mime: "image/jpeg".into() }).unwrap();
//! println!("{}x{}, rotate {} quarter turns", source.raster.width(), source.raster.height(), exif.rotate);
//! ```

mod exif;
mod source;
mod types;

pub use self::exif::{read_exif_transform, read_orientation, read_orientation_code};
pub use source::{
    decode_raster, decode_source, is_valid_image_type, parse_data_url, sniff_mime, ImageSource,
    SourceImage,
};
pub use types::{ExifTransform, LoadError, LoadOptions, Orientation};

#[cfg(test)]
pub(crate) use self::exif::fixtures as exif_fixtures;
#[cfg(test)]
pub(crate) use source::fixtures as source_fixtures;
