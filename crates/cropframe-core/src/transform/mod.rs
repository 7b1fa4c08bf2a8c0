//! Raster transform primitives: affine matrices, drawing and resampling.
//!
//! These are the software equivalents of the 2D canvas operations the cropper
//! relies on. Instead of mutating a context's transform stack, callers build
//! an [`Affine2`] value once and hand it to [`draw_image`].
//!
//! # Coordinate System
//!
//! - Origin is the top-left corner, y grows downward
//! - Positive rotation angles are clockwise on screen
//! - Pixel `(i, j)` covers the unit square starting at `(i, j)`

mod affine;
mod draw;
mod resample;

pub use affine::Affine2;
pub use draw::{draw_image, fill, InterpolationFilter};
pub use resample::{resample_hermite, resample_pixels};
