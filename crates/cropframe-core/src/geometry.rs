//! Plain geometry values shared by the cropper engine and the renderer.
//!
//! # Coordinate System
//!
//! - Origin is the top-left corner, y grows downwards
//! - `CropperPosition` lives in display space (the on-screen scaled image)
//! - `ImagePosition` lives in natural space (the decoded raster)

use serde::{Deserialize, Serialize};

/// Pixel extents of a raster or of the on-screen image element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Swap width and height, as a quarter turn does.
    pub fn transposed(self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }

    /// True when either extent is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub(crate) fn width_f64(&self) -> f64 {
        self.width as f64
    }

    pub(crate) fn height_f64(&self) -> f64 {
        self.height as f64
    }
}

/// A pointer position in display pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The crop rectangle in display pixel coordinates.
///
/// After any settling operation `x1 <= x2` and `y1 <= y2`, and the rectangle
/// lies within the display frame. During a drag it may transiently leave it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CropperPosition {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl CropperPosition {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    /// Centroid of the rectangle.
    pub fn center(&self) -> Point {
        Point {
            x: self.x1 + self.width() / 2.0,
            y: self.y1 + self.height() / 2.0,
        }
    }

    /// Width over height. Infinite or NaN for degenerate rectangles.
    pub fn aspect_ratio(&self) -> f64 {
        self.width() / self.height()
    }

    /// Same rectangle shifted by `(dx, dy)`.
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            x1: self.x1 + dx,
            y1: self.y1 + dy,
            x2: self.x2 + dx,
            y2: self.y2 + dy,
        }
    }
}

/// A rectangle in natural image pixels, as reported with a crop result.
///
/// Values may be fractional when a padding offset is subtracted, so they are
/// kept as `f64` even though the plain mapping always rounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ImagePosition {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl ImagePosition {
    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }
}
