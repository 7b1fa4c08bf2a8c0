//! Display-space size limits derived from the natural-space settings.

use serde::{Deserialize, Serialize};

use super::CropperSettings;
use crate::geometry::Dimensions;

/// Smallest rectangle extent, in display pixels, the cropper ever allows.
pub const MIN_CROPPER_SIZE: f64 = 20.0;

/// Rectangle size bounds in display pixels.
///
/// Recomputed whenever the displayed image, the display size, or the aspect
/// settings change. The engine reads these; it never derives them itself.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaledLimits {
    pub min_width: f64,
    pub min_height: f64,
    pub max_width: f64,
    pub max_height: f64,
}

impl Default for ScaledLimits {
    fn default() -> Self {
        Self {
            min_width: MIN_CROPPER_SIZE,
            min_height: MIN_CROPPER_SIZE,
            max_width: MIN_CROPPER_SIZE,
            max_height: MIN_CROPPER_SIZE,
        }
    }
}

impl ScaledLimits {
    /// Derive the limits for an image of natural size `image` shown at `display`.
    ///
    /// Without an image (or before the display has a size) the minimum is the
    /// 20px floor and the maximum is the display extent.
    pub fn derive(
        settings: &CropperSettings,
        display: Dimensions,
        image: Option<Dimensions>,
    ) -> Self {
        let display_w = display.width_f64();
        let display_h = display.height_f64();

        let image = match image {
            Some(image) if !image.is_empty() && !display.is_empty() => image,
            _ => {
                return Self {
                    min_width: MIN_CROPPER_SIZE,
                    min_height: MIN_CROPPER_SIZE,
                    max_width: display_w,
                    max_height: display_h,
                }
            }
        };

        let min_width = if settings.cropper_min_width > 0.0 {
            MIN_CROPPER_SIZE.max(settings.cropper_min_width / image.width_f64() * display_w)
        } else {
            MIN_CROPPER_SIZE
        };

        let min_height = if settings.maintain_aspect_ratio {
            MIN_CROPPER_SIZE.max(min_width / settings.aspect_ratio)
        } else if settings.cropper_min_height > 0.0 {
            MIN_CROPPER_SIZE.max(settings.cropper_min_height / image.height_f64() * display_h)
        } else {
            MIN_CROPPER_SIZE
        };

        let ratio = image.width_f64() / display_w;
        let mut max_width = if settings.cropper_max_width > MIN_CROPPER_SIZE {
            settings.cropper_max_width / ratio
        } else {
            display_w
        };
        let mut max_height = if settings.cropper_max_height > MIN_CROPPER_SIZE {
            settings.cropper_max_height / ratio
        } else {
            display_h
        };

        if settings.maintain_aspect_ratio {
            let aspect = settings.aspect_ratio;
            if max_width > max_height * aspect {
                max_width = max_height * aspect;
            } else if max_width < max_height * aspect {
                max_height = max_width / aspect;
            }
        }

        Self {
            min_width,
            min_height,
            max_width,
            max_height,
        }
    }
}
