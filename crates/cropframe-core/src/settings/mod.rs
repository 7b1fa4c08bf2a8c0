//! Cropper configuration.
//!
//! [`CropperSettings`] is the flat configuration record the UI layer hands
//! over (as a JS object through serde). It is treated as an immutable snapshot:
//! every geometry and render call reads it, nothing writes it. The only derived
//! values, the display-space size limits, live in [`ScaledLimits`] and are
//! recomputed explicitly whenever the image or display size changes.
//!
//! Settings must pass [`CropperSettings::validated`] before they reach the
//! geometry code, so that bad input surfaces as a [`SettingsError`] instead of
//! NaN or infinity inside the rectangle math.

mod color;
mod limits;

pub use color::parse_css_color;
pub use limits::{ScaledLimits, MIN_CROPPER_SIZE};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::encode::OutputFormat;

/// Configuration errors, reported when settings are constructed or updated.
#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    /// Aspect ratio must be a positive finite number while it is enforced.
    #[error("`aspectRatio` should > 0 when `maintainAspectRatio` is enabled (got {0})")]
    InvalidAspectRatio(f64),

    /// A minimum size exceeds the matching maximum.
    #[error("cropper minimum {axis} ({min}) exceeds maximum ({max})")]
    MinExceedsMax {
        axis: &'static str,
        min: f64,
        max: f64,
    },

    /// The aspect ratio range is empty or non-positive.
    #[error("invalid aspect ratio range: min {min}, max {max}")]
    InvalidAspectRange { min: f64, max: f64 },

    /// Static cropper sizes must not be negative.
    #[error("invalid static cropper size: {width}x{height}")]
    InvalidStaticSize { width: f64, height: f64 },

    /// Negative or non-finite min/max size.
    #[error("invalid cropper size bound for {0}")]
    InvalidSizeBound(&'static str),

    /// The background colour is not a recognised CSS colour.
    #[error("invalid background color: {0}")]
    InvalidColor(String),
}

/// How the pan offset of [`ImageTransform`] is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TranslateUnit {
    /// Percentage of the transformed image extent.
    #[default]
    #[serde(rename = "%")]
    Percent,
    /// Display pixels.
    #[serde(rename = "px")]
    Px,
}

/// User pan/zoom/rotate applied to the displayed image.
///
/// Independent from the EXIF and canvas-rotation baking done at load time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageTransform {
    pub scale: f64,
    pub flip_h: bool,
    pub flip_v: bool,
    /// Rotation in degrees, clockwise on screen.
    pub rotate: f64,
    pub translate_h: f64,
    pub translate_v: f64,
    pub translate_unit: TranslateUnit,
}

impl Default for ImageTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            flip_h: false,
            flip_v: false,
            rotate: 0.0,
            translate_h: 0.0,
            translate_v: 0.0,
            translate_unit: TranslateUnit::Percent,
        }
    }
}

impl ImageTransform {
    /// Scale factor, treating zero as "unset" like the UI does.
    pub fn effective_scale(&self) -> f64 {
        if self.scale == 0.0 || !self.scale.is_finite() {
            1.0
        } else {
            self.scale
        }
    }
}

/// Horizontal alignment of the image inside its wrapper. Presentation only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignImage {
    Left,
    #[default]
    Center,
}

/// Allowed band of aspect ratios for free-form resizing.
///
/// Only consulted when `maintain_aspect_ratio` is false. A resize that leaves
/// the band is snapped back to the nearest bound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AspectRatioRange {
    pub min: f64,
    pub max: f64,
}

impl AspectRatioRange {
    /// The bound to snap to, or `None` when `ratio` is inside the band.
    pub fn snap(&self, ratio: f64) -> Option<f64> {
        if !ratio.is_finite() {
            return None;
        }
        if ratio < self.min {
            Some(self.min)
        } else if ratio > self.max {
            Some(self.max)
        } else {
            None
        }
    }
}

/// Full cropper configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CropperSettings {
    /// Output encoding.
    pub format: OutputFormat,
    pub maintain_aspect_ratio: bool,
    pub transform: ImageTransform,
    /// Width over height.
    pub aspect_ratio: f64,
    pub aspect_ratio_range: Option<AspectRatioRange>,
    pub reset_crop_on_aspect_ratio_change: bool,
    /// Output width target in pixels, 0 = unset.
    pub resize_to_width: u32,
    /// Output height target in pixels, 0 = unset.
    pub resize_to_height: u32,
    /// Minimum crop width in natural pixels.
    pub cropper_min_width: f64,
    pub cropper_min_height: f64,
    /// Maximum crop width in natural pixels, 0 = unbounded.
    pub cropper_max_width: f64,
    pub cropper_max_height: f64,
    /// Fixed crop size in display pixels. Both must be set to take effect.
    pub cropper_static_width: f64,
    pub cropper_static_height: f64,
    /// Quarter turns applied to the source before display.
    pub canvas_rotation: i32,
    /// Keyboard nudge step in pixels.
    pub initial_step_size: u32,
    pub round_cropper: bool,
    pub only_scale_down: bool,
    /// 0 to 100.
    pub image_quality: u32,
    pub auto_crop: bool,
    /// CSS colour used to fill the output before drawing.
    pub background_color: Option<String>,
    pub contain_within_aspect_ratio: bool,
    pub hide_resize_squares: bool,
    pub align_image: AlignImage,
    pub allow_move_image: bool,
    pub disabled: bool,
}

impl Default for CropperSettings {
    fn default() -> Self {
        Self {
            format: OutputFormat::Png,
            maintain_aspect_ratio: true,
            transform: ImageTransform::default(),
            aspect_ratio: 1.0,
            aspect_ratio_range: None,
            reset_crop_on_aspect_ratio_change: true,
            resize_to_width: 0,
            resize_to_height: 0,
            cropper_min_width: 0.0,
            cropper_min_height: 0.0,
            cropper_max_width: 0.0,
            cropper_max_height: 0.0,
            cropper_static_width: 0.0,
            cropper_static_height: 0.0,
            canvas_rotation: 0,
            initial_step_size: 3,
            round_cropper: false,
            only_scale_down: false,
            image_quality: 92,
            auto_crop: true,
            background_color: None,
            contain_within_aspect_ratio: false,
            hide_resize_squares: false,
            align_image: AlignImage::Center,
            allow_move_image: false,
            disabled: false,
        }
    }
}

impl CropperSettings {
    /// Create settings with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// True when both static sizes are configured.
    pub fn has_static_size(&self) -> bool {
        self.cropper_static_width > 0.0 && self.cropper_static_height > 0.0
    }

    /// True when either static size is configured. Resizing is blocked even
    /// if only one axis is fixed.
    pub fn locks_resize(&self) -> bool {
        self.cropper_static_width > 0.0 || self.cropper_static_height > 0.0
    }

    /// Apply the static-size overrides and validate the result.
    ///
    /// With a static size the rectangle cannot be resized, so the resize
    /// handles are hidden, min and max collapse onto the static size and the
    /// aspect lock is released.
    pub fn validated(mut self) -> Result<Self, SettingsError> {
        if self.cropper_static_width < 0.0 || self.cropper_static_height < 0.0 {
            return Err(SettingsError::InvalidStaticSize {
                width: self.cropper_static_width,
                height: self.cropper_static_height,
            });
        }

        if self.has_static_size() {
            self.hide_resize_squares = true;
            self.cropper_min_width = self.cropper_static_width;
            self.cropper_min_height = self.cropper_static_height;
            self.cropper_max_width = self.cropper_static_width;
            self.cropper_max_height = self.cropper_static_height;
            self.maintain_aspect_ratio = false;
        }

        if self.maintain_aspect_ratio
            && !(self.aspect_ratio > 0.0 && self.aspect_ratio.is_finite())
        {
            return Err(SettingsError::InvalidAspectRatio(self.aspect_ratio));
        }

        for (axis, value) in [
            ("min width", self.cropper_min_width),
            ("min height", self.cropper_min_height),
            ("max width", self.cropper_max_width),
            ("max height", self.cropper_max_height),
        ] {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(SettingsError::InvalidSizeBound(axis));
            }
        }

        check_min_max("width", self.cropper_min_width, self.cropper_max_width)?;
        check_min_max("height", self.cropper_min_height, self.cropper_max_height)?;

        if let Some(range) = self.aspect_ratio_range {
            let valid = range.min > 0.0 && range.min.is_finite() && range.max.is_finite();
            if !valid || range.min > range.max {
                return Err(SettingsError::InvalidAspectRange {
                    min: range.min,
                    max: range.max,
                });
            }
        }

        self.background()?;

        Ok(self)
    }

    /// The parsed background colour, if one is configured.
    pub fn background(&self) -> Result<Option<image::Rgba<u8>>, SettingsError> {
        self.background_color
            .as_deref()
            .map(parse_css_color)
            .transpose()
    }

    /// Encoder quality in `[0, 1]`.
    pub fn quality(&self) -> f32 {
        (self.image_quality as f32 / 100.0).clamp(0.0, 1.0)
    }

    /// The aspect range that applies, if any.
    ///
    /// A fixed aspect ratio takes precedence over the range.
    pub fn active_aspect_range(&self) -> Option<AspectRatioRange> {
        if self.maintain_aspect_ratio {
            None
        } else {
            self.aspect_ratio_range
        }
    }
}

/// A zero maximum means "unbounded", so only positive maxima are compared.
fn check_min_max(axis: &'static str, min: f64, max: f64) -> Result<(), SettingsError> {
    if max > 0.0 && min > max {
        return Err(SettingsError::MinExceedsMax { axis, min, max });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_cropper_defaults() {
        let settings = CropperSettings::new();
        assert_eq!(settings.format, OutputFormat::Png);
        assert!(settings.maintain_aspect_ratio);
        assert_eq!(settings.aspect_ratio, 1.0);
        assert_eq!(settings.image_quality, 92);
        assert_eq!(settings.initial_step_size, 3);
        assert!(settings.auto_crop);
        assert!(settings.validated().is_ok());
    }

    #[test]
    fn test_zero_aspect_ratio_rejected_when_maintained() {
        let mut settings = CropperSettings::new();
        settings.aspect_ratio = 0.0;
        assert_eq!(
            settings.clone().validated(),
            Err(SettingsError::InvalidAspectRatio(0.0))
        );

        settings.maintain_aspect_ratio = false;
        assert!(settings.validated().is_ok());
    }

    #[test]
    fn test_nan_aspect_ratio_rejected() {
        let mut settings = CropperSettings::new();
        settings.aspect_ratio = f64::NAN;
        assert!(matches!(
            settings.validated(),
            Err(SettingsError::InvalidAspectRatio(_))
        ));
    }

    #[test]
    fn test_min_exceeding_max_rejected() {
        let mut settings = CropperSettings::new();
        settings.cropper_min_width = 500.0;
        settings.cropper_max_width = 200.0;
        assert!(matches!(
            settings.validated(),
            Err(SettingsError::MinExceedsMax { axis: "width", .. })
        ));
    }

    #[test]
    fn test_unbounded_max_accepts_any_min() {
        let mut settings = CropperSettings::new();
        settings.cropper_min_height = 500.0;
        settings.cropper_max_height = 0.0;
        assert!(settings.validated().is_ok());
    }

    #[test]
    fn test_static_size_overrides() {
        let mut settings = CropperSettings::new();
        settings.cropper_static_width = 300.0;
        settings.cropper_static_height = 200.0;

        let settings = settings.validated().unwrap();
        assert!(settings.hide_resize_squares);
        assert!(!settings.maintain_aspect_ratio);
        assert_eq!(settings.cropper_min_width, 300.0);
        assert_eq!(settings.cropper_max_width, 300.0);
        assert_eq!(settings.cropper_min_height, 200.0);
        assert_eq!(settings.cropper_max_height, 200.0);
    }

    #[test]
    fn test_single_static_axis_is_ignored() {
        let mut settings = CropperSettings::new();
        settings.cropper_static_width = 300.0;

        let settings = settings.validated().unwrap();
        assert!(!settings.hide_resize_squares);
        assert!(settings.maintain_aspect_ratio);
    }

    #[test]
    fn test_invalid_background_rejected() {
        let mut settings = CropperSettings::new();
        settings.background_color = Some("not-a-color".to_string());
        assert!(matches!(
            settings.validated(),
            Err(SettingsError::InvalidColor(_))
        ));
    }

    #[test]
    fn test_aspect_range_validation() {
        let mut settings = CropperSettings::new();
        settings.maintain_aspect_ratio = false;
        settings.aspect_ratio_range = Some(AspectRatioRange { min: 1.5, max: 0.75 });
        assert!(matches!(
            settings.clone().validated(),
            Err(SettingsError::InvalidAspectRange { .. })
        ));

        settings.aspect_ratio_range = Some(AspectRatioRange { min: 0.75, max: 1.5 });
        assert!(settings.validated().is_ok());
    }

    #[test]
    fn test_aspect_range_snap() {
        let range = AspectRatioRange { min: 0.75, max: 1.5 };
        assert_eq!(range.snap(1.0), None);
        assert_eq!(range.snap(0.5), Some(0.75));
        assert_eq!(range.snap(3.0), Some(1.5));
        assert_eq!(range.snap(f64::NAN), None);
    }

    #[test]
    fn test_quality_clamped() {
        let mut settings = CropperSettings::new();
        settings.image_quality = 250;
        assert_eq!(settings.quality(), 1.0);
        settings.image_quality = 50;
        assert_eq!(settings.quality(), 0.5);
    }

    #[test]
    fn test_transform_effective_scale() {
        let mut transform = ImageTransform::default();
        assert_eq!(transform.effective_scale(), 1.0);
        transform.scale = 0.0;
        assert_eq!(transform.effective_scale(), 1.0);
        transform.scale = 2.5;
        assert_eq!(transform.effective_scale(), 2.5);
    }
}
