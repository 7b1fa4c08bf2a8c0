//! Cropframe Core - Image cropping library
//!
//! This crate provides the core functionality behind the Cropframe image
//! cropper: EXIF-aware image loading, crop rectangle geometry and gestures,
//! and rendering the crop to an encoded image.

pub mod cropper;
pub mod decode;
pub mod encode;
pub mod geometry;
pub mod normalize;
pub mod render;
pub mod settings;
pub mod transform;

pub use cropper::{Cropper, GestureError, GestureOutcome, Handle, MoveKind};
pub use decode::{ImageSource, LoadError, LoadOptions};
pub use encode::{EncodeError, OutputFormat};
pub use geometry::{CropperPosition, Dimensions, ImagePosition, Point};
pub use normalize::{normalize, LoadedImage};
pub use render::{render, CropOutput};
pub use settings::{CropperSettings, ImageTransform, ScaledLimits, SettingsError};

use thiserror::Error;

/// Any error the cropper can report.
#[derive(Debug, Error)]
pub enum CropperError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Gesture(#[from] GestureError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fails_with_settings() -> Result<Cropper, CropperError> {
        let mut settings = CropperSettings::new();
        settings.aspect_ratio = 0.0;
        Ok(Cropper::new(settings)?)
    }

    #[test]
    fn test_errors_convert() {
        let err = fails_with_settings().unwrap_err();
        assert!(matches!(err, CropperError::Settings(_)));
        assert!(err.to_string().contains("aspectRatio"));

        let err: CropperError = GestureError::Disabled.into();
        assert_eq!(err.to_string(), "the cropper is disabled");
    }

    #[test]
    fn test_end_to_end_crop() {
        let png = decode::source_fixtures::png_bytes(60, 40, [10, 20, 30, 255]);
        let source = ImageSource::Bytes {
            bytes: png,
            mime: "image/png".to_string(),
        };

        let mut cropper = Cropper::new(CropperSettings::new()).unwrap();
        let ticket = cropper.begin_load();
        let loaded = normalize(source, cropper.settings(), LoadOptions::default());
        assert!(cropper.finish_load(ticket, loaded).unwrap());
        assert!(cropper.display_ready(Dimensions::new(30, 20)));

        let output = cropper.crop().unwrap().unwrap();
        assert_eq!((output.width, output.height), (40, 40));
        assert_eq!(
            output.image_position,
            ImagePosition {
                x1: 10.0,
                y1: 0.0,
                x2: 50.0,
                y2: 40.0
            }
        );
        assert!(output.to_data_url().starts_with("data:image/png;base64,"));
    }
}
