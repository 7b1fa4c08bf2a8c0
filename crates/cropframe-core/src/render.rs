//! Producing the cropped output image.
//!
//! The crop rectangle lives in display pixels. Rendering maps it onto the
//! transformed raster, draws that raster through the user's pan, zoom,
//! flip and rotation into an output surface the size of the crop, then
//! optionally resamples and finally encodes the surface.

use image::RgbaImage;

use crate::encode::{encode_image, to_data_url, EncodeError, OutputFormat};
use crate::geometry::{CropperPosition, Dimensions, ImagePosition};
use crate::normalize::LoadedImage;
use crate::settings::{CropperSettings, TranslateUnit};
use crate::transform::{draw_image, fill, resample_hermite, Affine2, InterpolationFilter};

/// A finished crop.
#[derive(Debug, Clone)]
pub struct CropOutput {
    /// Encoded image in `format`.
    pub bytes: Vec<u8>,
    pub format: OutputFormat,
    /// Final pixel size, after any resize.
    pub width: u32,
    pub height: u32,
    /// The rectangle in display pixels.
    pub cropper_position: CropperPosition,
    /// The rectangle in transformed-image pixels.
    pub image_position: ImagePosition,
    /// With `containWithinAspectRatio`, the rectangle relative to the
    /// unpadded image.
    pub offset_image_position: Option<ImagePosition>,
}

impl CropOutput {
    pub fn to_data_url(&self) -> String {
        to_data_url(&self.bytes, self.format.mime())
    }
}

/// Crop `loaded` to `position` as shown at `display` size.
///
/// Returns `Ok(None)` when there is nothing to render: the display has no
/// size yet or the mapped rectangle has no area.
///
/// # Errors
///
/// Returns an `EncodeError` if the final surface cannot be encoded.
pub fn render(
    loaded: &LoadedImage,
    position: &CropperPosition,
    display: Dimensions,
    settings: &CropperSettings,
) -> Result<Option<CropOutput>, EncodeError> {
    let transformed = loaded.transformed.size;
    if display.is_empty() || transformed.is_empty() {
        return Ok(None);
    }

    let ratio = transformed.width_f64() / display.width_f64();
    let image_position = image_position(
        position,
        ratio,
        transformed,
        settings.contain_within_aspect_ratio,
    );
    let (width, height) = (image_position.width(), image_position.height());
    if !(width >= 1.0 && height >= 1.0) {
        return Ok(None);
    }

    let mut surface = RgbaImage::new(width as u32, height as u32);
    let background = settings.background();
    debug_assert!(background.is_ok(), "render called with unvalidated settings");
    if let Ok(Some(color)) = background {
        fill(&mut surface, color);
    }

    let transform = &settings.transform;
    let scale = transform.effective_scale();
    let scale_x = if transform.flip_h { -scale } else { scale };
    let scale_y = if transform.flip_v { -scale } else { scale };
    let (translate_h, translate_v) = canvas_translate(settings, ratio, transformed);

    let matrix = Affine2::new(
        scale_x,
        0.0,
        0.0,
        scale_y,
        transformed.width_f64() / 2.0 + translate_h,
        transformed.height_f64() / 2.0 + translate_v,
    )
    .translate(-image_position.x1 / scale_x, -image_position.y1 / scale_y)
    .rotate_degrees(transform.rotate)
    .translate(-transformed.width_f64() / 2.0, -transformed.height_f64() / 2.0);

    draw_image(
        &mut surface,
        &loaded.transformed.raster,
        &matrix,
        InterpolationFilter::Bilinear,
    );

    let offset_image_position = settings.contain_within_aspect_ratio.then(|| {
        offset_image_position(
            position,
            ratio,
            loaded.original.size,
            transformed,
            loaded.total_rotation(settings),
        )
    });

    let resize = resize_ratio(width, height, settings);
    let (mut out_width, mut out_height) = (surface.width(), surface.height());
    if resize != 1.0 {
        let resized_width = round_half_up(width * resize).max(1.0);
        let resized_height = if settings.maintain_aspect_ratio {
            round_half_up(resized_width / settings.aspect_ratio)
        } else {
            round_half_up(height * resize)
        }
        .max(1.0);
        out_width = resized_width as u32;
        out_height = resized_height as u32;
        surface = resample_hermite(&surface, out_width, out_height);
    }

    let bytes = encode_image(&surface, settings.format, settings.quality())?;

    Ok(Some(CropOutput {
        bytes,
        format: settings.format,
        width: out_width,
        height: out_height,
        cropper_position: *position,
        image_position,
        offset_image_position,
    }))
}

/// Map a display rectangle onto the transformed image.
///
/// Outside contain mode the result is clipped to the image.
pub fn image_position(
    position: &CropperPosition,
    ratio: f64,
    transformed: Dimensions,
    contain_within_aspect_ratio: bool,
) -> ImagePosition {
    let mut out = ImagePosition {
        x1: round_half_up(position.x1 * ratio),
        y1: round_half_up(position.y1 * ratio),
        x2: round_half_up(position.x2 * ratio),
        y2: round_half_up(position.y2 * ratio),
    };
    if !contain_within_aspect_ratio {
        out.x1 = out.x1.max(0.0);
        out.y1 = out.y1.max(0.0);
        out.x2 = out.x2.min(transformed.width_f64());
        out.y2 = out.y2.min(transformed.height_f64());
    }
    out
}

/// The rectangle relative to the original image inside its contain padding.
///
/// The padding is split evenly on both sides; which original axis lines up
/// with which canvas axis depends on the rotation parity.
pub fn offset_image_position(
    position: &CropperPosition,
    ratio: f64,
    original: Dimensions,
    transformed: Dimensions,
    rotation: i32,
) -> ImagePosition {
    let original = if rotation.rem_euclid(2) == 1 {
        original.transposed()
    } else {
        original
    };
    let offset_x = (transformed.width_f64() - original.width_f64()) / 2.0;
    let offset_y = (transformed.height_f64() - original.height_f64()) / 2.0;

    ImagePosition {
        x1: round_half_up(position.x1 * ratio) - offset_x,
        y1: round_half_up(position.y1 * ratio) - offset_y,
        x2: round_half_up(position.x2 * ratio) - offset_x,
        y2: round_half_up(position.y2 * ratio) - offset_y,
    }
}

/// Uniform scale towards `resizeToWidth`/`resizeToHeight`.
///
/// Only positive targets take part; with none the ratio is 1. Upscaling is
/// refused when `onlyScaleDown` is set.
pub fn resize_ratio(width: f64, height: f64, settings: &CropperSettings) -> f64 {
    let candidates = [
        (settings.resize_to_width, width),
        (settings.resize_to_height, height),
    ];
    let ratio = candidates
        .iter()
        .filter(|(target, _)| *target > 0)
        .map(|(target, extent)| *target as f64 / extent)
        .fold(None, |min: Option<f64>, r| Some(min.map_or(r, |m| m.min(r))))
        .unwrap_or(1.0);

    if ratio > 1.0 && !settings.only_scale_down {
        ratio
    } else {
        ratio.min(1.0)
    }
}

/// The user's pan offset in transformed-image pixels.
pub fn canvas_translate(settings: &CropperSettings, ratio: f64, transformed: Dimensions) -> (f64, f64) {
    let transform = &settings.transform;
    match transform.translate_unit {
        TranslateUnit::Px => (transform.translate_h * ratio, transform.translate_v * ratio),
        TranslateUnit::Percent => (
            transform.translate_h / 100.0 * transformed.width_f64(),
            transform.translate_v / 100.0 * transformed.height_f64(),
        ),
    }
}

/// Round half towards positive infinity, so that negative padded
/// coordinates round the same way as positive ones.
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}
