//! Turning a decoded source into the raster the cropper displays.
//!
//! The EXIF orientation and the user's canvas rotation are baked into a new
//! raster once, at load time, so every later geometry and render step works
//! on an upright image. When nothing needs baking the transformed layer
//! shares the original's pixels and encoded bytes.

use std::sync::Arc;

use image::RgbaImage;

use crate::decode::{
    decode_source, read_exif_transform, ExifTransform, ImageSource, LoadError, LoadOptions,
    SourceImage,
};
use crate::encode::{encode_image, to_data_url, EncodeError, OutputFormat};
use crate::geometry::Dimensions;
use crate::settings::CropperSettings;
use crate::transform::{draw_image, Affine2, InterpolationFilter};

/// Encoded image bytes and their MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub bytes: Arc<[u8]>,
    pub mime: String,
}

impl EncodedImage {
    pub fn to_data_url(&self) -> String {
        to_data_url(&self.bytes, &self.mime)
    }
}

/// One raster of a [`LoadedImage`].
#[derive(Debug, Clone)]
pub struct ImageLayer {
    pub raster: Arc<RgbaImage>,
    pub size: Dimensions,
    encoded: Option<EncodedImage>,
}

impl ImageLayer {
    fn new(raster: Arc<RgbaImage>, encoded: Option<EncodedImage>) -> Self {
        let size = Dimensions::new(raster.width(), raster.height());
        Self {
            raster,
            size,
            encoded,
        }
    }

    /// Bytes suitable for showing this layer.
    ///
    /// Layers that came straight from the source reuse its bytes; baked
    /// layers are encoded to PNG on demand.
    ///
    /// # Errors
    ///
    /// Returns an `EncodeError` if PNG encoding fails.
    pub fn display_bytes(&self) -> Result<EncodedImage, EncodeError> {
        if let Some(encoded) = &self.encoded {
            return Ok(encoded.clone());
        }
        let bytes = encode_image(&self.raster, OutputFormat::Png, 1.0)?;
        Ok(EncodedImage {
            bytes: bytes.into(),
            mime: OutputFormat::Png.mime().to_string(),
        })
    }

    /// [`display_bytes`](Self::display_bytes) as a `data:` URL.
    pub fn to_data_url(&self) -> Result<String, EncodeError> {
        Ok(self.display_bytes()?.to_data_url())
    }

    /// True when the layer reuses the source's encoded bytes.
    pub fn is_source_encoded(&self) -> bool {
        self.encoded.is_some()
    }
}

/// A source image plus the upright raster derived from it.
///
/// Replaced wholesale whenever the source or a rotation-affecting setting
/// changes; never mutated in place.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub original: ImageLayer,
    pub transformed: ImageLayer,
    pub exif_transform: ExifTransform,
}

impl LoadedImage {
    /// Quarter turns applied to produce `transformed`.
    pub fn total_rotation(&self, settings: &CropperSettings) -> i32 {
        settings.canvas_rotation + self.exif_transform.rotate as i32
    }
}

/// Decode a source and normalize it for display.
///
/// # Errors
///
/// Returns a `LoadError` if the source is not an accepted image type or
/// cannot be decoded.
pub fn normalize(
    source: ImageSource,
    settings: &CropperSettings,
    options: LoadOptions,
) -> Result<LoadedImage, LoadError> {
    let source = decode_source(source)?;
    let exif_transform = if options.platform_oriented {
        ExifTransform::IDENTITY
    } else {
        read_exif_transform(&source.bytes)
    };
    Ok(normalize_decoded(source, exif_transform, settings))
}

/// Normalize an already decoded source with a known EXIF transform.
pub fn normalize_decoded(
    source: SourceImage,
    exif_transform: ExifTransform,
    settings: &CropperSettings,
) -> LoadedImage {
    let encoded = EncodedImage {
        bytes: source.bytes,
        mime: source.mime,
    };
    let original = ImageLayer::new(source.raster, Some(encoded));
    build(original, exif_transform, settings)
}

/// Recompute the transformed layer after a rotation or contain change,
/// without decoding the source again.
pub fn retransform(loaded: &LoadedImage, settings: &CropperSettings) -> LoadedImage {
    build(loaded.original.clone(), loaded.exif_transform, settings)
}

/// Size of the canvas the original is baked into.
///
/// Odd quarter turns swap the axes. In contain mode the canvas grows so the
/// rotated original fits the aspect ratio without being cut.
pub fn transformed_size(
    original: Dimensions,
    rotation: i32,
    contain_within_aspect_ratio: bool,
    aspect_ratio: f64,
) -> Dimensions {
    let odd = rotation.rem_euclid(2) == 1;
    let usable_aspect = aspect_ratio > 0.0 && aspect_ratio.is_finite();

    if contain_within_aspect_ratio && usable_aspect {
        let (w, h) = (original.width_f64(), original.height_f64());
        let (width, height) = if odd {
            (h.max(w * aspect_ratio), w.max(h / aspect_ratio))
        } else {
            (w.max(h * aspect_ratio), h.max(w / aspect_ratio))
        };
        return Dimensions::new(width as u32, height as u32);
    }

    if odd {
        original.transposed()
    } else {
        original
    }
}

fn build(original: ImageLayer, exif_transform: ExifTransform, settings: &CropperSettings) -> LoadedImage {
    let rotation = settings.canvas_rotation + exif_transform.rotate as i32;

    if rotation.rem_euclid(4) == 0
        && !exif_transform.flip
        && !settings.contain_within_aspect_ratio
    {
        return LoadedImage {
            transformed: original.clone(),
            original,
            exif_transform,
        };
    }

    let size = transformed_size(
        original.size,
        rotation,
        settings.contain_within_aspect_ratio,
        settings.aspect_ratio,
    );

    let flip = if exif_transform.flip { -1.0 } else { 1.0 };
    let matrix = Affine2::new(
        flip,
        0.0,
        0.0,
        1.0,
        size.width_f64() / 2.0,
        size.height_f64() / 2.0,
    )
    .rotate_degrees(rotation as f64 * 90.0)
    .translate(
        -original.size.width_f64() / 2.0,
        -original.size.height_f64() / 2.0,
    );

    let mut canvas = RgbaImage::new(size.width, size.height);
    draw_image(
        &mut canvas,
        &original.raster,
        &matrix,
        InterpolationFilter::Nearest,
    );

    LoadedImage {
        original,
        transformed: ImageLayer::new(Arc::new(canvas), None),
        exif_transform,
    }
}
