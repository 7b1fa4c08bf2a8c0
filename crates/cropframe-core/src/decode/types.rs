//! Core types for image loading.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for image loading operations.
///
/// Any of these ends the load attempt. The caller reports it once and does
/// not retry automatically.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The MIME type is not one of the accepted image types.
    #[error("Invalid image type: {0}")]
    UnsupportedType(String),

    /// The inline `data:` URL is malformed or not base64.
    #[error("Invalid data URL")]
    InvalidDataUrl,

    /// The bytes could not be decoded into a raster.
    #[error("Image failed to load: {0}")]
    Decode(String),

    /// The decoded image has no pixels.
    #[error("No image loaded")]
    EmptyImage,

    /// The display element never reported a size.
    #[error("Display size unavailable after {attempts} attempts")]
    NotReady { attempts: u32 },

    /// Fetching a remote image failed.
    #[error("Failed to fetch image: {0}")]
    Fetch(String),
}

/// The EXIF `Orientation` tag (0x0112), values 1 to 8.
///
/// Each variant documents the [`ExifTransform`] that [`Orientation::transform`]
/// returns for it: clockwise quarter turns, then an optional mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Orientation {
    /// Stored upright. No turns, no mirror.
    #[default]
    Normal = 1,
    /// Mirror only.
    FlipHorizontal = 2,
    /// Two quarter turns.
    Rotate180 = 3,
    /// Two quarter turns, then mirror.
    FlipVertical = 4,
    /// One quarter turn, then mirror.
    Transpose = 5,
    /// One quarter turn.
    Rotate90CW = 6,
    /// Three quarter turns, then mirror.
    Transverse = 7,
    /// Three quarter turns.
    Rotate270CW = 8,
}

impl Orientation {
    /// All orientations in EXIF order.
    pub const ALL: [Orientation; 8] = [
        Orientation::Normal,
        Orientation::FlipHorizontal,
        Orientation::Rotate180,
        Orientation::FlipVertical,
        Orientation::Transpose,
        Orientation::Rotate90CW,
        Orientation::Transverse,
        Orientation::Rotate270CW,
    ];

    /// Parse a raw EXIF value. Anything outside 1-8 is `None`.
    pub fn from_exif(value: u32) -> Option<Self> {
        Self::ALL.get((value as usize).checked_sub(1)?).copied()
    }

    /// The quarter-turn/flip pair that displays this orientation upright.
    pub fn transform(self) -> ExifTransform {
        let (rotate, flip) = match self {
            Orientation::Normal => (0, false),
            Orientation::FlipHorizontal => (0, true),
            Orientation::Rotate180 => (2, false),
            Orientation::FlipVertical => (2, true),
            Orientation::Transpose => (1, true),
            Orientation::Rotate90CW => (1, false),
            Orientation::Transverse => (3, true),
            Orientation::Rotate270CW => (3, false),
        };
        ExifTransform { rotate, flip }
    }
}

/// Normalized EXIF correction: rotate by `rotate` clockwise quarter turns,
/// then mirror horizontally when `flip` is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExifTransform {
    /// Quarter turns, 0 to 3.
    pub rotate: u8,
    pub flip: bool,
}

impl ExifTransform {
    pub const IDENTITY: Self = Self {
        rotate: 0,
        flip: false,
    };

    /// Map a raw EXIF orientation code. Unknown or absent codes give identity.
    pub fn from_code(code: Option<u32>) -> Self {
        code.and_then(Orientation::from_exif)
            .map(Orientation::transform)
            .unwrap_or(Self::IDENTITY)
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

/// Options that affect how a source is turned into a raster.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoadOptions {
    /// The pixels are already upright (the platform applied EXIF itself),
    /// so the EXIF transform is forced to identity.
    pub platform_oriented: bool,
}
