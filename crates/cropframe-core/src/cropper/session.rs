//! Gesture sessions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{CropperPosition, Point};
use crate::settings::ImageTransform;

/// Why a gesture could not start.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum GestureError {
    /// Another gesture is still in progress.
    #[error("a gesture is already in progress")]
    SessionActive,

    #[error("the cropper is disabled")]
    Disabled,

    #[error("no image is loaded")]
    NoImage,

    /// Image panning requires `allowMoveImage`.
    #[error("moving the image is not allowed")]
    DragNotAllowed,

    /// Resize gestures need an edge or corner handle.
    #[error("resize gestures need a handle")]
    MissingHandle,
}

/// What a gesture manipulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveKind {
    /// Translate the crop rectangle.
    Move,
    /// Drag one edge or corner of the crop rectangle.
    Resize,
    /// Two-finger scale around the rectangle centre.
    Pinch,
    /// Pan the image underneath the rectangle.
    Drag,
}

/// A resize grip, or the pinch pseudo-handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handle {
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Center,
}

impl Handle {
    /// The handle on the opposite side of the rectangle.
    pub fn opposite(self) -> Self {
        match self {
            Handle::Top => Handle::Bottom,
            Handle::Bottom => Handle::Top,
            Handle::Left => Handle::Right,
            Handle::Right => Handle::Left,
            Handle::TopLeft => Handle::BottomRight,
            Handle::TopRight => Handle::BottomLeft,
            Handle::BottomLeft => Handle::TopRight,
            Handle::BottomRight => Handle::TopLeft,
            Handle::Center => Handle::Center,
        }
    }
}

/// Snapshot taken when a gesture starts. Never changed until it ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveSession {
    pub kind: MoveKind,
    pub handle: Option<Handle>,
    /// The rectangle when the gesture started.
    pub start: CropperPosition,
    /// Pointer position at start. For pinches, the rectangle centre.
    pub pointer: Point,
    /// Image transform at start, used by image drags.
    pub transform: ImageTransform,
}

impl MoveSession {
    /// Pointer travel since the gesture started.
    pub fn delta(&self, pointer: Point) -> Point {
        Point::new(pointer.x - self.pointer.x, pointer.y - self.pointer.y)
    }
}
