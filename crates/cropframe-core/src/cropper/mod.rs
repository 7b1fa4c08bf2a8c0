//! Crop rectangle geometry and gestures.
//!
//! This module provides functionality for:
//! - Placing, moving, resizing and pinching the crop rectangle ([`engine`])
//! - Gesture sessions and keyboard nudging
//! - Waiting for the display element to report a size
//! - The stateful [`Cropper`] that ties these to a loaded image
//!
//! All coordinates are display pixels of the shown (transformed) image.
//!
//! # Examples
//!
//! ```ignore
//! use cropframe_core::cropper::{Cropper, Handle, MoveKind};
//! use cropframe_core::geometry::{Dimensions, Point};
//!
//! let mut cropper = Cropper::new(settings)?;
//! let ticket = cropper.begin_load();
//! cropper.finish_load(ticket, normalize(source, cropper.settings(), options))?;
//! cropper.display_ready(Dimensions::new(800, 600));
//!
//! cropper.begin_gesture(MoveKind::Resize, Some(Handle::Right), Point::new(700.0, 300.0))?;
//! cropper.pointer_move(Point::new(650.0, 300.0));
//! cropper.end_gesture();
//! let output = cropper.crop()?;
//! ```

mod controller;
pub mod engine;
mod keyboard;
mod readiness;
mod session;

pub use controller::{Cropper, GestureOutcome, LoadTicket, SettingsChange};
pub use keyboard::{interpret_key, KeyboardAction};
pub use readiness::{Readiness, ReadinessPoll, MAX_READINESS_RETRIES, READINESS_INTERVAL_MS};
pub use session::{GestureError, Handle, MoveKind, MoveSession};
