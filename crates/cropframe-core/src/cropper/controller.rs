//! The stateful cropper.
//!
//! [`Cropper`] owns everything that changes while a user works on one image
//! and commits the results of the pure functions in [`engine`](super::engine).
//! It performs no I/O: loading, measuring the display and encoding happen
//! around it, driven by the UI layer.

use serde::Serialize;

use crate::decode::LoadError;
use crate::encode::EncodeError;
use crate::geometry::{CropperPosition, Dimensions, Point};
use crate::normalize::{retransform, LoadedImage};
use crate::render::{render, CropOutput};
use crate::settings::{CropperSettings, ImageTransform, ScaledLimits, SettingsError};

use super::engine;
use super::keyboard::{interpret_key, KeyboardAction};
use super::session::{GestureError, Handle, MoveKind, MoveSession};

/// Identifies one load attempt. Only the most recent ticket is honoured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// What a finished gesture changed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum GestureOutcome {
    /// The crop rectangle moved or resized.
    CropChanged(CropperPosition),
    /// The image was panned underneath the rectangle.
    TransformChanged(ImageTransform),
}

/// Effects of a settings update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsChange {
    /// The transformed raster was rebuilt. The display must be measured
    /// again and reported through [`Cropper::display_ready`].
    pub retransformed: bool,
    /// The rectangle was reset to its default.
    pub reset: bool,
    /// The rectangle was pulled back inside the image.
    pub clamped: bool,
    /// The user transform changed.
    pub transform_changed: bool,
}

impl SettingsChange {
    /// True when the crop output may differ from the last one.
    pub fn affects_crop(&self) -> bool {
        self.reset || self.clamped || self.transform_changed
    }
}

#[derive(Debug)]
pub struct Cropper {
    settings: CropperSettings,
    limits: ScaledLimits,
    display: Dimensions,
    position: CropperPosition,
    session: Option<MoveSession>,
    image: Option<LoadedImage>,
    generation: u64,
    step_size: u32,
    ready: bool,
}

impl Cropper {
    /// Create a cropper with no image.
    ///
    /// # Errors
    ///
    /// Returns a `SettingsError` if the settings do not validate.
    pub fn new(settings: CropperSettings) -> Result<Self, SettingsError> {
        let settings = settings.validated()?;
        Ok(Self {
            step_size: settings.initial_step_size,
            limits: ScaledLimits::derive(&settings, Dimensions::default(), None),
            settings,
            display: Dimensions::default(),
            position: CropperPosition::default(),
            session: None,
            image: None,
            generation: 0,
            ready: false,
        })
    }

    pub fn settings(&self) -> &CropperSettings {
        &self.settings
    }

    pub fn position(&self) -> CropperPosition {
        self.position
    }

    pub fn limits(&self) -> ScaledLimits {
        self.limits
    }

    pub fn display_size(&self) -> Dimensions {
        self.display
    }

    pub fn image(&self) -> Option<&LoadedImage> {
        self.image.as_ref()
    }

    pub fn transform(&self) -> ImageTransform {
        self.settings.transform
    }

    pub fn step_size(&self) -> u32 {
        self.step_size
    }

    pub fn session(&self) -> Option<&MoveSession> {
        self.session.as_ref()
    }

    /// True once an image is loaded and the display has been measured.
    pub fn is_ready(&self) -> bool {
        self.ready && self.image.is_some()
    }

    /// Forget the current image and start a new load.
    ///
    /// Results for any earlier ticket are discarded by [`finish_load`](Self::finish_load).
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.image = None;
        self.session = None;
        self.ready = false;
        self.display = Dimensions::default();
        self.position = CropperPosition::default();
        self.refresh_limits();
        LoadTicket(self.generation)
    }

    /// Accept the result of a load.
    ///
    /// Returns `Ok(false)` if the ticket has been superseded, in which case
    /// the result (even an error) is dropped.
    ///
    /// # Errors
    ///
    /// Passes through the `LoadError` of a current ticket.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<LoadedImage, LoadError>,
    ) -> Result<bool, LoadError> {
        if ticket.0 != self.generation {
            return Ok(false);
        }
        self.image = Some(result?);
        self.ready = false;
        Ok(true)
    }

    /// The displayed image has a size: derive the limits and place the
    /// default rectangle. Returns false if no image is loaded.
    pub fn display_ready(&mut self, display: Dimensions) -> bool {
        if self.image.is_none() || display.is_empty() {
            return false;
        }
        self.display = display;
        self.refresh_limits();
        self.reset_position();
        self.ready = true;
        true
    }

    /// The displayed image was resized, for example with the window.
    pub fn set_display_size(&mut self, display: Dimensions) {
        if self.image.is_none() || display.is_empty() {
            return;
        }
        self.position = engine::rescale(&self.position, self.display, display);
        self.display = display;
        self.refresh_limits();
    }

    /// Put the rectangle back in its default place.
    pub fn reset_position(&mut self) {
        self.position = engine::reset(self.display, &self.settings, &self.limits);
    }

    /// Replace the rectangle, clipping it to the image.
    pub fn set_position(&mut self, position: CropperPosition) -> CropperPosition {
        self.position = engine::clamp(&position, self.display, false);
        self.position
    }

    /// Apply new settings.
    ///
    /// A rotation or contain change rebuilds the transformed raster. An
    /// aspect change resets the rectangle when the settings ask for it or the
    /// current rectangle no longer has the target ratio; otherwise the
    /// rectangle is only clipped.
    ///
    /// # Errors
    ///
    /// Returns a `SettingsError`, leaving the cropper untouched, if the new
    /// settings do not validate.
    pub fn update_settings(
        &mut self,
        settings: CropperSettings,
    ) -> Result<SettingsChange, SettingsError> {
        let settings = settings.validated()?;
        let previous = std::mem::replace(&mut self.settings, settings);
        let current = &self.settings;
        let mut change = SettingsChange::default();

        if current.initial_step_size != previous.initial_step_size {
            self.step_size = current.initial_step_size;
        }

        let rotation_changed = current.canvas_rotation != previous.canvas_rotation
            || current.contain_within_aspect_ratio != previous.contain_within_aspect_ratio;
        if rotation_changed {
            if let Some(image) = &self.image {
                self.image = Some(retransform(image, current));
                self.ready = false;
                change.retransformed = true;
            }
        }

        let aspect_changed = current.maintain_aspect_ratio != previous.maintain_aspect_ratio
            || current.aspect_ratio != previous.aspect_ratio
            || current.aspect_ratio_range != previous.aspect_ratio_range;
        let bounds_changed = current.cropper_min_width != previous.cropper_min_width
            || current.cropper_min_height != previous.cropper_min_height
            || current.cropper_max_width != previous.cropper_max_width
            || current.cropper_max_height != previous.cropper_max_height
            || current.cropper_static_width != previous.cropper_static_width
            || current.cropper_static_height != previous.cropper_static_height;
        change.transform_changed = current.transform != previous.transform;

        self.refresh_limits();

        if self.is_ready() && (aspect_changed || bounds_changed) {
            let settings = &self.settings;
            if aspect_changed
                && settings.maintain_aspect_ratio
                && (settings.reset_crop_on_aspect_ratio_change
                    || !engine::aspect_ratio_is_correct(&self.position, settings.aspect_ratio))
            {
                self.reset_position();
                change.reset = true;
            } else {
                self.position = engine::clamp(&self.position, self.display, false);
                change.clamped = true;
            }
        }

        Ok(change)
    }

    /// Start a pointer gesture at `pointer` (display pixels).
    ///
    /// # Errors
    ///
    /// Returns a `GestureError` if the cropper is disabled, another gesture
    /// is in progress, nothing is displayed yet, an image drag is not
    /// allowed, or a resize has no edge or corner handle.
    pub fn begin_gesture(
        &mut self,
        kind: MoveKind,
        handle: Option<Handle>,
        pointer: Point,
    ) -> Result<(), GestureError> {
        if kind == MoveKind::Pinch {
            return self.begin_pinch();
        }
        self.check_can_start()?;
        if kind == MoveKind::Drag && !self.settings.allow_move_image {
            return Err(GestureError::DragNotAllowed);
        }
        if kind == MoveKind::Resize && matches!(handle, None | Some(Handle::Center)) {
            return Err(GestureError::MissingHandle);
        }

        self.session = Some(MoveSession {
            kind,
            handle,
            start: self.position,
            pointer,
            transform: self.settings.transform,
        });
        Ok(())
    }

    /// Start a two-finger pinch around the rectangle centre.
    ///
    /// # Errors
    ///
    /// As [`begin_gesture`](Self::begin_gesture).
    pub fn begin_pinch(&mut self) -> Result<(), GestureError> {
        self.check_can_start()?;
        self.session = Some(MoveSession {
            kind: MoveKind::Pinch,
            handle: Some(Handle::Center),
            start: self.position,
            pointer: self.position.center(),
            transform: self.settings.transform,
        });
        Ok(())
    }

    fn check_can_start(&self) -> Result<(), GestureError> {
        if self.settings.disabled {
            return Err(GestureError::Disabled);
        }
        if self.session.is_some() {
            return Err(GestureError::SessionActive);
        }
        if !self.is_ready() {
            return Err(GestureError::NoImage);
        }
        Ok(())
    }

    /// The pointer moved. Returns the rectangle while a gesture is active.
    pub fn pointer_move(&mut self, pointer: Point) -> Option<CropperPosition> {
        let session = self.session?;
        let delta = session.delta(pointer);

        match session.kind {
            MoveKind::Move => {
                let moved = engine::move_by(&session.start, delta);
                self.position = engine::clamp(&moved, self.display, true);
            }
            MoveKind::Resize => {
                if let (Some(handle), false) = (session.handle, self.settings.locks_resize()) {
                    self.position = engine::resize(
                        handle,
                        &session.start,
                        &self.position,
                        delta,
                        self.display,
                        &self.settings,
                        &self.limits,
                    );
                }
                self.position = engine::clamp(&self.position, self.display, false);
            }
            MoveKind::Drag => {
                self.settings.transform.translate_h = session.transform.translate_h + delta.x;
                self.settings.transform.translate_v = session.transform.translate_v + delta.y;
            }
            MoveKind::Pinch => {}
        }

        Some(self.position)
    }

    /// The pinch scale changed. Returns the rectangle while a pinch is active.
    pub fn pinch_move(&mut self, scale: f64) -> Option<CropperPosition> {
        let session = self.session.filter(|s| s.kind == MoveKind::Pinch)?;
        let pinched = engine::pinch(
            &session.start,
            scale,
            self.display,
            &self.settings,
            &self.limits,
        );
        self.position = engine::clamp(&pinched, self.display, false);
        Some(self.position)
    }

    /// Finish the active gesture, if any.
    pub fn end_gesture(&mut self) -> Option<GestureOutcome> {
        let session = self.session.take()?;
        Some(match session.kind {
            MoveKind::Drag => GestureOutcome::TransformChanged(self.settings.transform),
            _ => GestureOutcome::CropChanged(self.position),
        })
    }

    /// Handle a key press on the focused rectangle.
    ///
    /// # Errors
    ///
    /// Returns a `GestureError` if a nudge cannot start.
    pub fn key_input(
        &mut self,
        key: &str,
        shift: bool,
        alt: bool,
    ) -> Result<Option<GestureOutcome>, GestureError> {
        match interpret_key(key, shift, alt, self.step_size) {
            Some(KeyboardAction::SetStepSize(step)) => {
                self.step_size = step;
                Ok(None)
            }
            Some(KeyboardAction::Nudge {
                kind,
                handle,
                delta,
            }) => {
                self.begin_gesture(kind, Some(handle), Point::default())?;
                self.pointer_move(delta);
                Ok(self.end_gesture())
            }
            None => Ok(None),
        }
    }

    /// Render the current crop.
    ///
    /// Returns `Ok(None)` when no image is displayed.
    ///
    /// # Errors
    ///
    /// Returns an `EncodeError` if encoding the output fails.
    pub fn crop(&self) -> Result<Option<CropOutput>, EncodeError> {
        match (&self.image, self.ready) {
            (Some(image), true) => render(image, &self.position, self.display, &self.settings),
            _ => Ok(None),
        }
    }

    /// [`crop`](Self::crop), but only when `autoCrop` is enabled.
    ///
    /// # Errors
    ///
    /// As [`crop`](Self::crop).
    pub fn auto_crop(&self) -> Result<Option<CropOutput>, EncodeError> {
        if self.settings.auto_crop {
            self.crop()
        } else {
            Ok(None)
        }
    }

    fn refresh_limits(&mut self) {
        let image = self.image.as_ref().map(|image| image.transformed.size);
        self.limits = ScaledLimits::derive(&self.settings, self.display, image);
    }
}
