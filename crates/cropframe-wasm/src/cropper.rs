//! The stateful cropper for JavaScript.
//!
//! [`ImageCropper`] wraps the core [`Cropper`] and translates between
//! JavaScript values and the core types. The host page owns the DOM: it
//! shows `image_data_url()`, measures the element, and forwards pointer,
//! touch and keyboard events.
//!
//! # Example
//!
//! ```typescript
//! import { ImageCropper, wait_for_display_size } from '@cropframe/wasm';
//!
//! const cropper = new ImageCropper({ aspectRatio: 1, format: 'jpeg' });
//! cropper.load_bytes(new Uint8Array(await file.arrayBuffer()), file.type, false);
//! img.src = cropper.image_data_url();
//! const size = await wait_for_display_size(img);
//! cropper.display_ready(size.width, size.height);
//!
//! handle.onpointerdown = (e) => cropper.begin_gesture('resize', 'right', e.clientX, e.clientY);
//! window.onpointermove = (e) => draw(cropper.pointer_move(e.clientX, e.clientY));
//! window.onpointerup = () => {
//!   if (cropper.end_gesture()) preview.src = cropper.auto_crop()?.data_url();
//! };
//! ```

use cropframe_core::cropper::{Cropper, Handle, MoveKind};
use cropframe_core::decode::{ImageSource, LoadOptions};
use cropframe_core::geometry::{Dimensions, Point};
use cropframe_core::normalize::normalize;
use cropframe_core::settings::CropperSettings;
use js_sys::Object;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::types::{parse_name, position_from_parts, to_js, JsCropOutput, JsFetchedImage, JsSize};

/// An image cropper bound to one loaded image at a time.
#[wasm_bindgen]
pub struct ImageCropper {
    inner: Cropper,
}

#[wasm_bindgen]
impl ImageCropper {
    /// Create a cropper. `settings` may be `undefined` or a partial object;
    /// missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Throws if a setting is out of range or has the wrong type.
    #[wasm_bindgen(constructor)]
    pub fn new(settings: JsValue) -> Result<ImageCropper, JsValue> {
        let settings = if settings.is_undefined() || settings.is_null() {
            CropperSettings::new()
        } else {
            serde_wasm_bindgen::from_value(settings)
                .map_err(|e| JsValue::from_str(&e.to_string()))?
        };
        Cropper::new(settings)
            .map(|inner| ImageCropper { inner })
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// The current settings as a plain object.
    pub fn settings(&self) -> Result<JsValue, JsValue> {
        to_js(self.inner.settings())
    }

    /// Merge `patch` into the current settings and apply the result.
    ///
    /// Resolves to `{ retransformed, reset, clamped, transformChanged }`.
    /// When `retransformed` is true the shown image changed: set the element
    /// to `image_data_url()` again and report its new size through
    /// `display_ready`.
    pub fn update_settings(&mut self, patch: JsValue) -> Result<JsValue, JsValue> {
        let patch: Object = patch
            .dyn_into()
            .map_err(|_| JsValue::from_str("settings must be an object"))?;
        let current: Object = to_js(self.inner.settings())?.unchecked_into();
        let merged = Object::assign(&current, &patch);

        let settings: CropperSettings = serde_wasm_bindgen::from_value(merged.into())
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let change = self
            .inner
            .update_settings(settings)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        to_js(&change)
    }

    /// Load an encoded image. `platform_oriented` tells the cropper the
    /// pixels will already be upright, so EXIF orientation is ignored.
    ///
    /// # Errors
    ///
    /// Throws if the type is not an image type or the bytes do not decode.
    pub fn load_bytes(
        &mut self,
        bytes: Vec<u8>,
        mime: String,
        platform_oriented: bool,
    ) -> Result<(), JsValue> {
        self.load(ImageSource::Bytes { bytes, mime }, platform_oriented)
    }

    /// Load a base64 `data:` URL.
    pub fn load_data_url(&mut self, url: String, platform_oriented: bool) -> Result<(), JsValue> {
        self.load(ImageSource::DataUrl(url), platform_oriented)
    }

    /// Load the result of `fetch_image`.
    pub fn load_fetched(
        &mut self,
        image: JsFetchedImage,
        platform_oriented: bool,
    ) -> Result<(), JsValue> {
        let (bytes, mime) = image.into_parts();
        self.load(ImageSource::Bytes { bytes, mime }, platform_oriented)
    }

    /// The upright, rotated image to show, as a `data:` URL.
    /// `undefined` before a load.
    pub fn image_data_url(&self) -> Result<Option<String>, JsValue> {
        match self.inner.image() {
            Some(image) => image
                .transformed
                .to_data_url()
                .map(Some)
                .map_err(|e| JsValue::from_str(&e.to_string())),
            None => Ok(None),
        }
    }

    /// Natural size of the shown image, or `undefined` before a load.
    pub fn image_size(&self) -> Result<JsValue, JsValue> {
        match self.inner.image() {
            Some(image) => to_js(&JsSize::from(image.transformed.size)),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    /// EXIF correction applied at load time, as `{ rotate, flip }`.
    pub fn exif_transform(&self) -> Result<JsValue, JsValue> {
        match self.inner.image() {
            Some(image) => to_js(&image.exif_transform),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    /// Report the laid-out size of the shown image. Returns true once the
    /// cropper is ready and has placed its rectangle.
    pub fn display_ready(&mut self, width: u32, height: u32) -> bool {
        self.inner.display_ready(Dimensions::new(width, height))
    }

    /// Report a new layout size, for example after a window resize. The
    /// rectangle is rescaled to keep covering the same part of the image.
    pub fn set_display_size(&mut self, width: u32, height: u32) {
        self.inner.set_display_size(Dimensions::new(width, height));
    }

    #[wasm_bindgen(getter)]
    pub fn is_ready(&self) -> bool {
        self.inner.is_ready()
    }

    #[wasm_bindgen(getter)]
    pub fn step_size(&self) -> u32 {
        self.inner.step_size()
    }

    /// `{ x1, y1, x2, y2 }` in display pixels.
    pub fn position(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.position())
    }

    /// Replace the rectangle. It is clipped to the image; the clipped
    /// rectangle is returned.
    pub fn set_position(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> Result<JsValue, JsValue> {
        let position = position_from_parts(x1, y1, x2, y2)
            .ok_or_else(|| JsValue::from_str("position must be finite"))?;
        to_js(&self.inner.set_position(position))
    }

    /// Put the rectangle back at its default place.
    pub fn reset_position(&mut self) -> Result<JsValue, JsValue> {
        self.inner.reset_position();
        to_js(&self.inner.position())
    }

    /// Scaled size limits, `{ minWidth, minHeight, maxWidth, maxHeight }`.
    pub fn limits(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.limits())
    }

    /// The user transform, including any pan from drag gestures.
    pub fn transform(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.transform())
    }

    /// Start a gesture. `kind` is `"move"`, `"resize"`, `"drag"` or
    /// `"pinch"`; `handle` names the grip for resizes (`"left"`,
    /// `"topright"`, ...).
    ///
    /// # Errors
    ///
    /// Throws if another gesture is active, the cropper is disabled, or the
    /// gesture is not allowed.
    pub fn begin_gesture(
        &mut self,
        kind: &str,
        handle: Option<String>,
        x: f64,
        y: f64,
    ) -> Result<(), JsValue> {
        let kind: MoveKind = parse_name(kind).map_err(|e| JsValue::from_str(&e))?;
        let handle: Option<Handle> = handle
            .as_deref()
            .map(parse_name)
            .transpose()
            .map_err(|e| JsValue::from_str(&e))?;
        self.inner
            .begin_gesture(kind, handle, Point::new(x, y))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Start a two-finger pinch around the rectangle's centre.
    pub fn begin_pinch(&mut self) -> Result<(), JsValue> {
        self.inner
            .begin_pinch()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Feed a pointer position. Resolves to the new rectangle, or
    /// `undefined` when no gesture is active.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> Result<JsValue, JsValue> {
        match self.inner.pointer_move(Point::new(x, y)) {
            Some(position) => to_js(&position),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    /// Feed the current pinch scale, relative to the start of the pinch.
    pub fn pinch_move(&mut self, scale: f64) -> Result<JsValue, JsValue> {
        match self.inner.pinch_move(scale) {
            Some(position) => to_js(&position),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    /// Finish the active gesture. Resolves to
    /// `{ type: "cropChanged" | "transformChanged", value }`, or
    /// `undefined` when nothing was active.
    pub fn end_gesture(&mut self) -> Result<JsValue, JsValue> {
        match self.inner.end_gesture() {
            Some(outcome) => to_js(&outcome),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    /// Handle a `keydown`. Resolves like `end_gesture` when the key moved
    /// the rectangle, otherwise `undefined`.
    pub fn key_input(&mut self, key: &str, shift: bool, alt: bool) -> Result<JsValue, JsValue> {
        let outcome = self
            .inner
            .key_input(key, shift, alt)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        match outcome {
            Some(outcome) => to_js(&outcome),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    /// Render the current crop. `undefined` while not ready.
    pub fn crop(&self) -> Result<Option<JsCropOutput>, JsValue> {
        self.inner
            .crop()
            .map(|output| output.map(JsCropOutput::from_output))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Like `crop`, but only when the `autoCrop` setting is on.
    pub fn auto_crop(&self) -> Result<Option<JsCropOutput>, JsValue> {
        self.inner
            .auto_crop()
            .map(|output| output.map(JsCropOutput::from_output))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl ImageCropper {
    fn load(&mut self, source: ImageSource, platform_oriented: bool) -> Result<(), JsValue> {
        let ticket = self.inner.begin_load();
        let loaded = normalize(
            source,
            self.inner.settings(),
            LoadOptions { platform_oriented },
        );
        self.inner.finish_load(ticket, loaded).map(|_| ()).map_err(|e| {
            let message = JsValue::from_str(&e.to_string());
            web_sys::console::error_1(&message);
            message
        })
    }
}
