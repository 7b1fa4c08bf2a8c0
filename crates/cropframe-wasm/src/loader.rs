//! Browser-side loading helpers.
//!
//! - [`fetch_image`] - Download a remote image anonymously (CORS, no cookies)
//! - [`wait_for_display_size`] - Poll an element until the browser has laid it out
//!
//! # Example
//!
//! ```typescript
//! import { fetch_image, wait_for_display_size, ImageCropper } from '@cropframe/wasm';
//!
//! const cropper = new ImageCropper({ aspectRatio: 4 / 3 });
//! cropper.load_fetched(await fetch_image(url), false);
//! img.src = cropper.image_data_url();
//! const size = await wait_for_display_size(img);
//! cropper.display_ready(size.width, size.height);
//! ```

use cropframe_core::cropper::{Readiness, ReadinessPoll, READINESS_INTERVAL_MS};
use cropframe_core::decode::{is_valid_image_type, sniff_mime, LoadError};
use cropframe_core::geometry::Dimensions;
use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlElement, Request, RequestCredentials, RequestInit, RequestMode, Response};

use crate::types::{to_js, JsFetchedImage, JsSize};

/// Fetch a remote image.
///
/// The request is made in CORS mode without credentials, so the server must
/// allow anonymous cross-origin access. When the response has no usable
/// image `Content-Type`, the type is guessed from the bytes.
///
/// # Errors
///
/// Rejects if the request fails or the server answers with an error status.
#[wasm_bindgen]
pub async fn fetch_image(url: String) -> Result<JsFetchedImage, JsValue> {
    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::Cors);
    opts.set_credentials(RequestCredentials::Omit);

    let request = Request::new_with_str_and_init(&url, &opts).map_err(fetch_error)?;
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(fetch_error)?
        .dyn_into()?;

    if !response.ok() {
        let err = LoadError::Fetch(format!("HTTP {} for {}", response.status(), url));
        web_sys::console::error_1(&JsValue::from_str(&err.to_string()));
        return Err(JsValue::from_str(&err.to_string()));
    }

    let header = response
        .headers()
        .get("content-type")
        .ok()
        .flatten()
        .unwrap_or_default();
    let buffer = JsFuture::from(response.array_buffer()?)
        .await
        .map_err(fetch_error)?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();

    let mime = choose_mime(&header, &bytes);
    Ok(JsFetchedImage::new(bytes, mime))
}

/// Wait until `element` reports a non-zero size, checking every 50 ms.
///
/// Resolves to `{ width, height }`.
///
/// # Errors
///
/// Rejects once the retry budget is exhausted.
#[wasm_bindgen]
pub async fn wait_for_display_size(element: HtmlElement) -> Result<JsValue, JsValue> {
    let mut poll = ReadinessPoll::new();
    loop {
        let size = Dimensions::new(
            element.offset_width().max(0) as u32,
            element.offset_height().max(0) as u32,
        );
        match poll.check(size) {
            Ok(Readiness::Ready(size)) => return to_js(&JsSize::from(size)),
            Ok(Readiness::Retry) => TimeoutFuture::new(READINESS_INTERVAL_MS).await,
            Err(err) => {
                web_sys::console::warn_1(&JsValue::from_str(&err.to_string()));
                return Err(JsValue::from_str(&err.to_string()));
            }
        }
    }
}

/// Prefer the server's type when it is an accepted image type.
fn choose_mime(header: &str, bytes: &[u8]) -> String {
    if is_valid_image_type(header) {
        return header.to_string();
    }
    sniff_mime(bytes)
        .map(str::to_string)
        .unwrap_or_else(|| header.to_string())
}

fn fetch_error(value: JsValue) -> JsValue {
    let detail = value
        .as_string()
        .unwrap_or_else(|| format!("{:?}", value));
    let err = LoadError::Fetch(detail);
    web_sys::console::error_1(&JsValue::from_str(&err.to_string()));
    JsValue::from_str(&err.to_string())
}
