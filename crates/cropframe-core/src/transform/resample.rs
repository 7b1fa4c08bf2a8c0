//! Hermite resampling.
//!
//! A weighted-area filter: every destination pixel averages the source
//! pixels inside an elliptical window around its projected position, each
//! weighted by the Hermite kernel `2w³ - 3w² + 1` of its normalized
//! distance. The same code path handles downscaling and upscaling.
//!
//! Colour contributions are scaled by source alpha so fully transparent
//! pixels don't bleed their (meaningless) colour into the result. Alpha
//! itself is averaged with the unscaled kernel weight.

use image::RgbaImage;

/// Resample `src` to `width` x `height` with the Hermite filter.
///
/// A zero-sized request yields an empty image; an empty source yields a
/// transparent image of the requested size.
pub fn resample_hermite(src: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    let (src_w, src_h) = src.dimensions();
    let mut out = RgbaImage::new(width, height);
    if width == 0 || height == 0 || src_w == 0 || src_h == 0 {
        return out;
    }

    let ratio_w = src_w as f64 / width as f64;
    let ratio_h = src_h as f64 / height as f64;
    let ratio_w_half = (ratio_w / 2.0).ceil();
    let ratio_h_half = (ratio_h / 2.0).ceil();

    let data = src.as_raw();

    for j in 0..height {
        let center_y = j as f64 * ratio_h;
        let yy_start = center_y.floor() as u32;
        let yy_stop = (((j + 1) as f64 * ratio_h).ceil() as u32).min(src_h);

        for i in 0..width {
            let center_x = i as f64 * ratio_w;
            let xx_start = center_x.floor() as u32;
            let xx_stop = (((i + 1) as f64 * ratio_w).ceil() as u32).min(src_w);

            let mut weights = 0.0;
            let mut weights_alpha = 0.0;
            let mut gx = [0.0f64; 4];

            for yy in yy_start..yy_stop {
                let dy = (center_y - yy as f64).abs() / ratio_h_half;
                let w0 = dy * dy;

                for xx in xx_start..xx_stop {
                    let dx = (center_x - xx as f64).abs() / ratio_w_half;
                    let w = (w0 + dx * dx).sqrt();
                    if w >= 1.0 {
                        continue;
                    }

                    let mut weight = 2.0 * w * w * w - 3.0 * w * w + 1.0;
                    let pos = 4 * (xx as usize + yy as usize * src_w as usize);
                    let alpha = data[pos + 3];

                    gx[3] += weight * alpha as f64;
                    weights_alpha += weight;

                    if alpha < 255 {
                        weight *= alpha as f64 / 255.0;
                    }
                    gx[0] += weight * data[pos] as f64;
                    gx[1] += weight * data[pos + 1] as f64;
                    gx[2] += weight * data[pos + 2] as f64;
                    weights += weight;
                }
            }

            let pixel = out.get_pixel_mut(i, j);
            if weights_alpha <= 0.0 {
                // No source pixel inside the window; take the nearest one
                let sx = xx_start.min(src_w - 1);
                let sy = yy_start.min(src_h - 1);
                *pixel = *src.get_pixel(sx, sy);
                continue;
            }

            // All contributors transparent: colour is undefined, leave it black
            if weights > 0.0 {
                for c in 0..3 {
                    pixel.0[c] = to_channel(gx[c] / weights);
                }
            }
            pixel.0[3] = to_channel(gx[3] / weights_alpha);
        }
    }

    out
}

/// Resample a raw RGBA buffer.
///
/// Returns `None` if `pixels` is not `src_width * src_height * 4` bytes long.
pub fn resample_pixels(
    pixels: &[u8],
    src_width: u32,
    src_height: u32,
    width: u32,
    height: u32,
) -> Option<Vec<u8>> {
    let src = RgbaImage::from_raw(src_width, src_height, pixels.to_vec())?;
    Some(resample_hermite(&src, width, height).into_raw())
}

#[inline]
fn to_channel(value: f64) -> u8 {
    value.clamp(0.0, 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_same_size_is_identity() {
        let src = RgbaImage::from_fn(5, 4, |x, y| Rgba([(x * 40) as u8, (y * 60) as u8, 3, 255]));
        let out = resample_hermite(&src, 5, 4);
        assert_eq!(out, src);
    }

    #[test]
    fn test_downscale_averages() {
        // Two columns, black and white, to one column
        let src = RgbaImage::from_fn(2, 1, |x, _| {
            let v = if x == 0 { 0 } else { 255 };
            Rgba([v, v, v, 255])
        });
        let out = resample_hermite(&src, 1, 1);
        // ratio 2, half 1: pixel 0 has w = 0, pixel 1 has w = 1 (excluded)
        assert_eq!(out.get_pixel(0, 0).0, [0, 0, 0, 255]);
    }

    #[test]
    fn test_upscale_dimensions() {
        let src = RgbaImage::from_pixel(3, 2, Rgba([9, 8, 7, 255]));
        let out = resample_hermite(&src, 7, 5);
        assert_eq!(out.dimensions(), (7, 5));
        assert!(out.pixels().all(|p| p.0 == [9, 8, 7, 255]));
    }

    #[test]
    fn test_transparent_pixels_do_not_bleed() {
        // Opaque red next to transparent green
        let src = RgbaImage::from_fn(4, 1, |x, _| {
            if x < 2 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 255, 0, 0])
            }
        });
        let out = resample_hermite(&src, 2, 1);
        let right = out.get_pixel(1, 0).0;
        // Colour can only come from red; alpha is partially covered
        assert_eq!(right[1], 0);
        assert!(right[3] < 255);
    }

    #[test]
    fn test_zero_sized_request() {
        let src = RgbaImage::from_pixel(3, 3, Rgba([1, 1, 1, 255]));
        assert_eq!(resample_hermite(&src, 0, 5).dimensions(), (0, 5));
    }

    #[test]
    fn test_resample_pixels_checks_length() {
        assert!(resample_pixels(&[0u8; 15], 2, 2, 1, 1).is_none());
        let out = resample_pixels(&[200u8; 16], 2, 2, 1, 1).unwrap();
        assert_eq!(out, vec![200, 200, 200, 200]);
    }
}
