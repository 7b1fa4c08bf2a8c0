//! Drawing one raster into another through an affine transform.
//!
//! This is the software stand-in for `drawImage` on a transformed 2D
//! context. It uses inverse mapping: for each destination pixel centre we
//! find the source point that lands there and sample it. Source pixels
//! outside the source bounds contribute nothing, and sampled pixels are
//! composited source-over onto whatever the destination already holds.

use image::{Rgba, RgbaImage};

use super::Affine2;
use crate::geometry::Point;

/// Sampling used when drawing through a transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpolationFilter {
    /// Nearest source pixel. Exact for quarter turns and integer offsets.
    Nearest,
    /// Bilinear interpolation on premultiplied colour.
    #[default]
    Bilinear,
}

/// Draw `src` onto `dst`, placing source point `p` at `transform.apply(p)`.
///
/// Source pixel `(i, j)` covers the unit square `[i, i+1) x [j, j+1)`.
/// A singular transform draws nothing.
pub fn draw_image(
    dst: &mut RgbaImage,
    src: &RgbaImage,
    transform: &Affine2,
    filter: InterpolationFilter,
) {
    let Some(inverse) = transform.invert() else {
        return;
    };
    if src.width() == 0 || src.height() == 0 {
        return;
    }

    let (src_w, src_h) = (src.width() as f64, src.height() as f64);
    let (dst_w, dst_h) = dst.dimensions();

    for dst_y in 0..dst_h {
        for dst_x in 0..dst_w {
            let p = inverse.apply(Point::new(dst_x as f64 + 0.5, dst_y as f64 + 0.5));
            if p.x < 0.0 || p.x >= src_w || p.y < 0.0 || p.y >= src_h {
                continue;
            }

            let sample = match filter {
                InterpolationFilter::Nearest => *src.get_pixel(p.x as u32, p.y as u32),
                InterpolationFilter::Bilinear => sample_bilinear(src, p.x, p.y),
            };

            let target = dst.get_pixel_mut(dst_x, dst_y);
            *target = source_over(sample, *target);
        }
    }
}

/// Fill every pixel with `color`, replacing what was there.
pub fn fill(dst: &mut RgbaImage, color: Rgba<u8>) {
    for pixel in dst.pixels_mut() {
        *pixel = color;
    }
}

/// Get a pixel as premultiplied [r, g, b, a] in 0..=255.
#[inline]
fn get_premultiplied(image: &RgbaImage, px: u32, py: u32) -> [f64; 4] {
    let [r, g, b, a] = image.get_pixel(px, py).0;
    let alpha = a as f64 / 255.0;
    [
        r as f64 * alpha,
        g as f64 * alpha,
        b as f64 * alpha,
        a as f64,
    ]
}

/// Sample at `(x, y)` in pixel-square coordinates using bilinear
/// interpolation between the four nearest pixel centres.
///
/// Neighbours past the edge are clamped to the edge pixel, and colour is
/// interpolated premultiplied so transparent pixels don't bleed.
fn sample_bilinear(image: &RgbaImage, x: f64, y: f64) -> Rgba<u8> {
    let max_x = image.width() - 1;
    let max_y = image.height() - 1;

    let u = (x - 0.5).clamp(0.0, max_x as f64);
    let v = (y - 0.5).clamp(0.0, max_y as f64);

    let x0 = u.floor() as u32;
    let y0 = v.floor() as u32;
    let x1 = (x0 + 1).min(max_x);
    let y1 = (y0 + 1).min(max_y);

    let fx = u - x0 as f64;
    let fy = v - y0 as f64;

    let p00 = get_premultiplied(image, x0, y0);
    let p10 = get_premultiplied(image, x1, y0);
    let p01 = get_premultiplied(image, x0, y1);
    let p11 = get_premultiplied(image, x1, y1);

    let mut mixed = [0.0f64; 4];
    for (i, value) in mixed.iter_mut().enumerate() {
        *value = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
    }

    let alpha = mixed[3];
    if alpha <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }
    let unpremultiply = |c: f64| (c * 255.0 / alpha).clamp(0.0, 255.0).round() as u8;
    Rgba([
        unpremultiply(mixed[0]),
        unpremultiply(mixed[1]),
        unpremultiply(mixed[2]),
        alpha.clamp(0.0, 255.0).round() as u8,
    ])
}

/// Porter-Duff source-over on straight (non-premultiplied) RGBA.
fn source_over(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    match (src.0[3], dst.0[3]) {
        (0, _) => dst,
        (255, _) | (_, 0) => src,
        (sa, da) => {
            let sa = sa as f64 / 255.0;
            let da = da as f64 / 255.0;
            let out_a = sa + da * (1.0 - sa);
            let channel = |s: u8, d: u8| {
                let c = (s as f64 * sa + d as f64 * da * (1.0 - sa)) / out_a;
                c.clamp(0.0, 255.0).round() as u8
            };
            Rgba([
                channel(src.0[0], dst.0[0]),
                channel(src.0[1], dst.0[1]),
                channel(src.0[2], dst.0[2]),
                (out_a * 255.0).round() as u8,
            ])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x * 10) as u8, (y * 10) as u8, 7, 255])
        })
    }

    #[test]
    fn test_identity_copies_exactly() {
        let src = gradient(6, 4);
        for filter in [InterpolationFilter::Nearest, InterpolationFilter::Bilinear] {
            let mut dst = RgbaImage::new(6, 4);
            draw_image(&mut dst, &src, &Affine2::IDENTITY, filter);
            assert_eq!(dst, src, "{:?}", filter);
        }
    }

    #[test]
    fn test_integer_translation_offsets_pixels() {
        let src = gradient(4, 4);
        let mut dst = RgbaImage::new(6, 6);
        draw_image(
            &mut dst,
            &src,
            &Affine2::translation(2.0, 1.0),
            InterpolationFilter::Bilinear,
        );
        assert_eq!(dst.get_pixel(0, 0).0[3], 0);
        assert_eq!(dst.get_pixel(2, 1), src.get_pixel(0, 0));
        assert_eq!(dst.get_pixel(5, 4), src.get_pixel(3, 3));
        assert_eq!(dst.get_pixel(5, 5).0[3], 0);
    }

    #[test]
    fn test_quarter_turn_about_center() {
        // 3x2 source rotated clockwise into a 2x3 canvas
        let src = gradient(3, 2);
        let m = Affine2::translation(1.0, 1.5)
            .rotate_degrees(90.0)
            .translate(-1.5, -1.0);
        let mut dst = RgbaImage::new(2, 3);
        draw_image(&mut dst, &src, &m, InterpolationFilter::Nearest);

        for y in 0..3 {
            for x in 0..2 {
                // clockwise: dst(x, y) = src(y, h - 1 - x)
                assert_eq!(dst.get_pixel(x, y), src.get_pixel(y, 1 - x));
            }
        }
    }

    #[test]
    fn test_mirror_flips_rows() {
        let src = gradient(4, 1);
        let m = Affine2::translation(4.0, 0.0).scale(-1.0, 1.0);
        let mut dst = RgbaImage::new(4, 1);
        draw_image(&mut dst, &src, &m, InterpolationFilter::Nearest);
        for x in 0..4 {
            assert_eq!(dst.get_pixel(x, 0), src.get_pixel(3 - x, 0));
        }
    }

    #[test]
    fn test_transparent_source_keeps_background() {
        let src = RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 0]));
        let mut dst = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 255, 255]));
        draw_image(&mut dst, &src, &Affine2::IDENTITY, InterpolationFilter::Bilinear);
        assert!(dst.pixels().all(|p| p.0 == [0, 0, 255, 255]));
    }

    #[test]
    fn test_source_over_half_alpha() {
        let out = source_over(Rgba([255, 255, 255, 128]), Rgba([0, 0, 0, 255]));
        assert_eq!(out.0[3], 255);
        assert_eq!(out.0[0], 128);
    }

    #[test]
    fn test_singular_transform_draws_nothing() {
        let src = gradient(2, 2);
        let mut dst = RgbaImage::new(2, 2);
        draw_image(
            &mut dst,
            &src,
            &Affine2::scaling(0.0, 0.0),
            InterpolationFilter::Nearest,
        );
        assert!(dst.pixels().all(|p| p.0 == [0, 0, 0, 0]));
    }

    #[test]
    fn test_fill() {
        let mut dst = RgbaImage::new(3, 3);
        fill(&mut dst, Rgba([1, 2, 3, 4]));
        assert!(dst.pixels().all(|p| p.0 == [1, 2, 3, 4]));
    }
}
