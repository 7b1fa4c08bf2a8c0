//! Crop rectangle rules.
//!
//! Every function here is pure: it takes the current rectangle (and the
//! session snapshot where relevant) and returns the next one. Nothing is
//! clamped implicitly; callers follow a move or resize with [`clamp`].
//!
//! `bounds` is always the displayed image size, and all coordinates are in
//! display pixels.

use super::Handle;
use crate::geometry::{CropperPosition, Dimensions, Point};
use crate::settings::{CropperSettings, ScaledLimits};

/// The default rectangle for a freshly displayed image.
///
/// A static size anchors at the top-left corner. Otherwise the rectangle is
/// as large as the limits allow and, with a fixed aspect ratio, centred on
/// the axis that has room to spare.
pub fn reset(
    display: Dimensions,
    settings: &CropperSettings,
    limits: &ScaledLimits,
) -> CropperPosition {
    let (width, height) = (display.width_f64(), display.height_f64());

    if settings.has_static_size() {
        return CropperPosition::new(
            0.0,
            0.0,
            settings.cropper_static_width.min(width),
            settings.cropper_static_height.min(height),
        );
    }

    let cropper_width = limits.max_width.min(width);
    let cropper_height = limits.max_height.min(height);

    if !settings.maintain_aspect_ratio {
        let position = CropperPosition::new(0.0, 0.0, cropper_width, cropper_height);
        return match settings.active_aspect_range() {
            Some(range) => match range.snap(position.aspect_ratio()) {
                Some(ratio) => check_aspect_ratio(Handle::BottomRight, &position, display, ratio),
                None => position,
            },
            None => position,
        };
    }

    let aspect = settings.aspect_ratio;
    if width / aspect < height {
        let h = cropper_width / aspect;
        let y1 = (height - h) / 2.0;
        CropperPosition::new(0.0, y1, cropper_width, y1 + h)
    } else {
        let w = cropper_height * aspect;
        let x1 = (width - w) / 2.0;
        CropperPosition::new(x1, 0.0, x1 + w, cropper_height)
    }
}

/// Translate the starting rectangle by the pointer travel.
pub fn move_by(start: &CropperPosition, delta: Point) -> CropperPosition {
    start.translated(delta.x, delta.y)
}

/// Drag an edge or corner handle.
///
/// The dragged edges follow the pointer relative to `start`, but never so
/// far that the rectangle leaves the size limits; the stationary edges are
/// read from `current`. With a fixed aspect ratio (or an aspect range that
/// the result falls outside of) the dependent axis is re-derived afterwards.
pub fn resize(
    handle: Handle,
    start: &CropperPosition,
    current: &CropperPosition,
    delta: Point,
    bounds: Dimensions,
    settings: &CropperSettings,
    limits: &ScaledLimits,
) -> CropperPosition {
    let mut pos = *current;

    let left = |pos: &mut CropperPosition| {
        pos.x1 = (start.x1 + delta.x)
            .max(pos.x2 - limits.max_width)
            .min(pos.x2 - limits.min_width);
    };
    let right = |pos: &mut CropperPosition| {
        pos.x2 = (start.x2 + delta.x)
            .min(pos.x1 + limits.max_width)
            .max(pos.x1 + limits.min_width);
    };
    let top = |pos: &mut CropperPosition| {
        pos.y1 = (start.y1 + delta.y)
            .max(pos.y2 - limits.max_height)
            .min(pos.y2 - limits.min_height);
    };
    let bottom = |pos: &mut CropperPosition| {
        pos.y2 = (start.y2 + delta.y)
            .min(pos.y1 + limits.max_height)
            .max(pos.y1 + limits.min_height);
    };

    match handle {
        Handle::Left => left(&mut pos),
        Handle::TopLeft => {
            left(&mut pos);
            top(&mut pos);
        }
        Handle::Top => top(&mut pos),
        Handle::TopRight => {
            right(&mut pos);
            top(&mut pos);
        }
        Handle::Right => right(&mut pos),
        Handle::BottomRight => {
            right(&mut pos);
            bottom(&mut pos);
        }
        Handle::Bottom => bottom(&mut pos),
        Handle::BottomLeft => {
            left(&mut pos);
            bottom(&mut pos);
        }
        Handle::Center => return *current,
    }

    match target_ratio(&pos, settings) {
        Some(ratio) => check_aspect_ratio(handle, &pos, bounds, ratio),
        None => pos,
    }
}

/// Scale the starting rectangle around its centre.
///
/// The new size is clamped to the limits, then the rectangle is shifted (not
/// shrunk) back inside the bounds before the aspect ratio is reconciled.
pub fn pinch(
    start: &CropperPosition,
    scale: f64,
    bounds: Dimensions,
    settings: &CropperSettings,
    limits: &ScaledLimits,
) -> CropperPosition {
    let center = start.center();
    let new_width = (start.width().abs() * scale)
        .max(limits.min_width)
        .min(limits.max_width);
    let new_height = (start.height().abs() * scale)
        .max(limits.min_height)
        .min(limits.max_height);

    let mut pos = CropperPosition::new(
        center.x - new_width / 2.0,
        center.y - new_height / 2.0,
        center.x + new_width / 2.0,
        center.y + new_height / 2.0,
    );

    let (max_x, max_y) = (bounds.width_f64(), bounds.height_f64());
    if pos.x1 < 0.0 {
        pos.x2 -= pos.x1;
        pos.x1 = 0.0;
    } else if pos.x2 > max_x {
        pos.x1 -= pos.x2 - max_x;
        pos.x2 = max_x;
    }
    if pos.y1 < 0.0 {
        pos.y2 -= pos.y1;
        pos.y1 = 0.0;
    } else if pos.y2 > max_y {
        pos.y1 -= pos.y2 - max_y;
        pos.y2 = max_y;
    }

    match target_ratio(&pos, settings) {
        Some(ratio) => check_aspect_ratio(Handle::Center, &pos, bounds, ratio),
        None => pos,
    }
}

/// The ratio a resized rectangle must be forced to, if any.
fn target_ratio(pos: &CropperPosition, settings: &CropperSettings) -> Option<f64> {
    if settings.maintain_aspect_ratio {
        Some(settings.aspect_ratio)
    } else {
        settings
            .active_aspect_range()
            .and_then(|range| range.snap(pos.aspect_ratio()))
    }
}

/// Force `ratio` onto the rectangle, anchored at the edges `handle` does not
/// move, then pull it back inside `bounds`.
///
/// When both axes overflow, the one whose overflow is larger in
/// ratio-scaled terms decides how far both moving edges retreat, so the
/// result keeps the ratio exactly.
pub fn check_aspect_ratio(
    handle: Handle,
    pos: &CropperPosition,
    bounds: Dimensions,
    ratio: f64,
) -> CropperPosition {
    let mut p = *pos;
    let (max_x, max_y) = (bounds.width_f64(), bounds.height_f64());

    // (x retreat, y retreat) for a pair of overflows
    let retreat = |overflow_x: f64, overflow_y: f64| {
        if overflow_y * ratio > overflow_x {
            (overflow_y * ratio, overflow_y)
        } else {
            (overflow_x, overflow_x / ratio)
        }
    };

    match handle {
        Handle::Top => {
            p.x2 = p.x1 + (p.y2 - p.y1) * ratio;
            let overflow_x = (p.x2 - max_x).max(0.0);
            let overflow_y = (-p.y1).max(0.0);
            if overflow_x > 0.0 || overflow_y > 0.0 {
                let (dx, dy) = retreat(overflow_x, overflow_y);
                p.x2 -= dx;
                p.y1 += dy;
            }
        }
        Handle::Bottom => {
            p.x2 = p.x1 + (p.y2 - p.y1) * ratio;
            let overflow_x = (p.x2 - max_x).max(0.0);
            let overflow_y = (p.y2 - max_y).max(0.0);
            if overflow_x > 0.0 || overflow_y > 0.0 {
                let (dx, dy) = retreat(overflow_x, overflow_y);
                p.x2 -= dx;
                p.y2 -= dy;
            }
        }
        Handle::TopLeft => {
            p.y1 = p.y2 - (p.x2 - p.x1) / ratio;
            let overflow_x = (-p.x1).max(0.0);
            let overflow_y = (-p.y1).max(0.0);
            if overflow_x > 0.0 || overflow_y > 0.0 {
                let (dx, dy) = retreat(overflow_x, overflow_y);
                p.x1 += dx;
                p.y1 += dy;
            }
        }
        Handle::TopRight => {
            p.y1 = p.y2 - (p.x2 - p.x1) / ratio;
            let overflow_x = (p.x2 - max_x).max(0.0);
            let overflow_y = (-p.y1).max(0.0);
            if overflow_x > 0.0 || overflow_y > 0.0 {
                let (dx, dy) = retreat(overflow_x, overflow_y);
                p.x2 -= dx;
                p.y1 += dy;
            }
        }
        Handle::Right | Handle::BottomRight => {
            p.y2 = p.y1 + (p.x2 - p.x1) / ratio;
            let overflow_x = (p.x2 - max_x).max(0.0);
            let overflow_y = (p.y2 - max_y).max(0.0);
            if overflow_x > 0.0 || overflow_y > 0.0 {
                let (dx, dy) = retreat(overflow_x, overflow_y);
                p.x2 -= dx;
                p.y2 -= dy;
            }
        }
        Handle::Left | Handle::BottomLeft => {
            p.y2 = p.y1 + (p.x2 - p.x1) / ratio;
            let overflow_x = (-p.x1).max(0.0);
            let overflow_y = (p.y2 - max_y).max(0.0);
            if overflow_x > 0.0 || overflow_y > 0.0 {
                let (dx, dy) = retreat(overflow_x, overflow_y);
                p.x1 += dx;
                p.y2 -= dy;
            }
        }
        Handle::Center => {
            p.x2 = p.x1 + (p.y2 - p.y1) * ratio;
            p.y2 = p.y1 + (p.x2 - p.x1) / ratio;
            let overflow_left = (-p.x1).max(0.0);
            let overflow_right = (p.x2 - max_x).max(0.0);
            let overflow_bottom = (p.y2 - max_y).max(0.0);
            let overflow_top = (-p.y1).max(0.0);
            if overflow_left > 0.0
                || overflow_right > 0.0
                || overflow_bottom > 0.0
                || overflow_top > 0.0
            {
                let (left_dx, bottom_dy) = retreat(overflow_left, overflow_bottom);
                let (right_dx, top_dy) = retreat(overflow_right, overflow_top);
                p.x1 += left_dx;
                p.x2 -= right_dx;
                p.y1 += top_dy;
                p.y2 -= bottom_dy;
            }
        }
    }

    p
}

/// Pull the rectangle back inside `bounds`.
///
/// With `maintain_size` an edge that crosses the boundary drags the opposite
/// edge along, so the rectangle is shifted; otherwise only the offending
/// edge moves and the rectangle shrinks. A rectangle larger than the bounds
/// ends up covering them exactly, and the result always satisfies
/// `0 <= x1 <= x2 <= width` and `0 <= y1 <= y2 <= height`.
pub fn clamp(pos: &CropperPosition, bounds: Dimensions, maintain_size: bool) -> CropperPosition {
    let mut p = *pos;
    let (max_x, max_y) = (bounds.width_f64(), bounds.height_f64());

    if p.x1 < 0.0 {
        if maintain_size {
            p.x2 -= p.x1;
        }
        p.x1 = 0.0;
    }
    if p.y1 < 0.0 {
        if maintain_size {
            p.y2 -= p.y1;
        }
        p.y1 = 0.0;
    }
    if p.x2 > max_x {
        if maintain_size {
            p.x1 -= p.x2 - max_x;
        }
        p.x2 = max_x;
    }
    if p.y2 > max_y {
        if maintain_size {
            p.y1 -= p.y2 - max_y;
        }
        p.y2 = max_y;
    }

    // max/min rather than f64::clamp: NaN input must not panic
    p.x1 = p.x1.max(0.0).min(max_x);
    p.x2 = p.x2.max(p.x1).min(max_x);
    p.y1 = p.y1.max(0.0).min(max_y);
    p.y2 = p.y2.max(p.y1).min(max_y);
    p
}

/// Scale a rectangle proportionally when the display size changes.
pub fn rescale(pos: &CropperPosition, from: Dimensions, to: Dimensions) -> CropperPosition {
    if from == to || from.is_empty() {
        return *pos;
    }
    let sx = to.width_f64() / from.width_f64();
    let sy = to.height_f64() / from.height_f64();
    CropperPosition::new(pos.x1 * sx, pos.y1 * sy, pos.x2 * sx, pos.y2 * sy)
}

/// Exact ratio comparison, used to decide whether an aspect change must
/// reset the rectangle.
pub fn aspect_ratio_is_correct(pos: &CropperPosition, ratio: f64) -> bool {
    pos.aspect_ratio() == ratio
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::AspectRatioRange;

    const EPS: f64 = 1e-9;

    fn limits(min: f64, max_w: f64, max_h: f64) -> ScaledLimits {
        ScaledLimits {
            min_width: min,
            min_height: min,
            max_width: max_w,
            max_height: max_h,
        }
    }

    fn free_settings() -> CropperSettings {
        let mut settings = CropperSettings::new();
        settings.maintain_aspect_ratio = false;
        settings
    }

    #[test]
    fn test_reset_square_on_landscape() {
        let settings = CropperSettings::new();
        let display = Dimensions::new(1000, 800);
        let limits = ScaledLimits::derive(&settings, display, Some(display));

        let pos = reset(display, &settings, &limits);
        assert_eq!(pos, CropperPosition::new(100.0, 0.0, 900.0, 800.0));
    }

    #[test]
    fn test_reset_wide_ratio_on_portrait() {
        let mut settings = CropperSettings::new();
        settings.aspect_ratio = 2.0;
        let display = Dimensions::new(400, 600);
        let limits = ScaledLimits::derive(&settings, display, Some(display));

        let pos = reset(display, &settings, &limits);
        assert_eq!(pos, CropperPosition::new(0.0, 200.0, 400.0, 400.0));
    }

    #[test]
    fn test_reset_static_size() {
        let mut settings = CropperSettings::new();
        settings.cropper_static_width = 300.0;
        settings.cropper_static_height = 200.0;
        let settings = settings.validated().unwrap();
        let display = Dimensions::new(500, 400);
        let limits = ScaledLimits::derive(&settings, display, Some(display));

        let pos = reset(display, &settings, &limits);
        assert_eq!(pos, CropperPosition::new(0.0, 0.0, 300.0, 200.0));
        assert!(settings.hide_resize_squares);
        assert!(!settings.maintain_aspect_ratio);
    }

    #[test]
    fn test_reset_static_size_larger_than_display() {
        let mut settings = CropperSettings::new();
        settings.cropper_static_width = 800.0;
        settings.cropper_static_height = 200.0;
        let settings = settings.validated().unwrap();

        let pos = reset(Dimensions::new(500, 400), &settings, &ScaledLimits::default());
        assert_eq!(pos, CropperPosition::new(0.0, 0.0, 500.0, 200.0));
    }

    #[test]
    fn test_reset_free_form_fills_limits() {
        let settings = free_settings();
        let pos = reset(
            Dimensions::new(500, 400),
            &settings,
            &limits(20.0, 300.0, 1000.0),
        );
        assert_eq!(pos, CropperPosition::new(0.0, 0.0, 300.0, 400.0));
    }

    #[test]
    fn test_reset_snaps_into_aspect_range() {
        let mut settings = free_settings();
        settings.aspect_ratio_range = Some(AspectRatioRange { min: 0.5, max: 1.0 });
        let display = Dimensions::new(500, 400);

        let pos = reset(display, &settings, &limits(20.0, 500.0, 400.0));
        // 500x400 is wider than 1:1; anchored top-left and pulled back to 400x400
        assert!((pos.aspect_ratio() - 1.0).abs() < EPS);
        assert_eq!(pos, CropperPosition::new(0.0, 0.0, 400.0, 400.0));
    }

    #[test]
    fn test_move_is_unclamped() {
        let start = CropperPosition::new(10.0, 10.0, 50.0, 50.0);
        let moved = move_by(&start, Point::new(-30.0, 5.0));
        assert_eq!(moved, CropperPosition::new(-20.0, 15.0, 20.0, 55.0));
    }

    #[test]
    fn test_right_handle_respects_max_width() {
        let settings = free_settings();
        let start = CropperPosition::new(0.0, 0.0, 200.0, 200.0);
        let pos = resize(
            Handle::Right,
            &start,
            &start,
            Point::new(50.0, 0.0),
            Dimensions::new(1000, 1000),
            &settings,
            &limits(20.0, 220.0, 1000.0),
        );
        assert_eq!(pos.x2, 220.0);
        assert_eq!(pos.x1, 0.0);
    }

    #[test]
    fn test_left_handle_respects_min_width() {
        let settings = free_settings();
        let start = CropperPosition::new(100.0, 0.0, 200.0, 100.0);
        let pos = resize(
            Handle::Left,
            &start,
            &start,
            Point::new(500.0, 0.0),
            Dimensions::new(1000, 1000),
            &settings,
            &limits(30.0, 1000.0, 1000.0),
        );
        assert_eq!(pos.x1, 170.0);
        assert_eq!(pos.x2, 200.0);
    }

    #[test]
    fn test_corner_moves_both_edges() {
        let settings = free_settings();
        let start = CropperPosition::new(100.0, 100.0, 200.0, 200.0);
        let pos = resize(
            Handle::TopLeft,
            &start,
            &start,
            Point::new(-10.0, -20.0),
            Dimensions::new(1000, 1000),
            &settings,
            &limits(20.0, 1000.0, 1000.0),
        );
        assert_eq!(pos, CropperPosition::new(90.0, 80.0, 200.0, 200.0));
    }

    #[test]
    fn test_aspect_follows_width_on_right_handle() {
        let mut settings = CropperSettings::new();
        settings.aspect_ratio = 2.0;
        let start = CropperPosition::new(0.0, 0.0, 200.0, 100.0);
        let pos = resize(
            Handle::Right,
            &start,
            &start,
            Point::new(100.0, 0.0),
            Dimensions::new(1000, 1000),
            &settings,
            &limits(20.0, 1000.0, 500.0),
        );
        assert_eq!(pos, CropperPosition::new(0.0, 0.0, 300.0, 150.0));
    }

    #[test]
    fn test_aspect_overflow_pulls_back_both_edges() {
        let settings = CropperSettings::new();
        let bounds = Dimensions::new(300, 200);
        let start = CropperPosition::new(0.0, 100.0, 80.0, 180.0);
        // Width 150 would need height 150 from y1 = 100: 50 past the bottom
        let pos = resize(
            Handle::BottomRight,
            &start,
            &start,
            Point::new(70.0, 0.0),
            bounds,
            &settings,
            &limits(20.0, 200.0, 200.0),
        );
        assert!((pos.width() - pos.height()).abs() < EPS);
        assert_eq!(pos.y2, 200.0);
        assert_eq!(pos.x2, 100.0);
    }

    #[test]
    fn test_aspect_range_snaps_to_nearest_bound() {
        let mut settings = free_settings();
        settings.aspect_ratio_range = Some(AspectRatioRange { min: 0.5, max: 2.0 });
        let start = CropperPosition::new(0.0, 0.0, 100.0, 100.0);

        // 300 wide by 100 tall is ratio 3, snapped to 2 via the bottom edge
        let pos = resize(
            Handle::Right,
            &start,
            &start,
            Point::new(200.0, 0.0),
            Dimensions::new(1000, 1000),
            &settings,
            &limits(20.0, 1000.0, 1000.0),
        );
        assert_eq!(pos, CropperPosition::new(0.0, 0.0, 300.0, 150.0));

        // Inside the band nothing is forced
        let pos = resize(
            Handle::Right,
            &start,
            &start,
            Point::new(50.0, 0.0),
            Dimensions::new(1000, 1000),
            &settings,
            &limits(20.0, 1000.0, 1000.0),
        );
        assert_eq!(pos, CropperPosition::new(0.0, 0.0, 150.0, 100.0));
    }

    #[test]
    fn test_pinch_scales_around_center() {
        let settings = free_settings();
        let start = CropperPosition::new(100.0, 100.0, 200.0, 200.0);
        let pos = pinch(
            &start,
            2.0,
            Dimensions::new(1000, 1000),
            &settings,
            &limits(20.0, 1000.0, 1000.0),
        );
        assert_eq!(pos, CropperPosition::new(50.0, 50.0, 250.0, 250.0));
    }

    #[test]
    fn test_pinch_shifts_into_bounds() {
        let settings = free_settings();
        let start = CropperPosition::new(0.0, 0.0, 100.0, 100.0);
        let pos = pinch(
            &start,
            1.5,
            Dimensions::new(400, 400),
            &settings,
            &limits(20.0, 400.0, 400.0),
        );
        assert_eq!(pos, CropperPosition::new(0.0, 0.0, 150.0, 150.0));
    }

    #[test]
    fn test_pinch_clamped_to_min() {
        let settings = free_settings();
        let start = CropperPosition::new(100.0, 100.0, 200.0, 200.0);
        let pos = pinch(
            &start,
            0.01,
            Dimensions::new(1000, 1000),
            &settings,
            &limits(40.0, 1000.0, 1000.0),
        );
        assert_eq!(pos, CropperPosition::new(130.0, 130.0, 170.0, 170.0));
    }

    #[test]
    fn test_clamp_shift_keeps_size() {
        let pos = CropperPosition::new(-20.0, 350.0, 80.0, 450.0);
        let clamped = clamp(&pos, Dimensions::new(400, 400), true);
        assert_eq!(clamped, CropperPosition::new(0.0, 300.0, 100.0, 400.0));
    }

    #[test]
    fn test_clamp_shrink_moves_only_offending_edge() {
        let pos = CropperPosition::new(-20.0, 350.0, 80.0, 450.0);
        let clamped = clamp(&pos, Dimensions::new(400, 400), false);
        assert_eq!(clamped, CropperPosition::new(0.0, 350.0, 80.0, 400.0));
    }

    #[test]
    fn test_clamp_oversized_covers_bounds() {
        let pos = CropperPosition::new(-10.0, -10.0, 600.0, 600.0);
        let clamped = clamp(&pos, Dimensions::new(400, 300), true);
        assert_eq!(clamped, CropperPosition::new(0.0, 0.0, 400.0, 300.0));
    }

    #[test]
    fn test_rescale() {
        let pos = CropperPosition::new(10.0, 20.0, 110.0, 120.0);
        let scaled = rescale(&pos, Dimensions::new(200, 200), Dimensions::new(400, 100));
        assert_eq!(scaled, CropperPosition::new(20.0, 10.0, 220.0, 60.0));
        assert_eq!(
            rescale(&pos, Dimensions::new(0, 0), Dimensions::new(400, 100)),
            pos
        );
    }

    #[test]
    fn test_aspect_ratio_is_correct() {
        let pos = CropperPosition::new(0.0, 0.0, 200.0, 100.0);
        assert!(aspect_ratio_is_correct(&pos, 2.0));
        assert!(!aspect_ratio_is_correct(&pos, 1.0));
    }
}
