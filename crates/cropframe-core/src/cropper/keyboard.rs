//! Keyboard nudging of the crop rectangle.

use super::{Handle, MoveKind};
use crate::geometry::Point;

/// What a key press asks the cropper to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyboardAction {
    /// Digits 1 to 9 change the nudge distance.
    SetStepSize(u32),
    /// A one-step gesture: start, move by `delta`, stop.
    Nudge {
        kind: MoveKind,
        handle: Handle,
        delta: Point,
    },
}

/// Interpret a `KeyboardEvent.key` value.
///
/// Arrow keys move the rectangle by `step` pixels. With shift they resize the
/// edge on the arrow's side instead; with alt the opposite edge is used, so
/// shift+alt+Left pulls the right edge inwards. Any other key is ignored.
pub fn interpret_key(key: &str, shift: bool, alt: bool, step: u32) -> Option<KeyboardAction> {
    if let Ok(digit) = key.parse::<u32>() {
        return (1..=9)
            .contains(&digit)
            .then_some(KeyboardAction::SetStepSize(digit));
    }

    let step = step as f64;
    let (handle, delta) = match key {
        "ArrowUp" => (Handle::Top, Point::new(0.0, -step)),
        "ArrowRight" => (Handle::Right, Point::new(step, 0.0)),
        "ArrowDown" => (Handle::Bottom, Point::new(0.0, step)),
        "ArrowLeft" => (Handle::Left, Point::new(-step, 0.0)),
        _ => return None,
    };

    Some(KeyboardAction::Nudge {
        kind: if shift { MoveKind::Resize } else { MoveKind::Move },
        handle: if alt { handle.opposite() } else { handle },
        delta,
    })
}
