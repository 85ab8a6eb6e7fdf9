//! Distance and steering along the enemy path.

use bulwark_core::levels::LevelDef;
use bulwark_core::types::Position;

use crate::{pos, vec};

/// Euclidean distance.
pub fn distance(a: Position, b: Position) -> f64 {
    vec(a).distance(vec(b))
}

/// Step from `current` toward `target` by at most `max_step`.
///
/// Returns `target` exactly when it is within reach, so callers can compare
/// against waypoints without accumulating overshoot.
pub fn move_toward(current: Position, target: Position, max_step: f64) -> Position {
    let from = vec(current);
    let to = vec(target);
    let d = from.distance(to);
    if d <= max_step {
        return target;
    }
    pos(from + (to - from) * (max_step / d))
}

/// Distance from `point` to the segment `start..end`.
pub fn distance_to_segment(point: Position, start: Position, end: Position) -> f64 {
    let p = vec(point);
    let a = vec(start);
    let ab = vec(end) - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Whether `point` lies strictly within `buffer` of any path segment.
pub fn near_path(point: Position, level: &LevelDef, buffer: f64) -> bool {
    level
        .segments()
        .any(|(a, b)| distance_to_segment(point, a, b) < buffer)
}
