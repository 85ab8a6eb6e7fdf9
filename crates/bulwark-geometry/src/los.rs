//! Line-of-sight against circular obstacles.
//!
//! Towers may only acquire targets they can see; the visible-range polygon
//! uses the same occlusion model for previews.

use std::f64::consts::TAU;

use bulwark_core::types::Position;
use glam::DVec2;

use crate::path::distance_to_segment;
use crate::{pos, vec};

/// Angular samples used by [`visible_range_polygon`].
pub const VISIBLE_RANGE_SAMPLES: usize = 360;

/// True iff no obstacle circle touches the segment `from..to`.
///
/// Tangency counts as blocked.
pub fn line_of_sight(from: Position, to: Position, obstacles: &[Position], obstacle_radius: f64) -> bool {
    obstacles
        .iter()
        .all(|&o| distance_to_segment(o, from, to) > obstacle_radius)
}

/// Lazily sampled outline of the area visible from `origin` within `radius`.
///
/// Each item is the end of one ray, clipped at the nearest obstacle edge.
pub fn visible_range_polygon<'a>(
    origin: Position,
    radius: f64,
    obstacles: &'a [Position],
    obstacle_radius: f64,
) -> VisibleRange<'a> {
    VisibleRange {
        origin: vec(origin),
        radius,
        obstacles,
        obstacle_radius,
        next: 0,
        samples: VISIBLE_RANGE_SAMPLES,
    }
}

/// Iterator returned by [`visible_range_polygon`].
#[derive(Debug, Clone)]
pub struct VisibleRange<'a> {
    origin: DVec2,
    radius: f64,
    obstacles: &'a [Position],
    obstacle_radius: f64,
    next: usize,
    samples: usize,
}

impl VisibleRange<'_> {
    /// Distance along unit ray `dir` to the first obstacle edge, if closer
    /// than the current clip. Obstacles containing the origin are ignored.
    fn clip(&self, dir: DVec2) -> f64 {
        let r_sq = self.obstacle_radius * self.obstacle_radius;
        self.obstacles.iter().fold(self.radius, |nearest, &o| {
            let m = self.origin - vec(o);
            let b = m.dot(dir);
            let c = m.length_squared() - r_sq;
            if c <= 0.0 || b > 0.0 {
                return nearest;
            }
            let disc = b * b - c;
            if disc < 0.0 {
                return nearest;
            }
            let t = -b - disc.sqrt();
            if t < nearest {
                t
            } else {
                nearest
            }
        })
    }
}

impl Iterator for VisibleRange<'_> {
    type Item = Position;

    fn next(&mut self) -> Option<Position> {
        if self.next >= self.samples {
            return None;
        }
        let angle = TAU * self.next as f64 / self.samples as f64;
        self.next += 1;
        let dir = DVec2::from_angle(angle);
        Some(pos(self.origin + dir * self.clip(dir)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.samples - self.next;
        (n, Some(n))
    }
}

impl ExactSizeIterator for VisibleRange<'_> {}
