//! Play-field geometry: distances, steering, path proximity, obstacle
//! occlusion, and tower placement validation.
//!
//! All functions are pure and operate in play-field pixels.

pub mod los;
pub mod path;
pub mod placement;

pub use los::{line_of_sight, visible_range_polygon, VisibleRange};
pub use path::{distance, distance_to_segment, move_toward, near_path};
pub use placement::{is_valid_placement, snap_to_grid, valid_placement_zones, PlacementZones};

use bulwark_core::types::Position;
use glam::DVec2;

pub(crate) fn vec(p: Position) -> DVec2 {
    DVec2::new(p.x, p.y)
}

pub(crate) fn pos(v: DVec2) -> Position {
    Position::new(v.x, v.y)
}
