//! Tower placement validation and preview sampling.

use bulwark_core::constants::GRID_SIZE;
use bulwark_core::content::PlacementRules;
use bulwark_core::levels::LevelDef;
use bulwark_core::types::Position;
use serde::{Deserialize, Serialize};

use crate::path::{distance, near_path};

/// Whether a tower may be placed at `position`.
///
/// Rejects points outside the interior margin, near the path, inside an
/// obstacle, or too close to an existing tower.
pub fn is_valid_placement(
    position: Position,
    towers: &[Position],
    level: &LevelDef,
    rules: &PlacementRules,
) -> bool {
    if !inside_margin(position, rules) {
        return false;
    }
    if blocked_by_terrain(position, level, rules) {
        return false;
    }
    towers
        .iter()
        .all(|&t| distance(position, t) >= rules.min_tower_distance)
}

fn inside_margin(p: Position, rules: &PlacementRules) -> bool {
    p.x >= rules.margin
        && p.x <= rules.field_width - rules.margin
        && p.y >= rules.margin
        && p.y <= rules.field_height - rules.margin
}

fn blocked_by_terrain(p: Position, level: &LevelDef, rules: &PlacementRules) -> bool {
    near_path(p, level, rules.path_buffer)
        || level
            .obstacles
            .iter()
            .any(|&o| distance(p, o) < rules.obstacle_radius)
}

/// Sampled placement preview.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlacementZones {
    pub valid: Vec<Position>,
    /// Points blocked by the path or an obstacle. Points rejected only for
    /// tower spacing appear in neither list.
    pub invalid: Vec<Position>,
}

/// Sample the interior on a `step` lattice and classify every point.
pub fn valid_placement_zones(
    level: &LevelDef,
    towers: &[Position],
    rules: &PlacementRules,
    step: f64,
) -> PlacementZones {
    let mut zones = PlacementZones::default();
    if step <= 0.0 {
        return zones;
    }
    let mut x = rules.margin;
    while x < rules.field_width - rules.margin {
        let mut y = rules.margin;
        while y < rules.field_height - rules.margin {
            let p = Position::new(x, y);
            if is_valid_placement(p, towers, level, rules) {
                zones.valid.push(p);
            } else if blocked_by_terrain(p, level, rules) {
                zones.invalid.push(p);
            }
            y += step;
        }
        x += step;
    }
    zones
}

/// Round to the nearest grid intersection.
pub fn snap_to_grid(position: Position) -> Position {
    Position::new(
        (position.x / GRID_SIZE).round() * GRID_SIZE,
        (position.y / GRID_SIZE).round() * GRID_SIZE,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use bulwark_core::constants::PLACEMENT_ZONE_STEP;
    use bulwark_core::content::ContentTables;

    fn level_one() -> LevelDef {
        ContentTables::default().level(1).unwrap().clone()
    }

    #[test]
    fn test_rejects_outside_margin() {
        let level = level_one();
        let rules = PlacementRules::default();
        assert!(!is_valid_placement(Position::new(10.0, 450.0), &[], &level, &rules));
        assert!(!is_valid_placement(Position::new(785.0, 450.0), &[], &level, &rules));
    }

    #[test]
    fn test_rejects_on_path() {
        let level = level_one();
        let rules = PlacementRules::default();
        assert!(!is_valid_placement(Position::new(100.0, 210.0), &[], &level, &rules));
    }

    #[test]
    fn test_rejects_inside_obstacle() {
        let level = level_one();
        let rules = PlacementRules::default();
        assert!(!is_valid_placement(Position::new(205.0, 45.0), &[], &level, &rules));
    }

    #[test]
    fn test_tower_spacing() {
        let level = level_one();
        let rules = PlacementRules::default();
        let open = Position::new(60.0, 450.0);
        assert!(is_valid_placement(open, &[], &level, &rules));
        assert!(!is_valid_placement(open, &[Position::new(80.0, 450.0)], &level, &rules));
        assert!(is_valid_placement(open, &[Position::new(100.0, 450.0)], &level, &rules));
    }

    #[test]
    fn test_zones_agree_with_validator() {
        let level = level_one();
        let rules = PlacementRules::default();
        let towers = [Position::new(60.0, 450.0)];
        let zones = valid_placement_zones(&level, &towers, &rules, PLACEMENT_ZONE_STEP);
        assert!(!zones.valid.is_empty());
        assert!(!zones.invalid.is_empty());
        for p in &zones.valid {
            assert!(is_valid_placement(*p, &towers, &level, &rules), "{p:?}");
        }
        // spacing-only rejections are in neither list
        let near_tower = Position::new(70.0, 450.0);
        assert!(!zones.valid.contains(&near_tower));
        assert!(!zones.invalid.contains(&near_tower));
    }

    #[test]
    fn test_snap_to_grid() {
        assert_eq!(snap_to_grid(Position::new(59.0, 21.0)), Position::new(40.0, 40.0));
        assert_eq!(snap_to_grid(Position::new(61.0, 79.0)), Position::new(80.0, 80.0));
    }
}
