//! Tower update: effective stats, target revalidation and acquisition,
//! firing, and resource-tower income.

use hecs::{Entity, World};

use bulwark_core::constants::{INCOME_AMOUNT, INCOME_INTERVAL_MS};
use bulwark_core::content::ContentTables;
use bulwark_core::enums::{SpecialMechanic, TowerKind, UpgradeEffect};
use bulwark_core::modifiers::{income_factor, TowerStats};
use bulwark_core::types::{EnemyId, Position, TowerId};
use bulwark_geometry::{distance, line_of_sight};

use crate::components::{Enemy, IdAllocator, RunState, Tower};
use crate::run_setup::spawn_projectile;

/// What a tower can see of one enemy this tick.
#[derive(Debug, Clone, Copy)]
pub struct Sighting {
    pub entity: Entity,
    pub id: EnemyId,
    pub position: Position,
    pub alive: bool,
    pub cloaked: bool,
}

/// Enemies in spawn order, so acquisition ties resolve to the earliest.
pub fn sightings(world: &World) -> Vec<Sighting> {
    let mut out: Vec<Sighting> = world
        .query::<(&Enemy, &Position)>()
        .iter()
        .map(|(entity, (e, p))| Sighting {
            entity,
            id: e.id,
            position: *p,
            alive: e.is_alive(),
            cloaked: e.is_cloaked(),
        })
        .collect();
    out.sort_by_key(|s| s.id);
    out
}

/// Effective stats for a tower under the given upgrades and mechanic.
pub fn effective_stats(
    content: &ContentTables,
    kind: TowerKind,
    level: u8,
    upgrades: &[UpgradeEffect],
    mechanic: Option<SpecialMechanic>,
) -> TowerStats {
    TowerStats::base(content.towers.get(kind), level).modified(upgrades.iter().copied(), mechanic)
}

/// Obstacles that block sight, with the radius placement also uses.
#[derive(Debug, Clone, Copy)]
pub struct Cover<'a> {
    pub obstacles: &'a [Position],
    pub radius: f64,
}

impl<'a> Cover<'a> {
    pub fn new(obstacles: &'a [Position], radius: f64) -> Self {
        Self { obstacles, radius }
    }

    fn can_see(&self, from: Position, to: Position) -> bool {
        line_of_sight(from, to, self.obstacles, self.radius)
    }
}

/// A current target stays valid while alive, in range and visible.
/// Cloaking only prevents new acquisition.
fn still_valid(from: Position, range: f64, target: &Sighting, cover: Cover<'_>) -> bool {
    target.alive && distance(from, target.position) <= range && cover.can_see(from, target.position)
}

/// Nearest alive, uncloaked, visible enemy within `range`; first found wins ties.
pub fn acquire(from: Position, range: f64, enemies: &[Sighting], cover: Cover<'_>) -> Option<Entity> {
    let mut best: Option<(Entity, f64)> = None;
    for s in enemies {
        if !s.alive || s.cloaked {
            continue;
        }
        let d = distance(from, s.position);
        if d > range || best.is_some_and(|(_, bd)| d >= bd) {
            continue;
        }
        if cover.can_see(from, s.position) {
            best = Some((s.entity, d));
        }
    }
    best.map(|(e, _)| e)
}

/// Whether the shared income timer has elapsed.
pub fn income_due(run: &RunState, now: f64) -> bool {
    run.last_income.map_or(true, |t| now - t > INCOME_INTERVAL_MS)
}

struct Shot {
    tower: TowerId,
    origin: Position,
    target: Entity,
    damage: f64,
    kind: TowerKind,
}

/// Run the tower step. Returns the number of projectiles fired.
pub fn run(
    world: &mut World,
    run: &mut RunState,
    content: &ContentTables,
    upgrades: &[UpgradeEffect],
    ids: &mut IdAllocator,
    now: f64,
) -> usize {
    let enemies = sightings(world);
    let cover = Cover::new(&run.level.obstacles, content.placement.obstacle_radius);
    let mechanic = run.level.special_mechanic;
    let income_ready = income_due(run, now);
    let income = INCOME_AMOUNT * income_factor(upgrades.iter().copied());
    let mut shots = Vec::new();

    for (_entity, (tower, pos)) in world.query_mut::<(&mut Tower, &Position)>() {
        let stats = effective_stats(content, tower.kind, tower.level, upgrades, mechanic);

        let keep = tower
            .target
            .and_then(|t| enemies.iter().find(|s| s.entity == t))
            .is_some_and(|s| still_valid(*pos, stats.range, s, cover));
        if !keep {
            tower.target = acquire(*pos, stats.range, &enemies, cover);
        }

        if let Some(target) = tower.target {
            let ready = tower
                .last_fired
                .map_or(true, |t| now - t > stats.fire_interval_ms);
            if ready {
                shots.push(Shot {
                    tower: tower.id,
                    origin: *pos,
                    target,
                    damage: stats.damage,
                    kind: tower.kind,
                });
                tower.last_fired = Some(now);
            }
        }

        if tower.kind == TowerKind::Resource && income_ready {
            run.resources += income;
        }
    }

    shots.sort_by_key(|s| s.tower);
    let fired = shots.len();
    for shot in shots {
        spawn_projectile(world, ids, shot.origin, shot.target, shot.damage, shot.kind);
    }
    fired
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_ground() -> Cover<'static> {
        Cover::new(&[], 0.0)
    }

    fn sighting(world: &mut World, id: u32, x: f64, y: f64, cloaked: bool) -> Sighting {
        Sighting {
            entity: world.reserve_entity(),
            id: EnemyId(id),
            position: Position::new(x, y),
            alive: true,
            cloaked,
        }
    }

    #[test]
    fn acquires_nearest_in_range() {
        let mut world = World::new();
        let enemies = [
            sighting(&mut world, 1, 60.0, 0.0, false),
            sighting(&mut world, 2, 30.0, 0.0, false),
            sighting(&mut world, 3, 200.0, 0.0, false),
        ];
        let got = acquire(Position::new(0.0, 0.0), 80.0, &enemies, open_ground());
        assert_eq!(got, Some(enemies[1].entity));
    }

    #[test]
    fn ties_go_to_first_found() {
        let mut world = World::new();
        let enemies = [
            sighting(&mut world, 1, 0.0, 40.0, false),
            sighting(&mut world, 2, 40.0, 0.0, false),
        ];
        let got = acquire(Position::new(0.0, 0.0), 80.0, &enemies, open_ground());
        assert_eq!(got, Some(enemies[0].entity));
    }

    #[test]
    fn skips_cloaked_and_dead() {
        let mut world = World::new();
        let mut dead = sighting(&mut world, 1, 10.0, 0.0, false);
        dead.alive = false;
        let enemies = [
            dead,
            sighting(&mut world, 2, 20.0, 0.0, true),
            sighting(&mut world, 3, 50.0, 0.0, false),
        ];
        let got = acquire(Position::new(0.0, 0.0), 80.0, &enemies, open_ground());
        assert_eq!(got, Some(enemies[2].entity));
    }

    #[test]
    fn obstacle_hides_close_enemy() {
        let mut world = World::new();
        let enemies = [sighting(&mut world, 1, 30.0, 0.0, false)];
        let rock = [Position::new(15.0, 15.0)];
        let cover = Cover::new(&rock, 20.0);
        assert_eq!(acquire(Position::new(0.0, 0.0), 80.0, &enemies, cover), None);
    }

    #[test]
    fn obstacle_radius_comes_from_cover() {
        let mut world = World::new();
        let enemies = [sighting(&mut world, 1, 30.0, 0.0, false)];
        // sightline passes 15 px from the rock centre
        let rock = [Position::new(15.0, 15.0)];
        let small = Cover::new(&rock, 10.0);
        assert_eq!(acquire(Position::new(0.0, 0.0), 80.0, &enemies, small), Some(enemies[0].entity));
        let large = Cover::new(&rock, 16.0);
        assert_eq!(acquire(Position::new(0.0, 0.0), 80.0, &enemies, large), None);
    }

    #[test]
    fn blocked_target_is_dropped() {
        let mut world = World::new();
        let target = sighting(&mut world, 1, 30.0, 0.0, false);
        let rock = [Position::new(15.0, 5.0)];
        assert!(still_valid(Position::new(0.0, 0.0), 80.0, &target, open_ground()));
        assert!(!still_valid(Position::new(0.0, 0.0), 80.0, &target, Cover::new(&rock, 20.0)));
    }

    #[test]
    fn range_is_inclusive() {
        let mut world = World::new();
        let enemies = [sighting(&mut world, 1, 80.0, 0.0, false)];
        assert!(acquire(Position::new(0.0, 0.0), 80.0, &enemies, open_ground()).is_some());
    }
}
