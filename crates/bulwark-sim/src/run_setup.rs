//! Entity spawn factories and level initialisation.

use std::collections::VecDeque;

use hecs::{Entity, World};

use bulwark_core::constants::PROJECTILE_SPEED;
use bulwark_core::content::ContentTables;
use bulwark_core::enums::{EnemyKind, TowerKind, UpgradeEffect};
use bulwark_core::levels::LevelDef;
use bulwark_core::modifiers::{difficulty_tier, RunStart};
use bulwark_core::types::{Position, TowerId};

use crate::components::*;

/// Clear the world and build fresh run state for `level`.
///
/// Starting resources and lives take owned upgrades into account, applied
/// in purchase order.
pub fn begin_run(world: &mut World, level: &LevelDef, upgrades: &[UpgradeEffect]) -> RunState {
    world.clear();

    let mut start = RunStart {
        resources: level.initial_resources,
        lives: level.initial_lives,
    };
    for effect in upgrades {
        effect.apply_to_run_start(&mut start);
    }

    RunState {
        level: level.clone(),
        resources: start.resources,
        lives: start.lives,
        score: 0,
        current_wave: 0,
        wave_in_progress: false,
        spawn_queue: VecDeque::new(),
        last_income: None,
    }
}

/// Spawn a level-0 tower.
pub fn spawn_tower(world: &mut World, ids: &mut IdAllocator, kind: TowerKind, position: Position) -> TowerId {
    let id = ids.tower();
    world.spawn((
        Tower {
            id,
            kind,
            level: 0,
            last_fired: None,
            target: None,
            upgrades: Vec::new(),
        },
        position,
    ));
    id
}

/// Spawn an enemy at the path origin with stats for the current wave tier.
pub fn spawn_enemy(
    world: &mut World,
    ids: &mut IdAllocator,
    content: &ContentTables,
    run: &RunState,
    kind: EnemyKind,
) -> Entity {
    let tier = difficulty_tier(run.current_wave);
    let stats = content.enemies.get(kind);
    let health = stats.health[tier];
    world.spawn((
        Enemy {
            id: ids.enemy(),
            kind,
            health,
            max_health: health,
            speed: stats.speed[tier],
            waypoint_index: 0,
            effects: Vec::new(),
            last_damaged: None,
        },
        run.level.spawn_point(),
    ))
}

/// Spawn a projectile at `origin` homing on `target`.
pub fn spawn_projectile(
    world: &mut World,
    ids: &mut IdAllocator,
    origin: Position,
    target: Entity,
    damage: f64,
    tower_kind: TowerKind,
) -> Entity {
    world.spawn((
        Projectile {
            id: ids.projectile(),
            target,
            damage,
            speed: PROJECTILE_SPEED,
            tower_kind,
        },
        origin,
    ))
}

/// Find a tower entity by id.
pub fn find_tower(world: &World, id: TowerId) -> Option<Entity> {
    world
        .query::<&Tower>()
        .iter()
        .find(|(_, t)| t.id == id)
        .map(|(e, _)| e)
}

/// Positions of all placed towers.
pub fn tower_positions(world: &World) -> Vec<Position> {
    world
        .query::<(&Tower, &Position)>()
        .iter()
        .map(|(_, (_, p))| *p)
        .collect()
}
