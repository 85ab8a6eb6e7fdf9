//! Snapshot views: read-only queries over the world, sorted by id.

use hecs::World;

use bulwark_core::content::ContentTables;
use bulwark_core::enums::{SpecialMechanic, UpgradeEffect};
use bulwark_core::state::*;
use bulwark_core::types::Position;

use crate::components::{Enemy, Projectile, Tower};
use crate::systems::towers::effective_stats;

pub fn tower_views(
    world: &World,
    content: &ContentTables,
    upgrades: &[UpgradeEffect],
    mechanic: Option<SpecialMechanic>,
) -> Vec<TowerView> {
    let mut views: Vec<TowerView> = world
        .query::<(&Tower, &Position)>()
        .iter()
        .map(|(_, (t, pos))| TowerView {
            id: t.id,
            kind: t.kind,
            position: *pos,
            level: t.level,
            range: effective_stats(content, t.kind, t.level, upgrades, mechanic).range,
            target: t
                .target
                .and_then(|e| world.get::<&Enemy>(e).ok().map(|enemy| enemy.id)),
            upgrades: t.upgrades.clone(),
        })
        .collect();
    views.sort_by_key(|v| v.id);
    views
}

pub fn enemy_views(world: &World) -> Vec<EnemyView> {
    let mut views: Vec<EnemyView> = world
        .query::<(&Enemy, &Position)>()
        .iter()
        .map(|(_, (e, pos))| EnemyView {
            id: e.id,
            kind: e.kind,
            position: *pos,
            health: e.health,
            max_health: e.max_health,
            speed: e.speed,
            waypoint_index: e.waypoint_index,
            effects: e
                .effects
                .iter()
                .map(|fx| EffectView {
                    kind: fx.kind,
                    remaining_ms: fx.remaining_ms,
                    strength: fx.strength,
                })
                .collect(),
        })
        .collect();
    views.sort_by_key(|v| v.id);
    views
}

pub fn projectile_views(world: &World) -> Vec<ProjectileView> {
    let mut views: Vec<ProjectileView> = world
        .query::<(&Projectile, &Position)>()
        .iter()
        .map(|(_, (p, pos))| ProjectileView {
            id: p.id,
            position: *pos,
            target: world.get::<&Enemy>(p.target).ok().map(|e| e.id),
            damage: p.damage,
            tower_kind: p.tower_kind,
        })
        .collect();
    views.sort_by_key(|v| v.id);
    views
}
