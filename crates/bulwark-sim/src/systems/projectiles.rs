//! Projectile homing and impact.

use hecs::{Entity, World};

use bulwark_core::constants::{PROJECTILE_HIT_RADIUS, REFERENCE_FRAME_MS};
use bulwark_core::content::ContentTables;
use bulwark_core::types::Position;
use bulwark_geometry::{distance, move_toward};

use crate::components::{Enemy, Projectile, RunState};
use crate::systems::damage::{apply_hit, HitOutcome};

/// Live position of `target`, or `None` if it is gone or dead.
fn target_position(world: &World, target: Entity) -> Option<Position> {
    let enemy = world.get::<&Enemy>(target).ok()?;
    if !enemy.is_alive() {
        return None;
    }
    world.get::<&Position>(target).ok().map(|p| *p)
}

/// Move every projectile and resolve hits, in firing order.
///
/// Projectiles are processed one at a time so a later projectile sees the
/// effect of an earlier one's hit within the same tick.
pub fn run(
    world: &mut World,
    run: &mut RunState,
    content: &ContentTables,
    now: f64,
    scaled_ms: f64,
    despawn_buffer: &mut Vec<Entity>,
) -> Vec<HitOutcome> {
    despawn_buffer.clear();
    let mut hits = Vec::new();

    let mut order: Vec<_> = world
        .query::<&Projectile>()
        .iter()
        .map(|(e, p)| (p.id, e))
        .collect();
    order.sort_by_key(|(id, _)| *id);

    for (_, entity) in order {
        let Ok(projectile) = world.get::<&Projectile>(entity).map(|p| (*p).clone()) else {
            continue;
        };
        let Some(target_pos) = target_position(world, projectile.target) else {
            despawn_buffer.push(entity);
            continue;
        };

        let step = projectile.speed * scaled_ms / REFERENCE_FRAME_MS;
        let new_pos = match world.get::<&mut Position>(entity) {
            Ok(mut pos) => {
                *pos = move_toward(*pos, target_pos, step);
                *pos
            }
            Err(_) => continue,
        };

        if distance(new_pos, target_pos) < PROJECTILE_HIT_RADIUS {
            hits.push(apply_hit(world, run, content, &projectile, now));
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
    hits
}
