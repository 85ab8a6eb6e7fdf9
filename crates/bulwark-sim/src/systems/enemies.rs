//! Enemy update: effect decay, stealth cycle, regeneration, path following,
//! and removal of dead or escaped enemies.

use hecs::{Entity, World};
use tracing::debug;

use bulwark_core::constants::*;
use bulwark_core::enums::{EffectKind, EnemyKind};
use bulwark_core::types::Position;
use bulwark_geometry::{distance, move_toward};

use crate::components::{Effect, Enemy, RunState};

/// Whether stealth enemies are in the cloaked half of their cycle.
pub fn cloak_window(now: f64) -> bool {
    (now / STEALTH_CYCLE_MS).floor() as u64 % 2 == 1
}

/// Effective speed after slow and level mechanic, per reference frame.
pub fn effective_speed(enemy: &Enemy, run: &RunState) -> f64 {
    let mut speed = enemy.speed;
    if let Some(slow) = enemy.slow_strength() {
        speed *= 1.0 - slow;
    }
    if let Some(mechanic) = run.level.special_mechanic {
        speed *= mechanic.enemy_speed_factor();
    }
    speed
}

fn refresh_cloak(enemy: &mut Enemy, now: f64) {
    enemy.effects.retain(|e| e.kind != EffectKind::Cloak);
    if enemy.kind == EnemyKind::Stealth && cloak_window(now) {
        enemy.effects.push(Effect {
            kind: EffectKind::Cloak,
            remaining_ms: STEALTH_CYCLE_MS - now.rem_euclid(STEALTH_CYCLE_MS),
            strength: CLOAK_STRENGTH,
        });
    }
}

fn regenerate(enemy: &mut Enemy, now: f64, scaled_ms: f64) {
    if enemy.kind != EnemyKind::Regen {
        return;
    }
    let rested = enemy
        .last_damaged
        .map_or(true, |t| now - t > REGEN_DELAY_MS);
    if rested {
        let heal = enemy.max_health * REGEN_FRACTION_PER_FRAME * scaled_ms / REFERENCE_FRAME_MS;
        enemy.health = (enemy.health + heal).min(enemy.max_health);
    }
}

/// Advance every enemy by `scaled_ms`. Returns the number that escaped.
///
/// Enemies already at zero health are removed first, so a credited kill
/// never also costs a life.
pub fn run(
    world: &mut World,
    run: &mut RunState,
    now: f64,
    scaled_ms: f64,
    despawn_buffer: &mut Vec<Entity>,
) -> u32 {
    despawn_buffer.clear();
    let mut escaped = 0;
    let frames = scaled_ms / REFERENCE_FRAME_MS;

    for (entity, (enemy, pos)) in world.query_mut::<(&mut Enemy, &mut Position)>() {
        enemy.effects.retain_mut(|e| {
            e.remaining_ms -= scaled_ms;
            e.remaining_ms > 0.0
        });

        if !enemy.is_alive() {
            despawn_buffer.push(entity);
            continue;
        }

        refresh_cloak(enemy, now);
        regenerate(enemy, now, scaled_ms);

        let Some(&next) = run.level.waypoints.get(enemy.waypoint_index + 1) else {
            run.lives -= 1;
            escaped += 1;
            debug!(enemy = %enemy.id, lives = run.lives, "enemy reached the end of the path");
            despawn_buffer.push(entity);
            continue;
        };

        let step = effective_speed(enemy, run) * frames;
        *pos = move_toward(*pos, next, step);
        if distance(*pos, next) < WAYPOINT_REACHED_RADIUS {
            enemy.waypoint_index += 1;
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
    escaped
}
