//! Damage resolution for a projectile hit.

use hecs::{Entity, World};
use tracing::debug;

use bulwark_core::constants::*;
use bulwark_core::content::ContentTables;
use bulwark_core::enums::{EffectKind, TowerKind};
use bulwark_core::modifiers::difficulty_tier;
use bulwark_core::types::Position;
use bulwark_geometry::distance;

use crate::components::{Effect, Enemy, Projectile, RunState};

/// Result of one hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitOutcome {
    /// Reward credited if the primary target died.
    pub reward: Option<u32>,
    pub splashed: usize,
}

/// Apply `projectile` to its target.
///
/// The kill reward is credited here, once, when the primary hit is lethal.
/// Splash victims take half damage but never trigger further splash and
/// never credit a reward.
pub fn apply_hit(
    world: &mut World,
    run: &mut RunState,
    content: &ContentTables,
    projectile: &Projectile,
    now: f64,
) -> HitOutcome {
    let mut outcome = HitOutcome {
        reward: None,
        splashed: 0,
    };

    let Ok((enemy, pos)) = world.query_one_mut::<(&mut Enemy, &Position)>(projectile.target) else {
        return outcome;
    };
    let centre = *pos;
    enemy.take_damage(projectile.damage, now);
    if projectile.tower_kind == TowerKind::Slow {
        enemy.effects.push(Effect {
            kind: EffectKind::Slow,
            remaining_ms: SLOW_DURATION_MS,
            strength: SLOW_STRENGTH,
        });
    }
    let lethal = !enemy.is_alive();
    let (kind, id) = (enemy.kind, enemy.id);

    if projectile.tower_kind == TowerKind::Area {
        outcome.splashed = splash(
            world,
            projectile.target,
            centre,
            projectile.damage * SPLASH_DAMAGE_FACTOR,
            now,
        );
    }

    if lethal {
        let reward = content.enemies.get(kind).reward[difficulty_tier(run.current_wave)];
        run.resources += f64::from(reward);
        run.score += u64::from(reward) * SCORE_PER_REWARD;
        outcome.reward = Some(reward);
        debug!(enemy = %id, reward, score = run.score, "enemy killed");
    }
    outcome
}

fn splash(world: &mut World, primary: Entity, centre: Position, damage: f64, now: f64) -> usize {
    let mut hit = 0;
    for (entity, (enemy, pos)) in world.query_mut::<(&mut Enemy, &Position)>() {
        if entity != primary && distance(*pos, centre) < SPLASH_RADIUS {
            enemy.take_damage(damage, now);
            hit += 1;
        }
    }
    hit
}
