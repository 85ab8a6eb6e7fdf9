//! Passive resource generation from resource towers.

use hecs::World;

use bulwark_core::constants::INCOME_AMOUNT;
use bulwark_core::enums::{TowerKind, UpgradeEffect};
use bulwark_core::modifiers::income_factor;

use crate::components::{RunState, Tower};
use crate::systems::towers::income_due;

/// Grant income for every resource tower when the timer has elapsed.
/// Returns the amount granted.
pub fn run(world: &World, run: &mut RunState, upgrades: &[UpgradeEffect], now: f64) -> f64 {
    let levels: Vec<u8> = world
        .query::<&Tower>()
        .iter()
        .filter(|(_, t)| t.kind == TowerKind::Resource)
        .map(|(_, t)| t.level)
        .collect();
    if levels.is_empty() || !income_due(run, now) {
        return 0.0;
    }
    let base: f64 = levels
        .iter()
        .map(|&level| INCOME_AMOUNT * f64::from(level + 1))
        .sum();
    let amount = base * income_factor(upgrades.iter().copied());
    run.resources += amount;
    run.last_income = Some(now);
    amount
}
