//! Stat modifiers: owned shop upgrades and per-level special mechanics.
//!
//! Every variant maps to an explicit effect here, so adding a new upgrade
//! or mechanic is a compile error until its effect is decided.

use serde::{Deserialize, Serialize};

use crate::constants::{MAX_DIFFICULTY_TIER, WAVES_PER_TIER};
use crate::content::TowerTier;
use crate::enums::{SpecialMechanic, UpgradeEffect};

/// Effective combat stats of a tower after all multipliers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TowerStats {
    pub range: f64,
    pub damage: f64,
    pub fire_interval_ms: f64,
}

impl TowerStats {
    /// Unmodified stats of `tier` at upgrade `level`.
    pub fn base(tier: &TowerTier, level: u8) -> Self {
        let i = usize::from(level).min(2);
        Self {
            range: tier.range[i],
            damage: tier.damage[i],
            fire_interval_ms: tier.fire_interval_ms[i],
        }
    }

    /// Apply owned upgrades (in order) then the level mechanic.
    pub fn modified(
        mut self,
        upgrades: impl IntoIterator<Item = UpgradeEffect>,
        mechanic: Option<SpecialMechanic>,
    ) -> Self {
        for effect in upgrades {
            effect.apply_to_tower(&mut self);
        }
        if let Some(m) = mechanic {
            m.apply_to_tower(&mut self);
        }
        self
    }
}

/// Run-scoped starting values affected by upgrades.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunStart {
    pub resources: f64,
    pub lives: i32,
}

impl UpgradeEffect {
    pub fn apply_to_tower(self, stats: &mut TowerStats) {
        match self {
            UpgradeEffect::DamageBoost => stats.damage *= 1.2,
            UpgradeEffect::RangeBoost => stats.range *= 1.15,
            UpgradeEffect::RapidFire => stats.fire_interval_ms *= 0.8,
            UpgradeEffect::TowerMaster => {
                stats.damage *= 1.5;
                stats.range *= 1.5;
                stats.fire_interval_ms *= 0.5;
            }
            UpgradeEffect::EconomicBoost
            | UpgradeEffect::StartingCapital
            | UpgradeEffect::Reinforcements
            | UpgradeEffect::TimeLord
            | UpgradeEffect::DivineProtection => {}
        }
    }

    /// Multiplier on resource income.
    pub fn income_factor(self) -> f64 {
        match self {
            UpgradeEffect::EconomicBoost => 1.5,
            _ => 1.0,
        }
    }

    /// Adjust starting resources and lives when a level begins.
    pub fn apply_to_run_start(self, start: &mut RunStart) {
        match self {
            UpgradeEffect::StartingCapital => start.resources += 100.0,
            UpgradeEffect::Reinforcements => start.lives += 5,
            UpgradeEffect::DivineProtection => start.lives = 100,
            _ => {}
        }
    }
}

impl SpecialMechanic {
    pub fn apply_to_tower(self, stats: &mut TowerStats) {
        match self {
            SpecialMechanic::Sandstorm => stats.range *= 0.8,
            SpecialMechanic::CoastalWaves => stats.fire_interval_ms *= 1.1,
            SpecialMechanic::MagicFountains => stats.damage *= 1.25,
            SpecialMechanic::LavaShards
            | SpecialMechanic::SlipperyIce
            | SpecialMechanic::ConveyorBelts
            | SpecialMechanic::StoneDoors => {}
        }
    }

    /// Multiplier on enemy movement speed.
    pub fn enemy_speed_factor(self) -> f64 {
        match self {
            SpecialMechanic::SlipperyIce => 1.15,
            SpecialMechanic::ConveyorBelts => 1.20,
            _ => 1.0,
        }
    }
}

/// Combined income multiplier of all owned upgrades.
pub fn income_factor(upgrades: impl IntoIterator<Item = UpgradeEffect>) -> f64 {
    upgrades.into_iter().map(UpgradeEffect::income_factor).product()
}

/// Stat-table row for the given wave counter.
pub fn difficulty_tier(current_wave: u32) -> usize {
    ((current_wave / WAVES_PER_TIER) as usize).min(MAX_DIFFICULTY_TIER)
}
