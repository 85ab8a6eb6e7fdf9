//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// In-battle tower kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TowerKind {
    /// High single-target damage.
    Basic,
    /// Splash damage around the primary target.
    Area,
    /// Applies a timed slow on hit.
    Slow,
    /// Generates in-run currency on a timer.
    Resource,
}

impl TowerKind {
    pub const ALL: [TowerKind; 4] = [
        TowerKind::Basic,
        TowerKind::Area,
        TowerKind::Slow,
        TowerKind::Resource,
    ];
}

/// Enemy kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    /// Fast but fragile.
    Fast,
    /// Slow and durable.
    Tank,
    /// Periodically untargetable.
    Stealth,
    /// Heals when left alone.
    Regen,
}

/// Timed effect attached to an enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    /// Reduces movement speed by `strength` (fraction).
    Slow,
    /// Stealth window: the enemy cannot be acquired as a new target.
    Cloak,
}

/// Top-level game phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    #[default]
    Menu,
    RegionSelect,
    LevelSelect,
    Playing,
    GameOver,
    Victory,
    Shop,
    Leaderboard,
    Settings,
}

impl GamePhase {
    /// Whether the run has ended (win or loss).
    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::GameOver | GamePhase::Victory)
    }
}

/// Per-level modifier that perturbs one simulation parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialMechanic {
    /// Tower range reduced.
    Sandstorm,
    /// Cosmetic only.
    LavaShards,
    /// Enemies move faster.
    SlipperyIce,
    /// Towers fire more slowly.
    CoastalWaves,
    /// Enemies move faster.
    ConveyorBelts,
    /// Cosmetic only.
    StoneDoors,
    /// Tower damage increased.
    MagicFountains,
}

/// Rarity tier of a special tower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
    Mythic,
}

/// Effect granted by owning a global shop upgrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradeEffect {
    /// Tower damage x1.2.
    DamageBoost,
    /// Tower range x1.15.
    RangeBoost,
    /// Tower fire interval x0.8.
    RapidFire,
    /// Resource income x1.5.
    EconomicBoost,
    /// +100 starting resources.
    StartingCapital,
    /// +5 starting lives.
    Reinforcements,
    /// Damage and range x1.5, fire interval x0.5.
    TowerMaster,
    /// No simulation effect yet.
    TimeLord,
    /// Lives set to 100 at level start.
    DivineProtection,
}

/// World region grouping levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    Forest,
    Mountain,
    Desert,
    Volcano,
    Arctic,
    Coastal,
    Industrial,
    Ruins,
    Garden,
}

/// Advertised level difficulty (display only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}
