//! Player commands sent from a driver to the simulation.
//!
//! Commands are applied synchronously between ticks; each either mutates
//! state and succeeds or is rejected with no side effect.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{Position, TowerId};

/// All possible player actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Battle ---
    /// Place a tower of `kind` at `position`.
    PlaceTower { position: Position, kind: TowerKind },
    /// Sell a tower for its current sell value.
    SellTower { tower_id: TowerId },
    /// Upgrade a tower to the next level.
    UpgradeTower { tower_id: TowerId },
    /// Begin the next wave of the active level.
    StartNextWave,

    // --- UI-facing state ---
    /// Choose (or clear) the tower kind pending placement.
    SelectTowerType { kind: Option<TowerKind> },
    ToggleSidebar,
    /// Set the simulation speed multiplier (clamped to 0..=4).
    SetGameSpeed { speed: f64 },

    // --- Meta progression ---
    PurchaseUpgrade { upgrade_id: String },
    PurchaseSpecialTower { tower_id: String },
    SpinRoulette,

    // --- Phase transitions ---
    GoToMenu,
    GoToRegionSelect,
    GoToLevelSelect,
    GoToShop,
    GoToLeaderboard,
    GoToSettings,
    /// Pick a region and move to level select.
    SelectRegion { region: Region },
    /// Initialise a level and enter play.
    StartLevel { level_id: u32 },
    /// Re-initialise the active level.
    RestartLevel,
    /// Reload meta progress and return to the menu.
    ResetGame,
}
