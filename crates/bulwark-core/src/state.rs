//! Game state snapshot: the complete visible state a driver reads after
//! each tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{EnemyId, Position, ProjectileId, SimTime, TowerId};

/// Immutable copy of the engine state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub resources: f64,
    pub lives: i32,
    /// Number of waves started so far.
    pub current_wave: u32,
    pub total_waves: u32,
    pub wave_in_progress: bool,
    pub selected_tower_type: Option<TowerKind>,
    pub sidebar_open: bool,
    pub game_speed: f64,
    pub score: u64,
    pub level_id: Option<u32>,
    pub level_name: Option<String>,
    pub region: Option<Region>,
    pub special_mechanic: Option<SpecialMechanic>,
    pub coins: u32,
    pub owned_upgrades: Vec<String>,
    /// May contain duplicates.
    pub unlocked_towers: Vec<String>,
    pub towers: Vec<TowerView>,
    pub enemies: Vec<EnemyView>,
    pub projectiles: Vec<ProjectileView>,
}

impl GameStateSnapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TowerView {
    pub id: TowerId,
    pub kind: TowerKind,
    pub position: Position,
    pub level: u8,
    /// Effective range after upgrades and mechanic.
    pub range: f64,
    pub target: Option<EnemyId>,
    pub upgrades: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyView {
    pub id: EnemyId,
    pub kind: EnemyKind,
    pub position: Position,
    pub health: f64,
    pub max_health: f64,
    pub speed: f64,
    pub waypoint_index: usize,
    pub effects: Vec<EffectView>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EffectView {
    pub kind: EffectKind,
    pub remaining_ms: f64,
    pub strength: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub id: ProjectileId,
    pub position: Position,
    pub target: Option<EnemyId>,
    pub damage: f64,
    pub tower_kind: TowerKind,
}
