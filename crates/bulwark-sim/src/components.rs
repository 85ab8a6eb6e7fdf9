//! ECS components and run-scoped state.
//!
//! Every entity also carries a `Position`. Cross-entity references are
//! `hecs::Entity` handles; a despawned handle simply fails lookup.

use std::collections::VecDeque;

use hecs::Entity;

use bulwark_core::enums::{EffectKind, EnemyKind, TowerKind};
use bulwark_core::levels::LevelDef;
use bulwark_core::types::{EnemyId, ProjectileId, TowerId};

/// A timed effect on an enemy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Effect {
    pub kind: EffectKind,
    pub remaining_ms: f64,
    pub strength: f64,
}

#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: EnemyId,
    pub kind: EnemyKind,
    pub health: f64,
    pub max_health: f64,
    /// Base speed in pixels per reference frame.
    pub speed: f64,
    /// Index of the last waypoint reached.
    pub waypoint_index: usize,
    pub effects: Vec<Effect>,
    /// Sim time of the last hit, `None` if never hit.
    pub last_damaged: Option<f64>,
}

impl Enemy {
    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    pub fn is_cloaked(&self) -> bool {
        self.effects.iter().any(|e| e.kind == EffectKind::Cloak)
    }

    /// Strength of the first active slow.
    pub fn slow_strength(&self) -> Option<f64> {
        self.effects
            .iter()
            .find(|e| e.kind == EffectKind::Slow)
            .map(|e| e.strength)
    }

    /// Subtract damage, clamping at zero, and stamp the hit time.
    pub fn take_damage(&mut self, amount: f64, now: f64) {
        self.health = (self.health - amount).max(0.0);
        self.last_damaged = Some(now);
    }
}

#[derive(Debug, Clone)]
pub struct Tower {
    pub id: TowerId,
    pub kind: TowerKind,
    /// Upgrade level, 0..=2.
    pub level: u8,
    /// Sim time of the last shot, `None` if the tower has never fired.
    pub last_fired: Option<f64>,
    pub target: Option<Entity>,
    pub upgrades: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: ProjectileId,
    pub target: Entity,
    /// Fixed at firing time.
    pub damage: f64,
    /// Pixels per reference frame.
    pub speed: f64,
    pub tower_kind: TowerKind,
}

/// A pending enemy spawn at an absolute sim time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledSpawn {
    pub at_ms: f64,
    pub enemy: EnemyKind,
}

/// State that lives for one attempt at a level.
#[derive(Debug, Clone)]
pub struct RunState {
    pub level: LevelDef,
    pub resources: f64,
    pub lives: i32,
    pub score: u64,
    /// Waves started so far; never exceeds the level's wave count.
    pub current_wave: u32,
    pub wave_in_progress: bool,
    /// Sorted by `at_ms`.
    pub spawn_queue: VecDeque<ScheduledSpawn>,
    /// Sim time of the last passive income grant.
    pub last_income: Option<f64>,
}

impl RunState {
    pub fn waves_exhausted(&self) -> bool {
        self.current_wave as usize >= self.level.waves.len()
    }
}

/// Monotonic id counters, unique for the lifetime of an engine.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next_tower: u32,
    next_enemy: u32,
    next_projectile: u32,
}

impl IdAllocator {
    pub fn tower(&mut self) -> TowerId {
        self.next_tower += 1;
        TowerId(self.next_tower)
    }

    pub fn enemy(&mut self) -> EnemyId {
        self.next_enemy += 1;
        EnemyId(self.next_enemy)
    }

    pub fn projectile(&mut self) -> ProjectileId {
        self.next_projectile += 1;
        ProjectileId(self.next_projectile)
    }
}
