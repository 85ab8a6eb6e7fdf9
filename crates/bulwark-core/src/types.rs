//! Fundamental geometric and simulation types.

use serde::{Deserialize, Serialize};

/// 2D position on the play field (pixels, y grows downward).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position.
    pub fn distance_to(&self, other: &Position) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Simulation clock, advanced only by `advance` calls.
///
/// `elapsed_ms` accumulates speed-scaled milliseconds, so every timer that
/// compares against it already accounts for the simulation speed.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Number of ticks processed since the level started.
    pub tick: u64,
    /// Scaled simulation time in milliseconds.
    pub elapsed_ms: f64,
}

impl SimTime {
    /// Advance by one tick covering `scaled_ms` of simulation time.
    pub fn advance(&mut self, scaled_ms: f64) {
        self.tick += 1;
        self.elapsed_ms += scaled_ms;
    }
}

/// Identifier of a placed tower. Unique for the lifetime of an engine.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TowerId(pub u32);

/// Identifier of a spawned enemy.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EnemyId(pub u32);

/// Identifier of an in-flight projectile.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ProjectileId(pub u32);

impl std::fmt::Display for TowerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "tower-{}", self.0)
    }
}

impl std::fmt::Display for EnemyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "enemy-{}", self.0)
    }
}
