//! Simulation constants and tuning parameters.
//!
//! Distances are in play-field pixels, times in simulation milliseconds.

// --- Play field ---

/// Play field width.
pub const FIELD_WIDTH: f64 = 800.0;

/// Play field height.
pub const FIELD_HEIGHT: f64 = 500.0;

/// Towers must sit at least this far inside every edge.
pub const FIELD_MARGIN: f64 = 20.0;

/// Snap grid cell size.
pub const GRID_SIZE: f64 = 40.0;

/// Sampling step for placement-zone previews.
pub const PLACEMENT_ZONE_STEP: f64 = 10.0;

// --- Placement ---

/// Towers may not be placed within this distance of a path segment.
pub const PATH_BUFFER: f64 = 30.0;

/// Radius of every circular obstacle.
pub const OBSTACLE_RADIUS: f64 = 20.0;

/// Minimum spacing between tower centres.
pub const MIN_TOWER_DISTANCE: f64 = 35.0;

/// Highest tower upgrade level.
pub const MAX_TOWER_LEVEL: u8 = 2;

// --- Timing ---

/// Duration of one reference frame (60 Hz). Speeds are expressed per frame.
pub const REFERENCE_FRAME_MS: f64 = 1000.0 / 60.0;

/// Delay before the first spawn of a wave.
pub const WAVE_START_STAGGER_MS: f64 = 1000.0;

// --- Movement ---

/// Projectile speed (pixels per reference frame).
pub const PROJECTILE_SPEED: f64 = 5.0;

/// A projectile within this distance of its target hits.
pub const PROJECTILE_HIT_RADIUS: f64 = 10.0;

/// An enemy within this distance of a waypoint has reached it.
pub const WAYPOINT_REACHED_RADIUS: f64 = 5.0;

// --- Damage ---

/// Splash radius around the primary target (strict).
pub const SPLASH_RADIUS: f64 = 40.0;

/// Fraction of projectile damage dealt to splash victims.
pub const SPLASH_DAMAGE_FACTOR: f64 = 0.5;

/// Duration of the slow applied by slow towers.
pub const SLOW_DURATION_MS: f64 = 2000.0;

/// Speed reduction applied by slow towers.
pub const SLOW_STRENGTH: f64 = 0.5;

/// Score awarded per unit of kill reward.
pub const SCORE_PER_REWARD: u64 = 2;

// --- Enemy behaviour ---

/// Regen enemies heal only after this long without damage.
pub const REGEN_DELAY_MS: f64 = 2000.0;

/// Fraction of max health healed per reference frame.
pub const REGEN_FRACTION_PER_FRAME: f64 = 0.02;

/// Length of each half of the stealth on/off cycle.
pub const STEALTH_CYCLE_MS: f64 = 3000.0;

/// Strength recorded on the cloak effect (display only).
pub const CLOAK_STRENGTH: f64 = 0.8;

/// Highest difficulty tier index.
pub const MAX_DIFFICULTY_TIER: usize = 2;

/// Waves per difficulty tier.
pub const WAVES_PER_TIER: u32 = 3;

// --- Economy ---

/// Interval between passive income grants.
pub const INCOME_INTERVAL_MS: f64 = 10_000.0;

/// Base income per resource tower level.
pub const INCOME_AMOUNT: f64 = 25.0;

/// Coins per roulette spin.
pub const ROULETTE_COST: u32 = 50;

/// Upper bound of the rarity draw.
pub const RARITY_DRAW_MAX: f64 = 100.0;

/// Maximum simulation speed multiplier.
pub const MAX_GAME_SPEED: f64 = 4.0;
