//! Static content tables: tower and enemy tiers, special towers, rarity
//! weights, shop upgrades, regions, and the level catalog.
//!
//! The simulation consumes these read-only. `ContentTables::default()`
//! carries the built-in catalog; alternative tables can be loaded from JSON.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::*;
use crate::levels::{builtin_levels, LevelDef};

/// Per-level stats of one tower kind, indexed by upgrade level 0..=2.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TowerTier {
    pub name: String,
    pub cost: [u32; 3],
    pub damage: [f64; 3],
    pub range: [f64; 3],
    /// Minimum milliseconds between shots.
    pub fire_interval_ms: [f64; 3],
    pub sell_value: [u32; 3],
}

/// Tower tiers for every in-battle kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TowerTable {
    pub basic: TowerTier,
    pub area: TowerTier,
    pub slow: TowerTier,
    pub resource: TowerTier,
}

impl TowerTable {
    pub fn get(&self, kind: TowerKind) -> &TowerTier {
        match kind {
            TowerKind::Basic => &self.basic,
            TowerKind::Area => &self.area,
            TowerKind::Slow => &self.slow,
            TowerKind::Resource => &self.resource,
        }
    }
}

/// Per-difficulty-tier stats of one enemy kind, indexed by tier 0..=2.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyTier {
    pub name: String,
    pub health: [f64; 3],
    /// Pixels per reference frame.
    pub speed: [f64; 3],
    pub reward: [u32; 3],
}

/// Enemy tiers for every kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyTable {
    pub fast: EnemyTier,
    pub tank: EnemyTier,
    pub stealth: EnemyTier,
    pub regen: EnemyTier,
}

impl EnemyTable {
    pub fn get(&self, kind: EnemyKind) -> &EnemyTier {
        match kind {
            EnemyKind::Fast => &self.fast,
            EnemyKind::Tank => &self.tank,
            EnemyKind::Stealth => &self.stealth,
            EnemyKind::Regen => &self.regen,
        }
    }
}

/// A collectible special tower.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecialTowerDef {
    pub id: String,
    pub name: String,
    pub rarity: Rarity,
    pub cost: u32,
    pub damage: f64,
    pub range: f64,
    pub fire_interval_ms: f64,
    pub description: String,
}

/// Relative weight of a rarity tier in the roulette draw.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RarityWeight {
    pub rarity: Rarity,
    pub weight: f64,
}

/// A global upgrade sold in the shop for coins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopUpgrade {
    pub id: String,
    pub name: String,
    pub description: String,
    pub cost: u32,
    pub effect: UpgradeEffect,
}

/// Region metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionDef {
    pub region: Region,
    pub name: String,
    pub description: String,
    pub unlocked: bool,
}

/// Geometry limits used by the placement validator.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlacementRules {
    pub field_width: f64,
    pub field_height: f64,
    pub margin: f64,
    pub path_buffer: f64,
    pub obstacle_radius: f64,
    pub min_tower_distance: f64,
}

impl Default for PlacementRules {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            margin: FIELD_MARGIN,
            path_buffer: PATH_BUFFER,
            obstacle_radius: OBSTACLE_RADIUS,
            min_tower_distance: MIN_TOWER_DISTANCE,
        }
    }
}

/// Every read-only table the simulation consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentTables {
    pub towers: TowerTable,
    pub enemies: EnemyTable,
    pub specials: Vec<SpecialTowerDef>,
    /// Ordered: the last entry is the fallback when a draw overshoots.
    pub rarity_weights: Vec<RarityWeight>,
    pub upgrades: Vec<ShopUpgrade>,
    pub regions: Vec<RegionDef>,
    pub levels: Vec<LevelDef>,
    #[serde(default)]
    pub placement: PlacementRules,
    #[serde(default = "default_roulette_cost")]
    pub roulette_cost: u32,
}

fn default_roulette_cost() -> u32 {
    ROULETTE_COST
}

impl ContentTables {
    /// Parse content tables from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn level(&self, id: u32) -> Option<&LevelDef> {
        self.levels.iter().find(|l| l.id == id)
    }

    pub fn upgrade(&self, id: &str) -> Option<&ShopUpgrade> {
        self.upgrades.iter().find(|u| u.id == id)
    }

    pub fn special(&self, id: &str) -> Option<&SpecialTowerDef> {
        self.specials.iter().find(|s| s.id == id)
    }

    pub fn region(&self, region: Region) -> Option<&RegionDef> {
        self.regions.iter().find(|r| r.region == region)
    }

    /// Levels belonging to a region, in catalog order.
    pub fn levels_in(&self, region: Region) -> impl Iterator<Item = &LevelDef> {
        self.levels.iter().filter(move |l| l.region == region)
    }
}

impl Default for ContentTables {
    fn default() -> Self {
        Self {
            towers: builtin_towers(),
            enemies: builtin_enemies(),
            specials: builtin_specials(),
            rarity_weights: builtin_rarity_weights(),
            upgrades: builtin_upgrades(),
            regions: builtin_regions(),
            levels: builtin_levels(),
            placement: PlacementRules::default(),
            roulette_cost: ROULETTE_COST,
        }
    }
}

fn builtin_towers() -> TowerTable {
    TowerTable {
        basic: TowerTier {
            name: "Basic Tower".into(),
            cost: [50, 75, 100],
            damage: [25.0, 40.0, 60.0],
            range: [80.0, 90.0, 100.0],
            fire_interval_ms: [1000.0, 800.0, 600.0],
            sell_value: [35, 87, 157],
        },
        area: TowerTier {
            name: "Area Tower".into(),
            cost: [75, 100, 125],
            damage: [15.0, 25.0, 35.0],
            range: [60.0, 70.0, 80.0],
            fire_interval_ms: [1500.0, 1200.0, 1000.0],
            sell_value: [52, 122, 210],
        },
        slow: TowerTier {
            name: "Freeze Tower".into(),
            cost: [60, 90, 120],
            damage: [10.0, 15.0, 20.0],
            range: [70.0, 85.0, 100.0],
            fire_interval_ms: [800.0, 600.0, 400.0],
            sell_value: [42, 105, 189],
        },
        resource: TowerTier {
            name: "Resource Tower".into(),
            cost: [100, 150, 200],
            damage: [5.0, 8.0, 12.0],
            range: [50.0, 60.0, 70.0],
            fire_interval_ms: [2000.0, 1500.0, 1000.0],
            sell_value: [70, 175, 315],
        },
    }
}

fn builtin_enemies() -> EnemyTable {
    EnemyTable {
        fast: EnemyTier {
            name: "Scout".into(),
            health: [30.0, 45.0, 60.0],
            speed: [3.0, 3.5, 4.0],
            reward: [15, 20, 25],
        },
        tank: EnemyTier {
            name: "Heavy".into(),
            health: [120.0, 180.0, 240.0],
            speed: [1.0, 1.2, 1.5],
            reward: [40, 60, 80],
        },
        stealth: EnemyTier {
            name: "Ghost".into(),
            health: [60.0, 80.0, 100.0],
            speed: [2.0, 2.5, 3.0],
            reward: [30, 40, 50],
        },
        regen: EnemyTier {
            name: "Healer".into(),
            health: [80.0, 110.0, 140.0],
            speed: [1.5, 1.8, 2.1],
            reward: [35, 50, 65],
        },
    }
}

fn special(
    id: &str,
    name: &str,
    rarity: Rarity,
    cost: u32,
    (damage, range, fire_interval_ms): (f64, f64, f64),
    description: &str,
) -> SpecialTowerDef {
    SpecialTowerDef {
        id: id.into(),
        name: name.into(),
        rarity,
        cost,
        damage,
        range,
        fire_interval_ms,
        description: description.into(),
    }
}

fn builtin_specials() -> Vec<SpecialTowerDef> {
    vec![
        special(
            "sniper",
            "Sniper Tower",
            Rarity::Epic,
            150,
            (80.0, 200.0, 2000.0),
            "Long range precision shots",
        ),
        special(
            "glue",
            "Glue Tower",
            Rarity::Rare,
            125,
            (5.0, 70.0, 1500.0),
            "Slowing puddles that trap enemies",
        ),
        special(
            "spike",
            "Spike Factory",
            Rarity::Uncommon,
            200,
            (20.0, 40.0, 3000.0),
            "Spikes on the path damage passing enemies",
        ),
        special(
            "bombard",
            "Bombard Tower",
            Rarity::Epic,
            175,
            (50.0, 90.0, 2500.0),
            "Explosive area damage with fragment scatter",
        ),
        special(
            "camo",
            "Camo-Detector Tower",
            Rarity::Rare,
            125,
            (15.0, 120.0, 1200.0),
            "Reveals and damages stealth enemies",
        ),
        special(
            "laser",
            "Laser Beam Tower",
            Rarity::Legendary,
            225,
            (30.0, 150.0, 500.0),
            "Sweeping beam that hits every enemy in line",
        ),
        special(
            "quantum",
            "Quantum Tower",
            Rarity::Mythic,
            500,
            (100.0, 180.0, 800.0),
            "Bends time and space around enemies",
        ),
        special(
            "plasma",
            "Plasma Cannon",
            Rarity::Legendary,
            300,
            (75.0, 130.0, 1000.0),
            "Plasma bolts chain between nearby enemies",
        ),
    ]
}

fn builtin_rarity_weights() -> Vec<RarityWeight> {
    [
        (Rarity::Common, 40.0),
        (Rarity::Uncommon, 30.0),
        (Rarity::Rare, 15.0),
        (Rarity::Epic, 10.0),
        (Rarity::Legendary, 4.0),
        (Rarity::Mythic, 1.0),
    ]
    .into_iter()
    .map(|(rarity, weight)| RarityWeight { rarity, weight })
    .collect()
}

fn upgrade(id: &str, name: &str, description: &str, cost: u32, effect: UpgradeEffect) -> ShopUpgrade {
    ShopUpgrade {
        id: id.into(),
        name: name.into(),
        description: description.into(),
        cost,
        effect,
    }
}

fn builtin_upgrades() -> Vec<ShopUpgrade> {
    use UpgradeEffect::*;
    vec![
        upgrade("damage_boost", "Damage Amplifier", "+20% damage to all towers", 100, DamageBoost),
        upgrade("range_boost", "Range Extender", "+15% range to all towers", 80, RangeBoost),
        upgrade("fire_rate_boost", "Rapid Fire", "+25% fire rate to all towers", 120, RapidFire),
        upgrade("resource_boost", "Economic Boost", "+50% resource generation", 150, EconomicBoost),
        upgrade("starting_resources", "Starting Capital", "+100 starting resources", 200, StartingCapital),
        upgrade("extra_lives", "Reinforcements", "+5 starting lives", 180, Reinforcements),
        upgrade(
            "tower_master",
            "Tower Master",
            "All towers gain +50% damage, range, and fire rate",
            2000,
            TowerMaster,
        ),
        upgrade("time_lord", "Time Lord", "Slow down time globally", 3000, TimeLord),
        upgrade("god_mode", "Divine Protection", "Start with 100 lives", 5000, DivineProtection),
    ]
}

fn builtin_regions() -> Vec<RegionDef> {
    [
        (Region::Forest, "Enchanted Forest", "Mystical woodlands with ancient magic", true),
        (Region::Mountain, "Frozen Peaks", "Treacherous mountain passes", false),
        (Region::Desert, "Scorching Dunes", "Harsh dunes swept by sandstorms", false),
        (Region::Volcano, "Molten Core", "Volcanic craters with flowing lava", false),
        (Region::Arctic, "Frozen Wasteland", "Icy tundra and glaciers", false),
        (Region::Coastal, "Storm Coast", "Rocky shores with crashing waves", false),
        (Region::Industrial, "Steel Factory", "Platforms and conveyor belts", false),
        (Region::Ruins, "Ancient Ruins", "Forgotten underground chambers", false),
        (Region::Garden, "Mystic Garden", "Canals fed by magic fountains", false),
    ]
    .into_iter()
    .map(|(region, name, description, unlocked)| RegionDef {
        region,
        name: name.into(),
        description: description.into(),
        unlocked,
    })
    .collect()
}
