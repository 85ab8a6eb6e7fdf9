//! Level definitions and the built-in level catalog.
//!
//! A level is a polyline path, a set of circular obstacles, and an ordered
//! list of waves. Each wave is one or more enemy groups.

use serde::{Deserialize, Serialize};

use crate::enums::{Difficulty, EnemyKind, Region, SpecialMechanic};
use crate::types::Position;

/// One group of identical enemies within a wave.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveGroup {
    pub enemy: EnemyKind,
    pub count: u32,
    /// Milliseconds between consecutive spawns of this group.
    pub spawn_delay_ms: f64,
}

/// Static definition of a playable level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelDef {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub region: Region,
    /// Enemy path; must contain at least two points.
    pub waypoints: Vec<Position>,
    /// Obstacle centres; every obstacle shares the configured radius.
    pub obstacles: Vec<Position>,
    pub waves: Vec<Vec<WaveGroup>>,
    pub initial_resources: f64,
    pub initial_lives: i32,
    pub reward_coins: u32,
    pub special_mechanic: Option<SpecialMechanic>,
}

impl LevelDef {
    /// Consecutive waypoint pairs.
    pub fn segments(&self) -> impl Iterator<Item = (Position, Position)> + '_ {
        self.waypoints.windows(2).map(|w| (w[0], w[1]))
    }

    pub fn wave_count(&self) -> u32 {
        self.waves.len() as u32
    }

    /// Path origin where enemies spawn.
    pub fn spawn_point(&self) -> Position {
        self.waypoints.first().copied().unwrap_or_default()
    }
}

const fn p(x: f64, y: f64) -> Position {
    Position::new(x, y)
}

fn g(enemy: EnemyKind, count: u32, spawn_delay_ms: f64) -> WaveGroup {
    WaveGroup {
        enemy,
        count,
        spawn_delay_ms,
    }
}

/// The standard five-wave escalation: fast, tank, stealth, regen, mixed.
/// Each tuple is `(count, delay_ms)`.
fn standard_waves(
    fast: (u32, f64),
    tank: (u32, f64),
    stealth: (u32, f64),
    regen: (u32, f64),
    finale: ((u32, f64), (u32, f64)),
) -> Vec<Vec<WaveGroup>> {
    use EnemyKind::*;
    vec![
        vec![g(Fast, fast.0, fast.1)],
        vec![g(Tank, tank.0, tank.1)],
        vec![g(Stealth, stealth.0, stealth.1)],
        vec![g(Regen, regen.0, regen.1)],
        vec![
            g(Fast, finale.0 .0, finale.0 .1),
            g(Tank, finale.1 .0, finale.1 .1),
        ],
    ]
}

#[allow(clippy::too_many_arguments)]
fn level(
    id: u32,
    name: &str,
    description: &str,
    difficulty: Difficulty,
    region: Region,
    (initial_resources, initial_lives, reward_coins): (f64, i32, u32),
    special_mechanic: Option<SpecialMechanic>,
    obstacles: Vec<Position>,
    waypoints: Vec<Position>,
    waves: Vec<Vec<WaveGroup>>,
) -> LevelDef {
    LevelDef {
        id,
        name: name.into(),
        description: description.into(),
        difficulty,
        region,
        waypoints,
        obstacles,
        waves,
        initial_resources,
        initial_lives,
        reward_coins,
        special_mechanic,
    }
}

/// Build the built-in level catalog.
pub fn builtin_levels() -> Vec<LevelDef> {
    use Difficulty::*;
    use EnemyKind::*;

    vec![
        level(
            1,
            "Whispering Woods",
            "A gentle path through the enchanted forest",
            Easy,
            Region::Forest,
            (300.0, 25, 50),
            None,
            vec![
                p(200.0, 50.0),
                p(220.0, 50.0),
                p(240.0, 50.0),
                p(500.0, 250.0),
                p(520.0, 250.0),
                p(540.0, 250.0),
            ],
            vec![
                p(-20.0, 200.0),
                p(150.0, 200.0),
                p(150.0, 100.0),
                p(400.0, 100.0),
                p(400.0, 300.0),
                p(250.0, 300.0),
                p(250.0, 400.0),
                p(550.0, 400.0),
                p(550.0, 150.0),
                p(700.0, 150.0),
                p(820.0, 150.0),
            ],
            vec![
                vec![g(Fast, 8, 800.0)],
                vec![g(Fast, 10, 700.0)],
                vec![g(Tank, 3, 1500.0)],
                vec![g(Fast, 12, 600.0), g(Tank, 2, 2000.0)],
                vec![g(Stealth, 6, 1000.0)],
            ],
        ),
        level(
            2,
            "Twisted Branches",
            "Dense forest with winding paths and hidden dangers",
            Medium,
            Region::Forest,
            (250.0, 20, 75),
            None,
            vec![
                p(100.0, 100.0),
                p(300.0, 200.0),
                p(500.0, 300.0),
                p(600.0, 150.0),
                p(200.0, 350.0),
            ],
            vec![
                p(-20.0, 250.0),
                p(100.0, 250.0),
                p(100.0, 150.0),
                p(250.0, 150.0),
                p(250.0, 300.0),
                p(400.0, 300.0),
                p(400.0, 100.0),
                p(600.0, 100.0),
                p(600.0, 400.0),
                p(820.0, 400.0),
            ],
            standard_waves(
                (12, 600.0),
                (5, 1200.0),
                (8, 800.0),
                (6, 1000.0),
                ((20, 400.0), (4, 1500.0)),
            ),
        ),
        level(
            3,
            "Ancient Grove",
            "The heart of the forest where ancient magic flows",
            Hard,
            Region::Forest,
            (200.0, 15, 100),
            None,
            vec![
                p(150.0, 150.0),
                p(350.0, 250.0),
                p(550.0, 150.0),
                p(250.0, 350.0),
                p(450.0, 350.0),
                p(650.0, 250.0),
            ],
            vec![
                p(-20.0, 50.0),
                p(200.0, 50.0),
                p(200.0, 200.0),
                p(100.0, 200.0),
                p(100.0, 300.0),
                p(300.0, 300.0),
                p(300.0, 100.0),
                p(500.0, 100.0),
                p(500.0, 400.0),
                p(700.0, 400.0),
                p(700.0, 200.0),
                p(820.0, 200.0),
            ],
            standard_waves(
                (15, 500.0),
                (8, 1000.0),
                (12, 600.0),
                (10, 800.0),
                ((25, 300.0), (6, 1200.0)),
            ),
        ),
        level(
            4,
            "Rocky Ascent",
            "A steep climb through mountain passes",
            Easy,
            Region::Mountain,
            (280.0, 22, 60),
            None,
            vec![
                p(150.0, 100.0),
                p(350.0, 200.0),
                p(550.0, 300.0),
                p(250.0, 350.0),
                p(450.0, 150.0),
            ],
            vec![
                p(-20.0, 400.0),
                p(150.0, 400.0),
                p(150.0, 250.0),
                p(300.0, 250.0),
                p(300.0, 100.0),
                p(500.0, 100.0),
                p(500.0, 350.0),
                p(650.0, 350.0),
                p(650.0, 200.0),
                p(820.0, 200.0),
            ],
            standard_waves(
                (10, 700.0),
                (4, 1400.0),
                (7, 900.0),
                (5, 1100.0),
                ((18, 450.0), (3, 1600.0)),
            ),
        ),
        level(
            5,
            "Zig-Zag Dunes",
            "Two sharp parallel zig-zags under sweeping sandstorms",
            Medium,
            Region::Desert,
            (220.0, 18, 80),
            Some(SpecialMechanic::Sandstorm),
            vec![
                p(200.0, 150.0),
                p(400.0, 250.0),
                p(600.0, 150.0),
                p(300.0, 350.0),
                p(500.0, 350.0),
            ],
            vec![
                p(-20.0, 100.0),
                p(150.0, 100.0),
                p(300.0, 200.0),
                p(150.0, 300.0),
                p(300.0, 400.0),
                p(450.0, 300.0),
                p(600.0, 400.0),
                p(750.0, 300.0),
                p(820.0, 300.0),
            ],
            standard_waves(
                (14, 550.0),
                (6, 1100.0),
                (10, 700.0),
                (8, 900.0),
                ((22, 350.0), (5, 1300.0)),
            ),
        ),
        level(
            6,
            "Lava Ring",
            "A closed oval circuit showered by lava shards",
            Hard,
            Region::Volcano,
            (180.0, 12, 120),
            Some(SpecialMechanic::LavaShards),
            vec![
                p(400.0, 250.0),
                p(200.0, 200.0),
                p(600.0, 200.0),
                p(300.0, 350.0),
                p(500.0, 350.0),
            ],
            vec![
                p(-20.0, 250.0),
                p(150.0, 250.0),
                p(250.0, 150.0),
                p(400.0, 100.0),
                p(550.0, 150.0),
                p(650.0, 250.0),
                p(550.0, 350.0),
                p(400.0, 400.0),
                p(250.0, 350.0),
                p(150.0, 250.0),
                p(820.0, 250.0),
            ],
            standard_waves(
                (18, 450.0),
                (10, 900.0),
                (15, 550.0),
                (12, 700.0),
                ((30, 250.0), (8, 1000.0)),
            ),
        ),
        level(
            7,
            "Glacier Spiral",
            "A spiral toward the centre over slippery ice",
            Hard,
            Region::Arctic,
            (160.0, 10, 140),
            Some(SpecialMechanic::SlipperyIce),
            vec![
                p(300.0, 150.0),
                p(500.0, 200.0),
                p(400.0, 350.0),
                p(200.0, 300.0),
                p(600.0, 300.0),
            ],
            vec![
                p(-20.0, 400.0),
                p(100.0, 400.0),
                p(200.0, 350.0),
                p(300.0, 300.0),
                p(400.0, 250.0),
                p(500.0, 250.0),
                p(600.0, 200.0),
                p(650.0, 150.0),
                p(700.0, 100.0),
                p(750.0, 150.0),
                p(820.0, 200.0),
            ],
            standard_waves(
                (20, 400.0),
                (12, 800.0),
                (18, 500.0),
                (15, 600.0),
                ((35, 200.0), (10, 900.0)),
            ),
        ),
        level(
            8,
            "Cliffside Road",
            "Gentle curves above a rough sea",
            Medium,
            Region::Coastal,
            (240.0, 16, 90),
            Some(SpecialMechanic::CoastalWaves),
            vec![
                p(200.0, 100.0),
                p(400.0, 150.0),
                p(600.0, 100.0),
                p(300.0, 300.0),
                p(500.0, 300.0),
            ],
            vec![
                p(-20.0, 200.0),
                p(150.0, 200.0),
                p(300.0, 150.0),
                p(450.0, 200.0),
                p(600.0, 150.0),
                p(750.0, 200.0),
                p(820.0, 200.0),
            ],
            standard_waves(
                (16, 500.0),
                (7, 1000.0),
                (12, 650.0),
                (9, 850.0),
                ((24, 300.0), (6, 1200.0)),
            ),
        ),
        level(
            9,
            "Factory Walkway",
            "A long straightaway lined with running conveyor belts",
            Hard,
            Region::Industrial,
            (170.0, 12, 130),
            Some(SpecialMechanic::ConveyorBelts),
            vec![
                p(200.0, 200.0),
                p(400.0, 200.0),
                p(600.0, 200.0),
                p(300.0, 100.0),
                p(500.0, 300.0),
            ],
            vec![
                p(-20.0, 250.0),
                p(200.0, 250.0),
                p(200.0, 150.0),
                p(400.0, 150.0),
                p(400.0, 350.0),
                p(600.0, 350.0),
                p(600.0, 250.0),
                p(820.0, 250.0),
            ],
            standard_waves(
                (22, 350.0),
                (14, 750.0),
                (20, 450.0),
                (16, 550.0),
                ((40, 180.0), (12, 800.0)),
            ),
        ),
        level(
            10,
            "Sunken Corridor",
            "A broken line through stone doors that open and close",
            Hard,
            Region::Ruins,
            (150.0, 10, 150),
            Some(SpecialMechanic::StoneDoors),
            vec![
                p(250.0, 200.0),
                p(450.0, 300.0),
                p(350.0, 150.0),
                p(550.0, 250.0),
                p(150.0, 300.0),
            ],
            vec![
                p(-20.0, 250.0),
                p(200.0, 250.0),
                p(400.0, 250.0),
                p(400.0, 150.0),
                p(600.0, 150.0),
                p(820.0, 150.0),
            ],
            standard_waves(
                (25, 300.0),
                (16, 700.0),
                (22, 400.0),
                (18, 500.0),
                ((45, 150.0), (15, 750.0)),
            ),
        ),
        level(
            11,
            "Canal Garden",
            "Water channels with fountains that empower towers",
            Medium,
            Region::Garden,
            (260.0, 18, 100),
            Some(SpecialMechanic::MagicFountains),
            vec![
                p(200.0, 150.0),
                p(400.0, 250.0),
                p(600.0, 150.0),
                p(300.0, 350.0),
                p(500.0, 350.0),
            ],
            vec![
                p(-20.0, 300.0),
                p(150.0, 300.0),
                p(250.0, 200.0),
                p(350.0, 300.0),
                p(450.0, 200.0),
                p(550.0, 300.0),
                p(650.0, 200.0),
                p(750.0, 300.0),
                p(820.0, 300.0),
            ],
            standard_waves(
                (18, 450.0),
                (9, 950.0),
                (14, 600.0),
                (11, 800.0),
                ((28, 280.0), (7, 1100.0)),
            ),
        ),
    ]
}
