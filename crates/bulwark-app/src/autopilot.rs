//! A simple scripted player for headless runs.
//!
//! Each decision looks at a snapshot and returns the commands it wants
//! applied: start the next wave whenever the field is idle, build towers
//! where they cover the most path, then upgrade.

use serde::Serialize;
use tracing::{debug, info};

use bulwark_core::commands::PlayerCommand;
use bulwark_core::constants::{MAX_TOWER_LEVEL, REFERENCE_FRAME_MS};
use bulwark_core::content::{ContentTables, PlacementRules};
use bulwark_core::enums::{GamePhase, TowerKind};
use bulwark_core::levels::LevelDef;
use bulwark_core::state::GameStateSnapshot;
use bulwark_core::types::Position;
use bulwark_geometry::{distance, line_of_sight, valid_placement_zones};
use bulwark_sim::SimulationEngine;

/// Spacing of candidate build spots.
const SCAN_STEP: f64 = 20.0;

/// Spacing of path samples used to score build spots.
const PATH_SAMPLE_STEP: f64 = 10.0;

/// Build this many towers before spending on upgrades.
const MAX_TOWERS: usize = 8;

/// Ticks between decisions in headless runs.
const DECIDE_EVERY: u64 = 15;

const BUILD_ORDER: [TowerKind; 4] = [
    TowerKind::Basic,
    TowerKind::Slow,
    TowerKind::Area,
    TowerKind::Basic,
];

pub struct Autopilot {
    level: LevelDef,
    rules: PlacementRules,
    path_samples: Vec<Position>,
    built: usize,
}

impl Autopilot {
    /// Returns `None` if `level_id` is not in the catalog.
    pub fn new(content: &ContentTables, level_id: u32) -> Option<Self> {
        let level = content.level(level_id)?.clone();
        let path_samples = sample_path(&level, PATH_SAMPLE_STEP);
        Some(Self {
            level,
            rules: content.placement,
            path_samples,
            built: 0,
        })
    }

    pub fn level_id(&self) -> u32 {
        self.level.id
    }

    /// Commands to apply for this snapshot. Empty outside play.
    pub fn decide(&mut self, snap: &GameStateSnapshot, content: &ContentTables) -> Vec<PlayerCommand> {
        if snap.phase != GamePhase::Playing {
            return Vec::new();
        }
        let mut commands = Vec::new();

        if snap.towers.len() < MAX_TOWERS {
            let kind = BUILD_ORDER[self.built % BUILD_ORDER.len()];
            let tier = content.towers.get(kind);
            if snap.resources >= f64::from(tier.cost[0]) {
                let towers: Vec<Position> = snap.towers.iter().map(|t| t.position).collect();
                if let Some(position) = self.best_spot(&towers, tier.range[0]) {
                    commands.push(PlayerCommand::PlaceTower { position, kind });
                    self.built += 1;
                }
            }
        } else if let Some(tower) = snap
            .towers
            .iter()
            .filter(|t| t.level < MAX_TOWER_LEVEL)
            .min_by_key(|t| t.level)
        {
            let cost = content.towers.get(tower.kind).cost[usize::from(tower.level + 1)];
            if snap.resources >= f64::from(cost) {
                commands.push(PlayerCommand::UpgradeTower { tower_id: tower.id });
            }
        }

        if !snap.wave_in_progress && snap.current_wave < snap.total_waves {
            commands.push(PlayerCommand::StartNextWave);
        }
        commands
    }

    /// Valid spot seeing the most path samples within `range`; the first
    /// scanned spot wins ties.
    fn best_spot(&self, towers: &[Position], range: f64) -> Option<Position> {
        let zones = valid_placement_zones(&self.level, towers, &self.rules, SCAN_STEP);
        let mut best: Option<(Position, usize)> = None;
        for spot in zones.valid {
            let score = self.coverage(spot, range);
            if score > 0 && best.map_or(true, |(_, s)| score > s) {
                best = Some((spot, score));
            }
        }
        best.map(|(p, _)| p)
    }

    fn coverage(&self, spot: Position, range: f64) -> usize {
        self.path_samples
            .iter()
            .filter(|&&p| {
                distance(spot, p) <= range
                    && line_of_sight(spot, p, &self.level.obstacles, self.rules.obstacle_radius)
            })
            .count()
    }
}

/// Points along the path every `step` pixels, including both ends.
fn sample_path(level: &LevelDef, step: f64) -> Vec<Position> {
    let mut out = Vec::new();
    for (a, b) in level.segments() {
        let len = distance(a, b);
        let n = (len / step).ceil().max(1.0) as usize;
        for i in 0..n {
            let t = i as f64 / n as f64;
            out.push(Position::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t));
        }
    }
    if let Some(&last) = level.waypoints.last() {
        out.push(last);
    }
    out
}

/// Final state of a headless run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub level_id: Option<u32>,
    pub level_name: Option<String>,
    pub phase: GamePhase,
    pub waves_started: u32,
    pub total_waves: u32,
    pub lives: i32,
    pub resources: f64,
    pub score: u64,
    pub towers: usize,
    pub coins: u32,
    pub ticks: u64,
    pub sim_seconds: f64,
}

impl RunSummary {
    pub fn from_snapshot(snap: &GameStateSnapshot) -> Self {
        Self {
            level_id: snap.level_id,
            level_name: snap.level_name.clone(),
            phase: snap.phase,
            waves_started: snap.current_wave,
            total_waves: snap.total_waves,
            lives: snap.lives,
            resources: snap.resources,
            score: snap.score,
            towers: snap.towers.len(),
            coins: snap.coins,
            ticks: snap.time.tick,
            sim_seconds: snap.time.elapsed_ms / 1000.0,
        }
    }
}

/// Play the pilot's level on `engine` as fast as possible, for at most
/// `max_seconds` of caller time (before speed scaling).
pub fn run_headless(engine: &mut SimulationEngine, pilot: &mut Autopilot, max_seconds: f64) -> RunSummary {
    if let Err(e) = engine.start_level(pilot.level_id()) {
        debug!(error = %e, "autopilot could not start level");
        return RunSummary::from_snapshot(&engine.snapshot());
    }
    let max_ticks = (max_seconds * 1000.0 / REFERENCE_FRAME_MS).ceil() as u64;

    for tick in 0..max_ticks {
        if engine.phase() != GamePhase::Playing {
            break;
        }
        if tick % DECIDE_EVERY == 0 {
            let commands = pilot.decide(&engine.snapshot(), engine.content());
            for cmd in commands {
                if let Err(e) = engine.apply(cmd) {
                    debug!(error = %e, "autopilot command rejected");
                }
            }
        }
        engine.advance(REFERENCE_FRAME_MS);
    }

    let summary = RunSummary::from_snapshot(&engine.snapshot());
    info!(phase = ?summary.phase, score = summary.score, lives = summary.lives, "headless run finished");
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use bulwark_campaign::MemoryStore;
    use bulwark_geometry::is_valid_placement;
    use bulwark_sim::SimConfig;

    fn engine() -> SimulationEngine {
        SimulationEngine::new(SimConfig::default(), MemoryStore::new())
    }

    #[test]
    fn test_unknown_level_has_no_pilot() {
        assert!(Autopilot::new(&ContentTables::default(), 404).is_none());
    }

    #[test]
    fn test_path_samples_cover_both_ends() {
        let content = ContentTables::default();
        let level = content.level(1).unwrap();
        let samples = sample_path(level, 10.0);
        assert_eq!(samples.first(), level.waypoints.first());
        assert_eq!(samples.last(), level.waypoints.last());
        for pair in samples.windows(2) {
            assert!(distance(pair[0], pair[1]) <= 10.0 + 1e-9);
        }
    }

    #[test]
    fn test_idle_in_menu() {
        let content = ContentTables::default();
        let mut pilot = Autopilot::new(&content, 1).unwrap();
        let snap = engine().snapshot();
        assert!(pilot.decide(&snap, &content).is_empty());
    }

    #[test]
    fn test_first_decision_builds_and_starts_wave() {
        let content = ContentTables::default();
        let mut pilot = Autopilot::new(&content, 1).unwrap();
        let mut engine = engine();
        engine.start_level(1).unwrap();

        let commands = pilot.decide(&engine.snapshot(), &content);
        assert_eq!(commands.len(), 2);
        let PlayerCommand::PlaceTower { position, kind } = commands[0] else {
            panic!("expected a build first, got {:?}", commands[0]);
        };
        assert_eq!(kind, TowerKind::Basic);
        assert!(is_valid_placement(position, &[], content.level(1).unwrap(), &content.placement));
        assert_eq!(commands[1], PlayerCommand::StartNextWave);
    }

    #[test]
    fn test_headless_run_finishes_level() {
        let content = ContentTables::default();
        let mut pilot = Autopilot::new(&content, 1).unwrap();
        let mut engine = engine();
        let summary = run_headless(&mut engine, &mut pilot, 1200.0);
        assert_ne!(summary.phase, GamePhase::Playing);
        assert_eq!(summary.level_id, Some(1));
        assert!(summary.towers > 0);
        assert!(summary.score > 0, "autopilot should kill something");
    }

    #[test]
    fn test_summary_serializes() {
        let summary = RunSummary::from_snapshot(&engine().snapshot());
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"phase\""));
    }
}
