//! Simulation engine: the core of the game.
//!
//! `SimulationEngine` owns the hecs ECS world and all run and meta state,
//! validates and applies player commands, advances the simulation by
//! caller-supplied time slices, and produces `GameStateSnapshot`s.
//! Completely headless, enabling deterministic testing.

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use bulwark_campaign::{roulette, shop, MetaProgress, ProgressStore};
use bulwark_core::commands::PlayerCommand;
use bulwark_core::constants::{MAX_GAME_SPEED, MAX_TOWER_LEVEL, PLACEMENT_ZONE_STEP};
use bulwark_core::content::ContentTables;
use bulwark_core::enums::{GamePhase, Region, TowerKind, UpgradeEffect};
use bulwark_core::error::CommandError;
use bulwark_core::state::GameStateSnapshot;
use bulwark_core::types::{Position, SimTime, TowerId};
use bulwark_geometry::{is_valid_placement, valid_placement_zones, visible_range_polygon, PlacementZones};

use crate::components::{IdAllocator, RunState, Tower};
use crate::run_setup::{self, find_tower, tower_positions};
use crate::systems;

/// Configuration for a new engine.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same roulette draws.
    pub seed: u64,
    /// Read-only content tables.
    pub content: ContentTables,
    /// Speed multiplier restored whenever a level starts.
    pub start_speed: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            content: ContentTables::default(),
            start_speed: 1.0,
        }
    }
}

/// Successful result of [`SimulationEngine::apply`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CommandOutcome {
    Done,
    TowerPlaced { tower_id: TowerId },
    TowerSold { refund: u32 },
    TowerUpgraded { level: u8 },
    WaveStarted { wave: u32 },
    Purchased { cost: u32 },
    /// `None` when the drawn rarity had nothing left and the spin was refunded.
    RouletteSpun { tower_id: Option<String> },
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    phase: GamePhase,
    content: ContentTables,
    store: Box<dyn ProgressStore + Send>,
    meta: MetaProgress,
    rng: ChaCha8Rng,
    ids: IdAllocator,
    run: Option<RunState>,
    region: Option<Region>,
    selected_tower_type: Option<TowerKind>,
    sidebar_open: bool,
    speed: f64,
    start_speed: f64,
    despawn_buffer: Vec<Entity>,
}

impl SimulationEngine {
    /// Create an engine and load meta progress from `store`.
    ///
    /// A failed load falls back to empty progress.
    pub fn new(config: SimConfig, store: impl ProgressStore + Send + 'static) -> Self {
        let store: Box<dyn ProgressStore + Send> = Box::new(store);
        let meta = load_or_default(store.as_ref());
        let start_speed = config.start_speed.clamp(0.0, MAX_GAME_SPEED);
        Self {
            world: World::new(),
            time: SimTime::default(),
            phase: GamePhase::default(),
            content: config.content,
            store,
            meta,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            ids: IdAllocator::default(),
            run: None,
            region: None,
            selected_tower_type: None,
            sidebar_open: true,
            speed: start_speed,
            start_speed,
            despawn_buffer: Vec::new(),
        }
    }

    // --- Accessors ---

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn content(&self) -> &ContentTables {
        &self.content
    }

    pub fn meta(&self) -> &MetaProgress {
        &self.meta
    }

    /// Run-scoped state of the active level, if any.
    pub fn run_state(&self) -> Option<&RunState> {
        self.run.as_ref()
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    fn upgrade_effects(&self) -> Vec<UpgradeEffect> {
        self.meta.owned_effects(&self.content)
    }

    fn run_mut(&mut self) -> Result<&mut RunState, CommandError> {
        self.run.as_mut().ok_or(CommandError::NoActiveLevel)
    }

    // --- Tick ---

    /// Advance the simulation by `delta_ms` of caller time.
    ///
    /// Does nothing unless a level is being played. The delta is scaled by
    /// the speed multiplier before any system sees it.
    pub fn advance(&mut self, delta_ms: f64) {
        if self.phase != GamePhase::Playing {
            return;
        }
        let scaled = delta_ms.max(0.0) * self.speed;
        if scaled <= 0.0 {
            return;
        }
        let upgrades = self.upgrade_effects();
        let Some(run) = self.run.as_mut() else {
            return;
        };

        self.time.advance(scaled);
        let now = self.time.elapsed_ms;

        // 1. Enemies move, heal, cloak; dead and escaped are removed
        systems::enemies::run(&mut self.world, run, now, scaled, &mut self.despawn_buffer);
        // 2. Towers retarget and fire; resource towers accrue
        systems::towers::run(&mut self.world, run, &self.content, &upgrades, &mut self.ids, now);
        // 3. Projectiles home and hit
        systems::projectiles::run(
            &mut self.world,
            run,
            &self.content,
            now,
            scaled,
            &mut self.despawn_buffer,
        );
        // 4. Spawn queue
        systems::wave_spawner::run(&mut self.world, run, &self.content, &mut self.ids, now);
        // 5. Passive income
        systems::economy::run(&self.world, run, &upgrades, now);
        // 6. Wave completion
        if systems::outcome::check_wave_completion(&self.world, run) {
            info!(wave = run.current_wave, "wave cleared");
        }
        // 7. Win/loss
        match systems::outcome::check_terminal(run) {
            Some(GamePhase::GameOver) => {
                info!(score = run.score, wave = run.current_wave, "defeat");
                self.phase = GamePhase::GameOver;
            }
            Some(GamePhase::Victory) => {
                let reward = run.level.reward_coins;
                info!(score = run.score, reward, "victory");
                self.phase = GamePhase::Victory;
                self.meta.coins += reward;
                self.persist();
            }
            _ => {}
        }
    }

    /// Build an immutable copy of the current state.
    pub fn snapshot(&self) -> GameStateSnapshot {
        let upgrades = self.upgrade_effects();
        let run = self.run.as_ref();
        let mechanic = run.and_then(|r| r.level.special_mechanic);
        GameStateSnapshot {
            time: self.time,
            phase: self.phase,
            resources: run.map_or(0.0, |r| r.resources),
            lives: run.map_or(0, |r| r.lives),
            current_wave: run.map_or(0, |r| r.current_wave),
            total_waves: run.map_or(0, |r| r.level.wave_count()),
            wave_in_progress: run.is_some_and(|r| r.wave_in_progress),
            selected_tower_type: self.selected_tower_type,
            sidebar_open: self.sidebar_open,
            game_speed: self.speed,
            score: run.map_or(0, |r| r.score),
            level_id: run.map(|r| r.level.id),
            level_name: run.map(|r| r.level.name.clone()),
            region: self.region,
            special_mechanic: mechanic,
            coins: self.meta.coins,
            owned_upgrades: self.meta.owned_upgrades.clone(),
            unlocked_towers: self.meta.unlocked_towers.clone(),
            towers: systems::snapshot::tower_views(&self.world, &self.content, &upgrades, mechanic),
            enemies: systems::snapshot::enemy_views(&self.world),
            projectiles: systems::snapshot::projectile_views(&self.world),
        }
    }

    // --- Command dispatch ---

    /// Apply one player command.
    pub fn apply(&mut self, command: PlayerCommand) -> Result<CommandOutcome, CommandError> {
        let result = match command {
            PlayerCommand::PlaceTower { position, kind } => self
                .place_tower(position, kind)
                .map(|tower_id| CommandOutcome::TowerPlaced { tower_id }),
            PlayerCommand::SellTower { tower_id } => self
                .sell_tower(tower_id)
                .map(|refund| CommandOutcome::TowerSold { refund }),
            PlayerCommand::UpgradeTower { tower_id } => self
                .upgrade_tower(tower_id)
                .map(|level| CommandOutcome::TowerUpgraded { level }),
            PlayerCommand::StartNextWave => self
                .start_next_wave()
                .map(|wave| CommandOutcome::WaveStarted { wave }),
            PlayerCommand::SelectTowerType { kind } => {
                self.select_tower_type(kind);
                Ok(CommandOutcome::Done)
            }
            PlayerCommand::ToggleSidebar => {
                self.toggle_sidebar();
                Ok(CommandOutcome::Done)
            }
            PlayerCommand::SetGameSpeed { speed } => {
                self.set_game_speed(speed);
                Ok(CommandOutcome::Done)
            }
            PlayerCommand::PurchaseUpgrade { upgrade_id } => self
                .purchase_upgrade(&upgrade_id)
                .map(|cost| CommandOutcome::Purchased { cost }),
            PlayerCommand::PurchaseSpecialTower { tower_id } => self
                .purchase_special_tower(&tower_id)
                .map(|cost| CommandOutcome::Purchased { cost }),
            PlayerCommand::SpinRoulette => self
                .spin_roulette()
                .map(|tower_id| CommandOutcome::RouletteSpun { tower_id }),
            PlayerCommand::GoToMenu => self.go_to(GamePhase::Menu),
            PlayerCommand::GoToRegionSelect => self.go_to(GamePhase::RegionSelect),
            PlayerCommand::GoToLevelSelect => self.go_to(GamePhase::LevelSelect),
            PlayerCommand::GoToShop => self.go_to(GamePhase::Shop),
            PlayerCommand::GoToLeaderboard => self.go_to(GamePhase::Leaderboard),
            PlayerCommand::GoToSettings => self.go_to(GamePhase::Settings),
            PlayerCommand::SelectRegion { region } => {
                self.select_region(region).map(|_| CommandOutcome::Done)
            }
            PlayerCommand::StartLevel { level_id } => {
                self.start_level(level_id).map(|_| CommandOutcome::Done)
            }
            PlayerCommand::RestartLevel => self.restart_level().map(|_| CommandOutcome::Done),
            PlayerCommand::ResetGame => {
                self.reset_game();
                Ok(CommandOutcome::Done)
            }
        };
        if let Err(e) = &result {
            debug!(error = %e, "command rejected");
        }
        result
    }

    fn go_to(&mut self, phase: GamePhase) -> Result<CommandOutcome, CommandError> {
        self.set_phase(phase);
        Ok(CommandOutcome::Done)
    }

    fn set_phase(&mut self, phase: GamePhase) {
        if self.phase != phase {
            info!(from = ?self.phase, to = ?phase, "phase change");
            self.phase = phase;
        }
    }

    // --- Tower commands ---

    /// Place a level-0 tower, debiting its cost.
    pub fn place_tower(&mut self, position: Position, kind: TowerKind) -> Result<TowerId, CommandError> {
        let cost = f64::from(self.content.towers.get(kind).cost[0]);
        let towers = tower_positions(&self.world);
        let rules = self.content.placement;
        let run = self.run.as_mut().ok_or(CommandError::NoActiveLevel)?;
        if run.resources < cost {
            return Err(CommandError::InsufficientResources {
                needed: cost,
                available: run.resources,
            });
        }
        if !is_valid_placement(position, &towers, &run.level, &rules) {
            return Err(CommandError::InvalidPlacement);
        }
        run.resources -= cost;
        let id = run_setup::spawn_tower(&mut self.world, &mut self.ids, kind, position);
        debug!(tower = %id, ?kind, x = position.x, y = position.y, "tower placed");
        Ok(id)
    }

    /// Sell a tower for the sell value of its current level.
    pub fn sell_tower(&mut self, tower_id: TowerId) -> Result<u32, CommandError> {
        if self.run.is_none() {
            return Err(CommandError::NoActiveLevel);
        }
        let entity = find_tower(&self.world, tower_id).ok_or(CommandError::UnknownTower(tower_id))?;
        let refund = {
            let tower = self
                .world
                .get::<&Tower>(entity)
                .map_err(|_| CommandError::UnknownTower(tower_id))?;
            self.content.towers.get(tower.kind).sell_value[usize::from(tower.level)]
        };
        let _ = self.world.despawn(entity);
        self.run_mut()?.resources += f64::from(refund);
        debug!(tower = %tower_id, refund, "tower sold");
        Ok(refund)
    }

    /// Upgrade a tower one level, debiting the next level's cost.
    pub fn upgrade_tower(&mut self, tower_id: TowerId) -> Result<u8, CommandError> {
        let entity = find_tower(&self.world, tower_id).ok_or(CommandError::UnknownTower(tower_id))?;
        let run = self.run.as_mut().ok_or(CommandError::NoActiveLevel)?;
        let mut tower = self
            .world
            .get::<&mut Tower>(entity)
            .map_err(|_| CommandError::UnknownTower(tower_id))?;
        if tower.level >= MAX_TOWER_LEVEL {
            return Err(CommandError::MaxLevel);
        }
        let next = tower.level + 1;
        let cost = f64::from(self.content.towers.get(tower.kind).cost[usize::from(next)]);
        if run.resources < cost {
            return Err(CommandError::InsufficientResources {
                needed: cost,
                available: run.resources,
            });
        }
        run.resources -= cost;
        tower.level = next;
        debug!(tower = %tower_id, level = next, "tower upgraded");
        Ok(next)
    }

    /// Start the next wave. Returns the new wave number.
    pub fn start_next_wave(&mut self) -> Result<u32, CommandError> {
        let now = self.time.elapsed_ms;
        let speed = self.speed;
        let run = self.run_mut()?;
        if run.wave_in_progress {
            return Err(CommandError::WaveInProgress);
        }
        if run.waves_exhausted() {
            return Err(CommandError::WavesExhausted);
        }
        let groups = &run.level.waves[run.current_wave as usize];
        let schedule = systems::wave_spawner::build_schedule(groups, now, speed);
        run.current_wave += 1;
        run.wave_in_progress = true;
        run.spawn_queue = schedule;
        info!(wave = run.current_wave, spawns = run.spawn_queue.len(), "wave started");
        Ok(run.current_wave)
    }

    // --- UI-facing state ---

    pub fn select_tower_type(&mut self, kind: Option<TowerKind>) {
        self.selected_tower_type = kind;
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_open = !self.sidebar_open;
    }

    /// Set the speed multiplier, clamped to `0..=MAX_GAME_SPEED`. Zero freezes time.
    pub fn set_game_speed(&mut self, speed: f64) {
        if speed.is_nan() {
            return;
        }
        self.speed = speed.clamp(0.0, MAX_GAME_SPEED);
    }

    /// Sampled placement preview for the active level.
    pub fn placement_zones(&self) -> Option<PlacementZones> {
        let run = self.run.as_ref()?;
        let towers = tower_positions(&self.world);
        Some(valid_placement_zones(
            &run.level,
            &towers,
            &self.content.placement,
            PLACEMENT_ZONE_STEP,
        ))
    }

    /// Outline of what a placed tower can see within its effective range.
    pub fn visible_range(&self, tower_id: TowerId) -> Option<Vec<Position>> {
        let run = self.run.as_ref()?;
        let entity = find_tower(&self.world, tower_id)?;
        let tower = self.world.get::<&Tower>(entity).ok()?;
        let origin = *self.world.get::<&Position>(entity).ok()?;
        let stats = systems::towers::effective_stats(
            &self.content,
            tower.kind,
            tower.level,
            &self.upgrade_effects(),
            run.level.special_mechanic,
        );
        let radius = self.content.placement.obstacle_radius;
        Some(visible_range_polygon(origin, stats.range, &run.level.obstacles, radius).collect())
    }

    // --- Meta progression ---

    pub fn purchase_upgrade(&mut self, id: &str) -> Result<u32, CommandError> {
        let cost = shop::purchase_upgrade(&mut self.meta, &self.content, id)?;
        info!(upgrade = id, cost, coins = self.meta.coins, "upgrade purchased");
        self.persist();
        Ok(cost)
    }

    pub fn purchase_special_tower(&mut self, id: &str) -> Result<u32, CommandError> {
        let cost = shop::purchase_special_tower(&mut self.meta, &self.content, id)?;
        info!(tower = id, cost, coins = self.meta.coins, "special tower purchased");
        self.persist();
        Ok(cost)
    }

    /// Spin the roulette. `Ok(None)` means the spin was refunded.
    pub fn spin_roulette(&mut self) -> Result<Option<String>, CommandError> {
        let won = roulette::spin(&mut self.meta, &self.content, &mut self.rng)?;
        match &won {
            Some(id) => {
                info!(tower = %id, coins = self.meta.coins, "roulette unlocked a tower");
                self.persist();
            }
            None => info!("roulette draw had nothing left to unlock; refunded"),
        }
        Ok(won)
    }

    /// Copies of a special tower beyond the first.
    pub fn collection_bonus(&self, id: &str) -> u32 {
        self.meta.collection_bonus(id)
    }

    fn persist(&mut self) {
        if let Err(e) = self.store.save(&self.meta) {
            warn!(error = %e, "failed to save progress");
        }
    }

    // --- Phase transitions ---

    /// Enter level select for `region`. Locked or uncatalogued regions are rejected.
    pub fn select_region(&mut self, region: Region) -> Result<(), CommandError> {
        match self.content.region(region) {
            Some(def) if def.unlocked => {}
            _ => return Err(CommandError::RegionLocked(region)),
        }
        self.region = Some(region);
        self.set_phase(GamePhase::LevelSelect);
        Ok(())
    }

    /// Reset run state from the level definition and enter play.
    pub fn start_level(&mut self, level_id: u32) -> Result<(), CommandError> {
        let level = self
            .content
            .level(level_id)
            .ok_or(CommandError::UnknownLevel(level_id))?
            .clone();
        let upgrades = self.upgrade_effects();
        let run = run_setup::begin_run(&mut self.world, &level, &upgrades);
        info!(
            level = level.id,
            name = %level.name,
            resources = run.resources,
            lives = run.lives,
            "level started"
        );
        self.run = Some(run);
        self.time = SimTime::default();
        self.speed = self.start_speed;
        self.selected_tower_type = None;
        self.region = Some(level.region);
        self.set_phase(GamePhase::Playing);
        Ok(())
    }

    pub fn restart_level(&mut self) -> Result<(), CommandError> {
        let id = self.run.as_ref().ok_or(CommandError::NoActiveLevel)?.level.id;
        self.start_level(id)
    }

    /// Reload meta progress and return to the menu with no active level.
    pub fn reset_game(&mut self) {
        self.meta = load_or_default(self.store.as_ref());
        self.world.clear();
        self.run = None;
        self.time = SimTime::default();
        self.region = None;
        self.selected_tower_type = None;
        self.sidebar_open = true;
        self.speed = self.start_speed;
        self.set_phase(GamePhase::Menu);
    }
}

fn load_or_default(store: &(dyn ProgressStore + Send)) -> MetaProgress {
    match store.load() {
        Ok(meta) => meta,
        Err(e) => {
            warn!(error = %e, "failed to load progress; starting fresh");
            MetaProgress::default()
        }
    }
}
