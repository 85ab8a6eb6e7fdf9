//! Tests for the simulation engine, tower commands, wave dispatch and
//! meta-progression wiring.

use bulwark_campaign::{MemoryStore, MetaProgress};
use bulwark_core::commands::PlayerCommand;
use bulwark_core::content::ContentTables;
use bulwark_core::enums::*;
use bulwark_core::error::CommandError;
use bulwark_core::levels::{LevelDef, WaveGroup};
use bulwark_core::types::{Position, TowerId};

use crate::engine::{CommandOutcome, SimConfig, SimulationEngine};

const FRAME: f64 = 1000.0 / 60.0;
const LANE_ID: u32 = 900;

fn lane(waves: Vec<Vec<WaveGroup>>) -> LevelDef {
    LevelDef {
        id: LANE_ID,
        name: "Test Lane".into(),
        description: String::new(),
        difficulty: Difficulty::Easy,
        region: Region::Forest,
        waypoints: vec![Position::new(-20.0, 200.0), Position::new(820.0, 200.0)],
        obstacles: vec![],
        waves,
        initial_resources: 500.0,
        initial_lives: 5,
        reward_coins: 40,
        special_mechanic: None,
    }
}

fn group(enemy: EnemyKind, count: u32, delay: f64) -> WaveGroup {
    WaveGroup {
        enemy,
        count,
        spawn_delay_ms: delay,
    }
}

fn engine_with_level(level: LevelDef, store: MemoryStore) -> SimulationEngine {
    let mut content = ContentTables::default();
    content.levels.push(level);
    let mut engine = SimulationEngine::new(
        SimConfig {
            content,
            ..SimConfig::default()
        },
        store,
    );
    engine.start_level(LANE_ID).unwrap();
    engine
}

fn lane_engine(waves: Vec<Vec<WaveGroup>>) -> SimulationEngine {
    engine_with_level(lane(waves), MemoryStore::new())
}

fn tick_n(engine: &mut SimulationEngine, n: usize) {
    for _ in 0..n {
        engine.advance(FRAME);
    }
}

fn resources(engine: &SimulationEngine) -> f64 {
    engine.run_state().unwrap().resources
}

// ---- Phase machine ----

#[test]
fn test_new_engine_starts_in_menu() {
    let engine = SimulationEngine::new(SimConfig::default(), MemoryStore::new());
    assert_eq!(engine.phase(), GamePhase::Menu);
    assert!(engine.run_state().is_none());
}

#[test]
fn test_advance_outside_play_is_noop() {
    let mut engine = SimulationEngine::new(SimConfig::default(), MemoryStore::new());
    engine.advance(FRAME);
    assert_eq!(engine.time().tick, 0, "menu must not tick");
}

#[test]
fn test_phase_transitions() {
    let mut engine = SimulationEngine::new(SimConfig::default(), MemoryStore::new());
    engine.apply(PlayerCommand::GoToShop).unwrap();
    assert_eq!(engine.phase(), GamePhase::Shop);
    engine.apply(PlayerCommand::GoToRegionSelect).unwrap();
    engine
        .apply(PlayerCommand::SelectRegion {
            region: Region::Forest,
        })
        .unwrap();
    assert_eq!(engine.phase(), GamePhase::LevelSelect);
    assert_eq!(engine.snapshot().region, Some(Region::Forest));
    assert_eq!(
        engine.apply(PlayerCommand::SelectRegion {
            region: Region::Volcano
        }),
        Err(CommandError::RegionLocked(Region::Volcano))
    );
    assert_eq!(engine.snapshot().region, Some(Region::Forest), "locked region leaves state alone");
    engine.apply(PlayerCommand::StartLevel { level_id: 1 }).unwrap();
    assert_eq!(engine.phase(), GamePhase::Playing);
    engine.apply(PlayerCommand::GoToSettings).unwrap();
    assert_eq!(engine.phase(), GamePhase::Settings);
}

#[test]
fn test_start_unknown_level_rejected() {
    let mut engine = SimulationEngine::new(SimConfig::default(), MemoryStore::new());
    assert_eq!(engine.start_level(999), Err(CommandError::UnknownLevel(999)));
    assert_eq!(engine.phase(), GamePhase::Menu);
}

#[test]
fn test_start_level_applies_owned_upgrades() {
    let store = MemoryStore::with_progress(MetaProgress {
        coins: 0,
        owned_upgrades: vec!["starting_resources".into(), "extra_lives".into()],
        unlocked_towers: vec![],
    });
    let engine = engine_with_level(lane(vec![vec![group(EnemyKind::Fast, 1, 100.0)]]), store);
    let run = engine.run_state().unwrap();
    assert_eq!(run.resources, 600.0);
    assert_eq!(run.lives, 10);
}

#[test]
fn test_divine_protection_sets_lives() {
    let store = MemoryStore::with_progress(MetaProgress {
        coins: 0,
        owned_upgrades: vec!["extra_lives".into(), "god_mode".into()],
        unlocked_towers: vec![],
    });
    let engine = engine_with_level(lane(vec![vec![group(EnemyKind::Fast, 1, 100.0)]]), store);
    assert_eq!(engine.run_state().unwrap().lives, 100);
}

#[test]
fn test_restart_resets_run_scoped_state() {
    let mut engine = lane_engine(vec![vec![group(EnemyKind::Tank, 3, 500.0)]]);
    engine
        .place_tower(Position::new(100.0, 300.0), TowerKind::Basic)
        .unwrap();
    engine.set_game_speed(3.0);
    engine.start_next_wave().unwrap();
    tick_n(&mut engine, 120);

    engine.apply(PlayerCommand::RestartLevel).unwrap();
    let snap = engine.snapshot();
    assert_eq!(snap.phase, GamePhase::Playing);
    assert!(snap.towers.is_empty());
    assert!(snap.enemies.is_empty());
    assert!(snap.projectiles.is_empty());
    assert_eq!(snap.resources, 500.0);
    assert_eq!(snap.current_wave, 0);
    assert!(!snap.wave_in_progress);
    assert_eq!(snap.game_speed, 1.0);
    assert_eq!(snap.time.tick, 0);
}

// ---- Tower commands ----

#[test]
fn test_place_tower_debits_cost() {
    let mut engine = lane_engine(vec![vec![group(EnemyKind::Fast, 1, 100.0)]]);
    let id = engine
        .place_tower(Position::new(100.0, 300.0), TowerKind::Area)
        .unwrap();
    assert_eq!(resources(&engine), 425.0);
    let snap = engine.snapshot();
    assert_eq!(snap.towers.len(), 1);
    assert_eq!(snap.towers[0].id, id);
    assert_eq!(snap.towers[0].level, 0);
    assert!(snap.towers[0].target.is_none());
}

#[test]
fn test_place_on_path_rejected_without_mutation() {
    let mut engine = lane_engine(vec![vec![group(EnemyKind::Fast, 1, 100.0)]]);
    for y in [200.0, 185.0, 229.0] {
        let result = engine.place_tower(Position::new(300.0, y), TowerKind::Basic);
        assert_eq!(result, Err(CommandError::InvalidPlacement), "y = {y}");
    }
    assert_eq!(resources(&engine), 500.0);
    assert!(engine.snapshot().towers.is_empty());
}

#[test]
fn test_place_too_close_to_tower_rejected() {
    let mut engine = lane_engine(vec![vec![group(EnemyKind::Fast, 1, 100.0)]]);
    engine
        .place_tower(Position::new(100.0, 300.0), TowerKind::Basic)
        .unwrap();
    assert_eq!(
        engine.place_tower(Position::new(120.0, 300.0), TowerKind::Basic),
        Err(CommandError::InvalidPlacement)
    );
}

#[test]
fn test_place_without_resources_rejected() {
    let mut level = lane(vec![vec![group(EnemyKind::Fast, 1, 100.0)]]);
    level.initial_resources = 40.0;
    let mut engine = engine_with_level(level, MemoryStore::new());
    let result = engine.place_tower(Position::new(100.0, 300.0), TowerKind::Basic);
    assert!(matches!(result, Err(CommandError::InsufficientResources { .. })));
    assert_eq!(resources(&engine), 40.0);
}

#[test]
fn test_place_without_level_rejected() {
    let mut engine = SimulationEngine::new(SimConfig::default(), MemoryStore::new());
    assert_eq!(
        engine.place_tower(Position::new(100.0, 300.0), TowerKind::Basic),
        Err(CommandError::NoActiveLevel)
    );
}

#[test]
fn test_sell_refunds_level_value() {
    let mut engine = lane_engine(vec![vec![group(EnemyKind::Fast, 1, 100.0)]]);
    let a = engine
        .place_tower(Position::new(100.0, 300.0), TowerKind::Basic)
        .unwrap();
    engine
        .place_tower(Position::new(200.0, 300.0), TowerKind::Slow)
        .unwrap();
    engine.upgrade_tower(a).unwrap();
    let before = resources(&engine);

    assert_eq!(engine.sell_tower(a), Ok(87));
    assert_eq!(resources(&engine), before + 87.0);
    let snap = engine.snapshot();
    assert_eq!(snap.towers.len(), 1, "exactly one tower removed");
    assert!(snap.towers.iter().all(|t| t.id != a));
}

#[test]
fn test_sell_unknown_tower_rejected() {
    let mut engine = lane_engine(vec![vec![group(EnemyKind::Fast, 1, 100.0)]]);
    assert_eq!(
        engine.sell_tower(TowerId(77)),
        Err(CommandError::UnknownTower(TowerId(77)))
    );
    assert_eq!(resources(&engine), 500.0);
}

#[test]
fn test_upgrade_stops_at_max_level() {
    let mut engine = lane_engine(vec![vec![group(EnemyKind::Fast, 1, 100.0)]]);
    let id = engine
        .place_tower(Position::new(100.0, 300.0), TowerKind::Basic)
        .unwrap();
    assert_eq!(engine.upgrade_tower(id), Ok(1));
    assert_eq!(engine.upgrade_tower(id), Ok(2));
    assert_eq!(resources(&engine), 500.0 - 50.0 - 75.0 - 100.0);

    let before = resources(&engine);
    assert_eq!(engine.upgrade_tower(id), Err(CommandError::MaxLevel));
    assert_eq!(resources(&engine), before, "failed upgrade must not debit");
    assert_eq!(engine.snapshot().towers[0].level, 2);
}

#[test]
fn test_upgrade_without_resources_rejected() {
    let mut level = lane(vec![vec![group(EnemyKind::Fast, 1, 100.0)]]);
    level.initial_resources = 100.0;
    let mut engine = engine_with_level(level, MemoryStore::new());
    let id = engine
        .place_tower(Position::new(100.0, 300.0), TowerKind::Basic)
        .unwrap();
    assert!(matches!(
        engine.upgrade_tower(id),
        Err(CommandError::InsufficientResources { .. })
    ));
    assert_eq!(engine.snapshot().towers[0].level, 0);
}

// ---- Waves ----

#[test]
fn test_start_next_wave_rejections() {
    let mut engine = lane_engine(vec![vec![group(EnemyKind::Fast, 2, 100.0)]]);
    assert_eq!(engine.start_next_wave(), Ok(1));
    assert_eq!(engine.start_next_wave(), Err(CommandError::WaveInProgress));
    assert_eq!(engine.run_state().unwrap().current_wave, 1);
    assert_eq!(engine.run_state().unwrap().spawn_queue.len(), 2);
}

#[test]
fn test_start_next_wave_exhausted() {
    let mut level = lane(vec![vec![group(EnemyKind::Fast, 1, 100.0)]]);
    level.initial_lives = 50;
    let mut engine = engine_with_level(level, MemoryStore::new());
    engine.start_next_wave().unwrap();
    // the wave closes once the enemy escapes
    for _ in 0..2000 {
        engine.advance(FRAME);
        if !engine.snapshot().wave_in_progress {
            break;
        }
    }
    assert_eq!(engine.start_next_wave(), Err(CommandError::WavesExhausted));
    assert_eq!(engine.run_state().unwrap().current_wave, 1);
}

#[test]
fn test_spawn_waits_for_stagger() {
    let mut engine = lane_engine(vec![vec![group(EnemyKind::Fast, 3, 500.0)]]);
    engine.start_next_wave().unwrap();
    tick_n(&mut engine, 59);
    assert!(engine.snapshot().enemies.is_empty(), "nothing spawns before one second");
    tick_n(&mut engine, 2);
    assert_eq!(engine.snapshot().enemies.len(), 1);
    tick_n(&mut engine, 31);
    assert_eq!(engine.snapshot().enemies.len(), 2);
}

#[test]
fn test_stagger_is_one_wall_second_at_any_speed() {
    let mut engine = lane_engine(vec![vec![group(EnemyKind::Fast, 3, 500.0)]]);
    engine.set_game_speed(2.0);
    engine.start_next_wave().unwrap();
    tick_n(&mut engine, 59);
    assert!(engine.snapshot().enemies.is_empty(), "double speed still waits a second");
    tick_n(&mut engine, 2);
    assert_eq!(engine.snapshot().enemies.len(), 1);
}

#[test]
fn test_later_waves_use_higher_tier() {
    let waves = (0..4).map(|_| vec![group(EnemyKind::Tank, 1, 100.0)]).collect();
    let mut level = lane(waves);
    level.initial_lives = 50;
    let mut engine = engine_with_level(level, MemoryStore::new());
    for _ in 0..3 {
        engine.start_next_wave().unwrap();
        for _ in 0..5000 {
            engine.advance(FRAME);
            if !engine.snapshot().wave_in_progress {
                break;
            }
        }
    }
    engine.start_next_wave().unwrap();
    tick_n(&mut engine, 61);
    let snap = engine.snapshot();
    assert_eq!(snap.current_wave, 4);
    assert_eq!(snap.enemies.len(), 1);
    assert_eq!(snap.enemies[0].max_health, 180.0, "wave 4 spawns tier-1 tanks");
}

// ---- Time ----

#[test]
fn test_speed_zero_freezes() {
    let mut engine = lane_engine(vec![vec![group(EnemyKind::Fast, 1, 100.0)]]);
    engine.start_next_wave().unwrap();
    engine.apply(PlayerCommand::SetGameSpeed { speed: 0.0 }).unwrap();
    tick_n(&mut engine, 200);
    assert_eq!(engine.time().elapsed_ms, 0.0);
    assert!(engine.snapshot().enemies.is_empty());
}

#[test]
fn test_speed_is_clamped() {
    let mut engine = lane_engine(vec![vec![group(EnemyKind::Fast, 1, 100.0)]]);
    engine.set_game_speed(10.0);
    assert_eq!(engine.speed(), 4.0);
    engine.set_game_speed(-1.0);
    assert_eq!(engine.speed(), 0.0);
}

#[test]
fn test_speed_scales_clock() {
    let mut engine = lane_engine(vec![vec![group(EnemyKind::Fast, 1, 100.0)]]);
    engine.set_game_speed(2.0);
    engine.advance(100.0);
    assert_eq!(engine.time().elapsed_ms, 200.0);
}

// ---- Economy ----

#[test]
fn test_resource_tower_income() {
    let mut engine = lane_engine(vec![vec![group(EnemyKind::Fast, 1, 100.0)]]);
    engine
        .place_tower(Position::new(100.0, 300.0), TowerKind::Resource)
        .unwrap();
    assert_eq!(resources(&engine), 400.0);

    engine.advance(FRAME);
    // tower step grants the flat amount, passive step the level-scaled one
    assert_eq!(resources(&engine), 450.0);

    tick_n(&mut engine, 300);
    assert_eq!(resources(&engine), 450.0, "nothing more before the interval");

    tick_n(&mut engine, 400);
    assert_eq!(resources(&engine), 500.0);
}

#[test]
fn test_economic_boost_scales_income() {
    let store = MemoryStore::with_progress(MetaProgress {
        coins: 0,
        owned_upgrades: vec!["resource_boost".into()],
        unlocked_towers: vec![],
    });
    let mut engine = engine_with_level(lane(vec![vec![group(EnemyKind::Fast, 1, 100.0)]]), store);
    engine
        .place_tower(Position::new(100.0, 300.0), TowerKind::Resource)
        .unwrap();
    engine.advance(FRAME);
    assert_eq!(resources(&engine), 400.0 + 37.5 + 37.5);
}

// ---- Meta progression ----

#[test]
fn test_purchase_upgrade_persists() {
    let handle = MemoryStore::with_progress(MetaProgress {
        coins: 150,
        ..MetaProgress::default()
    });
    let mut engine = SimulationEngine::new(SimConfig::default(), handle.clone());
    let outcome = engine
        .apply(PlayerCommand::PurchaseUpgrade {
            upgrade_id: "range_boost".into(),
        })
        .unwrap();
    assert_eq!(outcome, CommandOutcome::Purchased { cost: 80 });
    let stored = handle.stored().unwrap();
    assert_eq!(stored.coins, 70);
    assert_eq!(stored.owned_upgrades, vec!["range_boost".to_string()]);
}

#[test]
fn test_rejected_purchase_does_not_persist() {
    let handle = MemoryStore::with_progress(MetaProgress {
        coins: 10,
        ..MetaProgress::default()
    });
    let mut engine = SimulationEngine::new(SimConfig::default(), handle.clone());
    assert!(engine.purchase_upgrade("damage_boost").is_err());
    assert!(engine.spin_roulette().is_err());
    assert_eq!(handle.save_count(), 0);
    assert_eq!(engine.meta().coins, 10);
}

#[test]
fn test_range_boost_shows_in_snapshot() {
    let store = MemoryStore::with_progress(MetaProgress {
        coins: 0,
        owned_upgrades: vec!["range_boost".into()],
        unlocked_towers: vec![],
    });
    let mut engine = engine_with_level(lane(vec![vec![group(EnemyKind::Fast, 1, 100.0)]]), store);
    engine
        .place_tower(Position::new(100.0, 300.0), TowerKind::Basic)
        .unwrap();
    let range = engine.snapshot().towers[0].range;
    assert!((range - 92.0).abs() < 1e-9, "range was {range}");
}

#[test]
fn test_roulette_through_engine() {
    let mut content = ContentTables::default();
    content.rarity_weights.retain(|w| w.rarity == Rarity::Legendary);
    let handle = MemoryStore::with_progress(MetaProgress {
        coins: 200,
        ..MetaProgress::default()
    });
    let mut engine = SimulationEngine::new(
        SimConfig {
            content,
            ..SimConfig::default()
        },
        handle.clone(),
    );
    let won = engine.spin_roulette().unwrap().unwrap();
    assert!(won == "laser" || won == "plasma", "got {won}");
    assert_eq!(engine.meta().coins, 150);
    assert_eq!(handle.stored().unwrap().unlocked_towers, vec![won]);
    assert_eq!(engine.snapshot().unlocked_towers.len(), 1);
}

#[test]
fn test_reset_game_reloads_progress() {
    let handle = MemoryStore::with_progress(MetaProgress {
        coins: 500,
        ..MetaProgress::default()
    });
    let mut engine = SimulationEngine::new(SimConfig::default(), handle.clone());
    engine.purchase_upgrade("damage_boost").unwrap();
    engine.start_level(1).unwrap();
    engine.toggle_sidebar();

    engine.apply(PlayerCommand::ResetGame).unwrap();
    let snap = engine.snapshot();
    assert_eq!(snap.phase, GamePhase::Menu);
    assert_eq!(snap.coins, 400);
    assert_eq!(snap.owned_upgrades, vec!["damage_boost".to_string()]);
    assert!(snap.level_id.is_none());
    assert!(snap.sidebar_open);
}

#[test]
fn test_ui_flags() {
    let mut engine = SimulationEngine::new(SimConfig::default(), MemoryStore::new());
    engine
        .apply(PlayerCommand::SelectTowerType {
            kind: Some(TowerKind::Slow),
        })
        .unwrap();
    engine.apply(PlayerCommand::ToggleSidebar).unwrap();
    let snap = engine.snapshot();
    assert_eq!(snap.selected_tower_type, Some(TowerKind::Slow));
    assert!(!snap.sidebar_open);
}

// ---- Previews ----

#[test]
fn test_placement_zones_match_validator() {
    let mut engine = lane_engine(vec![vec![group(EnemyKind::Fast, 1, 100.0)]]);
    let zones = engine.placement_zones().unwrap();
    let p = zones.valid[zones.valid.len() / 2];
    assert!(engine.place_tower(p, TowerKind::Basic).is_ok());
    assert!(zones
        .invalid
        .iter()
        .all(|q| (q.y - 200.0).abs() < 30.0));
}

#[test]
fn test_visible_range_for_tower() {
    let mut engine = lane_engine(vec![vec![group(EnemyKind::Fast, 1, 100.0)]]);
    let id = engine
        .place_tower(Position::new(100.0, 300.0), TowerKind::Basic)
        .unwrap();
    let outline = engine.visible_range(id).unwrap();
    assert_eq!(outline.len(), 360);
    assert!(engine.visible_range(TowerId(999)).is_none());
}
