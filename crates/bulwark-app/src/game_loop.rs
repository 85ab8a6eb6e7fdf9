//! Game loop thread: drives the engine at 60 Hz and publishes snapshots.
//!
//! The engine moves into the thread and is never shared. Commands arrive
//! over an `mpsc` channel and are applied between ticks; the latest
//! snapshot is stored behind a mutex for polling.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::{debug, info};

use bulwark_core::constants::REFERENCE_FRAME_MS;
use bulwark_core::state::GameStateSnapshot;
use bulwark_sim::SimulationEngine;

use crate::state::GameLoopCommand;

/// Ticks per wall-clock second.
pub const TICK_RATE: u32 = 60;

/// Wall-clock duration of one tick. Game speed scales simulated time, not
/// the loop rate.
const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Spawn the game loop on a named thread.
///
/// Returns the command sender and the thread handle.
pub fn spawn_game_loop(
    engine: SimulationEngine,
    latest_snapshot: Arc<Mutex<Option<GameStateSnapshot>>>,
) -> Result<(mpsc::Sender<GameLoopCommand>, JoinHandle<()>)> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    let handle = std::thread::Builder::new()
        .name("bulwark-game-loop".into())
        .spawn(move || run_game_loop(engine, cmd_rx, &latest_snapshot))
        .context("failed to spawn game loop thread")?;

    Ok((cmd_tx, handle))
}

/// Whether the loop should keep going after draining its inbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Stop,
}

/// Apply every pending command. Rejections are logged and dropped.
pub fn drain_commands(
    engine: &mut SimulationEngine,
    cmd_rx: &mpsc::Receiver<GameLoopCommand>,
) -> LoopControl {
    loop {
        match cmd_rx.try_recv() {
            Ok(GameLoopCommand::PlayerCommand(cmd)) => match engine.apply(cmd) {
                Ok(outcome) => debug!(?outcome, "command applied"),
                Err(e) => debug!(error = %e, "command rejected"),
            },
            Ok(GameLoopCommand::Shutdown) => return LoopControl::Stop,
            Err(mpsc::TryRecvError::Empty) => return LoopControl::Continue,
            Err(mpsc::TryRecvError::Disconnected) => return LoopControl::Stop,
        }
    }
}

fn publish(engine: &SimulationEngine, latest_snapshot: &Mutex<Option<GameStateSnapshot>>) {
    if let Ok(mut lock) = latest_snapshot.lock() {
        *lock = Some(engine.snapshot());
    }
}

/// Runs until `Shutdown` or channel disconnect.
fn run_game_loop(
    mut engine: SimulationEngine,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &Mutex<Option<GameStateSnapshot>>,
) {
    info!(rate = TICK_RATE, "game loop started");
    publish(&engine, latest_snapshot);
    let mut next_tick_time = Instant::now();

    loop {
        // 1. Commands
        if drain_commands(&mut engine, &cmd_rx) == LoopControl::Stop {
            break;
        }

        // 2. Tick; the engine ignores it outside a level
        engine.advance(REFERENCE_FRAME_MS);

        // 3. Publish
        publish(&engine, latest_snapshot);

        // 4. Sleep until next tick
        next_tick_time += TICK_DURATION;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > TICK_DURATION * 2 {
            // too far behind, drop the backlog
            next_tick_time = now;
        }
    }
    info!(tick = engine.time().tick, "game loop stopped");
}
