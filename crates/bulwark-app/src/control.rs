//! Control surface over a running game loop.
//!
//! These are the entry points a front end calls: start the loop, forward
//! commands, poll the latest snapshot, stop.

use anyhow::{anyhow, bail, Context, Result};

use bulwark_core::commands::PlayerCommand;
use bulwark_core::state::GameStateSnapshot;
use bulwark_sim::SimulationEngine;

use crate::game_loop;
use crate::state::{AppState, GameLoopCommand};

fn poisoned<T>(_: T) -> anyhow::Error {
    anyhow!("app state lock poisoned")
}

/// Start the game loop with `engine`. Fails if one is already running.
pub fn start_simulation(state: &AppState, engine: SimulationEngine) -> Result<()> {
    let mut running = state.running.lock().map_err(poisoned)?;
    if *running {
        bail!("simulation already running");
    }

    let (cmd_tx, handle) = game_loop::spawn_game_loop(engine, state.latest_snapshot.clone())?;

    *state.command_tx.lock().map_err(poisoned)? = Some(cmd_tx);
    *state.worker.lock().map_err(poisoned)? = Some(handle);
    *running = true;
    Ok(())
}

/// Forward a player command to the loop.
pub fn send_command(state: &AppState, command: PlayerCommand) -> Result<()> {
    let tx = state.command_tx.lock().map_err(poisoned)?;
    match tx.as_ref() {
        Some(tx) => tx
            .send(GameLoopCommand::PlayerCommand(command))
            .context("game loop has stopped"),
        None => bail!("simulation not started"),
    }
}

/// Latest published snapshot, if the loop has produced one.
pub fn get_snapshot(state: &AppState) -> Result<Option<GameStateSnapshot>> {
    let lock = state.latest_snapshot.lock().map_err(poisoned)?;
    Ok(lock.clone())
}

/// Stop the loop and wait for its thread. A no-op if nothing is running.
pub fn stop_simulation(state: &AppState) -> Result<()> {
    let mut running = state.running.lock().map_err(poisoned)?;
    if let Some(tx) = state.command_tx.lock().map_err(poisoned)?.take() {
        // a send error means the loop already exited
        let _ = tx.send(GameLoopCommand::Shutdown);
    }
    if let Some(handle) = state.worker.lock().map_err(poisoned)?.take() {
        handle
            .join()
            .map_err(|_| anyhow!("game loop thread panicked"))?;
    }
    *running = false;
    Ok(())
}
