//! Wave spawning: builds the per-wave spawn schedule and drains it as sim
//! time passes.

use std::collections::VecDeque;

use hecs::World;
use tracing::debug;

use bulwark_core::constants::WAVE_START_STAGGER_MS;
use bulwark_core::content::ContentTables;
use bulwark_core::levels::WaveGroup;

use crate::components::{IdAllocator, RunState, ScheduledSpawn};
use crate::run_setup::spawn_enemy;

/// Flatten a wave's groups into a time-ordered schedule.
///
/// The first entry is due one wall-clock second after `now`, which is
/// `WAVE_START_STAGGER_MS * speed` on the sim clock. Each entry after that
/// follows the previous one by its group's spawn delay, with a single
/// cursor shared across groups.
pub fn build_schedule(groups: &[WaveGroup], now: f64, speed: f64) -> VecDeque<ScheduledSpawn> {
    let mut cursor = now + WAVE_START_STAGGER_MS * speed;
    let mut entries = Vec::new();
    for group in groups {
        for _ in 0..group.count {
            entries.push(ScheduledSpawn {
                at_ms: cursor,
                enemy: group.enemy,
            });
            cursor += group.spawn_delay_ms;
        }
    }
    // stable: equal times keep group order
    entries.sort_by(|a, b| a.at_ms.total_cmp(&b.at_ms));
    entries.into()
}

/// Spawn every queued enemy whose time has come. Returns how many spawned.
pub fn run(
    world: &mut World,
    run: &mut RunState,
    content: &ContentTables,
    ids: &mut IdAllocator,
    now: f64,
) -> usize {
    if !run.wave_in_progress {
        return 0;
    }
    let mut spawned = 0;
    while let Some(next) = run.spawn_queue.front().copied() {
        if next.at_ms > now {
            break;
        }
        run.spawn_queue.pop_front();
        spawn_enemy(world, ids, content, run, next.enemy);
        spawned += 1;
    }
    if spawned > 0 {
        debug!(spawned, remaining = run.spawn_queue.len(), "spawned enemies");
    }
    spawned
}
