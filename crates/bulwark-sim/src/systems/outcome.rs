//! Wave completion and win/loss evaluation.

use hecs::World;

use bulwark_core::enums::GamePhase;

use crate::components::{Enemy, RunState};

/// Close the current wave once its queue is drained and the field is empty.
pub fn check_wave_completion(world: &World, run: &mut RunState) -> bool {
    let field_clear = world.query::<&Enemy>().iter().next().is_none();
    if run.wave_in_progress && run.spawn_queue.is_empty() && field_clear {
        run.wave_in_progress = false;
        return true;
    }
    false
}

/// Terminal phase reached this tick, if any. Loss takes precedence.
pub fn check_terminal(run: &RunState) -> Option<GamePhase> {
    if run.lives <= 0 {
        Some(GamePhase::GameOver)
    } else if run.waves_exhausted() && !run.wave_in_progress {
        Some(GamePhase::Victory)
    } else {
        None
    }
}
