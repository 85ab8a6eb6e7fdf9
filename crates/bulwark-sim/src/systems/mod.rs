//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are free functions over `&mut World` plus the run state they
//! need. They run in a fixed order; see `SimulationEngine::advance`.

pub mod damage;
pub mod economy;
pub mod enemies;
pub mod outcome;
pub mod projectiles;
pub mod snapshot;
pub mod towers;
pub mod wave_spawner;
