//! Simulation engine for Bulwark.
//!
//! Owns the hecs ECS world, advances it by caller-supplied time slices,
//! applies player commands, and produces `GameStateSnapshot`s.

pub mod components;
pub mod engine;
pub mod run_setup;
pub mod systems;

pub use bulwark_core as core;
pub use engine::{CommandOutcome, SimConfig, SimulationEngine};

#[cfg(test)]
mod tests;
