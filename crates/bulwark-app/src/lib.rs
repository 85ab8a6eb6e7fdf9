//! Bulwark headless application.
//!
//! Wires the simulation engine to a fixed-rate game-loop thread, exposes
//! a small control surface for sending commands and polling snapshots,
//! and provides the autopilot used by the `bulwark` binary.

pub mod autopilot;
pub mod control;
pub mod game_loop;
pub mod state;

pub use bulwark_core as core;
