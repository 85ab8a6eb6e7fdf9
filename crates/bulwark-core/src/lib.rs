//! Core types and definitions for the Bulwark tower-defense simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! positions, identifiers, content tables, commands, snapshots, errors,
//! and tuning constants. It has no dependency on any runtime framework.

pub mod commands;
pub mod constants;
pub mod content;
pub mod enums;
pub mod error;
pub mod levels;
pub mod modifiers;
pub mod state;
pub mod types;
