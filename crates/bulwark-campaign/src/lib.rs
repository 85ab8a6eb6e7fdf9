//! Meta progression carried between runs: coins, owned shop upgrades and
//! unlocked special towers, plus the store that persists them.

pub mod progress;
pub mod roulette;
pub mod shop;
pub mod store;

pub use progress::MetaProgress;
pub use store::{JsonFileStore, MemoryStore, ProgressStore};
