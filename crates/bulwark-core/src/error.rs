//! Command rejection reasons.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::enums::Region;
use crate::types::TowerId;

/// Why a command was rejected. A rejected command never mutates state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandError {
    InsufficientResources { needed: f64, available: f64 },
    InsufficientCoins { needed: u32, available: u32 },
    InvalidPlacement,
    MaxLevel,
    UnknownTower(TowerId),
    UnknownUpgrade(String),
    UnknownSpecialTower(String),
    UnknownLevel(u32),
    RegionLocked(Region),
    AlreadyOwned(String),
    NoActiveLevel,
    WaveInProgress,
    WavesExhausted,
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::InsufficientResources { needed, available } => {
                write!(f, "insufficient resources: need {needed}, have {available}")
            }
            CommandError::InsufficientCoins { needed, available } => {
                write!(f, "insufficient coins: need {needed}, have {available}")
            }
            CommandError::InvalidPlacement => write!(f, "invalid tower placement"),
            CommandError::MaxLevel => write!(f, "tower is already at max level"),
            CommandError::UnknownTower(id) => write!(f, "unknown tower {id}"),
            CommandError::UnknownUpgrade(id) => write!(f, "unknown upgrade '{id}'"),
            CommandError::UnknownSpecialTower(id) => write!(f, "unknown special tower '{id}'"),
            CommandError::UnknownLevel(id) => write!(f, "unknown level {id}"),
            CommandError::RegionLocked(region) => write!(f, "region {region:?} is locked"),
            CommandError::AlreadyOwned(id) => write!(f, "'{id}' is already owned"),
            CommandError::NoActiveLevel => write!(f, "no level is being played"),
            CommandError::WaveInProgress => write!(f, "a wave is already in progress"),
            CommandError::WavesExhausted => write!(f, "all waves have been started"),
        }
    }
}

impl std::error::Error for CommandError {}
