use thiserror::Error;

use crate::campaign::hex::HexCoord;
use crate::core::types::ArmyId;

#[derive(Error, Debug)]
pub enum CombatError {
    #[error("Army not found: {0:?}")]
    ArmyNotFound(ArmyId),

    #[error("Army already engaged in combat: {0:?}")]
    AlreadyEngaged(ArmyId),

    #[error("No hostile defenders at {0:?}")]
    NoDefenders(HexCoord),

    #[error("Army mismatch on relink: expected {expected:?}, got {found:?}")]
    ArmyMismatch { expected: ArmyId, found: ArmyId },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid scenario: {0}")]
    InvalidScenario(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CombatError>;
