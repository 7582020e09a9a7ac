//! Combat configuration with documented constants
//!
//! Every tunable the engine reads lives here. Defaults come from
//! `combat::constants`; a TOML file may override any subset of them.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::combat::constants::{
    CAVALRY_FLANK_BONUS, ENTRENCHMENT_COVER_RADIUS, ENTRENCHMENT_DEFENSE_BONUS,
    MAX_DEFENSE_REDUCTION, MELEE_ENGAGEMENT_THRESHOLD_SECS, MINIMUM_HIT_DAMAGE,
};
use crate::core::error::{CombatError, Result};

/// Configuration for combat resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    // === PHASES ===
    /// Simulated seconds of ranged exchange before the lines close
    pub melee_engagement_threshold: f64,

    // === DAMAGE ===
    /// Multiplier for flanking cavalry striking a ranged target
    pub cavalry_flank_bonus: f64,

    /// Floor applied to every per-unit hit after armor
    ///
    /// Must be positive: it is what guarantees that every combat
    /// eventually ends.
    pub minimum_hit_damage: f64,

    // === DEFENSE ===
    /// Damage reduction granted to entrenched defenders
    pub entrenchment_defense_bonus: f64,

    /// How many hexes an entrenched army covers around its own tile
    ///
    /// At 1, an entrenched army defends every adjacent tile as a
    /// cross-tile defender.
    pub entrenchment_cover_radius: u32,

    /// Upper bound on the combined terrain + entrenchment reduction
    pub max_defense_reduction: f64,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            melee_engagement_threshold: MELEE_ENGAGEMENT_THRESHOLD_SECS,
            cavalry_flank_bonus: CAVALRY_FLANK_BONUS,
            minimum_hit_damage: MINIMUM_HIT_DAMAGE,
            entrenchment_defense_bonus: ENTRENCHMENT_DEFENSE_BONUS,
            entrenchment_cover_radius: ENTRENCHMENT_COVER_RADIUS,
            max_defense_reduction: MAX_DEFENSE_REDUCTION,
        }
    }
}

impl CombatConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML, filling missing keys with defaults
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: CombatConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if !(self.melee_engagement_threshold >= 0.0) {
            return Err(CombatError::InvalidConfig(format!(
                "melee_engagement_threshold ({}) must be non-negative",
                self.melee_engagement_threshold
            )));
        }

        if !(self.minimum_hit_damage > 0.0) {
            return Err(CombatError::InvalidConfig(format!(
                "minimum_hit_damage ({}) must be positive",
                self.minimum_hit_damage
            )));
        }

        if !(self.cavalry_flank_bonus > 0.0) {
            return Err(CombatError::InvalidConfig(format!(
                "cavalry_flank_bonus ({}) must be positive",
                self.cavalry_flank_bonus
            )));
        }

        if !(0.0..1.0).contains(&self.max_defense_reduction) {
            return Err(CombatError::InvalidConfig(format!(
                "max_defense_reduction ({}) must be in [0, 1)",
                self.max_defense_reduction
            )));
        }

        if !(0.0..=self.max_defense_reduction).contains(&self.entrenchment_defense_bonus) {
            return Err(CombatError::InvalidConfig(format!(
                "entrenchment_defense_bonus ({}) should be <= max_defense_reduction ({})",
                self.entrenchment_defense_bonus, self.max_defense_reduction
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        assert!(CombatConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = CombatConfig::from_toml_str("melee_engagement_threshold = 5.0\n")
            .expect("partial config should parse");
        assert_eq!(config.melee_engagement_threshold, 5.0);
        assert_eq!(config.cavalry_flank_bonus, CAVALRY_FLANK_BONUS);
    }

    #[test]
    fn test_zero_minimum_damage_rejected() {
        let result = CombatConfig::from_toml_str("minimum_hit_damage = 0.0\n");
        assert!(matches!(result, Err(CombatError::InvalidConfig(_))));
    }

    #[test]
    fn test_malformed_toml_rejected() {
        let result = CombatConfig::from_toml_str("melee_engagement_threshold = \"soon\"\n");
        assert!(matches!(result, Err(CombatError::TomlError(_))));
    }

    #[test]
    fn test_full_reduction_rejected() {
        let config = CombatConfig {
            max_defense_reduction: 1.0,
            ..CombatConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
