//! Terrain types and their combat effects
//!
//! Terrain favours the side holding the tile: the defender takes reduced
//! damage and the attacker deals reduced damage.

use serde::{Deserialize, Serialize};

/// Terrain of a map tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TerrainType {
    #[default]
    Plains,
    Desert,
    Forest,
    Hills,
    Mountains,
    Marsh,
    RiverCrossing,
}

/// Combat modifiers derived from terrain
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct TerrainModifiers {
    /// Fraction of incoming damage the defender shrugs off
    pub defender_defense_bonus: f64,
    /// Fraction of outgoing damage the attacker loses
    pub attacker_attack_penalty: f64,
}

impl TerrainType {
    pub fn modifiers(&self) -> TerrainModifiers {
        TerrainModifiers {
            defender_defense_bonus: self.defense_bonus(),
            attacker_attack_penalty: self.attack_penalty(),
        }
    }

    /// Damage reduction for whoever holds the tile
    pub fn defense_bonus(&self) -> f64 {
        match self {
            TerrainType::Plains => 0.0,
            TerrainType::Desert => 0.0,
            TerrainType::Forest => 0.15,
            TerrainType::Hills => 0.2,
            TerrainType::Mountains => 0.3,
            TerrainType::Marsh => 0.05,
            TerrainType::RiverCrossing => 0.1,
        }
    }

    /// Damage penalty for whoever attacks into the tile
    pub fn attack_penalty(&self) -> f64 {
        match self {
            TerrainType::Plains => 0.0,
            TerrainType::Desert => 0.05,
            TerrainType::Forest => 0.1,
            TerrainType::Hills => 0.1,
            TerrainType::Mountains => 0.2,
            TerrainType::Marsh => 0.2,
            TerrainType::RiverCrossing => 0.25,
        }
    }

    /// Is this terrain neutral for both sides?
    pub fn is_open(&self) -> bool {
        self.defense_bonus() == 0.0 && self.attack_penalty() == 0.0
    }
}
