//! Research and infrastructure bonuses fed into combat resolution
//!
//! Passed explicitly into every tick; the engine never reads ambient state.

use serde::{Deserialize, Serialize};

use crate::combat::side::Side;

/// Bonuses for one side of a combat
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SideModifiers {
    /// Multiplier on all outgoing damage (1.0 = none)
    pub damage_multiplier: f64,
    /// Flat armor added to every armor type of this side's units
    pub armor_bonus: f64,
    /// Multiplier on attack rate (1.2 = attacks 20% more often)
    pub attack_speed_multiplier: f64,
}

impl Default for SideModifiers {
    fn default() -> Self {
        Self {
            damage_multiplier: 1.0,
            armor_bonus: 0.0,
            attack_speed_multiplier: 1.0,
        }
    }
}

impl SideModifiers {
    pub fn with_damage_multiplier(mut self, multiplier: f64) -> Self {
        self.damage_multiplier = multiplier;
        self
    }

    pub fn with_armor_bonus(mut self, bonus: f64) -> Self {
        self.armor_bonus = bonus;
        self
    }

    pub fn with_attack_speed(mut self, multiplier: f64) -> Self {
        self.attack_speed_multiplier = multiplier;
        self
    }
}

/// Bonuses for both sides of a combat
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct CombatModifiers {
    pub attacker: SideModifiers,
    pub defender: SideModifiers,
}

impl CombatModifiers {
    pub fn new(attacker: SideModifiers, defender: SideModifiers) -> Self {
        Self { attacker, defender }
    }

    pub fn for_side(&self, side: Side) -> &SideModifiers {
        match side {
            Side::Attacker => &self.attacker,
            Side::Defender => &self.defender,
        }
    }
}
