//! Per-side ledger for one army in one combat
//!
//! Unit counts, fractional damage carried between ticks, attack timers and
//! the damage totals used for reporting.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::campaign::army::Army;
use crate::combat::catalog::{UnitCategory, UnitType};
use crate::combat::targeting::CavalryStance;
use crate::core::error::{CombatError, Result};
use crate::core::types::ArmyId;

/// Which side of a combat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Attacker,
    Defender,
}

impl Side {
    pub fn opponent(&self) -> Side {
        match self {
            Side::Attacker => Side::Defender,
            Side::Defender => Side::Attacker,
        }
    }
}

/// Mutable combat state for one side
///
/// Invariant: every type present in `unit_counts` has a count above zero
/// and an accumulator strictly below its hit points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SideCombatState {
    pub army_id: ArmyId,
    pub cavalry_stance: CavalryStance,
    unit_counts: AHashMap<UnitType, u32>,
    damage_accumulators: AHashMap<UnitType, f64>,
    attack_timers: AHashMap<UnitType, f64>,
    initial_composition: AHashMap<UnitType, u32>,
    damage_dealt_by_type: AHashMap<UnitType, f64>,
    damage_received_by_type: AHashMap<UnitType, f64>,

    // Not persisted: restored by `link`
    #[serde(skip)]
    linked: bool,
}

impl SideCombatState {
    pub fn new(
        army_id: ArmyId,
        composition: impl IntoIterator<Item = (UnitType, u32)>,
        cavalry_stance: CavalryStance,
    ) -> Self {
        let mut unit_counts = AHashMap::new();
        for (unit_type, count) in composition {
            if count > 0 {
                *unit_counts.entry(unit_type).or_insert(0) += count;
            }
        }

        Self {
            army_id,
            cavalry_stance,
            initial_composition: unit_counts.clone(),
            unit_counts,
            damage_accumulators: AHashMap::new(),
            attack_timers: AHashMap::new(),
            damage_dealt_by_type: AHashMap::new(),
            damage_received_by_type: AHashMap::new(),
            linked: true,
        }
    }

    /// Snapshot a live army at combat start
    pub fn from_army(army: &Army) -> Self {
        Self::new(
            army.id,
            army.composition.iter().map(|(t, c)| (*t, *c)),
            army.cavalry_stance,
        )
    }

    /// Apply damage to one unit type, returning how many units died
    ///
    /// Unknown or already destroyed types absorb nothing.
    pub fn apply_damage(&mut self, amount: f64, unit_type: UnitType) -> u32 {
        assert!(
            amount.is_finite() && amount >= 0.0,
            "damage must be finite and non-negative, got {}",
            amount
        );

        let Some(&count) = self.unit_counts.get(&unit_type) else {
            return 0;
        };

        let hit_points = unit_type.hit_points();
        let absorbed = amount.min(self.remaining_health(unit_type));
        *self.damage_received_by_type.entry(unit_type).or_insert(0.0) += absorbed;

        let accumulated = self.accumulator(unit_type) + amount;
        let mut kills = (accumulated / hit_points).floor();
        let mut remainder = accumulated - kills * hit_points;
        if remainder >= hit_points {
            kills += 1.0;
            remainder -= hit_points;
        }

        let kills = (kills as u64).min(count as u64) as u32;
        let survivors = count - kills;

        if survivors == 0 {
            self.unit_counts.remove(&unit_type);
            self.damage_accumulators.remove(&unit_type);
            self.attack_timers.remove(&unit_type);
        } else {
            self.unit_counts.insert(unit_type, survivors);
            self.damage_accumulators.insert(unit_type, remainder.max(0.0));
        }

        kills
    }

    /// Record damage dealt by one of this side's unit types
    pub fn track_damage_dealt(&mut self, amount: f64, unit_type: UnitType) {
        *self.damage_dealt_by_type.entry(unit_type).or_insert(0.0) += amount;
    }

    /// Damage needed to destroy every remaining unit of a type
    pub fn remaining_health(&self, unit_type: UnitType) -> f64 {
        let count = self.get_units(unit_type);
        if count == 0 {
            return 0.0;
        }
        count as f64 * unit_type.hit_points() - self.accumulator(unit_type)
    }

    /// Advance a unit type's attack timer and return how many attacks fire
    pub(crate) fn advance_attack_timer(&mut self, unit_type: UnitType, elapsed: f64, interval: f64) -> u32 {
        let timer = self.attack_timers.entry(unit_type).or_insert(0.0);
        *timer += elapsed;
        let attacks = (*timer / interval).floor();
        *timer = (*timer - attacks * interval).max(0.0);
        attacks as u32
    }

    pub fn accumulator(&self, unit_type: UnitType) -> f64 {
        self.damage_accumulators.get(&unit_type).copied().unwrap_or(0.0)
    }

    pub fn get_units(&self, unit_type: UnitType) -> u32 {
        self.unit_counts.get(&unit_type).copied().unwrap_or(0)
    }

    pub fn initial_units(&self, unit_type: UnitType) -> u32 {
        self.initial_composition.get(&unit_type).copied().unwrap_or(0)
    }

    pub fn total_units(&self) -> u32 {
        self.unit_counts.values().sum()
    }

    pub fn initial_total_units(&self) -> u32 {
        self.initial_composition.values().sum()
    }

    pub fn units_in_category(&self, category: UnitCategory) -> u32 {
        self.unit_counts
            .iter()
            .filter(|(unit_type, _)| unit_type.category() == category)
            .map(|(_, count)| *count)
            .sum()
    }

    /// Infantry plus cavalry
    pub fn melee_units(&self) -> u32 {
        self.units_in_category(UnitCategory::Infantry) + self.units_in_category(UnitCategory::Cavalry)
    }

    pub fn ranged_units(&self) -> u32 {
        self.units_in_category(UnitCategory::Ranged)
    }

    pub fn siege_units(&self) -> u32 {
        self.units_in_category(UnitCategory::Siege)
    }

    pub fn cavalry_units(&self) -> u32 {
        self.units_in_category(UnitCategory::Cavalry)
    }

    pub fn is_destroyed(&self) -> bool {
        self.unit_counts.is_empty()
    }

    /// Living unit types in declaration order
    pub fn living_types(&self) -> impl Iterator<Item = (UnitType, u32)> + '_ {
        UnitType::ALL
            .into_iter()
            .filter_map(|unit_type| self.unit_counts.get(&unit_type).map(|c| (unit_type, *c)))
    }

    /// Current counts, in declaration order
    pub fn composition(&self) -> Vec<(UnitType, u32)> {
        self.living_types().collect()
    }

    /// Units lost per type since combat start, in declaration order
    pub fn casualties(&self) -> Vec<(UnitType, u32)> {
        UnitType::ALL
            .into_iter()
            .filter_map(|unit_type| {
                let lost = self.initial_units(unit_type).saturating_sub(self.get_units(unit_type));
                (lost > 0).then_some((unit_type, lost))
            })
            .collect()
    }

    pub fn total_casualties(&self) -> u32 {
        self.initial_total_units() - self.total_units()
    }

    pub fn damage_dealt(&self, unit_type: UnitType) -> f64 {
        self.damage_dealt_by_type.get(&unit_type).copied().unwrap_or(0.0)
    }

    pub fn damage_received(&self, unit_type: UnitType) -> f64 {
        self.damage_received_by_type.get(&unit_type).copied().unwrap_or(0.0)
    }

    pub fn total_damage_dealt(&self) -> f64 {
        self.damage_dealt_by_type.values().fold(0.0, |total, v| total + v)
    }

    pub fn total_damage_received(&self) -> f64 {
        self.damage_received_by_type.values().fold(0.0, |total, v| total + v)
    }

    /// Has this state been bound to its live army since it was created or loaded?
    pub fn is_linked(&self) -> bool {
        self.linked
    }

    /// Re-bind this state to its live army after deserialization
    pub fn link(&mut self, army: &Army) -> Result<()> {
        if army.id != self.army_id {
            return Err(CombatError::ArmyMismatch {
                expected: self.army_id,
                found: army.id,
            });
        }
        self.linked = true;
        Ok(())
    }

    /// Write surviving counts back into the army this state was built from
    pub fn write_back(&self, army: &mut Army) -> Result<()> {
        if army.id != self.army_id {
            return Err(CombatError::ArmyMismatch {
                expected: self.army_id,
                found: army.id,
            });
        }
        army.composition = self.composition().into_iter().collect();
        Ok(())
    }
}
