//! Combat phases, outcomes and per-phase statistics

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::combat::catalog::UnitType;
use crate::combat::side::Side;
use crate::core::types::GameTime;

/// Combat phases, in the only order they may occur
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum CombatPhase {
    #[default]
    RangedExchange, // Missiles and siege only
    MeleeEngagement, // Lines close
    Cleanup,         // Melee on one side is gone, reserves commit
    Ended,           // Terminal
}

impl CombatPhase {
    /// The phase that follows this one
    pub fn next(&self) -> CombatPhase {
        match self {
            CombatPhase::RangedExchange => CombatPhase::MeleeEngagement,
            CombatPhase::MeleeEngagement => CombatPhase::Cleanup,
            CombatPhase::Cleanup | CombatPhase::Ended => CombatPhase::Ended,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, CombatPhase::Ended)
    }
}

/// Who won
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombatOutcome {
    AttackerVictory,
    DefenderVictory,
    Draw,
}

impl CombatOutcome {
    pub fn from_survivors(attacker_units: u32, defender_units: u32) -> Self {
        match (attacker_units > 0, defender_units > 0) {
            (true, false) => CombatOutcome::AttackerVictory,
            (false, true) => CombatOutcome::DefenderVictory,
            _ => CombatOutcome::Draw,
        }
    }

    pub fn winner(&self) -> Option<Side> {
        match self {
            CombatOutcome::AttackerVictory => Some(Side::Attacker),
            CombatOutcome::DefenderVictory => Some(Side::Defender),
            CombatOutcome::Draw => None,
        }
    }
}

/// Immutable statistics for one completed phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatPhaseRecord {
    pub phase: CombatPhase,
    pub started_at: GameTime,
    pub duration: GameTime,
    pub attacker_damage_dealt: f64,
    pub defender_damage_dealt: f64,
    pub attacker_casualties: BTreeMap<UnitType, u32>,
    pub defender_casualties: BTreeMap<UnitType, u32>,
}

impl CombatPhaseRecord {
    pub fn damage_dealt(&self, side: Side) -> f64 {
        match side {
            Side::Attacker => self.attacker_damage_dealt,
            Side::Defender => self.defender_damage_dealt,
        }
    }

    pub fn casualties(&self, side: Side) -> &BTreeMap<UnitType, u32> {
        match side {
            Side::Attacker => &self.attacker_casualties,
            Side::Defender => &self.defender_casualties,
        }
    }

    pub fn total_casualties(&self, side: Side) -> u32 {
        self.casualties(side).values().sum()
    }
}

/// Running counters for the phase in progress
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct PhaseTally {
    attacker_damage_dealt: f64,
    defender_damage_dealt: f64,
    attacker_casualties: BTreeMap<UnitType, u32>,
    defender_casualties: BTreeMap<UnitType, u32>,
}

impl PhaseTally {
    pub(crate) fn record_damage(&mut self, dealer: Side, amount: f64) {
        match dealer {
            Side::Attacker => self.attacker_damage_dealt += amount,
            Side::Defender => self.defender_damage_dealt += amount,
        }
    }

    pub(crate) fn record_casualties(&mut self, victim: Side, unit_type: UnitType, kills: u32) {
        if kills == 0 {
            return;
        }
        let casualties = match victim {
            Side::Attacker => &mut self.attacker_casualties,
            Side::Defender => &mut self.defender_casualties,
        };
        *casualties.entry(unit_type).or_insert(0) += kills;
    }

    /// Close the tally into a record and reset it for the next phase
    pub(crate) fn finish(&mut self, phase: CombatPhase, started_at: GameTime, now: GameTime) -> CombatPhaseRecord {
        let tally = std::mem::take(self);
        CombatPhaseRecord {
            phase,
            started_at,
            duration: now - started_at,
            attacker_damage_dealt: tally.attacker_damage_dealt,
            defender_damage_dealt: tally.defender_damage_dealt,
            attacker_casualties: tally.attacker_casualties,
            defender_casualties: tally.defender_casualties,
        }
    }
}
