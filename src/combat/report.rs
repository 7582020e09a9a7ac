//! After-action reports for finished combats

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::campaign::hex::HexCoord;
use crate::combat::active::ActiveCombat;
use crate::combat::catalog::UnitType;
use crate::combat::phase::{CombatOutcome, CombatPhaseRecord};
use crate::combat::side::{Side, SideCombatState};
use crate::combat::terrain::TerrainType;
use crate::core::types::{ArmyId, CombatId, GameTime};

/// One side's totals for the report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SideSummary {
    pub army_id: ArmyId,
    pub initial: BTreeMap<UnitType, u32>,
    pub survivors: BTreeMap<UnitType, u32>,
    pub casualties: BTreeMap<UnitType, u32>,
    pub damage_dealt: f64,
    pub damage_received: f64,
}

impl SideSummary {
    fn from_state(state: &SideCombatState) -> Self {
        Self {
            army_id: state.army_id,
            initial: UnitType::ALL
                .into_iter()
                .filter_map(|t| {
                    let n = state.initial_units(t);
                    (n > 0).then_some((t, n))
                })
                .collect(),
            survivors: state.composition().into_iter().collect(),
            casualties: state.casualties().into_iter().collect(),
            damage_dealt: state.total_damage_dealt(),
            damage_received: state.total_damage_received(),
        }
    }

    pub fn total_casualties(&self) -> u32 {
        self.casualties.values().sum()
    }
}

/// Everything a battle report or player statistic needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatReport {
    pub combat_id: CombatId,
    pub outcome: CombatOutcome,
    pub duration: GameTime,
    pub location: HexCoord,
    pub terrain: TerrainType,
    pub attacker: SideSummary,
    pub defender: SideSummary,
    pub phases: Vec<CombatPhaseRecord>,
}

impl CombatReport {
    pub fn from_combat(combat: &ActiveCombat) -> Self {
        Self {
            combat_id: combat.id,
            outcome: combat.outcome(),
            duration: combat.elapsed_time(),
            location: combat.location(),
            terrain: combat.terrain(),
            attacker: SideSummary::from_state(&combat.attacker),
            defender: SideSummary::from_state(&combat.defender),
            phases: combat.phase_records().to_vec(),
        }
    }

    pub fn side(&self, side: Side) -> &SideSummary {
        match side {
            Side::Attacker => &self.attacker,
            Side::Defender => &self.defender,
        }
    }

    pub fn to_json(&self) -> crate::core::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Human-readable summary, one line per phase
    pub fn summary(&self) -> String {
        let mut lines = vec![format!(
            "{:?} at ({}, {}) on {:?} after {:.1}s",
            self.outcome, self.location.q, self.location.r, self.terrain, self.duration
        )];
        for record in &self.phases {
            lines.push(format!(
                "  {:?}: {:.1}s, damage {:.0}/{:.0}, losses {}/{}",
                record.phase,
                record.duration,
                record.attacker_damage_dealt,
                record.defender_damage_dealt,
                record.total_casualties(Side::Attacker),
                record.total_casualties(Side::Defender)
            ));
        }
        lines.push(format!(
            "  Losses: attacker {}, defender {}",
            self.attacker.total_casualties(),
            self.defender.total_casualties()
        ));
        lines.join("\n")
    }
}
