//! Battle scenarios for the headless runner
//!
//! A scenario places one attacking army next to a defended tile and plays
//! the combat out through `CombatManager`.
//!
//! ```toml
//! terrain = "Hills"
//!
//! [attacker]
//! name = "Northern Host"
//! stance = "Flank"
//! units = { Swordsman = 10, Knight = 4 }
//!
//! [defender]
//! units = { Archer = 5, Pikeman = 6 }
//! entrenched = true
//! modifiers = { armor_bonus = 1.0 }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::campaign::army::Army;
use crate::campaign::hex::HexCoord;
use crate::campaign::state::WorldState;
use crate::combat::catalog::UnitType;
use crate::combat::manager::{AttackResult, CombatManager};
use crate::combat::modifiers::{CombatModifiers, SideModifiers};
use crate::combat::report::CombatReport;
use crate::combat::targeting::CavalryStance;
use crate::combat::terrain::TerrainType;
use crate::core::config::CombatConfig;
use crate::core::error::{CombatError, Result};
use crate::core::types::{ArmyId, OwnerId};

const ATTACKER_OWNER: OwnerId = OwnerId(1);
const DEFENDER_OWNER: OwnerId = OwnerId(2);

/// One army in a scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioArmy {
    pub name: String,
    pub units: BTreeMap<UnitType, u32>,
    pub stance: CavalryStance,
    /// Dig in before the battle (defender only)
    pub entrenched: bool,
    pub modifiers: SideModifiers,
}

impl Default for ScenarioArmy {
    fn default() -> Self {
        Self {
            name: String::new(),
            units: BTreeMap::new(),
            stance: CavalryStance::default(),
            entrenched: false,
            modifiers: SideModifiers::default(),
        }
    }
}

/// A complete battle setup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub terrain: TerrainType,
    /// Start the combat directly in melee
    #[serde(default)]
    pub skip_ranged_exchange: bool,
    pub attacker: ScenarioArmy,
    pub defender: ScenarioArmy,
}

impl Default for Scenario {
    /// Swordsmen storming an archer position on open ground
    fn default() -> Self {
        Self {
            terrain: TerrainType::Plains,
            skip_ranged_exchange: false,
            attacker: ScenarioArmy {
                name: "Attackers".into(),
                units: BTreeMap::from([(UnitType::Swordsman, 10)]),
                ..ScenarioArmy::default()
            },
            defender: ScenarioArmy {
                name: "Defenders".into(),
                units: BTreeMap::from([(UnitType::Archer, 5)]),
                ..ScenarioArmy::default()
            },
        }
    }
}

/// How a scenario run finished
#[derive(Debug, Clone)]
pub struct ScenarioResult {
    pub report: CombatReport,
    pub ticks: u64,
    /// The tick limit ran out before the combat ended
    pub timed_out: bool,
}

impl Scenario {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let scenario: Scenario = toml::from_str(contents)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        for (label, side) in [("attacker", &self.attacker), ("defender", &self.defender)] {
            if side.units.values().all(|&n| n == 0) {
                return Err(CombatError::InvalidScenario(format!("{} has no units", label)));
            }
            let m = &side.modifiers;
            if !(m.damage_multiplier.is_finite() && m.damage_multiplier >= 0.0) {
                return Err(CombatError::InvalidScenario(format!(
                    "{} damage_multiplier must be non-negative",
                    label
                )));
            }
            if !(m.attack_speed_multiplier.is_finite() && m.attack_speed_multiplier > 0.0) {
                return Err(CombatError::InvalidScenario(format!(
                    "{} attack_speed_multiplier must be positive",
                    label
                )));
            }
            if !m.armor_bonus.is_finite() {
                return Err(CombatError::InvalidScenario(format!("{} armor_bonus must be finite", label)));
            }
        }
        if self.attacker.entrenched {
            return Err(CombatError::InvalidScenario("the attacker cannot be entrenched".into()));
        }
        Ok(())
    }

    pub fn modifiers(&self) -> CombatModifiers {
        CombatModifiers::new(self.attacker.modifiers, self.defender.modifiers)
    }

    fn army(spec: &ScenarioArmy, owner: OwnerId, position: HexCoord) -> Army {
        spec.units.iter().fold(
            Army::new(ArmyId::new(), owner, position)
                .with_name(spec.name.clone())
                .with_stance(spec.stance),
            |army, (&unit_type, &count)| army.with_units(unit_type, count),
        )
    }

    /// Place both armies; returns the world, the attacker and the contested tile
    pub fn build_world(&self, config: &CombatConfig) -> (WorldState, ArmyId, HexCoord) {
        let target = HexCoord::new(0, 0);
        let mut world = WorldState::new();
        world.declare_war(ATTACKER_OWNER, DEFENDER_OWNER);
        world.set_terrain(target, self.terrain);

        let mut defender = Self::army(&self.defender, DEFENDER_OWNER, target);
        if self.defender.entrenched {
            defender.entrench(0.0, config.entrenchment_cover_radius);
        }
        world.add_army(defender);

        let attacker = world.add_army(Self::army(&self.attacker, ATTACKER_OWNER, HexCoord::new(1, 0)));
        (world, attacker, target)
    }

    /// Play the scenario out with ticks of `dt` seconds
    pub fn run(&self, config: &CombatConfig, dt: f64, max_ticks: u64) -> Result<ScenarioResult> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(CombatError::InvalidScenario(format!("tick length must be positive, got {}", dt)));
        }

        let (mut world, attacker, target) = self.build_world(config);
        let mut manager = CombatManager::new(config.clone());
        let combat_id = match manager.initiate_attack(&mut world, attacker, target)? {
            AttackResult::Engaged { combat_id, .. } => combat_id,
            AttackResult::VillagersExposed(_) => return Err(CombatError::NoDefenders(target)),
        };

        if self.skip_ranged_exchange {
            if let Some(combat) = manager.get_mut(combat_id) {
                combat.skip_ranged_exchange(config);
            }
        }

        let modifiers = self.modifiers();
        let mut ticks = 0;
        while ticks < max_ticks {
            // A skipped exchange can end the combat before the first tick
            if manager.get(combat_id).map(|c| c.is_finished()).unwrap_or(true) {
                break;
            }
            manager.update(&mut world, dt, &modifiers);
            ticks += 1;
        }

        let unfinished = manager.get(combat_id).filter(|c| !c.is_finished()).map(CombatReport::from_combat);
        let (report, timed_out) = match unfinished {
            Some(report) => (report, true),
            None => {
                // Settle combats that ended during the skip
                if manager.get(combat_id).is_some() {
                    manager.update(&mut world, 0.0, &modifiers);
                }
                let report = manager
                    .take_reports()
                    .into_iter()
                    .find(|r| r.combat_id == combat_id)
                    .ok_or_else(|| CombatError::InvalidScenario("combat produced no report".into()))?;
                (report, false)
            }
        };

        info!(
            "Scenario finished after {} ticks: {:?}{}",
            ticks,
            report.outcome,
            if timed_out { " (timed out)" } else { "" }
        );

        Ok(ScenarioResult {
            report,
            ticks,
            timed_out,
        })
    }
}
