//! Combat orchestration - starting, ticking and settling combats
//!
//! The manager owns every ongoing `ActiveCombat`, keeps each army in at
//! most one of them, and writes results back into the world when a combat
//! ends.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::campaign::defense::{build_defensive_stack, DefensiveStack, DefensiveStackEntry};
use crate::campaign::hex::HexCoord;
use crate::campaign::state::{ArmyQuery, Diplomacy, TerrainQuery, WorldState};
use crate::combat::active::{ActiveCombat, CombatEventLog};
use crate::combat::modifiers::CombatModifiers;
use crate::combat::report::CombatReport;
use crate::combat::side::SideCombatState;
use crate::core::config::CombatConfig;
use crate::core::error::{CombatError, Result};
use crate::core::types::{ArmyId, CombatId, VillagerGroupId};

/// What happened when an army attacked a tile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttackResult {
    /// The front hostile army was engaged
    Engaged { combat_id: CombatId, defender: ArmyId },
    /// No armies defend the tile; these villagers are exposed
    VillagersExposed(Vec<VillagerGroupId>),
}

/// Owns all ongoing combats
#[derive(Debug, Default)]
pub struct CombatManager {
    config: CombatConfig,
    combats: BTreeMap<CombatId, ActiveCombat>,
    reports: Vec<CombatReport>,
}

impl CombatManager {
    pub fn new(config: CombatConfig) -> Self {
        Self {
            config,
            combats: BTreeMap::new(),
            reports: Vec::new(),
        }
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn get(&self, id: CombatId) -> Option<&ActiveCombat> {
        self.combats.get(&id)
    }

    pub fn get_mut(&mut self, id: CombatId) -> Option<&mut ActiveCombat> {
        self.combats.get_mut(&id)
    }

    pub fn active_combats(&self) -> impl Iterator<Item = &ActiveCombat> {
        self.combats.values()
    }

    pub fn is_idle(&self) -> bool {
        self.combats.is_empty()
    }

    /// Reports of every combat that has ended so far
    pub fn reports(&self) -> &[CombatReport] {
        &self.reports
    }

    pub fn take_reports(&mut self) -> Vec<CombatReport> {
        std::mem::take(&mut self.reports)
    }

    /// Ordered defenders of `target` from the attacker's point of view
    pub fn defenders_of(&self, world: &WorldState, attacker: ArmyId, target: HexCoord) -> Result<DefensiveStack> {
        let army = world.get_army(attacker).ok_or(CombatError::ArmyNotFound(attacker))?;
        Ok(build_defensive_stack(target, world, army.owner, &self.config))
    }

    /// Start a combat between `attacker` and the front hostile defender of `target`
    pub fn initiate_attack(&mut self, world: &mut WorldState, attacker_id: ArmyId, target: HexCoord) -> Result<AttackResult> {
        let attacker = world.get_army(attacker_id).ok_or(CombatError::ArmyNotFound(attacker_id))?;
        if attacker.is_in_combat() {
            warn!("Army {:?} tried to attack while already engaged", attacker_id);
            return Err(CombatError::AlreadyEngaged(attacker_id));
        }

        let stack = build_defensive_stack(target, world, attacker.owner, &self.config);
        let hostile: Vec<&DefensiveStackEntry> = stack
            .army_entries()
            .iter()
            .filter(|entry| world.is_hostile(attacker.owner, entry.owner))
            .collect();

        // Entrenched armies stay in the stack while fighting elsewhere; the
        // first free one holds the line
        let free = hostile.iter().copied().find(|entry| {
            world
                .get_army(entry.army_id)
                .map(|army| !army.is_in_combat())
                .unwrap_or(false)
        });
        if free.is_none() {
            if let Some(busy) = hostile.first() {
                warn!("Every defender of {:?} is already engaged", target);
                return Err(CombatError::AlreadyEngaged(busy.army_id));
            }
        }

        let Some(front) = free else {
            let exposed: Vec<VillagerGroupId> = world
                .villagers_at(target)
                .into_iter()
                .filter(|v| stack.exposed_villagers().contains(&v.id) && world.is_hostile(attacker.owner, v.owner))
                .map(|v| v.id)
                .collect();
            if exposed.is_empty() {
                warn!("Army {:?} found no hostile defenders at {:?}", attacker_id, target);
                return Err(CombatError::NoDefenders(target));
            }
            return Ok(AttackResult::VillagersExposed(exposed));
        };

        let defender = world.get_army(front.army_id).ok_or(CombatError::ArmyNotFound(front.army_id))?;

        let combat = ActiveCombat::new(
            SideCombatState::from_army(attacker),
            SideCombatState::from_army(defender),
            target,
            world.terrain_at(target),
        )
        .with_entrenchment_bonus(front.entrenchment_bonus);

        let combat_id = combat.id;
        let defender_id = defender.id;
        info!(
            "Combat {:?} started at {:?}: {:?} ({} units) vs {:?} ({} units){}",
            combat_id,
            target,
            attacker_id,
            attacker.total_units(),
            defender_id,
            defender.total_units(),
            if front.is_cross_tile { " [cross-tile]" } else { "" }
        );

        self.engage(world, &combat)?;
        self.combats.insert(combat_id, combat);

        Ok(AttackResult::Engaged {
            combat_id,
            defender: defender_id,
        })
    }

    /// Resume a combat loaded from a save, re-binding it to the world's armies
    pub fn restore(&mut self, world: &mut WorldState, mut combat: ActiveCombat) -> Result<CombatId> {
        let attacker = world
            .get_army(combat.attacker.army_id)
            .ok_or(CombatError::ArmyNotFound(combat.attacker.army_id))?;
        let defender = world
            .get_army(combat.defender.army_id)
            .ok_or(CombatError::ArmyNotFound(combat.defender.army_id))?;
        combat.link_armies(attacker, defender)?;

        self.engage(world, &combat)?;
        let id = combat.id;
        self.combats.insert(id, combat);
        Ok(id)
    }

    fn engage(&self, world: &mut WorldState, combat: &ActiveCombat) -> Result<()> {
        for army_id in [combat.attacker.army_id, combat.defender.army_id] {
            let army = world.get_army_mut(army_id).ok_or(CombatError::ArmyNotFound(army_id))?;
            army.engaged_in = Some(combat.id);
        }
        Ok(())
    }

    /// Tick every combat; settle those that end
    pub fn update(&mut self, world: &mut WorldState, dt: f64, modifiers: &CombatModifiers) -> CombatEventLog {
        let mut events = CombatEventLog::new();
        let mut finished = Vec::new();

        for (id, combat) in self.combats.iter_mut() {
            events.extend(combat.update(dt, &self.config, modifiers));
            if combat.is_finished() {
                finished.push(*id);
            }
        }

        for id in finished {
            if let Some(combat) = self.combats.remove(&id) {
                self.settle(world, &combat);
                self.reports.push(CombatReport::from_combat(&combat));
            }
        }

        events
    }

    /// Write survivors back and remove destroyed armies
    fn settle(&self, world: &mut WorldState, combat: &ActiveCombat) {
        for state in [&combat.attacker, &combat.defender] {
            let Some(army) = world.get_army_mut(state.army_id) else {
                warn!("Army {:?} vanished before combat {:?} settled", state.army_id, combat.id);
                continue;
            };
            if let Err(e) = state.write_back(army) {
                warn!("Could not settle combat {:?}: {}", combat.id, e);
                continue;
            }
            army.engaged_in = None;
            if army.is_destroyed() {
                info!("Army {:?} destroyed", state.army_id);
                world.remove_army(state.army_id);
            }
        }
    }
}
