//! Armies and villagers on the strategic map
//!
//! These are the snapshots the combat engine reads: composition,
//! ownership, entrenchment, arrival time and engagement status.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::campaign::hex::HexCoord;
use crate::combat::catalog::{UnitCategory, UnitType};
use crate::combat::targeting::CavalryStance;
use crate::core::types::{ArmyId, CombatId, GameTime, OwnerId, VillagerGroupId};

/// A dug-in defensive position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Entrenchment {
    pub started_at: GameTime,
    /// Hexes around the army's own tile that it also defends
    pub cover_radius: u32,
}

/// An army on the strategic map
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Army {
    pub id: ArmyId,
    pub name: String,
    pub owner: OwnerId,
    pub position: HexCoord,
    pub composition: BTreeMap<UnitType, u32>,
    pub cavalry_stance: CavalryStance,
    pub entrenchment: Option<Entrenchment>,
    /// When the army reached its current tile
    pub arrived_at: GameTime,
    /// Combat this army is currently fighting, if any
    pub engaged_in: Option<CombatId>,
}

impl Army {
    pub fn new(id: ArmyId, owner: OwnerId, position: HexCoord) -> Self {
        Self {
            id,
            name: String::new(),
            owner,
            position,
            composition: BTreeMap::new(),
            cavalry_stance: CavalryStance::default(),
            entrenchment: None,
            arrived_at: 0.0,
            engaged_in: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_units(mut self, unit_type: UnitType, count: u32) -> Self {
        if count > 0 {
            *self.composition.entry(unit_type).or_insert(0) += count;
        }
        self
    }

    pub fn with_stance(mut self, stance: CavalryStance) -> Self {
        self.cavalry_stance = stance;
        self
    }

    pub fn arrived(mut self, time: GameTime) -> Self {
        self.arrived_at = time;
        self
    }

    pub fn entrenched(mut self, since: GameTime, cover_radius: u32) -> Self {
        self.entrench(since, cover_radius);
        self
    }

    /// Dig in at the current tile
    pub fn entrench(&mut self, now: GameTime, cover_radius: u32) {
        self.entrenchment = Some(Entrenchment {
            started_at: now,
            cover_radius,
        });
    }

    /// Move to a new tile, abandoning any entrenchment
    pub fn arrive_at(&mut self, position: HexCoord, now: GameTime) {
        self.position = position;
        self.arrived_at = now;
        self.entrenchment = None;
    }

    pub fn is_entrenched(&self) -> bool {
        self.entrenchment.is_some()
    }

    pub fn entrenched_since(&self) -> Option<GameTime> {
        self.entrenchment.map(|e| e.started_at)
    }

    /// Does this army's entrenchment defend `coord`?
    pub fn covers(&self, coord: HexCoord) -> bool {
        self.entrenchment
            .map(|e| self.position.distance(&coord) <= e.cover_radius)
            .unwrap_or(false)
    }

    pub fn is_in_combat(&self) -> bool {
        self.engaged_in.is_some()
    }

    pub fn total_units(&self) -> u32 {
        self.composition.values().sum()
    }

    pub fn units_in_category(&self, category: UnitCategory) -> u32 {
        self.composition
            .iter()
            .filter(|(unit_type, _)| unit_type.category() == category)
            .map(|(_, count)| *count)
            .sum()
    }

    pub fn is_destroyed(&self) -> bool {
        self.total_units() == 0
    }
}

/// Civilians gathered on a tile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VillagerGroup {
    pub id: VillagerGroupId,
    pub owner: OwnerId,
    pub position: HexCoord,
    pub count: u32,
}

impl VillagerGroup {
    pub fn new(id: VillagerGroupId, owner: OwnerId, position: HexCoord, count: u32) -> Self {
        Self {
            id,
            owner,
            position,
            count,
        }
    }
}
