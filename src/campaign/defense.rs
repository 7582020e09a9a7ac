//! Defensive stack - who defends a tile, and in what order
//!
//! Tier 1: entrenched armies on the tile or covering it from within their
//! cover radius, most recently entrenched first. Tier 2: other armies on the tile not
//! already fighting, most recently arrived first. Tier 3: villagers, only
//! exposed once both army tiers are empty.
//!
//! Rebuilt from scratch for every attack; nothing here is mutated or cached.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::campaign::army::Army;
use crate::campaign::hex::HexCoord;
use crate::campaign::state::ArmyQuery;
use crate::core::config::CombatConfig;
use crate::core::types::{ArmyId, GameTime, OwnerId, VillagerGroupId};

/// Defender tier; lower tiers are engaged first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum DefensiveTier {
    Entrenched = 1,
    Regular = 2,
    Villager = 3,
}

/// One defending army
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefensiveStackEntry {
    pub army_id: ArmyId,
    pub owner: OwnerId,
    pub tier: DefensiveTier,
    /// Defending from another tile through entrenchment coverage
    pub is_cross_tile: bool,
    pub source_coordinate: HexCoord,
    pub entrenchment_bonus: f64,
}

/// Ordered defenders of one tile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefensiveStack {
    pub coordinate: HexCoord,
    entries: Vec<DefensiveStackEntry>,
    villager_group_ids: Vec<VillagerGroupId>,
}

impl DefensiveStack {
    pub fn empty(coordinate: HexCoord) -> Self {
        Self {
            coordinate,
            entries: Vec::new(),
            villager_group_ids: Vec::new(),
        }
    }

    /// All army entries, front defender first
    pub fn army_entries(&self) -> &[DefensiveStackEntry] {
        &self.entries
    }

    pub fn entries(&self, tier: DefensiveTier) -> Vec<&DefensiveStackEntry> {
        self.entries.iter().filter(|e| e.tier == tier).collect()
    }

    /// The army an attack engages first
    pub fn front(&self) -> Option<&DefensiveStackEntry> {
        self.entries.first()
    }

    pub fn has_entrenched_defenders(&self) -> bool {
        self.entries.iter().any(|e| e.tier == DefensiveTier::Entrenched)
    }

    /// Armies defending this tile from another one
    pub fn cross_tile_defender_ids(&self) -> BTreeSet<ArmyId> {
        self.entries
            .iter()
            .filter(|e| e.is_cross_tile)
            .map(|e| e.army_id)
            .collect()
    }

    pub fn villager_group_ids(&self) -> &[VillagerGroupId] {
        &self.villager_group_ids
    }

    /// Villagers that can be attacked right now
    pub fn exposed_villagers(&self) -> &[VillagerGroupId] {
        if self.entries.is_empty() {
            &self.villager_group_ids
        } else {
            &[]
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.villager_group_ids.is_empty()
    }

    pub fn only_villagers(&self) -> bool {
        self.entries.is_empty() && !self.villager_group_ids.is_empty()
    }
}

/// Most recent first; army ID breaks ties
fn sort_lifo(entries: &mut [(GameTime, DefensiveStackEntry)]) {
    entries.sort_by(|(ta, a), (tb, b)| tb.total_cmp(ta).then_with(|| a.army_id.cmp(&b.army_id)));
}

fn entrenched_entry(army: &Army, coordinate: HexCoord, config: &CombatConfig) -> Option<(GameTime, DefensiveStackEntry)> {
    let since = army.entrenched_since()?;
    Some((
        since,
        DefensiveStackEntry {
            army_id: army.id,
            owner: army.owner,
            tier: DefensiveTier::Entrenched,
            is_cross_tile: army.position != coordinate,
            source_coordinate: army.position,
            entrenchment_bonus: config.entrenchment_defense_bonus,
        },
    ))
}

/// Compute the ordered defenders of `coordinate` against `attacker`
pub fn build_defensive_stack(
    coordinate: HexCoord,
    world: &impl ArmyQuery,
    attacker: OwnerId,
    config: &CombatConfig,
) -> DefensiveStack {
    let on_tile = world.armies_at(coordinate);

    // Tier 1: every entrenched army whose cover reaches this tile; an army
    // on the tile itself always covers it
    let mut entrenched: Vec<(GameTime, DefensiveStackEntry)> = world
        .entrenched_armies()
        .into_iter()
        .filter(|a| a.owner != attacker && a.covers(coordinate))
        .filter_map(|a| entrenched_entry(a, coordinate, config))
        .collect();
    sort_lifo(&mut entrenched);

    // Tier 2: everyone else on the tile who is free to fight
    let mut regular: Vec<(GameTime, DefensiveStackEntry)> = on_tile
        .iter()
        .filter(|a| a.owner != attacker && !a.is_entrenched() && !a.is_in_combat())
        .map(|a| {
            (
                a.arrived_at,
                DefensiveStackEntry {
                    army_id: a.id,
                    owner: a.owner,
                    tier: DefensiveTier::Regular,
                    is_cross_tile: false,
                    source_coordinate: coordinate,
                    entrenchment_bonus: 0.0,
                },
            )
        })
        .collect();
    sort_lifo(&mut regular);

    // Tier 3: villagers, as an unordered pool
    let villager_group_ids: Vec<VillagerGroupId> = world
        .villagers_at(coordinate)
        .into_iter()
        .filter(|v| v.owner != attacker)
        .map(|v| v.id)
        .collect();

    let entries: Vec<DefensiveStackEntry> = entrenched
        .into_iter()
        .chain(regular)
        .map(|(_, entry)| entry)
        .collect();

    debug!(
        "Defensive stack at {:?}: {} armies, {} villager groups",
        coordinate,
        entries.len(),
        villager_group_ids.len()
    );

    DefensiveStack {
        coordinate,
        entries,
        villager_group_ids,
    }
}
