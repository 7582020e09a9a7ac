//! Strategic-map state and the queries the combat engine depends on
//!
//! The engine only ever sees the world through `ArmyQuery`,
//! `TerrainQuery` and `Diplomacy`; `WorldState` is the in-memory
//! implementation used by the orchestrator, the CLI and the tests.

use ahash::{AHashMap, AHashSet};

use crate::campaign::army::{Army, VillagerGroup};
use crate::campaign::hex::HexCoord;
use crate::combat::terrain::TerrainType;
use crate::core::types::{ArmyId, OwnerId};

/// Who is standing on a tile
pub trait ArmyQuery {
    fn armies_at(&self, coord: HexCoord) -> Vec<&Army>;
    fn villagers_at(&self, coord: HexCoord) -> Vec<&VillagerGroup>;
    /// Every entrenched army on the map, wherever it stands
    fn entrenched_armies(&self) -> Vec<&Army>;
}

/// What a tile is made of
pub trait TerrainQuery {
    fn terrain_at(&self, coord: HexCoord) -> TerrainType;
}

/// Who is at war with whom
pub trait Diplomacy {
    fn is_hostile(&self, a: OwnerId, b: OwnerId) -> bool;
}

/// All armies, villagers, terrain and wars on the map
#[derive(Debug, Clone, Default)]
pub struct WorldState {
    armies: AHashMap<ArmyId, Army>,
    villagers: Vec<VillagerGroup>,
    terrain: AHashMap<HexCoord, TerrainType>,
    wars: AHashSet<(OwnerId, OwnerId)>,
}

impl WorldState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_army(&mut self, army: Army) -> ArmyId {
        let id = army.id;
        self.armies.insert(id, army);
        id
    }

    pub fn get_army(&self, id: ArmyId) -> Option<&Army> {
        self.armies.get(&id)
    }

    pub fn get_army_mut(&mut self, id: ArmyId) -> Option<&mut Army> {
        self.armies.get_mut(&id)
    }

    pub fn remove_army(&mut self, id: ArmyId) -> Option<Army> {
        self.armies.remove(&id)
    }

    pub fn armies(&self) -> impl Iterator<Item = &Army> {
        self.armies.values()
    }

    pub fn add_villagers(&mut self, group: VillagerGroup) {
        self.villagers.push(group);
    }

    pub fn set_terrain(&mut self, coord: HexCoord, terrain: TerrainType) {
        self.terrain.insert(coord, terrain);
    }

    pub fn declare_war(&mut self, a: OwnerId, b: OwnerId) {
        if a != b {
            self.wars.insert(Self::war_key(a, b));
        }
    }

    pub fn make_peace(&mut self, a: OwnerId, b: OwnerId) {
        self.wars.remove(&Self::war_key(a, b));
    }

    fn war_key(a: OwnerId, b: OwnerId) -> (OwnerId, OwnerId) {
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }
}

impl ArmyQuery for WorldState {
    fn armies_at(&self, coord: HexCoord) -> Vec<&Army> {
        self.armies.values().filter(|a| a.position == coord).collect()
    }

    fn villagers_at(&self, coord: HexCoord) -> Vec<&VillagerGroup> {
        self.villagers.iter().filter(|v| v.position == coord).collect()
    }

    fn entrenched_armies(&self) -> Vec<&Army> {
        self.armies.values().filter(|a| a.is_entrenched()).collect()
    }
}

impl TerrainQuery for WorldState {
    fn terrain_at(&self, coord: HexCoord) -> TerrainType {
        self.terrain.get(&coord).copied().unwrap_or_default()
    }
}

impl Diplomacy for WorldState {
    fn is_hostile(&self, a: OwnerId, b: OwnerId) -> bool {
        self.wars.contains(&Self::war_key(a, b))
    }
}
