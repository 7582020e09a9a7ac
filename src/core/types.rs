//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Simulated game time in seconds
pub type GameTime = f64;

/// Unique identifier for armies
///
/// Ordered so that it can serve as a deterministic tie-break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ArmyId(pub Uuid);

impl ArmyId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ArmyId {
    fn default() -> Self {
        Self::new()
    }
}

/// Unique identifier for villager groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VillagerGroupId(pub Uuid);

impl VillagerGroupId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for VillagerGroupId {
    fn default() -> Self {
        Self::new()
    }
}

/// Unique identifier for an ongoing combat
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CombatId(pub Uuid);

impl CombatId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CombatId {
    fn default() -> Self {
        Self::new()
    }
}

/// Owner (player or faction) of armies and villagers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OwnerId(pub u32);

impl OwnerId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_id_equality() {
        let a = OwnerId(1);
        let b = OwnerId(1);
        let c = OwnerId(2);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_army_ids_unique() {
        assert_ne!(ArmyId::new(), ArmyId::new());
    }

    #[test]
    fn test_army_id_hash() {
        use std::collections::HashMap;
        let id = ArmyId::new();
        let mut map: HashMap<ArmyId, &str> = HashMap::new();
        map.insert(id, "vanguard");
        assert_eq!(map.get(&id), Some(&"vanguard"));
    }
}
