//! Target priority - which enemy unit type an attacker strikes

use serde::{Deserialize, Serialize};

use crate::combat::catalog::{UnitCategory, UnitType};
use crate::combat::side::SideCombatState;

/// How a side commits its cavalry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CavalryStance {
    /// Fights alongside the infantry
    #[default]
    Frontline,
    /// Rides around the line to hit ranged units
    Flank,
    /// Held back until the cleanup phase
    Reserve,
}

/// Category preference for an attacker, most preferred first
pub fn target_priority(attacker: UnitCategory, stance: CavalryStance) -> [UnitCategory; 4] {
    use UnitCategory::*;

    match (attacker, stance) {
        (Ranged, _) => [Siege, Cavalry, Infantry, Ranged],
        (Siege, _) => [Siege, Ranged, Infantry, Cavalry],
        (Cavalry, CavalryStance::Flank) => [Ranged, Siege, Infantry, Cavalry],
        (Infantry, _) | (Cavalry, _) => [Infantry, Cavalry, Ranged, Siege],
    }
}

/// Pick the enemy unit type to strike
///
/// Walks the priority list and returns the first living type in the first
/// category that still has units; within a category, declaration order
/// wins. `None` only when the enemy has no units left.
pub fn find_target(
    attacker: UnitCategory,
    stance: CavalryStance,
    enemy: &SideCombatState,
) -> Option<UnitType> {
    target_priority(attacker, stance).into_iter().find_map(|category| {
        UnitType::of_category(category).find(|unit_type| enemy.get_units(*unit_type) > 0)
    })
}
