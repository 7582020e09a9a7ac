//! Unit combat catalog - static balance data per unit type
//!
//! Every unit type maps to exactly one category and one stat block.
//! Nothing here changes at runtime.

use serde::{Deserialize, Serialize};

/// Broad combat role of a unit type
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UnitCategory {
    Infantry,
    Ranged,
    Cavalry,
    Siege,
}

impl UnitCategory {
    pub fn all() -> [UnitCategory; 4] {
        [
            UnitCategory::Infantry,
            UnitCategory::Ranged,
            UnitCategory::Cavalry,
            UnitCategory::Siege,
        ]
    }

    /// Infantry and cavalry hold the line in melee
    pub fn is_melee(&self) -> bool {
        matches!(self, UnitCategory::Infantry | UnitCategory::Cavalry)
    }
}

/// Type of military unit
///
/// Declaration order is the within-category tie-break used by target
/// selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UnitType {
    // Infantry
    Militia,
    Swordsman,
    Pikeman,

    // Ranged
    Archer,
    Crossbowman,

    // Cavalry
    ScoutCavalry,
    Knight,

    // Siege
    BatteringRam,
    Mangonel,
}

/// Damage multipliers against each target category (1.0 = no bonus)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryBonuses {
    pub vs_infantry: f64,
    pub vs_ranged: f64,
    pub vs_cavalry: f64,
    pub vs_siege: f64,
    /// Only meaningful against structures, never applied army-to-army
    pub vs_buildings: f64,
}

impl CategoryBonuses {
    pub const NONE: CategoryBonuses = CategoryBonuses {
        vs_infantry: 1.0,
        vs_ranged: 1.0,
        vs_cavalry: 1.0,
        vs_siege: 1.0,
        vs_buildings: 1.0,
    };

    pub fn against(&self, category: UnitCategory) -> f64 {
        match category {
            UnitCategory::Infantry => self.vs_infantry,
            UnitCategory::Ranged => self.vs_ranged,
            UnitCategory::Cavalry => self.vs_cavalry,
            UnitCategory::Siege => self.vs_siege,
        }
    }
}

/// Combat stats for a unit type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitCombatStats {
    pub melee_damage: f64,
    pub pierce_damage: f64,
    pub bludgeon_damage: f64,
    pub melee_armor: f64,
    pub pierce_armor: f64,
    pub bludgeon_armor: f64,
    pub bonuses: CategoryBonuses,
    pub hit_points: f64,
    /// Seconds between attacks (lower = faster)
    pub attack_interval_secs: f64,
    /// Relative to baseline infantry
    pub move_speed: f64,
}

impl UnitCombatStats {
    /// Per-unit damage of one attack against `target`, after armor
    ///
    /// Each component is reduced by the matching armor plus `extra_armor`
    /// and floored at zero. Category bonuses are not applied here.
    pub fn hit_damage_against(&self, target: &UnitCombatStats, extra_armor: f64) -> f64 {
        let component = |damage: f64, armor: f64| {
            if damage > 0.0 {
                (damage - armor - extra_armor).max(0.0)
            } else {
                0.0
            }
        };

        component(self.melee_damage, target.melee_armor)
            + component(self.pierce_damage, target.pierce_armor)
            + component(self.bludgeon_damage, target.bludgeon_armor)
    }
}

impl UnitType {
    /// Every unit type in declaration order
    pub const ALL: [UnitType; 9] = [
        UnitType::Militia,
        UnitType::Swordsman,
        UnitType::Pikeman,
        UnitType::Archer,
        UnitType::Crossbowman,
        UnitType::ScoutCavalry,
        UnitType::Knight,
        UnitType::BatteringRam,
        UnitType::Mangonel,
    ];

    pub fn category(&self) -> UnitCategory {
        match self {
            UnitType::Militia | UnitType::Swordsman | UnitType::Pikeman => UnitCategory::Infantry,
            UnitType::Archer | UnitType::Crossbowman => UnitCategory::Ranged,
            UnitType::ScoutCavalry | UnitType::Knight => UnitCategory::Cavalry,
            UnitType::BatteringRam | UnitType::Mangonel => UnitCategory::Siege,
        }
    }

    /// Get the balance data for this unit type
    pub fn combat_stats(&self) -> UnitCombatStats {
        match self {
            UnitType::Militia => UnitCombatStats {
                melee_damage: 6.0,
                pierce_damage: 0.0,
                bludgeon_damage: 0.0,
                melee_armor: 1.0,
                pierce_armor: 1.0,
                bludgeon_armor: 0.0,
                bonuses: CategoryBonuses::NONE,
                hit_points: 60.0,
                attack_interval_secs: 1.5,
                move_speed: 1.0,
            },

            UnitType::Swordsman => UnitCombatStats {
                melee_damage: 12.0,
                pierce_damage: 0.0,
                bludgeon_damage: 0.0,
                melee_armor: 2.0,
                pierce_armor: 1.0,
                bludgeon_armor: 1.0,
                bonuses: CategoryBonuses::NONE,
                hit_points: 120.0,
                attack_interval_secs: 1.5,
                move_speed: 0.9,
            },

            UnitType::Pikeman => UnitCombatStats {
                melee_damage: 8.0,
                pierce_damage: 0.0,
                bludgeon_damage: 0.0,
                melee_armor: 1.0,
                pierce_armor: 2.0,
                bludgeon_armor: 1.0,
                bonuses: CategoryBonuses {
                    vs_cavalry: 2.0,
                    ..CategoryBonuses::NONE
                },
                hit_points: 100.0,
                attack_interval_secs: 1.8,
                move_speed: 0.9,
            },

            UnitType::Archer => UnitCombatStats {
                melee_damage: 0.0,
                pierce_damage: 8.0,
                bludgeon_damage: 0.0,
                melee_armor: 0.0,
                pierce_armor: 0.0,
                bludgeon_armor: 0.0,
                bonuses: CategoryBonuses::NONE,
                hit_points: 70.0,
                attack_interval_secs: 2.0,
                move_speed: 1.0,
            },

            UnitType::Crossbowman => UnitCombatStats {
                melee_damage: 0.0,
                pierce_damage: 12.0,
                bludgeon_damage: 0.0,
                melee_armor: 0.0,
                pierce_armor: 1.0,
                bludgeon_armor: 0.0,
                bonuses: CategoryBonuses {
                    vs_cavalry: 1.25,
                    ..CategoryBonuses::NONE
                },
                hit_points: 80.0,
                attack_interval_secs: 3.0,
                move_speed: 0.9,
            },

            UnitType::ScoutCavalry => UnitCombatStats {
                melee_damage: 8.0,
                pierce_damage: 0.0,
                bludgeon_damage: 0.0,
                melee_armor: 1.0,
                pierce_armor: 2.0,
                bludgeon_armor: 0.0,
                bonuses: CategoryBonuses {
                    vs_siege: 1.5,
                    ..CategoryBonuses::NONE
                },
                hit_points: 110.0,
                attack_interval_secs: 1.6,
                move_speed: 1.6,
            },

            UnitType::Knight => UnitCombatStats {
                melee_damage: 14.0,
                pierce_damage: 0.0,
                bludgeon_damage: 0.0,
                melee_armor: 2.0,
                pierce_armor: 2.0,
                bludgeon_armor: 1.0,
                bonuses: CategoryBonuses::NONE,
                hit_points: 160.0,
                attack_interval_secs: 1.8,
                move_speed: 1.4,
            },

            UnitType::BatteringRam => UnitCombatStats {
                melee_damage: 0.0,
                pierce_damage: 0.0,
                bludgeon_damage: 20.0,
                melee_armor: 0.0,
                pierce_armor: 5.0,
                bludgeon_armor: 0.0,
                bonuses: CategoryBonuses {
                    vs_buildings: 4.0,
                    ..CategoryBonuses::NONE
                },
                hit_points: 200.0,
                attack_interval_secs: 4.0,
                move_speed: 0.5,
            },

            UnitType::Mangonel => UnitCombatStats {
                melee_damage: 0.0,
                pierce_damage: 0.0,
                bludgeon_damage: 25.0,
                melee_armor: 0.0,
                pierce_armor: 1.0,
                bludgeon_armor: 0.0,
                bonuses: CategoryBonuses {
                    vs_ranged: 1.5,
                    vs_buildings: 2.0,
                    ..CategoryBonuses::NONE
                },
                hit_points: 120.0,
                attack_interval_secs: 5.0,
                move_speed: 0.6,
            },
        }
    }

    /// All unit types belonging to a category, in declaration order
    pub fn of_category(category: UnitCategory) -> impl Iterator<Item = UnitType> {
        UnitType::ALL
            .into_iter()
            .filter(move |unit_type| unit_type.category() == category)
    }

    pub fn hit_points(&self) -> f64 {
        self.combat_stats().hit_points
    }

    pub fn is_melee(&self) -> bool {
        self.category().is_melee()
    }
}
