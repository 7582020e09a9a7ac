//! Combat system - phased resolution of battles between armies
//!
//! A combat runs ranged exchange, melee engagement and cleanup before it
//! ends. Damage is batched per unit type and fed through per-type
//! accumulators, so results do not depend on how time is sliced.

pub mod active;
pub mod catalog;
pub mod constants;
pub mod manager;
pub mod modifiers;
pub mod phase;
pub mod report;
pub mod side;
pub mod targeting;
pub mod terrain;

// Re-exports for convenient access
pub use active::{ActiveCombat, CombatEvent, CombatEventLog, CombatEventType};
pub use catalog::{CategoryBonuses, UnitCategory, UnitCombatStats, UnitType};
pub use constants::*;
pub use manager::{AttackResult, CombatManager};
pub use modifiers::{CombatModifiers, SideModifiers};
pub use phase::{CombatOutcome, CombatPhase, CombatPhaseRecord};
pub use report::{CombatReport, SideSummary};
pub use side::{Side, SideCombatState};
pub use targeting::{find_target, target_priority, CavalryStance};
pub use terrain::{TerrainModifiers, TerrainType};
