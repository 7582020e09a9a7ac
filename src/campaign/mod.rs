//! Campaign layer - the strategic map the combat engine reads from

pub mod army;
pub mod defense;
pub mod hex;
pub mod state;

pub use army::{Army, Entrenchment, VillagerGroup};
pub use defense::{build_defensive_stack, DefensiveStack, DefensiveStackEntry, DefensiveTier};
pub use hex::HexCoord;
pub use state::{ArmyQuery, Diplomacy, TerrainQuery, WorldState};
