//! Combat constants - all tunable defaults in one place
//!
//! `CombatConfig::default()` is built from these values.

// Phases (simulated seconds)
pub const MELEE_ENGAGEMENT_THRESHOLD_SECS: f64 = 3.0;

// Damage multipliers
pub const CAVALRY_FLANK_BONUS: f64 = 1.25;
pub const MINIMUM_HIT_DAMAGE: f64 = 1.0;

// Defense
pub const ENTRENCHMENT_DEFENSE_BONUS: f64 = 0.25;
pub const ENTRENCHMENT_COVER_RADIUS: u32 = 1;
pub const MAX_DEFENSE_REDUCTION: f64 = 0.9;
