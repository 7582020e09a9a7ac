//! Warfront - phased army combat for hex-based strategy games

pub mod campaign;
pub mod combat;
pub mod core;
pub mod scenario;
