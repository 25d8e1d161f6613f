//! Arena Brawl - A deterministic elimination arena simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (layout, clock, physics, event feed)
//! - `tuning`: Data-driven balance constants
//! - `report`: Match report and placement derivation from the battle log
//! - `roster`: Entrant ingestion for hosts

pub mod error;
pub mod report;
pub mod roster;
pub mod sim;
pub mod tuning;

pub use error::{Error, Result};
pub use report::{BattleLogExport, MatchReport, Standing};
pub use roster::RosterRecord;
pub use tuning::Tuning;

use glam::Vec2;

/// Simulation configuration constants
pub mod consts {
    /// Fixed ticks per second of simulated time at speed 1.0
    pub const TICK_RATE: f32 = 60.0;

    /// Entity defaults (everyone gets identical stats)
    pub const ENTITY_MAX_HP: f32 = 100.0;
    pub const ENTITY_START_SPEED: f32 = 40.0;
    pub const ENTITY_MAX_SPEED: f32 = 80.0;
    pub const ENTITY_START_RADIUS: f32 = 8.0;

    /// Angular step (radians) used to spread initial headings by id
    pub const HEADING_STEP: f32 = 2.4;

    /// Centers closer than this (squared) are treated as coincident
    pub const COINCIDENT_DIST_SQ: f32 = 1.0;
    /// Velocities slower than this are reseeded along the id heading
    pub const MIN_SPEED_EPSILON: f32 = 1e-3;

    /// Wall clearance added to the radius when bouncing
    pub const WALL_PADDING: f32 = 6.0;
    /// Seconds between wall bump effects for one entity
    pub const WALL_COOLDOWN: f32 = 0.1;
}

/// Deterministic heading for an entity id, in [0, 2π)
#[inline]
pub fn heading_for_id(id: u32) -> f32 {
    (id as f32 * consts::HEADING_STEP).rem_euclid(std::f32::consts::TAU)
}

/// Unit vector for a heading angle
#[inline]
pub fn unit_from_angle(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

/// Rounded integer key for a position (used to reject duplicate placements)
#[inline]
pub fn grid_key(pos: Vec2) -> (i32, i32) {
    (pos.x.round() as i32, pos.y.round() as i32)
}
