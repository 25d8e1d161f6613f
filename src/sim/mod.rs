//! Deterministic simulation module
//!
//! All battle logic lives here. This module must be pure and deterministic:
//! - Fixed clock ticks, fixed in-frame pass order
//! - Seeded RNG only, threaded explicitly
//! - Stable iteration order (entity insertion order)
//! - No rendering or platform dependencies

pub mod clock;
pub mod collision;
pub mod entity;
pub mod events;
pub mod layout;
pub mod motion;
pub mod rng;
pub mod state;

pub use clock::{advance_clock, check_winner};
pub use collision::{Contact, Side, Strike, contact, pick_victim, resolve_pair};
pub use entity::{Entity, count_alive};
pub use events::{DeathEvent, EventQueue, HitEvent, HitKind, LogEvent};
pub use layout::{hex_positions, layout_entities, target_radius};
pub use motion::resolve_motion_and_collisions;
pub use rng::{SimRng, rand_range, seed_hash};
pub use state::{ClockState, SimPhase, SimState};

/// Run one host frame: clock first, then the motion/collision pass
pub fn step_frame(state: &mut SimState, dt: f32, width: f32, height: f32) {
    advance_clock(state, dt);
    resolve_motion_and_collisions(state, dt, width, height);
}
