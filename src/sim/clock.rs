//! Fixed-step battle clock
//!
//! Real frame time is scaled by the speed multiplier and the tick rate, then
//! consumed in whole ticks. The same sequence of (speed, dt) advances always
//! yields the same tick count.

use super::entity::count_alive;
use super::events::LogEvent;
use super::state::{SimPhase, SimState};

/// Advance the clock by `dt` seconds of real time.
///
/// Runs zero or more fixed ticks. Each tick checks the win condition; once the
/// match concludes no further ticks are consumed.
pub fn advance_clock(state: &mut SimState, dt: f32) {
    if !state.clock.is_running() {
        return;
    }

    let clock = &mut state.clock;
    clock.time_sec += dt;
    clock.accumulator += clock.speed * dt * state.tuning.battle.tick_rate;

    while state.clock.accumulator >= 1.0 {
        state.clock.accumulator -= 1.0;
        state.clock.ticks += 1;
        if check_winner(state) {
            break;
        }
    }
}

/// Conclude the match if one or zero entities remain.
///
/// Returns true if this call decided the match.
pub fn check_winner(state: &mut SimState) -> bool {
    if state.clock.is_concluded() || count_alive(&state.entities) > 1 {
        return false;
    }

    let winner = state.entities.iter().find(|e| e.alive);
    let clock = &mut state.clock;
    clock.phase = SimPhase::Concluded;
    clock.winner = winner.map(|w| w.id);

    match winner {
        Some(w) => {
            log::info!("Winner: {} (id {}) at tick {}", w.name, w.id, clock.ticks);
            clock.log.push(LogEvent::Winner {
                tick: clock.ticks,
                id: w.id,
                name: w.name.clone(),
            });
        }
        None => log::info!("No survivors at tick {}", clock.ticks),
    }
    true
}
