//! Per-frame motion and collision pass
//!
//! Runs once per rendered frame on real `dt`, independent of the fixed clock.
//! Order is fixed for determinism:
//! 1. Dynamic radius scaling (and hurt flash decay)
//! 2. Hit and wall cooldown decay (running frames only)
//! 3. Pairwise collisions, damage and elimination arbitration
//! 4. Constant-speed integration and wall reflection
//! 5. Win check

use super::clock::check_winner;
use super::collision::{Side, resolve_pair};
use super::entity::{Entity, count_alive};
use super::events::{DeathEvent, HitEvent, HitKind, LogEvent};
use super::state::{ClockState, SimState};
use crate::consts::*;
use crate::tuning::ScalingTuning;
use crate::{heading_for_id, unit_from_angle};

/// Fraction of the field eliminated so far, in [0, 1]
pub fn eliminated_fraction(initial: usize, alive: usize) -> f32 {
    let gone = initial.saturating_sub(alive) as f32;
    let span = initial.saturating_sub(1).max(1) as f32;
    (gone / span).clamp(0.0, 1.0)
}

/// Late-game progress: 0 until the field drops under the threshold, 1 at
/// the last survivor
pub fn late_game_progress(initial: usize, alive: usize, tuning: &ScalingTuning) -> f32 {
    let n = tuning.late_game_threshold.min(initial);
    if n < 2 || alive > n {
        return 0.0;
    }
    (n.saturating_sub(alive) as f32 / (n - 1) as f32).clamp(0.0, 1.0)
}

/// Growth factor applied to the base radius
pub fn growth_scale(frac: f32, late: f32, tuning: &ScalingTuning) -> f32 {
    let eased = tuning.ease_weight * frac.powf(tuning.ease_power) + (1.0 - tuning.ease_weight) * frac;
    let scale = (1.0 + eased * tuning.growth).min(tuning.max_scale);
    if late > 0.0 {
        scale + (tuning.max_scale - scale) * late.powf(tuning.late_game_power)
    } else {
        scale
    }
}

/// Per-frame interpolation factor toward the target radius (never overshoots)
pub fn lerp_factor(frac: f32, late: f32, tuning: &ScalingTuning) -> f32 {
    let mut k = tuning.lerp_base + frac * tuning.lerp_gain;
    if frac > tuning.lerp_floor_after {
        k = k.max(tuning.lerp_floor);
    }
    (k + late * tuning.lerp_late_boost).min(1.0)
}

/// Ease every alive entity's radius toward its dynamic target and fade the
/// hurt flash.
fn update_scaling(entities: &mut [Entity], initial: usize, dt: f32, tuning: &ScalingTuning) {
    let initial = if initial == 0 { entities.len() } else { initial };
    let alive = count_alive(entities).max(1);
    let frac = eliminated_fraction(initial, alive);
    let late = late_game_progress(initial, alive, tuning);
    let scale = growth_scale(frac, late, tuning);
    let k = lerp_factor(frac, late, tuning);

    for e in entities.iter_mut().filter(|e| e.alive) {
        e.decay_hurt(dt);
        let target = e.base_radius * scale;
        e.visual_radius += (target - e.visual_radius) * k;
        e.radius = e.visual_radius.min(tuning.max_radius);
    }
}

/// Take `entities[idx]` out of the fight and credit its last attacker
fn eliminate(entities: &mut [Entity], idx: usize, clock: &mut ClockState) {
    let victim = &mut entities[idx];
    victim.alive = false;
    victim.hp = victim.hp.max(0.0);
    let (id, name, pos) = (victim.id, victim.name.clone(), victim.pos);
    let last_hit_by = victim.last_hit_by;

    let killer = last_hit_by
        .filter(|&k| k != id)
        .and_then(|k| entities.iter_mut().find(|e| e.id == k));
    let (by_id, by) = match killer {
        Some(k) => {
            k.kills += 1;
            (Some(k.id), Some(k.name.clone()))
        }
        None => (None, None),
    };

    log::debug!(
        "Tick {}: {} eliminated by {}",
        clock.ticks,
        name,
        by.as_deref().unwrap_or("nobody")
    );
    clock.deaths.push(DeathEvent { entity: id, pos });
    clock.log.push(LogEvent::Eliminate {
        tick: clock.ticks,
        id,
        name,
        by_id,
        by,
    });
}

/// Single pass over every unordered alive pair
fn resolve_collisions(state: &mut SimState) {
    let SimState {
        entities,
        rng,
        tuning,
        clock,
    } = state;

    let n = entities.len();
    for i in 0..n {
        for j in (i + 1)..n {
            if !entities[i].alive {
                break;
            }
            if !entities[j].alive {
                continue;
            }
            let (head, tail) = entities.split_at_mut(j);
            let victim = resolve_pair(&mut head[i], &mut tail[0], rng, &tuning.damage, clock);
            match victim {
                Some(Side::First) => eliminate(entities, i, clock),
                Some(Side::Second) => eliminate(entities, j, clock),
                None => {}
            }
        }
    }
}

/// Renormalize to the target speed, integrate, and bounce off the walls
fn integrate(
    entities: &mut [Entity],
    clock: &mut ClockState,
    speed_mult: f32,
    dt: f32,
    width: f32,
    height: f32,
) {
    for e in entities.iter_mut().filter(|e| e.alive) {
        let target = e.max_speed * speed_mult;
        let speed = e.vel.length();
        e.vel = if speed < MIN_SPEED_EPSILON {
            unit_from_angle(heading_for_id(e.id)) * target
        } else {
            e.vel / speed * target
        };
        e.pos += e.vel * dt;

        let margin = e.radius + WALL_PADDING;
        let mut bounced = false;
        if e.pos.x < margin {
            e.pos.x = margin;
            e.vel.x = e.vel.x.abs();
            bounced = true;
        }
        if e.pos.x > width - margin {
            e.pos.x = width - margin;
            e.vel.x = -e.vel.x.abs();
            bounced = true;
        }
        if e.pos.y < margin {
            e.pos.y = margin;
            e.vel.y = e.vel.y.abs();
            bounced = true;
        }
        if e.pos.y > height - margin {
            e.pos.y = height - margin;
            e.vel.y = -e.vel.y.abs();
            bounced = true;
        }

        if bounced {
            if e.wall_cooldown == 0.0 {
                clock.hits.push(HitEvent {
                    entity: e.id,
                    pos: e.pos,
                    kind: HitKind::Wall,
                    crit: false,
                });
            }
            e.wall_cooldown = WALL_COOLDOWN;
        }
    }
}

/// Advance motion, collisions and eliminations by one frame of `dt` seconds
/// inside a `width` x `height` arena.
///
/// While the match is not running only the radius interpolation and hurt flash
/// advance; combat cooldowns hold their value.
pub fn resolve_motion_and_collisions(state: &mut SimState, dt: f32, width: f32, height: f32) {
    if state.entities.is_empty() {
        return;
    }

    update_scaling(
        &mut state.entities,
        state.clock.initial_count,
        dt,
        &state.tuning.scaling,
    );

    if !state.clock.is_running() {
        return;
    }

    for e in state.entities.iter_mut().filter(|e| e.alive) {
        e.decay_cooldowns(dt);
    }

    resolve_collisions(state);

    let speed_mult = state
        .clock
        .movement_multiplier(state.tuning.battle.max_move_multiplier);
    integrate(
        &mut state.entities,
        &mut state.clock,
        speed_mult,
        dt,
        width,
        height,
    );

    check_winner(state);
}
