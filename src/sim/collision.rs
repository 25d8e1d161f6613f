//! Pairwise collision response and impact damage
//!
//! Entities are equal-mass discs: overlapping pairs are pushed apart along the
//! contact normal and swap their normal velocity components. The post-bounce
//! closing speed drives the damage roll for each side.

use glam::Vec2;

use super::entity::Entity;
use super::events::{HitEvent, HitKind, LogEvent};
use super::rng::SimRng;
use super::state::ClockState;
use crate::consts::COINCIDENT_DIST_SQ;
use crate::tuning::DamageTuning;

/// Overlap between two discs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit normal pointing from `q` toward `p`
    pub normal: Vec2,
    /// Overlap depth (sum of radii minus distance)
    pub penetration: f32,
}

/// Which member of a pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    First,
    Second,
}

/// A rolled damage value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Strike {
    pub damage: f32,
    pub crit: bool,
}

/// Overlap test. Coincident centers are treated as not colliding.
pub fn contact(p: &Entity, q: &Entity) -> Option<Contact> {
    let delta = p.pos - q.pos;
    let d2 = delta.length_squared();
    if d2 < COINCIDENT_DIST_SQ {
        return None;
    }
    let d = d2.sqrt();
    let min_dist = p.radius + q.radius;
    if d >= min_dist {
        return None;
    }
    Some(Contact {
        normal: delta / d,
        penetration: min_dist - d,
    })
}

/// Push the pair apart symmetrically and swap normal velocity components.
///
/// Returns the post-bounce relative speed along the normal.
pub fn separate_and_bounce(p: &mut Entity, q: &mut Entity, c: Contact) -> f32 {
    let n = c.normal;
    let push = n * (c.penetration * 0.5);
    p.pos += push;
    q.pos -= push;

    let vp = p.vel.dot(n);
    let vq = q.vel.dot(n);
    p.vel += n * (vq - vp);
    q.vel += n * (vp - vq);

    (p.vel - q.vel).dot(n).abs()
}

/// Base damage for a given closing speed
pub fn base_damage(impact: f32, tuning: &DamageTuning) -> f32 {
    tuning.base + impact.min(tuning.max_impact) * tuning.per_impact
}

/// Apply jitter and the crit roll to a base damage value
pub fn roll_strike(rng: &mut SimRng, base: f32, tuning: &DamageTuning) -> Strike {
    let varied = base * (1.0 - tuning.jitter + 2.0 * tuning.jitter * rng.next_unit());
    let crit = rng.next_unit() < tuning.crit_chance;
    Strike {
        damage: if crit {
            varied * tuning.crit_multiplier
        } else {
            varied
        },
        crit,
    }
}

/// Choose who falls when both members of a pair are at or below zero health:
/// the lower health, then the lower id. None unless both are down.
pub fn pick_victim(p: &Entity, q: &Entity) -> Option<Side> {
    let p_down = p.alive && p.hp <= 0.0;
    let q_down = q.alive && q.hp <= 0.0;
    match (p_down, q_down) {
        (true, true) => {
            let first = if p.hp == q.hp {
                p.id < q.id
            } else {
                p.hp < q.hp
            };
            Some(if first { Side::First } else { Side::Second })
        }
        (true, false) => Some(Side::First),
        (false, true) => Some(Side::Second),
        (false, false) => None,
    }
}

/// Damage `target` on behalf of `attacker` if its hit cooldown has elapsed
fn strike(
    target: &mut Entity,
    attacker: &mut Entity,
    base: f32,
    rng: &mut SimRng,
    tuning: &DamageTuning,
    clock: &mut ClockState,
) {
    if target.hit_cooldown > 0.0 {
        return;
    }
    let s = roll_strike(rng, base, tuning);
    target.hp -= s.damage;
    target.hurt_timer = tuning.hurt_time;
    target.hit_cooldown = tuning.hit_cooldown;
    target.last_hit_by = Some(attacker.id);
    attacker.damage_dealt += s.damage;

    clock.hits.push(HitEvent {
        entity: target.id,
        pos: target.pos,
        kind: HitKind::Collide,
        crit: s.crit,
    });
    clock.log.push(LogEvent::Collision {
        tick: clock.ticks,
        target_id: target.id,
        target: target.name.clone(),
        attacker_id: attacker.id,
        attacker: attacker.name.clone(),
        damage: s.damage.round() as u32,
        crit: s.crit,
    });
}

/// Resolve one overlapping pair: bounce, damage both sides, arbitrate deaths.
///
/// Returns the side to eliminate, if any. When both sides went down the
/// survivor is floored at 1 hp, so a single exchange kills at most one.
pub fn resolve_pair(
    p: &mut Entity,
    q: &mut Entity,
    rng: &mut SimRng,
    tuning: &DamageTuning,
    clock: &mut ClockState,
) -> Option<Side> {
    let c = contact(p, q)?;
    let impact = separate_and_bounce(p, q, c);
    let base = base_damage(impact, tuning);

    strike(p, q, base, rng, tuning, clock);
    strike(q, p, base, rng, tuning, clock);

    let victim = pick_victim(p, q)?;
    let survivor = match victim {
        Side::First => q,
        Side::Second => p,
    };
    if survivor.hp <= 0.0 {
        survivor.hp = 1.0;
    }
    Some(victim)
}
