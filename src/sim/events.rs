//! Event feed: structured battle log plus drain-once queues for the renderer
//!
//! The log is append-only and survives the end of the match (leaderboards and
//! exports read it). The `hits` and `deaths` queues are transient visual
//! triggers: exactly one consumer drains them each frame.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// What triggered a hit effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HitKind {
    /// Damage from an entity collision
    Collide,
    /// Bounce off an arena wall
    Wall,
}

/// Visual trigger for a hit or bump
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitEvent {
    pub entity: u32,
    pub pos: Vec2,
    pub kind: HitKind,
    /// Critical hits get a distinct color
    pub crit: bool,
}

/// Visual trigger for an elimination
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeathEvent {
    pub entity: u32,
    pub pos: Vec2,
}

/// Structured battle log entry, tagged with the clock tick it happened on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LogEvent {
    /// `target` took `damage` (rounded) from `attacker`
    Collision {
        tick: u64,
        target_id: u32,
        target: String,
        attacker_id: u32,
        attacker: String,
        damage: u32,
        crit: bool,
    },
    /// `name` was eliminated, credited to `by` when known
    Eliminate {
        tick: u64,
        id: u32,
        name: String,
        by_id: Option<u32>,
        by: Option<String>,
    },
    Winner {
        tick: u64,
        id: u32,
        name: String,
    },
}

impl LogEvent {
    pub fn tick(&self) -> u64 {
        match self {
            LogEvent::Collision { tick, .. }
            | LogEvent::Eliminate { tick, .. }
            | LogEvent::Winner { tick, .. } => *tick,
        }
    }

    pub fn is_elimination(&self) -> bool {
        matches!(self, LogEvent::Eliminate { .. })
    }
}

/// FIFO of transient events. Draining is destructive; hold the `&mut` in a
/// single consumer per frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventQueue<T> {
    items: VecDeque<T>,
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self {
            items: VecDeque::new(),
        }
    }
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: T) {
        self.items.push_back(item);
    }

    /// Oldest pending event
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    /// Take every pending event in arrival order
    pub fn drain(&mut self) -> std::collections::vec_deque::Drain<'_, T> {
        self.items.drain(..)
    }

    /// Peek without consuming
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_is_fifo_and_drains_once() {
        let mut q = EventQueue::new();
        for id in 0..4 {
            q.push(DeathEvent {
                entity: id,
                pos: Vec2::ZERO,
            });
        }
        assert_eq!(q.pop().map(|d| d.entity), Some(0));
        let rest: Vec<u32> = q.drain().map(|d| d.entity).collect();
        assert_eq!(rest, vec![1, 2, 3]);
        assert!(q.is_empty());
        assert_eq!(q.drain().count(), 0);
    }

    #[test]
    fn test_log_serializes_with_type_tag() {
        let ev = LogEvent::Eliminate {
            tick: 42,
            id: 3,
            name: "Follower 4".into(),
            by_id: Some(7),
            by: Some("Follower 8".into()),
        };
        let json = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["type"], "eliminate");
        assert_eq!(json["tick"], 42);
        assert_eq!(json["by"], "Follower 8");
        let back: LogEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, ev);
        assert_eq!(back.tick(), 42);
        assert!(back.is_elimination());
    }
}
