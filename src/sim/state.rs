//! Simulation state
//!
//! Host-owned and passed by reference into every core function. Nothing in the
//! simulation lives in module-level state.

use serde::{Deserialize, Serialize};

use super::entity::{Entity, count_alive};
use super::events::{DeathEvent, EventQueue, HitEvent, LogEvent};
use super::layout::layout_entities;
use super::rng::SimRng;
use crate::roster::RosterRecord;
use crate::tuning::Tuning;

/// Match lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SimPhase {
    /// Created or reset, waiting for start
    #[default]
    Idle,
    /// Ticks are being consumed
    Running,
    /// Halted by the host; visuals keep interpolating
    Paused,
    /// Win check fired (terminal until reset)
    Concluded,
}

/// Clock, knobs, and event feed for one match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockState {
    pub phase: SimPhase,
    /// Clock speed multiplier
    pub speed: f32,
    /// Fractional ticks carried between frames
    pub accumulator: f32,
    /// Fixed ticks elapsed
    pub ticks: u64,
    /// Seconds the match has been running
    pub time_sec: f32,
    /// Movement speed multiplier before the time ramp
    pub move_speed: f32,
    /// Movement ramp per elapsed second
    pub grow_rate: f32,
    /// Population at start of match (anchor for dynamic scaling)
    pub initial_count: usize,
    /// Winning entity id; None until decided or if everyone fell together
    pub winner: Option<u32>,
    /// Hit/bump visual triggers (drained by the renderer)
    #[serde(skip)]
    pub hits: EventQueue<HitEvent>,
    /// Death visual triggers (drained by the renderer)
    #[serde(skip)]
    pub deaths: EventQueue<DeathEvent>,
    /// Ordered, append-only battle log
    pub log: Vec<LogEvent>,
}

impl ClockState {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            phase: SimPhase::Idle,
            speed: tuning.battle.speed,
            accumulator: 0.0,
            ticks: 0,
            time_sec: 0.0,
            move_speed: tuning.battle.move_speed,
            grow_rate: tuning.battle.grow_rate,
            initial_count: 0,
            winner: None,
            hits: EventQueue::new(),
            deaths: EventQueue::new(),
            log: Vec::new(),
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.phase == SimPhase::Running
    }

    #[inline]
    pub fn is_concluded(&self) -> bool {
        self.phase == SimPhase::Concluded
    }

    /// Ramped movement multiplier for the current elapsed time
    pub fn movement_multiplier(&self, cap: f32) -> f32 {
        (self.move_speed * (1.0 + self.grow_rate * self.time_sec)).min(cap)
    }

    /// Clear timing, winner, queues and log for a fresh match
    fn rewind(&mut self) {
        self.phase = SimPhase::Idle;
        self.accumulator = 0.0;
        self.ticks = 0;
        self.time_sec = 0.0;
        self.winner = None;
        self.hits.clear();
        self.deaths.clear();
        self.log.clear();
    }
}

/// Complete simulation state
#[derive(Debug, Clone, Serialize)]
pub struct SimState {
    /// Participants, in stable id order as added
    pub entities: Vec<Entity>,
    /// Random stream for layout shuffles and damage rolls
    #[serde(skip)]
    pub rng: SimRng,
    pub tuning: Tuning,
    pub clock: ClockState,
}

impl SimState {
    /// Create an empty match that draws randomness from `rng`
    pub fn new(rng: SimRng) -> Self {
        Self::with_tuning(rng, Tuning::default())
    }

    pub fn with_tuning(rng: SimRng, tuning: Tuning) -> Self {
        let clock = ClockState::new(&tuning);
        Self {
            entities: Vec::new(),
            rng,
            tuning,
            clock,
        }
    }

    /// Add a participant; returns its id
    pub fn add_entity(&mut self, name: impl Into<String>, image: Option<String>) -> u32 {
        let id = self.entities.len() as u32;
        self.entities.push(Entity::new(id, name, image));
        self.clock.initial_count = self.entities.len();
        id
    }

    /// Replace the roster with pre-validated records
    pub fn populate(&mut self, records: &[RosterRecord]) {
        self.entities.clear();
        for record in records {
            self.add_entity(record.name.clone(), record.image.clone());
        }
        self.reset();
    }

    /// Swap the random stream (e.g. the host changed the seed)
    pub fn set_rng(&mut self, rng: SimRng) {
        self.rng = rng;
    }

    /// Pack all entities into a `width` x `height` arena
    pub fn layout(&mut self, width: f32, height: f32) {
        layout_entities(
            &mut self.rng,
            &mut self.entities,
            width,
            height,
            &self.tuning.layout,
        );
    }

    /// Begin or resume ticking. A concluded match must be reset first.
    pub fn start(&mut self) {
        if !self.clock.is_concluded() {
            self.clock.phase = SimPhase::Running;
        }
    }

    pub fn pause(&mut self) {
        if self.clock.is_running() {
            self.clock.phase = SimPhase::Paused;
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    #[inline]
    pub fn is_concluded(&self) -> bool {
        self.clock.is_concluded()
    }

    pub fn alive_count(&self) -> usize {
        count_alive(&self.entities)
    }

    pub fn entity(&self, id: u32) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// The winning entity, once decided
    pub fn winner(&self) -> Option<&Entity> {
        self.clock.winner.and_then(|id| self.entity(id))
    }

    /// Restore health, life and stats for a rematch. Entities keep their
    /// positions and layout radius.
    pub fn reset(&mut self) {
        for e in &mut self.entities {
            e.revive();
        }
        self.clock.rewind();
        self.clock.initial_count = self.entities.len();
    }

    /// Reset and lay the arena out again
    pub fn reset_with_layout(&mut self, width: f32, height: f32) {
        self.reset();
        self.layout(width, height);
    }
}
