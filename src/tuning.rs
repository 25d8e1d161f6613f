//! Data-driven balance constants
//!
//! Everything here is tunable. Defaults reproduce the production arena; hosts may
//! load overrides from JSON (missing fields fall back to defaults).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::TICK_RATE;

/// Clock and movement knobs exposed to the host UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleTuning {
    /// Fixed ticks per second of simulated time at speed 1.0
    pub tick_rate: f32,
    /// Clock speed multiplier at match creation
    pub speed: f32,
    /// Movement speed multiplier at match creation
    pub move_speed: f32,
    /// Movement ramp per elapsed second (0.05 = +5%/s)
    pub grow_rate: f32,
    /// Upper bound on the ramped movement multiplier
    pub max_move_multiplier: f32,
}

impl Default for BattleTuning {
    fn default() -> Self {
        Self {
            tick_rate: TICK_RATE,
            speed: 2.0,
            move_speed: 1.0,
            grow_rate: 0.05,
            max_move_multiplier: 10.0,
        }
    }
}

/// A stepped value: `value` applies once the population exceeds `above`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub above: usize,
    pub value: f32,
}

const fn step(above: usize, value: f32) -> Step {
    Step { above, value }
}

/// Pick the value of the last step whose threshold the count exceeds
pub fn stepped(steps: &[Step], initial: f32, count: usize) -> f32 {
    steps
        .iter()
        .filter(|s| count > s.above)
        .map(|s| s.value)
        .last()
        .unwrap_or(initial)
}

/// Layout packer constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutTuning {
    /// Fraction of arena area covered by circles for small crowds
    pub packing: f32,
    /// Packing density as the crowd grows
    pub packing_steps: Vec<Step>,
    pub min_radius: f32,
    pub max_radius: f32,
    /// Distance kept from arena edges when generating grid points
    pub margin: f32,
    /// Gap between neighbouring grid cells
    pub cell_padding: f32,
    /// Multiplicative radius decay per retry when the grid is too small
    pub shrink_decay: f32,
    pub shrink_retries: u32,
    /// Extra breathing room applied to the fitted radius
    pub global_shrink: f32,
    pub global_shrink_steps: Vec<Step>,
    /// Duplicate probe ring spacing and outermost ring
    pub probe_step: f32,
    pub probe_max: f32,
    /// Randomized placement attempts after probing fails
    pub fallback_attempts: u32,
}

impl Default for LayoutTuning {
    fn default() -> Self {
        Self {
            packing: 0.45,
            packing_steps: vec![
                step(400, 0.32),
                step(800, 0.26),
                step(1200, 0.22),
                step(1600, 0.20),
                step(2200, 0.18),
                step(3000, 0.16),
                step(4000, 0.14),
                step(6000, 0.12),
                step(8000, 0.10),
                step(12000, 0.08),
            ],
            min_radius: 10.0,
            max_radius: 34.0,
            margin: 10.0,
            cell_padding: 1.0,
            shrink_decay: 0.90,
            shrink_retries: 40,
            global_shrink: 0.85,
            global_shrink_steps: vec![
                step(400, 0.78),
                step(800, 0.72),
                step(1200, 0.68),
                step(1600, 0.64),
                step(2200, 0.60),
                step(3000, 0.58),
                step(4000, 0.52),
                step(6000, 0.48),
                step(8000, 0.40),
                step(12000, 0.32),
            ],
            probe_step: 10.0,
            probe_max: 50.0,
            fallback_attempts: 20,
        }
    }
}

impl LayoutTuning {
    pub fn packing_for(&self, count: usize) -> f32 {
        stepped(&self.packing_steps, self.packing, count)
    }

    pub fn global_shrink_for(&self, count: usize) -> f32 {
        stepped(&self.global_shrink_steps, self.global_shrink, count)
    }
}

/// Dynamic radius growth as the field thins out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScalingTuning {
    /// Growth multiplier added at full elimination (before late game)
    pub growth: f32,
    /// Sub-linear power curve and its weight in the easing blend
    pub ease_power: f32,
    pub ease_weight: f32,
    /// Hard cap on the growth factor
    pub max_scale: f32,
    /// Alive count under which the late-game swell kicks in
    pub late_game_threshold: usize,
    pub late_game_power: f32,
    /// Per-frame interpolation factor: base + frac * gain
    pub lerp_base: f32,
    pub lerp_gain: f32,
    /// Past this eliminated fraction, interpolation is at least `lerp_floor`
    pub lerp_floor_after: f32,
    pub lerp_floor: f32,
    /// Extra interpolation at the very end of the late game
    pub lerp_late_boost: f32,
    /// Absolute radius cap
    pub max_radius: f32,
}

impl Default for ScalingTuning {
    fn default() -> Self {
        Self {
            growth: 5.5,
            ease_power: 0.85,
            ease_weight: 0.55,
            max_scale: 15.0,
            late_game_threshold: 10,
            late_game_power: 0.85,
            lerp_base: 0.18,
            lerp_gain: 0.55,
            lerp_floor_after: 0.55,
            lerp_floor: 0.85,
            lerp_late_boost: 0.8,
            max_radius: 300.0,
        }
    }
}

/// Impact damage model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DamageTuning {
    pub base: f32,
    /// Damage per unit of relative normal velocity
    pub per_impact: f32,
    /// Impact velocity cap
    pub max_impact: f32,
    /// Multiplicative jitter (0.1 = ±10%)
    pub jitter: f32,
    pub crit_chance: f32,
    pub crit_multiplier: f32,
    /// Seconds the hurt flash stays on after a hit
    pub hurt_time: f32,
    /// Seconds before an entity can be damaged again
    pub hit_cooldown: f32,
}

impl Default for DamageTuning {
    fn default() -> Self {
        Self {
            base: 10.0,
            per_impact: 0.1,
            max_impact: 100.0,
            jitter: 0.1,
            crit_chance: 0.02,
            crit_multiplier: 1.5,
            hurt_time: 0.2,
            hit_cooldown: 0.22,
        }
    }
}

/// Complete tuning set for one match
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub battle: BattleTuning,
    pub layout: LayoutTuning,
    pub scaling: ScalingTuning,
    pub damage: DamageTuning,
}

impl Tuning {
    /// Parse tuning overrides from JSON
    pub fn from_json_str(json: &str) -> crate::Result<Self> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject bounds that are inverted
    pub fn validate(&self) -> crate::Result<()> {
        if self.layout.min_radius > self.layout.max_radius {
            return Err(crate::Error::InvalidTuning(format!(
                "layout.min_radius {} exceeds layout.max_radius {}",
                self.layout.min_radius, self.layout.max_radius
            )));
        }
        Ok(())
    }

    /// Load tuning overrides from a JSON file
    pub fn load(path: impl AsRef<Path>) -> crate::Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json_str(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }
}
