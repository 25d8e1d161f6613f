//! Per-participant record

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::{heading_for_id, unit_from_angle};

/// One arena participant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub name: String,
    /// Opaque, already-resolved image reference (None draws a placeholder)
    pub image: Option<String>,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Cruise speed before the movement multiplier
    pub max_speed: f32,
    /// Radius used for collisions this frame
    pub radius: f32,
    /// Smoothed radius chasing the dynamic target
    pub visual_radius: f32,
    /// Radius fixed by the layout packer; anchor for dynamic scaling
    pub base_radius: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub alive: bool,
    pub kills: u32,
    pub damage_dealt: f32,
    pub last_hit_by: Option<u32>,
    /// Seconds left on the hurt flash
    #[serde(default)]
    pub hurt_timer: f32,
    /// Seconds before this entity can take impact damage again
    #[serde(default)]
    pub hit_cooldown: f32,
    /// Seconds before another wall bump effect is emitted
    #[serde(default)]
    pub wall_cooldown: f32,
    /// Render-only scale multiplier
    pub scale: f32,
}

impl Entity {
    pub fn new(id: u32, name: impl Into<String>, image: Option<String>) -> Self {
        Self {
            id,
            name: name.into(),
            image,
            pos: Vec2::ZERO,
            vel: unit_from_angle(heading_for_id(id)) * ENTITY_START_SPEED,
            max_speed: ENTITY_MAX_SPEED,
            radius: ENTITY_START_RADIUS,
            visual_radius: ENTITY_START_RADIUS,
            base_radius: ENTITY_START_RADIUS,
            hp: ENTITY_MAX_HP,
            max_hp: ENTITY_MAX_HP,
            alive: true,
            kills: 0,
            damage_dealt: 0.0,
            last_hit_by: None,
            hurt_timer: 0.0,
            hit_cooldown: 0.0,
            wall_cooldown: 0.0,
            scale: 1.0,
        }
    }

    /// Set the layout radius (base, visual and current all agree)
    pub fn set_base_radius(&mut self, radius: f32) {
        self.base_radius = radius;
        self.visual_radius = radius;
        self.radius = radius;
    }

    /// Restore vitals and stats for a rematch, keeping position and layout
    pub fn revive(&mut self) {
        self.hp = self.max_hp;
        self.alive = true;
        self.kills = 0;
        self.damage_dealt = 0.0;
        self.last_hit_by = None;
        self.hurt_timer = 0.0;
        self.hit_cooldown = 0.0;
        self.wall_cooldown = 0.0;
        self.visual_radius = self.base_radius;
        self.radius = self.base_radius;
    }

    /// Tick down the hurt flash (visual only, runs while paused)
    pub fn decay_hurt(&mut self, dt: f32) {
        self.hurt_timer = (self.hurt_timer - dt).max(0.0);
    }

    /// Tick down hit and wall cooldowns. Only running frames count.
    pub fn decay_cooldowns(&mut self, dt: f32) {
        self.hit_cooldown = (self.hit_cooldown - dt).max(0.0);
        self.wall_cooldown = (self.wall_cooldown - dt).max(0.0);
    }

    #[inline]
    pub fn health_fraction(&self) -> f32 {
        if self.max_hp <= 0.0 {
            return 0.0;
        }
        (self.hp / self.max_hp).clamp(0.0, 1.0)
    }
}

/// Number of entities still in the fight
pub fn count_alive(entities: &[Entity]) -> usize {
    entities.iter().filter(|e| e.alive).count()
}
