//! Game balance values
//!
//! Every number that shapes how the game plays lives here so it can be
//! tweaked from a JSON file without rebuilding. Defaults are the shipped
//! balance.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::TuningError;

/// Data-driven balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Timing ===
    /// Largest step the simulation will take in one tick (seconds)
    pub max_dt: f32,
    /// Delay after a level clear or a death before the next state (seconds)
    pub countdown: f64,

    // === Player ===
    /// Recoil impulse applied opposite each shot
    pub shoot_power: f32,
    /// Velocity retained per nominal 1/60 s
    pub friction: f32,
    /// Minimum time between player shots (seconds)
    pub cooldown: f64,
    /// Player bullet travel range
    pub player_range: f32,
    /// Radius used for movement collision and spawn caching
    pub collision_radius: f32,
    /// Aim points closer than this to the shooter produce no shot
    pub aim_epsilon: f32,

    // === Bullets ===
    pub bullet_speed: f32,
    /// Distance at which an enemy bullet kills the player
    pub player_hitbox: f32,
    /// Distance at which a player bullet kills an enemy
    pub enemy_hitbox: f32,

    // === Obstacles ===
    /// Half-extent that stops bullets
    pub obstacle_half: f32,
    /// Half-extent that stops bodies (before adding the body radius)
    pub obstacle_collision_half: f32,

    // === Enemies ===
    /// Engagement distance (also enemy bullet range)
    pub enemy_range: f32,
    /// Fire interval lower bound (seconds)
    pub enemy_fire_min: f64,
    /// Fire interval upper bound (seconds)
    pub enemy_fire_max: f64,
    /// Enemy cap; levels past it speed up enemy bullets instead
    pub max_enemies: u32,
    /// Bullet speed bonus per level past the cap (linear)
    pub enemy_speed_bonus: f32,
    /// Enemies never spawn closer than this to the player spawn
    pub min_spawn_dist: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            max_dt: 0.1,
            countdown: 0.5,

            shoot_power: 15.0,
            friction: 0.9,
            cooldown: 0.25,
            player_range: 5.0,
            collision_radius: 0.35,
            aim_epsilon: 0.1,

            bullet_speed: 10.0,
            player_hitbox: 0.5,
            enemy_hitbox: 0.5,

            obstacle_half: 0.4,
            obstacle_collision_half: 0.5,

            enemy_range: 12.0,
            enemy_fire_min: 1.0,
            enemy_fire_max: 3.0,
            max_enemies: 10,
            enemy_speed_bonus: 0.05,
            min_spawn_dist: 3.0,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from JSON; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: &Path) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Enemy bullet speed at a given level
    pub fn enemy_bullet_speed(&self, level: u32) -> f32 {
        let extra = level.saturating_sub(self.max_enemies) as f32;
        self.bullet_speed * (1.0 + extra * self.enemy_speed_bonus)
    }

    /// Number of enemies placed on a level
    pub fn enemy_count(&self, level: u32) -> u32 {
        level.min(self.max_enemies)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        // A level with no enemies can never be cleared
        if self.max_enemies == 0 {
            return Err(TuningError::OutOfRange {
                field: "max_enemies",
                value: 0.0,
            });
        }
        if !(self.friction > 0.0 && self.friction < 1.0) {
            return Err(TuningError::OutOfRange {
                field: "friction",
                value: self.friction as f64,
            });
        }
        if self.enemy_fire_min > self.enemy_fire_max {
            return Err(TuningError::InvertedInterval {
                min: self.enemy_fire_min,
                max: self.enemy_fire_max,
            });
        }
        let positive: [(&'static str, f64); 10] = [
            ("max_dt", self.max_dt as f64),
            ("bullet_speed", self.bullet_speed as f64),
            ("player_range", self.player_range as f64),
            ("enemy_range", self.enemy_range as f64),
            ("collision_radius", self.collision_radius as f64),
            ("player_hitbox", self.player_hitbox as f64),
            ("enemy_hitbox", self.enemy_hitbox as f64),
            ("obstacle_half", self.obstacle_half as f64),
            ("obstacle_collision_half", self.obstacle_collision_half as f64),
            ("aim_epsilon", self.aim_epsilon as f64),
        ];
        for (field, value) in positive {
            if value <= 0.0 || !value.is_finite() {
                return Err(TuningError::OutOfRange { field, value });
            }
        }
        let non_negative: [(&'static str, f64); 6] = [
            ("countdown", self.countdown),
            ("cooldown", self.cooldown),
            ("enemy_fire_min", self.enemy_fire_min),
            ("enemy_fire_max", self.enemy_fire_max),
            ("min_spawn_dist", self.min_spawn_dist as f64),
            ("enemy_speed_bonus", self.enemy_speed_bonus as f64),
        ];
        for (field, value) in non_negative {
            if value < 0.0 || !value.is_finite() {
                return Err(TuningError::OutOfRange { field, value });
            }
        }
        Ok(())
    }
}
