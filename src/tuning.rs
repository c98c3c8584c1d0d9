//! Data-driven game balance
//!
//! Every layout, speed, spawn and scoring number the simulation reads lives
//! here so a run can be retuned from a JSON file without a rebuild. Missing fields fall back to [`crate::consts`].

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors from loading or validating a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning: {0}")]
    Invalid(String),
}

/// Balance and layout parameters for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Layout ===
    pub viewport_width: f64,
    pub viewport_height: f64,
    /// Lane centerlines as fractions of viewport height (top, bottom)
    pub lane_y_fractions: [f64; 2],
    pub player_x: f64,
    pub player_w: f64,
    pub player_h: f64,
    pub hitbox_inset: f64,

    // === Speed ===
    pub base_speed: f64,
    pub max_speed: f64,
    pub speed_step_multiplier: f64,
    pub speed_step_score: f64,

    // === Spawning ===
    pub spawn_interval_start_ms: f64,
    pub spawn_interval_floor_ms: f64,
    pub spawn_interval_decay: f64,
    pub spawn_offset_x: f64,
    pub despawn_margin_x: f64,
    /// Obstacle sizes are `min + draw * span`
    pub obstacle_h_min: f64,
    pub obstacle_h_span: f64,
    pub obstacle_w_min: f64,
    pub obstacle_w_span: f64,
    pub powerup_size: f64,
    /// Same-lane chance: `base - min(penalty * repeats, penalty_cap)`, floored at `min`
    pub lane_repeat_base: f64,
    pub lane_repeat_penalty: f64,
    pub lane_repeat_penalty_cap: f64,
    pub lane_repeat_min: f64,

    // === Power-ups ===
    pub powerup_chance: f64,
    pub slow_unlock_score: f64,
    pub effect_duration_ms: f64,
    pub popup_duration_ms: f64,
    pub slow_factor: f64,

    // === Scoring ===
    pub passive_score_per_sec: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,
            lane_y_fractions: LANE_Y_FRACTIONS,
            player_x: PLAYER_X,
            player_w: PLAYER_W,
            player_h: PLAYER_H,
            hitbox_inset: HITBOX_INSET,

            base_speed: BASE_SPEED,
            max_speed: MAX_SPEED,
            speed_step_multiplier: SPEED_STEP_MULTIPLIER,
            speed_step_score: SPEED_STEP_SCORE,

            spawn_interval_start_ms: SPAWN_INTERVAL_START_MS,
            spawn_interval_floor_ms: SPAWN_INTERVAL_FLOOR_MS,
            spawn_interval_decay: SPAWN_INTERVAL_DECAY,
            spawn_offset_x: SPAWN_OFFSET_X,
            despawn_margin_x: DESPAWN_MARGIN_X,
            obstacle_h_min: OBSTACLE_H_MIN,
            obstacle_h_span: OBSTACLE_H_SPAN,
            obstacle_w_min: OBSTACLE_W_MIN,
            obstacle_w_span: OBSTACLE_W_SPAN,
            powerup_size: POWERUP_SIZE,
            lane_repeat_base: LANE_REPEAT_BASE,
            lane_repeat_penalty: LANE_REPEAT_PENALTY,
            lane_repeat_penalty_cap: LANE_REPEAT_PENALTY_CAP,
            lane_repeat_min: LANE_REPEAT_MIN,

            powerup_chance: POWERUP_CHANCE,
            slow_unlock_score: SLOW_UNLOCK_SCORE,
            effect_duration_ms: EFFECT_DURATION_MS,
            popup_duration_ms: POPUP_DURATION_MS,
            slow_factor: SLOW_FACTOR,

            passive_score_per_sec: PASSIVE_SCORE_PER_SEC,
        }
    }
}

impl Tuning {
    /// Lane centerline Y positions in pixels (top, bottom)
    pub fn lane_ys(&self) -> [f64; 2] {
        [
            self.viewport_height * self.lane_y_fractions[0],
            self.viewport_height * self.lane_y_fractions[1],
        ]
    }

    /// X coordinate where new entities appear
    pub fn spawn_x(&self) -> f64 {
        self.viewport_width + self.spawn_offset_x
    }

    /// Parse and validate tuning from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file on disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json_str(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("viewport_width", self.viewport_width),
            ("viewport_height", self.viewport_height),
            ("player_w", self.player_w),
            ("player_h", self.player_h),
            ("base_speed", self.base_speed),
            ("max_speed", self.max_speed),
            ("speed_step_score", self.speed_step_score),
            ("spawn_interval_start_ms", self.spawn_interval_start_ms),
            ("spawn_interval_floor_ms", self.spawn_interval_floor_ms),
            ("obstacle_h_min", self.obstacle_h_min),
            ("obstacle_w_min", self.obstacle_w_min),
            ("powerup_size", self.powerup_size),
            ("effect_duration_ms", self.effect_duration_ms),
            ("popup_duration_ms", self.popup_duration_ms),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(TuningError::Invalid(format!("{name} must be positive, got {value}")));
            }
        }

        let non_negative = [
            ("player_x", self.player_x),
            ("spawn_offset_x", self.spawn_offset_x),
            ("despawn_margin_x", self.despawn_margin_x),
            ("obstacle_h_span", self.obstacle_h_span),
            ("obstacle_w_span", self.obstacle_w_span),
            ("slow_unlock_score", self.slow_unlock_score),
            ("passive_score_per_sec", self.passive_score_per_sec),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(TuningError::Invalid(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }

        if self.base_speed > self.max_speed {
            return Err(TuningError::Invalid(format!(
                "base_speed {} exceeds max_speed {}",
                self.base_speed, self.max_speed
            )));
        }
        if self.spawn_interval_floor_ms > self.spawn_interval_start_ms {
            return Err(TuningError::Invalid(format!(
                "spawn_interval_floor_ms {} exceeds spawn_interval_start_ms {}",
                self.spawn_interval_floor_ms, self.spawn_interval_start_ms
            )));
        }
        if !(self.spawn_interval_decay > 0.0 && self.spawn_interval_decay <= 1.0) {
            return Err(TuningError::Invalid(format!(
                "spawn_interval_decay must be in (0, 1], got {}",
                self.spawn_interval_decay
            )));
        }
        if !(self.speed_step_multiplier.is_finite() && self.speed_step_multiplier >= 1.0) {
            return Err(TuningError::Invalid(format!(
                "speed_step_multiplier must be at least 1, got {}",
                self.speed_step_multiplier
            )));
        }

        let fractions = [
            ("powerup_chance", self.powerup_chance),
            ("slow_factor", self.slow_factor),
            ("lane_y_fractions[0]", self.lane_y_fractions[0]),
            ("lane_y_fractions[1]", self.lane_y_fractions[1]),
            ("lane_repeat_base", self.lane_repeat_base),
            ("lane_repeat_penalty", self.lane_repeat_penalty),
            ("lane_repeat_penalty_cap", self.lane_repeat_penalty_cap),
            ("lane_repeat_min", self.lane_repeat_min),
        ];
        for (name, value) in fractions {
            if !(0.0..=1.0).contains(&value) {
                return Err(TuningError::Invalid(format!("{name} must be in [0, 1], got {value}")));
            }
        }

        if !(self.hitbox_inset >= 0.0 && self.hitbox_inset * 2.0 < self.player_w.min(self.player_h)) {
            return Err(TuningError::Invalid(format!(
                "hitbox_inset {} leaves no player hitbox",
                self.hitbox_inset
            )));
        }

        Ok(())
    }
}
