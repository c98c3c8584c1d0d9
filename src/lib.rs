//! Lane Dash - A two-lane obstacle dodging arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, motion, collisions, scoring)
//! - `view`: Read-only accessors for renderers and HUDs
//! - `driver`: Frame clock, input routing and run control
//! - `tuning`: Data-driven game balance

pub mod driver;
pub mod sim;
pub mod tuning;
pub mod view;

pub use driver::{FrameClock, InputEvent, Runner};
pub use tuning::{Tuning, TuningError};
pub use view::{EntityView, HudView, Overlay, PlayerTint, PopupView};

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Viewport dimensions
    pub const VIEWPORT_WIDTH: f64 = 800.0;
    pub const VIEWPORT_HEIGHT: f64 = 300.0;
    /// Lane centerlines as a fraction of viewport height (top, bottom)
    pub const LANE_Y_FRACTIONS: [f64; 2] = [0.28, 0.72];

    /// Player sprite box; x is fixed, y comes from the lane
    pub const PLAYER_X: f64 = 120.0;
    pub const PLAYER_W: f64 = 48.0;
    pub const PLAYER_H: f64 = 68.0;
    /// Hitbox shrink on every side, keeps near misses forgiving
    pub const HITBOX_INSET: f64 = 8.0;

    /// Scroll speed (pixels/s)
    pub const BASE_SPEED: f64 = 300.0;
    pub const MAX_SPEED: f64 = 1200.0;
    /// Speed multiplier applied once per score step
    pub const SPEED_STEP_MULTIPLIER: f64 = 1.3;
    /// Score points per speed step
    pub const SPEED_STEP_SCORE: f64 = 10.0;

    /// Spawn cadence (ms)
    pub const SPAWN_INTERVAL_START_MS: f64 = 1200.0;
    pub const SPAWN_INTERVAL_FLOOR_MS: f64 = 520.0;
    /// Interval multiplier applied after every spawn
    pub const SPAWN_INTERVAL_DECAY: f64 = 0.995;
    /// Entities appear this far past the right edge
    pub const SPAWN_OFFSET_X: f64 = 40.0;
    /// Entities are dropped once their right edge is this far past the left edge
    pub const DESPAWN_MARGIN_X: f64 = 40.0;

    /// Obstacle size ranges (min, span)
    pub const OBSTACLE_H_MIN: f64 = 46.0;
    pub const OBSTACLE_H_SPAN: f64 = 40.0;
    pub const OBSTACLE_W_MIN: f64 = 28.0;
    pub const OBSTACLE_W_SPAN: f64 = 36.0;
    /// Power-ups are square
    pub const POWERUP_SIZE: f64 = 32.0;

    /// Lane bias: chance to repeat the previous lane, and how it decays
    pub const LANE_REPEAT_BASE: f64 = 0.35;
    pub const LANE_REPEAT_PENALTY: f64 = 0.08;
    pub const LANE_REPEAT_PENALTY_CAP: f64 = 0.25;
    pub const LANE_REPEAT_MIN: f64 = 0.05;

    /// Fraction of spawns that are power-ups
    pub const POWERUP_CHANCE: f64 = 0.12;
    /// Slow power-ups only appear at or above this score
    pub const SLOW_UNLOCK_SCORE: f64 = 30.0;
    /// Effect durations (ms)
    pub const EFFECT_DURATION_MS: f64 = 3500.0;
    pub const POPUP_DURATION_MS: f64 = 1400.0;
    /// Speed multiplier while slowed
    pub const SLOW_FACTOR: f64 = 0.55;

    /// Passive score per second
    pub const PASSIVE_SCORE_PER_SEC: f64 = 0.2;

    /// Largest frame delta handed to the simulation (ms)
    pub const MAX_FRAME_DT_MS: f64 = 100.0;
}
