//! Run state and core simulation types
//!
//! Everything a frame needs to advance lives in [`RunState`]; the frame
//! timestamp is owned by the driver.

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// One of the two horizontal tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lane {
    /// Lane 0
    Top,
    /// Lane 1
    Bottom,
}

impl Lane {
    pub const ALL: [Lane; 2] = [Lane::Top, Lane::Bottom];

    pub fn index(self) -> usize {
        match self {
            Lane::Top => 0,
            Lane::Bottom => 1,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Lane::Top),
            1 => Some(Lane::Bottom),
            _ => None,
        }
    }

    pub fn other(self) -> Self {
        match self {
            Lane::Top => Lane::Bottom,
            Lane::Bottom => Lane::Top,
        }
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Slows scrolling
    Slow,
    /// Obstacle hits are ignored
    Shield,
    /// Passed obstacles score double
    Score,
}

impl PowerUpKind {
    /// Popup text posted on pickup
    pub fn popup_text(self) -> &'static str {
        match self {
            PowerUpKind::Slow => "Slowed!",
            PowerUpKind::Shield => "Invincible!",
            PowerUpKind::Score => "Score x2!",
        }
    }
}

/// What an entity is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Obstacle,
    PowerUp { kind: PowerUpKind, collected: bool },
}

/// An obstacle or power-up scrolling right to left
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    /// Left edge
    pub x: f64,
    pub lane: Lane,
    pub w: f64,
    pub h: f64,
    /// Set once when the right edge clears the player
    pub passed: bool,
    pub kind: EntityKind,
}

impl Entity {
    pub fn is_power_up(&self) -> bool {
        matches!(self.kind, EntityKind::PowerUp { .. })
    }

    pub fn power_up_kind(&self) -> Option<PowerUpKind> {
        match self.kind {
            EntityKind::PowerUp { kind, .. } => Some(kind),
            EntityKind::Obstacle => None,
        }
    }

    pub fn is_collected(&self) -> bool {
        matches!(self.kind, EntityKind::PowerUp { collected: true, .. })
    }

    /// Right edge
    #[inline]
    pub fn trailing_edge(&self) -> f64 {
        self.x + self.w
    }
}

/// The player's sprite box (x fixed, y from lane)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub x: f64,
    pub w: f64,
    pub h: f64,
}

/// Active power-up timers (ms); an effect is active while its timer is positive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUps {
    pub slow_timer_ms: f64,
    pub shield_timer_ms: f64,
    pub score_timer_ms: f64,
    pub slow_factor: f64,
}

impl PowerUps {
    pub fn new(slow_factor: f64) -> Self {
        Self {
            slow_timer_ms: 0.0,
            shield_timer_ms: 0.0,
            score_timer_ms: 0.0,
            slow_factor,
        }
    }

    pub fn slowed(&self) -> bool {
        self.slow_timer_ms > 0.0
    }

    pub fn shielded(&self) -> bool {
        self.shield_timer_ms > 0.0
    }

    pub fn score_doubled(&self) -> bool {
        self.score_timer_ms > 0.0
    }

    /// Count every timer down by `dt_ms`, never below zero
    pub fn decay(&mut self, dt_ms: f64) {
        for timer in [
            &mut self.slow_timer_ms,
            &mut self.shield_timer_ms,
            &mut self.score_timer_ms,
        ] {
            if *timer > 0.0 {
                *timer = (*timer - dt_ms).max(0.0);
            }
        }
    }

    /// Start (or restart) the timer for `kind`
    pub fn activate(&mut self, kind: PowerUpKind, duration_ms: f64) {
        match kind {
            PowerUpKind::Slow => self.slow_timer_ms = duration_ms,
            PowerUpKind::Shield => self.shield_timer_ms = duration_ms,
            PowerUpKind::Score => self.score_timer_ms = duration_ms,
        }
    }
}

/// Transient message shown after a pickup
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Popup {
    pub text: String,
    pub timer_ms: f64,
}

impl Popup {
    pub fn is_active(&self) -> bool {
        self.timer_ms > 0.0
    }

    pub fn post(&mut self, text: &str, duration_ms: f64) {
        self.text.clear();
        self.text.push_str(text);
        self.timer_ms = duration_ms;
    }

    pub fn decay(&mut self, dt_ms: f64) {
        if self.timer_ms > 0.0 {
            self.timer_ms = (self.timer_ms - dt_ms).max(0.0);
        }
    }
}

/// Power-up kind history length used for anti-repeat
pub const KIND_HISTORY_LEN: usize = 2;

/// Complete run state (serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    pub running: bool,
    pub game_over: bool,
    pub player_lane: Lane,
    pub player: Player,
    /// Spawn order
    pub obstacles: Vec<Entity>,
    pub spawn_timer_ms: f64,
    pub spawn_interval_ms: f64,
    /// Pixels/s
    pub base_speed: f64,
    pub max_speed: f64,
    pub speed: f64,
    pub last_obstacle_lane: Option<Lane>,
    pub last_obstacle_repeat_count: u32,
    pub powerups: PowerUps,
    /// Most recent first
    pub last_powerup_kinds: Vec<PowerUpKind>,
    pub score: f64,
    pub popup: Popup,
    pub tuning: Tuning,
    next_id: u32,
}

impl RunState {
    /// Create an idle (not running) state from the given tuning
    pub fn new(tuning: Tuning) -> Self {
        Self {
            running: false,
            game_over: false,
            player_lane: Lane::Bottom,
            player: Player {
                x: tuning.player_x,
                w: tuning.player_w,
                h: tuning.player_h,
            },
            obstacles: Vec::new(),
            spawn_timer_ms: 0.0,
            spawn_interval_ms: tuning.spawn_interval_start_ms,
            base_speed: tuning.base_speed,
            max_speed: tuning.max_speed,
            speed: tuning.base_speed,
            last_obstacle_lane: None,
            last_obstacle_repeat_count: 0,
            powerups: PowerUps::new(tuning.slow_factor),
            last_powerup_kinds: Vec::with_capacity(KIND_HISTORY_LEN + 1),
            score: 0.0,
            popup: Popup::default(),
            tuning,
            next_id: 1,
        }
    }

    /// Restore every field to its initial value; leaves the run stopped
    pub fn reset(&mut self) {
        let tuning = std::mem::take(&mut self.tuning);
        *self = Self::new(tuning);
    }

    /// Begin a clean run regardless of prior state
    pub fn start(&mut self) {
        self.reset();
        self.running = true;
        self.game_over = false;
        log::info!("Run started");
    }

    /// Change lanes: flip when `target` is `None`, otherwise move to `target`.
    /// Ignored once the run is over.
    pub fn toggle_lane(&mut self, target: Option<Lane>) {
        if self.game_over {
            return;
        }
        self.player_lane = target.unwrap_or(self.player_lane.other());
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Centerline Y of a lane in pixels
    pub fn lane_y(&self, lane: Lane) -> f64 {
        self.tuning.lane_ys()[lane.index()]
    }

    /// Record a spawned power-up kind, newest first
    pub fn remember_powerup_kind(&mut self, kind: PowerUpKind) {
        self.last_powerup_kinds.insert(0, kind);
        self.last_powerup_kinds.truncate(KIND_HISTORY_LEN);
    }
}
