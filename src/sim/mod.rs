//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Randomness only through an injected `RandomSource`
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod random;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Rect, entity_rect, player_hitbox, player_rect, rects_intersect};
pub use random::{RandomSource, ScriptedRandom, SeededRandom};
pub use spawn::{Spawned, candidate_kinds, lane_repeat_chance, spawn_obstacle};
pub use state::{
    Entity, EntityKind, KIND_HISTORY_LEN, Lane, Player, Popup, PowerUpKind, PowerUps, RunState,
};
pub use tick::{StepReport, advance, speed_for_score};
