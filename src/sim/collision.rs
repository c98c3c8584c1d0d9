//! Axis-aligned rectangle collision
//!
//! Entities and the player are boxes vertically centered on their lane.
//! The player's hitbox is inset from its sprite so grazes don't count.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::state::{Entity, Lane, RunState};

/// Axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: DVec2,
    pub size: DVec2,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            min: DVec2::new(x, y),
            size: DVec2::new(w, h),
        }
    }

    /// Box of height `h` centered on `center_y`
    pub fn centered_on(x: f64, center_y: f64, w: f64, h: f64) -> Self {
        Self::new(x, center_y - h / 2.0, w, h)
    }

    #[inline]
    pub fn max(&self) -> DVec2 {
        self.min + self.size
    }

    /// Shrink by `amount` on every side
    pub fn inset(&self, amount: f64) -> Self {
        Self {
            min: self.min + DVec2::splat(amount),
            size: self.size - DVec2::splat(amount * 2.0),
        }
    }

    /// Strict overlap; touching edges do not intersect
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        rects_intersect(
            self.min.x,
            self.min.y,
            self.size.x,
            self.size.y,
            other.min.x,
            other.min.y,
            other.size.x,
            other.size.y,
        )
    }
}

/// Rectangle intersection on raw coordinates
#[allow(clippy::too_many_arguments)]
#[inline]
pub fn rects_intersect(x1: f64, y1: f64, w1: f64, h1: f64, x2: f64, y2: f64, w2: f64, h2: f64) -> bool {
    x1 < x2 + w2 && x1 + w1 > x2 && y1 < y2 + h2 && y1 + h1 > y2
}

/// The player's drawn box in `lane`
pub fn player_rect(state: &RunState, lane: Lane) -> Rect {
    let player = &state.player;
    Rect::centered_on(player.x, state.lane_y(lane), player.w, player.h)
}

/// The player's collision box in their current lane
pub fn player_hitbox(state: &RunState) -> Rect {
    player_rect(state, state.player_lane).inset(state.tuning.hitbox_inset)
}

/// An entity's box
pub fn entity_rect(state: &RunState, entity: &Entity) -> Rect {
    Rect::centered_on(entity.x, state.lane_y(entity.lane), entity.w, entity.h)
}
