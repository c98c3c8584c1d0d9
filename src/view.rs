//! Read-only views for renderers and HUDs
//!
//! Nothing here mutates simulation state.

use serde::Serialize;

use crate::sim::collision::{Rect, entity_rect, player_rect};
use crate::sim::state::{Lane, PowerUpKind, RunState};

/// Which full-screen overlay to show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Overlay {
    /// Waiting for the first start
    Ready,
    GameOver,
    None,
}

/// Player color state; the first active effect in shield, score, slow order wins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlayerTint {
    Normal,
    Shield,
    Score,
    Slow,
}

/// Popup as the renderer sees it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopupView<'a> {
    pub text: &'a str,
    /// Fade from 1 (just posted) to 0 (expired)
    pub alpha: f64,
}

/// Per-entity draw data
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityView {
    pub id: u32,
    pub lane: Lane,
    /// Top-left corner and size
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    /// `None` for obstacles
    pub power_up: Option<PowerUpKind>,
    pub passed: bool,
    pub collected: bool,
    /// Top-lane spikes point downward
    pub hangs_down: bool,
}

/// Everything a HUD needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudView<'a> {
    /// Score floored to an integer
    pub score: u64,
    pub popup: Option<PopupView<'a>>,
    pub overlay: Overlay,
    pub tint: PlayerTint,
}

impl<'a> HudView<'a> {
    pub fn from_state(state: &'a RunState) -> Self {
        Self {
            score: display_score(state),
            popup: popup_view(state),
            overlay: overlay(state),
            tint: player_tint(state),
        }
    }
}

/// Score as shown to the player
pub fn display_score(state: &RunState) -> u64 {
    state.score.max(0.0).floor() as u64
}

pub fn overlay(state: &RunState) -> Overlay {
    if state.game_over {
        Overlay::GameOver
    } else if !state.running {
        Overlay::Ready
    } else {
        Overlay::None
    }
}

pub fn player_tint(state: &RunState) -> PlayerTint {
    let powerups = &state.powerups;
    if powerups.shielded() {
        PlayerTint::Shield
    } else if powerups.score_doubled() {
        PlayerTint::Score
    } else if powerups.slowed() {
        PlayerTint::Slow
    } else {
        PlayerTint::Normal
    }
}

/// The active popup, if any
pub fn popup_view(state: &RunState) -> Option<PopupView<'_>> {
    let popup = &state.popup;
    if !popup.is_active() {
        return None;
    }
    let alpha = (popup.timer_ms / state.tuning.popup_duration_ms).clamp(0.0, 1.0);
    Some(PopupView {
        text: &popup.text,
        alpha,
    })
}

/// The player's sprite box in their current lane
pub fn player_sprite(state: &RunState) -> Rect {
    player_rect(state, state.player_lane)
}

/// Draw data for every live entity, in spawn order
pub fn entity_views(state: &RunState) -> impl Iterator<Item = EntityView> + '_ {
    state.obstacles.iter().map(move |entity| {
        let rect = entity_rect(state, entity);
        EntityView {
            id: entity.id,
            lane: entity.lane,
            x: rect.min.x,
            y: rect.min.y,
            w: rect.size.x,
            h: rect.size.y,
            power_up: entity.power_up_kind(),
            passed: entity.passed,
            collected: entity.is_collected(),
            hangs_down: entity.lane == Lane::Top,
        }
    })
}
