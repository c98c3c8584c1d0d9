//! Per-frame simulation step
//!
//! Advances a running [`RunState`] by a variable frame delta: spawning,
//! scrolling, scoring, despawning, collisions and timer decay, in that order.

use super::collision::{entity_rect, player_hitbox};
use super::random::RandomSource;
use super::spawn::{Spawned, spawn_obstacle};
use super::state::{EntityKind, PowerUpKind, RunState};
use crate::tuning::Tuning;

/// What happened during one [`advance`] call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    pub spawned: Option<Spawned>,
    /// Obstacles that cleared the player this frame
    pub passed: u32,
    /// Points from passed obstacles (excludes the passive trickle)
    pub pass_points: f64,
    pub collected: Vec<PowerUpKind>,
    /// Obstacle hits ignored because the shield was up
    pub shielded_hits: u32,
    /// The run ended this frame
    pub crashed: bool,
}

/// Scroll speed for a score: `base_speed` times one multiplicative step per
/// `speed_step_score` points, capped at `max_speed`
pub fn speed_for_score(score: f64, base_speed: f64, max_speed: f64, tuning: &Tuning) -> f64 {
    let steps = (score / tuning.speed_step_score).floor().max(0.0);
    let multiplier = tuning.speed_step_multiplier.powf(steps);
    (base_speed * multiplier).min(max_speed)
}

/// Advance the run by `dt_ms` milliseconds.
///
/// Does nothing unless the run is active. Negative or non-finite deltas are
/// treated as zero.
pub fn advance(state: &mut RunState, rng: &mut impl RandomSource, dt_ms: f64) -> StepReport {
    let mut report = StepReport::default();
    if !state.running {
        return report;
    }
    let dt = if dt_ms.is_finite() { dt_ms.max(0.0) } else { 0.0 };

    // Spawning
    state.spawn_timer_ms += dt;
    if state.spawn_timer_ms > state.spawn_interval_ms {
        report.spawned = Some(spawn_obstacle(state, rng));
        state.spawn_timer_ms = 0.0;
    }

    // Difficulty
    state.speed = speed_for_score(state.score, state.base_speed, state.max_speed, &state.tuning);

    state.powerups.decay(dt);
    let effective_speed = if state.powerups.slowed() {
        state.speed * state.powerups.slow_factor
    } else {
        state.speed
    };

    // Scroll and score passes
    let travel = effective_speed * dt / 1000.0;
    let pass_value = if state.powerups.score_doubled() { 2.0 } else { 1.0 };
    let player_x = state.player.x;
    for entity in &mut state.obstacles {
        entity.x -= travel;
        if !entity.passed && !entity.is_power_up() && entity.trailing_edge() < player_x {
            entity.passed = true;
            state.score += pass_value;
            report.passed += 1;
            report.pass_points += pass_value;
        }
    }

    // Despawn
    let despawn_x = -state.tuning.despawn_margin_x;
    state
        .obstacles
        .retain(|e| e.trailing_edge() > despawn_x && !e.is_collected());

    // Collisions in the player's lane
    let hits: Vec<usize> = {
        let snapshot: &RunState = state;
        let hitbox = player_hitbox(snapshot);
        snapshot
            .obstacles
            .iter()
            .enumerate()
            .filter(|(_, e)| {
                e.lane == snapshot.player_lane && hitbox.intersects(&entity_rect(snapshot, e))
            })
            .map(|(i, _)| i)
            .collect()
    };

    for index in hits {
        match state.obstacles[index].kind {
            EntityKind::PowerUp {
                kind,
                collected: false,
            } => {
                state.obstacles[index].kind = EntityKind::PowerUp {
                    kind,
                    collected: true,
                };
                state
                    .powerups
                    .activate(kind, state.tuning.effect_duration_ms);
                state
                    .popup
                    .post(kind.popup_text(), state.tuning.popup_duration_ms);
                report.collected.push(kind);
                log::debug!("Collected {:?} power-up", kind);
            }
            EntityKind::PowerUp { collected: true, .. } => {}
            EntityKind::Obstacle => {
                if state.powerups.shielded() {
                    report.shielded_hits += 1;
                } else if !state.game_over {
                    state.game_over = true;
                    state.running = false;
                    report.crashed = true;
                    log::info!("Game over with score {}", state.score.floor());
                }
            }
        }
    }

    state.popup.decay(dt);

    // Passive trickle
    state.score += dt / 1000.0 * state.tuning.passive_score_per_sec;

    report
}
