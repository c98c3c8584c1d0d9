//! Entity spawning
//!
//! Lane choice is biased against long same-lane streaks and power-up kinds
//! are biased against a third repeat. Draw order per spawn is fixed: lane,
//! height, width, power-up roll, then kind (only when the roll hits).

use super::random::RandomSource;
use super::state::{Entity, EntityKind, Lane, PowerUpKind, RunState};
use crate::tuning::Tuning;

/// Kinds that are always eligible
const BASE_KINDS: [PowerUpKind; 2] = [PowerUpKind::Shield, PowerUpKind::Score];

/// Summary of a spawn event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spawned {
    pub id: u32,
    pub lane: Lane,
    pub kind: EntityKind,
}

/// Chance of reusing the previous lane after `repeat_count` consecutive uses
pub fn lane_repeat_chance(repeat_count: u32, tuning: &Tuning) -> f64 {
    let penalty =
        (tuning.lane_repeat_penalty * repeat_count as f64).min(tuning.lane_repeat_penalty_cap);
    (tuning.lane_repeat_base - penalty).max(tuning.lane_repeat_min)
}

/// Pick a lane for the next spawn
fn choose_lane(state: &RunState, rng: &mut impl RandomSource) -> Lane {
    match state.last_obstacle_lane {
        None => {
            if rng.next_f64() < 0.5 {
                Lane::Top
            } else {
                Lane::Bottom
            }
        }
        Some(last) => {
            if rng.next_f64() < lane_repeat_chance(state.last_obstacle_repeat_count, &state.tuning) {
                last
            } else {
                last.other()
            }
        }
    }
}

/// Power-up kinds eligible for the next pick; never empty
pub fn candidate_kinds(score: f64, slow_unlock_score: f64, history: &[PowerUpKind]) -> Vec<PowerUpKind> {
    let mut kinds = BASE_KINDS.to_vec();
    if score >= slow_unlock_score {
        kinds.push(PowerUpKind::Slow);
    }

    if let [newest, previous, ..] = history {
        if newest == previous {
            kinds.retain(|k| k != newest);
            if kinds.is_empty() {
                kinds = BASE_KINDS.to_vec();
            }
        }
    }

    kinds
}

/// Pick a power-up kind and record it in the history
fn choose_power_up(state: &mut RunState, rng: &mut impl RandomSource) -> PowerUpKind {
    let kinds = candidate_kinds(
        state.score,
        state.tuning.slow_unlock_score,
        &state.last_powerup_kinds,
    );
    let index = ((rng.next_f64() * kinds.len() as f64) as usize).min(kinds.len() - 1);
    let kind = kinds[index];
    state.remember_powerup_kind(kind);
    kind
}

/// Spawn one obstacle or power-up off the right edge and tighten the spawn interval.
///
/// The caller resets the spawn timer.
pub fn spawn_obstacle(state: &mut RunState, rng: &mut impl RandomSource) -> Spawned {
    let lane = choose_lane(state, rng);

    let h = state.tuning.obstacle_h_min + rng.next_f64() * state.tuning.obstacle_h_span;
    let w = state.tuning.obstacle_w_min + rng.next_f64() * state.tuning.obstacle_w_span;

    let (kind, w, h) = if rng.next_f64() < state.tuning.powerup_chance {
        let kind = choose_power_up(state, rng);
        (
            EntityKind::PowerUp {
                kind,
                collected: false,
            },
            state.tuning.powerup_size,
            state.tuning.powerup_size,
        )
    } else {
        (EntityKind::Obstacle, w, h)
    };

    let id = state.next_entity_id();
    state.obstacles.push(Entity {
        id,
        x: state.tuning.spawn_x(),
        lane,
        w,
        h,
        passed: false,
        kind,
    });

    state.spawn_interval_ms = (state.spawn_interval_ms * state.tuning.spawn_interval_decay)
        .max(state.tuning.spawn_interval_floor_ms);

    if state.last_obstacle_lane == Some(lane) {
        state.last_obstacle_repeat_count += 1;
    } else {
        state.last_obstacle_lane = Some(lane);
        state.last_obstacle_repeat_count = 1;
    }

    log::debug!(
        "Spawned {:?} #{} in {:?} lane (next interval {:.1} ms)",
        kind,
        id,
        lane,
        state.spawn_interval_ms
    );

    Spawned { id, lane, kind }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::random::{ScriptedRandom, SeededRandom};

    /// Draws for an obstacle spawn: lane, height, width, roll (no power-up)
    fn obstacle_draws(lane_draw: f64) -> [f64; 4] {
        [lane_draw, 0.5, 0.5, 0.9]
    }

    fn running_state() -> RunState {
        let mut state = RunState::new(Tuning::default());
        state.start();
        state
    }

    #[test]
    fn test_first_spawn_lane_is_uniform() {
        let mut state = running_state();
        let mut rng = ScriptedRandom::new(obstacle_draws(0.49));
        assert_eq!(spawn_obstacle(&mut state, &mut rng).lane, Lane::Top);

        let mut state = running_state();
        let mut rng = ScriptedRandom::new(obstacle_draws(0.5));
        assert_eq!(spawn_obstacle(&mut state, &mut rng).lane, Lane::Bottom);
    }

    #[test]
    fn test_obstacle_placement_and_size() {
        let mut state = running_state();
        let mut rng = ScriptedRandom::new([0.0, 0.0, 0.0, 0.9]);
        let spawned = spawn_obstacle(&mut state, &mut rng);
        assert_eq!(spawned.kind, EntityKind::Obstacle);
        let entity = &state.obstacles[0];
        assert_eq!(entity.x, 840.0);
        assert_eq!(entity.h, 46.0);
        assert_eq!(entity.w, 28.0);
        assert!(!entity.passed);
        assert_eq!(rng.remaining(), 0);
    }

    #[test]
    fn test_repeat_chance_curve() {
        let tuning = Tuning::default();
        assert!((lane_repeat_chance(0, &tuning) - 0.35).abs() < 1e-12);
        assert!((lane_repeat_chance(1, &tuning) - 0.27).abs() < 1e-12);
        assert!((lane_repeat_chance(2, &tuning) - 0.19).abs() < 1e-12);
        assert!((lane_repeat_chance(3, &tuning) - 0.11).abs() < 1e-12);
        // Penalty caps at 0.25, so the floor of 0.05 is never reached
        assert!((lane_repeat_chance(4, &tuning) - 0.10).abs() < 1e-12);
        assert!((lane_repeat_chance(50, &tuning) - 0.10).abs() < 1e-12);
        assert!(lane_repeat_chance(50, &tuning) >= tuning.lane_repeat_min);
    }

    #[test]
    fn test_sizing_and_lane_bias_follow_tuning() {
        let tuning = Tuning {
            obstacle_h_min: 60.0,
            obstacle_h_span: 0.0,
            obstacle_w_min: 50.0,
            obstacle_w_span: 10.0,
            powerup_size: 20.0,
            lane_repeat_min: 0.3,
            ..Tuning::default()
        };
        // Penalty cap would give 0.10; the raised floor wins
        assert!((lane_repeat_chance(10, &tuning) - 0.3).abs() < 1e-12);

        let mut state = RunState::new(tuning);
        state.start();
        let mut rng = ScriptedRandom::new([0.9, 0.9, 0.5, 0.9]);
        spawn_obstacle(&mut state, &mut rng);
        let entity = &state.obstacles[0];
        assert_eq!((entity.w, entity.h), (55.0, 60.0));

        let mut rng = ScriptedRandom::new([0.9, 0.5, 0.5, 0.0, 0.0]);
        spawn_obstacle(&mut state, &mut rng);
        let entity = &state.obstacles[1];
        assert_eq!((entity.w, entity.h), (20.0, 20.0));
    }

    #[test]
    fn test_lane_bias_and_tracking() {
        let mut state = running_state();
        state.last_obstacle_lane = Some(Lane::Top);
        state.last_obstacle_repeat_count = 1;

        // 0.2 < 0.27: repeat
        let mut rng = ScriptedRandom::new(obstacle_draws(0.2));
        assert_eq!(spawn_obstacle(&mut state, &mut rng).lane, Lane::Top);
        assert_eq!(state.last_obstacle_repeat_count, 2);

        // 0.2 >= 0.19: switch
        let mut rng = ScriptedRandom::new(obstacle_draws(0.2));
        assert_eq!(spawn_obstacle(&mut state, &mut rng).lane, Lane::Bottom);
        assert_eq!(state.last_obstacle_lane, Some(Lane::Bottom));
        assert_eq!(state.last_obstacle_repeat_count, 1);
    }

    #[test]
    fn test_power_up_spawn_is_fixed_size() {
        let mut state = running_state();
        // lane, h, w, roll < 0.12, kind draw picks index 0 (Shield)
        let mut rng = ScriptedRandom::new([0.9, 0.7, 0.7, 0.05, 0.0]);
        let spawned = spawn_obstacle(&mut state, &mut rng);
        assert_eq!(
            spawned.kind,
            EntityKind::PowerUp {
                kind: PowerUpKind::Shield,
                collected: false
            }
        );
        let entity = &state.obstacles[0];
        assert_eq!((entity.w, entity.h), (32.0, 32.0));
        assert_eq!(state.last_powerup_kinds, vec![PowerUpKind::Shield]);
        assert_eq!(rng.remaining(), 0);
    }

    #[test]
    fn test_slow_locked_below_score_30() {
        let kinds = candidate_kinds(10.0, 30.0, &[]);
        assert_eq!(kinds, vec![PowerUpKind::Shield, PowerUpKind::Score]);

        let kinds = candidate_kinds(29.99, 30.0, &[]);
        assert!(!kinds.contains(&PowerUpKind::Slow));

        let kinds = candidate_kinds(30.0, 30.0, &[]);
        assert!(kinds.contains(&PowerUpKind::Slow));
    }

    #[test]
    fn test_score_10_never_spawns_slow() {
        let mut state = running_state();
        state.score = 10.0;
        // Highest possible kind draw still maps into {Shield, Score}
        for kind_draw in [0.0, 0.49, 0.5, 0.99] {
            state.last_powerup_kinds.clear();
            let mut rng = ScriptedRandom::new([0.5, 0.5, 0.5, 0.0, kind_draw]);
            let spawned = spawn_obstacle(&mut state, &mut rng);
            assert!(matches!(
                spawned.kind,
                EntityKind::PowerUp { kind, .. } if kind != PowerUpKind::Slow
            ));
        }
    }

    #[test]
    fn test_third_repeat_is_filtered() {
        let history = [PowerUpKind::Shield, PowerUpKind::Shield];
        let kinds = candidate_kinds(0.0, 30.0, &history);
        assert_eq!(kinds, vec![PowerUpKind::Score]);

        let history = [PowerUpKind::Slow, PowerUpKind::Slow];
        let kinds = candidate_kinds(50.0, 30.0, &history);
        assert_eq!(kinds, vec![PowerUpKind::Shield, PowerUpKind::Score]);

        let history = [PowerUpKind::Score, PowerUpKind::Shield];
        let kinds = candidate_kinds(0.0, 30.0, &history);
        assert_eq!(kinds.len(), 2);
    }

    #[test]
    fn test_candidates_never_empty() {
        let all = [PowerUpKind::Slow, PowerUpKind::Shield, PowerUpKind::Score];
        for score in [0.0, 29.0, 30.0, 1000.0] {
            for a in all {
                for b in all {
                    assert!(!candidate_kinds(score, 30.0, &[a, b]).is_empty());
                }
                assert!(!candidate_kinds(score, 30.0, &[a]).is_empty());
            }
        }
    }

    #[test]
    fn test_interval_ramp_hits_floor() {
        let mut state = running_state();
        let mut rng = SeededRandom::new(7);
        let mut previous = state.spawn_interval_ms;
        for _ in 0..1000 {
            spawn_obstacle(&mut state, &mut rng);
            assert!(state.spawn_interval_ms <= previous);
            assert!(state.spawn_interval_ms >= 520.0);
            previous = state.spawn_interval_ms;
        }
        assert_eq!(state.spawn_interval_ms, 520.0);
    }

    #[test]
    fn test_interval_decays_on_power_up_spawns_too() {
        let mut state = running_state();
        let mut rng = ScriptedRandom::new([0.5, 0.5, 0.5, 0.0, 0.0]);
        spawn_obstacle(&mut state, &mut rng);
        assert!((state.spawn_interval_ms - 1194.0).abs() < 1e-9);
    }

    #[test]
    fn test_entity_ids_are_unique() {
        let mut state = running_state();
        let mut rng = SeededRandom::new(3);
        let ids: Vec<u32> = (0..20).map(|_| spawn_obstacle(&mut state, &mut rng).id).collect();
        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    }
}
