//! Frame driver
//!
//! Turns host timestamps into clamped frame deltas, routes input intents to
//! the run state and owns the RNG. Hosts (browser loop, headless demo, tests)
//! call [`Runner::frame`] once per display refresh and read state back through
//! [`Runner::state`] or [`Runner::hud`].

use crate::consts::MAX_FRAME_DT_MS;
use crate::sim::collision::player_hitbox;
use crate::sim::random::{RandomSource, SeededRandom};
use crate::sim::state::{Lane, RunState};
use crate::sim::tick::{StepReport, advance};
use crate::tuning::Tuning;
use crate::view::HudView;

/// Seconds of travel the autopilot looks ahead
const AUTOPILOT_LOOKAHEAD_SECS: f64 = 0.15;
/// Extra lookahead distance (pixels)
const AUTOPILOT_MARGIN_PX: f64 = 16.0;

/// Computes frame deltas from a monotonic millisecond clock
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_ms: Option<f64>,
    max_dt_ms: f64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(MAX_FRAME_DT_MS)
    }
}

impl FrameClock {
    pub fn new(max_dt_ms: f64) -> Self {
        Self {
            last_ms: None,
            max_dt_ms,
        }
    }

    /// Make `now_ms` the previous frame time
    pub fn anchor(&mut self, now_ms: f64) {
        self.last_ms = Some(now_ms);
    }

    /// Elapsed time since the previous call, in `[0, max_dt_ms]`
    pub fn tick(&mut self, now_ms: f64) -> f64 {
        let Some(last) = self.last_ms else {
            self.last_ms = Some(now_ms);
            return 0.0;
        };

        let dt = now_ms - last;
        if !dt.is_finite() || dt < 0.0 {
            log::warn!("Non-monotonic frame timestamp ({last} -> {now_ms}), skipping frame");
            return 0.0;
        }

        self.last_ms = Some(now_ms);
        if dt > self.max_dt_ms {
            log::warn!("Frame gap of {dt:.1} ms clamped to {:.1} ms", self.max_dt_ms);
            return self.max_dt_ms;
        }
        dt
    }
}

/// Raw input intents from a host
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Arrow up
    LaneUp,
    /// Arrow down
    LaneDown,
    /// Space: flips lanes while running, starts otherwise
    Action,
    /// Tap/click at a viewport-space y coordinate
    Pointer { y: f64 },
}

/// Owns one run's state, its RNG and its frame clock
#[derive(Debug, Clone)]
pub struct Runner<R: RandomSource = SeededRandom> {
    state: RunState,
    rng: R,
    clock: FrameClock,
    autopilot: bool,
}

impl Runner<SeededRandom> {
    /// Runner with a seeded PCG generator
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        log::info!("Runner created with seed: {}", seed);
        Self::with_rng(tuning, SeededRandom::new(seed))
    }
}

impl<R: RandomSource> Runner<R> {
    pub fn with_rng(tuning: Tuning, rng: R) -> Self {
        Self {
            state: RunState::new(tuning),
            rng,
            clock: FrameClock::default(),
            autopilot: false,
        }
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn hud(&self) -> HudView<'_> {
        HudView::from_state(&self.state)
    }

    pub fn autopilot(&self) -> bool {
        self.autopilot
    }

    /// Idle/demo mode: the runner picks lanes itself
    pub fn set_autopilot(&mut self, enabled: bool) {
        self.autopilot = enabled;
    }

    /// Begin a clean run; the next frame measures time from `now_ms`
    pub fn start(&mut self, now_ms: f64) {
        self.state.start();
        self.clock.anchor(now_ms);
    }

    /// Return to the pre-start state
    pub fn reset(&mut self) {
        self.state.reset();
    }

    /// Apply one input event
    pub fn handle_input(&mut self, event: InputEvent, now_ms: f64) {
        match event {
            InputEvent::LaneUp => self.state.toggle_lane(Some(Lane::Top)),
            InputEvent::LaneDown => self.state.toggle_lane(Some(Lane::Bottom)),
            InputEvent::Action => {
                if self.state.running {
                    self.state.toggle_lane(None);
                } else {
                    self.start(now_ms);
                }
            }
            InputEvent::Pointer { y } => {
                if !self.state.running {
                    self.start(now_ms);
                    return;
                }
                let lane = if y < self.state.tuning.viewport_height / 2.0 {
                    Lane::Top
                } else {
                    Lane::Bottom
                };
                self.state.toggle_lane(Some(lane));
            }
        }
    }

    /// Advance one display frame ending at `now_ms`
    pub fn frame(&mut self, now_ms: f64) -> StepReport {
        let dt = self.clock.tick(now_ms);
        if self.autopilot && self.state.running {
            if let Some(lane) = autopilot_lane(&self.state) {
                self.state.toggle_lane(Some(lane));
            }
        }
        advance(&mut self.state, &mut self.rng, dt)
    }
}

/// Nearest obstacle in `lane` that overlaps the player's hitbox span or will
/// within `horizon` pixels. Returns its left edge.
fn nearest_threat(state: &RunState, lane: Lane, horizon: f64) -> Option<f64> {
    let hitbox = player_hitbox(state);
    state
        .obstacles
        .iter()
        .filter(|e| e.lane == lane && !e.is_power_up())
        .filter(|e| e.trailing_edge() > hitbox.min.x && e.x < hitbox.max().x + horizon)
        .map(|e| e.x)
        .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
}

/// Uncollected power-up in `lane` within reach
fn reachable_power_up(state: &RunState, lane: Lane, horizon: f64) -> bool {
    let hitbox = player_hitbox(state);
    state.obstacles.iter().any(|e| {
        e.lane == lane
            && e.is_power_up()
            && !e.is_collected()
            && e.trailing_edge() > hitbox.min.x
            && e.x < hitbox.max().x + horizon
    })
}

/// Lane the autopilot wants to move to, if different from the current one
pub fn autopilot_lane(state: &RunState) -> Option<Lane> {
    let speed = if state.powerups.slowed() {
        state.speed * state.powerups.slow_factor
    } else {
        state.speed
    };
    let horizon = speed * AUTOPILOT_LOOKAHEAD_SECS + AUTOPILOT_MARGIN_PX;
    let current = state.player_lane;
    let other = current.other();

    match (
        nearest_threat(state, current, horizon),
        nearest_threat(state, other, horizon),
    ) {
        (Some(_), None) => Some(other),
        // Both blocked: take the lane whose obstacle is further away
        (Some(here), Some(there)) if there > here => Some(other),
        (None, None) if reachable_power_up(state, other, horizon) => Some(other),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::random::ScriptedRandom;
    use crate::sim::state::{Entity, EntityKind, PowerUpKind};

    fn obstacle(id: u32, x: f64, lane: Lane) -> Entity {
        Entity {
            id,
            x,
            lane,
            w: 40.0,
            h: 60.0,
            passed: false,
            kind: EntityKind::Obstacle,
        }
    }

    #[test]
    fn test_clock_first_tick_is_zero() {
        let mut clock = FrameClock::default();
        assert_eq!(clock.tick(5000.0), 0.0);
        assert_eq!(clock.tick(5016.0), 16.0);
    }

    #[test]
    fn test_clock_clamps_gaps() {
        let mut clock = FrameClock::new(100.0);
        clock.anchor(0.0);
        assert_eq!(clock.tick(30_000.0), 100.0);
        assert_eq!(clock.tick(30_010.0), 10.0);
    }

    #[test]
    fn test_clock_ignores_backwards_time() {
        let mut clock = FrameClock::default();
        clock.anchor(1000.0);
        assert_eq!(clock.tick(900.0), 0.0);
        // Still measured from the latest good timestamp
        assert_eq!(clock.tick(1020.0), 20.0);
        assert_eq!(clock.tick(f64::NAN), 0.0);
        assert_eq!(clock.tick(1030.0), 10.0);
    }

    #[test]
    fn test_action_starts_then_flips() {
        let mut runner = Runner::with_rng(Tuning::default(), ScriptedRandom::default());
        assert!(!runner.state().running);
        runner.handle_input(InputEvent::Action, 0.0);
        assert!(runner.state().running);
        assert_eq!(runner.state().player_lane, Lane::Bottom);
        runner.handle_input(InputEvent::Action, 10.0);
        assert_eq!(runner.state().player_lane, Lane::Top);
    }

    #[test]
    fn test_pointer_picks_half() {
        let mut runner = Runner::with_rng(Tuning::default(), ScriptedRandom::default());
        // First tap only starts the run
        runner.handle_input(InputEvent::Pointer { y: 10.0 }, 0.0);
        assert!(runner.state().running);
        assert_eq!(runner.state().player_lane, Lane::Bottom);

        runner.handle_input(InputEvent::Pointer { y: 149.0 }, 1.0);
        assert_eq!(runner.state().player_lane, Lane::Top);
        runner.handle_input(InputEvent::Pointer { y: 150.0 }, 2.0);
        assert_eq!(runner.state().player_lane, Lane::Bottom);
    }

    #[test]
    fn test_arrow_keys_select_lanes() {
        let mut runner = Runner::with_rng(Tuning::default(), ScriptedRandom::default());
        runner.start(0.0);
        runner.handle_input(InputEvent::LaneUp, 1.0);
        assert_eq!(runner.state().player_lane, Lane::Top);
        runner.handle_input(InputEvent::LaneDown, 2.0);
        assert_eq!(runner.state().player_lane, Lane::Bottom);
    }

    #[test]
    fn test_start_anchors_clock() {
        let mut runner = Runner::with_rng(Tuning::default(), ScriptedRandom::default());
        runner.frame(0.0);
        runner.start(50_000.0);
        runner.frame(50_016.0);
        // Only 16 ms of trickle, not the 50 s spent on the title screen
        assert!((runner.state().score - 0.0032).abs() < 1e-9);
    }

    #[test]
    fn test_autopilot_dodges() {
        let mut state = RunState::new(Tuning::default());
        state.start();
        state.obstacles.push(obstacle(1, 180.0, Lane::Bottom));
        assert_eq!(autopilot_lane(&state), Some(Lane::Top));

        // Other lane blocked closer: stay
        state.obstacles.push(obstacle(2, 150.0, Lane::Top));
        assert_eq!(autopilot_lane(&state), None);
    }

    #[test]
    fn test_autopilot_ignores_distant_obstacles() {
        let mut state = RunState::new(Tuning::default());
        state.start();
        state.obstacles.push(obstacle(1, 600.0, Lane::Bottom));
        assert_eq!(autopilot_lane(&state), None);
    }

    #[test]
    fn test_autopilot_grabs_safe_power_up() {
        let mut state = RunState::new(Tuning::default());
        state.start();
        state.obstacles.push(Entity {
            id: 1,
            x: 190.0,
            lane: Lane::Top,
            w: 32.0,
            h: 32.0,
            passed: false,
            kind: EntityKind::PowerUp {
                kind: PowerUpKind::Score,
                collected: false,
            },
        });
        assert_eq!(autopilot_lane(&state), Some(Lane::Top));
    }

    #[test]
    fn test_reset_returns_to_ready() {
        let mut runner = Runner::new(Tuning::default(), 1);
        runner.start(0.0);
        for i in 1..=120 {
            runner.frame(i as f64 * 16.0);
        }
        runner.reset();
        let state = runner.state();
        assert_eq!(state.score, 0.0);
        assert!(state.obstacles.is_empty());
        assert!(!state.running);
        assert!(!state.game_over);
    }
}
