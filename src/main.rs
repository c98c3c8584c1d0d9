//! Lane Dash entry point
//!
//! Native builds run a headless autopilot demo: the simulation is driven by a
//! synthetic 60 Hz clock and the outcome is logged.
//!
//! Usage: `lane-dash [tuning.json] [seed]`

use lane_dash::sim::PowerUpKind;
use lane_dash::{Runner, Tuning};

/// Synthetic frame length (60 Hz)
const FRAME_MS: f64 = 1000.0 / 60.0;
/// Demo length cap in simulated seconds
const DEMO_SECONDS: f64 = 120.0;
const DEFAULT_SEED: u64 = 12345;

fn load_tuning(path: Option<&str>) -> Tuning {
    let Some(path) = path else {
        return Tuning::default();
    };
    match Tuning::load(path) {
        Ok(tuning) => tuning,
        Err(e) => {
            log::warn!("Using default tuning: {}", e);
            Tuning::default()
        }
    }
}

fn main() {
    env_logger::init();
    log::info!("Lane Dash (native) starting...");

    let args: Vec<String> = std::env::args().collect();
    let tuning = load_tuning(args.get(1).map(String::as_str));
    let seed = match args.get(2).map(|s| s.parse::<u64>()) {
        Some(Ok(seed)) => seed,
        Some(Err(e)) => {
            log::warn!("Invalid seed ({}), using {}", e, DEFAULT_SEED);
            DEFAULT_SEED
        }
        None => DEFAULT_SEED,
    };

    let mut runner = Runner::new(tuning, seed);
    runner.set_autopilot(true);
    runner.start(0.0);

    let total_frames = (DEMO_SECONDS * 1000.0 / FRAME_MS) as u64;
    let mut spawned = 0u32;
    let mut passed = 0u32;
    let mut pickups = [0u32; 3];
    let mut shielded = 0u32;
    let mut frames_run = 0u64;

    for frame in 1..=total_frames {
        let report = runner.frame(frame as f64 * FRAME_MS);
        frames_run = frame;
        spawned += u32::from(report.spawned.is_some());
        passed += report.passed;
        shielded += report.shielded_hits;
        for kind in &report.collected {
            log::info!("{}", kind.popup_text());
            let slot = match kind {
                PowerUpKind::Slow => 0,
                PowerUpKind::Shield => 1,
                PowerUpKind::Score => 2,
            };
            pickups[slot] += 1;
        }
        if report.crashed {
            break;
        }
    }

    let state = runner.state();
    let hud = runner.hud();
    println!(
        "{} after {:.1}s: score {} (spawned {}, dodged {}, slow/shield/score pickups {}/{}/{}, shield saves {})",
        if state.game_over { "Crashed" } else { "Survived" },
        frames_run as f64 * FRAME_MS / 1000.0,
        hud.score,
        spawned,
        passed,
        pickups[0],
        pickups[1],
        pickups[2],
        shielded,
    );
    log::info!(
        "Final speed {:.0} px/s, spawn interval {:.0} ms",
        state.speed,
        state.spawn_interval_ms
    );
}
