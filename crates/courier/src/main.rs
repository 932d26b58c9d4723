//! SkyCourier headless run: an autopilot flies the default city at a fixed
//! 60 Hz and the final leaderboard is logged.
//!
//! Usage: `skycourier [seconds]` (default 240).

use anyhow::{Context, Result};
use courier::{
    default_city, default_missions, Arena, Autopilot, GameConfig, GameEvent, GameOverDisplay,
    GameOverReason, GameSession, RonScoreStore, ScoreStore,
};
use courier_core::{FrameClock, Pose, Vec3};
use physics::DroneBody;

const DEFAULT_RUN_SECONDS: f32 = 240.0;
const TICK_RATE_HZ: f64 = 60.0;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let run_seconds = match std::env::args().nth(1) {
        Some(arg) => arg
            .parse::<f32>()
            .with_context(|| format!("invalid run length {:?}", arg))?,
        None => DEFAULT_RUN_SECONDS,
    };

    let config = GameConfig::load();
    if !GameConfig::default_path().exists() {
        config.save();
    }
    let store = RonScoreStore::open(&config.leaderboard.path)
        .with_context(|| format!("opening leaderboard {:?}", config.leaderboard.path))?;

    let mut arena = Arena::build(&config.arena, &default_city());
    let mut session = GameSession::new(&config, default_missions(), store);
    session.set_obstacle_markers(arena.map_markers());
    let mut pilot = Autopilot::new();

    let mut clock = FrameClock::with_fixed_rate(TICK_RATE_HZ);
    let dt = clock.fixed_timestep_seconds();
    let frames = (run_seconds.max(0.0) / dt).ceil() as u64;
    log::info!("SkyCourier: flying for {:.0}s as {:?}", run_seconds, config.nickname);

    let mut games_finished = 0u32;
    let mut all_delivered = false;
    'run: for _ in 0..frames {
        clock.advance(clock.fixed_timestep());
        while clock.should_fixed_update() {
            let pose = arena.physics.drone_pose().unwrap_or_default();
            let velocity = arena
                .physics
                .drone_body_mut()
                .map(|d| d.linear_velocity())
                .unwrap_or(Vec3::ZERO);
            let (input, camera) =
                pilot.steer(session.phase(), &pose, velocity, session.missions().target());

            let report = session.tick(dt, &input, camera, &mut arena.physics);
            for event in &report.events {
                log_event(event, &pose);
                if let GameEvent::GameOver { reason, .. } = event {
                    games_finished += 1;
                    all_delivered |= *reason == GameOverReason::MissionsComplete;
                    match &report.hud.game_over {
                        Some(GameOverDisplay::Leaderboard(entries)) => {
                            log::info!("Leaderboard: {} entries", entries.len());
                        }
                        _ => log::info!("GAME OVER"),
                    }
                }
            }
            if all_delivered {
                break 'run;
            }
        }
    }

    log::info!(
        "Run finished after {:.1}s, {} game(s) over, score {}",
        clock.elapsed_seconds(),
        games_finished,
        session.state().score
    );
    for (rank, entry) in session.store().top_n(config.leaderboard.top_n)?.iter().enumerate() {
        log::info!("{:>2}. {:<16} {:>6}", rank + 1, entry.name, entry.score);
    }
    Ok(())
}

fn log_event(event: &GameEvent, pose: &Pose) {
    match event {
        GameEvent::MissionSetUp { index } => log::info!("Mission {} ready", index + 1),
        GameEvent::PackagePickedUp { mission } => {
            log::info!("Mission {}: package picked up at {:.1?}", mission + 1, pose.position)
        }
        GameEvent::PackageDelivered { mission, points } => {
            log::info!("Mission {}: delivered (+{})", mission + 1, points)
        }
        GameEvent::HazardHit { hazard, lives_left } => {
            log::info!("Hit hazard {}, {} lives left", hazard, lives_left)
        }
        GameEvent::TimerExpired { lives_left } => {
            log::info!("Out of time, {} lives left", lives_left)
        }
        other => log::debug!("{:?}", other),
    }
}
