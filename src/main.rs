//! Raining Knives headless runner
//!
//! Plays one autopiloted session at simulated speed and reports how it went.
//!
//! Usage: `raining-knives [easy|medium|hard|path/to/settings.json] [max-seconds]`

use std::process::ExitCode;
use std::time::Duration;

use raining_knives::sim::{GameEvent, Session, TickInput};
use raining_knives::{Difficulty, HighScores, Settings};

/// One 60 Hz frame of simulated time
const FRAME: Duration = Duration::from_millis(16);
const DEFAULT_MAX_SECONDS: u64 = 300;

fn load_settings(arg: Option<&str>) -> raining_knives::Result<Settings> {
    match arg {
        None => Ok(Settings::default()),
        Some(arg) if arg.ends_with(".json") => Settings::load(arg),
        Some(arg) => Ok(Settings::from_difficulty(arg.parse::<Difficulty>()?)),
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let settings = match load_settings(args.first().map(String::as_str)) {
        Ok(settings) => settings,
        Err(err) => {
            log::error!("{}", err);
            return ExitCode::FAILURE;
        }
    };
    let max_seconds = args
        .get(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_MAX_SECONDS);

    let mut session = match Session::new(&settings) {
        Ok(session) => session,
        Err(err) => {
            log::error!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };
    let limit = Duration::from_secs(max_seconds);
    let mut hazards_spawned = 0usize;
    let mut final_score = None;

    while session.now() < limit && final_score.is_none() {
        session.tick(&input, FRAME);
        for event in session.drain_events() {
            match event {
                GameEvent::EntitySpawned { .. } => hazards_spawned += 1,
                GameEvent::LivesChanged { lives } => log::info!("Hit! {} lives left", lives),
                GameEvent::HazardSpeedChanged { speed } => log::info!("Knives speed up: {}", speed),
                GameEvent::CloudSpeedChanged { speed } => log::info!("Cloud speeds up: {}", speed),
                GameEvent::GameOver { final_score: score } => final_score = Some(score),
                _ => {}
            }
        }
    }

    let score = final_score.unwrap_or_else(|| session.world().scoreboard().score());
    let mut highscores = HighScores::new();
    let rank = highscores.add_score(score, settings.difficulty, 0);

    println!(
        "{} run: score {} after {:.1}s ({} entities spawned, {})",
        settings.difficulty,
        score,
        session.now().as_secs_f32(),
        hazards_spawned,
        if session.is_over() { "game over" } else { "time limit" }
    );
    if let Some(rank) = rank {
        println!("Leaderboard rank {}", rank);
    }
    ExitCode::SUCCESS
}
