//! Flappy Core headless runner
//!
//! Plays a few rounds with a simple autopilot, driving the session the way a
//! frontend would: variable frames, fixed simulation ticks, audio cues and
//! score saving.
//!
//! Usage: `flappy-core [seed] [levels.json]`

use std::path::Path;
use std::process::ExitCode;

use flappy_core::audio::{AudioManager, LogBackend};
use flappy_core::persistence::{JsonFileStore, MemoryStore, ScoreStore, now_ms};
use flappy_core::platform::FixedStep;
use flappy_core::sim::{LevelTable, Round, RoundInput, SimEvent, WorldConfig};
use flappy_core::{Screen, Session};

const SCORE_FILE: &str = "flappy-scores.json";
/// Stop after this many finished games
const GAMES_TO_PLAY: u32 = 3;
/// Give up after this many frames regardless
const MAX_FRAMES: u32 = 60 * 60 * 10;
/// Uneven frame times, seconds
const FRAME_PATTERN: [f32; 4] = [1.0 / 60.0, 1.0 / 144.0, 1.0 / 30.0, 1.0 / 75.0];
/// Frames to sit on a menu or summary before pressing start
const SCREEN_PAUSE_FRAMES: u32 = 30;

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Flappy Core (headless) starting...");

    let mut args = std::env::args().skip(1);
    let seed = match args.next() {
        Some(arg) => match arg.parse::<u64>() {
            Ok(seed) => seed,
            Err(e) => {
                log::error!("Invalid seed {:?}: {}", arg, e);
                return ExitCode::FAILURE;
            }
        },
        None => now_ms(),
    };
    let levels = match args.next() {
        Some(path) => match load_levels(Path::new(&path)) {
            Ok(levels) => levels,
            Err(e) => {
                log::error!("Could not load level table {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => LevelTable::default(),
    };
    log::info!("Seed {} with {} levels", seed, levels.len());

    let result = match JsonFileStore::open(SCORE_FILE) {
        Ok(store) => run(store, levels, seed),
        Err(e) => {
            log::warn!("Score file unavailable ({}), scores will not be kept", e);
            run(MemoryStore::new(), levels, seed)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_levels(path: &Path) -> Result<LevelTable, Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(path)?;
    Ok(LevelTable::from_json(&json)?)
}

fn run<S: ScoreStore>(
    store: S,
    levels: LevelTable,
    seed: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = Session::new(store, WorldConfig::default(), levels, seed)?;
    let mut audio = AudioManager::new(LogBackend);
    audio.apply_settings(session.settings());

    let mut clock = FixedStep::default();
    let mut games = 0;
    let mut idle_frames = 0;

    for frame in 0..MAX_FRAMES {
        let dt = FRAME_PATTERN[frame as usize % FRAME_PATTERN.len()];

        let mut input = match session.screen() {
            Screen::Playing(round) => autopilot(round),
            _ => {
                idle_frames += 1;
                RoundInput {
                    primary: idle_frames % SCREEN_PAUSE_FRAMES == 0,
                    cancel: false,
                }
            }
        };

        for _ in 0..clock.advance(dt) {
            let events = session.tick(&input)?;
            // Presses only count for the first tick of a frame
            input = RoundInput::default();

            audio.dispatch(&events);
            for event in &events {
                log_event(event);
            }
        }

        if let Screen::GameOver(summary) = session.screen() {
            if idle_frames == 0 {
                games += 1;
                log::info!(
                    "Game {} over: score {} at level {}, rank {:?}, {} games played, best {}",
                    games,
                    summary.score,
                    summary.level,
                    summary.rank,
                    summary.statistics.games_played,
                    summary.statistics.best_score
                );
                for (i, entry) in summary.high_scores.iter().enumerate() {
                    log::info!(
                        "  {}. {} {} (level {})",
                        i + 1,
                        entry.name,
                        entry.score,
                        entry.level
                    );
                }
                if games >= GAMES_TO_PLAY {
                    return Ok(());
                }
            }
        } else if matches!(session.screen(), Screen::Playing(_)) {
            idle_frames = 0;
        }
    }

    log::warn!("Stopped after {} frames", MAX_FRAMES);
    Ok(())
}

/// Flap when below the middle of the next gap and falling
fn autopilot(round: &Round) -> RoundInput {
    let bird = round.bird();
    let gap = round.config().tuning.gap;
    let target = round
        .obstacles()
        .iter()
        .find(|o| o.is_top && o.right() > bird.pos.x - bird.half_size())
        .map(|top| top.bottom() - gap / 2.0)
        .unwrap_or(round.config().world.screen_height / 2.0);

    RoundInput {
        primary: bird.pos.y < target && bird.vel_y <= 0.0,
        cancel: false,
    }
}

fn log_event(event: &SimEvent) {
    match event {
        SimEvent::Scored { score, .. } => log::info!("Score {}", score),
        SimEvent::Collided(collision) => log::info!("Crashed: {:?}", collision),
        SimEvent::LevelComplete {
            level,
            next_level,
            score,
        } => log::info!("Level {} cleared with {}; next is {}", level, score, next_level),
        SimEvent::Jumped => log::trace!("Flap"),
        SimEvent::Started | SimEvent::ReturnToMenu => log::debug!("{:?}", event),
    }
}
