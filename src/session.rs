//! Session shell
//!
//! Owns the active screen and the score records. Rounds are created here,
//! ticked through here, and their outcome is saved here once the crash has
//! played out.

use crate::highscores::{HighScoreEntry, SHOWN_HIGH_SCORES, Statistics};
use crate::persistence::{Records, ScoreStore};
use crate::settings::Settings;
use crate::sim::{
    ConfigError, LevelTable, Round, RoundInput, RoundOutcome, RoundPhase, SimEvent, WorldConfig,
};
use crate::view::RenderView;

/// Ticks a crashed round stays on screen before the summary
pub const CRASH_LINGER_TICKS: u32 = 60;

/// Per-round seed stride (golden ratio, 64-bit)
const SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// What the game over screen shows
#[derive(Debug, Clone, PartialEq)]
pub struct GameOverSummary {
    pub score: u32,
    pub level: u32,
    /// Leaderboard position of this score; `None` if it could not be saved
    pub rank: Option<usize>,
    pub high_scores: Vec<HighScoreEntry>,
    pub statistics: Statistics,
}

#[derive(Debug, Clone)]
pub enum Screen {
    Menu { high_scores: Vec<HighScoreEntry> },
    Playing(Box<Round>),
    GameOver(GameOverSummary),
    LevelComplete { level: u32, next_level: u32, score: u32 },
}

impl Screen {
    pub fn name(&self) -> &'static str {
        match self {
            Screen::Menu { .. } => "menu",
            Screen::Playing(_) => "playing",
            Screen::GameOver(_) => "game over",
            Screen::LevelComplete { .. } => "level complete",
        }
    }
}

enum Transition {
    Menu,
    Start { level: u32, score: u32 },
    LevelComplete { level: u32, next_level: u32, score: u32 },
    GameOver(RoundOutcome),
}

pub struct Session<S: ScoreStore> {
    screen: Screen,
    records: Records<S>,
    world: WorldConfig,
    levels: LevelTable,
    settings: Settings,
    seed: u64,
    rounds_started: u64,
    /// Ticks spent in the collided phase of the current round
    crash_ticks: u32,
}

impl<S: ScoreStore> Session<S> {
    /// Open a session on the menu. Settings are read from the store once, here.
    pub fn new(
        store: S,
        world: WorldConfig,
        levels: LevelTable,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        world.validate()?;
        let records = Records::new(store);
        let settings = Settings::load(&records);
        let high_scores = records.high_scores(SHOWN_HIGH_SCORES);

        Ok(Self {
            screen: Screen::Menu { high_scores },
            records,
            world,
            levels,
            settings,
            seed,
            rounds_started: 0,
            crash_ticks: 0,
        })
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn round(&self) -> Option<&Round> {
        match &self.screen {
            Screen::Playing(round) => Some(round),
            _ => None,
        }
    }

    pub fn view(&self) -> Option<RenderView<'_>> {
        self.round().map(RenderView::of)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Store new settings; they take effect from the next round
    pub fn update_settings(&mut self, settings: Settings) {
        settings.save(&mut self.records);
        self.settings = settings;
    }

    pub fn records(&self) -> &Records<S> {
        &self.records
    }

    pub fn rounds_started(&self) -> u64 {
        self.rounds_started
    }

    /// Advance the active screen by one tick.
    ///
    /// Returns the round's events for this tick. An error means the next
    /// level could not be configured; the session stays on its current screen.
    pub fn tick(&mut self, input: &RoundInput) -> Result<Vec<SimEvent>, ConfigError> {
        let mut events = Vec::new();

        let transition = match &mut self.screen {
            Screen::Menu { .. } => input
                .primary
                .then_some(Transition::Start { level: 1, score: 0 }),
            Screen::Playing(round) => {
                events = round.tick(input);
                let mut next = None;
                for event in &events {
                    match *event {
                        SimEvent::ReturnToMenu => next = Some(Transition::Menu),
                        SimEvent::LevelComplete {
                            level,
                            next_level,
                            score,
                        } => {
                            next = Some(Transition::LevelComplete {
                                level,
                                next_level,
                                score,
                            })
                        }
                        _ => {}
                    }
                }
                if next.is_none() && round.phase() == RoundPhase::Collided {
                    self.crash_ticks += 1;
                    if self.crash_ticks > CRASH_LINGER_TICKS {
                        next = Some(Transition::GameOver(round.outcome()));
                    }
                }
                next
            }
            Screen::GameOver(_) => {
                if input.cancel {
                    Some(Transition::Menu)
                } else {
                    input.primary.then_some(Transition::Start { level: 1, score: 0 })
                }
            }
            Screen::LevelComplete {
                next_level, score, ..
            } => input.primary.then_some(Transition::Start {
                level: *next_level,
                score: *score,
            }),
        };

        if let Some(transition) = transition {
            self.apply(transition)?;
        }
        Ok(events)
    }

    fn apply(&mut self, transition: Transition) -> Result<(), ConfigError> {
        let next = match transition {
            Transition::Menu => Screen::Menu {
                high_scores: self.records.high_scores(SHOWN_HIGH_SCORES),
            },
            Transition::Start { level, score } => {
                let seed = self.round_seed();
                let round = Round::start(
                    self.world,
                    &self.levels,
                    level,
                    self.settings.effects(),
                    score,
                    seed,
                )?;
                self.rounds_started += 1;
                self.crash_ticks = 0;
                Screen::Playing(Box::new(round))
            }
            Transition::LevelComplete {
                level,
                next_level,
                score,
            } => Screen::LevelComplete {
                level,
                next_level,
                score,
            },
            Transition::GameOver(outcome) => Screen::GameOver(self.finish(outcome)),
        };
        log::info!("Screen: {} -> {}", self.screen.name(), next.name());
        self.screen = next;
        Ok(())
    }

    /// Save a finished game and collect what the summary shows
    fn finish(&mut self, outcome: RoundOutcome) -> GameOverSummary {
        let rank = self.records.potential_rank(outcome.score);
        let saved = self
            .records
            .save_score(&self.settings.player_name, outcome.score, outcome.level);

        GameOverSummary {
            score: outcome.score,
            level: outcome.level,
            rank: rank.filter(|_| saved),
            high_scores: self.records.high_scores(SHOWN_HIGH_SCORES),
            statistics: self.records.statistics(),
        }
    }

    fn round_seed(&self) -> u64 {
        self.seed
            .wrapping_add(self.rounds_started.wrapping_mul(SEED_STRIDE))
    }
}
