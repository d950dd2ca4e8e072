//! Level tuning and per-round configuration
//!
//! Everything a round needs is resolved once, here, before the round starts.
//! A bad table or world fails with [`ConfigError`]; nothing inside a tick can.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while building configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("level table is empty")]
    EmptyLevelTable,

    #[error("level {level}: {field} must be a positive number, got {value}")]
    NonPositiveLevelField {
        level: u32,
        field: &'static str,
        value: f32,
    },

    #[error("world: {field} must be a positive number, got {value}")]
    NonPositiveWorldField { field: &'static str, value: f32 },

    #[error("world: {field} must be {expected}, got {value}")]
    WorldFieldOutOfRange {
        field: &'static str,
        value: f32,
        expected: &'static str,
    },

    #[error("world: ground height {ground} must be below screen height {screen}")]
    GroundAboveScreen { ground: f32, screen: f32 },

    #[error("level {level}: gap {gap} with margins {margin} exceeds field height {field_height}")]
    GapTooLarge {
        level: u32,
        gap: f32,
        margin: f32,
        field_height: f32,
    },

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Tuning for one level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Vertical size of the gap between a pair
    pub gap: f32,
    /// Horizontal scroll speed per tick
    pub speed: f32,
    /// Horizontal distance between consecutive pairs
    pub spacing: f32,
}

impl LevelConfig {
    pub const fn new(gap: f32, speed: f32, spacing: f32) -> Self {
        Self { gap, speed, spacing }
    }

    fn validate(&self, level: u32) -> Result<(), ConfigError> {
        for (field, value) in [
            ("gap", self.gap),
            ("speed", self.speed),
            ("spacing", self.spacing),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositiveLevelField { level, field, value });
            }
        }
        Ok(())
    }
}

const DEFAULT_LEVELS: [LevelConfig; 5] = [
    LevelConfig::new(220.0, 5.0, 320.0),
    LevelConfig::new(200.0, 6.0, 300.0),
    LevelConfig::new(180.0, 7.0, 280.0),
    LevelConfig::new(160.0, 8.0, 260.0),
    LevelConfig::new(140.0, 9.0, 240.0),
];

/// Static mapping from level number (1-based) to tuning
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LevelTable {
    levels: Vec<LevelConfig>,
}

impl Default for LevelTable {
    fn default() -> Self {
        Self {
            levels: DEFAULT_LEVELS.to_vec(),
        }
    }
}

impl LevelTable {
    /// Build a table, validating every entry
    pub fn new(levels: Vec<LevelConfig>) -> Result<Self, ConfigError> {
        if levels.is_empty() {
            return Err(ConfigError::EmptyLevelTable);
        }
        for (i, level) in levels.iter().enumerate() {
            level.validate(i as u32 + 1)?;
        }
        Ok(Self { levels })
    }

    /// Parse a JSON array of `{gap, speed, spacing}` objects
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let levels: Vec<LevelConfig> = serde_json::from_str(json)?;
        Self::new(levels)
    }

    /// Tuning for `level`; unknown levels reuse level 1
    pub fn get(&self, level: u32) -> LevelConfig {
        level
            .checked_sub(1)
            .and_then(|i| self.levels.get(i as usize))
            .copied()
            .unwrap_or(self.levels[0])
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// World constants shared by every round
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub screen_width: f32,
    pub screen_height: f32,
    pub ground_height: f32,
    /// Signed vertical acceleration per tick
    pub gravity: f32,
    /// Signed velocity assigned by a jump
    pub jump_velocity: f32,
    pub bird_size: f32,
    pub pipe_width: f32,
    pub gap_margin: f32,
    pub initial_pairs: u32,
    pub pass_threshold: u32,
    pub camera_smoothing: f32,
    /// Where the bird sits on screen, as a fraction of width/height
    pub camera_lead: (f32, f32),
    pub crash_shake_intensity: f32,
    pub crash_shake_ticks: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            ground_height: GROUND_HEIGHT,
            gravity: GRAVITY,
            jump_velocity: JUMP_VELOCITY,
            bird_size: BIRD_SIZE,
            pipe_width: PIPE_WIDTH,
            gap_margin: GAP_MARGIN,
            initial_pairs: INITIAL_PAIRS,
            pass_threshold: PASS_THRESHOLD,
            camera_smoothing: CAMERA_SMOOTHING,
            camera_lead: (0.3, 0.5),
            crash_shake_intensity: CRASH_SHAKE_INTENSITY,
            crash_shake_ticks: CRASH_SHAKE_TICKS,
        }
    }
}

impl WorldConfig {
    /// Height of the space between ground and ceiling
    pub fn field_height(&self) -> f32 {
        self.screen_height - self.ground_height
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("screen_width", self.screen_width),
            ("screen_height", self.screen_height),
            ("bird_size", self.bird_size),
            ("pipe_width", self.pipe_width),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositiveWorldField { field, value });
            }
        }
        for (field, value) in [
            ("ground_height", self.ground_height),
            ("gravity", self.gravity),
            ("jump_velocity", self.jump_velocity),
            ("gap_margin", self.gap_margin),
            ("camera_smoothing", self.camera_smoothing),
            ("camera_lead.0", self.camera_lead.0),
            ("camera_lead.1", self.camera_lead.1),
            ("crash_shake_intensity", self.crash_shake_intensity),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::WorldFieldOutOfRange {
                    field,
                    value,
                    expected: "a finite number",
                });
            }
        }
        if self.pass_threshold == 0 {
            return Err(ConfigError::NonPositiveWorldField {
                field: "pass_threshold",
                value: 0.0,
            });
        }
        if self.ground_height < 0.0 || self.ground_height >= self.screen_height {
            return Err(ConfigError::GroundAboveScreen {
                ground: self.ground_height,
                screen: self.screen_height,
            });
        }
        if self.gap_margin < 0.0 {
            return Err(ConfigError::WorldFieldOutOfRange {
                field: "gap_margin",
                value: self.gap_margin,
                expected: "at least 0",
            });
        }
        if !(self.camera_smoothing > 0.0 && self.camera_smoothing <= 1.0) {
            return Err(ConfigError::WorldFieldOutOfRange {
                field: "camera_smoothing",
                value: self.camera_smoothing,
                expected: "in (0, 1]",
            });
        }
        // Jitter is sampled from -i..=i, which must stay a finite span
        if !(0.0..=self.screen_height).contains(&self.crash_shake_intensity) {
            return Err(ConfigError::WorldFieldOutOfRange {
                field: "crash_shake_intensity",
                value: self.crash_shake_intensity,
                expected: "between 0 and the screen height",
            });
        }
        Ok(())
    }
}

/// Presentation switches that reach into the simulation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectsConfig {
    pub screen_shake: bool,
    pub max_particles: usize,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            screen_shake: true,
            max_particles: 500,
        }
    }
}

/// Immutable configuration for one round
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundConfig {
    pub world: WorldConfig,
    pub level: u32,
    pub tuning: LevelConfig,
    pub effects: EffectsConfig,
}

impl RoundConfig {
    /// Resolve and validate the configuration for `level`
    pub fn new(
        world: WorldConfig,
        table: &LevelTable,
        level: u32,
        effects: EffectsConfig,
    ) -> Result<Self, ConfigError> {
        world.validate()?;
        let tuning = table.get(level);
        tuning.validate(level)?;

        let field_height = world.field_height();
        if tuning.gap + 2.0 * world.gap_margin > field_height {
            return Err(ConfigError::GapTooLarge {
                level,
                gap: tuning.gap,
                margin: world.gap_margin,
                field_height,
            });
        }

        Ok(Self {
            world,
            level,
            tuning,
            effects,
        })
    }
}
