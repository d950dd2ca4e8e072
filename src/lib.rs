//! Flappy Core - simulation core of a side-scrolling flappy bird game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, obstacles, camera, particles, round state)
//! - `view`: Read-only per-tick snapshot handed to a renderer
//! - `audio`: Sound cues derived from simulation events
//! - `persistence`: Score/statistics/settings stores
//! - `session`: Menu-level shell deciding which round is active
//! - `platform`: Frame-loop helpers

pub mod audio;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;
pub mod view;

pub use highscores::{HighScoreEntry, HighScores, Statistics};
pub use session::{Screen, Session};
pub use settings::{QualityPreset, Settings};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one physics step per tick)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Screen dimensions
    pub const SCREEN_WIDTH: f32 = 1024.0;
    pub const SCREEN_HEIGHT: f32 = 768.0;
    /// Height of the ground strip; its top is the lowest the bird can go
    pub const GROUND_HEIGHT: f32 = 100.0;

    /// Vertical acceleration per tick (negative pulls toward the ground)
    pub const GRAVITY: f32 = -0.8;
    /// Velocity assigned by a jump
    pub const JUMP_VELOCITY: f32 = 12.0;
    /// Bird is a square of this side
    pub const BIRD_SIZE: f32 = 30.0;

    pub const PIPE_WIDTH: f32 = 80.0;
    /// Minimum clearance between a gap and the ground/ceiling
    pub const GAP_MARGIN: f32 = 100.0;
    /// Pairs spawned ahead of the bird when a round begins
    pub const INITIAL_PAIRS: u32 = 3;
    /// Pairs to pass before the level is complete
    pub const PASS_THRESHOLD: u32 = 10;

    /// Camera follow smoothing factor per tick
    pub const CAMERA_SMOOTHING: f32 = 0.1;
    /// Shake applied on a fatal collision
    pub const CRASH_SHAKE_INTENSITY: f32 = 10.0;
    pub const CRASH_SHAKE_TICKS: u32 = 20;
}

/// RGB color used by particles and scenery
pub type Rgb = [u8; 3];
