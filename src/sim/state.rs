//! Entity state records
//!
//! Plain data. Drawing lives with the renderer, behavior with the systems in
//! the sibling modules.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::level::WorldConfig;

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Waiting for the first primary action
    NotStarted,
    /// Active gameplay
    Playing,
    /// Bird hit the ground or an obstacle
    Collided,
    /// Enough pairs passed to move on
    LevelComplete,
}

/// Wing flap amplitude (degrees)
const WING_SWING: f32 = 20.0;
const WING_STEP: f32 = 5.0;
/// Tilt limit (degrees) and how strongly velocity maps to tilt
const MAX_TILT: f32 = 30.0;
const TILT_PER_VELOCITY: f32 = 3.0;

/// The player's bird
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bird {
    /// Center; x stays fixed, y is integrated by physics
    pub pos: Vec2,
    /// Vertical velocity, positive is up
    pub vel_y: f32,
    /// Side of the square hitbox
    pub size: f32,
    /// Visual tilt in degrees, follows velocity
    pub angle: f32,
    /// Wing animation angle in degrees
    pub wing_angle: f32,
    wing_dir: f32,
    pub alive: bool,
}

impl Bird {
    pub fn new(pos: Vec2, size: f32) -> Self {
        Self {
            pos,
            vel_y: 0.0,
            size,
            angle: 0.0,
            wing_angle: 0.0,
            wing_dir: 1.0,
            alive: true,
        }
    }

    /// Spawn position for a world: a quarter across, half way up
    pub fn spawn(world: &WorldConfig) -> Self {
        Self::new(
            Vec2::new(world.screen_width / 4.0, world.screen_height / 2.0),
            world.bird_size,
        )
    }

    pub fn half_size(&self) -> f32 {
        self.size / 2.0
    }

    /// Assign the jump velocity. Repeating it changes nothing.
    pub fn jump(&mut self, jump_velocity: f32) {
        self.vel_y = jump_velocity;
    }

    /// Advance wing flap and recompute tilt
    pub fn animate(&mut self) {
        self.wing_angle += self.wing_dir * WING_STEP;
        if self.wing_angle.abs() > WING_SWING {
            self.wing_dir = -self.wing_dir;
        }
        self.angle = (self.vel_y * TILT_PER_VELOCITY).clamp(-MAX_TILT, MAX_TILT);
    }
}

/// One member of an obstacle pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Both members of a pair share this id
    pub pair_id: u32,
    /// Center of the box
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub is_top: bool,
    /// Scoring already counted (only ever set on the top member)
    pub passed: bool,
}

impl Obstacle {
    pub fn left(&self) -> f32 {
        self.pos.x - self.width / 2.0
    }

    /// Trailing edge as the obstacle scrolls left
    pub fn right(&self) -> f32 {
        self.pos.x + self.width / 2.0
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y - self.height / 2.0
    }

    pub fn top(&self) -> f32 {
        self.pos.y + self.height / 2.0
    }

    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Final result handed to persistence when a round ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub score: u32,
    pub level: u32,
}
