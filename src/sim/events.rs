//! Events raised by a tick
//!
//! The round dispatches these to its own camera and particle systems, then
//! hands them to the caller for audio and screen transitions.

use serde::{Deserialize, Serialize};

/// What the bird hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Collision {
    Ground,
    Obstacle { pair_id: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    /// First primary action; the round is now playing
    Started,
    Jumped,
    /// A pair was passed. `score` is the new round score, `x` where it happened.
    Scored { score: u32, x: f32 },
    /// Fatal collision; raised once per round
    Collided(Collision),
    LevelComplete {
        level: u32,
        next_level: u32,
        score: u32,
    },
    /// Player asked to abandon the round
    ReturnToMenu,
}
