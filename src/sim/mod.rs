//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (obstacles by x, particles by spawn order)
//! - No rendering, audio or storage dependencies

pub mod camera;
pub mod events;
pub mod level;
pub mod particles;
pub mod physics;
pub mod round;
pub mod scenery;
pub mod spawner;
pub mod state;

pub use camera::Camera;
pub use events::{Collision, SimEvent};
pub use level::{ConfigError, EffectsConfig, LevelConfig, LevelTable, RoundConfig, WorldConfig};
pub use particles::{Particle, ParticleKind, ParticleSystem};
pub use physics::Aabb;
pub use round::{Round, RoundInput};
pub use scenery::{Cloud, ParallaxLayer, Scenery};
pub use spawner::{ObstacleSpawner, PassedPair};
pub use state::{Bird, Obstacle, RoundOutcome, RoundPhase};
