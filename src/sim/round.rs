//! Round state machine and fixed-step tick
//!
//! Order within a playing tick: input, physics, obstacles (scroll, score,
//! recycle, spawn), scenery, camera, particles, level check. Feedback for a
//! collision is dispatched in the same tick it happens.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::camera::Camera;
use super::events::{Collision, SimEvent};
use super::level::{ConfigError, EffectsConfig, LevelTable, RoundConfig, WorldConfig};
use super::particles::{FLAP_COLOR, ParticleSystem, SCORE_COLOR};
use super::physics;
use super::scenery::Scenery;
use super::spawner::ObstacleSpawner;
use super::state::{Bird, Obstacle, RoundOutcome, RoundPhase};
use crate::consts::SIM_DT;

/// Flap particles spawned on each jump
const FLAP_PARTICLES: usize = 3;
/// Flap particles appear this far below the bird center
const FLAP_OFFSET: f32 = 15.0;
const SCORE_PARTICLES: usize = 5;

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoundInput {
    /// Jump, or start the round
    pub primary: bool,
    /// Abandon the round
    pub cancel: bool,
}

impl RoundInput {
    pub fn primary() -> Self {
        Self {
            primary: true,
            ..Default::default()
        }
    }

    pub fn cancel() -> Self {
        Self {
            cancel: true,
            ..Default::default()
        }
    }
}

/// One round of play at a single level
#[derive(Debug, Clone)]
pub struct Round {
    config: RoundConfig,
    seed: u64,
    rng: Pcg32,
    phase: RoundPhase,
    score: u32,
    pipes_passed: u32,
    distance: f32,
    time_ticks: u64,
    bird: Bird,
    spawner: ObstacleSpawner,
    camera: Camera,
    particles: ParticleSystem,
    scenery: Scenery,
}

impl Round {
    /// Set up a round from an already validated configuration
    pub fn new(config: RoundConfig, initial_score: u32, seed: u64) -> Self {
        let world = &config.world;
        let mut rng = Pcg32::seed_from_u64(seed);

        let mut spawner = ObstacleSpawner::new(world, config.tuning);
        spawner.spawn_initial(world.initial_pairs, &mut rng);
        let scenery = Scenery::new(world, &mut rng);

        log::info!(
            "Round setup: level {} gap={} speed={} spacing={} seed={}",
            config.level,
            config.tuning.gap,
            config.tuning.speed,
            config.tuning.spacing,
            seed
        );

        Self {
            seed,
            rng,
            phase: RoundPhase::NotStarted,
            score: initial_score,
            pipes_passed: 0,
            distance: 0.0,
            time_ticks: 0,
            bird: Bird::spawn(world),
            spawner,
            camera: Camera::new(world),
            particles: ParticleSystem::new(config.effects.max_particles),
            scenery,
            config,
        }
    }

    /// Resolve the level from `table` and set up the round; configuration
    /// problems surface here, before the round can be played.
    pub fn start(
        world: WorldConfig,
        table: &LevelTable,
        level: u32,
        effects: EffectsConfig,
        initial_score: u32,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        let config = RoundConfig::new(world, table, level, effects)?;
        Ok(Self::new(config, initial_score, seed))
    }

    /// Advance one fixed tick
    pub fn tick(&mut self, input: &RoundInput) -> Vec<SimEvent> {
        let mut events = Vec::new();

        if input.cancel {
            log::info!("Round abandoned at level {} with score {}", self.level(), self.score);
            events.push(SimEvent::ReturnToMenu);
            return events;
        }

        match self.phase {
            RoundPhase::NotStarted => {
                if input.primary {
                    self.phase = RoundPhase::Playing;
                    log::info!("Round started at level {}", self.level());
                    events.push(SimEvent::Started);
                }
            }
            RoundPhase::Playing => {
                if input.primary {
                    self.jump(&mut events);
                }
                self.step(&mut events);
            }
            // Let the explosion play out; nothing else moves
            RoundPhase::Collided => self.particles.tick(),
            RoundPhase::LevelComplete => {}
        }

        events
    }

    fn jump(&mut self, events: &mut Vec<SimEvent>) {
        self.bird.jump(self.config.world.jump_velocity);
        self.particles.emit(
            self.bird.pos.x,
            self.bird.pos.y - FLAP_OFFSET,
            FLAP_PARTICLES,
            FLAP_COLOR,
            &mut self.rng,
        );
        events.push(SimEvent::Jumped);
    }

    fn step(&mut self, events: &mut Vec<SimEvent>) {
        let world = self.config.world;
        let speed = self.config.tuning.speed;
        self.time_ticks += 1;

        if let Some(collision) = physics::tick(
            &mut self.bird,
            self.spawner.obstacles(),
            world.ground_height,
            world.screen_height,
            world.gravity,
        ) {
            self.on_collision(collision, events);
        }

        self.spawner.advance(speed);
        for passed in self.spawner.check_scoring(&self.bird) {
            self.score += 1;
            self.pipes_passed += 1;
            self.particles.emit(
                passed.x,
                world.screen_height / 2.0,
                SCORE_PARTICLES,
                SCORE_COLOR,
                &mut self.rng,
            );
            events.push(SimEvent::Scored {
                score: self.score,
                x: passed.x,
            });
        }
        self.spawner.recycle();
        self.spawner.maybe_spawn(&mut self.rng);

        self.scenery.update(speed, &mut self.rng);
        self.distance += speed * SIM_DT;
        self.camera.update(self.bird.pos, &mut self.rng);
        self.particles.tick();

        if self.phase == RoundPhase::Playing && self.pipes_passed >= world.pass_threshold {
            self.phase = RoundPhase::LevelComplete;
            log::info!("Level {} complete with score {}", self.level(), self.score);
            events.push(SimEvent::LevelComplete {
                level: self.level(),
                next_level: self.level() + 1,
                score: self.score,
            });
        }
    }

    /// First fatal collision ends play; later ones are ignored
    fn on_collision(&mut self, collision: Collision, events: &mut Vec<SimEvent>) {
        if self.phase != RoundPhase::Playing {
            return;
        }
        self.phase = RoundPhase::Collided;
        self.bird.alive = false;
        log::info!(
            "Collision {:?} at tick {} (score {})",
            collision,
            self.time_ticks,
            self.score
        );

        self.particles
            .explode(self.bird.pos.x, self.bird.pos.y, &mut self.rng);
        if self.config.effects.screen_shake {
            self.camera.shake(
                self.config.world.crash_shake_intensity,
                self.config.world.crash_shake_ticks,
            );
        }
        events.push(SimEvent::Collided(collision));
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn level(&self) -> u32 {
        self.config.level
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn pipes_passed(&self) -> u32 {
        self.pipes_passed
    }

    /// Fraction of the level completed, 0..=1
    pub fn progress(&self) -> f32 {
        (self.pipes_passed as f32 / self.config.world.pass_threshold as f32).min(1.0)
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    pub fn bird(&self) -> &Bird {
        &self.bird
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        self.spawner.obstacles()
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    pub fn scenery(&self) -> &Scenery {
        &self.scenery
    }

    /// Horizontal distance to the nearest obstacle not yet passed
    pub fn distance_to_next_obstacle(&self) -> Option<f32> {
        physics::distance_to_next_obstacle(&self.bird, self.spawner.obstacles())
    }

    pub fn outcome(&self) -> RoundOutcome {
        RoundOutcome {
            score: self.score,
            level: self.level(),
        }
    }
}
