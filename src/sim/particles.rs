//! Decorative particles
//!
//! Not gameplay-affecting. Every particle shares one lifecycle: integrate,
//! decay, and leave the collection in the same tick its life runs out.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::Rgb;

/// Downward pull applied to every particle each tick
const PARTICLE_GRAVITY: f32 = 0.2;
/// Per-tick size multiplier
const SIZE_DECAY: f32 = 0.98;
/// Per-tick velocity multiplier for feathers
const AIR_DRAG: f32 = 0.98;

pub const SCORE_COLOR: Rgb = [255, 255, 0];
pub const FLAP_COLOR: Rgb = [255, 255, 200];
pub const FEATHER_COLOR: Rgb = [255, 255, 200];
pub const EXPLOSION_COLORS: [Rgb; 4] = [
    [255, 0, 0],
    [255, 165, 0],
    [255, 255, 0],
    [255, 140, 0],
];

const EXPLOSION_SPARKS: usize = 30;
const EXPLOSION_FEATHERS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ParticleKind {
    /// Round spark
    Spark,
    /// Tumbling debris with air drag; `angle`/`spin` in degrees
    Feather { angle: f32, spin: f32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Rgb,
    /// 1.0 when spawned, removed once <= 0
    pub life: f32,
    /// Life lost per tick
    pub decay: f32,
    pub size: f32,
    pub kind: ParticleKind,
}

impl Particle {
    /// A spark with the default velocity/size/decay ranges
    pub fn spark<R: Rng>(pos: Vec2, color: Rgb, rng: &mut R) -> Self {
        Self {
            pos,
            vel: Vec2::new(rng.random_range(-3.0..3.0), rng.random_range(-3.0..3.0)),
            color,
            life: 1.0,
            decay: rng.random_range(0.02..0.05),
            size: rng.random_range(2.0..5.0),
            kind: ParticleKind::Spark,
        }
    }

    /// A hot, fast, short-lived explosion spark
    pub fn ember<R: Rng>(pos: Vec2, rng: &mut R) -> Self {
        let color = EXPLOSION_COLORS[rng.random_range(0..EXPLOSION_COLORS.len())];
        Self {
            vel: Vec2::new(rng.random_range(-10.0..10.0), rng.random_range(-10.0..10.0)),
            size: rng.random_range(4.0..8.0),
            decay: rng.random_range(0.03..0.06),
            ..Self::spark(pos, color, rng)
        }
    }

    /// Rotating debris thrown upward
    pub fn feather<R: Rng>(pos: Vec2, rng: &mut R) -> Self {
        Self {
            vel: Vec2::new(rng.random_range(-2.0..2.0), rng.random_range(2.0..5.0)),
            size: rng.random_range(3.0..8.0),
            kind: ParticleKind::Feather {
                angle: rng.random_range(0.0..360.0),
                spin: rng.random_range(-5.0..5.0),
            },
            ..Self::spark(pos, FEATHER_COLOR, rng)
        }
    }

    /// One tick of motion and decay
    pub fn update(&mut self) {
        self.pos += self.vel;
        self.vel.y -= PARTICLE_GRAVITY;
        self.life -= self.decay;
        self.size *= SIZE_DECAY;

        if let ParticleKind::Feather { angle, spin } = &mut self.kind {
            *angle += *spin;
            self.vel *= AIR_DRAG;
        }
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }

    /// Opacity for drawing, 0-255
    pub fn alpha(&self) -> u8 {
        (self.life.clamp(0.0, 1.0) * 255.0) as u8
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    max_particles: usize,
}

impl ParticleSystem {
    pub fn new(max_particles: usize) -> Self {
        Self {
            particles: Vec::new(),
            max_particles,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Emit `count` sparks of one color at (x, y)
    pub fn emit<R: Rng>(&mut self, x: f32, y: f32, count: usize, color: Rgb, rng: &mut R) {
        let pos = Vec2::new(x, y);
        let new = (0..count).map(|_| Particle::spark(pos, color, rng)).collect();
        self.push_all(new);
    }

    /// Crash burst: mixed-color embers plus tumbling feathers
    pub fn explode<R: Rng>(&mut self, x: f32, y: f32, rng: &mut R) {
        let pos = Vec2::new(x, y);
        let mut new: Vec<Particle> = (0..EXPLOSION_SPARKS)
            .map(|_| Particle::ember(pos, rng))
            .collect();
        new.extend((0..EXPLOSION_FEATHERS).map(|_| Particle::feather(pos, rng)));
        self.push_all(new);
    }

    /// Update every particle and compact out the dead in a single pass
    pub fn tick(&mut self) {
        self.particles.retain_mut(|p| {
            p.update();
            p.is_alive()
        });
    }

    /// Oldest particles make room for new ones once the cap is hit
    fn push_all(&mut self, new: Vec<Particle>) {
        self.particles.extend(new);
        if self.particles.len() > self.max_particles {
            let excess = self.particles.len() - self.max_particles;
            self.particles.drain(..excess);
        }
    }
}
