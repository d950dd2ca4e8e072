//! Read-only snapshot of a round for the renderer
//!
//! Borrowed from the round after a tick completes; the renderer draws it and
//! never writes back.

use glam::Vec2;
use serde::Serialize;

use crate::sim::{Bird, Cloud, Obstacle, ParallaxLayer, Particle, Round, RoundPhase};

/// Paint order, back to front
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DrawLayer {
    Background,
    Clouds,
    Obstacles,
    Bird,
    Ground,
    Particles,
    Ui,
}

pub const DRAW_ORDER: [DrawLayer; 7] = [
    DrawLayer::Background,
    DrawLayer::Clouds,
    DrawLayer::Obstacles,
    DrawLayer::Bird,
    DrawLayer::Ground,
    DrawLayer::Particles,
    DrawLayer::Ui,
];

#[derive(Debug, Clone, Serialize)]
pub struct RenderView<'a> {
    pub phase: RoundPhase,
    pub bird: &'a Bird,
    pub obstacles: &'a [Obstacle],
    pub ground_scroll: f32,
    pub clouds: &'a [Cloud],
    pub layers: &'a [ParallaxLayer],
    pub camera_offset: Vec2,
    pub particles: &'a [Particle],
    pub score: u32,
    pub level: u32,
    /// Level progress bar fill, 0..=1
    pub progress: f32,
    pub distance: f32,
}

impl<'a> RenderView<'a> {
    pub fn of(round: &'a Round) -> Self {
        let scenery = round.scenery();
        Self {
            phase: round.phase(),
            bird: round.bird(),
            obstacles: round.obstacles(),
            ground_scroll: scenery.ground_scroll,
            clouds: &scenery.clouds,
            layers: &scenery.layers,
            camera_offset: round.camera().offset,
            particles: round.particles().particles(),
            score: round.score(),
            level: round.level(),
            progress: round.progress(),
            distance: round.distance(),
        }
    }

    /// Show the "click to start" prompt
    pub fn awaiting_start(&self) -> bool {
        self.phase == RoundPhase::NotStarted
    }

    /// Show the "game over" banner
    pub fn crashed(&self) -> bool {
        self.phase == RoundPhase::Collided
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{EffectsConfig, LevelTable, RoundInput, WorldConfig};

    #[test]
    fn test_view_mirrors_round() {
        let mut round = Round::start(
            WorldConfig::default(),
            &LevelTable::default(),
            3,
            EffectsConfig::default(),
            4,
            10,
        )
        .unwrap();
        assert!(RenderView::of(&round).awaiting_start());

        round.tick(&RoundInput::primary());
        round.tick(&RoundInput::primary());
        let view = RenderView::of(&round);
        assert_eq!(view.level, 3);
        assert_eq!(view.score, 4);
        assert_eq!(view.obstacles.len(), 6);
        assert_eq!(view.clouds.len(), 5);
        assert_eq!(view.particles.len(), 3);
        assert_eq!(view.ground_scroll, 7.0);
        assert!(!view.crashed());

        let json = view.to_json().unwrap();
        assert!(json.contains("\"phase\":\"Playing\""));
    }

    #[test]
    fn test_draw_order() {
        assert_eq!(DRAW_ORDER.first(), Some(&DrawLayer::Background));
        assert_eq!(DRAW_ORDER.last(), Some(&DrawLayer::Ui));
        let bird = DRAW_ORDER.iter().position(|l| *l == DrawLayer::Bird);
        let ground = DRAW_ORDER.iter().position(|l| *l == DrawLayer::Ground);
        assert!(bird < ground);
    }
}
