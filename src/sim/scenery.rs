//! Scrolling backdrop: ground, clouds and parallax layers
//!
//! Purely visual, but it shares the round's RNG so a seed reproduces it.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::level::WorldConfig;
use crate::Rgb;

const CLOUD_COUNT: usize = 5;
/// Clouds wrap back to the right once they pass this x
const CLOUD_WRAP_X: f32 = -100.0;
/// Parallax layers scroll at this fraction of the obstacle speed
const BACKGROUND_SPEED_FACTOR: f32 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cloud {
    pub x: f32,
    pub y: f32,
    pub speed: f32,
    pub size: f32,
}

impl Cloud {
    fn new<R: Rng>(world: &WorldConfig, rng: &mut R) -> Self {
        Self {
            x: rng.random_range(world.screen_width..=world.screen_width + 300.0),
            y: Self::random_altitude(world, rng),
            speed: rng.random_range(0.5..1.5),
            size: rng.random_range(30..=60) as f32,
        }
    }

    fn random_altitude<R: Rng>(world: &WorldConfig, rng: &mut R) -> f32 {
        rng.random_range(world.screen_height - 100.0..=world.screen_height - 50.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParallaxLayer {
    pub color: Rgb,
    pub speed: f32,
    pub height: f32,
    pub scroll: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenery {
    /// Ground texture offset
    pub ground_scroll: f32,
    pub clouds: Vec<Cloud>,
    pub layers: Vec<ParallaxLayer>,
    screen_width: f32,
    screen_height: f32,
}

impl Scenery {
    pub fn new<R: Rng>(world: &WorldConfig, rng: &mut R) -> Self {
        let h = world.screen_height;
        let layers = [
            ([135, 206, 235], 0.1, h / 4.0),
            ([176, 224, 230], 0.2, h / 3.0),
            ([70, 130, 180], 0.3, h / 2.0),
        ]
        .into_iter()
        .map(|(color, speed, height)| ParallaxLayer {
            color,
            speed,
            height,
            scroll: 0.0,
        })
        .collect();

        Self {
            ground_scroll: 0.0,
            clouds: (0..CLOUD_COUNT).map(|_| Cloud::new(world, rng)).collect(),
            layers,
            screen_width: world.screen_width,
            screen_height: world.screen_height,
        }
    }

    /// Scroll everything for one tick at obstacle speed `speed`
    pub fn update<R: Rng>(&mut self, speed: f32, rng: &mut R) {
        self.ground_scroll += speed;

        for layer in &mut self.layers {
            layer.scroll += speed * BACKGROUND_SPEED_FACTOR * layer.speed;
        }

        for cloud in &mut self.clouds {
            cloud.x -= cloud.speed;
            if cloud.x < CLOUD_WRAP_X {
                cloud.x = self.screen_width + 100.0;
                cloud.y = rng.random_range(self.screen_height - 100.0..=self.screen_height - 50.0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_initial_clouds_in_range() {
        let world = WorldConfig::default();
        let mut rng = Pcg32::seed_from_u64(21);
        let scenery = Scenery::new(&world, &mut rng);
        assert_eq!(scenery.clouds.len(), CLOUD_COUNT);
        for cloud in &scenery.clouds {
            assert!(cloud.x >= 1024.0 && cloud.x <= 1324.0);
            assert!(cloud.y >= 668.0 && cloud.y <= 718.0);
            assert!((30.0..=60.0).contains(&cloud.size));
        }
    }

    #[test]
    fn test_scroll_and_wrap() {
        let world = WorldConfig::default();
        let mut rng = Pcg32::seed_from_u64(22);
        let mut scenery = Scenery::new(&world, &mut rng);
        scenery.clouds[0].x = -99.5;
        scenery.clouds[0].speed = 1.0;

        scenery.update(5.0, &mut rng);
        assert_eq!(scenery.ground_scroll, 5.0);
        assert!((scenery.layers[2].scroll - 0.75).abs() < 1e-6);
        assert_eq!(scenery.clouds[0].x, 1124.0);
    }
}
