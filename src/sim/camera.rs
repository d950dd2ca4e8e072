//! Smoothed follow camera with transient shake

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::level::WorldConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub offset: Vec2,
    /// Target's resting place on screen
    lead: Vec2,
    smoothing: f32,
    pub shake_intensity: f32,
    /// Ticks of shake remaining
    pub shake_duration: u32,
}

impl Camera {
    pub fn new(world: &WorldConfig) -> Self {
        Self {
            offset: Vec2::ZERO,
            lead: Vec2::new(
                world.screen_width * world.camera_lead.0,
                world.screen_height * world.camera_lead.1,
            ),
            smoothing: world.camera_smoothing,
            shake_intensity: 0.0,
            shake_duration: 0,
        }
    }

    /// Ease toward the target, then add jitter while a shake is running.
    ///
    /// Jitter accumulates into the offset; nothing restores the pre-shake
    /// position, the follow term pulls it back over the next ticks.
    pub fn update<R: Rng>(&mut self, target: Vec2, rng: &mut R) {
        self.offset += (target - self.offset - self.lead) * self.smoothing;

        if self.shake_duration > 0 {
            self.shake_duration -= 1;
            let i = self.shake_intensity;
            self.offset += Vec2::new(rng.random_range(-i..=i), rng.random_range(-i..=i));
        }
    }

    pub fn shake(&mut self, intensity: f32, duration_ticks: u32) {
        self.shake_intensity = intensity.abs();
        self.shake_duration = duration_ticks;
    }

    pub fn is_shaking(&self) -> bool {
        self.shake_duration > 0
    }

    /// World position to screen position
    pub fn apply(&self, pos: Vec2) -> Vec2 {
        pos - self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_follow_converges_to_lead() {
        let world = WorldConfig::default();
        let mut camera = Camera::new(&world);
        let mut rng = Pcg32::seed_from_u64(0);
        let target = Vec2::new(256.0, 384.0);

        camera.update(target, &mut rng);
        // (256 - 0 - 307.2) * 0.1, (384 - 0 - 384) * 0.1
        assert!((camera.offset.x - (-5.12)).abs() < 1e-4);
        assert_eq!(camera.offset.y, 0.0);

        for _ in 0..500 {
            camera.update(target, &mut rng);
        }
        assert!((camera.offset.x - (256.0 - 307.2)).abs() < 1e-2);
    }

    #[test]
    fn test_shake_is_bounded_and_expires() {
        let world = WorldConfig::default();
        let mut camera = Camera::new(&world);
        let mut rng = Pcg32::seed_from_u64(42);
        let target = Vec2::new(307.2, 384.0);

        camera.shake(10.0, 3);
        for _ in 0..3 {
            let before = camera.offset;
            let followed = before + (target - before - camera.lead) * 0.1;
            camera.update(target, &mut rng);
            let jitter = camera.offset - followed;
            assert!(jitter.x.abs() <= 10.0 + 1e-3 && jitter.y.abs() <= 10.0 + 1e-3);
        }
        assert!(!camera.is_shaking());

        // Follow term alone from here on: no jump back to the pre-shake offset
        let drifted = camera.offset;
        camera.update(target, &mut rng);
        let expected = drifted + (target - drifted - camera.lead) * 0.1;
        assert!((camera.offset - expected).length() < 1e-4);
    }

    #[test]
    fn test_apply() {
        let mut camera = Camera::new(&WorldConfig::default());
        camera.offset = Vec2::new(10.0, -5.0);
        assert_eq!(camera.apply(Vec2::new(100.0, 100.0)), Vec2::new(90.0, 105.0));
    }
}
