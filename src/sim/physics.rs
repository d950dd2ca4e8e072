//! Bird kinematics and collision detection
//!
//! Vertical-only integration plus axis-aligned box overlap. The ground check
//! runs before the obstacle check, so touching both reports the ground.

use glam::Vec2;

use super::events::Collision;
use super::state::{Bird, Obstacle};

/// Axis-aligned box by center and half extents
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: Vec2,
    pub half: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, half: Vec2) -> Self {
        Self { center, half }
    }

    /// Strict overlap: boxes sharing only an edge do not touch
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let delta = (self.center - other.center).abs();
        let reach = self.half + other.half;
        delta.x < reach.x && delta.y < reach.y
    }
}

impl From<&Bird> for Aabb {
    fn from(bird: &Bird) -> Self {
        Aabb::new(bird.pos, Vec2::splat(bird.half_size()))
    }
}

impl From<&Obstacle> for Aabb {
    fn from(obstacle: &Obstacle) -> Self {
        Aabb::new(obstacle.pos, obstacle.half_extents())
    }
}

/// Advance the bird by one tick and report a fatal collision, if any.
///
/// `gravity` is signed and added to the velocity as-is. Hitting the ceiling
/// clamps the bird but is not fatal.
pub fn tick(
    bird: &mut Bird,
    obstacles: &[Obstacle],
    ground_height: f32,
    ceiling_height: f32,
    gravity: f32,
) -> Option<Collision> {
    bird.vel_y += gravity;
    bird.pos.y += bird.vel_y;
    bird.animate();

    let half = bird.half_size();

    if bird.pos.y - half <= ground_height {
        bird.pos.y = ground_height + half;
        bird.vel_y = 0.0;
        return Some(Collision::Ground);
    }

    if bird.pos.y + half >= ceiling_height {
        bird.pos.y = ceiling_height - half;
        bird.vel_y = 0.0;
    }

    let bird_box = Aabb::from(&*bird);
    obstacles
        .iter()
        .find(|o| bird_box.overlaps(&Aabb::from(*o)))
        .map(|o| Collision::Obstacle { pair_id: o.pair_id })
}

/// Horizontal distance from the bird to the nearest obstacle it has not passed
pub fn distance_to_next_obstacle(bird: &Bird, obstacles: &[Obstacle]) -> Option<f32> {
    obstacles
        .iter()
        .find(|o| o.right() > bird.pos.x && !o.passed)
        .map(|o| o.pos.x - bird.pos.x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const GROUND: f32 = 100.0;
    const CEILING: f32 = 768.0;
    const GRAVITY: f32 = -0.8;

    fn bird_at(y: f32) -> Bird {
        Bird::new(Vec2::new(256.0, y), 30.0)
    }

    fn obstacle(pair_id: u32, x: f32, y: f32, height: f32) -> Obstacle {
        Obstacle {
            pair_id,
            pos: Vec2::new(x, y),
            width: 80.0,
            height,
            is_top: true,
            passed: false,
        }
    }

    #[test]
    fn test_free_fall_step() {
        let mut bird = bird_at(400.0);
        bird.vel_y = 3.0;
        let result = tick(&mut bird, &[], GROUND, CEILING, GRAVITY);
        assert_eq!(result, None);
        assert_eq!(bird.vel_y, 3.0 + GRAVITY);
        assert_eq!(bird.pos.y, 400.0 + (3.0 + GRAVITY));
    }

    #[test]
    fn test_ground_collision_clamps() {
        let mut bird = bird_at(116.0);
        bird.vel_y = -5.0;
        let result = tick(&mut bird, &[], GROUND, CEILING, GRAVITY);
        assert_eq!(result, Some(Collision::Ground));
        assert_eq!(bird.pos.y, GROUND + 15.0);
        assert_eq!(bird.vel_y, 0.0);
    }

    #[test]
    fn test_ceiling_clamps_without_collision() {
        let mut bird = bird_at(750.0);
        bird.vel_y = 12.0;
        let result = tick(&mut bird, &[], GROUND, CEILING, GRAVITY);
        assert_eq!(result, None);
        assert_eq!(bird.pos.y, CEILING - 15.0);
        assert_eq!(bird.vel_y, 0.0);
    }

    #[test]
    fn test_obstacle_collision_reports_pair() {
        let mut bird = bird_at(400.0);
        let obstacles = [
            obstacle(1, 700.0, 400.0, 200.0),
            obstacle(2, 270.0, 400.0, 200.0),
        ];
        let result = tick(&mut bird, &obstacles, GROUND, CEILING, GRAVITY);
        assert_eq!(result, Some(Collision::Obstacle { pair_id: 2 }));
    }

    #[test]
    fn test_ground_wins_over_obstacle() {
        let mut bird = bird_at(116.0);
        bird.vel_y = -5.0;
        let obstacles = [obstacle(1, 256.0, 150.0, 100.0)];
        let result = tick(&mut bird, &obstacles, GROUND, CEILING, GRAVITY);
        assert_eq!(result, Some(Collision::Ground));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Aabb::new(Vec2::new(0.0, 0.0), Vec2::splat(15.0));
        let b = Aabb::new(Vec2::new(55.0, 0.0), Vec2::new(40.0, 50.0));
        assert!(!a.overlaps(&b));
        let c = Aabb::new(Vec2::new(54.9, 0.0), Vec2::new(40.0, 50.0));
        assert!(a.overlaps(&c));
    }

    #[test]
    fn test_distance_to_next_obstacle_skips_passed() {
        let bird = bird_at(400.0);
        let mut first = obstacle(1, 100.0, 600.0, 100.0);
        let second = obstacle(2, 600.0, 600.0, 100.0);
        assert_eq!(
            distance_to_next_obstacle(&bird, &[first.clone(), second.clone()]),
            Some(344.0)
        );
        first.pos.x = 240.0;
        assert_eq!(
            distance_to_next_obstacle(&bird, &[first.clone(), second.clone()]),
            Some(-16.0)
        );
        first.passed = true;
        assert_eq!(distance_to_next_obstacle(&bird, &[first, second]), Some(344.0));
    }

    proptest! {
        #[test]
        fn prop_airborne_step_is_exact(y in 200.0f32..600.0, vel in -10.0f32..10.0) {
            let mut bird = bird_at(y);
            bird.vel_y = vel;
            let result = tick(&mut bird, &[], GROUND, CEILING, GRAVITY);
            prop_assert_eq!(result, None);
            let expected_vel = vel + GRAVITY;
            prop_assert_eq!(bird.vel_y, expected_vel);
            prop_assert_eq!(bird.pos.y, y + expected_vel);
        }

        #[test]
        fn prop_ground_clamp(y in 100.0f32..120.0, vel in -40.0f32..-20.0) {
            let mut bird = bird_at(y);
            bird.vel_y = vel;
            let result = tick(&mut bird, &[], GROUND, CEILING, GRAVITY);
            prop_assert_eq!(result, Some(Collision::Ground));
            prop_assert_eq!(bird.pos.y, GROUND + 15.0);
            prop_assert_eq!(bird.vel_y, 0.0);
        }

        #[test]
        fn prop_bird_stays_in_bounds(y in 120.0f32..740.0, vel in -30.0f32..30.0) {
            let mut bird = bird_at(y);
            bird.vel_y = vel;
            tick(&mut bird, &[], GROUND, CEILING, GRAVITY);
            prop_assert!(bird.pos.y - 15.0 >= GROUND);
            prop_assert!(bird.pos.y + 15.0 <= CEILING);
        }
    }
}
