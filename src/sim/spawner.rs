//! Obstacle pair generation, scrolling, recycling and pass-through scoring
//!
//! The live collection is ordered by increasing x: pairs are only ever
//! appended at the right, and every obstacle scrolls by the same amount.

use glam::Vec2;
use rand::Rng;

use super::level::{LevelConfig, WorldConfig};
use super::state::{Bird, Obstacle};

/// A pair whose top member was just passed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassedPair {
    pub pair_id: u32,
    pub x: f32,
}

#[derive(Debug, Clone)]
pub struct ObstacleSpawner {
    obstacles: Vec<Obstacle>,
    /// Ticks since the last spawn
    spawn_timer: u32,
    next_pair_id: u32,
    tuning: LevelConfig,
    screen_width: f32,
    screen_height: f32,
    ground_height: f32,
    pipe_width: f32,
    gap_margin: f32,
}

impl ObstacleSpawner {
    pub fn new(world: &WorldConfig, tuning: LevelConfig) -> Self {
        Self {
            obstacles: Vec::new(),
            spawn_timer: 0,
            next_pair_id: 1,
            tuning,
            screen_width: world.screen_width,
            screen_height: world.screen_height,
            ground_height: world.ground_height,
            pipe_width: world.pipe_width,
            gap_margin: world.gap_margin,
        }
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Allowed range for the gap center (y-up)
    pub fn gap_center_range(&self) -> (f32, f32) {
        let half_gap = self.tuning.gap / 2.0;
        (
            self.ground_height + half_gap + self.gap_margin,
            self.screen_height - half_gap - self.gap_margin,
        )
    }

    /// Place the opening pairs just off the right edge, `spacing` apart
    pub fn spawn_initial<R: Rng>(&mut self, count: u32, rng: &mut R) {
        for i in 0..count {
            let x = self.screen_width + i as f32 * self.tuning.spacing;
            self.spawn_pair(x, rng);
        }
    }

    /// Append a pair at `x` with a random gap center; returns the center
    pub fn spawn_pair<R: Rng>(&mut self, x: f32, rng: &mut R) -> f32 {
        let (low, high) = self.gap_center_range();
        let gap_center = rng.random_range(low..=high);
        let half_gap = self.tuning.gap / 2.0;

        let gap_top = gap_center + half_gap;
        let gap_bottom = gap_center - half_gap;
        let top_height = self.screen_height - gap_top;
        let bottom_height = gap_bottom - self.ground_height;

        let pair_id = self.next_pair_id;
        self.next_pair_id += 1;

        self.obstacles.push(Obstacle {
            pair_id,
            pos: Vec2::new(x, gap_top + top_height / 2.0),
            width: self.pipe_width,
            height: top_height,
            is_top: true,
            passed: false,
        });
        self.obstacles.push(Obstacle {
            pair_id,
            pos: Vec2::new(x, self.ground_height + bottom_height / 2.0),
            width: self.pipe_width,
            height: bottom_height,
            is_top: false,
            passed: false,
        });

        log::debug!("Spawned pair {} at x={} gap center={}", pair_id, x, gap_center);
        gap_center
    }

    /// Scroll every obstacle left by `dx`
    pub fn advance(&mut self, dx: f32) {
        for obstacle in &mut self.obstacles {
            obstacle.pos.x -= dx;
        }
    }

    /// Spawn a new pair once `spacing / speed` ticks have elapsed.
    ///
    /// The pair is placed `spacing` to the right of the current rightmost
    /// pair, wherever it has scrolled to.
    pub fn maybe_spawn<R: Rng>(&mut self, rng: &mut R) -> bool {
        self.spawn_timer += 1;
        if (self.spawn_timer as f32) <= self.tuning.spacing / self.tuning.speed {
            return false;
        }
        self.spawn_timer = 0;
        let anchor = self
            .obstacles
            .last()
            .map(|o| o.pos.x)
            .unwrap_or(self.screen_width);
        self.spawn_pair(anchor + self.tuning.spacing, rng);
        true
    }

    /// Drop obstacles whose trailing edge has left the screen
    pub fn recycle(&mut self) -> usize {
        let before = self.obstacles.len();
        self.obstacles.retain(|o| o.right() >= 0.0);
        let removed = before - self.obstacles.len();
        if removed > 0 {
            log::debug!("Recycled {} obstacles", removed);
        }
        removed
    }

    /// Mark top obstacles whose trailing edge cleared the bird's rear edge
    pub fn check_scoring(&mut self, bird: &Bird) -> Vec<PassedPair> {
        let rear = bird.pos.x - bird.half_size();
        self.obstacles
            .iter_mut()
            .filter(|o| o.is_top && !o.passed && o.right() < rear)
            .map(|o| {
                o.passed = true;
                PassedPair {
                    pair_id: o.pair_id,
                    x: o.pos.x,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn level_one() -> (WorldConfig, LevelConfig) {
        (WorldConfig::default(), LevelConfig::new(220.0, 5.0, 320.0))
    }

    #[test]
    fn test_initial_pairs_are_ordered_and_spaced() {
        let (world, tuning) = level_one();
        let mut spawner = ObstacleSpawner::new(&world, tuning);
        let mut rng = Pcg32::seed_from_u64(1);
        spawner.spawn_initial(3, &mut rng);

        let xs: Vec<f32> = spawner.obstacles().iter().map(|o| o.pos.x).collect();
        assert_eq!(xs, vec![1024.0, 1024.0, 1344.0, 1344.0, 1664.0, 1664.0]);
        for pair in spawner.obstacles().chunks(2) {
            assert!(pair[0].is_top && !pair[1].is_top);
            assert_eq!(pair[0].pair_id, pair[1].pair_id);
        }
    }

    #[test]
    fn test_pair_geometry_leaves_gap() {
        let (world, tuning) = level_one();
        let mut spawner = ObstacleSpawner::new(&world, tuning);
        let mut rng = Pcg32::seed_from_u64(7);
        let center = spawner.spawn_pair(600.0, &mut rng);

        let top = &spawner.obstacles()[0];
        let bottom = &spawner.obstacles()[1];
        assert!((top.top() - world.screen_height).abs() < 1e-3);
        assert!((bottom.bottom() - world.ground_height).abs() < 1e-3);
        assert!((top.bottom() - bottom.top() - tuning.gap).abs() < 1e-3);
        assert!((top.bottom() - (center + tuning.gap / 2.0)).abs() < 1e-3);
    }

    #[test]
    fn test_spawn_timer_and_spacing() {
        let (world, tuning) = level_one();
        let mut spawner = ObstacleSpawner::new(&world, tuning);
        let mut rng = Pcg32::seed_from_u64(3);
        spawner.spawn_initial(3, &mut rng);

        let mut spawned_at = None;
        for tick in 1..=100 {
            spawner.advance(tuning.speed);
            if spawner.maybe_spawn(&mut rng) {
                spawned_at = Some(tick);
                break;
            }
        }
        // 320 / 5 = 64 ticks must be exceeded
        assert_eq!(spawned_at, Some(65));

        let obstacles = spawner.obstacles();
        let n = obstacles.len();
        let newest = obstacles[n - 1].pos.x;
        let previous = obstacles[n - 3].pos.x;
        assert_eq!(newest - previous, tuning.spacing);
    }

    #[test]
    fn test_recycle_drops_offscreen_pairs() {
        let (world, tuning) = level_one();
        let mut spawner = ObstacleSpawner::new(&world, tuning);
        let mut rng = Pcg32::seed_from_u64(5);
        spawner.spawn_pair(-41.0, &mut rng);
        spawner.spawn_pair(-39.0, &mut rng);
        spawner.spawn_pair(200.0, &mut rng);

        assert_eq!(spawner.recycle(), 2);
        assert_eq!(spawner.obstacles().len(), 4);
        assert!(spawner.obstacles().iter().all(|o| o.right() >= 0.0));
    }

    #[test]
    fn test_scoring_counts_top_member_once() {
        let (world, tuning) = level_one();
        let mut spawner = ObstacleSpawner::new(&world, tuning);
        let mut rng = Pcg32::seed_from_u64(9);
        spawner.spawn_pair(300.0, &mut rng);
        let bird = Bird::spawn(&world);

        // Right edge 340 is still ahead of the bird's rear edge at 241
        assert!(spawner.check_scoring(&bird).is_empty());

        spawner.advance(100.0);
        let passed = spawner.check_scoring(&bird);
        assert_eq!(passed, vec![PassedPair { pair_id: 1, x: 200.0 }]);
        assert!(spawner.obstacles()[0].passed);
        assert!(!spawner.obstacles()[1].passed);

        spawner.advance(50.0);
        assert!(spawner.check_scoring(&bird).is_empty());
    }

    proptest! {
        #[test]
        fn prop_gap_stays_within_margins(seed in any::<u64>(), level in 0usize..5) {
            let world = WorldConfig::default();
            let tuning = crate::sim::level::LevelTable::default().get(level as u32 + 1);
            let mut spawner = ObstacleSpawner::new(&world, tuning);
            let mut rng = Pcg32::seed_from_u64(seed);
            let center = spawner.spawn_pair(500.0, &mut rng);

            let low = world.ground_height + world.gap_margin;
            let high = world.screen_height - world.gap_margin;
            prop_assert!(center - tuning.gap / 2.0 >= low - 1e-3);
            prop_assert!(center + tuning.gap / 2.0 <= high + 1e-3);
            for obstacle in spawner.obstacles() {
                prop_assert!(obstacle.height >= world.gap_margin - 1e-3);
            }
        }
    }
}
