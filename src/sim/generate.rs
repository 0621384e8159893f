//! Procedural chunk generation
//!
//! The world is built left to right in fixed-width chunks. Each chunk walks
//! forward in gap/platform steps, rolling pickups, enemies and hazards per
//! platform. All randomness comes from one seeded [`Pcg32`], so a seed and a
//! call sequence always reproduce the same world.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::Rect;
use super::state::{
    Collectible, Goal, Hazard, HazardPlacement, PatrolEnemy, Platform, World,
};
use crate::tuning::Tuning;

/// Output of one generation call, appended to the world by the caller
#[derive(Debug, Clone, Default)]
pub struct Chunk {
    pub platforms: Vec<Platform>,
    pub collectibles: Vec<Collectible>,
    pub enemies: Vec<PatrolEnemy>,
    pub hazards: Vec<Hazard>,
    /// Walked x after the last platform; at least `start + chunk_width`
    pub frontier_x: f32,
    /// Top of the last platform placed
    pub last_platform_y: f32,
}

/// Seeded world generator
#[derive(Debug, Clone)]
pub struct ChunkGenerator {
    rng: Pcg32,
    chunks_generated: u32,
}

impl ChunkGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            chunks_generated: 0,
        }
    }

    pub fn chunks_generated(&self) -> u32 {
        self.chunks_generated
    }

    /// Generate one chunk starting at `frontier_x`.
    ///
    /// `last_y` is the top of the previous platform, `score` feeds the
    /// difficulty terms. At `frontier_x == 0` a start platform is placed under
    /// the spawn point before the walk begins.
    pub fn generate_chunk(
        &mut self,
        frontier_x: f32,
        last_y: f32,
        score: u64,
        tuning: &Tuning,
    ) -> Chunk {
        let mut chunk = Chunk::default();
        let end_x = frontier_x + tuning.chunk_width;
        let mut x = frontier_x;
        let mut prev_y = last_y;

        if frontier_x <= 0.0 {
            let start = Rect::new(
                tuning.start_platform_x,
                tuning.start_platform_y(),
                tuning.start_platform_width,
                tuning.platform_height,
            );
            x = start.right();
            prev_y = start.top();
            chunk.platforms.push(Platform {
                rect: start,
                color: None,
            });
        }

        let step = tuning.effective_step();
        let enemy_chance = tuning.enemy_chance.at(score);
        let hazard_chance = tuning.hazard_chance.at(score);

        while x < end_x {
            let gap = self.rng.random_range(tuning.gap.min..=tuning.gap.max) as f32;
            x += gap;

            let dy = self.rng.random_range(-step..=step) as f32;
            let y = (prev_y + dy).clamp(tuning.band_top, tuning.band_bottom());
            let width = self
                .rng
                .random_range(tuning.platform_width.min..=tuning.platform_width.max)
                as f32;
            let rect = Rect::new(x, y, width, tuning.platform_height);

            if self.rng.random::<f32>() < tuning.collectible_chance {
                chunk.collectibles.push(self.collectible_above(&rect, tuning));
            }

            if self.rng.random::<f32>() < enemy_chance {
                if let Some(enemy) = self.enemy_on(&rect, score, tuning) {
                    chunk.enemies.push(enemy);
                }
            }

            if self.rng.random::<f32>() < hazard_chance {
                if let Some(hazard) = self.hazard_near(&rect, gap, prev_y, tuning) {
                    chunk.hazards.push(hazard);
                }
            }

            chunk.platforms.push(Platform { rect, color: None });
            prev_y = y;
            x += width;
        }

        chunk.frontier_x = x;
        chunk.last_platform_y = prev_y;
        self.chunks_generated += 1;

        log::debug!(
            "Chunk {} [{:.0}, {:.0}): {} platforms, {} pickups, {} enemies, {} hazards (enemy p={:.2}, hazard p={:.2})",
            self.chunks_generated,
            frontier_x,
            chunk.frontier_x,
            chunk.platforms.len(),
            chunk.collectibles.len(),
            chunk.enemies.len(),
            chunk.hazards.len(),
            enemy_chance,
            hazard_chance,
        );

        chunk
    }

    fn collectible_above(&self, platform: &Rect, tuning: &Tuning) -> Collectible {
        let size = tuning.collectible_size;
        Collectible {
            rect: Rect::new(
                platform.center().x - size / 2.0,
                platform.top() - tuning.collectible_lift,
                size,
                size,
            ),
            collected: false,
            color: None,
        }
    }

    /// Patrol enemy centred on the platform, or `None` if the platform
    /// cannot hold a positive patrol range inside its edge margins.
    fn enemy_on(&mut self, platform: &Rect, score: u64, tuning: &Tuning) -> Option<PatrolEnemy> {
        let free = platform.width() - tuning.enemy_width;
        let max_range = free / 2.0 - tuning.enemy_margin;
        if max_range <= 0.0 {
            return None;
        }

        let anchor_x = platform.left() + free / 2.0;
        let patrol_range = tuning.patrol_range.at(score).min(max_range);
        let direction = if self.rng.random_bool(0.5) { 1.0 } else { -1.0 };

        Some(PatrolEnemy {
            rect: Rect::new(
                anchor_x,
                platform.top() - tuning.enemy_height,
                tuning.enemy_width,
                tuning.enemy_height,
            ),
            vx: tuning.enemy_speed * direction * tuning.enemy_speed_scale.at(score),
            anchor_x,
            patrol_range,
            color: None,
        })
    }

    /// Pit hazard in the preceding gap when both neighbours sit low, else
    /// (sometimes) a spike on a wide enough platform
    fn hazard_near(
        &mut self,
        platform: &Rect,
        gap: f32,
        prev_y: f32,
        tuning: &Tuning,
    ) -> Option<Hazard> {
        let size = tuning.hazard_size;
        let low_line = tuning.viewport_height - tuning.pit_depth;

        if gap > size + 30.0 && prev_y > low_line && platform.top() > low_line {
            let gap_left = platform.left() - gap;
            return Some(Hazard {
                rect: Rect::new(
                    gap_left + gap / 2.0 - size / 2.0,
                    tuning.viewport_height - size - tuning.pit_floor_offset,
                    size,
                    size,
                ),
                placement: HazardPlacement::Pit,
                color: None,
            });
        }

        let edge = 15.0;
        if platform.width() > size + 40.0
            && self.rng.random::<f32>() < tuning.hazard_on_platform_chance
        {
            let offset = self
                .rng
                .random_range(edge..=platform.width() - size - edge);
            return Some(Hazard {
                rect: Rect::new(platform.left() + offset, platform.top() - size, size, size),
                placement: HazardPlacement::Platform,
                color: None,
            });
        }

        None
    }

    /// Goal flag standing on the last platform, clamped inside the platform
    /// horizontally and inside the viewport vertically
    pub fn place_goal(&mut self, world: &World, tuning: &Tuning) -> Option<Goal> {
        let last = world.platforms.last()?;
        let w = tuning.goal_width.min(last.rect.width());
        let x = (last.rect.right() - w - tuning.enemy_margin)
            .clamp(last.rect.left(), last.rect.right() - w);
        let y = (last.rect.top() - tuning.goal_height)
            .clamp(0.0, tuning.viewport_height - tuning.goal_height);
        Some(Goal {
            rect: Rect::new(x, y, w, tuning.goal_height),
            color: None,
        })
    }
}
