//! Game state and core simulation types
//!
//! Everything the tick mutates lives in [`GameState`]. The store is replaced
//! wholesale on start/retry, never repaired in place.

use glam::Vec2;

use super::collision::Rect;
use super::generate::{Chunk, ChunkGenerator};
use crate::Color;
use crate::tuning::Tuning;

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndCause {
    /// Dropped below the bottom of the viewport
    Fell,
    /// Touched a patrol enemy
    Enemy,
    /// Touched a hazard
    Hazard,
    /// Reached the goal flag (level mode only)
    Cleared,
}

impl EndCause {
    /// Overlay message for the game-over screen
    pub fn message(&self) -> &'static str {
        match self {
            EndCause::Fell => "You fell!",
            EndCause::Enemy => "Hit by an enemy!",
            EndCause::Hazard => "Stepped on a trap!",
            EndCause::Cleared => "Level complete!",
        }
    }
}

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Title screen, nothing simulated
    Menu,
    /// Active gameplay
    Playing,
    /// Run ended; frozen final frame
    GameOver(EndCause),
}

/// Endless streaming world or one of the fixed-length catalog levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorldMode {
    #[default]
    Endless,
    /// Zero-based level index
    Level(u32),
}

impl WorldMode {
    /// High-score key for this mode
    pub fn score_key(&self) -> String {
        match self {
            WorldMode::Endless => crate::catalog::ENDLESS_SCORE_KEY.to_string(),
            WorldMode::Level(index) => crate::catalog::level_score_key(*index),
        }
    }
}

/// Things that happened during a tick, drained by the session
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    Jumped,
    Collected { score: u64 },
    WorldExtended { frontier: f32 },
    RunEnded { cause: EndCause, score: u64 },
}

/// The player character
#[derive(Debug, Clone)]
pub struct Player {
    pub rect: Rect,
    pub vel: Vec2,
    /// Set unless the player landed on a platform this tick
    pub airborne: bool,
    /// Cosmetic walk cycle, advanced while moving on the ground
    pub anim_phase: u32,
    pub color: Option<Color>,
}

impl Player {
    pub fn spawn(tuning: &Tuning) -> Self {
        Self {
            rect: Rect::new(
                tuning.spawn_x,
                tuning.spawn_y,
                tuning.player_width,
                tuning.player_height,
            ),
            vel: Vec2::ZERO,
            airborne: true,
            anim_phase: 0,
            color: None,
        }
    }
}

/// Static ground the player can stand on
#[derive(Debug, Clone)]
pub struct Platform {
    pub rect: Rect,
    pub color: Option<Color>,
}

/// Score pickup hovering above a platform
#[derive(Debug, Clone)]
pub struct Collectible {
    pub rect: Rect,
    pub collected: bool,
    pub color: Option<Color>,
}

impl Collectible {
    /// Mark collected. Returns false if it already was.
    pub fn collect(&mut self) -> bool {
        if self.collected {
            return false;
        }
        self.collected = true;
        true
    }
}

/// Where a hazard was placed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HazardPlacement {
    /// On the floor of a gap between platforms
    Pit,
    /// On top of a platform
    Platform,
}

/// Static lethal spike
#[derive(Debug, Clone)]
pub struct Hazard {
    pub rect: Rect,
    pub placement: HazardPlacement,
    pub color: Option<Color>,
}

/// End-of-level flag
#[derive(Debug, Clone)]
pub struct Goal {
    pub rect: Rect,
    pub color: Option<Color>,
}

/// Horizontal bounds an enemy may occupy (inclusive, applies to `rect.pos.x`)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatrolBounds {
    pub min_x: f32,
    pub max_x: f32,
}

impl PatrolBounds {
    pub fn contains(&self, x: f32) -> bool {
        x >= self.min_x && x <= self.max_x
    }
}

/// Enemy walking back and forth
#[derive(Debug, Clone)]
pub struct PatrolEnemy {
    pub rect: Rect,
    /// Horizontal velocity (px/tick)
    pub vx: f32,
    /// x recorded at spawn
    pub anchor_x: f32,
    /// Half-width of the free patrol interval around `anchor_x`
    pub patrol_range: f32,
    pub color: Option<Color>,
}

impl PatrolEnemy {
    /// Platform this enemy stands on: bottom within `epsilon` of the platform
    /// top and horizontal spans intersecting.
    pub fn resting_on<'a>(&self, platforms: &'a [Platform], epsilon: f32) -> Option<&'a Platform> {
        platforms.iter().find(|p| {
            (self.rect.bottom() - p.rect.top()).abs() < epsilon && self.rect.overlaps_x(&p.rect)
        })
    }

    /// Effective patrol bounds: the supporting platform's span, else anchor ± range
    pub fn bounds(&self, platforms: &[Platform], epsilon: f32) -> PatrolBounds {
        match self.resting_on(platforms, epsilon) {
            Some(p) => PatrolBounds {
                min_x: p.rect.left(),
                max_x: (p.rect.right() - self.rect.width()).max(p.rect.left()),
            },
            None => PatrolBounds {
                min_x: self.anchor_x - self.patrol_range,
                max_x: self.anchor_x + self.patrol_range,
            },
        }
    }

    /// Advance one tick, reflecting at the patrol bounds
    pub fn advance(&mut self, platforms: &[Platform], epsilon: f32) {
        let bounds = self.bounds(platforms, epsilon);
        let x = self.rect.pos.x;
        let mut new_x = x + self.vx;

        if new_x <= bounds.min_x || new_x >= bounds.max_x {
            self.vx = -self.vx;
            new_x = x + self.vx;
        }

        self.rect.pos.x = new_x.clamp(bounds.min_x, bounds.max_x);
    }
}

/// Live world content (the entity store, minus the player)
#[derive(Debug, Clone, Default)]
pub struct World {
    pub platforms: Vec<Platform>,
    pub collectibles: Vec<Collectible>,
    pub enemies: Vec<PatrolEnemy>,
    pub hazards: Vec<Hazard>,
    pub goal: Option<Goal>,
    /// Rightmost x generated so far
    pub frontier_x: f32,
    /// Top of the most recently generated platform
    pub last_platform_y: f32,
}

impl World {
    /// Append a freshly generated chunk
    pub fn append(&mut self, chunk: Chunk) {
        self.platforms.extend(chunk.platforms);
        self.collectibles.extend(chunk.collectibles);
        self.enemies.extend(chunk.enemies);
        self.hazards.extend(chunk.hazards);
        self.frontier_x = self.frontier_x.max(chunk.frontier_x);
        self.last_platform_y = chunk.last_platform_y;
    }

    /// Drop everything whose right edge is left of `left_edge`.
    /// Collected pickups go regardless of position. Returns the number removed.
    pub fn cull_behind(&mut self, left_edge: f32) -> usize {
        let before = self.entity_count();
        self.platforms.retain(|p| p.rect.right() >= left_edge);
        self.collectibles
            .retain(|c| !c.collected && c.rect.right() >= left_edge);
        self.enemies.retain(|e| e.rect.right() >= left_edge);
        self.hazards.retain(|h| h.rect.right() >= left_edge);
        before - self.entity_count()
    }

    pub fn entity_count(&self) -> usize {
        self.platforms.len()
            + self.collectibles.len()
            + self.enemies.len()
            + self.hazards.len()
            + usize::from(self.goal.is_some())
    }
}

/// Horizontal scroll offset
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Camera {
    pub x: f32,
}

impl Camera {
    /// Move toward `player_x - viewport_width / lead_divisor`.
    ///
    /// Never below 0. With `max_x` (level mode) the camera also stops at the
    /// world end and tracks the target directly; without it the camera only
    /// ratchets forward, since culled content behind it is gone.
    pub fn follow(&mut self, player_x: f32, tuning: &Tuning, max_x: Option<f32>) {
        let target = (player_x - tuning.viewport_width / tuning.lead_divisor).max(0.0);
        self.x = match max_x {
            Some(max_x) => target.min(max_x.max(0.0)),
            None => self.x.max(target),
        };
    }
}

/// Complete game state for one run
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub mode: WorldMode,
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Score for this run (never decreases)
    pub score: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Tick of the last pickup, for HUD feedback
    pub last_collect_tick: Option<u64>,
    pub player: Player,
    pub world: World,
    pub camera: Camera,
    pub generator: ChunkGenerator,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Build a fresh run: spawn the player and generate the opening world
    pub fn new(seed: u64, mode: WorldMode, tuning: Tuning) -> Self {
        let generator_seed = match mode {
            WorldMode::Endless => seed,
            WorldMode::Level(index) => level_seed(index),
        };
        let mut state = Self {
            seed,
            mode,
            player: Player::spawn(&tuning),
            world: World::default(),
            camera: Camera::default(),
            generator: ChunkGenerator::new(generator_seed),
            tuning,
            phase: GamePhase::Playing,
            score: 0,
            time_ticks: 0,
            last_collect_tick: None,
            events: Vec::new(),
        };
        state.world.last_platform_y = state.tuning.start_platform_y();

        match mode {
            WorldMode::Endless => {
                state.extend_world();
            }
            WorldMode::Level(index) => {
                let length = state.level_length(index);
                while state.world.frontier_x < length {
                    state.extend_world();
                }
                state.world.goal = state.generator.place_goal(&state.world, &state.tuning);
            }
        }

        log::info!(
            "New run: seed={} mode={:?} platforms={} frontier={:.0}",
            seed,
            mode,
            state.world.platforms.len(),
            state.world.frontier_x
        );
        state
    }

    /// Score fed to difficulty terms (levels start harder)
    pub fn difficulty_score(&self) -> u64 {
        match self.mode {
            WorldMode::Endless => self.score,
            WorldMode::Level(index) => self.score + index as u64 * self.tuning.level_score_step,
        }
    }

    /// Total world length of a level
    pub fn level_length(&self, index: u32) -> f32 {
        (2 + index) as f32 * self.tuning.chunk_width
    }

    /// Right edge the camera may not scroll past (level mode only)
    pub fn camera_limit(&self) -> Option<f32> {
        match self.mode {
            WorldMode::Endless => None,
            WorldMode::Level(_) => Some(self.world.frontier_x - self.tuning.viewport_width),
        }
    }

    /// Generate one more chunk at the frontier and append it
    pub fn extend_world(&mut self) {
        let chunk = self.generator.generate_chunk(
            self.world.frontier_x,
            self.world.last_platform_y,
            self.difficulty_score(),
            &self.tuning,
        );
        self.world.append(chunk);
        self.events.push(GameEvent::WorldExtended {
            frontier: self.world.frontier_x,
        });
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Fixed per-level generator seed so a level always looks the same
pub fn level_seed(index: u32) -> u64 {
    (index as u64 + 1).wrapping_mul(2654435761)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn platform(x: f32, y: f32, w: f32) -> Platform {
        Platform {
            rect: Rect::new(x, y, w, 20.0),
            color: None,
        }
    }

    fn enemy_on(p: &Platform, x: f32, vx: f32) -> PatrolEnemy {
        PatrolEnemy {
            rect: Rect::new(x, p.rect.top() - 25.0, 25.0, 25.0),
            vx,
            anchor_x: x,
            patrol_range: 50.0,
            color: None,
        }
    }

    #[test]
    fn test_collect_is_idempotent() {
        let mut c = Collectible {
            rect: Rect::new(0.0, 0.0, 15.0, 15.0),
            collected: false,
            color: None,
        };
        assert!(c.collect());
        assert!(!c.collect());
        assert!(c.collected);
    }

    #[test]
    fn test_enemy_resting_detection_uses_epsilon() {
        let p = platform(100.0, 300.0, 200.0);
        let mut e = enemy_on(&p, 150.0, 1.0);
        e.rect.pos.y += 0.4;
        assert!(e.resting_on(std::slice::from_ref(&p), 1.0).is_some());
        e.rect.pos.y += 2.0;
        assert!(e.resting_on(std::slice::from_ref(&p), 1.0).is_none());
    }

    #[test]
    fn test_enemy_reverses_at_platform_edge() {
        let p = platform(100.0, 300.0, 100.0);
        let platforms = vec![p.clone()];
        let mut e = enemy_on(&p, 174.5, 1.0);
        e.advance(&platforms, 1.0);
        // max_x = 200 - 25 = 175: 175.5 would overshoot, so it turned around
        assert_eq!(e.vx, -1.0);
        assert_eq!(e.rect.pos.x, 173.5);
    }

    #[test]
    fn test_enemy_uses_anchor_range_in_air() {
        let mut e = PatrolEnemy {
            rect: Rect::new(149.5, 0.0, 25.0, 25.0),
            vx: 1.0,
            anchor_x: 100.0,
            patrol_range: 50.0,
            color: None,
        };
        e.advance(&[], 1.0);
        assert_eq!(e.vx, -1.0);
        assert!(e.rect.pos.x <= 150.0);
    }

    #[test]
    fn test_cull_behind_removes_only_scrolled_out() {
        let mut world = World::default();
        world.platforms.push(platform(0.0, 300.0, 100.0));
        world.platforms.push(platform(150.0, 300.0, 100.0));
        world.hazards.push(Hazard {
            rect: Rect::new(50.0, 280.0, 20.0, 20.0),
            placement: HazardPlacement::Platform,
            color: None,
        });
        let removed = world.cull_behind(120.0);
        assert_eq!(removed, 2);
        assert_eq!(world.platforms.len(), 1);
        assert_eq!(world.platforms[0].rect.left(), 150.0);
    }

    #[test]
    fn test_camera_ratchets_in_endless() {
        let tuning = Tuning::default();
        let mut camera = Camera::default();
        camera.follow(100.0, &tuning, None);
        assert_eq!(camera.x, 0.0);
        camera.follow(1000.0, &tuning, None);
        let ahead = camera.x;
        assert!((ahead - (1000.0 - 800.0 / 3.0)).abs() < 1e-3);
        camera.follow(900.0, &tuning, None);
        assert_eq!(camera.x, ahead);
    }

    #[test]
    fn test_camera_clamps_in_level() {
        let tuning = Tuning::default();
        let mut camera = Camera::default();
        camera.follow(5000.0, &tuning, Some(2400.0));
        assert_eq!(camera.x, 2400.0);
        camera.follow(600.0, &tuning, Some(2400.0));
        assert!((camera.x - (600.0 - 800.0 / 3.0)).abs() < 1e-3);
    }

    #[test]
    fn test_new_endless_state_has_start_platform() {
        let state = GameState::new(7, WorldMode::Endless, Tuning::default());
        assert!(state.is_playing());
        let first = &state.world.platforms[0];
        assert!(first.rect.left() <= state.player.rect.left());
        assert!(state.world.frontier_x >= state.tuning.chunk_width);
    }

    #[test]
    fn test_new_level_state_has_goal_and_fixed_layout() {
        let a = GameState::new(1, WorldMode::Level(2), Tuning::default());
        let b = GameState::new(99, WorldMode::Level(2), Tuning::default());
        assert!(a.world.goal.is_some());
        assert!(a.world.frontier_x >= a.level_length(2));
        assert_eq!(a.world.platforms.len(), b.world.platforms.len());
    }

    proptest! {
        #[test]
        fn patrol_stays_in_bounds(
            width in 60.0f32..300.0,
            start in 0.0f32..1.0,
            speed in 0.5f32..4.0,
            ticks in 1usize..600,
        ) {
            let p = platform(100.0, 300.0, width);
            let platforms = vec![p.clone()];
            let span = width - 25.0;
            let mut e = enemy_on(&p, 100.0 + span * start, speed);
            for _ in 0..ticks {
                e.advance(&platforms, 1.0);
                let bounds = e.bounds(&platforms, 1.0);
                prop_assert!(bounds.contains(e.rect.pos.x));
                prop_assert!(e.rect.left() >= p.rect.left());
                prop_assert!(e.rect.right() <= p.rect.right() + 1e-3);
            }
        }
    }
}
