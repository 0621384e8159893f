//! Data-driven game balance
//!
//! Every physics, generation and difficulty constant lives in [`Tuning`].
//! Units are pixels and ticks: velocities are px/tick, gravity is px/tick².

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Invalid balance data
#[derive(Error, Debug)]
pub enum TuningError {
    #[error("{field} must be positive (got {value})")]
    NotPositive { field: &'static str, value: f32 },

    #[error("{field} range is inverted ({min} > {max})")]
    InvertedRange {
        field: &'static str,
        min: f32,
        max: f32,
    },

    #[error("{field} cap {cap} is below its base {base}")]
    CapBelowBase {
        field: &'static str,
        base: f32,
        cap: f32,
    },

    #[error("{field} probability {value} is outside [0, 1]")]
    Probability { field: &'static str, value: f32 },

    #[error("platform step {step}px exceeds the jump rise of {rise}px")]
    StepUnreachable { step: f32, rise: f32 },

    #[error("gap of {gap}px exceeds the jump reach of {reach}px")]
    GapUnreachable { gap: f32, reach: f32 },

    #[error("tuning parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A value that grows with score: `min(cap, base + score / divisor)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyTerm {
    pub base: f32,
    /// Score needed to add 1.0 to the term
    pub divisor: f32,
    pub cap: f32,
}

impl DifficultyTerm {
    pub const fn new(base: f32, divisor: f32, cap: f32) -> Self {
        Self { base, divisor, cap }
    }

    /// Evaluate at the given score. Never exceeds `cap`.
    pub fn at(&self, score: u64) -> f32 {
        (self.base + score as f32 / self.divisor).min(self.cap)
    }
}

/// Inclusive integer-pixel range used for random draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub min: i32,
    pub max: i32,
}

impl Span {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }
}

/// Complete balance sheet for the platformer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Viewport / camera ===
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Camera target = player.x - viewport_width / lead_divisor
    pub lead_divisor: f32,

    // === Player ===
    pub player_width: f32,
    pub player_height: f32,
    pub spawn_x: f32,
    pub spawn_y: f32,
    pub player_speed: f32,
    pub gravity: f32,
    /// Negative: up is -y
    pub jump_impulse: f32,
    /// Horizontal contact is only resolved this far below an obstacle's top edge
    pub side_tolerance: f32,

    // === World streaming ===
    pub chunk_width: f32,
    /// Extend when player.x + lookahead * viewport_width passes the frontier
    pub lookahead: f32,

    // === Platforms ===
    pub gap: Span,
    pub platform_width: Span,
    pub platform_height: f32,
    /// Maximum |dy| between consecutive platforms
    pub step_delta: i32,
    /// Highest allowed platform top
    pub band_top: f32,
    /// Lowest allowed platform top, measured up from the viewport bottom
    pub band_bottom_margin: f32,
    pub start_platform_x: f32,
    pub start_platform_width: f32,
    /// Space between the spawned player's feet and the start platform
    pub start_platform_margin: f32,

    // === Collectibles ===
    pub collectible_size: f32,
    /// Distance from platform top to collectible top
    pub collectible_lift: f32,
    pub collectible_chance: f32,
    pub collectible_value: u64,

    // === Enemies ===
    pub enemy_width: f32,
    pub enemy_height: f32,
    pub enemy_speed: f32,
    /// Keep-out distance from each platform edge when spawning
    pub enemy_margin: f32,
    pub enemy_chance: DifficultyTerm,
    pub enemy_speed_scale: DifficultyTerm,
    pub patrol_range: DifficultyTerm,
    /// Tolerance for the "resting on a platform" test
    pub rest_epsilon: f32,

    // === Hazards ===
    pub hazard_size: f32,
    pub hazard_chance: DifficultyTerm,
    pub hazard_on_platform_chance: f32,
    /// Pit hazards need both neighbouring platforms lower than viewport_height - pit_depth
    pub pit_depth: f32,
    /// Pit hazards sit this far above the viewport bottom
    pub pit_floor_offset: f32,

    // === Levels ===
    /// Score offset added per level index before evaluating difficulty terms
    pub level_score_step: u64,
    pub goal_width: f32,
    pub goal_height: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            viewport_width: 800.0,
            viewport_height: 450.0,
            lead_divisor: 3.0,

            player_width: 20.0,
            player_height: 30.0,
            spawn_x: 50.0,
            spawn_y: 350.0,
            player_speed: 5.0,
            gravity: 0.6,
            jump_impulse: -12.0,
            side_tolerance: 5.0,

            chunk_width: 1600.0,
            lookahead: 1.5,

            gap: Span::new(60, 130),
            platform_width: Span::new(100, 250),
            platform_height: 20.0,
            step_delta: 90,
            band_top: 150.0,
            band_bottom_margin: 80.0,
            start_platform_x: 20.0,
            start_platform_width: 200.0,
            start_platform_margin: 10.0,

            collectible_size: 15.0,
            collectible_lift: 25.0,
            collectible_chance: 0.65,
            collectible_value: 10,

            enemy_width: 25.0,
            enemy_height: 25.0,
            enemy_speed: 1.0,
            enemy_margin: 15.0,
            enemy_chance: DifficultyTerm::new(0.20, 2000.0, 0.50),
            enemy_speed_scale: DifficultyTerm::new(1.0, 1000.0, 2.0),
            patrol_range: DifficultyTerm::new(50.0, 200.0, 150.0),
            rest_epsilon: 1.0,

            hazard_size: 20.0,
            hazard_chance: DifficultyTerm::new(0.15, 3000.0, 0.40),
            hazard_on_platform_chance: 0.5,
            pit_depth: 100.0,
            pit_floor_offset: 10.0,

            level_score_step: 400,
            goal_width: 20.0,
            goal_height: 40.0,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Lowest allowed platform top
    pub fn band_bottom(&self) -> f32 {
        self.viewport_height - self.band_bottom_margin
    }

    /// Top of the guaranteed start platform
    pub fn start_platform_y(&self) -> f32 {
        self.spawn_y + self.player_height + self.start_platform_margin
    }

    /// Peak height of a standing jump, integrated the way the tick integrates it
    pub fn max_jump_rise(&self) -> f32 {
        let mut vy = self.jump_impulse;
        let mut y = 0.0f32;
        let mut peak = 0.0f32;
        while vy < 0.0 {
            vy += self.gravity;
            y += vy;
            peak = peak.min(y);
        }
        -peak
    }

    /// Horizontal distance covered by a jump that lands `rise` px higher
    /// (negative rise = landing lower). Includes the player's own width.
    pub fn jump_reach(&self, rise: f32) -> f32 {
        let mut vy = self.jump_impulse;
        let mut y = 0.0f32;
        let mut ticks = 0u32;
        // Climb past the peak, then descend until back at the landing height
        loop {
            vy += self.gravity;
            y += vy;
            ticks += 1;
            if vy > 0.0 && -y <= rise {
                break;
            }
            if ticks > 10_000 {
                break;
            }
        }
        ticks as f32 * self.player_speed + self.player_width
    }

    /// Largest platform-to-platform rise the generator may produce
    pub fn effective_step(&self) -> i32 {
        let rise = self.max_jump_rise().floor() as i32;
        self.step_delta.min(rise - 1).max(0)
    }

    /// Check the sheet for degenerate or unreachable values
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("viewport_width", self.viewport_width),
            ("viewport_height", self.viewport_height),
            ("lead_divisor", self.lead_divisor),
            ("player_width", self.player_width),
            ("player_height", self.player_height),
            ("player_speed", self.player_speed),
            ("gravity", self.gravity),
            ("chunk_width", self.chunk_width),
            ("platform_height", self.platform_height),
            ("start_platform_width", self.start_platform_width),
            ("start_platform_margin", self.start_platform_margin),
            ("collectible_size", self.collectible_size),
            ("enemy_width", self.enemy_width),
            ("enemy_height", self.enemy_height),
            ("enemy_speed", self.enemy_speed),
            ("hazard_size", self.hazard_size),
            ("goal_width", self.goal_width),
            ("goal_height", self.goal_height),
            ("enemy_chance.divisor", self.enemy_chance.divisor),
            ("enemy_speed_scale.divisor", self.enemy_speed_scale.divisor),
            ("patrol_range.divisor", self.patrol_range.divisor),
            ("hazard_chance.divisor", self.hazard_chance.divisor),
            ("jump strength", -self.jump_impulse),
        ];
        for (field, value) in positive {
            if value <= 0.0 || !value.is_finite() {
                return Err(TuningError::NotPositive { field, value });
            }
        }

        let ranges = [
            ("gap", self.gap),
            ("platform_width", self.platform_width),
        ];
        for (field, span) in ranges {
            if span.min > span.max {
                return Err(TuningError::InvertedRange {
                    field,
                    min: span.min as f32,
                    max: span.max as f32,
                });
            }
            if span.min <= 0 {
                return Err(TuningError::NotPositive {
                    field,
                    value: span.min as f32,
                });
            }
        }
        if self.band_top > self.band_bottom() {
            return Err(TuningError::InvertedRange {
                field: "platform band",
                min: self.band_top,
                max: self.band_bottom(),
            });
        }

        let terms = [
            ("enemy_chance", self.enemy_chance),
            ("enemy_speed_scale", self.enemy_speed_scale),
            ("patrol_range", self.patrol_range),
            ("hazard_chance", self.hazard_chance),
        ];
        for (field, term) in terms {
            if term.cap < term.base {
                return Err(TuningError::CapBelowBase {
                    field,
                    base: term.base,
                    cap: term.cap,
                });
            }
        }

        let probabilities = [
            ("collectible_chance", self.collectible_chance),
            ("hazard_on_platform_chance", self.hazard_on_platform_chance),
            ("enemy_chance.cap", self.enemy_chance.cap),
            ("hazard_chance.cap", self.hazard_chance.cap),
        ];
        for (field, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(TuningError::Probability { field, value });
            }
        }

        let rise = self.max_jump_rise();
        if self.step_delta as f32 >= rise {
            return Err(TuningError::StepUnreachable {
                step: self.step_delta as f32,
                rise,
            });
        }
        let reach = self.jump_reach(self.step_delta as f32);
        if self.gap.max as f32 >= reach {
            return Err(TuningError::GapUnreachable {
                gap: self.gap.max as f32,
                reach,
            });
        }

        Ok(())
    }
}
