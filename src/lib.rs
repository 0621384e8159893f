//! Pixel Arcade - browser arcade mini-games
//!
//! Core modules:
//! - `sim`: Deterministic platformer simulation (physics, collisions, world generation)
//! - `session`: Menu/playing/game-over state machine and fixed-tick scheduling
//! - `renderer`: Render step plus the WebGPU drawing backend
//! - `platform`: Keyboard/touch input intents
//! - `persistence`: Key-value storage backends
//! - `tuning`: Data-driven game balance

pub mod catalog;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::{HighScores, ScoreStore};
pub use session::Session;
pub use settings::{Settings, TouchControls};
pub use tuning::Tuning;

/// RGBA display color (rendering only, never read by the simulation)
pub type Color = [f32; 4];

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest frame delta fed to the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;
}
