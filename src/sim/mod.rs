//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (units are px/tick)
//! - Seeded RNG only
//! - Stable iteration order (generation order)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod generate;
pub mod state;
pub mod tick;

pub use collision::{Face, Rect, Resolution, overlaps, resolve_axis_aligned};
pub use generate::{Chunk, ChunkGenerator};
pub use state::{
    Camera, Collectible, EndCause, GameEvent, GamePhase, GameState, Goal, Hazard,
    HazardPlacement, PatrolBounds, PatrolEnemy, Platform, Player, World, WorldMode,
};
pub use tick::{TickInput, tick};
