//! Platform abstraction layer
//!
//! Turns browser events into the simulation's input intents. The DOM wiring
//! itself lives in the wasm entry point.

pub mod input;

pub use input::{InputState, Intent};
