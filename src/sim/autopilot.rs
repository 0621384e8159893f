//! Demo autopilot
//!
//! Produces tick input from the current state: run right, jump at platform
//! edges and in front of enemies or spikes. Deterministic, so a seeded demo
//! run always plays out the same way.

use super::collision::Rect;
use super::state::GameState;
use super::tick::TickInput;

/// How far ahead (px) a threat on our level triggers a jump
const THREAT_LOOKAHEAD: f32 = 40.0;

/// Distance from the platform's right edge at which we take off
const EDGE_TAKEOFF: f32 = 10.0;

/// Choose input for the next tick
pub fn drive(state: &GameState) -> TickInput {
    let mut input = TickInput {
        move_right: true,
        idle_mode: true,
        ..Default::default()
    };

    let player = &state.player;
    if player.airborne {
        return input;
    }

    let feet = &player.rect;
    let support = state.world.platforms.iter().find(|p| {
        (feet.bottom() - p.rect.top()).abs() < state.tuning.rest_epsilon && feet.overlaps_x(&p.rect)
    });

    let at_edge = support.is_some_and(|p| p.rect.right() - feet.right() < EDGE_TAKEOFF);

    let threat_ahead = state
        .world
        .enemies
        .iter()
        .map(|e| &e.rect)
        .chain(state.world.hazards.iter().map(|h| &h.rect))
        .any(|r| is_ahead(feet, r));

    input.jump = at_edge || threat_ahead;
    input
}

/// Threat rectangle is in front of the player and vertically in the way
fn is_ahead(player: &Rect, threat: &Rect) -> bool {
    let dx = threat.left() - player.right();
    dx > -threat.width() && dx < THREAT_LOOKAHEAD
        && threat.bottom() > player.top()
        && threat.top() < player.bottom()
}
