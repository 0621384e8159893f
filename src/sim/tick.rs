//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically. One call is one
//! 60 Hz step; all velocities are in px/tick.

use super::autopilot;
use super::collision::{Face, resolve_axis_aligned};
use super::state::{EndCause, GameEvent, GamePhase, GameState, WorldMode};

/// Input intents for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    /// Jump pressed since the last tick (edge)
    pub jump: bool,
    /// Menu/escape pressed since the last tick (edge, handled by the session)
    pub menu: bool,
    /// Idle/demo mode - autopilot plays the game
    pub idle_mode: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    // Terminal states and the menu are frozen
    if state.phase != GamePhase::Playing {
        return;
    }

    let input = if input.idle_mode {
        autopilot::drive(state)
    } else {
        input.clone()
    };

    state.time_ticks += 1;
    let tuning = state.tuning;

    // === Input ===
    let player = &mut state.player;
    player.vel.x = 0.0;
    if input.move_left {
        player.vel.x = -tuning.player_speed;
    }
    if input.move_right {
        player.vel.x = tuning.player_speed;
    }
    if input.jump && !player.airborne {
        player.vel.y = tuning.jump_impulse;
        player.airborne = true;
        state.events.push(GameEvent::Jumped);
    }

    // === Integration ===
    let prev = player.rect.pos;
    player.vel.y += tuning.gravity;
    player.rect.pos += player.vel;

    // Player can't outrun the camera window (or the end of a level)
    let mut max_x = state.camera.x + tuning.viewport_width - player.rect.width();
    if let WorldMode::Level(_) = state.mode {
        max_x = max_x.min(state.world.frontier_x - player.rect.width());
    }
    player.rect.pos.x = player.rect.pos.x.min(max_x).max(state.camera.x);

    // Ceiling
    if player.rect.pos.y <= 0.0 {
        player.rect.pos.y = 0.0;
        player.vel.y = 0.0;
    }

    if player.rect.bottom() > tuning.viewport_height {
        end_run(state, EndCause::Fell);
        return;
    }

    // === Platforms ===
    player.airborne = true;
    for platform in &state.world.platforms {
        if let Some(res) = resolve_axis_aligned(
            prev,
            &player.rect,
            player.vel,
            &platform.rect,
            tuning.side_tolerance,
        ) {
            player.rect.pos = res.pos;
            player.vel = res.vel;
            if res.face == Face::Top {
                player.airborne = false;
            }
        }
    }

    if !player.airborne && player.vel.x != 0.0 {
        player.anim_phase = player.anim_phase.wrapping_add(1);
    }

    // === Collectibles ===
    let player_rect = player.rect;
    for collectible in &mut state.world.collectibles {
        if !collectible.collected && player_rect.overlaps(&collectible.rect) && collectible.collect() {
            state.score += tuning.collectible_value;
            state.last_collect_tick = Some(state.time_ticks);
            state.events.push(GameEvent::Collected { score: state.score });
        }
    }

    // === Lethal contact ===
    if state
        .world
        .enemies
        .iter()
        .any(|e| player_rect.overlaps(&e.rect))
    {
        end_run(state, EndCause::Enemy);
        return;
    }
    if state
        .world
        .hazards
        .iter()
        .any(|h| player_rect.overlaps(&h.rect))
    {
        end_run(state, EndCause::Hazard);
        return;
    }
    if state
        .world
        .goal
        .as_ref()
        .is_some_and(|g| player_rect.overlaps(&g.rect))
    {
        end_run(state, EndCause::Cleared);
        return;
    }

    // === Enemies ===
    let platforms = &state.world.platforms;
    for enemy in &mut state.world.enemies {
        enemy.advance(platforms, tuning.rest_epsilon);
    }

    // === World streaming ===
    if state.mode == WorldMode::Endless {
        if player_rect.left() + tuning.lookahead * tuning.viewport_width > state.world.frontier_x {
            state.extend_world();
        }
        let removed = state.world.cull_behind(state.camera.x);
        if removed > 0 {
            log::debug!(
                "Culled {} entities behind x={:.0} ({} live)",
                removed,
                state.camera.x,
                state.world.entity_count()
            );
        }
    }

    // === Camera ===
    let limit = state.camera_limit();
    state.camera.follow(player_rect.left(), &tuning, limit);
}

/// Enter the terminal phase and report it
fn end_run(state: &mut GameState, cause: EndCause) {
    state.phase = GamePhase::GameOver(cause);
    state.events.push(GameEvent::RunEnded {
        cause,
        score: state.score,
    });
    log::info!(
        "Run ended: {:?} at tick {} with score {}",
        cause,
        state.time_ticks,
        state.score
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::{Rect, overlaps};
    use crate::sim::state::{Collectible, Goal, Hazard, HazardPlacement, PatrolEnemy};
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    fn endless(seed: u64) -> GameState {
        GameState::new(seed, WorldMode::Endless, Tuning::default())
    }

    fn idle() -> TickInput {
        TickInput::default()
    }

    fn settle(state: &mut GameState) {
        for _ in 0..120 {
            tick(state, &idle());
        }
    }

    #[test]
    fn test_idle_player_rests_on_start_platform() {
        let mut state = endless(12345);
        settle(&mut state);

        assert_eq!(state.phase, GamePhase::Playing);
        let platform_y = state.tuning.start_platform_y();
        assert_eq!(state.player.rect.top(), platform_y - state.tuning.player_height);
        assert!(!state.player.airborne);
        assert_eq!(state.player.vel.y, 0.0);
    }

    #[test]
    fn test_hazard_under_spawn_ends_run() {
        let mut state = endless(7);
        let t = state.tuning;
        state.world.hazards.push(Hazard {
            rect: Rect::new(
                t.spawn_x,
                t.start_platform_y() - t.hazard_size,
                t.hazard_size,
                t.hazard_size,
            ),
            placement: HazardPlacement::Platform,
            color: None,
        });

        tick(&mut state, &idle());

        assert_eq!(state.phase, GamePhase::GameOver(EndCause::Hazard));
        assert_eq!(state.score, 0);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::RunEnded {
            cause: EndCause::Hazard,
            score: 0
        }));
    }

    #[test]
    fn test_enemy_contact_ends_run() {
        let mut state = endless(7);
        state.world.hazards.clear();
        state.world.collectibles.clear();
        let r = state.player.rect;
        state.world.enemies.push(PatrolEnemy {
            rect: r,
            vx: 1.0,
            anchor_x: r.left(),
            patrol_range: 40.0,
            color: None,
        });
        state.score = 12;

        tick(&mut state, &idle());

        assert_eq!(state.phase, GamePhase::GameOver(EndCause::Enemy));
        assert!(state.drain_events().contains(&GameEvent::RunEnded {
            cause: EndCause::Enemy,
            score: 12
        }));
    }

    #[test]
    fn test_ceiling_stops_upward_motion() {
        let mut state = endless(5);
        state.world.enemies.clear();
        state.world.hazards.clear();
        state.player.rect.pos.y = 2.0;
        state.player.vel.y = state.tuning.jump_impulse;

        tick(&mut state, &idle());

        assert_eq!(state.player.rect.pos.y, 0.0);
        assert_eq!(state.player.vel.y, 0.0);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_touching_ceiling_exactly_zeroes_velocity() {
        let mut state = endless(5);
        state.world.enemies.clear();
        state.world.hazards.clear();
        state.tuning.gravity = 0.5;
        state.player.rect.pos.y = 1.0;
        // -1.5 + 0.5 gravity lands exactly on y = 0
        state.player.vel.y = -1.5;

        tick(&mut state, &idle());

        assert_eq!(state.player.rect.pos.y, 0.0);
        assert_eq!(state.player.vel.y, 0.0);
    }

    #[test]
    fn test_terminal_state_is_frozen() {
        let mut state = endless(7);
        state.phase = GamePhase::GameOver(EndCause::Enemy);
        let before = state.player.rect;
        tick(&mut state, &idle());
        assert_eq!(state.player.rect, before);
        assert_eq!(state.time_ticks, 0);
    }

    #[test]
    fn test_fall_without_platforms() {
        let mut state = endless(1);
        state.world.platforms.clear();
        for _ in 0..60 {
            tick(&mut state, &idle());
        }
        assert_eq!(state.phase, GamePhase::GameOver(EndCause::Fell));
    }

    #[test]
    fn test_tuning_changes_apply_next_tick() {
        let mut state = endless(3);
        settle(&mut state);
        state.tuning.jump_impulse = -5.0;
        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        tick(&mut state, &jump);
        assert_eq!(state.player.vel.y, -5.0 + state.tuning.gravity);

        state.tuning.gravity = 1.0;
        let vy = state.player.vel.y;
        tick(&mut state, &idle());
        assert_eq!(state.player.vel.y, vy + 1.0);
    }

    #[test]
    fn test_jump_is_edge_triggered() {
        let mut state = endless(3);
        settle(&mut state);

        let jump = TickInput {
            jump: true,
            ..Default::default()
        };
        tick(&mut state, &jump);
        let impulse = state.tuning.jump_impulse + state.tuning.gravity;
        assert_eq!(state.player.vel.y, impulse);
        assert!(state.player.airborne);
        assert!(state.drain_events().contains(&GameEvent::Jumped));

        // Holding jump in the air adds nothing
        tick(&mut state, &jump);
        assert_eq!(state.player.vel.y, impulse + state.tuning.gravity);
        assert!(!state.drain_events().contains(&GameEvent::Jumped));
    }

    #[test]
    fn test_collectible_counts_once() {
        let mut state = endless(4);
        settle(&mut state);
        let r = state.player.rect;
        state.world.collectibles.push(Collectible {
            rect: Rect::new(r.left() + 2.0, r.top() + 2.0, 15.0, 15.0),
            collected: false,
            color: None,
        });

        tick(&mut state, &idle());
        tick(&mut state, &idle());
        tick(&mut state, &idle());

        assert_eq!(state.score, state.tuning.collectible_value);
        assert_eq!(state.last_collect_tick, Some(state.time_ticks - 2));
    }

    #[test]
    fn test_goal_clears_level() {
        let mut state = GameState::new(0, WorldMode::Level(0), Tuning::default());
        settle(&mut state);
        let r = state.player.rect;
        state.world.goal = Some(Goal {
            rect: Rect::new(r.left(), r.top(), 20.0, 40.0),
            color: None,
        });
        tick(&mut state, &idle());
        assert_eq!(state.phase, GamePhase::GameOver(EndCause::Cleared));
    }

    #[test]
    fn test_player_cannot_leave_level_end() {
        let mut state = GameState::new(0, WorldMode::Level(0), Tuning::default());
        state.world.hazards.clear();
        state.world.enemies.clear();
        state.world.goal = None;
        let end = state.world.frontier_x;
        state.camera.x = end - state.tuning.viewport_width;
        state.player.rect.pos.x = end - 22.0;
        state.player.rect.pos.y = 100.0;
        let right = TickInput {
            move_right: true,
            ..Default::default()
        };
        tick(&mut state, &right);
        assert!(state.player.rect.right() <= end);
    }

    #[test]
    fn test_world_extends_and_culls() {
        let mut state = endless(21);
        state.world.hazards.clear();
        state.world.enemies.clear();
        let frontier = state.world.frontier_x;
        state.camera.x = frontier - state.tuning.viewport_width;
        state.player.rect.pos.x = state.camera.x + 100.0;
        state.player.rect.pos.y = 100.0;
        state.player.vel.y = 0.0;

        tick(&mut state, &idle());

        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.world.frontier_x >= frontier + state.tuning.chunk_width);
        assert!(
            state
                .world
                .platforms
                .iter()
                .all(|p| p.rect.right() >= frontier - state.tuning.viewport_width)
        );
    }

    #[test]
    fn test_camera_leads_player() {
        let mut state = endless(8);
        state.world.enemies.clear();
        state.world.hazards.clear();
        state.player.rect.pos = glam::Vec2::new(700.0, 100.0);
        tick(&mut state, &idle());
        let expected = state.player.rect.left() - state.tuning.viewport_width / 3.0;
        assert!((state.camera.x - expected).abs() < 1e-3);
    }

    #[test]
    fn test_determinism() {
        let script: Vec<TickInput> = (0..400)
            .map(|i| TickInput {
                move_right: i % 7 != 0,
                jump: i % 45 == 10,
                ..Default::default()
            })
            .collect();

        let mut a = endless(99999);
        let mut b = endless(99999);
        for input in &script {
            tick(&mut a, input);
            tick(&mut b, input);
        }

        assert_eq!(a.player.rect, b.player.rect);
        assert_eq!(a.score, b.score);
        assert_eq!(a.phase, b.phase);
        assert_eq!(a.world.platforms.len(), b.world.platforms.len());
        assert_eq!(a.world.frontier_x, b.world.frontier_x);
    }

    proptest! {
        #[test]
        fn player_never_rests_inside_a_platform(
            seed in any::<u64>(),
            script in prop::collection::vec((any::<bool>(), any::<bool>(), any::<bool>()), 1..400),
        ) {
            let mut state = endless(seed);
            for (left, right, jump) in script {
                let input = TickInput { move_left: left, move_right: right, jump, ..Default::default() };
                tick(&mut state, &input);
                for p in &state.world.platforms {
                    prop_assert!(!overlaps(&state.player.rect, &p.rect));
                }
                for e in &state.world.enemies {
                    let bounds = e.bounds(&state.world.platforms, state.tuning.rest_epsilon);
                    prop_assert!(bounds.contains(e.rect.pos.x));
                }
            }
        }

        #[test]
        fn score_never_decreases(seed in any::<u64>(), ticks in 1usize..600) {
            let mut state = endless(seed);
            let mut last = 0;
            let input = TickInput { idle_mode: true, ..Default::default() };
            for _ in 0..ticks {
                tick(&mut state, &input);
                prop_assert!(state.score >= last);
                last = state.score;
            }
        }
    }
}
