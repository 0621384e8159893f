//! CPU-side draw batch
//!
//! Collects a frame as screen-space triangles plus a list of text labels.
//! The GPU backend draws the triangles; text goes to the DOM (or the log in
//! headless runs).

use glam::Vec2;

use super::shapes;
use super::vertex::Vertex;
use super::{RenderSurface, TextAlign, Transform};
use crate::Color;

/// A queued text label, already in screen space
#[derive(Debug, Clone, PartialEq)]
pub struct TextItem {
    pub text: String,
    pub pos: Vec2,
    pub size: f32,
    pub align: TextAlign,
    pub color: Color,
}

#[derive(Debug, Clone, Default)]
pub struct VertexBatch {
    pub clear_color: Color,
    pub vertices: Vec<Vertex>,
    pub texts: Vec<TextItem>,
    transform: Transform,
}

impl VertexBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Text labels containing `needle`
    pub fn find_text(&self, needle: &str) -> Option<&TextItem> {
        self.texts.iter().find(|t| t.text.contains(needle))
    }
}

impl RenderSurface for VertexBatch {
    fn clear(&mut self, color: Color) {
        self.clear_color = color;
        self.vertices.clear();
        self.texts.clear();
        self.transform = Transform::IDENTITY;
    }

    fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    fn fill_rect(&mut self, pos: Vec2, size: Vec2, color: Color) {
        let t = self.transform;
        self.vertices
            .extend(shapes::quad(t.apply(pos), size * t.scale, color));
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        let t = self.transform;
        let screen: Vec<Vec2> = points.iter().map(|p| t.apply(*p)).collect();
        self.vertices.extend(shapes::polygon(&screen, color));
    }

    fn text(&mut self, text: &str, pos: Vec2, size: f32, align: TextAlign, color: Color) {
        self.texts.push(TextItem {
            text: text.to_string(),
            pos: self.transform.apply(pos),
            size: size * self.transform.scale,
            align,
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::HighScores;
    use crate::persistence::MemoryStore;
    use crate::renderer::{colors, render_frame};
    use crate::session::Session;
    use crate::settings::Settings;
    use crate::sim::{
        Collectible, EndCause, GamePhase, Hazard, HazardPlacement, Rect, TickInput,
    };
    use crate::tuning::Tuning;

    fn playing_session() -> Session<HighScores<MemoryStore>> {
        let mut s = Session::new(HighScores::new(MemoryStore::new()), Tuning::default(), 1);
        s.start(1);
        s
    }

    fn draw(session: &Session<HighScores<MemoryStore>>) -> VertexBatch {
        let mut batch = VertexBatch::new();
        render_frame(
            &mut batch,
            &session.snapshot(),
            &Settings::default(),
            Transform::IDENTITY,
        );
        batch
    }

    #[test]
    fn test_rect_is_transformed() {
        let mut batch = VertexBatch::new();
        batch.set_transform(Transform {
            scale: 2.0,
            offset: Vec2::new(5.0, 0.0),
        });
        batch.fill_rect(Vec2::new(1.0, 1.0), Vec2::new(2.0, 2.0), [1.0; 4]);
        assert_eq!(batch.vertices[0].position, [7.0, 2.0]);
        assert_eq!(batch.vertices[5].position, [11.0, 6.0]);
    }

    #[test]
    fn test_menu_draws_title_only() {
        let session = Session::new(HighScores::new(MemoryStore::new()), Tuning::default(), 1);
        let batch = draw(&session);
        assert!(batch.find_text("Pixel Jumper").is_some());
        assert!(batch.find_text("Score:").is_none());
        // Just the dimming overlay
        assert_eq!(batch.triangle_count(), 2);
    }

    #[test]
    fn test_world_uses_camera_and_hud_does_not() {
        let mut session = playing_session();
        for _ in 0..10 {
            session.step(&TickInput::default());
        }
        let batch = draw(&session);
        let state = session.state();
        let first = state.world.platforms[0].rect;
        let expected = [first.left() - state.camera.x, first.top()];
        assert_eq!(batch.vertices[0].position, expected);
        let score = batch.find_text("Score: 0").unwrap();
        assert_eq!(score.pos, Vec2::new(10.0, 25.0));
        assert_eq!(score.align, TextAlign::Left);
    }

    #[test]
    fn test_hazards_are_triangles_and_collected_items_hidden() {
        let mut session = playing_session();
        session.step(&TickInput::default());
        let baseline = draw(&session).triangle_count();

        let state = session.state();
        let mut extra_state = state.clone();
        extra_state.world.hazards.push(Hazard {
            rect: Rect::new(600.0, 300.0, 20.0, 20.0),
            placement: HazardPlacement::Platform,
            color: None,
        });
        extra_state.world.collectibles.push(Collectible {
            rect: Rect::new(650.0, 300.0, 15.0, 15.0),
            collected: true,
            color: None,
        });

        let snapshot = crate::session::Snapshot {
            state: &extra_state,
            high_score: 0,
            last_run: None,
        };
        let mut batch = VertexBatch::new();
        render_frame(&mut batch, &snapshot, &Settings::default(), Transform::IDENTITY);
        assert_eq!(batch.triangle_count(), baseline + 1);
        let spike = &batch.vertices[batch.vertices.len() - 3 - 6..batch.vertices.len() - 6];
        assert!(spike.iter().all(|v| v.color == colors::HAZARD));
    }

    #[test]
    fn test_game_over_overlay_names_cause() {
        let session = playing_session();
        let mut state = session.state().clone();
        state.phase = GamePhase::GameOver(EndCause::Enemy);
        let snapshot = crate::session::Snapshot {
            state: &state,
            high_score: 40,
            last_run: None,
        };
        let mut batch = VertexBatch::new();
        render_frame(&mut batch, &snapshot, &Settings::default(), Transform::IDENTITY);
        assert!(batch.find_text("Hit by an enemy!").is_some());
        assert!(batch.find_text("High Score: 40").is_some());
    }
}
