//! Rendering
//!
//! [`render_frame`] is the render step: it reads a session snapshot and
//! issues primitive draw calls against a [`RenderSurface`]. It never touches
//! simulation state. Backends:
//! - [`VertexBatch`]: CPU triangle list plus queued text
//! - [`RenderState`]: uploads a batch to the GPU with wgpu

pub mod batch;
pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use batch::{TextItem, VertexBatch};
pub use pipeline::RenderState;
pub use vertex::{Vertex, colors};

use glam::Vec2;

use crate::Color;
use crate::session::Snapshot;
use crate::settings::Settings;
use crate::sim::{EndCause, GamePhase, Rect};

/// Maps a source space to screen pixels: `screen = p * scale + offset`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub scale: f32,
    pub offset: Vec2,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        offset: Vec2::ZERO,
    };

    #[inline]
    pub fn apply(&self, p: Vec2) -> Vec2 {
        p * self.scale + self.offset
    }

    /// World → screen for a camera at `camera_x`:
    /// `screen = (world - (camera_x, 0)) * scale + offset`
    pub fn with_camera(&self, camera_x: f32) -> Self {
        Self {
            scale: self.scale,
            offset: self.offset - Vec2::new(camera_x * self.scale, 0.0),
        }
    }
}

/// Letterboxed fit of the logical viewport into the canvas
pub fn fit_viewport(canvas: Vec2, viewport: Vec2) -> Transform {
    if viewport.x <= 0.0 || viewport.y <= 0.0 {
        return Transform::IDENTITY;
    }
    let scale = (canvas.x / viewport.x).min(canvas.y / viewport.y);
    Transform {
        scale,
        offset: (canvas - viewport * scale) * 0.5,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// Drawing primitives the render step needs. Implementations do no game logic.
pub trait RenderSurface {
    /// Start a new frame
    fn clear(&mut self, color: Color);
    /// Transform applied to all following draw calls
    fn set_transform(&mut self, transform: Transform);
    fn fill_rect(&mut self, pos: Vec2, size: Vec2, color: Color);
    /// Convex polygon
    fn fill_polygon(&mut self, points: &[Vec2], color: Color);
    /// `pos` is the baseline anchor, `size` the font size in source units
    fn text(&mut self, text: &str, pos: Vec2, size: f32, align: TextAlign, color: Color);
}

/// Colors for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: Color,
    pub foreground: Color,
    pub player: Color,
    pub platform: Color,
    pub collectible: Color,
    pub enemy: Color,
    pub hazard: Color,
    pub goal_pole: Color,
    pub goal_flag: Color,
}

impl Palette {
    pub fn standard() -> Self {
        Self {
            background: colors::BACKGROUND,
            foreground: colors::FOREGROUND,
            player: colors::PLAYER,
            platform: colors::PLATFORM,
            collectible: colors::COLLECTIBLE,
            enemy: colors::ENEMY,
            hazard: colors::HAZARD,
            goal_pole: colors::GOAL_POLE,
            goal_flag: colors::GOAL_FLAG,
        }
    }

    pub fn high_contrast() -> Self {
        Self {
            background: colors::HC_BACKGROUND,
            foreground: colors::FOREGROUND,
            player: colors::HC_PLAYER,
            platform: colors::HC_PLATFORM,
            collectible: colors::HC_COLLECTIBLE,
            enemy: colors::HC_DANGER,
            hazard: colors::HC_DANGER,
            goal_pole: colors::HC_PLATFORM,
            goal_flag: colors::HC_PLAYER,
        }
    }

    pub fn for_settings(settings: &Settings) -> Self {
        if settings.high_contrast {
            Self::high_contrast()
        } else {
            Self::standard()
        }
    }
}

/// Per-entity color override, else the palette default
fn pick(own: Option<Color>, fallback: Color) -> Color {
    own.unwrap_or(fallback)
}

fn draw_rect(surface: &mut impl RenderSurface, rect: &Rect, color: Color) {
    surface.fill_rect(rect.pos, rect.size, color);
}

/// Draw one frame of the session. `screen` maps the logical viewport
/// (e.g. 800x450) to canvas pixels.
pub fn render_frame(
    surface: &mut impl RenderSurface,
    frame: &Snapshot<'_>,
    settings: &Settings,
    screen: Transform,
) {
    let palette = Palette::for_settings(settings);
    let state = frame.state;
    let viewport = Vec2::new(state.tuning.viewport_width, state.tuning.viewport_height);

    surface.clear(palette.background);

    if state.phase == GamePhase::Menu {
        surface.set_transform(screen);
        surface.fill_rect(Vec2::ZERO, viewport, colors::MENU_OVERLAY);
        surface.text("Pixel Jumper", viewport * Vec2::new(0.5, 0.4), 40.0, TextAlign::Center, palette.foreground);
        surface.text(
            "Press Enter to start",
            viewport * Vec2::new(0.5, 0.55),
            20.0,
            TextAlign::Center,
            palette.foreground,
        );
        if frame.high_score > 0 {
            surface.text(
                &format!("High Score: {}", frame.high_score),
                viewport * Vec2::new(0.5, 0.65),
                18.0,
                TextAlign::Center,
                palette.foreground,
            );
        }
        return;
    }

    // === World ===
    surface.set_transform(screen.with_camera(state.camera.x));
    let world = &state.world;

    for platform in &world.platforms {
        draw_rect(surface, &platform.rect, pick(platform.color, palette.platform));
    }
    for collectible in world.collectibles.iter().filter(|c| !c.collected) {
        draw_rect(surface, &collectible.rect, pick(collectible.color, palette.collectible));
    }
    for enemy in &world.enemies {
        draw_rect(surface, &enemy.rect, pick(enemy.color, palette.enemy));
    }
    for hazard in &world.hazards {
        let points = shapes::spike(hazard.rect.pos, hazard.rect.size);
        surface.fill_polygon(&points, pick(hazard.color, palette.hazard));
    }
    if let Some(goal) = &world.goal {
        let pole_width = 3.0;
        surface.fill_rect(
            goal.rect.pos,
            Vec2::new(pole_width, goal.rect.height()),
            pick(goal.color, palette.goal_pole),
        );
        let flag = shapes::pennant(
            goal.rect.pos + Vec2::new(pole_width, 0.0),
            goal.rect.width() - pole_width,
            goal.rect.height() * 0.4,
        );
        surface.fill_polygon(&flag, palette.goal_flag);
    }

    let player = &state.player;
    let mut player_pos = player.rect.pos;
    if settings.animate_sprites() && !player.airborne && player.vel.x != 0.0 {
        // Walk bob, purely cosmetic
        player_pos.y -= ((player.anim_phase as f32) * 0.6).sin().abs() * 2.0;
    }
    surface.fill_rect(player_pos, player.rect.size, pick(player.color, palette.player));

    // === HUD ===
    surface.set_transform(screen);
    surface.text(
        &format!("Score: {}", state.score),
        Vec2::new(10.0, 25.0),
        18.0,
        TextAlign::Left,
        palette.foreground,
    );
    surface.text(
        &format!("High Score: {}", frame.high_score),
        Vec2::new(viewport.x - 10.0, 25.0),
        18.0,
        TextAlign::Right,
        palette.foreground,
    );

    if let GamePhase::GameOver(cause) = state.phase {
        let tint = if cause == EndCause::Cleared {
            colors::OVERLAY_CLEARED
        } else {
            colors::OVERLAY
        };
        surface.fill_rect(Vec2::ZERO, viewport, tint);
        surface.text(cause.message(), viewport * Vec2::new(0.5, 0.4), 36.0, TextAlign::Center, palette.foreground);
        surface.text(
            &format!("Final Score: {}", state.score),
            viewport * Vec2::new(0.5, 0.52),
            22.0,
            TextAlign::Center,
            palette.foreground,
        );
        if frame.last_run.is_some_and(|r| r.new_record) {
            surface.text("New high score!", viewport * Vec2::new(0.5, 0.6), 20.0, TextAlign::Center, palette.foreground);
        }
        surface.text(
            "Enter to retry, Esc for menu",
            viewport * Vec2::new(0.5, 0.7),
            16.0,
            TextAlign::Center,
            palette.foreground,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_transform() {
        let t = Transform {
            scale: 2.0,
            offset: Vec2::new(10.0, 5.0),
        }
        .with_camera(100.0);
        // (world - camera) * scale + offset
        assert_eq!(t.apply(Vec2::new(150.0, 20.0)), Vec2::new(110.0, 45.0));
        assert_eq!(t.apply(Vec2::new(100.0, 0.0)), Vec2::new(10.0, 5.0));
    }

    #[test]
    fn test_fit_viewport_letterboxes() {
        let t = fit_viewport(Vec2::new(1600.0, 1000.0), Vec2::new(800.0, 450.0));
        assert_eq!(t.scale, 2.0);
        assert_eq!(t.offset, Vec2::new(0.0, 50.0));
        assert_eq!(t.apply(Vec2::new(800.0, 450.0)), Vec2::new(1600.0, 950.0));
    }

    #[test]
    fn test_palette_follows_settings() {
        let settings = Settings {
            high_contrast: true,
            ..Default::default()
        };
        assert_eq!(Palette::for_settings(&settings), Palette::high_contrast());
        assert_eq!(Palette::for_settings(&Settings::default()), Palette::standard());
    }
}
