//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

use crate::Color;

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: Color) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements
pub mod colors {
    use crate::Color;

    pub const BACKGROUND: Color = [0.07, 0.08, 0.12, 1.0];
    pub const FOREGROUND: Color = [0.93, 0.94, 0.96, 1.0];
    pub const PLAYER: Color = [0.35, 0.55, 1.0, 1.0];
    pub const PLATFORM: Color = [0.32, 0.34, 0.42, 1.0];
    pub const COLLECTIBLE: Color = [1.0, 0.78, 0.2, 1.0];
    pub const ENEMY: Color = [0.93, 0.35, 0.2, 1.0];
    pub const HAZARD: Color = [0.85, 0.15, 0.25, 1.0];
    pub const GOAL_POLE: Color = [0.8, 0.8, 0.85, 1.0];
    pub const GOAL_FLAG: Color = [0.25, 0.85, 0.45, 1.0];
    /// Game-over overlay (destructive tint)
    pub const OVERLAY: Color = [0.55, 0.08, 0.1, 0.8];
    pub const OVERLAY_CLEARED: Color = [0.08, 0.4, 0.2, 0.8];
    pub const MENU_OVERLAY: Color = [0.0, 0.0, 0.0, 0.6];

    // High contrast variants
    pub const HC_BACKGROUND: Color = [0.0, 0.0, 0.0, 1.0];
    pub const HC_PLATFORM: Color = [1.0, 1.0, 1.0, 1.0];
    pub const HC_PLAYER: Color = [0.0, 1.0, 1.0, 1.0];
    pub const HC_COLLECTIBLE: Color = [1.0, 1.0, 0.0, 1.0];
    pub const HC_DANGER: Color = [1.0, 0.0, 0.0, 1.0];
}
