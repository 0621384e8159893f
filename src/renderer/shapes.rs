//! Shape generation for 2D primitives
//!
//! All shapes come out as triangle lists in whatever space the input points
//! are in; callers transform first.

use glam::Vec2;

use super::vertex::Vertex;
use crate::Color;

/// Axis-aligned quad from its top-left corner and size
pub fn quad(pos: Vec2, size: Vec2, color: Color) -> [Vertex; 6] {
    let (x0, y0) = (pos.x, pos.y);
    let (x1, y1) = (pos.x + size.x, pos.y + size.y);
    [
        Vertex::new(x0, y0, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x1, y1, color),
    ]
}

/// Fan-triangulate a convex polygon. Fewer than 3 points yields nothing.
pub fn polygon(points: &[Vec2], color: Color) -> Vec<Vertex> {
    if points.len() < 3 {
        return Vec::new();
    }

    let mut vertices = Vec::with_capacity((points.len() - 2) * 3);
    let first = points[0];
    for pair in points[1..].windows(2) {
        vertices.push(Vertex::new(first.x, first.y, color));
        vertices.push(Vertex::new(pair[0].x, pair[0].y, color));
        vertices.push(Vertex::new(pair[1].x, pair[1].y, color));
    }
    vertices
}

/// Upward spike filling a box: base along the bottom, apex top-centre
pub fn spike(pos: Vec2, size: Vec2) -> [Vec2; 3] {
    [
        Vec2::new(pos.x, pos.y + size.y),
        Vec2::new(pos.x + size.x / 2.0, pos.y),
        Vec2::new(pos.x + size.x, pos.y + size.y),
    ]
}

/// Pennant flag hanging off a pole top, pointing right
pub fn pennant(pole_top: Vec2, width: f32, height: f32) -> [Vec2; 3] {
    [
        pole_top,
        Vec2::new(pole_top.x + width, pole_top.y + height / 2.0),
        Vec2::new(pole_top.x, pole_top.y + height),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quad_covers_corners() {
        let v = quad(Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0), [1.0; 4]);
        let xs: Vec<f32> = v.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = v.iter().map(|v| v.position[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), 1.0);
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 4.0);
        assert_eq!(ys.iter().cloned().fold(f32::MAX, f32::min), 2.0);
        assert_eq!(ys.iter().cloned().fold(f32::MIN, f32::max), 6.0);
    }

    #[test]
    fn test_polygon_fan_counts() {
        let tri = spike(Vec2::ZERO, Vec2::splat(20.0));
        assert_eq!(polygon(&tri, [1.0; 4]).len(), 3);
        let square = [
            Vec2::ZERO,
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ];
        assert_eq!(polygon(&square, [1.0; 4]).len(), 6);
        assert!(polygon(&square[..2], [1.0; 4]).is_empty());
    }

    #[test]
    fn test_spike_apex_is_top_centre() {
        let s = spike(Vec2::new(10.0, 20.0), Vec2::new(20.0, 20.0));
        assert_eq!(s[1], Vec2::new(20.0, 20.0));
        assert_eq!(s[0].y, 40.0);
    }
}
