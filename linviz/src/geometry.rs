//! Drawing primitives handed to the rendering collaborator
//!
//! Everything here is plain data in drawing-surface pixels with the origin
//! at the canvas center and y growing downward.

use linviz_core::Vec2;
use serde::Serialize;
use std::f64::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Colors used by the frame composer
pub mod palette {
    use super::Rgb;

    pub const FINE_GRID: Rgb = Rgb(30, 30, 30);
    pub const COARSE_GRID: Rgb = Rgb(58, 58, 58);
    pub const FOREGROUND_GRID: Rgb = Rgb(69, 146, 165);
    pub const AXIS: Rgb = Rgb(255, 255, 255);
    pub const UNIT_CIRCLE: Rgb = Rgb(255, 255, 255);
    pub const EIGEN: Rgb = Rgb(246, 194, 138);
    pub const X_BASIS: Rgb = Rgb(151, 187, 110);
    pub const Y_BASIS: Rgb = Rgb(239, 131, 101);
}

/// Stroke width of grid lines and axes
pub const LINE_WIDTH: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Line {
    pub from: Vec2,
    pub to: Vec2,
}

impl Line {
    pub fn new(from: Vec2, to: Vec2) -> Self {
        Self { from, to }
    }
}

/// A set of lines stroked with one color and width
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineGroup {
    pub color: Rgb,
    pub width: f64,
    pub lines: Vec<Line>,
}

// ============================================================================
// Arrows
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ArrowStyle {
    pub width: f64,
    pub head_length: f64,
    /// Half-angle of the head, radians
    pub head_angle: f64,
}

impl Default for ArrowStyle {
    fn default() -> Self {
        Self { width: 6.0, head_length: 14.0, head_angle: PI / 7.0 }
    }
}

/// A shaft plus a filled triangular head
///
/// The shaft ends `width` short of the requested tip so the stroke's line
/// cap does not poke through the head.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Arrow {
    pub shaft: Line,
    pub head: [Vec2; 3],
    pub color: Rgb,
    pub width: f64,
}

impl Arrow {
    pub fn new(from: Vec2, to: Vec2, color: Rgb, style: &ArrowStyle) -> Self {
        let delta = to - from;
        let angle = delta.y.atan2(delta.x);
        let (sin, cos) = angle.sin_cos();
        let end = Vec2::new(to.x - style.width * cos, to.y - style.width * sin);

        let barb = |a: f64| Vec2::new(end.x - style.head_length * a.cos(), end.y - style.head_length * a.sin());
        Self {
            shaft: Line::new(from, end),
            head: [end, barb(angle - style.head_angle), barb(angle + style.head_angle)],
            color,
            width: style.width,
        }
    }
}

// ============================================================================
// Grids
// ============================================================================

/// Offsets `0, step, 2*step, ...` strictly below `extent`, mirrored to both sides
fn grid_offsets(start: f64, step: f64, extent: f64) -> Vec<f64> {
    let mut out = Vec::new();
    let mut i = 0usize;
    loop {
        let v = start + step * i as f64;
        if v >= extent {
            break;
        }
        out.push(v);
        out.push(-v);
        i += 1;
    }
    out
}

/// Vertical and horizontal lines at `start + k*step` on both sides of the origin
pub fn grid_lines(start: f64, step: f64, extent: f64) -> Vec<Line> {
    let offsets = grid_offsets(start, step, extent);
    let mut lines = Vec::with_capacity(offsets.len() * 2);
    for &x in &offsets {
        lines.push(Line::new(Vec2::new(x, -extent), Vec2::new(x, extent)));
    }
    for &y in &offsets {
        lines.push(Line::new(Vec2::new(-extent, y), Vec2::new(extent, y)));
    }
    lines
}

pub fn axes(extent: f64) -> Vec<Line> {
    vec![
        Line::new(Vec2::new(0.0, -extent), Vec2::new(0.0, extent)),
        Line::new(Vec2::new(-extent, 0.0), Vec2::new(extent, 0.0)),
    ]
}

/// Closed polyline approximating a circle; first point repeated at the end
pub fn circle(radius: f64, segments: usize) -> Vec<Vec2> {
    let segments = segments.max(3);
    (0..=segments)
        .map(|i| {
            let theta = 2.0 * PI * (i % segments) as f64 / segments as f64;
            Vec2::new(radius * theta.cos(), radius * theta.sin())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrow_geometry() {
        let arrow = Arrow::new(Vec2::zeros(), Vec2::new(80.0, 0.0), palette::X_BASIS, &ArrowStyle::default());
        assert!((arrow.shaft.to - Vec2::new(74.0, 0.0)).norm() < 1e-12);
        assert_eq!(arrow.head[0], arrow.shaft.to);
        // barbs are symmetric about the shaft and behind the tip
        assert!((arrow.head[1].y + arrow.head[2].y).abs() < 1e-12);
        assert!(arrow.head[1].x < 74.0);
        let len = (arrow.head[1] - arrow.head[0]).norm();
        assert!((len - 14.0).abs() < 1e-12);
    }

    #[test]
    fn test_background_grid_counts() {
        // 0, 40, ..., 440 mirrored: 12 offsets each side
        let lines = grid_lines(0.0, 40.0, 450.0);
        assert_eq!(lines.len(), 2 * 2 * 12);
        assert!(lines.iter().all(|l| l.from.x.abs() <= 450.0 && l.to.y.abs() <= 450.0));
    }

    #[test]
    fn test_foreground_grid_skips_axes() {
        let lines = grid_lines(80.0, 80.0, 4500.0);
        assert!(lines.iter().all(|l| l.from.x != 0.0 || l.to.x != 0.0));
        assert!(lines.iter().any(|l| l.from.x == 4480.0));
    }

    #[test]
    fn test_circle_is_closed() {
        let pts = circle(80.0, 8);
        assert_eq!(pts.len(), 9);
        assert_eq!(pts[0], pts[8]);
        assert!(pts.iter().all(|p| (p.norm() - 80.0).abs() < 1e-9));
    }
}
