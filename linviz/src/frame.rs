//! Frame composition
//!
//! One pass produces everything the rendering collaborator draws, in order:
//! background grid, transformed foreground grid and unit circle, image,
//! eigenvector rays, basis arrows, handles.
//!
//! Two coordinate spaces appear in a [`Frame`]:
//! - surface: pixels relative to the canvas center, y down
//! - local: surface coordinates before `surface_transform` is applied.
//!   The foreground grid, unit circle and image live here so they deform
//!   with the interpolated matrix.
//!
//! Math coordinates are y up, so a math vector (x, y) is drawn at
//! `(x, -y) * unit`. The same flip makes the off-diagonal entries of
//! `surface_transform` the negated `b` and `c`.

use crate::config::VizConfig;
use crate::drag::{HandleAnchor, HandleKind};
use crate::geometry::{self, palette, Arrow, ArrowStyle, LineGroup, Rgb, LINE_WIDTH};
use linviz_core::{AnimationState, Transform, TransitionMode, Vec2, Visibility};
use linviz_matrix::{EigenRay, EigenSolver, NalgebraSolver, SvdSolver};
use serde::Serialize;

/// State a frame is composed from
#[derive(Debug, Clone, Copy)]
pub struct FrameInput<'a> {
    pub transform: &'a Transform,
    pub animation: &'a AnimationState,
    pub visibility: &'a Visibility,
    /// Size of the filtered image, when one is ready
    pub image_size: Option<(usize, usize)>,
    pub anchors: [HandleAnchor; 2],
    pub hovered: Option<HandleKind>,
    pub captured: Option<HandleKind>,
}

/// Where the filtered image is drawn, in local coordinates
///
/// The bottom-left corner of the image sits on the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ImagePlacement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Polyline {
    pub color: Rgb,
    pub width: f64,
    pub points: Vec<Vec2>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HandleView {
    pub kind: HandleKind,
    pub position: Vec2,
    pub radius: f64,
    pub hovered: bool,
    pub captured: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub canvas_size: f64,
    /// Canvas position of the math origin
    pub origin: Vec2,
    pub time: f64,
    pub mode: TransitionMode,
    /// Interpolated matrix in math coordinates
    pub matrix: Transform,
    /// `(a, b, c, d, e, f)` mapping local to canvas coordinates:
    /// `x' = a*x + c*y + e`, `y' = b*x + d*y + f`
    pub surface_transform: [f64; 6],
    pub background: Vec<LineGroup>,
    pub foreground: Vec<LineGroup>,
    pub unit_circle: Option<Polyline>,
    pub image: Option<ImagePlacement>,
    pub eigen_arrows: Vec<Arrow>,
    pub basis: [Arrow; 2],
    pub handles: [HandleView; 2],
}

pub struct FrameComposer<S = NalgebraSolver> {
    config: VizConfig,
    arrow_style: ArrowStyle,
    solver: S,
}

impl FrameComposer<NalgebraSolver> {
    pub fn new(config: VizConfig) -> Self {
        Self::with_solver(config, NalgebraSolver)
    }
}

impl<S: EigenSolver + SvdSolver> FrameComposer<S> {
    pub fn with_solver(config: VizConfig, solver: S) -> Self {
        Self { config, arrow_style: ArrowStyle::default(), solver }
    }

    pub fn config(&self) -> &VizConfig {
        &self.config
    }

    /// Math vector to surface pixels
    fn to_surface(&self, v: &Vec2) -> Vec2 {
        Vec2::new(v.x, -v.y) * self.config.unit
    }

    pub fn compose(&self, input: &FrameInput<'_>) -> Frame {
        let time = input.animation.time();
        let mode = input.animation.mode;
        let matrix = linviz_matrix::interpolate_with(&self.solver, mode, input.transform, time);
        let origin = self.config.origin();

        let unit_circle = input.visibility.unit_circle.then(|| Polyline {
            color: palette::UNIT_CIRCLE,
            width: LINE_WIDTH,
            points: geometry::circle(self.config.unit, self.config.unit_circle_segments),
        });

        let image = match input.image_size {
            Some((w, h)) if input.visibility.image && w > 0 && h > 0 => Some(ImagePlacement {
                x: 0.0,
                y: -(h as f64),
                width: w as f64,
                height: h as f64,
            }),
            _ => None,
        };

        let eigen_arrows = if input.visibility.eigenvectors {
            self.eigen_arrows(input.transform, time)
        } else {
            Vec::new()
        };

        let frame = Frame {
            canvas_size: self.config.canvas_size,
            origin: Vec2::new(origin, origin),
            time,
            mode,
            matrix,
            surface_transform: surface_transform(&matrix, origin),
            background: self.background(),
            foreground: self.foreground(),
            unit_circle,
            image,
            eigen_arrows,
            basis: self.basis_arrows(&matrix),
            handles: input.anchors.map(|anchor| HandleView {
                kind: anchor.kind,
                position: anchor.position,
                radius: self.config.handle_radius,
                hovered: input.hovered == Some(anchor.kind),
                captured: input.captured == Some(anchor.kind),
            }),
        };

        tracing::trace!(
            time,
            eigen_arrows = frame.eigen_arrows.len(),
            image = frame.image.is_some(),
            "composed frame"
        );
        frame
    }

    /// Static grid behind everything, faint then bold
    pub fn background(&self) -> Vec<LineGroup> {
        let extent = self.config.origin();
        vec![
            LineGroup {
                color: palette::FINE_GRID,
                width: LINE_WIDTH,
                lines: geometry::grid_lines(0.0, self.config.fine_grid_spacing, extent),
            },
            LineGroup {
                color: palette::COARSE_GRID,
                width: LINE_WIDTH,
                lines: geometry::grid_lines(0.0, self.config.coarse_grid_spacing, extent),
            },
        ]
    }

    /// Transformed grid and axes, in local coordinates
    pub fn foreground(&self) -> Vec<LineGroup> {
        let step = self.config.unit;
        let extent = self.config.foreground_extent;
        vec![
            LineGroup {
                color: palette::FOREGROUND_GRID,
                width: LINE_WIDTH,
                lines: geometry::grid_lines(step, step, extent),
            },
            LineGroup { color: palette::AXIS, width: LINE_WIDTH, lines: geometry::axes(extent) },
        ]
    }

    /// Eigen rays as chains of short arrows, in surface coordinates
    pub fn eigen_arrows(&self, transform: &Transform, time: f64) -> Vec<Arrow> {
        linviz_matrix::eigen_rays_with(&self.solver, transform, time)
            .into_iter()
            .flat_map(|ray: EigenRay| ray.segments(self.config.eigen_segments))
            .map(|(from, to)| {
                Arrow::new(self.to_surface(&from), self.to_surface(&to), palette::EIGEN, &self.arrow_style)
            })
            .collect()
    }

    /// Arrows for the interpolated basis vectors, in surface coordinates
    pub fn basis_arrows(&self, matrix: &Transform) -> [Arrow; 2] {
        let origin = Vec2::zeros();
        [
            Arrow::new(origin, self.to_surface(&matrix.x_column()), palette::X_BASIS, &self.arrow_style),
            Arrow::new(origin, self.to_surface(&matrix.y_column()), palette::Y_BASIS, &self.arrow_style),
        ]
    }
}

/// Drawing-surface affine for an interpolated math matrix
pub fn surface_transform(matrix: &Transform, origin: f64) -> [f64; 6] {
    [matrix.a, -matrix.b, -matrix.c, matrix.d, origin, origin]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drag::DragController;

    fn compose(transform: Transform, time: f64, mode: TransitionMode, visibility: Visibility) -> Frame {
        let composer = FrameComposer::new(VizConfig::default());
        let animation = AnimationState::new(time, mode).unwrap();
        let anchors = DragController::default().anchors(&transform);
        composer.compose(&FrameInput {
            transform: &transform,
            animation: &animation,
            visibility: &visibility,
            image_size: Some((250, 125)),
            anchors,
            hovered: Some(HandleKind::Y),
            captured: None,
        })
    }

    #[test]
    fn test_surface_transform_flips_off_diagonal() {
        let t = Transform::new(1.0, 0.5, -0.25, 2.0);
        assert_eq!(surface_transform(&t, 450.0), [1.0, -0.5, 0.25, 2.0, 450.0, 450.0]);
    }

    #[test]
    fn test_rotation_frame_has_no_eigen_arrows() {
        let frame = compose(Transform::new(0.0, 1.0, -1.0, 0.0), 1.0, TransitionMode::Linear, Visibility::default());
        assert_eq!(frame.matrix, Transform::new(0.0, 1.0, -1.0, 0.0));
        assert!(frame.eigen_arrows.is_empty());
        // the x basis vector points up on screen
        assert!((frame.basis[0].shaft.to - Vec2::new(0.0, -74.0)).norm() < 1e-9);
    }

    #[test]
    fn test_eigen_arrows_count_and_direction() {
        let frame = compose(Transform::new(2.0, 0.0, 0.0, 3.0), 1.0, TransitionMode::Linear, Visibility::default());
        // two rays, both directions, 60 segments each
        assert_eq!(frame.eigen_arrows.len(), 2 * 2 * 60);
        let first = &frame.eigen_arrows[0];
        assert_eq!(first.shaft.from, Vec2::zeros());
        assert_eq!(first.color, palette::EIGEN);
    }

    #[test]
    fn test_hidden_layers_are_omitted() {
        let hidden = Visibility { image: false, eigenvectors: false, unit_circle: false };
        let frame = compose(Transform::new(2.0, 0.0, 0.0, 3.0), 0.5, TransitionMode::Svd, hidden);
        assert!(frame.eigen_arrows.is_empty());
        assert!(frame.image.is_none());
        assert!(frame.unit_circle.is_none());
    }

    #[test]
    fn test_image_placement_and_unit_circle() {
        let vis = Visibility { image: true, eigenvectors: true, unit_circle: true };
        let frame = compose(Transform::IDENTITY, 1.0, TransitionMode::Linear, vis);
        assert_eq!(frame.image, Some(ImagePlacement { x: 0.0, y: -125.0, width: 250.0, height: 125.0 }));
        let circle = frame.unit_circle.unwrap();
        assert_eq!(circle.points.len(), 97);
    }

    #[test]
    fn test_handles_reflect_hover_state() {
        let frame = compose(Transform::IDENTITY, 0.3, TransitionMode::Linear, Visibility::default());
        assert_eq!(frame.handles[0].position, Vec2::new(80.0, 0.0));
        assert!(!frame.handles[0].hovered);
        assert!(frame.handles[1].hovered);
        assert!(!frame.handles[1].captured);
    }

    #[test]
    fn test_time_zero_is_identity() {
        let frame = compose(Transform::new(0.3, -1.2, 2.0, 0.1), 0.0, TransitionMode::Svd, Visibility::default());
        assert_eq!(frame.matrix, Transform::IDENTITY);
        assert_eq!(frame.surface_transform, [1.0, -0.0, -0.0, 1.0, 450.0, 450.0]);
    }
}
