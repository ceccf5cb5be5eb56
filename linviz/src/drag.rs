//! Drag-to-edit controller for the two column handles
//!
//! Pointer positions are in drawing-surface pixels relative to the origin,
//! y growing downward. A handle for column (x, y) sits at `(x, -y) * unit`.

use crate::config::VizConfig;
use linviz_core::vector::{self, Vec2};
use linviz_core::{Transform, VizError};
use serde::{Deserialize, Serialize};

/// Which column a handle edits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleKind {
    /// First column (a, b)
    X,
    /// Second column (c, d)
    Y,
}

impl HandleKind {
    pub const ALL: [HandleKind; 2] = [HandleKind::X, HandleKind::Y];

    pub fn column(self, transform: &Transform) -> Vec2 {
        match self {
            HandleKind::X => transform.x_column(),
            HandleKind::Y => transform.y_column(),
        }
    }
}

/// A captured handle and the pointer offset at capture time
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DragHandle {
    pub kind: HandleKind,
    /// `pointer - anchor` when the gesture started
    pub offset: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HandleAnchor {
    pub kind: HandleKind,
    pub position: Vec2,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DragController {
    unit: f64,
    capture_radius: f64,
    captured: Option<DragHandle>,
}

impl DragController {
    pub fn new(unit: f64, capture_radius: f64) -> Self {
        Self { unit, capture_radius, captured: None }
    }

    pub fn from_config(config: &VizConfig) -> Self {
        Self::new(config.unit, config.capture_radius())
    }

    pub fn captured(&self) -> Option<DragHandle> {
        self.captured
    }

    pub fn is_dragging(&self) -> bool {
        self.captured.is_some()
    }

    pub fn anchor(&self, kind: HandleKind, transform: &Transform) -> Vec2 {
        let col = kind.column(transform);
        Vec2::new(col.x, -col.y) * self.unit
    }

    pub fn anchors(&self, transform: &Transform) -> [HandleAnchor; 2] {
        HandleKind::ALL.map(|kind| HandleAnchor { kind, position: self.anchor(kind, transform) })
    }

    /// Nearest handle within the capture radius
    ///
    /// When both are in range the strictly nearer one wins; an exact tie
    /// goes to the x-handle.
    pub fn hit(&self, transform: &Transform, pointer: &Vec2) -> Option<HandleKind> {
        if !vector::is_finite(pointer) {
            return None;
        }
        let mut best: Option<(HandleKind, f64)> = None;
        for anchor in self.anchors(transform) {
            let dist = vector::distance(pointer, &anchor.position);
            if dist > self.capture_radius {
                continue;
            }
            match best {
                Some((_, d)) if d <= dist => {}
                _ => best = Some((anchor.kind, dist)),
            }
        }
        best.map(|(kind, _)| kind)
    }

    /// Handle under the pointer, for cursor feedback
    pub fn hover(&self, transform: &Transform, pointer: &Vec2) -> Option<HandleKind> {
        match self.captured {
            Some(handle) => Some(handle.kind),
            None => self.hit(transform, pointer),
        }
    }

    /// Start a gesture. Returns the captured handle, if any.
    pub fn pointer_down(&mut self, transform: &Transform, pointer: &Vec2) -> Option<DragHandle> {
        self.captured = self.hit(transform, pointer).map(|kind| DragHandle {
            kind,
            offset: pointer - self.anchor(kind, transform),
        });
        if let Some(handle) = self.captured {
            tracing::debug!(handle = ?handle.kind, "handle captured");
        }
        self.captured
    }

    /// Move the captured column to follow the pointer
    ///
    /// Returns `Ok(false)` when nothing is captured. A non-finite result is
    /// rejected and the transform left unchanged.
    pub fn pointer_move(&self, transform: &mut Transform, pointer: &Vec2) -> Result<bool, VizError> {
        let handle = match self.captured {
            Some(h) => h,
            None => return Ok(false),
        };
        let anchor = pointer - handle.offset;
        let column = Vec2::new(anchor.x / self.unit, -anchor.y / self.unit);
        match handle.kind {
            HandleKind::X => transform.set_x_column(column)?,
            HandleKind::Y => transform.set_y_column(column)?,
        }
        Ok(true)
    }

    /// End the gesture, returning the handle that was released
    pub fn pointer_up(&mut self) -> Option<DragHandle> {
        self.captured.take()
    }
}

impl Default for DragController {
    fn default() -> Self {
        Self::from_config(&VizConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_positions() {
        let ctrl = DragController::default();
        let t = Transform::new(1.0, 0.5, -0.5, 1.0);
        assert_eq!(ctrl.anchor(HandleKind::X, &t), Vec2::new(80.0, -40.0));
        assert_eq!(ctrl.anchor(HandleKind::Y, &t), Vec2::new(-40.0, -80.0));
    }

    #[test]
    fn test_capture_and_drag_x_handle() {
        let mut ctrl = DragController::default();
        let mut t = Transform::IDENTITY;

        let handle = ctrl.pointer_down(&t, &Vec2::new(80.0, 0.0)).unwrap();
        assert_eq!(handle.kind, HandleKind::X);
        assert_eq!(handle.offset, Vec2::zeros());

        assert!(ctrl.pointer_move(&mut t, &Vec2::new(160.0, 0.0)).unwrap());
        assert_eq!(t.a, 2.0);
        assert_eq!(t.b, 0.0);
        assert_eq!(t.y_column(), Vec2::new(0.0, 1.0));

        assert_eq!(ctrl.pointer_up().map(|h| h.kind), Some(HandleKind::X));
        assert!(!ctrl.is_dragging());
    }

    #[test]
    fn test_offset_is_preserved() {
        let mut ctrl = DragController::default();
        let mut t = Transform::IDENTITY;
        // grab the y-handle at (0, -80) five pixels to its right
        let handle = ctrl.pointer_down(&t, &Vec2::new(5.0, -80.0)).unwrap();
        assert_eq!(handle.kind, HandleKind::Y);
        assert_eq!(handle.offset, Vec2::new(5.0, 0.0));

        ctrl.pointer_move(&mut t, &Vec2::new(85.0, -160.0)).unwrap();
        assert_eq!(t.c, 1.0);
        assert_eq!(t.d, 2.0);
    }

    #[test]
    fn test_miss_captures_nothing() {
        let mut ctrl = DragController::default();
        let mut t = Transform::IDENTITY;
        assert!(ctrl.pointer_down(&t, &Vec2::new(200.0, 200.0)).is_none());
        assert!(!ctrl.pointer_move(&mut t, &Vec2::new(0.0, 0.0)).unwrap());
        assert_eq!(t, Transform::IDENTITY);
    }

    #[test]
    fn test_nearer_handle_wins_when_both_in_range() {
        let ctrl = DragController::default();
        // handles at (80, 0) and (80, -16)
        let t = Transform::new(1.0, 0.0, 1.0, 0.2);
        assert_eq!(ctrl.hit(&t, &Vec2::new(80.0, 2.0)), Some(HandleKind::X));
        assert_eq!(ctrl.hit(&t, &Vec2::new(80.0, -14.0)), Some(HandleKind::Y));
        assert_eq!(ctrl.hit(&t, &Vec2::new(80.0, -8.0)), Some(HandleKind::X));
    }

    #[test]
    fn test_capture_radius_boundary() {
        let ctrl = DragController::default();
        let t = Transform::IDENTITY;
        assert_eq!(ctrl.hit(&t, &Vec2::new(100.0, 0.0)), Some(HandleKind::X));
        assert_eq!(ctrl.hit(&t, &Vec2::new(100.5, 0.0)), None);
    }

    #[test]
    fn test_hover_reports_captured_handle() {
        let mut ctrl = DragController::default();
        let t = Transform::IDENTITY;
        assert_eq!(ctrl.hover(&t, &Vec2::new(0.0, -80.0)), Some(HandleKind::Y));
        ctrl.pointer_down(&t, &Vec2::new(0.0, -80.0));
        assert_eq!(ctrl.hover(&t, &Vec2::new(500.0, 500.0)), Some(HandleKind::Y));
    }

    #[test]
    fn test_non_finite_move_is_rejected() {
        let mut ctrl = DragController::default();
        let mut t = Transform::IDENTITY;
        ctrl.pointer_down(&t, &Vec2::new(80.0, 0.0));
        assert!(ctrl.pointer_move(&mut t, &Vec2::new(f64::INFINITY, 0.0)).is_err());
        assert_eq!(t, Transform::IDENTITY);
    }
}
