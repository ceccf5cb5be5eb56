//! Interpolation from the identity to a transform
//!
//! Two paths are supported:
//! - linear: a componentwise blend, `I + (T - I) * t`
//! - svd: three equal phases that rotate into the right-singular basis,
//!   scale by the singular values, then rotate into the left-singular basis
//!
//! A linear blend from the identity to an arbitrary matrix may cross a
//! singular configuration and flip orientation. The SVD path keeps both
//! rotation phases proper rotations so the grid only ever changes
//! handedness during the scale phase, and only when the target itself is
//! orientation-reversing.

use crate::decompose::{NalgebraSolver, SvdFactors, SvdSolver};
use crate::slerp::slerp;
use linviz_core::vector::{self, Vec2};
use linviz_core::{Transform, TransitionMode};
use nalgebra::{Matrix2, Vector2};
use std::f64::consts::PI;

const ONE_THIRD: f64 = 1.0 / 3.0;
const TWO_THIRDS: f64 = 2.0 / 3.0;

/// Below this |det| a start matrix is treated as non-invertible
const SINGULAR_EPSILON: f64 = 1e-12;

/// Which of the three SVD phases a time value falls in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Rotate the basis onto the columns of `Vt`
    Rotate,
    /// Scale by the singular values
    Scale,
    /// Rotate onto the target
    Align,
}

impl Phase {
    /// Phase and phase-local time in [0, 1]
    pub fn at(time: f64) -> (Phase, f64) {
        if time < ONE_THIRD {
            (Phase::Rotate, time * 3.0)
        } else if time < TWO_THIRDS {
            (Phase::Scale, (time - ONE_THIRD) * 3.0)
        } else {
            (Phase::Align, (time - TWO_THIRDS) * 3.0)
        }
    }
}

/// Interpolated matrix at `time` using the default solver
pub fn interpolate(mode: TransitionMode, transform: &Transform, time: f64) -> Transform {
    interpolate_with(&NalgebraSolver, mode, transform, time)
}

/// Interpolated matrix at `time` using the given SVD solver
///
/// If the solver cannot factor the transform the linear path is used.
pub fn interpolate_with<S: SvdSolver + ?Sized>(
    solver: &S,
    mode: TransitionMode,
    transform: &Transform,
    time: f64,
) -> Transform {
    match mode {
        TransitionMode::Linear => linear(transform, time),
        TransitionMode::Svd => match SvdPath::new(solver, transform) {
            Some(path) => path.at(time),
            None => linear(transform, time),
        },
    }
}

/// `I + (T - I) * time`
pub fn linear(transform: &Transform, time: f64) -> Transform {
    interpolate_between(&Transform::IDENTITY, transform, time)
}

/// Componentwise blend between two arbitrary matrices
///
/// Returns `start` and `end` unchanged at the clamped endpoints.
pub fn interpolate_between(start: &Transform, end: &Transform, time: f64) -> Transform {
    let t = clamp_time(time);
    if t <= 0.0 {
        return *start;
    }
    if t >= 1.0 {
        return *end;
    }
    let blend = |from: f64, to: f64| from * (1.0 - t) + to * t;
    Transform::new(blend(start.a, end.a), blend(start.b, end.b), blend(start.c, end.c), blend(start.d, end.d))
}

/// SVD path from `start` to `end`
///
/// Animates `end * start^-1` from the identity and composes the result with
/// `start`. A non-invertible start has no such relative transform and the
/// linear blend is used instead.
pub fn svd_between<S: SvdSolver + ?Sized>(
    solver: &S,
    start: &Transform,
    end: &Transform,
    time: f64,
) -> Transform {
    let s = start.to_matrix();
    let inverse = match s.try_inverse() {
        Some(inv) if start.determinant().abs() > SINGULAR_EPSILON => inv,
        _ => {
            tracing::debug!(det = start.determinant(), "singular start matrix, using linear path");
            return interpolate_between(start, end, time);
        }
    };
    let t = clamp_time(time);
    if t <= 0.0 {
        return *start;
    }
    if t >= 1.0 {
        return *end;
    }

    let relative = Transform::from_matrix(&(end.to_matrix() * inverse));
    match SvdPath::new(solver, &relative) {
        Some(path) => Transform::from_matrix(&(path.at(t).to_matrix() * s)),
        None => interpolate_between(start, end, t),
    }
}

fn clamp_time(time: f64) -> f64 {
    if time.is_nan() {
        1.0
    } else {
        time.clamp(0.0, 1.0)
    }
}

// ============================================================================
// SVD path
// ============================================================================

/// Orientation-stable factors of a transform: `target = u * diag(scale) * v_t`
///
/// `u` and `v_t` are proper rotations (det = +1). A reflection in the
/// target is carried by a negative entry of `scale`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SvdPath {
    pub u: Matrix2<f64>,
    pub scale: Vector2<f64>,
    pub v_t: Matrix2<f64>,
    pub target: Transform,
}

impl SvdPath {
    /// Factor `target`, or `None` if the solver fails
    pub fn new<S: SvdSolver + ?Sized>(solver: &S, target: &Transform) -> Option<Self> {
        match solver.svd(&target.to_matrix()) {
            Ok(factors) => Some(Self::from_factors(factors, *target)),
            Err(e) => {
                tracing::debug!(error = %e, "SVD unavailable, using linear path");
                None
            }
        }
    }

    /// Re-orient raw factors without changing their product
    ///
    /// Flipping the sign of row k of `Vt` together with column k of `U`
    /// leaves `U S Vt` unchanged because `S` is diagonal. The flipped row is
    /// the one that leaves the smaller rotation.
    pub fn from_factors(factors: SvdFactors, target: Transform) -> Self {
        let SvdFactors { mut u, singular_values, mut v_t } = factors;
        let mut scale = singular_values;

        if v_t.determinant() < 0.0 {
            let k = if v_t[(1, 1)] >= v_t[(0, 0)] { 0 } else { 1 };
            v_t.row_mut(k).neg_mut();
            u.column_mut(k).neg_mut();
        }

        if u.determinant() < 0.0 {
            let k = if u[(1, 1)] >= u[(0, 0)] { 0 } else { 1 };
            u.column_mut(k).neg_mut();
            scale[k] = -scale[k];
        }

        // Negating both rotations is a pair of half-turns that cancel.
        let kept = rotation_angle(&v_t).abs() + rotation_angle(&u).abs();
        let turned = half_turn(rotation_angle(&v_t)).abs() + half_turn(rotation_angle(&u)).abs();
        if turned < kept {
            v_t.neg_mut();
            u.neg_mut();
        }

        Self { u, scale, v_t, target }
    }

    /// Columns of `v_t`: where the basis lands after the first phase
    pub fn rotated(&self) -> (Vec2, Vec2) {
        (self.v_t.column(0).into_owned(), self.v_t.column(1).into_owned())
    }

    /// Columns of `diag(scale) * v_t`: where the basis lands after the second phase
    pub fn scaled(&self) -> (Vec2, Vec2) {
        let sv = Matrix2::from_diagonal(&self.scale) * self.v_t;
        (sv.column(0).into_owned(), sv.column(1).into_owned())
    }

    /// Matrix along the path. Exactly the identity at 0 and the target at 1.
    pub fn at(&self, time: f64) -> Transform {
        let t = clamp_time(time);
        if t <= 0.0 {
            return Transform::IDENTITY;
        }
        if t >= 1.0 {
            return self.target;
        }

        let (phase, local) = Phase::at(t);
        let (x, y) = match phase {
            Phase::Rotate => {
                let (v1, v2) = self.rotated();
                (slerp(&Vec2::new(1.0, 0.0), &v1, local), slerp(&Vec2::new(0.0, 1.0), &v2, local))
            }
            Phase::Scale => {
                let (v1, v2) = self.rotated();
                let (s1, s2) = self.scaled();
                (vector::lerp(&v1, &s1, local), vector::lerp(&v2, &s2, local))
            }
            Phase::Align => {
                let (s1, s2) = self.scaled();
                (slerp(&s1, &self.target.x_column(), local), slerp(&s2, &self.target.y_column(), local))
            }
        };
        Transform::from_columns(x, y)
    }
}

/// Counter-clockwise angle of a rotation matrix, in (-pi, pi]
fn rotation_angle(r: &Matrix2<f64>) -> f64 {
    r[(1, 0)].atan2(r[(0, 0)])
}

fn half_turn(angle: f64) -> f64 {
    if angle > 0.0 {
        angle - PI
    } else {
        angle + PI
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decompose::DecompositionError;

    const EPS: f64 = 1e-9;

    fn samples() -> Vec<Transform> {
        vec![
            Transform::IDENTITY,
            Transform::new(1.0, -0.5, -0.5, 1.0),
            Transform::new(1.0, 0.0, 1.0, 1.0),
            Transform::new(0.0, 1.0, -1.0, 0.0),
            Transform::new(2.0, 0.0, 0.0, 0.5),
            Transform::new(-1.0, 0.0, 0.0, 1.0),
            Transform::new(0.3, -1.7, 1.2, 0.4),
            Transform::new(-1.5, 0.2, 0.7, -0.9),
            Transform::new(1.0, 2.0, 0.5, 1.0),
            Transform::new(1.0, 1.0, 1.0, 1.0),
            Transform::new(0.0, 0.0, 0.0, 0.0),
            Transform::new(-1.0, 0.0, 0.0, -1.0),
        ]
    }

    #[test]
    fn test_linear_endpoints() {
        for t in samples() {
            assert_eq!(interpolate(TransitionMode::Linear, &t, 0.0), Transform::IDENTITY);
            assert_eq!(interpolate(TransitionMode::Linear, &t, 1.0), t);
        }
    }

    #[test]
    fn test_linear_midpoint() {
        let t = Transform::new(3.0, 2.0, -2.0, 0.0);
        let mid = linear(&t, 0.5);
        assert_eq!(mid, Transform::new(2.0, 1.0, -1.0, 0.5));
    }

    #[test]
    fn test_rotation_scenario_linear() {
        let t = Transform::new(0.0, 1.0, -1.0, 0.0);
        assert_eq!(interpolate(TransitionMode::Linear, &t, 1.0), t);
    }

    #[test]
    fn test_svd_endpoints() {
        for t in samples() {
            assert_eq!(interpolate(TransitionMode::Svd, &t, 0.0), Transform::IDENTITY);
            assert_eq!(interpolate(TransitionMode::Svd, &t, 1.0), t);
            // just inside the end stays close to the target
            let near = interpolate(TransitionMode::Svd, &t, 1.0 - 1e-12);
            assert!(near.approx_eq(&t, 1e-6), "{:?} vs {:?}", near, t);
        }
    }

    #[test]
    fn test_svd_factors_reconstruct_target() {
        for t in samples() {
            let path = SvdPath::new(&NalgebraSolver, &t).unwrap();
            let m = path.u * Matrix2::from_diagonal(&path.scale) * path.v_t;
            assert!(Transform::from_matrix(&m).approx_eq(&t, EPS), "{:?}", t);
            assert!((path.u.determinant() - 1.0).abs() < EPS);
            assert!((path.v_t.determinant() - 1.0).abs() < EPS);
        }
    }

    #[test]
    fn test_svd_phase_boundaries_are_continuous() {
        for t in samples() {
            for boundary in [ONE_THIRD, TWO_THIRDS] {
                let before = interpolate(TransitionMode::Svd, &t, boundary - 1e-10);
                let after = interpolate(TransitionMode::Svd, &t, boundary + 1e-10);
                assert!(before.approx_eq(&after, 1e-6), "jump at {} for {:?}: {:?} vs {:?}", boundary, t, before, after);
            }
        }
    }

    #[test]
    fn test_svd_rotation_phases_preserve_orientation() {
        // Positive-determinant targets never pass through a reflection. An
        // exact half turn has no shorter arc and is left out.
        let half_turn = Transform::new(-1.0, 0.0, 0.0, -1.0);
        for t in samples().into_iter().filter(|t| t.determinant() > 1e-6 && *t != half_turn) {
            for i in 0..=100 {
                let m = interpolate(TransitionMode::Svd, &t, i as f64 / 100.0);
                assert!(m.determinant() > 0.0, "orientation flip at {} for {:?}", i, t);
            }
        }
    }

    #[test]
    fn test_svd_diagonal_scenario() {
        let t = Transform::new(2.0, 0.0, 0.0, 0.5);
        let path = SvdPath::new(&NalgebraSolver, &t).unwrap();
        assert!(Transform::from_matrix(&path.v_t).approx_eq(&Transform::IDENTITY, EPS));
        assert!(Transform::from_matrix(&path.u).approx_eq(&Transform::IDENTITY, EPS));

        // phase 1 is a no-op
        for i in 0..=10 {
            let m = path.at(ONE_THIRD * i as f64 / 10.0);
            assert!(m.approx_eq(&Transform::IDENTITY, EPS), "{:?}", m);
        }
        // phase 2 scales the basis by 2 and 0.5
        let mid = path.at(0.5);
        assert!(mid.approx_eq(&Transform::new(1.5, 0.0, 0.0, 0.75), EPS), "{:?}", mid);
        // phase 3 is a no-op
        for i in 0..10 {
            let m = path.at(TWO_THIRDS + ONE_THIRD * i as f64 / 10.0);
            assert!(m.approx_eq(&t, EPS), "{:?}", m);
        }
    }

    #[test]
    fn test_svd_rotation_target_is_pure_rotation() {
        let t = Transform::new(0.0, 1.0, -1.0, 0.0);
        for i in 0..=20 {
            let m = interpolate(TransitionMode::Svd, &t, i as f64 / 20.0);
            assert!((m.determinant() - 1.0).abs() < 1e-9);
            assert!((m.x_column().norm() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_time_is_clamped() {
        let t = Transform::new(2.0, 1.0, 0.0, 1.0);
        assert_eq!(interpolate(TransitionMode::Svd, &t, 4.0), t);
        assert_eq!(interpolate(TransitionMode::Linear, &t, -1.0), Transform::IDENTITY);
    }

    struct FailingSolver;

    impl SvdSolver for FailingSolver {
        fn svd(&self, _m: &Matrix2<f64>) -> Result<SvdFactors, DecompositionError> {
            Err(DecompositionError::SolverFailure("test".to_string()))
        }
    }

    #[test]
    fn test_solver_failure_uses_linear_path() {
        let t = Transform::new(2.0, 1.0, 0.0, 1.0);
        let m = interpolate_with(&FailingSolver, TransitionMode::Svd, &t, 0.5);
        assert_eq!(m, linear(&t, 0.5));
    }

    #[test]
    fn test_svd_between_endpoints() {
        let start = Transform::new(1.0, 0.5, 0.0, 1.0);
        let end = Transform::new(0.0, 2.0, -1.0, 0.0);
        assert_eq!(svd_between(&NalgebraSolver, &start, &end, 0.0), start);
        assert_eq!(svd_between(&NalgebraSolver, &start, &end, 1.0), end);
        let near = svd_between(&NalgebraSolver, &start, &end, 0.999_999_999);
        assert!(near.approx_eq(&end, 1e-6));
    }

    #[test]
    fn test_svd_between_singular_start_is_linear() {
        let start = Transform::new(0.0, 0.0, 0.0, 0.0);
        let end = Transform::new(2.0, 0.0, 0.0, 2.0);
        assert_eq!(svd_between(&NalgebraSolver, &start, &end, 0.5), Transform::new(1.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn test_linear_lands_exactly_on_target() {
        let t = Transform::new(0.3, -1.7, 1.2, 0.4);
        assert_eq!(interpolate(TransitionMode::Linear, &t, 1.0), t);
        assert_eq!(linear(&t, 1.0).a, 0.3);
        let start = Transform::new(0.0, 0.0, 0.0, 0.0);
        assert_eq!(svd_between(&NalgebraSolver, &start, &t, 1.0), t);
        assert_eq!(svd_between(&NalgebraSolver, &start, &t, 0.0), start);
        assert_eq!(interpolate_with(&FailingSolver, TransitionMode::Svd, &t, 1.0), t);
        // every tenths-rounded entry survives the trip
        for i in -20..=20 {
            let v = i as f64 / 10.0;
            let target = Transform::new(v, -v, 0.1 * i as f64, 1.0 - v);
            assert_eq!(linear(&target, 1.0), target);
        }
    }

    #[test]
    fn test_phase_lookup() {
        assert_eq!(Phase::at(0.0), (Phase::Rotate, 0.0));
        assert_eq!(Phase::at(0.5).0, Phase::Scale);
        assert_eq!(Phase::at(0.9).0, Phase::Align);
    }
}
