//! Eigenvector rays
//!
//! Each real eigenpair becomes a ray through the origin whose length grows
//! from 1 toward the eigenvalue as time goes from 0 to 1. A transform with
//! no real eigen-decomposition simply has no rays.

use crate::decompose::{EigenSolver, Eigenpair, NalgebraSolver};
use linviz_core::vector::{self, Vec2};
use linviz_core::Transform;
use serde::Serialize;

/// One eigen direction at a given time, in math coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EigenRay {
    pub eigenvalue: f64,
    /// Unit eigenvector
    pub direction: Vec2,
    /// `direction` scaled toward `direction * eigenvalue` by time
    pub tip: Vec2,
}

impl EigenRay {
    /// `u + (u * value - u) * time`
    pub fn grow(pair: &Eigenpair, time: f64) -> Option<Self> {
        let u = vector::normalize(&pair.vector);
        if !vector::is_finite(&u) || !pair.value.is_finite() {
            return None;
        }
        let tip = u + (u * pair.value - u) * time;
        Some(Self { eigenvalue: pair.value, direction: u, tip })
    }

    /// Split the ray into `count` equal segments in each direction from
    /// the origin. Segment `i` runs from `tip * i` to `tip * (i + 1)`.
    pub fn segments(&self, count: usize) -> Vec<(Vec2, Vec2)> {
        let mut out = Vec::with_capacity(count * 2);
        for sign in [1.0, -1.0] {
            let step = self.tip * sign;
            for i in 0..count {
                out.push((step * i as f64, step * (i + 1) as f64));
            }
        }
        out
    }
}

/// Rays for `transform` at `time` using the default solver
pub fn eigen_rays(transform: &Transform, time: f64) -> Vec<EigenRay> {
    eigen_rays_with(&NalgebraSolver, transform, time)
}

/// Rays for `transform` at `time`, empty when there is no real decomposition
pub fn eigen_rays_with<S: EigenSolver + ?Sized>(solver: &S, transform: &Transform, time: f64) -> Vec<EigenRay> {
    match solver.eigenpairs(&transform.to_matrix()) {
        Ok(pairs) => pairs.iter().filter_map(|p| EigenRay::grow(p, time)).collect(),
        Err(e) => {
            tracing::debug!(error = %e, "no real eigenvectors");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_has_no_rays() {
        let t = Transform::new(0.0, 1.0, -1.0, 0.0);
        assert!(eigen_rays(&t, 1.0).is_empty());
        assert!(eigen_rays(&t, 0.0).is_empty());
    }

    #[test]
    fn test_non_finite_transform_has_no_rays() {
        let t = Transform::new(f64::NAN, 0.0, 0.0, 1.0);
        assert!(eigen_rays(&t, 1.0).is_empty());
    }

    #[test]
    fn test_diagonal_rays_grow_to_eigenvalue() {
        let t = Transform::new(3.0, 0.0, 0.0, 0.5);
        let rays = eigen_rays(&t, 1.0);
        assert_eq!(rays.len(), 2);
        for ray in &rays {
            assert!((ray.tip - ray.direction * ray.eigenvalue).norm() < 1e-9);
            assert!((ray.direction.norm() - 1.0).abs() < 1e-12);
        }
        let mut values: Vec<f64> = rays.iter().map(|r| r.eigenvalue).collect();
        values.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert!((values[0] - 0.5).abs() < 1e-9);
        assert!((values[1] - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_rays_start_at_unit_length() {
        let t = Transform::new(2.0, 1.0, 1.0, 2.0);
        for ray in eigen_rays(&t, 0.0) {
            assert!((ray.tip.norm() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_halfway_growth() {
        let pair = Eigenpair { value: 3.0, vector: Vec2::new(0.0, 2.0) };
        let ray = EigenRay::grow(&pair, 0.5).unwrap();
        assert_eq!(ray.direction, Vec2::new(0.0, 1.0));
        assert!((ray.tip - Vec2::new(0.0, 2.0)).norm() < 1e-12);
    }

    #[test]
    fn test_zero_vector_is_skipped() {
        let pair = Eigenpair { value: 1.0, vector: Vec2::zeros() };
        assert!(EigenRay::grow(&pair, 0.5).is_none());
    }

    #[test]
    fn test_segments_cover_both_directions() {
        let pair = Eigenpair { value: 1.0, vector: Vec2::new(1.0, 0.0) };
        let ray = EigenRay::grow(&pair, 1.0).unwrap();
        let segs = ray.segments(3);
        assert_eq!(segs.len(), 6);
        assert_eq!(segs[0], (Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0)));
        assert_eq!(segs[2].1, Vec2::new(3.0, 0.0));
        assert_eq!(segs[5].1, Vec2::new(-3.0, 0.0));
    }
}
