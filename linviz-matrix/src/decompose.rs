//! Eigen and singular value decomposition adapters
//!
//! The numeric heavy lifting is delegated to a solver behind a trait so the
//! downstream handling (complex eigenpairs, orientation of SVD factors) does
//! not depend on which library factors the matrix. [`NalgebraSolver`] is the
//! default solver.

use linviz_core::vector::{self, Vec2};
use linviz_core::VizError;
use nalgebra::{Matrix2, Vector2};
use serde::Serialize;
use thiserror::Error;

/// Why a matrix has no usable decomposition
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecompositionError {
    #[error("complex eigenvalues {re} ± {im}i")]
    ComplexEigenvalues { re: f64, im: f64 },

    #[error("matrix has non-finite entries")]
    NonFinite,

    #[error("solver failed: {0}")]
    SolverFailure(String),
}

impl From<DecompositionError> for VizError {
    fn from(err: DecompositionError) -> Self {
        VizError::decomposition(err.to_string())
    }
}

/// A real eigenvalue with a unit eigenvector
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Eigenpair {
    pub value: f64,
    pub vector: Vec2,
}

/// `m = u * diag(singular_values) * v_t`, singular values descending
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SvdFactors {
    pub u: Matrix2<f64>,
    pub singular_values: Vector2<f64>,
    pub v_t: Matrix2<f64>,
}

/// Produces real eigenpairs or an explicit "no real decomposition" marker
pub trait EigenSolver {
    fn eigenpairs(&self, m: &Matrix2<f64>) -> Result<[Eigenpair; 2], DecompositionError>;
}

/// Produces orthogonal factors and singular values
pub trait SvdSolver {
    fn svd(&self, m: &Matrix2<f64>) -> Result<SvdFactors, DecompositionError>;
}

/// Solver backed by nalgebra's Schur and SVD routines
#[derive(Debug, Clone, Copy, Default)]
pub struct NalgebraSolver;

/// Relative tolerance for treating an imaginary part as zero
const IMAG_TOLERANCE: f64 = 1e-12;

/// Iteration cap handed to nalgebra's SVD
const SVD_MAX_ITER: usize = 1000;

fn check_finite(m: &Matrix2<f64>) -> Result<(), DecompositionError> {
    if m.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(DecompositionError::NonFinite)
    }
}

fn entry_scale(m: &Matrix2<f64>) -> f64 {
    m.iter().fold(1.0f64, |acc, v| acc.max(v.abs()))
}

impl EigenSolver for NalgebraSolver {
    fn eigenpairs(&self, m: &Matrix2<f64>) -> Result<[Eigenpair; 2], DecompositionError> {
        // nalgebra's Schur iteration does not terminate on NaN input
        check_finite(m)?;

        let tol = IMAG_TOLERANCE * entry_scale(m);
        let values = m.complex_eigenvalues();

        let mut pairs = [Eigenpair { value: 0.0, vector: Vec2::zeros() }; 2];
        for (i, z) in values.iter().enumerate() {
            if z.im.abs() > tol {
                return Err(DecompositionError::ComplexEigenvalues { re: z.re, im: z.im.abs() });
            }
            if !z.re.is_finite() {
                return Err(DecompositionError::NonFinite);
            }
            pairs[i] = Eigenpair { value: z.re, vector: eigenvector(m, z.re, i) };
        }
        Ok(pairs)
    }
}

/// Unit vector spanning the null space of `m - value * I`
///
/// The null vector is perpendicular to the dominant row. When both rows
/// vanish (`m` is a multiple of the identity) every vector qualifies and the
/// `fallback`-th standard basis vector is used. The result is oriented so its
/// first component is non-negative.
fn eigenvector(m: &Matrix2<f64>, value: f64, fallback: usize) -> Vec2 {
    let shifted = m - Matrix2::identity() * value;
    let r0 = Vec2::new(shifted[(0, 0)], shifted[(0, 1)]);
    let r1 = Vec2::new(shifted[(1, 0)], shifted[(1, 1)]);
    let row = if r0.norm_squared() >= r1.norm_squared() { r0 } else { r1 };

    let eps = f64::EPSILON * entry_scale(m);
    let v = if vector::magnitude(&row) > eps {
        Vec2::new(row.y, -row.x)
    } else if fallback == 0 {
        Vec2::new(1.0, 0.0)
    } else {
        Vec2::new(0.0, 1.0)
    };

    let v = if v.x < 0.0 { -v } else { v };
    vector::normalize(&v)
}

impl SvdSolver for NalgebraSolver {
    fn svd(&self, m: &Matrix2<f64>) -> Result<SvdFactors, DecompositionError> {
        check_finite(m)?;

        let svd = m
            .try_svd(true, true, f64::EPSILON, SVD_MAX_ITER)
            .ok_or_else(|| DecompositionError::SolverFailure("SVD did not converge".to_string()))?;
        let mut u = svd
            .u
            .ok_or_else(|| DecompositionError::SolverFailure("missing U".to_string()))?;
        let mut v_t = svd
            .v_t
            .ok_or_else(|| DecompositionError::SolverFailure("missing Vt".to_string()))?;
        let mut s = svd.singular_values;

        if s[0] < s[1] {
            s.swap_rows(0, 1);
            u.swap_columns(0, 1);
            v_t.swap_rows(0, 1);
        }

        Ok(SvdFactors { u, singular_values: s, v_t })
    }
}
