//! linviz matrix - decompositions and interpolation
//!
//! - Eigen and SVD adapters behind solver traits (`EigenSolver`, `SvdSolver`)
//! - `slerp` for 2D vectors
//! - Linear and three-phase SVD interpolation from the identity
//! - Eigenvector rays that grow with time
//!
//! All math is in y-up coordinates. Flipping to a y-down drawing surface is
//! left to the frame composer.

mod decompose;
mod field;
mod interpolate;
mod slerp;

pub use decompose::{DecompositionError, EigenSolver, Eigenpair, NalgebraSolver, SvdFactors, SvdSolver};
pub use field::{eigen_rays, eigen_rays_with, EigenRay};
pub use interpolate::{
    interpolate, interpolate_between, interpolate_with, linear, svd_between, Phase, SvdPath,
};
pub use slerp::slerp;
