//! Spherical interpolation of 2D vectors
//!
//! Direction moves at constant angular speed along the shorter arc while the
//! length is interpolated linearly and independently.

use linviz_core::vector::{self, Vec2};

/// Below this `sin(angle)` the closed-form slerp weights are ill-conditioned
const SIN_EPSILON: f64 = 1e-9;

/// Interpolate from `from` to `to` at `t` in [0, 1]
///
/// A zero-length (or non-finite) input has no direction; the target is
/// returned unchanged in that case, so the result is always finite when
/// `to` is.
pub fn slerp(from: &Vec2, to: &Vec2, t: f64) -> Vec2 {
    if from == to {
        return *from;
    }

    let m0 = vector::magnitude(from);
    let m1 = vector::magnitude(to);
    if m0 == 0.0 || m1 == 0.0 || !m0.is_finite() || !m1.is_finite() {
        return *to;
    }

    let p = from / m0;
    let q = to / m1;
    let omega = vector::clamped_acos(vector::dot(&p, &q));
    let sin_omega = omega.sin();

    let direction = if sin_omega > SIN_EPSILON {
        p * (((1.0 - t) * omega).sin() / sin_omega) + q * ((t * omega).sin() / sin_omega)
    } else {
        // Parallel or antiparallel: rotate explicitly. Antiparallel inputs
        // have no shorter arc and turn counter-clockwise.
        let sign = if vector::cross(&p, &q) < 0.0 { -1.0 } else { 1.0 };
        vector::rotate(&p, sign * omega * t)
    };

    let magnitude = m0 + (m1 - m0) * t;
    let out = direction * magnitude;
    if vector::is_finite(&out) {
        out
    } else {
        *to
    }
}
