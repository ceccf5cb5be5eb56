//! 2D vector helpers
//!
//! Thin wrappers over nalgebra's `Vector2<f64>`. Zero vectors are not
//! special-cased here: `normalize` of a zero vector yields NaN components
//! and callers decide how to degrade.

use nalgebra::Vector2;

pub type Vec2 = Vector2<f64>;

/// Euclidean length
pub fn magnitude(v: &Vec2) -> f64 {
    (v.x * v.x + v.y * v.y).sqrt()
}

/// Unit vector in the direction of `v` (NaN components for a zero vector)
pub fn normalize(v: &Vec2) -> Vec2 {
    let m = magnitude(v);
    Vec2::new(v.x / m, v.y / m)
}

pub fn dot(a: &Vec2, b: &Vec2) -> f64 {
    a.x * b.x + a.y * b.y
}

/// Arccosine with the argument clamped to [-1, 1]
///
/// Dot products of unit vectors routinely land a few ulps outside the
/// domain of `acos`.
pub fn clamped_acos(x: f64) -> f64 {
    x.clamp(-1.0, 1.0).acos()
}

/// z component of the 3D cross product
pub fn cross(a: &Vec2, b: &Vec2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Rotate counter-clockwise by `angle` radians
pub fn rotate(v: &Vec2, angle: f64) -> Vec2 {
    let (s, c) = angle.sin_cos();
    Vec2::new(c * v.x - s * v.y, s * v.x + c * v.y)
}

pub fn lerp(a: &Vec2, b: &Vec2, t: f64) -> Vec2 {
    a + (b - a) * t
}

pub fn is_finite(v: &Vec2) -> bool {
    v.x.is_finite() && v.y.is_finite()
}

pub fn distance(a: &Vec2, b: &Vec2) -> f64 {
    magnitude(&(a - b))
}
