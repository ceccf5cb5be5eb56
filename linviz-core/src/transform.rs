//! The editable 2×2 transform and its presets

use crate::error::{ensure_finite, VizError};
use crate::vector::Vec2;
use nalgebra::Matrix2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A 2×2 matrix stored as two columns: column 1 = (a, b), column 2 = (c, d)
///
/// Entries are in math orientation (y grows upward). The drawing surface
/// flips the vertical axis; that flip lives in the frame composer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

/// Names one of the four transform entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Entry {
    A,
    B,
    C,
    D,
}

impl Entry {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "a" => Some(Entry::A),
            "b" => Some(Entry::B),
            "c" => Some(Entry::C),
            "d" => Some(Entry::D),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Entry::A => "a",
            Entry::B => "b",
            Entry::C => "c",
            Entry::D => "d",
        }
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform { a: 1.0, b: 0.0, c: 0.0, d: 1.0 };

    pub const fn new(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self { a, b, c, d }
    }

    /// Build a transform, rejecting non-finite entries
    pub fn try_new(a: f64, b: f64, c: f64, d: f64) -> Result<Self, VizError> {
        Ok(Self {
            a: ensure_finite("a", a)?,
            b: ensure_finite("b", b)?,
            c: ensure_finite("c", c)?,
            d: ensure_finite("d", d)?,
        })
    }

    pub fn from_columns(x: Vec2, y: Vec2) -> Self {
        Self { a: x.x, b: x.y, c: y.x, d: y.y }
    }

    pub fn from_matrix(m: &Matrix2<f64>) -> Self {
        Self { a: m[(0, 0)], b: m[(1, 0)], c: m[(0, 1)], d: m[(1, 1)] }
    }

    /// The matrix `[[a, c], [b, d]]`
    pub fn to_matrix(&self) -> Matrix2<f64> {
        Matrix2::new(self.a, self.c, self.b, self.d)
    }

    /// Image of the x basis vector
    pub fn x_column(&self) -> Vec2 {
        Vec2::new(self.a, self.b)
    }

    /// Image of the y basis vector
    pub fn y_column(&self) -> Vec2 {
        Vec2::new(self.c, self.d)
    }

    pub fn get(&self, entry: Entry) -> f64 {
        match entry {
            Entry::A => self.a,
            Entry::B => self.b,
            Entry::C => self.c,
            Entry::D => self.d,
        }
    }

    /// Set one entry. A non-finite value is rejected and the transform is
    /// left untouched.
    pub fn set(&mut self, entry: Entry, value: f64) -> Result<(), VizError> {
        let value = ensure_finite(entry.name(), value)?;
        match entry {
            Entry::A => self.a = value,
            Entry::B => self.b = value,
            Entry::C => self.c = value,
            Entry::D => self.d = value,
        }
        Ok(())
    }

    pub fn set_x_column(&mut self, x: Vec2) -> Result<(), VizError> {
        let a = ensure_finite("a", x.x)?;
        let b = ensure_finite("b", x.y)?;
        self.a = a;
        self.b = b;
        Ok(())
    }

    pub fn set_y_column(&mut self, y: Vec2) -> Result<(), VizError> {
        let c = ensure_finite("c", y.x)?;
        let d = ensure_finite("d", y.y)?;
        self.c = c;
        self.d = d;
        Ok(())
    }

    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    pub fn is_finite(&self) -> bool {
        self.a.is_finite() && self.b.is_finite() && self.c.is_finite() && self.d.is_finite()
    }

    pub fn apply(&self, v: &Vec2) -> Vec2 {
        Vec2::new(self.a * v.x + self.c * v.y, self.b * v.x + self.d * v.y)
    }

    pub fn approx_eq(&self, other: &Transform, eps: f64) -> bool {
        (self.a - other.a).abs() <= eps
            && (self.b - other.b).abs() <= eps
            && (self.c - other.c).abs() <= eps
            && (self.d - other.d).abs() <= eps
    }
}

impl Default for Transform {
    fn default() -> Self {
        Transform::IDENTITY
    }
}

// ============================================================================
// Presets
// ============================================================================

/// Named transform presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformPreset {
    Reset,
    Shear,
    Rotation,
    Random,
}

static TRANSFORM_PRESET_NAMES: [&str; 4] = ["reset", "shear", "rotation", "random"];

/// Lower bound of the random preset range
pub const RANDOM_MIN: f64 = -2.0;
/// Upper bound of the random preset range
pub const RANDOM_MAX: f64 = 2.0;

impl TransformPreset {
    pub const ALL: [TransformPreset; 4] = [
        TransformPreset::Reset,
        TransformPreset::Shear,
        TransformPreset::Rotation,
        TransformPreset::Random,
    ];

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "reset" | "identity" => Some(TransformPreset::Reset),
            "shear" => Some(TransformPreset::Shear),
            "rotation" | "rotate" => Some(TransformPreset::Rotation),
            "random" => Some(TransformPreset::Random),
            _ => None,
        }
    }

    pub fn parse(s: &str) -> Result<Self, VizError> {
        Self::from_str(s)
            .ok_or_else(|| VizError::unknown_preset("transform", s, &TRANSFORM_PRESET_NAMES))
    }

    pub fn name(self) -> &'static str {
        match self {
            TransformPreset::Reset => "reset",
            TransformPreset::Shear => "shear",
            TransformPreset::Rotation => "rotation",
            TransformPreset::Random => "random",
        }
    }

    /// Resolve the preset to a matrix. Only `Random` draws from `rng`.
    pub fn resolve<R: Rng + ?Sized>(self, rng: &mut R) -> Transform {
        match self {
            TransformPreset::Reset => Transform::IDENTITY,
            TransformPreset::Shear => Transform::new(1.0, 0.0, 1.0, 1.0),
            TransformPreset::Rotation => Transform::new(0.0, 1.0, -1.0, 0.0),
            TransformPreset::Random => Transform::new(
                random_entry(rng),
                random_entry(rng),
                random_entry(rng),
                random_entry(rng),
            ),
        }
    }
}

/// Uniform in [-2, 2], rounded to the nearest tenth
fn random_entry<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let x: f64 = rng.gen_range(RANDOM_MIN..=RANDOM_MAX);
    (x * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_matrix_layout_is_column_major() {
        let t = Transform::new(1.0, 2.0, 3.0, 4.0);
        let m = t.to_matrix();
        assert_eq!(m[(0, 0)], 1.0);
        assert_eq!(m[(1, 0)], 2.0);
        assert_eq!(m[(0, 1)], 3.0);
        assert_eq!(m[(1, 1)], 4.0);
        assert_eq!(Transform::from_matrix(&m), t);
    }

    #[test]
    fn test_apply_maps_basis_to_columns() {
        let t = Transform::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(t.apply(&Vec2::new(1.0, 0.0)), t.x_column());
        assert_eq!(t.apply(&Vec2::new(0.0, 1.0)), t.y_column());
    }

    #[test]
    fn test_set_rejects_nan() {
        let mut t = Transform::IDENTITY;
        assert!(t.set(Entry::B, f64::NAN).is_err());
        assert_eq!(t, Transform::IDENTITY);
        t.set(Entry::B, 0.5).unwrap();
        assert_eq!(t.b, 0.5);
    }

    #[test]
    fn test_set_column_is_all_or_nothing() {
        let mut t = Transform::IDENTITY;
        assert!(t.set_y_column(Vec2::new(2.0, f64::INFINITY)).is_err());
        assert_eq!(t, Transform::IDENTITY);
    }

    #[test]
    fn test_fixed_presets() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(TransformPreset::Reset.resolve(&mut rng), Transform::IDENTITY);
        assert_eq!(TransformPreset::Shear.resolve(&mut rng), Transform::new(1.0, 0.0, 1.0, 1.0));
        assert_eq!(TransformPreset::Rotation.resolve(&mut rng), Transform::new(0.0, 1.0, -1.0, 0.0));
    }

    #[test]
    fn test_random_preset_range_and_rounding() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let t = TransformPreset::Random.resolve(&mut rng);
            for v in [t.a, t.b, t.c, t.d] {
                assert!((RANDOM_MIN..=RANDOM_MAX).contains(&v));
                let tenths = v * 10.0;
                assert!((tenths - tenths.round()).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_random_preset_is_deterministic_with_seed() {
        let a = TransformPreset::Random.resolve(&mut StdRng::seed_from_u64(7));
        let b = TransformPreset::Random.resolve(&mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_preset_parse() {
        assert_eq!(TransformPreset::parse("Shear").unwrap(), TransformPreset::Shear);
        let err = TransformPreset::parse("spin").unwrap_err();
        assert_eq!(err.code, crate::codes::UNKNOWN_PRESET);
    }
}
