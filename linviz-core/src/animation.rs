//! Animation state and display toggles

use crate::error::VizError;
use serde::{Deserialize, Serialize};

/// How the animation travels from the identity to the transform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionMode {
    /// Componentwise blend
    Linear,
    /// Rotate, scale, rotate along the singular value decomposition
    Svd,
}

impl Default for TransitionMode {
    fn default() -> Self {
        TransitionMode::Linear
    }
}

impl TransitionMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "linear" | "lerp" => Some(TransitionMode::Linear),
            "svd" => Some(TransitionMode::Svd),
            _ => None,
        }
    }

    pub fn parse(s: &str) -> Result<Self, VizError> {
        Self::from_str(s).ok_or_else(|| VizError::unknown_preset("transition mode", s, &["linear", "svd"]))
    }
}

/// Animation time in [0, 1] plus the transition mode
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnimationState {
    time: f64,
    pub mode: TransitionMode,
}

impl AnimationState {
    pub fn new(time: f64, mode: TransitionMode) -> Result<Self, VizError> {
        let mut state = Self { time: 1.0, mode };
        state.set_time(time)?;
        Ok(state)
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    /// Clamp into [0, 1]. NaN is rejected and the previous time kept.
    pub fn set_time(&mut self, time: f64) -> Result<f64, VizError> {
        if time.is_nan() {
            return Err(VizError::non_finite("time", time));
        }
        self.time = time.clamp(0.0, 1.0);
        Ok(self.time)
    }
}

impl Default for AnimationState {
    fn default() -> Self {
        // The transform is shown fully applied on first paint.
        Self { time: 1.0, mode: TransitionMode::Linear }
    }
}

/// Independent show/hide toggles for optional frame elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visibility {
    pub image: bool,
    pub eigenvectors: bool,
    pub unit_circle: bool,
}

impl Default for Visibility {
    fn default() -> Self {
        Self { image: true, eigenvectors: true, unit_circle: false }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_is_clamped() {
        let mut s = AnimationState::default();
        assert_eq!(s.set_time(1.7).unwrap(), 1.0);
        assert_eq!(s.set_time(-0.2).unwrap(), 0.0);
        assert_eq!(s.set_time(0.25).unwrap(), 0.25);
        assert_eq!(s.set_time(f64::INFINITY).unwrap(), 1.0);
    }

    #[test]
    fn test_nan_time_keeps_previous() {
        let mut s = AnimationState::new(0.4, TransitionMode::Svd).unwrap();
        assert!(s.set_time(f64::NAN).is_err());
        assert_eq!(s.time(), 0.4);
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!(TransitionMode::parse("SVD").unwrap(), TransitionMode::Svd);
        assert!(TransitionMode::parse("cubic").is_err());
    }
}
