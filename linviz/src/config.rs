//! Drawing and interaction parameters

use linviz_core::VizError;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

/// Environment variable naming a JSON config file
pub const CONFIG_ENV: &str = "LINVIZ_CONFIG";

/// Smallest grid spacing or unit, in pixels
pub const MIN_SPACING: f64 = 1.0;
/// Largest drawing surface side, in pixels
pub const MAX_CANVAS: f64 = 16_384.0;
/// Upper bound on grid lines per direction and per side of an axis
pub const MAX_GRID_LINES: f64 = 10_000.0;
/// Upper bound on eigen ray and unit circle segment counts
pub const MAX_SEGMENTS: usize = 10_000;
pub const MAX_IMAGE_BOX: u32 = 8192;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VizConfig {
    /// Side of the square drawing surface, in pixels
    pub canvas_size: f64,
    /// Pixels per math unit
    pub unit: f64,
    pub fine_grid_spacing: f64,
    pub coarse_grid_spacing: f64,
    /// Half-extent of the transformed grid, in pixels
    pub foreground_extent: f64,
    /// Segments per eigen ray, in each direction
    pub eigen_segments: usize,
    pub handle_radius: f64,
    /// Capture radius as a multiple of `handle_radius`
    pub capture_multiple: f64,
    /// Decoded images are fit into an `image_box` square
    pub image_box: u32,
    pub unit_circle_segments: usize,
    /// Seed for the random preset; entropy when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for VizConfig {
    fn default() -> Self {
        Self {
            canvas_size: 900.0,
            unit: 80.0,
            fine_grid_spacing: 40.0,
            coarse_grid_spacing: 80.0,
            foreground_extent: 4500.0,
            eigen_segments: 60,
            handle_radius: 10.0,
            capture_multiple: 2.0,
            image_box: 250,
            unit_circle_segments: 96,
            seed: None,
        }
    }
}

impl VizConfig {
    /// Load from `$LINVIZ_CONFIG`, or defaults when unset
    pub fn from_env() -> Result<Self, VizError> {
        match env::var(CONFIG_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_file(Path::new(path.trim())),
            _ => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, VizError> {
        let text = fs::read_to_string(path)
            .map_err(|e| VizError::config(format!("cannot read '{}': {}", path.display(), e)))?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, VizError> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| VizError::config(format!("invalid config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), VizError> {
        let positive = [
            ("canvas_size", self.canvas_size),
            ("unit", self.unit),
            ("fine_grid_spacing", self.fine_grid_spacing),
            ("coarse_grid_spacing", self.coarse_grid_spacing),
            ("foreground_extent", self.foreground_extent),
            ("handle_radius", self.handle_radius),
            ("capture_multiple", self.capture_multiple),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(VizError::config(format!("{} must be a positive number, got {}", name, value)));
            }
        }
        if self.eigen_segments == 0 {
            return Err(VizError::config("eigen_segments must be at least 1"));
        }
        if self.unit_circle_segments < 3 {
            return Err(VizError::config("unit_circle_segments must be at least 3"));
        }
        if self.image_box == 0 {
            return Err(VizError::config("image_box must be at least 1"));
        }

        // Keep the generated geometry bounded
        let ranges = [
            ("canvas_size", self.canvas_size, MIN_SPACING, MAX_CANVAS),
            ("unit", self.unit, MIN_SPACING, self.canvas_size),
            ("fine_grid_spacing", self.fine_grid_spacing, MIN_SPACING, self.canvas_size),
            ("coarse_grid_spacing", self.coarse_grid_spacing, MIN_SPACING, self.canvas_size),
            ("foreground_extent", self.foreground_extent, self.unit, self.unit * MAX_GRID_LINES),
            ("eigen_segments", self.eigen_segments as f64, 1.0, MAX_SEGMENTS as f64),
            ("unit_circle_segments", self.unit_circle_segments as f64, 3.0, MAX_SEGMENTS as f64),
            ("image_box", f64::from(self.image_box), 1.0, f64::from(MAX_IMAGE_BOX)),
        ];
        for (name, value, min, max) in ranges {
            if value < min || value > max {
                return Err(VizError::out_of_range(name, value, min, max));
            }
        }
        Ok(())
    }

    /// Distance within which a pointer captures a handle
    pub fn capture_radius(&self) -> f64 {
        self.handle_radius * self.capture_multiple
    }

    /// Drawing-surface position of the math origin
    pub fn origin(&self) -> f64 {
        self.canvas_size / 2.0
    }
}
