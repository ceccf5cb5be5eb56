//! 3×3 convolution kernel and its presets

use crate::error::{ensure_finite, VizError};
use serde::{Deserialize, Serialize};

/// Side length of every kernel. Always odd so the footprint has a center.
pub const KERNEL_SIZE: usize = 3;

/// Fixed 3×3 grid of weights, row-major
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Kernel {
    weights: [[f64; KERNEL_SIZE]; KERNEL_SIZE],
}

impl Kernel {
    pub const IDENTITY: Kernel = Kernel {
        weights: [[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 0.0]],
    };

    /// Build a kernel, rejecting non-finite weights
    pub fn new(weights: [[f64; KERNEL_SIZE]; KERNEL_SIZE]) -> Result<Self, VizError> {
        for row in &weights {
            for &w in row {
                ensure_finite("kernel weight", w)?;
            }
        }
        Ok(Self { weights })
    }

    /// Build from nested rows of arbitrary length (e.g. decoded JSON)
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, VizError> {
        if rows.len() != KERNEL_SIZE || rows.iter().any(|r| r.len() != KERNEL_SIZE) {
            return Err(VizError::dimension(format!(
                "kernel must be {}×{}",
                KERNEL_SIZE, KERNEL_SIZE
            )));
        }
        let mut weights = [[0.0; KERNEL_SIZE]; KERNEL_SIZE];
        for (i, row) in rows.iter().enumerate() {
            weights[i].copy_from_slice(row);
        }
        Self::new(weights)
    }

    pub fn size(&self) -> usize {
        KERNEL_SIZE
    }

    pub fn weights(&self) -> &[[f64; KERNEL_SIZE]; KERNEL_SIZE] {
        &self.weights
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.weights.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Replace a single weight
    pub fn set(&mut self, row: usize, col: usize, value: f64) -> Result<(), VizError> {
        if row >= KERNEL_SIZE {
            return Err(VizError::index("kernel row", row, KERNEL_SIZE));
        }
        if col >= KERNEL_SIZE {
            return Err(VizError::index("kernel column", col, KERNEL_SIZE));
        }
        self.weights[row][col] = ensure_finite("kernel weight", value)?;
        Ok(())
    }

    pub fn sum(&self) -> f64 {
        self.weights.iter().flatten().sum()
    }
}

impl Default for Kernel {
    fn default() -> Self {
        Kernel::IDENTITY
    }
}

// ============================================================================
// Presets
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KernelPreset {
    Reset,
    Sharpen,
    BoxBlur,
}

static KERNEL_PRESET_NAMES: [&str; 3] = ["reset", "sharpen", "box_blur"];

impl KernelPreset {
    pub const ALL: [KernelPreset; 3] = [KernelPreset::Reset, KernelPreset::Sharpen, KernelPreset::BoxBlur];

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['-', ' '], "_").as_str() {
            "reset" | "identity" => Some(KernelPreset::Reset),
            "sharpen" => Some(KernelPreset::Sharpen),
            "box_blur" | "blur" => Some(KernelPreset::BoxBlur),
            _ => None,
        }
    }

    pub fn parse(s: &str) -> Result<Self, VizError> {
        Self::from_str(s).ok_or_else(|| VizError::unknown_preset("kernel", s, &KERNEL_PRESET_NAMES))
    }

    pub fn name(self) -> &'static str {
        match self {
            KernelPreset::Reset => "reset",
            KernelPreset::Sharpen => "sharpen",
            KernelPreset::BoxBlur => "box_blur",
        }
    }

    pub fn kernel(self) -> Kernel {
        match self {
            KernelPreset::Reset => Kernel::IDENTITY,
            KernelPreset::Sharpen => Kernel {
                weights: [[0.0, -1.0, 0.0], [-1.0, 5.0, -1.0], [0.0, -1.0, 0.0]],
            },
            KernelPreset::BoxBlur => Kernel { weights: [[1.0 / 9.0; KERNEL_SIZE]; KERNEL_SIZE] },
        }
    }
}
