//! linviz core - fundamental types
//!
//! This crate provides the types shared by every linviz crate:
//! - `Vec2` helpers: magnitude, normalize, dot, clamped arccosine
//! - `Transform`: the editable 2×2 matrix and its presets
//! - `Kernel`: the 3×3 convolution kernel and its presets
//! - `AnimationState` / `TransitionMode` / `Visibility`
//! - `PixelBuffer`: RGBA raster with unclamped channels
//! - `VizError`: structured errors

mod error;
mod transform;
mod kernel;
mod animation;
mod pixel;
pub mod vector;

pub use error::{codes, ensure_finite, Severity, VizError};
pub use transform::{Entry, Transform, TransformPreset, RANDOM_MAX, RANDOM_MIN};
pub use kernel::{Kernel, KernelPreset, KERNEL_SIZE};
pub use animation::{AnimationState, TransitionMode, Visibility};
pub use pixel::{PixelBuffer, Rgba, CHANNELS};
pub use vector::Vec2;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{AnimationState, Kernel, PixelBuffer, Transform, TransitionMode, Vec2, VizError};
    pub use crate::error::codes;
}
