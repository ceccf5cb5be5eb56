//! linviz - animate a 2×2 linear transform
//!
//! Ties the numeric crates into an interactive session:
//! - `Session`: editable state, recompute-on-change, image loading/export
//! - `DragController`: edit matrix columns by dragging their handles
//! - `FrameComposer`: everything a renderer draws for one frame
//! - `VizConfig`: drawing and interaction parameters

mod config;
mod drag;
mod frame;
mod session;
pub mod geometry;

pub use config::{VizConfig, CONFIG_ENV};
pub use drag::{DragController, DragHandle, HandleAnchor, HandleKind};
pub use frame::{surface_transform, Frame, FrameComposer, FrameInput, HandleView, ImagePlacement, Polyline};
pub use session::{Session, SessionState};

pub use linviz_core::{
    AnimationState, Entry, Kernel, KernelPreset, PixelBuffer, Transform, TransformPreset, TransitionMode, Vec2,
    Visibility, VizError,
};
pub use linviz_matrix::{interpolate, EigenRay};
