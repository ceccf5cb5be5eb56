//! Session state and recompute-on-change
//!
//! All mutable state lives in [`Session`]. Each mutation validates its input,
//! updates the state and synchronously recomputes whatever depends on it:
//! - kernel or image change: filter the source into a new buffer
//! - transform, time, mode, visibility or drag change: nothing cached,
//!   the next [`Session::frame`] derives everything from scratch

use crate::config::VizConfig;
use crate::drag::{DragController, DragHandle, HandleKind};
use crate::frame::{Frame, FrameComposer, FrameInput};
use linviz_core::{
    AnimationState, Entry, Kernel, KernelPreset, PixelBuffer, Transform, TransformPreset, TransitionMode, Vec2,
    Visibility, VizError,
};
use linviz_image::{convolve, decode_fit, encode_png};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Serializable view of the editable state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionState {
    pub transform: Transform,
    pub kernel: Kernel,
    pub time: f64,
    pub mode: TransitionMode,
    pub visibility: Visibility,
    pub image_ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_size: Option<(usize, usize)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dragging: Option<HandleKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hovered: Option<HandleKind>,
}

pub struct Session {
    transform: Transform,
    kernel: Kernel,
    animation: AnimationState,
    visibility: Visibility,
    source: Option<PixelBuffer>,
    filtered: Option<PixelBuffer>,
    drag: DragController,
    hovered: Option<HandleKind>,
    rng: StdRng,
    composer: FrameComposer,
}

impl Session {
    pub fn new(config: VizConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            transform: Transform::IDENTITY,
            kernel: Kernel::IDENTITY,
            animation: AnimationState::default(),
            visibility: Visibility::default(),
            source: None,
            filtered: None,
            drag: DragController::from_config(&config),
            hovered: None,
            rng,
            composer: FrameComposer::new(config),
        }
    }

    pub fn config(&self) -> &VizConfig {
        self.composer.config()
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    pub fn animation(&self) -> &AnimationState {
        &self.animation
    }

    pub fn visibility(&self) -> &Visibility {
        &self.visibility
    }

    pub fn image_ready(&self) -> bool {
        self.filtered.is_some()
    }

    /// Filtered image, when one is loaded
    pub fn filtered(&self) -> Option<&PixelBuffer> {
        self.filtered.as_ref()
    }

    pub fn state(&self) -> SessionState {
        SessionState {
            transform: self.transform,
            kernel: self.kernel,
            time: self.animation.time(),
            mode: self.animation.mode,
            visibility: self.visibility,
            image_ready: self.image_ready(),
            image_size: self.filtered.as_ref().map(|b| (b.width(), b.height())),
            dragging: self.drag.captured().map(|h| h.kind),
            hovered: self.hovered,
        }
    }

    /// Everything the renderer needs for the current state
    pub fn frame(&self) -> Frame {
        self.composer.compose(&FrameInput {
            transform: &self.transform,
            animation: &self.animation,
            visibility: &self.visibility,
            image_size: self.filtered.as_ref().map(|b| (b.width(), b.height())),
            anchors: self.drag.anchors(&self.transform),
            hovered: self.hovered,
            captured: self.drag.captured().map(|h| h.kind),
        })
    }

    // ========================================================================
    // Transform
    // ========================================================================

    pub fn set_transform(&mut self, transform: Transform) -> Result<Transform, VizError> {
        let t = Transform::try_new(transform.a, transform.b, transform.c, transform.d)?;
        self.transform = t;
        debug!(a = t.a, b = t.b, c = t.c, d = t.d, "transform set");
        Ok(t)
    }

    pub fn set_entry(&mut self, entry: Entry, value: f64) -> Result<Transform, VizError> {
        self.transform.set(entry, value)?;
        debug!(entry = entry.name(), value, "transform entry set");
        Ok(self.transform)
    }

    pub fn apply_preset(&mut self, preset: TransformPreset) -> Transform {
        self.transform = preset.resolve(&mut self.rng);
        debug!(preset = preset.name(), "transform preset applied");
        self.transform
    }

    // ========================================================================
    // Kernel
    // ========================================================================

    pub fn set_kernel(&mut self, kernel: Kernel) -> Result<Kernel, VizError> {
        let checked = Kernel::new(*kernel.weights())?;
        self.kernel = checked;
        self.refilter();
        Ok(checked)
    }

    pub fn set_kernel_entry(&mut self, row: usize, col: usize, value: f64) -> Result<Kernel, VizError> {
        self.kernel.set(row, col, value)?;
        self.refilter();
        Ok(self.kernel)
    }

    pub fn apply_kernel_preset(&mut self, preset: KernelPreset) -> Kernel {
        self.kernel = preset.kernel();
        debug!(preset = preset.name(), "kernel preset applied");
        self.refilter();
        self.kernel
    }

    fn refilter(&mut self) {
        self.filtered = self.source.as_ref().map(|src| {
            let out = convolve(src, &self.kernel);
            info!(width = out.width(), height = out.height(), "image filtered");
            out
        });
    }

    // ========================================================================
    // Animation and visibility
    // ========================================================================

    pub fn set_time(&mut self, time: f64) -> Result<f64, VizError> {
        self.animation.set_time(time)
    }

    pub fn set_mode(&mut self, mode: TransitionMode) {
        self.animation.mode = mode;
    }

    pub fn set_visibility(&mut self, visibility: Visibility) {
        self.visibility = visibility;
    }

    // ========================================================================
    // Image
    // ========================================================================

    /// Decode, fit and filter a new source image
    ///
    /// On failure the previous image is dropped and the image stays
    /// unavailable until a later load succeeds.
    pub fn load_image(&mut self, bytes: &[u8]) -> Result<(usize, usize), VizError> {
        self.source = None;
        self.filtered = None;
        let buffer = match decode_fit(bytes, self.config().image_box) {
            Ok(b) => b,
            Err(e) => {
                warn!(error = %e, "image not loaded");
                return Err(e.into());
            }
        };
        let size = (buffer.width(), buffer.height());
        info!(width = size.0, height = size.1, "image loaded");
        self.source = Some(buffer);
        self.refilter();
        Ok(size)
    }

    pub fn load_image_file(&mut self, path: &Path) -> Result<(usize, usize), VizError> {
        let bytes = fs::read(path).map_err(|e| VizError::io(format!("cannot read '{}': {}", path.display(), e)))?;
        self.load_image(&bytes)
    }

    /// PNG of the filtered image with channels clamped for display
    pub fn export_png(&self) -> Result<Vec<u8>, VizError> {
        let buffer = self.filtered.as_ref().ok_or_else(VizError::image_not_ready)?;
        Ok(encode_png(buffer)?)
    }

    pub fn export_image_file(&self, path: &Path) -> Result<usize, VizError> {
        let bytes = self.export_png()?;
        fs::write(path, &bytes).map_err(|e| VizError::io(format!("cannot write '{}': {}", path.display(), e)))?;
        info!(path = %path.display(), bytes = bytes.len(), "image exported");
        Ok(bytes.len())
    }

    // ========================================================================
    // Pointer
    // ========================================================================

    pub fn pointer_down(&mut self, pointer: Vec2) -> Option<DragHandle> {
        let handle = self.drag.pointer_down(&self.transform, &pointer);
        self.hovered = handle.map(|h| h.kind);
        handle
    }

    /// Follow the pointer with the captured handle, or update hover state
    pub fn pointer_move(&mut self, pointer: Vec2) -> Result<Option<Transform>, VizError> {
        if self.drag.pointer_move(&mut self.transform, &pointer)? {
            return Ok(Some(self.transform));
        }
        self.hovered = self.drag.hit(&self.transform, &pointer);
        Ok(None)
    }

    /// Release the captured handle. Hover is cleared until the next move.
    pub fn pointer_up(&mut self) -> Option<DragHandle> {
        self.hovered = None;
        self.drag.pointer_up()
    }

    pub fn hover(&mut self, pointer: Vec2) -> Option<HandleKind> {
        self.hovered = self.drag.hover(&self.transform, &pointer);
        self.hovered
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(VizConfig::default())
    }
}
