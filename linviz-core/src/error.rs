//! Structured errors
//!
//! Nothing in the visualizer core is fatal. Errors are values that describe
//! why an edit was rejected or why an optional element was dropped, in a
//! form an external UI collaborator can show or ignore.

use serde::{Deserialize, Serialize};

/// Standard error codes (machine-readable)
pub mod codes {
    pub const NON_FINITE: &str = "NON_FINITE";
    pub const OUT_OF_RANGE: &str = "OUT_OF_RANGE";
    pub const INDEX: &str = "INDEX";
    pub const DIMENSION: &str = "DIMENSION";
    pub const UNKNOWN_PRESET: &str = "UNKNOWN_PRESET";
    pub const DECOMPOSITION: &str = "DECOMPOSITION";
    pub const IMAGE_DECODE: &str = "IMAGE_DECODE";
    pub const IMAGE_ENCODE: &str = "IMAGE_ENCODE";
    pub const IMAGE_NOT_READY: &str = "IMAGE_NOT_READY";
    pub const CONFIG: &str = "CONFIG";
    pub const IO: &str = "IO";
    pub const PROTOCOL: &str = "PROTOCOL";
    pub const INTERNAL: &str = "INTERNAL";
}

/// Severity level of an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Frame still produced, an optional element was skipped
    Warning,
    /// Request rejected, state left unchanged
    Error,
}

/// Structured error shared by every linviz crate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VizError {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Suggestion for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,

    /// Severity level
    pub severity: Severity,
}

impl VizError {
    /// Create a new error
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            suggestion: None,
            severity: Severity::Error,
        }
    }

    /// Builder: add suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Builder: set severity
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    // ========== Common Error Constructors ==========

    pub fn non_finite(what: &str, value: f64) -> Self {
        Self::new(codes::NON_FINITE, format!("{} must be finite, got {}", what, value))
            .with_suggestion("Enter a real number")
    }

    pub fn out_of_range(what: &str, value: f64, min: f64, max: f64) -> Self {
        Self::new(
            codes::OUT_OF_RANGE,
            format!("{} = {} is outside [{}, {}]", what, value, min, max),
        )
    }

    pub fn index(what: &str, index: usize, len: usize) -> Self {
        Self::new(codes::INDEX, format!("{} index {} out of bounds (len {})", what, index, len))
    }

    pub fn dimension(details: impl Into<String>) -> Self {
        Self::new(codes::DIMENSION, format!("Dimension mismatch: {}", details.into()))
    }

    pub fn unknown_preset(kind: &str, name: &str, known: &[&str]) -> Self {
        Self::new(codes::UNKNOWN_PRESET, format!("Unknown {} preset: {}", kind, name))
            .with_suggestion(format!("Use one of: {}", known.join(", ")))
    }

    pub fn decomposition(details: impl Into<String>) -> Self {
        Self::new(codes::DECOMPOSITION, format!("No real decomposition: {}", details.into()))
            .with_severity(Severity::Warning)
    }

    pub fn image_decode(details: impl Into<String>) -> Self {
        Self::new(codes::IMAGE_DECODE, format!("Image decode failed: {}", details.into()))
            .with_suggestion("Supply a PNG, JPEG, GIF, BMP or WebP file")
            .with_severity(Severity::Warning)
    }

    pub fn image_encode(details: impl Into<String>) -> Self {
        Self::new(codes::IMAGE_ENCODE, format!("Image encode failed: {}", details.into()))
    }

    pub fn image_not_ready() -> Self {
        Self::new(codes::IMAGE_NOT_READY, "No image has been loaded")
            .with_suggestion("Load an image first")
            .with_severity(Severity::Warning)
    }

    pub fn config(details: impl Into<String>) -> Self {
        Self::new(codes::CONFIG, format!("Invalid configuration: {}", details.into()))
    }

    pub fn io(details: impl Into<String>) -> Self {
        Self::new(codes::IO, format!("I/O error: {}", details.into()))
    }

    pub fn protocol(details: impl Into<String>) -> Self {
        Self::new(codes::PROTOCOL, format!("Protocol error: {}", details.into()))
    }

    pub fn internal(details: impl Into<String>) -> Self {
        Self::new(codes::INTERNAL, format!("Internal error: {}", details.into()))
            .with_suggestion("This is a bug, please report it")
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

impl std::fmt::Display for VizError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " (suggestion: {})", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for VizError {}

impl From<std::io::Error> for VizError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}

/// Reject NaN and infinities at an input boundary
pub fn ensure_finite(what: &str, value: f64) -> Result<f64, VizError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(VizError::non_finite(what, value))
    }
}
