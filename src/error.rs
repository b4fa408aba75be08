//! Error type for the fallible edges of the canvas.
//!
//! Hit-testing and lookups model absence with `Option`; only decoding external
//! documents, validating configuration, and validating a requested input edit
//! can fail.

use crate::doc::ModuleId;
use crate::plugin::InputKind;

#[derive(Debug, thiserror::Error)]
pub enum CanvasError {
    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {field} {reason}")]
    InvalidConfig { field: &'static str, reason: &'static str },
    #[error("no graph bound")]
    NoGraph,
    #[error("module not found: {0}")]
    ModuleNotFound(ModuleId),
    #[error("input {input} out of range for module {module} ({count} inputs)")]
    InputOutOfRange { module: ModuleId, input: usize, count: usize },
    #[error("input {input} of module {module} expects {expected:?}")]
    InputKindMismatch { module: ModuleId, input: usize, expected: InputKind },
    #[error("value for input {input} of module {module} is outside its range or enum")]
    InputValueRejected { module: ModuleId, input: usize },
}

impl CanvasError {
    /// Stable machine-readable code for hosts that surface errors.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Json(_) => "E_JSON",
            Self::InvalidConfig { .. } => "E_INVALID_CONFIG",
            Self::NoGraph => "E_NO_GRAPH",
            Self::ModuleNotFound(_) => "E_MODULE_NOT_FOUND",
            Self::InputOutOfRange { .. } => "E_INPUT_OUT_OF_RANGE",
            Self::InputKindMismatch { .. } => "E_INPUT_KIND_MISMATCH",
            Self::InputValueRejected { .. } => "E_INPUT_VALUE_REJECTED",
        }
    }
}
