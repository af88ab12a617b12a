//! Error taxonomy for the reconciliation pipeline
//!
//! Three failure classes surface from `process_capture`, none of them retried
//! or swallowed inside the component:
//! - **Missing reference**: an expected, first-class outcome of a test run
//!   (a new test case). Carries enough context to report what would have been
//!   compared and where the capture landed.
//! - **I/O failure**: directory creation, capture persistence or existence
//!   checks failing for environmental reasons.
//! - **Engine failure**: the image engine erroring; propagated unmodified.

use std::path::{Path, PathBuf};
use thiserror::Error;
use vizir_core_types::{BrowserId, StateName, SuiteId};

/// Result type alias using ReconcileError
pub type Result<T> = std::result::Result<T, ReconcileError>;

/// Context carried by a missing-reference failure
///
/// The capture has already been persisted by the time the reference lookup
/// fails, so `current_path` names a file that exists on disk. Callers can
/// report the failed comparison (and offer to accept the capture as a new
/// reference) without re-deriving any of this.
#[derive(Debug, Clone)]
pub struct NoRefImage {
    /// The reference path that was resolved but not found
    pub reference_path: PathBuf,
    pub suite: SuiteId,
    pub state: StateName,
    /// Where the capture was persisted before the lookup failed
    pub current_path: PathBuf,
    pub browser_id: BrowserId,
}

/// Opaque failure raised by an image engine implementation
///
/// The reconciler adds no interpretation of its own; whatever the engine
/// reports (corrupt image, decode failure) travels through unchanged.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct EngineError(Box<dyn std::error::Error + Send + Sync>);

impl EngineError {
    pub fn new(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self(err.into())
    }
}

/// Canonical error type of the reconciliation pipeline
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// No reference image exists for the given suite/state/browser
    #[error(
        "no reference image at {} for {}/{} (browser {})",
        .0.reference_path.display(),
        .0.suite,
        .0.state,
        .0.browser_id
    )]
    MissingReference(NoRefImage),

    /// Filesystem operation failed
    #[error("{op} failed for {}: {source}", .path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The image engine reported a failure
    #[error("image engine failed: {0}")]
    Engine(#[from] EngineError),

    /// `process_capture` was invoked before a successful `prepare`
    #[error("process_capture called before prepare() completed")]
    NotPrepared,

    /// A diff highlight color string could not be parsed
    #[error("invalid diff color {value:?} (expected #rrggbb)")]
    InvalidDiffColor { value: String },
}

impl ReconcileError {
    /// Create an I/O error carrying the failing operation and path
    pub fn io(op: &'static str, path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            op,
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Get the stable error code for this error
    pub fn code(&self) -> &'static str {
        match self {
            ReconcileError::MissingReference(_) => "ERR_NO_REF_IMAGE",
            ReconcileError::Io { .. } => "ERR_IO",
            ReconcileError::Engine(_) => "ERR_ENGINE",
            ReconcileError::NotPrepared => "ERR_NOT_PREPARED",
            ReconcileError::InvalidDiffColor { .. } => "ERR_INVALID_DIFF_COLOR",
        }
    }
}
