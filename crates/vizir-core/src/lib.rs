//! Vizir Core - capture reconciliation pipeline
//!
//! This crate provides the component that reconciles freshly captured screen
//! images against stored reference images during a visual-regression run:
//! - `CaptureReconciler` with its prepare/process_capture lifecycle
//! - Collaborator seams: `ImageEngine`, `ScreenImage`, `ReferencePathResolver`
//! - Structured error taxonomy with a first-class missing-reference outcome
//! - Comparison results carrying a deferred diff capability
//! - Collision-free temp-path allocation for persisted captures

pub mod capture;
pub mod config;
pub mod engine;
pub mod errors;
pub mod logging;
pub mod reconciler;
pub mod result;
pub mod temp;

// Re-export commonly used types
pub use capture::{BrowserSession, CaptureRequest, PngBuffer, ScreenImage};
pub use config::{
    BrowserConfig, DiffColor, DirTreeResolver, ReferencePathResolver, SystemConfig,
    DEFAULT_TOLERANCE,
};
pub use engine::{ComparePolicy, DiffRequest, ImageEngine};
pub use errors::{EngineError, NoRefImage, ReconcileError, Result};
pub use reconciler::{CaptureProcessor, CaptureReconciler};
pub use result::{ComparisonResult, DiffHandle};
