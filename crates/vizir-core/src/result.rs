//! Comparison results and the deferred diff capability
//!
//! The diff is not rendered during reconciliation. Each `ComparisonResult`
//! instead owns a `DiffHandle` holding everything the rendering needs; the
//! artifact only materializes when `save_diff_to` is invoked, zero or more
//! times, each invocation independent and deterministic for fixed inputs.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use vizir_core_types::{BrowserId, SessionId, StateName, SuiteId};

use crate::config::DiffColor;
use crate::engine::{DiffRequest, ImageEngine};
use crate::errors::Result;

/// Deferred diff-rendering capability bound to one comparison
///
/// Owns the exact reference/current paths, tolerance, strictness and
/// highlight color the comparison used, plus a handle on the bound engine.
#[derive(Clone)]
pub struct DiffHandle {
    engine: Arc<dyn ImageEngine>,
    reference_path: PathBuf,
    current_path: PathBuf,
    tolerance: f64,
    strict_comparison: bool,
    diff_color: DiffColor,
}

impl DiffHandle {
    pub(crate) fn new(
        engine: Arc<dyn ImageEngine>,
        reference_path: PathBuf,
        current_path: PathBuf,
        tolerance: f64,
        strict_comparison: bool,
        diff_color: DiffColor,
    ) -> Self {
        Self {
            engine,
            reference_path,
            current_path,
            tolerance,
            strict_comparison,
            diff_color,
        }
    }

    /// Render the diff artifact to `target`
    ///
    /// Regenerates the diff from the same inputs every time; repeated calls
    /// with the same target produce identical bytes.
    pub async fn save_diff_to(&self, target: impl AsRef<Path>) -> Result<()> {
        self.engine
            .build_diff(DiffRequest {
                reference: self.reference_path.clone(),
                current: self.current_path.clone(),
                diff: target.as_ref().to_path_buf(),
                diff_color: self.diff_color,
                tolerance: self.tolerance,
                strict_comparison: self.strict_comparison,
            })
            .await?;
        Ok(())
    }
}

impl std::fmt::Debug for DiffHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiffHandle")
            .field("reference_path", &self.reference_path)
            .field("current_path", &self.current_path)
            .field("tolerance", &self.tolerance)
            .field("strict_comparison", &self.strict_comparison)
            .field("diff_color", &self.diff_color)
            .finish_non_exhaustive()
    }
}

/// Outcome of one reconciliation, immutable once produced
#[derive(Debug)]
pub struct ComparisonResult {
    pub suite: SuiteId,
    pub state: StateName,
    /// Resolved reference path (verified to exist before the comparison ran)
    pub reference_path: PathBuf,
    /// Where the capture was persisted, inside the reconciler's working dir
    pub current_path: PathBuf,
    pub browser_id: BrowserId,
    pub session_id: SessionId,
    /// Equality verdict reported by the engine
    pub equal: bool,
    /// Deferred diff capability; invoking it is optional
    pub diff: DiffHandle,
}
