//! Image engine collaborator seam
//!
//! The reconciler never touches pixels itself; it drives an `ImageEngine`
//! through two operations: an equality check under a comparison policy, and
//! an on-demand diff rendering. `vizir-compare` ships the default
//! implementation; tests inject scripted fakes through the same trait.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::config::DiffColor;
use crate::errors::EngineError;

/// Policy applied to a single comparison
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComparePolicy {
    /// Maximum acceptable per-channel pixel difference
    pub tolerance: f64,
    /// Require pixel-exact matching, ignoring `tolerance`
    pub strict_comparison: bool,
    /// The captured state may legitimately contain a text caret
    pub can_have_caret: bool,
}

/// Inputs for rendering a diff artifact
///
/// Mirrors the comparison that produced the verdict: same reference/current
/// paths, same tolerance and strictness, plus the highlight color and the
/// target path for the rendered file.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffRequest {
    pub reference: PathBuf,
    pub current: PathBuf,
    /// Target path the rendered artifact is written to
    pub diff: PathBuf,
    pub diff_color: DiffColor,
    pub tolerance: f64,
    pub strict_comparison: bool,
}

/// Asynchronous image comparison engine
///
/// Implementations must be stateless per call: concurrent invocations from
/// in-flight reconciliations share one engine instance.
#[async_trait]
pub trait ImageEngine: Send + Sync {
    /// Compare two stored images under the given policy
    ///
    /// # Returns
    /// * `true` - images are equal within the policy
    /// * `false` - images differ
    async fn compare(
        &self,
        current: &Path,
        reference: &Path,
        policy: ComparePolicy,
    ) -> Result<bool, EngineError>;

    /// Render a diff artifact to `request.diff`
    ///
    /// Must be deterministic: identical inputs produce identical output bytes.
    async fn build_diff(&self, request: DiffRequest) -> Result<(), EngineError>;
}
