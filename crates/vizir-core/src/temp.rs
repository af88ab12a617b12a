//! Collision-free temp-path allocation
//!
//! Every persisted capture gets a fresh path under the reconciler's working
//! directory. UUIDv7 stems keep allocations unique across concurrent
//! reconciliations without any locking. The allocator never deletes anything;
//! working-directory lifecycle belongs to the reconciler's owner.

use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Allocator for unique file paths under a fixed directory
#[derive(Debug, Clone)]
pub struct TempPaths {
    dir: PathBuf,
}

impl TempPaths {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory all allocated paths live under
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Allocate a fresh path with the given suffix (e.g. `".png"`)
    ///
    /// Safe under concurrent calls; no two allocations collide.
    pub fn alloc(&self, suffix: &str) -> PathBuf {
        self.dir
            .join(format!("capture-{}{}", Uuid::now_v7(), suffix))
    }
}
