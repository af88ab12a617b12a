//! Capture reconciler
//!
//! One reconciler is created per test run: `prepare` establishes the private
//! working directory and binds the image engine, then `process_capture` runs
//! once per captured screen state. Each invocation is an independent
//! asynchronous pipeline:
//!
//! persist capture → resolve reference path → verify reference exists →
//! compare → assemble result (diff rendering stays deferred).
//!
//! Multiple invocations may be in flight concurrently; the only shared
//! resources are the working directory (appended to under unique names) and
//! the stateless-per-call engine, so no locking is needed.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;
use vizir_core_types::schema;

use crate::capture::CaptureRequest;
use crate::config::SystemConfig;
use crate::engine::{ComparePolicy, ImageEngine};
use crate::errors::{NoRefImage, ReconcileError, Result};
use crate::result::{ComparisonResult, DiffHandle};
use crate::temp::TempPaths;

/// Lifecycle of a capture-processing component
///
/// `prepare` must be called exactly once and complete successfully before the
/// first `process_capture`.
#[async_trait]
pub trait CaptureProcessor {
    /// Make the component ready for comparisons
    async fn prepare(&mut self) -> Result<()>;

    /// Reconcile one capture against its stored reference
    async fn process_capture(&self, request: CaptureRequest) -> Result<ComparisonResult>;
}

/// Reconciles captured screen images against stored references
pub struct CaptureReconciler {
    engine: Arc<dyn ImageEngine>,
    system: SystemConfig,
    temp: TempPaths,
    prepared: bool,
}

impl CaptureReconciler {
    /// Create a reconciler bound to `engine`
    ///
    /// # Arguments
    /// * `system` - system-level configuration (diff highlight color)
    /// * `engine` - comparison engine used for the lifetime of the reconciler
    /// * `work_dir` - working-directory override; a fresh directory under the
    ///   OS temp dir is chosen when absent
    pub fn new(
        system: SystemConfig,
        engine: Arc<dyn ImageEngine>,
        work_dir: Option<PathBuf>,
    ) -> Self {
        let dir = work_dir
            .unwrap_or_else(|| std::env::temp_dir().join(format!("vizir-{}", Uuid::now_v7())));
        Self {
            engine,
            system,
            temp: TempPaths::new(dir),
            prepared: false,
        }
    }

    /// The private working directory persisted captures are written into
    pub fn work_dir(&self) -> &Path {
        self.temp.dir()
    }

    /// Remove the working directory and every capture persisted into it
    ///
    /// Explicit owner-level call; nothing is cleaned up implicitly. Paths in
    /// previously returned results become dangling after this.
    pub async fn cleanup(&self) -> Result<()> {
        match tokio::fs::remove_dir_all(self.temp.dir()).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ReconcileError::io("remove_work_dir", self.temp.dir(), e)),
        }
    }
}

#[async_trait]
impl CaptureProcessor for CaptureReconciler {
    /// Ensure the working directory exists (created recursively if absent)
    ///
    /// Failure to create it is fatal to the run and propagated, not retried.
    async fn prepare(&mut self) -> Result<()> {
        tokio::fs::create_dir_all(self.temp.dir())
            .await
            .map_err(|e| ReconcileError::io("create_work_dir", self.temp.dir(), e))?;
        self.prepared = true;
        tracing::debug!(
            component = module_path!(),
            op = "prepare",
            event = schema::EVENT_END,
            work_dir = %self.temp.dir().display(),
        );
        Ok(())
    }

    async fn process_capture(&self, request: CaptureRequest) -> Result<ComparisonResult> {
        if !self.prepared {
            return Err(ReconcileError::NotPrepared);
        }

        tracing::debug!(
            component = module_path!(),
            op = "process_capture",
            event = schema::EVENT_START,
            suite = %request.suite,
            state = %request.state,
            browser_id = %request.browser.id,
        );

        let browser_config = &request.browser.config;
        // An explicit per-state override wins, including an explicit zero;
        // only its absence falls back to the browser default.
        let tolerance = request.tolerance.unwrap_or(browser_config.tolerance);

        let current_path = self.temp.alloc(".png");
        request
            .image
            .persist(&current_path)
            .await
            .map_err(|e| ReconcileError::io("persist_capture", &current_path, e))?;

        let reference_path = browser_config.reference_path(&request.suite, &request.state);
        let ref_exists = tokio::fs::try_exists(&reference_path)
            .await
            .map_err(|e| ReconcileError::io("check_reference", &reference_path, e))?;

        if !ref_exists {
            tracing::info!(
                component = module_path!(),
                op = "process_capture",
                event = schema::EVENT_END_ERROR,
                suite = %request.suite,
                state = %request.state,
                reference_path = %reference_path.display(),
            );
            return Err(ReconcileError::MissingReference(NoRefImage {
                reference_path,
                suite: request.suite,
                state: request.state,
                current_path,
                browser_id: request.browser.id,
            }));
        }

        let equal = self
            .engine
            .compare(
                &current_path,
                &reference_path,
                ComparePolicy {
                    tolerance,
                    strict_comparison: browser_config.strict_comparison,
                    can_have_caret: request.can_have_caret,
                },
            )
            .await?;

        tracing::debug!(
            component = module_path!(),
            op = "process_capture",
            event = schema::EVENT_END,
            suite = %request.suite,
            state = %request.state,
            equal,
        );

        let diff = DiffHandle::new(
            Arc::clone(&self.engine),
            reference_path.clone(),
            current_path.clone(),
            tolerance,
            browser_config.strict_comparison,
            self.system.diff_color,
        );

        Ok(ComparisonResult {
            suite: request.suite,
            state: request.state,
            reference_path,
            current_path,
            browser_id: request.browser.id,
            session_id: request.browser.session_id,
            equal,
            diff,
        })
    }
}
