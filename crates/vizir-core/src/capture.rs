//! Capture-side input types
//!
//! A `CaptureRequest` is what the upstream capture stage hands over per
//! screen state: the renderable image, the logical suite/state identity, and
//! the originating browser's identity, session and configuration.

use async_trait::async_trait;
use std::path::Path;
use vizir_core_types::{BrowserId, SessionId, StateName, SuiteId};

use crate::config::BrowserConfig;

/// A captured screen image that can be persisted to a file path
#[async_trait]
pub trait ScreenImage: Send + Sync {
    /// Persist the rendered capture to `dest` (PNG format)
    async fn persist(&self, dest: &Path) -> std::io::Result<()>;
}

/// An in-memory PNG buffer handed over by the capture stage
pub struct PngBuffer(Vec<u8>);

impl PngBuffer {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

#[async_trait]
impl ScreenImage for PngBuffer {
    async fn persist(&self, dest: &Path) -> std::io::Result<()> {
        tokio::fs::write(dest, &self.0).await
    }
}

/// Identity and configuration of the browser that produced a capture
#[derive(Debug, Clone)]
pub struct BrowserSession {
    pub id: BrowserId,
    pub session_id: SessionId,
    pub config: BrowserConfig,
}

/// One comparison request, consumed by a single `process_capture` call
pub struct CaptureRequest {
    pub image: Box<dyn ScreenImage>,
    pub suite: SuiteId,
    pub state: StateName,
    pub browser: BrowserSession,
    /// Per-state tolerance override. `Some(0.0)` demands an exact match and
    /// wins over the browser default; only `None` falls back.
    pub tolerance: Option<f64>,
    pub can_have_caret: bool,
}
