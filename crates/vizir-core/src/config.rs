//! Configuration model for the reconciliation pipeline
//!
//! Two layers of configuration reach this component:
//! - **System level**: the diff highlight color used for rendered artifacts.
//! - **Browser level**: default tolerance, strict-comparison flag, and the
//!   resolver that maps a (suite, state) pair to its reference-image path.
//!
//! The resolver is a trait so callers control the naming scheme; the bundled
//! `DirTreeResolver` covers the conventional `<root>/<suite>/<state>.png`
//! layout.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use vizir_core_types::{StateName, SuiteId};

use crate::errors::ReconcileError;

/// Browser-level default tolerance when none is configured
pub const DEFAULT_TOLERANCE: f64 = 2.5;

/// Policy trait resolving the reference-image path for a (suite, state) pair
///
/// Injected into `BrowserConfig` so the naming scheme stays a caller concern.
pub trait ReferencePathResolver: Send + Sync {
    /// Resolve the canonical reference path for the given suite and state
    fn reference_path(&self, suite: &SuiteId, state: &StateName) -> PathBuf;
}

/// Resolver mapping `(suite, state)` to `<root>/<suite>/<state>.png`
#[derive(Debug, Clone)]
pub struct DirTreeResolver {
    root: PathBuf,
}

impl DirTreeResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ReferencePathResolver for DirTreeResolver {
    fn reference_path(&self, suite: &SuiteId, state: &StateName) -> PathBuf {
        self.root
            .join(suite.as_str())
            .join(format!("{}.png", state.as_str()))
    }
}

/// RGB highlight color for rendered diff artifacts
///
/// Serialized as an `#rrggbb` hex string in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DiffColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl DiffColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl Default for DiffColor {
    /// Magenta, the conventional highlight for screenshot diffs
    fn default() -> Self {
        Self::new(0xff, 0x00, 0xff)
    }
}

impl std::str::FromStr for DiffColor {
    type Err = ReconcileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ReconcileError::InvalidDiffColor {
            value: s.to_string(),
        };
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| invalid())
        };
        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }
}

impl std::fmt::Display for DiffColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for DiffColor {
    type Error = ReconcileError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DiffColor> for String {
    fn from(color: DiffColor) -> Self {
        color.to_string()
    }
}

/// System-level configuration shared by every browser in a run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemConfig {
    /// Highlight color used when rendering diff artifacts
    #[serde(default)]
    pub diff_color: DiffColor,
}

/// Per-browser comparison configuration
#[derive(Clone)]
pub struct BrowserConfig {
    resolver: Arc<dyn ReferencePathResolver>,
    /// Default tolerance applied when a state carries no override
    pub tolerance: f64,
    /// Require pixel-exact matching, disabling tolerance-based leniency
    pub strict_comparison: bool,
}

impl BrowserConfig {
    pub fn new(
        resolver: Arc<dyn ReferencePathResolver>,
        tolerance: f64,
        strict_comparison: bool,
    ) -> Self {
        Self {
            resolver,
            tolerance,
            strict_comparison,
        }
    }

    /// Resolve the reference path for a (suite, state) pair
    pub fn reference_path(&self, suite: &SuiteId, state: &StateName) -> PathBuf {
        self.resolver.reference_path(suite, state)
    }
}

impl std::fmt::Debug for BrowserConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrowserConfig")
            .field("tolerance", &self.tolerance)
            .field("strict_comparison", &self.strict_comparison)
            .finish_non_exhaustive()
    }
}

impl BrowserConfig {
    /// Convenience constructor using `DirTreeResolver` and run defaults
    pub fn with_refs_root(root: impl AsRef<Path>) -> Self {
        Self::new(
            Arc::new(DirTreeResolver::new(root.as_ref())),
            DEFAULT_TOLERANCE,
            false,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dir_tree_resolver_layout() {
        let resolver = DirTreeResolver::new("refs");
        let path = resolver.reference_path(&SuiteId::new("suiteA"), &StateName::new("login"));
        assert_eq!(path, PathBuf::from("refs/suiteA/login.png"));
    }

    #[test]
    fn test_diff_color_parses_hex() {
        let color: DiffColor = "#ff00aa".parse().unwrap();
        assert_eq!(color, DiffColor::new(0xff, 0x00, 0xaa));
        assert_eq!(color.to_string(), "#ff00aa");
    }

    #[test]
    fn test_diff_color_rejects_malformed_input() {
        for bad in ["ff00aa", "#ff00a", "#ff00aabb", "#zz00aa", ""] {
            let err = bad.parse::<DiffColor>().unwrap_err();
            assert_eq!(err.code(), "ERR_INVALID_DIFF_COLOR");
        }
    }

    #[test]
    fn test_diff_color_default_is_magenta() {
        assert_eq!(DiffColor::default().to_string(), "#ff00ff");
    }

    #[test]
    fn test_system_config_round_trips_through_serde() {
        let config: SystemConfig = serde_json::from_str(r##"{"diff_color":"#00ff00"}"##).unwrap();
        assert_eq!(config.diff_color, DiffColor::new(0, 0xff, 0));
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("#00ff00"));
    }

    #[test]
    fn test_system_config_defaults_diff_color() {
        let config: SystemConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.diff_color, DiffColor::default());
    }
}
