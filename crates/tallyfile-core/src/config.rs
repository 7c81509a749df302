//! Scan configuration types.

use std::path::{Path, PathBuf};

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// How a scanned file is turned into a ledger identifier.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum IdentifierStyle {
    /// File name with the extension stripped (`Room.java` -> `Room`).
    #[default]
    Stem,
    /// Root-relative path with the extension stripped, `/`-separated
    /// (`containers/Room.java` -> `containers/Room`).
    Path,
}

/// Configuration for inventory scans.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ScanConfig {
    /// Root path to scan.
    pub root: PathBuf,

    /// File extensions to track, without the leading dot.
    #[builder(default = "default_extensions()")]
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// How identifiers are derived from file paths.
    #[builder(default)]
    #[serde(default)]
    pub identifier_style: IdentifierStyle,

    /// Glob patterns to ignore, matched against names and relative paths.
    #[builder(default)]
    #[serde(default)]
    pub ignore_patterns: Vec<String>,

    /// Follow symbolic links.
    #[builder(default = "false")]
    #[serde(default)]
    pub follow_symlinks: bool,

    /// Maximum depth to traverse (None = unlimited).
    #[builder(default)]
    #[serde(default)]
    pub max_depth: Option<u32>,

    /// Number of threads for scanning (0 = auto-detect).
    #[builder(default = "0")]
    #[serde(default)]
    pub threads: usize,

    /// Include hidden files (starting with .).
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub include_hidden: bool,
}

fn default_true() -> bool {
    true
}

fn default_extensions() -> Vec<String> {
    vec!["java".to_string()]
}

impl ScanConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        match self.root {
            Some(ref root) if root.as_os_str().is_empty() => {
                return Err("Root path cannot be empty".to_string());
            }
            None => return Err("Root path is required".to_string()),
            _ => {}
        }
        if let Some(ref extensions) = self.extensions {
            if extensions.is_empty() {
                return Err("At least one extension is required".to_string());
            }
            if extensions.iter().any(|e| e.trim_start_matches('.').is_empty()) {
                return Err("Extensions cannot be empty".to_string());
            }
        }
        Ok(())
    }
}

impl ScanConfig {
    /// Create a new scan config builder.
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder::default()
    }

    /// Create a simple config for scanning a path with default settings.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extensions: default_extensions(),
            identifier_style: IdentifierStyle::Stem,
            ignore_patterns: Vec::new(),
            follow_symlinks: false,
            max_depth: None,
            threads: 0,
            include_hidden: true,
        }
    }

    /// Check whether a file is tracked, by extension. Case-sensitive, and a
    /// leading dot in the configured extension is ignored.
    pub fn matches_extension(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        self.extensions
            .iter()
            .any(|wanted| wanted.trim_start_matches('.') == ext)
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new(".")
    }
}
