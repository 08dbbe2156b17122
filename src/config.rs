//! Pipeline configuration.
//!
//! Every field has a default, so a config file only needs the keys it changes:
//!
//! ```json
//! { "scrape": { "requestGapMs": 500 }, "analysis": { "window": { "rolling": { "days": 14 } } } }
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{ProwlError, Result};
use crate::tools::analyze::AnalysisConfig;
use crate::tools::scrape::ScrapeConfig;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PipelineConfig {
    pub scrape: ScrapeConfig,
    pub analysis: AnalysisConfig,
}

impl PipelineConfig {
    /// Parse a config document.
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| ProwlError::Config(e.to_string()))
    }

    /// Load from an explicit path. Missing or invalid files are errors.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ProwlError::Config(format!("{}: {e}", path.display())))?;
        serde_json::from_str(&raw).map_err(|e| ProwlError::Config(format!("{}: {e}", path.display())))
    }

    /// `explicit` if given, else the user config file if present, else defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_path(path);
        }
        match default_config_path() {
            Some(path) if path.exists() => {
                tracing::debug!(path = %path.display(), "loading user config");
                Self::from_path(&path)
            }
            _ => Ok(Self::default()),
        }
    }
}

/// `<config dir>/prowl/config.json` for the current platform.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("io", "prowl", "prowl").map(|dirs| dirs.config_dir().join("config.json"))
}
