use std::path::Path;

use serde::{Deserialize, Serialize};

/// Runtime settings for a showcase session.
///
/// Every field has a default, so a config file only needs the keys it
/// overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShowcaseConfig {
    /// Id of the container holding the traced code.
    pub code_root_id: String,
    /// Tag of inline token wrappers and of the markers themselves.
    pub wrapper_tag: String,
    pub marker_prefix: String,
    pub highlight_duration_ms: u64,
    /// Width the app panel aims for when laid out next to the code.
    pub app_target_width: f64,
}

impl Default for ShowcaseConfig {
    fn default() -> Self {
        Self {
            code_root_id: "server-r-code".to_string(),
            wrapper_tag: "span".to_string(),
            marker_prefix: "srcref_".to_string(),
            highlight_duration_ms: 1600,
            app_target_width: 960.0,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ShowcaseConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }
}
