//! Optional `formwright.toml` configuration.
//!
//! ```toml
//! [store]
//! path = ".formwright"
//!
//! [output]
//! format = "json"
//!
//! [preview]
//! today = "2024-06-15"
//! ```
//!
//! Every key is optional. Command-line flags win over config values, which
//! win over built-in defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::OutputFormat;

/// Looked up in the current directory when `--config` is not given.
pub(crate) const DEFAULT_CONFIG_FILE: &str = "formwright.toml";

/// Directory used by the file-backed form store.
pub(crate) const DEFAULT_STORE_DIR: &str = ".formwright";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Config {
    pub store: StoreConfig,
    pub output: OutputConfig,
    pub preview: PreviewConfig,
}

/// `[store]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct StoreConfig {
    pub path: Option<PathBuf>,
}

/// `[output]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct OutputConfig {
    pub format: Option<OutputFormat>,
}

/// `[preview]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct PreviewConfig {
    /// Reference date for `age` formulas, `YYYY-MM-DD`.
    pub today: Option<String>,
}

impl Config {
    pub(crate) fn store_dir(&self) -> PathBuf {
        self.store
            .path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_DIR))
    }
}

/// Load the configuration named by `explicit`, or `formwright.toml` from
/// the current directory if that exists, or the defaults.
///
/// A missing explicit file is an error; a missing default file is not.
pub(crate) fn load_config(explicit: Option<&Path>) -> Result<Config, String> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => {
            let p = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !p.is_file() {
                return Ok(Config::default());
            }
            p
        }
    };
    read_config(&path)
}

fn read_config(path: &Path) -> Result<Config, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("could not read '{}': {}", path.display(), e))?;
    toml::from_str(&content).map_err(|e| format!("could not parse '{}': {}", path.display(), e))
}
