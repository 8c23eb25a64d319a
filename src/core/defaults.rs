use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::paths;

/// Root configuration structure for slugswap.json
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct SlugswapConfig {
    #[serde(default)]
    pub defaults: Defaults,
}

/// Defaults that can be overridden via slugswap.json.
///
/// The scan policy (ignored directories, allowed extensions) is fixed and is
/// not read from this file.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Defaults {
    /// Project root used when `--directory` is omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,

    #[serde(default)]
    pub output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

// =============================================================================
// Loading functions
// =============================================================================

/// Load defaults, falling back to built-in defaults if slugswap.json is missing or invalid.
pub fn load_defaults() -> Defaults {
    load_config().defaults
}

/// Load the full slugswap.json config, falling back to defaults on any error.
pub fn load_config() -> SlugswapConfig {
    paths::slugswap_json()
        .and_then(|path| load_config_from(&path))
        .unwrap_or_default()
}

/// Load config from an explicit file. A missing file yields built-in defaults.
pub fn load_config_from(path: &Path) -> Result<SlugswapConfig> {
    if !path.exists() {
        return Ok(SlugswapConfig::default());
    }

    let content = fs::read_to_string(path).map_err(|e| {
        Error::internal_io(e.to_string(), Some(format!("read {}", path.display())))
    })?;

    serde_json::from_str(&content)
        .map_err(|e| Error::config_invalid_json(path.display().to_string(), e))
}

/// Check if slugswap.json file exists
pub fn config_exists() -> bool {
    paths::slugswap_json()
        .map(|p| p.exists())
        .unwrap_or(false)
}

/// Get the path to slugswap.json (for display purposes)
pub fn config_path() -> Result<String> {
    Ok(paths::slugswap_json()?.display().to_string())
}

/// Get built-in defaults (ignoring any file config)
pub fn builtin_defaults() -> Defaults {
    Defaults::default()
}

// =============================================================================
// Root resolution
// =============================================================================

/// Pick the scan root: explicit `--directory`, then the configured project root,
/// then the current working directory. `~` is expanded in both path sources.
pub fn resolve_root(explicit: Option<&str>, defaults: &Defaults) -> Result<PathBuf> {
    if let Some(dir) = explicit.or(defaults.directory.as_deref()) {
        if dir.trim().is_empty() {
            return Err(Error::validation_invalid_argument(
                "directory",
                "Directory must not be empty",
            ));
        }
        return Ok(PathBuf::from(shellexpand::tilde(dir).to_string()));
    }

    std::env::current_dir().map_err(|e| {
        Error::internal_io(e.to_string(), Some("resolve current directory".to_string()))
    })
}
