//! Configuration file loading and discovery.
//!
//! A missing or unreadable file never stops a command: callers fall back
//! to defaults and a warning is logged.

use super::types::AppConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File names recognized in each search directory, in priority order.
pub const CONFIG_FILE_NAMES: &[&str] = &[
    ".permview.yaml",
    ".permview.yml",
    "permview.yaml",
    "permview.yml",
];

/// Per-user configuration directory (`~/.config/permview` on Linux).
#[must_use]
pub fn user_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("permview"))
}

/// Directories searched for a config file: the working directory, the
/// user config directory, then home.
#[must_use]
pub fn search_dirs() -> Vec<PathBuf> {
    [
        std::env::current_dir().ok(),
        user_config_dir(),
        dirs::home_dir(),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Locate the config file to load.
///
/// An explicit path wins when it exists; otherwise the first recognized
/// file name found in [`search_dirs`].
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path.filter(|p| p.exists()) {
        return Some(path.to_path_buf());
    }
    search_dirs().iter().find_map(|dir| {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file())
    })
}

#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Load an `AppConfig` from a YAML file.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(AppConfig::default());
    }
    let config: AppConfig = serde_yaml::from_str(&content)?;
    Ok(config)
}

/// Load config from discovered file, or return default.
#[must_use]
pub fn load_or_default(explicit_path: Option<&Path>) -> (AppConfig, Option<PathBuf>) {
    discover_config_file(explicit_path).map_or_else(
        || (AppConfig::default(), None),
        |path| match load_config_file(&path) {
            Ok(config) => {
                tracing::debug!("Loaded config from {}", path.display());
                (config, Some(path))
            }
            Err(e) => {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                (AppConfig::default(), None)
            }
        },
    )
}

// ============================================================================
// Example Config Generation
// ============================================================================

/// Generate an example config file content.
#[must_use]
pub fn generate_example_config() -> String {
    let mut example = AppConfig::default();
    example
        .labels
        .permissions
        .insert("permPrint".to_string(), "Print receipts".to_string());
    format!(
        r"# permview configuration
# Place this file at .permview.yaml in the working directory or ~/.config/permview/

{}",
        serde_yaml::to_string(&example).unwrap_or_default()
    )
}
