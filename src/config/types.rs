//! Configuration types for permview.

use super::defaults::DEFAULT_DEBOUNCE_MS;
use crate::pivot::ViewMode;
use crate::reports::ReportFormat;
use crate::session::SessionOptions;
use crate::viewmodel::DEFAULT_PLACEHOLDER;
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Top-level configuration, loaded from a YAML file and overridden by CLI
/// arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// Filter box behavior
    pub filter: FilterConfig,
    /// Pivot view defaults
    pub view: ViewConfig,
    /// Human-readable labels
    pub labels: LabelsConfig,
    /// Snapshot location
    pub data: DataConfig,
    /// Output settings
    pub output: OutputConfig,
}

impl AppConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Session tunables derived from this configuration.
    #[must_use]
    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            debounce: Duration::from_millis(self.filter.debounce_ms),
            placeholder: self.filter.placeholder.clone(),
            default_mode: self.view.default_mode,
            labels: self.labels.permissions.clone(),
        }
    }
}

// ============================================================================
// Sections
// ============================================================================

/// Filter box configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct FilterConfig {
    /// Quiet period after the last keystroke before a filter applies (ms)
    pub debounce_ms: u64,
    /// Placeholder text; a query equal to it is treated as empty
    pub placeholder: String,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
        }
    }
}

/// Pivot view configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ViewConfig {
    /// Join order used at startup
    pub default_mode: ViewMode,
}

/// Label tables
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct LabelsConfig {
    /// Permission code -> display label
    pub permissions: IndexMap<String, String>,
}

/// Snapshot source configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DataConfig {
    /// Path to the exported permissions JSON
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Output-related configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format
    pub format: ReportFormat,
    /// Disable colored output
    pub no_color: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.filter.debounce_ms, 200);
        assert_eq!(config.filter.placeholder, "filter...");
        assert_eq!(config.view.default_mode, ViewMode::UserGroupAppPerm);
        assert_eq!(config.output.format, ReportFormat::Table);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let yaml = "view:\n  default_mode: user-perm-app-group\nlabels:\n  permissions:\n    permPrint: Print receipts\n";
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.view.default_mode, ViewMode::UserPermAppGroup);
        assert_eq!(config.filter.debounce_ms, 200);
        assert_eq!(
            config.labels.permissions.get("permPrint").map(String::as_str),
            Some("Print receipts")
        );
    }

    #[test]
    fn test_session_options() {
        let mut config = AppConfig::default();
        config.filter.debounce_ms = 50;
        let options = config.session_options();
        assert_eq!(options.debounce, Duration::from_millis(50));
        assert_eq!(options.placeholder, "filter...");
    }
}
