//! Configuration validation.

use super::defaults::MAX_DEBOUNCE_MS;
use super::types::{AppConfig, DataConfig, FilterConfig, LabelsConfig};
use thiserror::Error;

/// One rejected setting, named by its dotted YAML path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ConfigError {
    pub field: String,
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A config section that can check its own values.
pub trait Validatable {
    /// Every problem found; empty when valid.
    fn validate(&self) -> Vec<ConfigError>;

    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        [
            self.filter.validate(),
            self.labels.validate(),
            self.data.validate(),
        ]
        .concat()
    }
}

impl Validatable for FilterConfig {
    fn validate(&self) -> Vec<ConfigError> {
        if self.debounce_ms <= MAX_DEBOUNCE_MS {
            return Vec::new();
        }
        vec![ConfigError::new(
            "filter.debounce_ms",
            format!(
                "Debounce must be at most {MAX_DEBOUNCE_MS} ms, got {}",
                self.debounce_ms
            ),
        )]
    }
}

impl Validatable for LabelsConfig {
    fn validate(&self) -> Vec<ConfigError> {
        self.permissions
            .iter()
            .filter_map(|(code, label)| {
                if code.trim().is_empty() {
                    Some(ConfigError::new(
                        "labels.permissions",
                        "Permission code must not be blank",
                    ))
                } else if label.trim().is_empty() {
                    Some(ConfigError::new(
                        format!("labels.permissions.{code}"),
                        "Label must not be blank",
                    ))
                } else {
                    None
                }
            })
            .collect()
    }
}

impl Validatable for DataConfig {
    fn validate(&self) -> Vec<ConfigError> {
        self.path
            .iter()
            .filter(|path| path.is_dir())
            .map(|path| {
                ConfigError::new(
                    "data.path",
                    format!("{} is a directory, expected a JSON file", path.display()),
                )
            })
            .collect()
    }
}
