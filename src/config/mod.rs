//! Optional YAML settings for the command-line tool.
//!
//! # Configuration File
//!
//! Place a `.permview.yaml` file in the working directory or
//! `~/.config/permview/`:
//!
//! ```yaml
//! filter:
//!   debounce_ms: 200
//!   placeholder: "filter..."
//! view:
//!   default_mode: user-group-app-perm
//! labels:
//!   permissions:
//!     permPrint: Print receipts
//! data:
//!   path: /srv/exports/UserPermissions.json
//! ```

mod defaults;
pub mod file;
mod types;
mod validation;

pub use defaults::{DEFAULT_DATA_FILE, DEFAULT_DEBOUNCE_MS, MAX_DEBOUNCE_MS};
pub use types::{AppConfig, DataConfig, FilterConfig, LabelsConfig, OutputConfig, ViewConfig};
pub use validation::{ConfigError, Validatable};

pub use file::{
    discover_config_file, generate_example_config, load_config_file, load_or_default,
    search_dirs, user_config_dir, ConfigFileError, CONFIG_FILE_NAMES,
};

/// JSON Schema describing `.permview.yaml`, for editor completion.
pub fn generate_json_schema() -> Result<String, serde_json::Error> {
    let schema = schemars::schema_for!(AppConfig);
    serde_json::to_string_pretty(&schema)
}
