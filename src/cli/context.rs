//! Settings shared by every data command.

use super::output::{should_use_color, write_output, OutputTarget};
use crate::config::{AppConfig, Validatable, DEFAULT_DATA_FILE};
use crate::error::PermViewError;
use crate::parsers::parse_snapshot;
use crate::reports::{create_reporter_with_options, Report, ReportFormat};
use crate::session::Session;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Resolved configuration plus global flags for one invocation.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub config: AppConfig,
    /// Snapshot file to read
    pub data_path: PathBuf,
    pub format: ReportFormat,
    pub target: OutputTarget,
    pub colored: bool,
    pub quiet: bool,
}

impl CommandContext {
    /// Validate `config` and resolve the data path and output settings.
    ///
    /// `format`, `no_color` and `data` given on the command line take
    /// precedence over the config file.
    pub fn new(
        config: AppConfig,
        data: Option<PathBuf>,
        format: Option<ReportFormat>,
        output_file: Option<PathBuf>,
        no_color: bool,
        quiet: bool,
    ) -> Result<Self> {
        let errors = config.validate();
        if !errors.is_empty() {
            let joined = errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(PermViewError::config(joined).into());
        }

        let data_path = resolve_data_path(data.as_deref(), &config);
        let format = format.unwrap_or(config.output.format);
        let target = OutputTarget::from_option(output_file);
        let colored = should_use_color(no_color || config.output.no_color, &target);
        Ok(Self {
            config,
            data_path,
            format,
            target,
            colored,
            quiet,
        })
    }

    /// Read the snapshot file and load it into a fresh session.
    pub fn open_session(&self) -> Result<Session> {
        let snapshot = parse_snapshot(&self.data_path)
            .with_context(|| format!("failed to load {}", self.data_path.display()))?;
        tracing::info!(
            groups = snapshot.groups.len(),
            "Loaded snapshot from {}",
            self.data_path.display()
        );
        Ok(Session::with_snapshot(
            self.config.session_options(),
            Some(snapshot),
        ))
    }

    /// Render `report` in the selected format and write it out.
    pub fn emit(&self, report: &Report) -> Result<()> {
        let reporter = create_reporter_with_options(self.format, self.colored);
        let mut text = reporter.render(report)?;
        if !text.ends_with('\n') {
            text.push('\n');
        }
        write_output(&text, &self.target, self.quiet)
    }
}

/// Data file from the command line, else the config file, else
/// `UserPermissions.json` in the working directory.
#[must_use]
pub fn resolve_data_path(explicit: Option<&Path>, config: &AppConfig) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| config.data.path.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE))
}
