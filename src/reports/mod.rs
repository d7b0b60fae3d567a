//! Report generation for pivot and lookup results.
//!
//! Commands assemble a [`Report`] from [`Section`]s, then hand it to a
//! [`ReportGenerator`] for the selected [`ReportFormat`]:
//! - Table: Aligned terminal output
//! - JSON: Structured data for scripting

mod json;
pub mod sections;
mod table;
mod types;

pub use json::JsonReporter;
pub use table::TableReporter;
pub use types::{Report, ReportFormat, Section};

use std::io::Write;
use thiserror::Error;

/// Errors that can occur during report generation
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Format error: {0}")]
    FormatError(#[from] std::fmt::Error),
}

/// Trait for report generators
pub trait ReportGenerator {
    /// Render a report to a string
    fn render(&self, report: &Report) -> Result<String, ReportError>;

    /// Write a rendered report to a writer
    fn write_report(&self, report: &Report, writer: &mut dyn Write) -> Result<(), ReportError> {
        let text = self.render(report)?;
        writer.write_all(text.as_bytes())?;
        if !text.ends_with('\n') {
            writer.write_all(b"\n")?;
        }
        Ok(())
    }

    /// Get the format this generator produces
    fn format(&self) -> ReportFormat;
}

/// Create a report generator for the given format
#[must_use]
pub fn create_reporter(format: ReportFormat) -> Box<dyn ReportGenerator> {
    create_reporter_with_options(format, true)
}

/// Create a report generator with color control
#[must_use]
pub fn create_reporter_with_options(
    format: ReportFormat,
    colored: bool,
) -> Box<dyn ReportGenerator> {
    match format {
        ReportFormat::Table => {
            let reporter = TableReporter::new();
            if colored {
                Box::new(reporter)
            } else {
                Box::new(reporter.no_color())
            }
        }
        ReportFormat::Json => Box::new(JsonReporter::new()),
    }
}
