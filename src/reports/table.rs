//! Plain-text table reporter for terminal output.

use super::{Report, ReportError, ReportFormat, ReportGenerator, Section};
use std::fmt::Write;

/// Apply ANSI color formatting if colored output is enabled.
fn ansi_color(text: &str, color: &str, colored: bool) -> String {
    if colored {
        match color {
            "bold" => format!("\x1b[1m{text}\x1b[0m"),
            "dim" => format!("\x1b[2m{text}\x1b[0m"),
            "cyan" => format!("\x1b[36m{text}\x1b[0m"),
            _ => text.to_string(),
        }
    } else {
        text.to_string()
    }
}

/// Table reporter for shell output
pub struct TableReporter {
    colored: bool,
}

impl TableReporter {
    #[must_use]
    pub const fn new() -> Self {
        Self { colored: true }
    }

    /// Disable colored output
    #[must_use]
    pub const fn no_color(mut self) -> Self {
        self.colored = false;
        self
    }

    fn color(&self, text: &str, color: &str) -> String {
        ansi_color(text, color, self.colored)
    }

    fn render_section(&self, out: &mut String, section: &Section) -> Result<(), ReportError> {
        writeln!(out, "{}", self.color(&section.heading, "cyan"))?;
        if section.is_empty() {
            writeln!(out, "  {}", self.color("(none)", "dim"))?;
            return Ok(());
        }

        let widths: Vec<usize> = section
            .columns
            .iter()
            .map(|col| {
                section
                    .rows
                    .iter()
                    .filter_map(|row| row.get(col))
                    .map(|v| v.chars().count())
                    .chain(std::iter::once(col.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let header: Vec<String> = section
            .columns
            .iter()
            .zip(&widths)
            .map(|(col, &w)| pad(col, w))
            .collect();
        writeln!(out, "  {}", self.color(header.join("  ").trim_end(), "bold"))?;

        for row in &section.rows {
            let cells: Vec<String> = section
                .columns
                .iter()
                .zip(&widths)
                .map(|(col, &w)| pad(row.get(col).map_or("", String::as_str), w))
                .collect();
            writeln!(out, "  {}", cells.join("  ").trim_end())?;
        }
        Ok(())
    }
}

impl Default for TableReporter {
    fn default() -> Self {
        Self::new()
    }
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{text}{}", " ".repeat(width.saturating_sub(len)))
}

impl ReportGenerator for TableReporter {
    fn render(&self, report: &Report) -> Result<String, ReportError> {
        let mut out = String::new();
        writeln!(out, "{}", self.color(&report.title, "bold"))?;
        writeln!(out, "{}", self.color(&"─".repeat(40), "dim"))?;
        for note in &report.notes {
            writeln!(out, "{note}")?;
        }
        for section in &report.sections {
            writeln!(out)?;
            self.render_section(&mut out, section)?;
        }
        Ok(out)
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Table
    }
}
