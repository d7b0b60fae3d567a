//! Pivot command handler.
//!
//! Roots the three-panel pivot at one user and prints each panel. Rows of
//! panels 1 and 2 can be selected by label to drill past the default
//! cascade.

use super::context::CommandContext;
use super::find_row;
use crate::error::PermViewError;
use crate::pivot::{PanelRow, ViewMode};
use crate::reports::{sections, Report};
use crate::session::Session;
use anyhow::Result;
use chrono::{DateTime, Utc};

/// Root user, join order and drill-down labels.
#[derive(Debug, Clone, Default)]
pub struct PivotQuery {
    pub user: String,
    /// Defaults to the configured view mode
    pub mode: Option<ViewMode>,
    /// Labels to select in panel 1, then panel 2
    pub select: Vec<String>,
}

/// Run the pivot command
pub fn run_pivot(ctx: &CommandContext, query: &PivotQuery) -> Result<()> {
    let mut session = ctx.open_session()?;
    let report = pivot_report(&mut session, query, Utc::now())?;
    ctx.emit(&report)
}

/// Drive `session` through `query` and report the three panels.
pub fn pivot_report(
    session: &mut Session,
    query: &PivotQuery,
    now: DateTime<Utc>,
) -> Result<Report> {
    let user = query.user.trim();
    if session.store().index().user(user).is_none() {
        return Err(PermViewError::validation(format!("unknown user '{user}'")).into());
    }
    if let Some(mode) = query.mode {
        session.set_view_mode(mode);
    }
    session.select_user(Some(user));

    for (slot, label) in query.select.iter().enumerate() {
        let Some(panel) = session.pivot_panel(slot).filter(|_| slot < 2) else {
            tracing::warn!("Ignoring selection '{label}': only panels 1 and 2 can be selected");
            continue;
        };
        let header = session.panel_headers()[slot];
        let index = find_row(panel.items(), header, label, |row| row_matches(row, label))?;
        if slot == 0 {
            session.select_panel1(Some(index));
        } else {
            session.select_panel2(Some(index));
        }
    }

    let mode = session.view_mode();
    let mut report = Report::new(mode.display_name()).with_note(session.selected_user_caption());
    let path: Vec<&str> = (0..3)
        .filter_map(|slot| session.selected_pivot_row(slot))
        .map(PanelRow::label)
        .collect();
    if !path.is_empty() {
        report = report.with_note(format!("Selected: {}", path.join(" > ")));
    }
    report = report.with_note(session.data_updated_text(now));

    let headers = mode.panel_headers();
    let columns = mode.column_headers();
    for slot in 0..3 {
        if let Some(panel) = session.pivot_panel(slot) {
            report = report.with_section(sections::panel(
                headers[slot],
                columns[slot],
                panel.visible(),
            ));
        }
    }
    Ok(report)
}

fn row_matches(row: &PanelRow, label: &str) -> bool {
    let label = label.trim();
    row.label().eq_ignore_ascii_case(label)
        || row
            .as_permission()
            .is_some_and(|p| p.code.eq_ignore_ascii_case(label))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::tests::sample_session;

    fn panel_labels(report: &Report, section: usize) -> Vec<&str> {
        let heading = report.sections[section].columns[0].as_str();
        report.sections[section]
            .rows
            .iter()
            .map(|row| row[heading].as_str())
            .collect()
    }

    #[test]
    fn test_default_cascade() {
        let mut session = sample_session();
        let query = PivotQuery {
            user: "T001".to_string(),
            ..PivotQuery::default()
        };
        let report = pivot_report(&mut session, &query, Utc::now()).unwrap();

        assert_eq!(report.title, "User-Group-App-Perm");
        assert_eq!(report.notes[0], "Teller No: T001");
        assert_eq!(report.notes[1], "Selected: Tellers > Teller App");
        assert_eq!(panel_labels(&report, 0), vec!["Tellers"]);
        assert_eq!(panel_labels(&report, 1), vec!["Teller App"]);
        assert_eq!(panel_labels(&report, 2), vec!["permPrint"]);
    }

    #[test]
    fn test_perm_rooted_mode() {
        let mut session = sample_session();
        let query = PivotQuery {
            user: "T001".to_string(),
            mode: Some(ViewMode::UserPermAppGroup),
            ..PivotQuery::default()
        };
        let report = pivot_report(&mut session, &query, Utc::now()).unwrap();

        assert_eq!(report.sections[0].heading, "Permissions");
        assert_eq!(panel_labels(&report, 0), vec!["permPrint"]);
        assert_eq!(panel_labels(&report, 1), vec!["Teller App"]);
        assert_eq!(panel_labels(&report, 2), vec!["Tellers"]);
    }

    #[test]
    fn test_select_drills_into_second_group() {
        let mut session = sample_session();
        let query = PivotQuery {
            user: "jadmin".to_string(),
            select: vec!["admins".to_string()],
            ..PivotQuery::default()
        };
        let report = pivot_report(&mut session, &query, Utc::now()).unwrap();

        assert_eq!(panel_labels(&report, 0), vec!["Tellers", "Admins"]);
        assert_eq!(panel_labels(&report, 1), vec!["Console"]);
        assert_eq!(panel_labels(&report, 2), vec!["permAudit"]);
    }

    #[test]
    fn test_unknown_user_and_row() {
        let mut session = sample_session();
        let unknown = PivotQuery {
            user: "nobody".to_string(),
            ..PivotQuery::default()
        };
        assert!(pivot_report(&mut session, &unknown, Utc::now()).is_err());

        let bad_row = PivotQuery {
            user: "T001".to_string(),
            select: vec!["Admins".to_string()],
            ..PivotQuery::default()
        };
        let err = pivot_report(&mut session, &bad_row, Utc::now()).unwrap_err();
        assert!(err.to_string().contains("Admins"));
    }
}
