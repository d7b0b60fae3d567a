//! CLI command handlers.
//!
//! This module provides testable command handlers that are invoked by main.rs.
//! Each handler loads the snapshot into a [`Session`](crate::session::Session),
//! drives it the way the interactive viewer would, and prints the resulting
//! panels through the selected reporter.

mod context;
mod lookup;
mod output;
mod pivot;
mod summary;
mod users;

pub use context::{resolve_data_path, CommandContext};
pub use lookup::{app_report, group_report, permission_report, run_app, run_group, run_permission};
pub use output::{should_use_color, write_output, OutputTarget};
pub use pivot::{pivot_report, run_pivot, PivotQuery};
pub use summary::{run_summary, summary_report};
pub use users::{run_users, users_report, UsersQuery};

use crate::error::PermViewError;

/// Position of the first item matching `pred`, or a validation error
/// naming `needle`.
fn find_row<T>(
    items: &[T],
    what: &str,
    needle: &str,
    pred: impl FnMut(&T) -> bool,
) -> anyhow::Result<usize> {
    items.iter().position(pred).ok_or_else(|| {
        PermViewError::validation(format!("no {} matching '{}'", what.to_lowercase(), needle.trim()))
            .into()
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use crate::model::{AppPermission, Group, Snapshot, User};
    use crate::session::{Session, SessionOptions};

    pub(crate) fn sample_session() -> Session {
        let snapshot = Snapshot::new(vec![
            Group::new("Tellers")
                .with_user(User::new("T001", "Tina Teller"))
                .with_user(User::new("jadmin", "Jane Admin"))
                .with_app(
                    AppPermission::new("Teller App")
                        .with_flag("permPrint", "1")
                        .with_flag("permOCR", "0"),
                ),
            Group::new("Admins")
                .with_user(User::new("jadmin", "Jane Admin"))
                .with_user(User::new("bsmith", "Bob Smith"))
                .with_app(AppPermission::new("Console").with_flag("permAudit", "1")),
        ]);
        Session::with_snapshot(SessionOptions::default(), Some(snapshot))
    }

    #[test]
    fn test_find_row_error_names_needle() {
        let err = super::find_row(&[1, 2, 3], "Group", " Auditors ", |n| *n == 7).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation failed: no group matching 'Auditors'"
        );
    }
}
