//! Summary command handler.
//!
//! Prints snapshot freshness, collection totals and one line per group.

use super::context::CommandContext;
use crate::model::Snapshot;
use crate::reports::{Report, Section};
use crate::session::Session;
use anyhow::Result;
use chrono::{DateTime, Utc};

/// Run the summary command
pub fn run_summary(ctx: &CommandContext) -> Result<()> {
    let session = ctx.open_session()?;
    ctx.emit(&summary_report(&session, Utc::now()))
}

/// Build the summary report for a loaded session.
#[must_use]
pub fn summary_report(session: &Session, now: DateTime<Utc>) -> Report {
    let store = session.store();
    let index = store.index();

    let mut totals = Section::new("Totals", &["Collection", "Count"]);
    let memberships = store.snapshot().map_or(0, Snapshot::membership_count);
    for (label, count) in [
        ("Groups", store.groups().len()),
        ("Users", index.user_count()),
        ("Memberships", memberships),
        ("Applications", index.app_count()),
        ("Permissions", index.permission_count()),
    ] {
        totals.push_row([label.to_string(), count.to_string()]);
    }

    let mut groups = Section::new("Groups", &["Group", "Domain", "Members", "Applications"]);
    for group in store.groups() {
        groups.push_row([
            group.name.clone(),
            group.domain.clone(),
            group.users.len().to_string(),
            group.app_permissions.len().to_string(),
        ]);
    }

    Report::new("Snapshot Summary")
        .with_note(session.data_updated_text(now))
        .with_section(totals)
        .with_section(groups)
}
