//! Users command handler.

use super::context::CommandContext;
use crate::reports::{sections, Report};
use crate::session::{FilterTarget, Session, Tab};
use crate::viewmodel::{PanelId, SortField};
use anyhow::Result;
use clap::ValueEnum;
use std::time::Instant;

/// Filter and sort options for the user list.
#[derive(Debug, Clone, Default)]
pub struct UsersQuery {
    /// Substring matched against identifier, name, department, title and email
    pub filter: Option<String>,
    pub sort: Option<SortField>,
    pub descending: bool,
}

/// Run the users command
pub fn run_users(ctx: &CommandContext, query: &UsersQuery) -> Result<()> {
    let mut session = ctx.open_session()?;
    ctx.emit(&users_report(&mut session, query))
}

/// Apply `query` to the root user list and report the visible rows.
pub fn users_report(session: &mut Session, query: &UsersQuery) -> Report {
    if let Some(text) = &query.filter {
        session.set_filter_query(FilterTarget::Users, text, Instant::now());
        session.flush_filters();
    }

    let field = query
        .sort
        .or_else(|| query.descending.then(|| PanelId::Users.default_sort_field()));
    if let Some(field) = field {
        session.toggle_sort(PanelId::Users, field);
        if query.descending {
            session.toggle_sort(PanelId::Users, field);
        }
    }

    let list = session.user_list(FilterTarget::Users);
    let mut report = Report::new(Tab::Users.title()).with_note(format!(
        "{} of {} users",
        list.visible_indices().len(),
        list.len()
    ));
    if let Some((field, direction)) = list.sort().directive() {
        let name = field
            .to_possible_value()
            .map_or_else(|| format!("{field:?}"), |v| v.get_name().to_string());
        report = report.with_note(format!("Sorted by {name} {}", direction.indicator()));
    }
    report.with_section(sections::users("Users", list.visible()))
}
