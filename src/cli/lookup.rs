//! Group, application and permission command handlers.

use super::context::CommandContext;
use super::find_row;
use crate::reports::{sections, Report};
use crate::session::{FilterTarget, Session, Tab};
use anyhow::Result;

/// Run the group command
pub fn run_group(ctx: &CommandContext, name: &str, app: Option<&str>) -> Result<()> {
    let mut session = ctx.open_session()?;
    let report = group_report(&mut session, name, app)?;
    ctx.emit(&report)
}

/// Run the app command
pub fn run_app(ctx: &CommandContext, name: &str) -> Result<()> {
    let mut session = ctx.open_session()?;
    let report = app_report(&mut session, name)?;
    ctx.emit(&report)
}

/// Run the permission command
pub fn run_permission(ctx: &CommandContext, code: &str, app: Option<&str>) -> Result<()> {
    let mut session = ctx.open_session()?;
    let report = permission_report(&mut session, code, app)?;
    ctx.emit(&report)
}

fn same_app(key: &str, name: &str) -> bool {
    key == name.trim().to_lowercase()
}

/// Applications and members of a group; with `app`, that application's
/// granted permissions too.
pub fn group_report(session: &mut Session, name: &str, app: Option<&str>) -> Result<Report> {
    session.set_tab(Tab::Groups);
    let index = find_row(session.groups().items(), "group", name, |g| {
        g.name.eq_ignore_ascii_case(name.trim())
    })?;
    session.select_group(Some(index));

    if let Some(app) = app {
        let position = find_row(session.group_apps().items(), "application", app, |a| {
            same_app(&a.key, app)
        })?;
        session.select_group_app(Some(position));
    }

    let mut report = Report::new(session.tab_title());
    if let Some(group) = session.groups().get(index) {
        report = report.with_note(format!("Group: {}", group.name));
        if !group.domain.is_empty() {
            report = report.with_note(format!("Domain: {}", group.domain));
        }
    }
    report = report
        .with_section(sections::apps("Applications", session.group_apps().visible()))
        .with_section(sections::users(
            "Members",
            session.user_list(FilterTarget::GroupMembers).visible(),
        ));
    if app.is_some() {
        report = report.with_section(sections::permissions(
            "Permissions",
            session.group_app_permissions().visible(),
        ));
    }
    Ok(report)
}

/// Groups granting an application, its permissions and its users.
pub fn app_report(session: &mut Session, name: &str) -> Result<Report> {
    session.set_tab(Tab::Applications);
    let index = find_row(session.apps().items(), "application", name, |a| {
        same_app(&a.key, name)
    })?;
    session.select_application(Some(index));

    let mut report = Report::new(session.tab_title());
    if let Some(app) = session.apps().get(index) {
        report = report.with_note(format!("Application: {}", app.name));
    }
    Ok(report
        .with_section(sections::groups("Groups", session.app_groups().visible()))
        .with_section(sections::permissions(
            "Permissions",
            session.app_permissions().visible(),
        ))
        .with_section(sections::users(
            "Users",
            session.user_list(FilterTarget::AppUsers).visible(),
        )))
}

/// Applications, groups and users holding a permission. `app` narrows
/// the groups to that application.
pub fn permission_report(session: &mut Session, code: &str, app: Option<&str>) -> Result<Report> {
    session.set_tab(Tab::Permissions);
    let needle = code.trim();
    let index = find_row(session.permissions().items(), "permission", code, |p| {
        p.code.eq_ignore_ascii_case(needle) || p.name.eq_ignore_ascii_case(needle)
    })?;
    session.select_permission(Some(index));

    if let Some(app) = app {
        let position = find_row(
            session.permission_apps().items(),
            "application",
            app,
            |a| same_app(&a.key, app),
        )?;
        session.select_permission_app(Some(position));
    }

    let mut report = Report::new(session.tab_title());
    if let Some(permission) = session.permissions().get(index) {
        report = report.with_note(if permission.name == permission.code {
            format!("Permission: {}", permission.code)
        } else {
            format!("Permission: {} ({})", permission.name, permission.code)
        });
    }
    Ok(report
        .with_section(sections::apps(
            "Applications",
            session.permission_apps().visible(),
        ))
        .with_section(sections::groups(
            "Groups",
            session.permission_groups().visible(),
        ))
        .with_section(sections::users(
            "Users",
            session.user_list(FilterTarget::PermissionUsers).visible(),
        )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::tests::sample_session;

    fn column<'a>(report: &'a Report, heading: &str, column: &str) -> Vec<&'a str> {
        report
            .sections
            .iter()
            .find(|s| s.heading == heading)
            .map(|s| s.rows.iter().map(|row| row[column].as_str()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_group_report() {
        let mut session = sample_session();
        let report = group_report(&mut session, "tellers", Some("TELLER APP")).unwrap();

        assert_eq!(report.title, "Group Permission Viewer");
        assert_eq!(column(&report, "Applications", "Application"), vec!["Teller App"]);
        assert_eq!(column(&report, "Members", "Identifier"), vec!["T001", "jadmin"]);
        assert_eq!(column(&report, "Permissions", "Code"), vec!["permPrint"]);
    }

    #[test]
    fn test_group_without_app_has_no_permissions() {
        let mut session = sample_session();
        let report = group_report(&mut session, "Admins", None).unwrap();
        assert!(report.sections.iter().all(|s| s.heading != "Permissions"));
    }

    #[test]
    fn test_app_report() {
        let mut session = sample_session();
        let report = app_report(&mut session, "console").unwrap();

        assert_eq!(column(&report, "Groups", "Group"), vec!["Admins"]);
        assert_eq!(column(&report, "Permissions", "Code"), vec!["permAudit"]);
        assert_eq!(column(&report, "Users", "Identifier"), vec!["bsmith", "jadmin"]);
    }

    #[test]
    fn test_permission_report() {
        let mut session = sample_session();
        let report = permission_report(&mut session, "PERMPRINT", None).unwrap();

        assert_eq!(column(&report, "Applications", "Application"), vec!["Teller App"]);
        assert_eq!(column(&report, "Groups", "Group"), vec!["Tellers"]);
        assert_eq!(column(&report, "Users", "Identifier"), vec!["jadmin", "T001"]);
        assert_eq!(report.notes, vec!["Permission: permPrint".to_string()]);
    }

    #[test]
    fn test_unknown_names_are_errors() {
        let mut session = sample_session();
        assert!(group_report(&mut session, "Auditors", None).is_err());
        assert!(group_report(&mut session, "Tellers", Some("Console")).is_err());
        assert!(app_report(&mut session, "Payroll").is_err());
        assert!(permission_report(&mut session, "permOCR", None).is_err());
    }
}
