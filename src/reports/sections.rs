//! Section builders for the row types the session exposes.

use super::Section;
use crate::model::{Permission, User};
use crate::pivot::{AppRow, GroupRow, PanelRow};

pub fn users<'a>(heading: &str, users: impl IntoIterator<Item = &'a User>) -> Section {
    let mut section = Section::new(
        heading,
        &["Identifier", "Name", "Department", "Title", "Email"],
    );
    for user in users {
        section.push_row([
            user.identifier.as_str(),
            user.name.as_str(),
            user.department.as_str(),
            user.title.as_str(),
            user.email.as_str(),
        ]);
    }
    section
}

pub fn groups<'a>(heading: &str, groups: impl IntoIterator<Item = &'a GroupRow>) -> Section {
    let mut section = Section::new(heading, &["Group", "Domain", "Description"]);
    for group in groups {
        section.push_row([
            group.name.as_str(),
            group.domain.as_str(),
            group.description.as_str(),
        ]);
    }
    section
}

pub fn apps<'a>(heading: &str, apps: impl IntoIterator<Item = &'a AppRow>) -> Section {
    let mut section = Section::new(heading, &["Application", "App ID"]);
    for app in apps {
        section.push_row([app.name.as_str(), app.app_id.as_deref().unwrap_or("")]);
    }
    section
}

pub fn permissions<'a>(
    heading: &str,
    permissions: impl IntoIterator<Item = &'a Permission>,
) -> Section {
    let mut section = Section::new(heading, &["Code", "Permission"]);
    for permission in permissions {
        section.push_row([permission.code.as_str(), permission.name.as_str()]);
    }
    section
}

/// A pivot panel: one column titled by the view mode's column header.
pub fn panel<'a>(
    heading: &str,
    column: &str,
    rows: impl IntoIterator<Item = &'a PanelRow>,
) -> Section {
    let mut section = Section::new(heading, &[column]);
    for row in rows {
        section.push_row([row.label()]);
    }
    section
}
