//! User-rooted pivot computation.
//!
//! Every panel is a pure function of the snapshot, the view mode, the
//! root user and the parent selections. Nothing here holds state; the
//! session decides what is selected and asks for the panels again.

use super::{AppRow, GroupRow, PanelRow, ViewMode};
use crate::model::{Group, Permission, SnapshotStore};
use std::collections::HashSet;

/// All three panels with their cascaded default selections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PivotResult {
    pub panel1: Vec<PanelRow>,
    pub panel2: Vec<PanelRow>,
    pub panel3: Vec<PanelRow>,
    /// Default selection in panel 1 (its first row)
    pub selected1: Option<usize>,
    /// Default selection in panel 2 (its first row)
    pub selected2: Option<usize>,
}

/// Groups the user belongs to, in snapshot order.
fn user_groups<'a>(
    store: &'a SnapshotStore,
    user: &str,
) -> impl Iterator<Item = (usize, &'a Group)> + 'a {
    let groups = store.groups();
    store
        .index()
        .groups_of(user)
        .iter()
        .filter_map(move |&idx| groups.get(idx).map(|g| (idx, g)))
}

/// Compute panel 1 for a root user.
#[must_use]
pub fn panel1(store: &SnapshotStore, mode: ViewMode, user: &str) -> Vec<PanelRow> {
    let rows: Vec<PanelRow> = match mode {
        ViewMode::UserGroupAppPerm => user_groups(store, user)
            .map(|(idx, g)| GroupRow::from_group(idx, g).into())
            .collect(),
        ViewMode::UserAppGroupPerm => {
            let mut seen = HashSet::new();
            let mut rows = Vec::new();
            for (idx, group) in user_groups(store, user) {
                for (pos, app) in group.app_permissions.iter().enumerate() {
                    if seen.insert(app.key()) {
                        rows.push(AppRow::from_record(idx, pos, app).into());
                    }
                }
            }
            rows
        }
        ViewMode::UserPermAppGroup => {
            let mut seen = HashSet::new();
            let mut rows = Vec::new();
            for (_, group) in user_groups(store, user) {
                for code in group.app_permissions.iter().flat_map(|ap| ap.granted_codes()) {
                    if seen.insert(code) {
                        rows.push(Permission::labeled(code, store.labels()).into());
                    }
                }
            }
            rows
        }
    };
    tracing::debug!(user, ?mode, rows = rows.len(), "panel 1 computed");
    rows
}

/// Compute panel 2 below a panel-1 selection.
///
/// Returns an empty panel when the row kind does not belong in panel 1
/// of `mode`.
#[must_use]
pub fn panel2(
    store: &SnapshotStore,
    mode: ViewMode,
    user: &str,
    selected1: &PanelRow,
) -> Vec<PanelRow> {
    match (mode, selected1) {
        (ViewMode::UserGroupAppPerm, PanelRow::Group(g)) => store
            .groups()
            .get(g.index)
            .map(|group| {
                let mut seen = HashSet::new();
                group
                    .app_permissions
                    .iter()
                    .enumerate()
                    .filter(|(_, app)| seen.insert(app.key()))
                    .map(|(pos, app)| AppRow::from_record(g.index, pos, app).into())
                    .collect()
            })
            .unwrap_or_default(),
        (ViewMode::UserAppGroupPerm, PanelRow::Application(a)) => user_groups(store, user)
            .filter(|(_, group)| group.app_position(&a.key).is_some())
            .map(|(idx, group)| GroupRow::from_group(idx, group).into())
            .collect(),
        (ViewMode::UserPermAppGroup, PanelRow::Permission(p)) => {
            let mut seen = HashSet::new();
            let mut rows = Vec::new();
            for (idx, group) in user_groups(store, user) {
                for (pos, app) in group.app_permissions.iter().enumerate() {
                    if app.grants(&p.code) && seen.insert(app.key()) {
                        rows.push(AppRow::from_record(idx, pos, app).into());
                    }
                }
            }
            rows
        }
        _ => Vec::new(),
    }
}

/// Compute panel 3 below the panel-1 and panel-2 selections.
#[must_use]
pub fn panel3(
    store: &SnapshotStore,
    mode: ViewMode,
    user: &str,
    selected1: &PanelRow,
    selected2: &PanelRow,
) -> Vec<PanelRow> {
    match (mode, selected1, selected2) {
        (ViewMode::UserGroupAppPerm, PanelRow::Group(_), PanelRow::Application(a)) => store
            .snapshot()
            .and_then(|s| s.app_at(a.group, a.position))
            .map(|app| granted_rows(store, app.granted_codes()))
            .unwrap_or_default(),
        (ViewMode::UserAppGroupPerm, PanelRow::Application(a), PanelRow::Group(g)) => store
            .groups()
            .get(g.index)
            .and_then(|group| group.app(&a.key))
            .map(|app| granted_rows(store, app.granted_codes()))
            .unwrap_or_default(),
        (ViewMode::UserPermAppGroup, PanelRow::Permission(_), PanelRow::Application(a)) => {
            user_groups(store, user)
                .filter(|(_, group)| group.app_position(&a.key).is_some())
                .map(|(idx, group)| GroupRow::from_group(idx, group).into())
                .collect()
        }
        _ => Vec::new(),
    }
}

fn granted_rows<'a>(
    store: &SnapshotStore,
    codes: impl Iterator<Item = &'a str>,
) -> Vec<PanelRow> {
    let mut seen = HashSet::new();
    codes
        .filter(|code| seen.insert(*code))
        .map(|code| Permission::labeled(code, store.labels()).into())
        .collect()
}

/// Compute all panels for a root user, selecting the first row of panel 1
/// and panel 2.
#[must_use]
pub fn cascade(store: &SnapshotStore, mode: ViewMode, user: &str) -> PivotResult {
    let panel1 = panel1(store, mode, user);
    let mut result = PivotResult {
        selected1: (!panel1.is_empty()).then_some(0),
        ..PivotResult::default()
    };
    if let Some(first1) = panel1.first() {
        result.panel2 = panel2(store, mode, user, first1);
        if let Some(first2) = result.panel2.first() {
            result.selected2 = Some(0);
            result.panel3 = panel3(store, mode, user, first1, first2);
        }
    }
    result.panel1 = panel1;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AppPermission, Snapshot, User};

    fn labels(rows: &[PanelRow]) -> Vec<&str> {
        rows.iter().map(PanelRow::label).collect()
    }

    fn tellers_store() -> SnapshotStore {
        SnapshotStore::with_snapshot(Some(Snapshot::new(vec![Group::new("Tellers")
            .with_user(User::new("T001", "Tina Teller"))
            .with_app(
                AppPermission::new("Teller App")
                    .with_flag("permPrint", "1")
                    .with_flag("permOCR", "0"),
            )])))
    }

    /// Two groups sharing an application with different flags, plus a
    /// group the user is not in.
    fn branch_store() -> SnapshotStore {
        SnapshotStore::with_snapshot(Some(Snapshot::new(vec![
            Group::new("Tellers")
                .with_user(User::new("T001", "Tina"))
                .with_app(
                    AppPermission::new("Teller App")
                        .with_flag("permPrint", "1")
                        .with_flag("permOCR", "0"),
                )
                .with_app(AppPermission::new("Cash Drawer").with_flag("permOpen", "1")),
            Group::new("Supervisors")
                .with_user(User::new("T001", "Tina"))
                .with_app(
                    AppPermission::new("teller app")
                        .with_flag("permOCR", "1")
                        .with_flag("permVoid", "1"),
                )
                .with_app(AppPermission::new("Reports")),
            Group::new("Auditors")
                .with_user(User::new("A001", "Al"))
                .with_app(AppPermission::new("Teller App").with_flag("permAudit", "1")),
        ])))
    }

    #[test]
    fn test_tellers_group_app_perm() {
        let store = tellers_store();
        let result = cascade(&store, ViewMode::UserGroupAppPerm, "T001");

        assert_eq!(labels(&result.panel1), vec!["Tellers"]);
        assert_eq!(labels(&result.panel2), vec!["Teller App"]);
        assert_eq!(labels(&result.panel3), vec!["permPrint"]);
        assert_eq!(result.selected1, Some(0));
        assert_eq!(result.selected2, Some(0));
    }

    #[test]
    fn test_tellers_perm_app_group() {
        let store = tellers_store();
        let result = cascade(&store, ViewMode::UserPermAppGroup, "T001");

        assert_eq!(labels(&result.panel1), vec!["permPrint"]);
        assert_eq!(labels(&result.panel2), vec!["Teller App"]);
        assert_eq!(labels(&result.panel3), vec!["Tellers"]);
    }

    #[test]
    fn test_tellers_app_group_perm() {
        let store = tellers_store();
        let result = cascade(&store, ViewMode::UserAppGroupPerm, "T001");

        assert_eq!(labels(&result.panel1), vec!["Teller App"]);
        assert_eq!(labels(&result.panel2), vec!["Tellers"]);
        assert_eq!(labels(&result.panel3), vec!["permPrint"]);
    }

    #[test]
    fn test_app_group_perm_uses_group_specific_flags() {
        let store = branch_store();
        let p1 = panel1(&store, ViewMode::UserAppGroupPerm, "T001");
        // Deduplicated by name across the user's groups; Auditors excluded
        assert_eq!(labels(&p1), vec!["Teller App", "Cash Drawer", "Reports"]);

        let p2 = panel2(&store, ViewMode::UserAppGroupPerm, "T001", &p1[0]);
        assert_eq!(labels(&p2), vec!["Tellers", "Supervisors"]);

        let p3 = panel3(&store, ViewMode::UserAppGroupPerm, "T001", &p1[0], &p2[1]);
        assert_eq!(labels(&p3), vec!["permOCR", "permVoid"]);
    }

    #[test]
    fn test_perm_app_group_across_groups() {
        let store = branch_store();
        let p1 = panel1(&store, ViewMode::UserPermAppGroup, "T001");
        assert_eq!(labels(&p1), vec!["permPrint", "permOpen", "permOCR", "permVoid"]);

        let ocr = p1.iter().find(|r| r.label() == "permOCR").unwrap();
        let p2 = panel2(&store, ViewMode::UserPermAppGroup, "T001", ocr);
        assert_eq!(labels(&p2), vec!["teller app"]);

        let p3 = panel3(&store, ViewMode::UserPermAppGroup, "T001", ocr, &p2[0]);
        assert_eq!(labels(&p3), vec!["Tellers", "Supervisors"]);
    }

    #[test]
    fn test_app_without_grants_stays_in_panel2() {
        let store = branch_store();
        let p1 = panel1(&store, ViewMode::UserGroupAppPerm, "T001");
        let p2 = panel2(&store, ViewMode::UserGroupAppPerm, "T001", &p1[1]);
        assert_eq!(labels(&p2), vec!["teller app", "Reports"]);

        let p3 = panel3(&store, ViewMode::UserGroupAppPerm, "T001", &p1[1], &p2[1]);
        assert!(p3.is_empty());
    }

    #[test]
    fn test_user_without_groups_yields_nothing() {
        let store = branch_store();
        let result = cascade(&store, ViewMode::UserGroupAppPerm, "nobody");

        assert_eq!(result, PivotResult::default());
    }

    #[test]
    fn test_mismatched_row_kind_yields_empty() {
        let store = tellers_store();
        let p1 = panel1(&store, ViewMode::UserGroupAppPerm, "T001");
        assert!(panel2(&store, ViewMode::UserPermAppGroup, "T001", &p1[0]).is_empty());
    }

    #[test]
    fn test_empty_store() {
        let store = SnapshotStore::new();
        for &mode in ViewMode::all() {
            assert_eq!(cascade(&store, mode, "T001"), PivotResult::default());
        }
    }
}
