//! Selection and view-mode state.
//!
//! A [`Session`] owns the snapshot store and every panel the collaborator
//! renders. UI events arrive as method calls; each call recomputes the
//! affected panels synchronously and queues [`SessionEvent`]s describing
//! what changed. Panel selections are indices into a panel's items in
//! load order; map a displayed row back through
//! [`PanelView::visible_indices`].

mod types;

pub use types::{FilterTarget, SessionEvent, SessionOptions, Tab};

use crate::model::{Permission, Snapshot, SnapshotStore, User};
use crate::pivot::{self, lookup, AppRow, GroupRow, PanelRow, ViewMode};
use crate::viewmodel::{Debounce, PanelControl, PanelId, PanelView, SortField};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::time::Instant;

/// Pending text of one debounced filter box.
#[derive(Debug, Clone)]
struct FilterInput {
    text: String,
    debounce: Debounce,
}

/// Interactive state over one snapshot.
#[derive(Debug)]
pub struct Session {
    store: SnapshotStore,
    options: SessionOptions,
    tab: Tab,
    mode: ViewMode,
    root_user: Option<String>,

    users: PanelView<User>,
    pivot: [PanelView<PanelRow>; 3],

    groups: PanelView<GroupRow>,
    group_apps: PanelView<AppRow>,
    group_app_permissions: PanelView<Permission>,
    group_members: PanelView<User>,

    apps: PanelView<AppRow>,
    app_groups: PanelView<GroupRow>,
    app_permissions: PanelView<Permission>,
    app_users: PanelView<User>,

    permissions: PanelView<Permission>,
    permission_apps: PanelView<AppRow>,
    permission_groups: PanelView<GroupRow>,
    permission_users: PanelView<User>,

    selections: HashMap<PanelId, usize>,
    filters: [FilterInput; 4],
    events: Vec<SessionEvent>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionOptions::default())
    }
}

impl Session {
    #[must_use]
    pub fn new(options: SessionOptions) -> Self {
        let placeholder = options.placeholder.clone();
        let placeholder = placeholder.as_str();
        let input = FilterInput {
            text: String::new(),
            debounce: Debounce::new(options.debounce),
        };
        Self {
            store: SnapshotStore::new().with_labels(options.labels.clone()),
            tab: Tab::default(),
            mode: options.default_mode,
            root_user: None,
            users: PanelView::new(placeholder),
            pivot: std::array::from_fn(|_| PanelView::new(placeholder)),
            groups: PanelView::new(placeholder),
            group_apps: PanelView::new(placeholder),
            group_app_permissions: PanelView::new(placeholder),
            group_members: PanelView::new(placeholder),
            apps: PanelView::new(placeholder),
            app_groups: PanelView::new(placeholder),
            app_permissions: PanelView::new(placeholder),
            app_users: PanelView::new(placeholder),
            permissions: PanelView::new(placeholder),
            permission_apps: PanelView::new(placeholder),
            permission_groups: PanelView::new(placeholder),
            permission_users: PanelView::new(placeholder),
            selections: HashMap::new(),
            filters: std::array::from_fn(|_| input.clone()),
            events: Vec::new(),
            options,
        }
    }

    /// Create a session and load `snapshot` into it.
    #[must_use]
    pub fn with_snapshot(options: SessionOptions, snapshot: Option<Snapshot>) -> Self {
        let mut session = Self::new(options);
        session.load(snapshot);
        session
    }

    // ------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------

    /// Load or reload a snapshot.
    ///
    /// Root collections are rebuilt, sort directives reset and filter
    /// queries reapplied. The root user is looked up again by identifier;
    /// tab selections are cleared.
    pub fn load(&mut self, snapshot: Option<Snapshot>) {
        self.store.replace(snapshot);
        self.events.push(SessionEvent::SnapshotLoaded {
            generation: self.store.generation(),
        });

        for id in PanelId::ALL {
            self.panel_mut(id).reset_sort();
        }

        let index = self.store.index();
        self.users.set_items(index.users().to_vec());
        self.groups.set_items(
            self.store
                .groups()
                .iter()
                .enumerate()
                .map(|(idx, g)| GroupRow::from_group(idx, g))
                .collect(),
        );
        self.apps.set_items(
            index
                .apps()
                .iter()
                .filter_map(|loc| {
                    let app = self.store.snapshot()?.app_at(loc.group, loc.position)?;
                    Some(AppRow::from_record(loc.group, loc.position, app))
                })
                .collect(),
        );
        self.permissions.set_items(index.permissions().to_vec());
        for id in [
            PanelId::Users,
            PanelId::GroupList,
            PanelId::AppList,
            PanelId::PermissionList,
        ] {
            self.events.push(SessionEvent::PanelChanged(id));
        }

        self.select_group(None);
        self.select_application(None);
        self.select_permission(None);

        let root = self.root_user.clone();
        match root {
            Some(id) if self.store.index().user(&id).is_some() => self.select_user(Some(&id)),
            Some(id) => {
                tracing::info!("Root user '{id}' is not in the new snapshot; clearing selection");
                self.select_user(None);
            }
            None => self.clear_pivot(),
        }
    }

    #[must_use]
    pub const fn store(&self) -> &SnapshotStore {
        &self.store
    }

    #[must_use]
    pub const fn options(&self) -> &SessionOptions {
        &self.options
    }

    // ------------------------------------------------------------------
    // Users tab: root user and pivot panels
    // ------------------------------------------------------------------

    /// Select the root user by identifier, or clear it.
    ///
    /// Recomputes panel 1 and cascades the default selections.
    pub fn select_user(&mut self, identifier: Option<&str>) {
        let identifier = identifier.map(str::to_string);
        if self.root_user != identifier {
            self.events
                .push(SessionEvent::RootUserChanged(identifier.clone()));
        }
        self.root_user = identifier;
        self.recompute_pivot();
    }

    /// Select a panel-1 row, recomputing panel 2 and cascading into it.
    pub fn select_panel1(&mut self, index: Option<usize>) {
        let (Some(root), Some(row)) = (
            self.root_user.clone(),
            index.and_then(|i| self.pivot[0].get(i).cloned()),
        ) else {
            self.set_selection(PanelId::Pivot1, None);
            self.set_pivot_items(1, Vec::new());
            self.set_pivot_items(2, Vec::new());
            self.set_selection(PanelId::Pivot2, None);
            self.set_selection(PanelId::Pivot3, None);
            return;
        };
        self.set_selection(PanelId::Pivot1, index);

        let panel2 = pivot::panel2(&self.store, self.mode, &root, &row);
        let panel3 = panel2
            .first()
            .map(|first| pivot::panel3(&self.store, self.mode, &root, &row, first))
            .unwrap_or_default();
        let selected2 = (!panel2.is_empty()).then_some(0);
        self.set_pivot_items(1, panel2);
        self.set_pivot_items(2, panel3);
        self.set_selection(PanelId::Pivot2, selected2);
        self.set_selection(PanelId::Pivot3, None);
        tracing::debug!(root = %root, panel = 1, "selection cascaded");
    }

    /// Select a panel-2 row, recomputing panel 3.
    pub fn select_panel2(&mut self, index: Option<usize>) {
        let parent = self
            .selection(PanelId::Pivot1)
            .and_then(|i| self.pivot[0].get(i).cloned());
        let row = index.and_then(|i| self.pivot[1].get(i).cloned());
        let (Some(root), Some(parent), Some(row)) = (self.root_user.clone(), parent, row) else {
            self.set_selection(PanelId::Pivot2, None);
            self.set_pivot_items(2, Vec::new());
            self.set_selection(PanelId::Pivot3, None);
            return;
        };
        self.set_selection(PanelId::Pivot2, index);
        let panel3 = pivot::panel3(&self.store, self.mode, &root, &parent, &row);
        self.set_pivot_items(2, panel3);
        self.set_selection(PanelId::Pivot3, None);
    }

    /// Select a panel-3 row. Nothing depends on it.
    pub fn select_panel3(&mut self, index: Option<usize>) {
        let index = index.filter(|&i| i < self.pivot[2].len());
        self.set_selection(PanelId::Pivot3, index);
    }

    /// Switch view mode, recomputing from the same root user.
    pub fn set_view_mode(&mut self, mode: ViewMode) {
        if self.mode != mode {
            self.mode = mode;
            self.events.push(SessionEvent::ViewModeChanged(mode));
        }
        self.recompute_pivot();
    }

    fn recompute_pivot(&mut self) {
        let Some(root) = self.root_user.clone() else {
            self.clear_pivot();
            return;
        };
        let result = pivot::cascade(&self.store, self.mode, &root);
        self.set_pivot_items(0, result.panel1);
        self.set_pivot_items(1, result.panel2);
        self.set_pivot_items(2, result.panel3);
        self.set_selection(PanelId::Pivot1, result.selected1);
        self.set_selection(PanelId::Pivot2, result.selected2);
        self.set_selection(PanelId::Pivot3, None);
        tracing::debug!(root = %root, mode = %self.mode, "pivot recomputed");
    }

    fn clear_pivot(&mut self) {
        for slot in 0..3 {
            self.set_pivot_items(slot, Vec::new());
        }
        self.set_selection(PanelId::Pivot1, None);
        self.set_selection(PanelId::Pivot2, None);
        self.set_selection(PanelId::Pivot3, None);
    }

    fn set_pivot_items(&mut self, slot: usize, rows: Vec<PanelRow>) {
        let Some(view) = self.pivot.get_mut(slot) else {
            return;
        };
        view.set_items(rows);
        let id = [PanelId::Pivot1, PanelId::Pivot2, PanelId::Pivot3][slot];
        self.events.push(SessionEvent::PanelChanged(id));
    }

    // ------------------------------------------------------------------
    // Entity tabs
    // ------------------------------------------------------------------

    /// Select a group on the Groups tab.
    pub fn select_group(&mut self, index: Option<usize>) {
        let row = index.and_then(|i| self.groups.get(i).cloned());
        self.set_selection(PanelId::GroupList, row.as_ref().and(index));
        self.set_selection(PanelId::GroupApps, None);
        self.group_app_permissions.clear();

        let found = row
            .map(|row| lookup::group_lookup(&self.store, row.index))
            .unwrap_or_default();
        self.group_apps.set_items(found.apps);
        self.group_members.set_items(found.members);
        for id in [
            PanelId::GroupApps,
            PanelId::GroupAppPermissions,
            PanelId::GroupMembers,
        ] {
            self.events.push(SessionEvent::PanelChanged(id));
        }
    }

    /// Select an application inside the selected group.
    pub fn select_group_app(&mut self, index: Option<usize>) {
        let row = index.and_then(|i| self.group_apps.get(i).cloned());
        self.set_selection(PanelId::GroupApps, row.as_ref().and(index));
        let permissions = row
            .map(|row| lookup::group_app_permissions(&self.store, row.group, &row.key))
            .unwrap_or_default();
        self.group_app_permissions.set_items(permissions);
        self.events
            .push(SessionEvent::PanelChanged(PanelId::GroupAppPermissions));
    }

    /// Select an application on the Applications tab.
    pub fn select_application(&mut self, index: Option<usize>) {
        let row = index.and_then(|i| self.apps.get(i).cloned());
        self.set_selection(PanelId::AppList, row.as_ref().and(index));
        let found = row
            .map(|row| lookup::app_lookup(&self.store, &row.key))
            .unwrap_or_default();
        self.app_groups.set_items(found.groups);
        self.app_permissions.set_items(found.permissions);
        self.app_users.set_items(found.users);
        for id in [PanelId::AppGroups, PanelId::AppPermissions, PanelId::AppUsers] {
            self.events.push(SessionEvent::PanelChanged(id));
        }
    }

    /// Select a permission on the Permissions tab.
    pub fn select_permission(&mut self, index: Option<usize>) {
        let row = index.and_then(|i| self.permissions.get(i).cloned());
        self.set_selection(PanelId::PermissionList, row.as_ref().and(index));
        self.set_selection(PanelId::PermissionApps, None);
        let (found, groups) = row
            .map(|perm| {
                (
                    lookup::permission_lookup(&self.store, &perm.code),
                    lookup::permission_groups(&self.store, &perm.code, None),
                )
            })
            .unwrap_or_default();
        self.permission_apps.set_items(found.apps);
        self.permission_users.set_items(found.users);
        self.permission_groups.set_items(groups);
        for id in [
            PanelId::PermissionApps,
            PanelId::PermissionUsers,
            PanelId::PermissionGroups,
        ] {
            self.events.push(SessionEvent::PanelChanged(id));
        }
    }

    /// Narrow the permission's groups to one application, or widen again.
    pub fn select_permission_app(&mut self, index: Option<usize>) {
        let Some(code) = self
            .selection(PanelId::PermissionList)
            .and_then(|i| self.permissions.get(i))
            .map(|p| p.code.clone())
        else {
            return;
        };
        let row = index.and_then(|i| self.permission_apps.get(i).cloned());
        self.set_selection(PanelId::PermissionApps, row.as_ref().and(index));
        let groups =
            lookup::permission_groups(&self.store, &code, row.as_ref().map(|r| r.key.as_str()));
        self.permission_groups.set_items(groups);
        self.events
            .push(SessionEvent::PanelChanged(PanelId::PermissionGroups));
    }

    // ------------------------------------------------------------------
    // Tabs and selection
    // ------------------------------------------------------------------

    pub fn set_tab(&mut self, tab: Tab) {
        if self.tab != tab {
            self.tab = tab;
            self.events.push(SessionEvent::TabChanged(tab));
        }
    }

    #[must_use]
    pub const fn tab(&self) -> Tab {
        self.tab
    }

    #[must_use]
    pub const fn tab_title(&self) -> &'static str {
        self.tab.title()
    }

    /// Clear the primary selection of the active tab.
    pub fn clear_selection(&mut self) {
        match self.tab {
            Tab::Users => self.select_user(None),
            Tab::Groups => self.select_group(None),
            Tab::Applications => self.select_application(None),
            Tab::Permissions => self.select_permission(None),
            Tab::Settings => {}
        }
    }

    /// Whether the active tab has a primary selection.
    #[must_use]
    pub fn is_anything_selected(&self) -> bool {
        match self.tab {
            Tab::Users => self.root_user.is_some(),
            Tab::Groups => self.selection(PanelId::GroupList).is_some(),
            Tab::Applications => self.selection(PanelId::AppList).is_some(),
            Tab::Permissions => self.selection(PanelId::PermissionList).is_some(),
            Tab::Settings => false,
        }
    }

    /// Selected item index of a panel.
    #[must_use]
    pub fn selection(&self, panel: PanelId) -> Option<usize> {
        self.selections.get(&panel).copied()
    }

    /// Selected row of the pivot panel in `slot` (0, 1 or 2).
    #[must_use]
    pub fn selected_pivot_row(&self, slot: usize) -> Option<&PanelRow> {
        let id = *[PanelId::Pivot1, PanelId::Pivot2, PanelId::Pivot3].get(slot)?;
        self.selection(id).and_then(|i| self.pivot[slot].get(i))
    }

    fn set_selection(&mut self, panel: PanelId, index: Option<usize>) {
        let changed = match index {
            Some(i) => self.selections.insert(panel, i) != Some(i),
            None => self.selections.remove(&panel).is_some(),
        };
        if changed {
            self.events.push(SessionEvent::SelectionChanged(panel));
        }
    }

    // ------------------------------------------------------------------
    // Filters
    // ------------------------------------------------------------------

    /// Record filter text; it applies after the quiet period.
    pub fn set_filter_query(&mut self, target: FilterTarget, text: &str, now: Instant) {
        let input = &mut self.filters[target.slot()];
        input.text = text.to_string();
        input.debounce.restart(now);
    }

    /// Pending text of a filter box.
    #[must_use]
    pub fn filter_query(&self, target: FilterTarget) -> &str {
        &self.filters[target.slot()].text
    }

    /// Apply every filter whose quiet period has elapsed.
    ///
    /// Returns the number of filters applied.
    pub fn pump(&mut self, now: Instant) -> usize {
        let due: Vec<FilterTarget> = FilterTarget::ALL
            .into_iter()
            .filter(|t| self.filters[t.slot()].debounce.fire(now))
            .collect();
        for &target in &due {
            self.apply_filter(target);
        }
        due.len()
    }

    /// Apply every pending filter immediately.
    pub fn flush_filters(&mut self) -> usize {
        let due: Vec<FilterTarget> = FilterTarget::ALL
            .into_iter()
            .filter(|t| self.filters[t.slot()].debounce.flush())
            .collect();
        for &target in &due {
            self.apply_filter(target);
        }
        due.len()
    }

    /// Earliest pending filter deadline.
    #[must_use]
    pub fn next_filter_deadline(&self) -> Option<Instant> {
        self.filters.iter().filter_map(|f| f.debounce.deadline()).min()
    }

    /// Filter any panel at once, bypassing the debounce.
    ///
    /// User lists with a filter box take `text` as their query and drop
    /// any pending one; the other panels keep the filter across
    /// recomputation until it is replaced.
    pub fn set_panel_filter(&mut self, panel: PanelId, text: &str) {
        if let Some(target) = FilterTarget::for_panel(panel) {
            let input = &mut self.filters[target.slot()];
            input.text = text.to_string();
            input.debounce.cancel();
            self.apply_filter(target);
            return;
        }
        self.panel_mut(panel).set_filter(text);
        tracing::debug!(?panel, query = %text, "panel filtered");
        self.events.push(SessionEvent::PanelFiltered(panel));
    }

    fn apply_filter(&mut self, target: FilterTarget) {
        let text = self.filters[target.slot()].text.clone();
        self.panel_mut(target.panel()).set_filter(&text);
        tracing::debug!(?target, query = %text, "filter applied");
        self.events.push(SessionEvent::FilterApplied(target));
    }

    // ------------------------------------------------------------------
    // Sorting
    // ------------------------------------------------------------------

    pub fn toggle_sort(&mut self, panel: PanelId, field: SortField) {
        self.panel_mut(panel).toggle_sort(field);
        self.events.push(SessionEvent::SortChanged(panel));
    }

    /// Toggle sort on the panel's default field.
    pub fn toggle_default_sort(&mut self, panel: PanelId) {
        self.toggle_sort(panel, panel.default_sort_field());
    }

    fn panel_mut(&mut self, panel: PanelId) -> &mut dyn PanelControl {
        match panel {
            PanelId::Users => &mut self.users,
            PanelId::Pivot1 => &mut self.pivot[0],
            PanelId::Pivot2 => &mut self.pivot[1],
            PanelId::Pivot3 => &mut self.pivot[2],
            PanelId::GroupList => &mut self.groups,
            PanelId::GroupApps => &mut self.group_apps,
            PanelId::GroupAppPermissions => &mut self.group_app_permissions,
            PanelId::GroupMembers => &mut self.group_members,
            PanelId::AppList => &mut self.apps,
            PanelId::AppGroups => &mut self.app_groups,
            PanelId::AppPermissions => &mut self.app_permissions,
            PanelId::AppUsers => &mut self.app_users,
            PanelId::PermissionList => &mut self.permissions,
            PanelId::PermissionApps => &mut self.permission_apps,
            PanelId::PermissionGroups => &mut self.permission_groups,
            PanelId::PermissionUsers => &mut self.permission_users,
        }
    }

    // ------------------------------------------------------------------
    // Read access
    // ------------------------------------------------------------------

    /// Drain queued change events.
    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    #[must_use]
    pub const fn view_mode(&self) -> ViewMode {
        self.mode
    }

    #[must_use]
    pub fn root_user(&self) -> Option<&str> {
        self.root_user.as_deref()
    }

    #[must_use]
    pub fn panel_headers(&self) -> [&'static str; 3] {
        self.mode.panel_headers()
    }

    #[must_use]
    pub fn column_headers(&self) -> [&'static str; 3] {
        self.mode.column_headers()
    }

    /// Pivot panel in `slot` (0, 1 or 2).
    #[must_use]
    pub fn pivot_panel(&self, slot: usize) -> Option<&PanelView<PanelRow>> {
        self.pivot.get(slot)
    }

    #[must_use]
    pub fn user_list(&self, target: FilterTarget) -> &PanelView<User> {
        match target {
            FilterTarget::Users => &self.users,
            FilterTarget::GroupMembers => &self.group_members,
            FilterTarget::AppUsers => &self.app_users,
            FilterTarget::PermissionUsers => &self.permission_users,
        }
    }

    #[must_use]
    pub const fn groups(&self) -> &PanelView<GroupRow> {
        &self.groups
    }

    #[must_use]
    pub const fn group_apps(&self) -> &PanelView<AppRow> {
        &self.group_apps
    }

    #[must_use]
    pub const fn group_app_permissions(&self) -> &PanelView<Permission> {
        &self.group_app_permissions
    }

    #[must_use]
    pub const fn apps(&self) -> &PanelView<AppRow> {
        &self.apps
    }

    #[must_use]
    pub const fn app_groups(&self) -> &PanelView<GroupRow> {
        &self.app_groups
    }

    #[must_use]
    pub const fn app_permissions(&self) -> &PanelView<Permission> {
        &self.app_permissions
    }

    #[must_use]
    pub const fn permissions(&self) -> &PanelView<Permission> {
        &self.permissions
    }

    #[must_use]
    pub const fn permission_apps(&self) -> &PanelView<AppRow> {
        &self.permission_apps
    }

    #[must_use]
    pub const fn permission_groups(&self) -> &PanelView<GroupRow> {
        &self.permission_groups
    }

    /// Caption for the selected root user.
    #[must_use]
    pub fn selected_user_caption(&self) -> String {
        self.root_user
            .as_deref()
            .map(|id| format!("Teller No: {id}"))
            .unwrap_or_default()
    }

    /// Freshness line for the status bar.
    #[must_use]
    pub fn data_updated_text(&self, now: DateTime<Utc>) -> String {
        let Some(updated) = self.store.snapshot().and_then(|s| s.data_updated) else {
            return "Data Status: Unknown".to_string();
        };
        let elapsed = now.signed_duration_since(updated);
        if elapsed < chrono::Duration::hours(1) {
            format!("Data Updated: {} minutes ago", elapsed.num_minutes().max(0))
        } else if elapsed < chrono::Duration::days(1) {
            format!("Data Updated: {} hours ago", elapsed.num_hours())
        } else {
            format!("Data Updated: {}", updated.format("%m/%d/%Y"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AppPermission, Group};
    use chrono::TimeZone;
    use std::time::Duration;

    fn snapshot() -> Snapshot {
        Snapshot::new(vec![
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
        ])
    }

    fn session() -> Session {
        Session::with_snapshot(SessionOptions::default(), Some(snapshot()))
    }

    fn labels(view: &PanelView<PanelRow>) -> Vec<&str> {
        view.items().iter().map(PanelRow::label).collect()
    }

    fn pivot_labels(session: &Session, slot: usize) -> Vec<&str> {
        session.pivot_panel(slot).map(labels).unwrap_or_default()
    }

    #[test]
    fn test_select_user_cascades() {
        let mut session = session();
        session.select_user(Some("T001"));

        assert_eq!(pivot_labels(&session, 0), vec!["Tellers"]);
        assert_eq!(pivot_labels(&session, 1), vec!["Teller App"]);
        assert_eq!(pivot_labels(&session, 2), vec!["permPrint"]);
        assert_eq!(session.selection(PanelId::Pivot1), Some(0));
        assert_eq!(session.selection(PanelId::Pivot2), Some(0));
        assert_eq!(session.selection(PanelId::Pivot3), None);
        assert_eq!(session.selected_user_caption(), "Teller No: T001");
    }

    #[test]
    fn test_select_panel1_recomputes_below() {
        let mut session = session();
        session.select_user(Some("jadmin"));
        assert_eq!(pivot_labels(&session, 0), vec!["Tellers", "Admins"]);

        session.select_panel1(Some(1));
        assert_eq!(pivot_labels(&session, 1), vec!["Console"]);
        assert_eq!(pivot_labels(&session, 2), vec!["permAudit"]);

        session.select_panel1(None);
        assert!(pivot_labels(&session, 1).is_empty());
        assert!(pivot_labels(&session, 2).is_empty());
    }

    #[test]
    fn test_select_panel3_is_bounded() {
        let mut session = session();
        session.select_user(Some("T001"));

        session.select_panel3(Some(0));
        assert_eq!(session.selection(PanelId::Pivot3), Some(0));
        assert_eq!(session.selected_pivot_row(2).map(PanelRow::label), Some("permPrint"));
        // panels above are untouched
        assert_eq!(pivot_labels(&session, 1), vec!["Teller App"]);

        session.select_panel3(Some(5));
        assert_eq!(session.selection(PanelId::Pivot3), None);
    }

    #[test]
    fn test_view_mode_switch_matches_fresh_computation() {
        let mut session = session();
        session.select_user(Some("jadmin"));
        session.set_view_mode(ViewMode::UserPermAppGroup);

        let fresh = pivot::cascade(session.store(), ViewMode::UserPermAppGroup, "jadmin");
        assert_eq!(session.pivot_panel(0).map(|v| v.items().to_vec()), Some(fresh.panel1));
        assert_eq!(session.panel_headers(), ["Permissions", "Applications", "Groups"]);
    }

    #[test]
    fn test_view_mode_without_root_clears() {
        let mut session = session();
        session.set_view_mode(ViewMode::UserAppGroupPerm);
        assert!(pivot_labels(&session, 0).is_empty());
        assert_eq!(session.selection(PanelId::Pivot1), None);
    }

    #[test]
    fn test_unknown_root_user_yields_empty_panels() {
        let mut session = session();
        session.select_user(Some("ghost"));
        assert!(pivot_labels(&session, 0).is_empty());
        assert_eq!(session.selection(PanelId::Pivot1), None);
    }

    #[test]
    fn test_debounced_filter() {
        let mut session = session();
        let t0 = Instant::now();

        session.set_filter_query(FilterTarget::Users, "adm", t0);
        assert_eq!(session.pump(t0 + Duration::from_millis(100)), 0);
        assert_eq!(session.user_list(FilterTarget::Users).visible().count(), 3);

        assert_eq!(session.pump(t0 + Duration::from_millis(200)), 1);
        let visible: Vec<_> = session
            .user_list(FilterTarget::Users)
            .visible()
            .map(|u| u.identifier.as_str())
            .collect();
        assert_eq!(visible, vec!["jadmin"]);

        session.set_filter_query(FilterTarget::Users, "", t0);
        session.flush_filters();
        assert_eq!(session.user_list(FilterTarget::Users).visible().count(), 3);
    }

    #[test]
    fn test_filters_are_independent() {
        let mut session = session();
        let t0 = Instant::now();
        session.set_filter_query(FilterTarget::Users, "bob", t0);
        session.set_filter_query(FilterTarget::AppUsers, "x", t0 + Duration::from_millis(150));

        assert_eq!(session.pump(t0 + Duration::from_millis(250)), 1);
        assert_eq!(
            session.next_filter_deadline(),
            Some(t0 + Duration::from_millis(350))
        );
    }

    #[test]
    fn test_panel_filter_applies_at_once() {
        let mut session = session();
        session.take_events();

        session.set_panel_filter(PanelId::GroupList, "adm");
        let groups: Vec<_> = session.groups().visible().map(|g| g.name.as_str()).collect();
        assert_eq!(groups, vec!["Admins"]);
        assert!(session
            .take_events()
            .contains(&SessionEvent::PanelFiltered(PanelId::GroupList)));

        // pivot filters survive recomputation for a new root
        session.select_user(Some("jadmin"));
        session.set_panel_filter(PanelId::Pivot1, "tell");
        session.select_user(Some("T001"));
        let shown: Vec<_> = session
            .pivot_panel(0)
            .map(|v| v.visible().map(PanelRow::label).collect())
            .unwrap_or_default();
        assert_eq!(shown, vec!["Tellers"]);
        session.set_panel_filter(PanelId::Pivot1, "adm");
        assert_eq!(session.pivot_panel(0).map(|v| v.visible().count()), Some(0));
    }

    #[test]
    fn test_panel_filter_replaces_pending_query() {
        let mut session = session();
        let t0 = Instant::now();
        session.set_filter_query(FilterTarget::Users, "bob", t0);

        session.set_panel_filter(PanelId::Users, "tina");
        assert_eq!(session.filter_query(FilterTarget::Users), "tina");
        assert_eq!(session.next_filter_deadline(), None);
        assert_eq!(session.pump(t0 + Duration::from_secs(1)), 0);
        let visible: Vec<_> = session
            .user_list(FilterTarget::Users)
            .visible()
            .map(|u| u.identifier.as_str())
            .collect();
        assert_eq!(visible, vec!["T001"]);
    }

    #[test]
    fn test_clearing_root_user_empties_pivot() {
        let mut session = session();
        session.select_user(Some("T001"));
        assert_eq!(session.selection(PanelId::Pivot1), Some(0));

        session.select_user(None);
        assert_eq!(session.root_user(), None);
        for slot in 0..3 {
            assert!(pivot_labels(&session, slot).is_empty());
        }
        assert_eq!(session.selection(PanelId::Pivot1), None);
        assert_eq!(session.selection(PanelId::Pivot2), None);
        assert_eq!(session.selection(PanelId::Pivot3), None);
        assert!(session.selected_pivot_row(0).is_none());
        assert_eq!(session.selected_user_caption(), "");
    }

    #[test]
    fn test_reload_keeps_root_and_filters() {
        let mut session = session();
        session.select_user(Some("jadmin"));
        session.set_filter_query(FilterTarget::Users, "smith", Instant::now());
        session.flush_filters();
        session.toggle_default_sort(PanelId::Users);

        session.load(Some(snapshot()));
        assert_eq!(session.root_user(), Some("jadmin"));
        assert_eq!(pivot_labels(&session, 0), vec!["Tellers", "Admins"]);
        assert_eq!(session.user_list(FilterTarget::Users).visible().count(), 1);
        assert_eq!(session.user_list(FilterTarget::Users).sort().direction(), None);
    }

    #[test]
    fn test_reload_drops_missing_root() {
        let mut session = session();
        session.select_user(Some("bsmith"));
        session.load(Some(Snapshot::new(vec![
            Group::new("Tellers").with_user(User::new("T001", "Tina"))
        ])));
        assert_eq!(session.root_user(), None);
        assert!(pivot_labels(&session, 0).is_empty());
    }

    #[test]
    fn test_group_tab() {
        let mut session = session();
        session.set_tab(Tab::Groups);
        assert!(!session.is_anything_selected());

        session.select_group(Some(1));
        assert!(session.is_anything_selected());
        assert_eq!(session.group_apps().items()[0].name, "Console");
        assert_eq!(session.user_list(FilterTarget::GroupMembers).len(), 2);

        session.select_group_app(Some(0));
        assert_eq!(
            session.group_app_permissions().items(),
            &[Permission::from_code("permAudit")]
        );

        session.clear_selection();
        assert!(!session.is_anything_selected());
        assert!(session.group_apps().is_empty());
    }

    #[test]
    fn test_permission_tab() {
        let mut session = session();
        session.set_tab(Tab::Permissions);
        let codes: Vec<_> = session
            .permissions()
            .items()
            .iter()
            .map(|p| p.code.as_str())
            .collect();
        assert_eq!(codes, vec!["permAudit", "permPrint"]);

        session.select_permission(Some(1));
        assert_eq!(session.permission_apps().items()[0].name, "Teller App");
        assert_eq!(session.user_list(FilterTarget::PermissionUsers).len(), 2);
        assert_eq!(session.permission_groups().items()[0].name, "Tellers");
    }

    #[test]
    fn test_application_tab() {
        let mut session = session();
        let names: Vec<_> = session.apps().items().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Console", "Teller App"]);

        session.select_application(Some(1));
        assert_eq!(session.app_groups().items()[0].name, "Tellers");
        assert_eq!(
            session.app_permissions().items(),
            &[Permission::from_code("permPrint")]
        );
        assert_eq!(session.user_list(FilterTarget::AppUsers).len(), 2);
    }

    #[test]
    fn test_sort_toggle_on_pivot_panel() {
        let mut session = session();
        session.select_user(Some("jadmin"));
        session.toggle_default_sort(PanelId::Pivot1);
        let shown: Vec<_> = session
            .pivot_panel(0)
            .map(|v| v.visible().map(PanelRow::label).collect())
            .unwrap_or_default();
        assert_eq!(shown, vec!["Admins", "Tellers"]);
        // Selection stays on the item, not the row position
        assert_eq!(session.selected_pivot_row(0).map(PanelRow::label), Some("Tellers"));
    }

    #[test]
    fn test_events_are_queued() {
        let mut session = session();
        session.take_events();
        session.set_view_mode(ViewMode::UserAppGroupPerm);
        let events = session.take_events();
        assert!(events.contains(&SessionEvent::ViewModeChanged(ViewMode::UserAppGroupPerm)));
        assert!(session.take_events().is_empty());
    }

    #[test]
    fn test_data_updated_text() {
        let updated = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        let mut session = Session::default();
        assert_eq!(session.data_updated_text(updated), "Data Status: Unknown");

        session.load(Some(snapshot().with_data_updated(updated.fixed_offset())));
        assert_eq!(
            session.data_updated_text(updated + chrono::Duration::minutes(42)),
            "Data Updated: 42 minutes ago"
        );
        assert_eq!(
            session.data_updated_text(updated + chrono::Duration::hours(5)),
            "Data Updated: 5 hours ago"
        );
        assert_eq!(
            session.data_updated_text(updated + chrono::Duration::days(3)),
            "Data Updated: 03/01/2024"
        );
    }

    #[test]
    fn test_tab_title() {
        let mut session = session();
        assert_eq!(session.tab_title(), "User Permission Viewer");
        session.set_tab(Tab::Applications);
        assert_eq!(session.tab_title(), "Application Permission Viewer");
    }
}
