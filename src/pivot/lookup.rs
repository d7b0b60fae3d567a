//! Direct lookups over the whole snapshot, used by the Groups,
//! Applications and Permissions tabs.
//!
//! Unlike the pivot panels these are not rooted at a user: they answer
//! "who and what is attached to this entity" across every group.

use super::{AppRow, GroupRow};
use crate::model::{Group, Permission, SnapshotStore, User};
use std::collections::HashSet;

/// Everything attached to one group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupLookup {
    /// The group's applications, deduplicated by name
    pub apps: Vec<AppRow>,
    /// The group's member list as exported
    pub members: Vec<User>,
}

/// Everything attached to one application.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppLookup {
    /// Every group exposing the application, in snapshot order
    pub groups: Vec<GroupRow>,
    /// Granted permissions of the first-seen record
    pub permissions: Vec<Permission>,
    /// Users of those groups, deduplicated and sorted by name
    pub users: Vec<User>,
}

/// Everything reachable from one permission code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionLookup {
    /// Applications granting the code, deduplicated and sorted by name
    pub apps: Vec<AppRow>,
    /// Users of any group whose application grants the code
    pub users: Vec<User>,
}

/// Look up a group by snapshot index.
#[must_use]
pub fn group_lookup(store: &SnapshotStore, group: usize) -> GroupLookup {
    let Some(found) = store.groups().get(group) else {
        return GroupLookup::default();
    };
    let mut seen = HashSet::new();
    let apps = found
        .app_permissions
        .iter()
        .enumerate()
        .filter(|(_, app)| seen.insert(app.key()))
        .map(|(pos, app)| AppRow::from_record(group, pos, app))
        .collect();
    GroupLookup {
        apps,
        members: found.users.clone(),
    }
}

/// Granted permissions of an application record inside one group.
#[must_use]
pub fn group_app_permissions(store: &SnapshotStore, group: usize, app_key: &str) -> Vec<Permission> {
    store
        .groups()
        .get(group)
        .and_then(|g| g.app(app_key))
        .map(|app| labeled(store, app.granted_codes()))
        .unwrap_or_default()
}

/// Look up an application by its lowercased name.
#[must_use]
pub fn app_lookup(store: &SnapshotStore, app_key: &str) -> AppLookup {
    let groups: Vec<(usize, &Group)> = store
        .groups()
        .iter()
        .enumerate()
        .filter(|(_, g)| g.app_position(app_key).is_some())
        .collect();

    let permissions = store
        .index()
        .app(app_key)
        .and_then(|loc| store.snapshot()?.app_at(loc.group, loc.position))
        .map(|app| labeled(store, app.granted_codes()))
        .unwrap_or_default();

    AppLookup {
        users: unique_users(groups.iter().map(|(_, g)| *g)),
        groups: groups
            .into_iter()
            .map(|(idx, g)| GroupRow::from_group(idx, g))
            .collect(),
        permissions,
    }
}

/// Look up everything reachable from a permission code.
#[must_use]
pub fn permission_lookup(store: &SnapshotStore, code: &str) -> PermissionLookup {
    let mut seen = HashSet::new();
    let mut apps = Vec::new();
    let mut granting_groups = Vec::new();

    for (idx, group) in store.groups().iter().enumerate() {
        let mut grants_here = false;
        for (pos, app) in group.app_permissions.iter().enumerate() {
            if !app.grants(code) {
                continue;
            }
            grants_here = true;
            if seen.insert(app.key()) {
                apps.push(AppRow::from_record(idx, pos, app));
            }
        }
        if grants_here {
            granting_groups.push(group);
        }
    }
    apps.sort_by(|a, b| a.key.cmp(&b.key));

    PermissionLookup {
        apps,
        users: unique_users(granting_groups.into_iter()),
    }
}

/// Groups granting `code`, optionally narrowed to one application.
#[must_use]
pub fn permission_groups(store: &SnapshotStore, code: &str, app_key: Option<&str>) -> Vec<GroupRow> {
    store
        .groups()
        .iter()
        .enumerate()
        .filter(|(_, group)| {
            group
                .app_permissions
                .iter()
                .any(|app| app.grants(code) && app_key.map_or(true, |key| app.matches_key(key)))
        })
        .map(|(idx, group)| GroupRow::from_group(idx, group))
        .collect()
}

/// Deduplicate users by identifier across groups and sort by name.
fn unique_users<'a>(groups: impl Iterator<Item = &'a Group>) -> Vec<User> {
    let mut seen = HashSet::new();
    let mut users: Vec<User> = groups
        .flat_map(|g| g.users.iter())
        .filter(|u| !u.identifier.trim().is_empty() && seen.insert(u.identifier.as_str()))
        .cloned()
        .collect();
    users.sort_by_cached_key(|u| u.name.to_lowercase());
    users
}

fn labeled<'a>(store: &SnapshotStore, codes: impl Iterator<Item = &'a str>) -> Vec<Permission> {
    let mut seen = HashSet::new();
    codes
        .filter(|code| seen.insert(*code))
        .map(|code| Permission::labeled(code, store.labels()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AppPermission, Snapshot};

    fn store() -> SnapshotStore {
        SnapshotStore::with_snapshot(Some(Snapshot::new(vec![
            Group::new("Tellers")
                .with_user(User::new("T001", "Zed"))
                .with_user(User::new("T002", "Amy"))
                .with_app(AppPermission::new("Teller App").with_flag("permPrint", "1"))
                .with_app(AppPermission::new("teller app").with_flag("permVoid", "1")),
            Group::new("Supervisors")
                .with_user(User::new("T001", "Zed"))
                .with_user(User::new("S001", "Mia"))
                .with_app(AppPermission::new("Teller App").with_flag("permVoid", "1"))
                .with_app(AppPermission::new("Ledger").with_flag("permPrint", "1")),
            Group::new("Empty"),
        ])))
    }

    fn names(users: &[User]) -> Vec<&str> {
        users.iter().map(|u| u.name.as_str()).collect()
    }

    #[test]
    fn test_group_lookup_dedups_apps_keeps_members_raw() {
        let store = store();
        let lookup = group_lookup(&store, 0);

        assert_eq!(lookup.apps.len(), 1);
        assert_eq!(lookup.apps[0].name, "Teller App");
        assert_eq!(names(&lookup.members), vec!["Zed", "Amy"]);
        assert_eq!(group_lookup(&store, 99), GroupLookup::default());
    }

    #[test]
    fn test_group_app_permissions_uses_first_record_in_group() {
        let store = store();
        let perms = group_app_permissions(&store, 0, "teller app");
        assert_eq!(perms, vec![Permission::from_code("permPrint")]);

        let perms = group_app_permissions(&store, 1, "teller app");
        assert_eq!(perms, vec![Permission::from_code("permVoid")]);
    }

    #[test]
    fn test_app_lookup() {
        let store = store();
        let lookup = app_lookup(&store, "teller app");

        let groups: Vec<_> = lookup.groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(groups, vec!["Tellers", "Supervisors"]);
        assert_eq!(lookup.permissions, vec![Permission::from_code("permPrint")]);
        assert_eq!(names(&lookup.users), vec!["Amy", "Mia", "Zed"]);
    }

    #[test]
    fn test_permission_lookup() {
        let store = store();
        let lookup = permission_lookup(&store, "permPrint");

        let apps: Vec<_> = lookup.apps.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(apps, vec!["Ledger", "Teller App"]);
        assert_eq!(names(&lookup.users), vec!["Amy", "Mia", "Zed"]);

        let missing = permission_lookup(&store, "permNothing");
        assert!(missing.apps.is_empty());
        assert!(missing.users.is_empty());
    }

    #[test]
    fn test_permission_groups_narrowed_by_app() {
        let store = store();
        let all: Vec<_> = permission_groups(&store, "permPrint", None)
            .into_iter()
            .map(|g| g.name)
            .collect();
        assert_eq!(all, vec!["Tellers", "Supervisors"]);

        let ledger: Vec<_> = permission_groups(&store, "permPrint", Some("ledger"))
            .into_iter()
            .map(|g| g.name)
            .collect();
        assert_eq!(ledger, vec!["Supervisors"]);
    }

    #[test]
    fn test_lookups_on_empty_store() {
        let store = SnapshotStore::new();
        assert_eq!(app_lookup(&store, "teller app"), AppLookup::default());
        assert_eq!(permission_lookup(&store, "permPrint"), PermissionLookup::default());
        assert!(permission_groups(&store, "permPrint", None).is_empty());
    }
}
