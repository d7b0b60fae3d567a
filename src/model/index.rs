//! Index structures for efficient snapshot queries.
//!
//! This module provides `SnapshotIndex`, a precomputed index built once per
//! snapshot. It replaces repeated linear scans over every group's member
//! list with O(1) lookups and keeps the aggregate root collections ready.
//!
//! # Example
//!
//! ```ignore
//! use permview::model::{Snapshot, SnapshotIndex};
//!
//! let snapshot = parse_snapshot(&path)?;
//! let index = SnapshotIndex::build(&snapshot);
//!
//! // O(1) membership lookup instead of O(groups * members)
//! let groups = index.groups_of("T001");
//!
//! // Deduplicated, name-sorted applications
//! for app in index.apps() {
//!     println!("{}", app.name);
//! }
//! ```

use super::{Permission, Snapshot, User};
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};

/// Locates the first-seen record of an application in the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AppLocator {
    /// Group index in the snapshot
    pub group: usize,
    /// Position within the group's application list
    pub position: usize,
    /// Display name of the first-seen record
    pub name: String,
    /// Lowercased display name (dedup key)
    pub key: String,
}

/// Precomputed index for snapshot queries.
///
/// Provides:
/// - Groups of a user (by identifier)
/// - All users, deduplicated by identifier, sorted by name
/// - All applications, deduplicated by name, sorted by name
/// - All granted permissions, deduplicated by code, sorted by code
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct SnapshotIndex {
    /// Group indices by user identifier
    groups_by_user: HashMap<String, Vec<usize>>,
    /// Unique users sorted by display name
    users: Vec<User>,
    /// Position in `users` by identifier
    user_positions: HashMap<String, usize>,
    /// Unique applications sorted by name
    apps: Vec<AppLocator>,
    /// Position in `apps` by dedup key
    app_positions: HashMap<String, usize>,
    /// Unique granted permissions sorted by code
    permissions: Vec<Permission>,
}

impl SnapshotIndex {
    /// Build an index without permission labels.
    ///
    /// O(total memberships + total flags).
    pub fn build(snapshot: &Snapshot) -> Self {
        SnapshotIndexBuilder::new().build(snapshot)
    }

    /// Group indices the user belongs to, in snapshot order.
    ///
    /// Returns an empty slice for unknown or blank identifiers.
    pub fn groups_of(&self, identifier: &str) -> &[usize] {
        self.groups_by_user
            .get(identifier)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All unique users, sorted by name.
    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Look up a user by identifier.
    pub fn user(&self, identifier: &str) -> Option<&User> {
        self.user_positions
            .get(identifier)
            .and_then(|&pos| self.users.get(pos))
    }

    /// All unique applications, sorted by name.
    pub fn apps(&self) -> &[AppLocator] {
        &self.apps
    }

    /// Look up the first-seen record of an application by dedup key.
    pub fn app(&self, key: &str) -> Option<&AppLocator> {
        self.app_positions
            .get(key)
            .and_then(|&pos| self.apps.get(pos))
    }

    /// All unique granted permissions, sorted by code.
    pub fn permissions(&self) -> &[Permission] {
        &self.permissions
    }

    /// Number of unique users.
    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Number of unique applications.
    pub fn app_count(&self) -> usize {
        self.apps.len()
    }

    /// Number of unique granted permissions.
    pub fn permission_count(&self) -> usize {
        self.permissions.len()
    }
}

/// Builder for creating indexes with optional permission labels.
#[derive(Debug, Default, Clone)]
#[must_use]
pub struct SnapshotIndexBuilder {
    /// Code -> human-readable label
    labels: IndexMap<String, String>,
}

impl SnapshotIndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve permission names through a label table.
    pub fn with_labels(mut self, labels: IndexMap<String, String>) -> Self {
        self.labels = labels;
        self
    }

    /// Build the index.
    pub fn build(&self, snapshot: &Snapshot) -> SnapshotIndex {
        let mut groups_by_user: HashMap<String, Vec<usize>> = HashMap::new();
        let mut users: Vec<User> = Vec::new();
        let mut seen_users: HashSet<&str> = HashSet::new();
        let mut apps: Vec<AppLocator> = Vec::new();
        let mut seen_apps: HashSet<String> = HashSet::new();
        let mut codes: Vec<&str> = Vec::new();
        let mut seen_codes: HashSet<&str> = HashSet::new();

        for (group_idx, group) in snapshot.groups.iter().enumerate() {
            for user in &group.users {
                if user.identifier.trim().is_empty() {
                    continue;
                }
                let memberships = groups_by_user.entry(user.identifier.clone()).or_default();
                if memberships.last() != Some(&group_idx) {
                    memberships.push(group_idx);
                }
                if seen_users.insert(user.identifier.as_str()) {
                    users.push(user.clone());
                }
            }

            for (position, app) in group.app_permissions.iter().enumerate() {
                let key = app.key();
                if seen_apps.insert(key.clone()) {
                    apps.push(AppLocator {
                        group: group_idx,
                        position,
                        name: app.display_name().to_string(),
                        key,
                    });
                }
                for code in app.granted_codes() {
                    if seen_codes.insert(code) {
                        codes.push(code);
                    }
                }
            }
        }

        users.sort_by_cached_key(|u| u.name.to_lowercase());
        apps.sort_by(|a, b| a.key.cmp(&b.key));
        codes.sort_by_cached_key(|c| (c.to_lowercase(), (*c).to_string()));

        let user_positions = users
            .iter()
            .enumerate()
            .map(|(pos, u)| (u.identifier.clone(), pos))
            .collect();
        let app_positions = apps
            .iter()
            .enumerate()
            .map(|(pos, a)| (a.key.clone(), pos))
            .collect();
        let permissions = codes
            .into_iter()
            .map(|code| Permission::labeled(code, &self.labels))
            .collect();

        tracing::debug!(
            users = users.len(),
            apps = apps.len(),
            memberships = snapshot.membership_count(),
            "snapshot index built"
        );

        SnapshotIndex {
            groups_by_user,
            users,
            user_positions,
            apps,
            app_positions,
            permissions,
        }
    }
}
