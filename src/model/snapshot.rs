//! Snapshot entities: groups, users, application permission records.

use super::GrantFlag;
use chrono::{DateTime, FixedOffset};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Keys inside an application permission entry that are never permission codes.
pub const RESERVED_APP_KEYS: &[&str] = &["appId", "userId", "appName"];

/// Display name used for an application with neither a name nor an id.
pub const UNKNOWN_APP_NAME: &str = "(Unknown)";

/// Check whether a key is reserved (case-insensitive).
#[must_use]
pub fn is_reserved_key(key: &str) -> bool {
    RESERVED_APP_KEYS
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(key))
}

/// One immutable load of the full dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// When the exporter last refreshed the data
    pub data_updated: Option<DateTime<FixedOffset>>,
    /// Groups in document order
    pub groups: Vec<Group>,
}

impl Snapshot {
    /// Create a snapshot from a list of groups.
    #[must_use]
    pub fn new(groups: Vec<Group>) -> Self {
        Self {
            data_updated: None,
            groups,
        }
    }

    /// Set the data-updated timestamp.
    #[must_use]
    pub fn with_data_updated(mut self, at: DateTime<FixedOffset>) -> Self {
        self.data_updated = Some(at);
        self
    }

    /// Resolve an application locator.
    #[must_use]
    pub fn app_at(&self, group: usize, position: usize) -> Option<&AppPermission> {
        self.groups.get(group)?.app_permissions.get(position)
    }

    /// Total number of user entries across all groups (with repeats).
    #[must_use]
    pub fn membership_count(&self) -> usize {
        self.groups.iter().map(|g| g.users.len()).sum()
    }
}

/// A security group: a set of member users and the application
/// permission records the group carries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    pub domain: String,
    pub description: String,
    /// Security identifier
    pub sid: String,
    pub sam_account_name: Option<String>,
    pub users: Vec<User>,
    pub app_permissions: Vec<AppPermission>,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_user(mut self, user: User) -> Self {
        self.users.push(user);
        self
    }

    #[must_use]
    pub fn with_app(mut self, app: AppPermission) -> Self {
        self.app_permissions.push(app);
        self
    }

    /// Whether a user with this identifier is a member.
    #[must_use]
    pub fn has_member(&self, identifier: &str) -> bool {
        self.users.iter().any(|u| u.identifier == identifier)
    }

    /// Position of the first application record matching `app_key`.
    #[must_use]
    pub fn app_position(&self, app_key: &str) -> Option<usize> {
        self.app_permissions
            .iter()
            .position(|ap| ap.matches_key(app_key))
    }

    /// First application record matching `app_key`.
    #[must_use]
    pub fn app(&self, app_key: &str) -> Option<&AppPermission> {
        self.app_position(app_key)
            .and_then(|pos| self.app_permissions.get(pos))
    }
}

/// A directory account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Account identifier, unique across the snapshot
    pub identifier: String,
    pub name: String,
    pub email: String,
    pub department: String,
    pub title: String,
    /// Manager reference as exported; opaque to the viewer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager: Option<serde_json::Value>,
}

impl User {
    pub fn new(identifier: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = department.into();
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }
}

/// Application permission record as listed by one group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppPermission {
    pub app_name: String,
    pub app_id: Option<String>,
    /// Permission code -> resolved flag, in document order
    pub flags: IndexMap<String, GrantFlag>,
}

impl AppPermission {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            ..Self::default()
        }
    }

    /// Add a flag, resolving its text immediately.
    #[must_use]
    pub fn with_flag(mut self, code: impl Into<String>, value: &str) -> Self {
        self.flags.insert(code.into(), GrantFlag::from_text(value));
        self
    }

    #[must_use]
    pub fn with_app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = Some(app_id.into());
        self
    }

    /// Name shown to the operator, falling back to the application id.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if !self.app_name.trim().is_empty() {
            return &self.app_name;
        }
        match self.app_id.as_deref() {
            Some(id) if !id.trim().is_empty() => id,
            _ => UNKNOWN_APP_NAME,
        }
    }

    /// Identity key used to deduplicate applications across groups.
    #[must_use]
    pub fn key(&self) -> String {
        self.display_name().to_lowercase()
    }

    /// Whether this record belongs to the application identified by `app_key`.
    #[must_use]
    pub fn matches_key(&self, app_key: &str) -> bool {
        self.display_name().to_lowercase() == app_key
    }

    /// Whether `code` is granted on this record.
    #[must_use]
    pub fn grants(&self, code: &str) -> bool {
        self.flags.get(code).is_some_and(|f| f.is_granted())
    }

    /// Granted codes in document order.
    pub fn granted_codes(&self) -> impl Iterator<Item = &str> {
        self.flags
            .iter()
            .filter(|(_, flag)| flag.is_granted())
            .map(|(code, _)| code.as_str())
    }
}

/// A granted permission code, deduplicated across the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Permission {
    /// Raw permission code
    pub code: String,
    /// Human-readable label, the code itself if unmapped
    pub name: String,
}

impl Permission {
    /// Create a permission whose label is the raw code.
    pub fn from_code(code: impl Into<String>) -> Self {
        let code = code.into();
        Self {
            name: code.clone(),
            code,
        }
    }

    /// Create a permission, resolving the label through `labels`.
    #[must_use]
    pub fn labeled(code: &str, labels: &IndexMap<String, String>) -> Self {
        Self {
            code: code.to_string(),
            name: labels
                .get(code)
                .cloned()
                .unwrap_or_else(|| code.to_string()),
        }
    }
}
