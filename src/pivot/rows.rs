//! Result rows shown in pivot and lookup panels.

use crate::model::{AppPermission, Group, Permission};
use serde::Serialize;

/// A group row, pointing back into the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct GroupRow {
    /// Group index in the snapshot
    #[serde(skip)]
    pub index: usize,
    pub name: String,
    pub domain: String,
    pub description: String,
}

impl GroupRow {
    #[must_use]
    pub fn from_group(index: usize, group: &Group) -> Self {
        Self {
            index,
            name: group.name.clone(),
            domain: group.domain.clone(),
            description: group.description.clone(),
        }
    }
}

/// An application row, pointing at one concrete record in the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct AppRow {
    /// Group index of the referenced record
    #[serde(skip)]
    pub group: usize,
    /// Position of the record within the group
    #[serde(skip)]
    pub position: usize,
    pub name: String,
    /// Lowercased name used for identity
    #[serde(skip)]
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
}

impl AppRow {
    #[must_use]
    pub fn from_record(group: usize, position: usize, app: &AppPermission) -> Self {
        Self {
            group,
            position,
            name: app.display_name().to_string(),
            key: app.key(),
            app_id: app.app_id.clone(),
        }
    }
}

/// One row of a pivot panel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PanelRow {
    Group(GroupRow),
    Application(AppRow),
    Permission(Permission),
}

impl PanelRow {
    /// Text shown in the panel's single column.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Group(g) => &g.name,
            Self::Application(a) => &a.name,
            Self::Permission(p) => &p.name,
        }
    }

    #[must_use]
    pub const fn as_group(&self) -> Option<&GroupRow> {
        match self {
            Self::Group(g) => Some(g),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_app(&self) -> Option<&AppRow> {
        match self {
            Self::Application(a) => Some(a),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_permission(&self) -> Option<&Permission> {
        match self {
            Self::Permission(p) => Some(p),
            _ => None,
        }
    }
}

impl From<GroupRow> for PanelRow {
    fn from(row: GroupRow) -> Self {
        Self::Group(row)
    }
}

impl From<AppRow> for PanelRow {
    fn from(row: AppRow) -> Self {
        Self::Application(row)
    }
}

impl From<Permission> for PanelRow {
    fn from(permission: Permission) -> Self {
        Self::Permission(permission)
    }
}
