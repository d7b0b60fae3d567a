//! Tabs, filter targets, options and change events of a [`Session`].
//!
//! [`Session`]: super::Session

use crate::pivot::ViewMode;
use crate::viewmodel::{PanelId, DEFAULT_DEBOUNCE, DEFAULT_PLACEHOLDER};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Top-level tabs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tab {
    #[default]
    Users,
    Groups,
    Applications,
    Permissions,
    Settings,
}

impl Tab {
    pub const ALL: [Self; 5] = [
        Self::Users,
        Self::Groups,
        Self::Applications,
        Self::Permissions,
        Self::Settings,
    ];

    /// Header shown while the tab is active.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Users => "User Permission Viewer",
            Self::Groups => "Group Permission Viewer",
            Self::Applications => "Application Permission Viewer",
            Self::Permissions => "Permission Viewer",
            Self::Settings => "Settings",
        }
    }
}

/// User lists with their own debounced filter box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterTarget {
    /// Root user list on the Users tab
    Users,
    GroupMembers,
    AppUsers,
    PermissionUsers,
}

impl FilterTarget {
    pub const ALL: [Self; 4] = [
        Self::Users,
        Self::GroupMembers,
        Self::AppUsers,
        Self::PermissionUsers,
    ];

    pub(crate) const fn slot(self) -> usize {
        match self {
            Self::Users => 0,
            Self::GroupMembers => 1,
            Self::AppUsers => 2,
            Self::PermissionUsers => 3,
        }
    }

    /// Filter box owning `panel`, if it has one.
    #[must_use]
    pub fn for_panel(panel: PanelId) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.panel() == panel)
    }

    /// Panel the filter applies to.
    #[must_use]
    pub const fn panel(self) -> PanelId {
        match self {
            Self::Users => PanelId::Users,
            Self::GroupMembers => PanelId::GroupMembers,
            Self::AppUsers => PanelId::AppUsers,
            Self::PermissionUsers => PanelId::PermissionUsers,
        }
    }
}

/// Change notifications, queued until [`Session::take_events`].
///
/// [`Session::take_events`]: super::Session::take_events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SnapshotLoaded { generation: u64 },
    TabChanged(Tab),
    ViewModeChanged(ViewMode),
    RootUserChanged(Option<String>),
    /// A panel's items were recomputed
    PanelChanged(PanelId),
    SelectionChanged(PanelId),
    FilterApplied(FilterTarget),
    /// A panel without a filter box was filtered directly
    PanelFiltered(PanelId),
    SortChanged(PanelId),
}

/// Tunables a session is created with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    /// Quiet period before a filter query applies
    pub debounce: Duration,
    /// Filter-box placeholder text, ignored as a query
    pub placeholder: String,
    /// View mode at startup
    pub default_mode: ViewMode,
    /// Permission code -> label
    pub labels: IndexMap<String, String>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            default_mode: ViewMode::default(),
            labels: IndexMap::new(),
        }
    }
}
