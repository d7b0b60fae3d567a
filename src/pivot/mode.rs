//! The three join orders of the user-rooted pivot.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Join order applied below the root user.
///
/// | Mode | Panel 1 | Panel 2 | Panel 3 |
/// |---|---|---|---|
/// | `UserGroupAppPerm` | Groups | Applications | Permissions |
/// | `UserAppGroupPerm` | Applications | Groups | Permissions |
/// | `UserPermAppGroup` | Permissions | Applications | Groups |
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum ViewMode {
    #[default]
    UserGroupAppPerm,
    UserAppGroupPerm,
    UserPermAppGroup,
}

impl ViewMode {
    /// All modes in menu order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::UserGroupAppPerm,
            Self::UserAppGroupPerm,
            Self::UserPermAppGroup,
        ]
    }

    /// Name shown in the mode selector.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::UserGroupAppPerm => "User-Group-App-Perm",
            Self::UserAppGroupPerm => "User-App-Group-Perm",
            Self::UserPermAppGroup => "User-Perm-App-Group",
        }
    }

    /// Panel titles, left to right.
    #[must_use]
    pub const fn panel_headers(self) -> [&'static str; 3] {
        match self {
            Self::UserGroupAppPerm => ["Groups", "Applications", "Permissions"],
            Self::UserAppGroupPerm => ["Applications", "Groups", "Permissions"],
            Self::UserPermAppGroup => ["Permissions", "Applications", "Groups"],
        }
    }

    /// Column labels, left to right.
    #[must_use]
    pub const fn column_headers(self) -> [&'static str; 3] {
        match self {
            Self::UserGroupAppPerm => ["Group", "Application", "Permission"],
            Self::UserAppGroupPerm => ["Application", "Group", "Permission"],
            Self::UserPermAppGroup => ["Permission", "Application", "Group"],
        }
    }

    /// Cycle to the next mode.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::UserGroupAppPerm => Self::UserAppGroupPerm,
            Self::UserAppGroupPerm => Self::UserPermAppGroup,
            Self::UserPermAppGroup => Self::UserGroupAppPerm,
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "usergroupappperm" | "groupappperm" | "gap" => Ok(Self::UserGroupAppPerm),
            "userappgroupperm" | "appgroupperm" | "agp" => Ok(Self::UserAppGroupPerm),
            "userpermappgroup" | "permappgroup" | "pag" => Ok(Self::UserPermAppGroup),
            _ => Err(format!(
                "unknown view mode '{s}' (expected one of: {})",
                Self::all()
                    .iter()
                    .map(|m| m.display_name())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_follow_mode() {
        assert_eq!(
            ViewMode::UserAppGroupPerm.panel_headers(),
            ["Applications", "Groups", "Permissions"]
        );
        assert_eq!(
            ViewMode::UserPermAppGroup.column_headers(),
            ["Permission", "Application", "Group"]
        );
    }

    #[test]
    fn test_parse_names() {
        assert_eq!(
            "User-Perm-App-Group".parse::<ViewMode>(),
            Ok(ViewMode::UserPermAppGroup)
        );
        assert_eq!("user-app-group-perm".parse::<ViewMode>(), Ok(ViewMode::UserAppGroupPerm));
        assert_eq!("gap".parse::<ViewMode>(), Ok(ViewMode::UserGroupAppPerm));
        assert!("sideways".parse::<ViewMode>().is_err());
    }

    #[test]
    fn test_cycle_returns_to_start() {
        let mut mode = ViewMode::default();
        for _ in 0..ViewMode::all().len() {
            mode = mode.next();
        }
        assert_eq!(mode, ViewMode::default());
    }
}
