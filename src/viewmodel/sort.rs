//! Per-panel sort toggles.

use crate::model::{Permission, User};
use crate::pivot::{AppRow, GroupRow, PanelRow};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggle(&mut self) {
        *self = match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        };
    }

    pub const fn indicator(self) -> &'static str {
        match self {
            Self::Ascending => "↑",
            Self::Descending => "↓",
        }
    }
}

/// Field a panel can be sorted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum SortField {
    Name,
    Identifier,
    Department,
    Title,
    Email,
    Domain,
    Description,
    Code,
    AppId,
}

/// An entity with sortable text fields.
pub trait Sortable {
    /// Value of `field`, or `None` if the entity has no such field.
    fn sort_key(&self, field: SortField) -> Option<&str>;
}

impl Sortable for User {
    fn sort_key(&self, field: SortField) -> Option<&str> {
        match field {
            SortField::Name => Some(self.name.as_str()),
            SortField::Identifier => Some(self.identifier.as_str()),
            SortField::Department => Some(self.department.as_str()),
            SortField::Title => Some(self.title.as_str()),
            SortField::Email => Some(self.email.as_str()),
            _ => None,
        }
    }
}

impl Sortable for GroupRow {
    fn sort_key(&self, field: SortField) -> Option<&str> {
        match field {
            SortField::Name => Some(self.name.as_str()),
            SortField::Domain => Some(self.domain.as_str()),
            SortField::Description => Some(self.description.as_str()),
            _ => None,
        }
    }
}

impl Sortable for AppRow {
    fn sort_key(&self, field: SortField) -> Option<&str> {
        match field {
            SortField::Name => Some(self.name.as_str()),
            SortField::AppId => self.app_id.as_deref(),
            _ => None,
        }
    }
}

impl Sortable for Permission {
    fn sort_key(&self, field: SortField) -> Option<&str> {
        match field {
            SortField::Name => Some(self.name.as_str()),
            SortField::Code => Some(self.code.as_str()),
            _ => None,
        }
    }
}

impl Sortable for PanelRow {
    fn sort_key(&self, field: SortField) -> Option<&str> {
        match self {
            Self::Group(g) => g.sort_key(field),
            Self::Application(a) => a.sort_key(field),
            Self::Permission(p) => p.sort_key(field),
        }
    }
}

/// Sort directive of one panel. `None` keeps load order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortState {
    directive: Option<(SortField, SortDirection)>,
}

impl SortState {
    /// Toggle the panel's direction and sort on `field`.
    ///
    /// The first toggle is ascending. The direction belongs to the panel,
    /// so switching fields keeps flipping it.
    pub fn toggle(&mut self, field: SortField) {
        let direction = match self.directive {
            Some((_, mut direction)) => {
                direction.toggle();
                direction
            }
            None => SortDirection::Ascending,
        };
        self.directive = Some((field, direction));
    }

    pub fn reset(&mut self) {
        self.directive = None;
    }

    #[must_use]
    pub const fn directive(&self) -> Option<(SortField, SortDirection)> {
        self.directive
    }

    #[must_use]
    pub fn direction(&self) -> Option<SortDirection> {
        self.directive.map(|(_, d)| d)
    }

    /// Stable, case-insensitive reorder of `order` (indices into `items`).
    pub fn apply<T: Sortable>(&self, items: &[T], order: &mut [usize]) {
        let Some((field, direction)) = self.directive else {
            return;
        };
        let key = |i: usize| {
            items
                .get(i)
                .and_then(|item| item.sort_key(field))
                .map(str::to_lowercase)
                .unwrap_or_default()
        };
        match direction {
            SortDirection::Ascending => order.sort_by_cached_key(|&i| key(i)),
            SortDirection::Descending => order.sort_by_cached_key(|&i| Reverse(key(i))),
        }
    }
}
