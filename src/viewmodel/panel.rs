//! A result collection with its filter and sort applied as a view.

use super::filter::{Searchable, TextFilter};
use super::sort::{SortField, SortState, Sortable};
use serde::{Deserialize, Serialize};

/// Every list the session exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PanelId {
    /// Root user list on the Users tab
    Users,
    Pivot1,
    Pivot2,
    Pivot3,
    GroupList,
    GroupApps,
    GroupAppPermissions,
    GroupMembers,
    AppList,
    AppGroups,
    AppPermissions,
    AppUsers,
    PermissionList,
    PermissionApps,
    PermissionGroups,
    PermissionUsers,
}

impl PanelId {
    pub const ALL: [Self; 16] = [
        Self::Users,
        Self::Pivot1,
        Self::Pivot2,
        Self::Pivot3,
        Self::GroupList,
        Self::GroupApps,
        Self::GroupAppPermissions,
        Self::GroupMembers,
        Self::AppList,
        Self::AppGroups,
        Self::AppPermissions,
        Self::AppUsers,
        Self::PermissionList,
        Self::PermissionApps,
        Self::PermissionGroups,
        Self::PermissionUsers,
    ];

    /// Field the header toggle sorts on.
    #[must_use]
    pub const fn default_sort_field(self) -> SortField {
        SortField::Name
    }
}

/// Operations common to every panel regardless of its row type.
pub trait PanelControl {
    fn set_filter(&mut self, text: &str);
    fn toggle_sort(&mut self, field: SortField);
    fn reset_sort(&mut self);
}

/// Items in load order plus the filtered, sorted order shown to the user.
#[derive(Debug, Clone)]
pub struct PanelView<T> {
    items: Vec<T>,
    filter: TextFilter,
    sort: SortState,
    visible: Vec<usize>,
}

impl<T> Default for PanelView<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            filter: TextFilter::default(),
            sort: SortState::default(),
            visible: Vec::new(),
        }
    }
}

impl<T: Searchable + Sortable> PanelView<T> {
    #[must_use]
    pub fn new(placeholder: &str) -> Self {
        Self {
            filter: TextFilter::new(placeholder),
            ..Self::default()
        }
    }

    /// Replace the collection, keeping filter and sort.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.refresh();
    }

    pub fn clear(&mut self) {
        self.set_items(Vec::new());
    }

    /// Apply a filter query immediately.
    pub fn set_filter(&mut self, text: &str) {
        self.filter.set_query(text);
        self.refresh();
    }

    pub fn toggle_sort(&mut self, field: SortField) {
        self.sort.toggle(field);
        self.refresh();
    }

    pub fn reset_sort(&mut self) {
        self.sort.reset();
        self.refresh();
    }

    /// Recompute the visible order from load order.
    pub fn refresh(&mut self) {
        let mut order: Vec<usize> = (0..self.items.len()).collect();
        self.filter.retain(&self.items, &mut order);
        self.sort.apply(&self.items, &mut order);
        self.visible = order;
    }
}

impl<T> PanelView<T> {
    /// Items in load order.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Indices into [`items`](Self::items), filtered and sorted.
    #[must_use]
    pub fn visible_indices(&self) -> &[usize] {
        &self.visible
    }

    /// Visible items in display order.
    pub fn visible(&self) -> impl Iterator<Item = &T> + '_ {
        self.visible.iter().filter_map(|&i| self.items.get(i))
    }

    #[must_use]
    pub fn filter(&self) -> &TextFilter {
        &self.filter
    }

    #[must_use]
    pub const fn sort(&self) -> &SortState {
        &self.sort
    }
}

impl<T: Searchable + Sortable> PanelControl for PanelView<T> {
    fn set_filter(&mut self, text: &str) {
        Self::set_filter(self, text);
    }

    fn toggle_sort(&mut self, field: SortField) {
        Self::toggle_sort(self, field);
    }

    fn reset_sort(&mut self) {
        Self::reset_sort(self);
    }
}
