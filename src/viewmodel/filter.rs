//! Case-insensitive substring filtering over fixed field sets.

use crate::model::{Permission, User};
use crate::pivot::{AppRow, GroupRow, PanelRow};

/// Placeholder text shown in an empty filter box.
pub const DEFAULT_PLACEHOLDER: &str = "filter...";

/// An entity that can be matched by a free-text filter.
pub trait Searchable {
    /// Text fields the filter looks at.
    fn search_fields(&self) -> Vec<&str>;

    /// Whether any field contains `needle`, which must already be lowercase.
    fn matches_needle(&self, needle: &str) -> bool {
        self.search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

impl Searchable for User {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.identifier.as_str(),
            self.name.as_str(),
            self.department.as_str(),
            self.title.as_str(),
            self.email.as_str(),
        ]
    }
}

impl Searchable for GroupRow {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.domain.as_str(),
            self.description.as_str(),
        ]
    }
}

impl Searchable for AppRow {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        if let Some(id) = &self.app_id {
            fields.push(id.as_str());
        }
        fields
    }
}

impl Searchable for Permission {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.code.as_str(), self.name.as_str()]
    }
}

impl Searchable for PanelRow {
    fn search_fields(&self) -> Vec<&str> {
        match self {
            Self::Group(g) => g.search_fields(),
            Self::Application(a) => a.search_fields(),
            Self::Permission(p) => p.search_fields(),
        }
    }
}

/// The applied predicate of one filter box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFilter {
    placeholder: String,
    /// Raw text as last applied
    query: String,
    /// Lowercased needle; `None` when the filter is cleared
    needle: Option<String>,
}

impl Default for TextFilter {
    fn default() -> Self {
        Self::new(DEFAULT_PLACEHOLDER)
    }
}

impl TextFilter {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            placeholder: placeholder.into(),
            query: String::new(),
            needle: None,
        }
    }

    /// Apply a query. Blank text or the placeholder clears the predicate.
    pub fn set_query(&mut self, text: &str) {
        self.query = text.to_string();
        let trimmed = text.trim();
        self.needle = if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(self.placeholder.trim()) {
            None
        } else {
            Some(trimmed.to_lowercase())
        };
    }

    pub fn clear(&mut self) {
        self.set_query("");
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.needle.is_some()
    }

    #[must_use]
    pub fn matches<T: Searchable + ?Sized>(&self, item: &T) -> bool {
        self.needle
            .as_deref()
            .map_or(true, |needle| item.matches_needle(needle))
    }

    /// Keep the indices in `order` whose items match, preserving order.
    pub fn retain<T: Searchable>(&self, items: &[T], order: &mut Vec<usize>) {
        if self.is_active() {
            order.retain(|&i| items.get(i).is_some_and(|item| self.matches(item)));
        }
    }
}
