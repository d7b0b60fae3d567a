//! View-model layer: filtering, sorting and debouncing of result lists.
//!
//! # Components
//!
//! - [`PanelView`] - A collection with its filtered, sorted order
//! - [`TextFilter`] - Case-insensitive substring predicate
//! - [`SortState`] - Per-panel sort toggle
//! - [`Debounce`] - Restartable quiet-period timer
//!
//! Nothing here mutates the underlying collection; views keep index lists
//! into the items as loaded.

mod debounce;
mod filter;
mod panel;
mod sort;

pub use debounce::{Debounce, DEFAULT_DEBOUNCE};
pub use filter::{Searchable, TextFilter, DEFAULT_PLACEHOLDER};
pub use panel::{PanelControl, PanelId, PanelView};
pub use sort::{SortDirection, SortField, SortState, Sortable};
