//! Pivot engine.
//!
//! Given a root user and a [`ViewMode`], computes the three dependent
//! panels and cascades a default selection through them. The
//! [`lookup`] functions answer the non-rooted questions of the entity tabs.
//!
//! ```ignore
//! let store = SnapshotStore::with_snapshot(Some(snapshot));
//! let result = pivot::cascade(&store, ViewMode::UserGroupAppPerm, "T001");
//! for row in &result.panel1 {
//!     println!("{}", row.label());
//! }
//! ```

mod engine;
pub mod lookup;
mod mode;
mod rows;

pub use engine::{cascade, panel1, panel2, panel3, PivotResult};
pub use lookup::{AppLookup, GroupLookup, PermissionLookup};
pub use mode::ViewMode;
pub use rows::{AppRow, GroupRow, PanelRow};
