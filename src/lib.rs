//! **Read-only viewer for exported access-control snapshots.**
//!
//! `permview` loads a snapshot of directory groups (each with member users and
//! per-application permission flags) and answers two kinds of questions:
//!
//! - **User-rooted pivots**: pick a root user and one of three join orders, and
//!   the library computes three dependent panels (for example *groups → the
//!   applications those groups grant → the permissions granted for that group
//!   and application*), cascading a default selection through them.
//! - **Entity lookups**: for a group, application or permission, which
//!   applications, groups, permissions and users relate to it.
//!
//! Every result list can be filtered by a case-insensitive substring and
//! sorted by a per-panel toggle; filter text applies after a debounce.
//!
//! ## Core Concepts & Modules
//!
//! - **[`model`]**: the immutable [`Snapshot`] plus the [`SnapshotStore`] that
//!   owns it and lazily builds a [`SnapshotIndex`].
//! - **[`parsers`]**: lenient JSON parsing of the exported document.
//! - **[`pivot`]**: pure functions computing pivot panels and lookups.
//! - **[`viewmodel`]**: filter, sort and debounce building blocks.
//! - **[`session`]**: the selection and view-mode state machine that a
//!   frontend drives.
//! - **[`reports`]**: table and JSON rendering for the command-line tool.
//!
//! ## Getting Started
//!
//! ```no_run
//! use std::path::Path;
//! use permview::{parse_snapshot, Session, SessionOptions, ViewMode};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let snapshot = parse_snapshot(Path::new("UserPermissions.json"))?;
//!     let mut session = Session::with_snapshot(SessionOptions::default(), Some(snapshot));
//!
//!     session.set_view_mode(ViewMode::UserGroupAppPerm);
//!     session.select_user(Some("T001"));
//!
//!     let headers = session.panel_headers();
//!     for slot in 0..3 {
//!         if let Some(panel) = session.pivot_panel(slot) {
//!             let labels: Vec<&str> = panel.visible().map(|row| row.label()).collect();
//!             println!("{}: {}", headers[slot], labels.join(", "));
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Command-Line Interface (CLI)
//!
//! The `permview` binary wraps the same session: `permview pivot T001`,
//! `permview permission permPrint -o json`, and so on.

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod parsers;
pub mod pivot;
pub mod reports;
pub mod session;
pub mod viewmodel;

// Re-export main types for convenience
pub use config::{AppConfig, ConfigError, Validatable};
pub use error::{ErrorContext, PermViewError, Result};
pub use model::{
    AppPermission, GrantFlag, Group, Permission, Snapshot, SnapshotIndex, SnapshotStore, User,
};
pub use parsers::{parse_snapshot, parse_snapshot_str};
pub use pivot::{PanelRow, PivotResult, ViewMode};
pub use reports::{Report, ReportFormat, ReportGenerator};
pub use session::{FilterTarget, Session, SessionEvent, SessionOptions, Tab};
pub use viewmodel::{PanelId, PanelView, SortDirection, SortField};
