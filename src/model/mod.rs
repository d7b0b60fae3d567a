//! Read-only data model for access-control snapshots.
//!
//! A [`Snapshot`] is a list of [`Group`]s, each owning its member
//! [`User`]s and the [`AppPermission`] records it carries. Permission flag
//! values are resolved into [`GrantFlag`]s while parsing, so nothing
//! downstream re-reads flag text.
//!
//! # Index Support
//!
//! Membership lookups and the aggregate root collections are served by a
//! [`SnapshotIndex`], owned and lazily rebuilt by the [`SnapshotStore`]:
//!
//! ```ignore
//! let store = SnapshotStore::with_snapshot(Some(snapshot));
//!
//! // O(1) membership lookup
//! let groups = store.index().groups_of("T001");
//! ```

mod grant;
mod index;
mod snapshot;
mod store;

pub use grant::*;
pub use index::*;
pub use snapshot::*;
pub use store::*;
