//! Snapshot document parsing.
//!
//! Converts the exported permissions JSON into a [`Snapshot`]. Reading the
//! file is the caller's concern; these helpers exist for the command-line
//! frontend and for tests.
//!
//! ## Usage
//!
//! ```no_run
//! use permview::parsers::parse_snapshot;
//! use std::path::Path;
//!
//! let snapshot = parse_snapshot(Path::new("UserPermissions.json")).unwrap();
//! println!("{} groups", snapshot.groups.len());
//! ```

mod snapshot;

pub use snapshot::{parse_snapshot_str, parse_snapshot_value};

use crate::error::{ErrorContext, ParseErrorKind, PermViewError, Result};
use crate::model::Snapshot;
use std::path::Path;

/// Maximum snapshot file size (256 MB).
const MAX_SNAPSHOT_FILE_SIZE: u64 = 256 * 1024 * 1024;

/// Read and parse a snapshot file.
///
/// Returns an error if the file is missing, unreadable, larger than
/// [`MAX_SNAPSHOT_FILE_SIZE`], or not a JSON object.
pub fn parse_snapshot(path: &Path) -> Result<Snapshot> {
    let metadata = std::fs::metadata(path).map_err(|e| PermViewError::io(path, e))?;
    if metadata.len() > MAX_SNAPSHOT_FILE_SIZE {
        return Err(PermViewError::parse(
            format!("at {}", path.display()),
            ParseErrorKind::TooLarge {
                size_mb: metadata.len() / (1024 * 1024),
                limit_mb: MAX_SNAPSHOT_FILE_SIZE / (1024 * 1024),
            },
        ));
    }
    let content = std::fs::read_to_string(path).map_err(|e| PermViewError::io(path, e))?;
    parse_snapshot_str(&content).with_context(|| format!("at {}", path.display()))
}
