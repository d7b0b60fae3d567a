//! Permission flag values.
//!
//! Flag values arrive as loosely typed JSON (`"1"`, `"0"`, numbers, `null`,
//! free text). They are resolved exactly once, at parse time, into a
//! [`GrantFlag`] so that queries never look at the raw text again.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Resolved state of a single permission code on an application record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrantFlag {
    /// Value parsed as the integer 1
    Granted,
    /// Value parsed as an integer other than 1
    Revoked,
    /// Value was null, blank, non-numeric or of an unexpected JSON type
    Invalid,
}

impl GrantFlag {
    /// Resolve a flag from its textual form.
    ///
    /// Granted iff the trimmed text parses as the integer `1`.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        match text.trim().parse::<i64>() {
            Ok(1) => Self::Granted,
            Ok(_) => Self::Revoked,
            Err(_) => Self::Invalid,
        }
    }

    /// Resolve a flag from a raw JSON value.
    ///
    /// Numbers use their canonical text (`1` is granted, `1.0` is not);
    /// booleans, arrays, objects and `null` are invalid.
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::String(s) => Self::from_text(s),
            Value::Number(n) => Self::from_text(&n.to_string()),
            _ => Self::Invalid,
        }
    }

    /// Whether this flag grants the permission.
    #[must_use]
    pub const fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }
}
