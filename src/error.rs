//! Unified error types for permview.
//!
//! The pivot core never fails: missing data shows up as empty results.
//! These errors cover the outer layer that locates, reads and parses the
//! snapshot file and loads configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for permview operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PermViewError {
    /// Errors during snapshot parsing
    #[error("Failed to parse snapshot: {context}")]
    Parse {
        context: String,
        #[source]
        source: ParseErrorKind,
    },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Specific parse error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ParseErrorKind {
    #[error("Invalid JSON structure: {0}")]
    InvalidJson(String),

    #[error("Document root must be a JSON object, found {0}")]
    UnexpectedRoot(String),

    #[error("Snapshot file is {size_mb} MB, exceeding the {limit_mb} MB limit")]
    TooLarge { size_mb: u64, limit_mb: u64 },
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for permview operations
pub type Result<T> = std::result::Result<T, PermViewError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl PermViewError {
    /// Create a parse error with context
    pub fn parse(context: impl Into<String>, source: ParseErrorKind) -> Self {
        Self::Parse {
            context: context.into(),
            source,
        }
    }

    /// Wrap a filesystem failure on `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: Some(path.into()),
            message: source.to_string(),
            source,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for PermViewError {
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: source.to_string(),
            source,
        }
    }
}

impl From<serde_json::Error> for PermViewError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(
            "JSON deserialization",
            ParseErrorKind::InvalidJson(err.to_string()),
        )
    }
}

// ============================================================================
// Context chaining
// ============================================================================

/// Prefix an error's message with what the caller was doing.
///
/// Repeated calls nest outward: `"loading: reading: not found"`.
pub trait ErrorContext<T> {
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Like [`context`](Self::context), building the text only on failure.
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<PermViewError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.into().prefixed(&context.into()))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| e.into().prefixed(&f().into()))
    }
}

impl PermViewError {
    fn prefixed(self, outer: &str) -> Self {
        let join = |inner: String| {
            if inner.is_empty() {
                outer.to_string()
            } else {
                format!("{outer}: {inner}")
            }
        };
        match self {
            Self::Parse { context, source } => Self::Parse {
                context: join(context),
                source,
            },
            Self::Io {
                path,
                message,
                source,
            } => Self::Io {
                path,
                message: join(message),
                source,
            },
            Self::Config(msg) => Self::Config(join(msg)),
            Self::Validation(msg) => Self::Validation(join(msg)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_error_converts_to_parse() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: PermViewError = json_err.into();
        assert!(err.to_string().starts_with("Failed to parse snapshot"));
        assert!(matches!(
            err,
            PermViewError::Parse {
                source: ParseErrorKind::InvalidJson(_),
                ..
            }
        ));
    }

    #[test]
    fn test_io_error_mentions_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = PermViewError::io("/data/UserPermissions.json", io_err);

        assert!(err.to_string().contains("/data/UserPermissions.json"));
    }

    #[test]
    fn test_context_chaining_multiple_levels() {
        fn inner() -> Result<()> {
            Err(PermViewError::parse(
                "base",
                ParseErrorKind::UnexpectedRoot("array".to_string()),
            ))
        }

        fn outer() -> Result<()> {
            inner().context("middle layer").context("outer layer")
        }

        match outer() {
            Err(PermViewError::Parse { context, .. }) => {
                assert_eq!(context, "outer layer: middle layer: base");
            }
            other => panic!("Expected Parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_with_context_skipped_on_success() {
        let mut built = false;
        let loaded: Result<usize> = Ok(3);
        let _ = loaded.with_context(|| {
            built = true;
            "loading"
        });
        assert!(!built);
    }

    #[test]
    fn test_validation_context() {
        let err: Result<()> = Err(PermViewError::validation("unknown user 'T999'"));
        match err.context("pivot") {
            Err(PermViewError::Validation(msg)) => assert_eq!(msg, "pivot: unknown user 'T999'"),
            other => panic!("expected a validation error, got {other:?}"),
        }
    }
}
