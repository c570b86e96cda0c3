//! Error types for sheetsync.
//!
//! Library crates use [`SheetSyncError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all sheetsync operations.
#[derive(Debug, thiserror::Error)]
pub enum SheetSyncError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Transport-level HTTP failure (connect, TLS, body read).
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Http { url: String, status: u16 },

    /// Response body or serialized data could not be decoded/encoded.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A configured sheet id is not part of the loaded document.
    #[error("sheet {sheet_id} not found in spreadsheet")]
    SheetNotFound { sheet_id: u64 },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SheetSyncError>;

impl SheetSyncError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = SheetSyncError::config("document_id must not be empty");
        assert_eq!(err.to_string(), "config error: document_id must not be empty");

        let err = SheetSyncError::Http {
            url: "https://img.example.com/a.png".into(),
            status: 404,
        };
        assert_eq!(err.to_string(), "HTTP 404 from https://img.example.com/a.png");

        let err = SheetSyncError::SheetNotFound { sheet_id: 178607707 };
        assert!(err.to_string().contains("178607707"));
    }

    #[test]
    fn io_error_keeps_path() {
        let err = SheetSyncError::io(
            "dist/link.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("dist/link.json"));
        assert!(msg.contains("denied"));
    }
}
