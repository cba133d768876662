//! Error types for uwu-markdown
//!
//! Only genuine failures live here. Degraded states (a missing parser or
//! highlighter, a stale block id, an unrecognised fence) are modelled as
//! ordinary values elsewhere and never surface as errors.

use std::path::PathBuf;
use thiserror::Error;

/// Main application error type encompassing all error categories
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Clipboard errors
    #[error(transparent)]
    Clipboard(#[from] ClipboardError),

    /// Key-value storage errors
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Export errors
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Requested code block does not exist in the rendered preview
    #[error("No code block {index} (document has {count})")]
    NoSuchBlock { index: usize, count: usize },
}

/// Configuration related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error loading configuration file
    #[error("Could not load configuration: {path}")]
    LoadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error saving configuration
    #[error("Could not save configuration: {0}")]
    SaveError(String),

    /// Error parsing configuration
    #[error("Invalid configuration format: {0}")]
    ParseError(String),

    /// Invalid configuration value
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    /// Configuration directory error
    #[error("Could not access configuration directory")]
    DirectoryError,
}

/// Clipboard related errors
#[derive(Error, Debug, Clone)]
pub enum ClipboardError {
    /// Could not access clipboard
    #[error("Could not access clipboard: {0}")]
    AccessDenied(String),

    /// Error setting clipboard content
    #[error("Could not write to clipboard: {0}")]
    WriteError(String),

    /// The blocking clipboard task did not complete
    #[error("Clipboard task was interrupted")]
    Interrupted,
}

/// Key-value storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    /// No data directory available on this platform
    #[error("Could not determine data directory")]
    NoDataDir,

    /// Error reading the backing file
    #[error("Could not read storage file: {path}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error writing the backing file
    #[error("Could not write storage file: {path}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Backing file is not a valid key-value map
    #[error("Storage file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Export related errors
#[derive(Error, Debug)]
pub enum ExportError {
    /// I/O error while writing the document
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for operations that can fail with AppError
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Result type alias for clipboard operations
pub type ClipboardResult<T> = Result<T, ClipboardError>;

impl ClipboardError {
    /// Create a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            ClipboardError::AccessDenied(_) => {
                "Could not access the clipboard. Another application may be using it.".to_string()
            }
            ClipboardError::Interrupted => "Copying was interrupted.".to_string(),
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_display() {
        let err = StorageError::ReadError {
            path: PathBuf::from("/tmp/store.json"),
            source: std::io::Error::new(std::io::ErrorKind::Other, "boom"),
        };
        assert!(err.to_string().contains("/tmp/store.json"));
    }

    #[test]
    fn test_clipboard_user_message() {
        let err = ClipboardError::AccessDenied("wayland".to_string());
        assert!(err.user_message().contains("clipboard"));
    }

    #[test]
    fn test_app_error_from_config_error() {
        let err: AppError = ConfigError::DirectoryError.into();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_no_such_block_display() {
        let err = AppError::NoSuchBlock { index: 3, count: 1 };
        assert_eq!(err.to_string(), "No code block 3 (document has 1)");
    }
}
