use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or replacing database files.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Database or header file does not exist.
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    /// Failed to create backup file.
    #[error("Failed to create backup: {0}")]
    BackupFailed(String),
    /// Atomic write operation failed.
    #[error("Atomic write failed: {0}")]
    WriteFailed(String),
    /// Generic I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
