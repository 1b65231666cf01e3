//! Database file management with backup and atomic replacement.
//!
//! This module owns everything that touches the filesystem:
//!
//! - **Reading**: the database and its reference header
//! - **Version detection**: the SDL format version from the file name
//! - **Formatting**: formatted output is staged beside the database and
//!   only replaces it through a `FormatTransaction`
//! - **Backups**: the original is copied to `.bak.<file name>` first
//!
//! # Example
//!
//! ```no_run
//! use controller_db_check::config::{DatabaseFile, FormatTransaction};
//!
//! let database = DatabaseFile::new("gamecontrollerdb.txt".into())?;
//! let content = database.read()?;
//!
//! // Stage formatted output, then replace the database
//! FormatTransaction::stage(&database, &content)?.commit()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod header;
pub mod transaction;

use std::fs;
use std::path::{Path, PathBuf};

pub use error::ConfigError;
pub use header::{load_header, scan_header};
pub use transaction::{write_formatted, FormatOutcome, FormatTransaction};

use crate::core::SdlVersion;

/// Directory holding the reference headers, relative to the database
pub const HEADER_DIR: &str = "data";

/// A mapping database on disk.
#[derive(Debug)]
pub struct DatabaseFile {
    /// Path to the database file.
    path: PathBuf,
}

impl DatabaseFile {
    /// Creates a DatabaseFile for an existing database.
    ///
    /// If the database is a symlink, a warning is logged but the
    /// operation continues.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if the file doesn't exist.
    pub fn new(path: PathBuf) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path));
        }

        if path.read_link().is_ok() {
            tracing::warn!("Database file is a symlink: {}", path.display());
        }

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the current database content.
    pub fn read(&self) -> Result<String, ConfigError> {
        Ok(fs::read_to_string(&self.path)?)
    }

    fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    fn directory(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }

    /// SDL format version implied by the file name.
    ///
    /// `gamecontrollerdb_204.txt` is 2.0.4, `gamecontrollerdb_205.txt` is
    /// 2.0.5, anything else is the current format.
    pub fn version(&self) -> SdlVersion {
        SdlVersion::from_file_name(&self.file_name())
    }

    /// Reference header shipped next to the database for `version`.
    ///
    /// e.g. `db/gamecontrollerdb.txt` → `db/data/SDL_gamecontrollerdb2.0.6.h`
    pub fn default_header_path(&self, version: SdlVersion) -> PathBuf {
        self.directory()
            .join(HEADER_DIR)
            .join(format!("SDL_gamecontrollerdb{}.h", version))
    }

    /// Where formatted output is staged: `<stem>_format.txt`.
    pub fn staged_path(&self) -> PathBuf {
        let stem = self
            .path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        self.directory().join(format!("{}_format.txt", stem))
    }

    /// Where the original is copied before replacement: `.bak.<file name>`.
    pub fn backup_path(&self) -> PathBuf {
        self.directory().join(format!(".bak.{}", self.file_name()))
    }

    /// Copies the current database to its backup path.
    ///
    /// An older backup is overwritten.
    pub(crate) fn create_backup(&self) -> Result<PathBuf, ConfigError> {
        let backup_path = self.backup_path();

        fs::copy(&self.path, &backup_path).map_err(|e| {
            ConfigError::BackupFailed(format!("{} → {}: {}", self.path.display(), backup_path.display(), e))
        })?;

        Ok(backup_path)
    }
}

#[cfg(test)]
mod tests;
