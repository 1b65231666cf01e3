// Copyright 2025 Eric Jingryd (tidynest@proton.me)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Staged replacement of a database with its formatted version
//!
//! Formatting never edits the database in place.

use atomic_write_file::AtomicWriteFile;
use std::{fs, io::Write, path::Path, path::PathBuf};

use crate::config::{ConfigError, DatabaseFile};

/// Formatted database content waiting to replace the original.
///
/// # Lifecycle
///
/// 1. `stage()` - Writes the formatted text to `<stem>_format.txt`
/// 2. `commit()` - Backs up the original, then atomically replaces it
///
/// A transaction that is never committed leaves the staged file in place
/// and the original untouched. That is how runs with validation errors
/// still produce formatted output for inspection.
///
/// # Example
///
/// ```no_run
/// use controller_db_check::config::{DatabaseFile, FormatTransaction};
/// use std::path::PathBuf;
///
/// let database = DatabaseFile::new(PathBuf::from("gamecontrollerdb.txt"))?;
/// let tx = FormatTransaction::stage(&database, "# Game Controller DB\n")?;
///
/// let backup = tx.commit()?;
/// println!("Original saved to {}", backup.display());
/// # Ok::<(), controller_db_check::config::ConfigError>(())
/// ```
pub struct FormatTransaction<'a> {
    database: &'a DatabaseFile,
    staged_path: PathBuf,
    content: String,
}

impl<'a> FormatTransaction<'a> {
    /// Writes `content` to the staged path of `database`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::WriteFailed` if the staged file cannot be
    /// written. The database itself is never touched here.
    pub fn stage(database: &'a DatabaseFile, content: &str) -> Result<Self, ConfigError> {
        let staged_path = database.staged_path();
        write_atomically(&staged_path, content)?;

        Ok(Self {
            database,
            staged_path,
            content: content.to_string(),
        })
    }

    /// Path of the staged formatted file.
    pub fn staged_path(&self) -> &Path {
        &self.staged_path
    }

    /// Replaces the database with the staged content.
    ///
    /// The original is copied to `.bak.<file name>` first. The replacement
    /// is atomic (temp file + rename), so a failed write leaves the
    /// original in place. The staged file is removed afterwards.
    ///
    /// # Returns
    ///
    /// The path of the backup copy.
    pub fn commit(self) -> Result<PathBuf, ConfigError> {
        let backup_path = self.database.create_backup()?;

        write_atomically(self.database.path(), &self.content)?;

        fs::remove_file(&self.staged_path)?;

        Ok(backup_path)
    }
}

/// Where formatted output ended up after `write_formatted`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatOutcome {
    /// The database was replaced; the original is at `backup`
    Replaced { backup: PathBuf },
    /// The run had errors; output is at `staged`, the database is untouched
    Staged { staged: PathBuf },
}

/// Stages formatted output and replaces the database only for a clean run.
///
/// A run with record errors must never overwrite the database, but the
/// formatted text is still kept beside it for inspection.
pub fn write_formatted(
    database: &DatabaseFile,
    content: &str,
    success: bool,
) -> Result<FormatOutcome, ConfigError> {
    let tx = FormatTransaction::stage(database, content)?;

    if success {
        let backup = tx.commit()?;
        tracing::info!("Replaced {}", database.path().display());
        Ok(FormatOutcome::Replaced { backup })
    } else {
        let staged = tx.staged_path().to_path_buf();
        tracing::warn!("Database has errors, formatted output left at {}", staged.display());
        Ok(FormatOutcome::Staged { staged })
    }
}

fn write_atomically(path: &Path, content: &str) -> Result<(), ConfigError> {
    // Open file for atomic writing
    let mut file = AtomicWriteFile::options().open(path).map_err(|e| {
        ConfigError::WriteFailed(format!("Failed to open {} for atomic write: {}", path.display(), e))
    })?;

    file.write_all(content.as_bytes())
        .map_err(|e| ConfigError::WriteFailed(format!("Failed to write content: {}", e)))?;

    // Commit atomically
    file.commit()
        .map_err(|e| ConfigError::WriteFailed(format!("Failed to commit atomic write: {}", e)))?;

    Ok(())
}
