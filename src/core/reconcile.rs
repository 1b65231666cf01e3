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

//! Batch ingestion of mapping records into a `PlatformRegistry`
//!
//! The reconciler drives every pass over the data:
//! 1. `load_reference` - fill the authoritative set from the SDL header
//! 2. `ingest_str` / `ingest_line` - validate the database line by line
//! 3. `convert_guids` - migrate SDL 2.0.4 GUIDs in the working set
//! 4. `import_overrides` - merge another header into the working set
//!
//! Per-line problems never stop a pass. Errors are collected in a
//! `ReconcileReport` and mark the run failed; warnings are collected but
//! leave the run successful.
//!
//! # Example
//! ```
//! use controller_db_check::core::{ParseOptions, Reconciler, SdlVersion};
//!
//! let mut reconciler = Reconciler::new(ParseOptions::new(SdlVersion::V206));
//! reconciler.ingest_str("xinput,XInput Controller,a:b0,b:b1,platform:Windows,\n");
//!
//! assert!(reconciler.report().is_success());
//! assert_eq!(reconciler.registry().total_working(), 1);
//! ```

use std::fmt;
use thiserror::Error;

use crate::core::convert::convert_guid;
use crate::core::parser::{parse_mapping, parse_mapping_for_platform, ParseOptions};
use crate::core::registry::{Admission, PlatformRegistry, Rejection, Rekey};
use crate::core::serializer::serialize_mapping;
use crate::core::types::{Guid, Mapping, Platform};
use crate::core::validator::MappingError;

/// One record of a reference source whose platform is given externally
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReferenceRecord {
    pub platform: Platform,
    /// 1-based line in the reference source
    pub line: usize,
    /// Record text without a `platform:` field
    pub mapping: String,
}

/// A database line that was rejected
#[derive(Clone, Debug, Error, PartialEq)]
pub enum RecordError {
    #[error("Error at line #{line}: {source}")]
    Invalid {
        line: usize,
        text: String,
        #[source]
        source: MappingError,
    },

    #[error("Duplicate detected at line #{line}, previous mapping at line #{previous_line}")]
    DuplicateRecord {
        line: usize,
        previous_line: usize,
        text: String,
    },

    #[error("Cannot modify upstream SDL header mapping at line #{line} ({platform} {guid})")]
    IllegalOverride {
        line: usize,
        platform: Platform,
        guid: Guid,
        text: String,
    },
}

impl RecordError {
    pub fn line(&self) -> usize {
        match self {
            RecordError::Invalid { line, .. }
            | RecordError::DuplicateRecord { line, .. }
            | RecordError::IllegalOverride { line, .. } => *line,
        }
    }

    /// The offending record as it appeared in the input
    pub fn text(&self) -> &str {
        match self {
            RecordError::Invalid { text, .. }
            | RecordError::DuplicateRecord { text, .. }
            | RecordError::IllegalOverride { text, .. } => text,
        }
    }
}

/// Conditions that are reported but never fail a run
#[derive(Clone, Debug, Error, PartialEq)]
pub enum Warning {
    /// A converted GUID is already in use; the existing mapping was kept
    #[error(
        "Duplicate detected when converting GUID of '{name}' ({platform}) from {from} to {to}: \
         previous mapping '{existing_name}' kept, ignoring new mapping"
    )]
    MigrationCollision {
        platform: Platform,
        name: String,
        from: Guid,
        to: Guid,
        existing_name: String,
        /// The dropped mapping, serialised
        dropped: String,
    },

    /// A reference record failed to parse and was ignored
    #[error("Ignoring reference mapping at line #{line}: {source}")]
    ReferenceSkipped {
        line: usize,
        #[source]
        source: MappingError,
    },
}

/// A GUID rewritten by `convert_guids`
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Conversion {
    pub platform: Platform,
    pub name: String,
    pub from: Guid,
    pub to: Guid,
}

impl fmt::Display for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} : Converted {} GUID. From {} to {}",
            self.platform, self.name, self.from, self.to
        )
    }
}

/// Everything the reconciler found while processing
#[derive(Debug, Default)]
pub struct ReconcileReport {
    /// Rejected database lines, in input order
    pub errors: Vec<RecordError>,
    pub warnings: Vec<Warning>,
    pub conversions: Vec<Conversion>,
    /// Database lines accepted into the working set
    pub accepted: usize,
}

impl ReconcileReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no database line was rejected
    ///
    /// Warnings do not count. A failed report must block any write that
    /// replaces the database file.
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Drives parsing and registry updates for one run
#[derive(Debug)]
pub struct Reconciler {
    options: ParseOptions,
    registry: PlatformRegistry,
    report: ReconcileReport,
}

impl Reconciler {
    pub fn new(options: ParseOptions) -> Self {
        Self {
            options,
            registry: PlatformRegistry::new(),
            report: ReconcileReport::new(),
        }
    }

    pub fn options(&self) -> ParseOptions {
        self.options
    }

    pub fn registry(&self) -> &PlatformRegistry {
        &self.registry
    }

    pub fn report(&self) -> &ReconcileReport {
        &self.report
    }

    pub fn into_parts(self) -> (PlatformRegistry, ReconcileReport) {
        (self.registry, self.report)
    }

    /// Fills the authoritative set from reference records.
    ///
    /// Later records replace earlier ones with the same platform and GUID.
    /// Records that fail to parse become `ReferenceSkipped` warnings.
    /// Returns the number of records stored.
    pub fn load_reference<I>(&mut self, records: I) -> usize
    where
        I: IntoIterator<Item = ReferenceRecord>,
    {
        let mut loaded = 0;

        for record in records {
            if let Some(mapping) = self.parse_reference(&record) {
                tracing::debug!("{} : Importing {}", mapping.platform, mapping.name);
                self.registry.insert_authoritative(mapping);
                loaded += 1;
            }
        }

        loaded
    }

    /// Validates a whole database, one record per line.
    ///
    /// Blank lines and `#` comments are skipped. Line numbers start at 1.
    pub fn ingest_str(&mut self, content: &str) {
        for (index, raw) in content.lines().enumerate() {
            self.ingest_line(index + 1, raw);
        }
    }

    /// Validates one database line and admits it into the working set.
    ///
    /// Returns true when the mapping was stored. A rejected line is added
    /// to the report's errors and processing can simply continue.
    pub fn ingest_line(&mut self, line: usize, raw: &str) -> bool {
        if raw.trim().is_empty() || raw.starts_with('#') {
            return false;
        }

        match self.admit_line(line, raw) {
            Ok(admission) => {
                tracing::trace!(line, ?admission, "mapping accepted");
                self.report.accepted += 1;
                true
            }
            Err(error) => {
                tracing::debug!(line, "{}", error);
                self.report.errors.push(error);
                false
            }
        }
    }

    fn admit_line(&mut self, line: usize, raw: &str) -> Result<Admission, RecordError> {
        let text = raw.trim_end_matches(['\r', '\n']).to_string();

        let mapping = parse_mapping(raw, line, self.options).map_err(|source| {
            RecordError::Invalid {
                line,
                text: text.clone(),
                source,
            }
        })?;

        let platform = mapping.platform;
        let guid = mapping.guid.clone();

        self.registry.admit(mapping).map_err(|rejection| match rejection {
            Rejection::Duplicate { previous_line } => RecordError::DuplicateRecord {
                line,
                previous_line,
                text,
            },
            Rejection::IllegalOverride { .. } => RecordError::IllegalOverride {
                line,
                platform,
                guid,
                text,
            },
        })
    }

    /// Converts SDL 2.0.4 GUIDs in the working set to the current layout.
    ///
    /// Mappings are visited per platform in insertion order. A converted
    /// mapping is re-keyed under its new GUID; if that GUID is taken, the
    /// existing mapping is kept, the converted one is dropped and a
    /// `MigrationCollision` warning is recorded. Returns the number of
    /// mappings re-keyed.
    pub fn convert_guids(&mut self) -> usize {
        let mut converted = 0;

        for platform in Platform::ALL {
            let pending: Vec<(Guid, Guid, String)> = self
                .registry
                .working(platform)
                .filter_map(|m| {
                    convert_guid(platform, &m.guid).map(|new| (m.guid.clone(), new, m.name.clone()))
                })
                .collect();

            for (from, to, name) in pending {
                match self.registry.rekey(platform, &from, to.clone()) {
                    Rekey::Moved => {
                        let conversion = Conversion {
                            platform,
                            name,
                            from,
                            to,
                        };
                        tracing::info!("{}", conversion);
                        self.report.conversions.push(conversion);
                        converted += 1;
                    }
                    Rekey::Collided { dropped, existing } => {
                        let warning = Warning::MigrationCollision {
                            platform,
                            name,
                            from,
                            to,
                            existing_name: existing.name,
                            dropped: serialize_mapping(&dropped),
                        };
                        tracing::warn!("{}", warning);
                        self.report.warnings.push(warning);
                    }
                    Rekey::Missing => {}
                }
            }
        }

        converted
    }

    /// Merges reference records into the working set, overwriting.
    ///
    /// Used to pull an updated SDL header into the database after
    /// validation. No duplicate or override checks apply. Records that
    /// fail to parse become `ReferenceSkipped` warnings. Returns the number
    /// of records merged.
    pub fn import_overrides<I>(&mut self, records: I) -> usize
    where
        I: IntoIterator<Item = ReferenceRecord>,
    {
        let mut imported = 0;

        for record in records {
            if let Some(mapping) = self.parse_reference(&record) {
                tracing::info!("{} : Importing {}", mapping.platform, mapping.name);
                self.registry.overwrite_working(mapping);
                imported += 1;
            }
        }

        imported
    }

    /// Parses a reference record, turning failures into warnings
    fn parse_reference(&mut self, record: &ReferenceRecord) -> Option<Mapping> {
        let parsed = parse_mapping_for_platform(
            record.platform,
            &record.mapping,
            record.line,
            self.options.version,
        );

        match parsed {
            Ok(mapping) => Some(mapping),
            Err(source) => {
                tracing::warn!("Ignoring reference mapping at line #{}: {}", record.line, source);
                self.report.warnings.push(Warning::ReferenceSkipped {
                    line: record.line,
                    source,
                });
                None
            }
        }
    }
}
