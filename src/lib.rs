// Copyright 2025 bakri (tidynest@proton.me)
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

//! Game Controller Database Checker
//!
//! Validates, formats and migrates SDL game controller mapping databases
//! (`gamecontrollerdb.txt`).
//!
//! # Features
//!
//! - **Strict validation:** GUID syntax, control vocabulary, value syntax
//! - **Batch diagnostics:** every bad line is reported, not just the first
//! - **Upstream protection:** mappings shipped in SDL's header cannot be
//!   silently overridden
//! - **GUID migration:** SDL 2.0.4 Windows and macOS GUIDs to the 2.0.5 layout
//! - **Canonical formatting:** sorted, deduplicated, byte-stable output
//! - **Safe writes:** backup plus atomic replacement, only for clean runs
//!
//! # Architecture
//!
//! - **`core`:** Business logic (types, parser, registry, reconciliation,
//!   conversion, serialisation), free of I/O
//! - **`config`:** File operations (database, header scanning, backups,
//!   atomic replacement)
//!
//! # Examples
//!
//! ## Checking a database
//!
//! ```no_run
//! use controller_db_check::core::{ParseOptions, Reconciler, SdlVersion};
//!
//! let content = std::fs::read_to_string("gamecontrollerdb.txt")?;
//! let mut reconciler = Reconciler::new(ParseOptions::new(SdlVersion::V206));
//! reconciler.ingest_str(&content);
//!
//! for error in &reconciler.report().errors {
//!     println!("{}", error);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Formatting
//!
//! ```
//! use controller_db_check::core::{serializer::serialize_database, ParseOptions, Reconciler, SdlVersion};
//!
//! let mut reconciler = Reconciler::new(ParseOptions::new(SdlVersion::V206));
//! reconciler.ingest_str("xinput,XInput  Controller,b:b1,a:b0,platform:Windows,\n");
//!
//! let text = serialize_database(reconciler.registry(), SdlVersion::V206);
//! assert!(text.contains("xinput,XInput Controller,a:b0,b:b1,platform:Windows,\n"));
//! ```

pub mod config;
pub mod core;

// Re-export commonly used types for convenience
pub use core::{Control, Guid, Mapping, Platform, SdlVersion};
