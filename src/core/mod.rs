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

//! src/core/mod.rs
//!
//! Core business logic module
//!
//! This module contains the record model and every rule applied to it:
//! - Type definitions for platforms, controls, GUIDs and mappings
//! - Record parsing and field validation
//! - GUID conversion from the SDL 2.0.4 layouts
//! - Per-platform working/authoritative stores
//! - Batch reconciliation with error accumulation
//! - Canonical serialisation
//!
//! Nothing here touches the filesystem; all business logic is isolated
//! from I/O to enable comprehensive unit testing.

pub mod convert;
pub mod parser;
pub mod reconcile;
pub mod registry;
pub mod serializer;
pub mod types;
pub mod validator;

pub use parser::{parse_mapping, ParseOptions};
pub use reconcile::{ReconcileReport, Reconciler, RecordError, ReferenceRecord, Warning};
pub use registry::PlatformRegistry;
pub use types::*;
pub use validator::{DuplicateAssignment, MappingError};

#[cfg(test)]
mod tests;
