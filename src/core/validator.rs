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

//! Field-level validation rules for mapping records
//!
//! Every rule is whitelist based: a GUID is either `xinput` or exactly 32
//! hex digits, and a control value must match the pattern belonging to
//! its prefix. Anything else is rejected with a `MappingError`.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

use crate::core::types::{Guid, SdlVersion};

/// Reasons a single record fails to parse
#[derive(Clone, Debug, Error, PartialEq)]
pub enum MappingError {
    #[error("GUID malformed: '{0}'")]
    MalformedIdentifier(String),

    /// The GUID still uses the SDL 2.0.4 layout
    #[error("GUID '{0}' is in SDL 2.0.4 format, please update your mapping software")]
    LegacyIdentifierFormat(String),

    #[error("Mapping has no name field")]
    MissingName,

    #[error("Required 'platform' field not found")]
    MissingPlatform,

    #[error("Invalid platform '{0}'")]
    InvalidPlatform(String),

    #[error("Cannot determine platform confidently from GUID '{0}'")]
    AmbiguousPlatformInference(String),

    /// A field after the name that is not `key:value`
    #[error("Malformed field '{0}': expected key:value")]
    MalformedField(String),

    #[error("Unrecognized key '{0}'")]
    UnrecognizedKey(String),

    /// Every repeated assignment found in one record
    #[error("Duplicate keys detected: {}", format_duplicates(.0))]
    DuplicateKey(Vec<DuplicateAssignment>),

    #[error("Invalid value '{value}' for key '{key}'")]
    InvalidControlValue { key: String, value: String },
}

/// A control assigned again after its first assignment
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DuplicateAssignment {
    pub key: String,
    pub value: String,
    /// The value the key already held
    pub previous: String,
}

impl fmt::Display for DuplicateAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} (was {}:{})", self.key, self.value, self.key, self.previous)
    }
}

fn format_duplicates(duplicates: &[DuplicateAssignment]) -> String {
    duplicates
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

static GUID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(xinput|[0-9a-fA-F]{32})$").expect("GUID pattern should be valid regex")
});

// Axis index, optionally inverted
static AXIS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+~?$").expect("axis pattern should be valid regex"));

static BUTTON_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("button pattern should be valid regex"));

// Hat index and a single direction bit
static HAT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]+\.(1|2|4|8)$").expect("hat pattern should be valid regex")
});

/// Value prefixes paired with the rule for the remainder
fn value_rules() -> [(&'static str, &'static LazyLock<Regex>); 5] {
    [
        ("+a", &AXIS_REGEX),
        ("-a", &AXIS_REGEX),
        ("a", &AXIS_REGEX),
        ("b", &BUTTON_REGEX),
        ("h", &HAT_REGEX),
    ]
}

/// Validates the GUID syntax and, for the current format, its layout
pub fn validate_guid(raw: &str, version: SdlVersion) -> Result<Guid, MappingError> {
    if !GUID_REGEX.is_match(raw) {
        return Err(MappingError::MalformedIdentifier(raw.to_string()));
    }

    let guid = Guid::new(raw);
    if version.rejects_legacy_guids() && guid.is_legacy() {
        return Err(MappingError::LegacyIdentifierFormat(raw.to_string()));
    }

    Ok(guid)
}

/// Validates a control value such as `b3`, `-a1~` or `h0.4`
pub fn validate_control_value(key: &str, value: &str) -> Result<(), MappingError> {
    let valid = value_rules()
        .into_iter()
        .find_map(|(prefix, rule)| value.strip_prefix(prefix).map(|rest| rule.is_match(rest)))
        .unwrap_or(false);

    if valid {
        Ok(())
    } else {
        Err(MappingError::InvalidControlValue {
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}

/// Collapses every run of whitespace inside a name to a single space
pub fn collapse_whitespace(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_run = false;

    for ch in name.chars() {
        if ch.is_whitespace() {
            if !in_run {
                out.push(' ');
            }
            in_run = true;
        } else {
            out.push(ch);
            in_run = false;
        }
    }

    out
}
