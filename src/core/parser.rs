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

//! src/core/parser.rs
//!
//! Mapping record parser
//!
//! Turns one raw database line into a validated `Mapping`:
//! - Quote-aware comma splitting (CSV style, leading spaces skipped)
//! - GUID validation, including the legacy layout check
//! - Name normalisation
//! - Platform lookup, or inference for SDL 2.0.4 databases
//! - Control assignments, collecting every duplicate before failing
//!
//! # Architecture
//! Field tokenisation uses nom combinators. Field semantics are checked
//! by the whitelist rules in `validator.rs`. Nothing is returned on
//! failure: a record is either complete or rejected with a `MappingError`.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_till},
    character::complete::{char, none_of, space0},
    combinator::{map, value},
    multi::many0,
    sequence::{delimited, preceded},
    IResult, Parser,
};
use std::collections::BTreeMap;

use crate::core::types::{Control, Guid, Mapping, Platform, SdlVersion};
use crate::core::validator::{
    collapse_whitespace, validate_control_value, validate_guid, DuplicateAssignment, MappingError,
};

/// Context a record is parsed in
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ParseOptions {
    /// Format version of the database the record came from
    pub version: SdlVersion,

    /// Derive a missing `platform` field from the GUID layout
    pub infer_platform: bool,
}

impl ParseOptions {
    pub fn new(version: SdlVersion) -> Self {
        Self {
            version,
            infer_platform: false,
        }
    }

    pub fn with_platform_inference(mut self, enabled: bool) -> Self {
        self.infer_platform = enabled;
        self
    }
}

/// Parse a double-quoted field
///
/// `""` inside the quotes is a literal quote. Any text between the closing
/// quote and the next comma is appended, as CSV readers do.
pub fn parse_quoted_field(input: &str) -> IResult<&str, String> {
    let (input, body) = delimited(
        char('"'),
        many0(alt((value('"', tag("\"\"")), none_of("\"")))),
        char('"'),
    )
    .parse(input)?;
    let (input, tail) = take_till(|c: char| c == ',')(input)?;

    let mut field: String = body.into_iter().collect();
    field.push_str(tail);

    Ok((input, field))
}

/// Parse one field, skipping leading spaces
pub fn parse_field(input: &str) -> IResult<&str, String> {
    preceded(
        space0,
        alt((
            parse_quoted_field,
            map(take_till(|c: char| c == ','), |s: &str| s.to_string()),
        )),
    )
    .parse(input)
}

/// Split a record into its non-empty fields
///
/// # Example
/// ```ignore
/// let fields = split_fields(r#"xinput,"Pad, Deluxe",a:b0,"#);
/// assert_eq!(fields, vec!["xinput", "Pad, Deluxe", "a:b0"]);
/// ```
pub fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut rest = line;

    loop {
        match parse_field(rest) {
            Ok((remaining, field)) => {
                if !field.is_empty() {
                    fields.push(field);
                }
                rest = remaining;
            }
            Err(_) => break,
        }

        match rest.strip_prefix(',') {
            Some(remaining) => rest = remaining,
            None => break,
        }
    }

    fields
}

/// Parse a complete mapping record
///
/// # Arguments
/// * `raw` - One database line, trailing newline allowed
/// * `line` - 1-based line number kept on the record for diagnostics
/// * `options` - Format version and platform inference switch
///
/// # Example
/// ```ignore
/// let mapping = parse_mapping(
///     "03000000de280000ff11000001000000,Steam Virtual Gamepad,a:b0,platform:Linux,",
///     1,
///     ParseOptions::default(),
/// )?;
/// assert_eq!(mapping.platform, Platform::Linux);
/// ```
pub fn parse_mapping(raw: &str, line: usize, options: ParseOptions) -> Result<Mapping, MappingError> {
    let text = raw.trim_end_matches(['\r', '\n']);
    let mut fields = split_fields(text).into_iter();

    let guid_field = fields
        .next()
        .ok_or_else(|| MappingError::MalformedIdentifier(String::new()))?;
    let guid = validate_guid(&guid_field, options.version)?;

    let name = fields
        .next()
        .map(|n| collapse_whitespace(&n))
        .ok_or(MappingError::MissingName)?;

    let mut rest: Vec<String> = fields.collect();
    let platform = take_platform(&mut rest, &guid, &name, options)?;
    let controls = parse_controls(&rest)?;

    Ok(Mapping {
        guid,
        name,
        platform,
        controls,
        line,
    })
}

/// Parse a record whose platform comes from its surroundings
///
/// Reference headers group records by platform instead of carrying a
/// `platform:` field, so the field is appended before parsing.
pub fn parse_mapping_for_platform(
    platform: Platform,
    raw: &str,
    line: usize,
    version: SdlVersion,
) -> Result<Mapping, MappingError> {
    let mut record = raw.trim_end_matches(['\r', '\n']).to_string();
    if !record.is_empty() && !record.ends_with(',') {
        record.push(',');
    }
    record.push_str(&format!("platform:{},", platform));

    parse_mapping(&record, line, ParseOptions::new(version))
}

/// Remove the first `platform:` field and resolve it
fn take_platform(
    fields: &mut Vec<String>,
    guid: &Guid,
    name: &str,
    options: ParseOptions,
) -> Result<Platform, MappingError> {
    let position = fields
        .iter()
        .position(|f| f.split_once(':').is_some_and(|(key, _)| key == "platform"));

    match position {
        Some(index) => {
            let field = fields.remove(index);
            let value = field.split_once(':').map(|(_, v)| v).unwrap_or_default();
            Platform::from_name(value).ok_or_else(|| MappingError::InvalidPlatform(value.to_string()))
        }
        None if options.infer_platform => {
            let platform = infer_platform(guid)?;
            tracing::info!("Adding 'platform:{}' to {}", platform, name);
            Ok(platform)
        }
        None => Err(MappingError::MissingPlatform),
    }
}

/// Guess the platform of an SDL 2.0.4 record from its GUID layout
///
/// The Windows sentinel means Windows; the zeroed macOS layout means
/// Mac OS X. Any other GUID is ambiguous.
pub fn infer_platform(guid: &Guid) -> Result<Platform, MappingError> {
    if guid.has_windows_sentinel() {
        Ok(Platform::Windows)
    } else if guid.has_legacy_macos_layout() {
        Ok(Platform::MacOs)
    } else {
        Err(MappingError::AmbiguousPlatformInference(guid.to_string()))
    }
}

/// Parse control assignments
///
/// Unknown keys and invalid values fail immediately. Repeated keys are
/// gathered over the whole record and reported together at the end.
pub fn parse_controls(fields: &[String]) -> Result<BTreeMap<Control, String>, MappingError> {
    let mut controls: BTreeMap<Control, String> = BTreeMap::new();
    let mut duplicates = Vec::new();

    for field in fields {
        let (key, value) = field
            .split_once(':')
            .ok_or_else(|| MappingError::MalformedField(field.clone()))?;

        let control =
            Control::from_name(key).ok_or_else(|| MappingError::UnrecognizedKey(key.to_string()))?;

        if let Some(previous) = controls.get(&control) {
            duplicates.push(DuplicateAssignment {
                key: key.to_string(),
                value: value.to_string(),
                previous: previous.clone(),
            });
            continue;
        }

        validate_control_value(key, value)?;
        controls.insert(control, value.to_string());
    }

    if duplicates.is_empty() {
        Ok(controls)
    } else {
        Err(MappingError::DuplicateKey(duplicates))
    }
}
