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

//! Reader for SDL's built-in mapping header (`SDL_gamecontrollerdb.h`)
//!
//! The header is C source: mapping strings sit inside platform-specific
//! preprocessor regions, one string literal per line.
//!
//! ```c
//! #if defined(__LINUX__)
//!     "03000000de280000ff11000001000000,Steam Virtual Gamepad,a:b0,...",
//! #endif
//! ```
//!
//! This module only tracks the current region and pulls out the quoted
//! text. The records it yields are parsed by the core like any other.

use std::fs;
use std::path::Path;

use crate::config::ConfigError;
use crate::core::{Platform, ReferenceRecord};

/// Preprocessor lines that open a platform region
///
/// XInput and DirectInput both belong to Windows.
const REGION_MARKERS: [(&str, Platform); 6] = [
    ("#if SDL_JOYSTICK_XINPUT", Platform::Windows),
    ("#if SDL_JOYSTICK_DINPUT", Platform::Windows),
    ("#if defined(__MACOSX__)", Platform::MacOs),
    ("#if defined(__LINUX__)", Platform::Linux),
    ("#if defined(__ANDROID__)", Platform::Android),
    ("#if defined(SDL_JOYSTICK_MFI)", Platform::Ios),
];

const REGION_END: &str = "#endif";

/// Extract mapping records from header source
///
/// Lines outside a platform region, and region lines without a string
/// literal, are skipped.
pub fn scan_header(content: &str) -> Vec<ReferenceRecord> {
    let mut records = Vec::new();
    let mut current: Option<Platform> = None;

    for (index, line) in content.lines().enumerate() {
        if let Some((_, platform)) = REGION_MARKERS.iter().find(|(marker, _)| line.contains(marker)) {
            current = Some(*platform);
            continue;
        }

        if line.contains(REGION_END) {
            current = None;
            continue;
        }

        let Some(platform) = current else {
            continue;
        };

        if let Some(mapping) = quoted_text(line) {
            records.push(ReferenceRecord {
                platform,
                line: index + 1,
                mapping: mapping.to_string(),
            });
        }
    }

    records
}

/// Text between the first two double quotes on a line
fn quoted_text(line: &str) -> Option<&str> {
    let start = line.find('"')? + 1;
    let len = line[start..].find('"')?;
    Some(&line[start..start + len])
}

/// Read and scan a header file
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if the header does not exist and
/// `ConfigError::Io` if it cannot be read.
pub fn load_header(path: &Path) -> Result<Vec<ReferenceRecord>, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let content = fs::read_to_string(path)?;
    Ok(scan_header(&content))
}
