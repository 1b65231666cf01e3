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

use super::super::*;
use crate::core::{ParseOptions, Platform, Reconciler, RecordError};
use std::fs;
use tempfile::TempDir;

const SAMPLE_HEADER: &str = r##"/* Default mappings */
static const char *s_ControllerMappings [] =
{
#if SDL_JOYSTICK_XINPUT
    "xinput,XInput Controller,a:b0,b:b1,",
#endif
#if SDL_JOYSTICK_DINPUT
    "030000005e0400008e02000000000000,X360 Controller,a:b0,b:b1,x:b2,",
#endif
#if defined(__MACOSX__)
    "030000005e0400008e02000001000000,X360 Controller,a:b1,b:b0,",
#endif
#if defined(__LINUX__)
    "03000000de280000ff11000001000000,Steam Virtual Gamepad,a:b0,",
    /* no mapping on this line */
#endif
#if defined(__ANDROID__)
    "05000000de2800000511000001000000,Steam Controller,a:b0,",
#endif
#if defined(SDL_JOYSTICK_MFI)
    "4d466947616d65706164010000000000,MFi Extended Gamepad,a:b0,",
#endif
    "ffffffffffffffffffffffffffffffff,Outside Any Region,a:b0,",
    NULL
};
"##;

// ============================================================================
// Scanning Tests
// ============================================================================

#[test]
fn test_scan_assigns_region_platforms() {
    let records = scan_header(SAMPLE_HEADER);
    let platforms: Vec<Platform> = records.iter().map(|r| r.platform).collect();

    assert_eq!(
        platforms,
        vec![
            Platform::Windows,
            Platform::Windows,
            Platform::MacOs,
            Platform::Linux,
            Platform::Android,
            Platform::Ios,
        ]
    );
}

#[test]
fn test_scan_extracts_quoted_text_and_lines() {
    let records = scan_header(SAMPLE_HEADER);

    assert_eq!(records[0].mapping, "xinput,XInput Controller,a:b0,b:b1,");
    assert_eq!(records[0].line, 5);
    assert_eq!(records[3].line, 14);
}

#[test]
fn test_scan_ignores_lines_outside_regions() {
    let records = scan_header(SAMPLE_HEADER);
    assert!(records.iter().all(|r| !r.mapping.contains("Outside Any Region")));
}

#[test]
fn test_scan_empty_header() {
    assert!(scan_header("").is_empty());
    assert!(scan_header("#if defined(__LINUX__)\n#endif\n").is_empty());
}

// ============================================================================
// Loading Tests
// ============================================================================

#[test]
fn test_load_missing_header() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("SDL_gamecontrollerdb2.0.6.h");

    assert!(matches!(load_header(&path), Err(ConfigError::NotFound(_))));
}

#[test]
fn test_loaded_header_guards_database() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("SDL_gamecontrollerdb2.0.6.h");
    fs::write(&path, SAMPLE_HEADER).unwrap();

    let mut reconciler = Reconciler::new(ParseOptions::default());
    let loaded = reconciler.load_reference(load_header(&path).unwrap());
    assert_eq!(loaded, 6);

    reconciler.ingest_str(
        "xinput,XInput Controller,b:b1,a:b0,platform:Windows,\n\
         03000000de280000ff11000001000000,Steam Virtual Gamepad,a:b1,platform:Linux,\n",
    );

    assert!(matches!(
        reconciler.report().errors.as_slice(),
        [RecordError::IllegalOverride { line: 2, .. }]
    ));
}
