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

//! src/core/types.rs
//!
//! Core type definitions for controller mapping databases
//!
//! This module defines the fundamental types used throughout the crate:
//! - `Platform`: The five platforms a mapping can target
//! - `Control`: The fixed vocabulary of 29 mappable controls
//! - `Guid`: A device signature, either `xinput` or 32 hex digits
//! - `Mapping`: One validated device-to-platform control mapping
//! - `SdlVersion`: The database format version
//!
//! Closed sets are enums so every match over a platform or control
//! name is checked for exhaustiveness.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Range;

/// Target platform of a mapping
///
/// Declaration order is the canonical output order of the database.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Platform {
    Windows,
    /// Spelled `Mac OS X` on disk
    MacOs,
    Linux,
    Android,
    Ios,
}

impl Platform {
    /// All platforms in canonical order
    pub const ALL: [Platform; 5] = [
        Platform::Windows,
        Platform::MacOs,
        Platform::Linux,
        Platform::Android,
        Platform::Ios,
    ];

    /// Name as written after `platform:` in the database
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Windows => "Windows",
            Platform::MacOs => "Mac OS X",
            Platform::Linux => "Linux",
            Platform::Android => "Android",
            Platform::Ios => "iOS",
        }
    }

    /// Looks up a platform by its database name (case-sensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == name)
    }

    /// Position in `Platform::ALL`
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A mappable control name
///
/// Variants are declared in ascending lexicographic order of their names,
/// so the derived `Ord` is the serialisation order.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Control {
    PosLeftX,
    PosLeftY,
    PosRightX,
    PosRightY,
    NegLeftX,
    NegLeftY,
    NegRightX,
    NegRightY,
    A,
    B,
    Back,
    DpDown,
    DpLeft,
    DpRight,
    DpUp,
    Guide,
    LeftShoulder,
    LeftStick,
    LeftTrigger,
    LeftX,
    LeftY,
    RightShoulder,
    RightStick,
    RightTrigger,
    RightX,
    RightY,
    Start,
    X,
    Y,
}

impl Control {
    /// The full vocabulary, in serialisation order
    pub const ALL: [Control; 29] = [
        Control::PosLeftX,
        Control::PosLeftY,
        Control::PosRightX,
        Control::PosRightY,
        Control::NegLeftX,
        Control::NegLeftY,
        Control::NegRightX,
        Control::NegRightY,
        Control::A,
        Control::B,
        Control::Back,
        Control::DpDown,
        Control::DpLeft,
        Control::DpRight,
        Control::DpUp,
        Control::Guide,
        Control::LeftShoulder,
        Control::LeftStick,
        Control::LeftTrigger,
        Control::LeftX,
        Control::LeftY,
        Control::RightShoulder,
        Control::RightStick,
        Control::RightTrigger,
        Control::RightX,
        Control::RightY,
        Control::Start,
        Control::X,
        Control::Y,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Control::PosLeftX => "+leftx",
            Control::PosLeftY => "+lefty",
            Control::PosRightX => "+rightx",
            Control::PosRightY => "+righty",
            Control::NegLeftX => "-leftx",
            Control::NegLeftY => "-lefty",
            Control::NegRightX => "-rightx",
            Control::NegRightY => "-righty",
            Control::A => "a",
            Control::B => "b",
            Control::Back => "back",
            Control::DpDown => "dpdown",
            Control::DpLeft => "dpleft",
            Control::DpRight => "dpright",
            Control::DpUp => "dpup",
            Control::Guide => "guide",
            Control::LeftShoulder => "leftshoulder",
            Control::LeftStick => "leftstick",
            Control::LeftTrigger => "lefttrigger",
            Control::LeftX => "leftx",
            Control::LeftY => "lefty",
            Control::RightShoulder => "rightshoulder",
            Control::RightStick => "rightstick",
            Control::RightTrigger => "righttrigger",
            Control::RightX => "rightx",
            Control::RightY => "righty",
            Control::Start => "start",
            Control::X => "x",
            Control::Y => "y",
        }
    }

    /// Looks up a control by its database name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hex range holding the legacy Windows sentinel
pub const SENTINEL_RANGE: Range<usize> = 20..32;
/// `PIDVID` in hex, written by SDL 2.0.4 DirectInput GUIDs
pub const WINDOWS_SENTINEL: &str = "504944564944";
/// Hex range that is all zeros in legacy macOS GUIDs
pub const MACOS_ZERO_RANGE: Range<usize> = 4..16;

/// Device signature of a mapping
///
/// Either the literal `xinput` or 32 hex digits. Construction does not
/// validate; `validator::validate_guid` is the gatekeeper.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Guid(String);

impl Guid {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Hex digits in `range`, or `None` for GUIDs too short to have them
    pub fn slice(&self, range: Range<usize>) -> Option<&str> {
        self.0.get(range)
    }

    /// True when the SDL 2.0.4 Windows sentinel sits at bytes [20,32)
    pub fn has_windows_sentinel(&self) -> bool {
        self.slice(SENTINEL_RANGE) == Some(WINDOWS_SENTINEL)
    }

    /// True when bytes [4,16) and [20,32) are all zero (SDL 2.0.4 macOS)
    pub fn has_legacy_macos_layout(&self) -> bool {
        let zeros = |range: Range<usize>| {
            self.slice(range)
                .is_some_and(|s| s.bytes().all(|b| b == b'0'))
        };
        zeros(MACOS_ZERO_RANGE) && zeros(SENTINEL_RANGE)
    }

    /// True for either pre-2.0.5 layout
    pub fn is_legacy(&self) -> bool {
        self.has_windows_sentinel() || self.has_legacy_macos_layout()
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One validated device-to-platform control mapping
///
/// Equality compares GUID, name, platform and controls. The source
/// line only feeds diagnostics and is ignored.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Mapping {
    pub guid: Guid,

    /// Display name, whitespace runs collapsed
    pub name: String,

    pub platform: Platform,

    /// Assigned controls; unassigned controls are absent
    pub controls: BTreeMap<Control, String>,

    /// 1-based line number in the originating file
    pub line: usize,
}

impl PartialEq for Mapping {
    fn eq(&self, other: &Self) -> bool {
        self.guid == other.guid
            && self.name == other.name
            && self.platform == other.platform
            && self.controls == other.controls
    }
}

impl Eq for Mapping {}

/// Database format version
///
/// Only the current version rejects legacy GUIDs; only 2.0.4 databases
/// may have their missing platforms inferred.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum SdlVersion {
    V204,
    V205,
    #[default]
    V206,
}

impl SdlVersion {
    pub fn as_str(self) -> &'static str {
        match self {
            SdlVersion::V204 => "2.0.4",
            SdlVersion::V205 => "2.0.5",
            SdlVersion::V206 => "2.0.6",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "2.0.4" => Some(SdlVersion::V204),
            "2.0.5" => Some(SdlVersion::V205),
            "2.0.6" => Some(SdlVersion::V206),
            _ => None,
        }
    }

    /// Guesses the version from a database file name
    ///
    /// `gamecontrollerdb_204.txt` → 2.0.4, `..._205.txt` → 2.0.5,
    /// anything else is the current format.
    pub fn from_file_name(file_name: &str) -> Self {
        if file_name.contains("204") {
            SdlVersion::V204
        } else if file_name.contains("205") {
            SdlVersion::V205
        } else {
            SdlVersion::V206
        }
    }

    /// Whether legacy GUIDs are rejected at parse time
    pub fn rejects_legacy_guids(self) -> bool {
        self == SdlVersion::V206
    }

    /// Whether a missing `platform` field may be inferred from the GUID
    pub fn allows_platform_inference(self) -> bool {
        self == SdlVersion::V204
    }
}

impl fmt::Display for SdlVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_display() {
        assert_eq!(format!("{}", Platform::MacOs), "Mac OS X");
        assert_eq!(format!("{}", Platform::Ios), "iOS");
    }

    #[test]
    fn test_control_order_matches_names() {
        let names: Vec<&str> = Control::ALL.iter().map(|c| c.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_guid_slice_short() {
        let guid = Guid::new("xinput");
        assert_eq!(guid.slice(SENTINEL_RANGE), None);
        assert!(!guid.is_legacy());
    }
}
