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

//! GUID conversion from the SDL 2.0.4 layouts to the 2.0.5+ layout
//!
//! SDL 2.0.4 wrote Windows DirectInput GUIDs as the raw `PIDVID` product
//! GUID and macOS GUIDs as vendor/product with zero padding. SDL 2.0.5
//! moved every platform to one layout: bus type, vendor, product, version.
//!
//! Hex digit ranges moved by the conversion:
//! - Windows: vendor [0,4) to [8,12), product [4,8) to [16,20), [12,16)
//!   kept, sentinel [20,32) zeroed
//! - macOS: vendor [0,4) to [8,12), [12,20) kept, [20,32) already zero
//!
//! Both gain the `03000000` bus type at [0,8).
//!
//! Conversion is a pure function. Re-keying the registry is the
//! reconciler's job.

use std::ops::Range;

use crate::core::types::{Guid, Platform};

/// USB bus type, little-endian, as written at the head of current GUIDs
pub const BUS_TYPE_PREFIX: &[u8; 8] = b"03000000";

const GUID_LEN: usize = 32;

const BUS_TYPE: Range<usize> = 0..8;
const LEGACY_VENDOR: Range<usize> = 0..4;
const LEGACY_WINDOWS_PRODUCT: Range<usize> = 4..8;
const VENDOR: Range<usize> = 8..12;
const MIDDLE: Range<usize> = 12..16;
const PRODUCT: Range<usize> = 16..20;

/// Rewrite a legacy GUID into the current layout
///
/// Returns `None` when the GUID is not in a legacy layout for its
/// platform, including every Linux, Android and iOS GUID. That is not an
/// error; the mapping simply needs no conversion.
///
/// # Example
/// ```
/// use controller_db_check::core::convert::convert_guid;
/// use controller_db_check::core::{Guid, Platform};
///
/// let legacy = Guid::new("6d0419c2000000000000504944564944");
/// let current = convert_guid(Platform::Windows, &legacy).unwrap();
/// assert_eq!(current.as_str(), "030000006d04000019c2000000000000");
/// ```
pub fn convert_guid(platform: Platform, guid: &Guid) -> Option<Guid> {
    let legacy: &[u8; GUID_LEN] = guid.as_str().as_bytes().try_into().ok()?;

    let converted = match platform {
        Platform::Windows if guid.has_windows_sentinel() => {
            rebuild(legacy, LEGACY_WINDOWS_PRODUCT)
        }
        Platform::MacOs if guid.has_legacy_macos_layout() => rebuild(legacy, PRODUCT),
        Platform::Windows | Platform::MacOs => return None,
        Platform::Linux | Platform::Android | Platform::Ios => return None,
    };

    // Built from ASCII hex and ASCII constants only
    let text = String::from_utf8(converted.to_vec()).ok()?;
    Some(Guid::new(text.to_ascii_lowercase()))
}

/// Lay out bus type, vendor, middle and product; the tail stays zero
fn rebuild(legacy: &[u8; GUID_LEN], product: Range<usize>) -> [u8; GUID_LEN] {
    let mut out = [b'0'; GUID_LEN];
    out[BUS_TYPE].copy_from_slice(BUS_TYPE_PREFIX);
    out[VENDOR].copy_from_slice(&legacy[LEGACY_VENDOR]);
    out[MIDDLE].copy_from_slice(&legacy[MIDDLE]);
    out[PRODUCT].copy_from_slice(&legacy[product]);
    out
}
