//! GUID conversion tests

use super::{LEGACY_MACOS_GUID, LEGACY_WINDOWS_GUID, LINUX_GUID, WINDOWS_GUID};
use crate::core::{
    convert::convert_guid,
    types::{Guid, Platform},
};

#[test]
fn test_convert_windows_guid() {
    let converted = convert_guid(Platform::Windows, &Guid::new(LEGACY_WINDOWS_GUID)).unwrap();
    assert_eq!(converted.as_str(), "030000006d04000019c2000000000000");
    assert!(!converted.is_legacy());
}

#[test]
fn test_convert_macos_guid() {
    let converted = convert_guid(Platform::MacOs, &Guid::new(LEGACY_MACOS_GUID)).unwrap();
    assert_eq!(converted.as_str(), "030000005e040000dd02000000000000");
    assert!(!converted.is_legacy());
}

#[test]
fn test_converted_guid_is_lowercase() {
    let converted = convert_guid(Platform::Windows, &Guid::new("6D0419C2000000000000504944564944")).unwrap();
    assert_eq!(converted.as_str(), "030000006d04000019c2000000000000");
}

#[test]
fn test_current_guids_unchanged() {
    assert_eq!(convert_guid(Platform::Windows, &Guid::new(WINDOWS_GUID)), None);
    assert_eq!(convert_guid(Platform::MacOs, &Guid::new(WINDOWS_GUID)), None);
    assert_eq!(convert_guid(Platform::Windows, &Guid::new("xinput")), None);
}

#[test]
fn test_other_platforms_never_converted() {
    for platform in [Platform::Linux, Platform::Android, Platform::Ios] {
        assert_eq!(convert_guid(platform, &Guid::new(LEGACY_WINDOWS_GUID)), None);
        assert_eq!(convert_guid(platform, &Guid::new(LEGACY_MACOS_GUID)), None);
        assert_eq!(convert_guid(platform, &Guid::new(LINUX_GUID)), None);
    }
}

#[test]
fn test_layout_must_match_platform() {
    // A macOS-shaped GUID on Windows lacks the sentinel
    assert_eq!(convert_guid(Platform::Windows, &Guid::new(LEGACY_MACOS_GUID)), None);
    assert_eq!(convert_guid(Platform::MacOs, &Guid::new(LEGACY_WINDOWS_GUID)), None);
}

#[test]
fn test_conversion_is_idempotent() {
    let once = convert_guid(Platform::Windows, &Guid::new(LEGACY_WINDOWS_GUID)).unwrap();
    assert_eq!(convert_guid(Platform::Windows, &once), None);
}
