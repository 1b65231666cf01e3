//! Registry policy tests
//!
//! Covers the admission rules (duplicates, upstream overrides), unchecked
//! overwrites and GUID re-keying.

use super::{LEGACY_WINDOWS_GUID, LINUX_GUID, WINDOWS_GUID};
use crate::core::{
    parser::parse_mapping_for_platform,
    registry::{Admission, PlatformRegistry, Rejection, Rekey},
    types::{Guid, Mapping, Platform, SdlVersion},
};

fn mapping(platform: Platform, guid: &str, name: &str, controls: &str, line: usize) -> Mapping {
    let raw = format!("{},{},{}", guid, name, controls);
    parse_mapping_for_platform(platform, &raw, line, SdlVersion::V205).unwrap()
}

#[test]
fn test_admit_new_mapping() {
    let mut registry = PlatformRegistry::new();
    let m = mapping(Platform::Linux, LINUX_GUID, "Pad", "a:b0,", 1);

    assert_eq!(registry.admit(m), Ok(Admission::Inserted));
    assert_eq!(registry.working_len(Platform::Linux), 1);
    assert_eq!(registry.total_working(), 1);
}

#[test]
fn test_duplicate_keeps_first() {
    let mut registry = PlatformRegistry::new();
    registry
        .admit(mapping(Platform::Linux, LINUX_GUID, "First", "a:b0,", 3))
        .unwrap();

    let result = registry.admit(mapping(Platform::Linux, LINUX_GUID, "Second", "a:b1,", 9));
    assert_eq!(result, Err(Rejection::Duplicate { previous_line: 3 }));

    let stored = registry.get(Platform::Linux, &Guid::new(LINUX_GUID)).unwrap();
    assert_eq!(stored.name, "First");
}

#[test]
fn test_same_guid_on_other_platform_is_not_duplicate() {
    let mut registry = PlatformRegistry::new();
    registry
        .admit(mapping(Platform::Linux, LINUX_GUID, "Pad", "a:b0,", 1))
        .unwrap();

    assert!(registry
        .admit(mapping(Platform::Android, LINUX_GUID, "Pad", "a:b0,", 2))
        .is_ok());
    assert_eq!(registry.total_working(), 2);
}

#[test]
fn test_identical_redeclaration_of_upstream_mapping() {
    let mut registry = PlatformRegistry::new();
    registry.insert_authoritative(mapping(Platform::Windows, WINDOWS_GUID, "XBox 360", "a:b0,b:b1,", 100));

    // Control order and source line differ, content does not
    let result = registry.admit(mapping(Platform::Windows, WINDOWS_GUID, "XBox 360", "b:b1,a:b0,", 5));
    assert_eq!(result, Ok(Admission::Redeclared));
    assert_eq!(registry.working_len(Platform::Windows), 1);
}

#[test]
fn test_modified_upstream_mapping_rejected() {
    let mut registry = PlatformRegistry::new();
    registry.insert_authoritative(mapping(Platform::Windows, WINDOWS_GUID, "XBox 360", "a:b0,b:b1,", 100));

    let renamed = registry.admit(mapping(Platform::Windows, WINDOWS_GUID, "XBox 360 Pad", "a:b0,b:b1,", 5));
    assert_eq!(renamed, Err(Rejection::IllegalOverride { reference_line: 100 }));

    let remapped = registry.admit(mapping(Platform::Windows, WINDOWS_GUID, "XBox 360", "a:b1,b:b0,", 6));
    assert!(matches!(remapped, Err(Rejection::IllegalOverride { .. })));

    assert_eq!(registry.working_len(Platform::Windows), 0);
}

#[test]
fn test_authoritative_is_per_platform() {
    let mut registry = PlatformRegistry::new();
    registry.insert_authoritative(mapping(Platform::Windows, WINDOWS_GUID, "XBox 360", "a:b0,", 1));

    let result = registry.admit(mapping(Platform::Linux, WINDOWS_GUID, "Other", "a:b3,", 2));
    assert_eq!(result, Ok(Admission::Inserted));
    assert_eq!(registry.total_authoritative(), 1);
    assert!(registry
        .get_authoritative(Platform::Linux, &Guid::new(WINDOWS_GUID))
        .is_none());
}

#[test]
fn test_overwrite_working_replaces_in_place() {
    let mut registry = PlatformRegistry::new();
    registry
        .admit(mapping(Platform::Windows, WINDOWS_GUID, "Old", "a:b0,", 1))
        .unwrap();
    registry
        .admit(mapping(Platform::Windows, "030000006d04000019c2000000000000", "Other", "a:b0,", 2))
        .unwrap();

    let previous = registry.overwrite_working(mapping(Platform::Windows, WINDOWS_GUID, "New", "a:b2,", 1));
    assert_eq!(previous.map(|m| m.name), Some("Old".to_string()));

    let names: Vec<&str> = registry
        .working(Platform::Windows)
        .map(|m| m.name.as_str())
        .collect();
    assert_eq!(names, vec!["New", "Other"]);
}

#[test]
fn test_rekey_moves_mapping() {
    let mut registry = PlatformRegistry::new();
    registry
        .admit(mapping(Platform::Windows, LEGACY_WINDOWS_GUID, "Logitech", "a:b0,", 1))
        .unwrap();

    let new = Guid::new("030000006d04000019c2000000000000");
    let result = registry.rekey(Platform::Windows, &Guid::new(LEGACY_WINDOWS_GUID), new.clone());

    assert_eq!(result, Rekey::Moved);
    assert!(registry.get(Platform::Windows, &Guid::new(LEGACY_WINDOWS_GUID)).is_none());
    assert_eq!(registry.get(Platform::Windows, &new).unwrap().guid, new);
}

#[test]
fn test_rekey_collision_keeps_existing() {
    let mut registry = PlatformRegistry::new();
    let target = "030000006d04000019c2000000000000";
    registry
        .admit(mapping(Platform::Windows, target, "Existing", "a:b0,", 1))
        .unwrap();
    registry
        .admit(mapping(Platform::Windows, LEGACY_WINDOWS_GUID, "Migrating", "a:b1,", 2))
        .unwrap();

    match registry.rekey(Platform::Windows, &Guid::new(LEGACY_WINDOWS_GUID), Guid::new(target)) {
        Rekey::Collided { dropped, existing } => {
            assert_eq!(dropped.name, "Migrating");
            assert_eq!(dropped.guid.as_str(), target);
            assert_eq!(existing.name, "Existing");
        }
        other => panic!("Expected collision, got: {:?}", other),
    }

    assert_eq!(registry.working_len(Platform::Windows), 1);
    assert_eq!(
        registry.get(Platform::Windows, &Guid::new(target)).unwrap().name,
        "Existing"
    );
}

#[test]
fn test_rekey_missing() {
    let mut registry = PlatformRegistry::new();
    let result = registry.rekey(Platform::MacOs, &Guid::new(LINUX_GUID), Guid::new(WINDOWS_GUID));
    assert_eq!(result, Rekey::Missing);
}
