//! Core module tests
//!
//! Contains test suites for core functionality:
//! - Record parsing and field validation tests
//! - GUID conversion tests
//! - Registry policy tests (duplicates, overrides, re-keying)
//! - Reconciliation tests (batch ingestion, reports)
//! - Serialisation tests (ordering, round trips, idempotence)

#[cfg(test)]
mod convert_tests;
#[cfg(test)]
mod registry_tests;

/// Current-format Linux GUID
#[cfg(test)]
pub(crate) const LINUX_GUID: &str = "03000000de280000ff11000001000000";

/// Current-format Windows GUID
#[cfg(test)]
pub(crate) const WINDOWS_GUID: &str = "030000005e0400008e02000000000000";

/// SDL 2.0.4 Windows GUID carrying the `PIDVID` sentinel
#[cfg(test)]
pub(crate) const LEGACY_WINDOWS_GUID: &str = "6d0419c2000000000000504944564944";

/// SDL 2.0.4 macOS GUID with zeroed ranges
#[cfg(test)]
pub(crate) const LEGACY_MACOS_GUID: &str = "5e04000000000000dd02000000000000";
