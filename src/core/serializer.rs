//! Canonical text rendering of mappings and whole databases
//!
//! Output is deterministic:
//! - platforms in `Platform::ALL` order, each under a `# <Platform>` heading
//! - within a platform, mappings sorted case-insensitively by name, then GUID
//! - within a mapping, controls in ascending name order, `platform:` last
//!
//! Re-parsing the output and serialising again yields identical text.

use crate::core::registry::PlatformRegistry;
use crate::core::types::{Mapping, Platform, SdlVersion};

/// Upstream location of the community database
pub const DATABASE_SOURCE: &str = "https://github.com/gabomdq/SDL_GameControllerDB";

/// Comment block written at the top of every formatted database
pub fn file_header(version: SdlVersion) -> String {
    format!(
        "# Game Controller DB for SDL in {} format\n# Source: {}\n",
        version, DATABASE_SOURCE
    )
}

/// Render one mapping as a database line, without the line terminator
///
/// # Example
/// ```ignore
/// // "xinput,XInput Controller,a:b0,b:b1,platform:Windows,"
/// let line = serialize_mapping(&mapping);
/// ```
pub fn serialize_mapping(mapping: &Mapping) -> String {
    let mut out = format!("{},{},", mapping.guid, quote_name(&mapping.name));

    for (control, value) in &mapping.controls {
        out.push_str(&format!("{}:{},", control, value));
    }

    out.push_str(&format!("platform:{},", mapping.platform));
    out
}

/// Quote a name the field splitter would otherwise alter
///
/// Commas and quotes would split or unquote the field, and leading
/// spaces would be skipped.
fn quote_name(name: &str) -> String {
    if name.contains([',', '"']) || name.starts_with([' ', '\t']) {
        format!("\"{}\"", name.replace('"', "\"\""))
    } else {
        name.to_string()
    }
}

/// Working mappings of one platform in canonical order
pub fn sorted_mappings(registry: &PlatformRegistry, platform: Platform) -> Vec<&Mapping> {
    let mut mappings: Vec<&Mapping> = registry.working(platform).collect();
    mappings.sort_by_cached_key(|m| sort_key(m));
    mappings
}

/// Case-insensitive name, then GUID
///
/// The NUL separator sorts below every printable character, so a name
/// that is a prefix of another sorts first.
fn sort_key(mapping: &Mapping) -> String {
    format!("{}\0{}", mapping.name, mapping.guid).to_lowercase()
}

/// Render the working set of a registry as a complete database file
pub fn serialize_database(registry: &PlatformRegistry, version: SdlVersion) -> String {
    let mut out = file_header(version);

    for platform in Platform::ALL {
        out.push('\n');
        out.push_str(&format!("# {}\n", platform));

        for mapping in sorted_mappings(registry, platform) {
            out.push_str(&serialize_mapping(mapping));
            out.push('\n');
        }
    }

    out
}
