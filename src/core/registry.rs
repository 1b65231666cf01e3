//! Per-platform mapping stores with duplicate and override detection
//!
//! Each platform owns two keyed stores:
//! - the **working set**, built from the database being checked and
//!   eventually written back out
//! - the **authoritative set**, imported from the SDL header and only
//!   consulted to veto conflicting overrides
//!
//! The working set keeps insertion order so passes over it (GUID
//! conversion) visit mappings in file order.
//!
//! # Performance
//! - Admit mapping: O(1) average case
//! - Re-key mapping: O(n) in the platform's working set (order-preserving removal)

use indexmap::IndexMap;
use std::collections::HashMap;

use crate::core::types::{Guid, Mapping, Platform};

/// Result of admitting a mapping into the working set
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Admission {
    /// New mapping stored
    Inserted,
    /// Identical to the authoritative mapping; stored as a re-declaration
    Redeclared,
}

/// Why a mapping was refused by the working set
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Rejection {
    /// The working set already holds this platform and GUID
    Duplicate { previous_line: usize },
    /// The authoritative set holds a different mapping for this GUID
    IllegalOverride { reference_line: usize },
}

/// Result of moving a working mapping to a new GUID
#[derive(Debug, PartialEq)]
pub enum Rekey {
    Moved,
    /// The target GUID was taken; the existing mapping stays and the
    /// moved one is handed back, already removed from the store
    Collided { dropped: Mapping, existing: Mapping },
    /// Nothing stored under the old GUID
    Missing,
}

#[derive(Debug, Default)]
struct PlatformStore {
    working: IndexMap<Guid, Mapping>,
    authoritative: HashMap<Guid, Mapping>,
}

/// Working and authoritative stores for every platform
///
/// Uses an array indexed by `Platform::index()`, so every platform always
/// has a (possibly empty) pair of stores.
#[derive(Debug, Default)]
pub struct PlatformRegistry {
    stores: [PlatformStore; 5],
}

impl PlatformRegistry {
    /// Creates a registry with empty stores for all platforms.
    pub fn new() -> Self {
        Self::default()
    }

    fn store(&self, platform: Platform) -> &PlatformStore {
        &self.stores[platform.index()]
    }

    fn store_mut(&mut self, platform: Platform) -> &mut PlatformStore {
        &mut self.stores[platform.index()]
    }

    /// Adds a mapping to the working set, applying duplicate and override policy.
    ///
    /// 1. Same platform and GUID already in the working set: `Duplicate`
    /// 2. Same platform and GUID in the authoritative set: accepted only when
    ///    GUID, name, platform and every control are equal
    /// 3. Otherwise stored
    pub fn admit(&mut self, mapping: Mapping) -> Result<Admission, Rejection> {
        let store = self.store_mut(mapping.platform);

        if let Some(previous) = store.working.get(&mapping.guid) {
            return Err(Rejection::Duplicate {
                previous_line: previous.line,
            });
        }

        let admission = match store.authoritative.get(&mapping.guid) {
            Some(reference) if *reference != mapping => {
                return Err(Rejection::IllegalOverride {
                    reference_line: reference.line,
                });
            }
            Some(_) => Admission::Redeclared,
            None => Admission::Inserted,
        };

        store.working.insert(mapping.guid.clone(), mapping);
        Ok(admission)
    }

    /// Stores a mapping in the authoritative set, replacing any previous one.
    pub fn insert_authoritative(&mut self, mapping: Mapping) -> Option<Mapping> {
        self.store_mut(mapping.platform)
            .authoritative
            .insert(mapping.guid.clone(), mapping)
    }

    /// Stores a mapping in the working set without any checks, replacing
    /// (in place) any mapping with the same GUID.
    pub fn overwrite_working(&mut self, mapping: Mapping) -> Option<Mapping> {
        self.store_mut(mapping.platform)
            .working
            .insert(mapping.guid.clone(), mapping)
    }

    /// Moves a working mapping from `old` to `new`, rewriting its GUID.
    ///
    /// An existing mapping under `new` always wins.
    pub fn rekey(&mut self, platform: Platform, old: &Guid, new: Guid) -> Rekey {
        let store = self.store_mut(platform);

        let Some(mut mapping) = store.working.shift_remove(old) else {
            return Rekey::Missing;
        };

        if let Some(existing) = store.working.get(&new) {
            mapping.guid = new;
            return Rekey::Collided {
                dropped: mapping,
                existing: existing.clone(),
            };
        }

        mapping.guid = new.clone();
        store.working.insert(new, mapping);
        Rekey::Moved
    }

    /// Working mapping for a platform and GUID
    pub fn get(&self, platform: Platform, guid: &Guid) -> Option<&Mapping> {
        self.store(platform).working.get(guid)
    }

    /// Authoritative mapping for a platform and GUID
    pub fn get_authoritative(&self, platform: Platform, guid: &Guid) -> Option<&Mapping> {
        self.store(platform).authoritative.get(guid)
    }

    /// Working mappings of one platform, in insertion order
    pub fn working(&self, platform: Platform) -> impl Iterator<Item = &Mapping> {
        self.store(platform).working.values()
    }

    /// Number of working mappings for one platform
    pub fn working_len(&self, platform: Platform) -> usize {
        self.store(platform).working.len()
    }

    /// Total number of working mappings across all platforms
    pub fn total_working(&self) -> usize {
        self.stores.iter().map(|s| s.working.len()).sum()
    }

    /// Total number of authoritative mappings across all platforms
    pub fn total_authoritative(&self) -> usize {
        self.stores.iter().map(|s| s.authoritative.len()).sum()
    }
}
