//! Discovery and ordering of migration units.

use crate::error::CoreResult;
use crate::source::{list_folder, list_resources, MigrationUnit, ResourceLoader};
use std::path::Path;
use std::sync::Arc;

/// All migration units of one source, in apply order.
///
/// Units are sorted by name with plain lexicographic string ordering; version
/// numbers embedded in names are not interpreted. Duplicate names keep their
/// first occurrence.
#[derive(Debug, Clone, Default)]
pub struct MigrationCatalog {
    units: Vec<MigrationUnit>,
}

impl MigrationCatalog {
    /// Build a catalog from an unordered list of units.
    pub fn new(mut units: Vec<MigrationUnit>) -> Self {
        units.sort_by(|a, b| a.name().cmp(b.name()));
        units.dedup_by(|later, earlier| {
            let duplicate = later.name() == earlier.name();
            if duplicate {
                log::warn!("Ignoring duplicate migration {}", later.name());
            }
            duplicate
        });
        Self { units }
    }

    /// Catalog of the `.sql` files in `folder`.
    pub fn from_folder(folder: &Path) -> CoreResult<Self> {
        list_folder(folder).map(Self::new)
    }

    /// Catalog of the units listed by the manifest at `manifest_path`.
    pub fn from_resources(
        loader: Arc<dyn ResourceLoader>,
        manifest_path: &str,
    ) -> CoreResult<Self> {
        list_resources(loader, manifest_path).map(Self::new)
    }

    pub fn units(&self) -> &[MigrationUnit] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MigrationUnit> {
        self.units.iter()
    }
}

impl<'a> IntoIterator for &'a MigrationCatalog {
    type Item = &'a MigrationUnit;
    type IntoIter = std::slice::Iter<'a, MigrationUnit>;

    fn into_iter(self) -> Self::IntoIter {
        self.units.iter()
    }
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
