//! Snapshots and catalog readers.
//!
//! A [`Snapshot`] is the sorted, duplicate-free list of one kind's objects
//! read from one catalog. Once built it is never mutated.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{
    CatalogItem, CatalogObject, ExtendedStatistics, ForeignServer, ObjectKind, Rule, Trigger,
};
use crate::error::{DiffError, Result};

/// Sorted, duplicate-free objects of one kind.
#[derive(Debug, Clone)]
pub struct Snapshot<T: CatalogItem> {
    items: Vec<T>,
}

impl<T: CatalogItem> Default for Snapshot<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: CatalogItem> Snapshot<T> {
    /// Builds a snapshot, sorting by identity.
    ///
    /// Fails with [`DiffError::DuplicateIdentity`] if two items share an
    /// identity.
    pub fn new(items: Vec<T>) -> Result<Self> {
        let mut keyed: Vec<(T::Key, T)> = items.into_iter().map(|i| (i.key(), i)).collect();
        keyed.sort_by(|a, b| a.0.cmp(&b.0));

        if let Some(pair) = keyed.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(DiffError::DuplicateIdentity {
                kind: T::KIND,
                identity: pair[0].0.to_string(),
            });
        }

        Ok(Self {
            items: keyed.into_iter().map(|(_, item)| item).collect(),
        })
    }

    /// An empty snapshot (used when the catalog predates the kind).
    #[must_use]
    pub fn empty() -> Self {
        Self { items: Vec::new() }
    }

    /// Returns the items in identity order.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Returns the number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the snapshot holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Source of per-kind snapshots.
pub trait CatalogReader {
    /// Reads all rules.
    fn rules(&self) -> Result<Snapshot<Rule>>;

    /// Reads all foreign servers.
    fn foreign_servers(&self) -> Result<Snapshot<ForeignServer>>;

    /// Reads all extended statistics objects.
    fn statistics(&self) -> Result<Snapshot<ExtendedStatistics>>;

    /// Reads all triggers.
    fn triggers(&self) -> Result<Snapshot<Trigger>>;
}

/// A catalog dump stored as JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JsonCatalog {
    /// `server_version_num` of the dumped catalog; `None` means current.
    #[serde(default)]
    pub server_version: Option<u32>,
    /// Every dumped object, tagged by kind.
    #[serde(default)]
    pub objects: Vec<CatalogObject>,
}

impl JsonCatalog {
    /// Creates a catalog from objects.
    #[must_use]
    pub fn new(objects: Vec<CatalogObject>) -> Self {
        Self {
            server_version: None,
            objects,
        }
    }

    /// Sets the server version.
    #[must_use]
    pub fn with_server_version(mut self, version: u32) -> Self {
        self.server_version = Some(version);
        self
    }

    /// Parses a catalog from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a catalog from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    /// Returns true if the dumped catalog has the given kind.
    #[must_use]
    pub fn supports(&self, kind: ObjectKind) -> bool {
        self.server_version
            .is_none_or(|v| v >= kind.min_server_version())
    }

    fn snapshot<T: CatalogItem>(&self) -> Result<Snapshot<T>> {
        if !self.supports(T::KIND) {
            debug!(
                kind = %T::KIND,
                server_version = ?self.server_version,
                "Catalog predates kind, using empty snapshot"
            );
            return Ok(Snapshot::empty());
        }

        let items: Vec<T> = self
            .objects
            .iter()
            .filter(|o| o.kind() == T::KIND)
            .cloned()
            .filter_map(T::from_object)
            .collect();
        Snapshot::new(items)
    }
}

impl CatalogReader for JsonCatalog {
    fn rules(&self) -> Result<Snapshot<Rule>> {
        self.snapshot()
    }

    fn foreign_servers(&self) -> Result<Snapshot<ForeignServer>> {
        self.snapshot()
    }

    fn statistics(&self) -> Result<Snapshot<ExtendedStatistics>> {
        self.snapshot()
    }

    fn triggers(&self) -> Result<Snapshot<Trigger>> {
        self.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::ObjectIdentity;

    fn stat(schema: &str, name: &str) -> ExtendedStatistics {
        ExtendedStatistics {
            oid: 0,
            identity: ObjectIdentity::new(schema, name),
            definition: format!("CREATE STATISTICS {schema}.{name} ON a, b FROM t"),
            comment: None,
            owner: "postgres".to_string(),
        }
    }

    #[test]
    fn test_snapshot_sorts_by_identity() {
        let snap = Snapshot::new(vec![stat("b", "x"), stat("a", "y"), stat("a", "x")]).unwrap();
        let names: Vec<String> = snap.items().iter().map(|s| s.key().to_string()).collect();
        assert_eq!(names, vec!["a.x", "a.y", "b.x"]);
    }

    #[test]
    fn test_snapshot_rejects_duplicates() {
        let err = Snapshot::new(vec![stat("a", "x"), stat("b", "y"), stat("a", "x")]).unwrap_err();
        match err {
            DiffError::DuplicateIdentity { kind, identity } => {
                assert_eq!(kind, ObjectKind::Statistics);
                assert_eq!(identity, "a.x");
            }
            other => panic!("Expected DuplicateIdentity, got {other:?}"),
        }
    }

    #[test]
    fn test_old_catalog_yields_empty_statistics() {
        let catalog = JsonCatalog::new(vec![CatalogObject::Statistics(stat("a", "x"))])
            .with_server_version(90_600);

        assert!(catalog.statistics().unwrap().is_empty());
        assert!(!catalog.supports(ObjectKind::Statistics));
        assert!(catalog.supports(ObjectKind::Rule));
    }

    #[test]
    fn test_reader_partitions_by_kind() {
        let catalog = JsonCatalog::new(vec![
            CatalogObject::Statistics(stat("a", "x")),
            CatalogObject::Trigger(Trigger {
                oid: 1,
                table: ObjectIdentity::new("a", "t"),
                name: "trg".to_string(),
                definition: "CREATE TRIGGER trg ...".to_string(),
                comment: None,
            }),
        ]);

        assert_eq!(catalog.statistics().unwrap().len(), 1);
        assert_eq!(catalog.triggers().unwrap().len(), 1);
        assert!(catalog.rules().unwrap().is_empty());
        assert!(catalog.foreign_servers().unwrap().is_empty());
    }
}
