use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use formats::FeatureCollection;
use tracing::{debug, warn};

use crate::slot::CatalogSlot;
use crate::{CatalogError, content_hash};

/// Where catalog bytes come from. Locations are opaque to the chart.
pub trait CatalogSource {
    fn fetch(&self, location: &str) -> Result<Vec<u8>, CatalogError>;
}

/// Reads catalogs from disk, resolving relative locations against `root`.
#[derive(Debug, Clone)]
pub struct FileCatalogSource {
    root: PathBuf,
}

impl FileCatalogSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn resolve(&self, location: &str) -> PathBuf {
        let path = Path::new(location);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl CatalogSource for FileCatalogSource {
    fn fetch(&self, location: &str) -> Result<Vec<u8>, CatalogError> {
        let path = self.resolve(location);
        debug!(path = %path.display(), "reading catalog");
        std::fs::read(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => CatalogError::NotFound(location.to_string()),
            _ => CatalogError::Io(format!("{}: {e}", path.display())),
        })
    }
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryCatalogSource {
    entries: BTreeMap<String, Vec<u8>>,
}

impl InMemoryCatalogSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, location: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.entries.insert(location.into(), bytes.into());
    }

    pub fn with(mut self, location: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(location, bytes);
        self
    }

    pub fn remove(&mut self, location: &str) -> bool {
        self.entries.remove(location).is_some()
    }
}

impl CatalogSource for InMemoryCatalogSource {
    fn fetch(&self, location: &str) -> Result<Vec<u8>, CatalogError> {
        self.entries
            .get(location)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(location.to_string()))
    }
}

/// A parsed catalog bound to the slot and location it was loaded for.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedCatalog {
    pub slot: CatalogSlot,
    pub location: String,
    pub content_hash: String,
    pub features: FeatureCollection,
}

pub fn parse_catalog(
    slot: CatalogSlot,
    location: &str,
    bytes: &[u8],
) -> Result<LoadedCatalog, CatalogError> {
    let text = std::str::from_utf8(bytes).map_err(|e| CatalogError::Parse(e.to_string()))?;
    let features = FeatureCollection::from_geojson_str(text, slot.default_type())
        .map_err(|e| CatalogError::Parse(e.to_string()))?;
    if let Some(first) = features.invalid.first() {
        warn!(
            %slot,
            location,
            invalid = features.invalid.len(),
            first = %first,
            "malformed catalog features skipped"
        );
    }
    Ok(LoadedCatalog {
        slot,
        location: location.to_string(),
        content_hash: content_hash(bytes),
        features,
    })
}

/// Catalogs currently available to the chart, one per slot.
#[derive(Debug, Default, Clone)]
pub struct CatalogSet {
    by_slot: BTreeMap<CatalogSlot, LoadedCatalog>,
}

impl CatalogSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `loaded`; returns `false` when the slot already held identical
    /// content from the same location.
    pub fn install(&mut self, loaded: LoadedCatalog) -> bool {
        if let Some(existing) = self.by_slot.get(&loaded.slot)
            && existing.location == loaded.location
            && existing.content_hash == loaded.content_hash
        {
            return false;
        }
        self.by_slot.insert(loaded.slot, loaded);
        true
    }

    pub fn get(&self, slot: CatalogSlot) -> Option<&LoadedCatalog> {
        self.by_slot.get(&slot)
    }

    pub fn remove(&mut self, slot: CatalogSlot) -> Option<LoadedCatalog> {
        self.by_slot.remove(&slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formats::ObjectType;
    use pretty_assertions::assert_eq;

    const STARS: &str = r#"{"type": "FeatureCollection", "features": [
        {"type": "Feature", "geometry": {"type": "Point", "coordinates": [281.2, -8.2]},
         "properties": {"id": "HIP24436", "type": "Star", "magnitude": 0.18}}
    ]}"#;

    fn load(
        source: &dyn CatalogSource,
        slot: CatalogSlot,
        location: &str,
    ) -> Result<LoadedCatalog, CatalogError> {
        parse_catalog(slot, location, &source.fetch(location)?)
    }

    #[test]
    fn in_memory_source_round_trips_bytes() {
        let source = InMemoryCatalogSource::new().with("stars.json", STARS);
        let loaded = load(&source, CatalogSlot::Stars, "stars.json").unwrap();
        assert_eq!(loaded.features.len(), 1);
        assert_eq!(loaded.features.features[0].object_type, ObjectType::Star);
        assert_eq!(loaded.content_hash, content_hash(STARS.as_bytes()));
    }

    #[test]
    fn missing_location_is_not_found() {
        let source = InMemoryCatalogSource::new();
        let err = load(&source, CatalogSlot::Objects, "objects.json").unwrap_err();
        assert_eq!(err, CatalogError::NotFound("objects.json".to_string()));
    }

    #[test]
    fn malformed_payload_is_a_parse_error() {
        let source = InMemoryCatalogSource::new().with("bad.json", "{");
        let err = load(&source, CatalogSlot::Stars, "bad.json").unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }

    #[test]
    fn one_bad_feature_does_not_fail_the_catalog() {
        let payload = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "geometry": {"type": "Point", "coordinates": "oops"},
             "properties": {"id": "HIP1", "type": "Star", "magnitude": 1.0}},
            {"type": "Feature", "geometry": {"type": "Point", "coordinates": [281.2, -8.2]},
             "properties": {"id": "HIP24436", "type": "Star", "magnitude": 0.18}}
        ]}"#;
        let loaded = parse_catalog(CatalogSlot::Stars, "stars.json", payload.as_bytes()).unwrap();
        assert_eq!(loaded.features.len(), 1);
        assert_eq!(loaded.features.skipped, 1);
        assert_eq!(loaded.features.invalid.len(), 1);
    }

    #[test]
    fn file_source_reports_missing_files() {
        let source = FileCatalogSource::new(env!("CARGO_MANIFEST_DIR"));
        let err = source.fetch("does/not/exist.json").unwrap_err();
        assert_eq!(err, CatalogError::NotFound("does/not/exist.json".to_string()));
        assert!(source.fetch("Cargo.toml").is_ok());
    }

    #[test]
    fn set_ignores_identical_redelivery() {
        let mut set = CatalogSet::new();
        let loaded = parse_catalog(CatalogSlot::Stars, "stars.json", STARS.as_bytes()).unwrap();
        assert!(set.install(loaded.clone()));
        assert!(!set.install(loaded.clone()));

        let moved = LoadedCatalog {
            location: "starsHD.json".to_string(),
            ..loaded
        };
        assert!(set.install(moved));
        assert_eq!(
            set.get(CatalogSlot::Stars).map(|c| c.location.as_str()),
            Some("starsHD.json")
        );
    }
}
