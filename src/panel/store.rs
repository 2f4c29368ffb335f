use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use bincode::Options;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::variant::CanonicalKey;
use crate::parsing::ParseError;
use crate::utils::paths::is_gzipped;

#[derive(Error, Debug)]
pub enum PanelError {
    #[error("Failed to read panel snapshot: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to decode panel snapshot: {0}")]
    DecodeError(#[from] bincode::Error),

    #[error("Failed to parse panel input: {0}")]
    ParseError(#[from] ParseError),
}

/// Snapshot version for compatibility checking
pub const SNAPSHOT_VERSION: &str = "1.0.0";

/// Upper bound on the encoded size of a snapshot; decoding stops with an error past this
pub const MAX_SNAPSHOT_BYTES: u64 = 8 * 1024 * 1024 * 1024;

fn snapshot_options() -> impl Options {
    bincode::DefaultOptions::new().with_limit(MAX_SNAPSHOT_BYTES)
}

/// Serializable snapshot format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelSnapshot {
    pub version: String,
    pub name: String,
    pub created_at: String,
    pub keys: Vec<CanonicalKey>,
}

/// Canonical keys of every variant in a reference panel.
///
/// Loaded once and then only queried; calculations borrow it immutably, so one
/// set can be shared across any number of call sets.
#[derive(Debug, Clone)]
pub struct ReferenceVariantSet {
    name: String,
    created_at: String,
    keys: HashSet<CanonicalKey>,
}

impl ReferenceVariantSet {
    /// Create an empty set
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            created_at: chrono::Utc::now().to_rfc3339(),
            keys: HashSet::new(),
        }
    }

    /// Build a set from already-normalized keys
    pub fn from_keys<I>(name: impl Into<String>, keys: I) -> Self
    where
        I: IntoIterator<Item = CanonicalKey>,
    {
        let mut set = Self::new(name);
        set.keys.extend(keys);
        set
    }

    /// Load a snapshot file; `.gz` snapshots are decompressed transparently
    pub fn load_from_file(path: &Path) -> Result<Self, PanelError> {
        let file = File::open(path)?;
        let set = if is_gzipped(path) {
            Self::from_reader(BufReader::new(MultiGzDecoder::new(file)))?
        } else {
            Self::from_reader(BufReader::new(file))?
        };

        debug!(
            path = %path.display(),
            panel = %set.name,
            keys = set.len(),
            "Loaded panel snapshot"
        );
        Ok(set)
    }

    /// Decode a snapshot from a reader
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, PanelError> {
        let snapshot: PanelSnapshot = snapshot_options().deserialize_from(reader)?;

        // Version check (warn but don't fail)
        if snapshot.version != SNAPSHOT_VERSION {
            warn!(
                expected = SNAPSHOT_VERSION,
                found = %snapshot.version,
                "Panel snapshot version mismatch"
            );
        }

        Ok(Self {
            name: snapshot.name,
            created_at: snapshot.created_at,
            keys: snapshot.keys.into_iter().collect(),
        })
    }

    /// Write the set as a snapshot.
    ///
    /// The snapshot is written to a temporary file next to `path` and renamed
    /// into place, so readers never see a partial file.
    pub fn save_to_file(&self, path: &Path) -> Result<(), PanelError> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut temp = tempfile::NamedTempFile::new_in(dir)?;

        if is_gzipped(path) {
            let mut encoder =
                GzEncoder::new(BufWriter::new(temp.as_file_mut()), Compression::default());
            self.write_to(&mut encoder)?;
            encoder.finish()?.flush()?;
        } else {
            let mut writer = BufWriter::new(temp.as_file_mut());
            self.write_to(&mut writer)?;
            writer.flush()?;
        }

        temp.persist(path).map_err(|e| e.error)?;
        debug!(path = %path.display(), keys = self.len(), "Saved panel snapshot");
        Ok(())
    }

    /// Encode the set as a snapshot into a writer
    pub fn write_to<W: Write>(&self, writer: W) -> Result<(), PanelError> {
        snapshot_options().serialize_into(writer, &self.to_snapshot())?;
        Ok(())
    }

    /// Snapshot of this set with keys in sorted order
    pub fn to_snapshot(&self) -> PanelSnapshot {
        let mut keys: Vec<CanonicalKey> = self.keys.iter().cloned().collect();
        keys.sort_unstable();

        PanelSnapshot {
            version: SNAPSHOT_VERSION.to_string(),
            name: self.name.clone(),
            created_at: self.created_at.clone(),
            keys,
        }
    }

    /// Add a key; returns false if it was already present
    pub fn insert(&mut self, key: CanonicalKey) -> bool {
        self.keys.insert(key)
    }

    /// Check whether a key is in the panel
    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// Panel name recorded in the snapshot
    pub fn name(&self) -> &str {
        &self.name
    }

    /// RFC 3339 timestamp of when the snapshot was built
    pub fn created_at(&self) -> &str {
        &self.created_at
    }

    /// Number of keys in the panel
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Check if the panel is empty
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> CanonicalKey {
        CanonicalKey::from_normalized(s)
    }

    #[test]
    fn test_contains() {
        let set = ReferenceVariantSet::from_keys("evs", [key("7:117559590.A.G")]);
        assert!(set.contains("7:117559590.A.G"));
        assert!(!set.contains("7:117559590.G.A"));
        assert_eq!(set.len(), 1);
        assert_eq!(set.name(), "evs");
    }

    #[test]
    fn test_insert_dedups() {
        let mut set = ReferenceVariantSet::new("kg");
        assert!(set.is_empty());
        assert!(set.insert(key("1:10.A.C")));
        assert!(!set.insert(key("1:10.A.C")));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_snapshot_keys_sorted() {
        let set = ReferenceVariantSet::from_keys("kg", [key("2:5.A.T"), key("1:10.A.C")]);
        let snapshot = set.to_snapshot();
        assert_eq!(snapshot.version, SNAPSHOT_VERSION);
        assert_eq!(snapshot.keys, vec![key("1:10.A.C"), key("2:5.A.T")]);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();

        for file_name in ["panel.bin", "panel.bin.gz"] {
            let path = dir.path().join(file_name);
            let set = ReferenceVariantSet::from_keys("evs", [key("1:10.A.C"), key("X:99.G.T")]);
            set.save_to_file(&path).unwrap();

            let loaded = ReferenceVariantSet::load_from_file(&path).unwrap();
            assert_eq!(loaded.name(), "evs");
            assert_eq!(loaded.created_at(), set.created_at());
            assert_eq!(loaded.len(), 2);
            assert!(loaded.contains("X:99.G.T"));
        }
    }

    #[test]
    fn test_load_garbage() {
        let result = ReferenceVariantSet::from_reader(&b"not a snapshot"[..]);
        assert!(matches!(result, Err(PanelError::DecodeError(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let result = ReferenceVariantSet::load_from_file(Path::new("/nonexistent/panel.bin"));
        assert!(matches!(result, Err(PanelError::ReadError(_))));
    }
}
