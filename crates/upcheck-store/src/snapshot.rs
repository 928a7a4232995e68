//! Snapshot persistence
//!
//! Snapshots are keyed by `(label, endpoint)` and written once. Putting the
//! same content again is a no-op; putting different content under an
//! occupied key fails with `AlreadyExists`.

use crate::errors::{already_exists, io_error, not_found, serialization, Result};
use crate::fs::{atomic_write, digest};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use upcheck_core::{EndpointMode, Snapshot, SnapshotLabel};

/// Storage key for a snapshot, e.g. `preupgrade_cli`
pub fn snapshot_key(label: SnapshotLabel, endpoint: EndpointMode) -> String {
    format!("{}_{}", label, endpoint)
}

/// Persistence seam for snapshots.
pub trait SnapshotStore {
    /// Persist a snapshot, returning the SHA256 of its stored form.
    ///
    /// # Errors
    ///
    /// `AlreadyExists` if different content is stored under the key,
    /// `Io`/`Serialization` on storage failure.
    fn put(&self, label: SnapshotLabel, endpoint: EndpointMode, snapshot: &Snapshot)
        -> Result<String>;

    /// Load a snapshot.
    ///
    /// # Errors
    ///
    /// `NotFound` if nothing is stored under the key, `Serialization` if the
    /// stored document is malformed.
    fn get(&self, label: SnapshotLabel, endpoint: EndpointMode) -> Result<Snapshot>;

    /// Load a snapshot addressed by raw strings.
    ///
    /// Both names are validated before the store is touched.
    ///
    /// # Errors
    ///
    /// `InvalidLabel` / `InvalidEndpoint` for unknown names, otherwise as
    /// [`SnapshotStore::get`].
    fn get_named(&self, label: &str, endpoint: &str) -> Result<Snapshot> {
        let label: SnapshotLabel = label.parse()?;
        let endpoint: EndpointMode = endpoint.parse()?;
        self.get(label, endpoint)
    }
}

fn encode(snapshot: &Snapshot) -> Result<Vec<u8>> {
    serde_json::to_vec_pretty(snapshot).map_err(|e| serialization("snapshot_encode", e))
}

/// Snapshot store writing one JSON document per key under a root directory.
#[derive(Debug, Clone)]
pub struct FsSnapshotStore {
    root: PathBuf,
}

impl FsSnapshotStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }
}

impl SnapshotStore for FsSnapshotStore {
    fn put(
        &self,
        label: SnapshotLabel,
        endpoint: EndpointMode,
        snapshot: &Snapshot,
    ) -> Result<String> {
        let key = snapshot_key(label, endpoint);
        let path = self.path_for(&key);
        let content = encode(snapshot)?;
        let content_digest = digest(&content);

        if path.exists() {
            let existing = fs::read(&path).map_err(|e| io_error("snapshot_put", &key, e))?;
            if existing == content {
                tracing::debug!(key = %key, "snapshot already persisted");
                return Ok(content_digest);
            }
            return Err(already_exists("snapshot_put", &key));
        }

        atomic_write(&path, &content)?;
        tracing::debug!(key = %key, digest = %content_digest, "snapshot persisted");
        Ok(content_digest)
    }

    fn get(&self, label: SnapshotLabel, endpoint: EndpointMode) -> Result<Snapshot> {
        let key = snapshot_key(label, endpoint);
        let file = fs::File::open(self.path_for(&key))
            .map_err(|e| io_error("snapshot_get", &key, e))?;
        let snapshot: Snapshot = serde_json::from_reader(std::io::BufReader::new(file))
            .map_err(|e| serialization("snapshot_get", e).with_entity_id(key.as_str()))?;
        tracing::debug!(key = %key, components = snapshot.records().len(), "snapshot loaded");
        Ok(snapshot)
    }
}

/// In-process snapshot store.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    documents: RefCell<BTreeMap<String, Vec<u8>>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn put(
        &self,
        label: SnapshotLabel,
        endpoint: EndpointMode,
        snapshot: &Snapshot,
    ) -> Result<String> {
        let key = snapshot_key(label, endpoint);
        let content = encode(snapshot)?;
        let content_digest = digest(&content);

        let mut documents = self.documents.borrow_mut();
        match documents.get(&key) {
            Some(existing) if *existing == content => Ok(content_digest),
            Some(_) => Err(already_exists("snapshot_put", &key)),
            None => {
                documents.insert(key, content);
                Ok(content_digest)
            }
        }
    }

    fn get(&self, label: SnapshotLabel, endpoint: EndpointMode) -> Result<Snapshot> {
        let key = snapshot_key(label, endpoint);
        let documents = self.documents.borrow();
        let content = documents
            .get(&key)
            .ok_or_else(|| not_found("snapshot_get", &key))?;
        serde_json::from_slice(content).map_err(|e| serialization("snapshot_get", e))
    }
}
