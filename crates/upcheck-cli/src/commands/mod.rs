pub mod compare;
pub mod snapshot;
pub mod template;

use std::path::Path;
use upcheck_store::{FsSnapshotStore, FsTemplateStore};

pub fn snapshot_store(root: &Path) -> FsSnapshotStore {
    FsSnapshotStore::new(root.join("snapshots"))
}

pub fn template_store(root: &Path) -> FsTemplateStore {
    FsTemplateStore::new(root.join("templates"))
}

/// Read a file argument, naming the path on failure
pub fn read_input(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e).into())
}
