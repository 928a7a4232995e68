//! Template persistence
//!
//! Rendered template bodies are addressed by `(state, kind, id)`. On disk the
//! layout is `<root>/<state>_templates/<kind>/<id>.erb`.

use crate::errors::{invalid_key, io_error, not_found, Result};
use crate::fs::atomic_write;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use upcheck_core::diff::{TemplateBody, TemplateRef};
use upcheck_core::errors::ExErrorKind;
use upcheck_core::{SnapshotLabel, TemplateKind};

const TEMPLATE_SUFFIX: &str = ".erb";

/// Validate and trim a template id
fn clean_id(operation: &str, id: &str) -> Result<String> {
    let id = id.trim();
    if id.is_empty() {
        return Err(invalid_key(operation, id, "template id must not be empty"));
    }
    if id.contains('/') || id.contains('\\') || id == "." || id == ".." {
        return Err(invalid_key(
            operation,
            id,
            "template id must not contain path separators",
        ));
    }
    Ok(id.to_string())
}

/// Persistence seam for rendered templates.
pub trait TemplateStore {
    /// Store a template body, replacing any previous body.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for an empty or path-like id, `Io` on storage failure.
    fn put(&self, state: SnapshotLabel, kind: TemplateKind, id: &str, text: &str) -> Result<()>;

    /// Fetch a template body.
    ///
    /// # Errors
    ///
    /// `NotFound` if no body is stored for the id.
    fn get(&self, state: SnapshotLabel, kind: TemplateKind, id: &str) -> Result<String>;

    /// Sorted, de-duplicated ids persisted for `(state, kind)`.
    ///
    /// # Errors
    ///
    /// `Io` on storage failure.
    fn list_ids(&self, state: SnapshotLabel, kind: TemplateKind) -> Result<Vec<String>>;

    /// Fetch a template body, reporting absence in-band.
    ///
    /// # Errors
    ///
    /// Any error from [`TemplateStore::get`] other than `NotFound`.
    fn fetch(&self, state: SnapshotLabel, kind: TemplateKind, id: &str) -> Result<TemplateBody> {
        let template = TemplateRef::new(state, kind, id);
        match self.get(state, kind, id) {
            Ok(text) => Ok(TemplateBody::Present { template, text }),
            Err(e) if e.kind() == ExErrorKind::NotFound => Ok(TemplateBody::Missing { template }),
            Err(e) => Err(e),
        }
    }

    /// List ids for a kind given by name.
    ///
    /// # Errors
    ///
    /// `InvalidTemplateKind` for an unknown kind, checked before the store
    /// is touched.
    fn list_ids_named(&self, state: SnapshotLabel, kind: &str) -> Result<Vec<String>> {
        let kind: TemplateKind = kind.parse()?;
        self.list_ids(state, kind)
    }
}

/// Template store over a directory tree.
#[derive(Debug, Clone)]
pub struct FsTemplateStore {
    root: PathBuf,
}

impl FsTemplateStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn dir_for(&self, state: SnapshotLabel, kind: TemplateKind) -> PathBuf {
        self.root
            .join(format!("{}_templates", state))
            .join(kind.as_str())
    }

    fn path_for(&self, state: SnapshotLabel, kind: TemplateKind, id: &str) -> PathBuf {
        self.dir_for(state, kind)
            .join(format!("{}{}", id, TEMPLATE_SUFFIX))
    }
}

impl TemplateStore for FsTemplateStore {
    fn put(&self, state: SnapshotLabel, kind: TemplateKind, id: &str, text: &str) -> Result<()> {
        let id = clean_id("template_put", id)?;
        atomic_write(&self.path_for(state, kind, &id), text.as_bytes())?;
        tracing::debug!(state = %state, template_kind = %kind, template_id = %id, "template stored");
        Ok(())
    }

    fn get(&self, state: SnapshotLabel, kind: TemplateKind, id: &str) -> Result<String> {
        let id = clean_id("template_get", id)?;
        let key = TemplateRef::new(state, kind, &id).to_string();
        fs::read_to_string(self.path_for(state, kind, &id))
            .map_err(|e| io_error("template_get", &key, e))
    }

    fn list_ids(&self, state: SnapshotLabel, kind: TemplateKind) -> Result<Vec<String>> {
        let dir = self.dir_for(state, kind);
        let key = dir.display().to_string();
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error("template_list", &key, e)),
        };

        let mut ids = BTreeSet::new();
        for entry in entries {
            let entry = entry.map_err(|e| io_error("template_list", &key, e))?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if let Some(id) = name.strip_suffix(TEMPLATE_SUFFIX) {
                let id = id.trim();
                if !id.is_empty() {
                    ids.insert(id.to_string());
                }
            }
        }
        Ok(ids.into_iter().collect())
    }
}

/// In-process template store.
#[derive(Debug, Default)]
pub struct MemoryTemplateStore {
    bodies: RefCell<BTreeMap<TemplateRef, String>>,
}

impl MemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TemplateStore for MemoryTemplateStore {
    fn put(&self, state: SnapshotLabel, kind: TemplateKind, id: &str, text: &str) -> Result<()> {
        let id = clean_id("template_put", id)?;
        self.bodies
            .borrow_mut()
            .insert(TemplateRef::new(state, kind, &id), text.to_string());
        Ok(())
    }

    fn get(&self, state: SnapshotLabel, kind: TemplateKind, id: &str) -> Result<String> {
        let id = clean_id("template_get", id)?;
        let template = TemplateRef::new(state, kind, &id);
        self.bodies
            .borrow()
            .get(&template)
            .cloned()
            .ok_or_else(|| not_found("template_get", &template.to_string()))
    }

    fn list_ids(&self, state: SnapshotLabel, kind: TemplateKind) -> Result<Vec<String>> {
        Ok(self
            .bodies
            .borrow()
            .keys()
            .filter(|t| t.state == state && t.kind == kind)
            .map(|t| t.id.clone())
            .collect())
    }
}
