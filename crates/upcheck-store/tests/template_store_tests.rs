// Integration tests for the filesystem template store

use tempfile::TempDir;
use upcheck_core::diff::TemplateBody;
use upcheck_core::{ExErrorKind, SnapshotLabel, TemplateKind};
use upcheck_store::{FsTemplateStore, TemplateStore};

fn setup_store() -> (TempDir, FsTemplateStore) {
    let dir = TempDir::new().expect("Failed to create temp store directory");
    let store = FsTemplateStore::new(dir.path());
    (dir, store)
}

#[test]
fn test_put_get_roundtrip() {
    let (_dir, store) = setup_store();
    store
        .put(SnapshotLabel::PreUpgrade, TemplateKind::JobTemplate, "12", "<%= @host %>\n")
        .unwrap();

    let text = store
        .get(SnapshotLabel::PreUpgrade, TemplateKind::JobTemplate, " 12 ")
        .unwrap();
    assert_eq!(text, "<%= @host %>\n");
}

#[test]
fn test_on_disk_layout() {
    let (dir, store) = setup_store();
    store
        .put(SnapshotLabel::PostUpgrade, TemplateKind::PartitionTable, "3", "body")
        .unwrap();
    assert!(dir
        .path()
        .join("postupgrade_templates")
        .join("partition-table")
        .join("3.erb")
        .is_file());
}

#[test]
fn test_list_ids_strips_suffix_exactly() {
    // Given: ids whose trailing characters overlap the suffix letters
    let (_dir, store) = setup_store();
    for id in ["10", "2", "bre", "erb"] {
        store
            .put(SnapshotLabel::PreUpgrade, TemplateKind::Template, id, "x")
            .unwrap();
    }

    // When: ids are listed
    let ids = store
        .list_ids(SnapshotLabel::PreUpgrade, TemplateKind::Template)
        .unwrap();

    // Then: exactly the persisted ids come back, sorted
    assert_eq!(ids, vec!["10", "2", "bre", "erb"]);
}

#[test]
fn test_list_ids_ignores_foreign_files() {
    let (dir, store) = setup_store();
    store
        .put(SnapshotLabel::PreUpgrade, TemplateKind::Template, "5", "x")
        .unwrap();
    let kind_dir = dir.path().join("preupgrade_templates").join("template");
    std::fs::write(kind_dir.join("notes.txt"), b"ignored").unwrap();

    let ids = store
        .list_ids(SnapshotLabel::PreUpgrade, TemplateKind::Template)
        .unwrap();
    assert_eq!(ids, vec!["5"]);
}

#[test]
fn test_list_ids_empty_when_nothing_stored() {
    let (_dir, store) = setup_store();
    let ids = store
        .list_ids(SnapshotLabel::PostUpgrade, TemplateKind::JobTemplate)
        .unwrap();
    assert!(ids.is_empty());
}

#[test]
fn test_list_ids_named_rejects_unknown_kind() {
    let (_dir, store) = setup_store();
    let err = store
        .list_ids_named(SnapshotLabel::PreUpgrade, "snippet")
        .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidTemplateKind);
}

#[test]
fn test_get_missing_template() {
    let (_dir, store) = setup_store();
    let err = store
        .get(SnapshotLabel::PostUpgrade, TemplateKind::JobTemplate, "99")
        .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotFound);

    let body = store
        .fetch(SnapshotLabel::PostUpgrade, TemplateKind::JobTemplate, "99")
        .unwrap();
    assert!(matches!(body, TemplateBody::Missing { .. }));
    assert_eq!(body.to_string(), "job-template template of ID 99 is missing");
}

#[test]
fn test_put_overwrites_body() {
    let (_dir, store) = setup_store();
    store
        .put(SnapshotLabel::PreUpgrade, TemplateKind::Template, "1", "old")
        .unwrap();
    store
        .put(SnapshotLabel::PreUpgrade, TemplateKind::Template, "1", "new")
        .unwrap();
    assert_eq!(
        store.get(SnapshotLabel::PreUpgrade, TemplateKind::Template, "1").unwrap(),
        "new"
    );
}
