// Integration tests for entity comparison over a snapshot store

use serde_json::json;
use upcheck_core::{
    AttributeSpec, CheckConfig, ComponentRecord, Correlation, EndpointMode, Entity, ExErrorKind,
    KeyAttributeTable, Snapshot, SnapshotLabel, UpgradePath,
};
use upcheck_engine::commands::compare_entities;
use upcheck_store::{MemorySnapshotStore, SnapshotStore};

fn config(endpoint: EndpointMode) -> CheckConfig {
    let upgrade = UpgradePath::new(vec!["6.2".into(), "6.3".into()], "6.2", "6.3").unwrap();
    let mut config = CheckConfig::new(endpoint, upgrade);
    config.key_attributes = KeyAttributeTable::new().with("host", "name");
    config
}

fn hosts(entities: Vec<Entity>) -> Snapshot {
    Snapshot::new()
        .with_record(ComponentRecord::new("host", entities))
        .unwrap()
}

fn seeded_store(endpoint: EndpointMode) -> MemorySnapshotStore {
    let store = MemorySnapshotStore::new();
    store
        .put(
            SnapshotLabel::PreUpgrade,
            endpoint,
            &hosts(vec![
                Entity::new().with("name", "h1").with("ip", "10.0.0.1").with("id", 1),
                Entity::new().with("name", "h2").with("ip", "10.0.0.2").with("id", 2),
            ]),
        )
        .unwrap();
    store
        .put(
            SnapshotLabel::PostUpgrade,
            endpoint,
            &hosts(vec![
                Entity::new().with("name", "h1").with("ip", "10.0.0.9").with("id", 1),
                Entity::new().with("name", "h3").with("ip", "10.0.0.3").with("id", 3),
            ]),
        )
        .unwrap();
    store
}

#[test]
fn test_compare_entities_reports_changes_and_missing() {
    // Given: snapshots where h1 changed ip and h2 vanished
    let store = seeded_store(EndpointMode::Cli);

    // When: ip is compared
    let result = compare_entities(
        &store,
        &config(EndpointMode::Cli),
        "host",
        &AttributeSpec::same("ip"),
    )
    .unwrap();

    // Then: one entry per pre-upgrade host, h3 is not reported
    assert_eq!(result.correlations.len(), 2);
    assert_eq!(
        result.correlations[0],
        Correlation::Pair {
            key: "h1".to_string(),
            before: json!("10.0.0.1"),
            after: json!("10.0.0.9"),
        }
    );
    match &result.correlations[1] {
        Correlation::Missing { key, side, .. } => {
            assert_eq!(key, "h2");
            assert_eq!(*side, SnapshotLabel::PostUpgrade);
        }
        other => panic!("expected missing correlation, got {:?}", other),
    }
    assert_eq!(result.mismatches().count(), 2);
    assert!(!result.passed());
}

#[test]
fn test_compare_entities_api_mode_correlates_by_id() {
    let store = seeded_store(EndpointMode::Api);

    let result = compare_entities(
        &store,
        &config(EndpointMode::Api),
        "host",
        &AttributeSpec::same("name"),
    )
    .unwrap();

    assert_eq!(result.correlations[0].key(), "1");
    assert!(result.correlations[0].is_unchanged());
}

#[test]
fn test_compare_entities_only_reads_configured_endpoint() {
    // Given: snapshots stored for the CLI endpoint only
    let store = seeded_store(EndpointMode::Cli);

    // When: the run is configured for the API endpoint
    let err = compare_entities(
        &store,
        &config(EndpointMode::Api),
        "host",
        &AttributeSpec::same("ip"),
    )
    .unwrap_err();

    // Then: the missing snapshot is reported
    assert_eq!(err.kind(), ExErrorKind::NotFound);
}

#[test]
fn test_compare_entities_renamed_attribute() {
    let store = MemorySnapshotStore::new();
    store
        .put(
            SnapshotLabel::PreUpgrade,
            EndpointMode::Cli,
            &hosts(vec![Entity::new().with("name", "h1").with("os", "RHEL 8")]),
        )
        .unwrap();
    store
        .put(
            SnapshotLabel::PostUpgrade,
            EndpointMode::Cli,
            &hosts(vec![Entity::new()
                .with("name", "h1")
                .with("operating system", "RHEL 8")]),
        )
        .unwrap();

    let spec = AttributeSpec::per_version([("6.2", "os"), ("6.3", "operating system")]);
    let result = compare_entities(&store, &config(EndpointMode::Cli), "host", &spec).unwrap();

    assert!(result.passed());
}

#[test]
fn test_compare_entities_unknown_component() {
    let store = seeded_store(EndpointMode::Cli);
    let mut cfg = config(EndpointMode::Cli);
    cfg.key_attributes = cfg.key_attributes.with("subnet", "name");

    let err = compare_entities(&store, &cfg, "subnet", &AttributeSpec::same("vlan")).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::UnknownComponent);
}
