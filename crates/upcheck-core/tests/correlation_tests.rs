//! Entity lookup and correlation across pre/post-upgrade snapshots.

use proptest::prelude::*;
use serde_json::{json, Value};
use upcheck_core::locator::{find_all_attribute_values, find_by_criteria, Criteria};
use upcheck_core::{
    AttributeSpec, ComponentRecord, Correlation, Correlator, EndpointMode, Entity,
    KeyAttributeTable, Lookup, Snapshot, SnapshotLabel, UpgradePath,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn upgrade() -> UpgradePath {
    UpgradePath::new(vec!["6.14".into(), "6.15".into()], "6.14", "6.15").unwrap()
}

fn cli_correlator() -> Correlator {
    Correlator::new(
        EndpointMode::Cli,
        KeyAttributeTable::new()
            .with("host", "name")
            .with("subnet", "name"),
        upgrade(),
    )
}

fn snapshot(hosts: Vec<Entity>, subnets: Vec<Entity>) -> Snapshot {
    Snapshot::from_records(vec![
        ComponentRecord::new("host", hosts),
        ComponentRecord::new("subnet", subnets),
    ])
    .unwrap()
}

fn host(name: &str, ip: &str) -> Entity {
    Entity::new().with("name", name).with("ip", ip)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn test_unchanged_snapshots_pair_every_value_with_itself() {
    // Given: identical before and after snapshots
    let before = snapshot(vec![host("a", "10.0.0.1"), host("b", "10.0.0.2")], vec![]);
    let after = before.clone();

    // When: correlating host ips
    let results = cli_correlator()
        .correlate(&before, &after, "host", &AttributeSpec::same("ip"))
        .unwrap();

    // Then: every pair is (v, v)
    assert_eq!(results.len(), 2);
    for result in &results {
        let (pre, post) = result.legacy_pair();
        assert_eq!(pre, post);
    }
}

#[test]
fn test_entity_absent_after_upgrade_is_reported_not_raised() {
    // Given: host "b" disappeared after the upgrade
    let before = snapshot(vec![host("a", "1"), host("b", "2")], vec![]);
    let after = snapshot(vec![host("a", "1")], vec![]);

    // When: correlating
    let results = cli_correlator()
        .correlate(&before, &after, "host", &AttributeSpec::same("ip"))
        .unwrap();

    // Then: "a" pairs, "b" is missing on the post-upgrade side
    assert!(results[0].is_unchanged());
    match &results[1] {
        Correlation::Missing { side, lookup, key } => {
            assert_eq!(*side, SnapshotLabel::PostUpgrade);
            assert_eq!(key, "b");
            assert!(matches!(lookup, Lookup::MissingEntity { .. }));
        }
        other => panic!("expected Missing, got {:?}", other),
    }
    assert_eq!(results[1].legacy_pair().1, " in postupgrade version");
}

#[test]
fn test_attribute_dropped_after_upgrade() {
    let before = snapshot(vec![], vec![Entity::new().with("name", "s1").with("vlan", "4")]);
    let after = snapshot(vec![], vec![Entity::new().with("name", "s1")]);

    let results = cli_correlator()
        .correlate(&before, &after, "subnet", &AttributeSpec::same("vlan"))
        .unwrap();

    assert_eq!(
        results[0].legacy_pair(),
        (
            "vlan attribute missing for name : s1".to_string(),
            " in postupgrade version".to_string()
        )
    );
}

#[test]
fn test_added_entities_are_not_reported() {
    let before = snapshot(vec![host("a", "1")], vec![]);
    let after = snapshot(vec![host("a", "1"), host("new", "9")], vec![]);

    let results = cli_correlator()
        .correlate(&before, &after, "host", &AttributeSpec::same("ip"))
        .unwrap();

    assert_eq!(results.len(), 1);
}

#[test]
fn test_attribute_renamed_between_versions() {
    let before = snapshot(vec![Entity::new().with("name", "a").with("id", "77")], vec![]);
    let after = snapshot(vec![Entity::new().with("name", "a").with("uuid", "77")], vec![]);
    let spec = AttributeSpec::from_json(&json!(["id", "uuid"]), &upgrade()).unwrap();

    let results = cli_correlator()
        .correlate(&before, &after, "host", &spec)
        .unwrap();

    assert!(results[0].is_unchanged());
}

#[test]
fn test_wrong_attribute_shape_is_structural_error() {
    let err = AttributeSpec::from_json(&json!(42), &upgrade()).unwrap_err();
    assert_eq!(err.code(), "ERR_INVALID_ATTRIBUTE_SPEC");
}

#[test]
fn test_find_by_criteria_sentinels() {
    let snap = snapshot(vec![Entity::new().with("name", "a")], vec![]);

    let missing_attr = find_by_criteria(&snap, "host", &Criteria::new("name", "a"), "ip").unwrap();
    assert_eq!(missing_attr.to_string(), "ip attribute missing for name : a");

    let missing_entity =
        find_by_criteria(&snap, "host", &Criteria::new("name", "zz"), "ip").unwrap();
    assert_eq!(missing_entity.to_string(), "name : zz entity missing");
}

proptest! {
    #[test]
    fn prop_all_values_has_one_slot_per_entity(names in prop::collection::vec(prop::option::of("[a-z]{1,8}"), 0..20)) {
        let entities: Vec<Entity> = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let e = Entity::new().with("id", i as u64);
                match name {
                    Some(n) => e.with("name", n.as_str()),
                    None => e,
                }
            })
            .collect();
        let snap = snapshot(entities, vec![]);

        let values = find_all_attribute_values(&snap, "host", "name").unwrap();

        prop_assert_eq!(values.len(), names.len());
        for (got, expected) in values.iter().zip(&names) {
            prop_assert_eq!(got.cloned(), expected.clone().map(Value::String));
        }
    }

    #[test]
    fn prop_self_correlation_is_always_unchanged(ips in prop::collection::vec("[0-9.]{1,15}", 1..10)) {
        let hosts: Vec<Entity> = ips
            .iter()
            .enumerate()
            .map(|(i, ip)| host(&format!("h{}", i), ip))
            .collect();
        let snap = snapshot(hosts, vec![]);

        let results = cli_correlator()
            .correlate(&snap, &snap, "host", &AttributeSpec::same("ip"))
            .unwrap();

        prop_assert_eq!(results.len(), ips.len());
        prop_assert!(results.iter().all(Correlation::is_unchanged));
    }
}
