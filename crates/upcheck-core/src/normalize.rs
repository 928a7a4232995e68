//! Mode-aware normalization of freshly collected snapshots.
//!
//! CLI output is compared case-insensitively: every component name,
//! attribute name and string value is lower-cased, and rows that are really
//! tool warnings are dropped. API records are kept exactly as collected.
//! Apply this once, before persisting, so both sides of a comparison went
//! through the same step.

use crate::errors::Result;
use crate::model::{ComponentRecord, EndpointMode, Entity, Snapshot};
use serde_json::Value;

const WARNING_MARKER: &str = "warning:";

/// Normalize `snapshot` for `endpoint`
///
/// # Errors
///
/// `InvalidSnapshot` if lower-casing makes two component names collide.
pub fn normalize(snapshot: Snapshot, endpoint: EndpointMode) -> Result<Snapshot> {
    match endpoint {
        EndpointMode::Api => Ok(snapshot),
        EndpointMode::Cli => Snapshot::from_records(
            snapshot
                .into_records()
                .into_iter()
                .map(normalize_cli_record)
                .collect(),
        ),
    }
}

fn normalize_cli_record(record: ComponentRecord) -> ComponentRecord {
    let entities = record
        .entities
        .into_iter()
        .filter(|entity| !is_warning_row(entity))
        .map(|entity| {
            entity
                .into_iter()
                .map(|(k, v)| (k.to_lowercase(), lowercase_value(v)))
                .collect::<Entity>()
        })
        .collect();
    ComponentRecord::new(record.type_name.to_lowercase(), entities)
}

fn is_warning_row(entity: &Entity) -> bool {
    entity
        .iter()
        .any(|(k, _)| k.to_lowercase().contains(WARNING_MARKER))
}

fn lowercase_value(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(s.to_lowercase()),
        Value::Array(items) => Value::Array(items.into_iter().map(lowercase_value).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k.to_lowercase(), lowercase_value(v)))
                .collect(),
        ),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw() -> Snapshot {
        Snapshot::from_records(vec![ComponentRecord::new(
            "Host",
            vec![
                Entity::new().with("Name", "Web01.Example.COM").with("ID", 3),
                Entity::new().with("Warning: deprecated option", "x"),
            ],
        )])
        .unwrap()
    }

    #[test]
    fn test_cli_lowercases_and_drops_warnings() {
        let out = normalize(raw(), EndpointMode::Cli).unwrap();
        let host = out.component("host").unwrap();
        assert_eq!(host.type_name, "host");
        assert_eq!(host.entities.len(), 1);
        assert_eq!(host.entities[0].get("name"), Some(&json!("web01.example.com")));
        assert_eq!(host.entities[0].get("id"), Some(&json!(3)));
    }

    #[test]
    fn test_api_is_identity() {
        let out = normalize(raw(), EndpointMode::Api).unwrap();
        assert_eq!(out, raw());
    }

    #[test]
    fn test_cli_lowercases_nested_values() {
        let snap = Snapshot::from_records(vec![ComponentRecord::new(
            "host",
            vec![Entity::new().with("interfaces", json!([{"Type": "IPv4"}]))],
        )])
        .unwrap();
        let out = normalize(snap, EndpointMode::Cli).unwrap();
        let host = out.component("host").unwrap();
        assert_eq!(
            host.entities[0].get("interfaces"),
            Some(&json!([{"type": "ipv4"}]))
        );
    }
}
