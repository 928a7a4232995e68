//! Correlation of entities across the pre- and post-upgrade snapshots.
//!
//! Entities are matched by the value of a key attribute rather than by
//! position, since collections may be reordered or partially lost.

use crate::config::{CheckConfig, KeyAttributeTable};
use crate::errors::Result;
use crate::locator::{
    find_all_attribute_values, find_by_criteria, value_key_string, Criteria, Lookup,
};
use crate::model::{AttributeSpec, EndpointMode, Snapshot, SnapshotLabel, UpgradePath};
use crate::{log_op_end, log_op_error, log_op_start};
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;

/// One correlated entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Correlation {
    /// Entity found on both sides; values are for the caller to compare
    Pair {
        key: String,
        before: Value,
        after: Value,
    },
    /// Entity or attribute absent on `side`
    Missing {
        key: String,
        side: SnapshotLabel,
        lookup: Lookup,
    },
}

impl Correlation {
    pub fn key(&self) -> &str {
        match self {
            Correlation::Pair { key, .. } | Correlation::Missing { key, .. } => key,
        }
    }

    /// True when both sides hold the same value
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Correlation::Pair { before, after, .. } if before == after)
    }

    /// `(before, after)` rendered as strings, or `(sentinel, " in <side> version")`
    pub fn legacy_pair(&self) -> (String, String) {
        match self {
            Correlation::Pair { before, after, .. } => {
                (value_key_string(before), value_key_string(after))
            }
            Correlation::Missing { side, lookup, .. } => {
                (lookup.to_string(), format!(" in {} version", side))
            }
        }
    }
}

/// Pairs attribute values of matching entities across two snapshots.
#[derive(Debug, Clone)]
pub struct Correlator {
    endpoint: EndpointMode,
    key_attributes: KeyAttributeTable,
    upgrade: UpgradePath,
}

impl Correlator {
    pub fn new(
        endpoint: EndpointMode,
        key_attributes: KeyAttributeTable,
        upgrade: UpgradePath,
    ) -> Self {
        Self {
            endpoint,
            key_attributes,
            upgrade,
        }
    }

    pub fn from_config(config: &CheckConfig) -> Self {
        Self::new(
            config.endpoint,
            config.key_attributes.clone(),
            config.upgrade.clone(),
        )
    }

    pub fn endpoint(&self) -> EndpointMode {
        self.endpoint
    }

    /// Correlate every `component` entity of `before` with its counterpart in `after`
    ///
    /// The output has one entry per pre-upgrade entity, in pre-upgrade order.
    /// Entities added by the upgrade are not reported.
    ///
    /// # Errors
    ///
    /// - `InvalidConfig` if no key attribute is declared for the component
    /// - `InvalidAttributeSpec` if `attribute` does not cover the upgrade path
    /// - `UnknownComponent` if either snapshot lacks the component type
    pub fn correlate(
        &self,
        before: &Snapshot,
        after: &Snapshot,
        component: &str,
        attribute: &AttributeSpec,
    ) -> Result<Vec<Correlation>> {
        let start = Instant::now();
        log_op_start!(
            "correlate",
            entity_type = component,
            endpoint = self.endpoint.as_str()
        );

        match self.correlate_inner(before, after, component, attribute) {
            Ok(correlations) => {
                let mismatches = correlations.iter().filter(|c| !c.is_unchanged()).count();
                log_op_end!(
                    "correlate",
                    duration_ms = start.elapsed().as_millis() as u64,
                    entity_type = component,
                    entity_count = correlations.len(),
                    mismatch_count = mismatches
                );
                Ok(correlations)
            }
            Err(err) => {
                log_op_error!(
                    "correlate",
                    err.clone(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    entity_type = component
                );
                Err(err)
            }
        }
    }

    fn correlate_inner(
        &self,
        before: &Snapshot,
        after: &Snapshot,
        component: &str,
        attribute: &AttributeSpec,
    ) -> Result<Vec<Correlation>> {
        let names = attribute.resolve(&self.upgrade)?;
        let key_attribute = self.key_attributes.key_for(self.endpoint, component)?;

        let keys: Vec<String> = find_all_attribute_values(before, component, &key_attribute)?
            .into_iter()
            .map(|k| value_key_string(k.unwrap_or(&Value::Null)))
            .collect();

        let mut correlations = Vec::with_capacity(keys.len());
        for key in keys {
            let criteria = Criteria::new(key_attribute.as_str(), key.as_str());
            let pre = find_by_criteria(before, component, &criteria, &names.before)?;
            let post = find_by_criteria(after, component, &criteria, &names.after)?;

            let correlation = match (pre, post) {
                (Lookup::Found(before), Lookup::Found(after)) => {
                    Correlation::Pair { key, before, after }
                }
                (pre, _) if pre.is_missing() => Correlation::Missing {
                    key,
                    side: SnapshotLabel::PreUpgrade,
                    lookup: pre,
                },
                (_, post) => Correlation::Missing {
                    key,
                    side: SnapshotLabel::PostUpgrade,
                    lookup: post,
                },
            };
            correlations.push(correlation);
        }
        Ok(correlations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ComponentRecord, Entity};
    use serde_json::json;

    fn path() -> UpgradePath {
        UpgradePath::new(vec!["6.1".into(), "6.2".into()], "6.1", "6.2").unwrap()
    }

    fn hosts(entities: Vec<Entity>) -> Snapshot {
        Snapshot::from_records(vec![ComponentRecord::new("host", entities)]).unwrap()
    }

    fn correlator() -> Correlator {
        Correlator::new(
            EndpointMode::Cli,
            KeyAttributeTable::new().with("host", "name"),
            path(),
        )
    }

    #[test]
    fn test_reordered_entities_still_pair() {
        let before = hosts(vec![
            Entity::new().with("name", "a").with("ip", "1"),
            Entity::new().with("name", "b").with("ip", "2"),
        ]);
        let after = hosts(vec![
            Entity::new().with("name", "b").with("ip", "2"),
            Entity::new().with("name", "a").with("ip", "1"),
        ]);
        let out = correlator()
            .correlate(&before, &after, "host", &AttributeSpec::same("ip"))
            .unwrap();
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(Correlation::is_unchanged));
        assert_eq!(out[0].key(), "a");
    }

    #[test]
    fn test_entity_lost_after_upgrade_reports_post_side() {
        let before = hosts(vec![Entity::new().with("name", "a").with("ip", "1")]);
        let after = hosts(vec![]);
        let out = correlator()
            .correlate(&before, &after, "host", &AttributeSpec::same("ip"))
            .unwrap();
        let (culprit, tag) = out[0].legacy_pair();
        assert_eq!(culprit, "name : a entity missing");
        assert_eq!(tag, " in postupgrade version");
    }

    #[test]
    fn test_before_side_wins_tie_break() {
        // Entity lacks the key attribute so it is missing on both sides
        let before = hosts(vec![Entity::new().with("ip", "1")]);
        let after = hosts(vec![]);
        let out = correlator()
            .correlate(&before, &after, "host", &AttributeSpec::same("ip"))
            .unwrap();
        assert!(matches!(
            out[0],
            Correlation::Missing {
                side: SnapshotLabel::PreUpgrade,
                ..
            }
        ));
    }

    #[test]
    fn test_renamed_attribute_is_looked_up_per_side() {
        let before = hosts(vec![Entity::new().with("name", "a").with("id", "7")]);
        let after = hosts(vec![Entity::new().with("name", "a").with("uuid", "7")]);
        let spec = AttributeSpec::per_version([("6.1", "id"), ("6.2", "uuid")]);
        let out = correlator().correlate(&before, &after, "host", &spec).unwrap();
        assert_eq!(
            out[0],
            Correlation::Pair {
                key: "a".to_string(),
                before: json!("7"),
                after: json!("7"),
            }
        );
    }

    #[test]
    fn test_changed_value_is_not_unchanged() {
        let before = hosts(vec![Entity::new().with("name", "a").with("ip", "1")]);
        let after = hosts(vec![Entity::new().with("name", "a").with("ip", "9")]);
        let out = correlator()
            .correlate(&before, &after, "host", &AttributeSpec::same("ip"))
            .unwrap();
        assert!(!out[0].is_unchanged());
        assert_eq!(out[0].legacy_pair(), ("1".to_string(), "9".to_string()));
    }

    #[test]
    fn test_api_mode_correlates_by_id() {
        let c = Correlator::new(EndpointMode::Api, KeyAttributeTable::new(), path());
        let before = hosts(vec![Entity::new().with("id", 5).with("name", "x")]);
        let after = hosts(vec![Entity::new().with("id", 5).with("name", "x")]);
        let out = c
            .correlate(&before, &after, "host", &AttributeSpec::same("name"))
            .unwrap();
        assert_eq!(out[0].key(), "5");
        assert!(out[0].is_unchanged());
    }

    #[test]
    fn test_entity_without_key_reports_none_key() {
        let before = hosts(vec![Entity::new().with("ip", "1")]);
        let after = hosts(vec![Entity::new().with("ip", "1")]);
        let out = correlator()
            .correlate(&before, &after, "host", &AttributeSpec::same("ip"))
            .unwrap();
        assert_eq!(out[0].key(), "None");
        let (culprit, tag) = out[0].legacy_pair();
        assert_eq!(culprit, "name : None entity missing");
        assert_eq!(tag, " in preupgrade version");
    }
}
