//! Snapshot model: one record per tracked component type.
//!
//! The wire shape is a JSON list of single-key maps:
//!
//! ```json
//! [{"host": [{"id": "1", "name": "h1"}]}, {"subnet": [{"id": "3"}]}]
//! ```

use crate::errors::{ExError, ExErrorKind, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A full captured state of every tracked component type.
///
/// Component type names are unique within a snapshot. Order of records is
/// preserved from collection.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<ComponentRecord>", into = "Vec<ComponentRecord>")]
pub struct Snapshot {
    records: Vec<ComponentRecord>,
}

impl Snapshot {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot from records, rejecting duplicate component types
    ///
    /// # Errors
    ///
    /// `InvalidSnapshot` if two records share a type name (case-insensitive).
    pub fn from_records(records: Vec<ComponentRecord>) -> Result<Self> {
        let mut snapshot = Self::new();
        for record in records {
            snapshot.push(record)?;
        }
        Ok(snapshot)
    }

    /// Append a component record
    ///
    /// # Errors
    ///
    /// `InvalidSnapshot` if a record with the same type name already exists.
    pub fn push(&mut self, record: ComponentRecord) -> Result<()> {
        if self.component(&record.type_name).is_some() {
            return Err(ExError::new(ExErrorKind::InvalidSnapshot)
                .with_op("snapshot_push")
                .with_entity_id(record.type_name)
                .with_message("component type appears more than once in snapshot"));
        }
        self.records.push(record);
        Ok(())
    }

    /// Builder form of [`Snapshot::push`]
    ///
    /// # Errors
    ///
    /// Same as [`Snapshot::push`].
    pub fn with_record(mut self, record: ComponentRecord) -> Result<Self> {
        self.push(record)?;
        Ok(self)
    }

    /// Find a component record by type name (case-insensitive)
    pub fn component(&self, type_name: &str) -> Option<&ComponentRecord> {
        self.records
            .iter()
            .find(|r| r.type_name == type_name)
            .or_else(|| {
                self.records
                    .iter()
                    .find(|r| r.type_name.eq_ignore_ascii_case(type_name))
            })
    }

    pub fn records(&self) -> &[ComponentRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<ComponentRecord> {
        self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl TryFrom<Vec<ComponentRecord>> for Snapshot {
    type Error = ExError;

    fn try_from(records: Vec<ComponentRecord>) -> Result<Self> {
        Self::from_records(records)
    }
}

impl From<Snapshot> for Vec<ComponentRecord> {
    fn from(snapshot: Snapshot) -> Self {
        snapshot.records
    }
}

/// All entities of one component type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, Vec<Entity>>",
    into = "BTreeMap<String, Vec<Entity>>"
)]
pub struct ComponentRecord {
    pub type_name: String,
    pub entities: Vec<Entity>,
}

impl ComponentRecord {
    pub fn new(type_name: impl Into<String>, entities: Vec<Entity>) -> Self {
        Self {
            type_name: type_name.into(),
            entities,
        }
    }
}

impl TryFrom<BTreeMap<String, Vec<Entity>>> for ComponentRecord {
    type Error = String;

    fn try_from(map: BTreeMap<String, Vec<Entity>>) -> std::result::Result<Self, String> {
        if map.len() != 1 {
            return Err(format!(
                "component record must have exactly one component key, found {}",
                map.len()
            ));
        }
        let (type_name, entities) = map
            .into_iter()
            .next()
            .ok_or_else(|| "component record is empty".to_string())?;
        Ok(Self {
            type_name,
            entities,
        })
    }
}

impl From<ComponentRecord> for BTreeMap<String, Vec<Entity>> {
    fn from(record: ComponentRecord) -> Self {
        BTreeMap::from([(record.type_name, record.entities)])
    }
}

/// One concrete instance of a component type.
///
/// Attribute values are strings for CLI-collected snapshots and arbitrary
/// JSON (nested lists of sub-records, numbers...) for API-collected ones.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entity {
    attributes: BTreeMap<String, Value>,
}

impl Entity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style attribute insert
    pub fn with(mut self, attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(attribute, value);
        self
    }

    pub fn insert(&mut self, attribute: impl Into<String>, value: impl Into<Value>) {
        self.attributes.insert(attribute.into(), value.into());
    }

    /// Raw attribute value, JSON null included (case-insensitive name)
    pub fn get(&self, attribute: &str) -> Option<&Value> {
        self.attributes.get(attribute).or_else(|| {
            self.attributes
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(attribute))
                .map(|(_, v)| v)
        })
    }

    /// Attribute value if present and not JSON null
    pub fn present(&self, attribute: &str) -> Option<&Value> {
        self.get(attribute).filter(|v| !v.is_null())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.attributes.iter()
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

impl FromIterator<(String, Value)> for Entity {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            attributes: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Entity {
    type Item = (String, Value);
    type IntoIter = std::collections::btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.attributes.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn host(id: &str, name: &str) -> Entity {
        Entity::new().with("id", id).with("name", name)
    }

    #[test]
    fn test_wire_shape_is_list_of_single_key_maps() {
        let snapshot = Snapshot::new()
            .with_record(ComponentRecord::new("host", vec![host("1", "h1")]))
            .unwrap();
        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value, json!([{"host": [{"id": "1", "name": "h1"}]}]));
    }

    #[test]
    fn test_duplicate_component_rejected() {
        let result = Snapshot::from_records(vec![
            ComponentRecord::new("host", vec![]),
            ComponentRecord::new("HOST", vec![]),
        ]);
        assert_eq!(result.unwrap_err().kind(), ExErrorKind::InvalidSnapshot);
    }

    #[test]
    fn test_deserialize_rejects_multi_key_record() {
        let raw = json!([{"host": [], "subnet": []}]);
        assert!(serde_json::from_value::<Snapshot>(raw).is_err());
    }

    #[test]
    fn test_deserialize_rejects_duplicate_components() {
        let raw = json!([{"host": []}, {"host": []}]);
        assert!(serde_json::from_value::<Snapshot>(raw).is_err());
    }

    #[test]
    fn test_entity_lookup_is_case_insensitive() {
        let entity = Entity::new().with("Name", "h1");
        assert_eq!(entity.get("name"), Some(&json!("h1")));
        assert_eq!(entity.get("NAME"), Some(&json!("h1")));
    }

    #[test]
    fn test_present_skips_null() {
        let entity = Entity::new().with("ip", Value::Null);
        assert!(entity.get("ip").is_some());
        assert!(entity.present("ip").is_none());
    }

    #[test]
    fn test_nested_api_values_survive_round_trip() {
        let raw = json!([{"host": [{"id": 10, "interfaces": [{"id": 1, "type": "ipv4"}]}]}]);
        let snapshot: Snapshot = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&snapshot).unwrap(), raw);
    }
}
