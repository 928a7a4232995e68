//! Entity lookup inside a snapshot.
//!
//! Absence of an entity or attribute is an ordinary outcome here, reported
//! through [`Lookup`] rather than an error, so a caller can collect every
//! mismatch of a component in one pass.

use crate::errors::{CheckError, Result};
use crate::model::{ComponentRecord, Entity, Snapshot};
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Outcome of looking up one attribute of one entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum Lookup {
    /// The entity was found and carries the attribute
    Found(Value),
    /// An entity matched the criteria but lacks the attribute
    MissingAttribute {
        key: String,
        value: String,
        attribute: String,
    },
    /// No entity matched the criteria
    MissingEntity { key: String, value: String },
}

impl Lookup {
    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    pub fn is_missing(&self) -> bool {
        !self.is_found()
    }

    pub fn found(&self) -> Option<&Value> {
        match self {
            Lookup::Found(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for Lookup {
    /// Renders the found value, or the legacy sentinel wording for absence
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lookup::Found(value) => f.write_str(&value_key_string(value)),
            Lookup::MissingAttribute {
                key,
                value,
                attribute,
            } => write!(f, "{} attribute missing for {} : {}", attribute, key, value),
            Lookup::MissingEntity { key, value } => write!(f, "{} : {} entity missing", key, value),
        }
    }
}

/// Attribute to correlate entities by, together with the value sought.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Criteria {
    pub key: String,
    pub value: String,
}

impl Criteria {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// String form of a value used when matching criteria and in sentinels
///
/// Strings compare by content and numbers by their rendering, so the number
/// `1` matches criteria value `"1"`. Null renders as `None` and booleans as
/// `True`/`False`, the wording stored reports already carry.
pub fn value_key_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        other => other.to_string(),
    }
}

fn component<'a>(snapshot: &'a Snapshot, component_type: &str) -> Result<&'a ComponentRecord> {
    snapshot
        .component(&component_type.to_lowercase())
        .ok_or_else(|| {
            CheckError::UnknownComponent {
                component: component_type.to_string(),
            }
            .into()
        })
}

/// First non-null value of `attribute` across entities of `component_type`
///
/// # Errors
///
/// - `UnknownComponent` if the snapshot has no such component type
/// - `MissingData` ("no data for <attribute>") if no entity carries it
pub fn find_attribute<'a>(
    snapshot: &'a Snapshot,
    component_type: &str,
    attribute: &str,
) -> Result<&'a Value> {
    let attribute = attribute.to_lowercase();
    component(snapshot, component_type)?
        .entities
        .iter()
        .find_map(|entity| entity.present(&attribute))
        .ok_or_else(|| CheckError::NoData { attribute }.into())
}

/// Value of `attribute` for every entity of `component_type`, in entity order
///
/// Entities lacking the attribute (or holding JSON null) yield `None`, so the
/// result always has one slot per entity.
///
/// # Errors
///
/// `UnknownComponent` if the snapshot has no such component type.
pub fn find_all_attribute_values<'a>(
    snapshot: &'a Snapshot,
    component_type: &str,
    attribute: &str,
) -> Result<Vec<Option<&'a Value>>> {
    let attribute = attribute.to_lowercase();
    Ok(component(snapshot, component_type)?
        .entities
        .iter()
        .map(|entity| entity.present(&attribute))
        .collect())
}

fn matches_criteria(entity: &Entity, criteria: &Criteria) -> bool {
    entity.iter().any(|(key, value)| {
        key.eq_ignore_ascii_case(&criteria.key) && value_key_string(value) == criteria.value
    })
}

/// Value of `attribute` on the first entity whose `criteria.key` equals `criteria.value`
///
/// # Errors
///
/// `UnknownComponent` if the snapshot has no such component type. Entity or
/// attribute absence is reported in the returned [`Lookup`].
pub fn find_by_criteria(
    snapshot: &Snapshot,
    component_type: &str,
    criteria: &Criteria,
    attribute: &str,
) -> Result<Lookup> {
    let attribute = attribute.to_lowercase();
    let criteria = Criteria::new(criteria.key.to_lowercase(), criteria.value.clone());
    let record = component(snapshot, component_type)?;

    let lookup = match record
        .entities
        .iter()
        .find(|entity| matches_criteria(entity, &criteria))
    {
        Some(entity) => match entity.get(&attribute) {
            Some(value) => Lookup::Found(value.clone()),
            None => Lookup::MissingAttribute {
                key: criteria.key,
                value: criteria.value,
                attribute,
            },
        },
        None => Lookup::MissingEntity {
            key: criteria.key,
            value: criteria.value,
        },
    };
    Ok(lookup)
}
