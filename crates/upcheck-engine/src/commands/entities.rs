//! Entity comparison across the upgrade.

use serde::Serialize;
use std::time::Instant;
use upcheck_core::{
    log_op_end, log_op_error, log_op_start, AttributeSpec, CheckConfig, Correlation, Correlator,
    Result, SnapshotLabel,
};
use upcheck_store::SnapshotStore;

/// Correlated values of one attribute for every pre-upgrade entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityComparison {
    pub component: String,
    pub attribute: AttributeSpec,
    pub correlations: Vec<Correlation>,
}

impl EntityComparison {
    /// Correlations that are missing or whose values changed
    pub fn mismatches(&self) -> impl Iterator<Item = &Correlation> {
        self.correlations.iter().filter(|c| !c.is_unchanged())
    }

    pub fn passed(&self) -> bool {
        self.mismatches().next().is_none()
    }
}

/// Load both snapshots for the configured endpoint and correlate them.
///
/// # Errors
///
/// `NotFound` if either snapshot is absent, plus any correlation error
/// (unknown component, missing key attribute, bad attribute spec).
pub fn compare_entities(
    store: &dyn SnapshotStore,
    config: &CheckConfig,
    component: &str,
    attribute: &AttributeSpec,
) -> Result<EntityComparison> {
    let start = Instant::now();
    log_op_start!("compare_entities", entity_type = component);

    let result = compare_entities_inner(store, config, component, attribute);

    match &result {
        Ok(comparison) => {
            log_op_end!(
                "compare_entities",
                duration_ms = start.elapsed().as_millis() as u64,
                entity_type = component,
                mismatch_count = comparison.mismatches().count()
            );
        }
        Err(err) => {
            log_op_error!(
                "compare_entities",
                err.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                entity_type = component
            );
        }
    }
    result
}

fn compare_entities_inner(
    store: &dyn SnapshotStore,
    config: &CheckConfig,
    component: &str,
    attribute: &AttributeSpec,
) -> Result<EntityComparison> {
    let before = store.get(SnapshotLabel::PreUpgrade, config.endpoint)?;
    let after = store.get(SnapshotLabel::PostUpgrade, config.endpoint)?;
    let correlations =
        Correlator::from_config(config).correlate(&before, &after, component, attribute)?;
    Ok(EntityComparison {
        component: component.to_string(),
        attribute: attribute.clone(),
        correlations,
    })
}
