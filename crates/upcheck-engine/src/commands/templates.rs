//! Template comparison across the upgrade.

use serde::Serialize;
use std::collections::BTreeSet;
use std::time::Instant;
use upcheck_core::diff::TemplateComparison;
use upcheck_core::{
    log_op_end, log_op_error, log_op_start, CheckConfig, DiffEngine, Result, SnapshotLabel,
    TemplateKind,
};
use upcheck_store::TemplateStore;

/// Evaluation of every stored template of one kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateRun {
    pub kind: TemplateKind,
    pub comparisons: Vec<TemplateComparison>,
}

impl TemplateRun {
    pub fn failures(&self) -> impl Iterator<Item = &TemplateComparison> {
        self.comparisons.iter().filter(|c| !c.passed())
    }

    pub fn passed(&self) -> bool {
        self.failures().next().is_none()
    }
}

/// Compare every template of `kind` present on either side of the upgrade.
///
/// Ids are visited in sorted order. A template stored on only one side is
/// reported as missing on the other.
///
/// # Errors
///
/// Storage failures other than an absent template body.
pub fn compare_templates(
    store: &dyn TemplateStore,
    config: &CheckConfig,
    kind: TemplateKind,
) -> Result<TemplateRun> {
    let start = Instant::now();
    log_op_start!("compare_templates", template_kind = kind.as_str());

    let result = compare_templates_inner(store, config, kind);

    match &result {
        Ok(run) => {
            log_op_end!(
                "compare_templates",
                duration_ms = start.elapsed().as_millis() as u64,
                template_kind = kind.as_str(),
                entity_count = run.comparisons.len(),
                mismatch_count = run.failures().count()
            );
        }
        Err(err) => {
            log_op_error!(
                "compare_templates",
                err.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                template_kind = kind.as_str()
            );
        }
    }
    result
}

fn compare_templates_inner(
    store: &dyn TemplateStore,
    config: &CheckConfig,
    kind: TemplateKind,
) -> Result<TemplateRun> {
    let mut ids: BTreeSet<String> = store
        .list_ids(SnapshotLabel::PreUpgrade, kind)?
        .into_iter()
        .collect();
    ids.extend(store.list_ids(SnapshotLabel::PostUpgrade, kind)?);

    let engine = DiffEngine::from_config(config);
    let mut comparisons = Vec::with_capacity(ids.len());
    for id in &ids {
        let before = store.fetch(SnapshotLabel::PreUpgrade, kind, id)?;
        let after = store.fetch(SnapshotLabel::PostUpgrade, kind, id)?;
        comparisons.push(engine.evaluate(kind, &before, &after));
    }
    Ok(TemplateRun { kind, comparisons })
}
