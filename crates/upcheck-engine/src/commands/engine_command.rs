//! Engine-level comparison commands.

use crate::commands::entities::{compare_entities, EntityComparison};
use crate::commands::templates::{compare_templates, TemplateRun};
use upcheck_core::{AttributeSpec, CheckConfig, Result, TemplateKind};
use upcheck_store::{SnapshotStore, TemplateStore};

/// Engine-level commands that read persisted artifacts.
#[derive(Debug, Clone)]
pub enum EngineCommand {
    /// Correlate one attribute of a component type across the upgrade.
    CompareEntities {
        component: String,
        attribute: AttributeSpec,
    },
    /// Diff every stored template of a kind.
    CompareTemplates { kind: TemplateKind },
}

/// Result of applying an engine command.
#[derive(Debug, Clone)]
pub enum EngineCommandResult {
    Entities(EntityComparison),
    Templates(TemplateRun),
}

impl EngineCommandResult {
    /// True when nothing needs operator attention
    pub fn passed(&self) -> bool {
        match self {
            EngineCommandResult::Entities(c) => c.passed(),
            EngineCommandResult::Templates(r) => r.passed(),
        }
    }

    /// Markdown report for the result
    pub fn render_report(&self) -> String {
        match self {
            EngineCommandResult::Entities(c) => upcheck_core::report::render_entity_report(
                &c.component,
                &attribute_label(&c.attribute),
                &c.correlations,
            ),
            EngineCommandResult::Templates(r) => {
                upcheck_core::report::render_template_report(r.kind, &r.comparisons)
            }
        }
    }
}

fn attribute_label(attribute: &AttributeSpec) -> String {
    match attribute {
        AttributeSpec::Same(name) => name.clone(),
        AttributeSpec::PerVersion(names) => names
            .iter()
            .map(|(version, name)| format!("{}={}", version, name))
            .collect::<Vec<_>>()
            .join(","),
    }
}

/// Apply an engine command against the given stores.
///
/// # Errors
///
/// Whatever the underlying comparison returns.
pub fn apply_engine_command(
    cmd: EngineCommand,
    config: &CheckConfig,
    snapshots: &dyn SnapshotStore,
    templates: &dyn TemplateStore,
) -> Result<EngineCommandResult> {
    match cmd {
        EngineCommand::CompareEntities {
            component,
            attribute,
        } => compare_entities(snapshots, config, &component, &attribute)
            .map(EngineCommandResult::Entities),
        EngineCommand::CompareTemplates { kind } => {
            compare_templates(templates, config, kind).map(EngineCommandResult::Templates)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_label_per_version() {
        let spec = AttributeSpec::per_version([("6.1", "os"), ("6.2", "operatingsystem")]);
        assert_eq!(attribute_label(&spec), "6.1=os,6.2=operatingsystem");
        assert_eq!(attribute_label(&AttributeSpec::same("ip")), "ip");
    }
}
