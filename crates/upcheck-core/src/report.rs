//! Human-readable Markdown reports for operator review.
//!
//! Informational only; pass/fail is decided by the structured results.

use crate::correlator::Correlation;
use crate::diff::lines::render_listing;
use crate::diff::model::{RawOutcome, TemplateComparison};
use crate::model::TemplateKind;

/// Render the correlation results of one component attribute
pub fn render_entity_report(component: &str, attribute: &str, results: &[Correlation]) -> String {
    let mut out = String::new();
    out.push_str(&format!("## Entities: `{}` / `{}`\n\n", component, attribute));

    let unchanged = results.iter().filter(|c| c.is_unchanged()).count();
    out.push_str(&format!(
        "**Entities**: {}  \n**Unchanged**: {}  \n**Mismatched**: {}\n\n",
        results.len(),
        unchanged,
        results.len() - unchanged
    ));

    if unchanged == results.len() {
        out.push_str("_No differences detected._\n");
        return out;
    }

    out.push_str("| Key | Before | After |\n|---|---|---|\n");
    for correlation in results.iter().filter(|c| !c.is_unchanged()) {
        let (before, after) = correlation.legacy_pair();
        out.push_str(&format!(
            "| `{}` | {} | {} |\n",
            correlation.key(),
            cell(&before),
            cell(&after)
        ));
    }
    out
}

/// Render the template comparisons of one kind
pub fn render_template_report(kind: TemplateKind, results: &[TemplateComparison]) -> String {
    let mut out = String::new();
    out.push_str(&format!("## Templates: `{}`\n\n", kind));

    let passed = results.iter().filter(|c| c.passed()).count();
    out.push_str(&format!(
        "**Templates**: {}  \n**Passed**: {}  \n**Failed**: {}\n\n",
        results.len(),
        passed,
        results.len() - passed
    ));

    for cmp in results {
        match &cmp.outcome {
            RawOutcome::Identical => {}
            RawOutcome::Missing { culprit, version } => {
                out.push_str(&format!(
                    "- `{}`: **missing** in Version {} (`{}`)\n",
                    cmp.id, version, culprit
                ));
            }
            RawOutcome::Differs { .. } => {
                let Some(verdict) = &cmp.verdict else {
                    continue;
                };
                if let Some(m) = &verdict.matched {
                    out.push_str(&format!(
                        "- `{}`: accepted variant `{}` ({} unexplained)\n",
                        cmp.id,
                        m.line,
                        verdict.unexplained.len()
                    ));
                } else {
                    out.push_str(&format!(
                        "- `{}`: **rejected**\n\n```diff\n{}\n```\n",
                        cmp.id,
                        render_listing(&verdict.diff)
                    ));
                }
            }
        }
    }
    out
}

/// Escape a value for a Markdown table cell
fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
