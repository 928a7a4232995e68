//! Two-stage template comparison: raw compare, then variant evaluation.

use crate::config::{CheckConfig, VariantRules};
use crate::diff::lines::{diff_lines, render_listing, DiffLine};
use crate::diff::model::{
    RawOutcome, TemplateBody, TemplateComparison, VariantMatch, VariantVerdict,
};
use crate::model::{TemplateKind, UpgradePath};

/// Compare two fetched template bodies without diffing them
///
/// A missing pre-upgrade body is reported ahead of a missing post-upgrade one.
pub fn raw_compare(
    before: &TemplateBody,
    after: &TemplateBody,
    upgrade: &UpgradePath,
) -> RawOutcome {
    match (before, after) {
        (TemplateBody::Missing { template }, _) => RawOutcome::Missing {
            culprit: template.clone(),
            version: upgrade.from_version.clone(),
        },
        (_, TemplateBody::Missing { template }) => RawOutcome::Missing {
            culprit: template.clone(),
            version: upgrade.to_version.clone(),
        },
        (TemplateBody::Present { text: pre, .. }, TemplateBody::Present { text: post, .. }) => {
            if pre.as_bytes() == post.as_bytes() {
                RawOutcome::Identical
            } else {
                RawOutcome::Differs {
                    before: pre.clone(),
                    after: post.clone(),
                }
            }
        }
    }
}

/// A rule covers a changed line when the marker-space-text form (`"+ X"`)
/// appears inside the rule text.
///
/// The compact form (`"+X"`) also counts, but only for lines with visible
/// text and only where it opens the rule or follows whitespace. A blank line
/// compacts to a bare marker, and a marker inside a word (`a+b`) is not a
/// diff marker.
fn rule_covers(rule: &str, line: &DiffLine) -> bool {
    if rule.contains(&line.to_string()) {
        return true;
    }
    if line.text().trim().is_empty() {
        return false;
    }
    let compact = line.compact();
    rule.match_indices(compact.as_str())
        .any(|(at, _)| rule[..at].chars().next_back().map_or(true, char::is_whitespace))
}

/// Evaluates template diffs against the approved variant rules.
#[derive(Debug, Clone)]
pub struct DiffEngine {
    rules: VariantRules,
    upgrade: UpgradePath,
}

impl DiffEngine {
    pub fn new(rules: VariantRules, upgrade: UpgradePath) -> Self {
        Self { rules, upgrade }
    }

    pub fn from_config(config: &CheckConfig) -> Self {
        Self::new(config.variant_rules.clone(), config.upgrade.clone())
    }

    pub fn raw_compare(&self, before: &TemplateBody, after: &TemplateBody) -> RawOutcome {
        raw_compare(before, after, &self.upgrade)
    }

    /// Diff `before` against `after` and decide whether the change is an expected variant
    ///
    /// Accepted as soon as any changed line is covered by any rule for `kind`.
    /// A rejected diff is logged in full at warn level for operator review.
    pub fn assert_variant(&self, kind: TemplateKind, before: &str, after: &str) -> VariantVerdict {
        let diff = diff_lines(before, after);
        let rules = self.rules.rules_for(kind);

        let added = diff.iter().filter(|l| matches!(l, DiffLine::Added(_)));
        let removed = diff.iter().filter(|l| matches!(l, DiffLine::Removed(_)));

        let mut matched = None;
        let mut unexplained = Vec::new();
        for line in added.chain(removed) {
            match rules.iter().find(|rule| rule_covers(rule, line)) {
                Some(rule) => {
                    if matched.is_none() {
                        matched = Some(VariantMatch {
                            line: line.clone(),
                            rule: rule.clone(),
                        });
                    }
                }
                None => unexplained.push(line.clone()),
            }
        }

        let accepted = matched.is_some();
        if accepted {
            tracing::debug!(
                template_kind = %kind,
                unexplained = unexplained.len(),
                "template diff accepted by variant rule"
            );
        } else {
            tracing::warn!(
                template_kind = %kind,
                diff = %render_listing(&diff),
                "template diff not covered by any variant rule"
            );
        }

        VariantVerdict {
            accepted,
            matched,
            unexplained,
            diff,
        }
    }

    /// Run both stages for one template
    pub fn evaluate(
        &self,
        kind: TemplateKind,
        before: &TemplateBody,
        after: &TemplateBody,
    ) -> TemplateComparison {
        let outcome = self.raw_compare(before, after);
        let verdict = match &outcome {
            RawOutcome::Differs { before, after } => {
                Some(self.assert_variant(kind, before, after))
            }
            _ => None,
        };
        TemplateComparison {
            kind,
            id: before.template().id.clone(),
            outcome,
            verdict,
        }
    }
}
