//! Line-oriented diff between two text bodies.
//!
//! Produces the classic marker listing (`"  "` unchanged, `"- "` removed,
//! `"+ "` added) over a longest-common-subsequence alignment computed in
//! linear space. Within a changed block removed lines come before added lines.

use serde::Serialize;
use std::fmt;

/// One line of a diff listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", content = "line", rename_all = "snake_case")]
pub enum DiffLine {
    Unchanged(String),
    Removed(String),
    Added(String),
}

impl DiffLine {
    pub fn marker(&self) -> char {
        match self {
            DiffLine::Unchanged(_) => ' ',
            DiffLine::Removed(_) => '-',
            DiffLine::Added(_) => '+',
        }
    }

    pub fn text(&self) -> &str {
        match self {
            DiffLine::Unchanged(t) | DiffLine::Removed(t) | DiffLine::Added(t) => t,
        }
    }

    pub fn is_change(&self) -> bool {
        !matches!(self, DiffLine::Unchanged(_))
    }

    /// Marker immediately followed by the text, e.g. `+X`
    pub fn compact(&self) -> String {
        format!("{}{}", self.marker(), self.text())
    }
}

impl fmt::Display for DiffLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.marker(), self.text())
    }
}

/// Diff `before` against `after` line by line
pub fn diff_lines(before: &str, after: &str) -> Vec<DiffLine> {
    let a: Vec<&str> = before.lines().collect();
    let b: Vec<&str> = after.lines().collect();

    // Common prefix and suffix need no alignment
    let prefix = a.iter().zip(&b).take_while(|(x, y)| x == y).count();
    let suffix = a[prefix..]
        .iter()
        .rev()
        .zip(b[prefix..].iter().rev())
        .take_while(|(x, y)| x == y)
        .count();

    let mid_a = &a[prefix..a.len() - suffix];
    let mid_b = &b[prefix..b.len() - suffix];

    let mut out: Vec<DiffLine> = a[..prefix]
        .iter()
        .map(|l| DiffLine::Unchanged(l.to_string()))
        .collect();
    out.extend(align(mid_a, mid_b));
    out.extend(
        a[a.len() - suffix..]
            .iter()
            .map(|l| DiffLine::Unchanged(l.to_string())),
    );
    out
}

fn align(a: &[&str], b: &[&str]) -> Vec<DiffLine> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    split_align(a, b, &mut out);
    removals_first(out)
}

/// Linear-space LCS alignment: split `a` in half, find where the optimal
/// alignment crosses `b`, recurse on both quadrants.
fn split_align(a: &[&str], b: &[&str], out: &mut Vec<DiffLine>) {
    if a.is_empty() {
        out.extend(b.iter().map(|l| DiffLine::Added(l.to_string())));
        return;
    }
    if b.is_empty() {
        out.extend(a.iter().map(|l| DiffLine::Removed(l.to_string())));
        return;
    }
    if a.len() == 1 {
        match b.iter().position(|l| *l == a[0]) {
            Some(j) => {
                out.extend(b[..j].iter().map(|l| DiffLine::Added(l.to_string())));
                out.push(DiffLine::Unchanged(a[0].to_string()));
                out.extend(b[j + 1..].iter().map(|l| DiffLine::Added(l.to_string())));
            }
            None => {
                out.push(DiffLine::Removed(a[0].to_string()));
                out.extend(b.iter().map(|l| DiffLine::Added(l.to_string())));
            }
        }
        return;
    }

    let mid = a.len() / 2;
    let forward = lcs_lengths(&a[..mid], b, false);
    let backward = lcs_lengths(&a[mid..], b, true);
    let m = b.len();
    let mut split = 0;
    let mut best = 0;
    for k in 0..=m {
        let total = forward[k] + backward[m - k];
        if total > best {
            best = total;
            split = k;
        }
    }

    split_align(&a[..mid], &b[..split], out);
    split_align(&a[mid..], &b[split..], out);
}

/// Last row of the LCS length table of `a` against every prefix of `b`
///
/// With `reverse` both inputs are read back to front, so entry `j` is the
/// LCS of `a` against the last `j` lines of `b`. Uses two rows of `b.len() + 1`.
fn lcs_lengths(a: &[&str], b: &[&str], reverse: bool) -> Vec<usize> {
    let (n, m) = (a.len(), b.len());
    let mut prev = vec![0usize; m + 1];
    let mut cur = vec![0usize; m + 1];
    for i in 0..n {
        let x = if reverse { a[n - 1 - i] } else { a[i] };
        for j in 1..=m {
            let y = if reverse { b[m - j] } else { b[j - 1] };
            cur[j] = if x == y {
                prev[j - 1] + 1
            } else {
                prev[j].max(cur[j - 1])
            };
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev
}

/// Reorder each run of changes so its removed lines precede its added lines
fn removals_first(lines: Vec<DiffLine>) -> Vec<DiffLine> {
    let mut out = Vec::with_capacity(lines.len());
    let mut added = Vec::new();
    for line in lines {
        match line {
            DiffLine::Removed(_) => out.push(line),
            DiffLine::Added(_) => added.push(line),
            DiffLine::Unchanged(_) => {
                out.append(&mut added);
                out.push(line);
            }
        }
    }
    out.append(&mut added);
    out
}

/// Render a diff as one marker-prefixed line per entry
pub fn render_listing(diff: &[DiffLine]) -> String {
    diff.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
