//! Junction shape validator: one trunk in, at least two branches out.

use std::collections::HashMap;

use bkb_engine::{EdgeKind, ElementSet};

use crate::report::{ConformanceReport, TestResult};

const MIN_BRANCHES: usize = 2;

/// Validates that every junction node has one trunk and two or more branches.
#[must_use]
pub fn validate(set: &ElementSet) -> ConformanceReport {
    let mut trunks: HashMap<&str, usize> = HashMap::new();
    let mut branches: HashMap<&str, usize> = HashMap::new();
    for edge in set.edges() {
        match edge.kind {
            EdgeKind::Trunk => *trunks.entry(edge.target.as_str()).or_default() += 1,
            EdgeKind::Branch => *branches.entry(edge.source.as_str()).or_default() += 1,
            _ => {}
        }
    }

    let mut count = 0;
    let mut malformed = Vec::new();
    for junction in set.nodes().filter(|n| n.is_junction()) {
        count += 1;
        let id = junction.id.as_str();
        let trunk = trunks.get(id).copied().unwrap_or(0);
        let branch = branches.get(id).copied().unwrap_or(0);
        if trunk != 1 || branch < MIN_BRANCHES {
            malformed.push(format!("{id}: {trunk} trunks, {branch} branches"));
        }
    }

    let mut report = ConformanceReport::new();
    report.push(TestResult::from_offenders(
        "junctions/shape",
        format!("{count} junctions are well formed"),
        format!("{} malformed junctions", malformed.len()),
        malformed,
    ));
    report
}
