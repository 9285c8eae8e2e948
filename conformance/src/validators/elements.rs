//! Element identity validator.
//!
//! Renderers key nodes and edges in one id space, so an id may appear once
//! across both lists. Every edge endpoint must name a node in the set.

use std::collections::HashSet;

use bkb_engine::ElementSet;

use crate::report::{ConformanceReport, TestResult};

/// Validates id uniqueness and endpoint resolution.
#[must_use]
pub fn validate(set: &ElementSet) -> ConformanceReport {
    let mut report = ConformanceReport::new();
    report.push(unique_ids(set));
    report.push(resolved_endpoints(set));
    report
}

fn unique_ids(set: &ElementSet) -> TestResult {
    let mut seen = HashSet::new();
    let duplicates: Vec<String> = set
        .nodes()
        .map(|n| n.id.as_str())
        .chain(set.edges().map(|e| e.id.as_str()))
        .filter(|id| !seen.insert(*id))
        .map(str::to_string)
        .collect();
    TestResult::from_offenders(
        "elements/ids",
        format!("{} element ids are unique", seen.len()),
        format!("{} duplicated element ids", duplicates.len()),
        duplicates,
    )
}

fn resolved_endpoints(set: &ElementSet) -> TestResult {
    let dangling: Vec<String> = set
        .edges()
        .filter(|e| !set.contains_node(&e.source) || !set.contains_node(&e.target))
        .map(|e| format!("{} ({} → {})", e.id, e.source, e.target))
        .collect();
    TestResult::from_offenders(
        "elements/endpoints",
        "every edge endpoint resolves",
        format!("{} edges point at missing nodes", dangling.len()),
        dangling,
    )
}
