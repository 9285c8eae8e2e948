//! Visibility validator, run over a filtered element set.

use bkb_engine::{EdgeKind, ElementSet, Toggles};

use crate::report::{ConformanceReport, TestResult};

/// Validates bridge gating and that no visible edge dangles from a hidden node.
#[must_use]
pub fn validate(set: &ElementSet, toggles: &Toggles) -> ConformanceReport {
    let mut report = ConformanceReport::new();

    let bridges: Vec<String> = set
        .edges()
        .filter(|e| e.kind == EdgeKind::Transitive)
        .map(|e| e.id.clone())
        .collect();
    report.push(if toggles.transitive {
        TestResult::pass(
            "visibility/bridges",
            format!("{} bridges while enabled", bridges.len()),
        )
    } else {
        TestResult::from_offenders(
            "visibility/bridges",
            "no bridges while disabled",
            format!("{} bridges while disabled", bridges.len()),
            bridges,
        )
    });

    let shown = |id: &str| set.node(id).is_some_and(|n| !n.hidden);
    let stranded: Vec<String> = set
        .visible_edges()
        .filter(|e| !shown(&e.source) || !shown(&e.target))
        .map(|e| e.id.clone())
        .collect();
    report.push(TestResult::from_offenders(
        "visibility/endpoints",
        "visible edges have visible endpoints",
        format!("{} visible edges touch hidden nodes", stranded.len()),
        stranded,
    ));

    if set.nodes().all(|n| n.hidden) && set.node_count() > 0 {
        report.push(TestResult::warn(
            "visibility/empty",
            "every node is hidden under the current toggles",
        ));
    }
    report
}
