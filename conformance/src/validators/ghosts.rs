//! Ghost validator.
//!
//! A concept is either a member of the active view or a ghost, never both,
//! and ghosts only ever attach to view members.

use std::collections::HashSet;

use bkb_engine::{ElementSet, ViewIndex};

use crate::report::{ConformanceReport, TestResult};

/// Validates ghost exclusivity and ghost-to-ghost isolation.
#[must_use]
pub fn validate(set: &ElementSet, views: &ViewIndex) -> ConformanceReport {
    let mut report = ConformanceReport::new();
    report.push(exclusive(set, views));
    report.push(isolated(set));
    report
}

fn exclusive(set: &ElementSet, views: &ViewIndex) -> TestResult {
    let ghost_keys: HashSet<&str> = set
        .nodes()
        .filter(|n| n.is_ghost())
        .filter_map(|n| n.membership_key())
        .collect();
    let mut offenders: Vec<String> = set
        .nodes()
        .filter(|n| !n.is_ghost())
        .filter_map(|n| n.membership_key())
        .filter(|key| ghost_keys.contains(key))
        .map(|key| format!("{key}: ghost and member"))
        .collect();
    if let Some(view) = views.active() {
        offenders.extend(
            ghost_keys
                .iter()
                .filter(|key| views.is_member(key, view))
                .map(|key| format!("{key}: ghost inside {view}")),
        );
    }
    offenders.sort();
    TestResult::from_offenders(
        "ghosts/exclusive",
        format!("{} ghosts lie outside the view", ghost_keys.len()),
        format!("{} ghost identities collide", offenders.len()),
        offenders,
    )
}

fn isolated(set: &ElementSet) -> TestResult {
    let ghosts: HashSet<&str> = set
        .nodes()
        .filter(|n| n.is_ghost())
        .map(|n| n.id.as_str())
        .collect();
    let linked: Vec<String> = set
        .edges()
        .filter(|e| ghosts.contains(e.source.as_str()) && ghosts.contains(e.target.as_str()))
        .map(|e| e.id.clone())
        .collect();
    TestResult::from_offenders(
        "ghosts/isolated",
        "no edge joins two ghosts",
        format!("{} ghost-to-ghost edges", linked.len()),
        linked,
    )
}
