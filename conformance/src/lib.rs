//! BKB Explorer conformance suite.
//!
//! Structural validators over a built, filtered element set. Each validator
//! returns a [`ConformanceReport`]; [`run_all`] aggregates them for one view
//! and [`run_every_view`] repeats that for the unscoped graph and each view of
//! the loaded domain.
//!
//! # Conformance Scope
//!
//! | Validator | Rule |
//! |-----------|------|
//! | `elements/ids` | Node and edge ids are unique across both lists |
//! | `elements/endpoints` | Every edge endpoint names a node |
//! | `ghosts/exclusive` | No identity is both a ghost and a view member |
//! | `ghosts/isolated` | No edge joins two ghosts |
//! | `junctions/shape` | One trunk and two or more branches per junction |
//! | `visibility/bridges` | No transitive edge while the toggle is off |
//! | `visibility/endpoints` | Visible edges have visible endpoints |
//!
//! # Entry Point
//!
//! ```
//! use std::sync::Arc;
//!
//! use bkb_conformance::run_every_view;
//! use bkb_engine::Explorer;
//! use bkb_model::DomainData;
//!
//! let data = DomainData::from_json_str(r#"{
//!     "concepts": [
//!         {"name": "Order", "sources": [{"file": "Orders.cs"}]},
//!         {"name": "Customer", "sources": [{"file": "Parties.cs"}]}
//!     ],
//!     "relationships": [{"source_name": "Order", "target_name": "Customer"}]
//! }"#).unwrap();
//!
//! let mut explorer = Explorer::default();
//! explorer.install("Trading", Arc::new(data));
//! let report = run_every_view(&mut explorer);
//! assert!(report.all_passed());
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod report;
pub mod validators;

use anyhow::Context;
use bkb_engine::{DomainLoader, DomainSource, Explorer, Toggles};

pub use report::{ConformanceReport, Severity, TestResult};

/// Runs all validators against the explorer's current element set.
///
/// Validators are run in this order:
/// 1. Element ids and edge endpoints
/// 2. Ghost exclusivity and isolation
/// 3. Junction shape
/// 4. Visibility under the current toggles
#[must_use]
pub fn run_all(explorer: &Explorer) -> ConformanceReport {
    let set = explorer.elements();
    let mut report = ConformanceReport::new();

    // 1. Identity
    report.extend(validators::elements::validate(set));

    // 2. Ghosts
    report.extend(validators::ghosts::validate(set, explorer.view_index()));

    // 3. Junctions
    report.extend(validators::junctions::validate(set));

    // 4. Visibility
    report.extend(validators::visibility::validate(set, explorer.toggles()));

    report
}

/// Runs [`run_all`] for the unscoped graph and then for every view, tagging
/// results with the view id. The previously active view is restored.
pub fn run_every_view(explorer: &mut Explorer) -> ConformanceReport {
    let previous = explorer.active_view().map(str::to_string);
    let view_ids: Vec<String> = explorer.views().into_iter().map(|v| v.id).collect();

    let mut report = ConformanceReport::new();
    explorer.select_view(None);
    report.extend_for_view(None, run_all(explorer));
    for view in &view_ids {
        explorer.select_view(Some(view.as_str()));
        report.extend_for_view(Some(view.as_str()), run_all(explorer));
    }
    tracing::info!(
        domain = explorer.domain_path().unwrap_or("-"),
        views = view_ids.len(),
        failures = report.failure_count(),
        "conformance run finished"
    );

    explorer.select_view(previous.as_deref());
    report
}

/// Loads `domain_path` through `loader` and validates every view under
/// `toggles`.
///
/// # Errors
///
/// Returns an error if the domain cannot be loaded.
pub fn check_domain<S: DomainSource>(
    loader: &DomainLoader<S>,
    domain_path: &str,
    toggles: Toggles,
) -> anyhow::Result<ConformanceReport> {
    let mut explorer = Explorer::default();
    explorer.set_toggles(toggles);
    explorer
        .load(loader, domain_path)
        .with_context(|| format!("Failed to load domain {domain_path}"))?;
    Ok(run_every_view(&mut explorer))
}
