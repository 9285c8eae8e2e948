//! Conformance runs over built domains.

use std::collections::BTreeSet;
use std::sync::Arc;

use bkb_conformance::{check_domain, run_all, run_every_view, Severity};
use bkb_engine::{DomainLoader, Explorer, FsSource, Toggle, Toggles};
use bkb_model::DomainData;
use pretty_assertions::assert_eq;

const TRADING: &str = r#"{
    "domain": {"name": "Trading", "path": "RBCZ:MIB:Trading"},
    "concepts": [
        {"name": "Order", "qname": "bkb:Order", "sources": [{"file": "Orders.cs"}]},
        {"name": "Buy", "sources": [{"file": "Orders.cs"}]},
        {"name": "Sell", "sources": [{"file": "Orders.cs"}]},
        {"name": "Customer", "sources": [{"file": "Parties.cs"}]},
        {"name": "Account", "type": "context_reference", "sources": [{"file": "Parties.cs"}]},
        {"name": "Ledger", "sources": [{"file": "Parties.cs"}]}
    ],
    "categorizations": [
        {"parent_name": "Order", "category_name": "side", "children_names": ["Buy", "Sell"]}
    ],
    "relationships": [
        {"source_name": "Order", "target_name": "Customer", "forward_verb": "is placed by"},
        {"source_name": "Customer", "target_name": "Account", "forward_verb": "owns"},
        {"source_name": "Account", "target_name": "Ledger", "forward_verb": "posts to"}
    ]
}"#;

fn explorer() -> Explorer {
    let mut explorer = Explorer::default();
    explorer.install(
        "RBCZ/MIB/Trading",
        Arc::new(DomainData::from_json_str(TRADING).unwrap()),
    );
    explorer
}

#[test]
fn every_view_conforms_under_every_single_toggle_flip() {
    let mut explorer = explorer();
    for toggle in Toggle::ALL {
        let mut toggles = Toggles::default();
        toggles.set(toggle, !toggles.get(toggle));
        explorer.set_toggles(toggles);
        let report = run_every_view(&mut explorer);
        let failures: Vec<_> = report.results.iter().filter(|r| r.is_failure()).collect();
        assert!(failures.is_empty(), "after flipping {toggle}: {failures:#?}");
    }
}

#[test]
fn results_are_tagged_per_view_and_view_is_restored() {
    let mut explorer = explorer();
    explorer.select_view(Some("Orders"));
    let report = run_every_view(&mut explorer);

    let views: BTreeSet<Option<&str>> = report.results.iter().map(|r| r.view.as_deref()).collect();
    assert_eq!(views, BTreeSet::from([None, Some("Orders"), Some("Parties")]));
    assert_eq!(explorer.active_view(), Some("Orders"));
}

#[test]
fn bridges_are_reported_while_enabled() {
    let mut explorer = explorer();
    explorer.set_toggles(Toggles {
        context: false,
        transitive: true,
        ..Toggles::default()
    });
    let report = run_all(&explorer);
    let bridges = report
        .results
        .iter()
        .find(|r| r.validator == "visibility/bridges")
        .unwrap();
    assert_eq!(bridges.severity, Severity::Pass);
    assert!(explorer.snapshot().shows_edge("transitive-Customer-Ledger"));
    assert!(report.all_passed());
}

#[test]
fn report_serializes_for_machine_consumers() {
    let report = run_all(&explorer());
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["results"][0]["validator"], "elements/ids");
    assert_eq!(json["results"][0]["severity"], "pass");
    assert!(json["results"][0].get("details").is_none());
}

#[test]
fn missing_domain_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let loader = DomainLoader::new(FsSource::new(dir.path()));
    let err = check_domain(&loader, "Nowhere", Toggles::default()).unwrap_err();
    assert!(err.to_string().contains("Nowhere"));
}

