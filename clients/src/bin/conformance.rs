//! `bkb-conformance`: Validates built element sets for every view of one or
//! all domains.
//!
//! Checks id uniqueness, edge endpoints, ghost exclusivity and isolation,
//! junction shape, and visibility consistency under the selected toggles.
//!
//! **Usage:**
//! ```
//! bkb-conformance [--root <dir>] [--domain <name>] [--hide <toggle>]...
//!                 [--show <toggle>]... [--config <file>] [--json]
//! ```
//!
//! Exits non-zero if any conformance check fails.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::process;

use anyhow::Result;
use bkb_clients::{init_tracing, print_json, SessionArgs};
use bkb_conformance::{check_domain, ConformanceReport, Severity};
use bkb_engine::{DomainLoader, FsSource};
use clap::Parser;

/// Run the BKB Explorer conformance suite.
#[derive(Parser)]
#[command(
    name = "bkb-conformance",
    about = "Validate BKB Explorer element sets for every view"
)]
struct Args {
    #[command(flatten)]
    session: SessionArgs,

    /// Write the report as JSON instead of text.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let toggles = args.session.config()?.toggles;
    let domains = match &args.session.domain {
        Some(_) => vec![args.session.domain_path()?],
        None => args.session.domain_paths()?,
    };

    let loader = DomainLoader::new(FsSource::new(&args.session.root));
    let mut report = ConformanceReport::new();
    for domain in &domains {
        let mut checked = check_domain(&loader, domain, toggles)?;
        for result in &mut checked.results {
            result.validator = format!("{domain}: {}", result.validator);
        }
        report.extend(checked);
    }

    if args.json {
        print_json(&report)?;
    } else {
        print_text(&report, domains.len());
    }

    let failed = report.failure_count();
    if failed > 0 {
        eprintln!("Conformance FAILED: {failed} check(s) did not pass.");
        process::exit(1);
    }
    Ok(())
}

fn print_text(report: &ConformanceReport, domains: usize) {
    println!("BKB Explorer Conformance Report");
    println!("===============================");
    println!();

    for result in &report.results {
        let view = result.view.as_deref().unwrap_or("all");
        println!(
            "[{}] {} [{view}] — {}",
            result.severity.tag(),
            result.validator,
            result.message
        );
        for detail in &result.details {
            println!("       {detail}");
        }
    }

    let passed = report
        .results
        .iter()
        .filter(|r| r.severity == Severity::Pass)
        .count();
    println!();
    println!(
        "Summary: {domains} domains, {passed} passed, {} warnings, {} failed",
        report.warning_count(),
        report.failure_count()
    );
    if report.all_passed() {
        println!("Conformance PASSED.");
    }
}
