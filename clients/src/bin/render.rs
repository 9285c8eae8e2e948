//! `bkb-render`: Builds one domain view and writes the renderable graph as
//! JSON to stdout.
//!
//! **Output:** `{domain, view, breadcrumb, toggles, counts, elements}` where
//! `elements` is `{nodes, edges}` with a `visible` flag per element. With
//! `--visible-only` the visibility snapshot (visible ids and bridges) is
//! written instead of the full element list.
//!
//! **Usage:**
//! ```
//! bkb-render [--root <dir>] [--domain <name>] [--view <view>]
//!            [--hide <toggle>]... [--show <toggle>]... [--config <file>]
//!            [--search <query>] [--expand <node>]... [--visible-only]
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use anyhow::Result;
use bkb_clients::{init_tracing, print_json, SessionArgs};
use bkb_engine::{ElementSet, FilterCounts, Toggles, VisibilitySnapshot};
use clap::Parser;
use serde::Serialize;

/// Render a BKB domain graph as JSON.
#[derive(Parser)]
#[command(name = "bkb-render", about = "Render a BKB domain graph as JSON")]
struct Args {
    #[command(flatten)]
    session: SessionArgs,

    /// Highlight nodes whose name contains this text.
    #[arg(long)]
    search: Option<String>,

    /// Expand a node's subtypes before rendering (repeatable).
    #[arg(long, value_name = "NODE")]
    expand: Vec<String>,

    /// Write only the visibility snapshot.
    #[arg(long)]
    visible_only: bool,
}

#[derive(Serialize)]
struct Rendered<'a> {
    domain: Option<&'a str>,
    view: Option<&'a str>,
    breadcrumb: Vec<String>,
    toggles: &'a Toggles,
    counts: FilterCounts,
    elements: &'a ElementSet,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let mut explorer = args.session.open()?;
    for node in &args.expand {
        if !explorer.expand(node) {
            tracing::warn!(node = %node, "nothing to expand");
        }
    }
    if let Some(query) = &args.search {
        let hits = explorer.highlight(query);
        tracing::info!(query = %query, hits, "highlighted nodes");
    }

    if args.visible_only {
        let snapshot: VisibilitySnapshot = explorer.snapshot();
        return print_json(&snapshot);
    }

    print_json(&Rendered {
        domain: explorer.domain_path(),
        view: explorer.active_view(),
        breadcrumb: explorer.breadcrumb(),
        toggles: explorer.toggles(),
        counts: explorer.filter_counts(),
        elements: explorer.elements(),
    })
}
