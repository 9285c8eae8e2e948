//! `bkb-views`: Lists domains, or the views of one domain, as JSON.
//!
//! Without `--domain` every loadable domain path under the root is listed.
//! With `--domain` the domain is loaded and its views are listed as
//! `{id, name, concept_count}` sorted by display name. With `--open <view>`
//! the navigation decision for selecting that view is printed instead.
//!
//! **Usage:**
//! ```
//! bkb-views [--root <dir>] [--domain <name>] [--open <view> [--under <path>]]
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
use clap::Parser;

/// List BKB domains and views.
#[derive(Parser)]
#[command(name = "bkb-views", about = "List BKB domains and their views")]
struct Args {
    #[command(flatten)]
    session: SessionArgs,

    /// View to decide navigation for.
    #[arg(long, requires = "domain")]
    open: Option<String>,

    /// Domain path the `--open` view is listed under.
    #[arg(long, requires = "open")]
    under: Option<String>,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    if args.session.domain.is_none() {
        return print_json(&args.session.domain_paths()?);
    }

    let explorer = args.session.open()?;
    match &args.open {
        Some(view) => print_json(&explorer.view_action(args.under.as_deref(), view)),
        None => print_json(&explorer.views()),
    }
}
