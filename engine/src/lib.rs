//! BKB Explorer graph derivation engine.
//!
//! Turns one domain payload into a renderable, filterable graph. The
//! pipeline is the same for every domain:
//!
//! | Stage | Module |
//! |-------|--------|
//! | Name → qname resolution | [`identity`] |
//! | View derivation from source provenance | [`views`] |
//! | Nodes, edges, ghosts and junctions | [`builder`], [`ghost`], [`elements`] |
//! | Toggle and view visibility | [`visibility`], [`counts`] |
//! | Bridges over hidden intermediates | [`transitive`] |
//!
//! Around the pipeline sit the payload [`loader`], the [`explorer`] session
//! that ties everything together, and the renderer-facing helpers
//! ([`style`], [`search`], [`expand`]).
//!
//! Only loading can fail. Inside the pipeline, malformed records are skipped
//! and unresolved names fall back to themselves.
//!
//! # Entry Point
//!
//! ```
//! use std::sync::Arc;
//!
//! use bkb_engine::{Explorer, Toggle};
//! use bkb_model::DomainData;
//!
//! let data = DomainData::from_json_str(r#"{
//!     "concepts": [{"name": "Account"}, {"name": "Savings"}, {"name": "Current"}],
//!     "categorizations": [
//!         {"parent_name": "Account", "category_name": "by product", "children_names": ["Savings", "Current"]}
//!     ]
//! }"#).unwrap();
//!
//! let mut explorer = Explorer::default();
//! explorer.install("Demo", Arc::new(data));
//! assert!(explorer.snapshot().shows_node("junction-Account-by_product"));
//!
//! explorer.set_toggle(Toggle::Categorizations, false);
//! let snapshot = explorer.snapshot();
//! assert!(!snapshot.shows_node("junction-Account-by_product"));
//! assert!(!snapshot.shows_node("Savings"));
//! assert!(snapshot.shows_node("Account"));
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod builder;
pub mod classes;
pub mod config;
pub mod counts;
pub mod elements;
pub mod error;
pub mod expand;
pub mod explorer;
pub mod ghost;
pub mod identity;
pub mod loader;
pub mod search;
pub mod style;
pub mod subtypes;
pub mod transitive;
pub mod views;
pub mod visibility;

pub use builder::build;
pub use config::ExplorerConfig;
pub use counts::{filter_counts, FilterCounts};
pub use elements::{Authority, EdgeKind, EdgeSpec, ElementSet, NodeDetail, NodeSpec};
pub use error::{ConfigError, LoadError};
pub use explorer::{Explorer, ViewAction};
pub use identity::IdentityMap;
pub use loader::{discover_domains, read_index, DomainLoader, DomainSource, FsSource};
pub use transitive::compute_transitive_edges;
pub use views::{ViewIndex, ViewSummary};
pub use visibility::{apply_filter, compute_visibility, Toggle, Toggles, VisibilitySnapshot};
