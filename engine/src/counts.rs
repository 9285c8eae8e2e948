//! Filter counts: how many elements each toggle governs in the active view.
//!
//! Counts are potentials. They read the structure of the built element set
//! and ignore the current hidden flags, so changing a toggle never changes
//! them; only a view switch (which rebuilds the set) can.

use serde::Serialize;

use crate::classes;
use crate::elements::{Authority, EdgeKind, ElementSet, NodeSpec};
use crate::views::ViewIndex;

/// Per-toggle element counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FilterCounts {
    /// Non-context domain concepts.
    pub domain: usize,
    /// FIBO and OMG Commons externals.
    pub fibo: usize,
    /// Schema.org externals.
    pub schema: usize,
    /// Context concepts.
    pub context: usize,
    /// Concepts (ghosts included) with no edge at all.
    pub orphans: usize,
    /// Trunk and branch edges.
    pub categorizations: usize,
    /// Relationship and is-a edges.
    pub relationships: usize,
}

/// Counts `set` against the index's active view.
///
/// Junctions, properties and property types are not counted. An edge counts
/// when at least one endpoint is a member of the active view.
#[must_use]
pub fn filter_counts(set: &ElementSet, views: &ViewIndex) -> FilterCounts {
    let in_view = |node: &NodeSpec| node.membership_key().is_some_and(|key| views.in_active_view(key));
    let is_orphan = |node: &NodeSpec| {
        set.incident_edges(&node.id)
            .all(|e| e.kind == EdgeKind::Transitive)
    };

    let mut counts = FilterCounts::default();
    for node in set.nodes() {
        if node.is_junction() || node.is_property() || node.is_property_type() {
            continue;
        }
        if node.is_ghost() {
            counts.orphans += usize::from(is_orphan(node));
            continue;
        }
        if !in_view(node) {
            continue;
        }
        if node.is_external() {
            match node.authority() {
                Some(Authority::SchemaOrg) => counts.schema += 1,
                Some(Authority::Fibo | Authority::OmgCommons) => counts.fibo += 1,
                None => {}
            }
            continue;
        }
        if node.has_class(classes::CONTEXT) {
            counts.context += 1;
        } else {
            counts.domain += 1;
        }
        counts.orphans += usize::from(is_orphan(node));
    }

    for edge in set.edges() {
        let endpoint_in_view = |id: &str| set.node(id).is_some_and(|n| in_view(n));
        if views.active().is_some() && !endpoint_in_view(&edge.source) && !endpoint_in_view(&edge.target) {
            continue;
        }
        match edge.kind {
            EdgeKind::Trunk | EdgeKind::Branch => counts.categorizations += 1,
            EdgeKind::Relationship | EdgeKind::IsA => counts.relationships += 1,
            _ => {}
        }
    }

    tracing::debug!(?counts, "filter counts");
    counts
}
