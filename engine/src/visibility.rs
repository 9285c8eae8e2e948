//! Visibility engine: toggles + active view → hidden flags.
//!
//! [`apply_filter`] rewrites the `hidden` flag of every element in place. A
//! per-element pass decides each node from its kind and the toggles, then
//! each edge from its endpoints and kind. Four derived passes follow, in
//! order:
//!
//! 1. externals with no visible edge are hidden (independent of `orphans`);
//! 2. junctions with no visible trunk are hidden with their edges;
//! 3. junctions with no visible branch are hidden with their edges;
//! 4. with `orphans` off, nodes with no visible edge are hidden and edges
//!    left dangling by that are hidden too.
//!
//! Bridges from [`crate::transitive`] are dropped first and, with the
//! `transitive` toggle on, recomputed last. [`compute_visibility`] is the
//! pure form, returning a [`VisibilitySnapshot`] without touching its input.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::classes;
use crate::elements::{Authority, EdgeKind, EdgeSpec, ElementSet, NodeDetail, NodeSpec};
use crate::error::ConfigError;
use crate::transitive::{compute_transitive_edges, remove_transitive_edges};
use crate::views::ViewIndex;

/// The nine independent visibility toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Toggles {
    /// Domain concepts (every non-context classification).
    pub domain: bool,
    /// FIBO and OMG Commons external nodes.
    pub fibo: bool,
    /// Schema.org external nodes.
    pub schema: bool,
    /// Context concepts and context-styled edges.
    pub context: bool,
    /// Junctions, trunks, branches and categorized children.
    pub categorizations: bool,
    /// Relationship, is-a, has-property and has-type edges.
    pub relationships: bool,
    /// Nodes with no visible edge.
    pub orphans: bool,
    /// Synthetic bridges over hidden nodes.
    pub transitive: bool,
    /// Primitive property types.
    pub primitive: bool,
}

impl Default for Toggles {
    fn default() -> Self {
        Self {
            domain: true,
            fibo: true,
            schema: true,
            context: true,
            categorizations: true,
            relationships: true,
            orphans: true,
            transitive: false,
            primitive: false,
        }
    }
}

impl Toggles {
    /// Reads one toggle.
    #[must_use]
    pub fn get(&self, toggle: Toggle) -> bool {
        match toggle {
            Toggle::Domain => self.domain,
            Toggle::Fibo => self.fibo,
            Toggle::Schema => self.schema,
            Toggle::Context => self.context,
            Toggle::Categorizations => self.categorizations,
            Toggle::Relationships => self.relationships,
            Toggle::Orphans => self.orphans,
            Toggle::Transitive => self.transitive,
            Toggle::Primitive => self.primitive,
        }
    }

    /// Sets one toggle.
    pub fn set(&mut self, toggle: Toggle, on: bool) {
        let slot = match toggle {
            Toggle::Domain => &mut self.domain,
            Toggle::Fibo => &mut self.fibo,
            Toggle::Schema => &mut self.schema,
            Toggle::Context => &mut self.context,
            Toggle::Categorizations => &mut self.categorizations,
            Toggle::Relationships => &mut self.relationships,
            Toggle::Orphans => &mut self.orphans,
            Toggle::Transitive => &mut self.transitive,
            Toggle::Primitive => &mut self.primitive,
        };
        *slot = on;
    }
}

/// Names one toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Toggle {
    /// `domain`
    Domain,
    /// `fibo`
    Fibo,
    /// `schema`
    Schema,
    /// `context`
    Context,
    /// `categorizations`
    Categorizations,
    /// `relationships`
    Relationships,
    /// `orphans`
    Orphans,
    /// `transitive`
    Transitive,
    /// `primitive`
    Primitive,
}

impl Toggle {
    /// Every toggle, in display order.
    pub const ALL: [Toggle; 9] = [
        Toggle::Domain,
        Toggle::Fibo,
        Toggle::Schema,
        Toggle::Context,
        Toggle::Categorizations,
        Toggle::Relationships,
        Toggle::Orphans,
        Toggle::Transitive,
        Toggle::Primitive,
    ];

    /// Returns the toggle's name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Toggle::Domain => "domain",
            Toggle::Fibo => "fibo",
            Toggle::Schema => "schema",
            Toggle::Context => "context",
            Toggle::Categorizations => "categorizations",
            Toggle::Relationships => "relationships",
            Toggle::Orphans => "orphans",
            Toggle::Transitive => "transitive",
            Toggle::Primitive => "primitive",
        }
    }
}

impl fmt::Display for Toggle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Toggle {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Toggle::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| ConfigError::UnknownToggle(s.to_string()))
    }
}

/// Applies `toggles` and the index's active view to `set` in place.
pub fn apply_filter(set: &mut ElementSet, toggles: &Toggles, views: &ViewIndex) {
    remove_transitive_edges(set);

    let node_hidden: Vec<bool> = {
        let branch_targets: HashSet<&str> = if toggles.categorizations {
            HashSet::new()
        } else {
            set.edges()
                .filter(|e| e.kind == EdgeKind::Branch)
                .map(|e| e.target.as_str())
                .collect()
        };
        set.nodes()
            .map(|node| !node_visible(set, node, toggles, views, &branch_targets))
            .collect()
    };
    for (node, hidden) in set.nodes_mut().zip(node_hidden) {
        node.hidden = hidden;
    }

    let edge_hidden: Vec<bool> = set
        .edges()
        .map(|edge| !edge_visible(set, edge, toggles))
        .collect();
    for (edge, hidden) in set.edges_mut().zip(edge_hidden) {
        edge.hidden = hidden;
    }

    let incidence = Incidence::of(set);

    for id in visible_ids(set, NodeSpec::is_external) {
        if !incidence.any_visible(set, &id, None) {
            hide_node(set, &id);
        }
    }
    for kind in [EdgeKind::Trunk, EdgeKind::Branch] {
        for id in visible_ids(set, NodeSpec::is_junction) {
            if !incidence.any_visible(set, &id, Some(kind)) {
                hide_node(set, &id);
                incidence.hide_all(set, &id);
            }
        }
    }
    if !toggles.orphans {
        let orphans: Vec<String> = visible_ids(set, |n| !n.is_junction())
            .into_iter()
            .filter(|id| !incidence.any_visible(set, id, None))
            .collect();
        for id in &orphans {
            hide_node(set, id);
        }
        hide_dangling_edges(set);
    }

    let mut bridges = 0;
    if toggles.transitive {
        for edge in compute_transitive_edges(set) {
            bridges += usize::from(set.add_edge(edge));
        }
    }

    tracing::info!(
        view = views.active().unwrap_or("-"),
        nodes = set.visible_nodes().count(),
        edges = set.visible_edges().count(),
        bridges,
        "applied filter"
    );
}

/// Per-node decision, before the derived passes.
fn node_visible(
    set: &ElementSet,
    node: &NodeSpec,
    toggles: &Toggles,
    views: &ViewIndex,
    branch_targets: &HashSet<&str>,
) -> bool {
    let in_view = |node: &NodeSpec| node.membership_key().is_some_and(|key| views.in_active_view(key));

    match &node.detail {
        NodeDetail::Junction { .. } => toggles.categorizations,
        _ if node.is_external() => {
            let by_source = match node.authority() {
                Some(Authority::SchemaOrg) => toggles.schema,
                Some(Authority::Fibo | Authority::OmgCommons) => toggles.fibo,
                None => false,
            };
            by_source && in_view(node)
        }
        NodeDetail::Property { parent_qname, .. } => {
            if node.has_class(classes::PRIMITIVE) && !toggles.primitive {
                return false;
            }
            parent_allows(set, parent_qname, toggles, views)
        }
        NodeDetail::PropertyType { .. } => {
            if node.has_class(classes::PRIMITIVE) && !toggles.primitive {
                return false;
            }
            set.nodes().any(|prop| match &prop.detail {
                NodeDetail::Property {
                    type_name,
                    parent_qname,
                    ..
                } => *type_name == node.name && parent_allows(set, parent_qname, toggles, views),
                _ => false,
            })
        }
        _ => {
            let by_kind = if node.has_class(classes::CONTEXT) {
                toggles.context
            } else {
                toggles.domain
            };
            if !by_kind {
                return false;
            }
            if !toggles.categorizations && branch_targets.contains(node.id.as_str()) {
                return false;
            }
            node.is_ghost() || in_view(node)
        }
    }
}

/// Whether a property's parent concept would pass its own toggle and view
/// checks. A parent missing from the set passes the toggle check.
fn parent_allows(set: &ElementSet, parent_qname: &str, toggles: &Toggles, views: &ViewIndex) -> bool {
    if let Some(parent) = set.node(parent_qname) {
        let is_context = parent.has_class(classes::CONTEXT);
        if is_context && !toggles.context {
            return false;
        }
        if !is_context && !parent.is_external() && !toggles.domain {
            return false;
        }
    }
    views.in_active_view(parent_qname)
}

fn edge_visible(set: &ElementSet, edge: &EdgeSpec, toggles: &Toggles) -> bool {
    let endpoint_hidden = |id: &str| set.node(id).map_or(true, |n| n.hidden);
    if endpoint_hidden(&edge.source) || endpoint_hidden(&edge.target) {
        return false;
    }
    if edge.is_context_styled() && !toggles.context {
        return false;
    }
    match edge.kind {
        EdgeKind::Trunk | EdgeKind::Branch => toggles.categorizations,
        EdgeKind::Relationship | EdgeKind::IsA | EdgeKind::HasProperty | EdgeKind::HasType => {
            toggles.relationships
        }
        _ => true,
    }
}

/// Node id → positions of incident edges. Valid while no edge is added or
/// removed.
struct Incidence(HashMap<String, Vec<usize>>);

impl Incidence {
    fn of(set: &ElementSet) -> Self {
        Self(
            set.incidence()
                .into_iter()
                .map(|(id, positions)| (id.to_owned(), positions))
                .collect(),
        )
    }

    fn positions(&self, id: &str) -> &[usize] {
        self.0.get(id).map_or(&[], Vec::as_slice)
    }

    fn any_visible(&self, set: &ElementSet, id: &str, kind: Option<EdgeKind>) -> bool {
        self.positions(id)
            .iter()
            .filter_map(|&pos| set.edge_at(pos))
            .any(|e| !e.hidden && kind.map_or(true, |k| e.kind == k))
    }

    fn hide_all(&self, set: &mut ElementSet, id: &str) {
        for &pos in self.positions(id) {
            if let Some(edge) = set.edge_at_mut(pos) {
                edge.hidden = true;
            }
        }
    }
}

fn visible_ids<F>(set: &ElementSet, keep: F) -> Vec<String>
where
    F: Fn(&NodeSpec) -> bool,
{
    set.visible_nodes()
        .filter(|n| keep(*n))
        .map(|n| n.id.clone())
        .collect()
}

fn hide_node(set: &mut ElementSet, id: &str) {
    if let Some(node) = set.node_mut(id) {
        node.hidden = true;
    }
}

fn hide_dangling_edges(set: &mut ElementSet) {
    let hidden: Vec<bool> = set
        .edges()
        .map(|e| {
            e.hidden
                || [&e.source, &e.target]
                    .iter()
                    .any(|id| set.node(id).map_or(true, |n| n.hidden))
        })
        .collect();
    for (edge, hidden) in set.edges_mut().zip(hidden) {
        edge.hidden = hidden;
    }
}

/// The visible subset of an element set under one toggle state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisibilitySnapshot {
    /// Active view, if any.
    pub view: Option<String>,
    /// Toggles the snapshot was taken under.
    pub toggles: Toggles,
    /// Ids of visible nodes.
    pub nodes: BTreeSet<String>,
    /// Ids of visible edges, bridges included.
    pub edges: BTreeSet<String>,
    /// Bridges added for this state.
    pub bridges: Vec<EdgeSpec>,
}

impl VisibilitySnapshot {
    /// Captures the current flags of an already filtered set.
    #[must_use]
    pub fn capture(set: &ElementSet, toggles: &Toggles, views: &ViewIndex) -> Self {
        Self {
            view: views.active().map(str::to_string),
            toggles: *toggles,
            nodes: set.visible_nodes().map(|n| n.id.clone()).collect(),
            edges: set.visible_edges().map(|e| e.id.clone()).collect(),
            bridges: set
                .edges()
                .filter(|e| e.kind == EdgeKind::Transitive)
                .cloned()
                .collect(),
        }
    }

    /// True when the node is visible.
    #[must_use]
    pub fn shows_node(&self, id: &str) -> bool {
        self.nodes.contains(id)
    }

    /// True when the edge is visible.
    #[must_use]
    pub fn shows_edge(&self, id: &str) -> bool {
        self.edges.contains(id)
    }
}

/// Pure form of [`apply_filter`]: filters a copy and snapshots it.
#[must_use]
pub fn compute_visibility(set: &ElementSet, toggles: &Toggles, views: &ViewIndex) -> VisibilitySnapshot {
    let mut scratch = set.clone();
    apply_filter(&mut scratch, toggles, views);
    VisibilitySnapshot::capture(&scratch, toggles, views)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build;
    use crate::identity::IdentityMap;
    use bkb_model::{Categorization, Concept, DomainData, ExternalConcept, Subsumption};

    fn concept(name: &str) -> Concept {
        Concept {
            name: name.into(),
            ..Concept::default()
        }
    }

    /// A categorizes B and subsumes under external FIBO C.
    fn scenario() -> (ElementSet, ViewIndex) {
        let data = DomainData {
            concepts: vec![concept("A"), concept("B")],
            external_concepts: vec![ExternalConcept {
                name: "C".into(),
                qname: Some("fibo:C".into()),
                uri: Some("https://example.org/C".into()),
                ..ExternalConcept::default()
            }],
            categorizations: vec![Categorization {
                parent_name: "A".into(),
                category_name: "kind".into(),
                children_names: vec!["B".into()],
                ..Categorization::default()
            }],
            subsumptions: vec![Subsumption {
                child: "A".into(),
                parent: "C".into(),
                external_uri: Some("https://example.org/C".into()),
                ..Subsumption::default()
            }],
            ..DomainData::default()
        };
        let identity = IdentityMap::build(&data);
        let views = ViewIndex::extract(&data);
        (build(&data, &identity, &views, None), views)
    }

    #[test]
    fn fibo_toggle_hides_external_and_its_edge() {
        let (set, views) = scenario();
        let on = compute_visibility(&set, &Toggles::default(), &views);
        assert_eq!(on.nodes, BTreeSet::from(["A".into(), "B".into(), "fibo:C".into()]));
        assert!(on.shows_edge("cat-A-to-B"));
        assert!(on.shows_edge("sub-A-to-fibo:C"));

        let mut toggles = Toggles::default();
        toggles.set(Toggle::Fibo, false);
        let off = compute_visibility(&set, &toggles, &views);
        assert!(!off.shows_node("fibo:C"));
        assert!(!off.shows_edge("sub-A-to-fibo:C"));
        assert!(off.shows_node("A") && off.shows_node("B"));
        assert!(off.shows_edge("cat-A-to-B"));
    }

    #[test]
    fn orphan_toggle_round_trip() {
        let (set, views) = scenario();
        let mut toggles = Toggles::default();
        toggles.set(Toggle::Categorizations, false);
        let before = compute_visibility(&set, &toggles, &views);
        toggles.orphans = false;
        let hidden = compute_visibility(&set, &toggles, &views);
        assert!(hidden.nodes.is_subset(&before.nodes));
        toggles.orphans = true;
        assert_eq!(compute_visibility(&set, &toggles, &views), before);
    }

    #[test]
    fn externals_without_edges_are_hidden() {
        let (set, views) = scenario();
        let mut toggles = Toggles::default();
        toggles.domain = false;
        let snapshot = compute_visibility(&set, &toggles, &views);
        assert!(snapshot.nodes.is_empty(), "{:?}", snapshot.nodes);
    }

    /// Order (domain, view Orders) and Account (context, view Parties), each
    /// with properties; `Integer` is a primitive type.
    fn property_scenario(view: Option<&str>) -> (ElementSet, ViewIndex) {
        use bkb_model::{ConceptKind, Property, PropertyType, SourceRef};

        let owned = |name: &str, file: &str, kind: ConceptKind| Concept {
            kind,
            sources: vec![SourceRef {
                file: file.into(),
                ..SourceRef::default()
            }],
            ..concept(name)
        };
        let prop = |id: &str, parent: &str, type_name: &str, type_id: &str| Property {
            id: id.into(),
            name: format!("{parent} {type_name}"),
            parent_concept: parent.into(),
            type_name: type_name.into(),
            type_id: Some(type_id.into()),
            ..Property::default()
        };
        let pt = |id: &str, name: &str| PropertyType {
            id: id.into(),
            name: name.into(),
            ..PropertyType::default()
        };
        let data = DomainData {
            concepts: vec![
                owned("Order", "Orders.cs", ConceptKind::Domain),
                owned("Account", "Parties.cs", ConceptKind::ContextReference),
            ],
            properties: vec![
                prop("p1", "Order", "ISIN", "t1"),
                prop("p2", "Order", "Integer", "t2"),
                prop("p3", "Account", "IBAN", "t3"),
            ],
            property_types: vec![pt("t1", "ISIN"), pt("t2", "Integer"), pt("t3", "IBAN")],
            ..DomainData::default()
        };
        let identity = IdentityMap::build(&data);
        let mut views = ViewIndex::extract(&data);
        views.set_active(view);
        (build(&data, &identity, &views, view), views)
    }

    #[test]
    fn primitive_toggle_gates_primitive_types() {
        let (set, views) = property_scenario(None);
        let off = compute_visibility(&set, &Toggles::default(), &views);
        assert!(!off.shows_node("pt-t2"));
        assert!(!off.shows_edge("has-type-p2"));
        assert!(off.shows_node("prop-p2"), "the property itself is not primitive");
        assert!(off.shows_node("pt-t1"));

        let on = compute_visibility(&set, &Toggles { primitive: true, ..Toggles::default() }, &views);
        assert!(on.shows_node("pt-t2"));
        assert!(on.shows_edge("has-type-p2"));
    }

    #[test]
    fn properties_follow_their_parent_toggle() {
        let (set, views) = property_scenario(None);
        let all = compute_visibility(&set, &Toggles::default(), &views);
        for id in ["prop-p1", "prop-p2", "prop-p3", "pt-t1", "pt-t3"] {
            assert!(all.shows_node(id), "{id}");
        }

        let no_domain = compute_visibility(&set, &Toggles { domain: false, ..Toggles::default() }, &views);
        assert!(!no_domain.shows_node("prop-p1") && !no_domain.shows_node("prop-p2"));
        assert!(!no_domain.shows_node("pt-t1"), "no property of ISIN has a visible parent");
        assert!(no_domain.shows_node("prop-p3") && no_domain.shows_node("pt-t3"));

        let no_context = compute_visibility(&set, &Toggles { context: false, ..Toggles::default() }, &views);
        assert!(!no_context.shows_node("prop-p3") && !no_context.shows_node("pt-t3"));
        assert!(no_context.shows_node("prop-p1") && no_context.shows_node("pt-t1"));
    }

    #[test]
    fn properties_follow_their_parent_view() {
        let (set, views) = property_scenario(Some("Orders"));
        let snapshot = compute_visibility(&set, &Toggles::default(), &views);
        assert!(snapshot.shows_node("prop-p1") && snapshot.shows_node("pt-t1"));
        assert!(!snapshot.shows_node("prop-p3"));
        assert!(!snapshot.shows_node("pt-t3"));
    }

    #[test]
    fn toggle_names_parse() {
        for toggle in Toggle::ALL {
            assert_eq!(toggle.as_str().parse::<Toggle>().unwrap(), toggle);
        }
        assert_eq!(" Orphans ".parse::<Toggle>().unwrap(), Toggle::Orphans);
        assert!(matches!("colour".parse::<Toggle>(), Err(ConfigError::UnknownToggle(_))));
    }

    #[test]
    fn toggles_get_set() {
        let mut toggles = Toggles::default();
        assert!(!toggles.get(Toggle::Transitive));
        toggles.set(Toggle::Transitive, true);
        assert!(toggles.transitive);
        let parsed: Toggles = serde_json::from_str(r#"{"context": false}"#).unwrap();
        assert!(!parsed.context && parsed.domain && !parsed.primitive);
    }
}
