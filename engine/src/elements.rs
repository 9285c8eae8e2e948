//! The element arena: nodes and edges keyed by id.
//!
//! [`ElementSet`] is the single mutable structure the pipeline works on. The
//! builder fills it, the visibility engine flips `hidden` flags in place, the
//! transitive bridge computer adds and removes synthetic edges, and the
//! expand/collapse helpers grow and shrink it. Insertion order is preserved so
//! that every pass over the set is deterministic.

use std::collections::{BTreeSet, HashMap};

use bkb_model::{DefinitionSource, ExternalType, MatchType};
use indexmap::IndexMap;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::classes;

/// The standard that owns an external node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Authority {
    /// FIBO.
    #[serde(rename = "FIBO")]
    Fibo,
    /// Schema.org.
    #[serde(rename = "Schema.org")]
    SchemaOrg,
    /// OMG Commons.
    #[serde(rename = "OMG Commons")]
    OmgCommons,
}

impl Authority {
    /// Returns the display label.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Authority::Fibo => "FIBO",
            Authority::SchemaOrg => "Schema.org",
            Authority::OmgCommons => "OMG Commons",
        }
    }

    /// Maps a catalogued external concept's declared type. Catalogued OMG
    /// concepts are listed under FIBO.
    #[must_use]
    pub fn of_external(external_type: ExternalType) -> Self {
        match external_type {
            ExternalType::SchemaOrg => Authority::SchemaOrg,
            ExternalType::Fibo | ExternalType::Omg => Authority::Fibo,
        }
    }
}

/// Kind-specific node payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeDetail {
    /// A domain concept.
    Concept {
        /// Qualified name, when the concept has one.
        #[serde(skip_serializing_if = "Option::is_none")]
        qname: Option<String>,
        /// Definition text.
        definition: String,
        /// Definition authority.
        source: DefinitionSource,
        /// FIBO match type.
        match_type: MatchType,
        /// FIBO class URI.
        #[serde(skip_serializing_if = "Option::is_none")]
        fibo_uri: Option<String>,
        /// FIBO class label.
        #[serde(skip_serializing_if = "Option::is_none")]
        fibo_label: Option<String>,
        /// Direct FIBO match.
        has_fibo: bool,
        /// Schema.org mapping flagged.
        has_schema: bool,
        /// Valid categorization children.
        child_count: usize,
        /// Subsumption children.
        subtype_count: usize,
        /// Root of one of the largest trees.
        is_hub: bool,
        /// Context concept in the current view.
        is_context: bool,
        /// Set when a same-named legacy external reference marks this node
        /// as external.
        #[serde(skip_serializing_if = "Option::is_none")]
        marked_external: Option<Authority>,
    },
    /// A concept outside the active view that a view member references.
    Ghost {
        /// Qualified name, when the concept has one.
        #[serde(skip_serializing_if = "Option::is_none")]
        qname: Option<String>,
        /// Definition text.
        definition: String,
        /// Definition authority.
        source: DefinitionSource,
        /// First view (in id order) the concept does belong to.
        #[serde(skip_serializing_if = "Option::is_none")]
        source_view: Option<String>,
        /// Display name of `source_view`, or `"unknown"`.
        source_view_name: String,
    },
    /// Fan-out point of a multi-child categorization.
    Junction {
        /// Identity of the categorized parent.
        parent: String,
        /// Category label.
        label: String,
        /// Creation order among junctions.
        index: usize,
    },
    /// A concept owned by an external standard.
    External {
        /// Qualified name, when known.
        #[serde(skip_serializing_if = "Option::is_none")]
        qname: Option<String>,
        /// Definition text.
        definition: String,
        /// Owning standard.
        authority: Authority,
        /// Canonical URI.
        #[serde(skip_serializing_if = "Option::is_none")]
        uri: Option<String>,
        /// Declared external type.
        external_type: ExternalType,
    },
    /// A property attached to a concept.
    Property {
        /// Owning concept name.
        parent_concept: String,
        /// Owning concept identity.
        parent_qname: String,
        /// Value type name.
        type_name: String,
        /// Free-form annotations.
        annotations: Vec<serde_json::Value>,
    },
    /// A shared property value type.
    PropertyType {
        /// Definition text.
        definition: String,
        /// Technical primitive.
        is_primitive: bool,
    },
}

/// One node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeSpec {
    /// Unique id: the qname for concepts, a synthetic id otherwise.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Styling tags.
    pub classes: BTreeSet<&'static str>,
    /// Kind-specific payload.
    pub detail: NodeDetail,
    /// Hidden by the last filter pass.
    #[serde(rename = "visible", serialize_with = "serialize_visible")]
    pub hidden: bool,
}

impl NodeSpec {
    /// Creates a visible node.
    pub fn new(id: impl Into<String>, name: impl Into<String>, detail: NodeDetail) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            classes: BTreeSet::new(),
            detail,
            hidden: false,
        }
    }

    /// Adds a class tag.
    #[must_use]
    pub fn with_class(mut self, class: &'static str) -> Self {
        self.classes.insert(class);
        self
    }

    /// True when the node carries the tag.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    /// Returns the stored qname, if any.
    #[must_use]
    pub fn qname(&self) -> Option<&str> {
        match &self.detail {
            NodeDetail::Concept { qname, .. }
            | NodeDetail::Ghost { qname, .. }
            | NodeDetail::External { qname, .. } => qname.as_deref(),
            _ => None,
        }
    }

    /// Returns the key used for view membership: the qname, else the name.
    /// Junctions, properties and property types are never view members.
    #[must_use]
    pub fn membership_key(&self) -> Option<&str> {
        match &self.detail {
            NodeDetail::Junction { .. }
            | NodeDetail::Property { .. }
            | NodeDetail::PropertyType { .. } => None,
            _ => Some(self.qname().unwrap_or(&self.name)),
        }
    }

    /// Returns the owning standard for external nodes.
    #[must_use]
    pub fn authority(&self) -> Option<Authority> {
        match &self.detail {
            NodeDetail::External { authority, .. } => Some(*authority),
            NodeDetail::Concept {
                marked_external, ..
            } => *marked_external,
            _ => None,
        }
    }

    /// True for junction nodes.
    #[must_use]
    pub fn is_junction(&self) -> bool {
        matches!(self.detail, NodeDetail::Junction { .. })
    }

    /// True for ghost nodes.
    #[must_use]
    pub fn is_ghost(&self) -> bool {
        matches!(self.detail, NodeDetail::Ghost { .. })
    }

    /// True for external nodes, including concepts marked external.
    #[must_use]
    pub fn is_external(&self) -> bool {
        self.has_class(classes::EXTERNAL)
    }

    /// True for property nodes.
    #[must_use]
    pub fn is_property(&self) -> bool {
        matches!(self.detail, NodeDetail::Property { .. })
    }

    /// True for property-type nodes.
    #[must_use]
    pub fn is_property_type(&self) -> bool {
        matches!(self.detail, NodeDetail::PropertyType { .. })
    }

    /// True for domain concept nodes (not ghosts, externals or synthetic nodes).
    #[must_use]
    pub fn is_concept(&self) -> bool {
        matches!(self.detail, NodeDetail::Concept { .. }) && !self.is_external()
    }
}

/// Edge type discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EdgeKind {
    /// Direct parent → child categorization (single valid child).
    #[serde(rename = "categorization")]
    Categorization,
    /// Parent → junction.
    #[serde(rename = "trunk")]
    Trunk,
    /// Junction → child.
    #[serde(rename = "branch")]
    Branch,
    /// Binary verb fact.
    #[serde(rename = "relationship")]
    Relationship,
    /// Child → parent is-a-kind-of.
    #[serde(rename = "subsumption")]
    Subsumption,
    /// Property → defining concept.
    #[serde(rename = "isA")]
    IsA,
    /// Concept → property.
    #[serde(rename = "has-property")]
    HasProperty,
    /// Property → property type.
    #[serde(rename = "has-type")]
    HasType,
    /// Synthetic bridge over hidden nodes.
    #[serde(rename = "transitive")]
    Transitive,
    /// Parent → child added by expanding a node.
    #[serde(rename = "extends")]
    Extends,
}

impl EdgeKind {
    /// Returns the class tag (identical to the type discriminator).
    #[must_use]
    pub const fn class(self) -> &'static str {
        match self {
            EdgeKind::Categorization => "categorization",
            EdgeKind::Trunk => "trunk",
            EdgeKind::Branch => "branch",
            EdgeKind::Relationship => "relationship",
            EdgeKind::Subsumption => "subsumption",
            EdgeKind::IsA => "isA",
            EdgeKind::HasProperty => "has-property",
            EdgeKind::HasType => "has-type",
            EdgeKind::Transitive => "transitive",
            EdgeKind::Extends => "extends",
        }
    }

    /// Returns the context-styled variant of the class tag, for kinds that
    /// have one.
    #[must_use]
    pub fn context_class(self) -> Option<&'static str> {
        match self {
            EdgeKind::Relationship => Some(classes::CONTEXT_REL),
            EdgeKind::IsA => Some(classes::CONTEXT_IS_A),
            EdgeKind::Subsumption => Some(classes::CONTEXT_SUBSUMPTION),
            _ => None,
        }
    }

    /// True for the edge kinds transitive bridges may traverse.
    #[must_use]
    pub fn is_semantic(self) -> bool {
        matches!(
            self,
            EdgeKind::Relationship
                | EdgeKind::IsA
                | EdgeKind::Subsumption
                | EdgeKind::Trunk
                | EdgeKind::Branch
        )
    }
}

/// One edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeSpec {
    /// Unique id.
    pub id: String,
    /// Source node id.
    pub source: String,
    /// Target node id.
    pub target: String,
    /// Type discriminator.
    #[serde(rename = "type")]
    pub kind: EdgeKind,
    /// Styling tags.
    pub classes: BTreeSet<&'static str>,
    /// Centre label (category label, "has property", ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Label at the source end.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_label: Option<String>,
    /// Label at the target end.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_label: Option<String>,
    /// Context-only fact.
    pub is_context: bool,
    /// Definition of the parent, for synthesized subsumptions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_definition: Option<String>,
    /// Hop count of a transitive bridge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hops: Option<usize>,
    /// Traversed path of a transitive bridge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Hidden by the last filter pass.
    #[serde(rename = "visible", serialize_with = "serialize_visible")]
    pub hidden: bool,
}

impl EdgeSpec {
    /// Creates a visible edge tagged with its kind's class.
    pub fn new(
        id: impl Into<String>,
        kind: EdgeKind,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            kind,
            classes: BTreeSet::from([kind.class()]),
            label: None,
            source_label: None,
            target_label: None,
            is_context: false,
            parent_definition: None,
            hops: None,
            path: None,
            hidden: false,
        }
    }

    /// Sets the centre label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the end labels.
    #[must_use]
    pub fn with_end_labels(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.source_label = Some(source.into());
        self.target_label = Some(target.into());
        self
    }

    /// Sets only the source-end label (subsumptions).
    #[must_use]
    pub fn with_source_label(mut self, label: impl Into<String>) -> Self {
        self.source_label = Some(label.into());
        self
    }

    /// Marks the edge as a context fact. Kinds with a context style swap
    /// their class tag for it.
    #[must_use]
    pub fn context(mut self, is_context: bool) -> Self {
        self.is_context = is_context;
        if let (true, Some(class)) = (is_context, self.kind.context_class()) {
            self.classes.remove(self.kind.class());
            self.classes.insert(class);
        }
        self
    }

    /// Sets the parent definition shown for synthesized subsumptions.
    #[must_use]
    pub fn with_parent_definition(mut self, definition: Option<String>) -> Self {
        self.parent_definition = definition;
        self
    }

    /// True when the edge is styled as a context fact.
    #[must_use]
    pub fn is_context_styled(&self) -> bool {
        [
            classes::CONTEXT_REL,
            classes::CONTEXT_IS_A,
            classes::CONTEXT_SUBSUMPTION,
        ]
        .iter()
        .any(|c| self.classes.contains(c))
    }

    /// True when `node_id` is either endpoint.
    #[must_use]
    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }
}

/// Arena of nodes and edges keyed by id, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementSet {
    nodes: IndexMap<String, NodeSpec>,
    edges: IndexMap<String, EdgeSpec>,
}

impl ElementSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node. Returns false (and leaves the set unchanged) when the id
    /// is already taken.
    pub fn add_node(&mut self, node: NodeSpec) -> bool {
        if self.nodes.contains_key(&node.id) {
            return false;
        }
        self.nodes.insert(node.id.clone(), node);
        true
    }

    /// Adds an edge. Returns false when the id is already taken.
    pub fn add_edge(&mut self, edge: EdgeSpec) -> bool {
        if self.edges.contains_key(&edge.id) {
            return false;
        }
        self.edges.insert(edge.id.clone(), edge);
        true
    }

    /// Removes a node and every edge incident to it.
    pub fn remove_node(&mut self, id: &str) -> Option<NodeSpec> {
        let node = self.nodes.shift_remove(id)?;
        self.edges.retain(|_, e| !e.touches(id));
        Some(node)
    }

    /// Removes an edge.
    pub fn remove_edge(&mut self, id: &str) -> Option<EdgeSpec> {
        self.edges.shift_remove(id)
    }

    /// Keeps only the edges for which `keep` holds.
    pub fn retain_edges<F>(&mut self, mut keep: F)
    where
        F: FnMut(&EdgeSpec) -> bool,
    {
        self.edges.retain(|_, e| keep(e));
    }

    /// Drops edges whose source or target node does not exist. Returns the
    /// number removed.
    pub fn prune_dangling_edges(&mut self) -> usize {
        let before = self.edges.len();
        let nodes = &self.nodes;
        self.edges.retain(|id, e| {
            let ok = nodes.contains_key(&e.source) && nodes.contains_key(&e.target);
            if !ok {
                tracing::debug!(edge = %id, "dropping edge with a missing endpoint");
            }
            ok
        });
        before - self.edges.len()
    }

    /// Returns a node by id.
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&NodeSpec> {
        self.nodes.get(id)
    }

    /// Returns a node by id, mutably.
    pub fn node_mut(&mut self, id: &str) -> Option<&mut NodeSpec> {
        self.nodes.get_mut(id)
    }

    /// Returns an edge by id.
    #[must_use]
    pub fn edge(&self, id: &str) -> Option<&EdgeSpec> {
        self.edges.get(id)
    }

    /// Returns an edge by id, mutably.
    pub fn edge_mut(&mut self, id: &str) -> Option<&mut EdgeSpec> {
        self.edges.get_mut(id)
    }

    /// True when a node with the id exists.
    #[must_use]
    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Iterates nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeSpec> {
        self.nodes.values()
    }

    /// Iterates nodes mutably in insertion order.
    pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut NodeSpec> {
        self.nodes.values_mut()
    }

    /// Iterates edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &EdgeSpec> {
        self.edges.values()
    }

    /// Iterates edges mutably in insertion order.
    pub fn edges_mut(&mut self) -> impl Iterator<Item = &mut EdgeSpec> {
        self.edges.values_mut()
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Iterates the edges incident to a node.
    pub fn incident_edges<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a EdgeSpec> {
        self.edges.values().filter(move |e| e.touches(node_id))
    }

    /// Maps each node id to the positions of its incident edges.
    ///
    /// Positions stay valid until an edge is added or removed.
    #[must_use]
    pub fn incidence(&self) -> HashMap<&str, Vec<usize>> {
        let mut map: HashMap<&str, Vec<usize>> = HashMap::new();
        for (pos, edge) in self.edges.values().enumerate() {
            map.entry(edge.source.as_str()).or_default().push(pos);
            if edge.target != edge.source {
                map.entry(edge.target.as_str()).or_default().push(pos);
            }
        }
        map
    }

    /// Returns the edge at an insertion position.
    #[must_use]
    pub fn edge_at(&self, pos: usize) -> Option<&EdgeSpec> {
        self.edges.get_index(pos).map(|(_, e)| e)
    }

    /// Returns the edge at an insertion position, mutably.
    pub fn edge_at_mut(&mut self, pos: usize) -> Option<&mut EdgeSpec> {
        self.edges.get_index_mut(pos).map(|(_, e)| e)
    }

    /// Iterates the nodes not hidden by the last filter pass.
    pub fn visible_nodes(&self) -> impl Iterator<Item = &NodeSpec> {
        self.nodes.values().filter(|n| !n.hidden)
    }

    /// Iterates the edges not hidden by the last filter pass.
    pub fn visible_edges(&self) -> impl Iterator<Item = &EdgeSpec> {
        self.edges.values().filter(|e| !e.hidden)
    }
}

/// Serializes a `hidden` flag as its negation, `visible`.
fn serialize_visible<S: Serializer>(hidden: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_bool(!*hidden)
}

impl Serialize for ElementSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let nodes: Vec<&NodeSpec> = self.nodes.values().collect();
        let edges: Vec<&EdgeSpec> = self.edges.values().collect();
        let mut state = serializer.serialize_struct("ElementSet", 2)?;
        state.serialize_field("nodes", &nodes)?;
        state.serialize_field("edges", &edges)?;
        state.end()
    }
}
