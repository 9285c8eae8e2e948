//! Element builder: raw domain records → graph elements.
//!
//! [`build`] turns one domain's [`DomainData`] into an [`ElementSet`]. The
//! passes run in a fixed order because later passes read the working sets
//! earlier ones produce:
//!
//! 1. Categorization forest, root ranking and the initial visible set.
//! 2. Relationship expansion (the far endpoint comes with its subtree).
//! 3. Ghost detection, when a view is active.
//! 4. Concept and ghost nodes.
//! 5. Categorization edges, collapsed through junctions for multi-child groups.
//! 6. Relationship edges.
//! 7. Explicit, FIBO-derived and Schema.org-derived subsumptions.
//! 8. External nodes for every referenced external parent.
//! 9. Property types and properties.
//!
//! Malformed records are skipped with a `debug` event; nothing here fails.
//!
//! # Entry Point
//!
//! ```
//! use bkb_engine::builder::build;
//! use bkb_engine::identity::IdentityMap;
//! use bkb_engine::views::ViewIndex;
//! use bkb_model::DomainData;
//!
//! let data = DomainData::from_json_str(r#"{
//!     "concepts": [{"name": "Order"}, {"name": "Buy"}, {"name": "Sell"}],
//!     "categorizations": [
//!         {"parent_name": "Order", "category_name": "side", "children_names": ["Buy", "Sell"]}
//!     ]
//! }"#).unwrap();
//! let identity = IdentityMap::build(&data);
//! let views = ViewIndex::extract(&data);
//!
//! let elements = build(&data, &identity, &views, None);
//! assert!(elements.contains_node("junction-Order-side"));
//! assert_eq!(elements.edge_count(), 3);
//! ```

use std::collections::{HashMap, HashSet};

use bkb_model::text::{last_uri_segment, short_name, title_case, underscore_whitespace};
use bkb_model::{Concept, DomainData, ExternalConcept, ExternalType, MatchType};
use indexmap::IndexMap;

use crate::classes::{self, is_primitive_type, ConceptClass};
use crate::elements::{Authority, EdgeKind, EdgeSpec, ElementSet, NodeDetail, NodeSpec};
use crate::ghost::{detect_ghosts, EdgeGate};
use crate::identity::IdentityMap;
use crate::subtypes::SubtypeMap;
use crate::views::{self, view_display_name, ViewIndex};

/// Number of largest categorization trees shown initially (and tagged hub).
pub const HUB_LIMIT: usize = 5;

/// Depth cap of the categorization subtree traversal.
pub const MAX_TREE_DEPTH: usize = 6;

/// Prefix some catalogues wrap FIBO class URIs in.
pub const FIBO_QUERY_PREFIX: &str = "https://spec.edmcouncil.org/fibo/ontology?query=";

const SAME_AS: &str = "same as";
const DEFAULT_SUBSUMPTION_LABEL: &str = "is a kind of";

/// Builds the full element set for one domain.
///
/// `active_view` scopes ghost detection, edge gating and context styling;
/// `None` builds the unfiltered graph.
#[must_use]
pub fn build(
    data: &DomainData,
    identity: &IdentityMap,
    views: &ViewIndex,
    active_view: Option<&str>,
) -> ElementSet {
    let builder = Builder::new(data, identity, views, active_view);
    let mut out = ElementSet::new();

    builder.concept_nodes(&mut out);
    builder.ghost_nodes(&mut out);
    builder.categorization_edges(&mut out);
    builder.relationship_edges(&mut out);
    let referenced = builder.subsumption_edges(&mut out);
    builder.external_nodes(&referenced, &mut out);
    builder.property_elements(&mut out);

    let dropped = out.prune_dangling_edges();
    tracing::info!(
        domain = %data.domain.name,
        view = active_view.unwrap_or("-"),
        nodes = out.node_count(),
        edges = out.edge_count(),
        ghosts = builder.ghosts.len(),
        dropped,
        "built element set"
    );
    out
}

/// Returns `base`, or `base-2`, `base-3`, … when the id is already taken.
/// Labels that differ only in whitespace versus `_` share a base id.
fn unique_node_id(set: &ElementSet, base: String) -> String {
    if !set.contains_node(&base) {
        return base;
    }
    let mut n = 2;
    loop {
        let id = format!("{base}-{n}");
        if !set.contains_node(&id) {
            return id;
        }
        n += 1;
    }
}

/// Child → parent categorization forest over internal concepts.
struct Forest<'a> {
    parent: HashMap<&'a str, &'a str>,
    children: HashMap<&'a str, Vec<&'a str>>,
    child_count: HashMap<&'a str, usize>,
}

impl<'a> Forest<'a> {
    fn build(data: &'a DomainData, internal: &HashSet<&str>) -> Self {
        let mut parent = HashMap::new();
        let mut child_count: HashMap<&str, usize> = HashMap::new();
        for cat in &data.categorizations {
            let p = cat.parent_name.as_str();
            let mut valid = 0;
            for child in &cat.children_names {
                if !internal.contains(child.as_str()) {
                    continue;
                }
                valid += 1;
                if internal.contains(p) {
                    parent.insert(child.as_str(), p);
                }
            }
            *child_count.entry(p).or_default() += valid;
        }

        let mut children: HashMap<&str, Vec<&str>> = HashMap::new();
        for concept in &data.concepts {
            if let Some(&p) = parent.get(concept.name.as_str()) {
                children.entry(p).or_default().push(concept.name.as_str());
            }
        }
        Self {
            parent,
            children,
            child_count,
        }
    }

    fn children_of(&self, name: &str) -> &[&'a str] {
        self.children.get(name).map_or(&[], Vec::as_slice)
    }

    /// Total descendants reachable from `root`, cycle-safe.
    fn descendants(&self, root: &'a str) -> usize {
        let mut seen = HashSet::from([root]);
        let mut stack = vec![root];
        let mut total = 0;
        while let Some(name) = stack.pop() {
            for &child in self.children_of(name) {
                total += 1;
                if seen.insert(child) {
                    stack.push(child);
                }
            }
        }
        total
    }

    /// Adds `name` and its categorization subtree, down to [`MAX_TREE_DEPTH`].
    /// Stops at names that are already visible.
    fn add_tree(&self, name: &'a str, visible: &mut HashSet<&'a str>) {
        self.add_subtree(name, 0, visible);
    }

    fn add_subtree(&self, name: &'a str, depth: usize, visible: &mut HashSet<&'a str>) {
        if depth > MAX_TREE_DEPTH || !visible.insert(name) {
            return;
        }
        for &child in self.children_of(name) {
            self.add_subtree(child, depth + 1, visible);
        }
    }

    /// Initial visible set and hub roots.
    fn initial_visible(&self, data: &'a DomainData) -> (HashSet<&'a str>, HashSet<&'a str>) {
        let mut seen = HashSet::new();
        let mut ranked: Vec<(&'a str, usize)> = data
            .concepts
            .iter()
            .map(|c| c.name.as_str())
            .filter(|name| !self.parent.contains_key(name) && seen.insert(*name))
            .map(|name| (name, self.descendants(name)))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));

        let trees: Vec<&'a str> = ranked
            .iter()
            .filter(|(_, count)| *count > 0)
            .take(HUB_LIMIT)
            .map(|(name, _)| *name)
            .collect();
        if trees.is_empty() {
            tracing::debug!("no categorization trees, showing every concept");
            let all = data.concepts.iter().map(|c| c.name.as_str()).collect();
            return (all, HashSet::new());
        }

        let mut visible = HashSet::new();
        for &root in &trees {
            self.add_tree(root, &mut visible);
        }
        visible.extend(
            ranked
                .iter()
                .filter(|(_, count)| *count == 0)
                .map(|(name, _)| *name),
        );
        (visible, trees.into_iter().collect())
    }
}

/// Lookups over the catalogued external concepts.
struct ExternalCatalog<'a> {
    by_uri: HashMap<&'a str, &'a ExternalConcept>,
    by_qname: HashMap<&'a str, &'a ExternalConcept>,
    by_legacy_ref: HashMap<String, &'a ExternalConcept>,
}

impl<'a> ExternalCatalog<'a> {
    fn build(externals: &'a [ExternalConcept]) -> Self {
        let mut catalog = Self {
            by_uri: HashMap::new(),
            by_qname: HashMap::new(),
            by_legacy_ref: HashMap::new(),
        };
        for ext in externals {
            let prefix = match ext.external_type {
                ExternalType::SchemaOrg => "Schema.org",
                ExternalType::Fibo | ExternalType::Omg => "FIBO",
            };
            catalog
                .by_legacy_ref
                .insert(format!("{prefix}:{}", ext.name), ext);
            if let Some(uri) = ext.uri.as_deref().filter(|u| !u.is_empty()) {
                catalog.by_uri.insert(uri, ext);
            }
            if let Some(qname) = ext.qname.as_deref() {
                catalog.by_qname.insert(qname, ext);
            }
        }
        catalog
    }

    fn by_fibo_uri(&self, uri: &str) -> Option<&'a ExternalConcept> {
        self.by_uri
            .get(uri)
            .or_else(|| self.by_uri.get(format!("{FIBO_QUERY_PREFIX}{uri}").as_str()))
            .copied()
    }
}

/// FIBO definitions and URIs of visible concepts' mappings, keyed
/// `FIBO:<lowercased label>`.
#[derive(Default)]
struct FiboIndex {
    definitions: HashMap<String, String>,
    uris: HashMap<String, String>,
}

/// Referenced external parents in first-reference order, with the URI the
/// reference carried (the last one wins).
#[derive(Default)]
struct ExternalRefs {
    uris: IndexMap<String, Option<String>>,
}

impl ExternalRefs {
    fn reference(&mut self, reference: &str, uri: Option<&str>) {
        let slot = self.uris.entry(reference.to_owned()).or_insert(None);
        if let Some(uri) = uri {
            *slot = Some(uri.to_owned());
        }
    }
}

/// Working sets for one build.
struct Builder<'a> {
    data: &'a DomainData,
    identity: &'a IdentityMap,
    views: &'a ViewIndex,
    active_view: Option<&'a str>,
    concepts_by_name: HashMap<&'a str, &'a Concept>,
    subtypes: SubtypeMap,
    child_count: HashMap<&'a str, usize>,
    hubs: HashSet<&'a str>,
    context: HashSet<&'a str>,
    visible: HashSet<&'a str>,
    ghosts: HashSet<&'a str>,
    catalog: ExternalCatalog<'a>,
    fibo: FiboIndex,
}

impl<'a> Builder<'a> {
    fn new(
        data: &'a DomainData,
        identity: &'a IdentityMap,
        views: &'a ViewIndex,
        active_view: Option<&'a str>,
    ) -> Self {
        let internal: HashSet<&str> = data.concepts.iter().map(|c| c.name.as_str()).collect();
        let concepts_by_name = data.concepts.iter().map(|c| (c.name.as_str(), c)).collect();

        let forest = Forest::build(data, &internal);
        let (mut visible, hubs) = forest.initial_visible(data);
        for rel in &data.relationships {
            let (subject, object) = (rel.subject.as_str(), rel.object.as_str());
            if visible.contains(subject) && internal.contains(object) {
                forest.add_tree(object, &mut visible);
            }
            if visible.contains(object) && internal.contains(subject) {
                forest.add_tree(subject, &mut visible);
            }
        }

        let context = data
            .concepts
            .iter()
            .filter(|c| match active_view {
                Some(view) => views::is_context_in_view(&c.sources, view),
                None => c.is_context_reference(),
            })
            .map(|c| c.name.as_str())
            .collect();

        let ghosts = match active_view {
            Some(view) => detect_ghosts(data, &internal, identity, views, view),
            None => HashSet::new(),
        };

        let mut builder = Self {
            data,
            identity,
            views,
            active_view,
            concepts_by_name,
            subtypes: SubtypeMap::build(data),
            child_count: forest.child_count,
            hubs,
            context,
            visible,
            ghosts,
            catalog: ExternalCatalog::build(&data.external_concepts),
            fibo: FiboIndex::default(),
        };
        builder.fibo = builder.fibo_index();
        builder.visible.extend(builder.ghosts.iter().copied());
        builder
    }

    fn gate(&self) -> EdgeGate<'_> {
        EdgeGate::new(
            &self.visible,
            &self.ghosts,
            self.identity,
            self.views,
            self.active_view,
        )
    }

    fn is_visible(&self, name: &str) -> bool {
        self.visible.contains(name)
    }

    /// Visible concepts that are not ghosts, in payload order.
    fn visible_concepts(&self) -> impl Iterator<Item = &'a Concept> + '_ {
        self.data.concepts.iter().filter(|c| {
            self.visible.contains(c.name.as_str()) && !self.ghosts.contains(c.name.as_str())
        })
    }

    fn fibo_index(&self) -> FiboIndex {
        let mut index = FiboIndex::default();
        for concept in self.visible_concepts() {
            let Some(mapping) = concept.fibo_mapping.as_ref() else {
                continue;
            };
            let Some(label) = mapping.label.as_deref().filter(|l| !l.is_empty()) else {
                continue;
            };
            let key = format!("FIBO:{}", label.to_lowercase());
            if let Some(definition) = mapping.fibo_definition.as_ref() {
                index.definitions.insert(key.clone(), definition.clone());
            }
            if let Some(uri) = mapping.uri.as_ref() {
                index.uris.insert(key, uri.clone());
            }
        }
        index
    }

    fn concept_nodes(&self, out: &mut ElementSet) {
        for concept in self.visible_concepts() {
            let name = concept.name.as_str();
            let is_hub = self.hubs.contains(name);
            let is_context = self.context.contains(name);
            let mapping = concept.fibo_mapping.as_ref();
            let detail = NodeDetail::Concept {
                qname: concept.qname.clone(),
                definition: concept.definition_text().to_owned(),
                source: concept.definition_source(),
                match_type: concept.fibo_match_type(),
                fibo_uri: mapping.and_then(|m| m.uri.clone()),
                fibo_label: mapping.and_then(|m| m.label.clone()),
                has_fibo: concept.has_direct_fibo(),
                has_schema: concept.has_schema_mapping,
                child_count: self.child_count.get(name).copied().unwrap_or(0),
                subtype_count: self.subtypes.child_count(name),
                is_hub,
                is_context,
                marked_external: None,
            };
            let mut node = NodeSpec::new(concept.identity(), name, detail)
                .with_class(ConceptClass::of(concept).tag());
            if is_hub {
                node = node.with_class(classes::HUB);
            }
            if is_context {
                node = node.with_class(classes::CONTEXT);
            }
            if !out.add_node(node) {
                tracing::debug!(concept = name, "duplicate concept identity");
            }
        }
    }

    fn ghost_nodes(&self, out: &mut ElementSet) {
        for concept in &self.data.concepts {
            if !self.ghosts.contains(concept.name.as_str()) {
                continue;
            }
            let identity = concept.identity();
            let source_view = self
                .views
                .views_of(identity)
                .and_then(|ids| ids.iter().next())
                .cloned();
            let source_view_name = source_view
                .as_deref()
                .map_or_else(|| "unknown".to_owned(), view_display_name);
            let detail = NodeDetail::Ghost {
                qname: concept.qname.clone(),
                definition: concept.definition_text().to_owned(),
                source: concept.definition_source(),
                source_view,
                source_view_name,
            };
            out.add_node(NodeSpec::new(identity, &concept.name, detail).with_class(classes::GHOST));
        }
    }

    fn categorization_edges(&self, out: &mut ElementSet) {
        let gate = self.gate();
        let mut groups: IndexMap<(&str, &str), Vec<&str>> = IndexMap::new();
        for cat in &self.data.categorizations {
            if cat.is_is_a() {
                continue;
            }
            let parent = cat.parent_name.as_str();
            if parent.is_empty() {
                tracing::debug!(category = %cat.category_name, "skipping categorization without parent");
                continue;
            }
            if !self.is_visible(parent) {
                continue;
            }
            let valid: Vec<&str> = cat
                .children_names
                .iter()
                .map(String::as_str)
                .filter(|child| self.is_visible(child) && gate.allows(parent, child))
                .collect();
            if valid.is_empty() {
                continue;
            }
            let group = groups
                .entry((parent, cat.category_name.as_str()))
                .or_default();
            for child in valid {
                if !group.contains(&child) {
                    group.push(child);
                }
            }
        }

        let mut junctions = 0;
        for ((parent, label), children) in groups {
            let parent_q = self.identity.resolve(parent);
            if let [child] = children.as_slice() {
                let edge = EdgeSpec::new(
                    format!("cat-{parent}-to-{child}"),
                    EdgeKind::Categorization,
                    parent_q,
                    self.identity.resolve(child),
                )
                .with_label(label);
                out.add_edge(edge);
                continue;
            }

            let junction_id = unique_node_id(
                out,
                format!("junction-{parent}-{}", underscore_whitespace(label)),
            );
            let display = if label.is_empty() { "●" } else { label };
            let junction = NodeSpec::new(
                junction_id.as_str(),
                display,
                NodeDetail::Junction {
                    parent: parent_q.to_owned(),
                    label: label.to_owned(),
                    index: junctions,
                },
            )
            .with_class(classes::JUNCTION);
            out.add_node(junction);
            junctions += 1;

            out.add_edge(
                EdgeSpec::new(
                    format!("trunk-{parent}-to-{junction_id}"),
                    EdgeKind::Trunk,
                    parent_q,
                    junction_id.as_str(),
                )
                .with_label(label),
            );
            for child in children {
                out.add_edge(EdgeSpec::new(
                    format!("branch-{junction_id}-to-{child}"),
                    EdgeKind::Branch,
                    junction_id.as_str(),
                    self.identity.resolve(child),
                ));
            }
        }
    }

    fn relationship_edges(&self, out: &mut ElementSet) {
        let gate = self.gate();
        for (index, rel) in self.data.relationships.iter().enumerate() {
            if rel.is_is_a() {
                continue;
            }
            let (subject, object) = (rel.subject.as_str(), rel.object.as_str());
            if subject.is_empty() || object.is_empty() {
                tracing::debug!(index, "skipping relationship with a missing endpoint");
                continue;
            }
            if !(self.is_visible(subject) && self.is_visible(object) && gate.allows(subject, object)) {
                continue;
            }
            let id = match rel.id.as_deref() {
                Some(id) => format!("rel-{id}"),
                None => format!("rel-auto-{index}"),
            };
            let edge = EdgeSpec::new(
                id,
                EdgeKind::Relationship,
                self.identity.resolve(subject),
                self.identity.resolve(object),
            )
            .with_end_labels(rel.verb_phrase.as_str(), rel.inverse_verb_phrase.as_str())
            .context(rel.is_context);
            out.add_edge(edge);
        }
    }

    /// Emits subsumption edges and returns the external parents they reference.
    fn subsumption_edges(&self, out: &mut ElementSet) -> ExternalRefs {
        let gate = self.gate();
        let mut refs = ExternalRefs::default();
        let mut has_subsumption: HashSet<&str> = HashSet::new();

        for sub in &self.data.subsumptions {
            if !sub.is_well_formed() {
                tracing::debug!(child = %sub.child, parent = %sub.parent, "skipping malformed subsumption");
                continue;
            }
            let child = sub.child.as_str();
            has_subsumption.insert(child);
            let child_q = self.identity.resolve(child);

            if let Some(uri) = sub.external_uri.as_deref() {
                let ext_q = match self.catalog.by_uri.get(uri).and_then(|e| e.qname.as_deref()) {
                    Some(qname) => qname.to_owned(),
                    None if sub.parent.is_empty() => format!("ext:{}", last_uri_segment(uri)),
                    None => format!("ext:{}", sub.parent),
                };
                refs.reference(&ext_q, Some(uri));
                if self.is_visible(child) {
                    out.add_edge(
                        EdgeSpec::new(
                            format!("sub-{child_q}-to-{ext_q}"),
                            EdgeKind::Subsumption,
                            child_q,
                            ext_q.as_str(),
                        )
                        .with_source_label(sub.label())
                        .context(sub.is_context),
                    );
                }
            } else {
                let parent = sub.parent.as_str();
                if self.is_visible(child) && self.is_visible(parent) && gate.allows(child, parent) {
                    let parent_q = self.identity.resolve(parent);
                    out.add_edge(
                        EdgeSpec::new(
                            format!("sub-{child_q}-to-{parent_q}"),
                            EdgeKind::Subsumption,
                            child_q,
                            parent_q,
                        )
                        .with_source_label(sub.label())
                        .context(sub.is_context),
                    );
                }
            }
        }

        for concept in self.visible_concepts() {
            let name = concept.name.as_str();
            if has_subsumption.contains(name) {
                continue;
            }
            let Some(mapping) = concept.fibo_mapping.as_ref() else {
                continue;
            };
            let Some(uri) = mapping.uri.as_deref().filter(|u| !u.is_empty()) else {
                continue;
            };
            if mapping.match_type == MatchType::NoMatch {
                continue;
            }
            let parent_q = match self.catalog.by_fibo_uri(uri).and_then(|e| e.qname.as_deref()) {
                Some(qname) => qname.to_owned(),
                None => {
                    let raw = mapping
                        .label
                        .as_deref()
                        .filter(|l| !l.is_empty())
                        .unwrap_or_else(|| last_uri_segment(uri));
                    format!("FIBO:{}", title_case(raw))
                }
            };
            refs.reference(&parent_q, Some(uri));
            has_subsumption.insert(name);

            let label = if mapping.match_type.is_equivalence() {
                SAME_AS
            } else {
                DEFAULT_SUBSUMPTION_LABEL
            };
            let child_q = self.identity.resolve(name);
            tracing::debug!(concept = name, parent = %parent_q, "derived FIBO subsumption");
            out.add_edge(
                EdgeSpec::new(
                    format!("sub-auto-{child_q}-to-{parent_q}"),
                    EdgeKind::Subsumption,
                    child_q,
                    parent_q.as_str(),
                )
                .with_source_label(label)
                .context(concept.is_context_reference())
                .with_parent_definition(mapping.fibo_definition.clone()),
            );
        }

        for concept in self.visible_concepts() {
            let name = concept.name.as_str();
            if has_subsumption.contains(name) || !concept.has_schema_mapping {
                continue;
            }
            let Some(extends) = concept.extends().filter(|e| e.starts_with("schema:")) else {
                continue;
            };
            let Some(ext) = self.catalog.by_qname.get(extends) else {
                continue;
            };
            let schema_q = ext.qname.as_deref().unwrap_or(extends);
            refs.reference(schema_q, ext.uri.as_deref());

            let label = if name.to_lowercase() == ext.display_name().to_lowercase() {
                SAME_AS
            } else {
                DEFAULT_SUBSUMPTION_LABEL
            };
            let child_q = self.identity.resolve(name);
            out.add_edge(
                EdgeSpec::new(
                    format!("sub-schema-{child_q}-to-{schema_q}"),
                    EdgeKind::Subsumption,
                    child_q,
                    schema_q,
                )
                .with_source_label(label)
                .context(concept.is_context_reference())
                .with_parent_definition(ext.definition.clone()),
            );
        }

        refs
    }

    /// Emits one node per referenced external parent. Resolution order:
    /// stored URI, legacy `FIBO:`/`Schema.org:` name, catalogued qname, raw
    /// qname, and finally a same-named Schema.org-sourced concept, which is
    /// marked external instead of getting a node of its own.
    fn external_nodes(&self, refs: &ExternalRefs, out: &mut ElementSet) {
        for (reference, stored_uri) in &refs.uris {
            let catalogued = stored_uri
                .as_deref()
                .and_then(|uri| self.catalog.by_uri.get(uri))
                .or_else(|| self.catalog.by_legacy_ref.get(reference.as_str()))
                .or_else(|| self.catalog.by_qname.get(reference.as_str()));
            if let Some(ext) = catalogued {
                let detail = NodeDetail::External {
                    qname: ext.qname.clone(),
                    definition: ext.definition.clone().unwrap_or_default(),
                    authority: Authority::of_external(ext.external_type),
                    uri: ext.uri.clone(),
                    external_type: ext.external_type,
                };
                let id = ext.qname.as_deref().unwrap_or(reference);
                out.add_node(NodeSpec::new(id, ext.display_name(), detail).with_class(classes::EXTERNAL));
                continue;
            }

            if let Some((prefix, short)) = legacy_prefix(reference) {
                let key = format!("{prefix}:{}", short.to_lowercase());
                let (authority, external_type) = if prefix == "FIBO" {
                    (Authority::Fibo, ExternalType::Fibo)
                } else {
                    (Authority::SchemaOrg, ExternalType::SchemaOrg)
                };
                let detail = NodeDetail::External {
                    qname: None,
                    definition: self.fibo.definitions.get(&key).cloned().unwrap_or_default(),
                    authority,
                    uri: stored_uri.clone().or_else(|| self.fibo.uris.get(&key).cloned()),
                    external_type,
                };
                out.add_node(NodeSpec::new(reference.as_str(), short, detail).with_class(classes::EXTERNAL));
            } else if let Some((prefix, local)) = reference.rsplit_once(':') {
                let omg = prefix.starts_with("omg-");
                let detail = NodeDetail::External {
                    qname: Some(reference.clone()),
                    definition: self.fibo.definitions.get(reference).cloned().unwrap_or_default(),
                    authority: if omg { Authority::OmgCommons } else { Authority::Fibo },
                    uri: stored_uri.clone().or_else(|| self.fibo.uris.get(reference).cloned()),
                    external_type: if omg { ExternalType::Omg } else { ExternalType::Fibo },
                };
                out.add_node(NodeSpec::new(reference.as_str(), local, detail).with_class(classes::EXTERNAL));
            } else {
                self.mark_schema_concept(short_name(reference), out);
            }
        }
    }

    fn mark_schema_concept(&self, name: &str, out: &mut ElementSet) {
        let schema_sourced = self.concepts_by_name.get(name).is_some_and(|c| {
            c.sources
                .iter()
                .any(|s| s.source_type.as_deref() == Some("schema.org"))
        });
        if !schema_sourced {
            return;
        }
        if let Some(node) = out.nodes_mut().find(|n| n.name == name) {
            node.classes.insert(classes::EXTERNAL);
            if let NodeDetail::Concept {
                marked_external, ..
            } = &mut node.detail
            {
                *marked_external = Some(Authority::SchemaOrg);
            }
        }
    }

    fn property_elements(&self, out: &mut ElementSet) {
        let mut added_types: HashSet<String> = HashSet::new();
        for pt in &self.data.property_types {
            if self.is_visible(&pt.name) {
                tracing::debug!(property_type = %pt.name, "property type shadowed by a concept");
                continue;
            }
            let id = format!("pt-{}", pt.id);
            let is_primitive = is_primitive_type(&pt.name);
            let mut node = NodeSpec::new(
                id.as_str(),
                pt.name.as_str(),
                NodeDetail::PropertyType {
                    definition: pt.definition.clone().unwrap_or_default(),
                    is_primitive,
                },
            )
            .with_class(classes::PROPERTY_TYPE);
            if is_primitive {
                node = node.with_class(classes::PRIMITIVE);
            }
            if out.add_node(node) {
                added_types.insert(id);
            }
        }

        let concept_names: HashMap<&str, &str> = self
            .data
            .concepts
            .iter()
            .filter_map(|c| c.id.as_deref().map(|id| (id, c.name.as_str())))
            .collect();

        for prop in &self.data.properties {
            let parent = prop.parent_concept.as_str();
            if !self.is_visible(parent) {
                continue;
            }
            let parent_q = self.identity.resolve(parent);
            let prop_id = format!("prop-{}", prop.id);
            out.add_node(
                NodeSpec::new(
                    prop_id.as_str(),
                    prop.name.as_str(),
                    NodeDetail::Property {
                        parent_concept: parent.to_owned(),
                        parent_qname: parent_q.to_owned(),
                        type_name: prop.type_name.clone(),
                        annotations: prop.annotations.clone(),
                    },
                )
                .with_class(classes::PROPERTY),
            );
            out.add_edge(
                EdgeSpec::new(
                    format!("has-prop-{parent_q}-{}", prop.id),
                    EdgeKind::HasProperty,
                    parent_q,
                    prop_id.as_str(),
                )
                .with_label("has property"),
            );

            if let Some(type_id) = prop.type_id.as_deref() {
                let type_node = format!("pt-{type_id}");
                if added_types.contains(&type_node) {
                    out.add_edge(
                        EdgeSpec::new(
                            format!("has-type-{}", prop.id),
                            EdgeKind::HasType,
                            prop_id.as_str(),
                            type_node,
                        )
                        .with_label("has type"),
                    );
                }
            }

            let definition = prop
                .definition_concept_id
                .as_deref()
                .and_then(|id| concept_names.get(id).copied())
                .filter(|name| self.is_visible(name));
            if let Some(name) = definition {
                out.add_edge(
                    EdgeSpec::new(
                        format!("isa-{}", prop.id),
                        EdgeKind::IsA,
                        prop_id.as_str(),
                        self.identity.resolve(name),
                    )
                    .with_label("is a"),
                );
            }
        }
    }
}

/// Splits a legacy `FIBO:X` / `Schema.org:X` reference.
fn legacy_prefix(reference: &str) -> Option<(&'static str, &str)> {
    ["FIBO", "Schema.org"].into_iter().find_map(|prefix| {
        reference
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_prefix(':'))
            .map(|short| (prefix, short))
    })
}
