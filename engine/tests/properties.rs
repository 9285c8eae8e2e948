//! Property tests over randomly generated domains.

use std::collections::HashMap;

use bkb_engine::{
    apply_filter, build, compute_visibility, filter_counts, EdgeKind, ElementSet, IdentityMap,
    NodeDetail, Toggles, ViewIndex,
};
use bkb_model::{
    Categorization, Concept, ConceptKind, DomainData, Property, PropertyType, Relationship,
    SourceRef, Subsumption,
};
use proptest::prelude::*;

const NAMES: usize = 8;
const VIEWS: [&str; 2] = ["Alpha", "Beta"];
/// `C1` shadows a concept of the same name; `String` is primitive.
const TYPES: [&str; 4] = ["String", "ISIN", "C1", "Amount"];

fn name(i: usize) -> String {
    format!("C{i}")
}

fn concept_strategy() -> impl Strategy<Value = (usize, bool, bool)> {
    (0..VIEWS.len(), any::<bool>(), any::<bool>())
}

fn domain_strategy() -> impl Strategy<Value = DomainData> {
    (
        prop::collection::vec(concept_strategy(), NAMES),
        prop::collection::vec((0..NAMES, prop::collection::vec(0..NAMES + 2, 1..4), 0..3usize), 0..6),
        prop::collection::vec((0..NAMES, 0..NAMES, any::<bool>()), 0..8),
        prop::collection::vec((0..NAMES, 0..NAMES), 0..4),
        prop::collection::vec((0..NAMES + 1, 0..TYPES.len()), 0..6),
    )
        .prop_map(|(concepts, cats, rels, subs, props)| DomainData {
            concepts: concepts
                .into_iter()
                .enumerate()
                .map(|(i, (view, context_kind, context_source))| Concept {
                    name: name(i),
                    qname: (i % 3 == 0).then(|| format!("bkb:{}", name(i))),
                    kind: if context_kind {
                        ConceptKind::ContextReference
                    } else {
                        ConceptKind::Domain
                    },
                    sources: vec![SourceRef {
                        file: format!("{}.cs", VIEWS[view]),
                        is_context: context_source,
                        ..SourceRef::default()
                    }],
                    ..Concept::default()
                })
                .collect(),
            // Indices past NAMES name concepts that do not exist.
            categorizations: cats
                .into_iter()
                .map(|(parent, children, label)| Categorization {
                    parent_name: name(parent),
                    category_name: ["kind", "by size", ""][label].to_string(),
                    children_names: children.into_iter().map(name).collect(),
                    ..Categorization::default()
                })
                .collect(),
            relationships: rels
                .into_iter()
                .map(|(s, o, is_context)| Relationship {
                    subject: name(s),
                    object: name(o),
                    verb_phrase: "relates to".into(),
                    is_context,
                    ..Relationship::default()
                })
                .collect(),
            subsumptions: subs
                .into_iter()
                .map(|(c, p)| Subsumption {
                    child: name(c),
                    parent: name(p),
                    ..Subsumption::default()
                })
                .collect(),
            properties: props
                .into_iter()
                .enumerate()
                .map(|(i, (parent, ty))| Property {
                    id: format!("p{i}"),
                    name: format!("attr{i}"),
                    parent_concept: name(parent),
                    type_name: TYPES[ty].to_string(),
                    type_id: Some(format!("t{ty}")),
                    ..Property::default()
                })
                .collect(),
            property_types: TYPES
                .iter()
                .enumerate()
                .map(|(i, ty)| PropertyType {
                    id: format!("t{i}"),
                    name: (*ty).to_string(),
                    ..PropertyType::default()
                })
                .collect(),
            ..DomainData::default()
        })
}

fn toggles_strategy() -> impl Strategy<Value = Toggles> {
    prop::array::uniform9(any::<bool>()).prop_map(|t| Toggles {
        domain: t[0],
        fibo: t[1],
        schema: t[2],
        context: t[3],
        categorizations: t[4],
        relationships: t[5],
        orphans: t[6],
        transitive: t[7],
        primitive: t[8],
    })
}

fn view_strategy() -> impl Strategy<Value = Option<&'static str>> {
    prop_oneof![Just(None), Just(Some(VIEWS[0])), Just(Some(VIEWS[1]))]
}

fn built(data: &DomainData, view: Option<&str>) -> (ElementSet, ViewIndex) {
    let identity = IdentityMap::build(data);
    let mut views = ViewIndex::extract(data);
    views.set_active(view);
    (build(data, &identity, &views, view), views)
}

proptest! {
    #[test]
    fn build_is_deterministic(data in domain_strategy(), view in view_strategy()) {
        let (first, _) = built(&data, view);
        let (second, _) = built(&data, view);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn edges_resolve_and_ghosts_stay_apart(data in domain_strategy(), view in view_strategy()) {
        let (set, _) = built(&data, view);
        for edge in set.edges() {
            let source = set.node(&edge.source);
            let target = set.node(&edge.target);
            prop_assert!(source.is_some() && target.is_some(), "dangling edge {}", edge.id);
            let both_ghosts = source.is_some_and(|n| n.is_ghost()) && target.is_some_and(|n| n.is_ghost());
            prop_assert!(!both_ghosts, "ghost-to-ghost edge {}", edge.id);
        }
        if view.is_none() {
            prop_assert!(set.nodes().all(|n| !n.is_ghost()));
        }
    }

    #[test]
    fn junctions_have_one_trunk_and_several_branches(data in domain_strategy(), view in view_strategy()) {
        let (set, _) = built(&data, view);
        let mut trunks: HashMap<&str, usize> = HashMap::new();
        let mut branches: HashMap<&str, usize> = HashMap::new();
        for edge in set.edges() {
            match edge.kind {
                EdgeKind::Trunk => *trunks.entry(edge.target.as_str()).or_default() += 1,
                EdgeKind::Branch => *branches.entry(edge.source.as_str()).or_default() += 1,
                _ => {}
            }
        }
        for junction in set.nodes().filter(|n| n.is_junction()) {
            let id = junction.id.as_str();
            prop_assert_eq!(trunks.get(id).copied(), Some(1));
            prop_assert!(branches.get(id).copied().unwrap_or(0) >= 2);
        }
    }

    #[test]
    fn orphans_off_only_hides(data in domain_strategy(), view in view_strategy(), toggles in toggles_strategy()) {
        let (set, views) = built(&data, view);
        let with = compute_visibility(&set, &Toggles { orphans: true, ..toggles }, &views);
        let without = compute_visibility(&set, &Toggles { orphans: false, ..toggles }, &views);
        prop_assert!(without.nodes.is_subset(&with.nodes));

        let mut scratch = set.clone();
        apply_filter(&mut scratch, &Toggles { orphans: true, ..toggles }, &views);
        apply_filter(&mut scratch, &Toggles { orphans: false, ..toggles }, &views);
        apply_filter(&mut scratch, &Toggles { orphans: true, ..toggles }, &views);
        let restored = compute_visibility(&scratch, &Toggles { orphans: true, ..toggles }, &views);
        prop_assert_eq!(restored, with);
    }

    #[test]
    fn counts_ignore_toggles(data in domain_strategy(), view in view_strategy(), toggles in toggles_strategy()) {
        let (mut set, views) = built(&data, view);
        let baseline = filter_counts(&set, &views);
        apply_filter(&mut set, &toggles, &views);
        prop_assert_eq!(filter_counts(&set, &views), baseline);
    }

    #[test]
    fn visible_edges_have_visible_endpoints(data in domain_strategy(), view in view_strategy(), toggles in toggles_strategy()) {
        let (mut set, views) = built(&data, view);
        apply_filter(&mut set, &toggles, &views);
        for edge in set.visible_edges() {
            let shown = |id: &str| set.node(id).is_some_and(|n| !n.hidden);
            prop_assert!(shown(&edge.source) && shown(&edge.target), "edge {} shown alone", edge.id);
        }
        if !toggles.transitive {
            prop_assert!(set.edges().all(|e| e.kind != EdgeKind::Transitive));
        }
    }

    #[test]
    fn primitives_and_orphaned_types_stay_hidden(data in domain_strategy(), view in view_strategy(), toggles in toggles_strategy()) {
        let (mut set, views) = built(&data, view);
        apply_filter(&mut set, &toggles, &views);
        if !toggles.primitive {
            prop_assert!(set.visible_nodes().all(|n| !n.has_class("primitive")));
        }
        if view.is_none() {
            prop_assert!(!set.contains_node("pt-t2"), "a concept named C1 shadows its type");
        }
        for ty in set.visible_nodes().filter(|n| n.is_property_type()) {
            let used = set.nodes().any(|p| {
                matches!(&p.detail, NodeDetail::Property { type_name, .. } if *type_name == ty.name)
            });
            prop_assert!(used, "type {} shown without properties", ty.id);
        }
    }
}
