//! Expand and collapse a concept's subsumption children in place.
//!
//! Expanding a node adds each subtype child that is not already in the set,
//! linked to the expanded node by an [`EdgeKind::Extends`] edge with id
//! `{parent}-to-{child}`. Collapsing removes the children those edges point
//! at, together with every edge touching them.

use bkb_model::DomainData;

use crate::classes::ConceptClass;
use crate::elements::{EdgeKind, EdgeSpec, ElementSet, NodeDetail, NodeSpec};
use crate::subtypes::SubtypeMap;

/// Adds the subsumption children of `node_id`. Returns `false` when the node
/// is unknown or every child is already present.
pub fn expand(set: &mut ElementSet, data: &DomainData, subtypes: &SubtypeMap, node_id: &str) -> bool {
    let Some(parent_name) = set.node(node_id).map(|n| n.name.clone()) else {
        return false;
    };

    let mut added = 0;
    for child in subtypes
        .children_of(&parent_name)
        .iter()
        .filter_map(|name| data.concept_named(name))
    {
        let child_id = child.identity();
        if set.contains_node(child_id) {
            continue;
        }
        let mapping = child.fibo_mapping.as_ref();
        let detail = NodeDetail::Concept {
            qname: child.qname.clone(),
            definition: child.definition_text().to_owned(),
            source: child.definition_source(),
            match_type: child.fibo_match_type(),
            fibo_uri: mapping.and_then(|m| m.uri.clone()),
            fibo_label: mapping.and_then(|m| m.label.clone()),
            has_fibo: child.has_direct_fibo(),
            has_schema: child.has_schema_mapping,
            child_count: 0,
            subtype_count: subtypes.child_count(&child.name),
            is_hub: false,
            is_context: false,
            marked_external: None,
        };
        set.add_node(
            NodeSpec::new(child_id, &child.name, detail).with_class(ConceptClass::of(child).tag()),
        );
        set.add_edge(EdgeSpec::new(
            format!("{node_id}-to-{child_id}"),
            EdgeKind::Extends,
            node_id,
            child_id,
        ));
        added += 1;
    }

    tracing::debug!(node = node_id, added, "expanded node");
    added > 0
}

/// Removes the children added by expanding `node_id`. Returns `false` when
/// the node has no `extends` edges.
pub fn collapse(set: &mut ElementSet, node_id: &str) -> bool {
    let children: Vec<String> = set
        .edges()
        .filter(|e| e.kind == EdgeKind::Extends && e.source == node_id)
        .map(|e| e.target.clone())
        .collect();
    if children.is_empty() {
        return false;
    }
    for child in &children {
        set.remove_node(child);
    }
    tracing::debug!(node = node_id, removed = children.len(), "collapsed node");
    true
}

/// True when `node_id` currently has expanded children.
#[must_use]
pub fn is_expanded(set: &ElementSet, node_id: &str) -> bool {
    set.edges()
        .any(|e| e.kind == EdgeKind::Extends && e.source == node_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build;
    use crate::identity::IdentityMap;
    use crate::views::ViewIndex;
    use bkb_model::{Concept, Subsumption};

    fn data() -> DomainData {
        let concept = |name: &str, qname: Option<&str>| Concept {
            name: name.into(),
            qname: qname.map(str::to_string),
            ..Concept::default()
        };
        let sub = |child: &str, parent: &str| Subsumption {
            child: child.into(),
            parent: parent.into(),
            ..Subsumption::default()
        };
        DomainData {
            concepts: vec![
                concept("Account", Some("bkb:Account")),
                concept("SavingsAccount", Some("bkb:SavingsAccount")),
                concept("CurrentAccount", None),
            ],
            subsumptions: vec![sub("SavingsAccount", "Account"), sub("CurrentAccount", "Account")],
            ..DomainData::default()
        }
    }

    #[test]
    fn expand_then_collapse() {
        let data = data();
        let subtypes = SubtypeMap::build(&data);
        let mut set = ElementSet::new();
        set.add_node(NodeSpec::new(
            "bkb:Account",
            "Account",
            NodeDetail::Junction {
                parent: String::new(),
                label: String::new(),
                index: 0,
            },
        ));

        assert!(expand(&mut set, &data, &subtypes, "bkb:Account"));
        assert!(set.contains_node("bkb:SavingsAccount"));
        assert!(set.contains_node("CurrentAccount"));
        let edge = set.edge("bkb:Account-to-bkb:SavingsAccount").unwrap();
        assert_eq!(edge.kind, EdgeKind::Extends);
        assert!(is_expanded(&set, "bkb:Account"));

        assert!(!expand(&mut set, &data, &subtypes, "bkb:Account"), "already expanded");

        assert!(collapse(&mut set, "bkb:Account"));
        assert_eq!(set.node_count(), 1);
        assert_eq!(set.edge_count(), 0);
        assert!(!collapse(&mut set, "bkb:Account"));
    }

    #[test]
    fn present_children_are_not_duplicated() {
        let data = data();
        let identity = IdentityMap::build(&data);
        let views = ViewIndex::extract(&data);
        let mut set = build(&data, &identity, &views, None);
        let before = set.node_count();
        assert!(!expand(&mut set, &data, &SubtypeMap::build(&data), "bkb:Account"));
        assert_eq!(set.node_count(), before);
        assert!(!expand(&mut set, &data, &SubtypeMap::build(&data), "missing"));
    }
}
