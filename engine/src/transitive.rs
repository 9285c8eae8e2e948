//! Transitive bridges over hidden intermediates.
//!
//! With the `transitive` toggle on, two visible nodes that are connected only
//! through hidden nodes (or junctions, which are always pass-through) get a
//! synthetic [`EdgeKind::Transitive`] edge carrying the hop count and the
//! traversed path. Adjacency covers every semantic edge regardless of its own
//! visibility, so a bridge survives its constituent edges being hidden.

use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};

use crate::elements::{EdgeKind, EdgeSpec, ElementSet};

/// Separator between node ids in a bridge's path.
pub const PATH_SEPARATOR: &str = " → ";

/// Computes the bridges for the current visibility flags.
///
/// Each unordered endpoint pair yields at most one edge, discovered from the
/// earlier node in insertion order. Bridges are returned, not inserted.
#[must_use]
pub fn compute_transitive_edges(set: &ElementSet) -> Vec<EdgeSpec> {
    let mut adjacency: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for edge in set.edges().filter(|e| e.kind.is_semantic()) {
        adjacency
            .entry(edge.source.as_str())
            .or_default()
            .insert(edge.target.as_str());
        adjacency
            .entry(edge.target.as_str())
            .or_default()
            .insert(edge.source.as_str());
    }

    let mut pairs: HashSet<(&str, &str)> = HashSet::new();
    let mut bridges = Vec::new();
    for start in set.visible_nodes().filter(|n| !n.is_junction()) {
        let start_id = start.id.as_str();
        let mut reached = HashSet::from([start_id]);
        let mut queue = VecDeque::from([(start_id, 0_usize, vec![start_id])]);

        while let Some((current, hops, path)) = queue.pop_front() {
            for &next in adjacency.get(current).into_iter().flatten() {
                if !reached.insert(next) {
                    continue;
                }
                let Some(node) = set.node(next) else {
                    continue;
                };
                let hops = hops + 1;
                let mut path = path.clone();
                path.push(next);

                if node.hidden || node.is_junction() {
                    queue.push_back((next, hops, path));
                } else if hops > 1 {
                    let key = if start_id <= next {
                        (start_id, next)
                    } else {
                        (next, start_id)
                    };
                    if pairs.insert(key) {
                        bridges.push(bridge(start_id, next, hops, &path));
                    }
                }
            }
        }
    }

    tracing::debug!(bridges = bridges.len(), "computed transitive edges");
    bridges
}

fn bridge(from: &str, to: &str, hops: usize, path: &[&str]) -> EdgeSpec {
    let mut edge = EdgeSpec::new(format!("transitive-{from}-{to}"), EdgeKind::Transitive, from, to);
    edge.hops = Some(hops);
    edge.path = Some(path.join(PATH_SEPARATOR));
    edge
}

/// Removes every previously added bridge. Returns the number removed.
pub fn remove_transitive_edges(set: &mut ElementSet) -> usize {
    let before = set.edge_count();
    set.retain_edges(|e| e.kind != EdgeKind::Transitive);
    before - set.edge_count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classes;
    use crate::elements::{NodeDetail, NodeSpec};
    use bkb_model::{DefinitionSource, MatchType};

    fn node(id: &str, hidden: bool) -> NodeSpec {
        let mut node = NodeSpec::new(
            id,
            id,
            NodeDetail::Concept {
                qname: None,
                definition: String::new(),
                source: DefinitionSource::Draft,
                match_type: MatchType::NoMatch,
                fibo_uri: None,
                fibo_label: None,
                has_fibo: false,
                has_schema: false,
                child_count: 0,
                subtype_count: 0,
                is_hub: false,
                is_context: false,
                marked_external: None,
            },
        )
        .with_class(classes::DRAFT);
        node.hidden = hidden;
        node
    }

    fn chain(hidden: &[bool]) -> ElementSet {
        let ids = ["A", "B", "C", "D"];
        let mut set = ElementSet::new();
        for (id, h) in ids.iter().zip(hidden) {
            set.add_node(node(id, *h));
        }
        for pair in ids.windows(2) {
            set.add_edge(EdgeSpec::new(
                format!("{}{}", pair[0], pair[1]),
                EdgeKind::Relationship,
                pair[0],
                pair[1],
            ));
        }
        set
    }

    #[test]
    fn bridges_two_hidden_intermediates() {
        let set = chain(&[false, true, true, false]);
        let bridges = compute_transitive_edges(&set);
        assert_eq!(bridges.len(), 1);
        let edge = &bridges[0];
        assert_eq!(edge.id, "transitive-A-D");
        assert_eq!(edge.hops, Some(3));
        assert_eq!(edge.path.as_deref(), Some("A → B → C → D"));
    }

    #[test]
    fn adjacent_visible_nodes_are_not_bridged() {
        assert!(compute_transitive_edges(&chain(&[false; 4])).is_empty());
    }

    #[test]
    fn non_semantic_edges_are_ignored() {
        let mut set = chain(&[false, true, true, false]);
        set.retain_edges(|e| e.id != "BC");
        set.add_edge(EdgeSpec::new("BC", EdgeKind::HasProperty, "B", "C"));
        assert!(compute_transitive_edges(&set).is_empty());
    }

    #[test]
    fn removal_only_touches_bridges() {
        let mut set = chain(&[false, true, true, false]);
        for edge in compute_transitive_edges(&set) {
            set.add_edge(edge);
        }
        assert_eq!(set.edge_count(), 4);
        assert_eq!(remove_transitive_edges(&mut set), 1);
        assert_eq!(set.edge_count(), 3);
    }
}
