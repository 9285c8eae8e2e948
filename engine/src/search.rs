//! Name search over the element arena.

use crate::classes;
use crate::elements::ElementSet;

/// Shortest query that highlights anything.
pub const MIN_QUERY_CHARS: usize = 2;

/// Tags every node whose name contains `query` (case-insensitively) with
/// `highlighted`, clearing the tag everywhere else. Queries shorter than
/// [`MIN_QUERY_CHARS`] clear every highlight. Returns the number of hits.
pub fn highlight(set: &mut ElementSet, query: &str) -> usize {
    let needle = query.trim().to_lowercase();
    let active = needle.chars().count() >= MIN_QUERY_CHARS;

    let mut hits = 0;
    for node in set.nodes_mut() {
        if active && !node.is_junction() && node.name.to_lowercase().contains(&needle) {
            node.classes.insert(classes::HIGHLIGHTED);
            hits += 1;
        } else {
            node.classes.remove(classes::HIGHLIGHTED);
        }
    }
    if active {
        tracing::debug!(query, hits, "search highlight");
    }
    hits
}

/// Ids of currently highlighted nodes, in insertion order.
#[must_use]
pub fn highlighted(set: &ElementSet) -> Vec<&str> {
    set.nodes()
        .filter(|n| n.has_class(classes::HIGHLIGHTED))
        .map(|n| n.id.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{NodeDetail, NodeSpec};

    fn set() -> ElementSet {
        let mut set = ElementSet::new();
        for name in ["TradeOrder", "Order", "Customer"] {
            set.add_node(NodeSpec::new(
                name,
                name,
                NodeDetail::PropertyType {
                    definition: String::new(),
                    is_primitive: false,
                },
            ));
        }
        set
    }

    #[test]
    fn case_insensitive_substring() {
        let mut set = set();
        assert_eq!(highlight(&mut set, "ORD"), 2);
        assert_eq!(highlighted(&set), vec!["TradeOrder", "Order"]);
    }

    #[test]
    fn short_query_clears() {
        let mut set = set();
        highlight(&mut set, "cust");
        assert_eq!(highlighted(&set), vec!["Customer"]);
        assert_eq!(highlight(&mut set, "c"), 0);
        assert!(highlighted(&set).is_empty());
    }

    #[test]
    fn new_query_replaces_old_hits() {
        let mut set = set();
        highlight(&mut set, "order");
        highlight(&mut set, "customer");
        assert_eq!(highlighted(&set), vec!["Customer"]);
    }
}
