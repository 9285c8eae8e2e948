//! Subsumption parent → children index and connectivity ranking.

use std::collections::HashMap;

use bkb_model::{Concept, DomainData};

/// Internal parent name → child names, from subsumption records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubtypeMap {
    children: HashMap<String, Vec<String>>,
}

impl SubtypeMap {
    /// Indexes every subsumption that names both a child and an internal
    /// parent. External-only parents are not indexed.
    #[must_use]
    pub fn build(data: &DomainData) -> Self {
        let mut children: HashMap<String, Vec<String>> = HashMap::new();
        for sub in &data.subsumptions {
            if sub.child.is_empty() || sub.parent.is_empty() {
                continue;
            }
            children
                .entry(sub.parent.clone())
                .or_default()
                .push(sub.child.clone());
        }
        Self { children }
    }

    /// Child names of `parent`, in record order.
    #[must_use]
    pub fn children_of(&self, parent: &str) -> &[String] {
        self.children.get(parent).map_or(&[], Vec::as_slice)
    }

    /// Number of children of `parent`.
    #[must_use]
    pub fn child_count(&self, parent: &str) -> usize {
        self.children_of(parent).len()
    }
}

/// Connectivity score of a concept: its subsumption children plus one for a
/// direct FIBO match.
#[must_use]
pub fn connectivity(concept: &Concept, subtypes: &SubtypeMap) -> usize {
    subtypes.child_count(&concept.name) + usize::from(concept.has_direct_fibo())
}

/// The `limit` best-connected concepts, highest score first. Ties keep
/// payload order.
#[must_use]
pub fn top_concepts<'a>(data: &'a DomainData, subtypes: &SubtypeMap, limit: usize) -> Vec<&'a Concept> {
    let mut ranked: Vec<(&Concept, usize)> = data
        .concepts
        .iter()
        .map(|c| (c, connectivity(c, subtypes)))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.into_iter().take(limit).map(|(c, _)| c).collect()
}
