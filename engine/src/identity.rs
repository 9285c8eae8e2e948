//! Identity resolution: display name ↔ qualified name.
//!
//! A display name may be shared by a domain concept and an external standard
//! concept (`Date` in the domain vs. `omg:Date` in OMG Commons). Every
//! downstream stage keys nodes by qualified name, so names are resolved here
//! once. Domain concepts populate the map first; external concepts only fill
//! names the domain has not claimed.

use std::collections::HashMap;

use bkb_model::{Concept, DomainData, ExternalConcept};

/// Bidirectional name ↔ qname lookup for one loaded domain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityMap {
    name_to_qname: HashMap<String, String>,
    qname_to_name: HashMap<String, String>,
}

impl IdentityMap {
    /// Builds the map from a domain payload.
    #[must_use]
    pub fn build(data: &DomainData) -> Self {
        Self::from_parts(&data.concepts, &data.external_concepts)
    }

    /// Builds the map from the concept and external-concept lists.
    ///
    /// A domain concept without a qname claims its name with itself as
    /// identity, so a same-named external can never shadow it.
    #[must_use]
    pub fn from_parts(concepts: &[Concept], externals: &[ExternalConcept]) -> Self {
        let mut map = Self::default();
        for concept in concepts.iter().filter(|c| !c.name.is_empty()) {
            map.insert(&concept.name, concept.identity());
        }
        for ext in externals {
            let Some(qname) = ext.qname.as_deref() else {
                continue;
            };
            if ext.name.is_empty() || map.name_to_qname.contains_key(&ext.name) {
                continue;
            }
            map.insert(&ext.name, qname);
        }
        tracing::debug!(names = map.name_to_qname.len(), "built identity map");
        map
    }

    fn insert(&mut self, name: &str, qname: &str) {
        self.name_to_qname.insert(name.to_string(), qname.to_string());
        self.qname_to_name.insert(qname.to_string(), name.to_string());
    }

    /// Resolves a name to its identity. Unknown names resolve to themselves.
    #[must_use]
    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        self.name_to_qname.get(name).map_or(name, String::as_str)
    }

    /// Returns the mapped qname for `name`, if the name is known.
    #[must_use]
    pub fn qname_of(&self, name: &str) -> Option<&str> {
        self.name_to_qname.get(name).map(String::as_str)
    }

    /// Returns the display name registered for `qname`.
    #[must_use]
    pub fn name_of(&self, qname: &str) -> Option<&str> {
        self.qname_to_name.get(qname).map(String::as_str)
    }

    /// Number of resolvable names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.name_to_qname.len()
    }

    /// True when no names are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name_to_qname.is_empty()
    }
}
