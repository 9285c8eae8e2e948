//! Domain hierarchy index.
//!
//! The index is a nested tree of folders and domains, keyed by display name
//! and kept in document order:
//!
//! ```json
//! { "hierarchy": {
//!     "RBCZ": { "type": "folder", "path": "RBCZ", "children": {
//!         "Investment": { "type": "domain", "path": "RBCZ/MIB/Investment",
//!                         "views": { "Order": { "path": "RBCZ/MIB/Investment/Order" } } }
//!     } }
//! } }
//! ```
//!
//! It is only used to discover load paths; the engine never walks it.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::de::null_default;
use crate::text::{domain_segment, strip_script_assignment};

/// Whether a hierarchy entry is a loadable domain or a grouping folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HierarchyKind {
    /// A grouping folder. Also the fallback for unknown values.
    #[default]
    Folder,
    /// A loadable domain.
    Domain,
}

impl From<String> for HierarchyKind {
    fn from(value: String) -> Self {
        if value == "domain" {
            HierarchyKind::Domain
        } else {
            HierarchyKind::Folder
        }
    }
}

impl From<HierarchyKind> for String {
    fn from(value: HierarchyKind) -> Self {
        match value {
            HierarchyKind::Folder => "folder".into(),
            HierarchyKind::Domain => "domain".into(),
        }
    }
}

/// A pre-split view bundle listed under a domain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewEntry {
    /// Load path of the view bundle.
    #[serde(deserialize_with = "null_default")]
    pub path: String,
}

/// One node of the hierarchy tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HierarchyEntry {
    /// Folder or domain.
    #[serde(rename = "type", deserialize_with = "null_default")]
    pub kind: HierarchyKind,
    /// Load path (slash-separated).
    #[serde(deserialize_with = "null_default")]
    pub path: String,
    /// Nested entries, in document order.
    #[serde(deserialize_with = "null_default", skip_serializing_if = "IndexMap::is_empty")]
    pub children: IndexMap<String, HierarchyEntry>,
    /// Pre-split view bundles keyed by view name.
    #[serde(deserialize_with = "null_default", skip_serializing_if = "IndexMap::is_empty")]
    pub views: IndexMap<String, ViewEntry>,
}

impl HierarchyEntry {
    /// True for loadable domains.
    #[must_use]
    pub fn is_domain(&self) -> bool {
        self.kind == HierarchyKind::Domain
    }
}

/// The root of the hierarchy document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainIndex {
    /// Top-level entries, in document order.
    #[serde(deserialize_with = "null_default")]
    pub hierarchy: IndexMap<String, HierarchyEntry>,
}

impl DomainIndex {
    /// Parses the index from JSON, accepting the `window.NAME = {...};` script
    /// form as well.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error when the text is not a valid index.
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(strip_script_assignment(text))
    }

    /// Returns the path of the first domain in depth-first document order.
    /// Folders are descended into, never returned.
    #[must_use]
    pub fn find_first_domain(&self) -> Option<&str> {
        fn walk(level: &IndexMap<String, HierarchyEntry>) -> Option<&str> {
            for entry in level.values() {
                if entry.is_domain() {
                    return Some(entry.path.as_str());
                }
                if let Some(found) = walk(&entry.children) {
                    return Some(found);
                }
            }
            None
        }
        walk(&self.hierarchy)
    }

    /// Returns the domain entry whose load path equals `path`. Folders never
    /// match, even when their path does.
    #[must_use]
    pub fn find_by_path(&self, path: &str) -> Option<(&str, &HierarchyEntry)> {
        fn walk<'a>(
            level: &'a IndexMap<String, HierarchyEntry>,
            path: &str,
        ) -> Option<(&'a str, &'a HierarchyEntry)> {
            for (name, entry) in level {
                if entry.is_domain() && entry.path == path {
                    return Some((name.as_str(), entry));
                }
                if let Some(found) = walk(&entry.children, path) {
                    return Some(found);
                }
            }
            None
        }
        walk(&self.hierarchy, path)
    }

    /// Resolves a domain display name (and optional view bundle name) to a
    /// load path.
    ///
    /// Each level is checked for a direct key match before descending into
    /// children. When `view` names a listed bundle its path wins over the
    /// domain's own.
    #[must_use]
    pub fn resolve_domain_path(&self, name: &str, view: Option<&str>) -> Option<&str> {
        fn find<'a>(
            level: &'a IndexMap<String, HierarchyEntry>,
            name: &str,
        ) -> Option<&'a HierarchyEntry> {
            if let Some(entry) = level.get(name) {
                return Some(entry);
            }
            level.values().find_map(|entry| find(&entry.children, name))
        }
        let entry = find(&self.hierarchy, name)?;
        if let Some(bundle) = view.and_then(|v| entry.views.get(v)) {
            return Some(bundle.path.as_str());
        }
        Some(entry.path.as_str())
    }

    /// Returns every domain entry in depth-first document order.
    #[must_use]
    pub fn domains(&self) -> Vec<(&str, &HierarchyEntry)> {
        fn walk<'a>(
            level: &'a IndexMap<String, HierarchyEntry>,
            out: &mut Vec<(&'a str, &'a HierarchyEntry)>,
        ) {
            for (name, entry) in level {
                if entry.is_domain() {
                    out.push((name.as_str(), entry));
                }
                walk(&entry.children, out);
            }
        }
        let mut out = Vec::new();
        walk(&self.hierarchy, &mut out);
        out
    }
}

/// Resolves a domain path (and optional view name) against the set of payload
/// keys of a combined bundle.
///
/// With a view the candidates are `segment_view`, `segmentview` and `view`;
/// without one they are the full lowercased path and then its last segment.
/// Returns the first candidate for which `has_key` holds.
pub fn resolve_domain_key<F>(domain_path: &str, view: Option<&str>, has_key: F) -> Option<String>
where
    F: Fn(&str) -> bool,
{
    let segment = domain_segment(domain_path);
    let candidates = match view {
        Some(view) => {
            let view = view.to_lowercase();
            vec![format!("{segment}_{view}"), format!("{segment}{view}"), view]
        }
        None => vec![domain_path.to_lowercase(), segment],
    };
    candidates.into_iter().find(|key| has_key(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    const INDEX: &str = r#"window.BKB_DOMAINS = {
        "hierarchy": {
            "Archive": { "type": "folder", "path": "Archive" },
            "RBCZ": { "type": "folder", "path": "RBCZ", "children": {
                "MIB": { "type": "folder", "path": "RBCZ/MIB", "children": {
                    "Investment": {
                        "type": "domain",
                        "path": "RBCZ/MIB/Investment",
                        "views": { "Order": { "path": "RBCZ/MIB/Investment/Order" } }
                    }
                } },
                "Payments": { "type": "domain", "path": "RBCZ/Payments" }
            } },
            "Test": { "type": "domain", "path": "Test" }
        }
    };"#;

    fn index() -> DomainIndex {
        DomainIndex::from_json_str(INDEX).unwrap()
    }

    /// Folders are skipped and document order is honored.
    #[test]
    fn first_domain_is_depth_first() {
        assert_eq!(index().find_first_domain(), Some("RBCZ/MIB/Investment"));
        assert_eq!(DomainIndex::default().find_first_domain(), None);
    }

    #[test]
    fn find_by_path_matches_domains_only() {
        let idx = index();
        let (name, entry) = idx.find_by_path("RBCZ/Payments").unwrap();
        assert_eq!(name, "Payments");
        assert!(entry.is_domain());
        assert!(idx.find_by_path("RBCZ/MIB").is_none(), "folders never match");
    }

    #[test]
    fn resolve_domain_path_prefers_view_bundle() {
        let idx = index();
        assert_eq!(
            idx.resolve_domain_path("Investment", None),
            Some("RBCZ/MIB/Investment")
        );
        assert_eq!(
            idx.resolve_domain_path("Investment", Some("Order")),
            Some("RBCZ/MIB/Investment/Order")
        );
        assert_eq!(
            idx.resolve_domain_path("Investment", Some("Unknown")),
            Some("RBCZ/MIB/Investment")
        );
        assert_eq!(idx.resolve_domain_path("Nope", None), None);
    }

    #[test]
    fn domains_lists_every_domain() {
        let idx = index();
        let names: Vec<&str> = idx.domains().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Investment", "Payments", "Test"]);
    }

    #[test]
    fn domain_key_resolution_order() {
        let keys = ["investment_order", "investmentorder", "order", "investment"];
        let has = |k: &str| keys.contains(&k);
        assert_eq!(
            resolve_domain_key("RBCZ:MIB:Investment", Some("Order"), has).as_deref(),
            Some("investment_order")
        );
        assert_eq!(
            resolve_domain_key("RBCZ:MIB:Investment", None, has).as_deref(),
            Some("investment")
        );
        let only_simple = |k: &str| k == "order";
        assert_eq!(
            resolve_domain_key("Investment", Some("Order"), only_simple).as_deref(),
            Some("order")
        );
        assert_eq!(resolve_domain_key("Other", None, has), None);
    }
}
