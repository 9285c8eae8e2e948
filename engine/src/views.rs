//! View index.
//!
//! A *view* is a named subset of concepts that share source-file provenance.
//! Views are derived, never stored: every concept (and external concept)
//! source record is mapped to a view id by [`view_id_for_file`], and the
//! concept's identity is added to that view's member set.
//!
//! # Entry Point
//!
//! ```
//! use bkb_engine::views::{view_display_name, ViewIndex};
//! use bkb_model::DomainData;
//!
//! let data = DomainData::from_json_str(r#"{"concepts": [
//!     {"name": "Date", "qname": "bkb:Date", "sources": [{"file": "diagrams/Investment-Position.cs"}]}
//! ]}"#).unwrap();
//!
//! let mut views = ViewIndex::extract(&data);
//! assert!(views.is_member("bkb:Date", "Position"));
//! assert_eq!(view_display_name("DP_EDI_AUM"), "DP EDI AUM");
//!
//! views.set_active(Some("Position"));
//! assert!(views.in_active_view("bkb:Date"));
//! assert!(!views.in_active_view("omg:Date"));
//! ```

use std::collections::{BTreeMap, BTreeSet, HashMap};

use bkb_model::{DomainData, SourceRef};
use serde::Serialize;

/// Source markers that never denote a view.
const TECHNICAL_MARKERS: &[&str] = &["cross-domain-reference"];

/// File extensions stripped from source file names (case-insensitive).
const VIEW_FILE_EXTENSIONS: &[&str] = &["json", "cs", "yaml", "yml", "test"];

/// Legacy file-name prefixes; at most one (the first that matches) is stripped.
const LEGACY_PREFIXES: &[(&str, bool)] = &[
    ("allininvestment", true),
    ("investment", true),
    ("financial", true),
    ("conceptspeak-training-", false),
];

/// One derived view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    /// View id, e.g. `"DP_EDI_AUM"`.
    pub id: String,
    /// Human-readable name, e.g. `"DP EDI AUM"`.
    pub name: String,
    /// Identities (qname, else name) of member concepts.
    pub members: BTreeSet<String>,
}

/// Listing entry for a view picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewSummary {
    /// View id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Number of member concepts.
    pub concept_count: usize,
}

/// All views of one loaded domain plus the active-view selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewIndex {
    views: BTreeMap<String, View>,
    concept_views: HashMap<String, BTreeSet<String>>,
    active: Option<String>,
}

impl ViewIndex {
    /// Derives every view from the payload's concept and external-concept
    /// sources. The result has no active view.
    #[must_use]
    pub fn extract(data: &DomainData) -> Self {
        let mut index = Self::default();
        let concepts = data.concepts.iter().map(|c| (c.identity(), &c.sources));
        let externals = data
            .external_concepts
            .iter()
            .map(|e| (e.identity(), &e.sources));
        for (identity, sources) in concepts.chain(externals) {
            for source in sources.iter() {
                let Some(view_id) = view_id_for_file(&source.file) else {
                    continue;
                };
                index.add_member(view_id, identity);
            }
        }
        tracing::info!(
            domain = %data.domain.name,
            views = index.views.len(),
            "extracted views"
        );
        index
    }

    fn add_member(&mut self, view_id: String, identity: &str) {
        self.concept_views
            .entry(identity.to_string())
            .or_default()
            .insert(view_id.clone());
        self.views
            .entry(view_id.clone())
            .or_insert_with(|| View {
                name: view_display_name(&view_id),
                id: view_id,
                members: BTreeSet::new(),
            })
            .members
            .insert(identity.to_string());
    }

    /// Returns the view with the given id.
    #[must_use]
    pub fn get(&self, view_id: &str) -> Option<&View> {
        self.views.get(view_id)
    }

    /// Iterates views in id order.
    pub fn iter(&self) -> impl Iterator<Item = &View> {
        self.views.values()
    }

    /// Number of views.
    #[must_use]
    pub fn len(&self) -> usize {
        self.views.len()
    }

    /// True when the domain has no views.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Returns the member identities of a view.
    #[must_use]
    pub fn members_of(&self, view_id: &str) -> Option<&BTreeSet<String>> {
        self.views.get(view_id).map(|v| &v.members)
    }

    /// Returns the ids of every view the identity belongs to, in id order.
    #[must_use]
    pub fn views_of(&self, identity: &str) -> Option<&BTreeSet<String>> {
        self.concept_views.get(identity)
    }

    /// True when the identity is a member of the view.
    #[must_use]
    pub fn is_member(&self, identity: &str, view_id: &str) -> bool {
        self.concept_views
            .get(identity)
            .is_some_and(|views| views.contains(view_id))
    }

    /// Selects the active view; `None` clears the filter.
    ///
    /// Unknown ids are accepted: an empty view simply filters everything out.
    pub fn set_active(&mut self, view_id: Option<&str>) {
        self.active = view_id.map(str::to_string);
    }

    /// Returns the active view id.
    #[must_use]
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Membership in the active view. Always true when no view is active.
    #[must_use]
    pub fn in_active_view(&self, identity: &str) -> bool {
        self.active
            .as_deref()
            .map_or(true, |view| self.is_member(identity, view))
    }

    /// Lists views sorted by display name.
    #[must_use]
    pub fn summaries(&self) -> Vec<ViewSummary> {
        let mut list: Vec<ViewSummary> = self
            .views
            .values()
            .map(|v| ViewSummary {
                id: v.id.clone(),
                name: v.name.clone(),
                concept_count: v.members.len(),
            })
            .collect();
        list.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.id.cmp(&b.id))
        });
        list
    }
}

/// True when the first source of the record that maps to `view_id` is
/// flagged as a context source.
#[must_use]
pub fn is_context_in_view(sources: &[SourceRef], view_id: &str) -> bool {
    sources
        .iter()
        .find(|s| view_id_for_file(&s.file).as_deref() == Some(view_id))
        .is_some_and(|s| s.is_context)
}

/// Maps a source file string to a view id.
///
/// Returns `None` for empty files, technical markers, `.temp/` paths and
/// `output/` paths. A `#Fragment` names the view directly; otherwise the
/// directory and one known extension are stripped, then the first matching
/// legacy prefix, then all whitespace.
#[must_use]
pub fn view_id_for_file(file: &str) -> Option<String> {
    if file.is_empty()
        || TECHNICAL_MARKERS.contains(&file)
        || file.contains(".temp/")
        || file.starts_with("output/")
    {
        return None;
    }

    if file.contains('#') {
        let fragment = file.split('#').nth(1).unwrap_or_default();
        return (!fragment.is_empty()).then(|| fragment.to_string());
    }

    let filename = file.rsplit('/').next().unwrap_or(file);
    let stem = strip_known_extension(filename);
    let stem = strip_legacy_prefix(stem);
    let view_id: String = stem.chars().filter(|c| !c.is_whitespace()).collect();
    (!view_id.is_empty()).then_some(view_id)
}

fn strip_known_extension(filename: &str) -> &str {
    if let Some((stem, ext)) = filename.rsplit_once('.') {
        if VIEW_FILE_EXTENSIONS
            .iter()
            .any(|known| known.eq_ignore_ascii_case(ext))
        {
            return stem;
        }
    }
    filename
}

fn strip_legacy_prefix(stem: &str) -> &str {
    for (prefix, separated) in LEGACY_PREFIXES {
        let Some(head) = stem.get(..prefix.len()) else {
            continue;
        };
        if !head.eq_ignore_ascii_case(prefix) {
            continue;
        }
        let rest = &stem[prefix.len()..];
        if !separated {
            return rest;
        }
        if let Some(after) = rest.strip_prefix('_').or_else(|| rest.strip_prefix('-')) {
            return after;
        }
    }
    stem
}

/// Turns a view id into a display name: camelCase is split, `_`/`-` become
/// spaces, and every word start is uppercased.
#[must_use]
pub fn view_display_name(view_id: &str) -> String {
    let mut spaced = String::with_capacity(view_id.len() + 4);
    let mut prev: Option<char> = None;
    for ch in view_id.chars() {
        if prev.is_some_and(|p| p.is_ascii_lowercase()) && ch.is_ascii_uppercase() {
            spaced.push(' ');
        }
        spaced.push(if ch == '_' || ch == '-' { ' ' } else { ch });
        prev = Some(ch);
    }
    bkb_model::text::title_case(&spaced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bkb_model::{Concept, ExternalConcept};

    fn sources(files: &[&str]) -> Vec<SourceRef> {
        files
            .iter()
            .map(|f| SourceRef {
                file: (*f).to_string(),
                ..SourceRef::default()
            })
            .collect()
    }

    #[test]
    fn fragment_names_the_view() {
        assert_eq!(view_id_for_file("bundle.yaml#Position").as_deref(), Some("Position"));
        assert_eq!(view_id_for_file("a#B#C").as_deref(), Some("B"));
    }

    #[test]
    fn file_names_are_normalized() {
        assert_eq!(
            view_id_for_file("diagrams/Investment-Position.cs").as_deref(),
            Some("Position")
        );
        assert_eq!(view_id_for_file("AllInInvestment_Order.JSON").as_deref(), Some("Order"));
        assert_eq!(
            view_id_for_file("conceptspeak-training-Basics.yml").as_deref(),
            Some("Basics")
        );
        assert_eq!(view_id_for_file("DP EDI AUM.yaml").as_deref(), Some("DPEDIAUM"));
        assert_eq!(view_id_for_file("notes.txt").as_deref(), Some("notes.txt"));
    }

    /// Only the first matching prefix is stripped.
    #[test]
    fn single_prefix_is_stripped() {
        assert_eq!(
            view_id_for_file("financial_investment_Trades.cs").as_deref(),
            Some("investment_Trades")
        );
        assert_eq!(view_id_for_file("Investments.cs").as_deref(), Some("Investments"));
    }

    #[test]
    fn technical_sources_are_skipped() {
        assert_eq!(view_id_for_file(""), None);
        assert_eq!(view_id_for_file("cross-domain-reference"), None);
        assert_eq!(view_id_for_file("work/.temp/Order.cs"), None);
        assert_eq!(view_id_for_file("output/Order.json"), None);
    }

    #[test]
    fn display_names() {
        assert_eq!(view_display_name("DP_EDI_AUM"), "DP EDI AUM");
        assert_eq!(view_display_name("orderManagement"), "Order Management");
        assert_eq!(view_display_name("cross-domain"), "Cross Domain");
    }

    /// Same display name, different qnames, different views.
    #[test]
    fn views_partition_by_identity() {
        let data = DomainData {
            concepts: vec![Concept {
                name: "Date".into(),
                qname: Some("bkb:Date".into()),
                sources: sources(&["Investment-Position.cs"]),
                ..Concept::default()
            }],
            external_concepts: vec![ExternalConcept {
                name: "Date".into(),
                qname: Some("omg:Date".into()),
                sources: sources(&["DP_EDI_AUM.yaml"]),
                ..ExternalConcept::default()
            }],
            ..DomainData::default()
        };
        let views = ViewIndex::extract(&data);
        let position: Vec<&str> = views.views_of("bkb:Date").unwrap().iter().map(String::as_str).collect();
        let aum: Vec<&str> = views.views_of("omg:Date").unwrap().iter().map(String::as_str).collect();
        assert_eq!(position, vec!["Position"]);
        assert_eq!(aum, vec!["DP_EDI_AUM"]);
        assert!(!views.is_member("bkb:Date", "DP_EDI_AUM"));
    }

    /// With no active view every identity passes.
    #[test]
    fn no_active_view_means_unfiltered() {
        let mut views = ViewIndex::default();
        assert!(views.in_active_view("anything"));
        views.set_active(Some("Empty"));
        assert!(!views.in_active_view("anything"));
        views.set_active(None);
        assert!(views.in_active_view("anything"));
    }

    #[test]
    fn summaries_sort_by_display_name() {
        let data = DomainData {
            concepts: vec![
                Concept {
                    name: "A".into(),
                    sources: sources(&["zeta.cs", "alphaView.cs"]),
                    ..Concept::default()
                },
                Concept {
                    name: "B".into(),
                    sources: sources(&["alphaView.cs"]),
                    ..Concept::default()
                },
            ],
            ..DomainData::default()
        };
        let list = ViewIndex::extract(&data).summaries();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].name, "Alpha View");
        assert_eq!(list[0].concept_count, 2);
        assert_eq!(list[1].id, "zeta");
    }

    #[test]
    fn context_sources_are_view_relative() {
        let srcs = vec![
            SourceRef {
                file: "Order.cs".into(),
                is_context: true,
                ..SourceRef::default()
            },
            SourceRef {
                file: "Position.cs".into(),
                ..SourceRef::default()
            },
        ];
        assert!(is_context_in_view(&srcs, "Order"));
        assert!(!is_context_in_view(&srcs, "Position"));
    }
}
