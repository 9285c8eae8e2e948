//! The explorer session: one loaded domain, its derived indexes, the built
//! element set and the current toggle/view selection.
//!
//! Every operation keeps the element set filtered. Switching the view
//! rebuilds the set (ghosts and context styling are view-relative); changing
//! a toggle only re-runs the filter in place.
//!
//! # Entry Point
//!
//! ```
//! use std::sync::Arc;
//!
//! use bkb_engine::explorer::Explorer;
//! use bkb_engine::visibility::Toggle;
//! use bkb_model::DomainData;
//!
//! let data = DomainData::from_json_str(r#"{
//!     "domain": {"name": "Trading", "path": "RBCZ:Trading"},
//!     "concepts": [
//!         {"name": "Order", "sources": [{"file": "Orders.cs"}]},
//!         {"name": "Lonely", "sources": [{"file": "Orders.cs"}]},
//!         {"name": "Customer", "sources": [{"file": "Parties.cs"}]}
//!     ],
//!     "relationships": [{"source_name": "Order", "target_name": "Customer", "forward_verb": "is placed by"}]
//! }"#).unwrap();
//!
//! let mut explorer = Explorer::default();
//! explorer.install("RBCZ/Trading", Arc::new(data));
//! assert!(explorer.snapshot().shows_node("Lonely"));
//!
//! explorer.set_toggle(Toggle::Orphans, false);
//! assert!(!explorer.snapshot().shows_node("Lonely"));
//!
//! explorer.select_view(Some("Orders"));
//! assert!(explorer.snapshot().shows_node("Customer"), "ghost of the Orders view");
//! assert_eq!(explorer.breadcrumb(), ["RBCZ", "Trading", "Orders"]);
//! ```

use std::sync::Arc;

use bkb_model::DomainData;
use serde::Serialize;

use crate::builder::build;
use crate::config::ExplorerConfig;
use crate::counts::{filter_counts, FilterCounts};
use crate::elements::ElementSet;
use crate::error::LoadError;
use crate::expand;
use crate::identity::IdentityMap;
use crate::loader::{DomainLoader, DomainSource};
use crate::search;
use crate::subtypes::SubtypeMap;
use crate::views::{ViewIndex, ViewSummary};
use crate::visibility::{apply_filter, Toggle, Toggles, VisibilitySnapshot};

/// What selecting a view from the domain hierarchy requires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ViewAction {
    /// The view belongs to another domain: load it, then select the view.
    LoadThenSelect {
        /// Domain to load first.
        domain_path: String,
        /// View to select once loaded.
        view: String,
    },
    /// The view belongs to the loaded domain.
    SelectView {
        /// View to select.
        view: String,
    },
}

/// One explorer session.
#[derive(Debug, Clone, Default)]
pub struct Explorer {
    domain_path: Option<String>,
    data: Arc<DomainData>,
    identity: IdentityMap,
    views: ViewIndex,
    subtypes: SubtypeMap,
    elements: ElementSet,
    toggles: Toggles,
    query: String,
}

impl Explorer {
    /// Creates an empty session with the configured toggles. The configured
    /// view is applied by the caller after the first load.
    #[must_use]
    pub fn new(config: &ExplorerConfig) -> Self {
        Self {
            toggles: config.toggles,
            ..Self::default()
        }
    }

    /// Loads a domain through `loader` and resets the view selection.
    ///
    /// # Errors
    ///
    /// Returns the loader's [`LoadError`]; the session is left exactly as it
    /// was.
    pub fn load<S: DomainSource>(
        &mut self,
        loader: &DomainLoader<S>,
        domain_path: &str,
    ) -> Result<(), LoadError> {
        let data = loader.load(domain_path)?;
        self.install(domain_path, data);
        Ok(())
    }

    /// Installs an already loaded payload as the current domain.
    pub fn install(&mut self, domain_path: &str, data: Arc<DomainData>) {
        self.identity = IdentityMap::build(&data);
        self.views = ViewIndex::extract(&data);
        self.subtypes = SubtypeMap::build(&data);
        self.data = data;
        self.domain_path = Some(domain_path.to_string());
        tracing::info!(
            domain = domain_path,
            views = self.views.len(),
            identities = self.identity.len(),
            "installed domain"
        );
        self.rebuild();
    }

    /// Selects the active view (`None` for all concepts) and rebuilds.
    ///
    /// An unknown view id is not an error; it simply has no members.
    pub fn select_view(&mut self, view: Option<&str>) {
        let view = view.filter(|v| !v.is_empty());
        if view.is_some_and(|v| self.views.get(v).is_none()) {
            tracing::debug!(view, "selected view has no members");
        }
        self.views.set_active(view);
        self.rebuild();
    }

    /// Sets one toggle and re-filters in place.
    pub fn set_toggle(&mut self, toggle: Toggle, on: bool) {
        self.toggles.set(toggle, on);
        apply_filter(&mut self.elements, &self.toggles, &self.views);
    }

    /// Replaces every toggle and re-filters in place.
    pub fn set_toggles(&mut self, toggles: Toggles) {
        self.toggles = toggles;
        apply_filter(&mut self.elements, &self.toggles, &self.views);
    }

    /// Captures the current visibility.
    #[must_use]
    pub fn snapshot(&self) -> VisibilitySnapshot {
        VisibilitySnapshot::capture(&self.elements, &self.toggles, &self.views)
    }

    /// Per-toggle counts for the active view.
    #[must_use]
    pub fn filter_counts(&self) -> FilterCounts {
        filter_counts(&self.elements, &self.views)
    }

    /// Views of the loaded domain, sorted by display name.
    #[must_use]
    pub fn views(&self) -> Vec<ViewSummary> {
        self.views.summaries()
    }

    /// The domain path segments followed by the active view's display name.
    #[must_use]
    pub fn breadcrumb(&self) -> Vec<String> {
        let info = &self.data.domain;
        let path = if info.path.is_empty() { &info.name } else { &info.path };
        let mut parts: Vec<String> = path
            .split(':')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();
        if let Some(view) = self.views.active() {
            parts.push(
                self.views
                    .get(view)
                    .map_or_else(|| crate::views::view_display_name(view), |v| v.name.clone()),
            );
        }
        parts
    }

    /// Decides how to select `view` listed under `domain_path`.
    #[must_use]
    pub fn view_action(&self, domain_path: Option<&str>, view: &str) -> ViewAction {
        match domain_path {
            Some(path) if !path.is_empty() && self.domain_path.as_deref() != Some(path) => {
                ViewAction::LoadThenSelect {
                    domain_path: path.to_string(),
                    view: view.to_string(),
                }
            }
            _ => ViewAction::SelectView {
                view: view.to_string(),
            },
        }
    }

    /// Adds the subsumption children of a node. See [`expand::expand`].
    pub fn expand(&mut self, node_id: &str) -> bool {
        expand::expand(&mut self.elements, &self.data, &self.subtypes, node_id)
    }

    /// Removes a node's expanded children. See [`expand::collapse`].
    pub fn collapse(&mut self, node_id: &str) -> bool {
        expand::collapse(&mut self.elements, node_id)
    }

    /// Expands a collapsed node or collapses an expanded one. Returns whether
    /// the node is expanded afterwards.
    pub fn toggle_expand(&mut self, node_id: &str) -> bool {
        if expand::is_expanded(&self.elements, node_id) {
            self.collapse(node_id);
            false
        } else {
            self.expand(node_id)
        }
    }

    /// Highlights nodes matching `query`. The query survives rebuilds.
    pub fn highlight(&mut self, query: &str) -> usize {
        self.query = query.to_string();
        search::highlight(&mut self.elements, query)
    }

    /// Path the current domain was loaded from.
    #[must_use]
    pub fn domain_path(&self) -> Option<&str> {
        self.domain_path.as_deref()
    }

    /// True once a domain has been installed.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.domain_path.is_some()
    }

    /// The loaded payload.
    #[must_use]
    pub fn data(&self) -> &DomainData {
        &self.data
    }

    /// The identity map of the loaded payload.
    #[must_use]
    pub fn identity(&self) -> &IdentityMap {
        &self.identity
    }

    /// The view index, with the active selection.
    #[must_use]
    pub fn view_index(&self) -> &ViewIndex {
        &self.views
    }

    /// Active view id.
    #[must_use]
    pub fn active_view(&self) -> Option<&str> {
        self.views.active()
    }

    /// Current toggles.
    #[must_use]
    pub fn toggles(&self) -> &Toggles {
        &self.toggles
    }

    /// The filtered element set.
    #[must_use]
    pub fn elements(&self) -> &ElementSet {
        &self.elements
    }

    fn rebuild(&mut self) {
        let active = self.views.active().map(str::to_string);
        self.elements = build(&self.data, &self.identity, &self.views, active.as_deref());
        apply_filter(&mut self.elements, &self.toggles, &self.views);
        if !self.query.is_empty() {
            search::highlight(&mut self.elements, &self.query);
        }
    }
}
