//! Ghost detection and the edge-gating rule.
//!
//! With a view active, a *ghost* is an internal concept that some view member
//! references (through a categorization, relationship or internal
//! subsumption) while itself belonging to a different view. Ghosts are drawn
//! as separate, faded nodes so the view's outward references stay visible,
//! but they may only connect to real view members.

use std::collections::HashSet;

use bkb_model::DomainData;

use crate::identity::IdentityMap;
use crate::views::ViewIndex;

/// Finds every ghost concept name relative to `view_id`.
///
/// `internal` is the set of domain concept names; references to anything
/// else never produce a ghost.
#[must_use]
pub fn detect_ghosts<'a>(
    data: &'a DomainData,
    internal: &HashSet<&str>,
    identity: &IdentityMap,
    views: &ViewIndex,
    view_id: &str,
) -> HashSet<&'a str> {
    let in_view = |name: &str| views.is_member(identity.resolve(name), view_id);
    let mut ghosts: HashSet<&'a str> = HashSet::new();
    let mut consider = |referrer: &str, referenced: &'a str| {
        if in_view(referrer) && internal.contains(referenced) && !in_view(referenced) {
            ghosts.insert(referenced);
        }
    };

    for cat in &data.categorizations {
        for child in &cat.children_names {
            consider(cat.parent_name.as_str(), child.as_str());
            consider(child.as_str(), cat.parent_name.as_str());
        }
    }
    for rel in &data.relationships {
        if rel.subject.is_empty() || rel.object.is_empty() {
            continue;
        }
        consider(rel.subject.as_str(), rel.object.as_str());
        consider(rel.object.as_str(), rel.subject.as_str());
    }
    for sub in &data.subsumptions {
        if sub.child.is_empty() || sub.parent.is_empty() || sub.external_uri.is_some() {
            continue;
        }
        consider(sub.child.as_str(), sub.parent.as_str());
        consider(sub.parent.as_str(), sub.child.as_str());
    }

    tracing::debug!(view = view_id, ghosts = ghosts.len(), "detected ghost concepts");
    ghosts
}

/// Decides whether an edge between two concept names may be created.
///
/// - Neither endpoint a ghost: both must be visible.
/// - Exactly one a ghost: the other must be an actual member of the active
///   view; being visible through relationship expansion is not enough.
/// - Both ghosts: never.
pub struct EdgeGate<'s> {
    visible: &'s HashSet<&'s str>,
    ghosts: &'s HashSet<&'s str>,
    identity: &'s IdentityMap,
    views: &'s ViewIndex,
    active_view: Option<&'s str>,
}

impl<'s> EdgeGate<'s> {
    /// Creates a gate over the builder's working sets.
    #[must_use]
    pub fn new(
        visible: &'s HashSet<&'s str>,
        ghosts: &'s HashSet<&'s str>,
        identity: &'s IdentityMap,
        views: &'s ViewIndex,
        active_view: Option<&'s str>,
    ) -> Self {
        Self {
            visible,
            ghosts,
            identity,
            views,
            active_view,
        }
    }

    fn is_view_member(&self, name: &str) -> bool {
        self.active_view
            .is_some_and(|view| self.views.is_member(self.identity.resolve(name), view))
    }

    /// Applies the gating rule to the pair.
    #[must_use]
    pub fn allows(&self, a: &str, b: &str) -> bool {
        match (self.ghosts.contains(a), self.ghosts.contains(b)) {
            (false, false) => self.visible.contains(a) && self.visible.contains(b),
            (true, false) => self.is_view_member(b),
            (false, true) => self.is_view_member(a),
            (true, true) => false,
        }
    }
}
