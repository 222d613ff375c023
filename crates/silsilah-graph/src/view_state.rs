// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Ephemeral per-session view state passed explicitly into queries.
//!
//! The engine never holds selection, root, or collapse state itself; hosts own
//! a [`ViewState`] and hand it to the materializer on every render.
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::graph::FamilyGraph;
use crate::ident::{Fingerprint, PersonId};

/// Presentation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Single person with parents, spouses, and children around it.
    Focus,
    /// One tree per forest root.
    #[default]
    Forest,
    /// One tree under the chosen root.
    Branch,
}

/// How many generations the tree materializer renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepthLimit {
    /// Render depths `1..=n`.
    Finite(u32),
    /// Render every generation.
    Unbounded,
}

impl DepthLimit {
    /// Generations shown when a session starts.
    pub const INITIAL: Self = Self::Finite(2);

    /// A finite limit; values below one are raised to one.
    #[must_use]
    pub fn finite(generations: u32) -> Self {
        Self::Finite(generations.max(1))
    }

    /// Returns `true` when nodes at `depth` (root = 1) are rendered.
    #[must_use]
    pub fn allows(self, depth: u32) -> bool {
        match self {
            Self::Finite(limit) => depth <= limit,
            Self::Unbounded => true,
        }
    }
}

impl Default for DepthLimit {
    fn default() -> Self {
        Self::INITIAL
    }
}

/// Filters applied while materializing trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TreeFilters {
    /// Render people with a recorded death date.
    pub show_deceased: bool,
    /// In branch mode, prune side branches off the root→selection line.
    pub direct_line_only: bool,
}

impl Default for TreeFilters {
    fn default() -> Self {
        Self {
            show_deceased: true,
            direct_line_only: false,
        }
    }
}

/// Set of people whose descendants are hidden. Absent means expanded.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollapseSet(BTreeSet<PersonId>);

impl CollapseSet {
    /// Returns `true` when `id` is collapsed.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.0.contains(id)
    }

    /// Flips `id` between collapsed and expanded; returns the new collapsed
    /// state. Toggling twice is a no-op.
    pub fn toggle(&mut self, id: &PersonId) -> bool {
        if self.0.remove(id.as_str()) {
            false
        } else {
            self.0.insert(id.clone());
            true
        }
    }

    /// Collapses `id`.
    pub fn insert(&mut self, id: PersonId) {
        self.0.insert(id);
    }

    /// Expands `id`.
    pub fn remove(&mut self, id: &str) {
        self.0.remove(id);
    }

    /// Expands everything.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Number of collapsed people.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when nothing is collapsed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Collapsed ids in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &PersonId> {
        self.0.iter()
    }
}

impl FromIterator<PersonId> for CollapseSet {
    fn from_iter<I: IntoIterator<Item = PersonId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Expansion toggles of the focus view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusExpand {
    /// Ancestor generations shown: 1 (parents) or 2 (with grandparents).
    pub ancestors: u8,
    /// Children whose own children are listed under them.
    pub expanded_children: BTreeSet<PersonId>,
    /// Show every child instead of the first few.
    pub show_all_children: bool,
}

impl Default for FocusExpand {
    fn default() -> Self {
        Self {
            ancestors: 1,
            expanded_children: BTreeSet::new(),
            show_all_children: false,
        }
    }
}

impl FocusExpand {
    /// Switches between parents only and parents plus grandparents.
    pub fn toggle_ancestors(&mut self) {
        self.ancestors = if self.ancestors == 1 { 2 } else { 1 };
    }

    /// Flips grandchildren expansion under `child`.
    pub fn toggle_child(&mut self, child: &PersonId) {
        if !self.expanded_children.remove(child.as_str()) {
            self.expanded_children.insert(child.clone());
        }
    }
}

/// Everything a render needs besides the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewState {
    /// Active presentation mode.
    pub mode: ViewMode,
    /// Selected person (cards highlight, drawer target).
    pub selected: Option<PersonId>,
    /// Root of branch mode and of direct-line computations.
    pub root: Option<PersonId>,
    /// Generations rendered by the tree materializer.
    pub depth: DepthLimit,
    /// Collapsed tree nodes.
    pub collapsed: CollapseSet,
    /// In branch mode, only the selected node expands.
    pub branch_only: bool,
    /// Deceased and direct-line filters.
    pub filters: TreeFilters,
    /// Focus view expansion state.
    pub focus: FocusExpand,
    pub(crate) dataset: Option<Fingerprint>,
}

impl ViewState {
    /// Fresh state for `graph`: forest mode, root and selection at the
    /// dataset's default root.
    pub fn for_graph(graph: &FamilyGraph) -> Self {
        let root = graph.dataset().default_root();
        Self {
            selected: root.clone(),
            root,
            dataset: Some(graph.dataset().fingerprint()),
            ..Self::default()
        }
    }

    /// Rebuilds the state for a freshly loaded `graph`. Filters survive;
    /// mode, root, selection, collapse set, and focus expansion start over
    /// even when the content is unchanged. Returns `true` when the content
    /// differs from the dataset this state was built for.
    pub fn sync_dataset(&mut self, graph: &FamilyGraph) -> bool {
        let previous = self.dataset;
        let filters = self.filters;
        *self = Self::for_graph(graph);
        self.filters = filters;
        previous != self.dataset
    }

    /// Fingerprint of the dataset this state was built for.
    #[must_use]
    pub fn dataset_fingerprint(&self) -> Option<&Fingerprint> {
        self.dataset.as_ref()
    }

    /// Selected person, falling back to the root.
    #[must_use]
    pub fn target(&self) -> Option<&PersonId> {
        self.selected.as_ref().or(self.root.as_ref())
    }
}
