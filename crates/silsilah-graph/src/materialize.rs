// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Depth-bounded, collapse-aware tree materialization.
//!
//! Trees are rebuilt from scratch on every render from the current
//! [`FamilyGraph`] and [`ViewState`]; nothing is cached between passes.
//!
//! Construction uses an explicit work stack and a flat arena, so neither a
//! deep pedigree nor a cyclic one can exhaust the call stack. Nodes are
//! created in pre-order (children always land after their parent in the
//! arena) and assembled into owned [`TreeNode`]s by a single reverse sweep.
use std::collections::BTreeSet;

use tracing::{debug, instrument, warn};

use crate::graph::FamilyGraph;
use crate::ident::PersonId;
use crate::record::Person;
use crate::traversal::Traversal;
use crate::view_state::{ViewMode, ViewState};

/// Collapse/expand control attached to a node with visible children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Toggle {
    /// The node is in the collapse set.
    pub collapsed: bool,
}

impl Toggle {
    /// Glyph shown on the control: `+` to expand, `-` to collapse.
    #[must_use]
    pub fn glyph(self) -> char {
        if self.collapsed {
            '+'
        } else {
            '-'
        }
    }
}

/// How a node ended up after materialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeVisibility {
    /// Filtered out or beyond the depth limit; occupies a slot, no content.
    Phantom,
    /// Rendered, no children after filtering.
    Leaf,
    /// Rendered with children hidden by the collapse set.
    Collapsed,
    /// Rendered with children hidden because branch-only mode is expanding a
    /// different node.
    BranchOnly,
    /// Rendered with children materialized.
    Expanded,
}

/// A rendered person and its row of cards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonNode {
    /// Person anchoring this node.
    pub person_id: PersonId,
    /// Generation relative to the tree root (root = 1).
    pub depth: u32,
    /// Rendered as a couple row (self followed by spouses).
    pub couple_row: bool,
    /// Card ids in row order; the anchor person is always first.
    pub cards: Vec<PersonId>,
    /// Present when the node has children after filtering.
    pub toggle: Option<Toggle>,
    /// Materialized children, empty unless expanded.
    pub children: Vec<TreeNode>,
}

/// One position in a materialized tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode {
    /// Structurally present, content-free.
    Phantom {
        /// Person the slot was requested for.
        person_id: PersonId,
    },
    /// A rendered person.
    Person(PersonNode),
}

impl TreeNode {
    /// Person this slot was built for.
    #[must_use]
    pub fn person_id(&self) -> &PersonId {
        match self {
            Self::Phantom { person_id } => person_id,
            Self::Person(node) => &node.person_id,
        }
    }

    /// Returns `true` for phantom slots.
    #[must_use]
    pub fn is_phantom(&self) -> bool {
        matches!(self, Self::Phantom { .. })
    }

    /// Rendered content, if any.
    #[must_use]
    pub fn as_person(&self) -> Option<&PersonNode> {
        match self {
            Self::Phantom { .. } => None,
            Self::Person(node) => Some(node),
        }
    }

    /// Materialized children; phantoms have none.
    #[must_use]
    pub fn children(&self) -> &[TreeNode] {
        self.as_person()
            .map(|n| n.children.as_slice())
            .unwrap_or_default()
    }

    /// Visibility state of this node.
    #[must_use]
    pub fn visibility(&self) -> NodeVisibility {
        let Some(node) = self.as_person() else {
            return NodeVisibility::Phantom;
        };
        match node.toggle {
            None => NodeVisibility::Leaf,
            Some(Toggle { collapsed: true }) => NodeVisibility::Collapsed,
            Some(_) if node.children.is_empty() => NodeVisibility::BranchOnly,
            Some(_) => NodeVisibility::Expanded,
        }
    }

    /// Anchor ids of every rendered node, pre-order.
    #[must_use]
    pub fn rendered_ids(&self) -> Vec<PersonId> {
        self.walk()
            .filter_map(TreeNode::as_person)
            .map(|n| n.person_id.clone())
            .collect()
    }

    /// Every card id in the tree (anchors and spouses), pre-order.
    #[must_use]
    pub fn card_ids(&self) -> Vec<PersonId> {
        self.walk()
            .filter_map(TreeNode::as_person)
            .flat_map(|n| n.cards.iter().cloned())
            .collect()
    }

    /// Deepest rendered generation; 0 when the tree itself is a phantom.
    #[must_use]
    pub fn rendered_depth(&self) -> u32 {
        self.walk()
            .filter_map(TreeNode::as_person)
            .map(|n| n.depth)
            .max()
            .unwrap_or(0)
    }

    /// Pre-order iterator over all slots, phantoms included.
    pub fn walk(&self) -> impl Iterator<Item = &TreeNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children().iter().rev());
            Some(node)
        })
    }
}

enum Pending {
    Phantom(PersonId),
    Person {
        node: PersonNode,
        child_slots: Vec<usize>,
    },
}

struct Slot {
    person_id: PersonId,
    parent: Option<usize>,
    pending: Pending,
}

/// Per-pass inputs derived once from the view state.
struct Pass<'g> {
    graph: &'g FamilyGraph,
    state: &'g ViewState,
    direct_line: Option<BTreeSet<PersonId>>,
    revisits: usize,
    rendered: usize,
    exhausted: bool,
}

impl<'g> Pass<'g> {
    fn new(graph: &'g FamilyGraph, state: &'g ViewState) -> Self {
        let mut revisits = 0;
        let mut exhausted = false;
        let direct_line = match (&state.selected, state.filters.direct_line_only, state.mode) {
            (Some(selected), true, ViewMode::Branch) => {
                let root = state.root.as_ref().map_or("", PersonId::as_str);
                let line = graph.direct_line_set(root, selected.as_str());
                revisits += line.revisits;
                exhausted |= line.budget_exhausted;
                Some(line.value)
            }
            _ => None,
        };
        Self {
            graph,
            state,
            direct_line,
            revisits,
            rendered: 0,
            exhausted,
        }
    }

    fn visible(&self, person: &Person) -> bool {
        self.state.filters.show_deceased || !person.is_deceased()
    }

    fn on_ancestor_chain(arena: &[Slot], mut cursor: Option<usize>, id: &PersonId) -> bool {
        while let Some(idx) = cursor {
            if arena[idx].person_id == *id {
                return true;
            }
            cursor = arena[idx].parent;
        }
        false
    }

    /// Evaluates one node; returns its content and the children to expand.
    fn evaluate(
        &mut self,
        person_id: &PersonId,
        depth: u32,
    ) -> Option<(PersonNode, Vec<PersonId>)> {
        let person = self.graph.person(person_id.as_str())?;
        if !self.visible(person) || !self.state.depth.allows(depth) {
            return None;
        }
        if self.rendered >= self.graph.budget().max_visits() {
            self.exhausted = true;
            return None;
        }
        self.rendered += 1;

        let id = person_id.as_str();
        let couple_row = depth == 1 || self.graph.is_primary_partner(id);
        let mut cards = vec![person.id.clone()];
        if couple_row {
            cards.extend(
                self.graph
                    .resolve(self.graph.spouses(id))
                    .filter(|s| self.visible(s))
                    .map(|s| s.id.clone()),
            );
        }

        let children: Vec<PersonId> = self
            .graph
            .tree_children(id)
            .into_iter()
            .filter(|c| self.visible(c))
            .filter(|c| {
                self.direct_line
                    .as_ref()
                    .is_none_or(|line| line.contains(&c.id) || line.contains(id))
            })
            .map(|c| c.id.clone())
            .collect();

        let collapsed = self.state.collapsed.contains(id);
        let toggle = (!children.is_empty()).then_some(Toggle { collapsed });
        let branch_only = self.state.mode == ViewMode::Branch
            && self.state.branch_only
            && self.state.selected.as_ref() != Some(person_id);
        let expand = if collapsed || branch_only {
            Vec::new()
        } else {
            children
        };

        let node = PersonNode {
            person_id: person_id.clone(),
            depth,
            couple_row,
            cards,
            toggle,
            children: Vec::new(),
        };
        Some((node, expand))
    }

    fn build(&mut self, root: &PersonId, depth: u32) -> TreeNode {
        let mut arena: Vec<Slot> = Vec::new();
        let mut stack: Vec<(PersonId, u32, Option<usize>)> = vec![(root.clone(), depth, None)];

        while let Some((person_id, depth, parent)) = stack.pop() {
            let slot = arena.len();
            let pending = if Self::on_ancestor_chain(&arena, parent, &person_id) {
                self.revisits += 1;
                Pending::Phantom(person_id.clone())
            } else {
                match self.evaluate(&person_id, depth) {
                    Some((node, expand)) => {
                        let next = depth.saturating_add(1);
                        stack.extend(expand.into_iter().rev().map(|c| (c, next, Some(slot))));
                        Pending::Person {
                            node,
                            child_slots: Vec::new(),
                        }
                    }
                    None => Pending::Phantom(person_id.clone()),
                }
            };
            if let Some(Slot {
                pending: Pending::Person { child_slots, .. },
                ..
            }) = parent.and_then(|p| arena.get_mut(p))
            {
                child_slots.push(slot);
            }
            arena.push(Slot {
                person_id,
                parent,
                pending,
            });
        }

        let mut built: Vec<Option<TreeNode>> = Vec::with_capacity(arena.len());
        built.resize_with(arena.len(), || None);
        for (idx, slot) in arena.into_iter().enumerate().rev() {
            let node = match slot.pending {
                Pending::Phantom(person_id) => TreeNode::Phantom { person_id },
                Pending::Person {
                    mut node,
                    child_slots,
                } => {
                    node.children = child_slots
                        .into_iter()
                        .filter_map(|c| built.get_mut(c).and_then(Option::take))
                        .collect();
                    TreeNode::Person(node)
                }
            };
            built[idx] = Some(node);
        }
        built
            .into_iter()
            .next()
            .flatten()
            .unwrap_or_else(|| TreeNode::Phantom {
                person_id: root.clone(),
            })
    }

    fn finish<T>(self, value: T) -> Traversal<T> {
        if self.exhausted {
            warn!(
                rendered = self.rendered,
                "tree materialization budget exhausted; remaining nodes are phantoms"
            );
        }
        if self.revisits > 0 {
            debug!(revisits = self.revisits, "cyclic children rendered as phantoms");
        }
        Traversal {
            value,
            revisits: self.revisits,
            budget_exhausted: self.exhausted,
        }
    }
}

impl FamilyGraph {
    /// Materializes the subtree anchored at `person_id`, which sits at
    /// generation `depth` (callers start at 1).
    ///
    /// A node is a phantom when the person is unknown, hidden by the
    /// deceased filter, deeper than the depth limit, or already on its own
    /// ancestor chain (a cycle). Rendered nodes at depth 1 or whose person is
    /// a primary partner show a couple row. Children come from
    /// [`FamilyGraph::tree_children`], minus hidden people and, in
    /// direct-line mode, minus side branches. Children are expanded unless the
    /// node is collapsed or branch-only mode is expanding another node.
    #[instrument(level = "debug", skip(self, state), fields(mode = ?state.mode))]
    pub fn build_node(
        &self,
        person_id: &str,
        depth: u32,
        state: &ViewState,
    ) -> Traversal<TreeNode> {
        let mut pass = Pass::new(self, state);
        let tree = pass.build(&PersonId::from(person_id), depth.max(1));
        pass.finish(tree)
    }

    /// Branch view: one tree at the view root; `None` when the root is
    /// unknown.
    #[must_use]
    pub fn materialize_branch(&self, state: &ViewState) -> Option<Traversal<TreeNode>> {
        let root = state.root.as_ref()?;
        self.person(root.as_str())?;
        Some(self.build_node(root.as_str(), 1, state))
    }

    /// Forest view: one tree per [`FamilyGraph::forest_roots`] entry.
    #[must_use]
    pub fn materialize_forest(&self, state: &ViewState) -> Traversal<Vec<TreeNode>> {
        let mut pass = Pass::new(self, state);
        let trees = self
            .forest_roots()
            .iter()
            .map(|root| pass.build(root, 1))
            .collect();
        pass.finish(trees)
    }
}
