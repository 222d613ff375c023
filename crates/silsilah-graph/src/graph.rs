// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Read-only kinship queries over a dataset and its relation index.
//!
//! [`FamilyGraph`] pairs an immutable [`Dataset`] with the [`RelationIndex`]
//! derived from it. Both are built together and replaced together; there is no
//! way to patch one without the other.
//!
//! Queries never fail on data-shape problems. Unknown ids produce empty
//! collections, dangling union references are filtered out, and every walk is
//! visited-guarded (see [`crate::traversal`]).
use std::collections::BTreeSet;

use rustc_hash::FxHashSet;

use crate::dataset::{Dataset, DatasetStats};
use crate::ident::PersonId;
use crate::index::RelationIndex;
use crate::record::Person;
use crate::search::SearchIndex;
use crate::traversal::{Step, Traversal, TraversalBudget, Walk};
use crate::view_state::CollapseSet;

/// A dataset together with everything derived from it.
#[derive(Debug, Clone, Default)]
pub struct FamilyGraph {
    dataset: Dataset,
    index: RelationIndex,
    search: SearchIndex,
    budget: TraversalBudget,
}

impl FamilyGraph {
    /// Derives indices for `dataset`.
    pub fn new(dataset: Dataset) -> Self {
        let index = RelationIndex::build(dataset.unions());
        let search = SearchIndex::build(&dataset);
        Self {
            dataset,
            index,
            search,
            budget: TraversalBudget::default(),
        }
    }

    /// Replaces the per-traversal visit budget.
    pub fn with_budget(mut self, budget: TraversalBudget) -> Self {
        self.budget = budget;
        self
    }

    /// The underlying dataset.
    #[must_use]
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// The derived relation index.
    #[must_use]
    pub fn index(&self) -> &RelationIndex {
        &self.index
    }

    /// Name search over the dataset.
    #[must_use]
    pub fn search_index(&self) -> &SearchIndex {
        &self.search
    }

    /// Visit budget applied to each traversal.
    #[must_use]
    pub fn budget(&self) -> TraversalBudget {
        self.budget
    }

    /// Looks up a person; unknown ids are absent.
    #[must_use]
    pub fn person(&self, id: &str) -> Option<&Person> {
        self.dataset.person(id)
    }

    /// Recorded parents of `id` in first-registered order.
    #[must_use]
    pub fn parents(&self, id: &str) -> &[PersonId] {
        self.index.parents(id)
    }

    /// Recorded spouses of `id`.
    #[must_use]
    pub fn spouses(&self, id: &str) -> &[PersonId] {
        self.index.spouses(id)
    }

    /// Children of `id` through any union it partners in.
    #[must_use]
    pub fn children(&self, id: &str) -> &[PersonId] {
        self.index.children(id)
    }

    /// Resolves ids to people, dropping dangling references.
    pub fn resolve<'a>(&'a self, ids: &'a [PersonId]) -> impl Iterator<Item = &'a Person> + 'a {
        ids.iter().filter_map(|id| self.person(id.as_str()))
    }

    /// `true` when `id` is the primary partner of at least one union.
    #[must_use]
    pub fn is_primary_partner(&self, id: &str) -> bool {
        self.dataset.unions().iter().any(|u| u.is_primary(id))
    }

    /// Children of `id` through unions where `id` is the primary partner only.
    ///
    /// Tree rendering uses this instead of [`FamilyGraph::children`] so a
    /// couple's children hang under one partner, not both.
    #[must_use]
    pub fn tree_children(&self, id: &str) -> Vec<&Person> {
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        self.dataset
            .unions()
            .iter()
            .filter(|u| u.is_primary(id))
            .flat_map(|u| u.children.iter())
            .filter(|c| seen.insert(c.as_str()))
            .filter_map(|c| self.person(c.as_str()))
            .collect()
    }

    /// Roots of the forest view.
    ///
    /// Every parentless person anchors a tree, except that a parentless
    /// person married to a root is folded into that root's family instead of
    /// spawning a second tree. Order: roots found via unions in union order,
    /// then remaining parentless people in dataset order.
    #[must_use]
    pub fn forest_roots(&self) -> Vec<PersonId> {
        let parentless: FxHashSet<&str> = self
            .dataset
            .people()
            .iter()
            .map(|p| p.id.as_str())
            .filter(|id| !id.is_empty() && self.parents(id).is_empty())
            .collect();

        let mut roots: Vec<PersonId> = Vec::new();
        let mut spouse_of_root: FxHashSet<&str> = FxHashSet::default();
        let is_root =
            |p: &Option<PersonId>| p.as_ref().is_some_and(|id| parentless.contains(id.as_str()));

        for union in self.dataset.unions() {
            let (p1_root, p2_root) = (is_root(&union.partner1), is_root(&union.partner2));
            if !(p1_root || p2_root) {
                continue;
            }
            let (primary, other) = if p1_root {
                (&union.partner1, &union.partner2)
            } else {
                (&union.partner2, &union.partner1)
            };
            if let Some(primary) = primary {
                if !roots.contains(primary) {
                    roots.push(primary.clone());
                }
            }
            if let Some(other) = other {
                spouse_of_root.insert(other.as_str());
            }
        }

        for person in self.dataset.people() {
            let id = person.id.as_str();
            if parentless.contains(id)
                && !spouse_of_root.contains(id)
                && !roots.iter().any(|r| r == id)
            {
                roots.push(person.id.clone());
            }
        }
        roots
    }

    /// `true` when `a` has parents and shares at least one with `b`.
    #[must_use]
    pub fn share_parent(&self, a: &str, b: &str) -> bool {
        let a_parents = self.parents(a);
        !a_parents.is_empty() && self.parents(b).iter().any(|p| a_parents.contains(p))
    }

    /// Headline counts; generations are estimated from the default root.
    #[must_use]
    pub fn stats(&self) -> DatasetStats {
        let generations = self
            .dataset
            .default_root()
            .map_or(0, |root| self.estimate_generations(root.as_str()).value);
        DatasetStats {
            people: self.dataset.people().len(),
            families: self.dataset.unions().len(),
            generations,
        }
    }

    /// Path of people from `id` up to `root`, both inclusive.
    ///
    /// Depth-first through parents; when a person has several parents the
    /// first-registered parent is explored first, so the first path found wins.
    /// Unresolvable ids along the way are skipped in the output. If `root` is
    /// unreachable the path is just `[id]`; if `id` is unknown it is empty.
    #[must_use]
    pub fn path_to_root(&self, id: &str, root: &str) -> Traversal<Vec<&Person>> {
        let Some(start) = self.person(id) else {
            return Traversal::complete(Vec::new());
        };
        if root.is_empty() {
            return Traversal::complete(Vec::new());
        }
        let (frames, found, walk) = self.search_upward(&start.id, root);
        let path = match found {
            Some(end) => {
                let mut ids = Vec::new();
                let mut cursor = Some(end);
                while let Some(idx) = cursor {
                    let (pid, from) = &frames[idx];
                    ids.push(pid);
                    cursor = *from;
                }
                ids.iter()
                    .rev()
                    .filter_map(|pid| self.person(pid.as_str()))
                    .collect()
            }
            None => vec![start],
        };
        walk.finish("path_to_root", path)
    }

    /// Pre-order DFS from `start` through parents until `target`.
    ///
    /// Frames record `(person, predecessor frame)`; the stack holds parents in
    /// reverse so the first parent is expanded first.
    fn search_upward(
        &self,
        start: &PersonId,
        target: &str,
    ) -> (Vec<(PersonId, Option<usize>)>, Option<usize>, Walk) {
        let mut walk = Walk::new(self.budget);
        let mut frames: Vec<(PersonId, Option<usize>)> = Vec::new();
        let mut stack: Vec<(PersonId, Option<usize>)> = vec![(start.clone(), None)];
        while let Some((current, from)) = stack.pop() {
            match walk.enter(&current) {
                Step::Revisit => continue,
                Step::Exhausted => break,
                Step::Fresh => {}
            }
            let frame = frames.len();
            let done = current == target;
            let parents = self.parents(current.as_str());
            frames.push((current, from));
            if done {
                return (frames, Some(frame), walk);
            }
            stack.extend(parents.iter().rev().map(|p| (p.clone(), Some(frame))));
        }
        (frames, None, walk)
    }

    /// Top-most ancestor reached by always following the first parent.
    ///
    /// Stops at the first person with no parents. A cycle in the first-parent
    /// chain stops the ascent at the last new person and is reported as a
    /// revisit.
    #[must_use]
    pub fn find_top_root_id(&self, id: &str) -> Traversal<PersonId> {
        let mut walk = Walk::new(self.budget);
        let mut current = PersonId::from(id);
        if walk.enter(&current) != Step::Fresh {
            return walk.finish("find_top_root_id", current);
        }
        while let Some(first) = self.parents(current.as_str()).first() {
            if walk.enter(first) != Step::Fresh {
                break;
            }
            current = first.clone();
        }
        walk.finish("find_top_root_id", current)
    }

    /// Deepest generation reachable from `root` through children; the root is
    /// generation 1. An empty root id yields 0.
    #[must_use]
    pub fn estimate_generations(&self, root: &str) -> Traversal<usize> {
        if root.is_empty() {
            return Traversal::complete(0);
        }
        let mut walk = Walk::new(self.budget);
        let mut max_depth = 1;
        let mut stack = vec![(PersonId::from(root), 1_usize)];
        while let Some((id, depth)) = stack.pop() {
            match walk.enter(&id) {
                Step::Revisit => continue,
                Step::Exhausted => break,
                Step::Fresh => {}
            }
            max_depth = max_depth.max(depth);
            stack.extend(self.children(id.as_str()).iter().map(|c| (c.clone(), depth + 1)));
        }
        walk.finish("estimate_generations", max_depth)
    }

    /// Ids on the first-found line of descent from `root` to `target`, both
    /// inclusive; empty when `target` is not a descendant.
    #[must_use]
    pub fn direct_line_set(&self, root: &str, target: &str) -> Traversal<BTreeSet<PersonId>> {
        if root.is_empty() || target.is_empty() {
            return Traversal::complete(BTreeSet::new());
        }
        let mut walk = Walk::new(self.budget);
        let mut frames: Vec<(PersonId, Option<usize>)> = Vec::new();
        let mut stack: Vec<(PersonId, Option<usize>)> = vec![(PersonId::from(root), None)];
        let mut found = None;
        while let Some((current, from)) = stack.pop() {
            match walk.enter(&current) {
                Step::Revisit => continue,
                Step::Exhausted => break,
                Step::Fresh => {}
            }
            let frame = frames.len();
            let done = current == target;
            let kids = self.children(current.as_str());
            frames.push((current, from));
            if done {
                found = Some(frame);
                break;
            }
            stack.extend(kids.iter().rev().map(|k| (k.clone(), Some(frame))));
        }
        let mut line = BTreeSet::new();
        let mut cursor = found;
        while let Some(idx) = cursor {
            let (id, from) = &frames[idx];
            line.insert(id.clone());
            cursor = *from;
        }
        walk.finish("direct_line_set", line)
    }

    /// Collapse set hiding everything from generation `max_depth` down.
    ///
    /// Every descendant of `root` (root = generation 1) reached at a depth of
    /// at least `max_depth` is collapsed. Used when the branch view opens with
    /// an unbounded depth so the first render stays small.
    #[must_use]
    pub fn auto_collapse_deep(&self, root: &str, max_depth: u32) -> Traversal<CollapseSet> {
        if root.is_empty() {
            return Traversal::complete(CollapseSet::default());
        }
        let mut walk = Walk::new(self.budget);
        let mut collapsed = CollapseSet::default();
        let mut stack = vec![(PersonId::from(root), 1_u32)];
        while let Some((id, depth)) = stack.pop() {
            match walk.enter(&id) {
                Step::Revisit => continue,
                Step::Exhausted => break,
                Step::Fresh => {}
            }
            stack.extend(
                self.children(id.as_str())
                    .iter()
                    .map(|c| (c.clone(), depth.saturating_add(1))),
            );
            if depth >= max_depth {
                collapsed.insert(id);
            }
        }
        walk.finish("auto_collapse_deep", collapsed)
    }
}
