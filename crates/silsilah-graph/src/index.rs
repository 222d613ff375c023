// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Parent/child/spouse adjacency derived from the union list.
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::ident::PersonId;
use crate::record::Union;

/// Insertion-ordered set per key. Buckets stay small (a handful of parents,
/// spouses, or children), so membership is a linear scan.
type Adjacency = FxHashMap<PersonId, Vec<PersonId>>;

fn link(map: &mut Adjacency, key: &PersonId, value: &PersonId) {
    if key.is_empty() || value.is_empty() {
        return;
    }
    let bucket = map.entry(key.clone()).or_default();
    if !bucket.contains(value) {
        bucket.push(value.clone());
    }
}

/// The three relation indices of one dataset load.
///
/// Built in a single pass over the unions and never patched afterwards: a new
/// dataset gets a new index. Per-key order is the order in which relations
/// were first seen while walking the unions in source order, which makes
/// "first parent" tie-breaks reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationIndex {
    parents_of: Adjacency,
    children_of: Adjacency,
    spouses_of: Adjacency,
}

impl RelationIndex {
    /// Builds all three indices from `unions`.
    ///
    /// Absent partners and children are skipped. Duplicate unions are
    /// harmless: every bucket has set semantics.
    pub fn build(unions: &[Union]) -> Self {
        let mut index = Self::default();
        for union in unions {
            if let (Some(p1), Some(p2)) = (&union.partner1, &union.partner2) {
                link(&mut index.spouses_of, p1, p2);
                link(&mut index.spouses_of, p2, p1);
            }
            for child in &union.children {
                for partner in union.partners() {
                    link(&mut index.parents_of, child, partner);
                }
                for partner in union.partners() {
                    link(&mut index.children_of, partner, child);
                }
            }
        }
        debug!(
            unions = unions.len(),
            parent_edges = index.parent_edge_count(),
            spouse_edges = index.spouses_of.values().map(Vec::len).sum::<usize>(),
            "relation index built"
        );
        index
    }

    /// Recorded parents of `id`, empty when none.
    #[must_use]
    pub fn parents(&self, id: &str) -> &[PersonId] {
        self.parents_of.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Recorded children of `id` across every union it partners in.
    #[must_use]
    pub fn children(&self, id: &str) -> &[PersonId] {
        self.children_of.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Recorded spouses of `id`.
    #[must_use]
    pub fn spouses(&self, id: &str) -> &[PersonId] {
        self.spouses_of.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Total number of child→parent edges.
    #[must_use]
    pub fn parent_edge_count(&self) -> usize {
        self.parents_of.values().map(Vec::len).sum()
    }
}
