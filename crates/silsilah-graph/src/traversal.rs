// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Traversal results and the visited-set/budget guard shared by every walk.
//!
//! Union data is hand-maintained and not guaranteed acyclic. Every traversal
//! owns a [`Walk`] that refuses to re-enter a person and stops after a fixed
//! number of visits; the outcome is reported alongside the value so callers
//! can surface cycles instead of silently absorbing them.
use rustc_hash::FxHashSet;
use tracing::{debug, warn};

use crate::ident::PersonId;

/// Default maximum number of person visits for a single traversal.
pub const DEFAULT_MAX_VISITS: usize = 100_000;

/// Upper bound on the work a single traversal may do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraversalBudget {
    max_visits: usize,
}

impl TraversalBudget {
    /// Budget allowing at most `max_visits` person visits (minimum 1).
    #[must_use]
    pub fn new(max_visits: usize) -> Self {
        Self {
            max_visits: max_visits.max(1),
        }
    }

    /// Maximum person visits per traversal.
    #[must_use]
    pub fn max_visits(&self) -> usize {
        self.max_visits
    }
}

impl Default for TraversalBudget {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_VISITS)
    }
}

/// Value produced by a traversal plus how the traversal ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Traversal<T> {
    /// The traversal's result.
    pub value: T,
    /// Times an already-visited person was reached again and skipped. Nonzero
    /// for shared ancestry (cousin marriages) as well as for true cycles.
    pub revisits: usize,
    /// The visit budget ran out before the traversal finished.
    pub budget_exhausted: bool,
}

impl<T> Traversal<T> {
    /// A traversal that finished without skipping anything.
    pub fn complete(value: T) -> Self {
        Self {
            value,
            revisits: 0,
            budget_exhausted: false,
        }
    }

    /// `true` when any part of the graph was skipped.
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        self.revisits > 0 || self.budget_exhausted
    }

    /// Discards the report and returns the value.
    pub fn into_value(self) -> T {
        self.value
    }

    /// Maps the value, keeping the report.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Traversal<U> {
        Traversal {
            value: f(self.value),
            revisits: self.revisits,
            budget_exhausted: self.budget_exhausted,
        }
    }
}

/// Outcome of trying to enter a person during a walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    /// First visit; continue through this person.
    Fresh,
    /// Already visited; do not extend through it again.
    Revisit,
    /// Budget spent; stop the traversal.
    Exhausted,
}

/// Per-call visited set and visit counter.
#[derive(Debug)]
pub(crate) struct Walk {
    visited: FxHashSet<PersonId>,
    revisits: usize,
    visits: usize,
    max_visits: usize,
    exhausted: bool,
}

impl Walk {
    pub(crate) fn new(budget: TraversalBudget) -> Self {
        Self {
            visited: FxHashSet::default(),
            revisits: 0,
            visits: 0,
            max_visits: budget.max_visits(),
            exhausted: false,
        }
    }

    pub(crate) fn enter(&mut self, id: &PersonId) -> Step {
        if self.exhausted {
            return Step::Exhausted;
        }
        if self.visited.contains(id) {
            self.revisits += 1;
            return Step::Revisit;
        }
        if self.visits >= self.max_visits {
            self.exhausted = true;
            return Step::Exhausted;
        }
        self.visits += 1;
        self.visited.insert(id.clone());
        Step::Fresh
    }

    pub(crate) fn finish<T>(self, what: &'static str, value: T) -> Traversal<T> {
        if self.exhausted {
            warn!(
                traversal = what,
                visits = self.visits,
                "traversal budget exhausted; result truncated"
            );
        }
        if self.revisits > 0 {
            debug!(traversal = what, revisits = self.revisits, "traversal revisited people");
        }
        Traversal {
            value,
            revisits: self.revisits,
            budget_exhausted: self.exhausted,
        }
    }
}
