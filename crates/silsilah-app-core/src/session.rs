// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Per-viewer session: engine view state plus drawer and search UI state.

use silsilah_graph::{FamilyGraph, PersonId, ViewState};

use crate::prefs::ViewerPrefs;

/// Keyboard-driven search box state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    /// Raw query text as typed.
    pub query: String,
    /// Matching people, best first.
    pub results: Vec<PersonId>,
    /// Highlighted result; `None` until the cursor first moves.
    pub active: Option<usize>,
}

impl SearchState {
    /// Moves the cursor by `delta`, clamped to the result list.
    pub fn move_cursor(&mut self, delta: isize) {
        let Some(last) = self.results.len().checked_sub(1) else {
            self.active = None;
            return;
        };
        let next = match self.active {
            Some(current) => current.saturating_add_signed(delta),
            None if delta > 0 => delta.unsigned_abs() - 1,
            None => 0,
        };
        self.active = Some(next.min(last));
    }

    /// Result chosen on submit: the active one, else the first.
    pub fn chosen(&self) -> Option<&PersonId> {
        self.active
            .and_then(|i| self.results.get(i))
            .or_else(|| self.results.first())
    }

    /// Drops results and the cursor, keeping the typed query.
    pub fn dismiss(&mut self) {
        self.results.clear();
        self.active = None;
    }
}

/// Everything a viewer tracks between events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Engine view state (mode, selection, root, collapse set, filters).
    pub view: ViewState,
    /// Active preferences.
    pub prefs: ViewerPrefs,
    /// Person shown in the detail drawer, when open.
    pub drawer: Option<PersonId>,
    /// Search box state.
    pub search: SearchState,
}

impl Session {
    /// Fresh session for `graph`, opened in the preferred default view.
    pub fn new(graph: &FamilyGraph, prefs: ViewerPrefs) -> Self {
        let mut view = ViewState::for_graph(graph);
        view.mode = prefs.default_view;
        prefs.apply(&mut view);
        Self {
            view,
            prefs,
            drawer: None,
            search: SearchState::default(),
        }
    }

    /// Returns `true` when the detail drawer is open.
    pub fn drawer_open(&self) -> bool {
        self.drawer.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn search(n: usize) -> SearchState {
        SearchState {
            query: "x".into(),
            results: (0..n).map(|i| PersonId::from(format!("p{i}"))).collect(),
            active: None,
        }
    }

    #[test]
    fn cursor_clamps_to_results() {
        let mut s = search(3);
        s.move_cursor(1);
        assert_eq!(s.active, Some(0));
        s.move_cursor(5);
        assert_eq!(s.active, Some(2));
        s.move_cursor(-10);
        assert_eq!(s.active, Some(0));

        let mut fresh = search(3);
        fresh.move_cursor(-1);
        assert_eq!(fresh.active, Some(0));

        let mut empty = search(0);
        empty.move_cursor(1);
        assert_eq!(empty.active, None);
        assert!(empty.chosen().is_none());
    }

    #[test]
    fn submit_falls_back_to_first_result() {
        let mut s = search(2);
        assert_eq!(s.chosen().map(PersonId::as_str), Some("p0"));
        s.move_cursor(2);
        assert_eq!(s.chosen().map(PersonId::as_str), Some("p1"));
        s.dismiss();
        assert!(s.chosen().is_none());
        assert_eq!(s.query, "x");
    }
}
