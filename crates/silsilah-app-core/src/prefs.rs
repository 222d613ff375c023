// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Persisted viewer preferences (card display flags and tree filters).

use serde::{Deserialize, Serialize};
use silsilah_graph::{ViewMode, ViewState};

/// Saved preferences for a viewer surface.
///
/// Fields missing from a stored blob fall back to their defaults, so older
/// saves keep loading as new flags are added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerPrefs {
    /// Show birth date and age on cards.
    pub show_years: bool,
    /// Use the compact card layout.
    pub compact_cards: bool,
    /// Show the gender badge on cards.
    pub show_gender: bool,
    /// Disable animated transitions.
    pub reduce_motion: bool,
    /// Mode a freshly loaded dataset opens in.
    pub default_view: ViewMode,
    /// Open the detail drawer when jumping to a person.
    pub auto_open_drawer: bool,
    /// Render deceased people in trees.
    pub show_deceased: bool,
    /// Prune side branches off the root-to-selection line in branch mode.
    pub direct_line_only: bool,
}

impl Default for ViewerPrefs {
    fn default() -> Self {
        Self {
            show_years: true,
            compact_cards: false,
            show_gender: true,
            reduce_motion: false,
            default_view: ViewMode::Forest,
            auto_open_drawer: false,
            show_deceased: true,
            direct_line_only: false,
        }
    }
}

impl ViewerPrefs {
    /// Copies the tree filters into `view`.
    pub fn apply(&self, view: &mut ViewState) {
        view.filters.show_deceased = self.show_deceased;
        view.filters.direct_line_only = self.direct_line_only;
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn partial_blob_fills_defaults() {
        let prefs: ViewerPrefs =
            serde_json::from_str(r#"{"compact_cards": true, "default_view": "branch"}"#).unwrap();
        assert!(prefs.compact_cards);
        assert_eq!(prefs.default_view, ViewMode::Branch);
        assert!(prefs.show_deceased);
        assert!(prefs.show_years);
    }

    #[test]
    fn apply_copies_filters_only() {
        let prefs = ViewerPrefs {
            show_deceased: false,
            direct_line_only: true,
            default_view: ViewMode::Focus,
            ..ViewerPrefs::default()
        };
        let mut view = ViewState::default();
        prefs.apply(&mut view);
        assert!(!view.filters.show_deceased);
        assert!(view.filters.direct_line_only);
        assert_eq!(view.mode, ViewMode::Forest);
    }
}
