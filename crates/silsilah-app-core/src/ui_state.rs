// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Pure state transitions for the viewer UI (selection, navigation, search).
//!
//! [`reduce`] never touches a renderer or a store. Anything with an outside
//! effect (opening the drawer, moving the camera, persisting prefs) comes back
//! as a [`UiEffect`] for the host to run.

use silsilah_graph::{DepthLimit, FamilyGraph, PersonId, ViewMode};
use tracing::debug;

use crate::prefs::ViewerPrefs;
use crate::session::{SearchState, Session};

/// Collapse depth applied when branch mode opens with every generation shown.
pub const BRANCH_AUTO_COLLAPSE_DEPTH: u32 = 2;

/// Discrete viewer input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// A person card was clicked.
    SelectCard(PersonId),
    /// A tree node's expand/collapse control was clicked.
    ToggleNode(PersonId),
    /// A focus-view child's "expand branch" control was clicked.
    ToggleFocusChild(PersonId),
    /// Switch the focus view between one and two ancestor generations.
    ToggleAncestors,
    /// Switch the focus view between the first few and all children.
    ToggleAllChildren,
    /// A mode button was pressed.
    SetView(ViewMode),
    /// Render every generation.
    ShowAllGenerations,
    /// Navigate to a person (search result, drawer "go to").
    JumpTo(PersonId),
    /// Centre the canvas on a person.
    CenterOn(PersonId),
    /// Centre on the current selection, falling back to the root.
    CenterOnSelection,
    /// A breadcrumb was clicked.
    Breadcrumb(PersonId),
    /// Open the selection as a branch and close the drawer.
    FocusBranch,
    /// Show the selection's branch.
    ViewFull,
    /// Copy the selected id.
    CopyId,
    /// Search text changed.
    SearchInput(String),
    /// Move the search cursor (arrow keys).
    SearchMove(isize),
    /// Accept the active search result.
    SearchSubmit,
    /// Close the detail drawer.
    CloseDrawer,
    /// Dismiss drawer and search.
    Escape,
    /// New preferences were confirmed.
    SavePrefs(ViewerPrefs),
    /// The graph was rebuilt from a (re)loaded dataset.
    DatasetLoaded,
}

/// Side effect requested by [`reduce`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEffect {
    /// Show the detail drawer for a person.
    OpenDrawer(PersonId),
    /// Emphasise these cards, from the person up to the path root.
    HighlightPath(Vec<PersonId>),
    /// Reset pan/zoom and fit the tree to the canvas.
    FitToScreen,
    /// Reset pan/zoom and centre this person's card.
    CenterNode(PersonId),
    /// Persist the session's preferences.
    SavePrefs,
    /// Put text on the clipboard.
    CopyToClipboard(String),
}

/// Applies `ev` to `session` against `graph`.
pub fn reduce(session: &Session, ev: UiEvent, graph: &FamilyGraph) -> (Session, Vec<UiEffect>) {
    let mut next = session.clone();
    let mut fx = Vec::new();
    match ev {
        UiEvent::SelectCard(id) => {
            next.view.selected = Some(id.clone());
            fx.push(highlight(&next, graph, &id));
            if graph.person(id.as_str()).is_some() {
                next.drawer = Some(id.clone());
                fx.push(UiEffect::OpenDrawer(id));
            }
        }
        UiEvent::ToggleNode(id) => {
            let collapsed = next.view.collapsed.toggle(&id);
            debug!(person = %id, collapsed, "tree node toggled");
        }
        UiEvent::ToggleFocusChild(id) => next.view.focus.toggle_child(&id),
        UiEvent::ToggleAncestors => next.view.focus.toggle_ancestors(),
        UiEvent::ToggleAllChildren => {
            next.view.focus.show_all_children = !next.view.focus.show_all_children;
        }
        UiEvent::SetView(mode) => {
            set_view(&mut next, graph, mode);
            if mode != ViewMode::Focus {
                fx.push(UiEffect::FitToScreen);
            }
        }
        UiEvent::ShowAllGenerations => {
            next.view.depth = DepthLimit::Unbounded;
            fx.push(UiEffect::FitToScreen);
        }
        UiEvent::JumpTo(id) => {
            navigate(&mut next, &id);
            fx.push(highlight(&next, graph, &id));
            if next.prefs.auto_open_drawer && graph.person(id.as_str()).is_some() {
                next.drawer = Some(id.clone());
                fx.push(UiEffect::OpenDrawer(id.clone()));
            }
            fx.extend(reframe(&next, id));
        }
        UiEvent::CenterOn(id) => {
            navigate(&mut next, &id);
            fx.extend(reframe(&next, id));
        }
        UiEvent::CenterOnSelection => {
            if let Some(id) = next.view.target().cloned() {
                navigate(&mut next, &id);
                fx.extend(reframe(&next, id));
            }
        }
        UiEvent::Breadcrumb(id) => {
            next.view.selected = Some(id.clone());
            if next.view.mode == ViewMode::Branch {
                next.view.root = Some(id.clone());
            }
            fx.push(highlight(&next, graph, &id));
        }
        UiEvent::FocusBranch => {
            if let Some(id) = next.view.selected.clone() {
                next.view.root = Some(id.clone());
                set_view(&mut next, graph, ViewMode::Branch);
                fx.push(UiEffect::FitToScreen);
                fx.push(highlight(&next, graph, &id));
            }
            next.drawer = None;
        }
        UiEvent::ViewFull => {
            if let Some(id) = next.view.selected.clone() {
                next.view.root = Some(id);
            }
            set_view(&mut next, graph, ViewMode::Branch);
            fx.push(UiEffect::FitToScreen);
        }
        UiEvent::CopyId => {
            if let Some(id) = &next.view.selected {
                fx.push(UiEffect::CopyToClipboard(id.to_string()));
            }
        }
        UiEvent::SearchInput(query) => {
            next.search.results = graph
                .search_index()
                .search(&query)
                .into_iter()
                .map(|hit| hit.id)
                .collect();
            next.search.active = None;
            next.search.query = query;
        }
        UiEvent::SearchMove(delta) => next.search.move_cursor(delta),
        UiEvent::SearchSubmit => {
            if let Some(id) = next.search.chosen().cloned() {
                next.search.dismiss();
                return reduce(&next, UiEvent::JumpTo(id), graph);
            }
        }
        UiEvent::CloseDrawer => next.drawer = None,
        UiEvent::Escape => {
            next.drawer = None;
            next.search.dismiss();
        }
        UiEvent::SavePrefs(prefs) => {
            next.prefs = prefs;
            prefs.apply(&mut next.view);
            fx.push(UiEffect::SavePrefs);
        }
        UiEvent::DatasetLoaded => {
            let changed = next.view.sync_dataset(graph);
            debug!(
                people = graph.dataset().people().len(),
                changed,
                "session reset for reloaded dataset"
            );
            next.view.mode = next.prefs.default_view;
            next.prefs.apply(&mut next.view);
            next.drawer = None;
            next.search = SearchState::default();
            fx.push(UiEffect::FitToScreen);
        }
    }
    (next, fx)
}

/// Switches mode; branch mode with every generation shown starts collapsed
/// below the first children.
fn set_view(next: &mut Session, graph: &FamilyGraph, mode: ViewMode) {
    next.view.mode = mode;
    if mode == ViewMode::Branch && next.view.depth == DepthLimit::Unbounded {
        let root = next.view.root.as_ref().map_or("", PersonId::as_str);
        next.view.collapsed = graph
            .auto_collapse_deep(root, BRANCH_AUTO_COLLAPSE_DEPTH)
            .into_value();
    }
}

/// Selects `id`, re-rooting everywhere except the forest.
fn navigate(next: &mut Session, id: &PersonId) {
    next.view.selected = Some(id.clone());
    if next.view.mode != ViewMode::Forest {
        next.view.root = Some(id.clone());
    }
}

fn reframe(next: &Session, id: PersonId) -> Option<UiEffect> {
    match next.view.mode {
        ViewMode::Focus => None,
        ViewMode::Forest => Some(UiEffect::CenterNode(id)),
        ViewMode::Branch => Some(UiEffect::FitToScreen),
    }
}

fn highlight(next: &Session, graph: &FamilyGraph, id: &PersonId) -> UiEffect {
    let root = next.view.root.as_ref().map(PersonId::as_str);
    let path = graph.highlight_path(id.as_str(), next.view.mode, root);
    UiEffect::HighlightPath(path.into_value())
}
