// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Single-person projections: focus view, detail drawer, timeline, and the
//! root path used for breadcrumbs and highlighting.
use crate::graph::FamilyGraph;
use crate::ident::PersonId;
use crate::record::Person;
use crate::traversal::Traversal;
use crate::view_state::{FocusExpand, ViewMode, ViewState};

/// Children listed in the focus view before "show all" is toggled.
pub const FOCUS_CHILD_LIMIT: usize = 4;

/// A child in the focus view and, when expanded, its own children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildBranch<'a> {
    /// The child.
    pub child: &'a Person,
    /// Present when the branch is expanded (possibly empty).
    pub grandchildren: Option<Vec<&'a Person>>,
}

/// Neighbourhood of one person.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusView<'a> {
    /// Centre card.
    pub person: &'a Person,
    /// Resolved parents.
    pub parents: Vec<&'a Person>,
    /// Resolved spouses.
    pub spouses: Vec<&'a Person>,
    /// Listed children, truncated unless all children are shown.
    pub children: Vec<ChildBranch<'a>>,
    /// Children beyond the listed ones.
    pub hidden_children: usize,
    /// Present when two ancestor generations are shown. Parents of each
    /// parent in order; a grandparent shared by both parents appears twice.
    pub grandparents: Option<Vec<&'a Person>>,
}

/// Data for the detail drawer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonDetails<'a> {
    /// The person.
    pub person: &'a Person,
    /// Names of resolvable parents.
    pub parents: Vec<&'a str>,
    /// Names of resolvable spouses.
    pub spouses: Vec<&'a str>,
    /// Names of resolvable children.
    pub children: Vec<&'a str>,
    /// More than one parent id is recorded.
    pub multiple_parents: bool,
}

/// One breadcrumb entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breadcrumb {
    /// Person the crumb navigates to.
    pub id: PersonId,
    /// Short label (first name).
    pub label: String,
}

impl FamilyGraph {
    /// Focus view of `id`; `None` when the person is unknown.
    #[must_use]
    pub fn focus_view(&self, id: &str, expand: &FocusExpand) -> Option<FocusView<'_>> {
        let person = self.person(id)?;
        let children: Vec<&Person> = self.resolve(self.children(id)).collect();
        let limit = if expand.show_all_children {
            children.len()
        } else {
            FOCUS_CHILD_LIMIT.min(children.len())
        };
        let hidden_children = children.len() - limit;
        let listed = children
            .into_iter()
            .take(limit)
            .map(|child| ChildBranch {
                child,
                grandchildren: expand
                    .expanded_children
                    .contains(&child.id)
                    .then(|| self.resolve(self.children(child.id.as_str())).collect()),
            })
            .collect();

        let parents: Vec<&Person> = self.resolve(self.parents(id)).collect();
        let grandparents = (expand.ancestors > 1).then(|| {
            parents
                .iter()
                .flat_map(|p| self.resolve(self.parents(p.id.as_str())))
                .collect()
        });

        Some(FocusView {
            person,
            parents,
            spouses: self.resolve(self.spouses(id)).collect(),
            children: listed,
            hidden_children,
            grandparents,
        })
    }

    /// Drawer details for `id`; `None` when the person is unknown.
    #[must_use]
    pub fn person_details(&self, id: &str) -> Option<PersonDetails<'_>> {
        let person = self.person(id)?;
        Some(PersonDetails {
            person,
            parents: self.names(self.parents(id)),
            spouses: self.names(self.spouses(id)),
            children: self.names(self.children(id)),
            multiple_parents: self.parents(id).len() > 1,
        })
    }

    fn names<'a>(&'a self, ids: &'a [PersonId]) -> Vec<&'a str> {
        self.resolve(ids).map(|p| p.name.as_str()).collect()
    }

    /// People with a birth date, ordered by the raw birth string.
    #[must_use]
    pub fn timeline(&self) -> Vec<&Person> {
        let mut items: Vec<&Person> = self
            .dataset()
            .people()
            .iter()
            .filter(|p| p.birth.is_some())
            .collect();
        items.sort_by(|a, b| Ord::cmp(&a.birth, &b.birth));
        items
    }

    /// Root the path of `id` is measured against: the first-parent top
    /// ancestor in forest mode, the view root otherwise.
    fn anchor_for(
        &self,
        id: &str,
        mode: ViewMode,
        root: Option<&str>,
    ) -> Traversal<Option<PersonId>> {
        match mode {
            ViewMode::Forest => self.find_top_root_id(id).map(Some),
            ViewMode::Focus | ViewMode::Branch => {
                Traversal::complete(root.filter(|r| !r.is_empty()).map(PersonId::from))
            }
        }
    }

    /// Ids from `id` up to its anchor root, for path highlighting.
    #[must_use]
    pub fn highlight_path(
        &self,
        id: &str,
        mode: ViewMode,
        root: Option<&str>,
    ) -> Traversal<Vec<PersonId>> {
        let anchor = self.anchor_for(id, mode, root);
        let Some(anchor_id) = anchor.value.as_ref() else {
            return anchor.map(|_| Vec::new());
        };
        let path = self.path_to_root(id, anchor_id.as_str());
        Traversal {
            value: path.value.iter().map(|p| p.id.clone()).collect(),
            revisits: anchor.revisits + path.revisits,
            budget_exhausted: anchor.budget_exhausted || path.budget_exhausted,
        }
    }

    /// Breadcrumbs for the current target, root first.
    #[must_use]
    pub fn breadcrumbs(&self, state: &ViewState) -> Traversal<Vec<Breadcrumb>> {
        let Some(target) = state.target() else {
            return Traversal::complete(Vec::new());
        };
        let root = state.root.as_ref().map(PersonId::as_str);
        self.highlight_path(target.as_str(), state.mode, root).map(|ids| {
            ids.iter()
                .rev()
                .filter_map(|id| self.person(id.as_str()))
                .map(|p| Breadcrumb {
                    id: p.id.clone(),
                    label: p.first_name(),
                })
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::dataset::Dataset;
    use crate::record::Union;

    fn family() -> FamilyGraph {
        let mut people: Vec<Person> = ["gp", "gm", "f", "m", "k"]
            .iter()
            .map(|id| Person::new(*id, format!("{id} bin x")))
            .collect();
        people[4].birth = Some("1990-05-01".into());
        people[2].birth = Some("1960-01-01".into());
        for i in 0..6 {
            people.push(Person::new(format!("c{i}"), format!("Child {i}")));
        }
        let mut unions = vec![
            Union::new(Some("gp"), Some("gm"), ["f"]),
            Union::new(Some("f"), Some("m"), ["k"]),
        ];
        unions.push(Union::new(
            Some("k"),
            None,
            (0..6).map(|i| format!("c{i}")),
        ));
        unions.push(Union::new(Some("c0"), None, ["ghost"]));
        FamilyGraph::new(Dataset::new(people, unions))
    }

    #[test]
    fn focus_truncates_children_and_expands_grandchildren() {
        let g = family();
        let mut expand = FocusExpand::default();
        expand.toggle_child(&PersonId::from("c0"));
        let view = g.focus_view("k", &expand).unwrap();
        assert_eq!(view.children.len(), FOCUS_CHILD_LIMIT);
        assert_eq!(view.hidden_children, 2);
        assert_eq!(view.children[0].grandchildren.as_ref().map(Vec::len), Some(0));
        assert!(view.children[1].grandchildren.is_none());
        assert!(view.grandparents.is_none());

        expand.show_all_children = true;
        expand.toggle_ancestors();
        let view = g.focus_view("k", &expand).unwrap();
        assert_eq!(view.children.len(), 6);
        assert_eq!(view.hidden_children, 0);
        let gps: Vec<_> = view
            .grandparents
            .unwrap()
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(gps, vec!["gp", "gm"]);
    }

    #[test]
    fn details_flag_multiple_parents() {
        let g = family();
        let d = g.person_details("k").unwrap();
        assert!(d.multiple_parents);
        assert_eq!(d.parents, vec!["f bin x", "m bin x"]);
        assert!(g.person_details("nobody").is_none());
    }

    #[test]
    fn timeline_sorts_by_birth() {
        let g = family();
        let ids: Vec<_> = g.timeline().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["f", "k"]);
    }

    #[test]
    fn breadcrumbs_run_root_first() {
        let g = family();
        let mut state = ViewState::for_graph(&g);
        state.selected = Some(PersonId::from("k"));
        let crumbs: Vec<_> = g
            .breadcrumbs(&state)
            .value
            .into_iter()
            .map(|c| c.id.to_string())
            .collect();
        assert_eq!(crumbs, vec!["gp", "f", "k"]);

        state.mode = ViewMode::Branch;
        state.root = Some(PersonId::from("f"));
        let crumbs = g.breadcrumbs(&state).value;
        assert_eq!(crumbs.len(), 2);
        assert_eq!(crumbs[0].label, "F");
    }
}
