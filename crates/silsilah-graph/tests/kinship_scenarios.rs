// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
use silsilah_graph::{
    Dataset, DepthLimit, FamilyGraph, Gender, NodeVisibility, Person, PersonId, TraversalBudget,
    TreeFilters, Union, ViewMode, ViewState,
};

fn ids(raw: &[&str]) -> Vec<PersonId> {
    raw.iter().copied().map(PersonId::from).collect()
}

fn keluarga() -> FamilyGraph {
    let json = br#"{
        "familyName": "Keluarga Hassan",
        "people": [
            {"id": "p1", "name": "Ali bin Hassan"},
            {"id": "p2", "name": "Siti binti Yusof"},
            {"id": "c1", "name": "Amir bin Ali"}
        ],
        "unions": [{"partner1": "p1", "partner2": "p2", "children": ["c1"]}]
    }"#;
    FamilyGraph::new(Dataset::from_json_slice(json).expect("dataset parses"))
}

#[test]
fn two_parent_family_scenario() {
    let g = keluarga();
    assert_eq!(g.spouses("p1"), ids(&["p2"]).as_slice());
    assert_eq!(g.children("p1"), ids(&["c1"]).as_slice());
    let parents = g.parents("c1");
    assert_eq!(parents.len(), 2);
    assert!(parents.contains(&PersonId::from("p1")));
    assert!(parents.contains(&PersonId::from("p2")));

    assert_eq!(g.person("p1").map(Person::gender), Some(Gender::Male));
    assert_eq!(g.person("p2").map(Person::gender), Some(Gender::Female));
    assert_eq!(g.forest_roots(), ids(&["p1"]));
    assert_eq!(g.dataset().family_name(), Some("Keluarga Hassan"));
}

#[test]
fn married_in_spouse_does_not_spawn_second_root() {
    let people = vec![
        Person::new("A", "A"),
        Person::new("B", "B"),
        Person::new("C", "C"),
    ];
    let g = FamilyGraph::new(Dataset::new(
        people,
        vec![Union::new(Some("A"), Some("B"), ["C"])],
    ));
    assert_eq!(g.forest_roots(), ids(&["A"]));
}

fn cyclic() -> FamilyGraph {
    let people = vec![Person::new("A", "A"), Person::new("B", "B")];
    let unions = vec![
        Union::new(Some("B"), None, ["A"]),
        Union::new(Some("A"), None, ["B"]),
    ];
    FamilyGraph::new(Dataset::new(people, unions))
}

#[test]
fn cyclic_ancestry_terminates_and_is_reported() {
    let g = cyclic();

    let path = g.path_to_root("A", "nobody");
    assert_eq!(path.value.len(), 1);
    assert!(path.revisits > 0);

    let gens = g.estimate_generations("A");
    assert_eq!(gens.value, 2);
    assert!(gens.is_truncated());

    let top = g.find_top_root_id("A");
    assert_eq!(top.value, "B");
    assert_eq!(top.revisits, 1);

    let line = g.direct_line_set("A", "B");
    assert_eq!(line.value.len(), 2);

    // Neither person is parentless, so the forest is empty.
    assert!(g.forest_roots().is_empty());
}

#[test]
fn unbounded_materialization_of_a_cycle_terminates() {
    let g = cyclic();
    let mut state = ViewState::default();
    state.depth = DepthLimit::Unbounded;
    let tree = g.build_node("A", 1, &state);
    assert!(tree.is_truncated());
    assert_eq!(tree.value.rendered_ids(), ids(&["A", "B"]));
    let last = &tree.value.children()[0].children()[0];
    assert_eq!(last.visibility(), NodeVisibility::Phantom);
}

fn chain(len: usize) -> FamilyGraph {
    let people = (1..=len)
        .map(|i| Person::new(format!("g{i}"), format!("Generation {i}")))
        .collect();
    let unions = (1..len)
        .map(|i| {
            let parent = format!("g{i}");
            Union::new(Some(parent.as_str()), None, [format!("g{}", i + 1)])
        })
        .collect();
    FamilyGraph::new(Dataset::new(people, unions))
}

#[test]
fn depth_limit_bounds_rendered_content() {
    let g = chain(5);
    let mut state = ViewState::for_graph(&g);
    state.depth = DepthLimit::finite(2);
    let tree = g.build_node("g1", 1, &state).value;
    assert_eq!(tree.rendered_depth(), 2);
    assert_eq!(tree.rendered_ids(), ids(&["g1", "g2"]));
    let phantoms: Vec<_> = tree.walk().filter(|n| n.is_phantom()).collect();
    assert_eq!(phantoms.len(), 1);
    assert_eq!(phantoms[0].person_id(), "g3");
}

#[test]
fn collapse_toggle_twice_restores_rendering() {
    let g = chain(4);
    let mut state = ViewState::for_graph(&g);
    state.depth = DepthLimit::Unbounded;
    let before = g.build_node("g1", 1, &state).value;
    let g2 = PersonId::from("g2");

    state.collapsed.toggle(&g2);
    let collapsed = g.build_node("g1", 1, &state).value;
    assert_ne!(collapsed, before);
    assert_eq!(collapsed.rendered_ids(), ids(&["g1", "g2"]));

    state.collapsed.toggle(&g2);
    assert_eq!(g.build_node("g1", 1, &state).value, before);
}

fn branching() -> FamilyGraph {
    // r ── a ── a1
    //   └─ b ── b1
    let people = ["r", "a", "b", "a1", "b1"]
        .iter()
        .map(|id| Person::new(*id, id.to_uppercase()))
        .collect();
    let unions = vec![
        Union::new(Some("r"), None, ["a", "b"]),
        Union::new(Some("a"), None, ["a1"]),
        Union::new(Some("b"), None, ["b1"]),
    ];
    FamilyGraph::new(Dataset::new(people, unions))
}

#[test]
fn direct_line_prunes_side_branches_in_branch_mode() {
    let g = branching();
    let mut state = ViewState::default();
    state.mode = ViewMode::Branch;
    state.root = Some(PersonId::from("r"));
    state.selected = Some(PersonId::from("a1"));
    state.depth = DepthLimit::Unbounded;
    state.filters = TreeFilters {
        show_deceased: true,
        direct_line_only: true,
    };
    let tree = g.materialize_branch(&state).expect("root exists").value;
    // b survives as an immediate child of the on-line root; b1 does not.
    assert_eq!(tree.rendered_ids(), ids(&["r", "a", "a1", "b"]));

    state.mode = ViewMode::Forest;
    let forest = g.materialize_forest(&state).value;
    assert_eq!(forest.len(), 1);
    assert_eq!(forest[0].rendered_ids().len(), 5);
}

#[test]
fn branch_only_expands_just_the_selection() {
    let g = branching();
    let mut state = ViewState::default();
    state.mode = ViewMode::Branch;
    state.root = Some(PersonId::from("r"));
    state.selected = Some(PersonId::from("r"));
    state.depth = DepthLimit::Unbounded;
    state.branch_only = true;
    let tree = g.materialize_branch(&state).expect("root exists").value;
    assert_eq!(tree.rendered_ids(), ids(&["r", "a", "b"]));
    assert_eq!(tree.children()[0].visibility(), NodeVisibility::BranchOnly);
}

#[test]
fn unknown_branch_root_renders_nothing() {
    let g = branching();
    let mut state = ViewState::default();
    state.mode = ViewMode::Branch;
    state.root = Some(PersonId::from("ghost"));
    assert!(g.materialize_branch(&state).is_none());
}

#[test]
fn materializer_respects_the_global_budget() {
    let g = chain(50).with_budget(TraversalBudget::new(10));
    let mut state = ViewState::default();
    state.depth = DepthLimit::Unbounded;
    let tree = g.build_node("g1", 1, &state);
    assert!(tree.budget_exhausted);
    assert_eq!(tree.value.rendered_ids().len(), 10);
}

#[test]
fn couple_rows_anchor_on_the_primary_partner() {
    let g = keluarga();
    let mut state = ViewState::for_graph(&g);
    state.depth = DepthLimit::Unbounded;
    let forest = g.materialize_forest(&state).value;
    assert_eq!(forest.len(), 1);
    let root = forest[0].as_person().expect("rendered root");
    assert!(root.couple_row);
    assert_eq!(root.cards, ids(&["p1", "p2"]));
    let child = root.children[0].as_person().expect("rendered child");
    assert!(!child.couple_row);
    assert_eq!(child.cards, ids(&["c1"]));
}
