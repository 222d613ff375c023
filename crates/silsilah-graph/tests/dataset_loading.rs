// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
use std::fs;

use silsilah_graph::{Dataset, FamilyGraph, LoadError, PersonId, ViewState};

const SAMPLE: &str = r#"{
    "familyName": "Keluarga Yusof",
    "rootId": "gp",
    "people": [
        {"id": "gp", "name": "yusof bin ahmad", "birth": "1930-02-11", "death": "1999-12-01"},
        {"id": "gm", "name": "AMINAH BINTI SALLEH", "gender": "female"},
        {"id": "s", "name": "Siti binti Yusof", "birth": "1960-07-04"},
        {"id": "x", "name": "", "photo": ""}
    ],
    "unions": [
        {"partner1": "gp", "partner2": "gm", "children": ["s", "", null, "missing"]},
        {"partner2": "s"}
    ]
}"#;

#[test]
fn loads_a_dataset_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("data.json");
    fs::write(&path, SAMPLE).expect("write sample");

    let dataset = Dataset::from_path(&path).expect("sample loads");
    assert_eq!(dataset.people().len(), 4);
    assert_eq!(dataset.unions().len(), 2);
    assert_eq!(dataset.default_root(), Some(PersonId::from("gp")));
    assert_eq!(dataset.person("x").and_then(|p| p.photo.as_deref()), None);

    let graph = FamilyGraph::new(dataset);
    assert_eq!(graph.children("gp").len(), 2);
    assert!(graph.is_primary_partner("s"));
    let stats = graph.stats();
    assert_eq!((stats.people, stats.families, stats.generations), (4, 2, 2));
}

#[test]
fn missing_file_is_an_io_error_and_loads_empty() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("absent.json");
    assert!(matches!(
        Dataset::from_path(&path),
        Err(LoadError::Io { .. })
    ));
    assert!(Dataset::load_or_empty(&path).is_empty());
}

#[test]
fn malformed_file_loads_as_empty_dataset() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("broken.json");
    fs::write(&path, "{\"people\": [").expect("write broken");

    let dataset = Dataset::load_or_empty(&path);
    assert!(dataset.is_empty());
    let graph = FamilyGraph::new(dataset);
    assert!(graph.forest_roots().is_empty());
    assert_eq!(ViewState::for_graph(&graph).root, None);
}

#[test]
fn reloading_resets_view_state_but_keeps_filters() {
    let first = FamilyGraph::new(Dataset::from_json_slice(SAMPLE.as_bytes()).expect("sample"));
    let mut state = ViewState::for_graph(&first);
    state.collapsed.insert(PersonId::from("s"));
    state.selected = Some(PersonId::from("s"));
    state.filters.show_deceased = false;

    let again = FamilyGraph::new(Dataset::from_json_slice(SAMPLE.as_bytes()).expect("sample"));
    assert!(!state.sync_dataset(&again));
    assert!(state.collapsed.is_empty());
    assert_eq!(state.selected, Some(PersonId::from("gp")));
    assert!(!state.filters.show_deceased);

    let second = FamilyGraph::new(
        Dataset::from_json_slice(br#"{"people": [{"id": "z", "name": "Z"}]}"#).expect("second"),
    );
    assert!(state.sync_dataset(&second));
    assert_eq!(state.root, Some(PersonId::from("z")));
    assert_eq!(state.dataset_fingerprint(), Some(&second.dataset().fingerprint()));
    assert!(!state.filters.show_deceased);
}
