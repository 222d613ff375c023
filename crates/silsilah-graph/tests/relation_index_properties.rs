// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
use proptest::prelude::*;
use proptest::test_runner::{Config as PropConfig, RngAlgorithm, TestRng, TestRunner};

use silsilah_graph::{RelationIndex, Union};

// Seed pinned so a failing case reproduces on every machine. Override locally
// with PROPTEST_SEED when hunting for new counterexamples.
const SEED_BYTES: [u8; 32] = [
    0x51, 0x1a, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0,
];

fn runner() -> TestRunner {
    let rng = TestRng::from_seed(RngAlgorithm::ChaCha, &SEED_BYTES);
    TestRunner::new_with_rng(PropConfig::default(), rng)
}

/// Ids drawn from a small pool so unions overlap and share people.
fn person_id() -> impl Strategy<Value = String> {
    (0_u8..12).prop_map(|n| format!("p{n}"))
}

fn union_strategy() -> impl Strategy<Value = Union> {
    (
        proptest::option::of(person_id()),
        proptest::option::of(person_id()),
        prop::collection::vec(person_id(), 0..4),
    )
        .prop_map(|(p1, p2, kids)| Union::new(p1.as_deref(), p2.as_deref(), kids))
}

fn unions_strategy() -> impl Strategy<Value = Vec<Union>> {
    prop::collection::vec(union_strategy(), 0..16)
}

#[test]
fn spouse_index_is_symmetric() {
    runner()
        .run(&unions_strategy(), |unions| {
            let idx = RelationIndex::build(&unions);
            for u in &unions {
                if let (Some(p1), Some(p2)) = (&u.partner1, &u.partner2) {
                    prop_assert!(idx.spouses(p1.as_str()).contains(p2));
                    prop_assert!(idx.spouses(p2.as_str()).contains(p1));
                }
            }
            Ok(())
        })
        .expect("spouse symmetry");
}

#[test]
fn parent_and_child_indices_are_inverse() {
    runner()
        .run(&unions_strategy(), |unions| {
            let idx = RelationIndex::build(&unions);
            for u in &unions {
                for child in &u.children {
                    for partner in u.partners() {
                        prop_assert_eq!(
                            idx.children(partner.as_str()).contains(child),
                            idx.parents(child.as_str()).contains(partner)
                        );
                        prop_assert!(idx.parents(child.as_str()).contains(partner));
                    }
                }
            }
            Ok(())
        })
        .expect("parent/child inverse");
}

#[test]
fn rebuilding_is_idempotent() {
    runner()
        .run(&unions_strategy(), |unions| {
            let first = RelationIndex::build(&unions);
            let second = RelationIndex::build(&unions);
            prop_assert_eq!(&first, &second);

            let doubled: Vec<Union> = unions.iter().chain(unions.iter()).cloned().collect();
            prop_assert_eq!(&first, &RelationIndex::build(&doubled));
            Ok(())
        })
        .expect("idempotent rebuild");
}
