// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! silsilah-graph: relationship-graph engine for family-tree viewers.
//!
//! A [`Dataset`] of people and unions is loaded once, a [`RelationIndex`] of
//! parents, children, and spouses is derived from the unions, and
//! [`FamilyGraph`] answers kinship queries over both. Trees are materialized
//! on demand from a [`ViewState`] the host owns; the engine itself holds no
//! UI state.
//!
//! Data is hand-maintained and may contain dangling references or cycles.
//! Lookups never fail on data shape, and every traversal is visited-guarded
//! and budgeted, reporting skipped work through [`Traversal`].
#![forbid(unsafe_code)]

mod dataset;
/// Lenient `YYYY-MM-DD` date helpers.
pub mod dates;
mod error;
mod focus;
mod graph;
mod ident;
mod index;
mod materialize;
/// Name normalisation and patronymic gender inference.
pub mod names;
mod record;
mod search;
mod traversal;
mod view_state;

/// Entity store and headline counts.
pub use dataset::{Dataset, DatasetStats};
/// Loader errors.
pub use error::LoadError;
/// Single-person projections.
pub use focus::{Breadcrumb, ChildBranch, FocusView, PersonDetails, FOCUS_CHILD_LIMIT};
/// Kinship queries.
pub use graph::FamilyGraph;
/// Identifiers.
pub use ident::{Fingerprint, PersonId};
/// Relation indices.
pub use index::RelationIndex;
/// Materialized tree shape.
pub use materialize::{NodeVisibility, PersonNode, Toggle, TreeNode};
/// Source records.
pub use record::{Gender, Person, Union};
/// Name search.
pub use search::{SearchHit, SearchIndex, MAX_RESULTS};
/// Traversal guard and reporting.
pub use traversal::{Traversal, TraversalBudget, DEFAULT_MAX_VISITS};
/// Per-session view state.
pub use view_state::{CollapseSet, DepthLimit, FocusExpand, TreeFilters, ViewMode, ViewState};
