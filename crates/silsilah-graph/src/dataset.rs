// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Entity store: the immutable people/unions collections of one load.
use std::fs;
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::error::LoadError;
use crate::ident::{Fingerprint, PersonId};
use crate::record::{Person, Union};

/// On-disk shape of a dataset. Every top-level field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDataset {
    #[serde(default)]
    family_name: Option<String>,
    #[serde(default)]
    self_id: Option<String>,
    #[serde(default)]
    root_id: Option<String>,
    #[serde(default)]
    people: Option<Vec<Person>>,
    #[serde(default)]
    unions: Option<Vec<Union>>,
}

/// Immutable dataset: people, unions, and an id index over people.
///
/// A dataset is replaced wholesale on reload; nothing mutates it after
/// construction.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    family_name: Option<String>,
    self_id: Option<PersonId>,
    root_id: Option<PersonId>,
    people: Vec<Person>,
    unions: Vec<Union>,
    by_id: FxHashMap<PersonId, usize>,
}

impl Dataset {
    /// Builds a dataset from people and unions.
    ///
    /// When two people share an id the later record wins the id lookup; both
    /// stay in [`Dataset::people`].
    pub fn new(people: Vec<Person>, unions: Vec<Union>) -> Self {
        let mut by_id = FxHashMap::default();
        for (idx, person) in people.iter().enumerate() {
            if !person.id.is_empty() {
                by_id.insert(person.id.clone(), idx);
            }
        }
        Self {
            family_name: None,
            self_id: None,
            root_id: None,
            people,
            unions,
            by_id,
        }
    }

    /// The empty dataset rendered when nothing could be loaded.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Sets the family name shown in the header.
    pub fn with_family_name(mut self, name: impl Into<String>) -> Self {
        self.family_name = Some(name.into());
        self
    }

    /// Sets the "self" person, which takes precedence over `rootId`.
    pub fn with_self_id(mut self, id: impl Into<PersonId>) -> Self {
        self.self_id = Some(id.into()).filter(|id: &PersonId| !id.is_empty());
        self
    }

    /// Sets the dataset's declared root person.
    pub fn with_root_id(mut self, id: impl Into<PersonId>) -> Self {
        self.root_id = Some(id.into()).filter(|id: &PersonId| !id.is_empty());
        self
    }

    /// Parses a JSON dataset. Missing `people`/`unions` read as empty.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, LoadError> {
        let raw: RawDataset = serde_json::from_slice(bytes)?;
        let mut dataset = Self::new(
            raw.people.unwrap_or_default(),
            raw.unions.unwrap_or_default(),
        );
        dataset.family_name = raw.family_name.filter(|n| !n.is_empty());
        if let Some(id) = raw.self_id {
            dataset = dataset.with_self_id(id);
        }
        if let Some(id) = raw.root_id {
            dataset = dataset.with_root_id(id);
        }
        Ok(dataset)
    }

    /// Reads and parses a JSON dataset file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_slice(&bytes)
    }

    /// Loads a dataset file, substituting the empty dataset on any failure.
    ///
    /// A failed load renders exactly like a genuinely empty dataset.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load_or_empty(path: impl AsRef<Path>) -> Self {
        match Self::from_path(path.as_ref()) {
            Ok(dataset) => {
                debug!(
                    people = dataset.people.len(),
                    unions = dataset.unions.len(),
                    "dataset loaded"
                );
                dataset
            }
            Err(err) => {
                warn!(error = %err, "dataset load failed; using empty dataset");
                Self::empty()
            }
        }
    }

    /// Family name from the dataset header, if any.
    #[must_use]
    pub fn family_name(&self) -> Option<&str> {
        self.family_name.as_deref()
    }

    /// All people in source order.
    #[must_use]
    pub fn people(&self) -> &[Person] {
        &self.people
    }

    /// All unions in source order.
    #[must_use]
    pub fn unions(&self) -> &[Union] {
        &self.unions
    }

    /// Looks up a person; unknown ids are absent.
    #[must_use]
    pub fn person(&self, id: &str) -> Option<&Person> {
        self.by_id.get(id).and_then(|&idx| self.people.get(idx))
    }

    /// Returns `true` when a person with `id` exists.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Returns `true` when there are no people.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    /// Initial root: `selfId`, else `rootId`, else the first listed person.
    #[must_use]
    pub fn default_root(&self) -> Option<PersonId> {
        self.self_id
            .clone()
            .or_else(|| self.root_id.clone())
            .or_else(|| self.people.first().map(|p| p.id.clone()))
            .filter(|id| !id.is_empty())
    }

    /// Digest of the canonical CBOR encoding of people and unions.
    ///
    /// Two loads with identical people and unions share a fingerprint. Root
    /// hints and the family name are not covered.
    pub fn fingerprint(&self) -> Fingerprint {
        let mut hasher = blake3::Hasher::new();
        if let Err(err) = ciborium::into_writer(&(&self.people, &self.unions), &mut hasher) {
            warn!(error = %err, "dataset fingerprint encoding failed");
        }
        hasher.finalize().into()
    }
}

/// Headline counts for the insights panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DatasetStats {
    /// Number of people.
    pub people: usize,
    /// Number of unions ("families").
    pub families: usize,
    /// Generations below the default root, root counted as one.
    pub generations: usize,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn missing_collections_default_to_empty() {
        let ds = Dataset::from_json_slice(br#"{"familyName": "Keluarga"}"#).unwrap();
        assert!(ds.is_empty());
        assert!(ds.unions().is_empty());
        assert_eq!(ds.family_name(), Some("Keluarga"));
        assert_eq!(ds.default_root(), None);

        let ds = Dataset::from_json_slice(br#"{"people": null, "unions": null}"#).unwrap();
        assert!(ds.is_empty());
    }

    #[test]
    fn default_root_precedence() {
        let people = vec![Person::new("a", "A"), Person::new("b", "B")];
        let ds = Dataset::new(people.clone(), vec![]);
        assert_eq!(ds.default_root(), Some(PersonId::from("a")));

        let ds = Dataset::new(people.clone(), vec![]).with_root_id("b");
        assert_eq!(ds.default_root(), Some(PersonId::from("b")));

        let ds = Dataset::new(people, vec![])
            .with_root_id("b")
            .with_self_id("x");
        assert_eq!(ds.default_root(), Some(PersonId::from("x")));
    }

    #[test]
    fn unknown_ids_are_absent() {
        let ds = Dataset::new(vec![Person::new("a", "A")], vec![]);
        assert!(ds.person("a").is_some());
        assert!(ds.person("zzz").is_none());
        assert!(!ds.contains(""));
    }

    #[test]
    fn fingerprint_tracks_content() {
        let a = Dataset::new(vec![Person::new("a", "A")], vec![]);
        let b = Dataset::new(vec![Person::new("a", "A")], vec![]).with_family_name("X");
        let c = Dataset::new(vec![Person::new("a", "B")], vec![]);
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            Dataset::from_json_slice(b"{not json"),
            Err(LoadError::Json(_))
        ));
    }
}
