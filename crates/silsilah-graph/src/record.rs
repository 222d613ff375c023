// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Person and union records as they appear in the source dataset.
//!
//! Deserialization is lenient: empty strings and `null` are read as absent so a
//! hand-maintained dataset never fails to load over a blank field.
use serde::de::IntoDeserializer;
use serde::{Deserialize, Deserializer, Serialize};

use crate::ident::PersonId;
use crate::names;

/// Recorded or inferred gender of a person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    /// Male.
    Male,
    /// Female.
    Female,
    /// Not recorded and not inferable.
    #[serde(other)]
    Unknown,
}

impl Gender {
    /// Single-letter badge used on cards (`M`, `F`, `?`).
    #[must_use]
    pub fn badge(self) -> char {
        match self {
            Self::Male => 'M',
            Self::Female => 'F',
            Self::Unknown => '?',
        }
    }
}

/// A person in the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Unique identifier.
    #[serde(default, deserialize_with = "string_or_default")]
    pub id: PersonId,
    /// Display name (free text).
    #[serde(default, deserialize_with = "string_or_default")]
    pub name: String,
    /// Explicit gender, when recorded.
    #[serde(
        default,
        deserialize_with = "non_empty_gender",
        skip_serializing_if = "Option::is_none"
    )]
    pub gender: Option<Gender>,
    /// Birth date, `YYYY-MM-DD` (partial values allowed).
    #[serde(default, deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    pub birth: Option<String>,
    /// Death date, `YYYY-MM-DD` (partial values allowed).
    #[serde(default, deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    pub death: Option<String>,
    /// Photo URL or path; opaque to the engine.
    #[serde(default, deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    /// Free-text relation label; opaque to the engine.
    #[serde(default, deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    pub relation: Option<String>,
    /// Free-text note; opaque to the engine.
    #[serde(default, deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Person {
    /// Creates a person with only an id and a name.
    pub fn new(id: impl Into<PersonId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            gender: None,
            birth: None,
            death: None,
            photo: None,
            relation: None,
            note: None,
        }
    }

    /// A person is deceased when any death date is recorded.
    #[must_use]
    pub fn is_deceased(&self) -> bool {
        self.death.is_some()
    }

    /// Explicit gender if recorded, otherwise inferred from name particles.
    #[must_use]
    pub fn gender(&self) -> Gender {
        names::infer_gender(self)
    }

    /// Name shown on cards and breadcrumbs.
    #[must_use]
    pub fn first_name(&self) -> String {
        names::first_name(&self.name)
    }
}

/// A recorded partnership and its children.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Union {
    /// First-listed partner.
    #[serde(default, deserialize_with = "non_empty_id", skip_serializing_if = "Option::is_none")]
    pub partner1: Option<PersonId>,
    /// Second-listed partner.
    #[serde(default, deserialize_with = "non_empty_id", skip_serializing_if = "Option::is_none")]
    pub partner2: Option<PersonId>,
    /// Children in recorded order. Not necessarily unique across unions.
    #[serde(default, deserialize_with = "child_ids")]
    pub children: Vec<PersonId>,
}

impl Union {
    /// Creates a union from optional partner ids and child ids.
    pub fn new<I, C>(partner1: Option<&str>, partner2: Option<&str>, children: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<PersonId>,
    {
        Self {
            partner1: partner1.filter(|p| !p.is_empty()).map(PersonId::from),
            partner2: partner2.filter(|p| !p.is_empty()).map(PersonId::from),
            children: children
                .into_iter()
                .map(Into::into)
                .filter(|c: &PersonId| !c.is_empty())
                .collect(),
        }
    }

    /// The first non-absent partner: `partner1`, else `partner2`.
    ///
    /// This is the one rule every component uses to anchor a couple row and to
    /// attribute the union's children, so a couple's children are never listed
    /// under both partners.
    #[must_use]
    pub fn primary_partner(&self) -> Option<&PersonId> {
        self.partner1.as_ref().or(self.partner2.as_ref())
    }

    /// Present partners in listed order.
    pub fn partners(&self) -> impl Iterator<Item = &PersonId> {
        self.partner1.iter().chain(self.partner2.iter())
    }

    /// Returns `true` when `id` is this union's primary partner.
    #[must_use]
    pub fn is_primary(&self, id: &str) -> bool {
        self.primary_partner().is_some_and(|p| p == id)
    }
}

fn string_or_default<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: From<String>,
{
    Ok(T::from(Option::<String>::deserialize(de)?.unwrap_or_default()))
}

fn non_empty<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(de)?.filter(|s| !s.is_empty()))
}

fn non_empty_id<'de, D>(de: D) -> Result<Option<PersonId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(non_empty(de)?.map(PersonId::from))
}

fn non_empty_gender<'de, D>(de: D) -> Result<Option<Gender>, D::Error>
where
    D: Deserializer<'de>,
{
    non_empty(de)?
        .map(|raw| Gender::deserialize(raw.into_deserializer()))
        .transpose()
}

fn child_ids<'de, D>(de: D) -> Result<Vec<PersonId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Option<String>>>::deserialize(de)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .flatten()
        .filter(|c| !c.is_empty())
        .map(PersonId::from)
        .collect())
}
