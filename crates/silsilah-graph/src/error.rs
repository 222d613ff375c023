// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use std::path::PathBuf;

use thiserror::Error;

/// Error returned by the fallible dataset loaders.
///
/// Viewers that follow the "empty on failure" policy use
/// [`crate::Dataset::load_or_empty`] and never observe this type.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The dataset file could not be read.
    #[error("failed to read dataset {path}: {source}")]
    Io {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The bytes were not a JSON dataset.
    #[error("dataset is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
