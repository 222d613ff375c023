// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared application services for Silsilah viewers (config, prefs, session).
//! Keeps UI adapters thin and framework-agnostic: hosts feed [`ui_state::UiEvent`]s
//! through [`ui_state::reduce`] and run the returned effects.
#![forbid(unsafe_code)]

pub mod config;
pub mod config_port;
pub mod prefs;
pub mod session;
pub mod ui_state;
