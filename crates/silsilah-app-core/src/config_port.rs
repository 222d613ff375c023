// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Config port shared by Silsilah viewers.

use tracing::warn;

use crate::config::{ConfigService, ConfigStore};
use crate::prefs::ViewerPrefs;

/// Store key under which viewer preferences are saved.
pub const PREFS_KEY: &str = "viewer_prefs";

/// Config-facing port for loading/saving viewer preferences.
pub trait ConfigPort {
    /// Load viewer preferences (returns None if missing or unreadable).
    fn load_prefs(&self) -> Option<ViewerPrefs>;
    /// Persist viewer preferences (best-effort; failures are logged).
    fn save_prefs(&self, prefs: &ViewerPrefs);
}

impl<S: ConfigStore> ConfigPort for ConfigService<S> {
    fn load_prefs(&self) -> Option<ViewerPrefs> {
        match self.load(PREFS_KEY) {
            Ok(prefs) => prefs,
            Err(err) => {
                warn!(error = %err, key = PREFS_KEY, "viewer prefs unreadable; using defaults");
                None
            }
        }
    }

    fn save_prefs(&self, prefs: &ViewerPrefs) {
        if let Err(err) = self.save(PREFS_KEY, prefs) {
            warn!(error = %err, key = PREFS_KEY, "viewer prefs not saved");
        }
    }
}
