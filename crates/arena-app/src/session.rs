//! Session configuration loading for the host.

use std::path::Path;

use log::{info, warn};

use arena_core::config::SessionConfig;

/// Read a session file. Missing fields take their defaults.
pub fn read_session(path: &Path) -> Result<SessionConfig, String> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| format!("Cannot read {}: {e}", path.display()))?;
    SessionConfig::from_json(&json)
}

/// Session from `path` if given and valid, otherwise the defaults.
pub fn load_session(path: Option<&Path>) -> SessionConfig {
    let Some(path) = path else {
        return SessionConfig::default();
    };
    match read_session(path) {
        Ok(session) => {
            info!("loaded session from {}", path.display());
            session
        }
        Err(e) => {
            warn!("{e}; using default session");
            SessionConfig::default()
        }
    }
}
