// DocSearch Gate - Path Resolution
// Copyright 2026 Joseph Stone - All Rights Reserved
//
// Single source of truth for config and state locations.
// Environment overrides are read on every call, never cached: each hook
// invocation is its own process and tests swap them per case.

use std::path::PathBuf;

/// Overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "DOCSEARCH_CONFIG_PATH";

/// Overrides the session state directory.
pub const STATE_DIR_ENV: &str = "DOCSEARCH_STATE_DIR";

/// Home directory used for defaults.
///
/// Resolution order:
///   1. HOME environment variable
///   2. USERPROFILE (Windows)
///   3. System temp dir (hook must still run in stripped environments)
pub fn home_dir() -> PathBuf {
    if let Ok(home) = std::env::var("HOME") {
        if !home.is_empty() {
            return PathBuf::from(home);
        }
    }
    if let Ok(profile) = std::env::var("USERPROFILE") {
        if !profile.is_empty() {
            return PathBuf::from(profile);
        }
    }
    std::env::temp_dir()
}

/// Hooks directory under the agent runtime's home: ~/.claude/hooks
pub fn hooks_dir() -> PathBuf {
    home_dir().join(".claude").join("hooks")
}

/// Config file path: DOCSEARCH_CONFIG_PATH or ~/.claude/hooks/docsearch-config.json
pub fn config_path() -> PathBuf {
    match std::env::var_os(CONFIG_PATH_ENV) {
        Some(p) if !p.is_empty() => PathBuf::from(p),
        _ => hooks_dir().join("docsearch-config.json"),
    }
}

/// Session state directory: DOCSEARCH_STATE_DIR or ~/.claude/hooks/docsearch-state
pub fn state_dir() -> PathBuf {
    match std::env::var_os(STATE_DIR_ENV) {
        Some(p) if !p.is_empty() => PathBuf::from(p),
        _ => hooks_dir().join("docsearch-state"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_live_under_hooks_dir() {
        let hooks = hooks_dir();
        assert!(hooks.ends_with(".claude/hooks"));
        if std::env::var_os(CONFIG_PATH_ENV).is_none() {
            assert_eq!(config_path(), hooks.join("docsearch-config.json"));
        }
        if std::env::var_os(STATE_DIR_ENV).is_none() {
            assert_eq!(state_dir(), hooks.join("docsearch-state"));
        }
    }
}
