// DocSearch Gate - Session State Storage
// Copyright 2026 Joseph Stone - All Rights Reserved
//
// One JSON file per sanitized session id: <dir>/docsearch-<id>.json
// Persistence is best-effort. Read failures mean "no state", write failures
// are swallowed. A denial never depends on the write succeeding.
// Writes go through a temp file + rename so a killed process cannot leave
// a truncated record behind.

use crate::session::{sanitize_session_id, SessionState, DENIAL_TTL_SECS};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use thiserror::Error;

/// File name prefix for session state files
pub const STATE_FILE_PREFIX: &str = "docsearch";
const STATE_FILE_EXT: &str = ".json";
/// In-flight writes: .docsearch-<random>.tmp, hidden from the state file pattern
const TEMP_FILE_PREFIX: &str = ".docsearch-";
const TEMP_FILE_SUFFIX: &str = ".tmp";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("state I/O on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("state JSON: {0}")]
    Json(#[from] serde_json::Error),
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError + '_ {
    move |source| StoreError::Io { path: path.to_path_buf(), source }
}

/// File-per-session state store
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// State file for a session. The id is sanitized here, before any path is built.
    pub fn state_path(&self, session_id: &str) -> PathBuf {
        self.dir.join(format!(
            "{}-{}{}",
            STATE_FILE_PREFIX,
            sanitize_session_id(session_id),
            STATE_FILE_EXT
        ))
    }

    /// Session id encoded in a state file name, if the name is one of ours.
    fn session_from_file_name(name: &str) -> Option<&str> {
        let id = name
            .strip_prefix(STATE_FILE_PREFIX)?
            .strip_prefix('-')?
            .strip_suffix(STATE_FILE_EXT)?;
        (sanitize_session_id(id) == id).then_some(id)
    }

    fn read_state(path: &Path) -> Result<SessionState, StoreError> {
        let content = std::fs::read_to_string(path).map_err(io_err(path))?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Load a session's state. Missing, unreadable or malformed -> empty state.
    pub fn load(&self, session_id: &str) -> SessionState {
        let path = self.state_path(session_id);
        match Self::read_state(&path) {
            Ok(state) => state,
            Err(e) => {
                log::debug!("no usable session state: {}", e);
                SessionState::default()
            }
        }
    }

    fn try_save(&self, session_id: &str, state: &SessionState) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir).map_err(io_err(&self.dir))?;

        let path = self.state_path(session_id);
        let json = serde_json::to_string(state)?;

        let mut temp_file = tempfile::Builder::new()
            .prefix(TEMP_FILE_PREFIX)
            .suffix(TEMP_FILE_SUFFIX)
            .tempfile_in(&self.dir)
            .map_err(io_err(&self.dir))?;
        temp_file.write_all(json.as_bytes()).map_err(io_err(temp_file.path()))?;
        temp_file
            .persist(&path)
            .map_err(|e| StoreError::Io { path, source: e.error })?;
        Ok(())
    }

    /// Persist a session's state, best-effort.
    pub fn save(&self, session_id: &str, state: &SessionState) {
        if let Err(e) = self.try_save(session_id, state) {
            log::debug!("session state not saved: {}", e);
        }
    }

    /// Temp file left behind by an interrupted write
    fn is_orphan_temp(name: &str) -> bool {
        name.starts_with(TEMP_FILE_PREFIX) && name.ends_with(TEMP_FILE_SUFFIX)
    }

    /// Remove stale state files of other sessions. Returns how many were removed.
    ///
    /// A file is stale when its denial is older than the TTL. Files with no
    /// denial on record, or that do not parse, are judged by modification
    /// time instead, so a corrupt-but-fresh file (possibly mid-write by a
    /// concurrent invocation) is left alone. `current_session` is skipped:
    /// its own record is handled by the escape-hatch check. Temp files from
    /// interrupted writes are reaped once their mtime is past the TTL.
    pub fn clean_stale(&self, now: f64, current_session: Option<&str>) -> usize {
        let current = current_session.map(sanitize_session_id);
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(_) => return 0,
        };

        let mut removed = 0;
        for entry in entries.flatten() {
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else { continue };
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let stale = if Self::is_orphan_temp(name) {
                is_old(&path, now)
            } else {
                let Some(id) = Self::session_from_file_name(name) else { continue };
                if current.as_deref() == Some(id) {
                    continue;
                }
                match Self::read_state(&path) {
                    Ok(SessionState { last_denied: Some(record) }) => !record.is_fresh(now),
                    Ok(SessionState { last_denied: None }) | Err(_) => is_old(&path, now),
                }
            };

            if stale {
                match std::fs::remove_file(&path) {
                    Ok(()) => {
                        log::debug!("removed stale session state {:?}", path);
                        removed += 1;
                    }
                    Err(e) => log::debug!("could not remove {:?}: {}", path, e),
                }
            }
        }
        removed
    }
}

fn modified_secs(path: &Path) -> Option<f64> {
    let modified = std::fs::metadata(path).ok()?.modified().ok()?;
    Some(modified.duration_since(UNIX_EPOCH).ok()?.as_secs_f64())
}

/// Modified at least a TTL ago. Unknown mtime counts as fresh.
fn is_old(path: &Path, now: f64) -> bool {
    modified_secs(path).is_some_and(|m| now - m >= DENIAL_TTL_SECS)
}

// ============================================================================
// TESTS
// ============================================================================
