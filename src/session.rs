// DocSearch Gate - Session State
// Copyright 2026 Joseph Stone - All Rights Reserved
//
// Per-session escape-hatch state. One record per sanitized session id,
// persisted as one JSON file by storage.rs. Holds at most one denial.

use crate::input::{null_as_default, SearchParams};
use serde::{Deserialize, Serialize};

/// Fallback id when sanitizing leaves nothing
pub const DEFAULT_SESSION_ID: &str = "default";

/// Freshness window for a stored denial, in seconds
pub const DENIAL_TTL_SECS: f64 = 300.0;

/// The last request this session was denied for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenialRecord {
    pub query: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub allowed_domains: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub blocked_domains: Vec<String>,
    /// Seconds since epoch (fractional)
    pub timestamp: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(default)]
    pub last_denied: Option<DenialRecord>,
}

impl DenialRecord {
    pub fn from_request(params: &SearchParams, now: f64) -> Self {
        Self {
            query: params.query.clone(),
            allowed_domains: params.allowed_domains.clone(),
            blocked_domains: params.blocked_domains.clone(),
            timestamp: now,
        }
    }

    /// Still inside the TTL window at `now`.
    /// A timestamp in the future (clock skew) still counts as fresh.
    pub fn is_fresh(&self, now: f64) -> bool {
        now - self.timestamp < DENIAL_TTL_SECS
    }
}

impl SessionState {
    pub fn denied(record: DenialRecord) -> Self {
        Self { last_denied: Some(record) }
    }

    /// Drop the stored denial (escape hatch consumed)
    pub fn clear(&mut self) {
        self.last_denied = None;
    }
}

/// Strip everything but ASCII alphanumerics, '-' and '_'.
/// Must run before the id touches any filesystem path.
pub fn sanitize_session_id(session_id: &str) -> String {
    let safe: String = session_id
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    if safe.is_empty() {
        DEFAULT_SESSION_ID.to_string()
    } else {
        safe
    }
}
