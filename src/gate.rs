// DocSearch Gate - Gate (Decision Pipeline)
// Copyright 2026 Joseph Stone - All Rights Reserved
//
// Every hook invocation passes through here exactly once.
// Target check -> Config -> Query -> Cleanup + Escape hatch -> Match -> Deny.
// Fails open: any missing or broken input ends in ALLOW, never in an error.

use crate::config::DocsearchConfig;
use crate::escape;
use crate::input::HookInput;
use crate::matcher;
use crate::response::{self, HookResponse};
use crate::session::{DenialRecord, SessionState};
use crate::storage::SessionStore;
use chrono::Utc;
use std::borrow::Borrow;
use std::path::Path;

/// Exit status for an allowed tool call
pub const EXIT_ALLOW: i32 = 0;
/// Exit status for a blocked tool call (payload on stdout)
pub const EXIT_DENY: i32 = 2;

/// Why a call was let through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowReason {
    NotTargetTool,
    NoConfig,
    EmptyQuery,
    EscapeHatch,
    NoMatch,
}

/// Gate decision: the final word on whether the search proceeds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Allow(AllowReason),
    Deny(HookResponse),
}

impl GateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GateDecision::Allow(_))
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            GateDecision::Allow(_) => EXIT_ALLOW,
            GateDecision::Deny(_) => EXIT_DENY,
        }
    }
}

/// Current time as fractional seconds since epoch
pub fn now_secs() -> f64 {
    Utc::now().timestamp_millis() as f64 / 1000.0
}

// ========================================================================
// GATE PROCESS
// ========================================================================

/// Process one hook request, loading the config from `config_path`.
/// The config is only read for target-tool calls.
pub fn process(
    input: &HookInput,
    config_path: &Path,
    store: &SessionStore,
    now: f64,
) -> GateDecision {
    run_pipeline(input, || DocsearchConfig::load_or_none(config_path), store, now)
}

/// Decision pipeline with an already-loaded config.
pub fn evaluate(
    input: &HookInput,
    config: Option<&DocsearchConfig>,
    store: &SessionStore,
    now: f64,
) -> GateDecision {
    run_pipeline(input, || config, store, now)
}

/// Pipeline:
/// 1. Non-target tool -> allow
/// 2. No usable config -> allow
/// 3. Empty query -> allow
/// 4. Clean other sessions' stale state, load this session's state
/// 5. Fresh identical retry of the last denial -> clear it, allow
/// 6. No keyword match -> allow
/// 7. Record the denial, deny with guidance
fn run_pipeline<C: Borrow<DocsearchConfig>>(
    input: &HookInput,
    load_config: impl FnOnce() -> Option<C>,
    store: &SessionStore,
    now: f64,
) -> GateDecision {
    if !input.is_target() {
        return GateDecision::Allow(AllowReason::NotTargetTool);
    }
    let Some(config) = load_config() else {
        return GateDecision::Allow(AllowReason::NoConfig);
    };
    let config: &DocsearchConfig = config.borrow();
    let request = &input.tool_input;
    if request.query.is_empty() {
        return GateDecision::Allow(AllowReason::EmptyQuery);
    }

    let session_id = input.session_id.as_str();
    let removed = store.clean_stale(now, Some(session_id));
    if removed > 0 {
        log::debug!("cleaned {} stale session file(s)", removed);
    }

    let mut state = store.load(session_id);
    if escape::should_escape(request, &state, now) {
        log::info!("escape hatch: retry of denied query allowed");
        state.clear();
        store.save(session_id, &state);
        return GateDecision::Allow(AllowReason::EscapeHatch);
    }

    let matches = matcher::find_matching_databases(&request.query, &config.databases);
    if matches.is_empty() {
        return GateDecision::Allow(AllowReason::NoMatch);
    }

    // Supersedes any earlier denial, expired or not
    store.save(session_id, &SessionState::denied(DenialRecord::from_request(request, now)));

    GateDecision::Deny(response::build_deny_response(&matches))
}

// ============================================================================
// TESTS
// ============================================================================
