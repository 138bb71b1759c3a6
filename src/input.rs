// DocSearch Gate - Hook Input
// Copyright 2026 Joseph Stone - All Rights Reserved
//
// PreToolUse payload delivered on stdin by the agent runtime.
// Unknown fields are ignored; missing fields take empty defaults.

use serde::{Deserialize, Deserializer, Serialize};

/// The only tool this gate intercepts
pub const TARGET_TOOL: &str = "WebSearch";

/// Top-level hook request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HookInput {
    #[serde(default, deserialize_with = "null_as_default")]
    pub tool_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tool_input: SearchParams,
    #[serde(default, deserialize_with = "null_as_default")]
    pub session_id: String,
}

/// WebSearch arguments. Domain lists may be absent or null: both mean empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParams {
    #[serde(default, deserialize_with = "null_as_default")]
    pub query: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub allowed_domains: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub blocked_domains: Vec<String>,
}

/// Treat an explicit JSON null like a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl HookInput {
    /// Parse the raw stdin payload. None on anything malformed (fail open).
    pub fn parse(raw: &str) -> Option<Self> {
        match serde_json::from_str(raw) {
            Ok(input) => Some(input),
            Err(e) => {
                log::debug!("hook input not parseable, allowing: {}", e);
                None
            }
        }
    }

    pub fn is_target(&self) -> bool {
        self.tool_name == TARGET_TOOL
    }
}
