// DocSearch Gate - Configuration
// Copyright 2026 Joseph Stone - All Rights Reserved
//
// Loads the keyword -> RAG database mapping from JSON. Re-read on every
// invocation, never cached, never written back. Validation is per entry:
// a bad entry is dropped with a diagnostic, the rest of the file survives.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// One configured local index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseEntry {
    /// Non-empty, order preserved. First keyword is used in deny messages.
    pub keywords: Vec<String>,
    pub path: String,
    /// MCP tool the caller should invoke instead of web search
    pub mcp_tool_name: String,
    #[serde(default)]
    pub description: String,
}

/// Validated configuration. Entry order is significant: it drives the order
/// of guidance lines when several databases match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocsearchConfig {
    pub databases: Vec<DatabaseEntry>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("config has no \"databases\" array")]
    MissingDatabases,
}

impl ConfigError {
    /// Missing file is the normal "not configured" case, not worth a warning.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ConfigError::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }
}

/// Result of validating a config document
#[derive(Debug, Clone, Default)]
pub struct Validated {
    pub config: DocsearchConfig,
    pub diagnostics: Vec<String>,
}

impl DocsearchConfig {
    /// Read and validate the config file at `path`.
    pub fn load(path: &Path) -> Result<Validated, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Parse and validate a config document.
    /// Only an unparsable document (or one without a databases array) fails.
    pub fn parse(content: &str) -> Result<Validated, ConfigError> {
        let doc: Value = serde_json::from_str(content)?;
        let databases = doc
            .get("databases")
            .and_then(Value::as_array)
            .ok_or(ConfigError::MissingDatabases)?;

        let mut validated = Validated::default();
        for (index, raw) in databases.iter().enumerate() {
            if let Some(entry) = validate_entry(index, raw, &mut validated.diagnostics) {
                validated.config.databases.push(entry);
            }
        }
        Ok(validated)
    }

    /// Hook-side loader: any failure means "no configuration" (fail open).
    /// Diagnostics go to the log (stderr), never to the decision channel.
    pub fn load_or_none(path: &Path) -> Option<Self> {
        match Self::load(path) {
            Ok(validated) => {
                for diag in &validated.diagnostics {
                    log::warn!("docsearch config {:?}: {}", path, diag);
                }
                Some(validated.config)
            }
            Err(e) if e.is_not_found() => {
                log::debug!("docsearch config not found at {:?}", path);
                None
            }
            Err(e) => {
                log::warn!("docsearch config unusable, allowing search: {}", e);
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.databases.is_empty()
    }
}

fn non_empty_str<'a>(raw: &'a Value, field: &str) -> Option<&'a str> {
    raw.get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Validate one raw entry. Returns None (and records why) when it must be dropped.
fn validate_entry(
    index: usize,
    raw: &Value,
    diagnostics: &mut Vec<String>,
) -> Option<DatabaseEntry> {
    let mut drop_entry = |reason: &str| {
        diagnostics.push(format!("databases[{}]: {} - entry skipped", index, reason));
    };

    if !raw.is_object() {
        drop_entry("entry is not an object");
        return None;
    }

    let keywords = match raw.get("keywords").map(Value::as_array) {
        Some(Some(list)) if list.is_empty() => {
            drop_entry("empty keywords");
            return None;
        }
        Some(Some(list)) if list.iter().all(Value::is_string) => list,
        Some(_) => {
            drop_entry("invalid keywords (expected a list of strings)");
            return None;
        }
        None => {
            drop_entry("missing keywords");
            return None;
        }
    };
    let keywords: Vec<String> = keywords
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect();
    if keywords.is_empty() {
        drop_entry("empty keywords (all blank)");
        return None;
    }

    let path = match non_empty_str(raw, "path") {
        Some(p) => p.to_string(),
        None => {
            drop_entry("missing path");
            return None;
        }
    };

    let mcp_tool_name = match non_empty_str(raw, "mcp_tool_name") {
        Some(t) => t.to_string(),
        None => {
            drop_entry("missing mcp_tool_name");
            return None;
        }
    };

    if !Path::new(&path).is_absolute() {
        diagnostics.push(format!(
            "databases[{}]: relative path {:?} (absolute expected)",
            index, path
        ));
    }

    let description = match non_empty_str(raw, "description") {
        Some(d) => d.to_string(),
        None => {
            diagnostics.push(format!("databases[{}]: missing description", index));
            String::new()
        }
    };

    Some(DatabaseEntry { keywords, path, mcp_tool_name, description })
}

// ============================================================================
// TESTS
// ============================================================================
