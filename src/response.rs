// DocSearch Gate - Deny Response
// Copyright 2026 Joseph Stone - All Rights Reserved
//
// PreToolUse hook output. The only thing ever written to stdout, and only
// on a deny.

use crate::config::DatabaseEntry;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookResponse {
    pub hook_specific_output: HookSpecificOutput,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookSpecificOutput {
    pub hook_event_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permission_decision: Option<String>,
    pub permission_decision_reason: String,
    pub additional_context: String,
}

fn first_keyword(entry: &DatabaseEntry) -> &str {
    entry.keywords.first().map(String::as_str).unwrap_or("")
}

/// Build the deny payload for matched databases (config order, non-empty).
pub fn build_deny_response(matches: &[&DatabaseEntry]) -> HookResponse {
    let (reason, context) = match matches {
        [db] => (
            format!("Query matches '{}' - using RAG database instead", first_keyword(db)),
            format!(
                "This query should use the LEANN MCP tool '{}' to search the {} RAG database at {} instead of web search.",
                db.mcp_tool_name, db.description, db.path
            ),
        ),
        _ => {
            let keyword_list = matches
                .iter()
                .map(|db| format!("'{}'", first_keyword(db)))
                .collect::<Vec<_>>()
                .join(" and ");
            let mut lines = vec![
                "This query matches multiple documentation databases. Please use these LEANN MCP tools IN PARALLEL (call them all at once, not one after another):".to_string(),
            ];
            for (i, db) in matches.iter().enumerate() {
                lines.push(format!(
                    "{}. '{}' for {} at {}",
                    i + 1,
                    db.mcp_tool_name,
                    db.description,
                    db.path
                ));
            }
            (
                format!("Query matches {} - using RAG databases instead", keyword_list),
                lines.join("\n"),
            )
        }
    };

    HookResponse {
        hook_specific_output: HookSpecificOutput {
            hook_event_name: "PreToolUse".to_string(),
            permission_decision: Some("deny".to_string()),
            permission_decision_reason: reason,
            additional_context: context,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db(keywords: &[&str], tool: &str, description: &str) -> DatabaseEntry {
        DatabaseEntry {
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            path: format!("/indexes/{}", tool),
            mcp_tool_name: tool.to_string(),
            description: description.to_string(),
        }
    }

    #[test]
    fn single_match_names_one_tool() {
        let gitlab = db(&["gitlab", "gitlab-ci"], "leann-gitlab", "GitLab");
        let resp = build_deny_response(&[&gitlab]);
        let out = &resp.hook_specific_output;
        assert_eq!(out.permission_decision.as_deref(), Some("deny"));
        assert_eq!(
            out.permission_decision_reason,
            "Query matches 'gitlab' - using RAG database instead"
        );
        assert!(out.additional_context.contains("'leann-gitlab'"));
        assert!(out.additional_context.contains("GitLab RAG database at /indexes/leann-gitlab"));
        assert!(!out.additional_context.contains("PARALLEL"));
    }

    #[test]
    fn multiple_matches_numbered_in_order_with_parallel_instruction() {
        let gitlab = db(&["gitlab"], "leann-gitlab", "GitLab");
        let k8s = db(&["kubernetes", "k8s"], "leann-k8s", "Kubernetes");
        let resp = build_deny_response(&[&gitlab, &k8s]);
        let out = &resp.hook_specific_output;
        assert_eq!(
            out.permission_decision_reason,
            "Query matches 'gitlab' and 'kubernetes' - using RAG databases instead"
        );
        let lines: Vec<&str> = out.additional_context.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("IN PARALLEL"));
        assert_eq!(lines[1], "1. 'leann-gitlab' for GitLab at /indexes/leann-gitlab");
        assert_eq!(lines[2], "2. 'leann-k8s' for Kubernetes at /indexes/leann-k8s");
    }

    #[test]
    fn wire_shape() {
        let gitlab = db(&["gitlab"], "leann-gitlab", "GitLab");
        let value = serde_json::to_value(build_deny_response(&[&gitlab])).unwrap();
        let out = &value["hookSpecificOutput"];
        assert_eq!(out["hookEventName"], "PreToolUse");
        assert_eq!(out["permissionDecision"], "deny");
        assert!(out["permissionDecisionReason"].is_string());
        assert!(out["additionalContext"].is_string());
    }
}
