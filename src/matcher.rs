// DocSearch Gate - Keyword Matcher
// Copyright 2026 Joseph Stone - All Rights Reserved
//
// Lexical, case-insensitive, whole-word keyword matching.
// A keyword matches only when bounded by a non-word character or a string
// edge on both sides: "gitlab" never matches inside "ungitlabbed".
// Keyword text is escaped, so "c++", "c#" and ".net" are literal.

use crate::config::DatabaseEntry;
use regex::Regex;

/// A matched database plus the keyword that triggered it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordMatch<'a> {
    pub entry: &'a DatabaseEntry,
    pub keyword: &'a str,
}

/// Build the boundary test for one keyword.
/// The regex crate has no lookaround, so the boundaries are consumed as
/// `(^|\W)` / `(\W|$)`. Only `is_match` is ever asked of the pattern.
fn word_pattern(keyword_lower: &str) -> Option<Regex> {
    let pattern = format!(r"(?:^|\W){}(?:\W|$)", regex::escape(keyword_lower));
    match Regex::new(&pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            log::warn!("keyword {:?} could not be compiled: {}", keyword_lower, e);
            None
        }
    }
}

/// True when `keyword` occurs in the already lower-cased query as a whole word.
/// Blank keywords never match.
fn hits_word(query_lower: &str, keyword: &str) -> bool {
    let keyword_lower = keyword.to_lowercase();
    !keyword_lower.trim().is_empty()
        && word_pattern(&keyword_lower).is_some_and(|re| re.is_match(query_lower))
}

/// Every database whose keywords hit the query, in config order, each at most once.
/// Scanning an entry stops at its first matching keyword.
pub fn find_matches<'a>(query: &str, entries: &'a [DatabaseEntry]) -> Vec<KeywordMatch<'a>> {
    let query_lower = query.to_lowercase();
    let mut matches = Vec::new();

    for entry in entries {
        let hit = entry.keywords.iter().find(|keyword| hits_word(&query_lower, keyword));
        if let Some(keyword) = hit {
            log::debug!("query matched '{}' -> {}", keyword, entry.mcp_tool_name);
            matches.push(KeywordMatch { entry, keyword: keyword.as_str() });
        }
    }

    matches
}

/// Matched databases only, config order.
pub fn find_matching_databases<'a>(
    query: &str,
    entries: &'a [DatabaseEntry],
) -> Vec<&'a DatabaseEntry> {
    find_matches(query, entries).into_iter().map(|m| m.entry).collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(keywords: &[&str], tool: &str) -> DatabaseEntry {
        DatabaseEntry {
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            path: format!("/indexes/{}", tool),
            mcp_tool_name: tool.to_string(),
            description: format!("{} docs", tool),
        }
    }

    fn entries() -> Vec<DatabaseEntry> {
        vec![
            entry(&["gitlab"], "leann-gitlab"),
            entry(&["kubernetes", "k8s"], "leann-k8s"),
            entry(&["c++", "c#", ".net"], "leann-lang"),
        ]
    }

    fn tools(query: &str, entries: &[DatabaseEntry]) -> Vec<String> {
        find_matching_databases(query, entries)
            .iter()
            .map(|e| e.mcp_tool_name.clone())
            .collect()
    }

    #[test]
    fn single_keyword_matches() {
        let e = entries();
        assert_eq!(tools("how to configure gitlab ci runners", &e), vec!["leann-gitlab"]);
    }

    #[test]
    fn substring_inside_word_is_rejected() {
        let e = entries();
        assert!(tools("ungitlabbed workflow", &e).is_empty());
        assert!(tools("gitlabs", &e).is_empty());
        assert!(tools("mygitlab", &e).is_empty());
    }

    #[test]
    fn punctuation_and_edges_are_boundaries() {
        let e = entries();
        assert_eq!(tools("gitlab", &e), vec!["leann-gitlab"]);
        assert_eq!(tools("(gitlab)", &e), vec!["leann-gitlab"]);
        assert_eq!(tools("self-hosted gitlab.", &e), vec!["leann-gitlab"]);
        assert_eq!(tools("gitlab/runner setup", &e), vec!["leann-gitlab"]);
    }

    #[test]
    fn case_insensitive_both_ways() {
        let e = entries();
        for q in ["GITLAB ci", "GitLab CI", "gitlab ci"] {
            assert_eq!(tools(q, &e), vec!["leann-gitlab"], "query {:?}", q);
        }
        let upper = vec![entry(&["GitLab"], "leann-gitlab")];
        assert_eq!(tools("gitlab pipelines", &upper), vec!["leann-gitlab"]);
        assert_eq!(tools("Deploy K8S cluster", &e), tools("deploy k8s cluster", &e));
    }

    #[test]
    fn multiple_matches_keep_config_order() {
        let e = entries();
        assert_eq!(
            tools("how to deploy gitlab on kubernetes", &e),
            vec!["leann-gitlab", "leann-k8s"]
        );
        assert_eq!(
            tools("kubernetes before gitlab", &e),
            vec!["leann-gitlab", "leann-k8s"]
        );
    }

    #[test]
    fn entry_reported_once_with_first_hit() {
        let e = entries();
        let m = find_matches("k8s vs kubernetes naming", &e);
        assert_eq!(m.len(), 1);
        assert_eq!(m[0].keyword, "kubernetes");
    }

    #[test]
    fn special_characters_are_literal() {
        let e = entries();
        assert_eq!(tools("c++ template metaprogramming", &e), vec!["leann-lang"]);
        assert_eq!(tools("async in C#", &e), vec!["leann-lang"]);
        assert_eq!(tools(".NET core hosting", &e), vec!["leann-lang"]);
        // "+" must not act as a quantifier: "cc" is not "c++"
        assert!(tools("cc compiler flags", &e).is_empty());
        // "." must not act as a wildcard
        assert!(tools("xnet sockets", &e).is_empty());
    }

    #[test]
    fn word_test_on_lowered_query() {
        assert!(hits_word("using rust today", "Rust"));
        assert!(!hits_word("trusty", "rust"));
        assert!(!hits_word("anything goes", ""));
        assert!(!hits_word("anything goes", "  "));
        // A blank keyword never matches, the entry's other keywords still do
        let mixed = vec![entry(&[" ", "rust"], "leann-rust")];
        assert_eq!(tools("a b", &mixed), Vec::<String>::new());
        assert_eq!(tools("learn Rust", &mixed), vec!["leann-rust"]);
    }

    #[test]
    fn no_entries_no_matches() {
        assert!(find_matches("gitlab", &[]).is_empty());
    }
}
