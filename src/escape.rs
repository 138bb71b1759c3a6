// DocSearch Gate - Escape Hatch
// Copyright 2026 Joseph Stone - All Rights Reserved
//
// One-shot retry allowance. A session denied for a request may repeat the
// identical request once within the TTL and have it pass through.
// Identical = same query (exact, case-sensitive) and the same allowed and
// blocked domain sets (order-insensitive, null == empty).

use crate::input::SearchParams;
use crate::session::SessionState;
use std::collections::BTreeSet;

fn as_set(domains: &[String]) -> BTreeSet<&str> {
    domains.iter().map(String::as_str).collect()
}

/// True when the stored denial is fresh and matches `request` exactly.
/// The caller clears the stored record and allows when this fires.
pub fn should_escape(request: &SearchParams, state: &SessionState, now: f64) -> bool {
    let Some(record) = state.last_denied.as_ref() else {
        return false;
    };
    if !record.is_fresh(now) {
        log::debug!("stored denial expired ({:.0}s old)", now - record.timestamp);
        return false;
    }

    record.query == request.query
        && as_set(&record.allowed_domains) == as_set(&request.allowed_domains)
        && as_set(&record.blocked_domains) == as_set(&request.blocked_domains)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::DenialRecord;

    fn params(query: &str, allowed: &[&str], blocked: &[&str]) -> SearchParams {
        SearchParams {
            query: query.to_string(),
            allowed_domains: allowed.iter().map(|s| s.to_string()).collect(),
            blocked_domains: blocked.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn denied(p: &SearchParams, at: f64) -> SessionState {
        SessionState::denied(DenialRecord::from_request(p, at))
    }

    #[test]
    fn identical_retry_within_ttl_escapes() {
        let q = params("how to configure gitlab ci runners", &[], &[]);
        let state = denied(&q, 0.0);
        assert!(should_escape(&q, &state, 120.0));
        assert!(should_escape(&q, &state, 299.0));
    }

    #[test]
    fn expired_record_does_not_escape() {
        let q = params("gitlab ci", &[], &[]);
        let state = denied(&q, 0.0);
        assert!(!should_escape(&q, &state, 300.0));
        assert!(!should_escape(&q, &state, 400.0));
    }

    #[test]
    fn no_record_no_escape() {
        let q = params("gitlab ci", &[], &[]);
        assert!(!should_escape(&q, &SessionState::default(), 0.0));
    }

    #[test]
    fn query_compared_exactly() {
        let state = denied(&params("GitLab CI", &[], &[]), 0.0);
        assert!(!should_escape(&params("gitlab ci", &[], &[]), &state, 10.0));
        assert!(!should_escape(&params("GitLab CI ", &[], &[]), &state, 10.0));
    }

    #[test]
    fn domains_compared_as_sets() {
        let state = denied(&params("q", &["a.com", "b.com"], &["x.com"]), 0.0);
        assert!(should_escape(&params("q", &["b.com", "a.com"], &["x.com"]), &state, 5.0));
        assert!(should_escape(&params("q", &["a.com", "b.com", "a.com"], &["x.com"]), &state, 5.0));
        assert!(!should_escape(&params("q", &["a.com"], &["x.com"]), &state, 5.0));
        assert!(!should_escape(&params("q", &["a.com", "b.com"], &[]), &state, 5.0));
        // allowed and blocked are not interchangeable
        assert!(!should_escape(&params("q", &["x.com"], &["a.com", "b.com"]), &state, 5.0));
    }
}
