//! Target URL resolution.
//!
//! # Responsibilities
//! - Derive the outbound destination URL from the inbound request URI
//! - Reject requests missing required inputs before any outbound call
//!
//! # Design Decisions
//! - Resolution is a pure function of the URI: same input, same output
//! - No scheme/host validation; a malformed target surfaces later as a
//!   relay failure
//! - The query-action concatenation is kept byte-for-byte compatible with
//!   the deployment it replaces; callers depend on the exact string shape

use axum::http::Uri;

use crate::config::schema::RelayMode;
use crate::error::RelayError;

const MISSING_QUERY_ACTION: &str = "Missing parameters: 'url', 'password', or 'action'";
const MISSING_QUERY_URL: &str = "Missing 'url' parameter";
const MISSING_PATH_TARGET: &str = "Missing target URL in request path";

/// Resolve the outbound target URL for `uri` under the given mode.
pub fn resolve_target(mode: RelayMode, uri: &Uri) -> Result<String, RelayError> {
    match mode {
        RelayMode::QueryAction => resolve_query_action(uri),
        RelayMode::QueryUrl => resolve_query_url(uri),
        RelayMode::PathTarget => resolve_path_target(uri),
    }
}

/// First decoded value of query parameter `name`; empty values count as
/// missing.
fn query_param(uri: &Uri, name: &str) -> Option<String> {
    let query = uri.query()?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

fn resolve_query_action(uri: &Uri) -> Result<String, RelayError> {
    let url = query_param(uri, "url");
    let password = query_param(uri, "password");
    let action = query_param(uri, "action");

    match (url, password, action) {
        // Literal concatenation: `url` is expected to already carry a
        // querystring, so the separator stays '&' and nothing is
        // re-encoded.
        (Some(url), Some(password), Some(action)) => {
            Ok(format!("{url}&password={password}&action={action}"))
        }
        _ => Err(RelayError::MissingParameter(MISSING_QUERY_ACTION)),
    }
}

fn resolve_query_url(uri: &Uri) -> Result<String, RelayError> {
    query_param(uri, "url").ok_or(RelayError::MissingParameter(MISSING_QUERY_URL))
}

fn resolve_path_target(uri: &Uri) -> Result<String, RelayError> {
    let raw = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("");
    let target = raw.strip_prefix('/').unwrap_or(raw);
    if target.is_empty() {
        return Err(RelayError::MissingParameter(MISSING_PATH_TARGET));
    }
    Ok(target.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uri(s: &str) -> Uri {
        s.parse().unwrap()
    }

    #[test]
    fn query_action_concatenates_verbatim() {
        let uri = uri("/proxy?url=http://x.test/a&password=p1&action=list");
        let target = resolve_target(RelayMode::QueryAction, &uri).unwrap();
        assert_eq!(target, "http://x.test/a&password=p1&action=list");
    }

    #[test]
    fn query_action_decodes_url_parameter_before_concatenation() {
        let uri = uri("/proxy?url=http%3A%2F%2Fx.test%2Fa%3Fq%3D1&password=p1&action=list");
        let target = resolve_target(RelayMode::QueryAction, &uri).unwrap();
        assert_eq!(target, "http://x.test/a?q=1&password=p1&action=list");
    }

    #[test]
    fn query_action_rejects_any_missing_parameter() {
        for q in [
            "/proxy",
            "/proxy?url=http://x.test/a",
            "/proxy?url=http://x.test/a&password=p1",
            "/proxy?password=p1&action=list",
            "/proxy?url=&password=p1&action=list",
        ] {
            let err = resolve_target(RelayMode::QueryAction, &uri(q)).unwrap_err();
            assert!(matches!(err, RelayError::MissingParameter(_)), "{q}");
        }
    }

    #[test]
    fn query_url_requires_url() {
        let target =
            resolve_target(RelayMode::QueryUrl, &uri("/proxy?url=http://x.test/data")).unwrap();
        assert_eq!(target, "http://x.test/data");

        let err = resolve_target(RelayMode::QueryUrl, &uri("/proxy")).unwrap_err();
        assert_eq!(err.to_string(), "Missing 'url' parameter");
    }

    #[test]
    fn path_target_strips_leading_separator_only() {
        let target =
            resolve_target(RelayMode::PathTarget, &uri("/http://x.test/data?page=2")).unwrap();
        assert_eq!(target, "http://x.test/data?page=2");
    }

    #[test]
    fn path_target_rejects_empty_path() {
        let err = resolve_target(RelayMode::PathTarget, &uri("/")).unwrap_err();
        assert!(matches!(err, RelayError::MissingParameter(_)));
    }

    #[test]
    fn resolution_is_idempotent() {
        let uri = uri("/proxy?url=http://x.test/a&password=p1&action=list");
        let first = resolve_target(RelayMode::QueryAction, &uri).unwrap();
        let second = resolve_target(RelayMode::QueryAction, &uri).unwrap();
        assert_eq!(first, second);
    }
}
