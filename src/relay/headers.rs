//! Hop-by-hop header removal.

use axum::http::HeaderMap;

/// Headers stripped from both relay directions.
///
/// These fields are meaningful only for a single transport leg; forwarding
/// them corrupts connection handling on the next hop.
pub const HOP_BY_HOP: [&str; 6] = [
    "host",
    "connection",
    "proxy-connection",
    "keep-alive",
    "transfer-encoding",
    "upgrade",
];

/// Copy of `headers` with the hop-by-hop set removed.
///
/// Applied to outbound request headers before the relay and to upstream
/// response headers before they are written back. `HeaderMap` keys are
/// case-insensitive, so the inbound casing does not matter.
pub fn sanitize(headers: &HeaderMap) -> HeaderMap {
    let mut sanitized = headers.clone();
    for name in HOP_BY_HOP {
        sanitized.remove(name);
    }
    sanitized
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::{HeaderName, HeaderValue};

    fn header_map(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(
                name.parse::<HeaderName>().unwrap(),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        map
    }

    #[test]
    fn strips_all_hop_by_hop_fields() {
        let headers = header_map(&[
            ("Host", "example.com"),
            ("Connection", "keep-alive"),
            ("Proxy-Connection", "keep-alive"),
            ("Keep-Alive", "timeout=5"),
            ("Transfer-Encoding", "chunked"),
            ("Upgrade", "websocket"),
            ("Accept", "application/json"),
        ]);

        let sanitized = sanitize(&headers);
        for name in HOP_BY_HOP {
            assert!(!sanitized.contains_key(name), "{name} should be removed");
        }
        assert_eq!(sanitized.len(), 1);
        assert_eq!(sanitized["accept"], "application/json");
    }

    #[test]
    fn removal_ignores_casing_and_duplicates() {
        let headers = header_map(&[
            ("CONNECTION", "close"),
            ("connection", "keep-alive"),
            ("X-Custom", "1"),
        ]);

        let sanitized = sanitize(&headers);
        assert!(!sanitized.contains_key("connection"));
        assert_eq!(sanitized["x-custom"], "1");
    }

    #[test]
    fn original_map_is_untouched() {
        let headers = header_map(&[("Host", "example.com")]);
        let _ = sanitize(&headers);
        assert!(headers.contains_key("host"));
    }
}
