use url::Url;

/// Normalize an article URL so syndicated copies of one story compare equal:
/// - lowercase scheme and host, strip a leading `www.`
/// - drop default ports, fragments and tracking parameters
/// - sort the remaining query parameters
/// - drop trailing slashes from the path
///
/// Returns `None` for empty or unparseable input, or a host of bare `www.`.
pub fn normalize(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    let mut parsed = Url::parse(&with_scheme).ok()?;
    parsed.host_str()?;

    parsed.set_fragment(None);
    if matches!(parsed.port(), Some(80) | Some(443)) {
        let _ = parsed.set_port(None);
    }

    if let Some(host) = parsed.host_str().map(str::to_string) {
        if let Some(bare) = host.strip_prefix("www.") {
            if parsed.set_host(Some(bare)).is_err() {
                return None;
            }
        }
    }

    let mut params: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(k, _)| !is_tracking_param(k))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    params.sort();

    if params.is_empty() {
        parsed.set_query(None);
    } else {
        let query = params
            .iter()
            .map(|(k, v)| if v.is_empty() { k.clone() } else { format!("{k}={v}") })
            .collect::<Vec<_>>()
            .join("&");
        parsed.set_query(Some(&query));
    }

    // http(s) paths never serialize empty, so "" comes back as "/"
    let path = parsed.path().trim_end_matches('/').to_string();
    parsed.set_path(&path);

    let mut text = parsed.to_string();
    if parsed.path() == "/" && parsed.query().is_none() {
        text.pop();
    }
    Some(text)
}

/// Scheme-less key for grouping URLs: `http://` and `https://` variants collide.
pub fn canonical_key(raw: &str) -> Option<String> {
    let normalized = normalize(raw)?;
    let key = normalized
        .trim_start_matches("https://")
        .trim_start_matches("http://");
    Some(key.to_string())
}

/// The form a URL is stored in on a trend: normalized when requested and
/// parseable, otherwise the input unchanged.
pub fn stored_form(raw: &str, canonicalize: bool) -> String {
    if canonicalize {
        normalize(raw).unwrap_or_else(|| raw.to_string())
    } else {
        raw.to_string()
    }
}

fn is_tracking_param(key: &str) -> bool {
    let lower = key.to_lowercase();
    lower.starts_with("utm_")
        || matches!(
            lower.as_str(),
            "fbclid" | "gclid" | "dclid" | "msclkid" | "yclid" | "twclid" | "igshid"
            | "mc_cid" | "mc_eid" | "_ga" | "_gl" | "ref" | "ref_src" | "cmpid"
            | "ocid" | "smid" | "guccounter" | "si"
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_host_and_trims_slash() {
        let n = normalize("https://News.Example.COM/story/").unwrap();
        assert_eq!(n, "https://news.example.com/story");
    }

    #[test]
    fn strips_tracking_keeps_article_id() {
        let n = normalize("https://example.com/a?utm_source=hn&utm_medium=social&id=77").unwrap();
        assert_eq!(n, "https://example.com/a?id=77");
    }

    #[test]
    fn sorts_query_params() {
        let n = normalize("https://example.com/search?q=ai&page=2").unwrap();
        assert_eq!(n, "https://example.com/search?page=2&q=ai");
    }

    #[test]
    fn strips_www_fragment_and_default_port() {
        let n = normalize("https://www.example.com:443/post#comments").unwrap();
        assert_eq!(n, "https://example.com/post");
    }

    #[test]
    fn keeps_non_default_port() {
        let n = normalize("http://example.com:8080/feed").unwrap();
        assert_eq!(n, "http://example.com:8080/feed");
    }

    #[test]
    fn adds_missing_scheme() {
        let n = normalize("example.com/story").unwrap();
        assert_eq!(n, "https://example.com/story");
    }

    #[test]
    fn bare_domain() {
        let n = normalize("https://example.com/").unwrap();
        assert_eq!(n, "https://example.com");
    }

    #[test]
    fn rejects_empty_and_garbage() {
        assert!(normalize("").is_none());
        assert!(normalize("   ").is_none());
        assert!(normalize("not a url at all").is_none());
    }

    #[test]
    fn keeps_slashes_inside_query_values() {
        let n = normalize("https://example.com/a/?next=/").unwrap();
        assert_eq!(n, "https://example.com/a?next=/");
        assert_ne!(n, normalize("https://example.com/a?next=").unwrap());
    }

    #[test]
    fn bare_domain_with_query_keeps_root_path() {
        let n = normalize("https://example.com/?id=3").unwrap();
        assert_eq!(n, "https://example.com/?id=3");
    }

    #[test]
    fn rejects_host_that_is_only_www() {
        assert!(normalize("https://www./story").is_none());
    }

    #[test]
    fn canonical_key_ignores_scheme() {
        let a = canonical_key("http://example.com/story").unwrap();
        let b = canonical_key("https://www.example.com/story/?fbclid=xyz").unwrap();
        assert_eq!(a, b);
        assert_eq!(a, "example.com/story");
    }

    #[test]
    fn normalize_idempotent() {
        let once = normalize("https://www.Example.com/a/?b=2&a=1&utm_campaign=x").unwrap();
        assert_eq!(normalize(&once).unwrap(), once);
    }

    #[test]
    fn stored_form_falls_back_to_raw() {
        assert_eq!(stored_form("not a url at all", true), "not a url at all");
        assert_eq!(
            stored_form("https://example.com/x?utm_source=a", true),
            "https://example.com/x"
        );
        assert_eq!(
            stored_form("https://example.com/x?utm_source=a", false),
            "https://example.com/x?utm_source=a"
        );
    }
}
