//! URL scope policy
//!
//! Decides whether a candidate URL discovered in a document is loadable
//! within the crawl's origin boundary, and canonicalizes it. The scope is
//! single-origin-equivalent: same scheme, user info, port, and host, with
//! only a `www.` host variance tolerated (and rewritten away).

use url::Url;

/// Resolves a candidate URL against a base and checks it against the
/// reference document's origin.
///
/// # Policy
///
/// 1. Relative candidates are resolved against `base_url`
/// 2. Reject if the scheme, user info, or port differ from `reference_url`
/// 3. The fragment is stripped unconditionally
/// 4. Same host as the reference: accept as-is
/// 5. Host differing from the reference's only by a `www.` prefix:
///    accept after rewriting the host to the reference's exact host
/// 6. Anything else: reject
///
/// Returns `None` for any candidate that is out of scope or fails to
/// parse. Content is untrusted, so a malformed candidate is routine input
/// rather than an error.
pub fn resolve_loadable(candidate: &str, base_url: &Url, reference_url: &Url) -> Option<Url> {
    let mut resolved = Url::options()
        .base_url(Some(base_url))
        .parse(candidate.trim())
        .ok()?;

    if resolved.scheme() != reference_url.scheme() {
        return None;
    }

    if resolved.username() != reference_url.username()
        || resolved.password() != reference_url.password()
    {
        return None;
    }

    // Schemes already match, so known defaults line up.
    if resolved.port_or_known_default() != reference_url.port_or_known_default() {
        return None;
    }

    resolved.set_fragment(None);

    let host = resolved.host_str()?.to_string();
    let reference_host = reference_url.host_str()?;

    if host == reference_host {
        return Some(resolved);
    }

    if is_www_variant(&host, reference_host) {
        resolved.set_host(Some(reference_host)).ok()?;
        return Some(resolved);
    }

    None
}

/// Checks whether exactly one of the two hosts carries a `www.` prefix
/// and they are otherwise identical.
fn is_www_variant(host: &str, reference_host: &str) -> bool {
    host.strip_prefix("www.").is_some_and(|h| h == reference_host)
        || reference_host.strip_prefix("www.").is_some_and(|r| r == host)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> Url {
        Url::parse("http://example.com/").unwrap()
    }

    #[test]
    fn test_accept_same_host() {
        let result = resolve_loadable("http://example.com/page", &reference(), &reference());
        assert_eq!(result.unwrap().as_str(), "http://example.com/page");
    }

    #[test]
    fn test_resolve_relative_against_base() {
        let base = Url::parse("http://example.com/dir/doc.html").unwrap();
        let result = resolve_loadable("../other", &base, &reference());
        assert_eq!(result.unwrap().as_str(), "http://example.com/other");
    }

    #[test]
    fn test_resolve_root_relative() {
        let base = Url::parse("http://example.com/dir/doc.html").unwrap();
        let result = resolve_loadable("/p1", &base, &reference());
        assert_eq!(result.unwrap().as_str(), "http://example.com/p1");
    }

    #[test]
    fn test_www_prefix_rewritten_to_reference() {
        let result = resolve_loadable("http://www.example.com/x", &reference(), &reference());
        assert_eq!(result.unwrap().as_str(), "http://example.com/x");
    }

    #[test]
    fn test_www_reference_accepts_bare_host() {
        let reference = Url::parse("http://www.example.com/").unwrap();
        let result = resolve_loadable("http://example.com/x", &reference, &reference);
        assert_eq!(result.unwrap().as_str(), "http://www.example.com/x");
    }

    #[test]
    fn test_reject_different_host() {
        let result = resolve_loadable("http://other.com/p3", &reference(), &reference());
        assert!(result.is_none());
    }

    #[test]
    fn test_reject_different_scheme() {
        let result = resolve_loadable("https://example.com/x", &reference(), &reference());
        assert!(result.is_none());
    }

    #[test]
    fn test_reject_different_port() {
        let result = resolve_loadable("http://example.com:8080/x", &reference(), &reference());
        assert!(result.is_none());
    }

    #[test]
    fn test_explicit_default_port_accepted() {
        let result = resolve_loadable("http://example.com:80/x", &reference(), &reference());
        assert_eq!(result.unwrap().as_str(), "http://example.com/x");
    }

    #[test]
    fn test_reject_different_user_info() {
        let result = resolve_loadable("http://bob@example.com/x", &reference(), &reference());
        assert!(result.is_none());
    }

    #[test]
    fn test_fragment_stripped() {
        let result = resolve_loadable("http://example.com/a#frag", &reference(), &reference());
        let url = result.unwrap();
        assert_eq!(url.fragment(), None);
        assert_eq!(url.as_str(), "http://example.com/a");
    }

    #[test]
    fn test_fragment_only_candidate_resolves_to_base() {
        let base = Url::parse("http://example.com/page").unwrap();
        let result = resolve_loadable("#section", &base, &reference());
        assert_eq!(result.unwrap().as_str(), "http://example.com/page");
    }

    #[test]
    fn test_unparseable_candidate_is_not_loadable() {
        let result = resolve_loadable("http://[broken", &reference(), &reference());
        assert!(result.is_none());
    }

    #[test]
    fn test_www_only_tolerated_as_exact_prefix() {
        // "wwwexample.com" is not a www variant of "example.com"
        let result = resolve_loadable("http://wwwexample.com/x", &reference(), &reference());
        assert!(result.is_none());
    }
}
