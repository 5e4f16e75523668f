//! URL helpers for gallery pagination and link resolution.
//!
//! Cache keys are derived from exact URL strings, so these helpers only touch
//! a URL when they must: absolute hrefs pass through verbatim and only
//! relative ones are joined against their page.

use url::Url;

/// Error type for href resolution failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// URL of listing page `page` (1-based).
///
/// Page 1 is the base URL itself; later pages are `{base}/page/{n}`.
pub fn page_url(base: &str, page: u32) -> String {
    if page <= 1 { base.to_string() } else { format!("{base}/page/{page}") }
}

/// Resolve an anchor `href` found on the page at `base`.
///
/// Absolute http(s) hrefs are returned unchanged (after trimming); relative
/// ones are joined against `base`.
pub fn resolve_href(base: &Url, href: &str) -> Result<String, UrlError> {
    let trimmed = href.trim();

    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let resolved = match Url::parse(trimmed) {
        Ok(absolute) => {
            return match absolute.scheme() {
                "http" | "https" => Ok(trimmed.to_string()),
                scheme => Err(UrlError::UnsupportedScheme(scheme.to_string())),
            };
        }
        Err(url::ParseError::RelativeUrlWithoutBase) => base.join(trimmed),
        Err(e) => return Err(UrlError::InvalidUrl(e.to_string())),
    };

    resolved.map(String::from).map_err(|e| UrlError::InvalidUrl(e.to_string()))
}

/// Whether a response served from `final_url` answers a request for `requested`.
///
/// The site may append to the requested URL (a trailing slash, a query) but a
/// final URL that does not start with the requested one is a redirect away.
pub fn is_same_target(requested: &str, final_url: &str) -> bool {
    final_url.starts_with(requested)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://www.example.com/illustrations/page/2").unwrap()
    }

    #[test]
    fn test_page_url_first_page_is_base() {
        assert_eq!(page_url("https://example.com/illustrations", 1), "https://example.com/illustrations");
    }

    #[test]
    fn test_page_url_later_pages() {
        assert_eq!(page_url("https://example.com/illustrations", 2), "https://example.com/illustrations/page/2");
        assert_eq!(
            page_url("https://example.com/illustrations", 350),
            "https://example.com/illustrations/page/350"
        );
    }

    #[test]
    fn test_resolve_absolute_kept_verbatim() {
        let href = "https://WWW.example.com/illustrations/fox";
        assert_eq!(resolve_href(&base(), href).unwrap(), href);
    }

    #[test]
    fn test_resolve_trims_whitespace() {
        assert_eq!(
            resolve_href(&base(), "  https://www.example.com/illustrations/fox/ ").unwrap(),
            "https://www.example.com/illustrations/fox/"
        );
    }

    #[test]
    fn test_resolve_root_relative() {
        assert_eq!(
            resolve_href(&base(), "/illustrations/fox/").unwrap(),
            "https://www.example.com/illustrations/fox/"
        );
    }

    #[test]
    fn test_resolve_path_relative() {
        assert_eq!(resolve_href(&base(), "fox/").unwrap(), "https://www.example.com/illustrations/page/fox/");
    }

    #[test]
    fn test_resolve_empty() {
        assert!(matches!(resolve_href(&base(), "   "), Err(UrlError::Empty)));
    }

    #[test]
    fn test_resolve_unsupported_scheme() {
        assert!(matches!(resolve_href(&base(), "mailto:someone@example.com"), Err(UrlError::UnsupportedScheme(_))));
    }

    #[test]
    fn test_same_target_exact_and_extended() {
        assert!(is_same_target("https://e.com/a", "https://e.com/a"));
        assert!(is_same_target("https://e.com/a", "https://e.com/a/"));
    }

    #[test]
    fn test_same_target_redirected_away() {
        assert!(!is_same_target("https://e.com/a", "https://e.com/"));
        assert!(!is_same_target("https://e.com/illustrations/page/400", "https://e.com/illustrations"));
    }
}
