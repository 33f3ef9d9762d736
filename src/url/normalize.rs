use crate::UrlError;
use url::Url;

/// Normalizes a URL so that equivalent links discovered on different pages
/// deduplicate to one audit
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed (dot segments are resolved and the
///    host lowercased by the parser)
/// 2. Reject anything that is not HTTP or HTTPS
/// 3. Reject URLs without a host
/// 4. Remove fragment (everything after #)
/// 5. Remove empty query string (trailing ?)
///
/// Unlike a link-graph crawler this does not rewrite scheme, `www.` or query
/// parameters: the normalized URL is the one handed to the audit tool, so it
/// must still address the page that was fetched.
///
/// # Examples
///
/// ```
/// use lumen_sweep::url::normalize_url;
///
/// let url = normalize_url("https://EXAMPLE.COM/a/../page#top").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/page");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    url.set_fragment(None);

    if url.query() == Some("") {
        url.set_query(None);
    }

    Ok(url)
}
