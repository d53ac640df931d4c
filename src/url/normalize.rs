use crate::UrlError;
use url::Url;

/// Query parameters that only carry click tracking
const TRACKING_PARAMS: &[&str] = &["fbclid", "gclid", "mc_eid"];

/// Normalizes a URL string into its canonical identity key
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed. Parsing lowercases the host,
///    drops the default port, and resolves dot segments.
/// 2. Remove the fragment
/// 3. Remove tracking query parameters and sort the rest by key
/// 4. Render a bare root path without its slash (`http://a.test/` becomes
///    `http://a.test`)
///
/// Other trailing slashes are kept, since relative links on the page resolve
/// against them.
///
/// # Examples
///
/// ```
/// use word_ripple::url::normalize_url;
///
/// let key = normalize_url("http://A.TEST/docs/../index?b=2&a=1#top").unwrap();
/// assert_eq!(key, "http://a.test/index?a=1&b=2");
/// assert_eq!(normalize_url("http://a.test/").unwrap(), "http://a.test");
/// ```
pub fn normalize_url(url_str: &str) -> Result<String, UrlError> {
    let url = Url::parse(url_str).map_err(|e| UrlError::Parse(format!("{}: {}", url_str, e)))?;
    Ok(canonical_form(url))
}

/// Canonical string for an already-parsed URL
pub fn canonical_form(mut url: Url) -> String {
    url.set_fragment(None);

    if url.query().is_some() {
        let params = filter_and_sort_query_params(&url);
        if params.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(params);
        }
    }

    if url.path() == "/" && url.query().is_none() {
        if let Some(bare) = url.as_str().strip_suffix('/') {
            return bare.to_string();
        }
    }

    url.to_string()
}

/// Filters out tracking parameters and sorts remaining query parameters
fn filter_and_sort_query_params(url: &Url) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !is_tracking_param(key))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    params.sort();
    params
}

fn is_tracking_param(key: &str) -> bool {
    key.starts_with("utm_") || TRACKING_PARAMS.contains(&key)
}
