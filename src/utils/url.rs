//! Server address normalization and comparison

use crate::utils::string::trim;

const HTTP_SCHEME: &str = "http://";
const HTTPS_SCHEME: &str = "https://";

/// Normalizes a user-supplied server address
///
/// Trims the input, prepends `http://` when neither `http://` nor
/// `https://` is present (the check is case-sensitive on the literal prefix)
/// and makes sure the result ends in exactly one `/`.
///
/// # Arguments
/// * `input` - The address as typed by the user or stored in a file
///
/// # Returns
/// * The normalized address, or an empty string if nothing but a scheme
///   and slashes was given
///
/// # Examples
/// ```
/// use ao_patcher::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("x:8385"), "http://x:8385/");
/// assert_eq!(normalize_base_url(" https://x/ "), "https://x/");
/// ```
pub fn normalize_base_url(input: &str) -> String {
    let input = trim(input);
    if input.is_empty() {
        return String::new();
    }

    let (scheme, rest) = if let Some(rest) = input.strip_prefix(HTTP_SCHEME) {
        (HTTP_SCHEME, rest)
    } else if let Some(rest) = input.strip_prefix(HTTPS_SCHEME) {
        (HTTPS_SCHEME, rest)
    } else {
        (HTTP_SCHEME, input)
    };

    let rest = rest.trim_end_matches('/');
    if rest.is_empty() {
        return String::new();
    }

    let mut normalized = String::with_capacity(scheme.len() + rest.len() + 1);
    normalized.push_str(scheme);
    normalized.push_str(rest);
    normalized.push('/');
    normalized
}

/// Normalization applied to both sides of a comparison
///
/// Identical to [`normalize_base_url`]; kept separate so call sites that only
/// compare never end up writing a normalized form back to a file.
pub fn normalize_url_for_compare(input: &str) -> String {
    normalize_base_url(input)
}

/// Returns true if two addresses point at the same server after normalization
pub fn urls_equal(a: &str, b: &str) -> bool {
    normalize_url_for_compare(a) == normalize_url_for_compare(b)
}

/// Joins a base address and a relative path with exactly one `/` between them
///
/// # Examples
/// ```
/// use ao_patcher::utils::url::join_url;
///
/// assert_eq!(join_url("http://x/", "/store"), "http://x/store");
/// assert_eq!(join_url("http://x", "store"), "http://x/store");
/// ```
pub fn join_url(base: &str, rel: &str) -> String {
    if rel.is_empty() {
        return base.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        rel.trim_start_matches('/')
    )
}
