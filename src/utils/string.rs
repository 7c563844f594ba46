//! String utility functions for text processing

/// Characters stripped by [`trim`] and [`trim_bytes`]
const TRIM_CHARS: [char; 4] = [' ', '\t', '\r', '\n'];

/// Trim spaces, tabs, carriage returns and line feeds from both ends
///
/// Unlike [`str::trim`] this leaves other Unicode whitespace alone, so a
/// value such as `"\u{a0}x"` survives untouched.
///
/// # Arguments
///
/// * `s` - The string to trim
///
/// # Returns
///
/// The trimmed string, empty if `s` held only whitespace
pub fn trim(s: &str) -> &str {
    s.trim_matches(&TRIM_CHARS[..])
}

/// Byte-slice version of [`trim`]
pub fn trim_bytes(s: &[u8]) -> &[u8] {
    let is_ws = |b: &u8| matches!(b, b' ' | b'\t' | b'\r' | b'\n');
    let start = match s.iter().position(|b| !is_ws(b)) {
        Some(start) => start,
        None => return &[],
    };
    let end = s.iter().rposition(|b| !is_ws(b)).map_or(start, |e| e + 1);
    &s[start..end]
}

/// Check if a string starts with a prefix, ignoring ASCII case
///
/// No locale awareness and no Unicode case folding: only `A-Z` and `a-z`
/// are considered equal to each other.
///
/// # Arguments
///
/// * `s` - The string to check
/// * `prefix` - The prefix to look for
///
/// # Returns
///
/// True if `s` starts with `prefix` modulo ASCII case
pub fn starts_with_insensitive(s: &str, prefix: &str) -> bool {
    s.len() >= prefix.len()
        && s.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

/// Strip one layer of matching quotes from a value
///
/// Recognizes straight (`"…"`, `'…'`) and curly (`“…”`, `‘…’`) pairs. An
/// unbalanced quote is kept as part of the value.
pub fn strip_matching_quotes(s: &str) -> &str {
    const PAIRS: [(char, char); 4] = [('"', '"'), ('\'', '\''), ('“', '”'), ('‘', '’')];

    for (open, close) in PAIRS {
        if let Some(inner) = s.strip_prefix(open).and_then(|rest| rest.strip_suffix(close)) {
            return inner;
        }
    }
    s
}
