//! Line-oriented view over raw configuration bytes
//!
//! Lines are borrowed slices of the input and keep their own terminator, so
//! concatenating every [`RawLine::raw`] gives back the input unchanged.

use std::borrow::Cow;

use crate::utils::string::{strip_matching_quotes, trim, trim_bytes};

/// End-of-line marker of a single physical line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eol {
    /// Last line of a document without a trailing line break
    None,
    Lf,
    CrLf,
}

impl Eol {
    pub fn as_bytes(self) -> &'static [u8] {
        match self {
            Eol::None => b"",
            Eol::Lf => b"\n",
            Eol::CrLf => b"\r\n",
        }
    }
}

/// One physical line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawLine<'a> {
    /// The line including its terminator
    pub raw: &'a [u8],
    /// The line without its terminator
    pub content: &'a [u8],
    pub eol: Eol,
}

/// Iterator over the physical lines of a byte slice
#[derive(Debug, Clone)]
pub struct Lines<'a> {
    rest: &'a [u8],
}

pub fn lines(text: &[u8]) -> Lines<'_> {
    Lines { rest: text }
}

impl<'a> Iterator for Lines<'a> {
    type Item = RawLine<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }

        let line = match self.rest.iter().position(|&b| b == b'\n') {
            Some(nl) => {
                let raw = &self.rest[..=nl];
                let eol = if nl > 0 && raw[nl - 1] == b'\r' {
                    Eol::CrLf
                } else {
                    Eol::Lf
                };
                self.rest = &self.rest[nl + 1..];
                RawLine {
                    raw,
                    content: &raw[..raw.len() - eol.as_bytes().len()],
                    eol,
                }
            }
            None => {
                let raw = self.rest;
                self.rest = &[];
                RawLine {
                    raw,
                    content: raw,
                    eol: Eol::None,
                }
            }
        };
        Some(line)
    }
}

/// Line break style used for appended lines, taken from the first `\n`
///
/// Documents without any line break default to [`Eol::Lf`].
pub fn dominant_eol(text: &[u8]) -> Eol {
    match text.iter().position(|&b| b == b'\n') {
        Some(nl) if nl > 0 && text[nl - 1] == b'\r' => Eol::CrLf,
        _ => Eol::Lf,
    }
}

/// True if `text` is empty or already ends in a line break character
pub fn ends_with_terminator(text: &[u8]) -> bool {
    matches!(text.last(), None | Some(b'\n') | Some(b'\r'))
}

/// A `key=value` pair parsed from one physical line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<'a> {
    pub key: Cow<'a, str>,
    /// The value with surrounding whitespace and one layer of quotes removed
    pub value: String,
}

/// Parses a line (without terminator) as `key=value`
///
/// The key is everything before the first `=`, the value everything after
/// it. Both are trimmed and the value loses one layer of matching quotes.
/// Lines without `=` or with an empty key yield `None` and are never
/// treated as errors.
pub fn parse_entry(content: &[u8]) -> Option<Entry<'_>> {
    let eq = content.iter().position(|&b| b == b'=')?;
    let key = trim_bytes(&content[..eq]);
    if key.is_empty() {
        return None;
    }

    let raw_value = String::from_utf8_lossy(trim_bytes(&content[eq + 1..]));
    let value = trim(strip_matching_quotes(&raw_value)).to_string();

    Some(Entry {
        key: String::from_utf8_lossy(key),
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(text: &[u8]) -> Vec<(&[u8], &[u8], Eol)> {
        lines(text).map(|l| (l.raw, l.content, l.eol)).collect()
    }

    #[test]
    fn test_lines_keep_terminators() {
        let text = b"a=1\r\nb=2\nc=3";
        assert_eq!(
            collect(text),
            vec![
                (&b"a=1\r\n"[..], &b"a=1"[..], Eol::CrLf),
                (&b"b=2\n"[..], &b"b=2"[..], Eol::Lf),
                (&b"c=3"[..], &b"c=3"[..], Eol::None),
            ]
        );
    }

    #[test]
    fn test_lines_concatenate_to_input() {
        let text: &[u8] = b"\n\r\n[Section]\r\nkey = value\n\nlast\r";
        let joined: Vec<u8> = lines(text).flat_map(|l| l.raw.to_vec()).collect();
        assert_eq!(joined, text);
    }

    #[test]
    fn test_lines_edge_cases() {
        assert_eq!(lines(b"").count(), 0);
        assert_eq!(collect(b"\n"), vec![(&b"\n"[..], &b""[..], Eol::Lf)]);
        assert_eq!(collect(b"\r\n"), vec![(&b"\r\n"[..], &b""[..], Eol::CrLf)]);
        // a lone trailing CR is content, not a terminator
        assert_eq!(collect(b"x\r"), vec![(&b"x\r"[..], &b"x\r"[..], Eol::None)]);
    }

    #[test]
    fn test_dominant_eol() {
        assert_eq!(dominant_eol(b"a\r\nb\nc\n"), Eol::CrLf);
        assert_eq!(dominant_eol(b"a\nb\r\n"), Eol::Lf);
        assert_eq!(dominant_eol(b"single line"), Eol::Lf);
        assert_eq!(dominant_eol(b""), Eol::Lf);
        assert_eq!(dominant_eol(b"\n"), Eol::Lf);
    }

    #[test]
    fn test_ends_with_terminator() {
        assert!(ends_with_terminator(b""));
        assert!(ends_with_terminator(b"a\n"));
        assert!(ends_with_terminator(b"a\r"));
        assert!(!ends_with_terminator(b"a"));
    }

    #[test]
    fn test_parse_entry() {
        let entry = parse_entry(b"  BaseUrl = \"http://x:8385/\"  ").unwrap();
        assert_eq!(entry.key, "BaseUrl");
        assert_eq!(entry.value, "http://x:8385/");

        let entry = parse_entry(b"BaseUrl='http://x/'").unwrap();
        assert_eq!(entry.value, "http://x/");

        let entry = parse_entry(b"BaseUrl=http://x/?a=b").unwrap();
        assert_eq!(entry.value, "http://x/?a=b");

        let entry = parse_entry("BaseUrl=“ http://x/ ”".as_bytes()).unwrap();
        assert_eq!(entry.value, "http://x/");

        let entry = parse_entry(b"Empty=").unwrap();
        assert_eq!(entry.value, "");
    }

    #[test]
    fn test_parse_entry_malformed_lines() {
        assert_eq!(parse_entry(b"[Section]"), None);
        assert_eq!(parse_entry(b""), None);
        assert_eq!(parse_entry(b"   = value"), None);
    }
}
