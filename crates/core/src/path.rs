//! Path resolution and segment escaping
//!
//! A path is a list of already-decoded segments, e.g. `["hosts", "h1", "state"]`.
//! Resolution walks the tree one segment at a time:
//!
//! | Current node | Segment | Step |
//! |--------------|---------|------|
//! | Object | key present | descend into the key |
//! | Array | in-range index | descend into the element |
//! | Array | anything else | first element whose magic key equals the segment |
//! | anything else | - | not found |
//!
//! The magic keys let `/things/asdf/stuff` and `/things/0/stuff` address the
//! same element when `things[0].name == "asdf"`.
//!
//! Segments travel in URLs using query-parameter escaping, so a key printed by
//! a listing can be fed straight back as the next segment.

use crate::error::{Error, Result};
use crate::value::Value;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Keys checked, in priority order, when addressing an array element by name.
pub const MAGIC_ARRAY_KEYS: [&str; 2] = ["name", "uuid"];

/// Everything except `A-Z a-z 0-9 - _ . ~` is escaped.
const QUERY_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

// =============================================================================
// Resolution
// =============================================================================

/// Resolve `path` against `root`.
///
/// Returns `None` as soon as a segment cannot be matched. An empty path
/// returns `root` itself.
///
/// # Example
///
/// ```
/// use metadir_core::{resolve, Value};
///
/// let root: Value = serde_json::from_str(
///     r#"{"hosts": [{"name": "h1", "state": "active"}]}"#,
/// ).unwrap();
///
/// let by_name = resolve(&root, &["hosts", "h1", "state"]);
/// let by_index = resolve(&root, &["hosts", "0", "state"]);
/// assert_eq!(by_name, Some(&Value::from("active")));
/// assert_eq!(by_name, by_index);
/// ```
pub fn resolve<'a, S: AsRef<str>>(root: &'a Value, path: &[S]) -> Option<&'a Value> {
    let mut current = root;
    for segment in path {
        current = step(current, segment.as_ref())?;
    }
    Some(current)
}

fn step<'a>(current: &'a Value, segment: &str) -> Option<&'a Value> {
    match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => {
            if let Some(item) = parse_index(segment).and_then(|i| items.get(i)) {
                return Some(item);
            }
            items.iter().find(|item| matches_magic_key(item, segment))
        }
        _ => None,
    }
}

/// Decimal digits only; signs and whitespace are names, not indices.
fn parse_index(segment: &str) -> Option<usize> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

fn matches_magic_key(item: &Value, segment: &str) -> bool {
    match item.as_object() {
        Some(map) => MAGIC_ARRAY_KEYS
            .iter()
            .any(|key| map.get(*key).and_then(Value::as_str) == Some(segment)),
        None => false,
    }
}

/// The display name of an array element: the first magic key holding a string.
pub fn magic_name(item: &Value) -> Option<&str> {
    let map = item.as_object()?;
    MAGIC_ARRAY_KEYS
        .iter()
        .find_map(|key| map.get(*key).and_then(Value::as_str))
}

// =============================================================================
// Escaping
// =============================================================================

/// Escape a key for use as a URL path segment or listing line.
///
/// Space becomes `+`, unreserved characters pass through, and every other
/// byte becomes `%XX`.
pub fn escape_segment(segment: &str) -> String {
    utf8_percent_encode(segment, QUERY_ESCAPE)
        .to_string()
        .replace("%20", "+")
}

/// Reverse of [`escape_segment`].
///
/// # Errors
///
/// Returns `MalformedPathSegment` if a `%` is not followed by two hex digits
/// or if the decoded bytes are not UTF-8.
pub fn unescape_segment(segment: &str) -> Result<String> {
    let bytes = segment.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes.len() > i + 2
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit();
            if !valid {
                let end = (i + 3).min(bytes.len());
                return Err(Error::MalformedPathSegment {
                    segment: segment.to_string(),
                    reason: format!(
                        "bad escape {:?}",
                        String::from_utf8_lossy(&bytes[i..end])
                    ),
                });
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    let plus_decoded = segment.replace('+', " ");
    percent_decode_str(&plus_decoded)
        .decode_utf8()
        .map(|s| s.into_owned())
        .map_err(|e| Error::MalformedPathSegment {
            segment: segment.to_string(),
            reason: e.to_string(),
        })
}

/// Split a raw (still escaped) URL path into decoded segments.
///
/// Leading and trailing slashes are ignored; `"/"` and `""` both give an
/// empty path. Interior empty segments are kept, so `a//b` never matches.
pub fn split_path(raw: &str) -> Result<Vec<String>> {
    let trimmed = raw.trim_start_matches('/').trim_end_matches('/');
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    trimmed.split('/').map(unescape_segment).collect()
}
