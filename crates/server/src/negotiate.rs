//! `Accept` header negotiation between text and JSON.
//!
//! Offers are `text/plain` then `application/json`. Each offer takes the
//! q-value of the most specific media range that matches it; the highest
//! q wins, ties go to the earlier offer, and text is the fallback.

use axum::http::{header, HeaderMap};
use metadir_core::Format;

const OFFERS: [(&str, &str, Format); 2] = [
    ("text", "plain", Format::Text),
    ("application", "json", Format::Json),
];

struct MediaRange<'a> {
    kind: &'a str,
    subtype: &'a str,
    q: f32,
}

impl MediaRange<'_> {
    /// 2 = exact, 1 = `type/*`, 0 = `*/*`, None = no match.
    fn specificity(&self, kind: &str, subtype: &str) -> Option<u8> {
        match (self.kind, self.subtype) {
            ("*", "*") => Some(0),
            (k, "*") if k.eq_ignore_ascii_case(kind) => Some(1),
            (k, s) if k.eq_ignore_ascii_case(kind) && s.eq_ignore_ascii_case(subtype) => Some(2),
            _ => None,
        }
    }
}

fn parse_accept(value: &str) -> Vec<MediaRange<'_>> {
    value
        .split(',')
        .filter_map(|part| {
            let mut params = part.split(';');
            let (kind, subtype) = params.next()?.trim().split_once('/')?;
            let q = params
                .filter_map(|p| p.trim().strip_prefix("q="))
                .find_map(|q| q.trim().parse::<f32>().ok())
                .unwrap_or(1.0);
            Some(MediaRange {
                kind: kind.trim(),
                subtype: subtype.trim(),
                q,
            })
        })
        .collect()
}

/// Pick the response format for a request's `Accept` header.
pub fn negotiate(headers: &HeaderMap) -> Format {
    let Some(accept) = headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
    else {
        return Format::Text;
    };
    negotiate_accept(accept)
}

/// [`negotiate`] on a raw header value.
pub fn negotiate_accept(accept: &str) -> Format {
    let ranges = parse_accept(accept);
    let mut best = (0.0f32, Format::Text);
    for (kind, subtype, format) in OFFERS {
        let q = ranges
            .iter()
            .filter_map(|r| r.specificity(kind, subtype).map(|s| (s, r.q)))
            .max_by_key(|(s, _)| *s)
            .map(|(_, q)| q)
            .unwrap_or(0.0);
        if q > best.0 {
            best = (q, format);
        }
    }
    best.1
}
