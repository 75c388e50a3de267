//! Response encodings
//!
//! A resolved value is written out in one of two formats:
//!
//! - **Text**: a deterministic "directory listing". Scalars print bare;
//!   objects list their (escaped) keys, sorted, with a trailing `/` on keys
//!   that hold containers; arrays list their indices in order, as `i=name`
//!   when the element has a magic key, `i/` for containers and `i` otherwise.
//! - **JSON**: plain structural JSON followed by a newline.
//!
//! Text output is canonical: the same tree always produces the same bytes.
//! Long-poll change detection compares these strings.

use crate::error::Result;
use crate::path::{escape_segment, magic_name};
use crate::value::{Map, Value};

/// Output format negotiated for a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// `text/plain` directory listing
    #[default]
    Text,
    /// `application/json`
    Json,
}

impl Format {
    /// MIME type written in the `Content-Type` header.
    pub fn content_type(&self) -> &'static str {
        match self {
            Format::Text => "text/plain; charset=utf-8",
            Format::Json => "application/json",
        }
    }
}

/// Render `value` in the given format.
pub fn render(value: &Value, format: Format) -> Result<String> {
    match format {
        Format::Text => Ok(render_text(value)),
        Format::Json => render_json(value),
    }
}

/// Render the text listing form of `value`.
pub fn render_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => format_float(*f),
        Value::Bool(b) => b.to_string(),
        Value::Object(map) => render_object(map),
        Value::Array(items) => render_array(items),
    }
}

/// Render `value` as JSON with a trailing newline.
pub fn render_json(value: &Value) -> Result<String> {
    let mut out = serde_json::to_string(value)?;
    out.push('\n');
    Ok(out)
}

/// Six fractional digits, then trailing zeros and a bare `.` trimmed.
fn format_float(f: f64) -> String {
    let s = format!("{:.6}", f);
    if !s.contains('.') {
        return s;
    }
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn render_object(map: &Map) -> String {
    let mut lines: Vec<String> = map
        .iter()
        .map(|(key, child)| {
            let suffix = if child.is_container() { "/" } else { "" };
            format!("{}{}\n", escape_segment(key), suffix)
        })
        .collect();
    lines.sort();
    lines.concat()
}

fn render_array(items: &[Value]) -> String {
    let mut out = String::new();
    for (i, item) in items.iter().enumerate() {
        let line = match magic_name(item) {
            Some(name) => format!("{}={}\n", i, escape_segment(name)),
            None if item.is_container() => format!("{}/\n", i),
            None => format!("{}\n", i),
        };
        out.push_str(&line);
    }
    out
}
