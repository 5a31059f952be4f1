//! Read-only view over Notion's rich-text encoding.
//!
//! The private API stores styled text as an array of runs, each run an array
//! whose first element is the text and whose optional second element lists
//! annotations: `[["Hello "], ["world", [["b"]]]]`. Only the text matters here.

use serde_json::Value;

/// Borrowed rich-text property. Absent or malformed values read as empty.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RichText<'a>(Option<&'a Value>);

impl<'a> RichText<'a> {
    pub fn new(value: Option<&'a Value>) -> Self {
        Self(value)
    }

    /// Iterates the text of each run, skipping runs that carry none.
    pub fn runs(&self) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(run_text)
    }

    /// Concatenates all runs, dropping annotations.
    pub fn plain_text(&self) -> String {
        self.runs().collect()
    }

    /// Whether flattening yields no text at all.
    pub fn is_empty(&self) -> bool {
        self.runs().all(str::is_empty)
    }
}

fn run_text(run: &Value) -> Option<&str> {
    match run {
        Value::Array(parts) => parts.first().and_then(Value::as_str),
        // Some caches collapse single unstyled runs to a bare string.
        Value::String(text) => Some(text),
        _ => None,
    }
}
