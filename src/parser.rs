use crate::errors::ParseError;
use serde_json::Value;
use std::fmt;

/// Which JSON payload a reply is expected to carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonKind {
    Object,
    Array,
}

impl JsonKind {
    fn delimiters(self) -> (char, char) {
        match self {
            JsonKind::Object => ('{', '}'),
            JsonKind::Array => ('[', ']'),
        }
    }
}

impl fmt::Display for JsonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonKind::Object => write!(f, "object"),
            JsonKind::Array => write!(f, "array"),
        }
    }
}

/// Extracts the JSON payload of the requested kind from an LLM reply that may
/// wrap it in prose or markdown.
///
/// The slice runs from the first opening delimiter to the last closing
/// delimiter, so surrounding text like "Sure! Here is the quiz: [...] Let me
/// know!" is ignored. If either delimiter is missing, or the last close comes
/// before the first open, this fails with [`ParseError::NoDelimiterFound`].
/// The slice is then parsed strictly; anything malformed fails with
/// [`ParseError::MalformedJson`].
///
/// Known limitation: a delimiter character inside the surrounding prose (for
/// example a `{` in a code sample before the payload) widens the slice and
/// the strict parse then rejects it. Callers treat that as a failed
/// generation rather than guessing at a repair.
pub fn extract_json(raw: &str, kind: JsonKind) -> Result<Value, ParseError> {
    let (open, close) = kind.delimiters();
    match (raw.find(open), raw.rfind(close)) {
        (Some(start), Some(end)) if start < end => {
            let payload = &raw[start..=end];
            Ok(serde_json::from_str(payload)?)
        }
        _ => Err(ParseError::NoDelimiterFound(kind)),
    }
}
