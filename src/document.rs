use crate::errors::DocumentError;

/// Turns an uploaded document (typically PDF bytes) into plain text. The
/// decoding itself lives outside this crate; sessions only consume the text.
///
/// Implementations should return whatever text they can. Empty or
/// whitespace-only output is treated by the caller as "nothing extractable"
/// and surfaced to the student as an input problem, never sent to the model.
pub trait TextExtractor: Send + Sync {
    fn extract_text(&self, document: &[u8]) -> Result<String, DocumentError>;
}
