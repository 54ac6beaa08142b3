use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::Span;

/// Replacement of the text covered by `span` with `new_text`.
///
/// An empty span is an insertion; an empty `new_text` is a deletion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextEdit {
    pub span: Span,
    pub new_text: String,
}

impl TextEdit {
    #[must_use]
    pub fn new(span: Span, new_text: impl Into<String>) -> Self {
        Self {
            span,
            new_text: new_text.into(),
        }
    }

    #[must_use]
    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self::new(Span::empty(offset), text)
    }

    #[must_use]
    pub fn delete(span: Span) -> Self {
        Self::new(span, String::new())
    }

    /// Change in document length caused by applying this edit.
    #[must_use]
    pub fn delta(&self) -> i64 {
        i64::try_from(self.new_text.len()).unwrap_or(i64::MAX) - i64::from(self.span.length())
    }

    /// Whether applying the edit to `text` would leave it unchanged.
    #[must_use]
    pub fn is_noop(&self, text: &str) -> bool {
        text.get(self.span.as_range()) == Some(self.new_text.as_str())
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("edit {span:?} extends past the end of the document (length {length})")]
    OutOfBounds { span: Span, length: usize },

    #[error("edit {span:?} does not fall on a character boundary")]
    NotCharBoundary { span: Span },

    #[error("edits {first:?} and {second:?} overlap")]
    Overlapping { first: Span, second: Span },
}

/// Sort edits by start offset and reject overlapping edits.
///
/// Two insertions at the same offset are kept in their original relative
/// order. Identical duplicate edits collapse to one.
pub fn normalize_edits(mut edits: Vec<TextEdit>) -> Result<Vec<TextEdit>, EditError> {
    edits.sort_by_key(|edit| (edit.span.start(), edit.span.end()));
    edits.dedup();

    for pair in edits.windows(2) {
        let (first, second) = (&pair[0], &pair[1]);
        if first.span.end() > second.span.start() {
            return Err(EditError::Overlapping {
                first: first.span,
                second: second.span,
            });
        }
    }

    Ok(edits)
}

/// Apply a set of edits to `text`, returning the edited document.
///
/// Edits are expressed against the original text; they are normalized
/// first so callers may pass them in any order.
pub fn apply_edits(text: &str, edits: &[TextEdit]) -> Result<String, EditError> {
    let edits = normalize_edits(edits.to_vec())?;

    let mut output = String::with_capacity(text.len());
    let mut cursor = 0usize;

    for edit in &edits {
        let range = edit.span.as_range();
        if range.end > text.len() {
            return Err(EditError::OutOfBounds {
                span: edit.span,
                length: text.len(),
            });
        }
        if !text.is_char_boundary(range.start) || !text.is_char_boundary(range.end) {
            return Err(EditError::NotCharBoundary { span: edit.span });
        }
        output.push_str(&text[cursor..range.start]);
        output.push_str(&edit.new_text);
        cursor = range.end;
    }

    output.push_str(&text[cursor..]);
    Ok(output)
}
