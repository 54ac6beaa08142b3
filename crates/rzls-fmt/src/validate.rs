//! Safety passes over a merged edit list.
//!
//! Each pass either hands the candidate on or rejects it whole; edits are
//! never partially applied.

use itertools::Itertools;
use rzls_source::apply_edits;
use rzls_source::EditError;
use rzls_source::Span;
use rzls_source::TextEdit;
use rzls_templates::parse_document;
use rzls_templates::significant_tokens;
use rzls_templates::HybridDocument;

use crate::lines::line_end;
use crate::lines::line_start;
use crate::Rejection;

/// Normalised edits together with the text they produce.
#[derive(Debug, Clone)]
pub struct Candidate<'a> {
    pub document: &'a HybridDocument,
    pub edits: Vec<TextEdit>,
    pub edited: String,
}

impl<'a> Candidate<'a> {
    pub fn new(document: &'a HybridDocument, edits: Vec<TextEdit>) -> Result<Self, EditError> {
        let edited = apply_edits(document.text(), &edits)?;
        Ok(Self {
            document,
            edits,
            edited,
        })
    }
}

/// Gate edits on the document's existing syntax diagnostics.
///
/// Without `allow`, a broken document is not formatted at all. With it,
/// only edits touching a diagnostic's span are dropped.
pub fn filter_preexisting(
    document: &HybridDocument,
    edits: Vec<TextEdit>,
    allow: bool,
) -> Result<Vec<TextEdit>, Rejection> {
    let diagnostics = document.diagnostics();
    if diagnostics.is_empty() {
        return Ok(edits);
    }
    if !allow {
        return Err(Rejection::PreexistingDiagnostics {
            count: diagnostics.len(),
        });
    }
    Ok(edits
        .into_iter()
        .filter(|edit| {
            !diagnostics
                .iter()
                .any(|diagnostic| diagnostic.span.intersects_or_touches(edit.span))
        })
        .collect())
}

/// Reject edits that change anything but layout in the lines they touch.
pub fn validate_content(candidate: Candidate<'_>) -> Result<Candidate<'_>, Rejection> {
    let (Some(first), Some(last)) = (candidate.edits.first(), candidate.edits.last()) else {
        return Ok(candidate);
    };
    let original = candidate.document.text();
    let start = line_start(original, first.span.start_usize());
    let old_end = line_end(original, last.span.end_usize());
    let new_end = candidate.edited.len() - (original.len() - old_end);

    let before = significant_tokens(&original[start..old_end]);
    let after = significant_tokens(&candidate.edited[start..new_end]);
    if before != after {
        return Err(Rejection::ContentChanged {
            span: Span::from_bounds(start, old_end),
        });
    }
    Ok(candidate)
}

/// Reject edits that make a diagnostic appear that was not there before.
pub fn validate_diagnostics(candidate: Candidate<'_>) -> Result<Candidate<'_>, Rejection> {
    let reparsed = parse_document(&candidate.edited);
    let before = candidate
        .document
        .diagnostics()
        .iter()
        .map(|diagnostic| (diagnostic.code(), diagnostic.language()))
        .counts();
    let after = reparsed
        .diagnostics()
        .iter()
        .map(|diagnostic| (diagnostic.code(), diagnostic.language()))
        .counts();

    let introduced = reparsed
        .diagnostics()
        .iter()
        .map(|diagnostic| (diagnostic.code(), diagnostic.language()))
        .find(|key| after.get(key).copied().unwrap_or_default() > before.get(key).copied().unwrap_or_default());
    if let Some((code, language)) = introduced {
        return Err(Rejection::NewDiagnostics { code, language });
    }
    Ok(candidate)
}

#[cfg(test)]
mod tests {
    use rzls_templates::Language;

    use super::*;

    fn candidate<'a>(document: &'a HybridDocument, edits: Vec<TextEdit>) -> Candidate<'a> {
        Candidate::new(document, edits).unwrap()
    }

    #[test]
    fn layout_changes_pass() {
        let document = parse_document("<p>\nx</p>");
        let edits = vec![TextEdit::insert(4, "    ")];
        let checked = validate_content(candidate(&document, edits))
            .and_then(validate_diagnostics)
            .unwrap();
        assert_eq!(checked.edited, "<p>\n    x</p>");
    }

    #[test]
    fn token_changes_are_rejected() {
        let document = parse_document("@code {\n    int count;\n}");
        let edits = vec![TextEdit::new(Span::new(16, 5), "total")];
        assert_eq!(
            validate_content(candidate(&document, edits)).unwrap_err(),
            Rejection::ContentChanged {
                span: Span::from_bounds(8, 22)
            }
        );

        let joined = vec![TextEdit::delete(Span::new(15, 1))];
        assert!(validate_content(candidate(&document, joined)).is_err());
    }

    #[test]
    fn new_diagnostics_are_rejected() {
        let text = "<p>hi</p>\n@* note *@\n";
        let document = parse_document(text);
        let at = text.rfind('@').unwrap();
        let split = candidate(&document, vec![TextEdit::insert(at, " ")]);
        let split = validate_content(split).unwrap();
        assert_eq!(
            validate_diagnostics(split).unwrap_err(),
            Rejection::NewDiagnostics {
                code: "RZ1001",
                language: Language::Markup
            }
        );
    }

    #[test]
    fn preexisting_diagnostics() {
        let document = parse_document("<div>\n<p>x</p>");
        let edits = vec![TextEdit::insert(0, " "), TextEdit::insert(6, "    ")];
        assert_eq!(
            filter_preexisting(&document, edits.clone(), false).unwrap_err(),
            Rejection::PreexistingDiagnostics { count: 1 }
        );
        assert_eq!(
            filter_preexisting(&document, edits, true).unwrap(),
            [TextEdit::insert(6, "    ")]
        );
    }
}
