use rzls_source::Span;
use serde::Serialize;

use crate::Language;

/// Links a span of the hybrid document to the same text in a projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SourceMapping {
    pub original: Span,
    pub projected: Span,
    /// Markup nesting depth enclosing the mapped text.
    pub indent_level: usize,
}

/// The text one sub-formatter sees, with the mappings back to the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Projection {
    language: Language,
    text: String,
    mappings: Vec<SourceMapping>,
}

impl Projection {
    #[must_use]
    pub fn new(language: Language, text: String, mappings: Vec<SourceMapping>) -> Self {
        Self {
            language,
            text,
            mappings,
        }
    }

    #[must_use]
    pub fn language(&self) -> Language {
        self.language
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn mappings(&self) -> &[SourceMapping] {
        &self.mappings
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// The mapping whose projected span contains `offset`. The end offset of
    /// a mapping belongs to it.
    #[must_use]
    pub fn mapping_at(&self, offset: usize) -> Option<&SourceMapping> {
        self.mappings.iter().find(|mapping| {
            offset >= mapping.projected.start_usize() && offset <= mapping.projected.end_usize()
        })
    }

    /// Translate a projected span to document offsets. Spans that leave
    /// their mapping have no original location.
    #[must_use]
    pub fn to_original(&self, span: Span) -> Option<Span> {
        let mapping = self.mapping_at(span.start_usize())?;
        if span.end() > mapping.projected.end() {
            return None;
        }
        let start = mapping.original.start() + (span.start() - mapping.projected.start());
        Some(Span::new(start, span.length()))
    }

    /// Translate a document offset into the projection.
    #[must_use]
    pub fn to_projected(&self, offset: usize) -> Option<usize> {
        self.mappings.iter().find_map(|mapping| {
            (offset >= mapping.original.start_usize() && offset <= mapping.original.end_usize())
                .then(|| mapping.projected.start_usize() + (offset - mapping.original.start_usize()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projection() -> Projection {
        Projection::new(
            Language::Code,
            "{ a }\n{ b }".to_string(),
            vec![
                SourceMapping {
                    original: Span::new(10, 5),
                    projected: Span::new(0, 5),
                    indent_level: 0,
                },
                SourceMapping {
                    original: Span::new(40, 5),
                    projected: Span::new(6, 5),
                    indent_level: 2,
                },
            ],
        )
    }

    #[test]
    fn maps_both_ways() {
        let projection = projection();
        assert_eq!(projection.to_original(Span::new(7, 1)), Some(Span::new(41, 1)));
        assert_eq!(projection.to_original(Span::new(5, 0)), Some(Span::new(15, 0)));
        assert_eq!(projection.to_projected(42), Some(8));
        assert_eq!(projection.to_projected(20), None);
        assert_eq!(projection.mapping_at(9).map(|m| m.indent_level), Some(2));
    }

    #[test]
    fn spans_crossing_mappings_are_unmapped() {
        assert_eq!(projection().to_original(Span::new(3, 5)), None);
    }
}
