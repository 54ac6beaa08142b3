use rzls_source::Span;

use crate::classifier::Classifier;
use crate::markup::scan_markup;
use crate::markup::MarkupScan;
use crate::Language;
use crate::Projection;
use crate::Segment;
use crate::SegmentKind;
use crate::SourceMapping;
use crate::SyntaxDiagnostic;

/// Byte standing in for masked code in the markup projection.
pub const MASK: char = '~';

/// A classified hybrid document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HybridDocument {
    text: String,
    segments: Vec<Segment>,
    diagnostics: Vec<SyntaxDiagnostic>,
    markup: MarkupScan,
}

impl HybridDocument {
    #[tracing::instrument(skip_all, fields(len = text.len()))]
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let (mut segments, mut diagnostics) = Classifier::new(text).classify();
        let masked = mask_code(text, &segments);
        let markup = scan_markup(&masked);

        for segment in &mut segments {
            segment.markup_depth = markup.depth_at(segment.span.start_usize());
        }
        diagnostics.extend(markup.diagnostics().iter().cloned());
        diagnostics.sort_by_key(|diagnostic| diagnostic.span);

        tracing::trace!(
            segments = segments.len(),
            diagnostics = diagnostics.len(),
            "Classified document"
        );
        Self {
            text: text.to_string(),
            segments,
            diagnostics,
            markup,
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[must_use]
    pub fn diagnostics(&self) -> &[SyntaxDiagnostic] {
        &self.diagnostics
    }

    #[must_use]
    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    #[must_use]
    pub fn markup(&self) -> &MarkupScan {
        &self.markup
    }

    /// The segment containing `offset`; the end of the document belongs to
    /// the last segment.
    #[must_use]
    pub fn segment_at(&self, offset: usize) -> Option<&Segment> {
        let index = self
            .segments
            .partition_point(|segment| segment.span.start_usize() <= offset);
        let segment = self.segments.get(index.checked_sub(1)?)?;
        (offset < segment.span.end_usize() || offset == self.text.len()).then_some(segment)
    }

    /// Which sub-formatter owns `offset`.
    #[must_use]
    pub fn language_at(&self, offset: usize) -> Language {
        self.segment_at(offset)
            .map_or(Language::Markup, |segment| segment.kind.language())
    }

    /// Every code block, one after another, each on its own line.
    #[must_use]
    pub fn code_projection(&self) -> Projection {
        let mut text = String::new();
        let mut mappings = Vec::new();
        for segment in self
            .segments
            .iter()
            .filter(|segment| segment.kind == SegmentKind::CodeBlock)
        {
            if !text.is_empty() {
                text.push('\n');
            }
            let start = text.len();
            text.push_str(segment.text(&self.text));
            mappings.push(SourceMapping {
                original: segment.span,
                projected: Span::from_bounds(start, text.len()),
                indent_level: segment.markup_depth,
            });
        }
        Projection::new(Language::Code, text, mappings)
    }

    /// The document with code masked, so markup offsets map by identity.
    #[must_use]
    pub fn markup_projection(&self) -> Projection {
        let text = mask_code(&self.text, &self.segments);
        let mapping = SourceMapping {
            original: Span::from_parts(0, self.text.len()),
            projected: Span::from_parts(0, text.len()),
            indent_level: 0,
        };
        Projection::new(Language::Markup, text, vec![mapping])
    }
}

/// Replace every non-markup byte with [`MASK`], keeping line breaks and the
/// `@` that starts each construct so line starts stay recognisable.
fn mask_code(text: &str, segments: &[Segment]) -> String {
    let mut masked = String::with_capacity(text.len());
    for segment in segments {
        let content = segment.text(text);
        if segment.kind == SegmentKind::Markup {
            masked.push_str(content);
            continue;
        }
        for (index, c) in content.char_indices() {
            match c {
                '\n' | '\r' => masked.push(c),
                '@' if index == 0 => masked.push('@'),
                _ => {
                    // Keep byte offsets stable for multi-byte characters.
                    for _ in 0..c.len_utf8() {
                        masked.push(MASK);
                    }
                }
            }
        }
    }
    masked
}
