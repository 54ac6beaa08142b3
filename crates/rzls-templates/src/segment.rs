use rzls_source::Span;
use serde::Serialize;

/// The two languages a hybrid document interleaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Language {
    Markup,
    Code,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SegmentKind {
    Markup,
    /// `@`, `@code` or `@functions` introducing a code block.
    Transition,
    /// The braced body of `@code`, `@functions` and `@{`, or a whole
    /// control statement such as `if (..) { .. } else { .. }`.
    CodeBlock,
    /// `@(..)` or `@identifier.member(args)[index]`.
    CodeExpression,
    /// A line directive such as `@using X` or `@page "/"`.
    Directive,
    /// `@* .. *@`
    Comment,
    /// `@@`
    Escape,
}

impl SegmentKind {
    /// The sub-formatter that owns text of this kind.
    #[must_use]
    pub fn language(self) -> Language {
        match self {
            SegmentKind::CodeBlock | SegmentKind::CodeExpression => Language::Code,
            SegmentKind::Markup
            | SegmentKind::Transition
            | SegmentKind::Directive
            | SegmentKind::Comment
            | SegmentKind::Escape => Language::Markup,
        }
    }
}

/// A contiguous run of the document classified as one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub kind: SegmentKind,
    pub span: Span,
    /// Open markup elements enclosing the segment's first byte.
    pub markup_depth: usize,
}

impl Segment {
    #[must_use]
    pub fn new(kind: SegmentKind, span: Span) -> Self {
        Self {
            kind,
            span,
            markup_depth: 0,
        }
    }

    #[must_use]
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.span.as_range()]
    }
}
