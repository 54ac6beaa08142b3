use async_trait::async_trait;
use rzls_conf::FormattingOptions;
use rzls_source::Span;
use rzls_source::TextEdit;
use rzls_templates::scan_markup;
use rzls_templates::scanner::literal_spans;
use rzls_templates::scanner::LiteralKind;
use rzls_templates::Projection;
use rzls_templates::SourceMapping;
use rzls_templates::TagKind;

use crate::lines::content_end;
use crate::lines::lines;
use crate::DocumentFormatter;
use crate::FormatError;

/// Default formatter for the C# blocks of a document.
///
/// Each code block is indented from the markup depth it sits at, one level
/// per open brace. Markup lines inside a block are reindented but otherwise
/// left alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct CodeFormatter;

#[async_trait]
impl DocumentFormatter for CodeFormatter {
    fn name(&self) -> &'static str {
        "code"
    }

    async fn document_edits(
        &self,
        projection: &Projection,
        options: &FormattingOptions,
    ) -> Result<Vec<TextEdit>, FormatError> {
        Ok(format_projection(projection, options))
    }
}

pub(crate) fn format_projection(projection: &Projection, options: &FormattingOptions) -> Vec<TextEdit> {
    projection
        .mappings()
        .iter()
        .flat_map(|mapping| Block::new(projection.text(), mapping, options).format())
        .collect()
}

struct Block<'a> {
    text: &'a str,
    start: usize,
    end: usize,
    level: usize,
    options: &'a FormattingOptions,
    /// Every literal and comment; braces inside them do not count.
    literals: Vec<Span>,
    /// Literals whose inner whitespace is content.
    protected: Vec<Span>,
    depth: usize,
    nested_markup: usize,
    edits: Vec<TextEdit>,
}

impl<'a> Block<'a> {
    fn new(text: &'a str, mapping: &SourceMapping, options: &'a FormattingOptions) -> Self {
        let start = mapping.projected.start_usize();
        let end = mapping.projected.end_usize();
        let mut literals = Vec::new();
        let mut protected = Vec::new();
        for (span, literal) in literal_spans(&text[start..end]) {
            let span = Span::from_bounds(span.start_usize() + start, span.end_usize() + start);
            literals.push(span);
            if literal.kind != LiteralKind::LineComment {
                protected.push(span);
            }
        }
        Self {
            text,
            start,
            end,
            level: mapping.indent_level,
            options,
            literals,
            protected,
            depth: 0,
            nested_markup: 0,
            edits: Vec::new(),
        }
    }

    fn format(mut self) -> Vec<TextEdit> {
        let block = &self.text[self.start..self.end];
        let lead = block.len() - block.trim_start().len();
        let mut body = self.start;
        if lead > 0 && block[lead..].starts_with('{') {
            let replacement = if self.options.code_block_brace_on_next_line {
                format!("\n{}", self.options.indent(self.level))
            } else {
                " ".to_string()
            };
            self.replace(self.start, self.start + lead, replacement);
            body = self.start + lead;
        }

        for (index, (line_start, line_end)) in lines(self.text, body, self.end).enumerate() {
            let line_end = content_end(self.text, line_start, line_end);
            self.format_line(line_start, line_end, index == 0);
        }
        self.edits
    }

    fn format_line(&mut self, line_start: usize, line_end: usize, first: bool) {
        let line = &self.text[line_start..line_end];
        let trimmed = line.trim_start_matches([' ', '\t']);
        let content_start = line_end - trimmed.len();
        let continues_literal = self.is_protected(line_start);

        if trimmed.is_empty() {
            if !line.is_empty() && !continues_literal {
                self.replace(line_start, line_end, "");
            }
            return;
        }

        let is_tag = is_tag_line(trimmed);
        if !first && !continues_literal {
            let dedent = if is_tag {
                trimmed.starts_with("</")
            } else {
                trimmed.starts_with('}')
            };
            let level = (self.level + self.depth + self.nested_markup).saturating_sub(usize::from(dedent));
            self.replace(line_start, content_start, self.options.indent(level));
        }

        let body_end = content_start + trimmed.trim_end_matches([' ', '\t']).len();
        if body_end < line_end && !self.is_protected(body_end) {
            self.replace(body_end, line_end, "");
        }

        if is_tag {
            let scan = scan_markup(trimmed);
            let count = |kind: TagKind| scan.tags().iter().filter(|tag| tag.kind == kind).count();
            self.nested_markup = (self.nested_markup + count(TagKind::Start)).saturating_sub(count(TagKind::End));
            return;
        }

        let bytes = self.text.as_bytes();
        let mut offset = content_start;
        while offset < body_end {
            if let Some(literal) = self.literal_covering(offset) {
                offset = literal.end_usize();
                continue;
            }
            match bytes[offset] {
                b'{' => {
                    self.depth += 1;
                    self.space_before_brace(content_start, offset);
                    if bytes.get(offset + 1) == Some(&b'}') {
                        self.replace(offset + 1, offset + 1, " ");
                    }
                }
                b'}' => self.depth = self.depth.saturating_sub(1),
                _ => {}
            }
            offset += 1;
        }
    }

    /// `Foo{` and `Foo  {` become `Foo {`.
    fn space_before_brace(&mut self, content_start: usize, brace: usize) {
        let bytes = self.text.as_bytes();
        let mut gap = brace;
        while gap > content_start && matches!(bytes[gap - 1], b' ' | b'\t') {
            gap -= 1;
        }
        if gap == content_start
            || matches!(bytes[gap - 1], b'(' | b'[' | b'{' | b'$' | b'@' | b'"' | b'\'')
        {
            return;
        }
        self.replace(gap, brace, " ");
    }

    fn literal_covering(&self, offset: usize) -> Option<Span> {
        self.literals
            .iter()
            .find(|span| span.start_usize() <= offset && offset < span.end_usize())
            .copied()
    }

    fn is_protected(&self, offset: usize) -> bool {
        self.protected
            .iter()
            .any(|span| span.start_usize() < offset && offset < span.end_usize())
    }

    fn replace(&mut self, start: usize, end: usize, text: impl Into<String>) {
        let text = text.into();
        if self.text[start..end] != text {
            self.edits
                .push(TextEdit::new(Span::from_bounds(start, end), text));
        }
    }
}

/// A line of markup written inside a code block, such as `<li>@item</li>`.
fn is_tag_line(trimmed: &str) -> bool {
    let bytes = trimmed.as_bytes();
    bytes.first() == Some(&b'<')
        && bytes
            .get(1)
            .is_some_and(|b| b.is_ascii_alphabetic() || *b == b'/')
}
