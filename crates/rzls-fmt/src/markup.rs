use async_trait::async_trait;
use rzls_conf::AttributeIndentStyle;
use rzls_conf::FormattingOptions;
use rzls_source::Span;
use rzls_source::TextEdit;
use rzls_templates::scan_markup;
use rzls_templates::MarkupScan;
use rzls_templates::Projection;
use rzls_templates::MASK;

use crate::lines::content_end;
use crate::lines::line_end;
use crate::lines::line_start;
use crate::lines::lines;
use crate::DocumentFormatter;
use crate::FormatError;

/// Default formatter for the markup layer.
///
/// Works on the masked projection: lines that begin with masked code are
/// left to the code formatter.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkupFormatter;

#[async_trait]
impl DocumentFormatter for MarkupFormatter {
    fn name(&self) -> &'static str {
        "markup"
    }

    async fn document_edits(
        &self,
        projection: &Projection,
        options: &FormattingOptions,
    ) -> Result<Vec<TextEdit>, FormatError> {
        Ok(Layout::new(projection.text(), options).edits())
    }
}

struct Layout<'a> {
    text: &'a str,
    scan: MarkupScan,
    options: &'a FormattingOptions,
}

impl<'a> Layout<'a> {
    fn new(text: &'a str, options: &'a FormattingOptions) -> Self {
        Self {
            text,
            scan: scan_markup(text),
            options,
        }
    }

    fn edits(&self) -> Vec<TextEdit> {
        let mut edits = Vec::new();
        let mut replace = |start: usize, end: usize, text: String| {
            if self.text[start..end] != text {
                edits.push(TextEdit::new(Span::from_bounds(start, end), text));
            }
        };

        for (start, end) in lines(self.text, 0, self.text.len()) {
            let end = content_end(self.text, start, end);
            if self.is_verbatim_line(start) {
                continue;
            }
            let line = &self.text[start..end];
            let trimmed = line.trim_start_matches([' ', '\t']);
            if trimmed.is_empty() {
                replace(start, end, String::new());
                continue;
            }

            let content_start = end - trimmed.len();
            if let Some(indent) = self.line_indent(start) {
                replace(start, content_start, indent);
            }
            let body_end = content_start + trimmed.trim_end_matches([' ', '\t']).len();
            if body_end < end && !self.scan.is_preserved(body_end) {
                replace(body_end, end, String::new());
            }
        }

        edits
    }

    /// Lines starting inside a `<pre>`-like body or a comment, including the
    /// line of the closing tag.
    fn is_verbatim_line(&self, start: usize) -> bool {
        self.scan
            .preserved()
            .iter()
            .any(|span| start > span.start_usize() && start <= span.end_usize())
    }

    /// The indentation a line receives, or `None` when the line is left as
    /// written.
    fn line_indent(&self, start: usize) -> Option<String> {
        if self.is_verbatim_line(start) {
            return None;
        }
        let end = content_end(self.text, start, line_end(self.text, start));
        let line = &self.text[start..end];
        let trimmed = line.trim_start_matches([' ', '\t']);
        if trimmed.is_empty() || trimmed.starts_with(MASK) {
            return None;
        }
        let content_start = end - trimmed.len();

        if let Some(tag) = self
            .scan
            .tag_containing(content_start)
            .filter(|tag| tag.span.start_usize() < content_start)
        {
            let tag_start = tag.span.start_usize();
            let tag_column = self.column_after_format(tag_start);
            let unit = self.options.columns_of(&self.options.indent_unit());
            let columns = if trimmed.starts_with('>') || trimmed.starts_with("/>") {
                tag_column
            } else {
                match self.options.attribute_indent_style {
                    AttributeIndentStyle::AlignWithFirst => tag
                        .first_attribute
                        .filter(|attribute| line_start(self.text, *attribute) == line_start(self.text, tag_start))
                        .map_or(tag_column + unit, |attribute| self.column_after_format(attribute)),
                    AttributeIndentStyle::IndentByOne => tag_column + unit,
                }
            };
            return Some(self.options.indent_columns(columns));
        }

        let depth = self.scan.depth_at(content_start);
        let level = if trimmed.starts_with("</") {
            depth.saturating_sub(1)
        } else {
            depth
        };
        Some(self.options.indent(level))
    }

    /// Visual column of `offset` once its line has been reindented.
    fn column_after_format(&self, offset: usize) -> usize {
        let start = line_start(self.text, offset);
        let prefix = &self.text[start..offset];
        let indent_len = prefix.len() - prefix.trim_start_matches([' ', '\t']).len();
        match self.line_indent(start) {
            Some(indent) => {
                self.options.columns_of(&indent) + self.text[start + indent_len..offset].chars().count()
            }
            None => self.options.columns_of(prefix),
        }
    }
}

#[cfg(test)]
mod tests {
    use rzls_source::apply_edits;

    use super::*;

    fn format_with(text: &str, options: &FormattingOptions) -> String {
        let edits = Layout::new(text, options).edits();
        let formatted = apply_edits(text, &edits).unwrap();
        assert!(
            Layout::new(&formatted, options).edits().is_empty(),
            "not a fixed point"
        );
        formatted
    }

    fn format(text: &str) -> String {
        format_with(text, &FormattingOptions::default())
    }

    #[test]
    fn element_depth() {
        assert_eq!(
            format("<div>\n<p>\ntext  \n</p>\n   </div>\n"),
            "<div>\n    <p>\n        text\n    </p>\n</div>\n"
        );
    }

    #[test]
    fn masked_lines_are_skipped() {
        assert_eq!(
            format("<ul>\n@~~~~~~~\n~\n  ~~~~~~\n~\n</ul>"),
            "<ul>\n    @~~~~~~~\n~\n  ~~~~~~\n~\n</ul>"
        );
    }

    #[test]
    fn attributes_align_with_first() {
        assert_eq!(
            format("<div>\n<input type=\"text\"\nvalue=\"x\"\n/>\n</div>"),
            "<div>\n    <input type=\"text\"\n           value=\"x\"\n    />\n</div>"
        );
        assert_eq!(
            format("<button\nclass=\"a\"\nonclick=\"b\">\nGo\n</button>"),
            "<button\n    class=\"a\"\n    onclick=\"b\">\n    Go\n</button>"
        );
    }

    #[test]
    fn attributes_indent_by_one() {
        let options = FormattingOptions {
            attribute_indent_style: AttributeIndentStyle::IndentByOne,
            ..FormattingOptions::default()
        };
        assert_eq!(
            format_with("<div>\n<input type=\"text\"\nvalue=\"x\" />\n</div>", &options),
            "<div>\n    <input type=\"text\"\n        value=\"x\" />\n</div>"
        );
    }

    #[test]
    fn verbatim_regions() {
        assert_eq!(
            format("<div>\n<pre>\n  keep   \n</pre>\n<!--\n  note   \n-->\n</div>"),
            "<div>\n    <pre>\n  keep   \n</pre>\n    <!--\n  note   \n-->\n</div>"
        );
    }
}
