use annotate_snippets::AnnotationKind;
use annotate_snippets::Level;
use annotate_snippets::Renderer;
use annotate_snippets::Snippet;

use crate::Span;

/// Severity label printed in a rendered report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// A diagnostic ready for rendering against its source text.
///
/// Callers extract span, code and message from their own diagnostic
/// types and build this struct; rendering is done by [`ReportRenderer`].
#[derive(Debug)]
pub struct Report<'a> {
    pub source: &'a str,
    pub path: &'a str,
    pub code: &'a str,
    pub message: &'a str,
    pub severity: Severity,
    pub span: Span,
    pub label: &'a str,
    pub notes: Vec<&'a str>,
}

impl<'a> Report<'a> {
    #[must_use]
    pub fn error(source: &'a str, path: &'a str, code: &'a str, message: &'a str, span: Span) -> Self {
        Self {
            source,
            path,
            code,
            message,
            severity: Severity::Error,
            span,
            label: "",
            notes: Vec::new(),
        }
    }

    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    #[must_use]
    pub fn label(mut self, label: &'a str) -> Self {
        self.label = label;
        self
    }

    #[must_use]
    pub fn note(mut self, note: &'a str) -> Self {
        self.notes.push(note);
        self
    }
}

/// Renders reports with `annotate-snippets`.
///
/// `plain` output carries no ANSI escapes and is what tests and piped
/// output use; `styled` is for terminals.
#[derive(Debug)]
pub struct ReportRenderer {
    renderer: Renderer,
}

impl ReportRenderer {
    #[must_use]
    pub fn plain() -> Self {
        Self {
            renderer: Renderer::plain(),
        }
    }

    #[must_use]
    pub fn styled() -> Self {
        Self {
            renderer: Renderer::styled(),
        }
    }

    #[must_use]
    pub fn render(&self, report: &Report<'_>) -> String {
        let level = match report.severity {
            Severity::Error => Level::ERROR,
            Severity::Warning => Level::WARNING,
            Severity::Info => Level::INFO,
        };

        // Clamp so a diagnostic at end-of-file still renders.
        let end = report.span.end_usize().min(report.source.len());
        let start = report.span.start_usize().min(end);

        let snippet = Snippet::source(report.source)
            .path(report.path)
            .line_start(1)
            .annotation(
                AnnotationKind::Primary
                    .span(start..end)
                    .label(report.label),
            );

        let mut title = level
            .primary_title(report.message)
            .id(report.code)
            .element(snippet);

        for note in &report.notes {
            title = title.element(Level::NOTE.message(*note));
        }

        let reports = &[title];
        self.renderer.render(reports).clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_code_and_label() {
        let source = "<div>\n@code {\n    int x = 1;\n";
        let report = Report::error(
            source,
            "Pages/Counter.razor",
            "RZ1002",
            "The code block is missing a closing '}'",
            Span::new(12, 1),
        )
        .label("block opened here");

        let output = ReportRenderer::plain().render(&report);

        assert!(output.contains("error[RZ1002]"));
        assert!(output.contains("Pages/Counter.razor"));
        assert!(output.contains("@code {"));
        assert!(output.contains("block opened here"));
    }

    #[test]
    fn renders_notes_and_warning_level() {
        let source = "<p>@*unterminated\n";
        let report = Report::error(source, "a.razor", "RZ1001", "Comment is not closed", Span::new(3, 2))
            .severity(Severity::Warning)
            .note("close the comment with '*@'");

        let output = ReportRenderer::plain().render(&report);

        assert!(output.contains("warning[RZ1001]"));
        assert!(output.contains("close the comment with '*@'"));
    }

    #[test]
    fn span_past_end_is_clamped() {
        let source = "@{";
        let report = Report::error(source, "a.razor", "RZ1002", "unterminated", Span::new(1, 10));
        let output = ReportRenderer::plain().render(&report);
        assert!(output.contains("RZ1002"));
    }
}
