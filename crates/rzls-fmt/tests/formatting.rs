use std::sync::Arc;

use async_trait::async_trait;
use rzls_conf::FormattingOptions;
use rzls_fmt::CancellationToken;
use rzls_fmt::CodeFormatter;
use rzls_fmt::DocumentFormatter;
use rzls_fmt::FormatError;
use rzls_fmt::Formatter;
use rzls_fmt::FormattingRequest;
use rzls_fmt::MarkupFormatter;
use rzls_source::apply_edits;
use rzls_source::Span;
use rzls_source::TextEdit;
use rzls_templates::Language;
use rzls_templates::Projection;

const TODO_PAGE: &str = r#"@page "/todo"
<ul>
@foreach (var item in items)
{
<li>@item.Title</li>
}
</ul>
<input type="text"
value="@newTodo" />
@code {
private List<Todo> items = new();
private string newTodo;
void Add(){
if (!string.IsNullOrWhiteSpace(newTodo)){
items.Add(new Todo { Title = newTodo });
}
}
}
"#;

/// Returns fixed edits in projection coordinates.
struct Fixed(Vec<TextEdit>);

#[async_trait]
impl DocumentFormatter for Fixed {
    fn name(&self) -> &'static str {
        "fixed"
    }

    async fn document_edits(
        &self,
        _projection: &Projection,
        _options: &FormattingOptions,
    ) -> Result<Vec<TextEdit>, FormatError> {
        Ok(self.0.clone())
    }
}

/// Never finishes.
struct Stalled;

#[async_trait]
impl DocumentFormatter for Stalled {
    fn name(&self) -> &'static str {
        "stalled"
    }

    async fn document_edits(
        &self,
        _projection: &Projection,
        _options: &FormattingOptions,
    ) -> Result<Vec<TextEdit>, FormatError> {
        std::future::pending::<()>().await;
        Ok(Vec::new())
    }
}

struct Broken;

#[async_trait]
impl DocumentFormatter for Broken {
    fn name(&self) -> &'static str {
        "broken"
    }

    async fn document_edits(
        &self,
        _projection: &Projection,
        _options: &FormattingOptions,
    ) -> Result<Vec<TextEdit>, FormatError> {
        Err(FormatError::SubFormatter {
            language: Language::Code,
            message: "process exited".to_string(),
        })
    }
}

fn request() -> FormattingRequest {
    FormattingRequest::new(FormattingOptions::default())
}

async fn format_with(formatter: &Formatter, text: &str, request: &FormattingRequest) -> String {
    let edits = formatter
        .format(text, request, &CancellationToken::new())
        .await
        .unwrap();
    apply_edits(text, &edits).unwrap()
}

async fn format(text: &str) -> String {
    format_with(&Formatter::default(), text, &request()).await
}

#[tokio::test]
async fn code_block_indentation_and_braces() {
    let formatted = format("@code {\n public class Foo{}\n}").await;
    insta::assert_snapshot!(formatted, @r"
    @code {
        public class Foo { }
    }
    ");
}

#[tokio::test]
async fn component_document() {
    let formatted = format(TODO_PAGE).await;
    insta::assert_snapshot!(formatted, @r#"
    @page "/todo"
    <ul>
        @foreach (var item in items)
        {
            <li>@item.Title</li>
        }
    </ul>
    <input type="text"
           value="@newTodo" />
    @code {
        private List<Todo> items = new();
        private string newTodo;
        void Add() {
            if (!string.IsNullOrWhiteSpace(newTodo)) {
                items.Add(new Todo { Title = newTodo });
            }
        }
    }
    "#);
}

#[tokio::test]
async fn formatting_is_a_fixed_point() {
    let formatter = Formatter::default();
    let cancel = CancellationToken::new();
    for text in [TODO_PAGE, "@code {\n public class Foo{}\n}", "<p>already</p>\n"] {
        let once = format(text).await;
        let again = formatter.format(&once, &request(), &cancel).await.unwrap();
        assert!(again.is_empty(), "{once}");
    }
}

#[tokio::test]
async fn edits_are_minimal() {
    let edits = Formatter::default()
        .format("<div>\n<p>x</p>\n</div>", &request(), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(edits, [TextEdit::insert(6, "    ")]);
}

#[tokio::test]
async fn brace_on_next_line() {
    let request = FormattingRequest::new(FormattingOptions {
        code_block_brace_on_next_line: true,
        ..FormattingOptions::default()
    });
    let formatted = format_with(&Formatter::default(), "<div>\n@code {\nint x;\n}\n</div>", &request).await;
    insta::assert_snapshot!(formatted, @r"
    <div>
        @code
        {
            int x;
        }
    </div>
    ");
}

#[tokio::test]
async fn range_formatting_keeps_edits_inside() {
    let start = TODO_PAGE.find("@code").unwrap();
    let request = request().with_range(Span::from_bounds(start, TODO_PAGE.len()));
    let formatted = format_with(&Formatter::default(), TODO_PAGE, &request).await;

    assert!(formatted.contains("<ul>\n@foreach"));
    assert!(formatted.contains("\nvalue=\"@newTodo\""));
    assert!(formatted.contains("@code {\n    private List<Todo> items"));
}

#[tokio::test]
async fn meaning_changes_are_rejected() {
    let text = "@code {\n    int count;\n}";
    // Projected offsets: the code block starts at document offset 5.
    let rename = Fixed(vec![TextEdit::new(Span::new(11, 5), "total")]);
    let formatter = Formatter::new(Arc::new(rename), Arc::new(MarkupFormatter));
    assert_eq!(format_with(&formatter, text, &request()).await, text);
}

#[tokio::test]
async fn new_diagnostics_are_rejected() {
    let text = "<p>hi</p>\n@* note *@\n";
    let closing = text.rfind('@').unwrap();
    let split = Fixed(vec![TextEdit::insert(closing, " ")]);
    let formatter = Formatter::new(Arc::new(CodeFormatter), Arc::new(split));
    assert_eq!(format_with(&formatter, text, &request()).await, text);
}

#[tokio::test]
async fn preexisting_diagnostics() {
    let text = "<div>\n<p>\ntext</p>";
    assert_eq!(format(text).await, text);

    let request = request().allow_preexisting_diagnostics(true);
    assert_eq!(
        format_with(&Formatter::default(), text, &request).await,
        "<div>\n    <p>\n        text</p>"
    );
}

#[tokio::test]
async fn overlapping_edits_fail_the_request() {
    let text = "@{ x(); }";
    let code = Fixed(vec![TextEdit::new(Span::new(0, 3), "{")]);
    let markup = Fixed(vec![TextEdit::delete(Span::new(2, 3))]);
    let formatter = Formatter::new(Arc::new(code), Arc::new(markup));
    let error = formatter
        .format(text, &request(), &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(error, FormatError::OverlappingEdits { .. }), "{error}");
}

#[tokio::test]
async fn sub_formatter_errors_propagate() {
    let formatter = Formatter::new(Arc::new(Broken), Arc::new(MarkupFormatter));
    let error = formatter
        .format("@{ x(); }", &request(), &CancellationToken::new())
        .await
        .unwrap_err();
    assert_eq!(
        error.to_string(),
        "Code formatter failed: process exited"
    );
}

#[tokio::test]
async fn cancellation() {
    let cancel = CancellationToken::new();
    cancel.cancel();
    let error = Formatter::default()
        .format("<p></p>", &request(), &cancel)
        .await
        .unwrap_err();
    assert_eq!(error, FormatError::Cancelled);

    let formatter = Formatter::new(Arc::new(CodeFormatter), Arc::new(Stalled));
    let cancel = CancellationToken::new();
    let request = request();
    let (result, ()) = tokio::join!(formatter.format("<p></p>", &request, &cancel), async {
        tokio::task::yield_now().await;
        cancel.cancel();
    });
    assert_eq!(result.unwrap_err(), FormatError::Cancelled);
}

#[tokio::test]
async fn on_type_formatting() {
    let formatter = Formatter::default();
    let cancel = CancellationToken::new();
    let request = request();

    let text = "@code {\nvoid F() {\nint x = 1;\n    }\n}";
    let position = text.find(';').unwrap() + 1;
    let edits = formatter
        .format_on_type(text, position, ';', &request, &cancel)
        .await
        .unwrap();
    assert_eq!(
        apply_edits(text, &edits).unwrap(),
        "@code {\nvoid F() {\n        int x = 1;\n    }\n}"
    );

    let text = "@code {\nvoid F() {\nint x = 1;\n}\n}";
    let position = text.find("}\n}").unwrap() + 1;
    let edits = formatter
        .format_on_type(text, position, '}', &request, &cancel)
        .await
        .unwrap();
    assert_eq!(
        apply_edits(text, &edits).unwrap(),
        "@code {\n    void F() {\n        int x = 1;\n    }\n}"
    );

    let text = "<div>\n<p>hi</p>\n<p>no</p>\n</div>";
    let edits = formatter
        .format_on_type(text, 6, '\n', &request, &cancel)
        .await
        .unwrap();
    assert_eq!(
        apply_edits(text, &edits).unwrap(),
        "<div>\n    <p>hi</p>\n<p>no</p>\n</div>"
    );

    let edits = formatter
        .format_on_type(text, 6, 'x', &request, &cancel)
        .await
        .unwrap();
    assert!(edits.is_empty());
}

#[tokio::test]
async fn unmapped_edits_reject_the_request() {
    let text = "<div>\n<p>x</p>\n</div>\n@code {\nint x;\n}\n";
    let stray = Fixed(vec![TextEdit::insert(500, " ")]);
    let formatter = Formatter::new(Arc::new(stray), Arc::new(MarkupFormatter));
    let edits = formatter
        .format(text, &request(), &CancellationToken::new())
        .await
        .unwrap();
    assert!(edits.is_empty(), "{edits:?}");
}

#[tokio::test]
async fn mixed_indentation_is_reindented() {
    let formatted = format("\t<div>\n@if (a)\t{\n<br />\n\t}\n  </div>\n").await;
    assert_eq!(
        formatted,
        "<div>\n    @if (a) {\n        <br />\n    }\n</div>\n"
    );
}

#[tokio::test]
async fn nested_blocks_produce_applicable_edits() {
    let text = "@foreach (var i in xs)\n   {\n  @foreach (var i in xs)\n  {\n@if (a)  {\n   <br />\n }\n }\n }\n   @code {\nint x = 1;\n }\n   <br />\n";
    let formatter = Formatter::default();
    let cancel = CancellationToken::new();
    let edits = formatter.format(text, &request(), &cancel).await.unwrap();
    let once = apply_edits(text, &edits).unwrap();
    let again = formatter.format(&once, &request(), &cancel).await.unwrap();
    assert!(again.is_empty(), "{once}");
}

/// Small deterministic generator for nested block documents.
struct Documents {
    state: u64,
}

impl Documents {
    fn next(&mut self, bound: usize) -> usize {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        usize::try_from(self.state % bound as u64).unwrap()
    }

    fn indent(&mut self) -> &'static str {
        ["", " ", "  ", "   ", "\t", "\t ", "    "][self.next(7)]
    }

    fn markup(&mut self, out: &mut String, depth: usize) {
        for _ in 0..=self.next(3) {
            let indent = self.indent();
            match self.next(if depth < 3 { 5 } else { 2 }) {
                0 => out.push_str(&format!("{indent}<br />\n")),
                1 => out.push_str(&format!("{indent}<p>@item</p>\n")),
                2 => {
                    out.push_str(&format!("{indent}<div>\n"));
                    self.markup(out, depth + 1);
                    let indent = self.indent();
                    out.push_str(&format!("{indent}</div>\n"));
                }
                3 => {
                    let brace = ["{", "  {", "\t{", "\n{"][self.next(4)];
                    out.push_str(&format!("{indent}@if (a){brace}\n"));
                    self.markup(out, depth + 1);
                    let indent = self.indent();
                    out.push_str(&format!("{indent}}}\n"));
                }
                _ => {
                    out.push_str(&format!("{indent}@foreach (var i in xs)\n"));
                    let indent = self.indent();
                    out.push_str(&format!("{indent}{{\n"));
                    self.markup(out, depth + 1);
                    let indent = self.indent();
                    out.push_str(&format!("{indent}}}\n"));
                }
            }
        }
    }

    fn document(&mut self) -> String {
        let mut out = String::new();
        self.markup(&mut out, 0);
        if self.next(2) == 0 {
            let indent = self.indent();
            out.push_str(&format!("{indent}@code {{\n"));
            let indent = self.indent();
            out.push_str(&format!("{indent}int x = 1;\n"));
            let indent = self.indent();
            out.push_str(&format!("{indent}if (a)  {{\n"));
            let indent = self.indent();
            out.push_str(&format!("{indent}x++;\n"));
            let indent = self.indent();
            out.push_str(&format!("{indent}}}\n"));
            let indent = self.indent();
            out.push_str(&format!("{indent}}}\n"));
        }
        out
    }
}

#[tokio::test]
async fn generated_documents_reach_a_fixed_point() {
    let formatter = Formatter::default();
    let cancel = CancellationToken::new();
    let mut documents = Documents {
        state: 0x2545_f491_4f6c_dd1d,
    };
    for _ in 0..500 {
        let text = documents.document();
        let edits = formatter.format(&text, &request(), &cancel).await.unwrap();
        assert!(
            edits.windows(2).all(|pair| pair[0].span.end() <= pair[1].span.start()),
            "{text:?}: {edits:?}"
        );
        let once = apply_edits(&text, &edits).unwrap();
        let again = formatter.format(&once, &request(), &cancel).await.unwrap();
        assert!(again.is_empty(), "{text:?} formatted to {once:?}");
    }
}
