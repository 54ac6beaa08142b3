use memchr::memchr;
use memchr::memmem;
use rzls_source::Span;

use crate::scanner::find_matching;
use crate::scanner::identifier_end;
use crate::scanner::is_identifier_start;
use crate::scanner::skip_whitespace;
use crate::scanner::BracketMatch;
use crate::Segment;
use crate::SegmentKind;
use crate::SyntaxDiagnostic;
use crate::SyntaxError;

const CODE_BLOCK_DIRECTIVES: &[&str] = &["code", "functions"];

const CONTROL_KEYWORDS: &[&str] = &[
    "if", "foreach", "for", "while", "switch", "lock", "using", "do", "try",
];

const LINE_DIRECTIVES: &[&str] = &[
    "using",
    "page",
    "inject",
    "inherits",
    "implements",
    "namespace",
    "layout",
    "typeparam",
    "attribute",
    "rendermode",
    "preservewhitespace",
];

/// Keywords that continue a control statement after its closing brace.
fn continuations(keyword: &str) -> &'static [&'static str] {
    match keyword {
        "if" => &["else"],
        "try" => &["catch", "finally"],
        "do" => &["while"],
        _ => &[],
    }
}

/// Splits a document into segments in a single forward pass.
pub(crate) struct Classifier<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
    markup_start: usize,
    in_tag: bool,
    quote: Option<u8>,
    segments: Vec<Segment>,
    diagnostics: Vec<SyntaxDiagnostic>,
}

impl<'a> Classifier<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self {
            text,
            bytes: text.as_bytes(),
            pos: 0,
            markup_start: 0,
            in_tag: false,
            quote: None,
            segments: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub(crate) fn classify(mut self) -> (Vec<Segment>, Vec<SyntaxDiagnostic>) {
        while self.pos < self.bytes.len() {
            let b = self.bytes[self.pos];
            if b == b'@' && self.try_transition() {
                continue;
            }
            self.advance_markup(b);
        }
        self.flush_markup(self.bytes.len());
        (self.segments, self.diagnostics)
    }

    /// Track enough of the markup state to tell directive attributes
    /// (`<input @bind="x">`) apart from code transitions.
    fn advance_markup(&mut self, b: u8) {
        match (self.in_tag, self.quote, b) {
            (true, Some(quote), _) if b == quote => self.quote = None,
            (true, None, b'"' | b'\'') => self.quote = Some(b),
            (true, None, b'>') => self.in_tag = false,
            (false, _, b'<') => {
                if self
                    .bytes
                    .get(self.pos + 1)
                    .is_some_and(|next| next.is_ascii_alphabetic() || *next == b'/')
                {
                    self.in_tag = true;
                    self.quote = None;
                }
            }
            _ => {}
        }
        self.pos += 1;
    }

    fn try_transition(&mut self) -> bool {
        let at = self.pos;
        let previous = at.checked_sub(1).map(|index| self.bytes[index]);

        if self.bytes.get(at + 1) == Some(&b'@') {
            self.push(SegmentKind::Escape, at, at + 2);
            return true;
        }
        if previous.is_some_and(|b| b.is_ascii_alphanumeric()) {
            // Email addresses and the like.
            return false;
        }
        if self.in_tag
            && self.quote.is_none()
            && previous.is_some_and(|b| b.is_ascii_whitespace())
        {
            // Directive attribute name.
            return false;
        }

        match self.bytes.get(at + 1) {
            Some(b'*') => {
                self.comment(at);
                true
            }
            Some(b'(') => {
                self.explicit_expression(at);
                true
            }
            Some(b'{') => {
                self.push(SegmentKind::Transition, at, at + 1);
                self.braced_block(at + 1, at + 1);
                true
            }
            Some(&b) if is_identifier_start(b) => self.keyword_or_expression(at),
            _ => false,
        }
    }

    fn comment(&mut self, at: usize) {
        let end = match memmem::find(&self.bytes[at + 2..], b"*@") {
            Some(close) => at + 2 + close + 2,
            None => {
                self.report(SyntaxError::UnterminatedComment, at, at + 2);
                self.bytes.len()
            }
        };
        self.push(SegmentKind::Comment, at, end);
    }

    fn explicit_expression(&mut self, at: usize) {
        let found = find_matching(self.text, at + 1);
        let end = self.close_or_report(&found, SyntaxError::UnterminatedExpression, at, at + 2);
        self.push(SegmentKind::CodeExpression, at, end);
    }

    fn keyword_or_expression(&mut self, at: usize) -> bool {
        let word_end = identifier_end(self.bytes, at + 1);
        let word = &self.text[at + 1..word_end];
        let after = skip_whitespace(self.bytes, word_end);

        if CODE_BLOCK_DIRECTIVES.contains(&word) && self.bytes.get(after) == Some(&b'{') {
            self.push(SegmentKind::Transition, at, word_end);
            self.braced_block(word_end, after);
            return true;
        }

        let is_using_statement = word == "using" && self.bytes.get(after) == Some(&b'(');
        if CONTROL_KEYWORDS.contains(&word) && (word != "using" || is_using_statement) {
            self.push(SegmentKind::Transition, at, at + 1);
            self.control_statement(at + 1, word, word_end);
            return true;
        }

        if LINE_DIRECTIVES.contains(&word) && self.starts_line(at) {
            let end = self.line_end(at);
            self.push(SegmentKind::Directive, at, end);
            return true;
        }

        let end = self.implicit_expression_end(word, word_end);
        self.push(SegmentKind::CodeExpression, at, end);
        true
    }

    /// A `{ .. }` block; `start` may precede the brace by whitespace.
    fn braced_block(&mut self, start: usize, brace: usize) {
        let found = find_matching(self.text, brace);
        let end = self.close_or_report(&found, SyntaxError::UnterminatedCodeBlock, brace, brace + 1);
        self.push(SegmentKind::CodeBlock, start, end);
    }

    fn control_statement(&mut self, start: usize, keyword: &str, keyword_end: usize) {
        let mut end = keyword_end;
        let mut keyword = keyword;
        loop {
            let mut cursor = skip_whitespace(self.bytes, end);
            if self.bytes.get(cursor) == Some(&b'(') {
                let found = find_matching(self.text, cursor);
                cursor = self.close_or_report(
                    &found,
                    SyntaxError::UnterminatedExpression,
                    cursor,
                    cursor + 1,
                );
                end = cursor;
                cursor = skip_whitespace(self.bytes, cursor);
            }
            if keyword == "while" && self.bytes.get(cursor) == Some(&b';') {
                // Tail of `do { .. } while (..);`
                end = cursor + 1;
                break;
            }
            if self.bytes.get(cursor) != Some(&b'{') {
                break;
            }
            let found = find_matching(self.text, cursor);
            end = self.close_or_report(&found, SyntaxError::UnterminatedCodeBlock, cursor, cursor + 1);
            if found.close.is_none() {
                break;
            }

            let next = skip_whitespace(self.bytes, end);
            let next_end = identifier_end(self.bytes, next.min(self.bytes.len()));
            let next_word = self.text.get(next..next_end).unwrap_or_default();
            if !continuations(keyword).contains(&next_word) {
                break;
            }
            end = next_end;
            keyword = match next_word {
                "else" => {
                    let after_else = skip_whitespace(self.bytes, end);
                    let if_end = identifier_end(self.bytes, after_else.min(self.bytes.len()));
                    if self.text.get(after_else..if_end) == Some("if") {
                        end = if_end;
                        "if"
                    } else {
                        "else"
                    }
                }
                "catch" => "try",
                other => other,
            };
        }
        self.push(SegmentKind::CodeBlock, start, end);
    }

    /// `@name`, `@name.member`, `@name(args)`, `@name[index]`, chained, and
    /// `@await name..`.
    fn implicit_expression_end(&mut self, word: &str, word_end: usize) -> usize {
        let mut end = word_end;
        if word == "await" {
            let next = end + self.bytes[end..].iter().take_while(|b| **b == b' ').count();
            if self.bytes.get(next).is_some_and(|b| is_identifier_start(*b)) {
                end = identifier_end(self.bytes, next);
            }
        }
        loop {
            match self.bytes.get(end) {
                Some(b'(' | b'[') => {
                    let found = find_matching(self.text, end);
                    end = self.close_or_report(&found, SyntaxError::UnterminatedExpression, end, end + 1);
                    if found.close.is_none() {
                        return end;
                    }
                }
                Some(b'.')
                    if self
                        .bytes
                        .get(end + 1)
                        .is_some_and(|b| is_identifier_start(*b)) =>
                {
                    end = identifier_end(self.bytes, end + 1);
                }
                _ => return end,
            }
        }
    }

    /// End offset just past the match, or the end of input after reporting
    /// `error` at `report_start..report_end`.
    fn close_or_report(
        &mut self,
        found: &BracketMatch,
        error: SyntaxError,
        report_start: usize,
        report_end: usize,
    ) -> usize {
        for span in &found.unterminated_strings {
            self.diagnostics
                .push(SyntaxDiagnostic::new(SyntaxError::UnterminatedString, *span));
        }
        if let Some(close) = found.close {
            close + 1
        } else {
            self.report(error, report_start, report_end);
            self.bytes.len()
        }
    }

    fn starts_line(&self, at: usize) -> bool {
        self.bytes[..at]
            .iter()
            .rev()
            .take_while(|b| **b != b'\n')
            .all(|b| *b == b' ' || *b == b'\t')
    }

    fn line_end(&self, at: usize) -> usize {
        let newline = memchr(b'\n', &self.bytes[at..]).map_or(self.bytes.len(), |n| at + n);
        if newline > at && self.bytes[newline - 1] == b'\r' {
            newline - 1
        } else {
            newline
        }
    }

    fn report(&mut self, error: SyntaxError, start: usize, end: usize) {
        self.diagnostics
            .push(SyntaxDiagnostic::new(error, Span::from_bounds(start, end)));
    }

    fn flush_markup(&mut self, end: usize) {
        if end > self.markup_start {
            self.segments.push(Segment::new(
                SegmentKind::Markup,
                Span::from_bounds(self.markup_start, end),
            ));
        }
        self.markup_start = end;
    }

    fn push(&mut self, kind: SegmentKind, start: usize, end: usize) {
        self.flush_markup(start);
        if end > start {
            self.segments
                .push(Segment::new(kind, Span::from_bounds(start, end)));
        }
        self.pos = end.max(start + 1).min(self.bytes.len());
        self.markup_start = self.pos;
    }
}
