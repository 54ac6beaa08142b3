//! Lexical helpers for embedded C#.
//!
//! Everything here works on bytes: every delimiter of interest is ASCII and
//! UTF-8 continuation bytes never collide with ASCII, so byte offsets found
//! this way are always character boundaries.

use memchr::memchr;
use memchr::memmem;
use rzls_source::Span;

/// A string literal, character literal or comment starting at some offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Literal {
    pub kind: LiteralKind,
    /// Exclusive end offset.
    pub end: usize,
    pub terminated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    String,
    VerbatimString,
    Char,
    LineComment,
    BlockComment,
}

impl Literal {
    /// Whether the literal may continue past a line break.
    #[must_use]
    pub fn is_multiline(&self) -> bool {
        matches!(
            self.kind,
            LiteralKind::VerbatimString | LiteralKind::BlockComment
        )
    }
}

/// Recognise a literal or comment starting exactly at `at`.
#[must_use]
pub fn literal_at(text: &str, at: usize) -> Option<Literal> {
    let bytes = text.as_bytes();
    let rest = bytes.get(at..)?;
    match rest {
        [b'/', b'/', ..] => {
            let end = memchr(b'\n', rest).map_or(bytes.len(), |newline| at + newline);
            Some(Literal {
                kind: LiteralKind::LineComment,
                end,
                terminated: true,
            })
        }
        [b'/', b'*', ..] => {
            let (end, terminated) = match memmem::find(&rest[2..], b"*/") {
                Some(close) => (at + 2 + close + 2, true),
                None => (bytes.len(), false),
            };
            Some(Literal {
                kind: LiteralKind::BlockComment,
                end,
                terminated,
            })
        }
        [b'@', b'"', ..] | [b'$', b'@', b'"', ..] | [b'@', b'$', b'"', ..] => {
            let quote = at + rest.iter().position(|&b| b == b'"')?;
            Some(verbatim_string(bytes, quote))
        }
        [b'$', b'"', ..] => Some(regular_string(bytes, at + 1)),
        [b'"', ..] => Some(regular_string(bytes, at)),
        [b'\'', ..] => char_literal(text, at),
        _ => None,
    }
}

fn verbatim_string(bytes: &[u8], quote: usize) -> Literal {
    let mut i = quote + 1;
    while i < bytes.len() {
        if bytes[i] == b'"' {
            if bytes.get(i + 1) == Some(&b'"') {
                i += 2;
                continue;
            }
            return Literal {
                kind: LiteralKind::VerbatimString,
                end: i + 1,
                terminated: true,
            };
        }
        i += 1;
    }
    Literal {
        kind: LiteralKind::VerbatimString,
        end: bytes.len(),
        terminated: false,
    }
}

fn regular_string(bytes: &[u8], quote: usize) -> Literal {
    let mut i = quote + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => {
                return Literal {
                    kind: LiteralKind::String,
                    end: i + 1,
                    terminated: true,
                }
            }
            b'\n' | b'\r' => break,
            _ => i += 1,
        }
    }
    Literal {
        kind: LiteralKind::String,
        end: i.min(bytes.len()),
        terminated: false,
    }
}

/// `'x'` or an escape such as `'\n'` or `'A'`. A lone apostrophe, as in
/// markup text inside a code block, is not a literal.
fn char_literal(text: &str, at: usize) -> Option<Literal> {
    let rest = text.get(at + 1..)?;
    let body_len = if rest.starts_with('\\') {
        rest.bytes()
            .skip(1)
            .take(9)
            .position(|b| b == b'\'' || b == b'\n')
            .map(|close| close + 1)?
    } else {
        rest.chars().next().filter(|c| *c != '\'' && *c != '\n')?.len_utf8()
    };
    (rest.as_bytes().get(body_len) == Some(&b'\'')).then_some(Literal {
        kind: LiteralKind::Char,
        end: at + 1 + body_len + 1,
        terminated: true,
    })
}

/// Outcome of matching a bracket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BracketMatch {
    /// Offset of the closing bracket, if one was found.
    pub close: Option<usize>,
    /// String literals that ran into a line break or the end of input.
    pub unterminated_strings: Vec<Span>,
}

/// Find the bracket closing the `{`, `(` or `[` at `open`, skipping string
/// literals, character literals and comments.
#[must_use]
pub fn find_matching(text: &str, open: usize) -> BracketMatch {
    let bytes = text.as_bytes();
    let (opener, closer) = match bytes.get(open) {
        Some(b'{') => (b'{', b'}'),
        Some(b'(') => (b'(', b')'),
        Some(b'[') => (b'[', b']'),
        _ => return BracketMatch::default(),
    };

    let mut result = BracketMatch::default();
    let mut depth = 0usize;
    let mut i = open;
    while i < bytes.len() {
        if let Some(literal) = literal_at(text, i) {
            if !literal.terminated
                && matches!(
                    literal.kind,
                    LiteralKind::String | LiteralKind::VerbatimString
                )
            {
                result
                    .unterminated_strings
                    .push(Span::from_bounds(i, literal.end));
            }
            i = literal.end.max(i + 1);
            continue;
        }
        let b = bytes[i];
        if b == opener {
            depth += 1;
        } else if b == closer {
            depth -= 1;
            if depth == 0 {
                result.close = Some(i);
                return result;
            }
        }
        i += 1;
    }
    result
}

/// Spans of every literal and comment in `text`, in order.
#[must_use]
pub fn literal_spans(text: &str) -> Vec<(Span, Literal)> {
    let mut spans = Vec::new();
    let mut i = 0;
    while i < text.len() {
        if let Some(literal) = literal_at(text, i) {
            spans.push((Span::from_bounds(i, literal.end), literal));
            i = literal.end.max(i + 1);
        } else {
            i += 1;
        }
    }
    spans
}

#[must_use]
pub fn is_identifier_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

#[must_use]
pub fn is_identifier_part(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// End of the identifier starting at `at`.
#[must_use]
pub fn identifier_end(bytes: &[u8], at: usize) -> usize {
    bytes[at..]
        .iter()
        .position(|&b| !is_identifier_part(b))
        .map_or(bytes.len(), |len| at + len)
}

/// First offset at or after `at` that is not a space, tab or line break.
#[must_use]
pub fn skip_whitespace(bytes: &[u8], at: usize) -> usize {
    bytes[at.min(bytes.len())..]
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .map_or(bytes.len(), |len| at + len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn braces_in_literals_are_ignored() {
        let text = r#"{ var s = "}"; var c = '}'; /* } */ // }
}"#;
        let found = find_matching(text, 0);
        assert_eq!(found.close, Some(text.len() - 1));
        assert!(found.unterminated_strings.is_empty());
    }

    #[test]
    fn verbatim_strings_span_lines() {
        let text = "(@\"a\"\")\n\" + x)";
        assert_eq!(find_matching(text, 0).close, Some(text.len() - 1));
    }

    #[test]
    fn unterminated_string_is_reported() {
        let text = "{ var s = \"oops;\n}";
        let found = find_matching(text, 0);
        assert_eq!(found.close, Some(text.len() - 1));
        assert_eq!(found.unterminated_strings, [Span::from_bounds(10, 16)]);
    }

    #[test]
    fn apostrophe_in_markup_is_not_a_char_literal() {
        let text = "{ <p>don't</p> }";
        assert_eq!(literal_at(text, 8), None);
        assert_eq!(find_matching(text, 0).close, Some(text.len() - 1));
        assert_eq!(
            literal_at("'\\n'", 0).map(|literal| literal.end),
            Some(4)
        );
    }

    #[test]
    fn missing_close_bracket() {
        assert_eq!(find_matching("{ if (x) {", 0).close, None);
        assert_eq!(find_matching("x", 0), BracketMatch::default());
    }
}
