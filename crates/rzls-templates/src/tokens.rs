use crate::scanner::is_identifier_part;
use crate::scanner::literal_at;
use crate::scanner::LiteralKind;

/// The whitespace-insensitive token stream of `text`.
///
/// Two texts that differ only in layout produce equal streams. String and
/// character literals keep their inner whitespace; comments and unterminated
/// literals drop trailing whitespace.
#[must_use]
pub fn significant_tokens(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if b.is_ascii_whitespace() {
            i += 1;
            continue;
        }
        if let Some(literal) = literal_at(text, i) {
            let token = &text[i..literal.end];
            let trims = !literal.terminated
                || matches!(
                    literal.kind,
                    LiteralKind::LineComment | LiteralKind::BlockComment
                );
            tokens.push(if trims { token.trim_end() } else { token });
            i = literal.end.max(i + 1);
            continue;
        }

        let start = i;
        if is_word_byte(b) {
            while i < bytes.len() && is_word_byte(bytes[i]) {
                i += 1;
            }
        } else if is_operator_byte(b) {
            while i < bytes.len() && is_operator_byte(bytes[i]) && literal_at(text, i).is_none() {
                i += 1;
            }
        } else {
            i += 1;
        }
        tokens.push(&text[start..i]);
    }

    tokens
}

fn is_word_byte(b: u8) -> bool {
    is_identifier_part(b) || !b.is_ascii()
}

fn is_operator_byte(b: u8) -> bool {
    matches!(
        b,
        b'+' | b'-'
            | b'*'
            | b'/'
            | b'%'
            | b'='
            | b'&'
            | b'|'
            | b'^'
            | b'!'
            | b'<'
            | b'>'
            | b'?'
            | b':'
            | b'.'
            | b'~'
            | b'#'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_does_not_matter() {
        assert_eq!(
            significant_tokens("public class Foo{}"),
            significant_tokens("public  class Foo { }\n")
        );
        assert_eq!(
            significant_tokens("if(a==b){x++;}"),
            ["if", "(", "a", "==", "b", ")", "{", "x", "++", ";", "}"]
        );
    }

    #[test]
    fn joining_or_splitting_tokens_is_visible() {
        assert_ne!(significant_tokens("a b"), significant_tokens("ab"));
        assert_ne!(significant_tokens("x + +y"), significant_tokens("x ++y"));
        assert_ne!(
            significant_tokens("\"a b\""),
            significant_tokens("\"a  b\"")
        );
    }

    #[test]
    fn comments_ignore_trailing_space() {
        assert_eq!(
            significant_tokens("x; // note   \ny;"),
            significant_tokens("x; // note\n    y;")
        );
    }

    #[test]
    fn markup_text() {
        assert_eq!(
            significant_tokens("<p class=\"a\">don't</p>"),
            ["<", "p", "class", "=", "\"a\"", ">", "don", "'", "t", "</", "p", ">"]
        );
    }
}
