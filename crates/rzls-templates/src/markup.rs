//! Element structure of the markup layer.
//!
//! The scanner runs over the markup projection, where code has already been
//! masked, so it never mistakes a `<` in C# for a tag.

use memchr::memmem;
use rzls_source::Span;
use serde::Serialize;

use crate::scanner::skip_whitespace;
use crate::SyntaxDiagnostic;
use crate::SyntaxError;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose content is left exactly as written.
const PRESERVED_ELEMENTS: &[&str] = &["pre", "textarea", "script", "style"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TagKind {
    Start,
    End,
    SelfClosing,
    Void,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub kind: TagKind,
    pub name: String,
    /// From `<` through `>`, or to the end of input when unterminated.
    pub span: Span,
    /// Offset of the first attribute, when the tag has any.
    pub first_attribute: Option<usize>,
}

/// Tags, nesting depth and verbatim regions of a markup text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MarkupScan {
    tags: Vec<Tag>,
    /// `(offset, depth)`: from `offset` on, `depth` elements are open.
    depth_changes: Vec<(usize, usize)>,
    preserved: Vec<Span>,
    diagnostics: Vec<SyntaxDiagnostic>,
}

impl MarkupScan {
    #[must_use]
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Element bodies and comments that must not be reformatted.
    #[must_use]
    pub fn preserved(&self) -> &[Span] {
        &self.preserved
    }

    #[must_use]
    pub fn diagnostics(&self) -> &[SyntaxDiagnostic] {
        &self.diagnostics
    }

    /// Number of elements open at `offset`.
    #[must_use]
    pub fn depth_at(&self, offset: usize) -> usize {
        let index = self
            .depth_changes
            .partition_point(|(change, _)| *change <= offset);
        index
            .checked_sub(1)
            .map_or(0, |index| self.depth_changes[index].1)
    }

    /// The tag whose `<..>` contains `offset`, if any.
    #[must_use]
    pub fn tag_containing(&self, offset: usize) -> Option<&Tag> {
        let index = self
            .tags
            .partition_point(|tag| tag.span.start_usize() <= offset);
        let tag = self.tags.get(index.checked_sub(1)?)?;
        (offset < tag.span.end_usize()).then_some(tag)
    }

    #[must_use]
    pub fn is_preserved(&self, offset: usize) -> bool {
        self.preserved
            .iter()
            .any(|span| offset > span.start_usize() && offset < span.end_usize())
    }
}

/// Scan `text` for tags.
#[must_use]
pub fn scan_markup(text: &str) -> MarkupScan {
    let bytes = text.as_bytes();
    let mut scan = MarkupScan::default();
    let mut stack: Vec<(String, Span)> = Vec::new();
    let mut i = 0;

    while let Some(found) = memchr::memchr(b'<', &bytes[i..]) {
        let at = i + found;
        let rest = &bytes[at..];

        if rest.starts_with(b"<!--") {
            let end = memmem::find(&rest[4..], b"-->").map_or(bytes.len(), |close| at + 4 + close + 3);
            scan.preserved.push(Span::from_bounds(at, end));
            i = end;
            continue;
        }
        if rest.starts_with(b"<!") {
            i = memchr::memchr(b'>', rest).map_or(bytes.len(), |close| at + close + 1);
            continue;
        }

        let is_end = rest.get(1) == Some(&b'/');
        let name_start = at + 1 + usize::from(is_end);
        if !bytes.get(name_start).is_some_and(u8::is_ascii_alphabetic) {
            i = at + 1;
            continue;
        }
        let name_end = name_start
            + bytes[name_start..]
                .iter()
                .position(|b| !(b.is_ascii_alphanumeric() || matches!(b, b'-' | b':' | b'.' | b'_')))
                .unwrap_or(bytes.len() - name_start);
        let name = text[name_start..name_end].to_string();
        let (close, self_closing) = tag_end(bytes, name_end);
        let span = Span::from_bounds(at, close);
        i = close;

        if is_end {
            scan.tags.push(Tag {
                kind: TagKind::End,
                name: name.clone(),
                span,
                first_attribute: None,
            });
            close_element(&mut scan, &mut stack, &name, span);
            scan.depth_changes.push((close, stack.len()));
            continue;
        }

        let first_attribute = {
            let attribute = skip_whitespace(bytes, name_end);
            (attribute < close && !matches!(bytes[attribute], b'>' | b'/')).then_some(attribute)
        };
        let lower = name.to_ascii_lowercase();
        let kind = if self_closing {
            TagKind::SelfClosing
        } else if VOID_ELEMENTS.contains(&lower.as_str()) {
            TagKind::Void
        } else {
            TagKind::Start
        };
        scan.tags.push(Tag {
            kind,
            name: name.clone(),
            span,
            first_attribute,
        });
        if kind != TagKind::Start {
            continue;
        }

        stack.push((name, span));
        scan.depth_changes.push((close, stack.len()));

        if PRESERVED_ELEMENTS.contains(&lower.as_str()) {
            let closing = format!("</{lower}");
            let body_end = find_ignore_case(&bytes[close..], closing.as_bytes())
                .map_or(bytes.len(), |found| close + found);
            scan.preserved.push(Span::from_bounds(close, body_end));
            i = body_end;
        }
    }

    for (name, span) in stack.drain(..).rev() {
        scan.diagnostics.push(SyntaxDiagnostic::new(
            SyntaxError::UnclosedElement { name },
            span,
        ));
    }
    scan.diagnostics.sort_by_key(|diagnostic| diagnostic.span);
    scan
}

/// End of the tag whose name ends at `from`: the offset after `>`, and
/// whether the tag closed with `/>`.
fn tag_end(bytes: &[u8], from: usize) -> (usize, bool) {
    let mut quote = None;
    for (offset, &b) in bytes[from..].iter().enumerate() {
        match (quote, b) {
            (Some(q), _) if b == q => quote = None,
            (Some(_), _) => {}
            (None, b'"' | b'\'') => quote = Some(b),
            (None, b'>') => {
                let at = from + offset;
                let self_closing = at > 0 && bytes[at - 1] == b'/';
                return (at + 1, self_closing);
            }
            (None, _) => {}
        }
    }
    (bytes.len(), false)
}

fn close_element(
    scan: &mut MarkupScan,
    stack: &mut Vec<(String, Span)>,
    name: &str,
    span: Span,
) {
    let Some(index) = stack
        .iter()
        .rposition(|(open, _)| open.eq_ignore_ascii_case(name))
    else {
        scan.diagnostics.push(SyntaxDiagnostic::new(
            SyntaxError::UnexpectedClosingTag {
                name: name.to_string(),
            },
            span,
        ));
        return;
    };
    for (unclosed, start) in stack.drain(index + 1..) {
        scan.diagnostics.push(SyntaxDiagnostic::new(
            SyntaxError::UnclosedElement { name: unclosed },
            start,
        ));
    }
    stack.truncate(index);
}

fn find_ignore_case(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_follows_nesting() {
        let text = "<div>\n  <p>x<br></p>\n  <img />\n</div>";
        let scan = scan_markup(text);
        assert!(scan.diagnostics().is_empty());
        assert_eq!(scan.depth_at(0), 0);
        assert_eq!(scan.depth_at(text.find("<p>").unwrap()), 1);
        assert_eq!(scan.depth_at(text.find('x').unwrap()), 2);
        assert_eq!(scan.depth_at(text.find("<img").unwrap()), 1);
        assert_eq!(scan.depth_at(text.len()), 0);
        let kinds: Vec<_> = scan.tags().iter().map(|tag| tag.kind).collect();
        assert_eq!(
            kinds,
            [
                TagKind::Start,
                TagKind::Start,
                TagKind::Void,
                TagKind::End,
                TagKind::SelfClosing,
                TagKind::End
            ]
        );
    }

    #[test]
    fn quoted_angle_brackets_stay_inside_tag() {
        let scan = scan_markup("<a title=\"a > b\" href='x'>link</a>");
        assert_eq!(scan.tags()[0].span, Span::from_bounds(0, 26));
        assert_eq!(scan.tags()[0].first_attribute, Some(3));
        assert!(scan.diagnostics().is_empty());
    }

    #[test]
    fn preserved_regions() {
        let text = "<pre>\n  <b>keep</b>\n</pre><!-- <div> -->";
        let scan = scan_markup(text);
        assert_eq!(scan.preserved().len(), 2);
        assert!(scan.is_preserved(text.find("<b>").unwrap()));
        assert!(scan.diagnostics().is_empty());
        assert_eq!(scan.tags().len(), 2);
    }

    #[test]
    fn unbalanced_tags_are_reported() {
        let scan = scan_markup("<div><span></div></p>");
        let codes: Vec<_> = scan.diagnostics().iter().map(SyntaxDiagnostic::code).collect();
        assert_eq!(codes, ["RZ1006", "RZ1005"]);

        let scan = scan_markup("<section>");
        assert_eq!(
            scan.diagnostics()[0].error,
            SyntaxError::UnclosedElement {
                name: "section".to_string()
            }
        );
    }

    #[test]
    fn tag_lookup_by_offset() {
        let text = "<input\n  type=\"text\" />";
        let scan = scan_markup(text);
        let tag = scan.tag_containing(text.find("type").unwrap()).unwrap();
        assert_eq!(tag.name, "input");
        assert_eq!(tag.kind, TagKind::SelfClosing);
        assert!(scan.tag_containing(text.len()).is_none());
    }
}
