use memchr::memchr;
use memchr::memrchr;
use rzls_source::Span;

/// Offset of the first byte of the line containing `offset`.
pub(crate) fn line_start(text: &str, offset: usize) -> usize {
    memrchr(b'\n', &text.as_bytes()[..offset]).map_or(0, |newline| newline + 1)
}

/// Offset of the line break ending the line containing `offset`, or the end
/// of the text.
pub(crate) fn line_end(text: &str, offset: usize) -> usize {
    memchr(b'\n', &text.as_bytes()[offset..]).map_or(text.len(), |newline| offset + newline)
}

pub(crate) fn line_span(text: &str, offset: usize) -> Span {
    Span::from_bounds(line_start(text, offset), line_end(text, offset))
}

/// End of a line's content, before any `\r`.
pub(crate) fn content_end(text: &str, line_start: usize, line_end: usize) -> usize {
    if line_end > line_start && text.as_bytes()[line_end - 1] == b'\r' {
        line_end - 1
    } else {
        line_end
    }
}

/// Iterate `(start, end)` of every line in `text[from..to]`, `end`
/// excluding the line break.
pub(crate) fn lines(text: &str, from: usize, to: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
    let mut next = Some(from);
    std::iter::from_fn(move || {
        let start = next?;
        let end = memchr(b'\n', &text.as_bytes()[start..to]).map_or(to, |newline| start + newline);
        next = (end < to).then_some(end + 1);
        Some((start, end))
    })
}
