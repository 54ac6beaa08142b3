use rzls_source::Span;
use rzls_source::TextEdit;
use similar::capture_diff_slices;
use similar::Algorithm;
use similar::DiffTag;

/// The smallest edit list turning `old` into `new`, from a character diff.
///
/// Positions come from walking the diff ops in order, so the edits are
/// sorted and never overlap. Adjacent changes are merged into one edit.
pub fn minimal_edits(old: &str, new: &str) -> Vec<TextEdit> {
    let old_chars: Vec<char> = old.chars().collect();
    let new_chars: Vec<char> = new.chars().collect();
    let old_offsets = char_offsets(old);
    let new_offsets = char_offsets(new);

    let mut edits: Vec<TextEdit> = Vec::new();
    let (mut old_at, mut new_at) = (0, 0);
    for op in capture_diff_slices(Algorithm::Myers, &old_chars, &new_chars) {
        let (tag, old_range, new_range) = op.as_tag_tuple();
        let (old_end, new_end) = (old_at + old_range.len(), new_at + new_range.len());
        if tag != DiffTag::Equal {
            let span = Span::from_bounds(old_offsets[old_at], old_offsets[old_end]);
            let inserted = &new[new_offsets[new_at]..new_offsets[new_end]];
            match edits.last_mut() {
                Some(last) if last.span.end() == span.start() => {
                    last.span = last.span.cover(span);
                    last.new_text.push_str(inserted);
                }
                _ => edits.push(TextEdit::new(span, inserted)),
            }
        }
        old_at = old_end;
        new_at = new_end;
    }
    edits
}

/// Byte offset of every character, plus the end of the text.
fn char_offsets(text: &str) -> Vec<usize> {
    text.char_indices()
        .map(|(offset, _)| offset)
        .chain(std::iter::once(text.len()))
        .collect()
}
