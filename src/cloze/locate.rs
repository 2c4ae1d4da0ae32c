use super::{CLOSE, ClozeSpan, SEPARATOR, match_opener, matches_at};

/// Finds the innermost span enclosing `position`. A caret on an opener
/// belongs to that opener's span.
pub fn locate(text: &str, position: usize) -> Option<ClozeSpan> {
    let chars: Vec<char> = text.chars().collect();
    locate_chars(&chars, position)
}

pub(super) fn locate_chars(chars: &[char], position: usize) -> Option<ClozeSpan> {
    let candidates = openers_up_to(chars, position);
    for &(open_start, len, ordinal) in candidates.iter().rev() {
        let Some(span) = close_candidate(chars, open_start, len, ordinal) else {
            continue;
        };
        if span.contains(position) {
            tracing::trace!(open_start, close_end = span.close_end, "cloze located");
            return Some(span);
        }
        // Closed before the caret; an outer candidate may still enclose it.
    }
    None
}

/// Openers starting at or before `position`, left to right.
fn openers_up_to(chars: &[char], position: usize) -> Vec<(usize, usize, u32)> {
    let mut openers = Vec::new();
    let mut pos = 0;
    while pos < chars.len() && pos <= position {
        match match_opener(chars, pos) {
            Some((len, ordinal)) => {
                openers.push((pos, len, ordinal));
                pos += len;
            }
            None => pos += 1,
        }
    }
    openers
}

/// Walks forward from the candidate's content with the scanner's nesting
/// rules until its closer.
fn close_candidate(chars: &[char], open_start: usize, len: usize, ordinal: u32) -> Option<ClozeSpan> {
    let content_start = open_start + len;
    let mut depth = 1usize;
    let mut hint_start = None;
    let mut pos = content_start;

    while pos < chars.len() {
        if let Some((nested_len, _)) = match_opener(chars, pos) {
            depth += 1;
            pos += nested_len;
        } else if depth == 1 && hint_start.is_none() && matches_at(chars, pos, &SEPARATOR) {
            hint_start = Some(pos);
            pos += SEPARATOR.len();
        } else if matches_at(chars, pos, &CLOSE) {
            depth -= 1;
            pos += CLOSE.len();
            if depth == 0 {
                return Some(ClozeSpan {
                    open_start,
                    content_start,
                    content_end: hint_start.unwrap_or(pos - CLOSE.len()),
                    close_end: pos,
                    ordinal,
                });
            }
        } else {
            pos += 1;
        }
    }
    None
}
