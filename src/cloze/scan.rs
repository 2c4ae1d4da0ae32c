use super::{CLOSE, ClozeSpan, SEPARATOR, match_opener, matches_at};

struct OpenSpan {
    open_start: usize,
    content_start: usize,
    ordinal: u32,
    hint_start: Option<usize>,
}

/// Finds every well-formed span in `text` in one pass. Spans come out in the
/// order they close, so nested spans precede the spans around them.
/// Openers that never close are dropped and closers with nothing open are
/// plain text.
pub fn scan(text: &str) -> Vec<ClozeSpan> {
    let chars: Vec<char> = text.chars().collect();
    scan_chars(&chars)
}

/// Like [`scan`], ordered by opening position.
pub fn scan_sorted(text: &str) -> Vec<ClozeSpan> {
    let mut spans = scan(text);
    spans.sort_by_key(|span| span.open_start);
    spans
}

pub(super) fn scan_chars(chars: &[char]) -> Vec<ClozeSpan> {
    let mut stack: Vec<OpenSpan> = Vec::new();
    let mut spans = Vec::new();
    let mut pos = 0;

    while pos < chars.len() {
        if let Some((len, ordinal)) = match_opener(chars, pos) {
            stack.push(OpenSpan {
                open_start: pos,
                content_start: pos + len,
                ordinal,
                hint_start: None,
            });
            pos += len;
            continue;
        }

        // Only the first separator of a span counts; later ones are content.
        if let Some(top) = stack.last_mut() {
            if top.hint_start.is_none() && matches_at(chars, pos, &SEPARATOR) {
                top.hint_start = Some(pos);
                pos += SEPARATOR.len();
                continue;
            }
        }

        if !stack.is_empty() && matches_at(chars, pos, &CLOSE) {
            if let Some(open) = stack.pop() {
                spans.push(ClozeSpan {
                    open_start: open.open_start,
                    content_start: open.content_start,
                    content_end: open.hint_start.unwrap_or(pos),
                    close_end: pos + CLOSE.len(),
                    ordinal: open.ordinal,
                });
            }
            pos += CLOSE.len();
            continue;
        }

        pos += 1;
    }

    if !stack.is_empty() {
        tracing::trace!(unclosed = stack.len(), "dropping unclosed cloze openers");
    }
    spans
}
