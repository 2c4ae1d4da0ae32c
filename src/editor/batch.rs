use crate::cloze::{ClozeSpan, scan};
use crate::document::{Node, Range, flatten, text_len};

/// Unwraps every cloze below `root`, rightmost first, until none is left.
/// Removing the rightmost span never moves the spans to its left, so each
/// round only needs a fresh scan. Returns whether anything was removed.
pub fn unwrap_all(root: &mut Node) -> bool {
    let mut removed = 0usize;
    loop {
        let text = flatten(root);
        let Some(span) = scan(&text).into_iter().max_by_key(|span| span.open_start) else {
            break;
        };
        let before = text.chars().count();
        unwrap_span(root, &span);
        if text_len(root) >= before {
            tracing::warn!(open_start = span.open_start, "cloze did not shrink, stopping");
            break;
        }
        removed += 1;
    }
    tracing::debug!(removed, "unwrapped clozes");
    removed > 0
}

/// Replaces `span` with its content directly in `root`.
pub fn unwrap_span(root: &mut Node, span: &ClozeSpan) {
    let fragment =
        Range::from_offsets(root, span.content_start, span.content_end).clone_contents(root);
    Range::from_offsets(root, span.open_start, span.close_end).replace_contents(root, fragment);
}
