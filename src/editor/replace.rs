use crate::cloze::ClozeSpan;
use crate::document::{Node, Range, Selection, position_at};
use crate::host::DocumentHost;

/// Replaces `span` with its content inside the host's editable region. The
/// content is cloned as a fragment, so formatting inside it survives.
/// Returns false without touching anything when the host has no editable
/// region or refuses the edit.
pub fn replace_span<H: DocumentHost + ?Sized>(host: &mut H, span: &ClozeSpan) -> bool {
    let Some(root) = host.editable_root() else {
        return false;
    };
    let fragment =
        Range::from_offsets(root, span.content_start, span.content_end).clone_contents(root);
    let outer = Range::from_offsets(root, span.open_start, span.close_end);
    commit(host, &outer, fragment, span.open_start + span.content_len())
}

/// Puts `fragment` in place of `range`, atomically when the host can do it.
/// Otherwise the range is deleted, the fragment inserted and the caret set to
/// `caret_offset` by hand, which leaves no undo step behind.
pub(crate) fn commit<H: DocumentHost + ?Sized>(
    host: &mut H,
    range: &Range,
    fragment: Vec<Node>,
    caret_offset: usize,
) -> bool {
    if host.supports_atomic_replace() {
        match host.replace_range_atomic(range, fragment) {
            Ok(caret) => host.set_selection(Selection::caret(caret)),
            Err(err) => {
                tracing::debug!(error = %err, "host refused the replacement");
                return false;
            }
        }
    } else {
        let Some(root) = host.editable_root_mut() else {
            return false;
        };
        if !root.contains_position(&range.start) || !root.contains_position(&range.end) {
            tracing::debug!("range no longer points into the document");
            return false;
        }
        tracing::debug!("atomic replace unavailable, deleting and inserting");
        let gap = range.delete_contents(root);
        gap.replace_contents(root, fragment);
        let caret = position_at(root, caret_offset);
        host.set_selection(Selection::caret(caret));
    }

    if let Err(err) = host.notify_changed() {
        tracing::warn!(error = %err, "change notification failed");
    }
    true
}
