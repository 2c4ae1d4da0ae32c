use crate::cloze::{locate, scan};
use crate::document::{Node, Range, Selection, flatten, offset_of, text_len};
use crate::host::DocumentHost;

mod batch;
mod replace;

pub use batch::{unwrap_all, unwrap_span};
pub use replace::replace_span;

use replace::commit;

/// Removes cloze markup around the caret or inside the selection of a
/// [`DocumentHost`].
pub struct ClozeEditor<H> {
    host: H,
}

impl<H: DocumentHost> ClozeEditor<H> {
    pub fn new(host: H) -> Self {
        Self { host }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    /// The entry point for menu actions and shortcuts.
    pub fn remove_clozes(&mut self) -> bool {
        self.remove_in_selection()
    }

    /// Unwraps the innermost cloze around the caret. A selection is collapsed
    /// to its start first, so a selection reaching into a nested cloze never
    /// removes the cloze around it.
    pub fn remove_at_cursor(&mut self) -> bool {
        let Some(range) = self.current_range() else {
            return false;
        };
        let caret = if range.is_collapsed() {
            range
        } else {
            let collapsed = range.collapsed_to_start();
            self.host
                .set_selection(Selection::new(vec![collapsed.clone()]));
            collapsed
        };

        let Some(root) = self.host.editable_root() else {
            return false;
        };
        let text = flatten(root);
        let offset = offset_of(root, &caret.start);
        let Some(span) = locate(&text, offset) else {
            tracing::debug!(offset, "no cloze at caret");
            return false;
        };
        tracing::debug!(offset, ordinal = span.ordinal, "removing cloze at caret");
        replace_span(&mut self.host, &span)
    }

    /// Unwraps every cloze entirely inside the selection as one edit. Falls
    /// back to [`ClozeEditor::remove_at_cursor`] when the selection is
    /// collapsed or contains no complete cloze.
    pub fn remove_in_selection(&mut self) -> bool {
        let Some(range) = self.current_range() else {
            return false;
        };
        if range.is_collapsed() {
            return self.remove_at_cursor();
        }

        let Some(root) = self.host.editable_root() else {
            return false;
        };
        let mut detached = Node::root(range.clone_contents(root));
        if scan(&flatten(&detached)).is_empty() {
            tracing::debug!("selection holds no complete cloze");
            return self.remove_at_cursor();
        }

        let start = offset_of(root, &range.start);
        unwrap_all(&mut detached);
        let fragment = match detached {
            Node::Element(element) => element.children,
            text @ Node::Text(_) => vec![text],
        };
        let caret_offset = start + fragment.iter().map(text_len).sum::<usize>();
        tracing::debug!(start, caret_offset, "replacing selection");
        commit(&mut self.host, &range, fragment, caret_offset)
    }

    /// The first selected range, when there is an editable region at all.
    fn current_range(&self) -> Option<Range> {
        self.host.editable_root()?;
        let selection = self.host.selection()?;
        let range = selection.range_at(0).cloned();
        if range.is_none() {
            tracing::debug!("selection has no ranges");
        }
        range
    }
}

#[cfg(test)]
#[path = "editor_tests.rs"]
mod editor_tests;
