use crate::document::{Node, Position, Range, Selection, offset_of, position_at, text_len};

use super::{DocumentHost, HostError, UndoManager};

const DEFAULT_MAX_STEPS: usize = 100;

#[derive(Clone, Debug)]
struct Snapshot {
    root: Node,
    selection: Option<Selection>,
}

/// An in-memory host. Every atomic replacement stores a snapshot of the
/// previous state, so one replacement is one undo step.
#[derive(Clone, Debug)]
pub struct MemoryHost {
    root: Option<Node>,
    selection: Option<Selection>,
    atomic: bool,
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    max_steps: usize,
    notifications: usize,
    fail_notifications: bool,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self {
            root: None,
            selection: None,
            atomic: true,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_steps: DEFAULT_MAX_STEPS,
            notifications: 0,
            fail_notifications: false,
        }
    }
}

impl MemoryHost {
    pub fn new(root: Node) -> Self {
        Self {
            root: Some(root),
            ..Self::default()
        }
    }

    /// A host without an editable region.
    pub fn detached() -> Self {
        Self::default()
    }

    pub fn with_atomic_replace(mut self, atomic: bool) -> Self {
        self.atomic = atomic;
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps.max(1);
        self
    }

    pub fn set_fail_notifications(&mut self, fail: bool) {
        self.fail_notifications = fail;
    }

    pub fn root(&self) -> Option<&Node> {
        self.root.as_ref()
    }

    pub fn into_root(self) -> Option<Node> {
        self.root
    }

    pub fn flat_text(&self) -> String {
        self.root.as_ref().map(crate::document::flatten).unwrap_or_default()
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Places a collapsed caret at a flat offset.
    pub fn set_caret(&mut self, offset: usize) {
        if let Some(root) = &self.root {
            self.selection = Some(Selection::caret(position_at(root, offset)));
        }
    }

    /// Selects the flat range `start..end`.
    pub fn select(&mut self, start: usize, end: usize) {
        if let Some(root) = &self.root {
            self.selection = Some(Selection::new(vec![Range::from_offsets(root, start, end)]));
        }
    }

    /// Flat offset of the start of the first selected range.
    pub fn caret_offset(&self) -> Option<usize> {
        let root = self.root.as_ref()?;
        let range = self.selection.as_ref()?.range_at(0)?;
        Some(offset_of(root, &range.start))
    }

    pub fn notifications(&self) -> usize {
        self.notifications
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    fn snapshot(&self, root: Node) -> Snapshot {
        Snapshot {
            root,
            selection: self.selection.clone(),
        }
    }

    fn push_undo(&mut self, snapshot: Snapshot) {
        self.undo_stack.push(snapshot);
        if self.undo_stack.len() > self.max_steps {
            self.undo_stack.remove(0);
        }
        self.redo_stack.clear();
    }

    fn restore(&mut self, snapshot: Snapshot) -> Option<Snapshot> {
        let current = self.root.take()?;
        let previous = Snapshot {
            root: current,
            selection: self.selection.take(),
        };
        self.root = Some(snapshot.root);
        self.selection = snapshot.selection;
        Some(previous)
    }
}

impl DocumentHost for MemoryHost {
    fn editable_root(&self) -> Option<&Node> {
        self.root.as_ref()
    }

    fn editable_root_mut(&mut self) -> Option<&mut Node> {
        self.root.as_mut()
    }

    fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    fn set_selection(&mut self, selection: Selection) {
        self.selection = Some(selection);
    }

    fn supports_atomic_replace(&self) -> bool {
        self.atomic
    }

    fn replace_range_atomic(
        &mut self,
        range: &Range,
        fragment: Vec<Node>,
    ) -> Result<Position, HostError> {
        let root = self.root.as_ref().ok_or(HostError::NoEditableRoot)?;
        if !root.contains_position(&range.start) || !root.contains_position(&range.end) {
            return Err(HostError::InvalidPosition);
        }
        let start = offset_of(root, &range.start);
        if start > offset_of(root, &range.end) {
            return Err(HostError::InvalidPosition);
        }
        let inserted: usize = fragment.iter().map(text_len).sum();

        let before = self.snapshot(root.clone());
        let root = self.root.as_mut().ok_or(HostError::NoEditableRoot)?;
        range.replace_contents(root, fragment);
        let caret = position_at(root, start + inserted);
        self.push_undo(before);
        self.selection = Some(Selection::caret(caret.clone()));
        tracing::debug!(undo_depth = self.undo_stack.len(), "atomic replace committed");
        Ok(caret)
    }

    fn notify_changed(&mut self) -> Result<(), HostError> {
        if self.fail_notifications {
            return Err(HostError::NotificationFailed(
                "listener rejected the change".to_string(),
            ));
        }
        self.notifications += 1;
        Ok(())
    }
}

impl UndoManager for MemoryHost {
    fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    fn undo(&mut self) -> bool {
        let Some(snapshot) = self.undo_stack.pop() else {
            return false;
        };
        match self.restore(snapshot) {
            Some(current) => {
                self.redo_stack.push(current);
                true
            }
            None => false,
        }
    }

    fn redo(&mut self) -> bool {
        let Some(snapshot) = self.redo_stack.pop() else {
            return false;
        };
        match self.restore(snapshot) {
            Some(current) => {
                self.undo_stack.push(current);
                true
            }
            None => false,
        }
    }

    fn clear_history(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{NodePath, flatten};

    fn host() -> MemoryHost {
        MemoryHost::new(Node::root(vec![Node::paragraph(vec![Node::text(
            "one two three",
        )])]))
    }

    #[test]
    fn atomic_replace_records_one_step() {
        let mut host = host();
        let root = host.root().unwrap();
        let range = Range::from_offsets(root, 4, 7);
        let caret = host
            .replace_range_atomic(&range, vec![Node::text("2")])
            .unwrap();
        assert_eq!(host.flat_text(), "one 2 three");
        assert_eq!(host.undo_depth(), 1);
        assert_eq!(offset_of(host.root().unwrap(), &caret), 5);
        assert_eq!(host.caret_offset(), Some(5));
    }

    #[test]
    fn undo_and_redo_restore_snapshots() {
        let mut host = host();
        host.set_caret(4);
        let range = Range::from_offsets(host.root().unwrap(), 4, 7);
        host.replace_range_atomic(&range, Vec::new()).unwrap();
        assert_eq!(host.flat_text(), "one  three");

        assert!(host.undo());
        assert_eq!(host.flat_text(), "one two three");
        assert_eq!(host.caret_offset(), Some(4));
        assert!(host.can_redo());

        assert!(host.redo());
        assert_eq!(host.flat_text(), "one  three");
        assert!(!host.redo());
    }

    #[test]
    fn invalid_ranges_leave_the_document_alone() {
        let mut host = host();
        let bad = Range::collapsed(Position::new(NodePath::new(vec![4, 0]), 0));
        assert_eq!(
            host.replace_range_atomic(&bad, vec![Node::text("x")]),
            Err(HostError::InvalidPosition)
        );
        assert_eq!(host.flat_text(), "one two three");
        assert!(!host.can_undo());
    }

    #[test]
    fn reversed_ranges_are_rejected() {
        let mut host = host();
        let root = host.root().unwrap();
        let reversed = Range::new(
            crate::document::position_at(root, 7),
            crate::document::position_at(root, 4),
        );
        assert_eq!(
            host.replace_range_atomic(&reversed, Vec::new()),
            Err(HostError::InvalidPosition)
        );
    }

    #[test]
    fn detached_host_has_nothing_to_edit() {
        let mut host = MemoryHost::detached();
        let range = Range::collapsed(Position::start());
        assert_eq!(
            host.replace_range_atomic(&range, Vec::new()),
            Err(HostError::NoEditableRoot)
        );
        assert!(!host.undo());
    }

    #[test]
    fn history_is_bounded() {
        let mut host = host().with_max_steps(2);
        for _ in 0..3 {
            let range = Range::from_offsets(host.root().unwrap(), 0, 1);
            host.replace_range_atomic(&range, Vec::new()).unwrap();
        }
        assert_eq!(host.undo_depth(), 2);
        host.clear_history();
        assert!(!host.can_undo());
        assert_eq!(flatten(host.root().unwrap()), " two three");
    }

    #[test]
    fn failing_notifications_report_an_error() {
        let mut host = host();
        assert!(host.notify_changed().is_ok());
        host.set_fail_notifications(true);
        assert!(matches!(
            host.notify_changed(),
            Err(HostError::NotificationFailed(_))
        ));
        assert_eq!(host.notifications(), 1);
    }
}
