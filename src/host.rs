use thiserror::Error;

use crate::document::{Node, Position, Range, Selection};

mod memory;

pub use memory::MemoryHost;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("no editable region is active")]
    NoEditableRoot,

    #[error("range does not point into the editable region")]
    InvalidPosition,

    #[error("change notification failed: {0}")]
    NotificationFailed(String),
}

/// The document owner the cloze editor works against. The host owns the
/// tree, the selection and the undo history.
pub trait DocumentHost {
    fn editable_root(&self) -> Option<&Node>;

    fn editable_root_mut(&mut self) -> Option<&mut Node>;

    fn selection(&self) -> Option<&Selection>;

    fn set_selection(&mut self, selection: Selection);

    /// Whether [`DocumentHost::replace_range_atomic`] can be used.
    fn supports_atomic_replace(&self) -> bool;

    /// Replaces `range` with `fragment` as exactly one undo step and returns
    /// the position right after the inserted content. On error the document
    /// is left untouched.
    fn replace_range_atomic(
        &mut self,
        range: &Range,
        fragment: Vec<Node>,
    ) -> Result<Position, HostError>;

    /// Tells listeners the content changed. Best effort.
    fn notify_changed(&mut self) -> Result<(), HostError>;
}

impl<H: DocumentHost + ?Sized> DocumentHost for &mut H {
    fn editable_root(&self) -> Option<&Node> {
        (**self).editable_root()
    }

    fn editable_root_mut(&mut self) -> Option<&mut Node> {
        (**self).editable_root_mut()
    }

    fn selection(&self) -> Option<&Selection> {
        (**self).selection()
    }

    fn set_selection(&mut self, selection: Selection) {
        (**self).set_selection(selection)
    }

    fn supports_atomic_replace(&self) -> bool {
        (**self).supports_atomic_replace()
    }

    fn replace_range_atomic(
        &mut self,
        range: &Range,
        fragment: Vec<Node>,
    ) -> Result<Position, HostError> {
        (**self).replace_range_atomic(range, fragment)
    }

    fn notify_changed(&mut self) -> Result<(), HostError> {
        (**self).notify_changed()
    }
}

/// Undo/redo over whole edit steps.
pub trait UndoManager {
    fn can_undo(&self) -> bool;

    fn can_redo(&self) -> bool;

    /// Reverts the latest step. Returns false when there was nothing to undo.
    fn undo(&mut self) -> bool;

    /// Re-applies the latest undone step. Returns false when there was
    /// nothing to redo.
    fn redo(&mut self) -> bool;

    fn clear_history(&mut self);
}
