use super::{Node, Position, Range};

/// Concatenates all text below `root` in document order.
pub fn flatten(root: &Node) -> String {
    root.text_nodes().map(|(_, text)| text).collect()
}

/// Number of characters in the flat text view of `root`.
pub fn text_len(root: &Node) -> usize {
    root.text_nodes().map(|(_, text)| text.chars().count()).sum()
}

/// Maps a flat character offset to a position inside the first text node
/// whose cumulative length strictly exceeds `offset`. At a boundary between
/// two text nodes this is the start of the later one. Offsets at or past the
/// end of the flat text map to the end of `root`.
pub fn position_at(root: &Node, offset: usize) -> Position {
    let mut remaining = offset;
    for (path, text) in root.text_nodes() {
        let len = text.chars().count();
        if remaining < len {
            return Position::new(path, remaining);
        }
        remaining -= len;
    }
    Position::end_of(root)
}

/// Flat offset of `position`: the length of the flattened clone of everything
/// between the start of `root` and `position`. The live tree is not touched.
pub fn offset_of(root: &Node, position: &Position) -> usize {
    let leading = Range::new(Position::start(), position.clone()).clone_contents(root);
    leading.iter().map(text_len).sum()
}
