use std::ops;

use super::{Element, Node, NodePath, Position, Range};

/// A boundary relative to the node being visited. `None` means the range is
/// unbounded on that side within the node.
type Bound<'a> = Option<(&'a [usize], usize)>;

impl Range {
    /// Copies the content between the boundaries. Elements cut by a boundary
    /// are cloned shallowly around their contained part, so inline formatting
    /// around partial content is kept.
    pub fn clone_contents(&self, root: &Node) -> Vec<Node> {
        clone_between(root, bound(&self.start), bound(&self.end))
    }

    /// Removes the content of the range. Returns the empty range left
    /// between the two remnants; replacing its contents joins the remnants
    /// with the inserted nodes the same way `replace_contents` does.
    pub fn delete_contents(&self, root: &mut Node) -> Range {
        delete_between(root, bound(&self.start), bound(&self.end));
        self.gap_after_delete()
    }

    fn gap_after_delete(&self) -> Range {
        let start = self.start.path.indices();
        let end = self.end.path.indices();
        let depth = start.iter().zip(end).take_while(|(a, b)| a == b).count();
        // Children kept on the start side at the level where the paths part.
        let kept = match start.get(depth) {
            Some(idx) => idx + 1,
            None => self.start.offset,
        };
        if depth == end.len() {
            if depth == start.len() {
                return self.collapsed_to_start();
            }
            let end = Position::new(self.end.path.clone(), kept);
            return Range::new(self.start.clone(), end);
        }
        // Everything in front of the end-side remnant is gone, so the
        // remnant starts at index 0 on every level below the split.
        let mut path = end[..depth].to_vec();
        path.push(kept);
        path.resize(end.len(), 0);
        Range::new(self.start.clone(), Position::new(NodePath::new(path), 0))
    }

    /// Replaces the content of the range with `fragment` in one pass. Nodes
    /// left over on either side of the range are joined with the fragment
    /// where their kinds allow it.
    pub fn replace_contents(&self, root: &mut Node, fragment: Vec<Node>) {
        tracing::trace!(
            fragment_nodes = fragment.len(),
            start = ?self.start,
            end = ?self.end,
            "replacing range contents"
        );
        replace_between(root, bound(&self.start), bound(&self.end), fragment);
    }
}

fn bound(position: &super::Position) -> Bound<'_> {
    Some((position.path.indices(), position.offset))
}

fn inner(bound: Bound<'_>) -> Bound<'_> {
    bound.map(|(path, offset)| (path.get(1..).unwrap_or(&[]), offset))
}

/// The child index both boundaries descend into, if they share one.
fn shared_child(start: Bound<'_>, end: Bound<'_>) -> Option<usize> {
    match (start, end) {
        (Some(([a, ..], _)), Some(([b, ..], _))) if a == b => Some(*a),
        _ => None,
    }
}

/// How a range divides the children of one element.
struct ChildSplit<'a> {
    /// Start-side child that is cut by the range, with the boundary inside it.
    head: Option<(usize, Bound<'a>)>,
    /// Children entirely inside the range.
    full: ops::Range<usize>,
    /// End-side child that is cut by the range, with the boundary inside it.
    tail: Option<(usize, Bound<'a>)>,
}

impl<'a> ChildSplit<'a> {
    fn new(len: usize, start: Bound<'a>, end: Bound<'a>) -> Self {
        let (head, first_full) = match start {
            None => (None, 0),
            Some(([idx, rest @ ..], offset)) if *idx < len => {
                (Some((*idx, Some((rest, offset)))), idx + 1)
            }
            Some(([], offset)) => (None, offset.min(len)),
            Some(_) => (None, len),
        };
        let (tail, end_full) = match end {
            None => (None, len),
            Some(([idx, rest @ ..], offset)) if *idx < len => (Some((*idx, Some((rest, offset)))), *idx),
            Some(([], offset)) => (None, offset.min(len)),
            Some(_) => (None, len),
        };
        // Reversed boundaries leave nothing to cut.
        let tail = tail.filter(|(idx, _)| *idx >= first_full);
        let head = head.filter(|_| tail.is_some() || end_full >= first_full);
        let end_full = end_full.max(first_full);
        Self {
            head,
            full: first_full..end_full,
            tail,
        }
    }
}

fn clone_between(node: &Node, start: Bound<'_>, end: Bound<'_>) -> Vec<Node> {
    match node {
        Node::Text(text) => {
            let (from, to) = text_bounds(text, start, end);
            let slice = char_slice(text, from, to);
            if slice.is_empty() {
                Vec::new()
            } else {
                vec![Node::Text(slice)]
            }
        }
        Node::Element(element) => {
            if let Some(idx) = shared_child(start, end) {
                return match element.children.get(idx) {
                    Some(child) => clone_between(child, inner(start), inner(end)),
                    None => Vec::new(),
                };
            }
            let split = ChildSplit::new(element.children.len(), start, end);
            let mut cloned = Vec::new();
            if let Some((idx, boundary)) = split.head {
                cloned.extend(partial_clone(&element.children[idx], boundary, None));
            }
            cloned.extend(element.children[split.full.clone()].iter().cloned());
            if let Some((idx, boundary)) = split.tail {
                cloned.extend(partial_clone(&element.children[idx], None, boundary));
            }
            cloned
        }
    }
}

fn partial_clone(node: &Node, start: Bound<'_>, end: Bound<'_>) -> Option<Node> {
    match node {
        Node::Text(_) => clone_between(node, start, end).pop(),
        Node::Element(element) => Some(Node::Element(Element {
            kind: element.kind.clone(),
            children: clone_between(node, start, end),
        })),
    }
}

fn delete_between(node: &mut Node, start: Bound<'_>, end: Bound<'_>) {
    match node {
        Node::Text(text) => {
            let (from, to) = text_bounds(text, start, end);
            remove_chars(text, from, to);
        }
        Node::Element(element) => {
            if let Some(idx) = shared_child(start, end) {
                if let Some(child) = element.children.get_mut(idx) {
                    delete_between(child, inner(start), inner(end));
                }
                return;
            }
            let split = ChildSplit::new(element.children.len(), start, end);
            // End side first: the head index is unaffected by the removals.
            if let Some((idx, boundary)) = split.tail {
                delete_between(&mut element.children[idx], None, boundary);
            }
            element.children.drain(split.full.clone());
            if let Some((idx, boundary)) = split.head {
                delete_between(&mut element.children[idx], boundary, None);
            }
        }
    }
}

fn replace_between(node: &mut Node, start: Bound<'_>, end: Bound<'_>, fragment: Vec<Node>) {
    let element = match node {
        Node::Element(element) => element,
        Node::Text(text) => {
            let (from, to) = text_bounds(text, start, end);
            let inserted: String = fragment.iter().map(super::flatten).collect();
            remove_chars(text, from, to);
            let byte_idx = char_to_byte_idx(text, from);
            text.insert_str(byte_idx, &inserted);
            return;
        }
    };

    if let Some(idx) = shared_child(start, end) {
        match element.children.get(idx) {
            Some(Node::Element(_)) => {
                replace_between(&mut element.children[idx], inner(start), inner(end), fragment);
            }
            Some(Node::Text(text)) => {
                let (from, to) = text_bounds(text, inner(start), inner(end));
                let len = text.chars().count();
                let left = Node::Text(char_slice(text, 0, from));
                let right = Node::Text(char_slice(text, to, len));
                let count = fragment.len();
                let replacement = std::iter::once(left)
                    .chain(fragment)
                    .chain(std::iter::once(right));
                element.children.splice(idx..=idx, replacement);
                join_at(&mut element.children, idx + 1 + count);
                join_at(&mut element.children, idx + 1);
                prune_and_merge(&mut element.children);
            }
            None => {}
        }
        return;
    }

    let split = ChildSplit::new(element.children.len(), start, end);
    let children = &mut element.children;
    if let Some((idx, boundary)) = split.tail {
        delete_between(&mut children[idx], None, boundary);
    }
    children.drain(split.full.clone());
    if let Some((idx, boundary)) = split.head {
        delete_between(&mut children[idx], boundary, None);
    }

    let insert_at = split.full.start;
    let count = fragment.len();
    children.splice(insert_at..insert_at, fragment);

    // Join the fragment to the start-side remnant first. A block that took
    // the first node keeps taking inline nodes that follow it.
    let mut remaining = count;
    if remaining > 0 && split.head.is_some() && join_at(children, insert_at) {
        remaining -= 1;
        while remaining > 0 && block_meets_inline(&children[insert_at - 1], &children[insert_at]) {
            join_at(children, insert_at);
            remaining -= 1;
        }
    }
    // Whatever is left joins the end-side remnant, last node first.
    if remaining > 0 && split.tail.is_some() && join_at(children, insert_at + remaining) {
        remaining -= 1;
        while remaining > 0
            && block_meets_inline(
                &children[insert_at + remaining - 1],
                &children[insert_at + remaining],
            )
        {
            join_at(children, insert_at + remaining);
            remaining -= 1;
        }
    }
    prune_and_merge(children);
}

fn can_join(left: &Node, right: &Node) -> bool {
    match (left, right) {
        (Node::Text(_), Node::Text(_)) => true,
        (Node::Element(l), Node::Element(r)) if l.kind == r.kind => true,
        (Node::Element(l), right) => absorbs_inline(l) && right.is_inline(),
        (left, Node::Element(r)) => absorbs_inline(r) && left.is_inline(),
    }
}

/// True when one side is a block holding inline content and the other side is
/// an inline node it can take in.
fn block_meets_inline(left: &Node, right: &Node) -> bool {
    match (left, right) {
        (Node::Element(l), right) if absorbs_inline(l) => right.is_inline(),
        (left, Node::Element(r)) if absorbs_inline(r) => left.is_inline(),
        _ => false,
    }
}

/// Blocks take neighbouring inline nodes in; inline elements don't, since that
/// would change the formatting of the absorbed content.
fn absorbs_inline(element: &Element) -> bool {
    element.kind.holds_inline() && !element.kind.is_inline()
}

/// Joins `children[idx - 1]` and `children[idx]` when their kinds allow it.
fn join_at(children: &mut Vec<Node>, idx: usize) -> bool {
    if idx == 0 || idx >= children.len() || !can_join(&children[idx - 1], &children[idx]) {
        return false;
    }
    let right = children.remove(idx);
    let left = children.remove(idx - 1);
    children.insert(idx - 1, join(left, right));
    true
}

fn join(left: Node, right: Node) -> Node {
    match (left, right) {
        (Node::Text(mut left), Node::Text(right)) => {
            left.push_str(&right);
            Node::Text(left)
        }
        (Node::Element(mut left), Node::Element(right)) if left.kind == right.kind => {
            let junction = left.children.len();
            left.children.extend(right.children);
            join_at(&mut left.children, junction);
            Node::Element(left)
        }
        (Node::Element(mut left), right) if absorbs_inline(&left) && right.is_inline() => {
            let junction = left.children.len();
            left.children.push(right);
            join_at(&mut left.children, junction);
            Node::Element(left)
        }
        (left, Node::Element(mut right)) if absorbs_inline(&right) && left.is_inline() => {
            right.children.insert(0, left);
            join_at(&mut right.children, 1);
            Node::Element(right)
        }
        (left, _) => left,
    }
}

/// Drops empty text nodes and empty inline elements, then merges adjacent
/// text nodes and adjacent inline elements of the same kind.
fn prune_and_merge(children: &mut Vec<Node>) {
    let mut idx = 0;
    while idx < children.len() {
        if let Node::Element(element) = &mut children[idx] {
            prune_and_merge(&mut element.children);
        }
        if is_empty_inline(&children[idx]) {
            children.remove(idx);
        } else {
            idx += 1;
        }
    }

    let mut i = 0;
    while i + 1 < children.len() {
        if can_merge(&children[i], &children[i + 1]) && join_at(children, i + 1) {
            continue;
        }
        i += 1;
    }
}

fn is_empty_inline(node: &Node) -> bool {
    match node {
        Node::Text(text) => text.is_empty(),
        Node::Element(element) => element.kind.is_inline() && element.children.is_empty(),
    }
}

fn can_merge(left: &Node, right: &Node) -> bool {
    match (left, right) {
        (Node::Text(_), Node::Text(_)) => true,
        (Node::Element(l), Node::Element(r)) => l.kind.is_inline() && l.kind == r.kind,
        _ => false,
    }
}

fn text_bounds(text: &str, start: Bound<'_>, end: Bound<'_>) -> (usize, usize) {
    let len = text.chars().count();
    let from = start.map_or(0, |(_, offset)| offset.min(len));
    let to = end.map_or(len, |(_, offset)| offset.min(len)).max(from);
    (from, to)
}

fn char_slice(text: &str, from: usize, to: usize) -> String {
    let start = char_to_byte_idx(text, from);
    let end = char_to_byte_idx(text, to);
    text[start..end].to_string()
}

fn remove_chars(text: &mut String, from: usize, to: usize) {
    let start = char_to_byte_idx(text, from);
    let end = char_to_byte_idx(text, to);
    if start < end {
        text.drain(start..end);
    }
}

fn char_to_byte_idx(text: &str, char_idx: usize) -> usize {
    if char_idx == 0 {
        return 0;
    }
    for (count, (byte_idx, _)) in text.char_indices().enumerate() {
        if count == char_idx {
            return byte_idx;
        }
    }
    text.len()
}
