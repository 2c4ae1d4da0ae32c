use tdoc::InlineStyle;

mod flatten;
mod range;

pub use flatten::{flatten, offset_of, position_at, text_len};

/// A node of the editable tree. Text nodes carry characters, elements carry
/// structure and contribute nothing to the flat text view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Text(String),
    Element(Element),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    pub kind: ElementKind,
    pub children: Vec<Node>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ElementKind {
    /// The editable region itself, or the root of a detached fragment.
    Root,
    Block(BlockKind),
    Quote,
    OrderedList,
    UnorderedList,
    ListEntry,
    Checklist,
    ChecklistItem {
        checked: bool,
    },
    Inline {
        style: InlineStyle,
        link_target: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockKind {
    Text,
    Header1,
    Header2,
    Header3,
    CodeBlock,
}

impl ElementKind {
    pub fn is_inline(&self) -> bool {
        matches!(self, ElementKind::Inline { .. })
    }

    /// Elements whose children are inline content.
    pub fn holds_inline(&self) -> bool {
        matches!(
            self,
            ElementKind::Block(_) | ElementKind::ChecklistItem { .. } | ElementKind::Inline { .. }
        )
    }
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    pub fn element(kind: ElementKind, children: Vec<Node>) -> Self {
        Node::Element(Element { kind, children })
    }

    pub fn root(children: Vec<Node>) -> Self {
        Node::element(ElementKind::Root, children)
    }

    pub fn paragraph(children: Vec<Node>) -> Self {
        Node::element(ElementKind::Block(BlockKind::Text), children)
    }

    pub fn styled(style: InlineStyle, children: Vec<Node>) -> Self {
        Node::element(
            ElementKind::Inline {
                style,
                link_target: None,
            },
            children,
        )
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Node::Text(_))
    }

    pub fn is_element(&self) -> bool {
        matches!(self, Node::Element(_))
    }

    /// True for text nodes and inline elements.
    pub fn is_inline(&self) -> bool {
        match self {
            Node::Text(_) => true,
            Node::Element(element) => element.kind.is_inline(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(text) => Some(text.as_str()),
            Node::Element(_) => None,
        }
    }

    pub fn kind(&self) -> Option<&ElementKind> {
        match self {
            Node::Text(_) => None,
            Node::Element(element) => Some(&element.kind),
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Text(_) => &[],
            Node::Element(element) => &element.children,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Text(_) => None,
            Node::Element(element) => Some(&mut element.children),
        }
    }

    /// Length used for boundary offsets: characters for text, children for
    /// elements.
    pub fn boundary_len(&self) -> usize {
        match self {
            Node::Text(text) => text.chars().count(),
            Node::Element(element) => element.children.len(),
        }
    }

    pub fn node_at(&self, path: &NodePath) -> Option<&Node> {
        let mut node = self;
        for &idx in path.indices() {
            node = node.children().get(idx)?;
        }
        Some(node)
    }

    /// True when `position` names an existing node and an offset within it.
    pub fn contains_position(&self, position: &Position) -> bool {
        self.node_at(&position.path)
            .is_some_and(|node| position.offset <= node.boundary_len())
    }

    /// Depth-first walk over the text nodes below this node. Every call starts
    /// a fresh walk.
    pub fn text_nodes(&self) -> TextNodes<'_> {
        TextNodes::new(self)
    }
}

pub struct TextNodes<'a> {
    root_text: Option<&'a str>,
    stack: Vec<(&'a [Node], usize)>,
    path: Vec<usize>,
}

impl<'a> TextNodes<'a> {
    fn new(root: &'a Node) -> Self {
        match root {
            Node::Text(text) => Self {
                root_text: Some(text.as_str()),
                stack: Vec::new(),
                path: Vec::new(),
            },
            Node::Element(element) => Self {
                root_text: None,
                stack: vec![(element.children.as_slice(), 0)],
                path: Vec::new(),
            },
        }
    }
}

impl<'a> Iterator for TextNodes<'a> {
    type Item = (NodePath, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(text) = self.root_text.take() {
            return Some((NodePath::default(), text));
        }
        loop {
            let frame = self.stack.last_mut()?;
            let (children, idx) = (frame.0, frame.1);
            if idx >= children.len() {
                self.stack.pop();
                if !self.stack.is_empty() {
                    self.path.pop();
                }
                continue;
            }
            frame.1 += 1;
            match &children[idx] {
                Node::Text(text) => {
                    let mut indices = self.path.clone();
                    indices.push(idx);
                    return Some((NodePath::new(indices), text.as_str()));
                }
                Node::Element(element) => {
                    self.path.push(idx);
                    self.stack.push((element.children.as_slice(), 0));
                }
            }
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodePath {
    indices: Vec<usize>,
}

impl NodePath {
    pub fn new(indices: Vec<usize>) -> Self {
        Self { indices }
    }

    pub fn push(&mut self, idx: usize) {
        self.indices.push(idx);
    }

    pub fn pop(&mut self) {
        self.indices.pop();
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// A boundary point: a character offset inside a text node, or a child index
/// inside an element. Only valid until the next mutation of the tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    pub path: NodePath,
    pub offset: usize,
}

impl Position {
    pub fn new(path: NodePath, offset: usize) -> Self {
        Self { path, offset }
    }

    /// The boundary before the first child of the root.
    pub fn start() -> Self {
        Self::new(NodePath::default(), 0)
    }

    /// The boundary after the last child of `root`.
    pub fn end_of(root: &Node) -> Self {
        Self::new(NodePath::default(), root.boundary_len())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    pub fn collapsed(position: Position) -> Self {
        Self {
            start: position.clone(),
            end: position,
        }
    }

    /// The range covering all of `root`.
    pub fn covering(root: &Node) -> Self {
        Self::new(Position::start(), Position::end_of(root))
    }

    /// A range between two flat offsets of `root`.
    pub fn from_offsets(root: &Node, start: usize, end: usize) -> Self {
        Self::new(position_at(root, start), position_at(root, end))
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    pub fn collapsed_to_start(&self) -> Self {
        Self::collapsed(self.start.clone())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    ranges: Vec<Range>,
}

impl Selection {
    pub fn new(ranges: Vec<Range>) -> Self {
        Self { ranges }
    }

    pub fn caret(position: Position) -> Self {
        Self::new(vec![Range::collapsed(position)])
    }

    pub fn range_count(&self) -> usize {
        self.ranges.len()
    }

    pub fn range_at(&self, idx: usize) -> Option<&Range> {
        self.ranges.get(idx)
    }

    pub fn is_collapsed(&self) -> bool {
        self.ranges.iter().all(Range::is_collapsed)
    }
}
