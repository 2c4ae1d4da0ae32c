//! Conversion between `tdoc` documents and the editable node tree.

use tdoc::{ChecklistItem, Document, InlineStyle, Paragraph, Span};

use crate::document::{BlockKind, Element, ElementKind, Node};

/// Builds the editable tree for `document`. Text spans become text nodes,
/// styled spans and links become inline elements.
pub fn document_to_node(document: &Document) -> Node {
    Node::root(document.paragraphs.iter().map(paragraph_to_node).collect())
}

/// Builds a document from an editable tree. Inline nodes at block level are
/// wrapped into text paragraphs; blocks in inline position contribute their
/// inline content.
pub fn node_to_document(root: &Node) -> Document {
    let paragraphs = match root {
        Node::Element(element) if element.kind == ElementKind::Root => {
            nodes_to_paragraphs(&element.children)
        }
        other => nodes_to_paragraphs(std::slice::from_ref(other)),
    };
    Document::new().with_paragraphs(paragraphs)
}

fn paragraph_to_node(paragraph: &Paragraph) -> Node {
    match paragraph {
        Paragraph::Text { content } => block(BlockKind::Text, content),
        Paragraph::Header1 { content } => block(BlockKind::Header1, content),
        Paragraph::Header2 { content } => block(BlockKind::Header2, content),
        Paragraph::Header3 { content } => block(BlockKind::Header3, content),
        Paragraph::CodeBlock { content } => block(BlockKind::CodeBlock, content),
        Paragraph::Quote { children } => Node::element(
            ElementKind::Quote,
            children.iter().map(paragraph_to_node).collect(),
        ),
        Paragraph::OrderedList { entries } => list(ElementKind::OrderedList, entries),
        Paragraph::UnorderedList { entries } => list(ElementKind::UnorderedList, entries),
        Paragraph::Checklist { items } => Node::element(
            ElementKind::Checklist,
            items.iter().map(checklist_item_to_node).collect(),
        ),
    }
}

fn block(kind: BlockKind, content: &[Span]) -> Node {
    Node::element(ElementKind::Block(kind), spans_to_nodes(content))
}

fn list(kind: ElementKind, entries: &[Vec<Paragraph>]) -> Node {
    let entries = entries
        .iter()
        .map(|entry| {
            Node::element(
                ElementKind::ListEntry,
                entry.iter().map(paragraph_to_node).collect(),
            )
        })
        .collect();
    Node::element(kind, entries)
}

fn checklist_item_to_node(item: &ChecklistItem) -> Node {
    let mut children = spans_to_nodes(&item.content);
    children.extend(item.children.iter().map(checklist_item_to_node));
    Node::element(
        ElementKind::ChecklistItem {
            checked: item.checked,
        },
        children,
    )
}

fn spans_to_nodes(spans: &[Span]) -> Vec<Node> {
    let mut nodes = Vec::new();
    for span in spans {
        let mut inner = Vec::new();
        if !span.text.is_empty() {
            inner.push(Node::text(span.text.as_str()));
        }
        inner.extend(spans_to_nodes(&span.children));

        if span.style == InlineStyle::None && span.link_target.is_none() {
            nodes.extend(inner);
        } else {
            nodes.push(Node::element(
                ElementKind::Inline {
                    style: span.style,
                    link_target: span.link_target.clone(),
                },
                inner,
            ));
        }
    }
    nodes
}

fn nodes_to_paragraphs(nodes: &[Node]) -> Vec<Paragraph> {
    let mut paragraphs = Vec::new();
    let mut loose: Vec<Node> = Vec::new();
    for node in nodes {
        if node.is_inline() {
            loose.push(node.clone());
            continue;
        }
        if !loose.is_empty() {
            paragraphs.push(Paragraph::Text {
                content: leaf_content(&loose),
            });
            loose.clear();
        }
        if let Node::Element(element) = node {
            paragraphs.extend(element_to_paragraphs(element));
        }
    }
    if !loose.is_empty() {
        paragraphs.push(Paragraph::Text {
            content: leaf_content(&loose),
        });
    }
    paragraphs
}

fn element_to_paragraphs(element: &Element) -> Vec<Paragraph> {
    let paragraph = match &element.kind {
        ElementKind::Block(kind) => {
            let content = leaf_content(&element.children);
            match kind {
                BlockKind::Text => Paragraph::Text { content },
                BlockKind::Header1 => Paragraph::Header1 { content },
                BlockKind::Header2 => Paragraph::Header2 { content },
                BlockKind::Header3 => Paragraph::Header3 { content },
                BlockKind::CodeBlock => Paragraph::CodeBlock { content },
            }
        }
        ElementKind::Quote => Paragraph::Quote {
            children: nodes_to_paragraphs(&element.children),
        },
        ElementKind::OrderedList => Paragraph::OrderedList {
            entries: list_entries(&element.children),
        },
        ElementKind::UnorderedList => Paragraph::UnorderedList {
            entries: list_entries(&element.children),
        },
        ElementKind::Checklist => Paragraph::Checklist {
            items: element
                .children
                .iter()
                .filter_map(node_to_checklist_item)
                .collect(),
        },
        ElementKind::ChecklistItem { .. } => Paragraph::Checklist {
            items: node_to_checklist_item(&Node::Element(element.clone()))
                .into_iter()
                .collect(),
        },
        ElementKind::Root | ElementKind::ListEntry => {
            return nodes_to_paragraphs(&element.children);
        }
        ElementKind::Inline { .. } => Paragraph::Text {
            content: leaf_content(std::slice::from_ref(&Node::Element(element.clone()))),
        },
    };
    vec![paragraph]
}

fn list_entries(children: &[Node]) -> Vec<Vec<Paragraph>> {
    children
        .iter()
        .map(|child| match child {
            Node::Element(entry) if entry.kind == ElementKind::ListEntry => {
                nodes_to_paragraphs(&entry.children)
            }
            other => nodes_to_paragraphs(std::slice::from_ref(other)),
        })
        .collect()
}

fn node_to_checklist_item(node: &Node) -> Option<ChecklistItem> {
    let Node::Element(element) = node else {
        return None;
    };
    let checked = match element.kind {
        ElementKind::ChecklistItem { checked } => checked,
        _ => return None,
    };
    let mut content = Vec::new();
    let mut children = Vec::new();
    for child in &element.children {
        match child.kind() {
            Some(ElementKind::ChecklistItem { .. }) => {
                children.extend(node_to_checklist_item(child));
            }
            _ => content.push(child.clone()),
        }
    }
    Some(
        ChecklistItem::new(checked)
            .with_content(leaf_content(&content))
            .with_children(children),
    )
}

/// Inline content of a leaf paragraph. Leaves always carry at least one
/// span.
fn leaf_content(nodes: &[Node]) -> Vec<Span> {
    let mut spans = nodes_to_spans(nodes);
    if spans.is_empty() {
        spans.push(Span::new_text(""));
    }
    spans
}

fn nodes_to_spans(nodes: &[Node]) -> Vec<Span> {
    let mut spans = Vec::new();
    for node in nodes {
        match node {
            Node::Text(text) => spans.push(Span::new_text(text.as_str())),
            Node::Element(element) => match &element.kind {
                ElementKind::Inline { style, link_target } => {
                    let mut span = match element.children.as_slice() {
                        [Node::Text(text)] => Span::new_styled(*style).with_text(text.as_str()),
                        children => Span::new_styled(*style).with_children(nodes_to_spans(children)),
                    };
                    span.link_target = link_target.clone();
                    spans.push(span);
                }
                _ => spans.extend(nodes_to_spans(&element.children)),
            },
        }
    }
    spans
}
