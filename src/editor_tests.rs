use tdoc::InlineStyle;

use super::*;
use crate::host::{MemoryHost, UndoManager};

const NESTED: &str = "{{c1::outer {{c2::inner}} tail}}";

fn paragraph_root(text: &str) -> Node {
    Node::root(vec![Node::paragraph(vec![Node::text(text)])])
}

fn editor_at(text: &str, caret: usize) -> ClozeEditor<MemoryHost> {
    let mut host = MemoryHost::new(paragraph_root(text));
    host.set_caret(caret);
    ClozeEditor::new(host)
}

fn editor_selecting(root: Node, start: usize, end: usize) -> ClozeEditor<MemoryHost> {
    let mut host = MemoryHost::new(root);
    host.select(start, end);
    ClozeEditor::new(host)
}

#[test]
fn removes_cloze_around_caret_as_one_step() {
    let mut editor = editor_at("ab {{c1::xy}} cd", 10);
    assert!(editor.remove_clozes());
    let host = editor.host();
    assert_eq!(host.flat_text(), "ab xy cd");
    assert_eq!(host.undo_depth(), 1);
    assert_eq!(host.caret_offset(), Some(5));
    assert_eq!(host.notifications(), 1);
}

#[test]
fn caret_outside_any_cloze_changes_nothing() {
    let mut editor = editor_at("ab {{c1::xy}} cd", 1);
    assert!(!editor.remove_clozes());
    let host = editor.host();
    assert_eq!(host.flat_text(), "ab {{c1::xy}} cd");
    assert_eq!(host.undo_depth(), 0);
    assert_eq!(host.notifications(), 0);
}

#[test]
fn second_removal_at_same_place_finds_nothing() {
    let mut editor = editor_at("ab {{c1::xy}} cd", 10);
    assert!(editor.remove_clozes());
    assert!(!editor.remove_clozes());
    assert_eq!(editor.host().flat_text(), "ab xy cd");
    assert_eq!(editor.host().undo_depth(), 1);
}

#[test]
fn hint_is_dropped() {
    let mut editor = editor_at("{{c1::answer::hint text}}", 8);
    assert!(editor.remove_clozes());
    assert_eq!(editor.host().flat_text(), "answer");
}

#[test]
fn caret_in_inner_cloze_removes_only_inner() {
    let mut editor = editor_at(NESTED, 20);
    assert!(editor.remove_clozes());
    assert_eq!(editor.host().flat_text(), "{{c1::outer inner tail}}");
}

#[test]
fn caret_beside_inner_cloze_removes_outer() {
    let mut editor = editor_at(NESTED, 11);
    assert!(editor.remove_clozes());
    assert_eq!(editor.host().flat_text(), "outer {{c2::inner}} tail");

    let mut editor = editor_at(NESTED, 27);
    assert!(editor.remove_clozes());
    assert_eq!(editor.host().flat_text(), "outer {{c2::inner}} tail");
}

#[test]
fn formatting_inside_content_survives() {
    let root = Node::root(vec![Node::paragraph(vec![
        Node::text("{{c1::"),
        Node::styled(InlineStyle::Bold, vec![Node::text("bold")]),
        Node::text("}}"),
    ])]);
    let mut host = MemoryHost::new(root);
    host.set_caret(7);
    let mut editor = ClozeEditor::new(host);
    assert!(editor.remove_clozes());
    assert_eq!(
        editor.host().root(),
        Some(&Node::root(vec![Node::paragraph(vec![Node::styled(
            InlineStyle::Bold,
            vec![Node::text("bold")]
        )])]))
    );
    assert_eq!(editor.host().caret_offset(), Some(4));
}

#[test]
fn cloze_spanning_paragraphs_keeps_both_paragraphs() {
    let root = Node::root(vec![
        Node::paragraph(vec![Node::text("{{c1::first")]),
        Node::paragraph(vec![Node::text("second}} after")]),
    ]);
    let mut host = MemoryHost::new(root);
    host.set_caret(8);
    let mut editor = ClozeEditor::new(host);
    assert!(editor.remove_clozes());
    assert_eq!(
        editor.host().root(),
        Some(&Node::root(vec![
            Node::paragraph(vec![Node::text("first")]),
            Node::paragraph(vec![Node::text("second after")]),
        ]))
    );
}

#[test]
fn selection_over_siblings_removes_both_in_one_step() {
    let mut editor = editor_selecting(paragraph_root("{{c1::a}} and {{c2::b}}"), 0, 23);
    assert!(editor.remove_clozes());
    let host = editor.host();
    assert_eq!(host.flat_text(), "a and b");
    assert_eq!(host.undo_depth(), 1);
    assert_eq!(host.caret_offset(), Some(7));
    assert_eq!(host.notifications(), 1);
}

#[test]
fn selection_over_nested_clozes_removes_all_levels() {
    let mut editor = editor_selecting(paragraph_root(&format!("x {NESTED} y")), 0, 36);
    assert!(editor.remove_clozes());
    assert_eq!(editor.host().flat_text(), "x outer inner tail y");
    assert_eq!(editor.host().undo_depth(), 1);
}

#[test]
fn selection_across_paragraphs() {
    let root = Node::root(vec![
        Node::paragraph(vec![Node::text("{{c1::a}} x")]),
        Node::paragraph(vec![Node::text("y {{c2::b}}")]),
    ]);
    let mut editor = editor_selecting(root, 0, 22);
    assert!(editor.remove_clozes());
    assert_eq!(
        editor.host().root(),
        Some(&Node::root(vec![
            Node::paragraph(vec![Node::text("a x")]),
            Node::paragraph(vec![Node::text("y b")]),
        ]))
    );
    assert_eq!(editor.host().undo_depth(), 1);
}

#[test]
fn selection_crossing_one_boundary_falls_back_to_caret() {
    let mut editor = editor_selecting(paragraph_root("x {{c1::abc}} {{c2::def}}"), 9, 21);
    assert!(editor.remove_clozes());
    let host = editor.host();
    assert_eq!(host.flat_text(), "x abc {{c2::def}}");
    assert_eq!(host.undo_depth(), 1);
    assert_eq!(host.caret_offset(), Some(5));
}

#[test]
fn selection_without_cloze_and_caret_outside_is_a_no_op() {
    let mut editor = editor_selecting(paragraph_root("ab {{c1::x}}"), 0, 5);
    assert!(!editor.remove_clozes());
    assert_eq!(editor.host().flat_text(), "ab {{c1::x}}");
    assert_eq!(editor.host().caret_offset(), Some(0));
}

#[test]
fn remove_at_cursor_collapses_selection_to_start() {
    let mut editor = editor_selecting(paragraph_root("{{c1::a {{c2::b}}}}"), 6, 16);
    assert!(editor.remove_at_cursor());
    assert_eq!(editor.host().flat_text(), "a {{c2::b}}");
}

#[test]
fn collapsed_selection_delegates_to_caret_removal() {
    let mut editor = editor_selecting(paragraph_root("{{c1::a}}"), 7, 7);
    assert!(editor.remove_in_selection());
    assert_eq!(editor.host().flat_text(), "a");
}

#[test]
fn undo_restores_original_tree() {
    let original = paragraph_root(NESTED);
    let mut host = MemoryHost::new(original.clone());
    host.set_caret(20);
    let mut editor = ClozeEditor::new(host);
    assert!(editor.remove_clozes());
    let host = editor.host_mut();
    assert!(host.undo());
    assert_eq!(host.root(), Some(&original));
    assert_eq!(host.caret_offset(), Some(20));
    assert!(host.redo());
    assert_eq!(host.flat_text(), "{{c1::outer inner tail}}");
}

#[test]
fn degraded_mode_edits_without_undo_step() {
    let mut host = MemoryHost::new(paragraph_root("ab {{c1::xy}} cd")).with_atomic_replace(false);
    host.set_caret(10);
    let mut editor = ClozeEditor::new(host);
    assert!(editor.remove_clozes());
    let host = editor.host();
    assert_eq!(host.flat_text(), "ab xy cd");
    assert_eq!(host.undo_depth(), 0);
    assert_eq!(host.caret_offset(), Some(5));
    assert_eq!(host.notifications(), 1);
}

#[test]
fn degraded_mode_selection_matches_atomic_result() {
    let root = Node::root(vec![
        Node::paragraph(vec![Node::text("{{c1::a}} x")]),
        Node::paragraph(vec![Node::text("y {{c2::b}}")]),
    ]);
    let mut atomic = editor_selecting(root.clone(), 0, 22);
    assert!(atomic.remove_clozes());

    let mut host = MemoryHost::new(root).with_atomic_replace(false);
    host.select(0, 22);
    let mut degraded = ClozeEditor::new(host);
    assert!(degraded.remove_clozes());

    assert_eq!(degraded.host().root(), atomic.host().root());
    assert_eq!(degraded.host().caret_offset(), Some(6));
}

#[test]
fn failed_notification_keeps_the_edit() {
    let mut host = MemoryHost::new(paragraph_root("{{c1::kept}}"));
    host.set_caret(7);
    host.set_fail_notifications(true);
    let mut editor = ClozeEditor::new(host);
    assert!(editor.remove_clozes());
    assert_eq!(editor.host().flat_text(), "kept");
    assert_eq!(editor.host().undo_depth(), 1);
    assert_eq!(editor.host().notifications(), 0);
}

#[test]
fn missing_targets_are_silent_no_ops() {
    let mut editor = ClozeEditor::new(MemoryHost::detached());
    assert!(!editor.remove_clozes());

    let mut host = MemoryHost::new(paragraph_root("{{c1::x}}"));
    host.clear_selection();
    let mut editor = ClozeEditor::new(host);
    assert!(!editor.remove_clozes());

    let mut host = MemoryHost::new(paragraph_root("{{c1::x}}"));
    host.set_selection(Selection::new(Vec::new()));
    let mut editor = ClozeEditor::new(host);
    assert!(!editor.remove_clozes());
    assert_eq!(editor.host().notifications(), 0);
    assert_eq!(editor.host().flat_text(), "{{c1::x}}");
}

#[test]
fn works_through_a_borrowed_host() {
    let mut host = MemoryHost::new(paragraph_root("{{c1::x}} {{c2::y}}"));
    host.set_caret(12);
    {
        let mut editor = ClozeEditor::new(&mut host);
        assert!(editor.remove_clozes());
    }
    assert_eq!(host.flat_text(), "{{c1::x}} y");
}
