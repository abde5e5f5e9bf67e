#![forbid(unsafe_code)]

//! End-to-end editor flows: keys in, text and caret out.
//!
//! 1. Type, select backwards, replace, delete.
//! 2. Home / Ctrl+Home on a two-line buffer.
//! 3. Interceptors veto or rewrite keys before the key table.
//! 4. Change notifications: one per applied key, none otherwise.
//! 5. Caret placement after render, for both caret strategies.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use caret_core::event::{Event, KeyCode, KeyEvent, Modifiers, PasteEvent};
use caret_core::geometry::Rect;
use caret_render::cell::StyleFlags;
use caret_render::frame::Frame;
use caret_widgets::{Block, CaretStrategy, Editor, Interception};
use proptest::prelude::*;
use tracing::Level;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(Level::TRACE)
        .try_init();
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code)
}

fn shift(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code).with_modifiers(Modifiers::SHIFT)
}

fn ctrl(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code).with_modifiers(Modifiers::CTRL)
}

fn type_str(editor: &mut Editor, text: &str) {
    for ch in text.chars() {
        editor.handle_key(KeyEvent::char(ch));
    }
}

fn draw(editor: &mut Editor, width: u16, height: u16) -> Frame {
    let mut frame = Frame::new(width, height);
    let area = frame.bounds();
    editor.render(area, &mut frame);
    frame
}

fn change_counter(editor: &mut Editor) -> Rc<Cell<usize>> {
    let count = Rc::new(Cell::new(0));
    let seen = Rc::clone(&count);
    editor.on_change(move || seen.set(seen.get() + 1));
    count
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Type, select, replace, delete
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn type_select_replace_delete() {
    init_tracing();
    let mut editor = Editor::new();

    type_str(&mut editor, "ab");
    assert_eq!(editor.editor_text(), "ab");
    assert_eq!(editor.model().cursor(), 2);

    editor.handle_key(shift(KeyCode::Left));
    editor.handle_key(shift(KeyCode::Left));
    let model = editor.model();
    assert_eq!(model.selection_range(), Some(0..2));
    assert_eq!((model.cursor(), model.anchor()), (0, 2));

    editor.handle_key(KeyEvent::char('x'));
    assert_eq!(editor.editor_text(), "x");
    assert_eq!(editor.model().cursor(), 1);
    assert!(!editor.model().has_selection());

    editor.handle_key(key(KeyCode::Backspace));
    assert_eq!(editor.editor_text(), "");
    assert_eq!(editor.model().cursor(), 0);
}

#[test]
fn delete_at_boundaries_is_noop() {
    let mut editor = Editor::new();
    editor.set_text_with_cursor("ab", 0);
    editor.handle_key(key(KeyCode::Backspace));
    assert_eq!(editor.editor_text(), "ab");

    editor.set_text("ab");
    editor.handle_key(key(KeyCode::Delete));
    assert_eq!(editor.editor_text(), "ab");
    assert_eq!(editor.model().cursor(), 2);
}

#[test]
fn enter_splits_line() {
    let mut editor = Editor::new();
    editor.set_text_with_cursor("ab", 1);
    editor.handle_key(key(KeyCode::Enter));
    assert_eq!(editor.editor_text(), "a\nb");
    assert_eq!(editor.model().cursor(), 2);
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Home / Ctrl+Home
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn home_then_ctrl_home() {
    let mut editor = Editor::new();
    editor.set_text_with_cursor("hello\nworld", 8);

    editor.handle_key(key(KeyCode::Home));
    assert_eq!(editor.model().cursor(), 6);

    editor.set_text_with_cursor("hello\nworld", 8);
    editor.handle_key(ctrl(KeyCode::Home));
    assert_eq!(editor.model().cursor(), 0);
}

#[test]
fn end_and_ctrl_end_after_render() {
    let mut editor = Editor::new().with_title("Test editor");
    editor.set_text_with_cursor("hello\nworld", 1);
    draw(&mut editor, 20, 5);

    editor.handle_key(key(KeyCode::End));
    assert_eq!(editor.model().cursor(), 5);
    editor.handle_key(ctrl(KeyCode::End));
    assert_eq!(editor.model().cursor(), 11);
}

#[test]
fn shift_home_selects_to_line_start() {
    let mut editor = Editor::new();
    editor.set_text_with_cursor("hello\nworld", 9);
    editor.handle_key(shift(KeyCode::Home));
    assert_eq!(editor.model().selected_text().as_deref(), Some("wor"));
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Interceptors
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn interceptor_veto_skips_builtin_and_notification() {
    let quit = Rc::new(Cell::new(false));
    let flag = Rc::clone(&quit);

    let mut editor = Editor::new();
    editor.add_handler(move |key: KeyEvent| {
        if key.code == KeyCode::Escape || (key.ctrl() && key.is_char('c')) {
            flag.set(true);
            Interception::Consumed
        } else {
            Interception::Continue(key)
        }
    });
    let count = change_counter(&mut editor);

    assert!(!editor.handle_key(key(KeyCode::Escape)));
    assert!(quit.get());
    assert_eq!(count.get(), 0);

    assert!(editor.handle_key(KeyEvent::char('a')));
    assert_eq!(editor.editor_text(), "a");
    assert_eq!(count.get(), 1);
}

#[test]
fn later_interceptors_see_rewritten_key() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&seen);

    let mut editor = Editor::new();
    editor.add_handler(|key: KeyEvent| {
        if key.is_char('1') {
            Interception::Continue(KeyEvent::char('!'))
        } else {
            Interception::Continue(key)
        }
    });
    editor.add_handler(move |key: KeyEvent| {
        log.borrow_mut().push(key.code);
        Interception::Continue(key)
    });

    editor.handle_key(KeyEvent::char('1'));
    assert_eq!(*seen.borrow(), vec![KeyCode::Char('!')]);
    assert_eq!(editor.editor_text(), "!");
}

#[test]
fn interceptor_can_turn_key_into_movement() {
    let mut editor = Editor::new();
    editor.set_text("abc");
    editor.add_handler(|key: KeyEvent| {
        if key.ctrl() && key.is_char('a') {
            Interception::Continue(KeyEvent::new(KeyCode::Home))
        } else {
            Interception::Continue(key)
        }
    });
    editor.handle_key(KeyEvent::char('a').with_modifiers(Modifiers::CTRL));
    assert_eq!(editor.model().cursor(), 0);
    assert_eq!(editor.editor_text(), "abc");
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Change notifications
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn notifications_per_key() {
    let mut editor = Editor::new();
    editor.set_text("ab");
    let count = change_counter(&mut editor);

    editor.handle_key(KeyEvent::char('c'));
    editor.handle_key(key(KeyCode::Left));
    editor.handle_key(shift(KeyCode::Right));
    assert_eq!(count.get(), 3);

    editor.handle_key(key(KeyCode::F(1)));
    editor.handle_key(KeyEvent::char('z').with_modifiers(Modifiers::ALT));
    assert_eq!(count.get(), 3);

    editor.handle_event(&Event::Paste(PasteEvent::bracketed("pasted text")));
    assert_eq!(count.get(), 4);
}

#[test]
fn movement_at_boundary_still_notifies() {
    let mut editor = Editor::new();
    editor.set_text_with_cursor("ab", 0);
    let count = change_counter(&mut editor);
    assert!(editor.handle_key(key(KeyCode::Left)));
    assert_eq!(editor.model().cursor(), 0);
    assert_eq!(count.get(), 1);
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Caret placement
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn caret_follows_typing_inside_border() {
    let mut editor = Editor::new().with_block(Block::bordered().title("Test editor"));
    editor.set_text("ab");

    let frame = draw(&mut editor, 20, 4);
    assert_eq!(frame.buffer.row_text(0), "┌Test editor───────┐");
    assert_eq!(frame.cursor_position, Some((3, 1)));

    editor.handle_key(key(KeyCode::Enter));
    type_str(&mut editor, "cd");
    let frame = draw(&mut editor, 20, 4);
    assert_eq!(frame.buffer.row_text(2), "│cd                │");
    assert_eq!(frame.cursor_position, Some((3, 2)));
}

#[test]
fn caret_moves_with_arrow_keys() {
    let mut editor = Editor::new();
    editor.set_text("hello\nworld");
    draw(&mut editor, 10, 3);

    editor.handle_key(key(KeyCode::Up));
    let frame = draw(&mut editor, 10, 3);
    assert_eq!(frame.cursor_position, Some((5, 0)));

    editor.handle_key(key(KeyCode::Left));
    let frame = draw(&mut editor, 10, 3);
    assert_eq!(frame.cursor_position, Some((4, 0)));
}

#[test]
fn scan_strategy_finds_marker() {
    let mut editor = Editor::new()
        .with_title("t")
        .with_strategy(CaretStrategy::AttributeScan);
    editor.set_text_with_cursor("abc\ndef", 5);
    let frame = draw(&mut editor, 8, 4);
    assert_eq!(frame.cursor_position, Some((2, 2)));
    assert!(!frame.buffer.get(2, 2).unwrap().has_flag(StyleFlags::DIM));
}

#[test]
fn resize_reflows_caret() {
    let mut editor = Editor::new();
    editor.set_text("abcdef");
    let frame = draw(&mut editor, 10, 2);
    assert_eq!(frame.cursor_position, Some((6, 0)));

    editor.handle_event(&Event::Resize {
        width: 4,
        height: 2,
    });
    let frame = draw(&mut editor, 4, 2);
    assert_eq!(frame.cursor_position, Some((2, 1)));
}

#[test]
fn render_into_sub_area() {
    let mut editor = Editor::new().with_title("e");
    editor.set_text("x");
    let mut frame = Frame::new(20, 10);
    editor.render(Rect::new(5, 3, 8, 3), &mut frame);
    assert_eq!(frame.cursor_position, Some((7, 4)));
}

proptest! {
    #[test]
    fn region_and_scan_agree(
        text in "[a-d\n ]{0,30}",
        cursor in 0usize..40,
        width in 3u16..12,
    ) {
        let mut frames = Vec::new();
        for strategy in [CaretStrategy::RegionLookup, CaretStrategy::AttributeScan] {
            let mut editor = Editor::new().with_strategy(strategy);
            editor.set_text_with_cursor(&text, cursor);
            frames.push(draw(&mut editor, width, 4));
        }
        prop_assert_eq!(frames[0].cursor_position, frames[1].cursor_position);
        prop_assert!(frames[0].cursor_position.is_some());
    }
}
