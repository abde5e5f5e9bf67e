#![forbid(unsafe_code)]

//! Editable document with a cursor and an optional selection.
//!
//! [`TextModel`] stores the document as code points and tracks two offsets:
//! the *cursor* (the end that moves) and the *anchor* (the other end of the
//! selection). When they are equal there is no selection, only a caret.
//!
//! Conceptually the document is split into three contiguous spans,
//! `left ++ middle ++ right`, where `middle` is the selected text. See
//! [`TextModel::spans`]. For drawing, [`TextModel::projection`] inserts
//! [`CURSOR_MARKER`] at the cursor; the marker never enters the document.
//!
//! All offsets are code-point offsets in `0..=len`. Out-of-range offsets are
//! clamped; deleting past either end of the document is a no-op.
//!
//! # Example
//! ```
//! use caret_text::TextModel;
//!
//! let mut model = TextModel::new();
//! model.insert("ab");
//! model.set_selection(2, 0);
//! model.insert("x");
//! assert_eq!(model.plain_text(), "x");
//! assert_eq!(model.cursor(), 1);
//! assert!(!model.has_selection());
//! ```

use std::ops::Range;

/// Placeholder drawn where the caret sits (U+2002 EN SPACE).
///
/// Reserved: it is stripped from any text entering the model so it can
/// never be confused with document content.
pub const CURSOR_MARKER: char = '\u{2002}';

/// The document as `left ++ middle ++ right`, split at the selection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Spans {
    /// Text before the selection (or before the caret).
    pub left: String,
    /// Selected text; empty when there is no selection.
    pub middle: String,
    /// Text after the selection (or after the caret).
    pub right: String,
}

/// Document text with the cursor marker spliced in, for display only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    /// Code points of the document plus one [`CURSOR_MARKER`].
    pub chars: Vec<char>,
    /// Index of the marker in `chars`.
    pub marker: usize,
    /// Selected range in `chars` coordinates (never contains the marker).
    pub selection: Option<Range<usize>>,
}

impl Projection {
    /// The projected text as a string.
    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    /// Map a projected index back to a document offset.
    pub fn to_document(&self, index: usize) -> usize {
        if index > self.marker {
            index - 1
        } else {
            index
        }
    }
}

/// Editable text with cursor and selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextModel {
    chars: Vec<char>,
    cursor: usize,
    anchor: usize,
}

fn sanitize(text: &str) -> impl Iterator<Item = char> + '_ {
    text.chars().filter(|&c| c != CURSOR_MARKER)
}

impl TextModel {
    /// Create an empty model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a model holding `text` with the cursor at the end.
    #[must_use]
    pub fn with_text(text: &str) -> Self {
        let mut model = Self::new();
        model.set_text(text);
        model
    }

    // ── Queries ─────────────────────────────────────────────────────────

    /// Length of the document in code points.
    #[inline]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Cursor offset.
    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Anchor offset; equal to the cursor when nothing is selected.
    #[inline]
    pub fn anchor(&self) -> usize {
        self.anchor
    }

    /// The document's code points.
    #[inline]
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    #[inline]
    pub fn has_selection(&self) -> bool {
        self.anchor != self.cursor
    }

    /// Selected range `[min, max)`, or `None` when the selection is empty.
    pub fn selection_range(&self) -> Option<Range<usize>> {
        self.has_selection()
            .then(|| self.anchor.min(self.cursor)..self.anchor.max(self.cursor))
    }

    /// Selected text, or `None` when the selection is empty.
    pub fn selected_text(&self) -> Option<String> {
        self.selection_range().map(|range| self.slice(range))
    }

    /// Text in `range`, clamped to the document.
    pub fn slice(&self, range: Range<usize>) -> String {
        let end = range.end.min(self.len());
        let start = range.start.min(end);
        self.chars[start..end].iter().collect()
    }

    /// The whole document, free of rendering artifacts.
    pub fn plain_text(&self) -> String {
        self.chars.iter().collect()
    }

    /// Split the document at the selection (or at the caret).
    pub fn spans(&self) -> Spans {
        let start = self.anchor.min(self.cursor);
        let end = self.anchor.max(self.cursor);
        Spans {
            left: self.slice(0..start),
            middle: self.slice(start..end),
            right: self.slice(end..self.len()),
        }
    }

    /// Document text with [`CURSOR_MARKER`] inserted at the cursor.
    pub fn projection(&self) -> Projection {
        let mut chars = Vec::with_capacity(self.len() + 1);
        chars.extend_from_slice(&self.chars[..self.cursor]);
        chars.push(CURSOR_MARKER);
        chars.extend_from_slice(&self.chars[self.cursor..]);

        let selection = self.selection_range().map(|range| {
            if self.cursor <= range.start {
                range.start + 1..range.end + 1
            } else {
                range
            }
        });

        Projection {
            chars,
            marker: self.cursor,
            selection,
        }
    }

    /// Offset of the start of the logical line containing `offset`.
    pub fn line_start(&self, offset: usize) -> usize {
        let offset = self.clamp(offset);
        self.chars[..offset]
            .iter()
            .rposition(|&c| c == '\n')
            .map_or(0, |nl| nl + 1)
    }

    /// Offset of the end of the logical line containing `offset`
    /// (the position of its `'\n'`, or the document end).
    pub fn line_end(&self, offset: usize) -> usize {
        let offset = self.clamp(offset);
        self.chars[offset..]
            .iter()
            .position(|&c| c == '\n')
            .map_or(self.len(), |nl| offset + nl)
    }

    #[inline]
    fn clamp(&self, offset: usize) -> usize {
        offset.min(self.len())
    }

    // ── Whole-document replacement ──────────────────────────────────────

    /// Replace the document; the cursor goes to the end, selection collapses.
    pub fn set_text(&mut self, text: &str) {
        self.chars = sanitize(text).collect();
        self.cursor = self.len();
        self.anchor = self.cursor;
        tracing::trace!(len = self.len(), "text replaced");
    }

    /// Replace the document and put the caret at `cursor` (clamped).
    pub fn set_text_with_cursor(&mut self, text: &str, cursor: usize) {
        self.set_text(text);
        self.set_cursor(cursor);
    }

    /// Empty the document.
    pub fn clear(&mut self) {
        self.set_text("");
    }

    // ── Cursor and selection ────────────────────────────────────────────

    /// Set both selection ends (each clamped to the document).
    pub fn set_selection(&mut self, anchor: usize, cursor: usize) {
        self.anchor = self.clamp(anchor);
        self.cursor = self.clamp(cursor);
    }

    /// Move the caret to `offset` (clamped), collapsing the selection.
    pub fn set_cursor(&mut self, offset: usize) {
        let offset = self.clamp(offset);
        self.set_selection(offset, offset);
    }

    /// Collapse the selection onto the cursor.
    pub fn clear_selection(&mut self) {
        self.anchor = self.cursor;
    }

    /// Select the whole document, cursor at the end.
    pub fn select_all(&mut self) {
        self.set_selection(0, self.len());
    }

    // ── Edits ───────────────────────────────────────────────────────────

    /// Insert text at the cursor, replacing any selection.
    ///
    /// The cursor ends up after the inserted text with nothing selected.
    pub fn insert(&mut self, text: &str) {
        self.delete_selection();
        let at = self.cursor;
        let tail = self.chars.split_off(at);
        self.chars.extend(sanitize(text));
        let inserted = self.len() - at;
        self.chars.extend(tail);
        self.set_cursor(at + inserted);
        tracing::trace!(at, inserted, "insert");
    }

    /// Insert a single character at the cursor, replacing any selection.
    pub fn insert_char(&mut self, ch: char) {
        let mut buf = [0u8; 4];
        self.insert(ch.encode_utf8(&mut buf));
    }

    /// Remove the selected text. Returns `false` if nothing was selected.
    pub fn delete_selection(&mut self) -> bool {
        let Some(range) = self.selection_range() else {
            return false;
        };
        let start = range.start;
        self.chars.drain(range);
        self.set_cursor(start);
        true
    }

    /// Delete the selection, or the code point before the cursor.
    ///
    /// Returns `false` (and changes nothing) at the start of the document.
    pub fn delete_backward(&mut self) -> bool {
        if self.delete_selection() {
            return true;
        }
        if self.cursor == 0 {
            return false;
        }
        self.chars.remove(self.cursor - 1);
        self.set_cursor(self.cursor - 1);
        true
    }

    /// Delete the selection, or the code point after the cursor.
    ///
    /// Returns `false` (and changes nothing) at the end of the document.
    pub fn delete_forward(&mut self) -> bool {
        if self.delete_selection() {
            return true;
        }
        if self.cursor >= self.len() {
            return false;
        }
        self.chars.remove(self.cursor);
        self.clear_selection();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_model_is_empty() {
        let model = TextModel::new();
        assert!(model.is_empty());
        assert_eq!(model.cursor(), 0);
        assert_eq!(model.anchor(), 0);
        assert_eq!(model.plain_text(), "");
    }

    #[test]
    fn set_text_puts_cursor_at_end() {
        let mut model = TextModel::new();
        model.set_selection(0, 0);
        model.set_text("héllo");
        assert_eq!(model.len(), 5);
        assert_eq!(model.cursor(), 5);
        assert!(!model.has_selection());
    }

    #[test]
    fn set_text_collapses_selection() {
        let mut model = TextModel::with_text("abcdef");
        model.set_selection(1, 4);
        model.set_text("xy");
        assert_eq!(model.selection_range(), None);
        assert_eq!(model.cursor(), 2);
    }

    #[test]
    fn set_text_with_cursor_clamps() {
        let mut model = TextModel::new();
        model.set_text_with_cursor("abc", 1);
        assert_eq!(model.cursor(), 1);
        model.set_text_with_cursor("abc", 99);
        assert_eq!(model.cursor(), 3);
    }

    #[test]
    fn marker_is_stripped_from_input() {
        let mut model = TextModel::with_text("a\u{2002}b");
        assert_eq!(model.plain_text(), "ab");
        model.insert("\u{2002}");
        assert_eq!(model.plain_text(), "ab");
        assert_eq!(model.cursor(), 2);
    }

    #[test]
    fn insert_in_middle() {
        let mut model = TextModel::with_text("hd");
        model.set_cursor(1);
        model.insert("ello worl");
        assert_eq!(model.plain_text(), "hello world");
        assert_eq!(model.cursor(), 10);
    }

    #[test]
    fn insert_replaces_selection() {
        let mut model = TextModel::with_text("hello world");
        model.set_selection(6, 11);
        model.insert("there");
        assert_eq!(model.plain_text(), "hello there");
        assert_eq!(model.cursor(), 11);
        assert!(!model.has_selection());
    }

    #[test]
    fn insert_replaces_backward_selection() {
        let mut model = TextModel::with_text("abcd");
        model.set_selection(3, 1);
        model.insert_char('Z');
        assert_eq!(model.plain_text(), "aZd");
        assert_eq!(model.cursor(), 2);
    }

    #[test]
    fn insert_counts_code_points() {
        let mut model = TextModel::new();
        model.insert("中文");
        assert_eq!(model.cursor(), 2);
        model.insert_char('\n');
        assert_eq!(model.cursor(), 3);
    }

    #[test]
    fn delete_backward() {
        let mut model = TextModel::with_text("abc");
        assert!(model.delete_backward());
        assert_eq!(model.plain_text(), "ab");
        assert_eq!(model.cursor(), 2);
    }

    #[test]
    fn delete_backward_at_start_is_noop() {
        let mut model = TextModel::with_text("abc");
        model.set_cursor(0);
        assert!(!model.delete_backward());
        assert_eq!(model.plain_text(), "abc");
        assert_eq!(model.cursor(), 0);
    }

    #[test]
    fn delete_forward() {
        let mut model = TextModel::with_text("abc");
        model.set_cursor(1);
        assert!(model.delete_forward());
        assert_eq!(model.plain_text(), "ac");
        assert_eq!(model.cursor(), 1);
    }

    #[test]
    fn delete_forward_at_end_is_noop() {
        let mut model = TextModel::with_text("abc");
        assert!(!model.delete_forward());
        assert_eq!(model.plain_text(), "abc");
        assert_eq!(model.cursor(), 3);
    }

    #[test]
    fn delete_with_selection_ignores_direction() {
        for forward in [false, true] {
            let mut model = TextModel::with_text("abcdef");
            model.set_selection(4, 1);
            let changed = if forward {
                model.delete_forward()
            } else {
                model.delete_backward()
            };
            assert!(changed);
            assert_eq!(model.plain_text(), "aef");
            assert_eq!(model.cursor(), 1);
            assert!(!model.has_selection());
        }
    }

    #[test]
    fn delete_joins_lines() {
        let mut model = TextModel::with_text("ab\ncd");
        model.set_cursor(3);
        model.delete_backward();
        assert_eq!(model.plain_text(), "abcd");
    }

    #[test]
    fn set_selection_clamps() {
        let mut model = TextModel::with_text("abc");
        model.set_selection(10, 20);
        assert_eq!(model.anchor(), 3);
        assert_eq!(model.cursor(), 3);
    }

    #[test]
    fn spans_split_at_selection() {
        let mut model = TextModel::with_text("hello world");
        model.set_selection(8, 3);
        let spans = model.spans();
        assert_eq!(spans.left, "hel");
        assert_eq!(spans.middle, "lo wo");
        assert_eq!(spans.right, "rld");
    }

    #[test]
    fn spans_without_selection_split_at_cursor() {
        let mut model = TextModel::with_text("abc");
        model.set_cursor(1);
        let spans = model.spans();
        assert_eq!(
            spans,
            Spans {
                left: "a".into(),
                middle: String::new(),
                right: "bc".into(),
            }
        );
    }

    #[test]
    fn projection_places_marker_at_cursor() {
        let mut model = TextModel::with_text("abc");
        model.set_cursor(1);
        let projection = model.projection();
        assert_eq!(projection.text(), "a\u{2002}bc");
        assert_eq!(projection.marker, 1);
        assert_eq!(projection.selection, None);
    }

    #[test]
    fn projection_shifts_selection_after_leading_marker() {
        let mut model = TextModel::with_text("abcd");
        model.set_selection(3, 1);
        let projection = model.projection();
        assert_eq!(projection.text(), "a\u{2002}bcd");
        assert_eq!(projection.selection, Some(2..4));

        model.set_selection(1, 3);
        let projection = model.projection();
        assert_eq!(projection.text(), "abc\u{2002}d");
        assert_eq!(projection.selection, Some(1..3));
    }

    #[test]
    fn projection_maps_back_to_document() {
        let mut model = TextModel::with_text("abc");
        model.set_cursor(1);
        let projection = model.projection();
        assert_eq!(projection.to_document(0), 0);
        assert_eq!(projection.to_document(1), 1);
        assert_eq!(projection.to_document(2), 1);
        assert_eq!(projection.to_document(3), 2);
    }

    #[test]
    fn line_bounds() {
        let model = TextModel::with_text("hello\nworld\n");
        assert_eq!(model.line_start(8), 6);
        assert_eq!(model.line_end(8), 11);
        assert_eq!(model.line_start(3), 0);
        assert_eq!(model.line_end(3), 5);
        assert_eq!(model.line_start(12), 12);
        assert_eq!(model.line_end(12), 12);
        assert_eq!(model.line_start(99), 12);
    }

    #[test]
    fn selected_text_and_select_all() {
        let mut model = TextModel::with_text("abc");
        assert_eq!(model.selected_text(), None);
        model.select_all();
        assert_eq!(model.selected_text().as_deref(), Some("abc"));
        model.clear_selection();
        assert_eq!(model.anchor(), model.cursor());
    }

    #[test]
    fn clear_resets() {
        let mut model = TextModel::with_text("abc");
        model.clear();
        assert!(model.is_empty());
        assert_eq!(model.cursor(), 0);
    }

    #[tracing_test::traced_test]
    #[test]
    fn edits_are_traced() {
        let mut model = TextModel::new();
        model.insert("ab");
        assert!(logs_contain("insert"));
        assert!(logs_contain("inserted=2"));
    }
}
