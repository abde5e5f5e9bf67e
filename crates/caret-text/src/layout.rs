#![forbid(unsafe_code)]

//! Wrapped visual layout of a document.
//!
//! The document is split into *logical lines* on `'\n'`, and each logical
//! line is broken into *visual rows* no wider than the wrap width
//! (character wrapping, measured in display columns). Movement and
//! rendering both go through this one layout so the caret always lands
//! where the text is drawn.
//!
//! # Invariants
//!
//! 1. Every logical line has at least one row.
//! 2. Rows of a line are contiguous and cover the line exactly.
//! 3. Every offset in `0..=len` maps to exactly one `(col, row)`.
//! 4. No row is wider than the wrap width, except a row holding a single
//!    character that is itself wider.
//!
//! A line whose last row is exactly full gets an extra empty row, so the
//! caret at the end of that line has a cell to sit in.

use std::ops::Range;

use caret_render::char_width;

/// Geometry queries the movement engine needs.
///
/// Coordinates are `(col, row)` in display columns and visual rows, both
/// 0-indexed from the top-left of the laid-out text.
pub trait LayoutGeometry {
    /// Number of visual rows (at least 1).
    fn row_count(&self) -> usize;

    /// Visual position of a document offset (clamped).
    fn position_of(&self, offset: usize) -> (usize, usize);

    /// Document offset shown at `(col, row)`; both are clamped.
    fn offset_at(&self, col: usize, row: usize) -> usize;

    /// Number of logical lines (at least 1).
    fn line_count(&self) -> usize;

    /// Logical line a visual row belongs to.
    fn line_of_row(&self, row: usize) -> usize;

    /// Offsets of a logical line, excluding its `'\n'`.
    fn line_range(&self, line: usize) -> Range<usize>;

    /// Rows moved by one page.
    fn page_height(&self) -> usize;
}

/// One visual row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisualRow {
    /// First offset in the row.
    pub start: usize,
    /// One past the last offset in the row.
    pub end: usize,
    /// Display width of the row's characters.
    pub width: usize,
    /// Logical line index.
    pub line: usize,
}

/// Character-wrapped layout of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualLayout {
    rows: Vec<VisualRow>,
    lines: Vec<Range<usize>>,
    widths: Vec<usize>,
    wrap_width: usize,
    page_height: usize,
    len: usize,
}

impl VisualLayout {
    /// Lay out `chars` for a viewport `wrap_width` columns wide and
    /// `page_height` rows tall. Zero sizes are treated as 1.
    pub fn new(chars: &[char], wrap_width: usize, page_height: usize) -> Self {
        let wrap_width = wrap_width.max(1);
        let widths: Vec<usize> = chars.iter().map(|&c| char_width(c)).collect();

        let mut lines = Vec::new();
        let mut start = 0;
        for (i, &c) in chars.iter().enumerate() {
            if c == '\n' {
                lines.push(start..i);
                start = i + 1;
            }
        }
        lines.push(start..chars.len());

        let mut rows = Vec::new();
        for (line, range) in lines.iter().enumerate() {
            let mut row = VisualRow {
                start: range.start,
                end: range.start,
                width: 0,
                line,
            };
            for offset in range.clone() {
                let w = widths[offset];
                if row.width + w > wrap_width && row.end > row.start {
                    rows.push(row);
                    row = VisualRow {
                        start: offset,
                        end: offset,
                        width: 0,
                        line,
                    };
                }
                row.end = offset + 1;
                row.width += w;
            }
            let full = row.width >= wrap_width && row.end > row.start;
            rows.push(row);
            if full {
                rows.push(VisualRow {
                    start: range.end,
                    end: range.end,
                    width: 0,
                    line,
                });
            }
        }

        Self {
            rows,
            lines,
            widths,
            wrap_width,
            page_height: page_height.max(1),
            len: chars.len(),
        }
    }

    /// Layout without wrapping; used before any viewport size is known.
    pub fn unwrapped(chars: &[char]) -> Self {
        Self::new(chars, usize::MAX, 1)
    }

    pub fn rows(&self) -> &[VisualRow] {
        &self.rows
    }

    pub fn wrap_width(&self) -> usize {
        self.wrap_width
    }

    /// Display width of the character at `offset` (0 past the end).
    pub fn char_width_at(&self, offset: usize) -> usize {
        self.widths.get(offset).copied().unwrap_or(0)
    }

    /// Row holding `offset`.
    ///
    /// An offset equal to a row's end belongs to that row only when the row
    /// is the last of its line; otherwise it is the start of the next row.
    pub fn row_of(&self, offset: usize) -> usize {
        let offset = offset.min(self.len);
        // First row whose end reaches the offset, skipping rows that end
        // exactly at a soft wrap.
        let mut idx = self.rows.partition_point(|row| row.end < offset);
        while idx + 1 < self.rows.len() {
            let row = self.rows[idx];
            let next = self.rows[idx + 1];
            if row.end == offset && next.line == row.line {
                idx += 1;
            } else {
                break;
            }
        }
        idx.min(self.rows.len() - 1)
    }

    fn last_row_of_line(&self, row: usize) -> bool {
        self.rows
            .get(row + 1)
            .is_none_or(|next| next.line != self.rows[row].line)
    }
}

impl LayoutGeometry for VisualLayout {
    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn position_of(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.len);
        let row = self.row_of(offset);
        let start = self.rows[row].start;
        let col = self.widths[start..offset].iter().sum();
        (col, row)
    }

    fn offset_at(&self, col: usize, row: usize) -> usize {
        let row = row.min(self.rows.len() - 1);
        let VisualRow { start, end, .. } = self.rows[row];
        // On a soft-wrapped row the end offset is drawn on the next row,
        // so the last reachable offset is the final character.
        let last = if self.last_row_of_line(row) || end == start {
            end
        } else {
            end - 1
        };

        // Zero-width code points share the column of the next visible
        // character; the column resolves to that character.
        let mut x = 0;
        for offset in start..last {
            let w = self.widths[offset];
            if w == 0 {
                continue;
            }
            if col < x + w {
                return offset;
            }
            x += w;
        }
        last
    }

    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn line_of_row(&self, row: usize) -> usize {
        self.rows[row.min(self.rows.len() - 1)].line
    }

    fn line_range(&self, line: usize) -> Range<usize> {
        self.lines[line.min(self.lines.len() - 1)].clone()
    }

    fn page_height(&self) -> usize {
        self.page_height
    }
}
