//! Cursor state management

use serde::{Deserialize, Serialize};

use crate::cell::CellAttributes;
use crate::charset::CharsetState;

/// Cursor visual shape (DECSCUSR)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CursorShape {
    /// Filled rectangle
    #[default]
    Block,
    /// Thin vertical bar
    Caret,
}

/// Cursor state
///
/// `col` may legitimately sit at `cols` (one past the last column) while
/// `pending_wrap` is set; see the deferred-wrap rule in `Screen::print`.
/// External views clamp it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    /// Row position (0-indexed)
    pub row: usize,
    /// Column position (0-indexed)
    pub col: usize,
    /// Visual shape
    pub shape: CursorShape,
    /// Whether the cursor is shown (DECTCEM)
    pub visible: bool,
    /// Deferred wrap: the last column was written and the next printable
    /// character wraps first
    pub pending_wrap: bool,
    /// Attributes applied to newly written cells
    pub attrs: CellAttributes,
}

impl Cursor {
    pub fn new() -> Self {
        Self {
            row: 0,
            col: 0,
            shape: CursorShape::Block,
            visible: true,
            pending_wrap: false,
            attrs: CellAttributes::default(),
        }
    }

    /// Reset to the initial state
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
    }
}

/// Saved cursor state for DECSC/DECRC, `CSI s`/`CSI u` and `?1048`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SavedCursor {
    pub row: usize,
    pub col: usize,
    pub attrs: CellAttributes,
    pub charsets: CharsetState,
}

impl SavedCursor {
    /// Capture the current cursor and charset state
    pub fn save(cursor: &Cursor, charsets: &CharsetState) -> Self {
        Self {
            row: cursor.row,
            col: cursor.col,
            attrs: cursor.attrs,
            charsets: *charsets,
        }
    }

    /// Restore into the given cursor and charset state
    pub fn restore(&self, cursor: &mut Cursor, charsets: &mut CharsetState) {
        cursor.row = self.row;
        cursor.col = self.col;
        cursor.attrs = self.attrs;
        cursor.pending_wrap = false;
        *charsets = self.charsets;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charset::Charset;

    #[test]
    fn test_cursor_new() {
        let cursor = Cursor::new();
        assert_eq!(cursor.row, 0);
        assert_eq!(cursor.col, 0);
        assert!(cursor.visible);
        assert!(!cursor.pending_wrap);
    }

    #[test]
    fn test_saved_cursor_roundtrip() {
        let mut cursor = Cursor::new();
        cursor.row = 5;
        cursor.col = 10;
        cursor.attrs.bold = true;
        let mut charsets = CharsetState::new();
        charsets.g1 = Charset::DecSpecialGraphics;

        let saved = SavedCursor::save(&cursor, &charsets);

        cursor.reset();
        charsets.reset();

        saved.restore(&mut cursor, &mut charsets);
        assert_eq!(cursor.row, 5);
        assert_eq!(cursor.col, 10);
        assert!(cursor.attrs.bold);
        assert_eq!(charsets.g1, Charset::DecSpecialGraphics);
    }

    #[test]
    fn test_restore_clears_pending_wrap() {
        let mut cursor = Cursor::new();
        let charsets = CharsetState::new();
        let saved = SavedCursor::save(&cursor, &charsets);

        cursor.pending_wrap = true;
        let mut charsets = charsets;
        saved.restore(&mut cursor, &mut charsets);
        assert!(!cursor.pending_wrap);
    }
}
