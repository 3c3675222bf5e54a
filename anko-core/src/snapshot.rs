//! Serializable snapshot of terminal state
//!
//! The renderer boundary: a consistent, owned copy of the visible grid,
//! cursor and mode flags. Also the golden format for headless testing.

use serde::{Deserialize, Serialize};

use crate::cell::Cell;
use crate::cursor::CursorShape;
use crate::screen::Screen;

/// Cursor state as seen by renderers. The column is clamped into
/// `0..cols`, hiding the internal one-past-the-end deferred-wrap position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotCursor {
    pub row: usize,
    pub col: usize,
    pub shape: CursorShape,
    pub visible: bool,
}

/// A complete snapshot of visible terminal state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub cols: usize,
    pub rows: usize,
    pub cursor: SnapshotCursor,
    /// Rows of cells, top to bottom
    pub lines: Vec<Vec<Cell>>,
    pub scroll_region: (usize, usize),
    pub alternate_screen: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Snapshot {
    /// Capture the current screen state
    pub fn from_screen(screen: &Screen) -> Self {
        let dims = screen.dimensions();
        let cursor = screen.cursor();
        let lines = screen
            .grid()
            .iter()
            .map(|line| line.iter().copied().collect())
            .collect();

        Self {
            cols: dims.cols,
            rows: dims.rows,
            cursor: SnapshotCursor {
                row: cursor.row,
                col: cursor.col.min(dims.cols.saturating_sub(1)),
                shape: cursor.shape,
                visible: cursor.visible,
            },
            lines,
            scroll_region: screen.scroll_region(),
            alternate_screen: screen.is_alternate(),
            title: if screen.title().is_empty() {
                None
            } else {
                Some(screen.title().to_string())
            },
        }
    }

    /// Text of one row with trailing blanks trimmed
    pub fn row_text(&self, row: usize) -> String {
        let Some(cells) = self.lines.get(row) else {
            return String::new();
        };
        let mut text: String = cells.iter().map(|c| c.ch).collect();
        let trimmed = text.trim_end().len();
        text.truncate(trimmed);
        text
    }

    /// All rows joined with newlines, trailing blank rows trimmed
    pub fn text(&self) -> String {
        let mut rows: Vec<String> = (0..self.rows).map(|r| self.row_text(r)).collect();
        while rows.last().map(|r| r.is_empty()).unwrap_or(false) {
            rows.pop();
        }
        rows.join("\n")
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Dimensions;

    #[test]
    fn test_snapshot_capture() {
        let mut screen = Screen::new(Dimensions::new(10, 3));
        screen.print('H');
        screen.print('i');
        screen.set_title("shell");

        let snap = Snapshot::from_screen(&screen);
        assert_eq!(snap.cols, 10);
        assert_eq!(snap.rows, 3);
        assert_eq!(snap.cursor.col, 2);
        assert_eq!(snap.row_text(0), "Hi");
        assert_eq!(snap.title.as_deref(), Some("shell"));
    }

    #[test]
    fn test_snapshot_clamps_pending_wrap_column() {
        let mut screen = Screen::new(Dimensions::new(3, 2));
        for c in "abc".chars() {
            screen.print(c);
        }
        assert_eq!(screen.cursor().col, 3);
        let snap = Snapshot::from_screen(&screen);
        assert_eq!(snap.cursor.col, 2);
    }

    #[test]
    fn test_snapshot_json_roundtrip() {
        let mut screen = Screen::new(Dimensions::new(8, 2));
        screen.print('x');
        let snap = Snapshot::from_screen(&screen);

        let json = snap.to_json().unwrap();
        let parsed = Snapshot::from_json(&json).unwrap();
        assert_eq!(parsed.cols, snap.cols);
        assert_eq!(parsed.row_text(0), "x");
    }

    #[test]
    fn test_snapshot_text() {
        let mut screen = Screen::new(Dimensions::new(5, 3));
        screen.print('a');
        screen.next_line();
        screen.print('b');
        let snap = Snapshot::from_screen(&screen);
        assert_eq!(snap.text(), "a\nb");
    }
}
