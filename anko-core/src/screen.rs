//! Terminal screen - the complete screen-side state machine
//!
//! `Screen` ties together the grid, cursor, scroll margins, modes, charsets
//! and the alternate-screen snapshot. The interpreter drives it; it performs
//! no parsing and no I/O.

use crate::cell::CellAttributes;
use crate::charset::{parse_charset_designation, CharsetState};
use crate::cursor::{Cursor, SavedCursor};
use crate::grid::Grid;
use crate::line::Line;
use crate::modes::Modes;
use crate::Dimensions;

/// Default tab stop interval
const DEFAULT_TAB_WIDTH: usize = 8;

/// Longest window title we will retain
const MAX_TITLE_LEN: usize = 4096;

/// Saved main-screen state while the alternate screen is active
#[derive(Debug, Clone)]
struct AltScreen {
    lines: Vec<Line>,
    cursor: Cursor,
    charsets: CharsetState,
}

/// The complete terminal screen state
#[derive(Debug, Clone)]
pub struct Screen {
    grid: Grid,
    cursor: Cursor,
    saved_cursor: SavedCursor,
    /// Main-screen snapshot while the alternate screen is in use
    alt: Option<AltScreen>,
    modes: Modes,
    charsets: CharsetState,
    /// Scroll margins, 0-indexed inclusive; top <= bottom <= rows-1
    scroll_top: usize,
    scroll_bottom: usize,
    tab_stops: Vec<bool>,
    title: String,
}

impl Screen {
    /// Create a new screen with the specified dimensions
    pub fn new(dims: Dimensions) -> Self {
        Self {
            grid: Grid::new(dims),
            cursor: Cursor::new(),
            saved_cursor: SavedCursor::default(),
            alt: None,
            modes: Modes::new(),
            charsets: CharsetState::new(),
            scroll_top: 0,
            scroll_bottom: dims.rows.saturating_sub(1),
            tab_stops: default_tab_stops(dims.cols),
            title: String::new(),
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn dimensions(&self) -> Dimensions {
        self.grid.dimensions()
    }

    pub fn cols(&self) -> usize {
        self.grid.cols()
    }

    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn cursor_mut(&mut self) -> &mut Cursor {
        &mut self.cursor
    }

    pub fn modes(&self) -> &Modes {
        &self.modes
    }

    pub fn modes_mut(&mut self) -> &mut Modes {
        &mut self.modes
    }

    pub fn charsets(&self) -> &CharsetState {
        &self.charsets
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = title.chars().take(MAX_TITLE_LEN).collect();
    }

    /// Whether the alternate screen is active
    pub fn is_alternate(&self) -> bool {
        self.alt.is_some()
    }

    /// Scroll margins (top, bottom), 0-indexed inclusive
    pub fn scroll_region(&self) -> (usize, usize) {
        (self.scroll_top, self.scroll_bottom)
    }

    /// Convenience accessor for a line of the visible grid
    pub fn line(&self, row: usize) -> &Line {
        self.grid.line(row)
    }

    /// Set scroll margins (DECSTBM), 1-indexed inclusive.
    /// An invalid pair resets to the full screen. Cursor homes.
    pub fn set_scroll_region(&mut self, top: usize, bottom: usize) {
        let rows = self.rows();
        if rows == 0 {
            return;
        }
        let top = top.saturating_sub(1).min(rows - 1);
        let bottom = bottom.saturating_sub(1).min(rows - 1);
        if top < bottom {
            self.scroll_top = top;
            self.scroll_bottom = bottom;
        } else {
            self.scroll_top = 0;
            self.scroll_bottom = rows - 1;
        }
        let home_row = if self.modes.origin { self.scroll_top } else { 0 };
        self.cursor.row = home_row;
        self.cursor.col = 0;
        self.cursor.pending_wrap = false;
    }

    /// Print a character at the cursor, honouring charsets, insert mode and
    /// the deferred-wrap rule. While a wrap is pending the cursor column sits
    /// one past the last column.
    pub fn print(&mut self, c: char) {
        let cols = self.cols();
        if cols == 0 || self.rows() == 0 {
            return;
        }

        let c = self.charsets.translate(c);

        if self.cursor.pending_wrap {
            self.cursor.pending_wrap = false;
            if self.modes.auto_wrap {
                self.cursor.col = 0;
                self.advance_row();
            } else {
                self.cursor.col = cols - 1;
            }
        }

        let row = self.cursor.row;
        let col = self.cursor.col;
        let attrs = self.cursor.attrs;

        if self.modes.insert && col < cols {
            self.grid.line_mut(row).insert_cells(col, 1, attrs);
        }

        if let Some(cell) = self.grid.line_mut(row).get_mut(col) {
            cell.ch = c;
            cell.attrs = attrs;
        } else {
            log::debug!("print: cell ({}, {}) out of bounds", row, col);
            return;
        }

        if col + 1 >= cols {
            if self.modes.auto_wrap {
                self.cursor.pending_wrap = true;
                self.cursor.col = cols;
            }
            // wrap disabled: overstrike the last column
        } else {
            self.cursor.col = col + 1;
        }
    }

    /// Backspace (BS): one column left, no wrap across rows
    pub fn backspace(&mut self) {
        let cols = self.cols();
        if cols == 0 {
            return;
        }
        self.cursor.col = self.cursor.col.saturating_sub(1).min(cols - 1);
        self.cursor.pending_wrap = false;
    }

    /// Horizontal tab (HT): write blanks with the current style up to the
    /// next tab stop (never wrapping to the next row)
    pub fn tab(&mut self) {
        let cols = self.cols();
        if cols == 0 {
            return;
        }
        let mut end = self.cursor.col + 1;
        while end < cols - 1 && !self.tab_stops.get(end).copied().unwrap_or(false) {
            end += 1;
        }
        let end = end.min(cols - 1);
        while self.cursor.col < end && !self.cursor.pending_wrap {
            self.print(' ');
        }
    }

    /// Carriage return (CR)
    pub fn carriage_return(&mut self) {
        self.cursor.col = 0;
        self.cursor.pending_wrap = false;
    }

    /// Move one row down, scrolling the region if at the bottom margin
    fn advance_row(&mut self) {
        if self.cursor.row == self.scroll_bottom {
            self.scroll_up(1);
        } else if self.cursor.row + 1 < self.rows() {
            self.cursor.row += 1;
        }
    }

    /// Line feed (LF/VT/FF); under LNM also returns to column 0
    pub fn linefeed(&mut self) {
        self.advance_row();
        self.cursor.pending_wrap = false;
        if self.modes.newline {
            self.cursor.col = 0;
        }
    }

    /// Index (IND): line feed without the LNM carriage return
    pub fn index(&mut self) {
        self.advance_row();
        self.cursor.pending_wrap = false;
    }

    /// Next line (NEL): CR + LF
    pub fn next_line(&mut self) {
        self.advance_row();
        self.cursor.col = 0;
        self.cursor.pending_wrap = false;
    }

    /// Reverse index (RI): one row up, scrolling the region down at the top
    /// margin
    pub fn reverse_index(&mut self) {
        if self.cursor.row == self.scroll_top {
            self.scroll_down(1);
        } else {
            self.cursor.row = self.cursor.row.saturating_sub(1);
        }
        self.cursor.pending_wrap = false;
    }

    /// Scroll the region up by n lines (SU); content moves toward the top
    pub fn scroll_up(&mut self, n: usize) {
        let attrs = self.cursor.attrs;
        self.grid
            .scroll_up(self.scroll_top, self.scroll_bottom, n, attrs);
    }

    /// Scroll the region down by n lines (SD)
    pub fn scroll_down(&mut self, n: usize) {
        let attrs = self.cursor.attrs;
        self.grid
            .scroll_down(self.scroll_top, self.scroll_bottom, n, attrs);
    }

    /// Move the cursor to a 1-indexed position (CUP/HVP).
    /// Under origin mode the row is relative to the scroll region and the
    /// cursor cannot leave it.
    pub fn move_cursor_to(&mut self, row: usize, col: usize) {
        let cols = self.cols();
        let rows = self.rows();
        if cols == 0 || rows == 0 {
            return;
        }
        let row = row.saturating_sub(1);
        let col = col.saturating_sub(1);
        self.cursor.col = col.min(cols - 1);
        self.cursor.row = if self.modes.origin {
            (self.scroll_top + row).min(self.scroll_bottom)
        } else {
            row.min(rows - 1)
        };
        self.cursor.pending_wrap = false;
    }

    /// Cursor up n rows (CUU)
    pub fn move_cursor_up(&mut self, n: usize) {
        let floor = if self.modes.origin { self.scroll_top } else { 0 };
        self.cursor.row = self.cursor.row.saturating_sub(n).max(floor);
        self.cursor.pending_wrap = false;
    }

    /// Cursor down n rows (CUD/VPR)
    pub fn move_cursor_down(&mut self, n: usize) {
        let ceil = if self.modes.origin {
            self.scroll_bottom
        } else {
            self.rows().saturating_sub(1)
        };
        self.cursor.row = self.cursor.row.saturating_add(n).min(ceil);
        self.cursor.pending_wrap = false;
    }

    /// Cursor left n columns (CUB)
    pub fn move_cursor_left(&mut self, n: usize) {
        let cols = self.cols();
        if cols == 0 {
            return;
        }
        self.cursor.col = self.cursor.col.min(cols - 1).saturating_sub(n);
        self.cursor.pending_wrap = false;
    }

    /// Cursor right n columns (CUF/HPR)
    pub fn move_cursor_right(&mut self, n: usize) {
        let cols = self.cols();
        if cols == 0 {
            return;
        }
        self.cursor.col = self.cursor.col.saturating_add(n).min(cols - 1);
        self.cursor.pending_wrap = false;
    }

    /// Set cursor column, 1-indexed (CHA)
    pub fn set_cursor_col(&mut self, col: usize) {
        let cols = self.cols();
        if cols == 0 {
            return;
        }
        self.cursor.col = col.saturating_sub(1).min(cols - 1);
        self.cursor.pending_wrap = false;
    }

    /// Set cursor row, 1-indexed, origin-mode aware (VPA)
    pub fn set_cursor_row(&mut self, row: usize) {
        let rows = self.rows();
        if rows == 0 {
            return;
        }
        let row = row.saturating_sub(1);
        self.cursor.row = if self.modes.origin {
            (self.scroll_top + row).min(self.scroll_bottom)
        } else {
            row.min(rows - 1)
        };
        self.cursor.pending_wrap = false;
    }

    /// Save cursor position, attributes and charsets (DECSC)
    pub fn save_cursor(&mut self) {
        self.saved_cursor = SavedCursor::save(&self.cursor, &self.charsets);
    }

    /// Restore the saved cursor, clamped to the current bounds (DECRC)
    pub fn restore_cursor(&mut self) {
        let saved = self.saved_cursor;
        saved.restore(&mut self.cursor, &mut self.charsets);
        self.clamp_cursor();
    }

    fn clamp_cursor(&mut self) {
        self.cursor.col = self.cursor.col.min(self.cols().saturating_sub(1));
        self.cursor.row = self.cursor.row.min(self.rows().saturating_sub(1));
    }

    /// Erase in display (ED)
    pub fn erase_display(&mut self, mode: u16) {
        let attrs = self.cursor.attrs;
        let row = self.cursor.row;
        let col = self.cursor.col;
        match mode {
            0 => self.grid.clear_below(row, col, attrs),
            1 => self.grid.clear_above(row, col, attrs),
            2 => self.grid.clear(attrs),
            3 => {
                // xterm "erase saved lines"; there is no scrollback here, so
                // clear the visible rows and reset margins like the original
                self.grid.clear(attrs);
                self.scroll_top = 0;
                self.scroll_bottom = self.rows().saturating_sub(1);
                self.cursor.row = 0;
                self.cursor.col = 0;
                self.cursor.pending_wrap = false;
            }
            _ => log::debug!("erase_display: unknown mode {}", mode),
        }
    }

    /// Erase in line (EL)
    pub fn erase_line(&mut self, mode: u16) {
        let attrs = self.cursor.attrs;
        let row = self.cursor.row;
        let col = self.cursor.col;
        let line = self.grid.line_mut(row);
        match mode {
            0 => line.clear_from(col, attrs),
            1 => line.clear_to(col.min(line.cols().saturating_sub(1)), attrs),
            2 => line.clear(attrs),
            _ => log::debug!("erase_line: unknown mode {}", mode),
        }
    }

    /// Erase n characters from the cursor without shifting (ECH)
    pub fn erase_chars(&mut self, n: usize) {
        let attrs = self.cursor.attrs;
        let row = self.cursor.row;
        let col = self.cursor.col;
        self.grid.line_mut(row).erase_cells(col, n, attrs);
    }

    /// Insert n blank lines at the cursor within the scroll region (IL)
    pub fn insert_lines(&mut self, n: usize) {
        let row = self.cursor.row;
        let attrs = self.cursor.attrs;
        if row <= self.scroll_bottom {
            self.grid.insert_lines(row, n, self.scroll_bottom, attrs);
        }
    }

    /// Delete n lines at the cursor within the scroll region (DL)
    pub fn delete_lines(&mut self, n: usize) {
        let row = self.cursor.row;
        let attrs = self.cursor.attrs;
        if row <= self.scroll_bottom {
            self.grid.delete_lines(row, n, self.scroll_bottom, attrs);
        }
    }

    /// Insert n blank cells at the cursor, shifting right (ICH)
    pub fn insert_chars(&mut self, n: usize) {
        let row = self.cursor.row;
        let col = self.cursor.col;
        let attrs = self.cursor.attrs;
        self.grid.line_mut(row).insert_cells(col, n, attrs);
    }

    /// Delete n cells at the cursor, pulling the rest left (DCH)
    pub fn delete_chars(&mut self, n: usize) {
        let row = self.cursor.row;
        let col = self.cursor.col;
        let attrs = self.cursor.attrs;
        self.grid.line_mut(row).delete_cells(col, n, attrs);
    }

    /// Set a tab stop at the cursor column (HTS)
    pub fn set_tab_stop(&mut self) {
        let col = self.cursor.col;
        if let Some(stop) = self.tab_stops.get_mut(col) {
            *stop = true;
        }
    }

    /// Clear tab stops (TBC): 0 = at cursor, 3 = all
    pub fn clear_tab_stop(&mut self, mode: u16) {
        match mode {
            0 => {
                let col = self.cursor.col;
                if let Some(stop) = self.tab_stops.get_mut(col) {
                    *stop = false;
                }
            }
            3 => self.tab_stops.iter_mut().for_each(|s| *s = false),
            _ => log::debug!("clear_tab_stop: unknown mode {}", mode),
        }
    }

    /// Switch to the alternate screen: snapshot the current rows and cursor,
    /// then present a cleared grid. Re-entering while already active only
    /// clears.
    pub fn enter_alternate_screen(&mut self) {
        if self.alt.is_none() {
            self.alt = Some(AltScreen {
                lines: self.grid.clone_lines(),
                cursor: self.cursor,
                charsets: self.charsets,
            });
        }
        self.grid.clear(CellAttributes::default());
        self.cursor.row = 0;
        self.cursor.col = 0;
        self.cursor.pending_wrap = false;
    }

    /// Leave the alternate screen, restoring the saved rows and cursor
    pub fn exit_alternate_screen(&mut self) {
        if let Some(alt) = self.alt.take() {
            self.grid.restore_lines(alt.lines, CellAttributes::default());
            self.cursor = alt.cursor;
            self.charsets = alt.charsets;
            self.cursor.pending_wrap = false;
            self.clamp_cursor();
        }
    }

    /// Resize the screen, clamping the cursor and tracking the bottom margin.
    /// A bottom margin of 0 or the previous last row both mean "follow the
    /// screen" and move to the new last row.
    pub fn resize(&mut self, dims: Dimensions) {
        let old_rows = self.rows();
        let old_cols = self.cols();
        let attrs = CellAttributes::default();

        self.grid.resize(dims, attrs);

        if dims.cols > old_cols {
            self.tab_stops.resize(dims.cols, false);
            for i in old_cols..dims.cols {
                self.tab_stops[i] = i % DEFAULT_TAB_WIDTH == 0;
            }
        } else {
            self.tab_stops.truncate(dims.cols);
        }

        if self.scroll_bottom == 0 || self.scroll_bottom == old_rows.saturating_sub(1) {
            self.scroll_bottom = dims.rows.saturating_sub(1);
        }
        self.scroll_bottom = self.scroll_bottom.min(dims.rows.saturating_sub(1));
        self.scroll_top = self.scroll_top.min(self.scroll_bottom);

        self.cursor.pending_wrap = false;
        self.clamp_cursor();
    }

    /// Full reset (RIS): fresh state at the current dimensions
    pub fn reset(&mut self) {
        *self = Self::new(self.dimensions());
    }

    /// Soft reset (DECSTR): modes, attributes, charsets and margins reset and
    /// the cursor homes, but the screen content survives
    pub fn soft_reset(&mut self) {
        self.modes.reset();
        self.charsets.reset();
        self.cursor.attrs.reset();
        self.cursor.visible = true;
        self.scroll_top = 0;
        self.scroll_bottom = self.rows().saturating_sub(1);
        self.cursor.row = 0;
        self.cursor.col = 0;
        self.cursor.pending_wrap = false;
    }

    /// Shift In (SI): select G0
    pub fn shift_in(&mut self) {
        self.charsets.shift_in();
    }

    /// Shift Out (SO): select G1
    pub fn shift_out(&mut self) {
        self.charsets.shift_out();
    }

    /// Designate a charset to a slot (0 = G0, 1 = G1)
    pub fn designate_charset(&mut self, slot: u8, designation: char) {
        self.charsets
            .set_slot(slot, parse_charset_designation(designation));
    }
}

fn default_tab_stops(cols: usize) -> Vec<bool> {
    (0..cols).map(|i| i % DEFAULT_TAB_WIDTH == 0).collect()
}
