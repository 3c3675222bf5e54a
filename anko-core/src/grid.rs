//! Terminal grid - the visible screen area
//!
//! A fixed rows x cols buffer of lines. Scroll, insert and delete operate
//! within a caller-supplied region; the grid never grows past `rows`.

use serde::{Deserialize, Serialize};

use crate::cell::CellAttributes;
use crate::line::Line;
use crate::Dimensions;

/// The terminal grid (visible screen area)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    /// Lines in the grid (row 0 is the top)
    lines: Vec<Line>,
    cols: usize,
    rows: usize,
}

impl Grid {
    /// Create a new grid with the specified dimensions
    pub fn new(dims: Dimensions) -> Self {
        let lines = (0..dims.rows).map(|_| Line::new(dims.cols)).collect();
        Self {
            lines,
            cols: dims.cols,
            rows: dims.rows,
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            cols: self.cols,
            rows: self.rows,
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Line at row, panics if out of bounds
    pub fn line(&self, row: usize) -> &Line {
        &self.lines[row]
    }

    /// Mutable line at row, panics if out of bounds
    pub fn line_mut(&mut self, row: usize) -> &mut Line {
        &mut self.lines[row]
    }

    /// Line at row, None if out of bounds
    pub fn get_line(&self, row: usize) -> Option<&Line> {
        self.lines.get(row)
    }

    /// Mutable line at row, None if out of bounds
    pub fn get_line_mut(&mut self, row: usize) -> Option<&mut Line> {
        self.lines.get_mut(row)
    }

    /// Replace all lines with a previously captured set, padding or
    /// truncating to the current dimensions
    pub fn restore_lines(&mut self, mut saved: Vec<Line>, attrs: CellAttributes) {
        for line in &mut saved {
            line.resize(self.cols, attrs);
        }
        saved.resize(self.rows, Line::with_attrs(self.cols, attrs));
        self.lines = saved;
    }

    /// Deep copy of all lines, for the alternate-screen snapshot
    pub fn clone_lines(&self) -> Vec<Line> {
        self.lines.clone()
    }

    /// Clear the entire grid
    pub fn clear(&mut self, attrs: CellAttributes) {
        for line in &mut self.lines {
            line.clear(attrs);
        }
    }

    /// Clear from (row, col) to the end of the screen
    pub fn clear_below(&mut self, row: usize, col: usize, attrs: CellAttributes) {
        if row >= self.rows {
            log::debug!("clear_below: row {} out of bounds ({})", row, self.rows);
            return;
        }
        self.lines[row].clear_from(col.min(self.cols), attrs);
        for line in self.lines.iter_mut().skip(row + 1) {
            line.clear(attrs);
        }
    }

    /// Clear from the start of the screen through (row, col)
    pub fn clear_above(&mut self, row: usize, col: usize, attrs: CellAttributes) {
        if row >= self.rows {
            log::debug!("clear_above: row {} out of bounds ({})", row, self.rows);
            return;
        }
        for line in self.lines.iter_mut().take(row) {
            line.clear(attrs);
        }
        self.lines[row].clear_to(col.min(self.cols.saturating_sub(1)), attrs);
    }

    /// Scroll the region `[top, bottom]` up by n lines: content moves up,
    /// blanks appear at the bottom of the region.
    pub fn scroll_up(&mut self, top: usize, bottom: usize, n: usize, attrs: CellAttributes) {
        if top >= self.rows || bottom >= self.rows || top > bottom {
            log::debug!("scroll_up: bad region {}..={} (rows {})", top, bottom, self.rows);
            return;
        }
        let n = n.min(bottom - top + 1);
        for _ in 0..n {
            self.lines.remove(top);
            self.lines.insert(bottom, Line::with_attrs(self.cols, attrs));
        }
    }

    /// Scroll the region `[top, bottom]` down by n lines: content moves down,
    /// blanks appear at the top of the region.
    pub fn scroll_down(&mut self, top: usize, bottom: usize, n: usize, attrs: CellAttributes) {
        if top >= self.rows || bottom >= self.rows || top > bottom {
            log::debug!("scroll_down: bad region {}..={} (rows {})", top, bottom, self.rows);
            return;
        }
        let n = n.min(bottom - top + 1);
        for _ in 0..n {
            self.lines.remove(bottom);
            self.lines.insert(top, Line::with_attrs(self.cols, attrs));
        }
    }

    /// Insert n blank lines at row, pushing lines toward the bottom of the
    /// region; lines pushed past `bottom` are lost.
    pub fn insert_lines(&mut self, row: usize, n: usize, bottom: usize, attrs: CellAttributes) {
        if row >= self.rows || bottom >= self.rows || row > bottom {
            return;
        }
        self.scroll_down(row, bottom, n, attrs);
    }

    /// Delete n lines at row, pulling lines up from the bottom of the region;
    /// blanks fill in at `bottom`.
    pub fn delete_lines(&mut self, row: usize, n: usize, bottom: usize, attrs: CellAttributes) {
        if row >= self.rows || bottom >= self.rows || row > bottom {
            return;
        }
        self.scroll_up(row, bottom, n, attrs);
    }

    /// Resize the grid to new dimensions
    pub fn resize(&mut self, dims: Dimensions, attrs: CellAttributes) {
        for line in &mut self.lines {
            line.resize(dims.cols, attrs);
        }
        if dims.rows > self.rows {
            for _ in self.rows..dims.rows {
                self.lines.push(Line::with_attrs(dims.cols, attrs));
            }
        } else {
            self.lines.truncate(dims.rows);
        }
        self.cols = dims.cols;
        self.rows = dims.rows;
    }

    /// Iterator over lines
    pub fn iter(&self) -> impl Iterator<Item = &Line> {
        self.lines.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lettered(rows: usize, cols: usize) -> Grid {
        let mut grid = Grid::new(Dimensions::new(cols, rows));
        for row in 0..rows {
            grid.line_mut(row).cell_mut(0).ch = (b'A' + row as u8) as char;
        }
        grid
    }

    #[test]
    fn test_grid_new() {
        let grid = Grid::new(Dimensions::new(80, 24));
        assert_eq!(grid.cols(), 80);
        assert_eq!(grid.rows(), 24);
    }

    #[test]
    fn test_grid_scroll_up() {
        let mut grid = lettered(5, 10);
        // A B C D E -> C D E _ _
        grid.scroll_up(0, 4, 2, CellAttributes::default());
        assert_eq!(grid.line(0).cell(0).ch, 'C');
        assert_eq!(grid.line(1).cell(0).ch, 'D');
        assert_eq!(grid.line(2).cell(0).ch, 'E');
        assert!(grid.line(3).is_blank());
        assert!(grid.line(4).is_blank());
    }

    #[test]
    fn test_grid_scroll_down() {
        let mut grid = lettered(5, 10);
        // A B C D E -> _ _ A B C
        grid.scroll_down(0, 4, 2, CellAttributes::default());
        assert!(grid.line(0).is_blank());
        assert!(grid.line(1).is_blank());
        assert_eq!(grid.line(2).cell(0).ch, 'A');
        assert_eq!(grid.line(3).cell(0).ch, 'B');
        assert_eq!(grid.line(4).cell(0).ch, 'C');
    }

    #[test]
    fn test_grid_scroll_region() {
        let mut grid = lettered(5, 10);
        // Scroll only rows 1-3: A C D _ E
        grid.scroll_up(1, 3, 1, CellAttributes::default());
        assert_eq!(grid.line(0).cell(0).ch, 'A');
        assert_eq!(grid.line(1).cell(0).ch, 'C');
        assert_eq!(grid.line(2).cell(0).ch, 'D');
        assert!(grid.line(3).is_blank());
        assert_eq!(grid.line(4).cell(0).ch, 'E');
    }

    #[test]
    fn test_grid_insert_lines() {
        let mut grid = lettered(5, 10);
        // A B C D E -> A _ _ B C
        grid.insert_lines(1, 2, 4, CellAttributes::default());
        assert_eq!(grid.line(0).cell(0).ch, 'A');
        assert!(grid.line(1).is_blank());
        assert!(grid.line(2).is_blank());
        assert_eq!(grid.line(3).cell(0).ch, 'B');
        assert_eq!(grid.line(4).cell(0).ch, 'C');
    }

    #[test]
    fn test_grid_delete_lines() {
        let mut grid = lettered(5, 10);
        // A B C D E -> A D E _ _
        grid.delete_lines(1, 2, 4, CellAttributes::default());
        assert_eq!(grid.line(0).cell(0).ch, 'A');
        assert_eq!(grid.line(1).cell(0).ch, 'D');
        assert_eq!(grid.line(2).cell(0).ch, 'E');
        assert!(grid.line(3).is_blank());
        assert!(grid.line(4).is_blank());
    }

    #[test]
    fn test_grid_out_of_range_region_is_ignored() {
        let mut grid = lettered(5, 10);
        grid.scroll_up(4, 9, 1, CellAttributes::default());
        grid.delete_lines(9, 1, 4, CellAttributes::default());
        assert_eq!(grid.line(0).cell(0).ch, 'A');
        assert_eq!(grid.rows(), 5);
    }

    #[test]
    fn test_grid_resize() {
        let mut grid = lettered(5, 10);
        grid.resize(Dimensions::new(20, 10), CellAttributes::default());
        assert_eq!(grid.cols(), 20);
        assert_eq!(grid.rows(), 10);
        assert_eq!(grid.line(0).cell(0).ch, 'A');

        grid.resize(Dimensions::new(5, 2), CellAttributes::default());
        assert_eq!(grid.cols(), 5);
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.line(1).cell(0).ch, 'B');
    }

    #[test]
    fn test_grid_restore_lines_adjusts_shape() {
        let mut grid = Grid::new(Dimensions::new(4, 2));
        let saved = vec![Line::new(10), Line::new(10), Line::new(10)];
        grid.restore_lines(saved, CellAttributes::default());
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.line(0).cols(), 4);
    }
}
