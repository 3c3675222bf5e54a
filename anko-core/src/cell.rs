//! Terminal cell representation
//!
//! Each cell in the grid holds one rune and the SGR attributes it was written
//! with.

use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Attributes that affect how a cell is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CellAttributes {
    /// Foreground color
    pub fg: Color,
    /// Background color
    pub bg: Color,
    /// Bold text (SGR 1)
    pub bold: bool,
    /// Underlined text (SGR 4)
    pub underline: bool,
    /// Blinking text (SGR 5)
    pub blink: bool,
    /// Reverse video (SGR 7)
    pub reverse: bool,
    /// Reserved for selection highlighting; never set by the interpreter
    pub highlight: bool,
}

impl CellAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all attributes to defaults
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Foreground after resolving the reverse bit
    pub fn effective_fg(&self) -> Color {
        if self.reverse {
            self.bg
        } else {
            self.fg
        }
    }

    /// Background after resolving the reverse bit
    pub fn effective_bg(&self) -> Color {
        if self.reverse {
            self.fg
        } else {
            self.bg
        }
    }
}

/// A single cell in the terminal grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// The rune stored in this cell
    pub ch: char,
    /// Display attributes
    pub attrs: CellAttributes,
}

impl Cell {
    /// Create a blank cell with default attributes
    pub fn new() -> Self {
        Self {
            ch: ' ',
            attrs: CellAttributes::default(),
        }
    }

    /// Create a blank cell carrying the given attributes
    pub fn blank(attrs: CellAttributes) -> Self {
        Self { ch: ' ', attrs }
    }

    /// Create a cell with a rune and attributes
    pub fn with_char(ch: char, attrs: CellAttributes) -> Self {
        Self { ch, attrs }
    }

    /// Whether the cell shows nothing (a space)
    pub fn is_blank(&self) -> bool {
        self.ch == ' '
    }

    /// Clear the cell, keeping the given attributes
    pub fn clear(&mut self, attrs: CellAttributes) {
        self.ch = ' ';
        self.attrs = attrs;
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::new()
    }
}
