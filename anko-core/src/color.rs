//! Semantic color references for terminal cells
//!
//! The interpreter never resolves colors itself; it records a reference
//! (default, palette index, or direct RGB) and the renderer maps references to
//! concrete colors. `to_rgb` is provided for renderers that want the standard
//! xterm palette.

use serde::{Deserialize, Serialize};

/// Color reference supporting all terminal color modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Color {
    /// Default terminal foreground or background
    Default,
    /// Indexed color (0-255)
    /// 0-7: standard colors
    /// 8-15: bright colors
    /// 16-231: 6x6x6 color cube
    /// 232-255: grayscale
    Indexed(u8),
    /// 24-bit RGB color
    Rgb { r: u8, g: u8, b: u8 },
}

impl Color {
    pub const BLACK: u8 = 0;
    pub const RED: u8 = 1;
    pub const GREEN: u8 = 2;
    pub const YELLOW: u8 = 3;
    pub const BLUE: u8 = 4;
    pub const MAGENTA: u8 = 5;
    pub const CYAN: u8 = 6;
    pub const WHITE: u8 = 7;

    /// Create a new indexed color
    pub fn indexed(index: u8) -> Self {
        Color::Indexed(index)
    }

    /// Create a new RGB color
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::Rgb { r, g, b }
    }

    /// Resolve to RGB using the standard xterm palette.
    /// `Default` resolves to white; themed renderers should special-case it.
    pub fn to_rgb(&self) -> (u8, u8, u8) {
        match self {
            Color::Default => (255, 255, 255),
            Color::Indexed(idx) => index_to_rgb(*idx),
            Color::Rgb { r, g, b } => (*r, *g, *b),
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::Default
    }
}

/// The six intensity bands of the xterm 6x6x6 color cube.
const CUBE_BANDS: [u8; 6] = [0x00, 0x5f, 0x87, 0xaf, 0xd7, 0xff];

/// Convert a 256-color index to RGB values using the xterm palette
fn index_to_rgb(index: u8) -> (u8, u8, u8) {
    match index {
        0 => (0, 0, 0),
        1 => (170, 0, 0),
        2 => (0, 170, 0),
        3 => (170, 170, 0),
        4 => (0, 0, 170),
        5 => (170, 0, 170),
        6 => (0, 255, 255),
        7 => (170, 170, 170),

        8 => (85, 85, 85),
        9 => (255, 85, 85),
        10 => (85, 255, 85),
        11 => (255, 255, 85),
        12 => (85, 85, 255),
        13 => (255, 85, 255),
        14 => (85, 255, 255),
        15 => (255, 255, 255),

        16..=231 => {
            let idx = index - 16;
            let b = idx % 6;
            let g = (idx / 6) % 6;
            let r = idx / 36;
            (
                CUBE_BANDS[r as usize],
                CUBE_BANDS[g as usize],
                CUBE_BANDS[b as usize],
            )
        }

        232..=255 => {
            let gray = (index - 232) * 10;
            (gray, gray, gray)
        }
    }
}
