//! Terminal mode flags

use serde::{Deserialize, Serialize};

/// Active mouse reporting mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MouseMode {
    /// No mouse reporting
    #[default]
    Off,
    /// X10 compatibility mode (`?9`): press events only
    X10,
    /// VT200 normal tracking (`?1000`): press and release
    Vt200,
}

/// Terminal mode flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modes {
    /// IRM - insert mode: printed characters shift the rest of the line right
    pub insert: bool,
    /// LNM - new line mode: LF implies CR
    pub newline: bool,
    /// DECAWM - autowrap at the right margin
    pub auto_wrap: bool,
    /// DECOM - cursor addressing relative to the scroll region
    pub origin: bool,
    /// DECCKM - arrow keys send SS3 sequences
    pub app_cursor_keys: bool,
    /// DECTCEM mirror; the live bit lives on the cursor
    pub cursor_visible: bool,
    /// `?12` - local echo
    pub local_echo: bool,
    /// `?2004` - bracketed paste
    pub bracketed_paste: bool,
    /// `?9` / `?1000`
    pub mouse_mode: MouseMode,
    /// `?1006` - SGR extended mouse coordinates
    pub mouse_sgr: bool,
}

impl Modes {
    pub fn new() -> Self {
        Self {
            insert: false,
            newline: false,
            auto_wrap: true,
            origin: false,
            app_cursor_keys: false,
            cursor_visible: true,
            local_echo: true,
            bracketed_paste: false,
            mouse_mode: MouseMode::Off,
            mouse_sgr: false,
        }
    }

    /// Reset all modes to defaults
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for Modes {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modes_default() {
        let modes = Modes::new();
        assert!(modes.auto_wrap);
        assert!(modes.cursor_visible);
        assert!(modes.local_echo);
        assert!(!modes.bracketed_paste);
        assert_eq!(modes.mouse_mode, MouseMode::Off);
    }

    #[test]
    fn test_modes_reset() {
        let mut modes = Modes::new();
        modes.origin = true;
        modes.mouse_mode = MouseMode::Vt200;
        modes.reset();
        assert!(!modes.origin);
        assert_eq!(modes.mouse_mode, MouseMode::Off);
    }
}
