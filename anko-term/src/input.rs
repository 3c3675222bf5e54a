//! Keyboard and mouse input encoding
//!
//! Translates UI events into the byte sequences a PTY expects:
//! - printable keys as UTF-8
//! - special keys per the xterm conventions, with modifier-aware CSI forms
//! - mouse reports in the legacy (X10/VT200) and SGR encodings
//! - bracketed paste wrappers

use anko_core::{Modes, MouseMode};

/// Keyboard key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Tab,
    Backspace,
    Escape,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    Delete,
    F(u8),
}

/// Keyboard modifiers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub fn new() -> Self {
        Self::default()
    }

    /// xterm modifier parameter (1 = none, 2 = shift, 3 = alt, 5 = ctrl, ...)
    pub fn code(&self) -> u8 {
        let mut code = 1u8;
        if self.shift {
            code += 1;
        }
        if self.alt {
            code += 2;
        }
        if self.ctrl {
            code += 4;
        }
        code
    }
}

/// Encode a key press. An unknown combination encodes to an empty vector,
/// which callers treat as a no-op.
pub fn encode_key(key: Key, modifiers: Modifiers, modes: &Modes) -> Vec<u8> {
    match key {
        Key::Char(c) => encode_char(c, modifiers),
        Key::Enter => {
            if modes.newline {
                b"\r\n".to_vec()
            } else {
                vec![b'\r']
            }
        }
        Key::Tab => {
            if modifiers.shift {
                b"\x1b[Z".to_vec()
            } else {
                vec![b'\t']
            }
        }
        Key::Backspace => {
            if modifiers.alt {
                vec![0x1B, 0x7F]
            } else {
                vec![0x7F]
            }
        }
        Key::Escape => vec![0x1B],
        Key::Up => encode_cursor_key(b'A', modifiers, modes.app_cursor_keys),
        Key::Down => encode_cursor_key(b'B', modifiers, modes.app_cursor_keys),
        Key::Right => encode_cursor_key(b'C', modifiers, modes.app_cursor_keys),
        Key::Left => encode_cursor_key(b'D', modifiers, modes.app_cursor_keys),
        Key::Home => encode_cursor_key(b'H', modifiers, modes.app_cursor_keys),
        Key::End => encode_cursor_key(b'F', modifiers, modes.app_cursor_keys),
        Key::Insert => encode_tilde_key(2, modifiers),
        Key::Delete => encode_tilde_key(3, modifiers),
        Key::PageUp => encode_tilde_key(5, modifiers),
        Key::PageDown => encode_tilde_key(6, modifiers),
        Key::F(n) => encode_function_key(n, modifiers),
    }
}

fn encode_char(c: char, modifiers: Modifiers) -> Vec<u8> {
    if modifiers.ctrl {
        if c.is_ascii_alphabetic() {
            let ctrl = (c.to_ascii_uppercase() as u8) - b'A' + 1;
            if modifiers.alt {
                return vec![0x1B, ctrl];
            }
            return vec![ctrl];
        }
        match c {
            '@' => return vec![0x00],
            '[' => return vec![0x1B],
            '\\' => return vec![0x1C],
            ']' => return vec![0x1D],
            '^' => return vec![0x1E],
            '_' => return vec![0x1F],
            '?' => return vec![0x7F],
            _ => {}
        }
    }

    let mut bytes = Vec::with_capacity(5);
    if modifiers.alt {
        bytes.push(0x1B);
    }
    let mut buf = [0u8; 4];
    bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
    bytes
}

/// Arrow keys and Home/End: CSI (or SS3 in application mode), with the
/// `CSI 1 ; m X` form when modifiers are held
fn encode_cursor_key(key: u8, modifiers: Modifiers, app_cursor: bool) -> Vec<u8> {
    let m = modifiers.code();
    if m > 1 {
        vec![0x1B, b'[', b'1', b';', b'0' + m, key]
    } else if app_cursor {
        vec![0x1B, b'O', key]
    } else {
        vec![0x1B, b'[', key]
    }
}

/// Keys encoded as `CSI n ~` (Insert/Delete/PageUp/PageDown)
fn encode_tilde_key(code: u8, modifiers: Modifiers) -> Vec<u8> {
    let m = modifiers.code();
    if m > 1 {
        format!("\x1b[{};{}~", code, m).into_bytes()
    } else {
        format!("\x1b[{}~", code).into_bytes()
    }
}

fn encode_function_key(n: u8, modifiers: Modifiers) -> Vec<u8> {
    let code = match n {
        1 => 11,
        2 => 12,
        3 => 13,
        4 => 14,
        5 => 15,
        6 => 17,
        7 => 18,
        8 => 19,
        9 => 20,
        10 => 21,
        11 => 23,
        12 => 24,
        _ => return vec![],
    };
    encode_tilde_key(code, modifiers)
}

/// Mouse button in an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    WheelUp,
    WheelDown,
}

impl MouseButton {
    fn index(self) -> u16 {
        match self {
            MouseButton::Left => 0,
            MouseButton::Middle => 1,
            MouseButton::Right => 2,
            MouseButton::WheelUp => 64,
            MouseButton::WheelDown => 65,
        }
    }
}

/// Encode a mouse press or release at a 0-indexed cell position.
/// Returns empty when the active mode does not report this event.
pub fn encode_mouse(
    button: MouseButton,
    modifiers: Modifiers,
    col: u16,
    row: u16,
    press: bool,
    modes: &Modes,
) -> Vec<u8> {
    match modes.mouse_mode {
        MouseMode::Off => return vec![],
        MouseMode::X10 if !press => return vec![],
        _ => {}
    }

    let mut mods = 0u16;
    if modifiers.shift {
        mods += 4;
    }
    if modifiers.alt {
        mods += 8;
    }
    if modifiers.ctrl {
        mods += 16;
    }

    // 1-based cell coordinates on the wire
    let x = col.saturating_add(1);
    let y = row.saturating_add(1);

    if modes.mouse_sgr {
        let b = button.index() + mods;
        let suffix = if press { 'M' } else { 'm' };
        format!("\x1b[<{};{};{}{}", b, x, y, suffix).into_bytes()
    } else {
        // Legacy encoding; release is reported as button 3
        let b = if press { button.index() } else { 3 } + mods;
        vec![
            0x1B,
            b'[',
            b'M',
            32 + b as u8,
            32 + x.min(223) as u8,
            32 + y.min(223) as u8,
        ]
    }
}

/// Bracketed paste wrapper prefix
pub fn bracketed_paste_start() -> &'static [u8] {
    b"\x1b[200~"
}

/// Bracketed paste wrapper suffix
pub fn bracketed_paste_end() -> &'static [u8] {
    b"\x1b[201~"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn modes() -> Modes {
        Modes::new()
    }

    #[test]
    fn test_encode_printable() {
        assert_eq!(encode_key(Key::Char('a'), Modifiers::new(), &modes()), b"a");
        assert_eq!(
            encode_key(Key::Char('é'), Modifiers::new(), &modes()),
            "é".as_bytes()
        );
    }

    #[test]
    fn test_encode_enter_lnm() {
        let mut m = modes();
        assert_eq!(encode_key(Key::Enter, Modifiers::new(), &m), b"\r");
        m.newline = true;
        assert_eq!(encode_key(Key::Enter, Modifiers::new(), &m), b"\r\n");
    }

    #[test]
    fn test_encode_backspace_and_tab() {
        assert_eq!(encode_key(Key::Backspace, Modifiers::new(), &modes()), [0x7F]);
        assert_eq!(encode_key(Key::Tab, Modifiers::new(), &modes()), b"\t");
    }

    #[test]
    fn test_encode_ctrl_char() {
        let ctrl = Modifiers {
            ctrl: true,
            ..Default::default()
        };
        assert_eq!(encode_key(Key::Char('c'), ctrl, &modes()), [0x03]);
        assert_eq!(encode_key(Key::Char('a'), ctrl, &modes()), [0x01]);
    }

    #[test]
    fn test_encode_alt_char() {
        let alt = Modifiers {
            alt: true,
            ..Default::default()
        };
        assert_eq!(encode_key(Key::Char('x'), alt, &modes()), [0x1B, b'x']);
    }

    #[test]
    fn test_encode_arrows_follow_cursor_key_mode() {
        let mut m = modes();
        assert_eq!(encode_key(Key::Up, Modifiers::new(), &m), b"\x1b[A");
        m.app_cursor_keys = true;
        assert_eq!(encode_key(Key::Up, Modifiers::new(), &m), b"\x1bOA");
    }

    #[test]
    fn test_encode_arrow_with_modifiers() {
        let shift = Modifiers {
            shift: true,
            ..Default::default()
        };
        assert_eq!(encode_key(Key::Up, shift, &modes()), b"\x1b[1;2A");
        let ctrl = Modifiers {
            ctrl: true,
            ..Default::default()
        };
        assert_eq!(encode_key(Key::Right, ctrl, &modes()), b"\x1b[1;5C");
    }

    #[test]
    fn test_encode_function_keys() {
        assert_eq!(encode_key(Key::F(1), Modifiers::new(), &modes()), b"\x1b[11~");
        assert_eq!(encode_key(Key::F(5), Modifiers::new(), &modes()), b"\x1b[15~");
        assert_eq!(encode_key(Key::F(12), Modifiers::new(), &modes()), b"\x1b[24~");
        assert!(encode_key(Key::F(20), Modifiers::new(), &modes()).is_empty());
    }

    #[test]
    fn test_encode_navigation_keys() {
        assert_eq!(encode_key(Key::Delete, Modifiers::new(), &modes()), b"\x1b[3~");
        assert_eq!(encode_key(Key::PageUp, Modifiers::new(), &modes()), b"\x1b[5~");
        assert_eq!(encode_key(Key::Home, Modifiers::new(), &modes()), b"\x1b[H");
    }

    #[test]
    fn test_encode_mouse_off() {
        let m = modes();
        assert!(encode_mouse(MouseButton::Left, Modifiers::new(), 0, 0, true, &m).is_empty());
    }

    #[test]
    fn test_encode_mouse_legacy() {
        let mut m = modes();
        m.mouse_mode = MouseMode::Vt200;
        let bytes = encode_mouse(MouseButton::Left, Modifiers::new(), 0, 0, true, &m);
        assert_eq!(bytes, vec![0x1B, b'[', b'M', 32, 33, 33]);

        let bytes = encode_mouse(MouseButton::Left, Modifiers::new(), 0, 0, false, &m);
        assert_eq!(bytes, vec![0x1B, b'[', b'M', 35, 33, 33]);
    }

    #[test]
    fn test_encode_mouse_x10_press_only() {
        let mut m = modes();
        m.mouse_mode = MouseMode::X10;
        assert!(!encode_mouse(MouseButton::Left, Modifiers::new(), 1, 1, true, &m).is_empty());
        assert!(encode_mouse(MouseButton::Left, Modifiers::new(), 1, 1, false, &m).is_empty());
    }

    #[test]
    fn test_encode_mouse_sgr() {
        let mut m = modes();
        m.mouse_mode = MouseMode::Vt200;
        m.mouse_sgr = true;
        let bytes = encode_mouse(MouseButton::Left, Modifiers::new(), 10, 20, true, &m);
        assert_eq!(bytes, b"\x1b[<0;11;21M");
        let bytes = encode_mouse(MouseButton::Left, Modifiers::new(), 10, 20, false, &m);
        assert_eq!(bytes, b"\x1b[<0;11;21m");
    }

    #[test]
    fn test_encode_mouse_modifier_bits() {
        let mut m = modes();
        m.mouse_mode = MouseMode::Vt200;
        m.mouse_sgr = true;
        let mods = Modifiers {
            shift: true,
            ctrl: true,
            ..Default::default()
        };
        let bytes = encode_mouse(MouseButton::Right, mods, 0, 0, true, &m);
        // button 2 + shift(4) + ctrl(16)
        assert_eq!(bytes, b"\x1b[<22;1;1M");
    }

    #[test]
    fn test_bracketed_paste_wrappers() {
        assert_eq!(bracketed_paste_start(), b"\x1b[200~");
        assert_eq!(bracketed_paste_end(), b"\x1b[201~");
    }
}
