//! Terminal escape sequence parser
//!
//! A state machine in the spirit of the VT500 series parser model
//! (https://vt100.net/emu/dec_ansi_parser), reduced to the sequence set this
//! emulator interprets and extended with:
//! - a printer-controller state (`CSI 5 i` .. `CSI 4 i`) that collects raw
//!   bytes, matching the terminator on the accumulated tail so it survives
//!   chunk splits
//! - a DCS string state with an ESC-pending sub-state, so doubled ESC bytes
//!   inside tmux passthrough payloads are kept
//!
//! Input bytes may arrive split anywhere, including mid-UTF-8-codepoint and
//! mid-escape; all partial state is retained across `parse` calls.

use crate::action::{Action, CsiAction, EscAction, OscMessage};
use crate::params::Params;
use crate::utf8::{Utf8Decoder, Utf8Result};

/// Maximum length for OSC/DCS/APC/printer payloads to prevent DoS
const MAX_STRING_LEN: usize = 65536;
/// Maximum number of intermediate bytes
const MAX_INTERMEDIATES: usize = 4;

/// Parser state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    /// Normal text processing
    Ground,
    /// After ESC
    Escape,
    /// ESC followed by intermediate bytes (charset designation, DECALN)
    EscapeIntermediate,
    /// After CSI
    CsiEntry,
    /// Collecting CSI parameters
    CsiParam,
    /// Collecting CSI intermediate bytes
    CsiIntermediate,
    /// Malformed CSI; consume until the final byte
    CsiIgnore,
    /// Collecting an OSC string
    OscString,
    /// Collecting a DCS string (raw payload)
    DcsString,
    /// Collecting an APC string
    ApcString,
    /// Printer controller mode; raw bytes spool until `ESC [ 4 i`
    Printing,
}

/// The terminal parser
#[derive(Debug, Clone)]
pub struct Parser {
    state: ParserState,
    utf8: Utf8Decoder,
    /// CSI parameter bytes being collected
    params_buf: Vec<u8>,
    /// CSI intermediate bytes
    intermediates: Vec<u8>,
    /// Whether the CSI carried the `?` marker
    private: bool,
    /// Raw marker byte (`?`, `>`, `<`, `=` or 0)
    marker: u8,
    /// OSC/DCS/APC payload being collected
    string_buf: Vec<u8>,
    /// In DcsString: an ESC was seen and may start the terminator
    dcs_esc_pending: bool,
    /// ESC intermediate bytes
    esc_intermediates: Vec<u8>,
    /// Printer payload being collected
    print_buf: Vec<u8>,
}

/// The printer controller exit sequence, matched on the payload tail
const PRINT_EXIT: &[u8] = &[0x1B, b'[', b'4', b'i'];

impl Parser {
    pub fn new() -> Self {
        Self {
            state: ParserState::Ground,
            utf8: Utf8Decoder::new(),
            params_buf: Vec::with_capacity(64),
            intermediates: Vec::with_capacity(MAX_INTERMEDIATES),
            private: false,
            marker: 0,
            string_buf: Vec::with_capacity(256),
            dcs_esc_pending: false,
            esc_intermediates: Vec::with_capacity(MAX_INTERMEDIATES),
            print_buf: Vec::new(),
        }
    }

    /// Current parser state
    pub fn state(&self) -> ParserState {
        self.state
    }

    /// Reset to ground state, dropping any partial sequence
    pub fn reset(&mut self) {
        self.state = ParserState::Ground;
        self.utf8.reset();
        self.params_buf.clear();
        self.intermediates.clear();
        self.private = false;
        self.marker = 0;
        self.string_buf.clear();
        self.dcs_esc_pending = false;
        self.esc_intermediates.clear();
        self.print_buf.clear();
    }

    /// Parse a chunk of bytes, invoking the callback for each action
    pub fn parse<F>(&mut self, data: &[u8], mut callback: F)
    where
        F: FnMut(Action),
    {
        for &byte in data {
            self.advance(byte, &mut callback);
        }
    }

    /// Parse a chunk and collect the actions
    pub fn parse_collect(&mut self, data: &[u8]) -> Vec<Action> {
        let mut actions = Vec::new();
        self.parse(data, |action| actions.push(action));
        actions
    }

    fn advance<F>(&mut self, byte: u8, callback: &mut F)
    where
        F: FnMut(Action),
    {
        // Printer controller consumes raw bytes, invalid UTF-8 included
        if self.state == ParserState::Printing {
            // Oversized payloads roll: the tail must stay intact so the exit
            // sequence is still detected
            if self.print_buf.len() >= MAX_STRING_LEN {
                self.print_buf.remove(0);
            }
            self.print_buf.push(byte);
            if self.print_buf.ends_with(PRINT_EXIT) {
                let len = self.print_buf.len() - PRINT_EXIT.len();
                self.print_buf.truncate(len);
                callback(Action::PrinterJob(std::mem::take(&mut self.print_buf)));
                self.state = ParserState::Ground;
            }
            return;
        }

        // DCS keeps ESC bytes unless they introduce the terminator
        if self.state == ParserState::DcsString {
            if self.dcs_esc_pending {
                self.dcs_esc_pending = false;
                if byte == b'\\' {
                    self.finish_dcs(callback);
                    return;
                }
                self.collect_string_byte(0x1B);
            }
            match byte {
                0x1B => self.dcs_esc_pending = true,
                0x07 | 0x9C => self.finish_dcs(callback),
                0x18 | 0x1A => {
                    self.state = ParserState::Ground;
                    self.string_buf.clear();
                }
                _ => self.collect_string_byte(byte),
            }
            return;
        }

        if self.state == ParserState::OscString || self.state == ParserState::ApcString {
            match byte {
                0x1B => {
                    // Likely ST; finish and let the Escape state eat the `\`
                    self.finish_string(callback);
                    self.state = ParserState::Escape;
                    self.esc_intermediates.clear();
                }
                0x07 | 0x9C => {
                    self.finish_string(callback);
                    self.state = ParserState::Ground;
                }
                0x18 | 0x1A => {
                    self.state = ParserState::Ground;
                    self.string_buf.clear();
                }
                _ => self.collect_string_byte(byte),
            }
            return;
        }

        // C0 controls execute from any remaining state
        if byte < 0x20 {
            match byte {
                0x1B => {
                    self.state = ParserState::Escape;
                    self.esc_intermediates.clear();
                }
                0x18 | 0x1A => self.state = ParserState::Ground,
                0x07..=0x0F => callback(Action::Control(byte)),
                _ => {}
            }
            return;
        }

        // C1 8-bit controls, unless we're inside a UTF-8 sequence
        if (0x80..=0x9F).contains(&byte) && !self.utf8.is_pending() {
            match byte {
                0x84 => callback(Action::Esc(EscAction::Index)),
                0x85 => callback(Action::Esc(EscAction::NextLine)),
                0x8D => callback(Action::Esc(EscAction::ReverseIndex)),
                0x90 => self.enter_dcs(),
                0x9B => self.enter_csi(),
                0x9D => self.enter_osc(),
                0x9F => self.enter_apc(),
                _ => {}
            }
            return;
        }

        match self.state {
            ParserState::Ground => self.handle_ground(byte, callback),
            ParserState::Escape => self.handle_escape(byte, callback),
            ParserState::EscapeIntermediate => self.handle_escape_intermediate(byte, callback),
            ParserState::CsiEntry => self.handle_csi_entry(byte, callback),
            ParserState::CsiParam => self.handle_csi_param(byte, callback),
            ParserState::CsiIntermediate => self.handle_csi_intermediate(byte, callback),
            ParserState::CsiIgnore => {
                if (0x40..=0x7E).contains(&byte) {
                    self.state = ParserState::Ground;
                }
            }
            ParserState::OscString
            | ParserState::DcsString
            | ParserState::ApcString
            | ParserState::Printing => unreachable!("string states handled above"),
        }
    }

    fn handle_ground<F>(&mut self, byte: u8, callback: &mut F)
    where
        F: FnMut(Action),
    {
        if (0x20..0x7F).contains(&byte) {
            callback(Action::Print(byte as char));
        } else if byte >= 0x80 {
            match self.utf8.feed(byte) {
                Utf8Result::Char(c) => callback(Action::Print(c)),
                Utf8Result::Invalid => {
                    log::debug!("dropping invalid UTF-8 byte 0x{:02X}", byte);
                }
                Utf8Result::Pending => {}
            }
        }
    }

    fn handle_escape<F>(&mut self, byte: u8, callback: &mut F)
    where
        F: FnMut(Action),
    {
        self.state = ParserState::Ground;
        match byte {
            b'[' => self.enter_csi(),
            b']' => self.enter_osc(),
            b'P' => self.enter_dcs(),
            b'_' => self.enter_apc(),
            b'\\' => {
                // ST with no open string
            }
            b'7' => callback(Action::Esc(EscAction::SaveCursor)),
            b'8' => callback(Action::Esc(EscAction::RestoreCursor)),
            b'D' => callback(Action::Esc(EscAction::Index)),
            b'E' => callback(Action::Esc(EscAction::NextLine)),
            b'M' => callback(Action::Esc(EscAction::ReverseIndex)),
            b'H' => callback(Action::Esc(EscAction::TabSet)),
            b'c' => callback(Action::Esc(EscAction::FullReset)),
            b'=' | b'>' => {
                // Keypad modes: consumed and ignored
            }
            b'(' | b')' | b'#' => {
                self.esc_intermediates.push(byte);
                self.state = ParserState::EscapeIntermediate;
            }
            0x20..=0x2F => {
                self.esc_intermediates.push(byte);
                self.state = ParserState::EscapeIntermediate;
            }
            0x30..=0x7E => callback(Action::Esc(EscAction::Unknown(vec![byte]))),
            _ => {}
        }
    }

    fn handle_escape_intermediate<F>(&mut self, byte: u8, callback: &mut F)
    where
        F: FnMut(Action),
    {
        match byte {
            0x20..=0x2F => {
                if self.esc_intermediates.len() < MAX_INTERMEDIATES {
                    self.esc_intermediates.push(byte);
                }
            }
            0x30..=0x7E => {
                let action = match (self.esc_intermediates.as_slice(), byte) {
                    ([b'('], c) => EscAction::DesignateG0(c as char),
                    ([b')'], c) => EscAction::DesignateG1(c as char),
                    ([b'#'], b'8') => EscAction::AlignmentTest,
                    _ => {
                        let mut data = self.esc_intermediates.clone();
                        data.push(byte);
                        EscAction::Unknown(data)
                    }
                };
                callback(Action::Esc(action));
                self.state = ParserState::Ground;
            }
            _ => self.state = ParserState::Ground,
        }
    }

    fn enter_csi(&mut self) {
        self.state = ParserState::CsiEntry;
        self.params_buf.clear();
        self.intermediates.clear();
        self.private = false;
        self.marker = 0;
    }

    fn handle_csi_entry<F>(&mut self, byte: u8, callback: &mut F)
    where
        F: FnMut(Action),
    {
        match byte {
            b'?' | b'>' | b'<' | b'=' => {
                self.private = byte == b'?';
                self.marker = byte;
                self.state = ParserState::CsiParam;
            }
            b'0'..=b'9' | b';' | b':' => {
                self.params_buf.push(byte);
                self.state = ParserState::CsiParam;
            }
            0x20..=0x2F => {
                self.intermediates.push(byte);
                self.state = ParserState::CsiIntermediate;
            }
            0x40..=0x7E => self.dispatch_csi(byte, callback),
            _ => self.state = ParserState::CsiIgnore,
        }
    }

    fn handle_csi_param<F>(&mut self, byte: u8, callback: &mut F)
    where
        F: FnMut(Action),
    {
        match byte {
            b'0'..=b'9' | b';' | b':' => self.params_buf.push(byte),
            0x20..=0x2F => {
                self.intermediates.push(byte);
                self.state = ParserState::CsiIntermediate;
            }
            0x40..=0x7E => self.dispatch_csi(byte, callback),
            _ => self.state = ParserState::CsiIgnore,
        }
    }

    fn handle_csi_intermediate<F>(&mut self, byte: u8, callback: &mut F)
    where
        F: FnMut(Action),
    {
        match byte {
            0x20..=0x2F => {
                if self.intermediates.len() < MAX_INTERMEDIATES {
                    self.intermediates.push(byte);
                } else {
                    self.state = ParserState::CsiIgnore;
                }
            }
            0x40..=0x7E => self.dispatch_csi(byte, callback),
            _ => self.state = ParserState::CsiIgnore,
        }
    }

    fn dispatch_csi<F>(&mut self, final_byte: u8, callback: &mut F)
    where
        F: FnMut(Action),
    {
        let params = Params::parse(&self.params_buf);

        // CSI 5 i enters the printer controller; nothing is emitted until the
        // exit sequence arrives
        if final_byte == b'i'
            && !self.private
            && self.marker == 0
            && self.intermediates.is_empty()
            && params.raw(0) == 5
        {
            self.print_buf.clear();
            self.state = ParserState::Printing;
            return;
        }

        callback(Action::Csi(CsiAction {
            params,
            intermediates: self.intermediates.clone(),
            final_byte,
            private: self.private,
            marker: self.marker,
        }));
        self.state = ParserState::Ground;
    }

    fn enter_osc(&mut self) {
        self.state = ParserState::OscString;
        self.string_buf.clear();
    }

    fn enter_dcs(&mut self) {
        self.state = ParserState::DcsString;
        self.string_buf.clear();
        self.dcs_esc_pending = false;
    }

    fn enter_apc(&mut self) {
        self.state = ParserState::ApcString;
        self.string_buf.clear();
    }

    fn collect_string_byte(&mut self, byte: u8) {
        if self.string_buf.len() < MAX_STRING_LEN {
            self.string_buf.push(byte);
        }
    }

    fn finish_dcs<F>(&mut self, callback: &mut F)
    where
        F: FnMut(Action),
    {
        callback(Action::Dcs(std::mem::take(&mut self.string_buf)));
        self.dcs_esc_pending = false;
        self.state = ParserState::Ground;
    }

    fn finish_string<F>(&mut self, callback: &mut F)
    where
        F: FnMut(Action),
    {
        match self.state {
            ParserState::OscString => {
                let data = String::from_utf8_lossy(&self.string_buf).into_owned();
                self.string_buf.clear();
                match data.split_once(';') {
                    Some((cmd, payload)) => match cmd.parse::<u32>() {
                        Ok(command) => callback(Action::Osc(OscMessage {
                            command,
                            payload: payload.to_string(),
                        })),
                        Err(_) => log::debug!("invalid OSC command number: {:?}", cmd),
                    },
                    None => log::debug!("invalid OSC (no separator): {:?}", data),
                }
            }
            ParserState::ApcString => {
                callback(Action::Apc(std::mem::take(&mut self.string_buf)));
            }
            _ => {}
        }
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}
