//! Terminal state management
//!
//! `Terminal` glues the parser to the screen model: it interprets parsed
//! actions, mutates the screen, and writes replies (DSR, DA, window reports)
//! to the writer. It also owns the host-facing registries: OSC/APC handlers,
//! the printer sink, config listeners and key remapping.
//!
//! All mutation goes through `&mut self`; embedders that feed PTY bytes from
//! one thread and deliver UI events from another wrap the terminal in a
//! mutex, which also serializes resize against interpretation.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Write};
use std::sync::mpsc::Sender;

use anko_core::{Color, CursorShape, Dimensions, MouseMode, Screen, Snapshot};
use anko_parser::{Action, CsiAction, EscAction, OscMessage, Parser};

use crate::input::{self, Key, Modifiers, MouseButton};

/// Terminal configuration reported to listeners on title and size changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub title: String,
    pub rows: usize,
    pub cols: usize,
}

/// Token identifying a registered listener
pub type ListenerId = usize;

/// Sink for printer-controller payloads (`CSI 5 i` .. `CSI 4 i`)
pub trait Printer: Send {
    fn print(&mut self, data: &[u8]);
}

impl<F: FnMut(&[u8]) + Send> Printer for F {
    fn print(&mut self, data: &[u8]) {
        self(data)
    }
}

type OscHandler = Box<dyn FnMut(&str) + Send>;
type ApcHandler = Box<dyn FnMut(&str) + Send>;

/// The terminal emulator core
pub struct Terminal {
    screen: Screen,
    parser: Parser,
    writer: Option<Box<dyn Write + Send>>,
    printer: Option<Box<dyn Printer>>,
    osc_handlers: HashMap<u32, OscHandler>,
    /// Sorted by descending prefix length so the longest match wins
    apc_handlers: Vec<(String, ApcHandler)>,
    listeners: Vec<(ListenerId, Sender<Config>)>,
    next_listener_id: ListenerId,
    key_remap: HashMap<Key, Key>,
    bell: bool,
    title_changed: bool,
    working_directory: Option<String>,
    /// Raw-byte trace sink, enabled with ANKO_TERM_TRACE
    trace: Option<File>,
}

impl Terminal {
    /// Create a terminal at the default 80x24
    pub fn new() -> Self {
        let dims = Dimensions::default();
        Self::with_size(dims.rows, dims.cols)
    }

    /// Create a terminal with the given grid size
    pub fn with_size(rows: usize, cols: usize) -> Self {
        let trace = std::env::var_os("ANKO_TERM_TRACE").and_then(|path| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .ok()
        });
        Self {
            screen: Screen::new(Dimensions::new(cols, rows)),
            parser: Parser::new(),
            writer: None,
            printer: None,
            osc_handlers: HashMap::new(),
            apc_handlers: Vec::new(),
            listeners: Vec::new(),
            next_listener_id: 0,
            key_remap: HashMap::new(),
            bell: false,
            title_changed: false,
            working_directory: None,
            trace,
        }
    }

    /// The screen state, for renderers and tests
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Current window title
    pub fn title(&self) -> &str {
        self.screen.title()
    }

    /// Working directory last reported via OSC 7
    pub fn working_directory(&self) -> Option<&str> {
        self.working_directory.as_deref()
    }

    /// Check and clear the bell flag
    pub fn take_bell(&mut self) -> bool {
        std::mem::take(&mut self.bell)
    }

    /// Check and clear the title-changed flag
    pub fn take_title_changed(&mut self) -> bool {
        std::mem::take(&mut self.title_changed)
    }

    /// Attach the writer that receives replies and encoded input
    pub fn set_writer(&mut self, writer: Box<dyn Write + Send>) {
        self.writer = Some(writer);
    }

    /// Send bytes to the PTY. Fails with an EOF-kind error when no writer is
    /// attached.
    pub fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        match self.writer.as_mut() {
            Some(writer) => {
                let n = writer.write(bytes)?;
                writer.flush()?;
                Ok(n)
            }
            None => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "terminal has no writer",
            )),
        }
    }

    /// Request that the child session exits (EOT)
    pub fn exit(&mut self) {
        if let Err(e) = self.write(&[0x04]) {
            log::debug!("exit: {}", e);
        }
    }

    /// Register a handler for an OSC command number; it overrides the
    /// built-in handling for that command
    pub fn register_osc_handler<F>(&mut self, command: u32, handler: F)
    where
        F: FnMut(&str) + Send + 'static,
    {
        self.osc_handlers.insert(command, Box::new(handler));
    }

    /// Register an APC handler for a command prefix. Dispatch picks the
    /// longest registered prefix that matches.
    pub fn register_apc_handler<F>(&mut self, prefix: &str, handler: F)
    where
        F: FnMut(&str) + Send + 'static,
    {
        self.apc_handlers.retain(|(p, _)| p != prefix);
        self.apc_handlers.push((prefix.to_string(), Box::new(handler)));
        self.apc_handlers
            .sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()));
    }

    /// Set the sink that receives printer-controller payloads
    pub fn set_printer<P: Printer + 'static>(&mut self, printer: P) {
        self.printer = Some(Box::new(printer));
    }

    /// Register a channel that receives the `Config` on title/size changes
    pub fn add_listener(&mut self, listener: Sender<Config>) -> ListenerId {
        let id = self.next_listener_id;
        self.next_listener_id += 1;
        self.listeners.push((id, listener));
        id
    }

    /// Remove a previously registered listener
    pub fn remove_listener(&mut self, id: ListenerId) {
        self.listeners.retain(|(lid, _)| *lid != id);
    }

    /// Remap a key before encoding
    pub fn remap_key(&mut self, from: Key, to: Key) {
        self.key_remap.insert(from, to);
    }

    /// Push PTY output bytes through the parser and interpreter
    pub fn feed(&mut self, bytes: &[u8]) {
        self.trace_input(bytes);
        let mut actions = Vec::new();
        self.parser.parse(bytes, |action| actions.push(action));
        for action in actions {
            self.handle_action(action);
        }
    }

    /// Resize the grid, clamping cursor and margins, and notify listeners.
    /// PTY resizing is the session's job.
    pub fn resize(&mut self, rows: usize, cols: usize) {
        let dims = Dimensions::new(cols, rows);
        if dims == self.screen.dimensions() {
            return;
        }
        self.screen.resize(dims);
        self.notify_listeners();
    }

    /// A consistent copy of the visible state for rendering
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from_screen(&self.screen)
    }

    /// Encode and send a key event. Unknown keys are a no-op.
    pub fn key_event(&mut self, key: Key, modifiers: Modifiers) -> io::Result<()> {
        let key = self.key_remap.get(&key).copied().unwrap_or(key);
        let bytes = input::encode_key(key, modifiers, self.screen.modes());
        if bytes.is_empty() {
            return Ok(());
        }
        self.write(&bytes).map(|_| ())
    }

    /// Encode and send a mouse event at a 0-indexed cell position. A no-op
    /// unless a reporting mode is active.
    pub fn mouse_event(
        &mut self,
        button: MouseButton,
        modifiers: Modifiers,
        col: u16,
        row: u16,
        press: bool,
    ) -> io::Result<()> {
        let bytes = input::encode_mouse(button, modifiers, col, row, press, self.screen.modes());
        if bytes.is_empty() {
            return Ok(());
        }
        self.write(&bytes).map(|_| ())
    }

    /// Send pasted text, wrapped when bracketed paste is active
    pub fn paste(&mut self, text: &str) -> io::Result<()> {
        if self.screen.modes().bracketed_paste {
            let mut bytes = Vec::with_capacity(text.len() + 12);
            bytes.extend_from_slice(input::bracketed_paste_start());
            bytes.extend_from_slice(text.as_bytes());
            bytes.extend_from_slice(input::bracketed_paste_end());
            self.write(&bytes).map(|_| ())
        } else {
            self.write(text.as_bytes()).map(|_| ())
        }
    }

    fn trace_input(&mut self, bytes: &[u8]) {
        let Some(trace) = self.trace.as_mut() else {
            return;
        };
        if bytes.is_empty() {
            return;
        }
        let mut line = String::with_capacity(bytes.len() * 3 + 4);
        line.push_str("IN ");
        for (i, b) in bytes.iter().enumerate() {
            if i > 0 {
                line.push(' ');
            }
            line.push_str(&format!("{:02X}", b));
        }
        line.push('\n');
        let _ = trace.write_all(line.as_bytes());
    }

    /// Best-effort reply to the PTY; failures are logged, never fatal
    fn reply(&mut self, bytes: &[u8]) {
        if let Err(e) = self.write(bytes) {
            log::debug!("dropping reply: {}", e);
        }
    }

    fn notify_listeners(&mut self) {
        let dims = self.screen.dimensions();
        let config = Config {
            title: self.screen.title().to_string(),
            rows: dims.rows,
            cols: dims.cols,
        };
        self.listeners
            .retain(|(_, tx)| tx.send(config.clone()).is_ok());
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::Print(c) => self.screen.print(c),
            Action::Control(byte) => self.handle_control(byte),
            Action::Esc(esc) => self.handle_esc(esc),
            Action::Csi(csi) => self.handle_csi(csi),
            Action::Osc(osc) => self.handle_osc(osc),
            Action::Dcs(data) => self.handle_dcs(&data),
            Action::Apc(data) => self.handle_apc(&data),
            Action::PrinterJob(data) => self.handle_printer_job(data),
        }
    }

    fn handle_control(&mut self, byte: u8) {
        match byte {
            0x07 => self.bell = true,
            0x08 => self.screen.backspace(),
            0x09 => self.screen.tab(),
            0x0A..=0x0C => self.screen.linefeed(),
            0x0D => self.screen.carriage_return(),
            0x0E => self.screen.shift_out(),
            0x0F => self.screen.shift_in(),
            _ => log::trace!("unhandled C0 control 0x{:02X}", byte),
        }
    }

    fn handle_esc(&mut self, esc: EscAction) {
        match esc {
            EscAction::SaveCursor => self.screen.save_cursor(),
            EscAction::RestoreCursor => self.screen.restore_cursor(),
            EscAction::Index => self.screen.index(),
            EscAction::NextLine => self.screen.next_line(),
            EscAction::ReverseIndex => self.screen.reverse_index(),
            EscAction::TabSet => self.screen.set_tab_stop(),
            EscAction::FullReset => {
                self.screen.reset();
                self.parser.reset();
            }
            EscAction::DesignateG0(c) => self.screen.designate_charset(0, c),
            EscAction::DesignateG1(c) => self.screen.designate_charset(1, c),
            EscAction::AlignmentTest => self.alignment_test(),
            EscAction::Unknown(data) => {
                log::debug!("unknown ESC sequence: {:?}", data);
            }
        }
    }

    /// DECALN: fill the screen with E and home the cursor
    fn alignment_test(&mut self) {
        let rows = self.screen.rows();
        let cols = self.screen.cols();
        for row in 0..rows {
            self.screen.move_cursor_to(row + 1, 1);
            for _ in 0..cols {
                self.screen.print('E');
            }
        }
        self.screen.move_cursor_to(1, 1);
    }

    fn handle_csi(&mut self, csi: CsiAction) {
        if csi.marker == b'>' {
            self.handle_csi_gt(&csi);
            return;
        }
        if csi.private {
            self.handle_csi_private(&csi);
            return;
        }
        if csi.marker != 0 {
            log::debug!(
                "unknown CSI marker '{}' final '{}'",
                csi.marker as char,
                csi.final_byte as char
            );
            return;
        }
        if !csi.intermediates.is_empty() {
            self.handle_csi_intermediate(&csi);
            return;
        }

        match csi.final_byte {
            b'@' => {
                // ICH - insert blanks at the cursor
                self.screen.insert_chars(csi.param(0, 1) as usize);
            }
            b'A' => self.screen.move_cursor_up(csi.param(0, 1) as usize),
            b'B' => self.screen.move_cursor_down(csi.param(0, 1) as usize),
            b'C' => self.screen.move_cursor_right(csi.param(0, 1) as usize),
            b'D' => self.screen.move_cursor_left(csi.param(0, 1) as usize),
            b'E' => {
                // CNL - next line
                self.screen.move_cursor_down(csi.param(0, 1) as usize);
                self.screen.carriage_return();
            }
            b'F' => {
                // CPL - previous line
                self.screen.move_cursor_up(csi.param(0, 1) as usize);
                self.screen.carriage_return();
            }
            b'G' => {
                // CHA - column absolute
                self.screen.set_cursor_col(csi.param(0, 1) as usize);
            }
            b'H' | b'f' => {
                // CUP/HVP
                let row = csi.param(0, 1) as usize;
                let col = csi.param(1, 1) as usize;
                self.screen.move_cursor_to(row, col);
            }
            b'J' => self.screen.erase_display(csi.params.raw(0)),
            b'K' => self.screen.erase_line(csi.params.raw(0)),
            b'L' => self.screen.insert_lines(csi.param(0, 1) as usize),
            b'M' => self.screen.delete_lines(csi.param(0, 1) as usize),
            b'P' => self.screen.delete_chars(csi.param(0, 1) as usize),
            b'S' => self.screen.scroll_up(csi.param(0, 1) as usize),
            b'T' => self.screen.scroll_down(csi.param(0, 1) as usize),
            b'X' => self.screen.erase_chars(csi.param(0, 1) as usize),
            b'a' => {
                // HPR - column relative
                self.screen.move_cursor_right(csi.param(0, 1) as usize);
            }
            b'd' => {
                // VPA - row absolute
                self.screen.set_cursor_row(csi.param(0, 1) as usize);
            }
            b'e' => {
                // VPR - row relative
                self.screen.move_cursor_down(csi.param(0, 1) as usize);
            }
            b'g' => self.screen.clear_tab_stop(csi.params.raw(0)),
            b'h' => self.set_ansi_modes(&csi, true),
            b'l' => self.set_ansi_modes(&csi, false),
            b'm' => self.handle_sgr(&csi),
            b'n' => self.handle_dsr(&csi),
            b'c' => {
                // DA1: VT220-class answer
                self.reply(b"\x1b[?6c");
            }
            b'i' => {
                // The parser owns printer-controller transitions; a stray
                // exit or a print-screen request lands here
                log::debug!("ignoring CSI {} i", csi.params.raw(0));
            }
            b'r' => {
                // DECSTBM
                let top = csi.param(0, 1) as usize;
                let bottom = csi.param(1, self.screen.rows() as u16) as usize;
                self.screen.set_scroll_region(top, bottom);
            }
            b's' => self.screen.save_cursor(),
            b'u' => self.screen.restore_cursor(),
            b't' => self.handle_window_ops(&csi),
            _ => {
                log::debug!(
                    "unknown CSI sequence: {:?} final '{}'",
                    csi.params,
                    csi.final_byte as char
                );
            }
        }
    }

    /// SM/RM without the private marker
    fn set_ansi_modes(&mut self, csi: &CsiAction, set: bool) {
        for param in csi.params.iter() {
            match param {
                4 => self.screen.modes_mut().insert = set,
                // Some terminfo entries drive autowrap through SM/RM 7
                7 => self.screen.modes_mut().auto_wrap = set,
                20 => self.screen.modes_mut().newline = set,
                _ => log::debug!("unknown ANSI mode {} (set={})", param, set),
            }
        }
    }

    fn handle_csi_gt(&mut self, csi: &CsiAction) {
        match csi.final_byte {
            b'c' => {
                // DA2: xterm-ish type/version report
                self.reply(b"\x1b[>0;115;0c");
            }
            _ => {
                log::debug!(
                    "unknown CSI > sequence: {:?} final '{}'",
                    csi.params,
                    csi.final_byte as char
                );
            }
        }
    }

    fn handle_csi_private(&mut self, csi: &CsiAction) {
        let set = match csi.final_byte {
            b'h' => true,
            b'l' => false,
            _ => {
                log::debug!(
                    "unknown private CSI: ?{:?} final '{}'",
                    csi.params,
                    csi.final_byte as char
                );
                return;
            }
        };

        for param in csi.params.iter() {
            match param {
                1 => self.screen.modes_mut().app_cursor_keys = set,
                6 => {
                    self.screen.modes_mut().origin = set;
                    // DECOM homes the cursor (origin-relative when set)
                    self.screen.move_cursor_to(1, 1);
                }
                7 => self.screen.modes_mut().auto_wrap = set,
                9 => {
                    self.screen.modes_mut().mouse_mode =
                        if set { MouseMode::X10 } else { MouseMode::Off };
                }
                12 => self.screen.modes_mut().local_echo = set,
                20 => self.screen.modes_mut().newline = set,
                25 => {
                    self.screen.modes_mut().cursor_visible = set;
                    self.screen.cursor_mut().visible = set;
                }
                47 => {
                    if set {
                        self.screen.enter_alternate_screen();
                    } else {
                        self.screen.exit_alternate_screen();
                    }
                }
                1000 => {
                    self.screen.modes_mut().mouse_mode =
                        if set { MouseMode::Vt200 } else { MouseMode::Off };
                }
                1006 => self.screen.modes_mut().mouse_sgr = set,
                1048 => {
                    if set {
                        self.screen.save_cursor();
                    } else {
                        self.screen.restore_cursor();
                    }
                }
                1049 => {
                    // 1048 + 47; the alternate-screen snapshot carries the
                    // cursor, so enter/exit covers both halves
                    if set {
                        self.screen.save_cursor();
                        self.screen.enter_alternate_screen();
                    } else {
                        self.screen.exit_alternate_screen();
                    }
                }
                2004 => self.screen.modes_mut().bracketed_paste = set,
                _ => log::debug!("unknown DEC private mode {} (set={})", param, set),
            }
        }
    }

    fn handle_csi_intermediate(&mut self, csi: &CsiAction) {
        match (csi.intermediates.as_slice(), csi.final_byte) {
            ([b' '], b'q') => {
                // DECSCUSR
                let shape = match csi.params.raw(0) {
                    0..=4 => CursorShape::Block,
                    5 | 6 => CursorShape::Caret,
                    _ => return,
                };
                self.screen.cursor_mut().shape = shape;
            }
            ([b'!'], b'p') => {
                // DECSTR - soft reset, screen content survives
                self.screen.soft_reset();
            }
            _ => {
                log::debug!(
                    "unknown CSI with intermediates {:?}: {:?} final '{}'",
                    csi.intermediates,
                    csi.params,
                    csi.final_byte as char
                );
            }
        }
    }

    /// DSR - device status reports
    fn handle_dsr(&mut self, csi: &CsiAction) {
        match csi.params.raw(0) {
            5 => self.reply(b"\x1b[0n"),
            6 => {
                let cursor = self.screen.cursor();
                let row = cursor.row + 1;
                let col = cursor.col.min(self.screen.cols().saturating_sub(1)) + 1;
                let report = format!("\x1b[{};{}R", row, col);
                self.reply(report.as_bytes());
            }
            mode => log::debug!("unhandled DSR {}", mode),
        }
    }

    /// Window manipulation (xterm extensions); tmux queries these
    fn handle_window_ops(&mut self, csi: &CsiAction) {
        match csi.params.raw(0) {
            14 => {
                // Pixel size report; a fixed non-zero answer keeps shells
                // that parse the reply happy
                self.reply(b"\x1b[4;600;800t");
            }
            18 => {
                let report = format!(
                    "\x1b[8;{};{}t",
                    self.screen.rows().max(1),
                    self.screen.cols().max(1)
                );
                self.reply(report.as_bytes());
            }
            22 | 23 => log::debug!("title stack window op ignored"),
            op => log::debug!("unsupported window op {}", op),
        }
    }

    /// SGR - select graphic rendition
    fn handle_sgr(&mut self, csi: &CsiAction) {
        let params: Vec<u16> = csi.params.iter().collect();
        if params.is_empty() {
            self.screen.cursor_mut().attrs.reset();
            return;
        }

        let attrs = &mut self.screen.cursor_mut().attrs;
        let mut i = 0;
        while i < params.len() {
            // Extended colon forms: only 4:n (underline style) is honoured
            if !csi.params.subparams(i).is_empty() {
                if params[i] == 4 {
                    attrs.underline = true;
                } else {
                    log::debug!("unsupported extended graphics mode {}:...", params[i]);
                }
                i += 1;
                continue;
            }

            match params[i] {
                0 => attrs.reset(),
                1 => attrs.bold = true,
                4 => attrs.underline = true,
                5 => attrs.blink = true,
                7 => attrs.reverse = true,
                24 => attrs.underline = false,
                27 => attrs.reverse = false,
                30..=37 => attrs.fg = Color::Indexed((params[i] - 30) as u8),
                39 => attrs.fg = Color::Default,
                40..=47 => attrs.bg = Color::Indexed((params[i] - 40) as u8),
                49 => attrs.bg = Color::Default,
                90..=97 => attrs.fg = Color::Indexed((params[i] - 90 + 8) as u8),
                100..=107 => attrs.bg = Color::Indexed((params[i] - 100 + 8) as u8),
                38 | 48 => {
                    let (color, consumed) = match parse_extended_color(&params[i..]) {
                        Some(parsed) => parsed,
                        None => {
                            log::debug!("malformed extended color: {:?}", &params[i..]);
                            break;
                        }
                    };
                    if params[i] == 38 {
                        attrs.fg = color;
                    } else {
                        attrs.bg = color;
                    }
                    i += consumed - 1;
                }
                mode => log::debug!("unsupported graphics mode {}", mode),
            }
            i += 1;
        }
    }

    fn handle_osc(&mut self, msg: OscMessage) {
        if let Some(handler) = self.osc_handlers.get_mut(&msg.command) {
            handler(&msg.payload);
            return;
        }

        match msg.command {
            0 | 2 => {
                // Icon-and-title / title; icons are not a thing here
                self.screen.set_title(&msg.payload);
                self.title_changed = true;
                self.notify_listeners();
            }
            1 => {
                // Icon name only
            }
            7 => {
                self.working_directory = parse_file_uri(&msg.payload);
            }
            133 => {
                // Shell integration prompt markers (A/B/C/D)
                log::trace!("shell integration marker: {}", msg.payload);
            }
            cmd => log::debug!("unrecognised OSC {}: {}", cmd, msg.payload),
        }
    }

    fn handle_dcs(&mut self, data: &[u8]) {
        if let Some(inner) = data.strip_prefix(b"tmux;".as_slice()) {
            self.dcs_passthrough(inner);
            return;
        }
        if let Some(inner) = data.strip_prefix(b"screen;".as_slice()) {
            self.dcs_passthrough(inner);
            return;
        }
        if let Some(query) = data.strip_prefix(b"$q".as_slice()) {
            self.handle_decrqss(query);
            return;
        }
        log::debug!("unhandled DCS: {:?}", String::from_utf8_lossy(data));
    }

    /// tmux/screen passthrough: the payload is a nested escape stream.
    /// Senders may double ESC inside it; collapse before re-feeding.
    fn dcs_passthrough(&mut self, inner: &[u8]) {
        if !inner.contains(&0x1B) {
            // Plain text short-circuits the parser
            for c in String::from_utf8_lossy(inner).chars() {
                self.screen.print(c);
            }
            return;
        }
        let mut collapsed = Vec::with_capacity(inner.len());
        let mut i = 0;
        while i < inner.len() {
            collapsed.push(inner[i]);
            if inner[i] == 0x1B && inner.get(i + 1) == Some(&0x1B) {
                i += 2;
            } else {
                i += 1;
            }
        }
        self.feed(&collapsed);
    }

    /// DECRQSS - request selection or setting
    fn handle_decrqss(&mut self, query: &[u8]) {
        match query {
            b"m" => self.reply(b"\x1bP1$r0m\x1b\\"),
            b" q" => {
                let style = match self.screen.cursor().shape {
                    CursorShape::Block => 2,
                    CursorShape::Caret => 6,
                };
                let report = format!("\x1bP1$r{} q\x1b\\", style);
                self.reply(report.as_bytes());
            }
            b"r" => {
                let (top, bottom) = self.screen.scroll_region();
                let report = format!("\x1bP1$r{};{}r\x1b\\", top + 1, bottom + 1);
                self.reply(report.as_bytes());
            }
            _ => {
                self.reply(b"\x1bP0$r\x1b\\");
                log::debug!("unknown DECRQSS query: {:?}", String::from_utf8_lossy(query));
            }
        }
    }

    fn handle_apc(&mut self, data: &[u8]) {
        let code = String::from_utf8_lossy(data);
        for (prefix, handler) in self.apc_handlers.iter_mut() {
            if let Some(arg) = code.strip_prefix(prefix.as_str()) {
                handler(arg);
                return;
            }
        }
        log::debug!("unrecognised APC: {:?}", code);
    }

    fn handle_printer_job(&mut self, data: Vec<u8>) {
        match self.printer.as_mut() {
            Some(printer) => printer.print(&data),
            None => log::debug!("print data received but no printer is set"),
        }
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse `38;5;n`, `48;5;n`, `38;2;r;g;b`, `48;2;r;g;b`.
/// Returns the color and the number of parameters consumed.
fn parse_extended_color(params: &[u16]) -> Option<(Color, usize)> {
    match params.get(1)? {
        5 => {
            let index = *params.get(2)?;
            Some((Color::Indexed(index.min(255) as u8), 3))
        }
        2 => {
            if params.len() < 5 {
                return None;
            }
            Some((
                Color::Rgb {
                    r: params[2].min(255) as u8,
                    g: params[3].min(255) as u8,
                    b: params[4].min(255) as u8,
                },
                5,
            ))
        }
        _ => None,
    }
}

/// Extract the path from a `file://host/path` URI (OSC 7)
fn parse_file_uri(uri: &str) -> Option<String> {
    let rest = uri.strip_prefix("file://")?;
    match rest.find('/') {
        Some(idx) => Some(rest[idx..].to_string()),
        None => None,
    }
}
