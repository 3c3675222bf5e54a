//! End-to-end byte-stream scenarios
//!
//! Each test feeds literal PTY bytes and checks the resulting grid, cursor
//! or reply bytes.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use anko_term::{Action, Color, Parser, Terminal};

#[derive(Clone, Default)]
struct RecordingWriter(Arc<Mutex<Vec<u8>>>);

impl Write for RecordingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn terminal(rows: usize, cols: usize) -> (Terminal, Arc<Mutex<Vec<u8>>>) {
    let mut term = Terminal::with_size(rows, cols);
    let writer = RecordingWriter::default();
    let replies = writer.0.clone();
    term.set_writer(Box::new(writer));
    (term, replies)
}

#[test]
fn plain_write_and_backspace_edit() {
    let (mut term, _) = terminal(1, 10);
    term.feed(b"Hi");
    term.feed(&[0x08]);
    term.feed(b"ello");

    assert_eq!(term.snapshot().row_text(0), "Hello");
    assert_eq!(term.screen().cursor().row, 0);
    assert_eq!(term.screen().cursor().col, 5);
}

#[test]
fn autowrap_carries_to_next_row() {
    let (mut term, _) = terminal(3, 2);
    term.feed(b"aaa");

    assert_eq!(term.screen().line(0).cell(0).ch, 'a');
    assert_eq!(term.screen().line(0).cell(1).ch, 'a');
    assert_eq!(term.screen().line(1).cell(0).ch, 'a');
    assert_eq!(term.screen().cursor().row, 1);
    assert_eq!(term.screen().cursor().col, 1);
}

#[test]
fn sgr_color_applies_per_cell() {
    let (mut term, _) = terminal(1, 10);
    term.feed(b"\x1b[31mA\x1b[0mB");

    let line = term.screen().line(0);
    assert_eq!(line.cell(0).ch, 'A');
    assert_eq!(line.cell(0).attrs.fg, Color::Indexed(1));
    assert_eq!(line.cell(1).ch, 'B');
    assert_eq!(line.cell(1).attrs.fg, Color::Default);
}

#[test]
fn cursor_save_restore_and_position_report() {
    let (mut term, replies) = terminal(5, 10);
    term.feed(b"\x1b[3;4H\x1b7\x1b[1;1H\x1b8\x1b[6n");

    assert_eq!(replies.lock().unwrap().as_slice(), b"\x1b[3;4R");
}

#[test]
fn alternate_screen_restores_content_and_cursor() {
    let (mut term, _) = terminal(2, 5);
    term.feed(b"main");
    term.feed(b"\x1b[?1049h");
    term.feed(b"alt");
    assert_eq!(term.snapshot().row_text(0), "alt");

    term.feed(b"\x1b[?1049l");
    assert_eq!(term.snapshot().row_text(0), "main");
    assert_eq!(term.screen().cursor().row, 0);
    assert_eq!(term.screen().cursor().col, 4);
}

#[test]
fn delete_line_within_scroll_region() {
    let (mut term, _) = terminal(3, 20);
    term.feed(b"\x1b[1;1HA");
    term.feed(b"\x1b[2;1HB");
    term.feed(b"\x1b[3;1HC");
    term.feed(b"\x1b[1;1H");
    term.feed(b"\x1b[1M");

    assert_eq!(term.snapshot().row_text(0), "B");
    assert_eq!(term.snapshot().row_text(1), "C");
    assert_eq!(term.snapshot().row_text(2), "");
}

#[test]
fn utf8_codepoint_split_across_feeds() {
    let (mut term, _) = terminal(1, 10);
    // '中' = 0xE4 0xB8 0xAD, split mid-codepoint
    term.feed(&[0xE4, 0xB8]);
    term.feed(&[0xAD]);

    let line = term.screen().line(0);
    assert_eq!(line.cell(0).ch, '中');
    assert!(line.cell(1).is_blank());
    assert!(!line.iter().any(|c| c.ch == '\u{FFFD}'));
    assert_eq!(term.screen().cursor().col, 1);
}

#[test]
fn tmux_dcs_passthrough_interprets_inner_sequence() {
    let (mut term, _) = terminal(2, 5);
    term.feed(b"\x1bPtmux;\x1b[31mX\x1b\\");

    let cell = term.screen().line(0).cell(0);
    assert_eq!(cell.ch, 'X');
    assert_eq!(cell.attrs.fg, Color::Indexed(1));
}

#[test]
fn cursor_stays_in_bounds_under_hostile_input() {
    let (mut term, _) = terminal(4, 6);
    let inputs: &[&[u8]] = &[
        b"\x1b[99;99H",
        b"\x1b[99A\x1b[99B\x1b[99C\x1b[99D",
        b"\x1b[99d\x1b[99G",
        b"wrap around the edge of the screen \n\n\n\n\n\n",
        b"\x1b[0;0H",
        b"\x1b[2;3r\x1b[?6h\x1b[99;99H",
    ];
    for input in inputs {
        term.feed(input);
        let cursor = term.screen().cursor();
        assert!(cursor.row < 4, "row {} out of range", cursor.row);
        assert!(cursor.col <= 6, "col {} out of range", cursor.col);
        if cursor.col == 6 {
            assert!(cursor.pending_wrap);
        }
    }
}

#[test]
fn scroll_region_stays_ordered() {
    let (mut term, _) = terminal(5, 10);
    for input in [
        b"\x1b[2;4r".as_slice(),
        b"\x1b[4;2r".as_slice(),
        b"\x1b[0;99r".as_slice(),
        b"\x1b[!p".as_slice(),
        b"\x1bc".as_slice(),
    ] {
        term.feed(input);
        let (top, bottom) = term.screen().scroll_region();
        assert!(top <= bottom);
        assert!(bottom < 5);
    }
}

#[test]
fn erase_fills_with_current_sgr_blank() {
    let (mut term, _) = terminal(1, 10);
    term.feed(b"XXXXXXXXXX");
    term.feed(b"\x1b[44m");
    term.feed(b"\x1b[1;5H\x1b[0K");

    let line = term.screen().line(0);
    for col in 0..4 {
        assert_eq!(line.cell(col).ch, 'X');
    }
    for col in 4..10 {
        assert_eq!(line.cell(col).ch, ' ');
        assert_eq!(line.cell(col).attrs.bg, Color::Indexed(4));
    }
}

#[test]
fn deferred_wrap_wraps_exactly_once() {
    let (mut term, _) = terminal(3, 5);
    term.feed(b"abcde");
    // Five writes fill the row; the cursor holds at the margin
    assert_eq!(term.screen().cursor().row, 0);
    assert!(term.screen().cursor().pending_wrap);

    term.feed(b"f");
    assert_eq!(term.screen().cursor().row, 1);
    assert_eq!(term.screen().cursor().col, 1);
    assert_eq!(term.screen().line(1).cell(0).ch, 'f');
    assert_eq!(term.snapshot().row_text(0), "abcde");
}

#[test]
fn cursor_move_suppresses_pending_wrap() {
    let (mut term, _) = terminal(3, 5);
    term.feed(b"abcde");
    term.feed(b"\x1b[1;3H");
    term.feed(b"f");
    // No wrap happened; the write landed at the moved-to position
    assert_eq!(term.screen().cursor().row, 0);
    assert_eq!(term.snapshot().row_text(0), "abfde");
    assert_eq!(term.snapshot().row_text(1), "");
}

#[test]
fn dsr_report_round_trips_through_the_parser() {
    let (mut term, replies) = terminal(10, 40);
    term.feed(b"\x1b[7;21H\x1b[6n");

    let reply = replies.lock().unwrap().clone();
    let mut parser = Parser::new();
    let actions = parser.parse_collect(&reply);
    assert_eq!(actions.len(), 1);
    let Action::Csi(csi) = &actions[0] else {
        panic!("reply did not parse as CSI: {:?}", actions);
    };
    assert_eq!(csi.final_byte, b'R');
    assert_eq!(csi.param(0, 0) as usize, term.screen().cursor().row + 1);
    assert_eq!(csi.param(1, 0) as usize, term.screen().cursor().col + 1);
}

#[test]
fn printing_mode_spools_across_split_reads() {
    let (mut term, _) = terminal(2, 10);
    let spooled = Arc::new(Mutex::new(Vec::new()));
    let sink = spooled.clone();
    term.set_printer(move |data: &[u8]| sink.lock().unwrap().extend_from_slice(data));

    term.feed(b"\x1b[5ifirst ");
    term.feed(b"second\x1b[");
    term.feed(b"4i after");

    assert_eq!(spooled.lock().unwrap().as_slice(), b"first second");
    // Bytes after the exit sequence print normally
    assert_eq!(term.snapshot().row_text(0), " after");
}

#[test]
fn insert_and_delete_characters_shift_the_line() {
    let (mut term, _) = terminal(1, 10);
    term.feed(b"abcdef");
    term.feed(b"\x1b[1;3H\x1b[2@");
    assert_eq!(term.snapshot().row_text(0), "ab  cdef");

    term.feed(b"\x1b[1;1H\x1b[4P");
    assert_eq!(term.snapshot().row_text(0), "cdef");
}

#[test]
fn line_feed_mode_returns_carriage() {
    let (mut term, _) = terminal(3, 10);
    term.feed(b"ab\ncd");
    assert_eq!(term.snapshot().row_text(1), "  cd");

    term.feed(b"\x1bc");
    term.feed(b"\x1b[20h");
    term.feed(b"ab\ncd");
    assert_eq!(term.snapshot().row_text(1), "cd");
}

#[test]
fn dec_special_graphics_draw_boxes() {
    let (mut term, _) = terminal(1, 10);
    term.feed(b"\x1b(0lqk\x1b(B");
    assert_eq!(term.snapshot().row_text(0), "┌─┐");
}

#[test]
fn full_width_scroll_preserves_styled_rows() {
    let (mut term, _) = terminal(3, 10);
    term.feed(b"\x1b[31mred1\r\nred2\r\nred3\r\n");
    // The third linefeed scrolls: red1 is gone
    assert_eq!(term.snapshot().row_text(0), "red2");
    assert_eq!(term.screen().line(0).cell(0).attrs.fg, Color::Indexed(1));
    assert_eq!(term.snapshot().row_text(1), "red3");
}
