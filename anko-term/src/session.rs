//! PTY session plumbing
//!
//! One reader thread per terminal pulls PTY output through the parser and
//! interpreter; background tickers only touch display state. Teardown is
//! cooperative: cancel tokens stop the loops before the terminal is dropped.

use std::io::Read;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anko_pty::{Child, WindowSize};

use crate::terminal::Terminal;

/// Read buffer size for the PTY loop
pub const PTY_BUF_LEN: usize = 32 * 1024;

/// Cursor blink half-period
const BLINK_INTERVAL: Duration = Duration::from_millis(500);

/// Cooperative cancellation token; one per background loop
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Run the PTY reader loop until EOF, a read error, or cancellation.
/// `on_damage` fires after each consumed chunk so the embedder can schedule a
/// repaint.
pub fn run_reader<R, F>(
    mut reader: R,
    terminal: Arc<Mutex<Terminal>>,
    cancel: CancelToken,
    mut on_damage: F,
) where
    R: Read,
    F: FnMut(),
{
    let mut buf = vec![0u8; PTY_BUF_LEN];
    loop {
        if cancel.is_cancelled() {
            return;
        }
        match reader.read(&mut buf) {
            Ok(0) => {
                log::debug!("pty reader: EOF");
                return;
            }
            Ok(n) => {
                if cancel.is_cancelled() {
                    return;
                }
                terminal.lock().unwrap().feed(&buf[..n]);
                on_damage();
            }
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => {
                log::debug!("pty reader exiting: {}", e);
                return;
            }
        }
    }
}

/// Spawn a periodic background task bound to a cancel token
pub fn spawn_ticker<F>(interval: Duration, cancel: CancelToken, mut tick: F) -> JoinHandle<()>
where
    F: FnMut() + Send + 'static,
{
    thread::spawn(move || loop {
        thread::sleep(interval);
        if cancel.is_cancelled() {
            return;
        }
        tick();
    })
}

/// A running terminal: the shared `Terminal`, its child process (when
/// PTY-backed), the reader thread and the blink ticker.
pub struct Session {
    terminal: Arc<Mutex<Terminal>>,
    child: Option<Child>,
    cancel: CancelToken,
    blink_cancel: CancelToken,
    blink_on: Arc<AtomicBool>,
    reader: Option<JoinHandle<()>>,
    blinker: Option<JoinHandle<()>>,
}

impl Session {
    /// Spawn `$SHELL` on a fresh PTY and start the reader loop
    pub fn spawn_shell<F>(rows: u16, cols: u16, on_damage: F) -> anko_pty::Result<Self>
    where
        F: FnMut() + Send + 'static,
    {
        let child = Child::spawn_shell(WindowSize::new(rows, cols))?;
        let reader = child.reader()?;
        let writer = child.writer()?;

        let mut terminal = Terminal::with_size(rows as usize, cols as usize);
        terminal.set_writer(Box::new(writer));

        let mut session = Self::start(terminal, reader, on_damage);
        session.child = Some(child);
        Ok(session)
    }

    /// Drive the terminal from an external byte stream (SSH, tests).
    /// The caller attaches a writer to the terminal beforehand if replies
    /// should go anywhere.
    pub fn with_connection<R, F>(terminal: Terminal, reader: R, on_damage: F) -> Self
    where
        R: Read + Send + 'static,
        F: FnMut() + Send + 'static,
    {
        Self::start(terminal, reader, on_damage)
    }

    fn start<R, F>(terminal: Terminal, reader: R, on_damage: F) -> Self
    where
        R: Read + Send + 'static,
        F: FnMut() + Send + 'static,
    {
        let terminal = Arc::new(Mutex::new(terminal));
        let cancel = CancelToken::new();
        let blink_cancel = CancelToken::new();
        let blink_on = Arc::new(AtomicBool::new(true));

        let reader_handle = {
            let terminal = terminal.clone();
            let cancel = cancel.clone();
            thread::spawn(move || run_reader(reader, terminal, cancel, on_damage))
        };

        let blinker = {
            let blink_on = blink_on.clone();
            spawn_ticker(BLINK_INTERVAL, blink_cancel.clone(), move || {
                blink_on.fetch_xor(true, Ordering::Relaxed);
            })
        };

        Self {
            terminal,
            child: None,
            cancel,
            blink_cancel,
            blink_on,
            reader: Some(reader_handle),
            blinker: Some(blinker),
        }
    }

    /// The shared terminal; lock it to feed input or take snapshots
    pub fn terminal(&self) -> Arc<Mutex<Terminal>> {
        self.terminal.clone()
    }

    /// Current blink phase for the renderer's cursor
    pub fn blink_phase(&self) -> bool {
        self.blink_on.load(Ordering::Relaxed)
    }

    /// Whether the child process is still alive
    pub fn is_running(&self) -> bool {
        self.child.as_ref().map(Child::is_running).unwrap_or(false)
    }

    /// Resize grid and PTY together. Holding the terminal lock across both
    /// keeps the interpreter from seeing a half-applied size.
    pub fn resize(&self, rows: u16, cols: u16) -> anko_pty::Result<()> {
        let mut terminal = self.terminal.lock().unwrap();
        terminal.resize(rows as usize, cols as usize);
        if let Some(child) = &self.child {
            child.resize(WindowSize::new(rows, cols))?;
        }
        Ok(())
    }

    /// Stop tickers and the reader, hang up the child, and join the threads
    pub fn shutdown(mut self) {
        self.blink_cancel.cancel();
        self.cancel.cancel();
        // Dropping the child sends SIGHUP and closes the PTY, which wakes a
        // blocked reader
        self.child.take();
        if let Some(handle) = self.reader.take() {
            let _ = handle.join();
        }
        if let Some(handle) = self.blinker.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.blink_cancel.cancel();
        self.cancel.cancel();
        self.child.take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::channel;

    #[test]
    fn test_cancel_token() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());
        let clone = token.clone();
        clone.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_connection_session_feeds_terminal() {
        let (tx, rx) = channel();
        let input: &[u8] = b"hello \x1b[1mworld\x1b[0m";
        let session = Session::with_connection(
            Terminal::with_size(3, 20),
            std::io::Cursor::new(input.to_vec()),
            move || {
                let _ = tx.send(());
            },
        );

        // One damage event per consumed chunk; EOF ends the reader
        rx.recv_timeout(Duration::from_secs(5)).unwrap();
        let terminal = session.terminal();
        let snapshot = terminal.lock().unwrap().snapshot();
        assert_eq!(snapshot.row_text(0), "hello world");

        session.shutdown();
    }

    #[test]
    fn test_reader_exits_on_cancel() {
        let terminal = Arc::new(Mutex::new(Terminal::with_size(2, 10)));
        let cancel = CancelToken::new();
        cancel.cancel();
        // A cancelled loop returns without reading
        run_reader(
            std::io::Cursor::new(b"ignored".to_vec()),
            terminal.clone(),
            cancel,
            || {},
        );
        assert!(terminal.lock().unwrap().snapshot().row_text(0).is_empty());
    }
}
