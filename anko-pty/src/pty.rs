//! PTY master management
//!
//! Uses openpty so master and slave exist together from the start; on macOS a
//! master from posix_openpt is not fully functional (TIOCSWINSZ fails with
//! ENOTTY) until the slave side has been opened.

use std::fs::File;
use std::io::{self, Read, Write};
use std::os::fd::{AsFd, AsRawFd, BorrowedFd, OwnedFd, RawFd};

use nix::fcntl::{fcntl, FcntlArg, OFlag};
use nix::pty::openpty;
use nix::sys::termios::{self, SetArg};

use crate::error::{Error, Result};
use crate::size::WindowSize;

/// A pseudo-terminal master with its (not yet claimed) slave side
pub struct Pty {
    master: OwnedFd,
    /// Retained until a child claims it; keeping it open also keeps the
    /// master functional before any child exists
    slave: Option<OwnedFd>,
    /// Buffered I/O handle over a dup of the master
    file: File,
}

impl Pty {
    /// Open a new PTY pair
    pub fn open() -> Result<Self> {
        let pair = openpty(None, None)?;
        let file = File::from(pair.master.try_clone().map_err(Error::Io)?);
        Ok(Self {
            master: pair.master,
            slave: Some(pair.slave),
            file,
        })
    }

    /// Raw master descriptor, for polling
    pub fn master_fd(&self) -> RawFd {
        self.master.as_raw_fd()
    }

    /// Take ownership of the slave side; used once by `Child::spawn`
    pub(crate) fn take_slave(&mut self) -> Option<OwnedFd> {
        self.slave.take()
    }

    /// A fresh read handle over the master, for a reader thread
    pub fn reader(&self) -> Result<File> {
        Ok(File::from(self.master.try_clone().map_err(Error::Io)?))
    }

    /// A fresh write handle over the master
    pub fn writer(&self) -> Result<File> {
        Ok(File::from(self.master.try_clone().map_err(Error::Io)?))
    }

    /// Toggle O_NONBLOCK on the master
    pub fn set_nonblocking(&self, nonblocking: bool) -> Result<()> {
        let fd = self.master.as_raw_fd();
        let flags = OFlag::from_bits_truncate(fcntl(fd, FcntlArg::F_GETFL)?);
        let flags = if nonblocking {
            flags | OFlag::O_NONBLOCK
        } else {
            flags & !OFlag::O_NONBLOCK
        };
        fcntl(fd, FcntlArg::F_SETFL(flags))?;
        Ok(())
    }

    /// Set the PTY window size (TIOCSWINSZ)
    pub fn resize(&self, size: WindowSize) -> Result<()> {
        let ws = size.to_winsize();
        let rc = unsafe {
            libc::ioctl(
                self.master.as_raw_fd(),
                libc::TIOCSWINSZ as libc::c_ulong,
                &ws,
            )
        };
        if rc == -1 {
            return Err(Error::WindowSize(io::Error::last_os_error().to_string()));
        }
        Ok(())
    }

    /// Query the PTY window size (TIOCGWINSZ)
    pub fn window_size(&self) -> Result<WindowSize> {
        let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
        let rc = unsafe {
            libc::ioctl(
                self.master.as_raw_fd(),
                libc::TIOCGWINSZ as libc::c_ulong,
                &mut ws,
            )
        };
        if rc == -1 {
            return Err(Error::WindowSize(io::Error::last_os_error().to_string()));
        }
        Ok(WindowSize::from(ws))
    }

    pub fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }

    pub fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    pub fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.file.write_all(buf)
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl AsRawFd for Pty {
    fn as_raw_fd(&self) -> RawFd {
        self.master.as_raw_fd()
    }
}

impl AsFd for Pty {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.master.as_fd()
    }
}

/// Put a slave descriptor into the usual interactive-shell line discipline
pub(crate) fn configure_slave(fd: BorrowedFd<'_>) -> Result<()> {
    let mut tio = termios::tcgetattr(fd)?;
    tio.input_flags &= !(termios::InputFlags::IGNBRK
        | termios::InputFlags::BRKINT
        | termios::InputFlags::PARMRK
        | termios::InputFlags::ISTRIP
        | termios::InputFlags::INLCR
        | termios::InputFlags::IGNCR
        | termios::InputFlags::ICRNL
        | termios::InputFlags::IXON);
    tio.output_flags |= termios::OutputFlags::OPOST | termios::OutputFlags::ONLCR;
    tio.local_flags |= termios::LocalFlags::ECHO
        | termios::LocalFlags::ECHONL
        | termios::LocalFlags::ICANON
        | termios::LocalFlags::ISIG
        | termios::LocalFlags::IEXTEN;
    tio.control_flags &= !(termios::ControlFlags::CSIZE | termios::ControlFlags::PARENB);
    tio.control_flags |= termios::ControlFlags::CS8;
    tio.control_chars[termios::SpecialCharacterIndices::VMIN as usize] = 1;
    tio.control_chars[termios::SpecialCharacterIndices::VTIME as usize] = 0;
    termios::tcsetattr(fd, SetArg::TCSANOW, &tio)?;
    Ok(())
}
