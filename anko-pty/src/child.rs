//! Child process management
//!
//! Spawns a process on the slave side of a PTY with its own session and
//! controlling terminal.

use std::ffi::CString;
use std::fs::File;
use std::io;
use std::os::fd::{AsFd, AsRawFd};

use nix::sys::signal::{kill, Signal};
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::{dup2, execvpe, fork, setsid, ForkResult, Pid};

use crate::error::{Error, Result};
use crate::pty::{configure_slave, Pty};
use crate::size::WindowSize;

/// A child process attached to a PTY
pub struct Child {
    pty: Pty,
    pid: Pid,
}

impl Child {
    /// Spawn `program` with `args` on a fresh PTY of the given size.
    /// The child environment is the parent's with `TERM=xterm-256color`.
    pub fn spawn(program: &str, args: &[&str], size: WindowSize) -> Result<Self> {
        let mut pty = Pty::open()?;
        pty.resize(size)?;

        let slave = pty
            .take_slave()
            .ok_or_else(|| Error::SpawnFailed("slave already claimed".into()))?;

        // Everything the child needs is prepared before fork; the child
        // branch must not allocate
        let program_c =
            CString::new(program).map_err(|e| Error::SpawnFailed(e.to_string()))?;
        let mut argv = vec![program_c.clone()];
        for arg in args {
            argv.push(CString::new(*arg).map_err(|e| Error::SpawnFailed(e.to_string()))?);
        }
        let envp: Vec<CString> = std::env::vars()
            .filter(|(k, _)| k != "TERM")
            .map(|(k, v)| format!("{}={}", k, v))
            .chain(std::iter::once("TERM=xterm-256color".to_string()))
            .filter_map(|kv| CString::new(kv).ok())
            .collect();

        match unsafe { fork() }? {
            ForkResult::Parent { child } => {
                // The parent's slave copy closes here so master reads see EOF
                // when the child exits
                drop(slave);
                Ok(Self { pty, pid: child })
            }
            ForkResult::Child => {
                if setsid().is_err() {
                    std::process::exit(1);
                }
                let slave_fd = slave.as_raw_fd();
                unsafe {
                    if libc::ioctl(slave_fd, libc::TIOCSCTTY as libc::c_ulong, 0) < 0 {
                        std::process::exit(1);
                    }
                }
                if configure_slave(slave.as_fd()).is_err() {
                    std::process::exit(1);
                }
                if dup2(slave_fd, libc::STDIN_FILENO).is_err()
                    || dup2(slave_fd, libc::STDOUT_FILENO).is_err()
                    || dup2(slave_fd, libc::STDERR_FILENO).is_err()
                {
                    std::process::exit(1);
                }
                if slave_fd > 2 {
                    drop(slave);
                }
                let _ = execvpe(&program_c, &argv, &envp);
                std::process::exit(127);
            }
        }
    }

    /// Spawn `$SHELL` (falling back to /bin/bash) as a login shell
    pub fn spawn_shell(size: WindowSize) -> Result<Self> {
        let shell = std::env::var("SHELL").unwrap_or_else(|_| "/bin/bash".to_string());
        Self::spawn(&shell, &["-l"], size)
    }

    /// The PTY master
    pub fn pty(&self) -> &Pty {
        &self.pty
    }

    pub fn pty_mut(&mut self) -> &mut Pty {
        &mut self.pty
    }

    /// Child process ID
    pub fn pid(&self) -> Pid {
        self.pid
    }

    /// A fresh read handle over the master
    pub fn reader(&self) -> Result<File> {
        self.pty.reader()
    }

    /// A fresh write handle over the master
    pub fn writer(&self) -> Result<File> {
        self.pty.writer()
    }

    /// Whether the child is still running
    pub fn is_running(&self) -> bool {
        matches!(
            waitpid(self.pid, Some(WaitPidFlag::WNOHANG)),
            Ok(WaitStatus::StillAlive)
        )
    }

    /// Wait for the child to exit
    pub fn wait(&self) -> Result<WaitStatus> {
        waitpid(self.pid, None).map_err(Error::from)
    }

    /// Non-blocking wait
    pub fn try_wait(&self) -> Result<Option<WaitStatus>> {
        match waitpid(self.pid, Some(WaitPidFlag::WNOHANG)) {
            Ok(WaitStatus::StillAlive) => Ok(None),
            Ok(status) => Ok(Some(status)),
            Err(e) => Err(Error::from(e)),
        }
    }

    /// Send a signal to the child
    pub fn signal(&self, signal: Signal) -> Result<()> {
        kill(self.pid, signal).map_err(Error::from)
    }

    /// Resize the PTY and notify the child with SIGWINCH
    pub fn resize(&self, size: WindowSize) -> Result<()> {
        self.pty.resize(size)?;
        let _ = self.signal(Signal::SIGWINCH);
        Ok(())
    }

    pub fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.pty.read(buf)
    }

    pub fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.pty.write_all(buf)
    }
}

impl Drop for Child {
    fn drop(&mut self) {
        log::debug!("hanging up child {}", self.pid);
        let _ = self.signal(Signal::SIGHUP);
    }
}
