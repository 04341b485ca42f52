//! Connection: adapter dari stream std ke `Writer` / `Reader`
//!
//! Bekerja untuk `TcpStream`, `UnixStream`, `File`, dan
//! `mio::net::TcpStream`: apa pun yang implement `io::Read` + `io::Write`.
//! Tidak ada buffering di sini; setiap call langsung ke stream.

use std::io::{self, Read, Write};
use std::net::TcpStream;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::protocol::{Reader, StreamState, Writer};

/// Socket configuration
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Disable Nagle's algorithm untuk lower latency
    pub nodelay: bool,
    pub nonblocking: bool,
    /// SO_SNDBUF dalam bytes (unix only)
    pub send_buffer_size: Option<usize>,
    /// SO_RCVBUF dalam bytes (unix only)
    pub recv_buffer_size: Option<usize>,
    pub read_timeout: Option<Duration>,
    pub write_timeout: Option<Duration>,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            nodelay: true,
            nonblocking: false,
            send_buffer_size: None,
            recv_buffer_size: None,
            read_timeout: None,
            write_timeout: None,
        }
    }
}

/// Transport di atas stream byte std
///
/// Buffer caller diteruskan langsung ke `S::read`. Jaminan "buffer tidak
/// disentuh saat gagal" berlaku hanya jika `S` tidak menulis ke buffer
/// sebelum mengembalikan `Err` (berlaku untuk socket, file, dan `Cursor`
/// di std). Untuk `S` lain, anggap isi buffer tidak terdefinisi setelah error.
pub struct Connection<S> {
    stream: S,
    read_state: StreamState,
    write_state: StreamState,
}

impl<S> Connection<S> {
    /// Wrap stream apa adanya
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            read_state: StreamState::Open,
            write_state: StreamState::Open,
        }
    }

    /// Get underlying stream untuk polling / konfigurasi
    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    pub fn into_inner(self) -> S {
        self.stream
    }

    pub fn read_state(&self) -> StreamState {
        self.read_state
    }

    pub fn write_state(&self) -> StreamState {
        self.write_state
    }
}

impl Connection<TcpStream> {
    /// Wrap TcpStream dan terapkan socket options dari `config`
    pub fn tcp(stream: TcpStream, config: &ConnectionConfig) -> Result<Self> {
        stream.set_nodelay(config.nodelay).map_err(Error::Io)?;
        stream.set_nonblocking(config.nonblocking).map_err(Error::Io)?;
        stream.set_read_timeout(config.read_timeout).map_err(Error::Io)?;
        stream.set_write_timeout(config.write_timeout).map_err(Error::Io)?;

        #[cfg(unix)]
        {
            use std::os::unix::io::AsRawFd;
            let fd = stream.as_raw_fd();
            if let Some(size) = config.send_buffer_size {
                set_buffer_size(fd, libc::SO_SNDBUF, size)?;
            }
            if let Some(size) = config.recv_buffer_size {
                set_buffer_size(fd, libc::SO_RCVBUF, size)?;
            }
        }

        tracing::debug!(
            peer = ?stream.peer_addr().ok(),
            nodelay = config.nodelay,
            nonblocking = config.nonblocking,
            "tcp connection configured"
        );

        Ok(Self::new(stream))
    }
}

#[cfg(unix)]
fn set_buffer_size(fd: libc::c_int, option: libc::c_int, size: usize) -> Result<()> {
    let optval = libc::c_int::try_from(size)
        .map_err(|_| Error::InvalidArgument("socket buffer size out of range"))?;

    // SAFETY: fd valid selama TcpStream hidup; optval hidup sampai call selesai
    let rc = unsafe {
        libc::setsockopt(
            fd,
            libc::SOL_SOCKET,
            option,
            &optval as *const _ as *const libc::c_void,
            std::mem::size_of::<libc::c_int>() as libc::socklen_t,
        )
    };
    if rc != 0 {
        return Err(Error::Io(io::Error::last_os_error()));
    }
    Ok(())
}

/// Map io::Error ke Error. Timeout pada socket blocking juga would-block.
#[inline]
fn map_io(e: io::Error) -> Error {
    match e.kind() {
        io::ErrorKind::TimedOut => Error::WouldBlock,
        io::ErrorKind::BrokenPipe => Error::Closed,
        _ => Error::from(e),
    }
}

impl<S: Write> Writer for Connection<S> {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        self.write_state.check_write()?;

        loop {
            match self.stream.write(buf) {
                Ok(n) => return Ok(n),
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(self.write_state.fail(map_io(e))),
            }
        }
    }
}

impl<S: Read> Reader for Connection<S> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        if buf.is_empty() || !self.read_state.check_read()? {
            return Ok(0);
        }

        loop {
            match self.stream.read(buf) {
                Ok(0) => {
                    self.read_state.mark_eof();
                    return Ok(0);
                }
                Ok(n) => return Ok(n),
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(self.read_state.fail(map_io(e))),
            }
        }
    }
}
