//! In-memory loopback transport (single-threaded)
//!
//! Byte yang ditulis lewat `Writer` keluar lagi lewat `Reader` dengan urutan
//! yang sama. Non-blocking: kondisi "belum ada data" / "penuh" dilaporkan
//! sebagai `Error::WouldBlock`, bukan `Ok(0)`.
//!
//! Dipakai sebagai transport untuk test codec dan untuk fault injection.

use std::io;

use bytes::{Buf, BytesMut};

use crate::error::{Error, Result};
use crate::protocol::{Reader, StreamState, Writer};

/// Loopback configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct LoopbackConfig {
    /// Batas byte per call `write` (short write di atas batas ini)
    pub max_transfer: Option<usize>,
    /// Batas total byte yang boleh menunggu dibaca
    pub capacity: Option<usize>,
}

pub struct Loopback {
    buffer: BytesMut,
    config: LoopbackConfig,
    state: StreamState,
    closed: bool,
}

impl Default for Loopback {
    fn default() -> Self {
        Self::new()
    }
}

impl Loopback {
    /// Loopback tanpa batas
    pub fn new() -> Self {
        Self::with_config(LoopbackConfig::default())
    }

    pub fn with_config(config: LoopbackConfig) -> Self {
        Self {
            buffer: BytesMut::with_capacity(config.capacity.unwrap_or(4096)),
            config,
            state: StreamState::Open,
            closed: false,
        }
    }

    /// Loopback yang menerima paling banyak `limit` byte per call
    pub fn with_transfer_limit(limit: usize) -> Self {
        Self::with_config(LoopbackConfig {
            max_transfer: Some(limit),
            capacity: None,
        })
    }

    /// Tutup sisi tulis. Reader melihat end-of-stream setelah data habis.
    pub fn close(&mut self) {
        self.closed = true;
    }

    /// Simulasi fault transport: semua call berikutnya gagal dengan `kind`
    pub fn inject_fault(&mut self, kind: io::ErrorKind) {
        let _ = self.state.fail(Error::Io(io::Error::from(kind)));
    }

    /// Byte yang menunggu dibaca
    #[inline(always)]
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// View ke byte yang menunggu dibaca (zero-copy)
    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    #[inline(always)]
    fn limit(&self, len: usize) -> usize {
        match self.config.max_transfer {
            Some(max) => len.min(max),
            None => len,
        }
    }
}

impl Writer for Loopback {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        self.state.check_write()?;
        if self.closed {
            return Err(Error::Closed);
        }

        let free = match self.config.capacity {
            Some(cap) => cap.saturating_sub(self.buffer.len()),
            None => usize::MAX,
        };
        let amt = self.limit(buf.len()).min(free);
        if amt == 0 {
            return Err(Error::WouldBlock);
        }

        self.buffer.extend_from_slice(&buf[..amt]);
        Ok(amt)
    }
}

impl Reader for Loopback {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        if buf.is_empty() || !self.state.check_read()? {
            return Ok(0);
        }

        if self.buffer.is_empty() {
            if self.closed {
                self.state.mark_eof();
                return Ok(0);
            }
            return Err(Error::WouldBlock);
        }

        let amt = buf.len().min(self.buffer.len());
        self.buffer.copy_to_slice(&mut buf[..amt]);
        Ok(amt)
    }
}
