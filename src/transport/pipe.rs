//! Blocking in-memory pipe di atas `RingBuffer`
//!
//! `pipe(capacity)` menghasilkan pasangan `PipeWriter` / `PipeReader` yang
//! boleh hidup di thread berbeda (full-duplex tidak didukung: satu arah).
//!
//! - `write` menunggu sampai ada minimal 1 byte ruang kosong
//! - `read` menunggu sampai ada minimal 1 byte data
//! - Drop writer = end-of-stream untuk reader (setelah data habis)
//! - Drop reader = write berikutnya gagal dengan `Error::Closed`

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use super::RingBuffer;
use crate::error::{Error, Result};
use crate::protocol::{Reader, StreamState, Writer};

/// Jumlah spin sebelum yield ke scheduler
const SPIN_LIMIT: u32 = 64;

struct Shared {
    ring: RingBuffer,
    writer_closed: AtomicBool,
    reader_closed: AtomicBool,
}

/// Membuat pipe dengan ring berkapasitas `capacity` byte.
///
/// # Panics
/// Panic jika `capacity == 0`
pub fn pipe(capacity: usize) -> (PipeWriter, PipeReader) {
    let shared = Arc::new(Shared {
        ring: RingBuffer::with_capacity(capacity),
        writer_closed: AtomicBool::new(false),
        reader_closed: AtomicBool::new(false),
    });

    (
        PipeWriter {
            shared: Arc::clone(&shared),
        },
        PipeReader {
            shared,
            state: StreamState::Open,
        },
    )
}

#[inline]
fn backoff(spins: &mut u32) {
    if *spins < SPIN_LIMIT {
        *spins += 1;
        std::hint::spin_loop();
    } else {
        thread::yield_now();
    }
}

/// Sisi producer dari pipe
pub struct PipeWriter {
    shared: Arc<Shared>,
}

impl PipeWriter {
    /// Byte yang sedang menunggu dibaca
    pub fn pending(&self) -> usize {
        self.shared.ring.len()
    }
}

impl Writer for PipeWriter {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        let mut spins = 0;
        loop {
            if self.shared.reader_closed.load(Ordering::Acquire) {
                return Err(Error::Closed);
            }

            let n = self.shared.ring.push_slice(buf);
            if n > 0 {
                return Ok(n);
            }
            backoff(&mut spins);
        }
    }
}

impl Drop for PipeWriter {
    fn drop(&mut self) {
        self.shared.writer_closed.store(true, Ordering::Release);
    }
}

/// Sisi consumer dari pipe
pub struct PipeReader {
    shared: Arc<Shared>,
    state: StreamState,
}

impl PipeReader {
    /// Byte yang bisa dibaca tanpa menunggu
    pub fn available(&self) -> usize {
        self.shared.ring.len()
    }
}

impl Reader for PipeReader {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        if buf.is_empty() || !self.state.check_read()? {
            return Ok(0);
        }

        let mut spins = 0;
        loop {
            // Flag dibaca sebelum pop: jika writer sudah closed, semua push
            // sebelumnya sudah visible
            let closed = self.shared.writer_closed.load(Ordering::Acquire);

            let n = self.shared.ring.pop_slice(buf);
            if n > 0 {
                return Ok(n);
            }
            if closed {
                self.state.mark_eof();
                return Ok(0);
            }
            backoff(&mut spins);
        }
    }
}

impl Drop for PipeReader {
    fn drop(&mut self) {
        self.shared.reader_closed.store(true, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{read_exact, write_all};

    #[test]
    fn test_pipe_threaded_round_trip() {
        let (mut tx, mut rx) = pipe(16);
        let payload: Vec<u8> = (0..50_000u32).map(|i| (i % 251) as u8).collect();

        let expected = payload.clone();
        let producer = thread::spawn(move || {
            write_all(&mut tx, &payload).unwrap();
        });

        let mut received = vec![0u8; expected.len()];
        read_exact(&mut rx, &mut received).unwrap();
        producer.join().unwrap();

        assert_eq!(received, expected);
        // Writer sudah di-drop: end-of-stream, berulang
        let mut buf = [0u8; 4];
        assert_eq!(rx.read(&mut buf).unwrap(), 0);
        assert_eq!(rx.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_accepted_bytes_all_delivered() {
        let (mut tx, mut rx) = pipe(1 << 20);

        let producer = thread::spawn(move || {
            let mut accepted = 0usize;
            for _ in 0..200_000 {
                accepted += tx.write(&[1]).unwrap();
            }
            accepted
        });

        let mut delivered = 0usize;
        let mut chunk = [0u8; 512];
        loop {
            match rx.read(&mut chunk).unwrap() {
                0 => break,
                n => {
                    assert!(chunk[..n].iter().all(|&b| b == 1));
                    delivered += n;
                }
            }
        }

        assert_eq!(producer.join().unwrap(), 200_000);
        assert_eq!(delivered, 200_000);
    }

    #[test]
    fn test_drained_before_eof() {
        let (mut tx, mut rx) = pipe(8);
        tx.write_byte(42).unwrap();
        drop(tx);

        assert_eq!(rx.read_byte().unwrap(), 42);
        assert!(matches!(rx.read_byte(), Err(Error::EndOfStream)));
    }

    #[test]
    fn test_write_after_reader_dropped() {
        let (mut tx, rx) = pipe(8);
        drop(rx);
        assert!(matches!(tx.write(b"x"), Err(Error::Closed)));
        assert!(matches!(tx.write(b"x"), Err(Error::Closed)));
        assert_eq!(tx.write(b"").unwrap(), 0);
    }

    #[test]
    fn test_short_write_when_nearly_full() {
        let (mut tx, rx) = pipe(4);
        assert_eq!(tx.write(b"abc").unwrap(), 3);
        assert_eq!(tx.write(b"defg").unwrap(), 1);
        assert_eq!(tx.pending(), 4);
        assert_eq!(rx.available(), 4);
    }
}
