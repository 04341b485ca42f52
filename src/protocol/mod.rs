//! Protocol Layer: kapabilitas byte I/O untuk codec
//!
//! Prinsip desain:
//! - Transport-agnostic: codec hanya melihat `Writer` / `Reader`
//! - Borrowed buffers: callee tidak pernah menyimpan referensi ke buffer caller
//! - Explicit result: setiap call mengembalikan jumlah byte atau `Error`
//!
//! Tidak ada framing, byte order, buffering, atau retry di layer ini.

mod ext;
mod impls;
mod message;
mod state;

pub use ext::{read_exact, read_length, write_all, write_length};
pub use message::Message;
pub use state::StreamState;

use crate::error::{Error, Result};

/// Kapabilitas untuk menerima byte keluar.
///
/// `write` boleh menerima sebagian saja (short write). Caller yang butuh
/// semua byte terkirim harus mengulang dengan sisa buffer, atau memakai
/// [`write_all`].
pub trait Writer {
    /// Transfer sebanyak mungkin byte dari `buf`.
    ///
    /// Returns `Ok(n)` dengan `0 <= n <= buf.len()`. Posisi tulis transport
    /// maju tepat `n` byte. `buf` kosong selalu `Ok(0)` tanpa side effect.
    fn write(&mut self, buf: &[u8]) -> Result<usize>;

    /// Tulis satu byte.
    ///
    /// `Ok(())` berarti byte sudah diserahkan ke transport.
    fn write_byte(&mut self, byte: u8) -> Result<()> {
        match self.write(&[byte])? {
            0 => Err(Error::WriteZero),
            _ => Ok(()),
        }
    }
}

/// Kapabilitas untuk menyuplai byte masuk, simetris dengan [`Writer`].
pub trait Reader {
    /// Isi `buf` dengan byte yang tersedia.
    ///
    /// Returns `Ok(n)` dengan `0 <= n <= buf.len()`. `Ok(0)` untuk `buf`
    /// non-kosong berarti end-of-stream; transport non-blocking yang belum
    /// punya data mengembalikan `Err(Error::WouldBlock)`. Saat gagal, `buf`
    /// tidak disentuh oleh transport di crate ini; adapter seperti
    /// `Connection` hanya bisa menjamin ini jika stream di bawahnya juga
    /// tidak menulis ke buffer sebelum mengembalikan error.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Baca tepat satu byte. End-of-stream menjadi `Err(Error::EndOfStream)`.
    fn read_byte(&mut self) -> Result<u8> {
        let mut slot = [0u8; 1];
        match self.read(&mut slot)? {
            0 => Err(Error::EndOfStream),
            _ => Ok(slot[0]),
        }
    }
}
