//! Helper sisi caller di atas `Writer` / `Reader`
//!
//! Loop short write / short read ada di sini, bukan di transport. Error
//! selain short transfer langsung dikembalikan tanpa retry.

use crate::error::{Error, Result};

use super::{Reader, Writer};

/// Tulis seluruh `buf`, mengulang setelah short write.
///
/// `Ok(0)` untuk sisa buffer non-kosong menjadi `Error::WriteZero`.
/// Saat error, sebagian prefix `buf` mungkin sudah terkirim.
pub fn write_all<W: Writer + ?Sized>(w: &mut W, mut buf: &[u8]) -> Result<()> {
    while !buf.is_empty() {
        match w.write(buf)? {
            0 => return Err(Error::WriteZero),
            n => buf = &buf[n..],
        }
    }
    Ok(())
}

/// Isi seluruh `buf`, mengulang setelah short read.
///
/// End-of-stream sebelum `buf` penuh menjadi `Error::EndOfStream`; isi
/// `buf` setelah error tidak terdefinisi.
pub fn read_exact<R: Reader + ?Sized>(r: &mut R, mut buf: &mut [u8]) -> Result<()> {
    while !buf.is_empty() {
        match r.read(buf)? {
            0 => return Err(Error::EndOfStream),
            n => buf = &mut buf[n..],
        }
    }
    Ok(())
}

/// Tulis length prefix signed 64-bit, little-endian.
///
/// Panjang negatif ditolak sebelum ada byte yang dikirim.
pub fn write_length<W: Writer + ?Sized>(w: &mut W, len: i64) -> Result<()> {
    if len < 0 {
        return Err(Error::NegativeLength);
    }
    write_all(w, &len.to_le_bytes())
}

/// Baca length prefix dari [`write_length`].
pub fn read_length<R: Reader + ?Sized>(r: &mut R) -> Result<usize> {
    let mut raw = [0u8; 8];
    read_exact(r, &mut raw)?;

    let len = i64::from_le_bytes(raw);
    if len < 0 {
        return Err(Error::NegativeLength);
    }
    usize::try_from(len).map_err(|_| Error::InvalidArgument("length exceeds usize"))
}
