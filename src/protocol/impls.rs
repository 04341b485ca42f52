//! Writer/Reader untuk tipe standar: `Vec<u8>`, slice, dan forwarding
//! untuk `&mut T` dan `Box<T>`.

use crate::error::{Error, Result};

use super::{Reader, Writer};

/// Unbounded: selalu menerima semua byte.
impl Writer for Vec<u8> {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        self.extend_from_slice(buf);
        Ok(buf.len())
    }

    #[inline]
    fn write_byte(&mut self, byte: u8) -> Result<()> {
        self.push(byte);
        Ok(())
    }
}

/// Destination tetap. Slice dipersempit setelah setiap write.
impl Writer for &mut [u8] {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        if self.is_empty() {
            return Err(Error::Exhausted);
        }

        let amt = buf.len().min(self.len());
        let (prefix, suffix) = std::mem::take(self).split_at_mut(amt);
        prefix.copy_from_slice(&buf[..amt]);
        *self = suffix;
        Ok(amt)
    }
}

/// Cursor di atas slice. Slice kosong = end-of-stream.
impl Reader for &[u8] {
    #[inline]
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let amt = buf.len().min(self.len());
        let (head, tail) = self.split_at(amt);
        buf[..amt].copy_from_slice(head);
        *self = tail;
        Ok(amt)
    }
}

impl<W: Writer + ?Sized> Writer for &mut W {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        (**self).write(buf)
    }

    #[inline]
    fn write_byte(&mut self, byte: u8) -> Result<()> {
        (**self).write_byte(byte)
    }
}

impl<W: Writer + ?Sized> Writer for Box<W> {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        (**self).write(buf)
    }

    #[inline]
    fn write_byte(&mut self, byte: u8) -> Result<()> {
        (**self).write_byte(byte)
    }
}

impl<R: Reader + ?Sized> Reader for &mut R {
    #[inline]
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        (**self).read(buf)
    }

    #[inline]
    fn read_byte(&mut self) -> Result<u8> {
        (**self).read_byte()
    }
}

impl<R: Reader + ?Sized> Reader for Box<R> {
    #[inline]
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        (**self).read(buf)
    }

    #[inline]
    fn read_byte(&mut self) -> Result<u8> {
        (**self).read_byte()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_accepts_everything() {
        let mut out = Vec::new();
        assert_eq!(out.write(b"hello").unwrap(), 5);
        out.write_byte(b'!').unwrap();
        assert_eq!(out, b"hello!");
    }

    #[test]
    fn test_fixed_slice_short_write() {
        let mut storage = [0u8; 4];
        let mut dst: &mut [u8] = &mut storage;

        assert_eq!(dst.write(b"hello").unwrap(), 4);
        assert_eq!(dst.write(b"").unwrap(), 0);
        assert!(matches!(dst.write(b"o"), Err(Error::Exhausted)));
        assert!(matches!(dst.write_byte(b'o'), Err(Error::Exhausted)));
        assert_eq!(&storage, b"hell");
    }

    #[test]
    fn test_slice_reader_eof_is_sticky() {
        let mut src: &[u8] = b"abc";
        let mut buf = [0u8; 2];

        assert_eq!(src.read(&mut buf).unwrap(), 2);
        assert_eq!(&buf, b"ab");
        assert_eq!(src.read_byte().unwrap(), b'c');

        for _ in 0..3 {
            assert_eq!(src.read(&mut buf).unwrap(), 0);
        }
        assert!(matches!(src.read_byte(), Err(Error::EndOfStream)));
    }

    #[test]
    fn test_dyn_forwarding() {
        let mut out: Box<dyn Writer> = Box::new(Vec::<u8>::new());
        assert_eq!(out.write(b"xy").unwrap(), 2);

        let mut src: &[u8] = b"z";
        let reader: &mut dyn Reader = &mut src;
        assert_eq!(reader.read_byte().unwrap(), b'z');
    }
}
