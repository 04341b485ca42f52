//! Memory-Mapped File Transport
//!
//! Data di-mmap langsung ke virtual memory, memungkinkan:
//! - Zero-copy write: `Writer` meng-copy langsung ke page cache
//! - Persistence: posisi tulis/baca disimpan di header file
//!
//! Layout file: `[StorageHeader (64 bytes)][data region (capacity bytes)]`.
//! Region data linear, bukan ring: setelah penuh, write gagal dengan
//! `Error::Exhausted`.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;

use memmap2::{MmapMut, MmapOptions};

use crate::error::{Error, Result};
use crate::protocol::{Reader, StreamState, Writer};

/// Header untuk mmap storage - menyimpan metadata
#[repr(C, align(64))]
struct StorageHeader {
    magic: u64,     // Magic number untuk validasi
    version: u32,   // Versi format
    _reserved: u32, // Padding
    capacity: u64,  // Kapasitas region data dalam bytes
    write_pos: u64, // Posisi tulis saat ini
    read_pos: u64,  // Posisi baca saat ini
}

const MAGIC: u64 = 0x4D49_4450_524F_544F; // "MIDPROTO" in hex
const VERSION: u32 = 1;
const HEADER_SIZE: usize = std::mem::size_of::<StorageHeader>();

/// Mmap-backed transport, implement `Writer` (append) dan `Reader` (cursor)
pub struct MmapStorage {
    mmap: MmapMut,
    capacity: usize,
    state: StreamState,
}

impl MmapStorage {
    /// Membuat atau membuka mmap storage
    ///
    /// # Arguments
    /// * `path` - Path ke file storage
    /// * `capacity` - Kapasitas region data dalam bytes
    ///
    /// File yang sudah ada harus punya kapasitas yang sama.
    pub fn open<P: AsRef<Path>>(path: P, capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidArgument("capacity must be non-zero"));
        }

        let total_size = HEADER_SIZE + capacity;
        let path = path.as_ref();

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(Error::Io)?;

        if file.metadata().map_err(Error::Io)?.len() < total_size as u64 {
            file.set_len(total_size as u64).map_err(Error::Io)?;
        }

        // SAFETY: File sudah dibuka dengan read/write permission dan
        // panjangnya minimal total_size
        let mmap = unsafe {
            MmapOptions::new()
                .len(total_size)
                .map_mut(&file)
                .map_err(Error::Io)?
        };

        let mut storage = Self {
            mmap,
            capacity,
            state: StreamState::Open,
        };

        let header = storage.header_mut();
        if header.magic != MAGIC || header.version != VERSION {
            header.magic = MAGIC;
            header.version = VERSION;
            header.capacity = capacity as u64;
            header.write_pos = 0;
            header.read_pos = 0;
            tracing::debug!(path = %path.display(), capacity, "initialized mmap storage");
        } else if header.capacity != capacity as u64 {
            return Err(Error::InvalidArgument("capacity does not match existing storage"));
        } else if header.write_pos > header.capacity || header.read_pos > header.write_pos {
            tracing::debug!(
                path = %path.display(),
                write_pos = header.write_pos,
                read_pos = header.read_pos,
                "rejected corrupt mmap storage header"
            );
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::InvalidData,
                "corrupt storage header",
            )));
        } else {
            tracing::debug!(
                path = %path.display(),
                write_pos = header.write_pos,
                read_pos = header.read_pos,
                "reopened mmap storage"
            );
        }

        Ok(storage)
    }

    #[inline(always)]
    fn header(&self) -> &StorageHeader {
        // SAFETY: Header berada di awal mmap region, mmap page-aligned
        unsafe { &*(self.mmap.as_ptr() as *const StorageHeader) }
    }

    #[inline(always)]
    fn header_mut(&mut self) -> &mut StorageHeader {
        // SAFETY: sama dengan header(), dengan akses eksklusif lewat &mut self
        unsafe { &mut *(self.mmap.as_mut_ptr() as *mut StorageHeader) }
    }

    /// Byte yang sudah ditulis
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.header().write_pos as usize
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sisa ruang untuk write
    #[inline(always)]
    pub fn available(&self) -> usize {
        self.capacity - self.len()
    }

    /// Kapasitas region data
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Kembalikan cursor baca ke awal dan buka lagi stream untuk dibaca
    pub fn rewind(&mut self) {
        self.header_mut().read_pos = 0;
        if self.state == StreamState::EndOfStream {
            self.state = StreamState::Open;
        }
    }

    /// Sinkronkan region yang di-mmap ke disk
    pub fn flush(&mut self) -> Result<()> {
        self.mmap.flush().map_err(|e| self.state.fail(Error::Io(e)))
    }

    /// View ke seluruh data yang sudah ditulis (zero-copy)
    #[inline(always)]
    pub fn as_bytes(&self) -> &[u8] {
        &self.mmap[HEADER_SIZE..HEADER_SIZE + self.len()]
    }
}

impl Writer for MmapStorage {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        self.state.check_write()?;

        let write_pos = self.len();
        let amt = buf.len().min(self.capacity - write_pos);
        if amt == 0 {
            return Err(Error::Exhausted);
        }

        let start = HEADER_SIZE + write_pos;
        self.mmap[start..start + amt].copy_from_slice(&buf[..amt]);
        self.header_mut().write_pos = (write_pos + amt) as u64;

        Ok(amt)
    }
}

impl Reader for MmapStorage {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        if buf.is_empty() || !self.state.check_read()? {
            return Ok(0);
        }

        let header = self.header();
        let (read_pos, write_pos) = (header.read_pos as usize, header.write_pos as usize);
        if read_pos > write_pos {
            return Err(self.state.fail(Error::Io(io::Error::new(
                io::ErrorKind::InvalidData,
                "corrupt storage header",
            ))));
        }

        let amt = buf.len().min(write_pos - read_pos);
        if amt == 0 {
            self.state.mark_eof();
            return Ok(0);
        }

        let start = HEADER_SIZE + read_pos;
        buf[..amt].copy_from_slice(&self.mmap[start..start + amt]);
        self.header_mut().read_pos = (read_pos + amt) as u64;

        Ok(amt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("mid_proto_{}_{}.dat", name, std::process::id()))
    }

    #[test]
    fn test_header_size() {
        assert_eq!(HEADER_SIZE, 64);
    }

    #[test]
    fn test_mmap_storage_basic() {
        let path = temp_path("basic");

        {
            let mut storage = MmapStorage::open(&path, 4096).unwrap();

            let data = b"Hello, mid!";
            assert_eq!(storage.write(data).unwrap(), data.len());
            assert_eq!(storage.as_bytes(), data);

            let mut out = [0u8; 32];
            assert_eq!(storage.read(&mut out).unwrap(), data.len());
            assert_eq!(&out[..data.len()], data);
        }

        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_mmap_persistence() {
        let path = temp_path("persistence");

        // Write data
        {
            let mut storage = MmapStorage::open(&path, 4096).unwrap();
            storage.write(b"Persistent data").unwrap();
            storage.flush().unwrap();
        }

        // Reopen and verify
        {
            let mut storage = MmapStorage::open(&path, 4096).unwrap();
            assert_eq!(storage.len(), 15);

            let mut out = [0u8; 15];
            assert_eq!(storage.read(&mut out).unwrap(), 15);
            assert_eq!(&out, b"Persistent data");
        }

        assert!(matches!(
            MmapStorage::open(&path, 8192),
            Err(Error::InvalidArgument(_))
        ));

        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_reopen_rejects_inconsistent_positions() {
        let path = temp_path("corrupt");

        // write_pos di luar kapasitas
        {
            let mut storage = MmapStorage::open(&path, 16).unwrap();
            storage.write(b"abc").unwrap();
            storage.header_mut().write_pos = 1_000;
            storage.flush().unwrap();
        }
        match MmapStorage::open(&path, 16) {
            Err(e) => assert_eq!(e.kind(), io::ErrorKind::InvalidData),
            Ok(_) => panic!("corrupt header accepted"),
        }

        // read_pos melewati write_pos
        {
            let mut storage = MmapStorage::open(temp_path("corrupt_read"), 16).unwrap();
            storage.write(b"abc").unwrap();
            storage.header_mut().read_pos = 4;
            storage.flush().unwrap();
        }
        assert!(MmapStorage::open(temp_path("corrupt_read"), 16).is_err());

        fs::remove_file(&path).ok();
        fs::remove_file(temp_path("corrupt_read")).ok();
    }

    #[test]
    fn test_exhausted_and_sticky_eof() {
        let path = temp_path("exhausted");

        {
            let mut storage = MmapStorage::open(&path, 8).unwrap();
            assert_eq!(storage.write(b"0123456789").unwrap(), 8);
            assert!(matches!(storage.write(b"x"), Err(Error::Exhausted)));
            assert_eq!(storage.available(), 0);

            let mut out = [0u8; 16];
            assert_eq!(storage.read(&mut out).unwrap(), 8);
            assert_eq!(storage.read(&mut out).unwrap(), 0);
            assert_eq!(storage.read(&mut out).unwrap(), 0);

            storage.rewind();
            assert_eq!(storage.read_byte().unwrap(), b'0');
        }

        fs::remove_file(&path).ok();
    }
}
