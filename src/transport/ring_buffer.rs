//! Lock-Free Single-Producer Single-Consumer (SPSC) Byte Ring
//!
//! Implementasi menggunakan Lamport Queue dengan memory ordering yang tepat.
//! Kapasitas ditentukan saat runtime; tidak ada alokasi setelah inisialisasi.
//! Push/pop bekerja per slice, dengan short transfer saat ring penuh/kosong.

use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Padding untuk cache line isolation (64 bytes pada x86-64)
#[repr(C, align(64))]
struct CacheLinePadded<T> {
    value: T,
}

impl<T> CacheLinePadded<T> {
    const fn new(value: T) -> Self {
        Self { value }
    }
}

/// Lock-Free SPSC Byte Ring
///
/// `head` dan `tail` adalah counter monoton (wrapping); index fisik adalah
/// `counter % capacity`. Producer hanya menulis `head`, consumer hanya
/// menulis `tail`. Crate-private: satu-satunya producer adalah
/// `PipeWriter` dan satu-satunya consumer adalah `PipeReader`, keduanya
/// `&mut self` dan tidak `Clone`.
#[repr(C)]
pub(crate) struct RingBuffer {
    // Producer side - cache line aligned
    head: CacheLinePadded<AtomicUsize>,
    // Consumer side - cache line aligned
    tail: CacheLinePadded<AtomicUsize>,
    buffer: Box<[UnsafeCell<u8>]>,
    capacity: usize,
}

// SAFETY: RingBuffer aman untuk Send/Sync karena:
// - Hanya satu producer (menulis head dan region kosong)
// - Hanya satu consumer (menulis tail dan membaca region terisi)
// - Atomic operations menjamin visibility
unsafe impl Send for RingBuffer {}
unsafe impl Sync for RingBuffer {}

impl RingBuffer {
    /// Membuat ring dengan kapasitas `capacity` byte.
    ///
    /// # Panics
    /// Panic jika `capacity == 0`
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "capacity must be non-zero");

        let buffer: Vec<UnsafeCell<u8>> = (0..capacity).map(|_| UnsafeCell::new(0)).collect();

        Self {
            head: CacheLinePadded::new(AtomicUsize::new(0)),
            tail: CacheLinePadded::new(AtomicUsize::new(0)),
            buffer: buffer.into_boxed_slice(),
            capacity,
        }
    }

    #[inline(always)]
    fn slot_ptr(&self, index: usize) -> *mut u8 {
        debug_assert!(index < self.capacity);
        // SAFETY: index < capacity; UnsafeCell mengizinkan mutasi lewat &self
        unsafe { UnsafeCell::raw_get(self.buffer.as_ptr().add(index)) }
    }

    /// Push sebanyak mungkin byte dari `data` (Producer side)
    ///
    /// Returns jumlah byte yang masuk; 0 jika ring penuh.
    ///
    /// Hanya dipanggil dari satu producer pada satu waktu (`PipeWriter`).
    #[inline]
    pub fn push_slice(&self, data: &[u8]) -> usize {
        let head = self.head.value.load(Ordering::Relaxed);
        let tail = self.tail.value.load(Ordering::Acquire);

        let free = self.capacity - head.wrapping_sub(tail);
        let amt = free.min(data.len());
        if amt == 0 {
            return 0;
        }

        let start = head % self.capacity;
        let first = (self.capacity - start).min(amt);

        // SAFETY: region [head, head + amt) kosong dan tidak sedang dibaca;
        // UnsafeCell<u8> punya layout yang sama dengan u8
        unsafe {
            std::ptr::copy_nonoverlapping(data.as_ptr(), self.slot_ptr(start), first);
            if first < amt {
                std::ptr::copy_nonoverlapping(data.as_ptr().add(first), self.slot_ptr(0), amt - first);
            }
        }

        // Release: pastikan write di atas visible sebelum head di-update
        self.head
            .value
            .store(head.wrapping_add(amt), Ordering::Release);

        amt
    }

    /// Pop sebanyak mungkin byte ke `out` (Consumer side)
    ///
    /// Returns jumlah byte yang dibaca; 0 jika ring kosong.
    #[inline]
    pub fn pop_slice(&self, out: &mut [u8]) -> usize {
        let tail = self.tail.value.load(Ordering::Relaxed);
        let head = self.head.value.load(Ordering::Acquire);

        let amt = head.wrapping_sub(tail).min(out.len());
        if amt == 0 {
            return 0;
        }

        let start = tail % self.capacity;
        let first = (self.capacity - start).min(amt);

        // SAFETY: region [tail, tail + amt) sudah ditulis dan tidak sedang ditulis
        unsafe {
            std::ptr::copy_nonoverlapping(self.slot_ptr(start), out.as_mut_ptr(), first);
            if first < amt {
                std::ptr::copy_nonoverlapping(self.slot_ptr(0), out.as_mut_ptr().add(first), amt - first);
            }
        }

        // Release: pastikan read di atas selesai sebelum tail di-update
        self.tail
            .value
            .store(tail.wrapping_add(amt), Ordering::Release);

        amt
    }

    /// Cek apakah ring kosong
    #[inline(always)]
    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cek apakah ring penuh
    #[inline(always)]
    #[allow(dead_code)]
    pub fn is_full(&self) -> bool {
        self.len() >= self.capacity
    }

    /// Jumlah byte dalam ring
    #[inline(always)]
    pub fn len(&self) -> usize {
        let head = self.head.value.load(Ordering::Acquire);
        let tail = self.tail.value.load(Ordering::Acquire);
        head.wrapping_sub(tail)
    }

    /// Kapasitas ring
    #[inline(always)]
    #[allow(dead_code)]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
